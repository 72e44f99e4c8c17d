//! Processing pipeline: pick registry → scan edges → render document.

use std::path::Path;
use std::time::Instant;

use tracing::info;

use tfgraph_core::{Registry, Result, scan_edges};
use tfgraph_dot::render_document;

use crate::profile::profile_phase;

/// The registry named on the command line, or the built-in one.
pub fn load_registry(path: Option<&Path>) -> Result<Registry> {
    match path {
        Some(path) => {
            let registry = Registry::load(path)?;
            info!(
                path = %path.display(),
                entities = registry.len(),
                "using custom registry"
            );
            Ok(registry)
        }
        None => Ok(Registry::builtin().clone()),
    }
}

/// Simplify `text` against `registry`, timing each phase.
pub fn process_input(registry: &Registry, text: &str) -> String {
    let scan_start = Instant::now();
    let edges = profile_phase("scan", || scan_edges(registry, text));
    info!(
        edges = edges.len(),
        "Edge scan: {:.3}s",
        scan_start.elapsed().as_secs_f64()
    );

    let render_start = Instant::now();
    let document = profile_phase("render", || render_document(registry, &edges));
    info!(
        bytes = document.len(),
        "Rendering: {:.3}s",
        render_start.elapsed().as_secs_f64()
    );

    document
}
