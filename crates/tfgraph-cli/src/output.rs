//! Writing the rendered document.

use std::io::Write;
use std::path::Path;

use tracing::info;

use tfgraph_core::{Error, Result};

/// Write `text` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, text).map_err(|err| {
                Error::from(err)
                    .with_operation("output::write_file")
                    .with_context("path", path.display().to_string())
            })?;
            info!(path = %path.display(), "output written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|err| Error::from(err).with_operation("output::write_stdout"))?;
        }
    }
    Ok(())
}
