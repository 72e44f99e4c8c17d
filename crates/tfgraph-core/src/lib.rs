//! Entity registry and edge discovery for tfgraph.
//!
//! - [`registry`]: the table of known entities (built-in or loaded from TOML)
//! - [`scan`]: line scanner that collects edges between registry entities

pub mod registry;
pub mod scan;

pub use registry::{Entity, InfoNode, Registry};
pub use scan::{EDGE_MARKER, Edge, EdgeSet, scan_edges};
pub use tfgraph_error::{Error, ErrorKind, Result};
