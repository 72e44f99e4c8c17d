//! # tfgraph-error
//!
//! Unified error handling for tfgraph.
//!
//! - **ErrorKind**: what went wrong (e.g. ConfigInvalid, IoFailed)
//! - **Error Context**: key/value pairs locating the cause
//! - **Error Source**: the wrapped underlying error, if any
//!
//! The simplifier itself never fails. Errors only come from the surfaces around
//! it: reading input, loading a registry file, writing output.
//!
//! ```rust
//! use tfgraph_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::ConfigInvalid, "duplicate entity id")
//!         .with_operation("registry::validate")
//!         .with_context("id", "module.vpc"))
//! }
//! ```

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using the tfgraph Error
pub type Result<T> = std::result::Result<T, Error>;
