//! Reading the raw graph text.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use tfgraph_core::{Error, Result};

/// Read the whole input, from `path` if given, otherwise from stdin.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected; only the
/// edge marker and the registry identifiers need to survive decoding. The
/// stdin lock is held only for the duration of the read.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    let bytes = match path {
        Some(path) => std::fs::read(path).map_err(|err| {
            Error::from(err)
                .with_operation("input::read_file")
                .with_context("path", path.display().to_string())
        })?,
        None => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .lock()
                .read_to_end(&mut bytes)
                .map_err(|err| Error::from(err).with_operation("input::read_stdin"))?;
            bytes
        }
    };

    let text = String::from_utf8_lossy(&bytes).into_owned();
    debug!(bytes = bytes.len(), "input read");
    Ok(text)
}
