//! Error kinds for tfgraph operations

use strum_macros::Display;

/// The kind of error that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Registry file parsed but failed validation
    ConfigInvalid,

    /// A text file (e.g. a registry) was not valid UTF-8
    EncodingError,

    // =========================================================================
    // File/IO errors
    // =========================================================================
    FileNotFound,

    PermissionDenied,

    /// IO operation failed
    IoFailed,

    // =========================================================================
    // Serialization errors
    // =========================================================================
    /// Registry could not be written as TOML
    SerializationFailed,

    /// Registry file is not valid TOML or does not match the schema
    DeserializationFailed,
}
