//! Module with common error types.

use serde_json::Error as JsonError;
use std::io::Error as IoError;
use thiserror::Error;

/// An error in loading or parsing an artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// An IO error occurred when loading an artifact from disk.
    #[error("failed to open contract artifact file: {0}")]
    Io(#[from] IoError),

    /// A JSON error occurred while parsing an artifact.
    #[error("failed to parse contract artifact JSON: {0}")]
    Json(#[from] JsonError),
}

/// An error reading bytecode string representation.
#[derive(Debug, Error)]
pub enum BytecodeError {
    /// Bytecode string is not an even length.
    #[error("invalid bytecode length")]
    InvalidLength,

    /// Invalid hex digit
    #[error("invalid hex digit '{0}'")]
    InvalidHexDigit(char),
}

/// An error producing final bytecode from linked bytecode.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Error producing final bytecode binary when there are missing libraries
    /// that are not linked. Analogous to "undefinied symbol" error for
    /// traditional linkers.
    #[error("undefined library {0}")]
    UndefinedLibrary(String),

    /// The bytecode without placeholders is not valid hex.
    #[error("invalid bytecode: {0}")]
    Bytecode(#[from] BytecodeError),
}
