//! Structured error types for btdecode
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! Unresolvable addresses are not errors: they decode to the sentinel region
//! and symbol. Everything here aborts the session.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid address: '{0}'")]
    InvalidAddress(String),

    #[error("Binary not found: {}", .0.display())]
    BinaryNotFound(PathBuf),

    #[error("Failed to run {tool}: {source}")]
    ToolSpawnFailed {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Symbol dump of {binary} failed ({status}): {stderr}")]
    SymbolDumpFailed {
        binary: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to parse {binary}: {reason}")]
    ObjectParseFailed { binary: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
