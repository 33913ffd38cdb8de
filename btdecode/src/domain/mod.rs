//! Domain model for btdecode
//!
//! This module contains core domain types and errors that provide:
//! - Code regions and their symbol tables
//! - Transcript address parsing
//! - Structured error handling

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use types::{parse_address, CodeRegion, RawSymbol, RegionKind, Symbol, SymbolTable};

pub use errors::{DecodeError, ExportError};
