//! Report export functionality
//!
//! This module provides functionality for exporting decoding results.
//! Currently supports a JSON resolution report (`--report FILE`).

pub mod report;

pub use report::ResolutionReport;
