//! Pre-flight checks for btdecode
//!
//! Validates the build tree and toolchain before the transcript is read, so a
//! misconfigured `ESC_TARGET`/`ESC_BUILD` fails with an actionable message
//! instead of in the middle of a pasted panic.

use anyhow::{bail, Result};
use std::path::Path;

use crate::config::{DecoderConfig, SymbolSource};

/// Run all pre-flight checks before decoding
///
/// # Errors
/// Returns an error describing the first missing directory or tool.
pub fn run_preflight_checks(config: &DecoderConfig) -> Result<()> {
    check_bin_dir(&config.bin_dir)?;
    if config.symbols == SymbolSource::Nm {
        check_nm_tool(&config.nm)?;
    }
    Ok(())
}

/// Check that the binary directory exists
fn check_bin_dir(bin_dir: &Path) -> Result<()> {
    if !bin_dir.exists() {
        bail!(
            "Binary directory not found: {}\n\n\
             Set ESC_TARGET/ESC_BUILD to an existing build or pass --bin-dir.",
            bin_dir.display()
        );
    }
    if !bin_dir.is_dir() {
        bail!(
            "Not a directory: {}\n\n\
             --bin-dir must point to the directory holding the built binaries.",
            bin_dir.display()
        );
    }
    Ok(())
}

/// Check that an explicitly located nm exists
///
/// Bare tool names (`nm`) are looked up through `PATH` when spawned.
fn check_nm_tool(nm: &Path) -> Result<()> {
    if nm.components().count() > 1 && !nm.is_file() {
        bail!(
            "nm not found: {}\n\n\
             Install the cross toolchain for ESC_TARGET, pass --nm, or use --symbols elf.",
            nm.display()
        );
    }
    Ok(())
}
