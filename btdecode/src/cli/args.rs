//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use crate::config::SymbolSource;
use crate::domain::parse_address;
use crate::transcript::DecodeMode;

#[derive(Parser, Debug)]
#[command(
    name = "btdecode",
    about = "Decode panic backtraces pasted from the terminal",
    after_help = "\
EXAMPLES:
    btdecode                                 Paste a user-mode transcript, end with Ctrl+D
    btdecode --mode kernel < panic.txt       Decode a saved kernel panic
    ESC_TARGET=x86_64 btdecode --symbols elf Read symbols directly from the ELF files"
)]
pub struct Args {
    /// Transcript flavor
    #[arg(short, long, value_enum, default_value_t = DecodeMode::User)]
    pub mode: DecodeMode,

    /// Where symbol tables come from
    #[arg(short, long, value_enum, default_value_t = SymbolSource::Nm)]
    pub symbols: SymbolSource,

    /// Target architecture of the build tree
    #[arg(long, env = "ESC_TARGET", default_value = "i586")]
    pub target: String,

    /// Build variant of the build tree
    #[arg(long, env = "ESC_BUILD", default_value = "release")]
    pub build: String,

    /// nm tool to run (default: the cross toolchain's nm for --target)
    #[arg(long, value_name = "PATH")]
    pub nm: Option<PathBuf>,

    /// Directory holding the built binaries (default: build/<target>-<build>/bin)
    #[arg(long, value_name = "DIR")]
    pub bin_dir: Option<PathBuf>,

    /// Kernel binary name (kernel mode)
    #[arg(long, default_value = "escape")]
    pub kernel: String,

    /// Start of kernel space (kernel mode)
    #[arg(
        long,
        value_name = "ADDR",
        value_parser = parse_address,
        default_value = "0xc0000000"
    )]
    pub kernel_base: u64,

    /// Write a JSON report of all resolved addresses
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["btdecode"]).unwrap();
        assert_eq!(args.mode, DecodeMode::User);
        assert_eq!(args.symbols, SymbolSource::Nm);
        assert_eq!(args.kernel, "escape");
        assert_eq!(args.kernel_base, 0xc000_0000);
        assert!(args.report.is_none());
    }

    #[test]
    fn test_kernel_mode_flags() {
        let args = Args::try_parse_from([
            "btdecode",
            "--mode",
            "kernel",
            "--symbols",
            "elf",
            "--kernel-base",
            "8000:0000",
            "--target",
            "x86_64",
            "--build",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.mode, DecodeMode::Kernel);
        assert_eq!(args.symbols, SymbolSource::Elf);
        assert_eq!(args.kernel_base, 0x8000_0000);
        assert_eq!(args.target, "x86_64");
        assert_eq!(args.build, "debug");
    }

    #[test]
    fn test_bad_kernel_base() {
        let result = Args::try_parse_from(["btdecode", "--kernel-base", "nothex"]);
        assert!(result.is_err());
    }
}
