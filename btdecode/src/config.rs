//! Decoder configuration
//!
//! Tool and binary locations follow the build tree layout: the cross
//! toolchain lives in `/opt/escape-cross-<target>` and every built binary
//! (kernel, programs, shared libraries) ends up in `build/<target>-<build>/bin`.
//! `ESC_TARGET` and `ESC_BUILD` pick the tree; `--nm` and `--bin-dir`
//! override the derived paths.

use clap::ValueEnum;
use std::path::PathBuf;

use crate::cli::Args;
use crate::domain::DecodeError;
use crate::symbolization::{ElfSymbols, NmSymbols, SymbolProvider};
use crate::transcript::{DecodeMode, Decoder, KernelImage};

/// Symbol table source
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SymbolSource {
    /// Run the cross toolchain's nm (with line numbers)
    Nm,
    /// Read ELF symbol tables and DWARF line info in-process
    Elf,
}

/// Resolved settings for one decoding session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    pub mode: DecodeMode,
    pub symbols: SymbolSource,
    pub nm: PathBuf,
    pub bin_dir: PathBuf,
    pub kernel: KernelImage,
    pub report: Option<PathBuf>,
}

impl DecoderConfig {
    #[must_use]
    pub fn from_args(args: &Args) -> Self {
        Self {
            mode: args.mode,
            symbols: args.symbols,
            nm: args.nm.clone().unwrap_or_else(|| default_nm(&args.target)),
            bin_dir: args
                .bin_dir
                .clone()
                .unwrap_or_else(|| default_bin_dir(&args.target, &args.build)),
            kernel: KernelImage {
                name: args.kernel.clone(),
                base: args.kernel_base,
            },
            report: args.report.clone(),
        }
    }

    /// Symbol provider selected by [`DecoderConfig::symbols`]
    #[must_use]
    pub fn provider(&self) -> Box<dyn SymbolProvider> {
        match self.symbols {
            SymbolSource::Nm => Box::new(NmSymbols::new(&self.nm, &self.bin_dir)),
            SymbolSource::Elf => Box::new(ElfSymbols::new(&self.bin_dir)),
        }
    }

    /// Create the session decoder; in kernel mode this loads kernel symbols.
    ///
    /// # Errors
    /// Fails if the kernel's symbol table cannot be read.
    pub fn decoder(&self) -> Result<Decoder<Box<dyn SymbolProvider>>, DecodeError> {
        match self.mode {
            DecodeMode::User => Ok(Decoder::new(self.provider())),
            DecodeMode::Kernel => Decoder::kernel(self.provider(), &self.kernel),
        }
    }
}

/// `/opt/escape-cross-<target>/bin/<target>-elf-escape-nm`
#[must_use]
pub fn default_nm(target: &str) -> PathBuf {
    PathBuf::from(format!("/opt/escape-cross-{target}/bin/{target}-elf-escape-nm"))
}

/// `build/<target>-<build>/bin`
#[must_use]
pub fn default_bin_dir(target: &str, build: &str) -> PathBuf {
    PathBuf::from("build")
        .join(format!("{target}-{build}"))
        .join("bin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_derived_paths() {
        assert_eq!(
            default_nm("i586"),
            PathBuf::from("/opt/escape-cross-i586/bin/i586-elf-escape-nm")
        );
        assert_eq!(
            default_bin_dir("i586", "release"),
            PathBuf::from("build/i586-release/bin")
        );
    }

    #[test]
    fn test_from_args_uses_overrides() {
        let args = Args::try_parse_from([
            "btdecode",
            "--target",
            "x86_64",
            "--build",
            "debug",
            "--nm",
            "/usr/bin/nm",
            "--report",
            "out.json",
        ])
        .unwrap();
        let config = DecoderConfig::from_args(&args);

        assert_eq!(config.nm, PathBuf::from("/usr/bin/nm"));
        assert_eq!(config.bin_dir, PathBuf::from("build/x86_64-debug/bin"));
        assert_eq!(config.report, Some(PathBuf::from("out.json")));
        assert_eq!(config.kernel, KernelImage {
            name: "escape".into(),
            base: 0xc000_0000,
        });
    }

    #[test]
    fn test_kernel_decoder_needs_kernel_binary() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args::try_parse_from([
            "btdecode",
            "--mode",
            "kernel",
            "--symbols",
            "elf",
            "--bin-dir",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        let config = DecoderConfig::from_args(&args);

        assert!(matches!(config.decoder(), Err(DecodeError::BinaryNotFound(_))));
    }

    #[test]
    fn test_user_decoder_is_lazy() {
        let args = Args::try_parse_from(["btdecode", "--bin-dir", "/nonexistent"])
            .unwrap();
        let decoder = DecoderConfig::from_args(&args).decoder().unwrap();
        assert!(decoder.regions().is_empty());
    }
}
