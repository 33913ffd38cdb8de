//! Symbol table providers
//!
//! The resolver only needs `lookup_symbols(binary)`. [`NmSymbols`] gets the
//! answer from the cross toolchain's `nm`; [`ElfSymbols`](super::ElfSymbols)
//! reads the ELF file directly.

use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::domain::{parse_address, DecodeError, RawSymbol};

/// Source of symbol tables for binaries named in a transcript
pub trait SymbolProvider {
    /// Return the text symbols of `binary` (a region label from the transcript).
    ///
    /// # Errors
    /// Fails if the binary cannot be located or its symbols cannot be read.
    fn lookup_symbols(&self, binary: &str) -> Result<Vec<RawSymbol>, DecodeError>;
}

impl<T: SymbolProvider + ?Sized> SymbolProvider for Box<T> {
    fn lookup_symbols(&self, binary: &str) -> Result<Vec<RawSymbol>, DecodeError> {
        (**self).lookup_symbols(binary)
    }
}

/// Map a transcript label (`/bin/ls`, `/lib/libc.so`) onto the build tree.
///
/// Only the file name is kept: all binaries land in a single output directory.
///
/// # Errors
/// Returns [`DecodeError::BinaryNotFound`] if the mapped file does not exist.
pub fn locate_binary(bin_dir: &Path, label: &str) -> Result<PathBuf, DecodeError> {
    let file_name = Path::new(label)
        .file_name()
        .map_or_else(|| label.into(), PathBuf::from);
    let path = bin_dir.join(file_name);
    if path.is_file() {
        Ok(path)
    } else {
        Err(DecodeError::BinaryNotFound(path))
    }
}

/// Symbol provider backed by an `nm`-compatible tool
#[derive(Debug, Clone)]
pub struct NmSymbols {
    nm: PathBuf,
    bin_dir: PathBuf,
}

impl NmSymbols {
    pub fn new(nm: impl Into<PathBuf>, bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            nm: nm.into(),
            bin_dir: bin_dir.into(),
        }
    }
}

impl SymbolProvider for NmSymbols {
    fn lookup_symbols(&self, binary: &str) -> Result<Vec<RawSymbol>, DecodeError> {
        let path = locate_binary(&self.bin_dir, binary)?;
        debug!("Running {} on {}", self.nm.display(), path.display());

        let output = Command::new(&self.nm)
            .args(["-C", "-l", "--defined-only"])
            .arg(&path)
            .output()
            .map_err(|source| DecodeError::ToolSpawnFailed {
                tool: self.nm.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(DecodeError::SymbolDumpFailed {
                binary: path.display().to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let symbols = parse_nm_output(&stdout);
        debug!("{} text symbols in {}", symbols.len(), path.display());
        Ok(symbols)
    }
}

/// Parse `nm -C -l` output, keeping local, global and weak text symbols.
///
/// Line format: `ADDR TYPE NAME[\tFILE:LINE]`. Demangled names may contain
/// spaces, so everything between the type and the tab is the name.
#[must_use]
pub fn parse_nm_output(output: &str) -> Vec<RawSymbol> {
    output.lines().filter_map(parse_nm_line).collect()
}

fn parse_nm_line(line: &str) -> Option<RawSymbol> {
    let (addr, rest) = line.trim_start().split_once(' ')?;
    let (kind, rest) = rest.split_once(' ')?;
    if !matches!(kind, "t" | "T" | "w" | "W") {
        return None;
    }

    let address = parse_address(addr).ok()?;
    let (name, source_info) = match rest.split_once('\t') {
        Some((name, source)) => {
            let source = source.trim();
            (name, (!source.is_empty()).then(|| source.to_string()))
        }
        None => (rest, None),
    };
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    Some(RawSymbol::new(address, name, source_info))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nm_text_symbols() {
        let out = "\
c0100000 T start
c0100040 t util_panic\t/src/kernel/util.c:42
c0100100 W operator new(unsigned long)\t/src/libcpp/new.cc:10
c0200000 D some_data
c0200010 B bss_thing
00000010 w weak_fn
";
        let syms = parse_nm_output(out);
        assert_eq!(syms.len(), 4);
        assert_eq!(syms[0], RawSymbol::new(0xc010_0000, "start", None));
        assert_eq!(
            syms[1],
            RawSymbol::new(
                0xc010_0040,
                "util_panic",
                Some("/src/kernel/util.c:42".into())
            )
        );
        assert_eq!(syms[2].name, "operator new(unsigned long)");
        assert_eq!(syms[3].address, 0x10);
    }

    #[test]
    fn test_parse_nm_skips_undefined_and_junk() {
        let out = "\n         U printf\nnot a symbol line\nzzzz T bad_addr\n";
        assert!(parse_nm_output(out).is_empty());
    }

    #[test]
    fn test_locate_binary_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("libc.so"), b"").unwrap();

        let path = locate_binary(dir.path(), "/lib/libc.so").unwrap();
        assert_eq!(path, dir.path().join("libc.so"));

        assert!(matches!(
            locate_binary(dir.path(), "/bin/missing"),
            Err(DecodeError::BinaryNotFound(_))
        ));
    }
}
