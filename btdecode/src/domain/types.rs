//! Domain types for address resolution
//!
//! A decoding session works with two kinds of data: code regions taken from
//! the transcript (a binary mapped at `[base, limit)`) and the symbol tables
//! of the binaries behind them. Symbol addresses are stored in the frame of
//! their owning region: absolute for programs and the kernel, relative to the
//! load base for shared libraries.

use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::errors::DecodeError;

/// Parse a transcript address.
///
/// Accepts plain hex (`c0101234`), the two-part `HEX:HEX` encoding
/// (`c010:1234`, concatenated before parsing) and an optional `0x` prefix.
///
/// # Errors
/// Returns [`DecodeError::InvalidAddress`] for empty or non-hex input, or
/// values that do not fit into 64 bits.
pub fn parse_address(text: &str) -> Result<u64, DecodeError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let joined: String = digits.split(':').collect();

    if joined.is_empty() || !joined.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidAddress(text.to_string()));
    }

    u64::from_str_radix(&joined, 16)
        .map_err(|_| DecodeError::InvalidAddress(text.to_string()))
}

/// A symbol as reported by a [`SymbolProvider`](crate::symbolization::SymbolProvider),
/// in whatever order the provider produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSymbol {
    pub address: u64,
    pub name: String,
    pub source_info: Option<String>,
}

impl RawSymbol {
    pub fn new(address: u64, name: impl Into<String>, source_info: Option<String>) -> Self {
        Self {
            address,
            name: name.into(),
            source_info,
        }
    }
}

/// An exported function entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub address: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_info: Option<String>,
}

impl From<RawSymbol> for Symbol {
    fn from(raw: RawSymbol) -> Self {
        Self {
            address: raw.address,
            name: raw.name,
            source_info: raw.source_info,
        }
    }
}

/// Symbol table of one binary, sorted by address in descending order.
///
/// Lookups return the first entry whose address does not exceed the offset,
/// which is the nearest preceding symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    /// Build a table from provider output.
    ///
    /// Entries are sorted descending; when several symbols share an address
    /// only the first one reported is kept.
    #[must_use]
    pub fn from_raw(raw: Vec<RawSymbol>) -> Self {
        let mut symbols: Vec<Symbol> = raw.into_iter().map(Symbol::from).collect();
        // stable sort keeps provider order among equal addresses for dedup_by_key
        symbols.sort_by(|a, b| b.address.cmp(&a.address));
        symbols.dedup_by_key(|s| s.address);
        Self { symbols }
    }

    /// Nearest symbol at or below `offset`
    #[must_use]
    pub fn lookup(&self, offset: u64) -> Option<&Symbol> {
        self.symbols.iter().find(|s| offset >= s.address)
    }

    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Whether a region's symbols are absolute or relative to its load base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    /// Kernel or program image, symbols are absolute addresses
    Program,
    /// Shared library, symbols are offsets from the load base
    Library,
}

impl RegionKind {
    /// Classify a binary label by its file name (`libc.so`, `ld.so.1`, ...)
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let file_name = Path::new(label)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(label);
        if file_name.contains(".so") {
            Self::Library
        } else {
            Self::Program
        }
    }
}

/// A loaded binary occupying `[base, limit)` in the faulting address space
#[derive(Debug, Clone)]
pub struct CodeRegion {
    pub label: String,
    pub base: u64,
    pub limit: u64,
    pub symbols: Arc<SymbolTable>,
    pub is_library: bool,
}

impl CodeRegion {
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        base: u64,
        limit: u64,
        symbols: Arc<SymbolTable>,
        is_library: bool,
    ) -> Self {
        Self {
            label: label.into(),
            base,
            limit,
            symbols,
            is_library,
        }
    }

    /// Check if an address falls within `[base, limit)`
    ///
    /// Region dumps print the last byte as the limit, so that byte itself
    /// is never inside the region.
    #[must_use]
    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.base && addr < self.limit
    }

    /// Translate an absolute address into the frame of this region's symbols
    #[must_use]
    pub fn library_offset(&self, addr: u64) -> u64 {
        if self.is_library {
            addr.wrapping_sub(self.base)
        } else {
            addr
        }
    }
}

impl fmt::Display for CodeRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 0x{:x}..0x{:x}", self.label, self.base, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_prefixed() {
        assert_eq!(parse_address("c0101234").unwrap(), 0xc010_1234);
        assert_eq!(parse_address("0x1050").unwrap(), 0x1050);
        assert_eq!(parse_address("  0X1f ").unwrap(), 0x1f);
    }

    #[test]
    fn test_parse_segmented() {
        assert_eq!(parse_address("c010:1234").unwrap(), 0xc010_1234);
        assert_eq!(parse_address("0000:0000:1000:0000").unwrap(), 0x1000_0000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_address(""), Err(DecodeError::InvalidAddress(_))));
        assert!(parse_address("0x").is_err());
        assert!(parse_address("12zz").is_err());
        assert!(parse_address("11112222333344445").is_err());
    }

    #[test]
    fn test_table_sorted_descending() {
        let table = SymbolTable::from_raw(vec![
            RawSymbol::new(0x200, "b", None),
            RawSymbol::new(0x100, "a", None),
            RawSymbol::new(0x300, "c", None),
        ]);
        let order: Vec<(u64, &str)> = table
            .symbols()
            .iter()
            .map(|s| (s.address, s.name.as_str()))
            .collect();
        assert_eq!(order, vec![(0x300, "c"), (0x200, "b"), (0x100, "a")]);
    }

    #[test]
    fn test_table_dedups_addresses() {
        let table = SymbolTable::from_raw(vec![
            RawSymbol::new(0x100, "first", None),
            RawSymbol::new(0x100, "alias", None),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.symbols()[0].name, "first");
    }

    #[test]
    fn test_lookup_tightest_lower_bound() {
        let table = SymbolTable::from_raw(vec![
            RawSymbol::new(0x1100, "bar", None),
            RawSymbol::new(0x1500, "foo", None),
        ]);
        assert_eq!(table.lookup(0x1600).unwrap().name, "foo");
        assert_eq!(table.lookup(0x1500).unwrap().name, "foo");
        assert_eq!(table.lookup(0x14ff).unwrap().name, "bar");
        assert!(table.lookup(0x10ff).is_none());
    }

    #[test]
    fn test_region_kind_from_label() {
        assert_eq!(RegionKind::from_label("/lib/libc.so"), RegionKind::Library);
        assert_eq!(RegionKind::from_label("ld.so.1"), RegionKind::Library);
        assert_eq!(RegionKind::from_label("/bin/ls"), RegionKind::Program);
        assert_eq!(
            RegionKind::from_label("/sbin/socket.server"),
            RegionKind::Program
        );
    }

    #[test]
    fn test_region_contains_half_open() {
        let region = CodeRegion::new("x", 0x1000, 0x2000, Arc::default(), false);
        assert!(region.contains(0x1000));
        assert!(region.contains(0x1fff));
        assert!(!region.contains(0x0fff));
        assert!(!region.contains(0x2000));
    }

    #[test]
    fn test_library_offset() {
        let lib = CodeRegion::new("libc.so", 0x1000, 0x2000, Arc::default(), true);
        let prog = CodeRegion::new("prog", 0x1000, 0x2000, Arc::default(), false);
        assert_eq!(lib.library_offset(0x1050), 0x50);
        assert_eq!(prog.library_offset(0x1050), 0x1050);
    }
}
