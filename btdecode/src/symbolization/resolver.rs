//! Address resolution against the registered code regions

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

use super::provider::SymbolProvider;
use crate::domain::{CodeRegion, DecodeError, RegionKind, Symbol, SymbolTable};

/// Placeholder region for addresses outside every registered region
pub static UNKNOWN_REGION: Lazy<CodeRegion> =
    Lazy::new(|| CodeRegion::new("Unknown", 0, 0, Arc::default(), false));

/// Placeholder symbol for offsets below every symbol of a region
pub static UNKNOWN_SYMBOL: Lazy<Symbol> = Lazy::new(|| Symbol {
    address: 0,
    name: "Unknown".to_string(),
    source_info: None,
});

/// Result of resolving one absolute address
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub region: &'a CodeRegion,
    pub symbol: &'a Symbol,
    pub library_offset: u64,
    pub function_offset: u64,
}

impl Resolution<'_> {
    /// True if the address fell outside every registered region
    #[must_use]
    pub fn is_unknown_region(&self) -> bool {
        std::ptr::eq(self.region, &*UNKNOWN_REGION)
    }

    /// True if no symbol of the matched region precedes the address
    #[must_use]
    pub fn is_unknown_symbol(&self) -> bool {
        std::ptr::eq(self.symbol, &*UNKNOWN_SYMBOL)
    }
}

/// Resolve `addr` against `regions` in registration order.
///
/// The first region containing the address wins. The region and symbol
/// fall back to their placeholders independently, so a real region can be
/// paired with [`UNKNOWN_SYMBOL`].
#[must_use]
pub fn resolve_address(regions: &[CodeRegion], addr: u64) -> Resolution<'_> {
    let region = regions
        .iter()
        .find(|r| r.contains(addr))
        .unwrap_or(&*UNKNOWN_REGION);
    let library_offset = region.library_offset(addr);
    let symbol = region
        .symbols
        .lookup(library_offset)
        .unwrap_or(&*UNKNOWN_SYMBOL);

    Resolution {
        region,
        symbol,
        library_offset,
        function_offset: library_offset.wrapping_sub(symbol.address),
    }
}

/// Per-session resolver context
///
/// Holds the regions in the order they were registered and caches symbol
/// tables by binary label, so a binary mapped several times is only dumped
/// once.
pub struct AddressResolver<P> {
    provider: P,
    regions: Vec<CodeRegion>,
    tables: HashMap<String, Arc<SymbolTable>>,
}

impl<P: SymbolProvider> AddressResolver<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            regions: Vec::new(),
            tables: HashMap::new(),
        }
    }

    /// Register a region whose kind is derived from its label
    ///
    /// # Errors
    /// Propagates symbol provider failures for labels seen for the first time.
    pub fn register(
        &mut self,
        label: &str,
        base: u64,
        limit: u64,
    ) -> Result<&CodeRegion, DecodeError> {
        let kind = RegionKind::from_label(label);
        self.register_with_kind(label, base, limit, kind)
    }

    /// Register a region with an explicit kind (used for the kernel image)
    ///
    /// # Errors
    /// Propagates symbol provider failures for labels seen for the first time.
    pub fn register_with_kind(
        &mut self,
        label: &str,
        base: u64,
        limit: u64,
        kind: RegionKind,
    ) -> Result<&CodeRegion, DecodeError> {
        let symbols = self.symbol_table(label)?;
        info!(
            "Region {label}: 0x{base:x} - 0x{limit:x} ({:?}, {} symbols)",
            kind,
            symbols.len()
        );

        let is_library = kind == RegionKind::Library;
        self.regions.push(CodeRegion::new(label, base, limit, symbols, is_library));
        Ok(&self.regions[self.regions.len() - 1])
    }

    fn symbol_table(&mut self, label: &str) -> Result<Arc<SymbolTable>, DecodeError> {
        if let Some(table) = self.tables.get(label) {
            debug!("Reusing symbol table for {label}");
            return Ok(Arc::clone(table));
        }

        debug!("Querying symbols for {label}");
        let raw = self.provider.lookup_symbols(label)?;
        let table = Arc::new(SymbolTable::from_raw(raw));
        self.tables.insert(label.to_string(), Arc::clone(&table));
        Ok(table)
    }

    /// Resolve an absolute address, logging placeholder substitutions
    #[must_use]
    pub fn resolve(&self, addr: u64) -> Resolution<'_> {
        let resolution = resolve_address(&self.regions, addr);
        if resolution.is_unknown_region() {
            warn!("Address 0x{addr:x} is outside every known region");
        } else if resolution.is_unknown_symbol() {
            warn!(
                "Address 0x{addr:x} precedes every symbol of {}",
                resolution.region.label
            );
        }
        resolution
    }

    #[must_use]
    pub fn regions(&self) -> &[CodeRegion] {
        &self.regions
    }
}
