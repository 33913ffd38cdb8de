//! Rendering of resolved addresses
//!
//! ```text
//! =>: 0x00001234 (/bin/ls+0x1234)
//! 	main+0x34 (ls.c:120)
//!
//! Pagefault for 0x00000010
//! at 0xc0102345 (escape+0xc0102345): util_panic+0x45 (util.c:42)
//! ```

use serde::Serialize;

use crate::symbolization::Resolution;

/// Owned copy of a [`Resolution`] for rendering and the JSON report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFrame {
    pub address: u64,
    pub region: String,
    pub library_offset: u64,
    pub symbol: String,
    pub function_offset: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_info: Option<String>,
}

impl ResolvedFrame {
    #[must_use]
    pub fn new(address: u64, resolution: &Resolution<'_>) -> Self {
        Self {
            address,
            region: resolution.region.label.clone(),
            library_offset: resolution.library_offset,
            symbol: resolution.symbol.name.clone(),
            function_offset: resolution.function_offset,
            source_info: resolution.symbol.source_info.clone(),
        }
    }

    /// `region+0xOFF`
    #[must_use]
    pub fn region_label(&self) -> String {
        format!("{}+0x{:x}", self.region, self.library_offset)
    }

    /// `func+0xOFF (source)`, the source part omitted when unknown
    #[must_use]
    pub fn function_label(&self) -> String {
        match &self.source_info {
            Some(src) => format!("{}+0x{:x} ({src})", self.symbol, self.function_offset),
            None => format!("{}+0x{:x}", self.symbol, self.function_offset),
        }
    }

    /// Two output lines replacing a frame line
    #[must_use]
    pub fn format(&self) -> [String; 2] {
        [
            format!("=>: 0x{:08x} ({})", self.address, self.region_label()),
            format!("\t{}", self.function_label()),
        ]
    }
}

/// A decoded page fault diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFault {
    pub fault_address: u64,
    pub instruction: ResolvedFrame,
}

impl PageFault {
    /// Two output lines replacing the page fault line
    #[must_use]
    pub fn format(&self) -> [String; 2] {
        [
            format!("Pagefault for 0x{:08x}", self.fault_address),
            format!(
                "at 0x{:08x} ({}): {}",
                self.instruction.address,
                self.instruction.region_label(),
                self.instruction.function_label()
            ),
        ]
    }
}
