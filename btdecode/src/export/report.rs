use serde::Serialize;
use std::io::Write;

use crate::domain::{CodeRegion, ExportError};
use crate::symbolization::SymbolProvider;
use crate::transcript::{DecodeMode, Decoder, PageFault, ResolvedFrame};

/// Registered region as it appears in the report
#[derive(Debug, Serialize)]
struct RegionSummary<'a> {
    label: &'a str,
    base: u64,
    limit: u64,
    library: bool,
    symbols: usize,
}

impl<'a> From<&'a CodeRegion> for RegionSummary<'a> {
    fn from(region: &'a CodeRegion) -> Self {
        Self {
            label: &region.label,
            base: region.base,
            limit: region.limit,
            library: region.is_library,
            symbols: region.symbols.len(),
        }
    }
}

/// Everything a decoding session resolved
#[derive(Debug, Serialize)]
pub struct ResolutionReport<'a> {
    mode: DecodeMode,
    regions: Vec<RegionSummary<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_fault: Option<&'a PageFault>,
    frames: &'a [ResolvedFrame],
}

impl<'a> ResolutionReport<'a> {
    /// Snapshot the decoder's regions, page fault and frames
    pub fn from_decoder<P: SymbolProvider>(decoder: &'a Decoder<P>) -> Self {
        Self {
            mode: decoder.mode(),
            regions: decoder.regions().iter().map(RegionSummary::from).collect(),
            page_fault: decoder.page_fault(),
            frames: decoder.frames(),
        }
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Write the report as pretty-printed JSON
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails.
    pub fn export<W: Write>(&self, mut writer: W) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
