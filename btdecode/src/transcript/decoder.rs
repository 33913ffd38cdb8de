//! Line-by-line transcript decoder

use log::{debug, info};

use super::formatter::{PageFault, ResolvedFrame};
use super::patterns::{classify, LineKind};
use super::state::{DecodeMode, DecoderState};
use crate::domain::{CodeRegion, DecodeError, RegionKind};
use crate::symbolization::{AddressResolver, SymbolProvider};

/// Kernel image registered ahead of the transcript's own regions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelImage {
    /// Binary label handed to the symbol provider
    pub name: String,
    /// Lowest kernel address; the region extends to the top of the address space
    pub base: u64,
}

/// Decoding session over one transcript
///
/// Feed lines through [`Decoder::process_line`]; each call returns the
/// output lines that replace the input line.
pub struct Decoder<P> {
    mode: DecodeMode,
    state: DecoderState,
    resolver: AddressResolver<P>,
    frames: Vec<ResolvedFrame>,
    page_fault: Option<PageFault>,
}

impl<P: SymbolProvider> Decoder<P> {
    /// Decoder for user-mode transcripts
    pub fn new(provider: P) -> Self {
        Self {
            mode: DecodeMode::User,
            state: DecoderState::AwaitRegions,
            resolver: AddressResolver::new(provider),
            frames: Vec::new(),
            page_fault: None,
        }
    }

    /// Decoder for kernel panic transcripts
    ///
    /// The kernel image becomes the first region, so it takes precedence
    /// over any transcript region overlapping kernel space.
    ///
    /// # Errors
    /// Fails if the kernel's symbols cannot be loaded.
    pub fn kernel(provider: P, kernel: &KernelImage) -> Result<Self, DecodeError> {
        let mut decoder = Self::new(provider);
        decoder.mode = DecodeMode::Kernel;
        decoder.resolver.register_with_kind(
            &kernel.name,
            kernel.base,
            u64::MAX,
            RegionKind::Program,
        )?;
        Ok(decoder)
    }

    /// Process one input line (without its line terminator).
    ///
    /// # Errors
    /// Only symbol provider failures while registering a new region.
    pub fn process_line(&mut self, line: &str) -> Result<Vec<String>, DecodeError> {
        let kind = classify(line);

        let output = match (self.state, &kind) {
            (DecoderState::AwaitRegions, LineKind::Region { label, base, limit }) => {
                self.resolver.register(label, *base, *limit)?;
                vec![line.to_string()]
            }
            (DecoderState::AwaitPageFault, LineKind::PageFault { address, ip }) => {
                let resolution = self.resolver.resolve(*ip);
                let fault = PageFault {
                    fault_address: *address,
                    instruction: ResolvedFrame::new(*ip, &resolution),
                };
                let rendered = fault.format().to_vec();
                self.page_fault = Some(fault);
                rendered
            }
            (DecoderState::DecodingBacktrace, LineKind::Frame { ret, .. }) => {
                let resolution = self.resolver.resolve(*ret);
                let frame = ResolvedFrame::new(*ret, &resolution);
                let rendered = frame.format().to_vec();
                self.frames.push(frame);
                rendered
            }
            _ => vec![line.to_string()],
        };

        let next = self.state.next(self.mode, &kind);
        if next != self.state {
            info!("{:?} -> {:?}", self.state, next);
            self.state = next;
        } else if kind != LineKind::Other {
            debug!("{kind:?} in {:?}", self.state);
        }

        Ok(output)
    }

    #[must_use]
    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    #[must_use]
    pub fn state(&self) -> DecoderState {
        self.state
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == DecoderState::Done
    }

    #[must_use]
    pub fn regions(&self) -> &[CodeRegion] {
        self.resolver.regions()
    }

    /// Frames resolved so far, in transcript order
    #[must_use]
    pub fn frames(&self) -> &[ResolvedFrame] {
        &self.frames
    }

    #[must_use]
    pub fn page_fault(&self) -> Option<&PageFault> {
        self.page_fault.as_ref()
    }
}
