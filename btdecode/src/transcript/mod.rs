//! Transcript scanning and decoding
//!
//! - `patterns`: line classification (regions, frames, page faults, markers)
//! - `state`: the `AwaitRegions -> AwaitPageFault -> DecodingBacktrace -> Done` machine
//! - `formatter`: rendering of resolved frames and page faults
//! - `decoder`: ties the above to an [`AddressResolver`](crate::symbolization::AddressResolver)

pub mod decoder;
pub mod formatter;
pub mod patterns;
pub mod state;

pub use decoder::{Decoder, KernelImage};
pub use formatter::{PageFault, ResolvedFrame};
pub use patterns::{classify, LineKind, StackKind};
pub use state::{DecodeMode, DecoderState};
