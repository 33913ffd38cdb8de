//! Decoder state machine
//!
//! ```text
//! user:    AwaitRegions --snip/header--> DecodingBacktrace --snip--> Done
//!
//! kernel:  AwaitRegions --snip--> AwaitPageFault
//!          AwaitPageFault --pagefault/header--> DecodingBacktrace
//!          AwaitRegions --header--> DecodingBacktrace
//!          DecodingBacktrace --snip--> Done
//! ```
//!
//! Lines that do not trigger a transition leave the state unchanged.

use clap::ValueEnum;
use serde::Serialize;

use super::patterns::LineKind;

/// Transcript flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Region dump followed by a user-mode backtrace
    User,
    /// Kernel panic: regions, page fault, kernel and user stacktraces
    Kernel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// Collecting executable regions
    AwaitRegions,
    /// Regions done, waiting for the page fault diagnostic (kernel mode)
    AwaitPageFault,
    /// Resolving frame lines
    DecodingBacktrace,
    /// Final marker seen, everything else is echoed
    Done,
}

impl DecoderState {
    /// Successor state after a line of the given kind
    #[must_use]
    pub fn next(self, mode: DecodeMode, kind: &LineKind) -> Self {
        match (self, kind) {
            (Self::AwaitRegions, LineKind::Snip) => match mode {
                DecodeMode::User => Self::DecodingBacktrace,
                DecodeMode::Kernel => Self::AwaitPageFault,
            },
            (
                Self::AwaitRegions | Self::AwaitPageFault,
                LineKind::StacktraceHeader(_),
            )
            | (Self::AwaitPageFault, LineKind::PageFault { .. }) => Self::DecodingBacktrace,
            (Self::DecodingBacktrace, LineKind::Snip) => Self::Done,
            (state, _) => state,
        }
    }
}
