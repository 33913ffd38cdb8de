//! # btdecode - Panic Backtrace Decoder
//!
//! When a process or the kernel panics, the kernel prints the executable
//! regions of the faulting address space followed by raw stack frames. This
//! crate turns those raw addresses back into `binary+offset` and
//! `function+offset (file:line)` labels.
//!
//! ## Architecture Overview
//!
//! ```text
//!   stdin (pasted transcript)
//!        │ lines
//!        ▼
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   Session    │──▶│   Decoder    │──▶│  Formatter   │──▶ stdout
//! │ (tokio, ^C)  │   │ (state mach.)│   │              │
//! └──────────────┘   └──────┬───────┘   └──────────────┘
//!                           │ regions / addresses
//!                           ▼
//!                    ┌──────────────┐   ┌──────────────┐
//!                    │   Address    │──▶│    Symbol    │  nm or ELF/DWARF
//!                    │   Resolver   │   │   Provider   │
//!                    └──────────────┘   └──────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`transcript`]: line patterns, decoder state machine, output formatting
//! - [`symbolization`]: region lookup, symbol tables, symbol providers
//! - [`session`]: async read loop with interrupt handling
//! - [`terminal`]: scoped terminal echo suppression
//! - [`export`]: JSON report of resolved addresses
//! - [`config`], [`cli`], [`preflight`]: configuration and startup checks
//! - [`domain`]: core types (regions, symbols, addresses) and errors
//!
//! ## Typical Usage
//!
//! ```bash
//! # Paste a user-mode crash dump, finish with Ctrl+D
//! btdecode
//!
//! # Decode a saved kernel panic against a debug x86_64 build
//! ESC_TARGET=x86_64 ESC_BUILD=debug btdecode --mode kernel < panic.txt
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod export;
pub mod preflight;
pub mod session;
pub mod symbolization;
pub mod terminal;
pub mod transcript;
