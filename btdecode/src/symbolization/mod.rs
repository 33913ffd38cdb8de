//! # Symbol Resolution and Address Translation
//!
//! This module turns raw addresses from a panic transcript (return addresses,
//! faulting instruction pointers) into `region+offset` and `function+offset`
//! labels.
//!
//! ## Regions and Offsets
//!
//! Every executable mapping printed by the kernel becomes a
//! [`CodeRegion`](crate::domain::CodeRegion):
//! the binary label plus its `[base, limit)` range. Programs and the kernel
//! are linked at fixed addresses, so their symbol tables hold absolute
//! addresses. Shared libraries are position independent and their symbols
//! are offsets from the load base:
//!
//! ```text
//! Library Offset  = Address - Base      (shared library)
//! Library Offset  = Address             (program, kernel)
//! Function Offset = Library Offset - Symbol Address
//! ```
//!
//! ## Resolution Flow
//!
//! ```text
//! 1. Transcript line:  /lib/libc.so  0x1000:0000 - 0x1002:0000 (128K) Ex
//!    -> register region, dump symbols of libc.so once, sort descending
//!
//! 2. Frame line:       0x0000:7ffc -> 0x1000:1234
//!    -> first region containing 0x10001234 is libc.so
//!    -> library offset 0x1234
//!    -> first symbol with address <= 0x1234 is memcpy @ 0x1200
//!    -> libc.so+0x1234, memcpy+0x34
//! ```
//!
//! Addresses outside every region resolve to the `Unknown` placeholder region,
//! and offsets below the lowest symbol of a region resolve to the `Unknown`
//! placeholder symbol. Decoding never stops because of one bad address.
//!
//! ## Module Structure
//!
//! - **`resolver`**: region registration, per-label symbol caching, lookup
//! - **`provider`**: the [`SymbolProvider`] seam and the `nm`-based provider
//! - **`elf_symbols`**: in-process provider using `object` and DWARF line
//!   info via `addr2line`

pub mod elf_symbols;
pub mod provider;
pub mod resolver;

pub use elf_symbols::ElfSymbols;
pub use provider::{locate_binary, parse_nm_output, NmSymbols, SymbolProvider};
pub use resolver::{resolve_address, AddressResolver, Resolution, UNKNOWN_REGION, UNKNOWN_SYMBOL};
