use addr2line::Context;
use gimli::{EndianRcSlice, RunTimeEndian};
use log::debug;
use object::{Object, ObjectSection, ObjectSymbol, SymbolKind};
use rustc_demangle::demangle;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use super::provider::{locate_binary, SymbolProvider};
use crate::domain::{DecodeError, RawSymbol};

type DwarfReader = EndianRcSlice<RunTimeEndian>;

/// Symbol provider that reads ELF symbol tables in-process
///
/// Text symbols come from `.symtab`. When the binary carries DWARF line
/// tables, each symbol's entry address is mapped to `file:line`.
#[derive(Debug, Clone)]
pub struct ElfSymbols {
    bin_dir: PathBuf,
}

impl ElfSymbols {
    pub fn new(bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
        }
    }
}

impl SymbolProvider for ElfSymbols {
    fn lookup_symbols(&self, binary: &str) -> Result<Vec<RawSymbol>, DecodeError> {
        let path = locate_binary(&self.bin_dir, binary)?;
        let data = fs::read(&path)?;
        let parse_err = |reason: String| DecodeError::ObjectParseFailed {
            binary: path.display().to_string(),
            reason,
        };

        let obj = object::File::parse(&*data)
            .map_err(|e| parse_err(e.to_string()))?;
        let lines = load_line_context(&obj)
            .map_err(|e| parse_err(e.to_string()))?;

        let symbols: Vec<RawSymbol> = obj
            .symbols()
            .filter(|sym| sym.kind() == SymbolKind::Text && sym.is_definition())
            .filter_map(|sym| {
                let name = sym.name().ok().filter(|n| !n.is_empty())?;
                let address = sym.address();
                let source_info = lines.as_ref().and_then(|ctx| source_location(ctx, address));
                Some(RawSymbol::new(address, format!("{:#}", demangle(name)), source_info))
            })
            .collect();

        debug!("{} text symbols in {}", symbols.len(), path.display());
        Ok(symbols)
    }
}

/// Build an addr2line context, or `None` if the binary has no DWARF line info
fn load_line_context(obj: &object::File<'_>) -> Result<Option<Context<DwarfReader>>, gimli::Error> {
    if obj.section_by_name(".debug_line").is_none() {
        return Ok(None);
    }

    let endian = if obj.is_little_endian() {
        RunTimeEndian::Little
    } else {
        RunTimeEndian::Big
    };

    let load_section = |id: gimli::SectionId| -> Result<DwarfReader, gimli::Error> {
        let data = obj
            .section_by_name(id.name())
            .and_then(|section| section.uncompressed_data().ok())
            .unwrap_or(std::borrow::Cow::Borrowed(&[][..]));
        Ok(EndianRcSlice::new(Rc::from(&*data), endian))
    };

    let dwarf = gimli::Dwarf::load(&load_section)?;
    Context::from_dwarf(dwarf).map(Some)
}

fn source_location(ctx: &Context<DwarfReader>, addr: u64) -> Option<String> {
    let loc = ctx.find_location(addr).ok()??;
    let file = loc.file?;
    Some(match loc.line {
        Some(line) => format!("{file}:{line}"),
        None => file.to_string(),
    })
}
