//! Line classification for panic transcripts
//!
//! Recognized line families:
//!
//! ```text
//! Region:     \t/bin/ls                  0x0000:1000 - 0x0002:3fff (  140K) Sh Ex
//! Frame:      \t0x0000:7ffd -> 0x0000:1234 (main)
//! Page fault: Page fault for address 0x00000000 @ 0xc0102345 on CPU 0, process 3
//! Snip:       --- snip ---
//! Header:     User-Stacktrace:
//! ```
//!
//! Addresses may use the `HEX:HEX` encoding; see [`parse_address`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::parse_address;

/// Address token: optional `0x`, hex digits, optional `:`-separated parts
const ADDR: &str = r"(?:0[xX])?[0-9a-fA-F]+(?::[0-9a-fA-F]+)*";

/// Separator between region base and limit: `-` or `..`
const SEP: &str = r"\s*(?:-|\.\.)\s*";

/// Region size in parentheses, e.g. `(   16K)`
const SIZE: &str = r"\(\s*\d+\s*[KMG]?\)";

static REGION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^\s*(?P<label>\S+)\s+(?P<base>{ADDR}){SEP}(?P<limit>{ADDR})\s+{SIZE}\s*(?P<flags>.*)$"
    ))
    .expect("region pattern is valid")
});

static FRAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^\s*(?P<frame>{ADDR})\s*->\s*(?P<ret>{ADDR})(?:\s.*)?$"))
        .expect("frame pattern is valid")
});

static PAGEFAULT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^\s*page\s*fault\s+for\s+(?:address\s*=?\s*)?(?P<addr>{ADDR})\s*@\s*(?P<ip>{ADDR})\b"
    ))
    .expect("page fault pattern is valid")
});

static SNIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*-+\s*snip\s*-+\s*$")
        .expect("snip pattern is valid")
});

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<which>User|Kernel)-Stacktrace:")
        .expect("header pattern is valid")
});

/// Which stack a stacktrace section header introduces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKind {
    User,
    Kernel,
}

/// Classification of one transcript line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Executable mapping of a binary
    Region {
        label: String,
        base: u64,
        limit: u64,
    },
    /// Stack frame as `frame -> return` address pair
    Frame { frame: u64, ret: u64 },
    /// Faulting data address and instruction pointer
    PageFault { address: u64, ip: u64 },
    /// Literal `--- snip ---` marker
    Snip,
    /// `User-Stacktrace:` / `Kernel-Stacktrace:`
    StacktraceHeader(StackKind),
    /// Anything else, echoed unchanged
    Other,
}

/// Classify a transcript line
#[must_use]
pub fn classify(line: &str) -> LineKind {
    if SNIP_RE.is_match(line) {
        return LineKind::Snip;
    }

    if let Some(caps) = HEADER_RE.captures(line) {
        let kind = if &caps["which"] == "User" {
            StackKind::User
        } else {
            StackKind::Kernel
        };
        return LineKind::StacktraceHeader(kind);
    }

    if let Some(caps) = PAGEFAULT_RE.captures(line) {
        let address = parse_address(&caps["addr"]);
        let ip = parse_address(&caps["ip"]);
        if let (Ok(address), Ok(ip)) = (address, ip) {
            return LineKind::PageFault { address, ip };
        }
        return LineKind::Other;
    }

    if let Some(caps) = FRAME_RE.captures(line) {
        let frame = parse_address(&caps["frame"]);
        let ret = parse_address(&caps["ret"]);
        if let (Ok(frame), Ok(ret)) = (frame, ret) {
            return LineKind::Frame { frame, ret };
        }
        return LineKind::Other;
    }

    if let Some(caps) = REGION_RE.captures(line) {
        if !is_executable(&caps["flags"]) {
            return LineKind::Other;
        }
        let base = parse_address(&caps["base"]);
        let limit = parse_address(&caps["limit"]);
        if let (Ok(base), Ok(limit)) = (base, limit) {
            return LineKind::Region {
                label: caps["label"].to_string(),
                base,
                limit,
            };
        }
    }

    LineKind::Other
}

/// Flags field carries `Ex` (short region dump) or `X` as a separate token
fn is_executable(flags: &str) -> bool {
    flags
        .split_whitespace()
        .any(|flag| flag == "Ex" || flag == "X")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_line_short_dump() {
        let line = "\t/bin/ls                  0x0000:1000 - 0x0002:3fff (  140K) Sh Ex ";
        assert_eq!(
            classify(line),
            LineKind::Region {
                label: "/bin/ls".into(),
                base: 0x1000,
                limit: 0x2_3fff,
            }
        );
    }

    #[test]
    fn test_region_line_dotted_range() {
        let line = "  /lib/libc.so 10000000..10040000 (256K) X";
        assert_eq!(
            classify(line),
            LineKind::Region {
                label: "/lib/libc.so".into(),
                base: 0x1000_0000,
                limit: 0x1004_0000,
            }
        );
    }

    #[test]
    fn test_region_line_without_exec_flag() {
        let line = "\tstack                    0xbfff:0000 - 0xbfff:ffff (   64K) Gr Wr St ";
        assert_eq!(classify(line), LineKind::Other);
    }

    #[test]
    fn test_frame_line() {
        assert_eq!(
            classify("\t0x0000:7ffd -> 0x0000:1234 (main)"),
            LineKind::Frame {
                frame: 0x7ffd,
                ret: 0x1234,
            }
        );
        assert_eq!(
            classify("c0103000 -> c0104567"),
            LineKind::Frame {
                frame: 0xc010_3000,
                ret: 0xc010_4567,
            }
        );
    }

    #[test]
    fn test_frame_line_rejects_trailing_garbage() {
        assert_eq!(classify("1234 -> 5678xyz"), LineKind::Other);
    }

    #[test]
    fn test_page_fault_variants() {
        assert_eq!(
            classify("Page fault for address 0x00000000 @ 0xc0102345 on CPU 0, process 3"),
            LineKind::PageFault {
                address: 0,
                ip: 0xc010_2345,
            }
        );
        assert_eq!(
            classify("Pagefault for 0x0000:0010 @ 0x0000:1500"),
            LineKind::PageFault {
                address: 0x10,
                ip: 0x1500,
            }
        );
        assert_eq!(
            classify("Page fault for address=0x00000010 @ 0xc0100020, process 3"),
            LineKind::PageFault {
                address: 0x10,
                ip: 0xc010_0020,
            }
        );
    }

    #[test]
    fn test_markers() {
        assert_eq!(classify("--- snip ---"), LineKind::Snip);
        assert_eq!(classify("  -----SNIP----- "), LineKind::Snip);
        assert_eq!(
            classify("User-Stacktrace:"),
            LineKind::StacktraceHeader(StackKind::User)
        );
        assert_eq!(
            classify("\tKernel-Stacktrace:"),
            LineKind::StacktraceHeader(StackKind::Kernel)
        );
    }

    #[test]
    fn test_other_lines() {
        assert_eq!(classify(""), LineKind::Other);
        assert_eq!(classify("Process 3 (/bin/ls) crashed"), LineKind::Other);
        assert_eq!(classify("snip"), LineKind::Other);
    }
}
