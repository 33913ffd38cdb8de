//! Shared helpers for integration tests

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Symbols the fake nm prints for `prog`
pub const PROG_NM_OUTPUT: &str = "\
00001000 T _start
00001100 t bar
00001500 T foo\tprog.c:27
00003000 D counter
         U printf
";

/// Create `bin/` with an empty `prog` plus a fake `nm` script.
///
/// The script prints [`PROG_NM_OUTPUT`] for `prog` and fails for anything else.
/// Returns `(bin_dir, nm_path)`.
pub fn fake_build_tree(root: &Path) -> (PathBuf, PathBuf) {
    let bin_dir = root.join("bin");
    fs::create_dir_all(&bin_dir).unwrap();
    fs::write(bin_dir.join("prog"), b"").unwrap();
    fs::write(bin_dir.join("broken"), b"").unwrap();

    let nm = root.join("fake-nm");
    let script = format!(
        "#!/bin/sh\n\
         case \"$4\" in\n\
         */prog) cat <<'SYMS'\n{PROG_NM_OUTPUT}SYMS\n;;\n\
         *) echo \"$4: no symbols\" >&2; exit 1;;\n\
         esac\n"
    );
    fs::write(&nm, script).unwrap();
    let mode = fs::Permissions::from_mode(0o755);
    fs::set_permissions(&nm, mode).unwrap();

    (bin_dir, nm)
}
