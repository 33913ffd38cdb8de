mod common;

use btdecode::domain::{DecodeError, RawSymbol};
use btdecode::symbolization::{NmSymbols, SymbolProvider};

#[test]
fn test_nm_provider_reads_text_symbols() {
    let root = tempfile::tempdir().unwrap();
    let (bin_dir, nm) = common::fake_build_tree(root.path());

    let symbols = NmSymbols::new(nm, bin_dir)
        .lookup_symbols("/bin/prog")
        .unwrap();

    assert_eq!(
        symbols,
        vec![
            RawSymbol::new(0x1000, "_start", None),
            RawSymbol::new(0x1100, "bar", None),
            RawSymbol::new(0x1500, "foo", Some("prog.c:27".into())),
        ]
    );
}

#[test]
fn test_nm_failure_is_reported() {
    let root = tempfile::tempdir().unwrap();
    let (bin_dir, nm) = common::fake_build_tree(root.path());

    let err = NmSymbols::new(nm, bin_dir)
        .lookup_symbols("/bin/broken")
        .unwrap_err();
    match err {
        DecodeError::SymbolDumpFailed { stderr, .. } => {
            assert!(stderr.contains("no symbols"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_nm_tool() {
    let root = tempfile::tempdir().unwrap();
    let (bin_dir, _) = common::fake_build_tree(root.path());

    let err = NmSymbols::new(root.path().join("no-such-nm"), bin_dir)
        .lookup_symbols("/bin/prog")
        .unwrap_err();
    assert!(matches!(err, DecodeError::ToolSpawnFailed { .. }));
}

#[test]
fn test_missing_binary_skips_nm() {
    let root = tempfile::tempdir().unwrap();
    let (bin_dir, _) = common::fake_build_tree(root.path());

    let err = NmSymbols::new(root.path().join("no-such-nm"), bin_dir)
        .lookup_symbols("/bin/ghost")
        .unwrap_err();
    assert!(matches!(err, DecodeError::BinaryNotFound(_)));
}
