//! End-to-end packaging behavior: entry layout, classification, path
//! normalization, and failure propagation.

use anyhow::Result;
use ccpack::{GolangPackager, NodePackager, PackageError, Packager};
use flate2::read::GzDecoder;
use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::Path;

fn entry_names(archive: &[u8]) -> Vec<String> {
    let mut tar = tar::Archive::new(GzDecoder::new(archive));
    tar.entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn scenario_go_source_plus_couchdb_index() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let src = dir.path().join("cc");
    let meta = dir.path().join("meta");
    fs::create_dir_all(&src)?;
    fs::create_dir_all(meta.join("statedb/couchdb/indexes"))?;
    fs::write(src.join("chaincode.go"), "package main\n")?;
    fs::write(src.join("README.md"), "not packaged\n")?;
    fs::write(
        meta.join("statedb/couchdb/indexes/idx1.json"),
        r#"{"index":{}}"#,
    )?;

    let archive = GolangPackager::new().package_to_vec(&src, Some(&meta))?;

    let mut tar = tar::Archive::new(GzDecoder::new(&archive[..]));
    let mut names = Vec::new();
    for entry in tar.entries()? {
        let entry = entry?;
        names.push(entry.path()?.to_string_lossy().into_owned());
        assert_eq!(entry.header().mode()?, 0o644);
        assert_eq!(entry.header().mtime()?, 0);
        assert_eq!(entry.header().uid()?, 0);
        assert_eq!(entry.header().gid()?, 0);
    }
    assert_eq!(
        names,
        vec![
            "src/chaincode.go",
            "META-INF/statedb/couchdb/indexes/idx1.json"
        ]
    );
    Ok(())
}

#[test]
fn metadata_names_use_forward_slashes_and_meta_inf_prefix() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::create_dir_all(dir.path().join("a/b"))?;
    fs::write(dir.path().join("a/b/c.json"), "{}")?;

    let descriptors = ccpack::collect_metadata(dir.path())?;
    assert_eq!(descriptors.len(), 1);
    assert_eq!(descriptors[0].logical_name, "META-INF/a/b/c.json");
    Ok(())
}

#[test]
fn archive_entries_are_exactly_the_json_set_under_metadata_root() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let src = dir.path().join("cc");
    let meta = dir.path().join("meta");
    fs::create_dir_all(&src)?;
    fs::write(src.join("index.js"), "// cc\n")?;

    let json_files = ["one.json", "deep/two.json", "deep/deeper/three.json"];
    for f in json_files {
        let path = meta.join(f);
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(path, "{}")?;
    }
    // Sibling noise that must not appear.
    fs::write(meta.join("deep/schema.yaml"), "a: 1")?;
    fs::write(meta.join("notes.txt"), "n")?;

    let archive = NodePackager::new().package_to_vec(&src, Some(&meta))?;

    let metadata_entries: BTreeSet<String> = entry_names(&archive)
        .into_iter()
        .filter_map(|n| n.strip_prefix("META-INF/").map(str::to_string))
        .collect();
    let expected: BTreeSet<String> = json_files.iter().map(|f| f.to_string()).collect();
    assert_eq!(metadata_entries, expected);
    Ok(())
}

#[test]
fn source_entries_sort_before_metadata_and_by_name() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let src = dir.path().join("cc");
    let meta = dir.path().join("meta");
    fs::create_dir_all(&src)?;
    fs::create_dir_all(&meta)?;
    fs::write(src.join("zz.go"), "package zz\n")?;
    fs::write(src.join("aa.go"), "package aa\n")?;
    fs::write(meta.join("idx.json"), "{}")?;

    let archive = GolangPackager::new().package_to_vec(&src, Some(&meta))?;
    assert_eq!(
        entry_names(&archive),
        vec!["src/aa.go", "src/zz.go", "META-INF/idx.json"]
    );
    Ok(())
}

#[test]
fn packaging_without_metadata_root_is_source_only() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let src = dir.path().join("cc");
    fs::create_dir_all(&src)?;
    fs::write(src.join("main.go"), "package main\n")?;

    let archive = GolangPackager::new().package_to_vec(&src, None)?;
    assert_eq!(entry_names(&archive), vec!["src/main.go"]);
    Ok(())
}

#[test]
fn file_deleted_between_discovery_and_build_rejects_whole_package() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let src = dir.path().join("cc");
    fs::create_dir_all(&src)?;
    fs::write(src.join("main.go"), "package main\n")?;
    fs::write(src.join("gone.go"), "package gone\n")?;

    let packager = GolangPackager::new();
    let descriptors = packager.find_source(&src)?;
    assert_eq!(descriptors.len(), 2);

    fs::remove_file(src.join("gone.go"))?;

    let mut dest = Vec::new();
    let err = ccpack::build_tar_gz(&mut dest, &descriptors).unwrap_err();
    assert!(matches!(err, PackageError::Read { .. }), "got {err:?}");

    // The destination must not hold something that reads back as the
    // complete two-entry archive.
    let mut tar = tar::Archive::new(GzDecoder::new(&dest[..]));
    let mut readable = 0;
    if let Ok(entries) = tar.entries() {
        for entry in entries {
            let Ok(mut entry) = entry else { break };
            let mut content = Vec::new();
            if entry.read_to_end(&mut content).is_err() {
                break;
            }
            readable += 1;
        }
    }
    assert!(
        readable < 2,
        "aborted destination must not read back as a complete archive"
    );
    Ok(())
}

#[test]
fn missing_source_root_surfaces_traversal_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = GolangPackager::new()
        .package_to_vec(&dir.path().join("missing"), None)
        .unwrap_err();
    assert!(err.is_traversal(), "got {err:?}");
}

#[test]
fn colliding_logical_names_are_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("a.go"), "package a\n")?;
    fs::write(dir.path().join("b.go"), "package b\n")?;

    let descriptors = vec![
        ccpack::ArchiveDescriptor::new("src/cc.go", dir.path().join("a.go")),
        ccpack::ArchiveDescriptor::new("src/cc.go", dir.path().join("b.go")),
    ];
    let err = ccpack::build_tar_gz_vec(&descriptors).unwrap_err();
    assert!(matches!(err, PackageError::DuplicateEntry { .. }));
    Ok(())
}

#[test]
fn write_failure_surfaces_and_aborts() -> Result<()> {
    struct FailingWriter;
    impl std::io::Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("destination closed"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let dir = tempfile::tempdir()?;
    // Large enough that the gzip encoder must flush into the destination.
    let big = "x".repeat(1 << 20);
    fs::write(dir.path().join("big.go"), &big)?;
    let descriptors = vec![ccpack::ArchiveDescriptor::new(
        "src/big.go",
        dir.path().join("big.go"),
    )];
    let err = ccpack::build_tar_gz(FailingWriter, &descriptors).unwrap_err();
    assert!(
        matches!(
            err,
            PackageError::Write { .. } | PackageError::Compression { .. }
        ),
        "got {err:?}"
    );
    Ok(())
}

#[test]
fn concurrent_packaging_of_independent_trees() -> Result<()> {
    fn fixture(root: &Path) {
        fs::create_dir_all(root).unwrap();
        fs::write(root.join("main.go"), "package main\n").unwrap();
    }

    let a = tempfile::tempdir()?;
    let b = tempfile::tempdir()?;
    fixture(a.path());
    fixture(b.path());

    let (ra, rb) = std::thread::scope(|s| {
        let ha = s.spawn(|| GolangPackager::new().package_to_vec(a.path(), None));
        let hb = s.spawn(|| GolangPackager::new().package_to_vec(b.path(), None));
        (ha.join().unwrap(), hb.join().unwrap())
    });
    assert_eq!(ra.unwrap(), rb.unwrap(), "same logical inputs, same bytes");
    Ok(())
}
