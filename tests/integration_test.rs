//! Integration tests for the fipack library

use fipack::{ArchiveBuilder, ArchiveReader, FiasError, HEADER_SIZE};
use std::fs;
use tempfile::{tempdir, NamedTempFile};

/// Helper: write files into a directory and return their paths as strings
fn write_sources(dir: &std::path::Path, files: &[(&str, &str)]) -> Vec<String> {
    files
        .iter()
        .map(|(name, data)| {
            let path = dir.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, data.as_bytes()).unwrap();
            path.to_str().unwrap().to_string()
        })
        .collect()
}

#[test]
fn test_basic_archive_roundtrip() {
    let temp_file = NamedTempFile::new().unwrap();
    let archive_path = temp_file.path();

    let files: Vec<(String, Vec<u8>)> = vec![
        ("test.txt".to_string(), b"Hello, World!".to_vec()),
        ("data/nested.txt".to_string(), b"Nested content".to_vec()),
        ("data/blob.bin".to_string(), (0..=255u8).cycle().take(5000).collect()),
    ];

    // Create archive
    {
        let mut builder = ArchiveBuilder::new();
        for (path, data) in &files {
            builder.add_bytes(path, data).unwrap();
        }
        let written = builder.write(archive_path).unwrap();
        assert_eq!(written, fs::metadata(archive_path).unwrap().len());
    }

    // Read archive
    {
        let mut reader = ArchiveReader::open(archive_path).unwrap();
        assert_eq!(reader.entry_count(), 3);

        for (path, data) in &files {
            assert!(reader.find(path), "{} should be found", path);
            assert_eq!(reader.path(), path.as_str());
            assert_eq!(reader.size(), data.len() as u64);

            let mut buf = vec![0u8; reader.size() as usize];
            assert_eq!(reader.read(&mut buf).unwrap(), data.len());
            assert_eq!(&buf, data);
        }

        assert_eq!(reader.read_file("test.txt").unwrap(), b"Hello, World!");
    }
}

#[test]
fn test_add_from_disk_uses_source_path() {
    let dir = tempdir().unwrap();
    let sources = write_sources(
        dir.path(),
        &[("a.txt", "alpha"), ("sub/b.txt", "beta"), ("zero.dat", "")],
    );

    let mut builder = ArchiveBuilder::new();
    for source in &sources {
        builder.add(source).unwrap();
    }
    assert_eq!(builder.list(), sources);

    let archive = dir.path().join("out.fas");
    builder.write(&archive).unwrap();

    let mut reader = ArchiveReader::open(&archive).unwrap();
    assert_eq!(reader.list(), sources);
    assert_eq!(reader.read_file(&sources[1]).unwrap(), b"beta");

    // Zero-byte member reads successfully
    assert!(reader.find(&sources[2]));
    assert_eq!(reader.size(), 0);
    let mut empty: [u8; 0] = [];
    assert_eq!(reader.read(&mut empty).unwrap(), 0);
}

#[test]
#[cfg(unix)]
fn test_backslash_in_source_path_kept_verbatim() {
    // A backslash is an ordinary filename byte on Unix
    let dir = tempdir().unwrap();
    let sources = write_sources(dir.path(), &[("we\\ird", "odd name")]);

    let mut builder = ArchiveBuilder::new();
    builder.add(&sources[0]).unwrap();
    let archive = dir.path().join("out.fas");
    builder.write(&archive).unwrap();

    let mut reader = ArchiveReader::open(&archive).unwrap();
    assert_eq!(reader.list(), sources);
    assert!(reader.find(&sources[0]));
    assert_eq!(reader.path(), sources[0].as_str());
    assert!(reader.path().ends_with("we\\ird"));
    assert_eq!(reader.read_file(&sources[0]).unwrap(), b"odd name");
}

#[test]
fn test_order_preserved() {
    let temp_file = NamedTempFile::new().unwrap();
    let names: Vec<String> = (0..50).rev().map(|i| format!("z{:02}/file.txt", i)).collect();

    let mut builder = ArchiveBuilder::new();
    for name in &names {
        builder.add_bytes(name, name.as_bytes()).unwrap();
    }
    builder.write(temp_file.path()).unwrap();

    let reader = ArchiveReader::open(temp_file.path()).unwrap();
    assert_eq!(reader.list(), names);
}

#[test]
fn test_duplicate_path_last_write_wins() {
    let temp_file = NamedTempFile::new().unwrap();

    let mut builder = ArchiveBuilder::new();
    builder.add_bytes("config.ini", b"old").unwrap();
    builder.add_bytes("other", b"x").unwrap();
    builder.add_bytes("config.ini", b"newer").unwrap();
    builder.write(temp_file.path()).unwrap();

    let mut reader = ArchiveReader::open(temp_file.path()).unwrap();

    // Both records are serialized
    assert_eq!(reader.entry_count(), 3);
    assert_eq!(reader.list(), vec!["config.ini", "other", "config.ini"]);

    // Lookup resolves to the last one
    assert!(reader.find("config.ini"));
    assert_eq!(reader.offset(), 4);
    assert_eq!(reader.size(), 5);
    assert_eq!(reader.read_file("config.ini").unwrap(), b"newer");
}

#[test]
fn test_empty_archive() {
    let temp_file = NamedTempFile::new().unwrap();

    let builder = ArchiveBuilder::new();
    let written = builder.write(temp_file.path()).unwrap();
    assert_eq!(written, HEADER_SIZE);

    let mut reader = ArchiveReader::open(temp_file.path()).unwrap();
    assert_eq!(reader.header().entry_count, 0);
    assert_eq!(reader.header().data_offset, HEADER_SIZE);
    assert!(reader.list().is_empty());
    assert!(!reader.find("anything"));
    assert!(!reader.find(""));
}

#[test]
fn test_missing_member_lookup() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut builder = ArchiveBuilder::new();
    builder.add_bytes("present.txt", b"here").unwrap();
    builder.write(temp_file.path()).unwrap();

    let mut reader = ArchiveReader::open(temp_file.path()).unwrap();
    assert!(!reader.find("nonexistent"));
    assert_eq!(reader.size(), 0);
    assert_eq!(reader.offset(), 0);
    assert_eq!(reader.path(), "");

    match reader.read_file("nonexistent") {
        Err(FiasError::FileNotFound(path)) => assert_eq!(path, "nonexistent"),
        other => panic!("Expected FileNotFound, got: {:?}", other),
    }
}

#[test]
fn test_offsets_relative_to_data_region() {
    let temp_file = NamedTempFile::new().unwrap();
    let sizes = [3usize, 0, 17, 1, 250];

    let mut builder = ArchiveBuilder::new();
    for (i, size) in sizes.iter().enumerate() {
        builder
            .add_bytes(&format!("m{}", i), &vec![i as u8; *size])
            .unwrap();
    }
    builder.write(temp_file.path()).unwrap();

    let raw = fs::read(temp_file.path()).unwrap();
    let mut reader = ArchiveReader::open(temp_file.path()).unwrap();
    let data_offset = reader.header().data_offset;
    assert_eq!(data_offset, builder.data_offset());

    let mut expected_offset = 0u64;
    for (i, size) in sizes.iter().enumerate() {
        let name = format!("m{}", i);
        assert!(reader.find(&name));
        assert_eq!(reader.offset(), expected_offset);

        // Absolute position holds the member's bytes
        let start = (data_offset + expected_offset) as usize;
        assert!(raw[start..start + size].iter().all(|&b| b == i as u8));

        expected_offset += *size as u64;
    }
    assert_eq!(raw.len() as u64, data_offset + expected_offset);
}

#[test]
fn test_builder_reusable_after_write() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.fas");
    let second = dir.path().join("second.fas");

    let mut builder = ArchiveBuilder::new();
    builder.add_bytes("a", b"1").unwrap();
    builder.write(&first).unwrap();
    builder.add_bytes("b", b"22").unwrap();
    builder.write(&second).unwrap();

    assert_eq!(ArchiveReader::open(&first).unwrap().list(), vec!["a"]);
    let mut reader = ArchiveReader::open(&second).unwrap();
    assert_eq!(reader.list(), vec!["a", "b"]);
    assert_eq!(reader.read_file("b").unwrap(), b"22");
}

#[test]
fn test_deterministic_output() {
    let dir = tempdir().unwrap();
    let mut builder = ArchiveBuilder::new();
    builder.add_bytes("x/y.txt", b"same bytes").unwrap();
    builder.add_bytes("z", b"").unwrap();

    builder.write(dir.path().join("1.fas")).unwrap();
    builder.write(dir.path().join("2.fas")).unwrap();

    assert_eq!(
        fs::read(dir.path().join("1.fas")).unwrap(),
        fs::read(dir.path().join("2.fas")).unwrap()
    );
}

#[test]
fn test_write_to_unwritable_destination() {
    let dir = tempdir().unwrap();
    let builder = ArchiveBuilder::new();
    let result = builder.write(dir.path().join("missing/dir/out.fas"));
    assert!(matches!(result, Err(FiasError::Io(_))));
}

#[test]
fn test_unreadable_source_leaves_builder_unchanged() {
    let dir = tempdir().unwrap();
    let mut builder = ArchiveBuilder::new();
    builder.add_bytes("kept", b"data").unwrap();

    let result = builder.add(dir.path().join("gone.txt"));
    assert!(matches!(result, Err(FiasError::SourceUnreadable { .. })));
    assert_eq!(builder.list(), vec!["kept"]);
    assert_eq!(builder.data_len(), 4);
}

#[test]
fn test_open_missing_archive() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.fas");

    assert!(matches!(ArchiveReader::open(&path), Err(FiasError::Io(_))));

    let mut reader = ArchiveReader::open_or_empty(&path);
    assert_eq!(reader.entry_count(), 0);
    assert!(!reader.find("anything"));
}

#[test]
fn test_open_entry_handle_is_independent_of_selection() {
    use std::io::Read;

    let temp_file = NamedTempFile::new().unwrap();
    let mut builder = ArchiveBuilder::new();
    builder.add_bytes("a", b"first").unwrap();
    builder.add_bytes("b", b"second").unwrap();
    builder.write(temp_file.path()).unwrap();

    let mut reader = ArchiveReader::open(temp_file.path()).unwrap();
    assert!(reader.find("a"));

    let mut data = Vec::new();
    reader.open_entry("b").unwrap().read_to_end(&mut data).unwrap();
    assert_eq!(data, b"second");

    // Selection still names "a"; find again to reposition the cursor
    assert_eq!(reader.path(), "a");
    assert!(reader.find("a"));
    let mut buf = [0u8; 5];
    reader.read(&mut buf).unwrap();
    assert_eq!(&buf, b"first");
}
