#![no_main]

use fipack::{ArchiveReader, Limits};
use libfuzzer_sys::fuzz_target;
use std::io::{Cursor, Read};

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_entries: 4096,
        max_path_length: 1024,
    };

    // Try to open archive - should never panic
    let mut reader = match ArchiveReader::from_reader_with_limits(Cursor::new(data), limits) {
        Ok(r) => r,
        Err(_) => return, // Expected for invalid data
    };

    let files = reader.list();

    // Every accepted entry lies inside the input
    for file in &files {
        if reader.find(file) {
            let mut buf = vec![0u8; reader.size() as usize];
            let read = reader.read(&mut buf).expect("validated entry must be readable");
            assert_eq!(read as u64, reader.size());
        }

        let mut handle = reader.open_entry(file).expect("listed entry must open");
        let mut sink = Vec::new();
        handle.read_to_end(&mut sink).expect("validated entry must be readable");
    }

    let _ = reader.contains("");
    let _ = reader.contains("../../../etc/passwd");
});
