use crate::error::{FiasError, Result};
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};

/// Magic number: ASCII "FIAS"
pub const MAGIC_NUMBER: [u8; 4] = *b"FIAS";

/// Header size in bytes (magic + entry count + data offset)
pub const HEADER_SIZE: u64 = 16;

/// Fixed part of an entry record: path length, offset and size fields
pub const RECORD_FIXED_SIZE: u64 = 8 + 8 + 8;

/// File header at the beginning of the archive
///
/// All integers are little-endian:
/// - Magic: "FIAS" (4 bytes)
/// - Entry count: uint32 (4 bytes)
/// - Data offset: uint64 (8 bytes), absolute start of the data region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub entry_count: u32,
    pub data_offset: u64,
}

impl FileHeader {
    pub fn new() -> Self {
        Self {
            entry_count: 0,
            data_offset: HEADER_SIZE,
        }
    }

    /// Write header to a writer
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<usize> {
        writer.write_all(&MAGIC_NUMBER)?;
        writer.write_all(&self.entry_count.to_le_bytes())?;
        writer.write_all(&self.data_offset.to_le_bytes())?;
        Ok(HEADER_SIZE as usize)
    }

    /// Read header from a reader
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;

        if magic != MAGIC_NUMBER {
            return Err(FiasError::InvalidMagic);
        }

        let entry_count = read_u32(&mut reader)?;
        let data_offset = read_u64(&mut reader)?;

        Ok(Self {
            entry_count,
            data_offset,
        })
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Directory entry: one packed member's path, offset and size
///
/// `offset` is relative to the start of the data region, not to the
/// start of the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInfo {
    pub path: String,
    pub offset: u64,
    pub size: u64,
}

impl EntryInfo {
    pub fn new(path: impl Into<String>, offset: u64, size: u64) -> Self {
        Self {
            path: path.into(),
            offset,
            size,
        }
    }

    /// Serialized length of this entry's record
    pub fn record_size(&self) -> u64 {
        RECORD_FIXED_SIZE + self.path.len() as u64
    }

    /// End of this entry's data, relative to the data region
    pub fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.size)
    }

    /// Write entry record to a writer
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<usize> {
        let path_bytes = self.path.as_bytes();
        writer.write_all(&(path_bytes.len() as u64).to_le_bytes())?;
        writer.write_all(path_bytes)?;
        writer.write_all(&self.offset.to_le_bytes())?;
        writer.write_all(&self.size.to_le_bytes())?;
        Ok(self.record_size() as usize)
    }

    /// Read entry record from a reader
    ///
    /// `max_path_length` bounds the allocation for the path before it is
    /// read, so a corrupt length field cannot exhaust memory.
    pub fn read_from<R: Read>(mut reader: R, max_path_length: u64) -> Result<Self> {
        let path_len = read_u64(&mut reader)?;
        if path_len == 0 {
            return Err(FiasError::InvalidFormat("Empty entry path".to_string()));
        }
        if path_len > max_path_length {
            return Err(FiasError::InvalidFormat(format!(
                "Entry path length {} exceeds limit {}",
                path_len, max_path_length
            )));
        }

        let mut path_buf = Vec::with_capacity(path_len as usize);
        (&mut reader).take(path_len).read_to_end(&mut path_buf)?;
        if path_buf.len() as u64 != path_len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "archive ended inside an entry path",
            )
            .into());
        }

        let path = String::from_utf8(path_buf)
            .map_err(|e| FiasError::InvalidFormat(format!("Invalid UTF-8 in path: {}", e)))?;

        let offset = read_u64(&mut reader)?;
        let size = read_u64(&mut reader)?;

        Ok(Self { path, offset, size })
    }
}

/// Data region start for a directory serialized in the given order
pub fn data_offset_for<'a, I>(entries: I) -> u64
where
    I: IntoIterator<Item = &'a EntryInfo>,
{
    entries
        .into_iter()
        .fold(HEADER_SIZE, |acc, entry| acc + entry.record_size())
}

// Helper functions for reading primitive types
fn read_u32<R: Read>(mut reader: R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64<R: Read>(mut reader: R) -> Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}
