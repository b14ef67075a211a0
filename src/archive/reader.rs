use crate::archive::directory::Directory;
use crate::archive::format::{EntryInfo, FileHeader, HEADER_SIZE, RECORD_FIXED_SIZE};
use crate::config::Limits;
use crate::error::{FiasError, Result};
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Archive reader with O(1) member lookup
///
/// Two ways to get at member data:
/// - the selection API: [`find`](Self::find) selects a member and positions
///   the cursor, then [`read`](Self::read), [`size`](Self::size),
///   [`offset`](Self::offset) and [`path`](Self::path) act on it;
/// - the handle API: [`open_entry`](Self::open_entry) and
///   [`read_file`](Self::read_file) carry their own entry.
///
/// Both share one file cursor, so a `read` must directly follow the `find`
/// that selected its member.
pub struct ArchiveReader<R = File> {
    inner: Option<R>,
    header: FileHeader,
    directory: Directory,
    selection: EntryInfo,
}

impl ArchiveReader<File> {
    /// Open an archive file for reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_limits(path, Limits::default())
    }

    /// Open an archive file with custom parser limits
    pub fn open_with_limits<P: AsRef<Path>>(path: P, limits: Limits) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = Self::from_reader_with_limits(file, limits)?;

        tracing::debug!(
            path = %path.display(),
            entries = reader.entry_count(),
            data_offset = reader.header.data_offset,
            "Opened archive"
        );
        Ok(reader)
    }

    /// Open an archive, treating any failure as an archive without entries
    ///
    /// Callers cannot tell a missing or corrupt file from a valid empty
    /// archive this way; use [`open`](Self::open) when that matters.
    pub fn open_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(reader) => reader,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot open archive, continuing with no entries");
                Self::empty()
            }
        }
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Parse an archive from any seekable source
    pub fn from_reader(inner: R) -> Result<Self> {
        Self::from_reader_with_limits(inner, Limits::default())
    }

    pub fn from_reader_with_limits(mut inner: R, limits: Limits) -> Result<Self> {
        let archive_len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;

        let (header, directory) = {
            let mut buffered = BufReader::new(&mut inner);
            Self::read_directory(&mut buffered, archive_len, limits)?
        };

        Ok(Self {
            inner: Some(inner),
            header,
            directory,
            selection: EntryInfo::default(),
        })
    }

    /// Read and bound-check the header and every entry record
    fn read_directory<B: Read>(
        reader: &mut B,
        archive_len: u64,
        limits: Limits,
    ) -> Result<(FileHeader, Directory)> {
        let header = FileHeader::read_from(&mut *reader)?;

        if header.entry_count > limits.max_entries {
            return Err(FiasError::LimitExceeded(format!(
                "archive declares {} entries (max {})",
                header.entry_count, limits.max_entries
            )));
        }

        if header.data_offset < HEADER_SIZE || header.data_offset > archive_len {
            return Err(FiasError::InvalidFormat(format!(
                "Data offset {} outside archive of {} bytes",
                header.data_offset, archive_len
            )));
        }

        // Every record holds at least its fixed fields and one path byte
        let table_len = header.data_offset - HEADER_SIZE;
        let min_table_len = u64::from(header.entry_count) * (RECORD_FIXED_SIZE + 1);
        if min_table_len > table_len {
            return Err(FiasError::InvalidFormat(format!(
                "{} entries cannot fit in a {} byte entry table",
                header.entry_count, table_len
            )));
        }

        let data_len = archive_len - header.data_offset;
        let mut directory = Directory::with_capacity(header.entry_count as usize);
        let mut position = HEADER_SIZE;

        for index in 0..header.entry_count {
            let room = (header.data_offset - position).saturating_sub(RECORD_FIXED_SIZE);
            let max_path = room.min(limits.max_path_length);

            let entry = EntryInfo::read_from(&mut *reader, max_path).map_err(|e| match e {
                FiasError::InvalidFormat(msg) => {
                    FiasError::InvalidFormat(format!("Entry {}: {}", index, msg))
                }
                other => other,
            })?;
            position += entry.record_size();

            match entry.end() {
                Some(end) if end <= data_len => {}
                _ => {
                    return Err(FiasError::InvalidFormat(format!(
                        "Entry {} ({}) spans {}+{} past data region of {} bytes",
                        index, entry.path, entry.offset, entry.size, data_len
                    )));
                }
            }

            directory.push(entry);
        }

        if position != header.data_offset {
            return Err(FiasError::InvalidFormat(format!(
                "Entry table ends at {} but data region starts at {}",
                position, header.data_offset
            )));
        }

        Ok((header, directory))
    }

    /// Select a member and move the cursor to its first byte
    ///
    /// Returns `false` and clears the selection when the path is unknown.
    pub fn find(&mut self, path: &str) -> bool {
        self.selection = EntryInfo::default();

        let Some(entry) = self.directory.get(path).cloned() else {
            tracing::trace!(path, "Lookup miss");
            return false;
        };

        let position = self.header.data_offset + entry.offset;
        match self.seek_to(position) {
            Ok(()) => {
                tracing::trace!(path, position, "Selected entry");
                self.selection = entry;
                true
            }
            Err(e) => {
                tracing::warn!(path, position, error = %e, "Seek to entry failed");
                false
            }
        }
    }

    /// Read the selected member into `buf`, returning the bytes read
    ///
    /// Reads from the current cursor without seeking, so it is only
    /// meaningful once per successful [`find`](Self::find). With no member
    /// selected nothing is read.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let size = self.selection.size;
        if size == 0 {
            return Ok(0);
        }

        if (buf.len() as u64) < size {
            return Err(FiasError::BufferTooSmall {
                needed: size,
                got: buf.len(),
            });
        }

        let size = size as usize;
        self.handle()?.read_exact(&mut buf[..size])?;
        Ok(size)
    }

    /// Open a bounded reader over one member's bytes
    ///
    /// Leaves the selection untouched but moves the shared cursor.
    pub fn open_entry(&mut self, path: &str) -> Result<EntryReader<'_, R>> {
        let info = self
            .directory
            .get(path)
            .cloned()
            .ok_or_else(|| FiasError::FileNotFound(path.to_string()))?;

        self.seek_to(self.header.data_offset + info.offset)?;
        let size = info.size;
        let inner = self.handle()?;

        Ok(EntryReader {
            info,
            data: inner.take(size),
        })
    }

    /// Read a whole member into memory
    pub fn read_file(&mut self, path: &str) -> Result<Vec<u8>> {
        let mut entry = self.open_entry(path)?;
        let mut data = Vec::with_capacity(entry.info().size as usize);
        entry.read_to_end(&mut data)?;

        if data.len() as u64 != entry.info().size {
            return Err(FiasError::InvalidFormat(format!(
                "Entry {} truncated: expected {} bytes, got {}",
                path,
                entry.info().size,
                data.len()
            )));
        }
        Ok(data)
    }

    fn seek_to(&mut self, position: u64) -> Result<()> {
        self.handle()?.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    fn handle(&mut self) -> Result<&mut R> {
        self.inner
            .as_mut()
            .ok_or_else(|| FiasError::Io(io::Error::new(io::ErrorKind::NotFound, "archive has no backing file")))
    }
}

impl<R> ArchiveReader<R> {
    fn empty() -> Self {
        Self {
            inner: None,
            header: FileHeader::new(),
            directory: Directory::new(),
            selection: EntryInfo::default(),
        }
    }

    /// Size of the selected member, 0 when nothing is selected
    pub fn size(&self) -> u64 {
        self.selection.size
    }

    /// Data-region offset of the selected member, 0 when nothing is selected
    pub fn offset(&self) -> u64 {
        self.selection.offset
    }

    /// Path of the selected member, empty when nothing is selected
    pub fn path(&self) -> &str {
        &self.selection.path
    }

    /// Selected entry, if any
    pub fn selection(&self) -> Option<&EntryInfo> {
        if self.selection.path.is_empty() {
            None
        } else {
            Some(&self.selection)
        }
    }

    /// Get archive header information
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Get number of entry records in the archive
    pub fn entry_count(&self) -> usize {
        self.directory.len()
    }

    /// Member paths in archive order
    pub fn list(&self) -> Vec<String> {
        self.directory.paths()
    }

    /// Entries in archive order, duplicates included
    pub fn entries(&self) -> &[EntryInfo] {
        self.directory.entries()
    }

    /// Check if a member exists in the archive
    pub fn contains(&self, path: &str) -> bool {
        self.directory.contains(path)
    }

    /// Get entry information without reading data
    pub fn entry(&self, path: &str) -> Option<&EntryInfo> {
        self.directory.get(path)
    }

    /// Longest member path in characters, for sizing listing columns
    pub fn longest_path_len(&self) -> usize {
        self.directory.longest_path_len()
    }
}

/// Reader over a single member's bytes
pub struct EntryReader<'a, R> {
    info: EntryInfo,
    data: io::Take<&'a mut R>,
}

impl<R> EntryReader<'_, R> {
    pub fn info(&self) -> &EntryInfo {
        &self.info
    }
}

impl<R: Read> Read for EntryReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.data.read(buf)
    }
}
