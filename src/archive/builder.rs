use crate::archive::directory::Directory;
use crate::archive::format::{data_offset_for, EntryInfo, FileHeader};
use crate::config::Limits;
use crate::error::{FiasError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Member name for a file on disk: the source path as given
///
/// No separator or case rewriting happens here, so `find` with the same
/// path string that was passed to `add` always hits.
pub fn member_path_for(source: &Path) -> Result<String> {
    source
        .to_str()
        .map(str::to_string)
        .ok_or_else(|| FiasError::InvalidPath(format!("not UTF-8: {}", source.display())))
}

/// In-memory archive builder
///
/// Member contents are concatenated into one buffer as they are added;
/// nothing touches the destination until [`ArchiveBuilder::write`]. The
/// builder stays usable after a write, and every write serializes the
/// complete current state again.
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    buffer: Vec<u8>,
    directory: Directory,
    limits: Limits,
}

impl ArchiveBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder with pre-reserved buffer space
    ///
    /// The capacity is only a hint; the buffer still grows past it.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Add a file from disk, stored under its own path
    pub fn add<P: AsRef<Path>>(&mut self, source: P) -> Result<()> {
        let source = source.as_ref();
        let member = member_path_for(source)?;
        self.add_as(&member, source)
    }

    /// Add a file from disk under an explicit member path
    pub fn add_as<P: AsRef<Path>>(&mut self, member: &str, source: P) -> Result<()> {
        let source = source.as_ref();
        // Check the name before reading so a rejected member costs no I/O
        self.validate_member(member)?;

        let data = std::fs::read(source).map_err(|e| FiasError::SourceUnreadable {
            path: source.to_path_buf(),
            source: e,
        })?;

        self.push(member, &data)
    }

    /// Add in-memory content under an explicit member path
    pub fn add_bytes(&mut self, member: &str, data: &[u8]) -> Result<()> {
        self.validate_member(member)?;
        self.push(member, data)
    }

    fn validate_member(&self, member: &str) -> Result<()> {
        if member.is_empty() {
            return Err(FiasError::InvalidPath("empty member path".to_string()));
        }

        if member.len() as u64 > self.limits.max_path_length {
            return Err(FiasError::LimitExceeded(format!(
                "member path is {} bytes (max {})",
                member.len(),
                self.limits.max_path_length
            )));
        }

        if self.directory.len() as u64 >= u64::from(self.limits.max_entries) {
            return Err(FiasError::LimitExceeded(format!(
                "archive already holds {} entries",
                self.directory.len()
            )));
        }

        Ok(())
    }

    fn push(&mut self, member: &str, data: &[u8]) -> Result<()> {
        let offset = self.buffer.len() as u64;
        self.buffer.extend_from_slice(data);

        if self.directory.contains(member) {
            tracing::warn!(path = member, "Duplicate member path, newest entry wins lookups");
        }

        self.directory
            .push(EntryInfo::new(member, offset, data.len() as u64));

        tracing::debug!(path = member, offset, size = data.len(), "Added entry");
        Ok(())
    }

    /// Serialize the archive to a file, returning the number of bytes written
    pub fn write<P: AsRef<Path>>(&self, destination: P) -> Result<u64> {
        let destination = destination.as_ref();
        let file = File::create(destination)?;
        let mut writer = BufWriter::new(file);

        let written = self.write_to(&mut writer)?;
        writer.flush()?;

        tracing::debug!(
            path = %destination.display(),
            entries = self.directory.len(),
            bytes = written,
            "Wrote archive"
        );
        Ok(written)
    }

    /// Serialize the archive into any writer
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<u64> {
        let header = self.header()?;
        let mut written = header.write_to(&mut writer)? as u64;

        for entry in self.directory.entries() {
            written += entry.write_to(&mut writer)? as u64;
        }

        // Records must end exactly where the data region was announced
        debug_assert_eq!(written, header.data_offset);

        writer.write_all(&self.buffer)?;
        written += self.buffer.len() as u64;

        Ok(written)
    }

    /// Header that the next write will produce
    pub fn header(&self) -> Result<FileHeader> {
        let entry_count = u32::try_from(self.directory.len()).map_err(|_| {
            FiasError::LimitExceeded(format!(
                "{} entries do not fit the header count field",
                self.directory.len()
            ))
        })?;

        Ok(FileHeader {
            entry_count,
            data_offset: self.data_offset(),
        })
    }

    /// Absolute start of the data region in the serialized archive
    pub fn data_offset(&self) -> u64 {
        data_offset_for(self.directory.entries())
    }

    /// Entries in insertion order, duplicates included
    pub fn entries(&self) -> &[EntryInfo] {
        self.directory.entries()
    }

    /// Member paths in insertion order
    pub fn list(&self) -> Vec<String> {
        self.directory.paths()
    }

    pub fn entry(&self, path: &str) -> Option<&EntryInfo> {
        self.directory.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.directory.contains(path)
    }

    pub fn entry_count(&self) -> usize {
        self.directory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    /// Total bytes of member content held in memory
    pub fn data_len(&self) -> u64 {
        self.buffer.len() as u64
    }

    pub fn longest_path_len(&self) -> usize {
        self.directory.longest_path_len()
    }
}
