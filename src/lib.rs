//! fipack: FIAS asset package library
//!
//! Packs any set of files into one sequential container with a directory of
//! entries (path, offset, size), and reopens such containers to locate, read
//! or extract members by path. Members are stored raw: no compression,
//! checksums or encryption.
//!
//! # Example
//!
//! ```no_run
//! use fipack::{ArchiveBuilder, ArchiveReader};
//!
//! // Create an archive
//! let mut builder = ArchiveBuilder::new();
//! builder.add("assets/logo.png")?;
//! builder.add_bytes("notes.txt", b"Hello, World!")?;
//! builder.write("package.fas")?;
//!
//! // Read from archive
//! let mut reader = ArchiveReader::open("package.fas")?;
//! if reader.find("notes.txt") {
//!     let mut buf = vec![0u8; reader.size() as usize];
//!     reader.read(&mut buf)?;
//! }
//! let _logo = reader.read_file("assets/logo.png")?;
//! # Ok::<(), fipack::FiasError>(())
//! ```

// Core modules
pub mod archive;
pub mod config;
pub mod error;
pub mod extract;
pub mod inputs;
pub mod listing;

// Re-export commonly used types
pub use archive::{
    ArchiveBuilder, ArchiveReader, Directory, EntryInfo, EntryReader, FileHeader, HEADER_SIZE,
    MAGIC_NUMBER,
};
pub use config::{Limits, PackConfig};
pub use error::{FiasError, Result};
