mod builder;
mod directory;
mod format;
mod reader;

pub use builder::{member_path_for, ArchiveBuilder};
pub use directory::Directory;
pub use format::{
    data_offset_for, EntryInfo, FileHeader, HEADER_SIZE, MAGIC_NUMBER, RECORD_FIXED_SIZE,
};
pub use reader::{ArchiveReader, EntryReader};
