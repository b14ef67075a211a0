//! Extraction of archive members to a directory

use crate::archive::ArchiveReader;
use crate::error::{FiasError, Result};
use std::collections::HashSet;
use std::fs;
use std::io::{Read, Seek};
use std::path::{Component, Path, PathBuf};

/// Outcome of an extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub files: usize,
    pub bytes: u64,
    /// Members refused because their path would leave the destination
    pub skipped: Vec<String>,
    /// Members that could not be written below the destination
    pub failed: Vec<String>,
}


/// Relative filesystem path for a member, refusing anything that escapes
/// the extraction directory
pub fn sanitize_member_path(member: &str) -> Result<PathBuf> {
    let mut out = PathBuf::new();

    for component in Path::new(member).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(FiasError::UnsafePath(member.to_string()));
            }
        }
    }

    if out.as_os_str().is_empty() {
        return Err(FiasError::UnsafePath(member.to_string()));
    }
    Ok(out)
}

/// Write every member of the archive below `dest`
///
/// Members are visited in archive order. A path that appears more than
/// once is written once, with the content lookups resolve to. A member
/// that cannot be written is recorded in [`ExtractSummary::failed`] and the
/// run goes on; only errors reading the archive abort it.
pub fn extract_all<R: Read + Seek>(
    reader: &mut ArchiveReader<R>,
    dest: &Path,
) -> Result<ExtractSummary> {
    fs::create_dir_all(dest)?;

    let mut summary = ExtractSummary::default();
    let mut seen = HashSet::new();

    for member in reader.list() {
        if !seen.insert(member.clone()) {
            continue;
        }

        let relative = match sanitize_member_path(&member) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping member");
                summary.skipped.push(member);
                continue;
            }
        };

        if !reader.find(&member) {
            return Err(FiasError::FileNotFound(member));
        }

        let mut data = vec![0u8; reader.size() as usize];
        let read = reader.read(&mut data)?;

        let out_path = dest.join(&relative);
        if let Err(e) = write_member(&out_path, &data) {
            tracing::warn!(member = %member, path = %out_path.display(), error = %e, "Failed to write member");
            summary.failed.push(member);
            continue;
        }

        tracing::debug!(member = %member, path = %out_path.display(), bytes = read, "Extracted");
        summary.files += 1;
        summary.bytes += read as u64;
    }

    Ok(summary)
}

fn write_member(out_path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(out_path, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_accepts_relative_paths() {
        assert_eq!(
            sanitize_member_path("dir/sub/file.txt").unwrap(),
            PathBuf::from("dir").join("sub").join("file.txt")
        );
        assert_eq!(
            sanitize_member_path("./file.txt").unwrap(),
            PathBuf::from("file.txt")
        );
    }

    #[test]
    fn test_sanitize_rejects_escapes() {
        for bad in ["../etc/passwd", "a/../../b", "/etc/passwd", ".", ""] {
            assert!(
                matches!(sanitize_member_path(bad), Err(FiasError::UnsafePath(_))),
                "{} should be refused",
                bad
            );
        }
    }
}
