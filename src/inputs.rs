//! Expansion of pack inputs into individual member files

use crate::archive::member_path_for;
use crate::error::Result;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One file to pack and the member path it is stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackInput {
    pub source: PathBuf,
    pub member: String,
}

/// Expand files and directories into pack inputs
///
/// Directories are walked recursively in file-name order and only regular
/// files are kept. Paths that do not exist are passed through unchanged so
/// the builder reports them when it tries to read them.
pub fn collect_inputs(roots: &[PathBuf], strip_prefix: Option<&Path>) -> Result<Vec<PackInput>> {
    let mut inputs = Vec::new();

    for root in roots {
        if root.is_dir() {
            let mut count = 0usize;
            for entry in WalkDir::new(root).sort_by_file_name() {
                let entry = entry.map_err(io::Error::from)?;
                if !entry.file_type().is_file() {
                    continue;
                }
                inputs.push(pack_input(entry.path(), strip_prefix)?);
                count += 1;
            }
            tracing::debug!(dir = %root.display(), files = count, "Walked input directory");
        } else {
            inputs.push(pack_input(root, strip_prefix)?);
        }
    }

    Ok(inputs)
}

fn pack_input(source: &Path, strip_prefix: Option<&Path>) -> Result<PackInput> {
    let stored = strip_prefix
        .and_then(|prefix| source.strip_prefix(prefix).ok())
        .filter(|rest| !rest.as_os_str().is_empty())
        .unwrap_or(source);

    Ok(PackInput {
        source: source.to_path_buf(),
        member: member_path_for(stored)?,
    })
}
