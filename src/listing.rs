//! Text and JSON renderings of an archive's entry table

use crate::archive::EntryInfo;
use crate::error::Result;

/// Width of the offset and size columns
const NUMBER_WIDTH: usize = 10;

/// Pad `text` with spaces to exactly `width` characters, truncating if longer
pub fn cell(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len > width {
        text.chars().take(width).collect()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Header of the path column
const PATH_TITLE: &str = "Path:";

/// Render the entry table, one line per element
///
/// `longest_path_len` comes from the archive's directory
/// (`ArchiveReader::longest_path_len` or `ArchiveBuilder::longest_path_len`).
/// The path column is one character wider than that so every path keeps a
/// trailing space before the separator.
pub fn render_table(entries: &[EntryInfo], longest_path_len: usize) -> Vec<String> {
    let path_width = longest_path_len.max(PATH_TITLE.len()) + 1;

    let row = |path: &str, offset: &str, size: &str| {
        format!(
            "\t | {}| {}| {}|",
            cell(path, path_width),
            cell(offset, NUMBER_WIDTH),
            cell(size, NUMBER_WIDTH)
        )
    };

    let header = row(PATH_TITLE, "Offset:", "Size:");
    // Tab and the " | " lead-in are not part of the rule
    let rule = format!("\t |{}|", "-".repeat(header.chars().count() - 4));

    let mut lines = Vec::with_capacity(entries.len() + 4);
    lines.push(rule.clone());
    lines.push(header);
    lines.push(rule.clone());
    for entry in entries {
        lines.push(row(
            &entry.path,
            &entry.offset.to_string(),
            &entry.size.to_string(),
        ));
    }
    lines.push(rule);
    lines
}

/// Entry list as pretty-printed JSON
pub fn render_json(entries: &[EntryInfo]) -> Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}
