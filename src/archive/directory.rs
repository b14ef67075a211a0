use crate::archive::format::EntryInfo;
use std::collections::HashMap;

/// Ordered entry list plus a path index
///
/// The list keeps every entry in insertion order (serialization and
/// listing order). The index maps each path to the position of the last
/// entry pushed under it, so duplicate paths resolve to the newest entry.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    entries: Vec<EntryInfo>,
    index: HashMap<String, usize>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Append an entry; an existing index slot for the same path is replaced
    pub fn push(&mut self, entry: EntryInfo) {
        self.index.insert(entry.path.clone(), self.entries.len());
        self.entries.push(entry);
    }

    pub fn get(&self, path: &str) -> Option<&EntryInfo> {
        self.index.get(path).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// All entries in insertion order, duplicates included
    pub fn entries(&self) -> &[EntryInfo] {
        &self.entries
    }

    /// Member paths in insertion order
    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct paths reachable through lookup
    pub fn unique_len(&self) -> usize {
        self.index.len()
    }

    pub fn longest_path_len(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.path.chars().count())
            .max()
            .unwrap_or(0)
    }
}
