//! Directory Source
//!
//! Reads one event per `*.json` file. Files are ordered by the integer value
//! of their stem (`2.json` before `10.json`); stems that are not integers
//! sort after every numbered file, by name.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{EventSource, SourceError, SourceItem};

#[derive(Debug, Clone, PartialEq, Eq)]
struct SortKey {
    number: Option<u64>,
    name: String,
}

impl SortKey {
    fn for_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let number = name
            .split('.')
            .next()
            .and_then(|stem| stem.parse::<u64>().ok());
        Self { number, name }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.number, other.number) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.name.cmp(&other.name)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.name.cmp(&other.name),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Event files from a directory, in timeline order.
#[derive(Debug)]
pub struct DirectorySource {
    files: std::vec::IntoIter<PathBuf>,
}

impl DirectorySource {
    /// List and order the event files of `dir`.
    ///
    /// Files are read lazily as the source is drained.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, SourceError> {
        let dir = dir.as_ref();
        let list_err = |source| SourceError::List {
            path: dir.to_path_buf(),
            source,
        };

        let mut files: Vec<(SortKey, PathBuf)> = Vec::new();
        for entry in fs::read_dir(dir).map_err(list_err)? {
            let path = entry.map_err(list_err)?.path();
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            if is_json && path.is_file() {
                files.push((SortKey::for_path(&path), path));
            }
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));

        debug!("Found {} event files in {}", files.len(), dir.display());

        Ok(Self {
            files: files
                .into_iter()
                .map(|(_, path)| path)
                .collect::<Vec<_>>()
                .into_iter(),
        })
    }

    /// Number of files not yet read.
    pub fn remaining(&self) -> usize {
        self.files.len()
    }
}

impl EventSource for DirectorySource {
    fn next_item(&mut self) -> Option<SourceItem> {
        let path = self.files.next()?;
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = fs::read(&path).map_err(|source| SourceError::Read { path, source });
        Some(SourceItem { label, bytes })
    }
}
