//! Event Sources
//!
//! Ordered providers of raw event blobs. The engine trusts the order it is
//! given; sources are responsible for match-timeline ordering.

pub mod directory;

use std::collections::VecDeque;
use std::path::PathBuf;

pub use directory::DirectorySource;

/// Source read errors.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Directory could not be listed.
    #[error("failed to list {path}: {source}")]
    List {
        /// Directory path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// One item yielded by a source.
#[derive(Debug)]
pub struct SourceItem {
    /// Human-readable origin (file name, index, ...)
    pub label: String,
    /// Raw event bytes, or the reason they could not be read
    pub bytes: Result<Vec<u8>, SourceError>,
}

/// An ordered, finite stream of raw events.
pub trait EventSource {
    /// Next item in timeline order, or `None` once exhausted.
    fn next_item(&mut self) -> Option<SourceItem>;
}

/// In-memory source.
#[derive(Debug, Default)]
pub struct VecSource {
    items: VecDeque<(String, Vec<u8>)>,
}

impl VecSource {
    /// Create from raw blobs, labelled by position.
    pub fn new<I, B>(blobs: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Vec<u8>>,
    {
        let items = blobs
            .into_iter()
            .enumerate()
            .map(|(i, blob)| (format!("#{}", i), blob.into()))
            .collect();
        Self { items }
    }

    /// Number of items not yet yielded.
    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

impl EventSource for VecSource {
    fn next_item(&mut self) -> Option<SourceItem> {
        let (label, bytes) = self.items.pop_front()?;
        Some(SourceItem {
            label,
            bytes: Ok(bytes),
        })
    }
}
