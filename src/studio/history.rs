//! Bounded, most-recent-first generation history.

use crate::image::{AspectRatio, GenerationRequest, ImageReference, StylePreset};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// How many generations are kept before the oldest falls off.
pub const HISTORY_CAP: usize = 10;

/// Immutable record of one past successful generation.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Time-derived unique token identifying the entry.
    pub id: String,
    /// Prompt as submitted (before any style phrasing).
    pub prompt: String,
    /// Style preset used.
    pub style: StylePreset,
    /// Aspect ratio used.
    pub aspect_ratio: AspectRatio,
    /// Where the generated image lives.
    pub reference: ImageReference,
    /// When the generation completed.
    pub created_at: DateTime<Utc>,
}

/// In-memory cache of recent generations.
///
/// Insertion-ordered, newest first, truncated to a fixed cap. Entries are
/// never mutated after insertion and the cache does not survive a restart.
#[derive(Debug)]
pub struct HistoryCache {
    entries: VecDeque<HistoryEntry>,
    cap: usize,
    seq: u64,
}

impl HistoryCache {
    /// Creates an empty cache with the default cap of [`HISTORY_CAP`].
    pub fn new() -> Self {
        Self::with_cap(HISTORY_CAP)
    }

    /// Creates an empty cache with a custom cap.
    pub fn with_cap(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap),
            cap,
            seq: 0,
        }
    }

    /// Records a successful generation at the front, evicting beyond the cap.
    ///
    /// The entry id combines the completion timestamp with a sequence number
    /// so two generations landing in the same millisecond stay distinct.
    pub fn append(&mut self, request: &GenerationRequest, reference: ImageReference) -> &HistoryEntry {
        let created_at = Utc::now();
        let id = format!("{}-{}", created_at.timestamp_millis(), self.seq);
        self.seq += 1;

        self.entries.push_front(HistoryEntry {
            id,
            prompt: request.prompt.clone(),
            style: request.style,
            aspect_ratio: request.aspect_ratio,
            reference,
            created_at,
        });
        self.entries.truncate(self.cap);

        &self.entries[0]
    }

    /// Looks an entry up by id without removing or reordering anything.
    pub fn select(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Iterates entries newest-first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing has been generated yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HistoryCache {
    fn default() -> Self {
        Self::new()
    }
}
