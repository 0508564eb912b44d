use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::param::ParameterSnapshot;

/// Maximum number of undo steps kept.
pub const HISTORY_SIZE_LIMIT: usize = 5;

/// Tweaks closer together than this share one undo step (600ms).
pub const DEFAULT_COALESCE_WINDOW: Duration = Duration::from_millis(600);

/// One undo step: the values the touched keys had *before* the batch started.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub changed_parameters: ParameterSnapshot,
    pub timestamp: Instant,
}

/// Bounded FIFO of undo steps, oldest first, with batch coalescing for drag gestures.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoHistory {
    entries: VecDeque<HistoryEntry>,
    max_depth: usize,
    coalesce_window: Duration,
    /// Set by `pop`: the next record always opens a new batch.
    sealed: bool,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::with_window(DEFAULT_COALESCE_WINDOW)
    }
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(coalesce_window: Duration) -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_SIZE_LIMIT + 1),
            max_depth: HISTORY_SIZE_LIMIT,
            coalesce_window,
            sealed: false,
        }
    }

    pub fn coalesce_window(&self) -> Duration {
        self.coalesce_window
    }

    /// A change opens a new batch when there is no open entry or the newest one
    /// was last touched at least `coalesce_window` ago.
    pub fn is_first_in_batch(&self, now: Instant) -> bool {
        if self.sealed {
            return true;
        }
        match self.entries.back() {
            None => true,
            Some(last) => now.saturating_duration_since(last.timestamp) >= self.coalesce_window,
        }
    }

    /// Record the pre-change values of the keys a tweak is about to overwrite.
    ///
    /// Starting a batch pushes a new entry. Inside a batch the open entry is
    /// extended instead: keys it already holds keep their earliest value, new
    /// keys are added, and its timestamp moves to `now` so the window slides.
    pub fn record(&mut self, pre_values: ParameterSnapshot, now: Instant) {
        if self.is_first_in_batch(now) {
            self.push(HistoryEntry { changed_parameters: pre_values, timestamp: now });
            return;
        }
        if let Some(open) = self.entries.back_mut() {
            for (name, value) in pre_values {
                open.changed_parameters.entry(name).or_insert(value);
            }
            open.timestamp = now;
        }
    }

    /// Append an entry, evicting the oldest once the limit is exceeded.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        if self.entries.len() > self.max_depth {
            self.entries.pop_front();
        }
        self.sealed = false;
    }

    /// Remove the newest entry. Returns `None` when there is nothing to undo.
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        let entry = self.entries.pop_back()?;
        self.sealed = true;
        Some(entry)
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.sealed = false;
    }
}
