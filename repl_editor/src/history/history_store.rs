// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::VecDeque;

/// One slot in the edit history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Last value accepted at this slot.
    pub committed: String,
    /// Live value, which may hold an edit made while browsing history that has not
    /// been submitted.
    pub current: String,
    /// The whole text of a multi-line submission.
    pub block: Option<String>,
}

impl HistoryEntry {
    #[must_use]
    pub fn blank() -> Self { Self::default() }

    #[must_use]
    pub fn new_committed(text: &str) -> Self {
        Self {
            committed: text.to_string(),
            current: text.to_string(),
            block: text.contains('\n').then(|| text.to_string()),
        }
    }

    #[must_use]
    pub fn reverted(self) -> Self {
        Self {
            current: self.committed.clone(),
            ..self
        }
    }
}

/// Navigable history where index 0 is the newest slot, the one being typed into.
///
/// Browsing with [`HistoryStore::prev`] and [`HistoryStore::next`] and editing what is
/// shown only changes `current` of the slot being edited (via [`HistoryStore::sync`]).
/// The `watermark` is one past the oldest slot touched this way. Everything at or past
/// it still has `current == committed`. [`HistoryStore::commit`] collapses all such
/// edits back to what was committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStore {
    entries: VecDeque<HistoryEntry>,
    index: usize,
    watermark: usize,
    max_entries: Option<usize>,
}

impl Default for HistoryStore {
    fn default() -> Self { Self::new() }
}

impl HistoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: VecDeque::from([HistoryEntry::blank()]),
            index: 0,
            watermark: 0,
            max_entries: None,
        }
    }

    /// Keep at most `max_entries` slots (the blank newest slot included), dropping the
    /// oldest ones on commit.
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: Option<usize>) -> Self {
        self.max_entries = max_entries.map(|it| it.max(2));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    #[must_use]
    pub fn index(&self) -> usize { self.index }

    #[must_use]
    pub fn watermark(&self) -> usize { self.watermark }

    #[must_use]
    pub fn entry(&self, index: usize) -> Option<&HistoryEntry> { self.entries.get(index) }

    /// Records `buffer` as the live value of the slot being edited.
    pub fn sync(&mut self, buffer: &str) {
        self.ensure_not_empty();
        let entries = std::mem::take(&mut self.entries);
        self.entries = synced(entries, self.index, buffer);
        self.watermark = self.watermark.max(self.index + 1);
    }

    /// Accepts `buffer` as a submission.
    ///
    /// 1. Every browsing edit is reverted, so each slot's `current` is its
    ///    `committed` again.
    /// 2. If `buffer` is not blank and not the same as the newest committed entry, it
    ///    becomes the newest entry, with a fresh blank slot above it.
    /// 3. Navigation goes back to the newest slot and the watermark resets.
    ///
    /// Returns `true` if `buffer` was added as a new entry.
    pub fn commit(&mut self, buffer: &str) -> bool {
        self.ensure_not_empty();
        let entries = std::mem::take(&mut self.entries);
        let (entries, accepted) = committed(entries, buffer, self.max_entries);
        self.entries = entries;
        self.index = 0;
        self.watermark = 0;
        tracing::debug!(message = "history commit", entries = self.entries.len(), accepted);
        accepted
    }

    /// Moves to the next older entry and returns its live value. Returns `None` if
    /// there is nothing older.
    pub fn prev(&mut self) -> Option<&str> {
        self.ensure_not_empty();
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index].current)
    }

    /// Moves to the next newer entry and returns its live value. Returns `None` if
    /// already at the newest slot.
    pub fn next(&mut self) -> Option<&str> {
        self.ensure_not_empty();
        if self.index == 0 {
            return None;
        }
        self.index = (self.index - 1).min(self.entries.len() - 1);
        Some(&self.entries[self.index].current)
    }

    fn ensure_not_empty(&mut self) {
        if self.entries.is_empty() {
            self.entries.push_back(HistoryEntry::blank());
            self.index = 0;
            self.watermark = 0;
        }
    }
}

fn synced(
    entries: VecDeque<HistoryEntry>,
    index: usize,
    buffer: &str,
) -> VecDeque<HistoryEntry> {
    entries
        .into_iter()
        .enumerate()
        .map(|(at, entry)| {
            if at == index {
                HistoryEntry {
                    current: buffer.to_string(),
                    ..entry
                }
            } else {
                entry
            }
        })
        .collect()
}

fn committed(
    entries: VecDeque<HistoryEntry>,
    buffer: &str,
    max_entries: Option<usize>,
) -> (VecDeque<HistoryEntry>, bool) {
    let mut entries: VecDeque<HistoryEntry> =
        entries.into_iter().map(HistoryEntry::reverted).collect();

    let is_duplicate = entries.get(1).is_some_and(|it| it.committed == buffer);
    if buffer.trim().is_empty() || is_duplicate {
        return (entries, false);
    }

    entries[0] = HistoryEntry::new_committed(buffer);
    entries.push_front(HistoryEntry::blank());
    if let Some(max_entries) = max_entries {
        entries.truncate(max_entries);
    }
    (entries, true)
}
