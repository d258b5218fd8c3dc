// SPDX-License-Identifier: MPL-2.0
//! Ordered review buffer.
//!
//! Entries are reserved in source order before their previews exist, and
//! previews are written into their reserved slot when decoding completes.
//! The buffer is never reordered.

use crate::domain::asset::{AssetHandle, AssetId};
use crate::domain::preview::PreviewImage;

/// Preview state of a buffer entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreviewSlot {
    /// Decode requested, not yet delivered.
    #[default]
    Pending,
    /// Decoded preview.
    Ready(PreviewImage),
    /// The decoder gave up; shown as a placeholder.
    Failed,
}

impl PreviewSlot {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, PreviewSlot::Pending)
    }

    /// The decoded preview, if delivered.
    #[must_use]
    pub fn image(&self) -> Option<&PreviewImage> {
        match self {
            PreviewSlot::Ready(image) => Some(image),
            _ => None,
        }
    }
}

/// One reviewed asset and its preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferEntry {
    pub handle: AssetHandle,
    pub preview: PreviewSlot,
}

impl BufferEntry {
    /// Entry whose preview is still pending.
    #[must_use]
    pub fn pending(handle: AssetHandle) -> Self {
        Self {
            handle,
            preview: PreviewSlot::Pending,
        }
    }
}

/// Ordered sequence of entries in source fetch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewBuffer {
    entries: Vec<BufferEntry>,
}

impl ReviewBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&BufferEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BufferEntry> {
        self.entries.iter()
    }

    /// Appends a pending slot and returns its index.
    pub fn reserve(&mut self, handle: AssetHandle) -> usize {
        self.entries.push(BufferEntry::pending(handle));
        self.entries.len() - 1
    }

    /// Index of the entry holding `id`.
    #[must_use]
    pub fn position_of(&self, id: &AssetId) -> Option<usize> {
        self.entries.iter().position(|e| e.handle.id() == id)
    }

    /// Whether slot `index` currently holds asset `id`.
    #[must_use]
    pub fn slot_holds(&self, index: usize, id: &AssetId) -> bool {
        self.entries
            .get(index)
            .is_some_and(|e| e.handle.id() == id)
    }

    /// Writes a preview state into slot `index`.
    ///
    /// Returns `false` when the slot does not exist.
    pub fn fill(&mut self, index: usize, preview: PreviewSlot) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.preview = preview;
                true
            }
            None => false,
        }
    }

    /// Inserts an entry at `index` (clamped to the buffer length).
    pub fn insert(&mut self, index: usize, entry: BufferEntry) -> usize {
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry);
        index
    }

    /// Replaces every entry, keeping the given order.
    pub fn rebuild(&mut self, entries: Vec<BufferEntry>) {
        self.entries = entries;
    }

    /// Removes and returns every entry.
    pub fn take_all(&mut self) -> Vec<BufferEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Indices of entries still waiting for a preview.
    #[must_use]
    pub fn pending_slots(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.preview.is_pending())
            .map(|(i, _)| i)
            .collect()
    }
}
