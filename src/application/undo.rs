// SPDX-License-Identifier: MPL-2.0
//! Bounded undo history for review advances.

use crate::domain::asset::AssetHandle;
use crate::domain::bucket::{BucketId, Placement};
use crate::domain::newtypes::UndoDepth;
use std::collections::VecDeque;

/// Everything needed to reverse one advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoRecord {
    pub handle: AssetHandle,
    /// Bucket the asset was routed into; `None` for a skip.
    pub bucket: Option<BucketId>,
    /// Where the asset sat before this advance moved it.
    pub displaced_from: Option<Placement>,
    /// Cursor position before the advance.
    pub prior_cursor: usize,
}

/// Stack of the most recent advances.
///
/// Holds at most [`UndoDepth`] records; pushing onto a full stack discards
/// the oldest one.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    records: VecDeque<UndoRecord>,
    depth: UndoDepth,
}

impl UndoStack {
    #[must_use]
    pub fn new(depth: UndoDepth) -> Self {
        Self {
            records: VecDeque::with_capacity(depth.value()),
            depth,
        }
    }

    /// Pushes a record, evicting the oldest when full.
    pub fn record_and_push(&mut self, record: UndoRecord) {
        while self.records.len() >= self.depth.value() {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Pops the newest record.
    pub fn pop(&mut self) -> Option<UndoRecord> {
        self.records.pop_back()
    }

    #[must_use]
    pub fn peek(&self) -> Option<&UndoRecord> {
        self.records.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn depth(&self) -> UndoDepth {
        self.depth
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::AssetId;

    fn record(n: usize) -> UndoRecord {
        UndoRecord {
            handle: AssetHandle::new(AssetId::new(format!("a{n}")), n, None),
            bucket: None,
            displaced_from: None,
            prior_cursor: n,
        }
    }

    #[test]
    fn pops_newest_first() {
        let mut stack = UndoStack::new(UndoDepth::new(5));
        stack.record_and_push(record(0));
        stack.record_and_push(record(1));
        assert_eq!(stack.pop().unwrap().prior_cursor, 1);
        assert_eq!(stack.pop().unwrap().prior_cursor, 0);
        assert!(stack.pop().is_none());
    }

    #[test]
    fn full_stack_drops_oldest() {
        let mut stack = UndoStack::new(UndoDepth::new(3));
        for n in 0..5 {
            stack.record_and_push(record(n));
        }
        assert_eq!(stack.len(), 3);
        let cursors: Vec<_> = std::iter::from_fn(|| stack.pop())
            .map(|r| r.prior_cursor)
            .collect();
        assert_eq!(cursors, [4, 3, 2]);
    }

    #[test]
    fn clear_empties_stack() {
        let mut stack = UndoStack::default();
        stack.record_and_push(record(0));
        assert_eq!(stack.peek().map(|r| r.prior_cursor), Some(0));
        stack.clear();
        assert!(stack.is_empty());
    }
}
