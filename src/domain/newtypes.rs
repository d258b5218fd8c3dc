// SPDX-License-Identifier: MPL-2.0
//! Review newtypes.
//!
//! Type-safe wrappers for the paging and undo knobs, always clamped to the
//! ranges declared in [`crate::config::defaults`].

use crate::config::defaults::{
    DEFAULT_BATCH_SIZE, DEFAULT_LOOKAHEAD, DEFAULT_UNDO_DEPTH, MAX_BATCH_SIZE, MAX_LOOKAHEAD,
    MAX_UNDO_DEPTH, MIN_BATCH_SIZE, MIN_LOOKAHEAD, MIN_UNDO_DEPTH,
};

/// Number of assets requested per batch (1–500).
///
/// # Example
///
/// ```
/// use photo_swipe::domain::newtypes::BatchSize;
///
/// assert_eq!(BatchSize::new(0).value(), 1);
/// assert_eq!(BatchSize::new(30).value(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSize(usize);

impl BatchSize {
    /// Creates a batch size, clamping to the valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(MIN_BATCH_SIZE, MAX_BATCH_SIZE))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self(DEFAULT_BATCH_SIZE)
    }
}

/// How many unreviewed entries must remain ahead of the cursor before the
/// next batch is requested (0–100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookaheadMargin(usize);

impl LookaheadMargin {
    /// Creates a margin, clamping to the valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(MIN_LOOKAHEAD, MAX_LOOKAHEAD))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }

    /// Whether a cursor at `cursor` over a buffer of `len` entries has reached
    /// the margin.
    #[must_use]
    pub fn reached(self, cursor: usize, len: usize) -> bool {
        cursor.saturating_add(self.0) >= len
    }
}

impl Default for LookaheadMargin {
    fn default() -> Self {
        Self(DEFAULT_LOOKAHEAD)
    }
}

/// Maximum number of undo records retained (1–1000).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoDepth(usize);

impl UndoDepth {
    /// Creates an undo depth, clamping to the valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(MIN_UNDO_DEPTH, MAX_UNDO_DEPTH))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for UndoDepth {
    fn default() -> Self {
        Self(DEFAULT_UNDO_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_size_clamps_to_valid_range() {
        assert_eq!(BatchSize::new(0).value(), MIN_BATCH_SIZE);
        assert_eq!(BatchSize::new(10_000).value(), MAX_BATCH_SIZE);
        assert_eq!(BatchSize::default().value(), DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn lookahead_reached_at_margin() {
        let margin = LookaheadMargin::new(5);
        assert!(!margin.reached(4, 10));
        assert!(margin.reached(5, 10));
        assert!(margin.reached(10, 10));
        assert!(LookaheadMargin::new(0).reached(3, 3));
        assert!(!LookaheadMargin::new(0).reached(2, 3));
    }

    #[test]
    fn lookahead_reached_does_not_overflow() {
        let margin = LookaheadMargin::new(MAX_LOOKAHEAD);
        assert!(margin.reached(usize::MAX, 10));
    }

    #[test]
    fn undo_depth_clamps_to_valid_range() {
        assert_eq!(UndoDepth::new(0).value(), MIN_UNDO_DEPTH);
        assert_eq!(UndoDepth::new(usize::MAX).value(), MAX_UNDO_DEPTH);
        assert_eq!(UndoDepth::new(7).value(), 7);
    }
}
