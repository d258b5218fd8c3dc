// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Paging**: Batch window and lookahead margin
//! - **Undo**: Undo stack depth
//! - **Gesture**: Swipe classification thresholds
//! - **Preview**: Decoded preview target size
//! - **Buckets**: Default bucket labels

// ==========================================================================
// Paging Defaults
// ==========================================================================

/// Number of assets paged in per batch.
pub const DEFAULT_BATCH_SIZE: usize = 30;

/// Minimum batch size.
pub const MIN_BATCH_SIZE: usize = 1;

/// Maximum batch size.
pub const MAX_BATCH_SIZE: usize = 500;

/// Remaining entries ahead of the cursor below which the next batch is requested.
pub const DEFAULT_LOOKAHEAD: usize = 5;

/// Minimum lookahead margin (0 = only load once the buffer is exhausted).
pub const MIN_LOOKAHEAD: usize = 0;

/// Maximum lookahead margin.
pub const MAX_LOOKAHEAD: usize = 100;

// ==========================================================================
// Undo Defaults
// ==========================================================================

/// Number of swipes that can be undone.
pub const DEFAULT_UNDO_DEPTH: usize = 20;

/// Minimum undo depth.
pub const MIN_UNDO_DEPTH: usize = 1;

/// Maximum undo depth.
pub const MAX_UNDO_DEPTH: usize = 1000;

// ==========================================================================
// Gesture Defaults
// ==========================================================================

/// Horizontal displacement a drag must exceed to count as a swipe.
pub const DEFAULT_HORIZONTAL_THRESHOLD: f32 = 120.0;

/// Vertical displacement a drag must exceed to count as a swipe.
pub const DEFAULT_VERTICAL_THRESHOLD: f32 = 120.0;

/// Minimum swipe threshold.
pub const MIN_SWIPE_THRESHOLD: f32 = 1.0;

/// Maximum swipe threshold.
pub const MAX_SWIPE_THRESHOLD: f32 = 2000.0;

// ==========================================================================
// Preview Defaults
// ==========================================================================

/// Edge length of the requested preview, in pixels.
pub const DEFAULT_PREVIEW_EDGE: u32 = 1000;

// ==========================================================================
// Bucket Defaults
// ==========================================================================

/// Label of the bucket reached by a primary swipe.
pub const DEFAULT_PRIMARY_LABEL: &str = "Delete";

/// Label of the bucket reached by a secondary swipe.
pub const DEFAULT_SECONDARY_LABEL: &str = "Keep";

/// Label of the bucket reached by a tertiary swipe.
pub const DEFAULT_TERTIARY_LABEL: &str = "Favorites";

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_BATCH_SIZE > 0);
    assert!(DEFAULT_BATCH_SIZE >= MIN_BATCH_SIZE);
    assert!(DEFAULT_BATCH_SIZE <= MAX_BATCH_SIZE);

    assert!(DEFAULT_LOOKAHEAD >= MIN_LOOKAHEAD);
    assert!(DEFAULT_LOOKAHEAD <= MAX_LOOKAHEAD);
    assert!(DEFAULT_LOOKAHEAD < DEFAULT_BATCH_SIZE);

    assert!(MIN_UNDO_DEPTH > 0);
    assert!(DEFAULT_UNDO_DEPTH >= MIN_UNDO_DEPTH);
    assert!(DEFAULT_UNDO_DEPTH <= MAX_UNDO_DEPTH);

    assert!(MIN_SWIPE_THRESHOLD > 0.0);
    assert!(DEFAULT_HORIZONTAL_THRESHOLD >= MIN_SWIPE_THRESHOLD);
    assert!(DEFAULT_HORIZONTAL_THRESHOLD <= MAX_SWIPE_THRESHOLD);
    assert!(DEFAULT_VERTICAL_THRESHOLD >= MIN_SWIPE_THRESHOLD);
    assert!(DEFAULT_VERTICAL_THRESHOLD <= MAX_SWIPE_THRESHOLD);

    assert!(DEFAULT_PREVIEW_EDGE > 0);
};
