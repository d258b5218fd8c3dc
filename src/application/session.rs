// SPDX-License-Identifier: MPL-2.0
//! Review session state machine.
//!
//! A session owns the review buffer, the cursor over it, the buckets and the
//! undo history. It is a plain value: every transition goes through a method
//! on one owner, so no locking is involved.
//!
//! # States
//!
//! - `Reviewing`: the cursor points at an entry
//! - `Complete`: the cursor sits at the end of the buffer; growing the buffer
//!   returns the session to `Reviewing`
//!
//! # Example
//!
//! ```
//! use photo_swipe::application::session::{ReviewSession, ReviewState};
//! use photo_swipe::domain::asset::{AssetHandle, AssetId};
//! use photo_swipe::domain::bucket::BucketKind;
//! use photo_swipe::domain::gesture::{GestureVector, Outcome};
//!
//! let mut session = ReviewSession::default();
//! let keep = session.create_bucket("Keep", BucketKind::Collection).unwrap();
//! session.route(Outcome::Secondary, keep).unwrap();
//! session.buffer_mut().reserve(AssetHandle::new(AssetId::new("a"), 0, None));
//!
//! session.swipe(GestureVector::new(150.0, 0.0)).unwrap();
//! assert_eq!(session.buckets().bucket_of(&AssetId::new("a")), Some(keep));
//! assert_eq!(session.state(), ReviewState::Complete);
//! ```

use crate::application::buffer::{BufferEntry, ReviewBuffer};
use crate::application::commit::CommitReport;
use crate::application::undo::{UndoRecord, UndoStack};
use crate::domain::asset::{AssetHandle, AssetId};
use crate::domain::bucket::{BucketError, BucketId, BucketKind, BucketSet};
use crate::domain::gesture::{GestureVector, Outcome, SwipeThresholds};
use crate::domain::newtypes::{LookaheadMargin, UndoDepth};
use std::collections::BTreeMap;
use thiserror::Error;

/// Where the cursor stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Reviewing,
    Complete,
}

/// Errors raised by session transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No current entry to act on.
    #[error("the review is complete")]
    Complete,

    #[error("skip does not route to a bucket")]
    SkipNotRoutable,

    #[error("asset {0} is not in any bucket")]
    NotAssigned(AssetId),

    #[error(transparent)]
    Bucket(#[from] BucketError),
}

/// Result of one cursor advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    pub handle: AssetHandle,
    /// Bucket the asset went to; `None` for a skip.
    pub bucket: Option<BucketId>,
    /// The lookahead margin was reached; load the next batch unless the
    /// source is exhausted.
    pub needs_more: bool,
}

/// Result of a successful undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoApplied {
    pub handle: AssetHandle,
    pub cursor: usize,
    /// Slot the handle was re-inserted at; its preview must be re-requested.
    pub reinserted: Option<usize>,
}

/// Cursor, buckets and undo history of one review pass.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    buffer: ReviewBuffer,
    cursor: usize,
    buckets: BucketSet,
    routes: BTreeMap<Outcome, BucketId>,
    undo: UndoStack,
    thresholds: SwipeThresholds,
    lookahead: LookaheadMargin,
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new(
            SwipeThresholds::default(),
            LookaheadMargin::default(),
            UndoDepth::default(),
        )
    }
}

impl ReviewSession {
    /// Creates an empty session with no buckets.
    #[must_use]
    pub fn new(
        thresholds: SwipeThresholds,
        lookahead: LookaheadMargin,
        undo_depth: UndoDepth,
    ) -> Self {
        Self {
            buffer: ReviewBuffer::new(),
            cursor: 0,
            buckets: BucketSet::new(),
            routes: BTreeMap::new(),
            undo: UndoStack::new(undo_depth),
            thresholds,
            lookahead,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn state(&self) -> ReviewState {
        if self.cursor < self.buffer.len() {
            ReviewState::Reviewing
        } else {
            ReviewState::Complete
        }
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Entry under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&BufferEntry> {
        self.buffer.get(self.cursor)
    }

    #[must_use]
    pub fn buffer(&self) -> &ReviewBuffer {
        &self.buffer
    }

    /// Mutable buffer access for the loader.
    ///
    /// Entries must only be reserved or filled through this handle; removing
    /// entries behind the session's back breaks the cursor.
    pub fn buffer_mut(&mut self) -> &mut ReviewBuffer {
        &mut self.buffer
    }

    #[must_use]
    pub fn buckets(&self) -> &BucketSet {
        &self.buckets
    }

    #[must_use]
    pub fn thresholds(&self) -> SwipeThresholds {
        self.thresholds
    }

    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Bucket an outcome routes to.
    #[must_use]
    pub fn route_for(&self, outcome: Outcome) -> Option<BucketId> {
        self.routes.get(&outcome).copied()
    }

    /// Whether the lookahead margin is reached at the current cursor.
    #[must_use]
    pub fn needs_more(&self) -> bool {
        self.lookahead.reached(self.cursor, self.buffer.len())
    }

    /// Whether any swipe is still uncommitted.
    #[must_use]
    pub fn has_unsaved_swipes(&self) -> bool {
        self.buckets.has_assignments()
    }

    // =========================================================================
    // Swiping
    // =========================================================================

    #[must_use]
    pub fn classify(&self, vector: GestureVector) -> Outcome {
        self.thresholds.classify(vector)
    }

    /// Classifies a drag and advances exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Complete`] when there is no current entry.
    pub fn swipe(&mut self, vector: GestureVector) -> Result<Advance, SessionError> {
        let outcome = self.classify(vector);
        self.advance(outcome)
    }

    /// Applies an outcome to the current entry and moves the cursor forward.
    ///
    /// An outcome with no routed bucket behaves like a skip.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Complete`] when there is no current entry.
    pub fn advance(&mut self, outcome: Outcome) -> Result<Advance, SessionError> {
        let target = if outcome.is_skip() {
            None
        } else {
            let route = self.route_for(outcome);
            if route.is_none() {
                log::debug!("no bucket routed for {outcome:?}, treating as skip");
            }
            route
        };
        self.advance_into(target)
    }

    /// Advances the current entry into an arbitrary bucket.
    ///
    /// # Errors
    ///
    /// Fails when the review is complete or the bucket is unknown.
    pub fn assign_to(&mut self, bucket: BucketId) -> Result<Advance, SessionError> {
        if self.buckets.get(bucket).is_none() {
            return Err(BucketError::UnknownBucket(bucket).into());
        }
        self.advance_into(Some(bucket))
    }

    fn advance_into(&mut self, target: Option<BucketId>) -> Result<Advance, SessionError> {
        let handle = self
            .current()
            .map(|entry| entry.handle.clone())
            .ok_or(SessionError::Complete)?;

        let displaced_from = match target {
            Some(bucket) => self.buckets.assign(bucket, handle.clone())?,
            None => None,
        };

        self.undo.record_and_push(UndoRecord {
            handle: handle.clone(),
            bucket: target,
            displaced_from,
            prior_cursor: self.cursor,
        });
        self.cursor += 1;

        Ok(Advance {
            handle,
            bucket: target,
            needs_more: self.needs_more(),
        })
    }

    // =========================================================================
    // Undo
    // =========================================================================

    /// Reverts the newest advance.
    ///
    /// Returns `None`, changing nothing, when there is nothing to undo.
    pub fn pop_and_apply(&mut self) -> Option<UndoApplied> {
        let record = self.undo.pop()?;
        let id = record.handle.id();

        if let Some(bucket) = record.bucket {
            self.buckets.remove(bucket, id);
        }
        if let Some(placement) = record.displaced_from {
            self.buckets.restore(placement, record.handle.clone());
        }

        self.cursor = record.prior_cursor.min(self.buffer.len());
        let reinserted = if self.buffer.position_of(id).is_some() {
            None
        } else {
            let slot = self
                .buffer
                .insert(self.cursor, BufferEntry::pending(record.handle.clone()));
            self.cursor = slot;
            Some(slot)
        };

        Some(UndoApplied {
            handle: record.handle,
            cursor: self.cursor,
            reinserted,
        })
    }

    // =========================================================================
    // Bucket management
    // =========================================================================

    /// Creates a bucket.
    ///
    /// # Errors
    ///
    /// Fails on a blank label or a second delete bucket.
    pub fn create_bucket(&mut self, label: &str, kind: BucketKind) -> Result<BucketId, SessionError> {
        Ok(self.buckets.create(label, kind)?)
    }

    /// Routes a swipe outcome into a bucket.
    ///
    /// # Errors
    ///
    /// Fails for [`Outcome::Skip`] and unknown buckets.
    pub fn route(&mut self, outcome: Outcome, bucket: BucketId) -> Result<(), SessionError> {
        if outcome.is_skip() {
            return Err(SessionError::SkipNotRoutable);
        }
        if self.buckets.get(bucket).is_none() {
            return Err(BucketError::UnknownBucket(bucket).into());
        }
        self.routes.insert(outcome, bucket);
        Ok(())
    }

    /// Renames a bucket. Routes and members are unaffected.
    ///
    /// # Errors
    ///
    /// Fails for unknown buckets or blank labels.
    pub fn rename_bucket(&mut self, bucket: BucketId, label: &str) -> Result<(), SessionError> {
        Ok(self.buckets.rename(bucket, label)?)
    }

    /// Moves an already-assigned asset into another bucket.
    ///
    /// # Errors
    ///
    /// Fails when the asset is in no bucket or the target is unknown.
    pub fn move_asset(&mut self, asset: &AssetId, to: BucketId) -> Result<(), SessionError> {
        if self.buckets.get(to).is_none() {
            return Err(BucketError::UnknownBucket(to).into());
        }
        let handle = self
            .buckets
            .iter()
            .flat_map(|b| b.members())
            .find(|h| h.id() == asset)
            .cloned()
            .ok_or_else(|| SessionError::NotAssigned(asset.clone()))?;
        self.buckets.assign(to, handle)?;
        Ok(())
    }

    /// Drops an asset from a bucket. Returns whether it was there.
    pub fn remove_from_bucket(&mut self, bucket: BucketId, asset: &AssetId) -> bool {
        self.buckets.remove(bucket, asset)
    }

    /// Empties every bucket whose commit succeeded; failed buckets keep
    /// their members for a retry.
    ///
    /// The undo history is cleared when anything was committed, since its
    /// records describe bucket contents that no longer exist. Returns the
    /// number of assets released.
    pub fn mark_committed(&mut self, report: &CommitReport) -> usize {
        let released: usize = report
            .succeeded()
            .map(|bucket| self.buckets.drain(bucket).len())
            .sum();
        if released > 0 {
            self.undo.clear();
        }
        released
    }

    /// Resets the cursor and undo history after the buffer was re-filtered.
    pub fn restart(&mut self) {
        self.cursor = 0;
        self.undo.clear();
    }
}
