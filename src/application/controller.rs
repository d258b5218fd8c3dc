// SPDX-License-Identifier: MPL-2.0
//! Review controller: the single owner of a review pass.
//!
//! The controller holds the fetched source snapshot, the loader, the session
//! and the receiving end of the decode completion channel. Decode tasks run on
//! the tokio runtime and only ever talk back through that channel, so every
//! buffer mutation happens here.

use crate::application::commit::{commit, CommitReport};
use crate::application::loader::{
    dispatch, BatchLoader, CompletionOutcome, DecodeCompletion, PreviewRequest,
};
use crate::application::port::{
    AssetSource, AuthorizationGate, CollectionStore, FetchResult, PreviewDecoder,
};
use crate::application::query;
use crate::application::session::{Advance, ReviewSession, SessionError, UndoApplied};
use crate::config::Config;
use crate::domain::bucket::BucketId;
use crate::domain::gesture::GestureVector;
use crate::error::{Error, Result};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Drives one review pass over a library.
pub struct ReviewController {
    source: FetchResult,
    loader: BatchLoader,
    session: ReviewSession,
    decoder: Arc<dyn PreviewDecoder>,
    sender: UnboundedSender<DecodeCompletion>,
    receiver: UnboundedReceiver<DecodeCompletion>,
    in_flight: usize,
}

impl std::fmt::Debug for ReviewController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewController")
            .field("assets", &self.source.count())
            .field("cursor", &self.session.cursor())
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl ReviewController {
    /// Checks access, fetches the library sorted by creation date and
    /// requests the first batch of previews.
    ///
    /// Must be called from within a tokio runtime. An empty library yields a
    /// session that is immediately complete.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthorizationDenied`] when access is refused, or a
    /// session error when the configured buckets are invalid.
    pub async fn open(
        gate: &dyn AuthorizationGate,
        library: &dyn AssetSource,
        decoder: Arc<dyn PreviewDecoder>,
        config: &Config,
    ) -> Result<Self> {
        let access = gate.request_access().await;
        if !access.allows_reading() {
            log::warn!("photo library access denied");
            return Err(Error::AuthorizationDenied);
        }

        let source = library.fetch_sorted(&config.fetch_options());
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut controller = Self {
            source,
            loader: config.build_loader(),
            session: config.build_session()?,
            decoder,
            sender,
            receiver,
            in_flight: 0,
        };

        log::info!(
            "opened review of {} assets ({access:?} access)",
            controller.source.count()
        );
        controller.load_more();
        Ok(controller)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn session(&self) -> &ReviewSession {
        &self.session
    }

    /// Mutable session access for bucket management.
    pub fn session_mut(&mut self) -> &mut ReviewSession {
        &mut self.session
    }

    /// The sorted snapshot being reviewed.
    #[must_use]
    pub fn source(&self) -> &FetchResult {
        &self.source
    }

    #[must_use]
    pub fn loader(&self) -> &BatchLoader {
        &self.loader
    }

    /// Decode requests not yet answered.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    #[must_use]
    pub fn has_unsaved_swipes(&self) -> bool {
        self.session.has_unsaved_swipes()
    }

    // =========================================================================
    // Paging
    // =========================================================================

    /// Requests the next batch. Returns the number of previews requested.
    pub fn load_more(&mut self) -> usize {
        let requests = self
            .loader
            .load_next(&self.source, self.session.buffer_mut());
        self.send(requests)
    }

    fn send(&mut self, requests: Vec<PreviewRequest>) -> usize {
        let count = requests.len();
        self.in_flight += count;
        dispatch(requests, Arc::clone(&self.decoder), &self.sender);
        count
    }

    fn after_advance(&mut self, advance: &Advance) {
        if advance.needs_more && !self.loader.is_exhausted(&self.source) {
            self.load_more();
        }
    }

    // =========================================================================
    // Review
    // =========================================================================

    /// Classifies a drag, advances and pages in more assets when needed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Complete`] when nothing is left to review.
    pub fn swipe(&mut self, vector: GestureVector) -> std::result::Result<Advance, SessionError> {
        let advance = self.session.swipe(vector)?;
        self.after_advance(&advance);
        Ok(advance)
    }

    /// Advances the current asset into a specific bucket.
    ///
    /// # Errors
    ///
    /// Fails when the review is complete or the bucket is unknown.
    pub fn assign_to(&mut self, bucket: BucketId) -> std::result::Result<Advance, SessionError> {
        let advance = self.session.assign_to(bucket)?;
        self.after_advance(&advance);
        Ok(advance)
    }

    /// Reverts the last advance, re-requesting a preview when the asset had
    /// to be put back into the buffer.
    pub fn undo(&mut self) -> Option<UndoApplied> {
        let undone = self.session.pop_and_apply()?;
        if let Some(slot) = undone.reinserted {
            if let Some(request) = self.loader.request_for(self.session.buffer(), slot) {
                self.send(vec![request]);
            }
        }
        Some(undone)
    }

    // =========================================================================
    // Completions
    // =========================================================================

    fn apply(&mut self, completion: DecodeCompletion) -> CompletionOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loader.apply(completion, self.session.buffer_mut())
    }

    /// Applies every completion that has already arrived, without waiting.
    /// Returns how many were applied (stale ones included).
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.receiver.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Waits for the next completion and applies it.
    ///
    /// Returns `None` immediately when no request is in flight.
    pub async fn next_completion(&mut self) -> Option<CompletionOutcome> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.receiver.recv().await?;
        Some(self.apply(completion))
    }

    /// Waits until every in-flight request has been answered.
    pub async fn settle(&mut self) {
        while self.next_completion().await.is_some() {}
    }

    // =========================================================================
    // Re-filter and commit
    // =========================================================================

    /// Removes every asset that already belongs to an album from the review.
    ///
    /// Loaded previews are kept, pending ones are re-requested, the cursor
    /// returns to the first entry and the undo history is cleared. Returns
    /// the number of buffer entries removed.
    ///
    /// # Errors
    ///
    /// Propagates the store's error; the review is unchanged in that case.
    pub async fn hide_collected(&mut self, store: &dyn CollectionStore) -> Result<usize> {
        let collected = query::collected_asset_ids(store).await?;
        let before = self.session.buffer().len();

        let requests = self
            .loader
            .rebuild_excluding(collected, self.session.buffer_mut());
        self.session.restart();
        self.send(requests);

        let removed = before - self.session.buffer().len();
        log::info!("hid {removed} already-collected assets");

        if self.session.needs_more() && !self.loader.is_exhausted(&self.source) {
            self.load_more();
        }
        Ok(removed)
    }

    /// Commits every non-empty bucket; successful buckets are emptied.
    pub async fn commit(&mut self, store: &dyn CollectionStore) -> CommitReport {
        let report = commit(store, self.session.buckets()).await;
        let released = self.session.mark_committed(&report);
        log::debug!("released {released} assets after commit");
        report
    }
}
