// SPDX-License-Identifier: MPL-2.0
//! Batch loader paging an [`AssetSource`] into the [`ReviewBuffer`].
//!
//! # Design
//!
//! - **Slot-keyed**: every request carries the buffer slot it was reserved
//!   for, so previews land in source order whatever the decode latency
//! - **Epoch-tagged**: a re-filter bumps the epoch; completions from an older
//!   epoch are dropped instead of resurrecting removed entries
//! - **No cancellation**: in-flight decodes always run to completion
//!
//! # Usage
//!
//! ```ignore
//! let requests = loader.load_next_batch(&source, &mut buffer, BatchSize::default());
//! dispatch(requests, Arc::clone(&decoder), &sender);
//!
//! // later, on the owning task
//! while let Ok(completion) = receiver.try_recv() {
//!     loader.apply(completion, &mut buffer);
//! }
//! ```

use crate::application::buffer::{BufferEntry, PreviewSlot, ReviewBuffer};
use crate::application::port::{AssetSource, DecodeError, PreviewDecoder};
use crate::domain::asset::{AssetHandle, AssetId};
use crate::domain::newtypes::BatchSize;
use crate::domain::preview::{ContentMode, PreviewImage, TargetSize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Size and fitting of requested previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSettings {
    pub target: TargetSize,
    pub mode: ContentMode,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            target: TargetSize::square(crate::config::defaults::DEFAULT_PREVIEW_EDGE),
            mode: ContentMode::AspectFit,
        }
    }
}

/// A decode request bound to a buffer slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub epoch: u64,
    pub slot: usize,
    pub asset: AssetHandle,
    pub target: TargetSize,
    pub mode: ContentMode,
}

/// Result of a decode request, sent back to the owner of the buffer.
#[derive(Debug, Clone)]
pub struct DecodeCompletion {
    pub epoch: u64,
    pub slot: usize,
    pub asset: AssetId,
    pub result: Result<PreviewImage, DecodeError>,
}

/// What [`BatchLoader::apply`] did with a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The preview was stored in `slot`.
    Applied { slot: usize },
    /// The decoder failed; `slot` now shows a placeholder.
    Failed { slot: usize, error: DecodeError },
    /// The completion belonged to a superseded epoch or a removed entry.
    Stale,
}

/// Pages through a source in fixed-size windows.
#[derive(Debug, Clone)]
pub struct BatchLoader {
    fetch_cursor: usize,
    epoch: u64,
    window: BatchSize,
    excluded: HashSet<AssetId>,
    settings: PreviewSettings,
}

impl Default for BatchLoader {
    fn default() -> Self {
        Self::new(BatchSize::default(), PreviewSettings::default())
    }
}

impl BatchLoader {
    #[must_use]
    pub fn new(window: BatchSize, settings: PreviewSettings) -> Self {
        Self {
            fetch_cursor: 0,
            epoch: 0,
            window,
            excluded: HashSet::new(),
            settings,
        }
    }

    /// Next source index to be fetched.
    #[must_use]
    pub fn fetch_cursor(&self) -> usize {
        self.fetch_cursor
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Configured window size.
    #[must_use]
    pub fn window(&self) -> BatchSize {
        self.window
    }

    /// Whether every source index has been fetched.
    #[must_use]
    pub fn is_exhausted<S: AssetSource + ?Sized>(&self, source: &S) -> bool {
        self.fetch_cursor >= source.count()
    }

    /// Reserves up to `window` new slots and returns their decode requests.
    ///
    /// Excluded assets are skipped without taking a slot. Calling this once
    /// the source is exhausted is a no-op.
    pub fn load_next_batch<S: AssetSource + ?Sized>(
        &mut self,
        source: &S,
        buffer: &mut ReviewBuffer,
        window: BatchSize,
    ) -> Vec<PreviewRequest> {
        let total = source.count();
        if self.fetch_cursor >= total {
            return Vec::new();
        }

        let mut requests = Vec::with_capacity(window.value());
        while requests.len() < window.value() && self.fetch_cursor < total {
            let index = self.fetch_cursor;
            self.fetch_cursor += 1;

            let Some(handle) = source.asset_at(index) else {
                continue;
            };
            if self.excluded.contains(handle.id()) {
                continue;
            }

            let slot = buffer.reserve(handle.clone());
            requests.push(self.request(slot, handle));
        }

        log::debug!(
            "paged in {} assets (fetch cursor {}/{}, epoch {})",
            requests.len(),
            self.fetch_cursor,
            total,
            self.epoch
        );
        requests
    }

    /// [`Self::load_next_batch`] with the configured window.
    pub fn load_next<S: AssetSource + ?Sized>(
        &mut self,
        source: &S,
        buffer: &mut ReviewBuffer,
    ) -> Vec<PreviewRequest> {
        self.load_next_batch(source, buffer, self.window)
    }

    /// Builds a fresh request for an existing slot (e.g. after an undo
    /// re-inserted the entry).
    #[must_use]
    pub fn request_for(&self, buffer: &ReviewBuffer, slot: usize) -> Option<PreviewRequest> {
        buffer
            .get(slot)
            .map(|entry| self.request(slot, entry.handle.clone()))
    }

    fn request(&self, slot: usize, asset: AssetHandle) -> PreviewRequest {
        PreviewRequest {
            epoch: self.epoch,
            slot,
            asset,
            target: self.settings.target,
            mode: self.settings.mode,
        }
    }

    /// Writes a completion into the buffer.
    ///
    /// The completion lands in its reserved slot when that slot still holds
    /// the asset; otherwise the asset is looked up by id. Completions from an
    /// older epoch, or for assets no longer in the buffer, are dropped.
    pub fn apply(
        &self,
        completion: DecodeCompletion,
        buffer: &mut ReviewBuffer,
    ) -> CompletionOutcome {
        if completion.epoch != self.epoch {
            log::debug!(
                "dropping stale preview for {} (epoch {} < {})",
                completion.asset,
                completion.epoch,
                self.epoch
            );
            return CompletionOutcome::Stale;
        }

        let slot = if buffer.slot_holds(completion.slot, &completion.asset) {
            completion.slot
        } else if let Some(slot) = buffer.position_of(&completion.asset) {
            slot
        } else {
            log::warn!(
                "dropping preview for {}: no longer in the review buffer",
                completion.asset
            );
            return CompletionOutcome::Stale;
        };

        match completion.result {
            Ok(image) => {
                buffer.fill(slot, PreviewSlot::Ready(image));
                CompletionOutcome::Applied { slot }
            }
            Err(error) => {
                log::warn!("preview decode failed for {}: {error}", completion.asset);
                buffer.fill(slot, PreviewSlot::Failed);
                CompletionOutcome::Failed { slot, error }
            }
        }
    }

    /// Rebuilds the buffer without `excluded` assets.
    ///
    /// Starts a new epoch. Entries that already have a preview keep it;
    /// pending entries are re-requested under the new epoch, and the
    /// returned requests must be dispatched. Later batches skip the excluded
    /// assets too.
    pub fn rebuild_excluding(
        &mut self,
        excluded: HashSet<AssetId>,
        buffer: &mut ReviewBuffer,
    ) -> Vec<PreviewRequest> {
        self.epoch += 1;
        self.excluded.extend(excluded);

        let kept: Vec<BufferEntry> = buffer
            .take_all()
            .into_iter()
            .filter(|entry| !self.excluded.contains(entry.handle.id()))
            .collect();
        buffer.rebuild(kept);

        let requests: Vec<PreviewRequest> = buffer
            .pending_slots()
            .into_iter()
            .filter_map(|slot| self.request_for(buffer, slot))
            .collect();

        log::debug!(
            "rebuilt review buffer: {} entries kept, {} previews re-requested (epoch {})",
            buffer.len(),
            requests.len(),
            self.epoch
        );
        requests
    }

    /// Whether `asset` is filtered out of this review.
    #[must_use]
    pub fn is_excluded(&self, asset: &AssetId) -> bool {
        self.excluded.contains(asset)
    }
}

/// Spawns one decode task per request on the current tokio runtime.
///
/// Each task sends its [`DecodeCompletion`] through `sender`; the receiving
/// side owns the buffer and applies completions one at a time.
pub fn dispatch(
    requests: Vec<PreviewRequest>,
    decoder: Arc<dyn PreviewDecoder>,
    sender: &UnboundedSender<DecodeCompletion>,
) {
    for request in requests {
        let decoder = Arc::clone(&decoder);
        let sender = sender.clone();
        tokio::spawn(async move {
            let result = decoder
                .request_preview(&request.asset, request.target, request.mode)
                .await;
            let completion = DecodeCompletion {
                epoch: request.epoch,
                slot: request.slot,
                asset: request.asset.id().clone(),
                result,
            };
            if sender.send(completion).is_err() {
                log::debug!(
                    "review closed before preview of {} arrived",
                    request.asset.id()
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::FetchResult;

    fn source(n: usize) -> FetchResult {
        FetchResult::new(
            (0..n)
                .map(|i| AssetHandle::new(AssetId::new(format!("a{i}")), i, None))
                .collect(),
        )
    }

    fn completion(loader: &BatchLoader, slot: usize, id: &str) -> DecodeCompletion {
        DecodeCompletion {
            epoch: loader.epoch(),
            slot,
            asset: AssetId::new(id),
            result: Ok(PreviewImage::from_rgba(1, 1, vec![9; 4])),
        }
    }

    #[test]
    fn pages_in_fixed_windows_until_exhausted() {
        let source = source(7);
        let mut buffer = ReviewBuffer::new();
        let mut loader = BatchLoader::default();

        assert_eq!(loader.load_next_batch(&source, &mut buffer, BatchSize::new(3)).len(), 3);
        assert_eq!(loader.load_next_batch(&source, &mut buffer, BatchSize::new(3)).len(), 3);
        assert_eq!(loader.load_next_batch(&source, &mut buffer, BatchSize::new(3)).len(), 1);
        assert!(loader.is_exhausted(&source));
        assert_eq!(buffer.len(), 7);
    }

    #[test]
    fn loading_when_exhausted_is_noop() {
        let source = source(2);
        let mut buffer = ReviewBuffer::new();
        let mut loader = BatchLoader::default();
        loader.load_next(&source, &mut buffer);
        let before = buffer.clone();

        assert!(loader.load_next(&source, &mut buffer).is_empty());
        assert_eq!(buffer, before);
        assert_eq!(loader.fetch_cursor(), 2);
    }

    #[test]
    fn requests_carry_their_slot() {
        let source = source(4);
        let mut buffer = ReviewBuffer::new();
        let mut loader = BatchLoader::default();
        let requests = loader.load_next(&source, &mut buffer);

        for (i, request) in requests.iter().enumerate() {
            assert_eq!(request.slot, i);
            assert_eq!(request.asset.id(), buffer.get(i).unwrap().handle.id());
        }
    }

    #[test]
    fn out_of_order_completions_land_in_source_order() {
        let source = source(3);
        let mut buffer = ReviewBuffer::new();
        let mut loader = BatchLoader::default();
        loader.load_next(&source, &mut buffer);

        for (slot, id) in [(2, "a2"), (0, "a0"), (1, "a1")] {
            let outcome = loader.apply(completion(&loader, slot, id), &mut buffer);
            assert_eq!(outcome, CompletionOutcome::Applied { slot });
        }
        let ids: Vec<_> = buffer.iter().map(|e| e.handle.id().as_str()).collect();
        assert_eq!(ids, ["a0", "a1", "a2"]);
        assert!(buffer.pending_slots().is_empty());
    }

    #[test]
    fn failed_decode_marks_slot_failed() {
        let source = source(1);
        let mut buffer = ReviewBuffer::new();
        let mut loader = BatchLoader::default();
        loader.load_next(&source, &mut buffer);

        let mut failed = completion(&loader, 0, "a0");
        failed.result = Err(DecodeError::Corrupted("truncated".into()));
        let outcome = loader.apply(failed, &mut buffer);

        assert!(matches!(outcome, CompletionOutcome::Failed { slot: 0, .. }));
        assert_eq!(buffer.get(0).unwrap().preview, PreviewSlot::Failed);
    }

    #[test]
    fn stale_epoch_completions_are_dropped() {
        let source = source(3);
        let mut buffer = ReviewBuffer::new();
        let mut loader = BatchLoader::default();
        loader.load_next(&source, &mut buffer);
        let old = completion(&loader, 0, "a0");

        let excluded: HashSet<_> = [AssetId::new("a1")].into_iter().collect();
        let reissued = loader.rebuild_excluding(excluded, &mut buffer);
        assert_eq!(reissued.len(), 2);
        assert!(reissued.iter().all(|r| r.epoch == loader.epoch()));

        assert_eq!(loader.apply(old, &mut buffer), CompletionOutcome::Stale);
        assert!(buffer.get(0).unwrap().preview.is_pending());
    }

    #[test]
    fn completion_for_removed_asset_does_not_resurrect_it() {
        let source = source(2);
        let mut buffer = ReviewBuffer::new();
        let mut loader = BatchLoader::default();
        loader.load_next(&source, &mut buffer);

        let excluded: HashSet<_> = [AssetId::new("a0")].into_iter().collect();
        loader.rebuild_excluding(excluded, &mut buffer);

        // Same epoch, but the asset is gone.
        let late = completion(&loader, 0, "a0");
        assert_eq!(loader.apply(late, &mut buffer), CompletionOutcome::Stale);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.get(0).unwrap().handle.id().as_str(), "a1");
    }

    #[test]
    fn shifted_slot_is_found_by_id() {
        let source = source(2);
        let mut buffer = ReviewBuffer::new();
        let mut loader = BatchLoader::default();
        loader.load_next(&source, &mut buffer);
        let handle = AssetHandle::new(AssetId::new("extra"), 9, None);
        buffer.insert(0, BufferEntry::pending(handle));

        let outcome = loader.apply(completion(&loader, 1, "a1"), &mut buffer);
        assert_eq!(outcome, CompletionOutcome::Applied { slot: 2 });
    }

    #[test]
    fn excluded_assets_are_skipped_in_later_batches() {
        let source = source(6);
        let mut buffer = ReviewBuffer::new();
        let mut loader = BatchLoader::new(BatchSize::new(2), PreviewSettings::default());
        loader.load_next(&source, &mut buffer);

        let excluded: HashSet<_> = [AssetId::new("a2"), AssetId::new("a3")]
            .into_iter()
            .collect();
        loader.rebuild_excluding(excluded, &mut buffer);
        let requests = loader.load_next(&source, &mut buffer);

        let ids: Vec<_> = requests.iter().map(|r| r.asset.id().as_str()).collect();
        assert_eq!(ids, ["a4", "a5"]);
        assert!(loader.is_excluded(&AssetId::new("a2")));
        assert!(loader.is_exhausted(&source));
    }
}
