// SPDX-License-Identifier: MPL-2.0
//! Asset library port definitions.
//!
//! [`AssetSource`] is the ordered, externally-owned collection of photos.
//! [`AuthorizationGate`] models the platform's photo-library permission prompt,
//! which must be consulted before any source is read.

use crate::domain::asset::AssetHandle;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;

// =============================================================================
// Fetch options
// =============================================================================

/// Sort and limit applied by [`AssetSource::fetch_sorted`].
///
/// Assets are always sorted by creation date. Undated assets go last in both
/// directions; ties break on the asset id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Oldest first when `true`, newest first otherwise.
    pub ascending: bool,
    /// Maximum number of assets returned.
    pub limit: Option<usize>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            ascending: false,
            limit: None,
        }
    }
}

impl FetchOptions {
    /// Newest-first fetch without limit.
    #[must_use]
    pub fn newest_first() -> Self {
        Self::default()
    }

    /// Oldest-first fetch without limit.
    #[must_use]
    pub fn oldest_first() -> Self {
        Self {
            ascending: true,
            limit: None,
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn compare(&self, a: &AssetHandle, b: &AssetHandle) -> Ordering {
        let by_date = match (a.created(), b.created()) {
            (Some(x), Some(y)) if self.ascending => x.cmp(&y),
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_date.then_with(|| a.id().cmp(b.id()))
    }
}

// =============================================================================
// AssetSource trait
// =============================================================================

/// Port for an ordered collection of assets.
///
/// Implementations must be cheap to query by index; the loader reads one
/// handle at a time as it pages.
pub trait AssetSource: Send + Sync {
    /// Number of assets in the collection.
    fn count(&self) -> usize;

    /// Handle at `index`, or `None` past the end.
    fn asset_at(&self, index: usize) -> Option<AssetHandle>;

    /// Returns a sorted snapshot of this source.
    ///
    /// The default implementation reads every handle and sorts in memory.
    fn fetch_sorted(&self, options: &FetchOptions) -> FetchResult {
        let mut assets: Vec<AssetHandle> =
            (0..self.count()).filter_map(|i| self.asset_at(i)).collect();
        assets.sort_by(|a, b| options.compare(a, b));
        if let Some(limit) = options.limit {
            assets.truncate(limit);
        }
        FetchResult::new(assets)
    }

    /// Whether the source holds no assets.
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Immutable snapshot produced by a fetch.
///
/// Ordinals are re-assigned to match the snapshot order. Cloning is cheap.
#[derive(Debug, Clone, Default)]
pub struct FetchResult {
    assets: Arc<[AssetHandle]>,
}

impl FetchResult {
    /// Builds a snapshot, re-numbering ordinals from zero.
    #[must_use]
    pub fn new(assets: Vec<AssetHandle>) -> Self {
        let assets: Vec<AssetHandle> = assets
            .iter()
            .enumerate()
            .map(|(i, a)| a.with_ordinal(i))
            .collect();
        Self {
            assets: assets.into(),
        }
    }

    /// Handles in snapshot order.
    #[must_use]
    pub fn as_slice(&self) -> &[AssetHandle] {
        &self.assets
    }
}

impl AssetSource for FetchResult {
    fn count(&self) -> usize {
        self.assets.len()
    }

    fn asset_at(&self, index: usize) -> Option<AssetHandle> {
        self.assets.get(index).cloned()
    }
}

// =============================================================================
// Authorization
// =============================================================================

/// Answer of the photo-library permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    /// Full library access.
    Granted,
    /// Access to a user-selected subset.
    Limited,
    /// No access; the review cannot start.
    Denied,
}

impl AccessStatus {
    /// `Granted` and `Limited` both allow reading the library.
    #[must_use]
    pub fn allows_reading(self) -> bool {
        matches!(self, AccessStatus::Granted | AccessStatus::Limited)
    }
}

/// Port for the library permission prompt.
#[async_trait]
pub trait AuthorizationGate: Send + Sync {
    /// Requests (or re-reads) library access.
    async fn request_access(&self) -> AccessStatus;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::AssetId;
    use std::time::{Duration, SystemTime};

    fn at(id: &str, secs: Option<u64>) -> AssetHandle {
        let created = secs.map(|s| SystemTime::UNIX_EPOCH + Duration::from_secs(s));
        AssetHandle::new(AssetId::new(id), 99, created)
    }

    fn ids(result: &FetchResult) -> Vec<&str> {
        result.as_slice().iter().map(|a| a.id().as_str()).collect()
    }

    fn source() -> FetchResult {
        FetchResult::new(vec![
            at("b", Some(20)),
            at("undated", None),
            at("a", Some(10)),
            at("c", Some(30)),
            at("a2", Some(10)),
        ])
    }

    #[test]
    fn fetch_sorted_newest_first_puts_undated_last() {
        let sorted = source().fetch_sorted(&FetchOptions::newest_first());
        assert_eq!(ids(&sorted), ["c", "b", "a", "a2", "undated"]);
    }

    #[test]
    fn fetch_sorted_oldest_first_puts_undated_last() {
        let sorted = source().fetch_sorted(&FetchOptions::oldest_first());
        assert_eq!(ids(&sorted), ["a", "a2", "b", "c", "undated"]);
    }

    #[test]
    fn fetch_sorted_respects_limit_and_renumbers() {
        let sorted = source().fetch_sorted(&FetchOptions::oldest_first().with_limit(2));
        assert_eq!(sorted.count(), 2);
        let ordinals: Vec<_> = sorted.as_slice().iter().map(AssetHandle::ordinal).collect();
        assert_eq!(ordinals, [0, 1]);
    }

    #[test]
    fn asset_at_past_end_is_none() {
        let result = source();
        assert!(result.asset_at(5).is_none());
        assert!(!result.is_empty());
        assert!(FetchResult::default().is_empty());
    }

    #[test]
    fn access_status_reading_rules() {
        assert!(AccessStatus::Granted.allows_reading());
        assert!(AccessStatus::Limited.allows_reading());
        assert!(!AccessStatus::Denied.allows_reading());
    }
}
