// SPDX-License-Identifier: MPL-2.0
//! Buckets accumulated during a review pass.
//!
//! A bucket is identified by a stable [`BucketId`]; its label is display text
//! that can be renamed freely. Two buckets with the same label stay distinct.
//! An asset belongs to at most one bucket at any time.

use crate::domain::asset::{AssetHandle, AssetId};
use std::fmt;
use thiserror::Error;

/// Stable identifier of a bucket within a [`BucketSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketId(u32);

impl BucketId {
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bucket#{}", self.0)
    }
}

/// What committing a bucket does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketKind {
    /// Members are deleted from the library. At most one per set.
    Delete,
    /// Members are added to the album whose title equals the label.
    Collection,
}

/// Errors raised by bucket bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BucketError {
    #[error("unknown bucket: {0}")]
    UnknownBucket(BucketId),

    #[error("a delete bucket already exists ({0})")]
    DuplicateDeleteBucket(BucketId),

    #[error("bucket label must not be empty")]
    EmptyLabel,
}

/// Named group of assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    id: BucketId,
    label: String,
    kind: BucketKind,
    members: Vec<AssetHandle>,
}

impl Bucket {
    #[must_use]
    pub fn id(&self) -> BucketId {
        self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn kind(&self) -> BucketKind {
        self.kind
    }

    /// Members in assignment order.
    #[must_use]
    pub fn members(&self) -> &[AssetHandle] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &AssetId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: &AssetId) -> Option<usize> {
        self.members.iter().position(|m| m.id() == id)
    }
}

/// Where an asset was taken from when it moved buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub bucket: BucketId,
    pub index: usize,
}

/// Ordered set of buckets enforcing single membership per asset.
///
/// # Example
///
/// ```
/// use photo_swipe::domain::asset::{AssetHandle, AssetId};
/// use photo_swipe::domain::bucket::{BucketKind, BucketSet};
///
/// let mut buckets = BucketSet::new();
/// let keep = buckets.create("Keep", BucketKind::Collection).unwrap();
/// let later = buckets.create("Later", BucketKind::Collection).unwrap();
/// let photo = AssetHandle::new(AssetId::new("a"), 0, None);
///
/// buckets.assign(keep, photo.clone()).unwrap();
/// buckets.assign(later, photo.clone()).unwrap();
///
/// assert_eq!(buckets.bucket_of(photo.id()), Some(later));
/// assert!(buckets.get(keep).unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketSet {
    buckets: Vec<Bucket>,
    next_id: u32,
}

impl BucketSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty bucket and returns its id.
    ///
    /// # Errors
    ///
    /// Fails on a blank label, or when a second [`BucketKind::Delete`] bucket
    /// is requested.
    pub fn create(&mut self, label: &str, kind: BucketKind) -> Result<BucketId, BucketError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(BucketError::EmptyLabel);
        }
        if kind == BucketKind::Delete {
            if let Some(existing) = self.delete_bucket() {
                return Err(BucketError::DuplicateDeleteBucket(existing));
            }
        }

        let id = BucketId(self.next_id);
        self.next_id += 1;
        self.buckets.push(Bucket {
            id,
            label: label.to_string(),
            kind,
            members: Vec::new(),
        });
        Ok(id)
    }

    /// Changes a bucket's display label. The id is unaffected.
    ///
    /// # Errors
    ///
    /// Fails for unknown buckets or blank labels.
    pub fn rename(&mut self, id: BucketId, label: &str) -> Result<(), BucketError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(BucketError::EmptyLabel);
        }
        self.get_mut(id)?.label = label.to_string();
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: BucketId) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.id == id)
    }

    fn get_mut(&mut self, id: BucketId) -> Result<&mut Bucket, BucketError> {
        self.buckets
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(BucketError::UnknownBucket(id))
    }

    /// Buckets in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// The reserved delete bucket, if one was created.
    #[must_use]
    pub fn delete_bucket(&self) -> Option<BucketId> {
        self.buckets
            .iter()
            .find(|b| b.kind == BucketKind::Delete)
            .map(|b| b.id)
    }

    /// Bucket currently holding the asset.
    #[must_use]
    pub fn bucket_of(&self, asset: &AssetId) -> Option<BucketId> {
        self.locate(asset).map(|p| p.bucket)
    }

    fn locate(&self, asset: &AssetId) -> Option<Placement> {
        self.buckets.iter().find_map(|b| {
            b.position(asset).map(|index| Placement {
                bucket: b.id,
                index,
            })
        })
    }

    /// Total number of assigned assets across all buckets.
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }

    /// Whether any bucket holds an asset.
    #[must_use]
    pub fn has_assignments(&self) -> bool {
        self.buckets.iter().any(|b| !b.is_empty())
    }

    /// Appends `asset` to `target`, first removing it from whatever bucket
    /// held it. Returns the previous placement, if any.
    ///
    /// # Errors
    ///
    /// Fails when `target` is unknown; nothing is moved in that case.
    pub fn assign(
        &mut self,
        target: BucketId,
        asset: AssetHandle,
    ) -> Result<Option<Placement>, BucketError> {
        if self.get(target).is_none() {
            return Err(BucketError::UnknownBucket(target));
        }

        let previous = self.take(asset.id());
        self.get_mut(target)?.members.push(asset);
        Ok(previous)
    }

    /// Removes `asset` from whichever bucket holds it.
    pub fn take(&mut self, asset: &AssetId) -> Option<Placement> {
        let placement = self.locate(asset)?;
        if let Ok(bucket) = self.get_mut(placement.bucket) {
            bucket.members.remove(placement.index);
        }
        Some(placement)
    }

    /// Removes `asset` from `bucket` only. Returns whether it was there.
    pub fn remove(&mut self, bucket: BucketId, asset: &AssetId) -> bool {
        let Ok(bucket) = self.get_mut(bucket) else {
            return false;
        };
        match bucket.position(asset) {
            Some(index) => {
                bucket.members.remove(index);
                true
            }
            None => false,
        }
    }

    /// Puts `asset` back at a previous placement (index clamped to the
    /// bucket length). Any other membership of the asset is removed first.
    pub fn restore(&mut self, placement: Placement, asset: AssetHandle) {
        self.take(asset.id());
        if let Ok(bucket) = self.get_mut(placement.bucket) {
            let index = placement.index.min(bucket.members.len());
            bucket.members.insert(index, asset);
        }
    }

    /// Empties a bucket, returning its former members.
    pub fn drain(&mut self, id: BucketId) -> Vec<AssetHandle> {
        self.get_mut(id)
            .map(|b| std::mem::take(&mut b.members))
            .unwrap_or_default()
    }

    /// Ids of every assigned asset.
    pub fn assigned_ids(&self) -> impl Iterator<Item = &AssetId> {
        self.buckets
            .iter()
            .flat_map(|b| b.members.iter().map(AssetHandle::id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(id: &str) -> AssetHandle {
        AssetHandle::new(AssetId::new(id), 0, None)
    }

    #[test]
    fn reassigning_moves_asset() {
        let mut set = BucketSet::new();
        let a = set.create("A", BucketKind::Collection).unwrap();
        let b = set.create("B", BucketKind::Collection).unwrap();

        assert_eq!(set.assign(a, handle("x")).unwrap(), None);
        let previous = set.assign(b, handle("x")).unwrap();

        assert_eq!(previous, Some(Placement { bucket: a, index: 0 }));
        assert!(set.get(a).unwrap().is_empty());
        assert_eq!(set.get(b).unwrap().len(), 1);
        assert_eq!(set.assigned_count(), 1);
    }

    #[test]
    fn assign_to_unknown_bucket_leaves_state_untouched() {
        let mut set = BucketSet::new();
        let a = set.create("A", BucketKind::Collection).unwrap();
        set.assign(a, handle("x")).unwrap();

        let ghost = BucketId(99);
        assert_eq!(
            set.assign(ghost, handle("x")),
            Err(BucketError::UnknownBucket(ghost))
        );
        assert_eq!(set.bucket_of(&AssetId::new("x")), Some(a));
    }

    #[test]
    fn only_one_delete_bucket() {
        let mut set = BucketSet::new();
        let delete = set.create("Trash", BucketKind::Delete).unwrap();
        assert_eq!(
            set.create("Trash 2", BucketKind::Delete),
            Err(BucketError::DuplicateDeleteBucket(delete))
        );
        assert_eq!(set.delete_bucket(), Some(delete));
    }

    #[test]
    fn renaming_keeps_ids_distinct_for_equal_labels() {
        let mut set = BucketSet::new();
        let a = set.create("Trip", BucketKind::Collection).unwrap();
        let b = set.create("Family", BucketKind::Collection).unwrap();
        set.rename(b, "Trip").unwrap();

        set.assign(a, handle("x")).unwrap();
        set.assign(b, handle("y")).unwrap();

        assert_ne!(a, b);
        assert_eq!(set.get(a).unwrap().members()[0].id().as_str(), "x");
        assert_eq!(set.get(b).unwrap().members()[0].id().as_str(), "y");
    }

    #[test]
    fn blank_labels_are_rejected() {
        let mut set = BucketSet::new();
        assert_eq!(
            set.create("   ", BucketKind::Collection),
            Err(BucketError::EmptyLabel)
        );
        let a = set.create(" Keep ", BucketKind::Collection).unwrap();
        assert_eq!(set.get(a).unwrap().label(), "Keep");
        assert_eq!(set.rename(a, ""), Err(BucketError::EmptyLabel));
    }

    #[test]
    fn restore_reinserts_at_previous_index() {
        let mut set = BucketSet::new();
        let a = set.create("A", BucketKind::Collection).unwrap();
        let b = set.create("B", BucketKind::Collection).unwrap();
        set.assign(a, handle("1")).unwrap();
        set.assign(a, handle("2")).unwrap();
        set.assign(a, handle("3")).unwrap();

        let previous = set.assign(b, handle("2")).unwrap().unwrap();
        set.restore(previous, handle("2"));

        let ids: Vec<_> = set
            .get(a)
            .unwrap()
            .members()
            .iter()
            .map(|h| h.id().as_str().to_string())
            .collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert!(set.get(b).unwrap().is_empty());
    }

    #[test]
    fn drain_empties_bucket() {
        let mut set = BucketSet::new();
        let a = set.create("A", BucketKind::Collection).unwrap();
        set.assign(a, handle("1")).unwrap();
        assert_eq!(set.drain(a).len(), 1);
        assert!(!set.has_assignments());
    }
}
