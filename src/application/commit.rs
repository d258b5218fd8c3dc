// SPDX-License-Identifier: MPL-2.0
//! Commit phase: turns the review buckets into library mutations.
//!
//! Albums are listed once. Collection buckets are grouped by label so a
//! missing album is created exactly once even when two buckets share its
//! title; each bucket still receives its own result. The delete bucket issues
//! a single batch delete. Groups run concurrently and independently, with no
//! rollback: a failed bucket is reported and left intact for a retry.

use crate::application::port::{CollectionStore, StoreError};
use crate::domain::asset::AssetHandle;
use crate::domain::bucket::{BucketId, BucketKind, BucketSet};
use crate::domain::collection::{CollectionHandle, CollectionId, CollectionKind};
use futures_util::future::{self, BoxFuture, FutureExt};
use std::collections::BTreeMap;
use thiserror::Error;

/// What a successful bucket commit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The album did not exist; it was created and the members added.
    Created {
        collection: CollectionId,
        added: usize,
    },
    /// Members were added to an existing album.
    Added {
        collection: CollectionId,
        added: usize,
    },
    /// Members were deleted from the library.
    Deleted { count: usize },
}

/// Why a bucket could not be committed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("could not list albums: {0}")]
    ListFailed(StoreError),

    #[error("could not create album \"{label}\": {source}")]
    CreateFailed { label: String, source: StoreError },

    #[error("could not add {count} assets to \"{label}\": {source}")]
    AddFailed {
        label: String,
        count: usize,
        source: StoreError,
    },

    #[error("could not delete {count} assets: {source}")]
    DeleteFailed { count: usize, source: StoreError },
}

pub type BucketResult = Result<CommitOutcome, CommitError>;

/// Per-bucket results of a commit. Empty buckets are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    results: BTreeMap<BucketId, BucketResult>,
}

impl CommitReport {
    #[must_use]
    pub fn get(&self, bucket: BucketId) -> Option<&BucketResult> {
        self.results.get(&bucket)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BucketId, &BucketResult)> {
        self.results.iter().map(|(id, result)| (*id, result))
    }

    /// Buckets whose commit succeeded.
    pub fn succeeded(&self) -> impl Iterator<Item = BucketId> + '_ {
        self.iter()
            .filter(|(_, result)| result.is_ok())
            .map(|(id, _)| id)
    }

    /// Buckets whose commit failed, with the reason.
    pub fn failed(&self) -> impl Iterator<Item = (BucketId, &CommitError)> {
        self.iter()
            .filter_map(|(id, result)| result.as_ref().err().map(|e| (id, e)))
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.results.values().all(Result::is_ok)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Owned snapshot of the non-empty buckets to commit.
///
/// Taking a snapshot lets the caller keep mutating the session while the
/// commit is in flight.
#[derive(Debug, Clone, Default)]
pub struct CommitPlan {
    /// Collection buckets grouped by label, groups in first-seen order.
    groups: Vec<LabelGroup>,
    delete: Option<(BucketId, Vec<AssetHandle>)>,
}

#[derive(Debug, Clone)]
struct LabelGroup {
    label: String,
    buckets: Vec<(BucketId, Vec<AssetHandle>)>,
}

impl CommitPlan {
    #[must_use]
    pub fn from_buckets(buckets: &BucketSet) -> Self {
        let mut plan = Self::default();
        for bucket in buckets.iter().filter(|b| !b.is_empty()) {
            let members = bucket.members().to_vec();
            match bucket.kind() {
                BucketKind::Delete => plan.delete = Some((bucket.id(), members)),
                BucketKind::Collection => {
                    match plan.groups.iter_mut().find(|g| g.label == bucket.label()) {
                        Some(group) => group.buckets.push((bucket.id(), members)),
                        None => plan.groups.push(LabelGroup {
                            label: bucket.label().to_string(),
                            buckets: vec![(bucket.id(), members)],
                        }),
                    }
                }
            }
        }
        plan
    }

    /// Whether there is nothing to commit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.delete.is_none()
    }

    /// Runs every mutation and collects the per-bucket results.
    pub async fn execute(self, store: &dyn CollectionStore) -> CommitReport {
        let mut report = CommitReport::default();
        if self.is_empty() {
            return report;
        }

        let albums = if self.groups.is_empty() {
            Ok(Vec::new())
        } else {
            store.list_collections(CollectionKind::Album).await
        };

        let mut tasks: Vec<BoxFuture<'_, Vec<(BucketId, BucketResult)>>> = Vec::new();
        match albums {
            Ok(albums) => {
                for group in self.groups {
                    let existing = albums.iter().find(|a| a.is_titled(&group.label)).cloned();
                    tasks.push(commit_group(store, group, existing).boxed());
                }
            }
            Err(error) => {
                log::warn!("listing albums failed, skipping album buckets: {error}");
                for group in self.groups {
                    for (id, _) in group.buckets {
                        report
                            .results
                            .insert(id, Err(CommitError::ListFailed(error.clone())));
                    }
                }
            }
        }
        if let Some((id, members)) = self.delete {
            tasks.push(commit_delete(store, id, members).boxed());
        }

        for results in future::join_all(tasks).await {
            report.results.extend(results);
        }

        log::info!(
            "commit finished: {} buckets ok, {} failed",
            report.succeeded().count(),
            report.failed().count()
        );
        report
    }
}

/// Commits every non-empty bucket of `buckets`.
///
/// # Example
///
/// ```ignore
/// let report = commit(&store, session.buckets()).await;
/// session.mark_committed(&report);
/// ```
pub async fn commit(store: &dyn CollectionStore, buckets: &BucketSet) -> CommitReport {
    CommitPlan::from_buckets(buckets).execute(store).await
}

async fn commit_group(
    store: &dyn CollectionStore,
    group: LabelGroup,
    existing: Option<CollectionHandle>,
) -> Vec<(BucketId, BucketResult)> {
    let LabelGroup { label, buckets } = group;

    let (album, mut created) = match existing {
        Some(album) => (album, false),
        None => match store.create_collection(&label).await {
            Ok(album) => {
                log::debug!("created album \"{label}\" ({})", album.id);
                (album, true)
            }
            Err(source) => {
                log::warn!("creating album \"{label}\" failed: {source}");
                return buckets
                    .into_iter()
                    .map(|(id, _)| {
                        let error = CommitError::CreateFailed {
                            label: label.clone(),
                            source: source.clone(),
                        };
                        (id, Err(error))
                    })
                    .collect();
            }
        },
    };

    let mut results = Vec::with_capacity(buckets.len());
    for (id, members) in buckets {
        let added = members.len();
        let result = match store.add_members(&album, &members).await {
            Ok(()) if created => Ok(CommitOutcome::Created {
                collection: album.id.clone(),
                added,
            }),
            Ok(()) => Ok(CommitOutcome::Added {
                collection: album.id.clone(),
                added,
            }),
            Err(source) => {
                log::warn!("adding {added} assets to \"{label}\" failed: {source}");
                Err(CommitError::AddFailed {
                    label: label.clone(),
                    count: added,
                    source,
                })
            }
        };
        // Only the first bucket of a group reports the creation.
        created = false;
        results.push((id, result));
    }
    results
}

async fn commit_delete(
    store: &dyn CollectionStore,
    id: BucketId,
    members: Vec<AssetHandle>,
) -> Vec<(BucketId, BucketResult)> {
    let count = members.len();
    let result = match store.delete_assets(&members).await {
        Ok(()) => Ok(CommitOutcome::Deleted { count }),
        Err(source) => {
            log::warn!("deleting {count} assets failed: {source}");
            Err(CommitError::DeleteFailed { count, source })
        }
    };
    vec![(id, result)]
}
