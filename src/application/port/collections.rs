// SPDX-License-Identifier: MPL-2.0
//! Collection store port definition.
//!
//! The collection store owns albums, folders and the library's delete
//! operation. Every mutation is independent: the store gives no atomicity
//! across calls.

use crate::domain::asset::AssetHandle;
use crate::domain::collection::{CollectionHandle, CollectionId, CollectionKind};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a collection store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The referenced collection does not exist.
    #[error("collection not found: {0}")]
    NotFound(CollectionId),

    /// The operation is not valid for this collection (e.g. adding assets to a folder).
    #[error("invalid operation on {collection}: {reason}")]
    InvalidOperation {
        collection: CollectionId,
        reason: String,
    },

    /// The library refused the change.
    #[error("change rejected: {0}")]
    Rejected(String),

    /// The backing storage failed.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Port for album and folder management.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Every collection of the given kind, at any depth.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be read.
    async fn list_collections(
        &self,
        kind: CollectionKind,
    ) -> Result<Vec<CollectionHandle>, StoreError>;

    /// Direct children of `parent` (`None` = top level), folders and albums.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown parent.
    async fn list_children(
        &self,
        parent: Option<&CollectionId>,
    ) -> Result<Vec<CollectionHandle>, StoreError>;

    /// Assets of an album, in album order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown album.
    async fn members(&self, collection: &CollectionId) -> Result<Vec<AssetHandle>, StoreError>;

    /// Creates an empty top-level album.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the library refuses the creation.
    async fn create_collection(&self, name: &str) -> Result<CollectionHandle, StoreError>;

    /// Adds assets to an album. Assets already present are left alone.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the change is refused.
    async fn add_members(
        &self,
        collection: &CollectionHandle,
        assets: &[AssetHandle],
    ) -> Result<(), StoreError>;

    /// Removes assets from an album without deleting them.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the change is refused.
    async fn remove_members(
        &self,
        collection: &CollectionHandle,
        assets: &[AssetHandle],
    ) -> Result<(), StoreError>;

    /// Deletes assets from the library.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the deletion is refused.
    async fn delete_assets(&self, assets: &[AssetHandle]) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::NotFound(CollectionId::new("album-1"));
        assert_eq!(err.to_string(), "collection not found: album-1");

        let err = StoreError::InvalidOperation {
            collection: CollectionId::new("folder-9"),
            reason: "folders hold no assets".to_string(),
        };
        assert!(err.to_string().contains("folder-9"));
        assert!(err.to_string().contains("folders hold no assets"));
    }
}
