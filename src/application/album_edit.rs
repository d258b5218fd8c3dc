// SPDX-License-Identifier: MPL-2.0
//! Multi-selection editing inside one album.
//!
//! Assets are selected within the album, then either deleted from the
//! library or removed from the album. A successful action clears the
//! selection and reloads the members; a failed one keeps the selection so the
//! user can retry.

use crate::application::port::{CollectionStore, StoreError};
use crate::domain::asset::{AssetHandle, AssetId};
use crate::domain::collection::CollectionHandle;
use std::collections::HashSet;

/// What to do with the selected assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAction {
    /// Delete the assets from the library.
    Delete,
    /// Take the assets out of the album only.
    Remove,
}

/// Selection state over an album's members.
#[derive(Debug, Clone)]
pub struct AlbumSelection {
    album: CollectionHandle,
    members: Vec<AssetHandle>,
    selected: HashSet<AssetId>,
}

impl AlbumSelection {
    /// Loads the album's members with nothing selected.
    ///
    /// # Errors
    ///
    /// Propagates the store's [`StoreError`].
    pub async fn open(
        store: &dyn CollectionStore,
        album: CollectionHandle,
    ) -> Result<Self, StoreError> {
        let members = store.members(&album.id).await?;
        Ok(Self {
            album,
            members,
            selected: HashSet::new(),
        })
    }

    #[must_use]
    pub fn album(&self) -> &CollectionHandle {
        &self.album
    }

    /// Members in album order.
    #[must_use]
    pub fn members(&self) -> &[AssetHandle] {
        &self.members
    }

    #[must_use]
    pub fn is_selected(&self, asset: &AssetId) -> bool {
        self.selected.contains(asset)
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Flips the selection of a member. Non-members are ignored.
    ///
    /// Returns whether the asset is selected afterwards.
    pub fn toggle(&mut self, asset: &AssetId) -> bool {
        if !self.members.iter().any(|m| m.id() == asset) {
            return false;
        }
        if self.selected.remove(asset) {
            false
        } else {
            self.selected.insert(asset.clone());
            true
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.members.iter().map(|m| m.id().clone()).collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    fn selected_handles(&self) -> Vec<AssetHandle> {
        self.members
            .iter()
            .filter(|m| self.selected.contains(m.id()))
            .cloned()
            .collect()
    }

    /// Applies `action` to the selection and returns the number of assets
    /// affected. An empty selection issues no call.
    ///
    /// # Errors
    ///
    /// On a store failure the selection is left untouched and the error is
    /// returned. A failure while reloading members after a successful action
    /// is returned as well; the selection is already cleared by then.
    pub async fn apply(
        &mut self,
        store: &dyn CollectionStore,
        action: SelectionAction,
    ) -> Result<usize, StoreError> {
        let assets = self.selected_handles();
        if assets.is_empty() {
            return Ok(0);
        }

        let outcome = match action {
            SelectionAction::Delete => store.delete_assets(&assets).await,
            SelectionAction::Remove => store.remove_members(&self.album, &assets).await,
        };
        if let Err(error) = outcome {
            log::warn!(
                "{action:?} of {} assets in \"{}\" failed: {error}",
                assets.len(),
                self.album.title
            );
            return Err(error);
        }

        self.selected.clear();
        self.members = store.members(&self.album.id).await?;
        Ok(assets.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collection::CollectionKind;
    use crate::infrastructure::memory::{MemoryLibrary, StoreCall};

    async fn open_album(store: &MemoryLibrary, title: &str) -> AlbumSelection {
        let album = store
            .list_collections(CollectionKind::Album)
            .await
            .unwrap()
            .into_iter()
            .find(|a| a.is_titled(title))
            .unwrap();
        AlbumSelection::open(store, album).await.unwrap()
    }

    #[tokio::test]
    async fn remove_clears_selection_and_reloads() {
        let store = MemoryLibrary::with_photos(&["a", "b", "c"]);
        store.add_album("Trip", None, &["a", "b", "c"]);
        let mut selection = open_album(&store, "Trip").await;

        assert!(selection.toggle(&AssetId::new("b")));
        let removed = selection
            .apply(&store, SelectionAction::Remove)
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert_eq!(selection.selected_count(), 0);
        let ids: Vec<_> = selection.members().iter().map(|m| m.id().as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert!(store.contains(&AssetId::new("b")));
    }

    #[tokio::test]
    async fn delete_removes_assets_from_library() {
        let store = MemoryLibrary::with_photos(&["a", "b"]);
        store.add_album("Trip", None, &["a", "b"]);
        let mut selection = open_album(&store, "Trip").await;

        selection.select_all();
        selection
            .apply(&store, SelectionAction::Delete)
            .await
            .unwrap();

        assert!(selection.members().is_empty());
        assert!(!store.contains(&AssetId::new("a")));
    }

    #[tokio::test]
    async fn failure_keeps_selection() {
        let store = MemoryLibrary::with_photos(&["a"]);
        store.add_album("Trip", None, &["a"]);
        store.fail_delete();
        let mut selection = open_album(&store, "Trip").await;

        selection.toggle(&AssetId::new("a"));
        assert!(selection
            .apply(&store, SelectionAction::Delete)
            .await
            .is_err());
        assert!(selection.is_selected(&AssetId::new("a")));
        assert_eq!(selection.members().len(), 1);
    }

    #[tokio::test]
    async fn empty_selection_issues_no_call() {
        let store = MemoryLibrary::with_photos(&["a"]);
        store.add_album("Trip", None, &["a"]);
        let mut selection = open_album(&store, "Trip").await;
        let calls_before = store.calls().len();

        assert_eq!(
            selection.apply(&store, SelectionAction::Remove).await,
            Ok(0)
        );
        assert_eq!(store.calls().len(), calls_before);
        assert!(!store
            .calls()
            .iter()
            .any(|c| matches!(c, StoreCall::Remove { .. })));
    }

    #[tokio::test]
    async fn toggling_non_member_is_ignored() {
        let store = MemoryLibrary::with_photos(&["a", "z"]);
        store.add_album("Trip", None, &["a"]);
        let mut selection = open_album(&store, "Trip").await;
        assert!(!selection.toggle(&AssetId::new("z")));
        assert!(selection.toggle(&AssetId::new("a")));
        assert!(!selection.toggle(&AssetId::new("a")));
    }
}
