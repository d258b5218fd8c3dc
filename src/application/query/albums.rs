// SPDX-License-Identifier: MPL-2.0
//! Album overview queries.

use crate::application::port::{CollectionStore, StoreError};
use crate::domain::asset::AssetId;
use crate::domain::collection::{overview_order, CollectionHandle, CollectionId, CollectionKind};
use std::collections::HashSet;

/// Folders and non-empty albums directly under `parent` (`None` = top level).
///
/// Folders come first, each group sorted by title.
///
/// # Errors
///
/// Propagates the store's [`StoreError`].
pub async fn overview(
    store: &dyn CollectionStore,
    parent: Option<&CollectionId>,
) -> Result<Vec<CollectionHandle>, StoreError> {
    let mut children: Vec<CollectionHandle> = store
        .list_children(parent)
        .await?
        .into_iter()
        .filter(|c| c.kind == CollectionKind::Folder || c.member_count > 0)
        .collect();
    children.sort_by(overview_order);
    Ok(children)
}

/// Ids of every asset that belongs to at least one album.
///
/// # Errors
///
/// Propagates the store's [`StoreError`].
pub async fn collected_asset_ids(
    store: &dyn CollectionStore,
) -> Result<HashSet<AssetId>, StoreError> {
    let mut collected = HashSet::new();
    for album in store.list_collections(CollectionKind::Album).await? {
        let members = store.members(&album.id).await?;
        collected.extend(members.into_iter().map(|m| m.id().clone()));
    }
    Ok(collected)
}

/// Albums holding `asset`, in overview order.
///
/// # Errors
///
/// Propagates the store's [`StoreError`].
pub async fn albums_containing(
    store: &dyn CollectionStore,
    asset: &AssetId,
) -> Result<Vec<CollectionHandle>, StoreError> {
    let mut holding = Vec::new();
    for album in store.list_collections(CollectionKind::Album).await? {
        let members = store.members(&album.id).await?;
        if members.iter().any(|m| m.id() == asset) {
            holding.push(album);
        }
    }
    holding.sort_by(overview_order);
    Ok(holding)
}

/// Existing album titles containing `fragment`, ignoring case.
///
/// Titles are sorted and deduplicated. A blank fragment matches every album.
///
/// # Errors
///
/// Propagates the store's [`StoreError`].
pub async fn suggest_titles(
    store: &dyn CollectionStore,
    fragment: &str,
) -> Result<Vec<String>, StoreError> {
    let needle = fragment.trim().to_lowercase();
    let mut titles: Vec<String> = store
        .list_collections(CollectionKind::Album)
        .await?
        .into_iter()
        .map(|album| album.title)
        .filter(|title| title.to_lowercase().contains(&needle))
        .collect();
    titles.sort();
    titles.dedup();
    Ok(titles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::MemoryLibrary;

    #[tokio::test]
    async fn overview_lists_folders_first_and_hides_empty_albums() {
        let store = MemoryLibrary::with_photos(&["a", "b"]);
        store.add_album("Zoo", None, &["a"]);
        store.add_album("Empty", None, &[]);
        store.add_folder("Trips", None);
        store.add_album("Alps", None, &["b"]);
        store.add_folder("Archive", None);

        let titles: Vec<_> = overview(&store, None)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, ["Archive", "Trips", "Alps", "Zoo"]);
    }

    #[tokio::test]
    async fn overview_of_folder_lists_its_children() {
        let store = MemoryLibrary::with_photos(&["a"]);
        let trips = store.add_folder("Trips", None);
        store.add_album("Rome", Some(&trips), &["a"]);
        store.add_album("Top", None, &["a"]);

        let children = overview(&store, Some(&trips)).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].title, "Rome");
    }

    #[tokio::test]
    async fn overview_of_unknown_folder_fails() {
        let store = MemoryLibrary::with_photos(&[]);
        let missing = CollectionId::new("nope");
        assert_eq!(
            overview(&store, Some(&missing)).await,
            Err(StoreError::NotFound(missing))
        );
    }

    #[tokio::test]
    async fn collected_ids_span_nested_albums() {
        let store = MemoryLibrary::with_photos(&["a", "b", "c"]);
        let trips = store.add_folder("Trips", None);
        store.add_album("Rome", Some(&trips), &["a"]);
        store.add_album("Home", None, &["b"]);

        let collected = collected_asset_ids(&store).await.unwrap();
        assert!(collected.contains(&AssetId::new("a")));
        assert!(collected.contains(&AssetId::new("b")));
        assert!(!collected.contains(&AssetId::new("c")));
    }

    #[tokio::test]
    async fn albums_containing_lists_every_holder() {
        let store = MemoryLibrary::with_photos(&["a", "b"]);
        let trips = store.add_folder("Trips", None);
        store.add_album("Rome", Some(&trips), &["a", "b"]);
        store.add_album("Best", None, &["a"]);
        store.add_album("Other", None, &["b"]);

        let titles: Vec<_> = albums_containing(&store, &AssetId::new("a"))
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, ["Best", "Rome"]);
        assert!(albums_containing(&store, &AssetId::new("z"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn albums_containing_reports_listing_failure() {
        let store = MemoryLibrary::with_photos(&["a"]);
        store.add_album("Best", None, &["a"]);
        store.fail_listing();

        assert!(albums_containing(&store, &AssetId::new("a")).await.is_err());
    }

    #[tokio::test]
    async fn title_suggestions_ignore_case() {
        let store = MemoryLibrary::with_photos(&[]);
        store.add_album("Summer Trip", None, &[]);
        store.add_album("Road trip", None, &[]);
        store.add_album("Family", None, &[]);
        store.add_album("Road trip", None, &[]);
        store.add_folder("Trips", None);

        assert_eq!(
            suggest_titles(&store, "TRIP").await.unwrap(),
            ["Road trip", "Summer Trip"]
        );
        assert_eq!(suggest_titles(&store, "  ").await.unwrap().len(), 3);
        assert!(suggest_titles(&store, "xyz").await.unwrap().is_empty());
    }
}
