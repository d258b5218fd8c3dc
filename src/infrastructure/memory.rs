// SPDX-License-Identifier: MPL-2.0
//! In-memory photo library.
//!
//! Implements every port on plain vectors behind a mutex. Each store call is
//! recorded, and individual operations can be made to fail, which makes this
//! the adapter of choice for tests and demos.
//!
//! # Example
//!
//! ```
//! use photo_swipe::application::port::AssetSource;
//! use photo_swipe::infrastructure::memory::MemoryLibrary;
//!
//! let library = MemoryLibrary::with_photos(&["a", "b", "c"]);
//! library.add_album("Trip", None, &["a"]);
//! assert_eq!(library.count(), 3);
//! assert_eq!(library.album_members("Trip").len(), 1);
//! ```

use crate::application::port::{
    AccessStatus, AssetSource, AuthorizationGate, CollectionStore, DecodeError, PreviewDecoder,
    StoreError,
};
use crate::domain::asset::{AssetHandle, AssetId};
use crate::domain::collection::{CollectionHandle, CollectionId, CollectionKind};
use crate::domain::preview::{ContentMode, PreviewImage, TargetSize};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

/// A recorded collection store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    ListCollections(CollectionKind),
    ListChildren(Option<CollectionId>),
    Members(CollectionId),
    Create(String),
    Add { title: String, assets: Vec<AssetId> },
    Remove { title: String, assets: Vec<AssetId> },
    Delete(Vec<AssetId>),
}

#[derive(Debug, Clone)]
struct Node {
    id: CollectionId,
    title: String,
    kind: CollectionKind,
    parent: Option<CollectionId>,
    members: Vec<AssetId>,
}

impl Node {
    fn handle(&self) -> CollectionHandle {
        CollectionHandle {
            id: self.id.clone(),
            title: self.title.clone(),
            kind: self.kind,
            parent: self.parent.clone(),
            member_count: self.members.len(),
        }
    }
}

#[derive(Debug)]
struct State {
    assets: Vec<AssetHandle>,
    collections: Vec<Node>,
    next_collection: u64,
    calls: Vec<StoreCall>,
    decodes: Vec<AssetId>,
    access: AccessStatus,
    failing_decodes: HashSet<AssetId>,
    failing_creates: HashSet<String>,
    failing_adds: HashSet<String>,
    fail_deletes: bool,
    fail_listing: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            assets: Vec::new(),
            collections: Vec::new(),
            next_collection: 1,
            calls: Vec::new(),
            decodes: Vec::new(),
            access: AccessStatus::Granted,
            failing_decodes: HashSet::new(),
            failing_creates: HashSet::new(),
            failing_adds: HashSet::new(),
            fail_deletes: false,
            fail_listing: false,
        }
    }
}

impl State {
    fn node(&self, id: &CollectionId) -> Result<&Node, StoreError> {
        self.collections
            .iter()
            .find(|n| &n.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn album_mut(&mut self, id: &CollectionId) -> Result<&mut Node, StoreError> {
        let node = self
            .collections
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if node.kind != CollectionKind::Album {
            return Err(StoreError::InvalidOperation {
                collection: id.clone(),
                reason: "folders hold no assets".to_string(),
            });
        }
        Ok(node)
    }

    fn insert(
        &mut self,
        title: &str,
        kind: CollectionKind,
        parent: Option<&CollectionId>,
        members: Vec<AssetId>,
    ) -> CollectionId {
        let prefix = match kind {
            CollectionKind::Album => "album",
            CollectionKind::Folder => "folder",
        };
        let id = CollectionId::new(format!("{prefix}-{}", self.next_collection));
        self.next_collection += 1;
        self.collections.push(Node {
            id: id.clone(),
            title: title.to_string(),
            kind,
            parent: parent.cloned(),
            members,
        });
        id
    }
}

/// Photo library held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryLibrary {
    state: Mutex<State>,
}

impl MemoryLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Library holding one photo per id, created one minute apart in the
    /// given order.
    #[must_use]
    pub fn with_photos(ids: &[&str]) -> Self {
        let library = Self::new();
        for (i, id) in ids.iter().enumerate() {
            let minutes = u64::try_from(i + 1).unwrap_or(u64::MAX);
            let created = SystemTime::UNIX_EPOCH + Duration::from_secs(minutes * 60);
            library.push_asset(AssetHandle::new(AssetId::new(*id), i, Some(created)));
        }
        library
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push_asset(&self, handle: AssetHandle) {
        self.state().assets.push(handle);
    }

    /// Adds an album holding `members` and returns its id.
    pub fn add_album(&self, title: &str, parent: Option<&CollectionId>, members: &[&str]) -> CollectionId {
        let members = members.iter().map(|m| AssetId::new(*m)).collect();
        self.state()
            .insert(title, CollectionKind::Album, parent, members)
    }

    /// Adds an empty folder and returns its id.
    pub fn add_folder(&self, title: &str, parent: Option<&CollectionId>) -> CollectionId {
        self.state()
            .insert(title, CollectionKind::Folder, parent, Vec::new())
    }

    pub fn set_access(&self, access: AccessStatus) {
        self.state().access = access;
    }

    /// Makes every decode of `asset` fail.
    pub fn fail_decode(&self, asset: &str) {
        self.state().failing_decodes.insert(AssetId::new(asset));
    }

    /// Makes creating an album titled `title` fail.
    pub fn fail_create(&self, title: &str) {
        self.state().failing_creates.insert(title.to_string());
    }

    /// Makes adding to (or removing from) albums titled `title` fail.
    pub fn fail_add(&self, title: &str) {
        self.state().failing_adds.insert(title.to_string());
    }

    pub fn fail_delete(&self) {
        self.state().fail_deletes = true;
    }

    pub fn fail_listing(&self) {
        self.state().fail_listing = true;
    }

    /// Every store call so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.state().calls.clone()
    }

    /// Every decode request so far, in call order.
    #[must_use]
    pub fn decode_requests(&self) -> Vec<AssetId> {
        self.state().decodes.clone()
    }

    /// Members of the first album titled `title`.
    #[must_use]
    pub fn album_members(&self, title: &str) -> Vec<AssetId> {
        self.state()
            .collections
            .iter()
            .find(|n| n.kind == CollectionKind::Album && n.title == title)
            .map(|n| n.members.clone())
            .unwrap_or_default()
    }

    /// Whether the library still holds `asset`.
    #[must_use]
    pub fn contains(&self, asset: &AssetId) -> bool {
        self.state().assets.iter().any(|a| a.id() == asset)
    }
}

impl AssetSource for MemoryLibrary {
    fn count(&self) -> usize {
        self.state().assets.len()
    }

    fn asset_at(&self, index: usize) -> Option<AssetHandle> {
        self.state().assets.get(index).cloned()
    }
}

#[async_trait]
impl AuthorizationGate for MemoryLibrary {
    async fn request_access(&self) -> AccessStatus {
        self.state().access
    }
}

#[async_trait]
impl PreviewDecoder for MemoryLibrary {
    async fn request_preview(
        &self,
        asset: &AssetHandle,
        _target: TargetSize,
        _mode: ContentMode,
    ) -> Result<PreviewImage, DecodeError> {
        let mut state = self.state();
        state.decodes.push(asset.id().clone());

        if state.failing_decodes.contains(asset.id()) {
            return Err(DecodeError::Corrupted(format!("{} is unreadable", asset.id())));
        }
        if !state.assets.iter().any(|a| a.id() == asset.id()) {
            return Err(DecodeError::NotFound(asset.id().clone()));
        }

        // One opaque pixel whose red channel encodes the ordinal.
        let shade = u8::try_from(asset.ordinal() % 256).unwrap_or(0);
        Ok(PreviewImage::from_rgba(1, 1, vec![shade, 0, 0, 255]))
    }
}

#[async_trait]
impl CollectionStore for MemoryLibrary {
    async fn list_collections(
        &self,
        kind: CollectionKind,
    ) -> Result<Vec<CollectionHandle>, StoreError> {
        let mut state = self.state();
        state.calls.push(StoreCall::ListCollections(kind));
        if state.fail_listing {
            return Err(StoreError::Storage("listing unavailable".to_string()));
        }
        Ok(state
            .collections
            .iter()
            .filter(|n| n.kind == kind)
            .map(Node::handle)
            .collect())
    }

    async fn list_children(
        &self,
        parent: Option<&CollectionId>,
    ) -> Result<Vec<CollectionHandle>, StoreError> {
        let mut state = self.state();
        state.calls.push(StoreCall::ListChildren(parent.cloned()));
        if state.fail_listing {
            return Err(StoreError::Storage("listing unavailable".to_string()));
        }
        if let Some(parent) = parent {
            let node = state.node(parent)?;
            if node.kind != CollectionKind::Folder {
                return Err(StoreError::InvalidOperation {
                    collection: parent.clone(),
                    reason: "albums have no children".to_string(),
                });
            }
        }
        Ok(state
            .collections
            .iter()
            .filter(|n| n.parent.as_ref() == parent)
            .map(Node::handle)
            .collect())
    }

    async fn members(&self, collection: &CollectionId) -> Result<Vec<AssetHandle>, StoreError> {
        let mut state = self.state();
        state.calls.push(StoreCall::Members(collection.clone()));
        let node = state.node(collection)?;
        Ok(node
            .members
            .iter()
            .filter_map(|id| state.assets.iter().find(|a| a.id() == id).cloned())
            .collect())
    }

    async fn create_collection(&self, name: &str) -> Result<CollectionHandle, StoreError> {
        let mut state = self.state();
        state.calls.push(StoreCall::Create(name.to_string()));
        if state.failing_creates.contains(name) {
            return Err(StoreError::Rejected(format!("cannot create \"{name}\"")));
        }
        let id = state.insert(name, CollectionKind::Album, None, Vec::new());
        state.node(&id).map(Node::handle)
    }

    async fn add_members(
        &self,
        collection: &CollectionHandle,
        assets: &[AssetHandle],
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        state.calls.push(StoreCall::Add {
            title: collection.title.clone(),
            assets: assets.iter().map(|a| a.id().clone()).collect(),
        });
        if state.failing_adds.contains(&collection.title) {
            return Err(StoreError::Rejected(format!(
                "cannot change \"{}\"",
                collection.title
            )));
        }
        let album = state.album_mut(&collection.id)?;
        for asset in assets {
            if !album.members.contains(asset.id()) {
                album.members.push(asset.id().clone());
            }
        }
        Ok(())
    }

    async fn remove_members(
        &self,
        collection: &CollectionHandle,
        assets: &[AssetHandle],
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        state.calls.push(StoreCall::Remove {
            title: collection.title.clone(),
            assets: assets.iter().map(|a| a.id().clone()).collect(),
        });
        if state.failing_adds.contains(&collection.title) {
            return Err(StoreError::Rejected(format!(
                "cannot change \"{}\"",
                collection.title
            )));
        }
        let album = state.album_mut(&collection.id)?;
        album
            .members
            .retain(|m| !assets.iter().any(|a| a.id() == m));
        Ok(())
    }

    async fn delete_assets(&self, assets: &[AssetHandle]) -> Result<(), StoreError> {
        let mut state = self.state();
        let ids: HashSet<AssetId> = assets.iter().map(|a| a.id().clone()).collect();
        state
            .calls
            .push(StoreCall::Delete(assets.iter().map(|a| a.id().clone()).collect()));
        if state.fail_deletes {
            return Err(StoreError::Rejected("deletion declined".to_string()));
        }
        state.assets.retain(|a| !ids.contains(a.id()));
        for node in &mut state.collections {
            node.members.retain(|m| !ids.contains(m));
        }
        Ok(())
    }
}
