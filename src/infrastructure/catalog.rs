// SPDX-License-Identifier: MPL-2.0
//! Album catalog persisted as a TOML manifest.
//!
//! Albums and folders of an [`FsLibrary`] live in `albums.toml` at the
//! library root. Deleting assets moves their files into a trash directory
//! next to the manifest and drops them from every album.
//!
//! Every mutation is applied to a copy of the manifest, written to disk, and
//! only then made visible; a failed write leaves the catalog unchanged. The
//! manifest is replaced by renaming a freshly written sibling file. Trashed
//! files never overwrite each other; a name clash gets a ` (n)` suffix.

use super::fs::FsLibrary;
use crate::application::port::{CollectionStore, StoreError};
use crate::domain::asset::{AssetHandle, AssetId};
use crate::domain::collection::{CollectionHandle, CollectionId, CollectionKind};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Manifest file name inside the library root.
pub const MANIFEST_FILE: &str = "albums.toml";

/// Trash directory name inside the library root.
pub const TRASH_DIR: &str = ".photo-swipe-trash";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum EntryKind {
    Album,
    Folder,
}

impl From<EntryKind> for CollectionKind {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Album => CollectionKind::Album,
            EntryKind::Folder => CollectionKind::Folder,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Entry {
    id: String,
    title: String,
    kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
    #[serde(default)]
    members: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct Manifest {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    collections: Vec<Entry>,
}

impl Manifest {
    fn entry(&self, id: &CollectionId) -> std::result::Result<&Entry, StoreError> {
        self.collections
            .iter()
            .find(|e| e.id == id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn album_mut(&mut self, id: &CollectionId) -> std::result::Result<&mut Entry, StoreError> {
        let entry = self
            .collections
            .iter_mut()
            .find(|e| e.id == id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if entry.kind != EntryKind::Album {
            return Err(StoreError::InvalidOperation {
                collection: id.clone(),
                reason: "folders hold no assets".to_string(),
            });
        }
        Ok(entry)
    }

    fn insert(&mut self, title: &str, kind: EntryKind, parent: Option<&CollectionId>) -> String {
        self.next_id += 1;
        let prefix = match kind {
            EntryKind::Album => "album",
            EntryKind::Folder => "folder",
        };
        let id = format!("{prefix}-{}", self.next_id);
        self.collections.push(Entry {
            id: id.clone(),
            title: title.to_string(),
            kind,
            parent: parent.map(|p| p.as_str().to_string()),
            members: Vec::new(),
        });
        id
    }
}

#[derive(Debug)]
struct State {
    manifest: Manifest,
    deleted: HashSet<AssetId>,
}

/// [`CollectionStore`] over an [`FsLibrary`] and a TOML manifest.
#[derive(Debug)]
pub struct TomlCollectionStore {
    library: Arc<FsLibrary>,
    manifest_path: PathBuf,
    trash_dir: PathBuf,
    state: Mutex<State>,
}

impl TomlCollectionStore {
    /// Opens the catalog stored in the library root.
    ///
    /// # Errors
    ///
    /// Fails when an existing manifest cannot be read or parsed.
    pub fn open(library: Arc<FsLibrary>) -> Result<Self> {
        let manifest_path = library.root().join(MANIFEST_FILE);
        let trash_dir = library.root().join(TRASH_DIR);
        Self::open_at(library, manifest_path, trash_dir)
    }

    /// Opens a catalog at explicit paths.
    ///
    /// # Errors
    ///
    /// Fails when an existing manifest cannot be read or parsed.
    pub fn open_at(library: Arc<FsLibrary>, manifest_path: PathBuf, trash_dir: PathBuf) -> Result<Self> {
        let manifest = if manifest_path.exists() {
            let content = fs::read_to_string(&manifest_path)?;
            toml::from_str(&content)?
        } else {
            Manifest::default()
        };
        log::debug!(
            "opened catalog {} ({} collections)",
            manifest_path.display(),
            manifest.collections.len()
        );
        Ok(Self {
            library,
            manifest_path,
            trash_dir,
            state: Mutex::new(State {
                manifest,
                deleted: HashSet::new(),
            }),
        })
    }

    #[must_use]
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    #[must_use]
    pub fn trash_dir(&self) -> &Path {
        &self.trash_dir
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a folder, optionally nested in another folder.
    ///
    /// # Errors
    ///
    /// Fails for an unknown or non-folder parent, or when the manifest
    /// cannot be written.
    pub fn create_folder(
        &self,
        title: &str,
        parent: Option<&CollectionId>,
    ) -> std::result::Result<CollectionHandle, StoreError> {
        let mut state = self.state();
        let mut manifest = state.manifest.clone();
        if let Some(parent) = parent {
            if manifest.entry(parent)?.kind != EntryKind::Folder {
                return Err(StoreError::InvalidOperation {
                    collection: parent.clone(),
                    reason: "only folders can hold collections".to_string(),
                });
            }
        }
        let id = manifest.insert(title, EntryKind::Folder, parent);
        self.persist(&manifest)?;
        state.manifest = manifest;
        Ok(handle(state.manifest.entry(&CollectionId::new(id))?))
    }

    fn persist(&self, manifest: &Manifest) -> std::result::Result<(), StoreError> {
        let content =
            toml::to_string_pretty(manifest).map_err(|e| StoreError::Storage(e.to_string()))?;
        if let Some(parent) = self.manifest_path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        // Written beside the manifest and renamed over it, so a crash never
        // leaves a truncated file behind.
        let staging = self.manifest_path.with_extension("toml.tmp");
        fs::write(&staging, content).map_err(|e| StoreError::Storage(e.to_string()))?;
        fs::rename(&staging, &self.manifest_path).map_err(|e| StoreError::Storage(e.to_string()))
    }

    fn live_handle(&self, state: &State, id: &str) -> Option<AssetHandle> {
        let id = AssetId::new(id);
        if state.deleted.contains(&id) {
            return None;
        }
        self.library.handle_of(&id).cloned()
    }
}

/// `dir/name`, or the first free `stem (n).ext` when a file of that name
/// is already in the trash.
fn free_trash_path(dir: &Path, name: &OsStr) -> PathBuf {
    let plain = dir.join(name);
    if !plain.exists() {
        return plain;
    }
    let name = Path::new(name);
    let stem = name
        .file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
    let extension = name.extension().map(|e| e.to_string_lossy().into_owned());
    (1..u32::MAX)
        .map(|n| match &extension {
            Some(ext) => dir.join(format!("{stem} ({n}).{ext}")),
            None => dir.join(format!("{stem} ({n})")),
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or(plain)
}

fn handle(entry: &Entry) -> CollectionHandle {
    CollectionHandle {
        id: CollectionId::new(entry.id.clone()),
        title: entry.title.clone(),
        kind: entry.kind.into(),
        parent: entry.parent.clone().map(CollectionId::new),
        member_count: entry.members.len(),
    }
}

#[async_trait]
impl CollectionStore for TomlCollectionStore {
    async fn list_collections(
        &self,
        kind: CollectionKind,
    ) -> std::result::Result<Vec<CollectionHandle>, StoreError> {
        let state = self.state();
        Ok(state
            .manifest
            .collections
            .iter()
            .map(handle)
            .filter(|h| h.kind == kind)
            .collect())
    }

    async fn list_children(
        &self,
        parent: Option<&CollectionId>,
    ) -> std::result::Result<Vec<CollectionHandle>, StoreError> {
        let state = self.state();
        if let Some(parent) = parent {
            state.manifest.entry(parent)?;
        }
        let parent = parent.map(CollectionId::as_str);
        Ok(state
            .manifest
            .collections
            .iter()
            .filter(|e| e.parent.as_deref() == parent)
            .map(handle)
            .collect())
    }

    async fn members(
        &self,
        collection: &CollectionId,
    ) -> std::result::Result<Vec<AssetHandle>, StoreError> {
        let state = self.state();
        let entry = state.manifest.entry(collection)?;
        Ok(entry
            .members
            .iter()
            .filter_map(|id| self.live_handle(&state, id))
            .collect())
    }

    async fn create_collection(
        &self,
        name: &str,
    ) -> std::result::Result<CollectionHandle, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::Rejected("album title must not be empty".to_string()));
        }
        let mut state = self.state();
        let mut manifest = state.manifest.clone();
        let id = manifest.insert(name, EntryKind::Album, None);
        self.persist(&manifest)?;
        state.manifest = manifest;
        log::debug!("created album \"{name}\" as {id}");
        Ok(handle(state.manifest.entry(&CollectionId::new(id))?))
    }

    async fn add_members(
        &self,
        collection: &CollectionHandle,
        assets: &[AssetHandle],
    ) -> std::result::Result<(), StoreError> {
        let mut state = self.state();
        let mut manifest = state.manifest.clone();
        let album = manifest.album_mut(&collection.id)?;
        for asset in assets {
            let id = asset.id().as_str();
            if !album.members.iter().any(|m| m == id) {
                album.members.push(id.to_string());
            }
        }
        self.persist(&manifest)?;
        state.manifest = manifest;
        Ok(())
    }

    async fn remove_members(
        &self,
        collection: &CollectionHandle,
        assets: &[AssetHandle],
    ) -> std::result::Result<(), StoreError> {
        let mut state = self.state();
        let mut manifest = state.manifest.clone();
        let album = manifest.album_mut(&collection.id)?;
        album
            .members
            .retain(|m| !assets.iter().any(|a| a.id().as_str() == m));
        self.persist(&manifest)?;
        state.manifest = manifest;
        Ok(())
    }

    async fn delete_assets(&self, assets: &[AssetHandle]) -> std::result::Result<(), StoreError> {
        let mut state = self.state();

        let mut moves = Vec::with_capacity(assets.len());
        for asset in assets {
            let source = self
                .library
                .path_of(asset.id())
                .filter(|_| !state.deleted.contains(asset.id()))
                .ok_or_else(|| StoreError::Rejected(format!("unknown asset {}", asset.id())))?;
            let Some(name) = source.file_name() else {
                return Err(StoreError::Rejected(format!("unknown asset {}", asset.id())));
            };
            moves.push((asset.id().clone(), source.to_path_buf(), name.to_os_string()));
        }

        fs::create_dir_all(&self.trash_dir).map_err(|e| StoreError::Storage(e.to_string()))?;

        let mut moved = HashSet::new();
        let mut failure = None;
        for (id, source, name) in moves {
            let target = free_trash_path(&self.trash_dir, &name);
            match fs::rename(&source, &target) {
                Ok(()) => {
                    moved.insert(id);
                }
                Err(err) => {
                    log::warn!("could not move {} to trash: {err}", source.display());
                    failure = Some(StoreError::Storage(err.to_string()));
                    break;
                }
            }
        }

        // Files already in the trash are gone from the library either way.
        let mut manifest = state.manifest.clone();
        for entry in &mut manifest.collections {
            entry
                .members
                .retain(|m| !moved.contains(&AssetId::new(m.as_str())));
        }
        let persisted = self.persist(&manifest);
        state.deleted.extend(moved);
        if persisted.is_ok() {
            state.manifest = manifest;
        }

        match failure {
            Some(err) => Err(err),
            None => persisted,
        }
    }
}
