// SPDX-License-Identifier: MPL-2.0
//! Directory-backed photo library.
//!
//! A library is one directory of image files. Asset ids are BLAKE3 hashes of
//! the file name, so they stay stable when the directory moves. Creation
//! dates come from EXIF (`DateTimeOriginal`, then `DateTime`) and fall back to
//! the file's own timestamps.

mod decoder;

pub use decoder::{decode_preview, ImagePreviewDecoder};

use crate::application::port::{AccessStatus, AssetSource, AuthorizationGate};
use crate::domain::asset::{AssetHandle, AssetId};
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Image file extensions picked up by a scan.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "tiff", "tif", "webp", "bmp"];

/// Returns `true` if the path has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Stable asset id for a file name.
#[must_use]
pub fn asset_id_for(file_name: &str) -> AssetId {
    AssetId::new(blake3::hash(file_name.as_bytes()).to_hex().to_string())
}

/// Snapshot of the images in one directory.
#[derive(Debug, Clone)]
pub struct FsLibrary {
    root: PathBuf,
    assets: Vec<AssetHandle>,
    paths: HashMap<AssetId, PathBuf>,
}

impl FsLibrary {
    /// Scans `root` (not recursively) for supported images.
    ///
    /// Assets are listed in file-name order; use
    /// [`AssetSource::fetch_sorted`] for date order.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn scan(root: &Path) -> Result<Self> {
        let mut files = Vec::new();
        for entry in fs::read_dir(root)? {
            let path = entry?.path();
            if path.is_file() && is_supported_image(&path) {
                files.push(path);
            }
        }
        files.sort();

        let mut assets = Vec::with_capacity(files.len());
        let mut paths = HashMap::with_capacity(files.len());
        for path in files {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                log::warn!("skipping non UTF-8 file name {}", path.display());
                continue;
            };
            let id = asset_id_for(name);
            let created = creation_time(&path);
            assets.push(AssetHandle::new(id.clone(), assets.len(), created));
            paths.insert(id, path);
        }

        log::debug!("found {} images in {}", assets.len(), root.display());
        Ok(Self {
            root: root.to_path_buf(),
            assets,
            paths,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `asset`.
    #[must_use]
    pub fn path_of(&self, asset: &AssetId) -> Option<&Path> {
        self.paths.get(asset).map(PathBuf::as_path)
    }

    /// Handle of `asset`, if it was found by the scan.
    #[must_use]
    pub fn handle_of(&self, asset: &AssetId) -> Option<&AssetHandle> {
        self.assets.iter().find(|a| a.id() == asset)
    }
}

impl AssetSource for FsLibrary {
    fn count(&self) -> usize {
        self.assets.len()
    }

    fn asset_at(&self, index: usize) -> Option<AssetHandle> {
        self.assets.get(index).cloned()
    }
}

#[async_trait]
impl AuthorizationGate for FsLibrary {
    /// Local directories need no prompt; access follows read permission.
    async fn request_access(&self) -> AccessStatus {
        match fs::read_dir(&self.root) {
            Ok(_) => AccessStatus::Granted,
            Err(err) => {
                log::warn!("cannot read {}: {err}", self.root.display());
                AccessStatus::Denied
            }
        }
    }
}

/// Capture time from EXIF, else the file's creation or modification time.
fn creation_time(path: &Path) -> Option<SystemTime> {
    exif_timestamp(path).or_else(|| {
        let metadata = fs::metadata(path).ok()?;
        metadata.created().or_else(|_| metadata.modified()).ok()
    })
}

fn exif_timestamp(path: &Path) -> Option<SystemTime> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;

    let field = exif
        .get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY)
        .or_else(|| exif.get_field(exif::Tag::DateTime, exif::In::PRIMARY))?;
    parse_exif_datetime(&field.display_value().to_string())
}

/// Parses an EXIF date, either raw (`2016:05:04 03:02:01`) or as displayed
/// (`2016-05-04 03:02:01`). EXIF carries no zone; the time is taken as UTC.
fn parse_exif_datetime(raw: &str) -> Option<SystemTime> {
    let raw = raw.trim().trim_matches('"');
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y:%m:%d %H:%M:%S"))
        .ok()?;
    Some(SystemTime::from(naive.and_utc()))
}
