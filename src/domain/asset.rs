// SPDX-License-Identifier: MPL-2.0
//! Asset identity types.
//!
//! An asset is a single photo in the external library. The library owns it;
//! everything in this crate only ever holds an [`AssetHandle`] referencing it.

use std::fmt;
use std::time::SystemTime;

/// Opaque, library-assigned identifier of an asset.
///
/// Identity comparisons across buffers, buckets and undo records always go
/// through this id, never through ordinals.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId(String);

impl AssetId {
    /// Wraps a library identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Reference to an asset at a given position of a fetch.
///
/// Immutable once fetched. The ordinal is the position inside the fetch that
/// produced the handle; re-sorting produces new handles with new ordinals.
///
/// # Example
///
/// ```
/// use photo_swipe::domain::asset::{AssetHandle, AssetId};
///
/// let handle = AssetHandle::new(AssetId::new("IMG_0001"), 0, None);
/// assert_eq!(handle.id().as_str(), "IMG_0001");
/// assert_eq!(handle.ordinal(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetHandle {
    id: AssetId,
    ordinal: usize,
    created: Option<SystemTime>,
}

impl AssetHandle {
    /// Creates a handle.
    #[must_use]
    pub fn new(id: AssetId, ordinal: usize, created: Option<SystemTime>) -> Self {
        Self {
            id,
            ordinal,
            created,
        }
    }

    #[must_use]
    pub fn id(&self) -> &AssetId {
        &self.id
    }

    #[must_use]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Creation timestamp, when the library knows it.
    #[must_use]
    pub fn created(&self) -> Option<SystemTime> {
        self.created
    }

    /// Returns the same asset re-positioned at `ordinal`.
    #[must_use]
    pub fn with_ordinal(&self, ordinal: usize) -> Self {
        Self {
            ordinal,
            ..self.clone()
        }
    }

    /// Whether both handles reference the same asset, regardless of fetch position.
    #[must_use]
    pub fn same_asset(&self, other: &AssetHandle) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn with_ordinal_keeps_identity() {
        let created = SystemTime::UNIX_EPOCH + Duration::from_secs(42);
        let handle = AssetHandle::new(AssetId::new("a"), 3, Some(created));
        let moved = handle.with_ordinal(7);

        assert_eq!(moved.ordinal(), 7);
        assert_eq!(moved.created(), Some(created));
        assert!(moved.same_asset(&handle));
        assert_ne!(moved, handle);
    }

    #[test]
    fn asset_id_displays_raw_identifier() {
        let id = AssetId::from("5A1B/L0/001");
        assert_eq!(id.to_string(), "5A1B/L0/001");
    }
}
