// SPDX-License-Identifier: MPL-2.0
//! External collection (album and folder) types.

use std::cmp::Ordering;
use std::fmt;

/// Library-assigned identifier of a collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollectionId(String);

impl CollectionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of an external collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Holds assets.
    Album,
    /// Holds other collections.
    Folder,
}

/// Snapshot of an external collection as listed by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionHandle {
    pub id: CollectionId,
    pub title: String,
    pub kind: CollectionKind,
    /// Parent folder, `None` for top-level collections.
    pub parent: Option<CollectionId>,
    /// Number of assets (always 0 for folders).
    pub member_count: usize,
}

impl CollectionHandle {
    /// Exact, case-sensitive title match.
    #[must_use]
    pub fn is_titled(&self, title: &str) -> bool {
        self.title == title
    }

    #[must_use]
    pub fn is_album(&self) -> bool {
        self.kind == CollectionKind::Album
    }
}

/// Orders folders before albums, then by title, then by id.
#[must_use]
pub fn overview_order(a: &CollectionHandle, b: &CollectionHandle) -> Ordering {
    let rank = |c: &CollectionHandle| match c.kind {
        CollectionKind::Folder => 0,
        CollectionKind::Album => 1,
    };
    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, title: &str, kind: CollectionKind) -> CollectionHandle {
        CollectionHandle {
            id: CollectionId::new(id),
            title: title.to_string(),
            kind,
            parent: None,
            member_count: 0,
        }
    }

    #[test]
    fn folders_sort_before_albums_then_by_title() {
        let mut nodes = vec![
            node("1", "Beach", CollectionKind::Album),
            node("2", "Work", CollectionKind::Folder),
            node("3", "Alps", CollectionKind::Album),
            node("4", "Archive", CollectionKind::Folder),
        ];
        nodes.sort_by(overview_order);
        let titles: Vec<_> = nodes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["Archive", "Work", "Alps", "Beach"]);
    }

    #[test]
    fn title_match_is_case_sensitive() {
        let album = node("1", "Keep", CollectionKind::Album);
        assert!(album.is_titled("Keep"));
        assert!(!album.is_titled("keep"));
    }
}
