// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`memory`]: Whole library in memory (implements every port)
//! - [`fs`]: Directory of image files ([`AssetSource`]) and an `image`-based
//!   [`PreviewDecoder`]
//! - [`catalog`]: Albums kept in a TOML manifest next to the photos
//!   (implements [`CollectionStore`])
//!
//! [`AssetSource`]: crate::application::port::AssetSource
//! [`PreviewDecoder`]: crate::application::port::PreviewDecoder
//! [`CollectionStore`]: crate::application::port::CollectionStore

pub mod catalog;
pub mod fs;
pub mod memory;

pub use catalog::TomlCollectionStore;
pub use fs::{FsLibrary, ImagePreviewDecoder};
pub use memory::MemoryLibrary;
