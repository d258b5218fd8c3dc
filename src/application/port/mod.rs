// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines the interfaces of the external photo library. Adapters
//! in [`crate::infrastructure`] implement them; the review engine only ever
//! sees these traits.
//!
//! # Available Ports
//!
//! - [`library`]: Ordered asset source and the authorization gate
//! - [`decode`]: Asynchronous preview decoding
//! - [`collections`]: Albums, folders and deletion
//!
//! # Design Notes
//!
//! - All traits use domain types only
//! - Traits are `Send + Sync`; async methods go through `async_trait` so they
//!   can be shared as trait objects across tokio tasks

pub mod collections;
pub mod decode;
pub mod library;

pub use collections::{CollectionStore, StoreError};
pub use decode::{DecodeError, PreviewDecoder};
pub use library::{AccessStatus, AssetSource, AuthorizationGate, FetchOptions, FetchResult};
