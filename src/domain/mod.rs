// SPDX-License-Identifier: MPL-2.0
//! Domain layer - pure review types with no I/O.
//!
//! # Modules
//!
//! - [`asset`]: Asset identity ([`AssetId`](asset::AssetId), [`AssetHandle`](asset::AssetHandle))
//! - [`bucket`]: Buckets and single-membership bookkeeping ([`BucketSet`](bucket::BucketSet))
//! - [`collection`]: External album/folder snapshots
//! - [`gesture`]: Gesture vectors and swipe classification
//! - [`newtypes`]: Clamped paging and undo knobs
//! - [`preview`]: Decoded preview bitmaps

pub mod asset;
pub mod bucket;
pub mod collection;
pub mod gesture;
pub mod newtypes;
pub mod preview;
