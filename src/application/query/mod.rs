// SPDX-License-Identifier: MPL-2.0
//! Query services (CQRS read-side).
//!
//! Read-only views over the collection store. Nothing here mutates the
//! library or the review session.
//!
//! # Available Services
//!
//! - [`albums`]: Album overview, per-asset membership, title suggestions and
//!   the set of already-collected assets

pub mod albums;

pub use albums::{albums_containing, collected_asset_ids, overview, suggest_titles};
