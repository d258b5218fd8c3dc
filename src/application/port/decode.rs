// SPDX-License-Identifier: MPL-2.0
//! Preview decoding port definition.
//!
//! The decode service turns an asset handle into a bitmap sized for review.
//! Requests are asynchronous and may complete in any order.

use crate::domain::asset::{AssetHandle, AssetId};
use crate::domain::preview::{ContentMode, PreviewImage, TargetSize};
use async_trait::async_trait;
use thiserror::Error;

/// Errors a decoder may report for a single asset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The decoder does not know this asset.
    #[error("asset not found: {0}")]
    NotFound(AssetId),

    /// The asset's format cannot be decoded.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The data was read but could not be decoded.
    #[error("corrupted image data: {0}")]
    Corrupted(String),

    /// The asset could not be read.
    #[error("I/O error: {0}")]
    Io(String),

    /// The background decode task was lost.
    #[error("decode task failed: {0}")]
    TaskFailed(String),
}

/// Port for the asynchronous preview decoder.
///
/// Implementations must be `Send + Sync`; the loader shares one decoder
/// across all in-flight requests.
#[async_trait]
pub trait PreviewDecoder: Send + Sync {
    /// Decodes a preview of `asset` fitted into `target`.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when no preview can be produced. The review
    /// keeps going with an empty slot.
    async fn request_preview(
        &self,
        asset: &AssetHandle,
        target: TargetSize,
        mode: ContentMode,
    ) -> Result<PreviewImage, DecodeError>;
}
