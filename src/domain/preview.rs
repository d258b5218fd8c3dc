// SPDX-License-Identifier: MPL-2.0
//! Decoded preview bitmaps.
//!
//! These types carry pure pixel data without any presentation dependencies;
//! the presentation layer converts them to its own image handles.

use std::sync::Arc;

/// How a preview is fitted into the requested target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMode {
    /// Scale down until the whole image fits inside the target.
    #[default]
    AspectFit,
    /// Scale and crop until the image covers the whole target.
    AspectFill,
}

/// Requested preview dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    /// Creates a target size; zero dimensions are raised to one pixel.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Square target of `edge` pixels.
    #[must_use]
    pub fn square(edge: u32) -> Self {
        Self::new(edge, edge)
    }
}

/// Decoded RGBA preview of an asset.
///
/// # Example
///
/// ```
/// use photo_swipe::domain::preview::PreviewImage;
///
/// let image = PreviewImage::from_rgba(4, 2, vec![0u8; 4 * 2 * 4]);
/// assert_eq!(image.width(), 4);
/// assert_eq!(image.byte_len(), 32);
/// ```
#[derive(Debug, Clone)]
pub struct PreviewImage {
    width: u32,
    height: u32,
    rgba_bytes: Arc<Vec<u8>>,
}

impl PreviewImage {
    /// Creates a preview from dimensions and shared RGBA pixel data.
    ///
    /// # Panics
    ///
    /// Panics if the pixel data length doesn't match `width * height * 4`.
    #[must_use]
    pub fn new(width: u32, height: u32, rgba_bytes: Arc<Vec<u8>>) -> Self {
        let expected_len = (width as usize) * (height as usize) * 4;
        assert_eq!(
            rgba_bytes.len(),
            expected_len,
            "RGBA data length mismatch: expected {expected_len}, got {}",
            rgba_bytes.len()
        );

        Self {
            width,
            height,
            rgba_bytes,
        }
    }

    /// Creates a preview from owned RGBA pixel data.
    ///
    /// # Panics
    ///
    /// Panics if the pixel data length doesn't match `width * height * 4`.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, rgba_bytes: Vec<u8>) -> Self {
        Self::new(width, height, Arc::new(rgba_bytes))
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    /// Size of the pixel buffer in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.rgba_bytes.len()
    }
}

impl PartialEq for PreviewImage {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.rgba_bytes == other.rgba_bytes
    }
}

impl Eq for PreviewImage {}
