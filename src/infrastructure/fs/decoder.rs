// SPDX-License-Identifier: MPL-2.0
//! Preview decoding with the `image` crate.
//!
//! Decoding and resampling are CPU-bound, so each request runs on the tokio
//! blocking pool and the async side only awaits the join handle.

use super::FsLibrary;
use crate::application::port::{DecodeError, PreviewDecoder};
use crate::domain::asset::AssetHandle;
use crate::domain::preview::{ContentMode, PreviewImage, TargetSize};
use async_trait::async_trait;
use image_rs::imageops::FilterType;
use image_rs::{DynamicImage, GenericImageView, ImageError, ImageReader};
use std::path::Path;
use std::sync::Arc;

/// Decodes previews of the files of an [`FsLibrary`].
#[derive(Debug, Clone)]
pub struct ImagePreviewDecoder {
    library: Arc<FsLibrary>,
}

impl ImagePreviewDecoder {
    #[must_use]
    pub fn new(library: Arc<FsLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl PreviewDecoder for ImagePreviewDecoder {
    async fn request_preview(
        &self,
        asset: &AssetHandle,
        target: TargetSize,
        mode: ContentMode,
    ) -> Result<PreviewImage, DecodeError> {
        let path = self
            .library
            .path_of(asset.id())
            .ok_or_else(|| DecodeError::NotFound(asset.id().clone()))?
            .to_path_buf();

        tokio::task::spawn_blocking(move || decode_preview(&path, target, mode))
            .await
            .map_err(|e| DecodeError::TaskFailed(e.to_string()))?
    }
}

/// Decodes `path` and fits it into `target`.
///
/// Images already inside the target are not upscaled in
/// [`ContentMode::AspectFit`].
///
/// # Errors
///
/// Returns a [`DecodeError`] when the file cannot be read or decoded.
pub fn decode_preview(
    path: &Path,
    target: TargetSize,
    mode: ContentMode,
) -> Result<PreviewImage, DecodeError> {
    let image = ImageReader::open(path)
        .map_err(|e| DecodeError::Io(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| DecodeError::Io(e.to_string()))?
        .decode()
        .map_err(map_image_error)?;

    let fitted = fit(image, target, mode);
    let (width, height) = fitted.dimensions();
    Ok(PreviewImage::from_rgba(
        width,
        height,
        fitted.into_rgba8().into_raw(),
    ))
}

fn fit(image: DynamicImage, target: TargetSize, mode: ContentMode) -> DynamicImage {
    match mode {
        ContentMode::AspectFit => {
            let (width, height) = image.dimensions();
            if width <= target.width && height <= target.height {
                image
            } else {
                image.resize(target.width, target.height, FilterType::Triangle)
            }
        }
        ContentMode::AspectFill => {
            image.resize_to_fill(target.width, target.height, FilterType::Triangle)
        }
    }
}

fn map_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Unsupported(e) => DecodeError::UnsupportedFormat(e.to_string()),
        ImageError::IoError(e) => DecodeError::Io(e.to_string()),
        other => DecodeError::Corrupted(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255]))
            .save(&path)
            .expect("failed to write png");
        path
    }

    #[test]
    fn aspect_fit_keeps_ratio_inside_target() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = write_png(dir.path(), "wide.png", 400, 200);

        let preview =
            decode_preview(&path, TargetSize::square(100), ContentMode::AspectFit).unwrap();

        assert_eq!((preview.width(), preview.height()), (100, 50));
        assert_eq!(preview.byte_len(), 100 * 50 * 4);
    }

    #[test]
    fn aspect_fit_does_not_upscale() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = write_png(dir.path(), "small.png", 20, 10);

        let preview =
            decode_preview(&path, TargetSize::square(100), ContentMode::AspectFit).unwrap();
        assert_eq!((preview.width(), preview.height()), (20, 10));
    }

    #[test]
    fn aspect_fill_covers_target_exactly() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = write_png(dir.path(), "wide.png", 400, 200);

        let preview =
            decode_preview(&path, TargetSize::new(80, 60), ContentMode::AspectFill).unwrap();
        assert_eq!((preview.width(), preview.height()), (80, 60));
    }

    #[test]
    fn garbage_is_not_decodable() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        assert!(decode_preview(&path, TargetSize::square(10), ContentMode::AspectFit).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().expect("failed to create temp dir");
        let result = decode_preview(
            &dir.path().join("gone.png"),
            TargetSize::square(10),
            ContentMode::AspectFit,
        );
        assert!(matches!(result, Err(DecodeError::Io(_))));
    }

    #[tokio::test]
    async fn decoder_resolves_assets_through_library() {
        let dir = tempdir().expect("failed to create temp dir");
        write_png(dir.path(), "a.png", 30, 30);
        let library = Arc::new(FsLibrary::scan(dir.path()).unwrap());
        let decoder = ImagePreviewDecoder::new(Arc::clone(&library));
        let handle = crate::application::port::AssetSource::asset_at(&*library, 0).unwrap();

        let preview = decoder
            .request_preview(&handle, TargetSize::square(10), ContentMode::AspectFit)
            .await
            .unwrap();
        assert_eq!(preview.width(), 10);

        let stranger = AssetHandle::new(crate::domain::asset::AssetId::new("nope"), 0, None);
        assert!(matches!(
            decoder
                .request_preview(&stranger, TargetSize::square(10), ContentMode::AspectFit)
                .await,
            Err(DecodeError::NotFound(_))
        ));
    }
}
