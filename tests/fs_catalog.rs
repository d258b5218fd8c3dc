// SPDX-License-Identifier: MPL-2.0
use image_rs::{Rgba, RgbaImage};
use photo_swipe::application::controller::ReviewController;
use photo_swipe::application::port::{AssetSource, CollectionStore};
use photo_swipe::application::session::ReviewState;
use photo_swipe::config::Config;
use photo_swipe::domain::collection::CollectionKind;
use photo_swipe::domain::gesture::GestureVector;
use photo_swipe::infrastructure::catalog::{MANIFEST_FILE, TRASH_DIR};
use photo_swipe::infrastructure::{FsLibrary, ImagePreviewDecoder, TomlCollectionStore};
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn write_png(dir: &Path, name: &str) {
    RgbaImage::from_pixel(64, 32, Rgba([10, 120, 200, 255]))
        .save(dir.join(name))
        .expect("failed to write png");
}

fn small_previews() -> Config {
    let mut config = Config::default();
    config.preview.width = Some(16);
    config.preview.height = Some(16);
    config
}

async fn open(library: &Arc<FsLibrary>, config: &Config) -> ReviewController {
    let decoder = Arc::new(ImagePreviewDecoder::new(Arc::clone(library)));
    ReviewController::open(&**library, &**library, decoder, config)
        .await
        .expect("review should open")
}

fn png_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .expect("directory should be readable")
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "png"))
        .count()
}

#[tokio::test]
async fn directory_review_moves_deletes_to_trash_and_persists_albums() {
    let dir = tempdir().expect("failed to create temp dir");
    for name in ["one.png", "two.png", "three.png"] {
        write_png(dir.path(), name);
    }

    let library = Arc::new(FsLibrary::scan(dir.path()).expect("scan should succeed"));
    assert_eq!(library.count(), 3);
    let store = TomlCollectionStore::open(Arc::clone(&library)).expect("catalog should open");

    let mut review = open(&library, &small_previews()).await;
    review.settle().await;
    for entry in review.session().buffer().iter() {
        let image = entry.preview.image().expect("preview should be decoded");
        assert_eq!((image.width(), image.height()), (16, 8));
    }

    review.swipe(GestureVector::new(-400.0, 0.0)).unwrap();
    review.swipe(GestureVector::new(400.0, 0.0)).unwrap();
    review.swipe(GestureVector::new(400.0, 0.0)).unwrap();
    assert_eq!(review.session().state(), ReviewState::Complete);

    let report = review.commit(&store).await;
    assert!(report.all_succeeded());

    assert_eq!(png_count(dir.path()), 2);
    assert_eq!(png_count(&dir.path().join(TRASH_DIR)), 1);
    assert!(dir.path().join(MANIFEST_FILE).exists());

    // A fresh scan and catalog see the persisted album and hide its members.
    let rescanned = Arc::new(FsLibrary::scan(dir.path()).expect("rescan should succeed"));
    let reopened = TomlCollectionStore::open(Arc::clone(&rescanned)).expect("catalog should reopen");
    let albums = reopened
        .list_collections(CollectionKind::Album)
        .await
        .unwrap();
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].title, "Keep");
    assert_eq!(albums[0].member_count, 2);

    let mut second = open(&rescanned, &small_previews()).await;
    assert_eq!(second.session().buffer().len(), 2);
    let hidden = second.hide_collected(&reopened).await.unwrap();
    assert_eq!(hidden, 2);
    assert_eq!(second.session().state(), ReviewState::Complete);
    second.settle().await;
}

#[tokio::test]
async fn unreadable_file_gets_a_placeholder() {
    let dir = tempdir().expect("failed to create temp dir");
    write_png(dir.path(), "good.png");
    std::fs::write(dir.path().join("bad.jpg"), b"not a jpeg").unwrap();

    let library = Arc::new(FsLibrary::scan(dir.path()).unwrap());
    let mut review = open(&library, &small_previews()).await;
    review.settle().await;

    let ready = review
        .session()
        .buffer()
        .iter()
        .filter(|e| e.preview.image().is_some())
        .count();
    let failed = review
        .session()
        .buffer()
        .iter()
        .filter(|e| e.preview.image().is_none() && !e.preview.is_pending())
        .count();
    assert_eq!((ready, failed), (1, 1));
}
