use std::fs;
use std::path::Path;

use image::{Rgba, RgbaImage};
use tilecheck_engine::fatal::{HasStatus, Status};
use tilecheck_engine::image_loader::{ImageLoadError, load_bgra8};

#[test]
fn decodes_resizes_and_swizzles_to_bgra() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("image.png");
    RgbaImage::from_pixel(200, 100, Rgba([10, 20, 200, 255]))
        .save(&path)
        .unwrap();

    let pixels = load_bgra8(&path, 128, 128).unwrap();
    assert_eq!((pixels.width(), pixels.height()), (128, 128));
    assert_eq!(pixels.as_bytes().len(), 128 * 128 * 4);
    assert_eq!(pixels.row_pitch(), 512);

    let [b, g, r, a] = pixels.pixel(64, 64);
    assert!(b.abs_diff(200) <= 1 && g.abs_diff(20) <= 1 && r.abs_diff(10) <= 1);
    assert_eq!(a, 255);
}

#[test]
fn matching_size_keeps_pixels_exact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("image.png");
    let mut source = RgbaImage::from_pixel(32, 32, Rgba([0, 0, 0, 255]));
    source.put_pixel(3, 5, Rgba([255, 128, 1, 255]));
    source.save(&path).unwrap();

    let pixels = load_bgra8(&path, 32, 32).unwrap();
    assert_eq!(pixels.pixel(3, 5), [1, 128, 255, 255]);
    assert_eq!(pixels.pixel(0, 0), [0, 0, 0, 255]);
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_bgra8(&dir.path().join("image.png"), 128, 128).unwrap_err();
    assert!(matches!(err, ImageLoadError::NotFound(_)), "{err:?}");
    assert_eq!(err.status(), Status::FILE_NOT_FOUND);
}

#[test]
fn corrupt_file_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("image.png");
    fs::write(&path, b"\x89PNG\r\n\x1a\nnot really a png").unwrap();

    let err = load_bgra8(&path, 128, 128).unwrap_err();
    assert!(matches!(err, ImageLoadError::Decode { .. }), "{err:?}");
    assert_eq!(err.status(), Status::BAD_IMAGE);
}

#[test]
fn zero_size_is_rejected_before_reading() {
    let err = load_bgra8(Path::new("does-not-matter.png"), 0, 32).unwrap_err();
    assert!(matches!(err, ImageLoadError::ZeroSize { width: 0, height: 32 }));
    assert_eq!(err.status(), Status::E_INVALIDARG);
}
