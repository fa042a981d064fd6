//! End-to-end preprocessing properties, exercised through files on disk.

use image::{Rgb, RgbImage};
use npu_offload::pipeline::Preprocessor;
use std::path::PathBuf;

fn write_gradient(dir: &std::path::Path, name: &str, width: u32, height: u32) -> PathBuf {
    let mut img = RgbImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]);
    }
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

#[test]
fn output_dimensions_are_fixed_for_any_source_size() {
    let dir = tempfile::tempdir().unwrap();
    let preprocessor = Preprocessor::new().unwrap();

    for (i, (w, h)) in [(640, 480), (480, 640), (300, 1200), (256, 256)]
        .iter()
        .enumerate()
    {
        let path = write_gradient(dir.path(), &format!("img_{i}.png"), *w, *h);
        let tensor = preprocessor.run(&path).unwrap();
        assert_eq!(tensor.shape(), &[1, 224, 224, 3], "for source {w}x{h}");
    }
}

#[test]
fn preprocessing_is_idempotent_over_file_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gradient(dir.path(), "img.png", 512, 384);
    let preprocessor = Preprocessor::new().unwrap();

    let first = preprocessor.run(&path).unwrap();
    let second = preprocessor.run(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn normalization_matches_mean_scale_closed_form() {
    // Constant pixels survive resampling, so every output value is known.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gray.png");
    RgbImage::from_pixel(400, 320, Rgb([128, 192, 64]))
        .save(&path)
        .unwrap();

    let tensor = Preprocessor::new().unwrap().run(&path).unwrap();
    for value in tensor.slice(ndarray::s![0, .., .., 0]).iter() {
        assert_eq!(*value, 0.0);
    }
    for value in tensor.slice(ndarray::s![0, .., .., 1]).iter() {
        assert_eq!(*value, (192.0 - 128.0) * 0.0078125);
    }
    for value in tensor.slice(ndarray::s![0, .., .., 2]).iter() {
        assert_eq!(*value, (64.0 - 128.0) * 0.0078125);
    }
}

#[test]
fn unreadable_path_is_an_error() {
    let preprocessor = Preprocessor::new().unwrap();
    assert!(preprocessor
        .run(std::path::Path::new("/nonexistent/frame.jpg"))
        .is_err());
}
