//! Image loading helpers.

use crate::core::constants::DEFAULT_PARALLEL_THRESHOLD;
use crate::core::errors::{OffloadError, OffloadResult};
use image::RgbImage;
use std::path::Path;

/// Loads an image from disk and converts it to 8-bit RGB.
///
/// Any format the `image` crate decodes is accepted. A path that does not
/// resolve to a readable image is an error, never retried.
pub fn load_image(path: &Path) -> OffloadResult<RgbImage> {
    let img = image::open(path).map_err(OffloadError::ImageLoad)?;
    Ok(img.to_rgb8())
}

/// Loads a batch of images, in parallel above a small threshold.
pub fn load_images_batch<P: AsRef<Path> + Send + Sync>(paths: &[P]) -> OffloadResult<Vec<RgbImage>> {
    if paths.len() > DEFAULT_PARALLEL_THRESHOLD {
        use rayon::prelude::*;
        paths.par_iter().map(|p| load_image(p.as_ref())).collect()
    } else {
        paths.iter().map(|p| load_image(p.as_ref())).collect()
    }
}

/// Lists the image files of a directory in name order.
///
/// Entries without a known image extension are skipped silently.
pub fn list_image_files(dir: &Path) -> OffloadResult<Vec<std::path::PathBuf>> {
    const EXTENSIONS: [&str; 5] = ["bmp", "jpeg", "jpg", "png", "webp"];

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_image_is_an_error() {
        let result = load_image(Path::new("/nonexistent/frame.png"));
        assert!(matches!(result, Err(OffloadError::ImageLoad(_))));
    }

    #[test]
    fn test_list_image_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.jpg", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let files = list_image_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
    }
}
