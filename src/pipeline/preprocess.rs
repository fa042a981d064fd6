//! The image preprocessing pipeline: resize, center-crop, normalize.

use crate::core::constants::{DEFAULT_CROP_SIZE, DEFAULT_SHORTER_SIDE};
use crate::core::errors::OffloadResult;
use crate::core::Tensor4D;
use crate::processors::{CenterCrop, NormalizeImage, ResizeShortest};
use crate::utils::load_image;
use image::RgbImage;
use std::path::Path;

/// Turns an image file into a normalized model input tensor.
///
/// The pipeline resizes preserving aspect ratio until the shorter side
/// reaches the target length, center-crops to the model's square input, then
/// applies the per-channel affine normalization. The result is a pure
/// function of the file content: running it twice on the same file yields
/// identical tensors.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    resize: ResizeShortest,
    crop: CenterCrop,
    normalize: NormalizeImage,
}

impl Preprocessor {
    /// Creates the model-default pipeline: shorter side 256, crop 224,
    /// `(v - 128) * 0.0078125` normalization, NHWC output.
    pub fn new() -> OffloadResult<Self> {
        Ok(Self {
            resize: ResizeShortest::new(DEFAULT_SHORTER_SIDE)?,
            crop: CenterCrop::new(DEFAULT_CROP_SIZE)?,
            normalize: NormalizeImage::for_quantized_classifier()?,
        })
    }

    /// Creates a pipeline from explicit stages.
    pub fn from_stages(
        resize: ResizeShortest,
        crop: CenterCrop,
        normalize: NormalizeImage,
    ) -> Self {
        Self {
            resize,
            crop,
            normalize,
        }
    }

    /// Preprocesses an already loaded image.
    pub fn process(&self, img: &RgbImage) -> OffloadResult<Tensor4D> {
        let resized = self.resize.apply(img)?;
        let cropped = self.crop.apply(&resized)?;
        self.normalize.normalize_to(&cropped)
    }

    /// Loads the file at `path` and preprocesses it.
    pub fn run(&self, path: &Path) -> OffloadResult<Tensor4D> {
        let img = load_image(path)?;
        self.process(&img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_output_shape_is_fixed() {
        let preprocessor = Preprocessor::new().unwrap();
        for (w, h) in [(640, 480), (480, 640), (256, 256), (1000, 300)] {
            let img = RgbImage::from_pixel(w, h, Rgb([10, 20, 30]));
            let tensor = preprocessor.process(&img).unwrap();
            assert_eq!(tensor.shape(), &[1, 224, 224, 3], "for source {w}x{h}");
        }
    }

    #[test]
    fn test_constant_image_normalizes_exactly() {
        // A constant image survives resampling unchanged, so the normalized
        // values are known in closed form.
        let preprocessor = Preprocessor::new().unwrap();
        let img = RgbImage::from_pixel(400, 300, Rgb([128, 255, 0]));

        let tensor = preprocessor.process(&img).unwrap();
        for pixel in tensor.lanes(ndarray::Axis(3)) {
            assert_eq!(pixel[0], 0.0);
            assert_eq!(pixel[1], (255.0 - 128.0) * 0.0078125);
            assert_eq!(pixel[2], (0.0 - 128.0) * 0.0078125);
        }
    }

    #[test]
    fn test_process_is_deterministic() {
        let preprocessor = Preprocessor::new().unwrap();
        let mut img = RgbImage::new(320, 240);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([(x % 251) as u8, (y % 241) as u8, ((x + y) % 239) as u8]);
        }

        let first = preprocessor.process(&img).unwrap();
        let second = preprocessor.process(&img).unwrap();
        assert_eq!(first, second);
    }
}
