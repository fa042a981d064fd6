//! Deterministic center crop.

use crate::core::errors::{OffloadError, OffloadResult, ProcessingStage};
use image::imageops;
use image::RgbImage;

/// Crops a square region of fixed size from the center of an image.
///
/// The start offsets are `width/2 - size/2` and `height/2 - size/2` in
/// integer pixels, so the crop region is fully determined by the source
/// dimensions.
#[derive(Debug, Clone)]
pub struct CenterCrop {
    size: u32,
}

impl CenterCrop {
    /// Creates a center crop of `size`×`size` pixels.
    pub fn new(size: u32) -> OffloadResult<Self> {
        if size == 0 {
            return Err(OffloadError::config("crop size must be greater than 0"));
        }
        Ok(Self { size })
    }

    /// The crop size.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// The top-left corner of the crop region for a source of the given size.
    pub fn offsets(&self, width: u32, height: u32) -> (u32, u32) {
        (
            width / 2 - self.size / 2,
            height / 2 - self.size / 2,
        )
    }

    /// Crops the image.
    ///
    /// Fails when either source dimension is smaller than the crop size.
    pub fn apply(&self, img: &RgbImage) -> OffloadResult<RgbImage> {
        let (width, height) = img.dimensions();
        if width < self.size || height < self.size {
            return Err(OffloadError::processing(
                ProcessingStage::Crop,
                format!(
                    "source {width}x{height} is smaller than crop {size}x{size}",
                    size = self.size
                ),
            ));
        }
        let (x0, y0) = self.offsets(width, height);
        Ok(imageops::crop_imm(img, x0, y0, self.size, self.size).to_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_offsets_are_half_minus_half() {
        let crop = CenterCrop::new(224).unwrap();
        assert_eq!(crop.offsets(512, 256), (144, 16));
        assert_eq!(crop.offsets(256, 341), (16, 58));
        assert_eq!(crop.offsets(224, 224), (0, 0));
    }

    #[test]
    fn test_crop_region_content() {
        // Encode source coordinates into pixel values so the crop origin is
        // observable.
        let mut img = RgbImage::new(512, 256);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([(x % 256) as u8, (y % 256) as u8, 0]);
        }
        let cropped = CenterCrop::new(224).unwrap().apply(&img).unwrap();
        assert_eq!(cropped.dimensions(), (224, 224));
        assert_eq!(cropped.get_pixel(0, 0), &Rgb([144, 16, 0]));
        // (144 + 223) % 256 = 111, 16 + 223 = 239
        assert_eq!(cropped.get_pixel(223, 223), &Rgb([111, 239, 0]));
    }

    #[test]
    fn test_source_smaller_than_crop_fails() {
        let img = RgbImage::new(100, 300);
        let result = CenterCrop::new(224).unwrap().apply(&img);
        assert!(matches!(
            result,
            Err(OffloadError::Processing {
                stage: ProcessingStage::Crop,
                ..
            })
        ));
    }
}
