//! Aspect-preserving resize to a target shorter side.

use crate::core::errors::{OffloadError, OffloadResult};
use image::imageops::{self, FilterType};
use image::RgbImage;

/// Resizes an image so that its shorter side reaches a target length while
/// preserving the aspect ratio.
///
/// The longer side is scaled by the same factor and rounded to the nearest
/// pixel.
#[derive(Debug, Clone)]
pub struct ResizeShortest {
    target: u32,
    filter: FilterType,
}

impl ResizeShortest {
    /// Creates a resizer targeting the given shorter-side length.
    ///
    /// Returns a configuration error when `target` is zero.
    pub fn new(target: u32) -> OffloadResult<Self> {
        if target == 0 {
            return Err(OffloadError::config(
                "resize target must be greater than 0",
            ));
        }
        Ok(Self {
            target,
            filter: FilterType::Lanczos3,
        })
    }

    /// Overrides the resampling filter (defaults to Lanczos3).
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// The output dimensions for a source of the given size.
    pub fn output_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if width <= height {
            let scaled = (height as f64 * self.target as f64 / width as f64).round() as u32;
            (self.target, scaled.max(1))
        } else {
            let scaled = (width as f64 * self.target as f64 / height as f64).round() as u32;
            (scaled.max(1), self.target)
        }
    }

    /// Resizes the image.
    pub fn apply(&self, img: &RgbImage) -> OffloadResult<RgbImage> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(OffloadError::processing(
                crate::core::ProcessingStage::Resize,
                "source image has a zero dimension",
            ));
        }
        let (new_width, new_height) = self.output_dimensions(width, height);
        Ok(imageops::resize(img, new_width, new_height, self.filter))
    }
}
