//! Per-channel image normalization.
//!
//! Normalization is the affine transform `v * alpha[c] + beta[c]` applied to
//! every pixel of every channel. For a mean/scale pair the coefficients are
//! `alpha = scale` and `beta = -mean * scale`, so the model default
//! (mean 128, scale 1/128) computes `(v - 128) * 0.0078125`.

use crate::core::constants::{DEFAULT_NORMALIZE_MEAN, DEFAULT_NORMALIZE_SCALE};
use crate::core::errors::{OffloadError, OffloadResult};
use crate::core::Tensor4D;
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Memory layout of the produced tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// Batch, height, width, channel — the engine's native layout.
    HWC,
    /// Batch, channel, height, width.
    CHW,
}

/// Normalizes images into model input tensors.
#[derive(Debug, Clone)]
pub struct NormalizeImage {
    /// Per-channel multiplier.
    pub alpha: [f32; 3],
    /// Per-channel offset.
    pub beta: [f32; 3],
    /// Output tensor layout.
    pub order: ChannelOrder,
}

impl NormalizeImage {
    /// Creates a normalizer from per-channel mean and scale.
    ///
    /// Every scale must be finite and greater than 0.
    pub fn new(mean: [f32; 3], scale: [f32; 3], order: ChannelOrder) -> OffloadResult<Self> {
        for (i, &s) in scale.iter().enumerate() {
            if !s.is_finite() || s <= 0.0 {
                return Err(OffloadError::config(format!(
                    "scale at channel {i} must be finite and greater than 0, got {s}"
                )));
            }
        }
        let mut alpha = [0f32; 3];
        let mut beta = [0f32; 3];
        for c in 0..3 {
            alpha[c] = scale[c];
            beta[c] = -mean[c] * scale[c];
        }
        Ok(Self { alpha, beta, order })
    }

    /// The model default: mean 128, scale 1/128, NHWC layout.
    pub fn for_quantized_classifier() -> OffloadResult<Self> {
        Self::new(
            [DEFAULT_NORMALIZE_MEAN; 3],
            [DEFAULT_NORMALIZE_SCALE; 3],
            ChannelOrder::HWC,
        )
    }

    /// Normalizes a single image into a rank-4 tensor with batch dimension 1.
    pub fn normalize_to(&self, img: &RgbImage) -> OffloadResult<Tensor4D> {
        let (width, height) = img.dimensions();
        let (w, h) = (width as usize, height as usize);
        let mut data = vec![0f32; h * w * 3];

        match self.order {
            ChannelOrder::HWC => {
                for (x, y, pixel) in img.enumerate_pixels() {
                    let base = (y as usize * w + x as usize) * 3;
                    for c in 0..3 {
                        data[base + c] = pixel[c] as f32 * self.alpha[c] + self.beta[c];
                    }
                }
                Ok(Tensor4D::from_shape_vec((1, h, w, 3), data)?)
            }
            ChannelOrder::CHW => {
                for (x, y, pixel) in img.enumerate_pixels() {
                    for c in 0..3 {
                        data[c * h * w + y as usize * w + x as usize] =
                            pixel[c] as f32 * self.alpha[c] + self.beta[c];
                    }
                }
                Ok(Tensor4D::from_shape_vec((1, 3, h, w), data)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_default_matches_mean_scale_form() {
        let norm = NormalizeImage::for_quantized_classifier().unwrap();
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([128, 0, 255]));
        img.put_pixel(1, 0, Rgb([64, 192, 128]));

        let tensor = norm.normalize_to(&img).unwrap();
        assert_eq!(tensor.shape(), &[1, 1, 2, 3]);
        // (v - 128) * 0.0078125 for every channel.
        assert_eq!(tensor[[0, 0, 0, 0]], 0.0);
        assert_eq!(tensor[[0, 0, 0, 1]], -1.0);
        assert_eq!(tensor[[0, 0, 0, 2]], (255.0 - 128.0) * 0.0078125);
        assert_eq!(tensor[[0, 0, 1, 0]], (64.0 - 128.0) * 0.0078125);
        assert_eq!(tensor[[0, 0, 1, 1]], (192.0 - 128.0) * 0.0078125);
        assert_eq!(tensor[[0, 0, 1, 2]], 0.0);
    }

    #[test]
    fn test_chw_layout() {
        let norm = NormalizeImage::new([0.0; 3], [1.0; 3], ChannelOrder::CHW).unwrap();
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(1, 0, Rgb([10, 20, 30]));

        let tensor = norm.normalize_to(&img).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 2, 2]);
        assert_eq!(tensor[[0, 0, 0, 1]], 10.0);
        assert_eq!(tensor[[0, 1, 0, 1]], 20.0);
        assert_eq!(tensor[[0, 2, 0, 1]], 30.0);
    }

    #[test]
    fn test_nonpositive_scale_rejected() {
        assert!(NormalizeImage::new([0.0; 3], [1.0, 0.0, 1.0], ChannelOrder::HWC).is_err());
        assert!(NormalizeImage::new([0.0; 3], [1.0, -2.0, 1.0], ChannelOrder::HWC).is_err());
    }
}
