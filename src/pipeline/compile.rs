//! The offline compilation driver.
//!
//! Compilation is a calibration loop: representative frames are preprocessed
//! and pushed through a delegate engine opened in compile mode. The delegate
//! accumulates quantization statistics across invocations and emits its
//! artifacts on completion; this driver contributes nothing but the loop.

use crate::core::config::DelegateConfig;
use crate::core::engine::InferenceEngine;
use crate::core::errors::{OffloadError, OffloadResult};
use crate::pipeline::preprocess::Preprocessor;
use crate::utils::load_images_batch;
use std::path::PathBuf;
use tracing::{debug, info};

/// Feeds calibration frames through a compile-mode engine.
#[derive(Debug)]
pub struct CompilationDriver {
    preprocessor: Preprocessor,
    frames: usize,
}

impl CompilationDriver {
    /// Creates a driver taking its frame count from the delegate
    /// configuration.
    pub fn new(config: &DelegateConfig) -> OffloadResult<Self> {
        config.validate()?;
        Ok(Self {
            preprocessor: Preprocessor::new()?,
            frames: config.calibration_frames,
        })
    }

    /// Replaces the preprocessing pipeline.
    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Runs the calibration loop.
    ///
    /// The calibration set is truncated to the configured frame count; fewer
    /// images than frames is an error, since the delegate would calibrate on
    /// an unrepresentative set. Returns the number of frames fed. Any engine
    /// error is fatal and unrecovered.
    pub fn run<E: InferenceEngine>(
        &self,
        engine: &mut E,
        images: &[PathBuf],
    ) -> OffloadResult<usize> {
        if images.len() < self.frames {
            return Err(OffloadError::invalid_input(format!(
                "calibration needs {} frames, got {} images",
                self.frames,
                images.len()
            )));
        }
        let selected = &images[..self.frames];
        info!(frames = selected.len(), "starting calibration");

        let loaded = load_images_batch(selected)?;
        for (path, img) in selected.iter().zip(&loaded) {
            let tensor = self.preprocessor.process(img)?;
            engine.set_input(&tensor)?;
            engine.invoke()?;
            debug!(frame = %path.display(), "calibration frame done");
        }

        info!(frames = selected.len(), "calibration finished");
        Ok(selected.len())
    }
}
