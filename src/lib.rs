//! # npu-offload
//!
//! Drives a vendor-supplied NPU/DSP offload delegate through an inference
//! engine's plugin interface. The delegate is a closed-source shared library
//! that performs subgraph partitioning, quantization calibration and DSP code
//! generation; this crate contributes the orchestration around it:
//!
//! - **Preprocessing**: aspect-preserving resize, center crop and
//!   per-channel normalization into model input tensors
//! - **Compilation**: a typed delegate option record plus the calibration
//!   loop that lets the delegate emit offline artifacts
//! - **Artifacts**: lifecycle of the directory the delegate writes into
//! - **Inference**: repeated invocations over compiled artifacts with top-k
//!   label decoding
//! - **Reporting**: performance counter summaries and bar charts
//!
//! The workflow is strictly linear and single-threaded; every failure
//! propagates as [`core::OffloadError`] and nothing is retried.
//!
//! ## Modules
//!
//! * [`core`] - Errors, constants, delegate configuration, engine boundary
//! * [`processors`] - Resize, crop, normalization and top-k operators
//! * [`pipeline`] - Preprocess, compile, infer and report drivers
//! * [`utils`] - Image IO, artifact bookkeeping, labels, log redirection
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use npu_offload::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let env = ToolchainEnv::from_env()?;
//!     let config = DelegateConfig::new()
//!         .with_tensor_bits(8)
//!         .with_calibration_frames(3);
//!
//!     // Compile: clear the artifact directory, feed calibration frames.
//!     ArtifactDir::new(&config.artifacts_dir).prepare()?;
//!     let mut engine = NativeDelegate::open_with_env(&env, EngineMode::Compile, &config)?;
//!     let frames = list_image_files(Path::new("sample-images"))?;
//!     CompilationDriver::new(&config)?.run(&mut engine, &frames)?;
//!     drop(engine);
//!
//!     // Infer: load the compiled artifacts and classify one image.
//!     let mut engine = NativeDelegate::open_with_env(&env, EngineMode::Execute, &config)?;
//!     let driver = InferenceDriver::new(None)?;
//!     let result = driver.run(&mut engine, Path::new("sample-images/airshow.jpg"))?;
//!     println!("{result}");
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude for the common workflow types.
pub mod prelude {
    pub use crate::core::{
        BenchmarkRecord, DelegateConfig, EngineMode, InferenceEngine, NativeDelegate,
        OffloadError, OffloadResult, ToolchainEnv,
    };
    pub use crate::pipeline::{
        render_bar_chart, BenchmarkReport, ChartConfig, ClassificationResult, CompilationDriver,
        InferenceDriver, Preprocessor,
    };
    pub use crate::utils::{list_image_files, load_image, load_labels, ArtifactDir, LogScope};
}
