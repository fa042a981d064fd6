//! Core types of the offload pipeline: errors, constants, the delegate
//! configuration record and the engine capability boundary.

pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;

pub use config::{DelegateConfig, ToolchainEnv};
pub use constants::*;
pub use engine::{BenchmarkRecord, EngineMode, InferenceEngine, NativeDelegate};
pub use errors::{OffloadError, OffloadResult, ProcessingStage};

/// A rank-4 image tensor (batch, then spatial and channel dims per layout).
pub type Tensor4D = ndarray::Array4<f32>;

/// Initializes the tracing subscriber for logging.
///
/// Sets up the global subscriber with an environment filter and a formatting
/// layer. Called once at the start of the CLI.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
