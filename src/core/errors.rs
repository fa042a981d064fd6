//! Error types for the offload pipeline.
//!
//! Every fallible operation in the crate returns [`OffloadError`]. There is no
//! retry or recovery anywhere: missing environment variables, unreadable
//! images and delegate failures all propagate to the caller unchanged.

use thiserror::Error;

/// Stages of the preprocessing pipeline, used to attribute processing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Aspect-preserving resize.
    Resize,
    /// Center crop.
    Crop,
    /// Per-channel normalization.
    Normalization,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Resize => write!(f, "resize"),
            ProcessingStage::Crop => write!(f, "crop"),
            ProcessingStage::Normalization => write!(f, "normalization"),
        }
    }
}

/// Errors produced by the offload pipeline.
#[derive(Error, Debug)]
pub enum OffloadError {
    /// An image could not be decoded from disk.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// An image could not be encoded to disk.
    #[error("image encode")]
    ImageEncode(#[source] image::ImageError),

    /// A preprocessing stage failed.
    #[error("{stage} failed: {context}")]
    Processing {
        /// The stage that failed.
        stage: ProcessingStage,
        /// What the stage was doing when it failed.
        context: String,
    },

    /// Input that violates a documented precondition.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// A configuration value outside the accepted range.
    #[error("configuration: {message}")]
    Config { message: String },

    /// A required environment variable is absent.
    #[error("missing environment variable {name}")]
    MissingEnv { name: String },

    /// The vendor delegate library could not be loaded or is missing a symbol.
    #[error("delegate library: {context}")]
    Library {
        context: String,
        #[source]
        source: libloading::Error,
    },

    /// The delegate engine reported a failure.
    #[error("delegate engine: {message}")]
    Engine { message: String },

    /// A tensor could not be built from raw data.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// Filesystem error.
    #[error("io")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("serialization")]
    Serde(#[from] serde_json::Error),
}

impl OffloadError {
    /// Creates a processing error for the given stage.
    pub fn processing(stage: ProcessingStage, context: impl Into<String>) -> Self {
        OffloadError::Processing {
            stage,
            context: context.into(),
        }
    }

    /// Creates an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        OffloadError::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        OffloadError::Config {
            message: message.into(),
        }
    }

    /// Creates an engine error from a delegate status code.
    pub fn engine_status(operation: &str, status: i32) -> Self {
        OffloadError::Engine {
            message: format!("{operation} returned status {status}"),
        }
    }

    /// Creates an engine error with a message.
    pub fn engine(message: impl Into<String>) -> Self {
        OffloadError::Engine {
            message: message.into(),
        }
    }
}

/// Convenient result alias for offload operations.
pub type OffloadResult<T> = Result<T, OffloadError>;
