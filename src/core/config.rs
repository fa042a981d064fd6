//! Delegate configuration and toolchain environment.
//!
//! [`DelegateConfig`] is the typed form of the flat key/value record the
//! vendor delegate accepts. The crate validates syntax only (ranges, shapes of
//! values); the semantics of every option belong to the delegate. The record
//! crosses the boundary as strings via [`DelegateConfig::to_options`].

use crate::core::constants::{
    CROSS_COMPILER_ENV, DEFAULT_CALIBRATION_FRAMES, DEFAULT_CALIBRATION_ITERATIONS,
    DELEGATE_TOOLS_ENV,
};
use crate::core::errors::{OffloadError, OffloadResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Configuration record handed opaquely to the vendor delegate.
///
/// Field semantics (bit-width trade-offs, what an accuracy level buys, how
/// calibration iterations are spent) are defined entirely by the delegate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegateConfig {
    /// Directory receiving delegate-written compilation artifacts.
    pub artifacts_dir: PathBuf,
    /// Quantization bit-width (8 or 16).
    pub tensor_bits: u8,
    /// Accuracy level (0 = fast, 1 = high accuracy).
    pub accuracy_level: u8,
    /// Number of calibration frames fed during compilation.
    pub calibration_frames: usize,
    /// Number of calibration iterations over the frames.
    pub calibration_iterations: usize,
    /// Delegate debug verbosity (0..=4).
    pub debug_level: u8,
    /// Operator identifiers the delegate must not offload.
    pub deny_list: Vec<u32>,
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from("artifacts"),
            tensor_bits: 8,
            accuracy_level: 1,
            calibration_frames: DEFAULT_CALIBRATION_FRAMES,
            calibration_iterations: DEFAULT_CALIBRATION_ITERATIONS,
            debug_level: 0,
            deny_list: Vec::new(),
        }
    }
}

impl DelegateConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> OffloadResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the artifact directory.
    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = dir.into();
        self
    }

    /// Sets the quantization bit-width.
    pub fn with_tensor_bits(mut self, bits: u8) -> Self {
        self.tensor_bits = bits;
        self
    }

    /// Sets the accuracy level.
    pub fn with_accuracy_level(mut self, level: u8) -> Self {
        self.accuracy_level = level;
        self
    }

    /// Sets the calibration frame count.
    pub fn with_calibration_frames(mut self, frames: usize) -> Self {
        self.calibration_frames = frames;
        self
    }

    /// Sets the calibration iteration count.
    pub fn with_calibration_iterations(mut self, iterations: usize) -> Self {
        self.calibration_iterations = iterations;
        self
    }

    /// Sets the delegate debug verbosity.
    pub fn with_debug_level(mut self, level: u8) -> Self {
        self.debug_level = level;
        self
    }

    /// Sets the operator deny-list.
    pub fn with_deny_list(mut self, ops: Vec<u32>) -> Self {
        self.deny_list = ops;
        self
    }

    /// Validates the configuration.
    ///
    /// Checks value ranges only. The deny-list is deliberately not validated:
    /// operator identifiers are opaque to this crate.
    pub fn validate(&self) -> OffloadResult<()> {
        if self.artifacts_dir.as_os_str().is_empty() {
            return Err(OffloadError::config("artifacts_dir must not be empty"));
        }
        if !matches!(self.tensor_bits, 8 | 16) {
            return Err(OffloadError::config(format!(
                "tensor_bits must be 8 or 16, got {}",
                self.tensor_bits
            )));
        }
        if self.accuracy_level > 1 {
            return Err(OffloadError::config(format!(
                "accuracy_level must be 0 or 1, got {}",
                self.accuracy_level
            )));
        }
        if self.calibration_frames == 0 {
            return Err(OffloadError::config(
                "calibration_frames must be greater than 0",
            ));
        }
        if self.calibration_iterations == 0 {
            return Err(OffloadError::config(
                "calibration_iterations must be greater than 0",
            ));
        }
        if self.debug_level > 4 {
            return Err(OffloadError::config(format!(
                "debug_level must be in 0..=4, got {}",
                self.debug_level
            )));
        }
        Ok(())
    }

    /// Flattens the configuration into the key/value record the delegate
    /// consumes.
    ///
    /// The deny-list renders as comma-separated numeric identifiers and is
    /// omitted entirely when empty.
    pub fn to_options(&self) -> BTreeMap<String, String> {
        let mut options = BTreeMap::new();
        options.insert(
            "artifacts_folder".to_string(),
            self.artifacts_dir.display().to_string(),
        );
        options.insert("tensor_bits".to_string(), self.tensor_bits.to_string());
        options.insert(
            "accuracy_level".to_string(),
            self.accuracy_level.to_string(),
        );
        options.insert(
            "advanced_options:calibration_frames".to_string(),
            self.calibration_frames.to_string(),
        );
        options.insert(
            "advanced_options:calibration_iterations".to_string(),
            self.calibration_iterations.to_string(),
        );
        options.insert("debug_level".to_string(), self.debug_level.to_string());
        if !self.deny_list.is_empty() {
            let joined = self
                .deny_list
                .iter()
                .map(|op| op.to_string())
                .collect::<Vec<_>>()
                .join(",");
            options.insert("deny_list".to_string(), joined);
        }
        options
    }
}

/// Locations of the vendor toolchains, read from the environment.
///
/// Both variables are required; absence is fatal to the run.
#[derive(Debug, Clone)]
pub struct ToolchainEnv {
    /// Root of the delegate toolchain (contains the runtime library).
    pub delegate_tools: PathBuf,
    /// Root of the cross-compiler toolchain.
    pub cross_compiler: PathBuf,
}

impl ToolchainEnv {
    /// Reads both toolchain paths from the environment.
    pub fn from_env() -> OffloadResult<Self> {
        Ok(Self {
            delegate_tools: require_env(DELEGATE_TOOLS_ENV)?,
            cross_compiler: require_env(CROSS_COMPILER_ENV)?,
        })
    }

    /// Path of the delegate runtime library inside the toolchain.
    pub fn delegate_library(&self) -> PathBuf {
        self.delegate_tools
            .join(crate::core::constants::DELEGATE_LIBRARY_NAME)
    }
}

fn require_env(name: &str) -> OffloadResult<PathBuf> {
    match std::env::var_os(name) {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => Err(OffloadError::MissingEnv {
            name: name.to_string(),
        }),
    }
}
