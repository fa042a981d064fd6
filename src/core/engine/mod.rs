//! The delegate/runtime capability boundary.
//!
//! The vendor delegate performs subgraph partitioning, quantization and DSP
//! code generation behind a closed binary. This module models it as the
//! smallest interface the pipeline needs: configure at load, set an input,
//! invoke, read the score vector back, read performance counters. Nothing of
//! the delegate's internals leaks through.

pub mod native;

use crate::core::errors::OffloadResult;
use crate::core::Tensor4D;

pub use native::NativeDelegate;

/// The two ways a delegate-backed engine instance can be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    /// Offline calibration: invocations accumulate quantization statistics
    /// and the delegate emits artifacts on completion.
    Compile,
    /// On-device execution: the engine loads previously compiled artifacts.
    Execute,
}

impl EngineMode {
    /// Wire value used across the native boundary.
    pub fn as_raw(self) -> u32 {
        match self {
            EngineMode::Compile => 0,
            EngineMode::Execute => 1,
        }
    }
}

impl std::fmt::Display for EngineMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineMode::Compile => write!(f, "compile"),
            EngineMode::Execute => write!(f, "execute"),
        }
    }
}

/// Performance counters read back from the inference engine.
///
/// The record is read-only; this crate only converts it to human-readable
/// numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BenchmarkRecord {
    /// Total processing time for one invocation, microseconds.
    pub total_time_us: u64,
    /// Host-to-accelerator input copy time, microseconds.
    pub copy_in_us: u64,
    /// Accelerator-to-host output copy time, microseconds.
    pub copy_out_us: u64,
    /// Bytes read from DDR during one invocation.
    pub ddr_read_bytes: u64,
    /// Bytes written to DDR during one invocation.
    pub ddr_write_bytes: u64,
    /// Number of subgraphs offloaded to the accelerator.
    pub subgraphs: u32,
}

impl BenchmarkRecord {
    /// Invocations per second implied by the total processing time.
    pub fn throughput_fps(&self) -> f64 {
        if self.total_time_us == 0 {
            return 0.0;
        }
        1_000_000.0 / self.total_time_us as f64
    }

    /// DDR read bandwidth in MB/s over one invocation.
    pub fn read_bandwidth_mbps(&self) -> f64 {
        bandwidth_mbps(self.ddr_read_bytes, self.total_time_us)
    }

    /// DDR write bandwidth in MB/s over one invocation.
    pub fn write_bandwidth_mbps(&self) -> f64 {
        bandwidth_mbps(self.ddr_write_bytes, self.total_time_us)
    }
}

fn bandwidth_mbps(bytes: u64, time_us: u64) -> f64 {
    if time_us == 0 {
        return 0.0;
    }
    (bytes as f64 / 1_000_000.0) / (time_us as f64 / 1_000_000.0)
}

/// A delegate-backed inference engine instance.
///
/// Calls are blocking and never retried; every failure is fatal to the run.
pub trait InferenceEngine {
    /// The input tensor shape the engine expects, `-1` for dynamic
    /// dimensions.
    fn input_shape(&self) -> OffloadResult<Vec<i64>>;

    /// Sets the input tensor for the next invocation.
    fn set_input(&mut self, input: &Tensor4D) -> OffloadResult<()>;

    /// Runs one invocation.
    fn invoke(&mut self) -> OffloadResult<()>;

    /// Reads the raw score vector produced by the last invocation.
    fn output(&mut self) -> OffloadResult<Vec<f32>>;

    /// Reads the engine's performance counters.
    fn benchmark(&self) -> OffloadResult<BenchmarkRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_from_total_time() {
        let record = BenchmarkRecord {
            total_time_us: 20_000,
            ..Default::default()
        };
        assert!((record.throughput_fps() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_bandwidth_conversion() {
        let record = BenchmarkRecord {
            total_time_us: 1_000_000,
            ddr_read_bytes: 250_000_000,
            ddr_write_bytes: 0,
            ..Default::default()
        };
        assert!((record.read_bandwidth_mbps() - 250.0).abs() < 1e-9);
        assert_eq!(record.write_bandwidth_mbps(), 0.0);
    }

    #[test]
    fn test_zero_time_reports_zero() {
        let record = BenchmarkRecord::default();
        assert_eq!(record.throughput_fps(), 0.0);
        assert_eq!(record.read_bandwidth_mbps(), 0.0);
    }

    #[test]
    fn test_engine_mode_raw_values() {
        assert_eq!(EngineMode::Compile.as_raw(), 0);
        assert_eq!(EngineMode::Execute.as_raw(), 1);
    }
}
