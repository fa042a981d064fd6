//! The linear offload workflow: preprocess, compile (calibrate), infer,
//! report.

pub mod compile;
pub mod infer;
pub mod preprocess;
pub mod report;

pub use compile::CompilationDriver;
pub use infer::{ClassificationResult, InferenceDriver};
pub use preprocess::Preprocessor;
pub use report::{render_bar_chart, BenchmarkReport, ChartConfig};

#[cfg(test)]
pub(crate) mod testing {
    use crate::core::engine::{BenchmarkRecord, InferenceEngine};
    use crate::core::errors::{OffloadError, OffloadResult};
    use crate::core::Tensor4D;

    /// In-memory engine standing in for the vendor delegate in driver tests.
    pub struct MockEngine {
        pub scores: Vec<f32>,
        pub invocations: usize,
        pub inputs_seen: Vec<Vec<usize>>,
        pub fail_invoke_after: Option<usize>,
        pub record: BenchmarkRecord,
    }

    impl MockEngine {
        pub fn with_scores(scores: Vec<f32>) -> Self {
            Self {
                scores,
                invocations: 0,
                inputs_seen: Vec::new(),
                fail_invoke_after: None,
                record: BenchmarkRecord::default(),
            }
        }
    }

    impl InferenceEngine for MockEngine {
        fn input_shape(&self) -> OffloadResult<Vec<i64>> {
            Ok(vec![1, 224, 224, 3])
        }

        fn set_input(&mut self, input: &Tensor4D) -> OffloadResult<()> {
            self.inputs_seen.push(input.shape().to_vec());
            Ok(())
        }

        fn invoke(&mut self) -> OffloadResult<()> {
            if let Some(limit) = self.fail_invoke_after {
                if self.invocations >= limit {
                    return Err(OffloadError::engine("mock invoke failure"));
                }
            }
            self.invocations += 1;
            Ok(())
        }

        fn output(&mut self) -> OffloadResult<Vec<f32>> {
            Ok(self.scores.clone())
        }

        fn benchmark(&self) -> OffloadResult<BenchmarkRecord> {
            Ok(self.record)
        }
    }
}
