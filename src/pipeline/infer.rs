//! The inference driver.
//!
//! Runs one image through an execute-mode engine a fixed number of times to
//! stabilize timing, then decodes the top-k scores into labels.

use crate::core::constants::{DEFAULT_INFER_RUNS, DEFAULT_TOPK};
use crate::core::engine::InferenceEngine;
use crate::core::errors::{OffloadError, OffloadResult};
use crate::pipeline::preprocess::Preprocessor;
use crate::processors::Topk;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Decoded predictions and timing for one inference run.
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Class indices sorted by descending score.
    pub class_ids: Vec<usize>,
    /// Scores corresponding to `class_ids`.
    pub scores: Vec<f32>,
    /// Label names corresponding to `class_ids`.
    pub labels: Vec<String>,
    /// Mean wall-clock latency per invocation, warmup excluded.
    pub mean_latency: Duration,
    /// Number of timed invocations behind `mean_latency`.
    pub timed_runs: usize,
}

impl std::fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "mean latency {:.2} ms over {} runs",
            self.mean_latency.as_secs_f64() * 1000.0,
            self.timed_runs
        )?;
        for ((label, &score), &class_id) in self
            .labels
            .iter()
            .zip(&self.scores)
            .zip(&self.class_ids)
        {
            writeln!(f, "{label:<40} class {class_id:<5} score {score:.4}")?;
        }
        Ok(())
    }
}

/// Repeated-invocation inference with top-k decoding.
#[derive(Debug)]
pub struct InferenceDriver {
    preprocessor: Preprocessor,
    topk: Topk,
    k: usize,
    runs: usize,
}

impl InferenceDriver {
    /// Creates a driver with the default run count and top-k width.
    ///
    /// `labels` is the class label table; pass `None` to report numeric
    /// class indices.
    pub fn new(labels: Option<Vec<String>>) -> OffloadResult<Self> {
        Ok(Self {
            preprocessor: Preprocessor::new()?,
            topk: match labels {
                Some(labels) => Topk::with_labels(labels),
                None => Topk::new(),
            },
            k: DEFAULT_TOPK,
            runs: DEFAULT_INFER_RUNS,
        })
    }

    /// Overrides the number of repeated invocations (must be at least 1).
    pub fn with_runs(mut self, runs: usize) -> OffloadResult<Self> {
        if runs == 0 {
            return Err(OffloadError::config("runs must be greater than 0"));
        }
        self.runs = runs;
        Ok(self)
    }

    /// Overrides the top-k width (must be at least 1).
    pub fn with_topk(mut self, k: usize) -> OffloadResult<Self> {
        if k == 0 {
            return Err(OffloadError::config("topk must be greater than 0"));
        }
        self.k = k;
        Ok(self)
    }

    /// Replaces the preprocessing pipeline.
    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Preprocesses `image`, invokes the engine `runs` times and decodes the
    /// top-k result from the final score vector.
    ///
    /// The first invocation is warmup and is excluded from the latency mean
    /// whenever more than one run is configured.
    pub fn run<E: InferenceEngine>(
        &self,
        engine: &mut E,
        image: &Path,
    ) -> OffloadResult<ClassificationResult> {
        let tensor = self.preprocessor.run(image)?;
        engine.set_input(&tensor)?;

        let mut timings = Vec::with_capacity(self.runs);
        for run in 0..self.runs {
            let start = Instant::now();
            engine.invoke()?;
            let elapsed = start.elapsed();
            debug!(run, ?elapsed, "invocation finished");
            timings.push(elapsed);
        }

        let timed: &[Duration] = if timings.len() > 1 {
            &timings[1..]
        } else {
            &timings
        };
        let mean_latency = timed.iter().sum::<Duration>() / timed.len() as u32;

        let scores = engine.output()?;
        let decoded = self.topk.process(&scores, self.k)?;
        info!(
            image = %image.display(),
            runs = self.runs,
            top = decoded.labels.first().map(String::as_str).unwrap_or(""),
            "inference finished"
        );

        Ok(ClassificationResult {
            class_ids: decoded.class_ids,
            scores: decoded.scores,
            labels: decoded.labels,
            mean_latency,
            timed_runs: timed.len(),
        })
    }
}
