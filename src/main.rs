//! Command-line driver for the offload workflow.
//!
//! Mirrors the linear demo flow: `compile` calibrates and lets the delegate
//! emit artifacts, `infer` loads them back and classifies an image while
//! reading the benchmark counters. Delegate output is redirected to a log
//! file for the duration of either step.

use clap::{Parser, Subcommand};
use npu_offload::core::{
    init_tracing, DelegateConfig, EngineMode, InferenceEngine, NativeDelegate, ToolchainEnv,
};
use npu_offload::pipeline::{
    render_bar_chart, BenchmarkReport, ChartConfig, CompilationDriver, InferenceDriver,
};
use npu_offload::utils::{list_image_files, load_labels, ArtifactDir, LogScope};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "npu-offload")]
#[command(about = "Compile a model for NPU offload via the vendor delegate and run it")]
struct Args {
    /// Directory receiving per-step log files
    #[arg(long, default_value = "logs")]
    logs_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Feed calibration frames through the delegate to produce compiled artifacts
    Compile {
        /// Delegate configuration as a JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding the calibration images
        #[arg(long, default_value = "sample-images")]
        images_dir: PathBuf,

        /// Override the artifact directory
        #[arg(long)]
        artifacts_dir: Option<PathBuf>,

        /// Override the quantization bit-width (8 or 16)
        #[arg(long)]
        tensor_bits: Option<u8>,

        /// Override the calibration frame count
        #[arg(long)]
        calibration_frames: Option<usize>,

        /// Override the delegate debug verbosity (0..=4)
        #[arg(long)]
        debug_level: Option<u8>,

        /// Comma-separated operator identifiers the delegate must not offload
        #[arg(long, value_delimiter = ',')]
        deny_list: Option<Vec<u32>>,
    },
    /// Classify an image using previously compiled artifacts
    Infer {
        /// Image to classify
        image: PathBuf,

        /// Directory holding the compiled artifacts
        #[arg(long, default_value = "artifacts")]
        artifacts_dir: PathBuf,

        /// Class label file, one name per line
        #[arg(short, long)]
        labels: Option<PathBuf>,

        /// Number of repeated invocations (first is warmup)
        #[arg(long)]
        runs: Option<usize>,

        /// Number of top predictions to report
        #[arg(long)]
        topk: Option<usize>,

        /// Write a throughput/bandwidth bar chart to this PNG path
        #[arg(long)]
        chart: Option<PathBuf>,

        /// Font file for chart labels
        #[arg(long)]
        font: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let env = ToolchainEnv::from_env()?;
    info!(
        delegate_tools = %env.delegate_tools.display(),
        cross_compiler = %env.cross_compiler.display(),
        "toolchains resolved"
    );

    match args.command {
        Command::Compile {
            config,
            images_dir,
            artifacts_dir,
            tensor_bits,
            calibration_frames,
            debug_level,
            deny_list,
        } => {
            let mut config = match config {
                Some(path) => DelegateConfig::from_json_file(&path)?,
                None => DelegateConfig::new(),
            };
            if let Some(dir) = artifacts_dir {
                config.artifacts_dir = dir;
            }
            if let Some(bits) = tensor_bits {
                config.tensor_bits = bits;
            }
            if let Some(frames) = calibration_frames {
                config.calibration_frames = frames;
            }
            if let Some(level) = debug_level {
                config.debug_level = level;
            }
            if let Some(ops) = deny_list {
                config.deny_list = ops;
            }
            config.validate()?;

            run_compile(&env, &config, &images_dir, &args.logs_dir)?;
        }
        Command::Infer {
            image,
            artifacts_dir,
            labels,
            runs,
            topk,
            chart,
            font,
        } => {
            let config = DelegateConfig::new().with_artifacts_dir(artifacts_dir);
            run_infer(
                &env,
                &config,
                &image,
                labels.as_deref(),
                runs,
                topk,
                chart.as_deref(),
                font.as_deref(),
                &args.logs_dir,
            )?;
        }
    }

    Ok(())
}

fn run_compile(
    env: &ToolchainEnv,
    config: &DelegateConfig,
    images_dir: &std::path::Path,
    logs_dir: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let frames = list_image_files(images_dir)?;
    info!(
        images = frames.len(),
        dir = %images_dir.display(),
        "calibration images found"
    );

    let artifacts = ArtifactDir::new(&config.artifacts_dir);
    artifacts.prepare()?;

    let fed = {
        let scope = LogScope::begin(logs_dir, "compile")?;
        info!(log = %scope.path().display(), "compilation started");
        let mut engine = NativeDelegate::open_with_env(env, EngineMode::Compile, config)?;
        CompilationDriver::new(config)?.run(&mut engine, &frames)?
        // Engine drops here; the delegate finalizes its artifacts.
    };

    info!(frames = fed, "compilation finished");
    for artifact in artifacts.entries()? {
        info!(artifact = %artifact.display(), "artifact written");
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_infer(
    env: &ToolchainEnv,
    config: &DelegateConfig,
    image: &std::path::Path,
    labels: Option<&std::path::Path>,
    runs: Option<usize>,
    topk: Option<usize>,
    chart: Option<&std::path::Path>,
    font: Option<&std::path::Path>,
    logs_dir: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let labels = labels.map(load_labels).transpose()?;

    let mut driver = InferenceDriver::new(labels)?;
    if let Some(runs) = runs {
        driver = driver.with_runs(runs)?;
    }
    if let Some(k) = topk {
        driver = driver.with_topk(k)?;
    }

    let (result, report) = {
        let scope = LogScope::begin(logs_dir, "infer")?;
        info!(log = %scope.path().display(), "inference started");
        let mut engine = NativeDelegate::open_with_env(env, EngineMode::Execute, config)?;
        let result = driver.run(&mut engine, image)?;
        let report = BenchmarkReport::new(engine.benchmark()?);
        (result, report)
    };

    println!("{result}");
    println!("{report}");

    if let Some(chart_path) = chart {
        let mut chart_config = ChartConfig::default();
        if let Some(font_path) = font {
            chart_config = chart_config.with_font_path(font_path)?;
        }
        render_bar_chart(&report.chart_values(), &chart_config, chart_path)?;
        println!("chart written to {}", chart_path.display());
    }

    Ok(())
}
