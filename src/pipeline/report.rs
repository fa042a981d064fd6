//! Benchmark reporting: text summaries and bar charts.

use crate::core::engine::BenchmarkRecord;
use crate::core::errors::{OffloadError, OffloadResult};
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::Path;
use tracing::info;

const BACKGROUND_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS_COLOR: Rgb<u8> = Rgb([60, 60, 60]);
const BAR_COLOR: Rgb<u8> = Rgb([66, 133, 244]);
const TEXT_COLOR: Rgb<u8> = Rgb([20, 20, 20]);

/// Human-readable view over the engine's performance counters.
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    record: BenchmarkRecord,
}

impl BenchmarkReport {
    /// Wraps a benchmark record.
    pub fn new(record: BenchmarkRecord) -> Self {
        Self { record }
    }

    /// The underlying counters.
    pub fn record(&self) -> &BenchmarkRecord {
        &self.record
    }

    /// Named values for the throughput/bandwidth chart.
    pub fn chart_values(&self) -> Vec<(String, f64)> {
        vec![
            ("fps".to_string(), self.record.throughput_fps()),
            ("ddr rd MB/s".to_string(), self.record.read_bandwidth_mbps()),
            (
                "ddr wr MB/s".to_string(),
                self.record.write_bandwidth_mbps(),
            ),
        ]
    }
}

impl std::fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = &self.record;
        writeln!(
            f,
            "processing time      {:>10.3} ms",
            r.total_time_us as f64 / 1000.0
        )?;
        writeln!(
            f,
            "copy in / out        {:>6.3} / {:.3} ms",
            r.copy_in_us as f64 / 1000.0,
            r.copy_out_us as f64 / 1000.0
        )?;
        writeln!(
            f,
            "ddr read / write     {:>6.2} / {:.2} MB",
            r.ddr_read_bytes as f64 / 1_000_000.0,
            r.ddr_write_bytes as f64 / 1_000_000.0
        )?;
        writeln!(
            f,
            "bandwidth rd / wr    {:>6.1} / {:.1} MB/s",
            r.read_bandwidth_mbps(),
            r.write_bandwidth_mbps()
        )?;
        writeln!(f, "throughput           {:>10.1} fps", r.throughput_fps())?;
        write!(f, "offloaded subgraphs  {:>10}", r.subgraphs)
    }
}

/// Appearance of a rendered bar chart.
pub struct ChartConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Font for labels; bars render without text when absent.
    pub font: Option<FontVec>,
    /// Label font scale.
    pub font_scale: f32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            font: None,
            font_scale: 14.0,
        }
    }
}

impl ChartConfig {
    /// Loads the label font from a file.
    pub fn with_font_path(mut self, path: &Path) -> OffloadResult<Self> {
        let data = std::fs::read(path)?;
        let font = FontVec::try_from_vec(data)
            .map_err(|_| OffloadError::invalid_input(format!("bad font file {}", path.display())))?;
        self.font = Some(font);
        Ok(self)
    }
}

impl std::fmt::Debug for ChartConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartConfig")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("font", &self.font.is_some())
            .field("font_scale", &self.font_scale)
            .finish()
    }
}

/// Renders named values as a vertical bar chart and writes a PNG.
pub fn render_bar_chart(
    values: &[(String, f64)],
    config: &ChartConfig,
    path: &Path,
) -> OffloadResult<()> {
    if values.is_empty() {
        return Err(OffloadError::invalid_input("chart needs at least one value"));
    }

    let mut canvas = RgbImage::from_pixel(config.width, config.height, BACKGROUND_COLOR);

    let margin_left: u32 = 20;
    let margin_right: u32 = 20;
    let margin_top: u32 = 20;
    let margin_bottom: u32 = 40;
    let plot_width = config.width.saturating_sub(margin_left + margin_right).max(1);
    let plot_height = config
        .height
        .saturating_sub(margin_top + margin_bottom)
        .max(1);

    let max_value = values
        .iter()
        .map(|(_, v)| *v)
        .fold(0.0f64, f64::max)
        .max(f64::MIN_POSITIVE);

    // Baseline axis.
    let baseline_y = (margin_top + plot_height) as i32;
    draw_filled_rect_mut(
        &mut canvas,
        Rect::at(margin_left as i32, baseline_y).of_size(plot_width, 2),
        AXIS_COLOR,
    );

    let slot = plot_width / values.len() as u32;
    let bar_width = (slot * 3 / 5).max(1);
    for (i, (label, value)) in values.iter().enumerate() {
        let bar_height = ((value / max_value) * plot_height as f64).round() as u32;
        let x = margin_left + i as u32 * slot + (slot - bar_width) / 2;
        if bar_height > 0 {
            let y = margin_top + plot_height - bar_height;
            draw_filled_rect_mut(
                &mut canvas,
                Rect::at(x as i32, y as i32).of_size(bar_width, bar_height),
                BAR_COLOR,
            );
        }

        if let Some(font) = &config.font {
            let scale = PxScale::from(config.font_scale);
            draw_text_mut(
                &mut canvas,
                TEXT_COLOR,
                x as i32,
                baseline_y + 6,
                scale,
                font,
                label,
            );
            let value_text = format!("{value:.1}");
            let value_y = (margin_top + plot_height)
                .saturating_sub(bar_height + config.font_scale as u32 + 2);
            draw_text_mut(
                &mut canvas,
                TEXT_COLOR,
                x as i32,
                value_y as i32,
                scale,
                font,
                &value_text,
            );
        }
    }

    canvas.save(path).map_err(OffloadError::ImageEncode)?;
    info!(chart = %path.display(), "benchmark chart written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> BenchmarkRecord {
        BenchmarkRecord {
            total_time_us: 5_000,
            copy_in_us: 120,
            copy_out_us: 80,
            ddr_read_bytes: 12_000_000,
            ddr_write_bytes: 4_000_000,
            subgraphs: 2,
        }
    }

    #[test]
    fn test_report_text_contains_counters() {
        let text = BenchmarkReport::new(sample_record()).to_string();
        assert!(text.contains("5.000 ms"));
        assert!(text.contains("200.0 fps"));
        assert!(text.contains("offloaded subgraphs"));
    }

    #[test]
    fn test_chart_values_cover_throughput_and_bandwidth() {
        let values = BenchmarkReport::new(sample_record()).chart_values();
        assert_eq!(values.len(), 3);
        assert!((values[0].1 - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_render_chart_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.png");
        let values = vec![("fps".to_string(), 200.0), ("rd".to_string(), 2400.0)];

        render_bar_chart(&values, &ChartConfig::default(), &path).unwrap();
        assert!(path.is_file());
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), 640);
    }

    #[test]
    fn test_render_chart_rejects_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.png");
        let result = render_bar_chart(&[], &ChartConfig::default(), &path);
        assert!(result.is_err());
    }
}
