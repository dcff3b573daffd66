//! # Visualize Crate
//!
//! Fetches density records from a running API and renders three SVG charts:
//!
//! - `branch_histogram.svg`: distribution of branch counts over all tracts
//! - `filtered_branch_counts.svg`: tracts passing the PM2.5 and branch thresholds
//! - `branch_vs_pm25.svg`: scatter of branch count against PM2.5, titled with
//!   the Pearson correlation
//!
//! The filtered chart is skipped (with a warning) when no tract passes the
//! thresholds. An empty unfiltered fetch aborts the run.

pub mod charts;
pub mod client;
pub mod error;
pub mod stats;

pub use client::DensityClient;
pub use error::{VisualizeError, VisualizeResult};
pub use stats::{histogram, pearson_correlation, HistogramBin};

use config::VisualizationConfig;
use density::{DensityFilter, DensityRecord};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// What one visualization run produced.
#[derive(Debug, Clone, Default)]
pub struct VisualizationReport {
    pub total_records: usize,
    pub filtered_records: usize,
    pub files: Vec<PathBuf>,
    pub correlation: Option<f64>,
    pub skipped_filtered_chart: bool,
}

impl fmt::Display for VisualizationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Records fetched:   {}", self.total_records)?;
        writeln!(f, "Records filtered:  {}", self.filtered_records)?;
        writeln!(
            f,
            "Correlation:       {}",
            charts::format_correlation(self.correlation)
        )?;
        if self.skipped_filtered_chart {
            writeln!(f, "Filtered chart:    skipped (no matching tracts)")?;
        }
        write!(f, "Charts written:")?;
        for file in &self.files {
            write!(f, "\n  {}", file.display())?;
        }
        Ok(())
    }
}

/// Branch count / PM2.5 pairs for tracts that have a reading.
pub fn correlation_points(records: &[DensityRecord]) -> Vec<(f64, f64)> {
    records
        .iter()
        .filter_map(|r| r.pm25.map(|pm25| (r.branch_count as f64, pm25)))
        .collect()
}

fn write_chart(dir: &Path, name: &str, svg: &str) -> VisualizeResult<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, svg).map_err(|source| VisualizeError::Write {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "Chart written");
    Ok(path)
}

/// Fetch from the API described by `config` and write the charts into
/// `config.output_dir`.
pub async fn run_visualization(config: &VisualizationConfig) -> VisualizeResult<VisualizationReport> {
    let client = DensityClient::new(
        &config.base_url,
        Duration::from_secs(config.timeout_seconds),
    )?;
    let output_dir = PathBuf::from(&config.output_dir);
    std::fs::create_dir_all(&output_dir).map_err(|source| VisualizeError::Write {
        path: output_dir.clone(),
        source,
    })?;

    let all = client.fetch_density(&DensityFilter::new()).await?;
    if all.is_empty() {
        return Err(VisualizeError::NoData);
    }
    info!(records = all.len(), base_url = client.base_url(), "Fetched density records");

    let mut report = VisualizationReport {
        total_records: all.len(),
        ..VisualizationReport::default()
    };

    let counts: Vec<f64> = all.iter().map(|r| r.branch_count as f64).collect();
    let svg = charts::render_histogram(&histogram(&counts, config.histogram_bins))?;
    report
        .files
        .push(write_chart(&output_dir, charts::HISTOGRAM_FILE, &svg)?);

    let filter = DensityFilter::new()
        .with_pm25_threshold(config.pm25_threshold)
        .with_branch_threshold(config.branch_threshold);
    let filtered = client.fetch_density(&filter).await?;
    report.filtered_records = filtered.len();
    if filtered.is_empty() {
        warn!(
            pm25_threshold = config.pm25_threshold,
            branch_threshold = config.branch_threshold,
            "No census tracts meet the filtering criteria"
        );
        report.skipped_filtered_chart = true;
    } else {
        let svg = charts::render_filtered_bars(
            &filtered,
            config.pm25_threshold,
            config.branch_threshold,
        )?;
        report
            .files
            .push(write_chart(&output_dir, charts::FILTERED_FILE, &svg)?);
    }

    let points = correlation_points(&all);
    report.correlation = pearson_correlation(&points);
    let svg = charts::render_scatter(&points, report.correlation)?;
    report
        .files
        .push(write_chart(&output_dir, charts::SCATTER_FILE, &svg)?);

    Ok(report)
}
