//! SVG rendering with plotters.
//!
//! Each function renders into a `String`; writing files is left to the caller.

use crate::error::{VisualizeError, VisualizeResult};
use crate::stats::HistogramBin;
use density::DensityRecord;
use plotters::prelude::*;

pub const CHART_SIZE: (u32, u32) = (1000, 600);
const WIDE_CHART_SIZE: (u32, u32) = (1200, 600);

pub const HISTOGRAM_FILE: &str = "branch_histogram.svg";
pub const FILTERED_FILE: &str = "filtered_branch_counts.svg";
pub const SCATTER_FILE: &str = "branch_vs_pm25.svg";

/// Correlation as shown in titles and logs.
pub fn format_correlation(correlation: Option<f64>) -> String {
    correlation
        .map(|r| format!("{:.2}", r))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Distribution of branch counts across tracts.
pub fn render_histogram(bins: &[HistogramBin]) -> VisualizeResult<String> {
    const CHART: &str = "histogram";
    let err = |e| VisualizeError::render(CHART, e);

    let x_range = match (bins.first(), bins.last()) {
        (Some(first), Some(last)) => first.lower..last.upper,
        _ => 0.0..1.0,
    };
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0) + 1;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Branch Density Distribution by Census Tract", ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, 0u32..y_max)
            .map_err(err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Branch Count")
            .y_desc("Number of Census Tracts")
            .draw()
            .map_err(err)?;

        chart
            .draw_series(bins.iter().map(|bin| {
                let mut bar = Rectangle::new(
                    [(bin.lower, 0), (bin.upper, bin.count)],
                    BLUE.mix(0.6).filled(),
                );
                bar.set_margin(0, 0, 1, 1);
                bar
            }))
            .map_err(err)?;

        root.present().map_err(err)?;
    }
    Ok(svg)
}

/// One bar per tract that passed the thresholds.
pub fn render_filtered_bars(
    records: &[DensityRecord],
    pm25_threshold: f64,
    branch_threshold: i64,
) -> VisualizeResult<String> {
    const CHART: &str = "filtered branch counts";
    let err = |e| VisualizeError::render(CHART, e);

    let title = format!(
        "Branch Counts in Census Tracts with PM2.5 >= {} and Branch Count >= {}",
        pm25_threshold, branch_threshold
    );
    let tracts = records.len().max(1);
    let y_max = records.iter().map(|r| r.branch_count).max().unwrap_or(0) + 1;
    let label_tract = |value: &SegmentValue<usize>| match value {
        SegmentValue::CenterOf(i) => records
            .get(*i)
            .map(|r| r.census_tract.clone())
            .unwrap_or_default(),
        _ => String::new(),
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, WIDE_CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d((0..tracts).into_segmented(), 0i64..y_max)
            .map_err(err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(tracts)
            .x_label_formatter(&label_tract)
            .x_desc("Census Tract")
            .y_desc("Branch Count")
            .draw()
            .map_err(err)?;

        chart
            .draw_series(records.iter().enumerate().map(|(i, record)| {
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(i), 0),
                        (SegmentValue::Exact(i + 1), record.branch_count),
                    ],
                    GREEN.mix(0.7).filled(),
                );
                bar.set_margin(0, 0, 3, 3);
                bar
            }))
            .map_err(err)?;

        root.present().map_err(err)?;
    }
    Ok(svg)
}

/// Branch count against PM2.5, one point per tract with a reading.
pub fn render_scatter(points: &[(f64, f64)], correlation: Option<f64>) -> VisualizeResult<String> {
    const CHART: &str = "branch vs PM2.5";
    let err = |e| VisualizeError::render(CHART, e);

    let title = format!(
        "Correlation between Branch Density and PM2.5 Levels (Corr: {})",
        format_correlation(correlation)
    );
    let x_max = points.iter().map(|(x, _)| *x).fold(0.0, f64::max) + 1.0;
    let y_range = match points
        .iter()
        .map(|(_, y)| *y)
        .fold(None, |acc: Option<(f64, f64)>, y| {
            Some(acc.map_or((y, y), |(lo, hi)| (lo.min(y), hi.max(y))))
        }) {
        Some((lo, hi)) => {
            let pad = ((hi - lo) * 0.05).max(0.5);
            (lo - pad)..(hi + pad)
        }
        None => 0.0..1.0,
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..x_max, y_range)
            .map_err(err)?;

        chart
            .configure_mesh()
            .x_desc("Branch Count")
            .y_desc("PM2.5 Levels")
            .draw()
            .map_err(err)?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|(x, y)| Circle::new((*x, *y), 4, BLUE.mix(0.7).filled())),
            )
            .map_err(err)?;

        root.present().map_err(err)?;
    }
    Ok(svg)
}
