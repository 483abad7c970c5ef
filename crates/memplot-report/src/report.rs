//! Two-panel comparison charts rendered to PNG.
//!
//! Stride chart: execution time and bandwidth vs stride, both optimization
//! levels overlaid. Block chart: execution time and bandwidth vs block size
//! on a log2 x-axis with one tick per measured size and a marker at each
//! panel's best point. NaN points are skipped, matching how the summaries
//! treat unmeasured bandwidth.

use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::Result;
use crate::block::DEFAULT_NO_BLOCKING_SIZE;
use crate::metrics::{BlockSeries, StrideSeries, argmin, nanargmax};

/// Output pixel geometry of one figure (both panels).
#[derive(Clone, Copy, Debug)]
pub struct ChartGeometry {
    pub width_px: u32,
    pub height_px: u32,
}

const TIME_COLOR: RGBColor = RGBColor(231, 76, 60);
const BANDWIDTH_COLOR: RGBColor = RGBColor(52, 152, 219);

const CAPTION_FONT: (&str, i32) = ("sans-serif", 56);
const AXIS_FONT: (&str, i32) = ("sans-serif", 40);
const TICK_FONT: (&str, i32) = ("sans-serif", 32);

/// Render the stride comparison figure: time vs stride and bandwidth vs
/// stride, `-O0` and `-O2` overlaid in each panel.
pub fn render_stride_chart(
    o0: &StrideSeries,
    o2: &StrideSeries,
    path: &Path,
    geometry: ChartGeometry,
) -> Result<()> {
    let root =
        BitMapBackend::new(path, (geometry.width_px, geometry.height_px)).into_drawing_area();
    root.fill(&WHITE)?;

    let (time_area, bw_area) = root.split_horizontally((geometry.width_px / 2) as i32);

    draw_stride_panel(
        &time_area,
        "Execution time vs stride",
        "Execution time (ms)",
        (&o0.strides, &o0.times_ms),
        (&o2.strides, &o2.times_ms),
    )?;
    draw_stride_panel(
        &bw_area,
        "Estimated bandwidth vs stride",
        "Bandwidth (MB/s)",
        (&o0.strides, &o0.bandwidths_mb_s),
        (&o2.strides, &o2.bandwidths_mb_s),
    )?;

    root.present()?;
    Ok(())
}

fn draw_stride_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    caption: &str,
    y_desc: &str,
    o0: (&[i64], &[f64]),
    o2: (&[i64], &[f64]),
) -> Result<()> {
    let xs = o0.0.iter().chain(o2.0).map(|&s| s as f64).collect::<Vec<_>>();
    let x_range = padded_range(&[xs.as_slice()]);
    let y_range = padded_range(&[o0.1, o2.1]);

    let mut chart = ChartBuilder::on(area)
        .caption(caption, CAPTION_FONT)
        .margin(40)
        .x_label_area_size(110)
        .y_label_area_size(150)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Stride")
        .y_desc(y_desc)
        .axis_desc_style(AXIS_FONT)
        .label_style(TICK_FONT)
        .draw()?;

    for ((strides, values), color, label) in [
        (o0, BLUE, "-O0 (no optimization)"),
        (o2, RED, "-O2 (optimized)"),
    ] {
        let points = finite_points(strides, values);
        if points.is_empty() {
            continue;
        }

        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                color.stroke_width(4),
            ))?
            .label(label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 40, y)], color.stroke_width(4))
            });
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 8, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .label_font(TICK_FONT)
        .draw()?;

    Ok(())
}

/// Render the block-size figure: time and bandwidth vs block size on a log2
/// x-axis, best points marked.
pub fn render_block_chart(
    series: &BlockSeries,
    matrix_size: Option<i64>,
    path: &Path,
    geometry: ChartGeometry,
) -> Result<()> {
    let root =
        BitMapBackend::new(path, (geometry.width_px, geometry.height_px)).into_drawing_area();
    root.fill(&WHITE)?;

    let (time_area, bw_area) = root.split_horizontally((geometry.width_px / 2) as i32);

    let x_desc = match matrix_size {
        Some(n) => format!("Block size ({n} (= No blocking))"),
        None => "Block size (No blocking)".to_string(),
    };
    let no_block_size = matrix_size.unwrap_or(DEFAULT_NO_BLOCKING_SIZE);

    let best_time = argmin(&series.times_ms).map(|idx| {
        let time = series.times_ms[idx];
        (series.block_sizes[idx], time, format!("Best: {time:.2} ms"))
    });
    let best_bandwidth = nanargmax(&series.bandwidths_mb_s).map(|idx| {
        let bw = series.bandwidths_mb_s[idx];
        (series.block_sizes[idx], bw, format!("Best: {bw:.2} MB/s"))
    });

    draw_block_panel(
        &time_area,
        "Execution time vs block size",
        &x_desc,
        "Execution time (ms)",
        &series.block_sizes,
        &series.times_ms,
        no_block_size,
        TIME_COLOR,
        best_time,
    )?;
    draw_block_panel(
        &bw_area,
        "Estimated bandwidth vs block size",
        &x_desc,
        "Bandwidth (MB/s)",
        &series.block_sizes,
        &series.bandwidths_mb_s,
        no_block_size,
        BANDWIDTH_COLOR,
        best_bandwidth,
    )?;

    root.present()?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_block_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    block_sizes: &[i64],
    values: &[f64],
    no_block_size: i64,
    color: RGBColor,
    best: Option<(i64, f64, String)>,
) -> Result<()> {
    let ticks = block_sizes.iter().map(|&bs| log2_pos(bs)).collect::<Vec<_>>();
    let labels = block_sizes
        .iter()
        .map(|&bs| {
            let label = if bs == no_block_size {
                "No block".to_string()
            } else {
                bs.to_string()
            };
            (log2_pos(bs), label)
        })
        .collect::<Vec<_>>();

    let x_min = ticks.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = ticks.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (x_min, x_max) = if x_min.is_finite() {
        (x_min, x_max.max(x_min + 1e-6))
    } else {
        (0.0, 1.0)
    };
    let x_range = ((x_min - 0.5)..(x_max + 0.5)).with_key_points(ticks);
    let y_range = padded_range(&[values]);

    let mut chart = ChartBuilder::on(area)
        .caption(caption, CAPTION_FONT)
        .margin(40)
        .x_label_area_size(110)
        .y_label_area_size(150)
        .build_cartesian_2d(x_range, y_range)?;

    let label_fmt = move |v: &f64| {
        labels
            .iter()
            .min_by(|a, b| (a.0 - *v).abs().total_cmp(&(b.0 - *v).abs()))
            .map(|(_, label)| label.clone())
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(block_sizes.len().max(1))
        .x_label_formatter(&label_fmt)
        .axis_desc_style(AXIS_FONT)
        .label_style(TICK_FONT)
        .draw()?;

    let points = block_sizes
        .iter()
        .zip(values)
        .filter(|(_, v)| v.is_finite())
        .map(|(&bs, &v)| (log2_pos(bs), v))
        .collect::<Vec<_>>();

    if !points.is_empty() {
        chart.draw_series(LineSeries::new(
            points.iter().copied(),
            color.stroke_width(4),
        ))?;
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 10, color.filled())),
        )?;
    }

    if let Some((bs, value, legend_label)) = best {
        if value.is_finite() {
            chart
                .draw_series(std::iter::once(Circle::new(
                    (log2_pos(bs), value),
                    16,
                    GREEN.filled(),
                )))?
                .label(legend_label)
                .legend(|(x, y)| Circle::new((x + 10, y), 8, GREEN.filled()));

            chart
                .configure_series_labels()
                .border_style(BLACK)
                .background_style(WHITE.mix(0.8))
                .label_font(TICK_FONT)
                .draw()?;
        }
    }

    Ok(())
}

fn finite_points(xs: &[i64], ys: &[f64]) -> Vec<(f64, f64)> {
    xs.iter()
        .zip(ys)
        .filter(|(_, y)| y.is_finite())
        .map(|(&x, &y)| (x as f64, y))
        .collect()
}

/// Log2 position of a block size on the x-axis. Degenerate sizes are clamped
/// to 1 so they stay drawable.
fn log2_pos(block_size: i64) -> f64 {
    (block_size.max(1) as f64).log2()
}

fn padded_range(value_sets: &[&[f64]]) -> Range<f64> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for values in value_sets {
        for &v in *values {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
    }

    if !min.is_finite() {
        return 0.0..1.0;
    }

    let span = (max - min).max(min.abs().max(max.abs()) * 1e-3).max(1e-6);
    (min - span * 0.05)..(max + span * 0.05)
}
