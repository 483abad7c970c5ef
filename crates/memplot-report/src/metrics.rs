//! Array conversion and NaN-aware summary statistics.
//!
//! NaN marks "unmeasured" bandwidth. The helpers here skip NaN entries the
//! way `nanmean`/`nanargmax` do, so an unmeasured point never poisons an
//! aggregate.

use serde::{Deserialize, Serialize};

use crate::block::{BlockRow, BlockVariant};
use crate::stride::StrideRow;

/// Arithmetic mean over the non-NaN entries; NaN when there are none.
pub fn nanmean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &v in values {
        if !v.is_nan() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Index of the first minimum, skipping NaN entries.
pub fn argmin(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, best_v)) if v >= best_v => {}
            _ => best = Some((idx, v)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Index of the first maximum, skipping NaN entries.
pub fn nanargmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, best_v)) if v <= best_v => {}
            _ => best = Some((idx, v)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Parallel arrays over one stride result set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StrideSeries {
    pub strides: Vec<i64>,
    pub times_ms: Vec<f64>,
    pub bandwidths_mb_s: Vec<f64>,
}

impl StrideSeries {
    pub fn from_rows(rows: &[StrideRow]) -> Self {
        Self {
            strides: rows.iter().map(|r| r.stride).collect(),
            times_ms: rows.iter().map(|r| r.time_ms).collect(),
            bandwidths_mb_s: rows.iter().map(|r| r.bandwidth_mb_s).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.strides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strides.is_empty()
    }
}

/// Parallel arrays over the sorted block result set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BlockSeries {
    pub block_sizes: Vec<i64>,
    pub times_ms: Vec<f64>,
    pub bandwidths_mb_s: Vec<f64>,
}

impl BlockSeries {
    pub fn from_rows(rows: &[BlockRow]) -> Self {
        Self {
            block_sizes: rows.iter().map(|r| r.block_size).collect(),
            times_ms: rows.iter().map(|r| r.time_ms).collect(),
            bandwidths_mb_s: rows.iter().map(|r| r.bandwidth_mb_s).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.block_sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.block_sizes.is_empty()
    }
}

/// Aggregates over the two stride result sets.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StrideSummary {
    pub mean_time_o0_ms: f64,
    pub mean_time_o2_ms: f64,
    pub speedup: f64,
    pub mean_bandwidth_o0_mb_s: f64,
    pub mean_bandwidth_o2_mb_s: f64,
    /// Percentage bandwidth change, present only when both means are
    /// positive.
    pub bandwidth_change_pct: Option<f64>,
}

pub fn summarize_stride(o0: &StrideSeries, o2: &StrideSeries) -> StrideSummary {
    let mean_time_o0_ms = nanmean(&o0.times_ms);
    let mean_time_o2_ms = nanmean(&o2.times_ms);
    let mean_bandwidth_o0_mb_s = nanmean(&o0.bandwidths_mb_s);
    let mean_bandwidth_o2_mb_s = nanmean(&o2.bandwidths_mb_s);

    let bandwidth_change_pct = (mean_bandwidth_o0_mb_s > 0.0 && mean_bandwidth_o2_mb_s > 0.0)
        .then(|| (mean_bandwidth_o2_mb_s / mean_bandwidth_o0_mb_s - 1.0) * 100.0);

    StrideSummary {
        mean_time_o0_ms,
        mean_time_o2_ms,
        speedup: mean_time_o0_ms / mean_time_o2_ms,
        mean_bandwidth_o0_mb_s,
        mean_bandwidth_o2_mb_s,
        bandwidth_change_pct,
    }
}

/// Aggregates over the sorted block result set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockSummary {
    pub baseline_time_ms: f64,
    /// Per-row `baseline_time / time`, in row (ascending block size) order.
    pub speedups: Vec<f64>,
    pub best_time_idx: usize,
    /// Absent when every bandwidth is NaN.
    pub best_bandwidth_idx: Option<usize>,
    pub best_block_size: i64,
    /// Three square blocks of doubles at the best (minimum-time) block size.
    pub working_set_bytes: u64,
}

/// Compute block aggregates. Rows must already be sorted ascending by block
/// size so the baseline fallback picks the largest block size.
pub fn summarize_block(rows: &[BlockRow], series: &BlockSeries) -> Option<BlockSummary> {
    let last = rows.last()?;

    let baseline_time_ms = rows
        .iter()
        .find(|r| r.variant == BlockVariant::NoBlocking)
        .map_or(last.time_ms, |r| r.time_ms);

    let speedups = series
        .times_ms
        .iter()
        .map(|&t| baseline_time_ms / t)
        .collect();

    let best_time_idx = argmin(&series.times_ms)?;
    let best_block_size = series.block_sizes[best_time_idx];
    let block = best_block_size.unsigned_abs();

    Some(BlockSummary {
        baseline_time_ms,
        speedups,
        best_time_idx,
        best_bandwidth_idx: nanargmax(&series.bandwidths_mb_s),
        best_block_size,
        working_set_bytes: 3 * block * block * 8,
    })
}
