//! Tolerant parser for stride benchmark result files.
//!
//! Expected shape, as emitted by the C benchmark:
//!
//! ```text
//! stride , sum, time (msec), rate (MB/s)
//! 4, 100.000000, 12.500000, 800.000000
//! ```
//!
//! The first record is a header and unconditionally skipped. Malformed
//! records yield no row; the caller only sees the rows that parsed.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One measurement of the strided memory-access benchmark.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrideRow {
    pub stride: i64,
    pub sum_value: f64,
    pub time_ms: f64,
    pub bandwidth_mb_s: f64,
}

/// Parse stride result lines into rows, preserving file order.
pub fn parse_stride_lines(lines: &[String]) -> Vec<StrideRow> {
    if lines.is_empty() {
        return Vec::new();
    }

    let joined = lines.join("\n");
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(joined.as_bytes());

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        let Ok(record) = record else {
            dropped += 1;
            continue;
        };
        match parse_record(&record) {
            Some(row) => rows.push(row),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(dropped, kept = rows.len(), "dropped malformed stride records");
    }

    rows
}

fn parse_record(record: &StringRecord) -> Option<StrideRow> {
    if record.len() < 4 {
        return None;
    }

    let stride = record[0].parse::<i64>().ok()?;
    let sum_value = record[1].parse::<f64>().ok()?;
    let time_ms = record[2].parse::<f64>().ok()?;
    let bandwidth = record[3].parse::<f64>().ok()?;

    Some(StrideRow {
        stride,
        sum_value,
        time_ms,
        bandwidth_mb_s: if bandwidth.is_finite() {
            bandwidth
        } else {
            f64::NAN
        },
    })
}
