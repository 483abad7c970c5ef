//! Tolerant parser for blocked matrix-multiplication result files.
//!
//! Real input, as emitted by the C benchmark, is free-form text:
//!
//! ```text
//! Block Matrix Multiplication Performance Analysis
//! Matrix size: 512 x 512
//!
//! Block Size, Time (msec), Bandwidth (MB/s), Speedup vs Standard
//!   64,      50.00,       400.00,   4.00x
//! Standard (no blocking),     200.00,       100.00,   1.00x
//! ```
//!
//! Only comma-separated records survive; header and version lines are
//! recognized by their leading keyword, the `Standard` record becomes the
//! no-blocking baseline, and everything else must lead with an integer block
//! size. Fields past the third (the producer's speedup column) are ignored.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Block size assigned to the baseline row when the matrix dimension is
/// unknown.
pub const DEFAULT_NO_BLOCKING_SIZE: i64 = 512;

/// Banner lines are only searched for within this many leading lines.
const BANNER_SCAN_LINES: usize = 10;

static MATRIX_SIZE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Matrix\s+size:\s*(\d+)\s*x\s*(\d+)").expect("valid matrix size pattern")
});

/// Which matrix-multiplication variant a row measures.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockVariant {
    NoBlocking,
    Block(i64),
}

impl fmt::Display for BlockVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockVariant::NoBlocking => f.write_str("No blocking"),
            BlockVariant::Block(size) => write!(f, "Block {size}"),
        }
    }
}

/// One measurement of the blocked matrix-multiply benchmark.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockRow {
    pub block_size: i64,
    pub time_ms: f64,
    pub bandwidth_mb_s: f64,
    pub variant: BlockVariant,
}

/// Scan the first few lines for a `Matrix size: N x N` banner.
///
/// The dimension is only inferred when both numbers agree (square matrix).
pub fn infer_matrix_size(lines: &[String]) -> Option<i64> {
    for line in lines.iter().take(BANNER_SCAN_LINES) {
        if let Some(caps) = MATRIX_SIZE_RE.captures(line) {
            if caps[1] == caps[2] {
                return caps[1].parse::<i64>().ok();
            }
        }
    }
    None
}

/// Parse block result lines into rows sorted ascending by block size, plus
/// the inferred square matrix dimension when the banner names one.
pub fn parse_block_results(lines: &[String]) -> (Vec<BlockRow>, Option<i64>) {
    if lines.is_empty() {
        return (Vec::new(), None);
    }

    let matrix_size = infer_matrix_size(lines);
    let no_block_size = matrix_size.unwrap_or(DEFAULT_NO_BLOCKING_SIZE);

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for raw in lines {
        let line = raw.trim();
        if line.is_empty() || !line.contains(',') {
            continue;
        }
        let lower = line.to_ascii_lowercase();
        if lower.starts_with("block size") || lower.starts_with("version") {
            continue;
        }

        let parts = line.split(',').map(str::trim).collect::<Vec<_>>();
        if parts.len() < 3 {
            dropped += 1;
            continue;
        }

        let variant = if parts[0].to_ascii_lowercase().contains("standard") {
            BlockVariant::NoBlocking
        } else {
            match parts[0].parse::<i64>() {
                Ok(size) => BlockVariant::Block(size),
                Err(_) => {
                    dropped += 1;
                    continue;
                }
            }
        };

        let (Ok(time_ms), Ok(bandwidth)) = (parts[1].parse::<f64>(), parts[2].parse::<f64>())
        else {
            dropped += 1;
            continue;
        };

        if !time_ms.is_finite() || time_ms <= 0.0 {
            dropped += 1;
            continue;
        }

        rows.push(BlockRow {
            block_size: match variant {
                BlockVariant::NoBlocking => no_block_size,
                BlockVariant::Block(size) => size,
            },
            time_ms,
            bandwidth_mb_s: if bandwidth.is_finite() {
                bandwidth
            } else {
                f64::NAN
            },
            variant,
        });
    }

    if dropped > 0 {
        debug!(dropped, kept = rows.len(), "dropped malformed block records");
    }

    rows.sort_by_key(|r| r.block_size);
    (rows, matrix_size)
}

#[cfg(test)]
mod tests {
    use super::{BlockVariant, infer_matrix_size, parse_block_results};

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_owned).collect()
    }

    #[test]
    fn infers_square_matrix_size() {
        assert_eq!(
            infer_matrix_size(&lines("Matrix size: 512 x 512")),
            Some(512)
        );
        assert_eq!(
            infer_matrix_size(&lines("matrix SIZE:  1024  X 1024")),
            Some(1024)
        );
    }

    #[test]
    fn ignores_non_square_banner() {
        assert_eq!(infer_matrix_size(&lines("Matrix size: 512 x 256")), None);
    }

    #[test]
    fn banner_beyond_first_ten_lines_is_ignored() {
        let mut text = "noise\n".repeat(10);
        text.push_str("Matrix size: 512 x 512");
        assert_eq!(infer_matrix_size(&lines(&text)), None);
    }

    #[test]
    fn rows_are_sorted_ascending_by_block_size() {
        let (rows, n) = parse_block_results(&lines(
            "Matrix size: 512 x 512\nStandard,200.0,100.0\n64,50.0,400.0",
        ));

        assert_eq!(n, Some(512));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].block_size, 64);
        assert_eq!(rows[0].variant, BlockVariant::Block(64));
        assert_eq!(rows[0].variant.to_string(), "Block 64");
        assert_eq!(rows[1].block_size, 512);
        assert_eq!(rows[1].variant, BlockVariant::NoBlocking);
        assert_eq!(rows[1].variant.to_string(), "No blocking");
        assert_eq!(rows[1].time_ms, 200.0);
    }

    #[test]
    fn standard_row_defaults_to_512_without_banner() {
        let (rows, n) = parse_block_results(&lines("STANDARD (no blocking), 10.0, 1.0"));
        assert_eq!(n, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].block_size, 512);
        assert_eq!(rows[0].variant, BlockVariant::NoBlocking);
    }

    #[test]
    fn header_version_blank_and_commaless_lines_are_skipped() {
        let (rows, _) = parse_block_results(&lines(
            "Block Size, Time (msec), Bandwidth (MB/s)\n\
             Version, 1.0, final\n\
             a line with no comma\n\
             \n\
             32, 80.0, 250.0",
        ));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].variant, BlockVariant::Block(32));
    }

    #[test]
    fn non_positive_or_nan_time_is_dropped() {
        for bad in ["64, 0.0, 400.0", "64, -1.0, 400.0", "64, NaN, 400.0", "64, inf, 400.0"] {
            let (rows, _) = parse_block_results(&lines(bad));
            assert!(rows.is_empty(), "row should be dropped: {bad}");
        }
    }

    #[test]
    fn infinite_bandwidth_becomes_nan() {
        let (rows, _) = parse_block_results(&lines("64, 50.0, inf"));
        assert_eq!(rows.len(), 1);
        assert!(rows[0].bandwidth_mb_s.is_nan());
    }

    #[test]
    fn non_integer_block_size_is_dropped() {
        let (rows, _) = parse_block_results(&lines("sixty-four, 50.0, 400.0"));
        assert!(rows.is_empty());
    }

    #[test]
    fn short_records_are_dropped() {
        let (rows, _) = parse_block_results(&lines("64, 50.0"));
        assert!(rows.is_empty());
    }

    #[test]
    fn empty_input_yields_no_rows() {
        let (rows, n) = parse_block_results(&[]);
        assert!(rows.is_empty());
        assert_eq!(n, None);
    }

    #[test]
    fn accepts_producer_file_shape() {
        let (rows, n) = parse_block_results(&lines(
            "Block Matrix Multiplication Performance Analysis\n\
             Matrix size: 512 x 512\n\
             \n\
             Block Size, Time (msec), Bandwidth (MB/s), Speedup vs Standard\n\
             \x20  8,     320.00,        62.50,   0.63x\n\
             \x20 64,      50.00,       400.00,   4.00x\n\
             \x20128,      70.00,       285.71,   2.86x\n\
             Standard (no blocking),     200.00,       100.00,   1.00x",
        ));

        assert_eq!(n, Some(512));
        assert_eq!(
            rows.iter().map(|r| r.block_size).collect::<Vec<_>>(),
            vec![8, 64, 128, 512]
        );
        assert_eq!(rows[3].variant, BlockVariant::NoBlocking);
        assert_eq!(rows[1].time_ms, 50.0);
        assert_eq!(rows[1].bandwidth_mb_s, 400.0);
    }
}
