//! Loader + block parser end-to-end over real files.

use std::io::Write;

use memplot_report::block::{BlockVariant, parse_block_results};
use memplot_report::loader::read_text_lines;
use memplot_report::metrics::{BlockSeries, summarize_block};
use memplot_report::report;
use tempfile::NamedTempFile;

const PRODUCER_FILE: &str = "Block Matrix Multiplication Performance Analysis\n\
                             Matrix size: 512 x 512\n\
                             \n\
                             Block Size, Time (msec), Bandwidth (MB/s), Speedup vs Standard\n\
                             \x20  8,     320.00,        62.50,   0.63x\n\
                             \x20 16,     150.00,       133.33,   1.33x\n\
                             \x20 64,      50.00,       400.00,   4.00x\n\
                             \x20128,      70.00,       285.71,   2.86x\n\
                             Standard (no blocking),     200.00,       100.00,   1.00x\n";

fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file
}

#[test]
fn parses_producer_file_end_to_end() {
    let file = write_temp(PRODUCER_FILE.as_bytes());
    let lines = read_text_lines(file.path(), None).expect("readable file");
    let (rows, matrix_size) = parse_block_results(&lines);

    assert_eq!(matrix_size, Some(512));
    assert_eq!(
        rows.iter().map(|r| r.block_size).collect::<Vec<_>>(),
        vec![8, 16, 64, 128, 512]
    );
    assert_eq!(rows[4].variant, BlockVariant::NoBlocking);
    assert_eq!(rows[4].time_ms, 200.0);
}

#[test]
fn summary_matches_producer_file() {
    let file = write_temp(PRODUCER_FILE.as_bytes());
    let lines = read_text_lines(file.path(), None).expect("readable file");
    let (rows, _) = parse_block_results(&lines);
    let series = BlockSeries::from_rows(&rows);
    let summary = summarize_block(&rows, &series).expect("rows present");

    assert_eq!(summary.baseline_time_ms, 200.0);
    assert_eq!(summary.best_time_idx, 2);
    assert_eq!(summary.best_block_size, 64);
    assert_eq!(summary.best_bandwidth_idx, Some(2));
    assert_eq!(summary.working_set_bytes, 3 * 64 * 64 * 8);
    assert_eq!(summary.speedups[2], 4.0);
    assert_eq!(summary.speedups[4], 1.0);
}

#[test]
fn baseline_falls_back_to_last_sorted_row() {
    // No Standard row: after the ascending sort the baseline must be the
    // largest block size (128), whatever the file order was.
    let file = write_temp(b"128, 70.0, 285.71\n16, 150.0, 133.33\n64, 50.0, 400.0\n");
    let lines = read_text_lines(file.path(), None).expect("readable file");
    let (rows, matrix_size) = parse_block_results(&lines);
    let series = BlockSeries::from_rows(&rows);
    let summary = summarize_block(&rows, &series).expect("rows present");

    assert_eq!(matrix_size, None);
    assert_eq!(
        rows.iter().map(|r| r.block_size).collect::<Vec<_>>(),
        vec![16, 64, 128]
    );
    assert_eq!(summary.baseline_time_ms, 70.0);
}

#[test]
fn all_nan_bandwidth_still_summarizes() {
    let file = write_temp(b"16, 150.0, inf\n64, 50.0, nan\n");
    let lines = read_text_lines(file.path(), None).expect("readable file");
    let (rows, _) = parse_block_results(&lines);
    let series = BlockSeries::from_rows(&rows);
    let summary = summarize_block(&rows, &series).expect("rows present");

    assert!(series.bandwidths_mb_s.iter().all(|b| b.is_nan()));
    assert_eq!(summary.best_bandwidth_idx, None);
    assert_eq!(summary.best_block_size, 64);
}

#[test]
fn summary_json_field_names() {
    let (rows, _) = parse_block_results(
        &"Standard,200.0,100.0\n64,50.0,400.0"
            .lines()
            .map(str::to_owned)
            .collect::<Vec<_>>(),
    );
    let series = BlockSeries::from_rows(&rows);
    let summary = summarize_block(&rows, &series).expect("rows present");

    let json = serde_json::to_value(&summary).expect("serializable");
    assert_eq!(json["baseline_time_ms"], 200.0);
    assert_eq!(json["best_block_size"], 64);
    assert_eq!(json["working_set_bytes"], 98_304);

    let row_json = serde_json::to_value(rows[1]).expect("serializable");
    assert_eq!(row_json["variant"], "no_blocking");
}

// Needs a system font for text rendering, so not part of the default run:
// cargo test -p memplot-report --test block_pipeline -- --ignored
#[test]
#[ignore]
fn renders_block_chart_png() {
    let (rows, matrix_size) = parse_block_results(
        &PRODUCER_FILE
            .lines()
            .map(str::to_owned)
            .collect::<Vec<_>>(),
    );
    let series = BlockSeries::from_rows(&rows);

    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("block_size_analysis.png");
    report::render_block_chart(
        &series,
        matrix_size,
        &path,
        report::ChartGeometry {
            width_px: 1400,
            height_px: 600,
        },
    )
    .expect("render block chart");

    assert!(path.exists());
}
