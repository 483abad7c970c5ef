use std::path::PathBuf;

use clap::Parser;
use memplot_cli::{
    Result, chart_geometry, effective_show, format_bytes_grouped, parse_encoding, show_image,
    utc_timestamp, write_summary_json,
};
use memplot_config::validated::ReportConfig;
use memplot_report::block::{BlockRow, BlockVariant, parse_block_results};
use memplot_report::loader::{Encoding, read_text_lines};
use memplot_report::metrics::{BlockSeries, BlockSummary, summarize_block};
use memplot_report::{ReportError, report, trace};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "memplot-block",
    about = "Plot blocked matrix multiplication results (time and bandwidth vs block size)."
)]
struct Cli {
    /// Input results file.
    #[arg(long, default_value = "mxm_bloc_results.txt")]
    input: PathBuf,
    /// Output image path (PNG).
    #[arg(long, default_value = "block_size_analysis.png")]
    output: PathBuf,
    /// Force input encoding (otherwise tries common encodings).
    #[arg(long, value_parser = parse_encoding)]
    encoding: Option<Encoding>,
    /// Do not open an image viewer (useful on headless machines).
    #[arg(long)]
    no_show: bool,
    /// Optional TOML config file (chart geometry, display behavior).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Also write the computed summary as pretty-printed JSON.
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BlockReport<'a> {
    generated_at_utc: String,
    input_path: String,
    output_path: String,
    matrix_size: Option<i64>,
    rows: &'a [BlockRow],
    summary: &'a BlockSummary,
}

fn run(cli: Cli) -> Result<()> {
    let config = ReportConfig::load(cli.config.as_deref())?;

    let lines = read_text_lines(&cli.input, cli.encoding)?;
    let (rows, matrix_size) = parse_block_results(&lines);

    let series = BlockSeries::from_rows(&rows);
    let summary = match summarize_block(&rows, &series) {
        Some(summary) => summary,
        None => return Err(ReportError::no_usable_rows([cli.input.as_path()]).into()),
    };

    report::render_block_chart(
        &series,
        matrix_size,
        &cli.output,
        chart_geometry(config.block),
    )?;
    println!("Plot saved to: {}", cli.output.display());

    print_summary(&rows, &summary);

    if let Some(path) = &cli.summary_json {
        write_summary_json(
            path,
            &BlockReport {
                generated_at_utc: utc_timestamp(),
                input_path: cli.input.display().to_string(),
                output_path: cli.output.display().to_string(),
                matrix_size,
                rows: &rows,
                summary: &summary,
            },
        )?;
        println!("Summary JSON saved to: {}", path.display());
    }

    if effective_show(&config, cli.no_show) {
        show_image(&cli.output, config.display.viewer.as_deref());
    }

    Ok(())
}

fn print_summary(rows: &[BlockRow], summary: &BlockSummary) {
    println!();
    println!("=== Summary (speedup vs no blocking) ===");
    for (row, speedup) in rows.iter().zip(&summary.speedups) {
        let name = match row.variant {
            BlockVariant::NoBlocking => "No blocking".to_string(),
            BlockVariant::Block(size) => format!("Block {size:>4}"),
        };
        println!(
            "{name}: time={:8.2} ms  bw={:10.2} MB/s  speedup={speedup:5.2}x",
            row.time_ms, row.bandwidth_mb_s
        );
    }

    println!();
    println!("=== Working-set estimate (best time) ===");
    println!("Block size: {}", summary.best_block_size);
    println!(
        "Approx working set: {} bytes ({:.1} KiB)",
        format_bytes_grouped(summary.working_set_bytes),
        summary.working_set_bytes as f64 / 1024.0
    );
}

fn main() {
    if let Err(err) = trace::init_tracing("info") {
        eprintln!("memplot-block: {err}");
    }

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("memplot-block error: {err}");
        std::process::exit(1);
    }
}
