use std::path::PathBuf;

use clap::Parser;
use memplot_cli::{
    Result, chart_geometry, effective_show, parse_encoding, show_image, utc_timestamp,
    write_summary_json,
};
use memplot_config::validated::ReportConfig;
use memplot_report::loader::{Encoding, read_text_lines};
use memplot_report::metrics::{StrideSeries, StrideSummary, summarize_stride};
use memplot_report::stride::{StrideRow, parse_stride_lines};
use memplot_report::{ReportError, report, trace};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "memplot-stride",
    about = "Plot stride experiment results (time and bandwidth vs stride)."
)]
struct Cli {
    /// Input results file for -O0.
    #[arg(long, default_value = "results_O0.txt")]
    o0: PathBuf,
    /// Input results file for -O2.
    #[arg(long, default_value = "results_O2.txt")]
    o2: PathBuf,
    /// Output image path (PNG).
    #[arg(long, default_value = "stride_analysis.png")]
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
struct StrideReport<'a> {
    generated_at_utc: String,
    o0_path: String,
    o2_path: String,
    output_path: String,
    rows_o0: &'a [StrideRow],
    rows_o2: &'a [StrideRow],
    summary: &'a StrideSummary,
}

fn run(cli: Cli) -> Result<()> {
    let config = ReportConfig::load(cli.config.as_deref())?;

    let o0_rows = parse_stride_lines(&read_text_lines(&cli.o0, cli.encoding)?);
    let o2_rows = parse_stride_lines(&read_text_lines(&cli.o2, cli.encoding)?);

    if o0_rows.is_empty() || o2_rows.is_empty() {
        let mut missing = Vec::new();
        if o0_rows.is_empty() {
            missing.push(cli.o0.as_path());
        }
        if o2_rows.is_empty() {
            missing.push(cli.o2.as_path());
        }
        return Err(ReportError::no_usable_rows(missing).into());
    }

    let o0 = StrideSeries::from_rows(&o0_rows);
    let o2 = StrideSeries::from_rows(&o2_rows);

    report::render_stride_chart(&o0, &o2, &cli.output, chart_geometry(config.stride))?;
    println!("Plot saved to: {}", cli.output.display());

    let summary = summarize_stride(&o0, &o2);
    print_summary(&summary);

    if let Some(path) = &cli.summary_json {
        write_summary_json(
            path,
            &StrideReport {
                generated_at_utc: utc_timestamp(),
                o0_path: cli.o0.display().to_string(),
                o2_path: cli.o2.display().to_string(),
                output_path: cli.output.display().to_string(),
                rows_o0: &o0_rows,
                rows_o2: &o2_rows,
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

fn print_summary(summary: &StrideSummary) {
    println!();
    println!("=== Summary ===");
    println!(
        "Avg time (ms):   -O0={:.2}  -O2={:.2}  speedup={:.2}x",
        summary.mean_time_o0_ms, summary.mean_time_o2_ms, summary.speedup
    );
    if let Some(change) = summary.bandwidth_change_pct {
        println!(
            "Avg bandwidth:   -O0={:.2} MB/s  -O2={:.2} MB/s  change={:.1}%",
            summary.mean_bandwidth_o0_mb_s, summary.mean_bandwidth_o2_mb_s, change
        );
    }
}

fn main() {
    if let Err(err) = trace::init_tracing("info") {
        eprintln!("memplot-stride: {err}");
    }

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("memplot-stride error: {err}");
        std::process::exit(1);
    }
}
