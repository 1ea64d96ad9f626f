//! Command-line interface: run the pipeline, inspect data, chat

use clap::{Parser, Subcommand};
use colored::*;
use std::io::Write as _;
use std::path::PathBuf;
use std::time::Instant;

use crate::assistant::Assistant;
use crate::classification::{CellResult, CellStatus};
use crate::data::load_dataset;
use crate::pipeline::{self, threshold_from_env, PipelineConfig, ThresholdSource};
use crate::report::Report;

fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}

fn accent(s: &str) -> ColoredString {
    s.truecolor(120, 170, 255)
}

fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", muted(&"─".repeat(56)));
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
    let _ = std::io::stdout().flush();
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), muted(detail));
}

/// Explicit table geometry, passed into the printer instead of living in
/// ambient display settings.
#[derive(Debug, Clone)]
pub struct TableFormat {
    pub index_width: usize,
    pub value_width: usize,
    pub precision: usize,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            index_width: 5,
            value_width: 14,
            precision: 4,
        }
    }
}

fn print_cell_table(cells: &[CellResult], fmt: &TableFormat) {
    println!(
        "  {:>iw$} {:>vw$} {:>vw$} {:>8}",
        muted("#"),
        muted("true soh"),
        muted("predicted"),
        muted("status"),
        iw = fmt.index_width,
        vw = fmt.value_width,
    );
    println!("  {}", muted(&"─".repeat(fmt.index_width + 2 * fmt.value_width + 11)));
    for (i, cell) in cells.iter().enumerate() {
        let status = match cell.status {
            CellStatus::Pass => ok("pass"),
            CellStatus::Fail => "fail".red(),
        };
        println!(
            "  {:>iw$} {:>vw$.p$} {:>vw$.p$} {:>8}",
            i,
            cell.true_soh,
            cell.predicted_soh,
            status,
            iw = fmt.index_width,
            vw = fmt.value_width,
            p = fmt.precision,
        );
    }
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "cellhealth")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Battery SOH prediction and reporting pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the SOH prediction pipeline and write report artifacts
    Run {
        /// Dataset file, or directory of segment tables
        #[arg(short, long)]
        data: PathBuf,

        /// Segment (table) name inside a dataset directory
        #[arg(short, long)]
        segment: Option<String>,

        /// Fraction of rows held out for evaluation
        #[arg(long, default_value = "0.2")]
        fraction: f64,

        /// Seed for the deterministic split
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Pass/fail threshold; falls back to SOH_THRESHOLD, then 0.6
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Directory for report.json, soh_plot.svg, latest_soh.txt
        #[arg(short, long, default_value = "artifacts")]
        out_dir: PathBuf,
    },

    /// Show dataset shape and column summary
    Info {
        /// Dataset file, or directory of segment tables
        #[arg(short, long)]
        data: PathBuf,

        /// Segment (table) name inside a dataset directory
        #[arg(short, long)]
        segment: Option<String>,
    },

    /// Interactive battery-health assistant
    Chat {
        /// Report artifact providing SOH context for the conversation
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_run(
    data: &PathBuf,
    segment: Option<&str>,
    fraction: f64,
    seed: u64,
    threshold: Option<f64>,
    out_dir: &PathBuf,
) -> anyhow::Result<()> {
    section("SOH Prediction");

    let threshold = match threshold {
        Some(t) => t,
        None => {
            let setting = threshold_from_env();
            if let ThresholdSource::InvalidFallback { raw } = &setting.source {
                println!(
                    "  {} ignoring unparsable SOH_THRESHOLD {:?}, using {}",
                    "!".yellow(),
                    raw,
                    setting.value
                );
            }
            setting.value
        }
    };

    let mut config = PipelineConfig::new(data.clone())
        .with_eval_fraction(fraction)
        .with_seed(seed)
        .with_threshold(threshold)
        .with_output_dir(out_dir.clone());
    if let Some(segment) = segment {
        config = config.with_segment(segment);
    }

    step_run("Running pipeline");
    let start = Instant::now();
    let report = pipeline::run(&config)?;
    step_done(&format!("{:?}", start.elapsed()));

    println!();
    println!("  {:<12} {}", muted("R²"), format!("{:.4}", report.metrics.r2).white().bold());
    println!("  {:<12} {:.4}", muted("MSE"), report.metrics.mse);
    println!("  {:<12} {:.4}", muted("MAE"), report.metrics.mae);

    section("Feature Importance");
    for (name, coefficient) in report.feature_importance.iter().take(10) {
        println!("  {:<8} {:>10.4}", name, coefficient);
    }

    section("Battery Pack Test Results");
    print_cell_table(&report.cells, &TableFormat::default());

    println!();
    println!(
        "  {} {} pass, {} fail {}",
        ok("summary"),
        report.metrics.pass_count,
        report.metrics.fail_count,
        muted(&format!("(threshold = {threshold})"))
    );
    println!(
        "  {} {}",
        muted("artifacts"),
        out_dir.display()
    );
    println!();

    Ok(())
}

pub fn cmd_info(data: &PathBuf, segment: Option<&str>) -> anyhow::Result<()> {
    section("Data Info");

    let dataset = load_dataset(data, segment)?;
    println!("  {:<12} {}", muted("Source"), data.display());
    if let Some(segment) = segment {
        println!("  {:<12} {}", muted("Segment"), segment);
    }
    println!("  {:<12} {}", muted("Samples"), dataset.len());
    println!("  {:<12} {}", muted("Probes"), dataset.feature_names().len());

    let target = dataset.target();
    if dataset.len() > 0 {
        let min = target.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = target.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mean = target.sum() / dataset.len() as f64;
        println!("  {:<12} min {:.4}  mean {:.4}  max {:.4}", muted("SOH"), min, mean, max);
    }
    println!();

    Ok(())
}

pub async fn cmd_chat(report_path: Option<&PathBuf>) -> anyhow::Result<()> {
    section("Battery Health Assistant");

    let soh = match report_path {
        Some(path) => {
            let report = Report::read(path)?;
            println!(
                "  {:<12} {}",
                muted("avg SOH"),
                format!("{:.4}", report.metrics.avg_soh).white()
            );
            Some(report.metrics.avg_soh)
        }
        None => None,
    };

    let assistant = Assistant::from_env();
    println!("  {}", muted("ask about battery health, or type 'exit'"));
    println!();

    let stdin = std::io::stdin();
    loop {
        print!("  {} ", accent("you ›"));
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") {
            break;
        }

        let reply = assistant.respond(question, soh).await;
        println!("  {} {}", ok("assistant ›"), reply);
        println!();
    }

    Ok(())
}
