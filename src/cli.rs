//! Command-line interface
//!
//! One command: run the full clean → split → train → compare workflow on a
//! CSV file and print the comparison table plus per-model confusion
//! matrices.

use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::time::Instant;

use crate::cleaning::Cleaner;
use crate::data::load_table;
use crate::evaluation::evaluate;
use crate::models::{Classifier, LogisticRegression, RandomForest};
use crate::pipeline::Pipeline;
use crate::report::ComparisonReport;
use crate::split::StratifiedSplitter;
use crate::viz::ConfusionMatrixView;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}
fn accent(s: &str) -> ColoredString {
    s.truecolor(120, 170, 255)
}
fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}
fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
    let _ = std::io::Write::flush(&mut std::io::stdout());
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), muted(detail));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "fruitqc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fruit quality classification: clean, train, compare, report")]
pub struct Cli {
    /// Input data file (CSV with a header row)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Seed for the stratified split and forest sampling
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Fraction of rows held out for testing
    #[arg(long, default_value = "0.2")]
    pub test_fraction: f64,

    /// Also print the comparison report as JSON
    #[arg(long)]
    pub json: bool,
}

// ─── Analyze ───────────────────────────────────────────────────────────────────

pub fn cmd_analyze(cli: &Cli) -> anyhow::Result<()> {
    section("Fruit quality analysis");

    step_run("Loading data");
    let start = Instant::now();
    let df = load_table(&cli.data)?;
    step_done(&format!(
        "{} rows × {} cols in {:?}",
        df.height(),
        df.width(),
        start.elapsed()
    ));

    step_run("Cleaning");
    let cleaned = Cleaner::new().clean(&df)?;
    let counts = cleaned.class_counts();
    step_done(&format!(
        "{} rows kept ({} good / {} bad)",
        cleaned.n_rows(),
        counts[1],
        counts[0]
    ));

    step_run("Splitting");
    let split = StratifiedSplitter::new(cli.seed)
        .with_test_fraction(cli.test_fraction)
        .split(&cleaned)?;
    step_done(&format!(
        "{} train / {} test",
        split.train.n_rows(),
        split.test.n_rows()
    ));

    let classifiers: Vec<(&str, Box<dyn Classifier>)> = vec![
        (
            "Logistic Regression",
            Box::new(LogisticRegression::new()),
        ),
        (
            "Random Forest",
            Box::new(RandomForest::new(100).with_seed(cli.seed)),
        ),
    ];

    let mut results: Vec<(String, crate::evaluation::Metrics)> = Vec::new();
    let mut views: Vec<ConfusionMatrixView> = Vec::new();

    for (name, classifier) in classifiers {
        step_run(&format!("Training {}", name.cyan()));
        let start = Instant::now();
        let mut pipeline = Pipeline::new(classifier);
        let (predictions, metrics) = evaluate(&mut pipeline, &split.train, &split.test)?;
        step_done(&format!(
            "accuracy {:.4} in {:?}",
            metrics.accuracy,
            start.elapsed()
        ));

        views.push(ConfusionMatrixView::new(&predictions, name));
        results.push((name.to_string(), metrics));
    }

    let report = ComparisonReport::from_results(&results);

    section("Model comparison");
    for line in report.render_text().lines() {
        println!("  {}", line);
    }

    if cli.json {
        println!();
        println!("{}", report.to_json()?);
    }

    section("Confusion matrices");
    for view in &views {
        for line in view.render().lines() {
            println!("  {}", line);
        }
        println!();
    }

    Ok(())
}
