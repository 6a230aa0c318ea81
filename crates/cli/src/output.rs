//! Output formatting utilities

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use bench_lib::BenchmarkReport;
use clap::ValueEnum;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for the benchmark report
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Row for the report summary table
#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn row(field: &'static str, value: impl ToString) -> ReportRow {
    ReportRow {
        field,
        value: value.to_string(),
    }
}

/// Print the final report to stdout
pub fn print_report(report: &BenchmarkReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", to_json(report)?);
        }
        OutputFormat::Table => {
            println!("{}", "Benchmark Report".bold());
            println!("{}", "=".repeat(50));

            let rows = vec![
                row("Source repository", &report.source_repo),
                row("Working directory", report.work_dir().display()),
                row("Trigger file", report.trigger_file.display()),
                row("Triggers", report.triggers),
                row("Final trigger value", report.final_trigger_value),
                row("Controller namespace", &report.controller_namespace),
                row("Runner namespace", &report.runner_namespace),
                row("Started", format_timestamp(report.started_at)),
                row("Finished", format_timestamp(report.finished_at)),
                row("Rise-edge polls", report.rise_polls),
                row("Drain polls", report.fall_polls),
            ];
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
            println!(
                "\nElapsed time: {}",
                format_duration(report.elapsed()).green().bold()
            );
        }
    }

    Ok(())
}

/// Write the report as pretty JSON
pub fn write_report(report: &BenchmarkReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, to_json(report)?)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

fn to_json(report: &BenchmarkReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Format a duration as `1h02m03.456s`, `2m03.456s` or `3.456s`
pub fn format_duration(duration: Duration) -> String {
    let total_millis = duration.as_millis();
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis / 60_000) % 60;
    let seconds = (total_millis / 1000) % 60;
    let millis = total_millis % 1000;

    if hours > 0 {
        format!("{}h{:02}m{:02}.{:03}s", hours, minutes, seconds, millis)
    } else if minutes > 0 {
        format!("{}m{:02}.{:03}s", minutes, seconds, millis)
    } else {
        format!("{}.{:03}s", seconds, millis)
    }
}

fn format_timestamp(ts: chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
