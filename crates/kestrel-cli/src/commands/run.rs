use crate::config::Config;
use anyhow::{Context, Result};
use kestrel_core::analysis::Aggregator;
use kestrel_core::logs::{self, LogLines};
use kestrel_core::report;
use std::fs;
use std::path::PathBuf;

/// Outcome of one pipeline run; every exit is observable by the caller
#[derive(Debug)]
pub enum RunStatus {
    /// No log file matched in the log directory; nothing to do
    NoLogFound,
    /// Report written and the source log relocated
    Completed {
        report_path: PathBuf,
        lines_processed: usize,
        lines_failed: usize,
    },
}

/// Run the full pipeline: select, aggregate, render, relocate.
///
/// Threshold, empty-input and infrastructure failures propagate before any
/// file-system mutation, so a failed log stays in place for re-processing.
pub fn run(config: &Config, line_limit: Option<usize>) -> Result<RunStatus> {
    for dir in [&config.log_dir, &config.report_dir, &config.done_dir] {
        fs::create_dir_all(dir)
            .with_context(|| format!("cannot create directory {}", dir.display()))?;
    }

    let log = match logs::select_latest(&config.log_dir)? {
        Some(log) => log,
        None => {
            tracing::info!("No log found in {}", config.log_dir.display());
            return Ok(RunStatus::NoLogFound);
        }
    };

    let lines = LogLines::open(&log.path)?;
    let result = Aggregator::new(config.report_size)
        .with_error_threshold(config.error_threshold)
        .with_line_limit(line_limit)
        .aggregate(lines)?;

    let html = report::render(&result, report::DEFAULT_TEMPLATE)?;
    let report_path = report::write_report(&html, &config.report_dir, &log)?;

    // only a fully reported log is marked processed
    let file_name = log.path.file_name().context("log path has no file name")?;
    let done_path = config.done_dir.join(file_name);
    fs::rename(&log.path, &done_path).with_context(|| {
        format!(
            "cannot relocate {} to {}",
            log.path.display(),
            done_path.display()
        )
    })?;
    tracing::info!("Relocated processed log to {}", done_path.display());

    Ok(RunStatus::Completed {
        report_path,
        lines_processed: result.lines_processed,
        lines_failed: result.lines_failed,
    })
}

pub fn execute(config: &Config, line_limit: Option<usize>) -> Result<()> {
    use console::style;

    match run(config, line_limit)? {
        RunStatus::NoLogFound => {
            println!("{}", style("No log file to process.").yellow());
        }
        RunStatus::Completed {
            report_path,
            lines_processed,
            lines_failed,
        } => {
            println!("\n{}", style("Report complete").bold().green());
            println!("  Lines processed: {}", lines_processed);
            println!("  Lines failed:    {}", lines_failed);
            println!("  Report:          {}", report_path.display());
        }
    }

    Ok(())
}
