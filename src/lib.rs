// src/lib.rs

//! Bounded-concurrency task execution.
//!
//! [`BoundedExecutor`] runs independently submitted async tasks with at most
//! N in flight, keeps each result in the slot of its submission index, and
//! isolates failures: a failing task yields `None` in its slot and a report
//! to a [`FailureSink`], nothing more.
//!
//! ```no_run
//! # async fn demo() -> taskqueue::errors::Result<()> {
//! let tasks = (0..5u64).map(|i| move || async move { Ok::<_, String>(i * 2) });
//! let results = taskqueue::run(tasks, 2).await?;
//! assert_eq!(results, vec![Some(0), Some(2), Some(4), Some(6), Some(8)]);
//! # Ok(())
//! # }
//! ```
//!
//! The `taskqueue` binary built on top of it runs shell commands from a TOML
//! file; see [`run_cli`].

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod executor;
pub mod logging;
pub mod types;

use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_and_validate};
use crate::exec::run_command;
use crate::types::ConcurrencyLimit;

pub use crate::executor::{
    BoundedExecutor, ChannelSink, FailureKind, FailureSink, RunReport, TaskFailure, TracingSink,
    run,
};

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the config, applies the `--concurrency` override,
/// runs every command through a [`BoundedExecutor`] and prints one line per
/// task in config order.
pub async fn run_cli(args: CliArgs) -> Result<()> {
    let cfg = resolve_config(&args)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let executor = BoundedExecutor::with_limit(cfg.concurrency_limit);
    let names: Vec<String> = cfg.tasks.iter().map(|t| t.name.clone()).collect();
    let tasks = cfg
        .tasks
        .into_iter()
        .map(|task| move || run_command(task));

    let report = executor.run_with_report(tasks).await;

    for line in render_results(&names, &report) {
        println!("{line}");
    }
    Ok(())
}

/// Load and validate the config named by `--config`, then apply the
/// `--concurrency` override.
///
/// Every argument error surfaces here, before any command is started.
pub fn resolve_config(args: &CliArgs) -> Result<ConfigFile> {
    let config_path = PathBuf::from(&args.config);
    let mut cfg = load_and_validate(&config_path)?;

    if let Some(n) = args.concurrency {
        cfg = cfg.with_concurrency_limit(ConcurrencyLimit::try_from(n)?);
    }
    Ok(cfg)
}

/// Format a finished run: one line per task in submission order, then a
/// summary line.
pub fn render_results(names: &[String], report: &RunReport<String>) -> Vec<String> {
    let mut lines: Vec<String> = names
        .iter()
        .zip(report.results.iter())
        .map(|(name, result)| match result {
            Some(stdout) if stdout.is_empty() => format!("{name}: ok"),
            Some(stdout) => format!("{name}: {stdout}"),
            None => format!("{name}: <failed>"),
        })
        .collect();

    lines.push(format!(
        "{} task(s): {} succeeded, {} failed (peak concurrency {})",
        report.states.len(),
        report.succeeded(),
        report.failed(),
        report.peak_in_flight
    ));
    lines
}

fn print_dry_run(cfg: &ConfigFile) {
    println!("taskqueue dry-run");
    println!("  concurrency_limit = {}", cfg.concurrency_limit);
    println!();

    println!("tasks ({}):", cfg.tasks.len());
    for (index, task) in cfg.tasks.iter().enumerate() {
        println!("  [{index}] {}", task.name);
        println!("      cmd: {}", task.cmd);
    }

    debug!("dry-run complete (no execution)");
}
