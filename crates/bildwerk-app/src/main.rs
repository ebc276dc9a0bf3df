// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk: batch binarization and sharpening.
//
// Entry point. Initialises logging, resolves the batch configuration from the
// command line, and runs every operator over the input directory.

mod cli;

use std::process::ExitCode;

use bildwerk_batch::{BatchReport, run_directory};
use bildwerk_core::{Operator, Result};
use clap::Parser;

use cli::Args;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if args.list_operators {
        for name in Operator::NAMES {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(report) if report.is_clean() => ExitCode::SUCCESS,
        Ok(report) => {
            tracing::warn!(failures = report.failure_count(), "Batch finished with failures");
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!(error = %err, "Batch aborted");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<BatchReport> {
    let config = args.resolve()?;
    tracing::info!("Bildwerk starting");

    let report = run_directory(&config)?;
    for op in &report.operators {
        println!(
            "{}: {} written, {} failed -> {}",
            op.operator,
            op.written,
            op.failures.len(),
            op.output_dir.display()
        );
    }
    for failure in report
        .decode_failures
        .iter()
        .chain(report.operators.iter().flat_map(|op| op.failures.iter()))
    {
        println!("  {} ({:?}): {}", failure.file, failure.stage, failure.message);
    }

    if let Some(path) = &args.report {
        std::fs::write(path, report.to_json()?)?;
    }
    Ok(report)
}
