// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments and their resolution into a `BatchConfig`.

use std::path::PathBuf;

use bildwerk_core::{BatchConfig, Operator, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "bildwerk",
    about = "Batch adaptive binarization and sharpening of grayscale images",
    long_about = None
)]
pub struct Args {
    /// Directory containing .png / .jpg inputs
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Root directory for results; one subdirectory per operator is created
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Operator to apply (repeatable): bernsen, niblack, mean_adaptive,
    /// laplacian_sharpen, log_sharpen, log_transform
    #[arg(long = "operator", short = 'p')]
    pub operators: Vec<String>,

    /// Gain for log_sharpen operators given with --operator
    #[arg(long)]
    pub alpha: Option<f32>,

    /// JSON batch configuration; --input, --output and --operator override it
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Write the run report as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Print the operator names and exit
    #[arg(long)]
    pub list_operators: bool,
}

impl Args {
    /// Merge the optional config file with command-line overrides.
    pub fn resolve(&self) -> Result<BatchConfig> {
        let mut config = match &self.config {
            Some(path) => BatchConfig::load(path)?,
            None => BatchConfig::default(),
        };

        if let Some(input) = &self.input {
            config.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if !self.operators.is_empty() {
            config.operators = self
                .operators
                .iter()
                .map(|name| self.operator(name))
                .collect::<Result<_>>()?;
        }

        config.validate()?;
        Ok(config)
    }

    fn operator(&self, name: &str) -> Result<Operator> {
        let op = Operator::from_name(name)?;
        Ok(match (op, self.alpha) {
            (Operator::LogSharpen { .. }, Some(alpha)) => Operator::LogSharpen { alpha },
            (op, _) => op,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::parse_from(std::iter::once("bildwerk").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_without_arguments() {
        let config = parse(&[]).resolve().unwrap();
        assert_eq!(config, BatchConfig::default());
    }

    #[test]
    fn operators_and_alpha_from_flags() {
        let args = parse(&[
            "--input", "in", "--output", "out", "-p", "bernsen", "-p", "log_sharpen", "--alpha", "0.5",
        ]);
        let config = args.resolve().unwrap();
        assert_eq!(config.input_dir, PathBuf::from("in"));
        assert_eq!(config.operators.len(), 2);
        assert_eq!(config.operators[0].name(), "bernsen");
        assert_eq!(config.operators[1], Operator::LogSharpen { alpha: 0.5 });
    }

    #[test]
    fn unknown_operator_is_an_error() {
        assert!(parse(&["-p", "sauvola"]).resolve().is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.json");
        let file = BatchConfig {
            input_dir: PathBuf::from("scans"),
            output_dir: PathBuf::from("results"),
            operators: vec![Operator::LogTransform],
        };
        std::fs::write(&path, serde_json::to_string(&file).unwrap()).unwrap();

        let args = parse(&["--config", path.to_str().unwrap(), "--output", "elsewhere"]);
        let config = args.resolve().unwrap();
        assert_eq!(config.input_dir, PathBuf::from("scans"));
        assert_eq!(config.output_dir, PathBuf::from("elsewhere"));
        assert_eq!(config.operators, vec![Operator::LogTransform]);
    }
}
