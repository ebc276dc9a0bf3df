// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BildwerkError, Result};
use crate::types::{NiblackParams, Operator};

/// Settings for one batch run over a directory of images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Directory scanned for `.png` / `.jpg` inputs.
    pub input_dir: PathBuf,
    /// Root under which one subdirectory per operator is created.
    pub output_dir: PathBuf,
    /// Operators applied in order, each to every input.
    pub operators: Vec<Operator>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            operators: vec![Operator::Niblack(NiblackParams::default())],
        }
    }
}

impl BatchConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce any output.
    pub fn validate(&self) -> Result<()> {
        if self.operators.is_empty() {
            return Err(BildwerkError::invalid("no operators configured"));
        }
        if self.input_dir == self.output_dir {
            return Err(BildwerkError::invalid(format!(
                "input and output directory are both {}",
                self.input_dir.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_runs_niblack() {
        let config = BatchConfig::default();
        assert_eq!(config.operators.len(), 1);
        assert_eq!(config.operators[0].name(), "niblack");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: BatchConfig = serde_json::from_str(
            r#"{"input_dir":"scans","operators":[{"kind":"bernsen"},{"kind":"log_sharpen","alpha":0.5}]}"#,
        )
        .unwrap();
        assert_eq!(config.input_dir, PathBuf::from("scans"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.operators[1], Operator::LogSharpen { alpha: 0.5 });
    }

    #[test]
    fn empty_operator_list_is_invalid() {
        let config = BatchConfig {
            operators: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn same_input_and_output_is_invalid() {
        let config = BatchConfig {
            input_dir: PathBuf::from("images"),
            output_dir: PathBuf::from("images"),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
