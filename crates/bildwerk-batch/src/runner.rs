// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory batch runner.
//
// Applies one operator to a collection of identified images. A failure on one
// image is recorded and logged; the remaining images are still processed.

use std::collections::BTreeMap;

use bildwerk_core::{BildwerkError, Operator, Result};
use bildwerk_filter::{apply, ensure_luma8};
use image::{DynamicImage, GrayImage};
use rayon::prelude::*;
use tracing::{info, instrument, warn};

/// One image that could not be processed.
#[derive(Debug)]
pub struct BatchFailure {
    pub id: String,
    pub error: BildwerkError,
}

/// Results of one operator over one input collection.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Output namespace, the operator's name.
    pub namespace: &'static str,
    /// Exactly one processed image per successful input id.
    pub images: BTreeMap<String, GrayImage>,
    /// Inputs that produced no image, in input order.
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies a single operator across a collection of images.
///
/// Images are processed in parallel; the runner holds no state between calls.
pub struct BatchRunner {
    operator: Operator,
}

impl BatchRunner {
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    pub fn namespace(&self) -> &'static str {
        self.operator.name()
    }

    /// Process already-decoded grayscale images.
    #[instrument(skip_all, fields(operator = %self.operator, count = inputs.len()))]
    pub fn run(&self, inputs: &[(String, GrayImage)]) -> BatchOutcome {
        let items = inputs
            .iter()
            .map(|(id, image)| (id.as_str(), Ok(image)))
            .collect();
        self.process(items)
    }

    /// Process decoded images of any layout. Anything that is not 8-bit
    /// grayscale is reported as a failure for that id.
    #[instrument(skip_all, fields(operator = %self.operator, count = inputs.len()))]
    pub fn run_dynamic(&self, inputs: &[(String, DynamicImage)]) -> BatchOutcome {
        let items = inputs
            .iter()
            .map(|(id, image)| (id.as_str(), ensure_luma8(image)))
            .collect();
        self.process(items)
    }

    fn process(&self, items: Vec<(&str, Result<&GrayImage>)>) -> BatchOutcome {
        info!(count = items.len(), "Starting batch");

        let results: Vec<(&str, Result<GrayImage>)> = items
            .into_par_iter()
            .map(|(id, image)| (id, image.and_then(|gray| apply(&self.operator, gray))))
            .collect();

        let mut images = BTreeMap::new();
        let mut failures = Vec::new();
        for (id, result) in results {
            let result = result.and_then(|image| {
                if images.contains_key(id) {
                    Err(BildwerkError::invalid(format!("duplicate image id '{id}'")))
                } else {
                    Ok(image)
                }
            });
            match result {
                Ok(image) => {
                    images.insert(id.to_string(), image);
                }
                Err(error) => {
                    warn!(id, error = %error, "Image failed; continuing with the rest");
                    failures.push(BatchFailure {
                        id: id.to_string(),
                        error,
                    });
                }
            }
        }

        info!(
            processed = images.len(),
            failed = failures.len(),
            "Batch complete"
        );
        BatchOutcome {
            namespace: self.namespace(),
            images,
            failures,
        }
    }
}

/// Run several operators over the same inputs, one outcome per operator in
/// the given order.
pub fn run_many(operators: &[Operator], inputs: &[(String, GrayImage)]) -> Vec<BatchOutcome> {
    operators
        .iter()
        .map(|op| BatchRunner::new(*op).run(inputs))
        .collect()
}
