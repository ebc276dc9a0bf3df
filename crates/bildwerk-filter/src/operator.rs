// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single entry point mapping an `Operator` to its implementation.

use bildwerk_core::{Operator, Result, ThresholdParams};
use image::GrayImage;

use crate::intensity::log_transform;
use crate::sharpen::{laplacian_sharpen, log_sharpen};
use crate::threshold::threshold;

/// Run `operator` on `image`, returning a new image of the same size.
pub fn apply(operator: &Operator, image: &GrayImage) -> Result<GrayImage> {
    match *operator {
        Operator::Bernsen(p) => threshold(image, &ThresholdParams::Bernsen(p)),
        Operator::Niblack(p) => threshold(image, &ThresholdParams::Niblack(p)),
        Operator::MeanAdaptive(p) => threshold(image, &ThresholdParams::MeanAdaptive(p)),
        Operator::LaplacianSharpen => laplacian_sharpen(image),
        Operator::LogSharpen { alpha } => log_sharpen(image, alpha),
        Operator::LogTransform => log_transform(image),
    }
}
