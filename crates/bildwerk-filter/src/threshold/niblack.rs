// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Niblack mean/deviation thresholding.

use bildwerk_core::{NiblackParams, Result};
use image::GrayImage;
use tracing::{debug, info, instrument};

use super::{BLACK, WHITE, binarize_interior};
use crate::gray::check_image;
use crate::stats::{IntegralImage, Window};

/// Threshold each interior pixel against `mean + k * std_dev` of its window.
///
/// Samples at or below the local threshold become 0, the rest 255. The
/// standard deviation is the population value. Pixels within `r / 2` of an
/// edge are copied unchanged.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn niblack(image: &GrayImage, params: &NiblackParams) -> Result<GrayImage> {
    check_image(image)?;
    params.validate(image.width(), image.height())?;
    info!(radius = params.radius, k = params.k, "Applying Niblack thresholding");

    let window = Window::from_radius(params.radius);
    let integral = IntegralImage::new(image)?;
    let k = params.k;

    let output = binarize_interior(image, window, |x, y, source| {
        let stats = integral.mean_std(x, y, window);
        if source as f64 <= stats.mean + k * stats.std_dev {
            BLACK
        } else {
            WHITE
        }
    });

    debug!(border = window.half(), "Niblack complete");
    Ok(output)
}
