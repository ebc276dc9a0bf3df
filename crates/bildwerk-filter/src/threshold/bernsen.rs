// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bernsen contrast thresholding.

use bildwerk_core::{BernsenParams, Result};
use image::GrayImage;
use tracing::{debug, info, instrument};

use super::{BLACK, WHITE, binarize_interior};
use crate::gray::check_image;
use crate::stats::{LocalExtrema, Window};

/// Mark high-contrast neighbourhoods white and flat ones black.
///
/// For each interior pixel the contrast is `(max - min) / 2` over its window.
/// `contrast <= e` gives 0, anything above gives 255. Note the half range: a
/// configured `e` of 15 corresponds to a full-range threshold of 30 in the
/// usual formulation. Pixels within `r / 2` of an edge are copied unchanged.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn bernsen(image: &GrayImage, params: &BernsenParams) -> Result<GrayImage> {
    check_image(image)?;
    params.validate(image.width(), image.height())?;
    info!(
        e = params.contrast_threshold,
        radius = params.radius,
        "Applying Bernsen thresholding"
    );

    let window = Window::from_radius(params.radius);
    let extrema = LocalExtrema::new(image, window);
    let e = params.contrast_threshold;

    let output = binarize_interior(image, window, |x, y, _| {
        if extrema.at(x, y).half_range() <= e {
            BLACK
        } else {
            WHITE
        }
    });

    debug!(border = window.half(), "Bernsen complete");
    Ok(output)
}
