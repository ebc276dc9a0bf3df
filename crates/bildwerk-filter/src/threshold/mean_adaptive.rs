// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Local-mean adaptive thresholding.

use bildwerk_core::{MeanAdaptiveParams, Result};
use image::{GrayImage, Luma};
use tracing::{debug, info, instrument};

use super::{BLACK, WHITE};
use crate::gray::check_image;
use crate::stats::local_means_replicated;

/// Binarize every pixel against `local_mean - constant`.
///
/// The local mean covers a `block_size x block_size` block with edges
/// replicated, so unlike Bernsen and Niblack there is no untouched border.
/// Pixels strictly above the threshold become 255, the rest 0.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn mean_adaptive(image: &GrayImage, params: &MeanAdaptiveParams) -> Result<GrayImage> {
    check_image(image)?;
    params.validate(image.width(), image.height())?;
    info!(
        block_size = params.block_size,
        constant = params.constant,
        "Applying mean-adaptive thresholding"
    );

    let means = local_means_replicated(image, params.block_size);
    let width = image.width() as usize;
    let output = GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let mean = means[y as usize * width + x as usize];
        let source = image.get_pixel(x, y).0[0] as f64;
        Luma([if source > mean - params.constant {
            WHITE
        } else {
            BLACK
        }])
    });

    debug!("Mean-adaptive complete");
    Ok(output)
}
