// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Point intensity transforms.

use bildwerk_core::Result;
use image::{GrayImage, Luma};
use tracing::{debug, instrument};

use crate::gray::check_image;

/// Logarithmic stretch: `255 * ln(1 + v) / ln(1 + max)`, rounded.
///
/// `max` is the brightest sample in the image, which therefore maps to 255.
/// An all-black image is returned as is.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn log_transform(image: &GrayImage) -> Result<GrayImage> {
    check_image(image)?;
    let max = image.pixels().map(|p| p.0[0]).max().unwrap_or(0);
    debug!(max, "Log transform");
    if max == 0 {
        return Ok(image.clone());
    }

    let scale = 255.0 / (max as f64).ln_1p();
    let table: Vec<u8> = (0..=255u16)
        .map(|v| (scale * (v as f64).ln_1p()).round().min(255.0) as u8)
        .collect();
    Ok(GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([table[image.get_pixel(x, y).0[0] as usize]])
    }))
}
