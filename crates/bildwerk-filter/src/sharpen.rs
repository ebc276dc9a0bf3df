// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sharpening: self-contained Laplacian and Laplacian-of-Gaussian edge
// enhancement composited onto the source.

use bildwerk_core::{BildwerkError, Kernel, Result};
use image::{GrayImage, Luma};
use imageproc::definitions::Clamp;
use tracing::{debug, info, instrument};

use crate::convolve::{correlate, quantize_rounded, quantize_truncated};
use crate::gray::check_image;

/// Sharpen `image` with `kernel`.
///
/// - Zero-sum kernels (pure edge detectors such as the LoG) produce an edge
///   layer, clipped to `[0, 255]` and truncated, which is scaled by `alpha`
///   and added to the source. The sum saturates at 255.
/// - Any other kernel already contains the identity term; its clipped,
///   rounded response is the result and `alpha` plays no part.
#[instrument(skip(image, kernel), fields(width = image.width(), height = image.height(), side = kernel.side()))]
pub fn sharpen(image: &GrayImage, kernel: &Kernel, alpha: f32) -> Result<GrayImage> {
    check_image(image)?;
    if !alpha.is_finite() {
        return Err(BildwerkError::invalid(format!(
            "alpha must be finite, got {alpha}"
        )));
    }

    let response = correlate(image, kernel)?;
    if !kernel.is_zero_sum() {
        info!("Sharpening with identity-preserving kernel");
        return Ok(quantize_rounded(&response));
    }

    info!(alpha, "Compositing edge response onto source");
    let layer = quantize_truncated(&response);
    let sharpened = composite(image, &layer, alpha);
    debug!("Composite complete");
    Ok(sharpened)
}

/// 3x3 Laplacian sharpening.
pub fn laplacian_sharpen(image: &GrayImage) -> Result<GrayImage> {
    sharpen(image, &Kernel::laplacian(), 1.0)
}

/// 5x5 LoG sharpening with gain `alpha` (1.0 in the usual setup).
pub fn log_sharpen(image: &GrayImage, alpha: f32) -> Result<GrayImage> {
    sharpen(image, &Kernel::laplacian_of_gaussian(), alpha)
}

/// `clip(source + alpha * layer)`, rounded half to even. Never wraps.
fn composite(source: &GrayImage, layer: &GrayImage, alpha: f32) -> GrayImage {
    GrayImage::from_fn(source.width(), source.height(), |x, y| {
        let s = source.get_pixel(x, y).0[0] as f32;
        let l = layer.get_pixel(x, y).0[0] as f32;
        Luma([<u8 as Clamp<f32>>::clamp((s + alpha * l).round_ties_even())])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_edge() -> GrayImage {
        GrayImage::from_fn(30, 30, |x, _| Luma([if x < 15 { 60 } else { 180 }]))
    }

    #[test]
    fn laplacian_keeps_uniform_image() {
        let img = GrayImage::from_pixel(10, 10, Luma([33]));
        assert_eq!(laplacian_sharpen(&img).unwrap(), img);
    }

    #[test]
    fn log_keeps_uniform_image() {
        let img = GrayImage::from_pixel(10, 10, Luma([201]));
        assert_eq!(log_sharpen(&img, 1.0).unwrap(), img);
        assert_eq!(log_sharpen(&img, 3.5).unwrap(), img);
    }

    #[test]
    fn laplacian_overshoots_step_edge() {
        let out = laplacian_sharpen(&step_edge()).unwrap();
        // Dark side: 5 * 60 - 3 * 60 - 180 = -60, clipped to 0.
        assert_eq!(out.get_pixel(14, 10).0[0], 0);
        // Bright side: 5 * 180 - 3 * 180 - 60 = 300, clipped to 255.
        assert_eq!(out.get_pixel(15, 10).0[0], 255);
        assert_eq!(out.get_pixel(5, 10).0[0], 60);
        assert_eq!(out.get_pixel(25, 10).0[0], 180);
    }

    #[test]
    fn log_adds_only_positive_response() {
        let out = log_sharpen(&step_edge(), 1.0).unwrap();
        // Column weight sums are [-1, -4, 10, -4, -1]. Bright side next to
        // the edge: -60 - 240 + 1800 - 720 - 180 = 600.
        assert_eq!(out.get_pixel(15, 10).0[0], 255);
        // Dark side has a negative response, clipped to 0 before adding.
        assert_eq!(out.get_pixel(14, 10).0[0], 60);
        assert_eq!(out.get_pixel(2, 10).0[0], 60);
    }

    #[test]
    fn composite_saturates_instead_of_wrapping() {
        let src = GrayImage::from_pixel(2, 2, Luma([250]));
        let layer = GrayImage::from_pixel(2, 2, Luma([100]));
        let out = composite(&src, &layer, 1.0);
        assert!(out.pixels().all(|p| p.0[0] == 255));
        let darker = composite(&src, &layer, -3.0);
        assert!(darker.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn composite_rounds_halves_to_even() {
        let layer = GrayImage::from_pixel(1, 1, Luma([1]));
        let even = composite(&GrayImage::from_pixel(1, 1, Luma([10])), &layer, 0.5);
        assert_eq!(even.get_pixel(0, 0).0[0], 10);
        let odd = composite(&GrayImage::from_pixel(1, 1, Luma([11])), &layer, 0.5);
        assert_eq!(odd.get_pixel(0, 0).0[0], 12);
    }

    #[test]
    fn non_finite_alpha_is_rejected() {
        let img = GrayImage::from_pixel(5, 5, Luma([1]));
        assert!(log_sharpen(&img, f32::NAN).is_err());
    }
}
