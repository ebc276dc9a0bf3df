// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Local thresholding: Bernsen, Niblack, and mean-adaptive rules that turn a
// per-pixel window statistic into a binary decision.

pub mod bernsen;
pub mod mean_adaptive;
pub mod niblack;

use bildwerk_core::{Result, ThresholdParams};
use image::GrayImage;
use rayon::prelude::*;
use tracing::instrument;

use crate::stats::Window;

pub use bernsen::bernsen;
pub use mean_adaptive::mean_adaptive;
pub use niblack::niblack;

/// Foreground / background sample values in binary output.
pub const BLACK: u8 = 0;
pub const WHITE: u8 = 255;

/// Binarize `image` with the algorithm selected by `params`.
///
/// Parameters are validated against the image size before any pixel is read.
#[instrument(skip(image), fields(width = image.width(), height = image.height(), algorithm = %params.algorithm()))]
pub fn threshold(image: &GrayImage, params: &ThresholdParams) -> Result<GrayImage> {
    match params {
        ThresholdParams::Bernsen(p) => bernsen(image, p),
        ThresholdParams::Niblack(p) => niblack(image, p),
        ThresholdParams::MeanAdaptive(p) => mean_adaptive(image, p),
    }
}

/// Copy `image` and overwrite every interior pixel of `window` with
/// `decide(x, y, source)`. The border frame keeps its source values.
fn binarize_interior<F>(image: &GrayImage, window: Window, decide: F) -> GrayImage
where
    F: Fn(u32, u32, u8) -> u8 + Sync,
{
    let mut output = image.clone();
    let (w, h) = image.dimensions();
    let Some(interior) = window.interior(w, h) else {
        return output;
    };

    let buf: &mut [u8] = &mut output;
    buf.par_chunks_mut(w as usize)
        .enumerate()
        .skip(interior.y.start as usize)
        .take(interior.y.len())
        .for_each(|(y, row)| {
            for x in interior.x.clone() {
                let px = &mut row[x as usize];
                *px = decide(x, y as u32, *px);
            }
        });
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use bildwerk_core::{BernsenParams, NiblackParams};
    use image::Luma;

    #[test]
    fn dispatch_matches_direct_call() {
        let img = GrayImage::from_fn(20, 20, |x, y| Luma([((x * 13 + y * 7) % 256) as u8]));
        let p = NiblackParams { radius: 5, k: -0.2 };
        assert_eq!(
            threshold(&img, &ThresholdParams::Niblack(p)).unwrap(),
            niblack(&img, &p).unwrap()
        );
        let b = BernsenParams {
            contrast_threshold: 10.0,
            radius: 5,
        };
        assert_eq!(
            threshold(&img, &ThresholdParams::Bernsen(b)).unwrap(),
            bernsen(&img, &b).unwrap()
        );
    }

    #[test]
    fn binarize_interior_leaves_frame() {
        let img = GrayImage::from_pixel(6, 6, Luma([7]));
        let out = binarize_interior(&img, Window::from_radius(3), |_, _, _| WHITE);
        for (x, y, p) in out.enumerate_pixels() {
            let inside = (1..5).contains(&x) && (1..5).contains(&y);
            assert_eq!(p.0[0], if inside { WHITE } else { 7 });
        }
    }
}
