// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Box mean with replicated edges.

use image::GrayImage;
use rayon::prelude::*;

/// Mean of the `side x side` block around every pixel, row-major.
///
/// Coordinates past the edge are clamped to the nearest edge sample, so every
/// pixel gets a full block. `side` must be odd.
pub fn local_means_replicated(image: &GrayImage, side: u32) -> Vec<f64> {
    let (w, h) = image.dimensions();
    let (width, height) = (w as usize, h as usize);
    let half = (side / 2) as isize;
    let samples: &[u8] = image.as_raw();

    let clamp = |i: isize, n: usize| i.clamp(0, n as isize - 1) as usize;

    let mut row_sums = vec![0u64; width * height];
    row_sums
        .par_chunks_mut(width)
        .zip(samples.par_chunks(width))
        .for_each(|(dst, src)| {
            for (x, out) in dst.iter_mut().enumerate() {
                *out = (-half..=half)
                    .map(|dx| src[clamp(x as isize + dx, width)] as u64)
                    .sum();
            }
        });

    let area = (side as f64) * (side as f64);
    let mut means = vec![0f64; width * height];
    means
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, dst)| {
            for (x, out) in dst.iter_mut().enumerate() {
                let total: u64 = (-half..=half)
                    .map(|dy| row_sums[clamp(y as isize + dy, height) * width + x])
                    .sum();
                *out = total as f64 / area;
            }
        });
    means
}
