// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Kernel correlation with reflect-101 borders, and quantization of the float
// response back to 8-bit samples.

use bildwerk_core::{Kernel, Result};
use image::{GrayImage, Luma};
use imageproc::definitions::{Clamp, Image};
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::gray::check_image;

/// Unclipped floating-point filter response, one sample per source pixel.
pub type ResponseImage = Image<Luma<f32>>;

/// Correlate `kernel` with `image` (the kernel is not flipped).
///
/// Samples outside the image are read through reflect-101 (`dcb|abcd|cba`):
/// the edge pixel is the mirror axis and is not repeated.
#[instrument(skip_all, fields(width = image.width(), height = image.height(), side = kernel.side()))]
pub fn correlate(image: &GrayImage, kernel: &Kernel) -> Result<ResponseImage> {
    check_image(image)?;
    let (w, h) = image.dimensions();
    let (width, height) = (w as usize, h as usize);
    let half = kernel.half() as isize;
    let side = kernel.side();
    let samples: &[u8] = image.as_raw();

    // Reflected column index for every (x, kernel column) pair.
    let columns: Vec<usize> = (0..width)
        .flat_map(|x| (-half..=half).map(move |dx| reflect_101(x as isize + dx, width)))
        .collect();

    let mut response = ResponseImage::new(w, h);
    let buf: &mut [f32] = &mut response;
    buf.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            let mut acc = 0f32;
            for ky in 0..side {
                let sy = reflect_101(y as isize + ky as isize - half, height);
                let src_row = &samples[sy * width..(sy + 1) * width];
                let cols = &columns[x * side..(x + 1) * side];
                for (kx, &sx) in cols.iter().enumerate() {
                    acc += kernel.weight(ky, kx) * src_row[sx] as f32;
                }
            }
            *out = acc;
        }
    });

    debug!("Correlation complete");
    Ok(response)
}

/// Map an out-of-range index back inside `0..len` by mirroring about the
/// edge samples without repeating them.
pub fn reflect_101(mut index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    while index < 0 || index > last {
        index = if index < 0 { -index } else { 2 * last - index };
    }
    index as usize
}

/// Clip to `[0, 255]` and round to the nearest integer, ties to even.
pub fn quantize_rounded(response: &ResponseImage) -> GrayImage {
    map_response(response, |v| <u8 as Clamp<f32>>::clamp(v.round_ties_even()))
}

/// Clip to `[0, 255]` and drop the fractional part.
pub fn quantize_truncated(response: &ResponseImage) -> GrayImage {
    map_response(response, <u8 as Clamp<f32>>::clamp)
}

fn map_response(response: &ResponseImage, f: impl Fn(f32) -> u8) -> GrayImage {
    GrayImage::from_fn(response.width(), response.height(), |x, y| {
        Luma([f(response.get_pixel(x, y).0[0])])
    })
}
