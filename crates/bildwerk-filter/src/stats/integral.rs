// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Summed-area tables of sample values and squared sample values.

use bildwerk_core::{BildwerkError, Result};
use image::GrayImage;

use super::{MeanStd, Window};

/// Integral images for O(1) window sums.
///
/// `sums[y * (width+1) + x]` holds the sum of all samples in the rectangle
/// `[0, x) x [0, y)`. Both tables have dimensions `(width+1) x (height+1)`
/// with a zero first row and column.
pub struct IntegralImage {
    stride: usize,
    sums: Vec<u64>,
    squares: Vec<u64>,
}

impl IntegralImage {
    pub fn new(gray: &GrayImage) -> Result<Self> {
        let (w, h) = gray.dimensions();
        let stride = w as usize + 1;
        let len = stride * (h as usize + 1);
        let mut sums = vec![0u64; len];
        let mut squares = vec![0u64; len];

        for (y, row) in gray.rows().enumerate() {
            let mut row_sum = 0u64;
            let mut row_sq = 0u64;
            for (x, pixel) in row.enumerate() {
                let v = pixel.0[0] as u64;
                row_sum += v;
                row_sq += v * v;
                let idx = (y + 1) * stride + (x + 1);
                let above = y * stride + (x + 1);
                sums[idx] = row_sum.checked_add(sums[above]).ok_or_else(overflow)?;
                squares[idx] = row_sq.checked_add(squares[above]).ok_or_else(overflow)?;
            }
        }

        Ok(Self {
            stride,
            sums,
            squares,
        })
    }

    /// Sum and sum of squares over `[x0, x1) x [y0, y1)`.
    pub fn region_sums(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> (u64, u64) {
        let (x0, y0, x1, y1) = (x0 as usize, y0 as usize, x1 as usize, y1 as usize);
        let s = self.stride;
        let lookup = |t: &[u64]| t[y1 * s + x1] + t[y0 * s + x0] - t[y0 * s + x1] - t[y1 * s + x0];
        (lookup(&self.sums), lookup(&self.squares))
    }

    /// Moments of the full window centred on `(x, y)`. The centre must be
    /// interior for `window`.
    pub fn mean_std(&self, x: u32, y: u32, window: Window) -> MeanStd {
        let h = window.half();
        let (sum, sum_sq) = self.region_sums(x - h, y - h, x + h + 1, y + h + 1);
        MeanStd::from_sums(sum, sum_sq, window.area())
    }
}

fn overflow() -> BildwerkError {
    BildwerkError::ComputationOverflow("integral image exceeded u64".into())
}
