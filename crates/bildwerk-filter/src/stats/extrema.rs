// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Separable min/max filter over square windows.

use image::GrayImage;
use rayon::prelude::*;

use super::{MinMax, Window};

/// Window minimum and maximum for every interior centre.
///
/// A horizontal pass reduces each row, then a vertical pass reduces the row
/// results. Entries outside the interior are left at zero and must not be
/// read.
pub struct LocalExtrema {
    width: usize,
    min: Vec<u8>,
    max: Vec<u8>,
}

impl LocalExtrema {
    pub fn new(image: &GrayImage, window: Window) -> Self {
        let (w, h) = image.dimensions();
        let width = w as usize;
        let mut min = vec![0u8; width * h as usize];
        let mut max = vec![0u8; width * h as usize];

        let Some(interior) = window.interior(w, h) else {
            return Self { width, min, max };
        };
        let half = window.half() as usize;
        let xs = interior.x.start as usize..interior.x.end as usize;
        let samples: &[u8] = image.as_raw();

        // Horizontal pass over every row.
        let mut row_min = vec![0u8; min.len()];
        let mut row_max = vec![0u8; max.len()];
        row_min
            .par_chunks_mut(width)
            .zip(row_max.par_chunks_mut(width))
            .zip(samples.par_chunks(width))
            .for_each(|((lo, hi), src)| {
                for x in xs.clone() {
                    let span = &src[x - half..=x + half];
                    lo[x] = span.iter().copied().min().unwrap_or(0);
                    hi[x] = span.iter().copied().max().unwrap_or(0);
                }
            });

        // Vertical pass over interior rows only.
        let ys = interior.y.start as usize..interior.y.end as usize;
        min.par_chunks_mut(width)
            .zip(max.par_chunks_mut(width))
            .enumerate()
            .filter(|(y, _)| ys.contains(y))
            .for_each(|(y, (lo, hi))| {
                for x in xs.clone() {
                    let mut m = u8::MAX;
                    let mut n = u8::MIN;
                    for wy in y - half..=y + half {
                        m = m.min(row_min[wy * width + x]);
                        n = n.max(row_max[wy * width + x]);
                    }
                    lo[x] = m;
                    hi[x] = n;
                }
            });

        Self { width, min, max }
    }

    /// Extremes of the window centred on `(x, y)`.
    pub fn at(&self, x: u32, y: u32) -> MinMax {
        let idx = y as usize * self.width + x as usize;
        MinMax {
            min: self.min[idx],
            max: self.max[idx],
        }
    }
}
