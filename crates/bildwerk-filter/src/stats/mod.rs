// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sliding-window statistics: min/max and mean/standard deviation over square
// neighbourhoods, plus the border policy that decides which centres have a
// complete window.

pub mod box_mean;
pub mod extrema;
pub mod integral;

use std::ops::Range;

use bildwerk_core::{BildwerkError, Result};
use image::GrayImage;

pub use box_mean::local_means_replicated;
pub use extrema::LocalExtrema;
pub use integral::IntegralImage;

/// Square neighbourhood derived from a radius `r`.
///
/// The half-width is `r / 2` (integer division), so radii 14 and 15 both give
/// a 15x15 window. Only centres whose whole window lies inside the image are
/// processed by the window operators; the rest form a frame of width
/// [`Window::half`] that is passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    half: u32,
}

/// Centres with a complete window, as half-open ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interior {
    pub x: Range<u32>,
    pub y: Range<u32>,
}

impl Window {
    pub fn from_radius(radius: u32) -> Self {
        Self { half: radius / 2 }
    }

    pub fn half(&self) -> u32 {
        self.half
    }

    /// Side length, `2 * half + 1`.
    pub fn side(&self) -> u32 {
        2 * self.half + 1
    }

    /// Number of samples in a full window.
    pub fn area(&self) -> u64 {
        let side = self.side() as u64;
        side * side
    }

    /// The processed region `[h, W-h) x [h, H-h)`, or `None` when the window
    /// does not fit anywhere in the image.
    pub fn interior(&self, width: u32, height: u32) -> Option<Interior> {
        let h = self.half;
        if width <= 2 * h || height <= 2 * h {
            return None;
        }
        Some(Interior {
            x: h..width - h,
            y: h..height - h,
        })
    }

    pub fn is_interior(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
        self.interior(width, height)
            .is_some_and(|i| i.x.contains(&x) && i.y.contains(&y))
    }
}

/// Extremes of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinMax {
    pub min: u8,
    pub max: u8,
}

impl MinMax {
    /// Bernsen's contrast: half of the range.
    pub fn half_range(&self) -> f64 {
        (self.max as f64 - self.min as f64) / 2.0
    }
}

/// First and second moments of a window. `std_dev` is the population value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanStd {
    pub mean: f64,
    pub std_dev: f64,
}

impl MeanStd {
    /// Moments from exact integer sums of `n` samples.
    ///
    /// The variance numerator `n * sum_sq - sum^2` is formed in integers, so a
    /// constant window has a standard deviation of exactly zero.
    pub fn from_sums(sum: u64, sum_sq: u64, n: u64) -> Self {
        let n_f = n as f64;
        let spread = (n as u128 * sum_sq as u128).saturating_sub(sum as u128 * sum as u128);
        Self {
            mean: sum as f64 / n_f,
            std_dev: ((spread as f64) / (n_f * n_f)).sqrt(),
        }
    }
}

/// Min and max of the window of radius `radius` centred on `(x, y)`.
///
/// Scans the window directly. Fails for centres outside the interior.
pub fn window_min_max(image: &GrayImage, x: u32, y: u32, radius: u32) -> Result<MinMax> {
    let window = checked_window(image, x, y, radius)?;
    let h = window.half();
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    for wy in y - h..=y + h {
        for wx in x - h..=x + h {
            let v = image.get_pixel(wx, wy).0[0];
            min = min.min(v);
            max = max.max(v);
        }
    }
    Ok(MinMax { min, max })
}

/// Mean and population standard deviation of the window of radius `radius`
/// centred on `(x, y)`. Fails for centres outside the interior.
pub fn window_mean_std(image: &GrayImage, x: u32, y: u32, radius: u32) -> Result<MeanStd> {
    let window = checked_window(image, x, y, radius)?;
    let h = window.half();
    let mut sum = 0u64;
    let mut sum_sq = 0u64;
    for wy in y - h..=y + h {
        for wx in x - h..=x + h {
            let v = image.get_pixel(wx, wy).0[0] as u64;
            sum += v;
            sum_sq += v * v;
        }
    }
    Ok(MeanStd::from_sums(sum, sum_sq, window.area()))
}

fn checked_window(image: &GrayImage, x: u32, y: u32, radius: u32) -> Result<Window> {
    let window = Window::from_radius(radius);
    let (width, height) = image.dimensions();
    if !window.is_interior(x, y, width, height) {
        return Err(BildwerkError::invalid(format!(
            "window of side {} at ({x}, {y}) does not fit in {width}x{height}",
            window.side()
        )));
    }
    Ok(window)
}
