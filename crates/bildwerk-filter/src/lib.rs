// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-filter: The binarization and sharpening engine.
//
// Provides sliding-window statistics (min/max, mean/standard deviation),
// Bernsen / Niblack / mean-adaptive thresholding, kernel correlation with
// clipping, and Laplacian / LoG sharpening. All operations are pure: they
// borrow an 8-bit grayscale image and return a freshly allocated one.

pub mod convolve;
pub mod gray;
pub mod intensity;
pub mod operator;
pub mod sharpen;
pub mod stats;
pub mod threshold;

// Re-export the primary entry points so callers can use `bildwerk_filter::threshold` etc.
pub use convolve::{ResponseImage, correlate};
pub use gray::{check_image, ensure_luma8, luma_bt601};
pub use intensity::log_transform;
pub use operator::apply;
pub use sharpen::{laplacian_sharpen, log_sharpen, sharpen};
pub use stats::{MeanStd, MinMax, Window, window_mean_std, window_min_max};
pub use threshold::{bernsen, mean_adaptive, niblack, threshold};
