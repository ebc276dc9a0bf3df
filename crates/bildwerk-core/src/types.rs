// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Bildwerk engine: kernels, per-algorithm threshold
// parameters, and the operator catalogue used by the batch layer.

use serde::{Deserialize, Serialize};

use crate::error::{BildwerkError, Result};

// -- Kernel -------------------------------------------------------------------

/// Square correlation kernel with an odd side length.
///
/// Weights are stored row-major. The centre cell sits at `(half, half)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    side: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Build a kernel from a side length and `side * side` row-major weights.
    pub fn new(side: usize, weights: Vec<f32>) -> Result<Self> {
        if side == 0 || side % 2 == 0 {
            return Err(BildwerkError::invalid(format!(
                "kernel side length must be odd, got {side}"
            )));
        }
        if weights.len() != side * side {
            return Err(BildwerkError::invalid(format!(
                "kernel of side {side} needs {} weights, got {}",
                side * side,
                weights.len()
            )));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite()) {
            return Err(BildwerkError::invalid(format!(
                "kernel weight {bad} is not finite"
            )));
        }
        Ok(Self { side, weights })
    }

    /// 3x3 identity-plus-Laplacian sharpening kernel. Weights sum to 1.
    pub fn laplacian() -> Self {
        Self {
            side: 3,
            weights: vec![
                0.0, -1.0, 0.0, //
                -1.0, 5.0, -1.0, //
                0.0, -1.0, 0.0,
            ],
        }
    }

    /// 5x5 Laplacian-of-Gaussian edge kernel. Weights sum to 0.
    pub fn laplacian_of_gaussian() -> Self {
        Self {
            side: 5,
            weights: vec![
                0.0, 0.0, -1.0, 0.0, 0.0, //
                0.0, -1.0, -2.0, -1.0, 0.0, //
                -1.0, -2.0, 16.0, -2.0, -1.0, //
                0.0, -1.0, -2.0, -1.0, 0.0, //
                0.0, 0.0, -1.0, 0.0, 0.0,
            ],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Distance from the centre cell to the kernel edge.
    pub fn half(&self) -> usize {
        self.side / 2
    }

    /// Weight at `(row, col)`, both in `0..side`.
    pub fn weight(&self, row: usize, col: usize) -> f32 {
        self.weights[row * self.side + col]
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// True for pure edge detectors whose response must be composited back
    /// onto the source image.
    pub fn is_zero_sum(&self) -> bool {
        self.sum().abs() < 1e-6
    }
}

// -- Threshold parameters -----------------------------------------------------

/// The three local thresholding rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdAlgorithm {
    Bernsen,
    Niblack,
    MeanAdaptive,
}

impl std::fmt::Display for ThresholdAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Bernsen => "bernsen",
            Self::Niblack => "niblack",
            Self::MeanAdaptive => "mean_adaptive",
        };
        write!(f, "{name}")
    }
}

/// Bernsen contrast thresholding.
///
/// A pixel becomes 255 when `(max - min) / 2` over its window exceeds
/// `contrast_threshold`. The halving differs from the textbook rule, where
/// the full range is compared, and is kept on purpose: existing outputs were
/// produced with it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BernsenParams {
    /// Contrast threshold `e`, compared against the half range.
    pub contrast_threshold: f64,
    /// Window radius `r`; the window side is `2 * (r / 2) + 1`.
    pub radius: u32,
}

impl Default for BernsenParams {
    fn default() -> Self {
        Self {
            contrast_threshold: 15.0,
            radius: 15,
        }
    }
}

impl BernsenParams {
    pub fn validate(&self, width: u32, height: u32) -> Result<()> {
        validate_radius("radius", self.radius, width, height)?;
        validate_finite("contrast_threshold", self.contrast_threshold)
    }
}

/// Niblack thresholding: `threshold = mean + k * std_dev`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NiblackParams {
    /// Window radius `r`; the window side is `2 * (r / 2) + 1`.
    pub radius: u32,
    /// Bias on the standard deviation, usually negative.
    pub k: f64,
}

impl Default for NiblackParams {
    fn default() -> Self {
        Self {
            radius: 15,
            k: -0.2,
        }
    }
}

impl NiblackParams {
    pub fn validate(&self, width: u32, height: u32) -> Result<()> {
        validate_radius("radius", self.radius, width, height)?;
        validate_finite("k", self.k)
    }
}

/// Local-mean thresholding: `threshold = mean - constant`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeanAdaptiveParams {
    /// Odd side length of the averaging block, at least 3.
    pub block_size: u32,
    /// Offset subtracted from the local mean.
    pub constant: f64,
}

impl Default for MeanAdaptiveParams {
    fn default() -> Self {
        Self {
            block_size: 11,
            constant: 1.5,
        }
    }
}

impl MeanAdaptiveParams {
    pub fn validate(&self, width: u32, height: u32) -> Result<()> {
        validate_radius("block_size", self.block_size, width, height)?;
        if self.block_size < 3 || self.block_size % 2 == 0 {
            return Err(BildwerkError::invalid(format!(
                "block_size must be odd and at least 3, got {}",
                self.block_size
            )));
        }
        validate_finite("constant", self.constant)
    }
}

/// Parameters for one thresholding call; the variant selects the algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum ThresholdParams {
    Bernsen(BernsenParams),
    Niblack(NiblackParams),
    MeanAdaptive(MeanAdaptiveParams),
}

impl ThresholdParams {
    pub fn algorithm(&self) -> ThresholdAlgorithm {
        match self {
            Self::Bernsen(_) => ThresholdAlgorithm::Bernsen,
            Self::Niblack(_) => ThresholdAlgorithm::Niblack,
            Self::MeanAdaptive(_) => ThresholdAlgorithm::MeanAdaptive,
        }
    }
}

fn validate_radius(name: &str, value: u32, width: u32, height: u32) -> Result<()> {
    if value == 0 {
        return Err(BildwerkError::invalid(format!("{name} must be positive")));
    }
    let limit = width.min(height);
    if value > limit {
        return Err(BildwerkError::invalid(format!(
            "{name} {value} exceeds image dimensions {width}x{height}"
        )));
    }
    Ok(())
}

fn validate_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(BildwerkError::invalid(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(())
}

// -- Operators ----------------------------------------------------------------

/// A complete image operator as selected by the batch layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operator {
    Bernsen(BernsenParams),
    Niblack(NiblackParams),
    MeanAdaptive(MeanAdaptiveParams),
    /// 3x3 Laplacian sharpening, no compositing.
    LaplacianSharpen,
    /// 5x5 LoG response scaled by `alpha` and added to the source.
    LogSharpen {
        #[serde(default = "default_alpha")]
        alpha: f32,
    },
    /// Logarithmic intensity stretch.
    LogTransform,
}

fn default_alpha() -> f32 {
    1.0
}

impl Operator {
    /// Every operator name accepted by [`Operator::from_name`].
    pub const NAMES: [&'static str; 6] = [
        "bernsen",
        "niblack",
        "mean_adaptive",
        "laplacian_sharpen",
        "log_sharpen",
        "log_transform",
    ];

    /// Output namespace for results of this operator.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bernsen(_) => "bernsen",
            Self::Niblack(_) => "niblack",
            Self::MeanAdaptive(_) => "mean_adaptive",
            Self::LaplacianSharpen => "laplacian_sharpen",
            Self::LogSharpen { .. } => "log_sharpen",
            Self::LogTransform => "log_transform",
        }
    }

    /// Look up an operator by name with default parameters.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "bernsen" => Ok(Self::Bernsen(BernsenParams::default())),
            "niblack" => Ok(Self::Niblack(NiblackParams::default())),
            "mean_adaptive" => Ok(Self::MeanAdaptive(MeanAdaptiveParams::default())),
            "laplacian_sharpen" => Ok(Self::LaplacianSharpen),
            "log_sharpen" => Ok(Self::LogSharpen {
                alpha: default_alpha(),
            }),
            "log_transform" => Ok(Self::LogTransform),
            other => Err(BildwerkError::invalid(format!(
                "unknown operator '{other}', expected one of {}",
                Self::NAMES.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
