// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildwerk.

use thiserror::Error;

/// Top-level error type for all Bildwerk operations.
#[derive(Debug, Error)]
pub enum BildwerkError {
    // -- Engine errors --
    /// Bad radius, kernel, or threshold configuration. Raised before any
    /// pixel is touched.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Wrong channel layout, bit depth, or an empty image.
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    /// Internal invariant violation. Clipping should make this unreachable.
    #[error("computation overflow: {0}")]
    ComputationOverflow(String),

    // -- Collaborator errors --
    #[error("image codec failed: {0}")]
    ImageError(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BildwerkError {
    /// Shorthand for building an [`BildwerkError::InvalidParameter`].
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidParameter(detail.into())
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BildwerkError>;
