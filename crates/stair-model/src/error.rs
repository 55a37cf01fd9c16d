// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model validation

use thiserror::Error;

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised when constructing or validating model data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A path segment violates its invariants
    #[error("Invalid path segment: {0}")]
    InvalidSegment(String),

    /// A texture image reported unusable dimensions
    #[error("Invalid image size {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    /// Material combination not allowed for the material kind
    #[error("Invalid material: {0}")]
    InvalidMaterial(String),
}

impl ModelError {
    /// Create an invalid segment error
    pub fn segment(msg: impl Into<String>) -> Self {
        ModelError::InvalidSegment(msg.into())
    }

    /// Create an invalid material error
    pub fn material(msg: impl Into<String>) -> Self {
        ModelError::InvalidMaterial(msg.into())
    }
}
