// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for strict token parsing

use stair_model::ModelError;
use thiserror::Error;

/// Result type alias for path parsing
pub type Result<T> = std::result::Result<T, PathError>;

/// Errors raised by the strict parsers
///
/// The lenient [`decode`](crate::decode) never returns these; it skips bad
/// tokens instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// Input held no tokens at all
    #[error("Empty path")]
    Empty,

    /// Token did not match any known form
    #[error("Unknown path token '{0}'")]
    UnknownToken(String),

    /// Segment rejected by the model
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl PathError {
    /// Create an unknown token error
    pub fn unknown(token: impl Into<String>) -> Self {
        PathError::UnknownToken(token.into())
    }
}
