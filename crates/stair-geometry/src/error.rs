// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for staircase generation

use stair_model::ModelError;
use thiserror::Error;

/// Geometry generation result type
pub type Result<T> = std::result::Result<T, Error>;

/// Geometry generation errors
///
/// Degraded geometry (fallback directions, unconverged solves, missing
/// textures) is logged and reported as a scene warning, never returned here.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry construction error
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Profile construction error
    #[error("Profile error: {0}")]
    Profile(String),

    /// Triangulation error
    #[error("Triangulation error: {0}")]
    Triangulation(String),

    /// Configuration JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Model validation error
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl Error {
    /// Create a geometry error
    pub fn geometry(msg: impl Into<String>) -> Self {
        Error::Geometry(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a profile error
    pub fn profile(msg: impl Into<String>) -> Self {
        Error::Profile(msg.into())
    }

    /// Create a triangulation error
    pub fn triangulation(msg: impl Into<String>) -> Self {
        Error::Triangulation(msg.into())
    }
}
