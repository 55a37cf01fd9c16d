// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stair Model - Shared types for parametric staircase generation
//!
//! This crate holds the contract types that flow between the path codec, the
//! geometry kernel and the host application. Sibling features (price
//! calculation, railing toggles in the UI) read the same [`Tread`] list the
//! geometry kernel consumes, so these types are deliberately plain data.
//!
//! # Architecture
//!
//! - [`PathSegment`] - Declarative walking path (straight runs and landings)
//! - [`Tread`] - One laid-out step or landing with world placement
//! - [`RailingState`] - Per-step / per-landing railing toggles and sides
//! - [`MeshData`] - Flat vertex/index buffers ready for the renderer
//! - [`MaterialParams`] / [`FaceTexture`] - Material parameter sets
//! - [`StairScene`] - The complete generated scene
//! - [`TextureProvider`] - Seam to the host's asynchronous texture loader
//!
//! # Example
//!
//! ```ignore
//! use stair_model::{PathSegment, Turn};
//!
//! let path = vec![
//!     PathSegment::straight(5),
//!     PathSegment::landing(Some(Turn::Right)),
//!     PathSegment::straight(4),
//! ];
//! assert_eq!(stair_model::count_steps(&path), 9);
//! ```

pub mod error;
pub mod material;
pub mod mesh;
pub mod path;
pub mod railing;
pub mod scene;
pub mod traits;
pub mod tread;

// Re-export all public types
pub use error::*;
pub use material::*;
pub use mesh::*;
pub use path::*;
pub use railing::*;
pub use scene::*;
pub use traits::*;
pub use tread::*;
