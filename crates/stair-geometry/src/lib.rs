// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Stair Geometry
//!
//! Parametric staircase geometry kernel. Turns a walking path, a profile and
//! a railing configuration into renderer-ready meshes with fitted face
//! textures. Shared types come from `stair-model`; path tokens are decoded by
//! `stair-path`.
//!
//! ## Overview
//!
//! - **Layout**: Walk the path and place every step and landing
//! - **Frames**: Resolve which local face is front, back and inner per tread
//! - **Profiles**: Build thick, thin, wedge, ridge and hi-tech cross-sections
//! - **Plates**: Connector plates along hi-tech runs, width-matched to landings
//! - **Railings**: Glass and metal panels, cable railings
//! - **Textures**: Cover-fit face textures with a memoizing cache
//!
//! ## Architecture
//!
//! - `ProfileBuilder`: Trait for one cross-section profile, dispatched by `ProfileRegistry`
//! - `TextureProvider`: Trait from stair-model for the host's texture loader
//! - `StairGenerator`: Runs the pipeline and owns the face-texture cache
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stair_geometry::{StairConfig, StairGenerator, TextureCatalog};
//! use stair_model::RailingState;
//!
//! let generator = StairGenerator::new();
//! let scene = generator.generate_tokens(
//!     "s5,lr,s4",
//!     &RailingState::new(),
//!     &TextureCatalog::new(),
//!     &StairConfig::default(),
//! )?;
//!
//! println!("Generated {} triangles", scene.triangle_count());
//! ```

pub mod config;
pub mod error;
pub mod frame;
pub mod generator;
pub mod layout;
pub mod mesh;
pub mod numeric;
pub mod plates;
pub mod profile;
pub mod railing;
pub mod texture;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

// Re-export main types
pub use config::{
    Dimensions, MaterialConfig, PlateConfig, ProfileConfig, RailingConfig, StairConfig,
    TextureConfig,
};
pub use error::{Error, Result};
pub use frame::{resolve_frame, LocalFrame};
pub use generator::{compute_scene, StairGenerator};
pub use layout::{back_corners, layout_treads, StepRun, TreadLayout};
pub use mesh::{FaceExtent, MeshBuilder};
pub use numeric::{secant_solve, SecantOutcome};
pub use plates::{
    build_connector_plate, build_landing_plate, build_plates, solve_landing_width,
    ConnectorPlate, LandingPlate, PlateParams, PlateSet, PlateSide, RailPair, WidthMatch,
};
pub use profile::{
    FaceMesh, HiTechProfile, ProfileBuilder, ProfileContext, ProfileKind, ProfileRegistry,
    RectangularProfile, RidgeProfile, TreadMesh, WedgeProfile,
};
pub use railing::{
    build_cables, build_railings, panel_segments, Cable, PanelSegment, RailingGeometry,
    RailingKind, RailingPanel, RailingParams,
};
pub use texture::{
    fit_face_texture, FaceTextureCache, FaceTextureKey, FaceTextureRequest, TextureCatalog,
};
pub use triangulation::{polygon_normal, triangulate_polygon};

#[cfg(test)]
mod tests {
    use super::*;
    use stair_model::{NoTextures, RailingState, Turn};
    use stair_path::decode;

    #[test]
    fn test_l_shape_end_to_end() {
        let path = decode("s5,lr,s4").unwrap();
        let scene = compute_scene(
            &path,
            &RailingState::new(),
            &NoTextures,
            &StairConfig::default(),
            &FaceTextureCache::new(),
        )
        .unwrap();

        assert_eq!(scene.treads.len(), 10);
        assert_eq!(scene.treads[5].turn, Some(Turn::Right));
        assert!(scene.treads[6..].iter().all(|t| t.flight == 1));
        assert!(scene.triangle_count() > 0);
    }

    #[test]
    fn test_every_profile_generates() {
        let generator = StairGenerator::new();
        for kind in [
            ProfileKind::Thick,
            ProfileKind::Thin,
            ProfileKind::Wedge,
            ProfileKind::Ridge,
            ProfileKind::HiTech,
        ] {
            let config = StairConfig::new().with_profile(kind);
            let scene = generator
                .generate_tokens("s3,ll,s2,lr,lr,s2", &RailingState::new(), &NoTextures, &config)
                .unwrap();
            assert_eq!(scene.step_count(), 7, "{:?}", kind);
            assert_eq!(scene.landing_count(), 3, "{:?}", kind);
        }
    }
}
