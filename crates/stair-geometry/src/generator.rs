// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene generator
//!
//! Runs the whole pipeline for one input: layout, frames, profiles, plates,
//! railings and texture fits. Everything is recomputed on every call; only
//! the face-texture cache carries over.

use crate::config::StairConfig;
use crate::frame::resolve_frame;
use crate::layout::TreadLayout;
use crate::plates::{build_plates, PlateParams, PlateSide};
use crate::profile::{ProfileBuilder, ProfileContext, ProfileKind, ProfileRegistry};
use crate::railing::{build_railings, RailingParams};
use crate::texture::{FaceTextureCache, FaceTextureRequest};
use crate::Result;
use log::{debug, warn};
use stair_model::{
    default_sides, Finish, MaterialChoice, MaterialParams, PartRole, PathSegment, Placement,
    RailingState, SceneNode, ScenePart, StairScene, TextureBinding, TextureHandle,
    TextureProvider, TreadMarker,
};
use stair_path::{decode_or_default, DEFAULT_FLIGHT_STEPS};
use std::sync::Arc;

/// Depth bias of landing plates against the connector plates they touch
const LANDING_PLATE_OFFSET: (f32, f32) = (-1.0, -1.0);

/// Stair scene generator
///
/// Holds the profile registry and the face-texture cache. The cache uses
/// interior mutability, so a generator is used from one thread at a time.
pub struct StairGenerator {
    profiles: ProfileRegistry,
    cache: FaceTextureCache,
}

impl StairGenerator {
    /// Create a generator with every built-in profile
    pub fn new() -> Self {
        Self::with_registry(ProfileRegistry::with_default_builders())
    }

    /// Create a generator with a custom profile registry
    pub fn with_registry(profiles: ProfileRegistry) -> Self {
        Self {
            profiles,
            cache: FaceTextureCache::new(),
        }
    }

    /// Register or replace a profile builder
    pub fn register_profile(&mut self, builder: Arc<dyn ProfileBuilder>) {
        self.profiles.register(builder);
    }

    pub fn texture_cache(&self) -> &FaceTextureCache {
        &self.cache
    }

    /// Generate the scene for a path
    ///
    /// A path that lays out no treads is replaced by the default straight
    /// flight. The only errors are configuration errors; treads, plates and
    /// panels that fail to build are left out and reported in
    /// [`StairScene::warnings`].
    pub fn generate(
        &self,
        path: &[PathSegment],
        railing: &RailingState,
        textures: &dyn TextureProvider,
        config: &StairConfig,
    ) -> Result<StairScene> {
        generate_with(&self.profiles, &self.cache, path, railing, textures, config)
    }

    /// Generate the scene for a path token string
    pub fn generate_tokens(
        &self,
        tokens: &str,
        railing: &RailingState,
        textures: &dyn TextureProvider,
        config: &StairConfig,
    ) -> Result<StairScene> {
        self.generate(&decode_or_default(tokens), railing, textures, config)
    }
}

impl Default for StairGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a scene with the built-in profiles and an injected texture cache
pub fn compute_scene(
    path: &[PathSegment],
    railing: &RailingState,
    textures: &dyn TextureProvider,
    config: &StairConfig,
    cache: &FaceTextureCache,
) -> Result<StairScene> {
    let profiles = ProfileRegistry::with_default_builders();
    generate_with(&profiles, cache, path, railing, textures, config)
}

/// Material for a choice, fitting its texture to a face
fn material_for(
    choice: &MaterialChoice,
    request: &FaceTextureRequest,
    textures: &dyn TextureProvider,
    cache: &FaceTextureCache,
) -> MaterialParams {
    let mut material = match &choice.finish {
        Finish::Texture(handle) => {
            let bound = textures.resolve(handle);
            let fit = cache.get_or_fit(&bound, request, textures);
            MaterialParams::textured(TextureBinding { handle: bound, fit })
        }
        Finish::Solid(color) => MaterialParams::solid(*color),
    };
    let (metalness, roughness) = choice.surface_response();
    material.metalness = metalness;
    material.roughness = roughness;
    material
}

fn side_name(side: PlateSide) -> &'static str {
    match side {
        PlateSide::Inner => "inner",
        PlateSide::Outer => "outer",
    }
}

fn generate_with(
    profiles: &ProfileRegistry,
    cache: &FaceTextureCache,
    path: &[PathSegment],
    railing: &RailingState,
    textures: &dyn TextureProvider,
    config: &StairConfig,
) -> Result<StairScene> {
    config.validate()?;

    let mut warnings = Vec::new();
    let dims = &config.dimensions;
    let mut layout = TreadLayout::compute(path, dims);
    if layout.is_empty() {
        let message = format!("Path has no treads, using s{}", DEFAULT_FLIGHT_STEPS);
        warn!("{}", message);
        warnings.push(message);
        layout = TreadLayout::compute(&[PathSegment::straight(DEFAULT_FLIGHT_STEPS)], dims);
    }

    let materials = &config.materials;
    let mut handles: Vec<&TextureHandle> = [&materials.surface, &materials.structure, &materials.plate]
        .into_iter()
        .filter_map(|choice| match &choice.finish {
            Finish::Texture(handle) => Some(handle),
            Finish::Solid(_) => None,
        })
        .collect();
    handles.sort();
    handles.dedup();
    for handle in handles {
        if !textures.contains(handle) {
            warnings.push(format!("Texture '{}' is not available", handle.as_str()));
        }
    }

    let sides = default_sides(layout.treads());
    let tread_thickness = config.profile.tread_thickness();

    let mut nodes = Vec::with_capacity(layout.len() + 8);
    let mut markers = Vec::new();

    // Treads
    let builder = profiles.get(config.profile.kind)?;
    let ctx = ProfileContext {
        dims,
        profile: &config.profile,
        textures: &config.textures,
    };
    for (i, tread) in layout.treads().iter().enumerate() {
        let frame = resolve_frame(tread, sides[i].is_right());
        let mesh = match builder.build(tread, &frame, &ctx) {
            Ok(mesh) => mesh,
            Err(err) => {
                let message = format!("Tread {} skipped: {}", i, err);
                warn!("{}", message);
                warnings.push(message);
                continue;
            }
        };

        let mut node = SceneNode::new(format!("tread-{}", i), tread.placement());
        for face in mesh.faces {
            let choice = match face.role {
                PartRole::WalkingSurface => &materials.surface,
                _ => &materials.structure,
            };
            let material = material_for(choice, &face.request, textures, cache);
            node.parts
                .push(ScenePart::face(face.role, face.face, face.mesh, material));
        }
        markers.extend(mesh.markers.into_iter().map(|(label, local)| TreadMarker {
            tread: i,
            label,
            position: tread.to_world(&local),
        }));
        nodes.push(node);
    }

    // Connector and landing plates
    if config.profile.kind == ProfileKind::HiTech {
        let params = PlateParams {
            dims,
            tread_thickness,
            plates: &config.plates,
        };
        let plates = build_plates(&layout, &sides, &params);
        warnings.extend(plates.warnings);

        for plate in plates.connectors {
            let length = match (plate.rails.first(), plate.rails.last()) {
                (Some(first), Some(last)) => (last.0 - first.0).norm(),
                _ => 0.0,
            };
            let request = FaceTextureRequest {
                tile_scale: config.textures.tile_scale,
                color_space: config.textures.color_space,
                bump_scale: config.textures.bump_scale,
                ..FaceTextureRequest::new(length, params.band_height())
            };
            let material = material_for(&materials.plate, &request, textures, cache);
            let mut node = SceneNode::new(
                format!("plate-{}-{}", plate.run, side_name(plate.side)),
                Placement::identity(),
            );
            node.parts
                .push(ScenePart::new(PartRole::ConnectorPlate, plate.mesh, material));
            nodes.push(node);
        }

        for landing in plates.landings {
            let request = FaceTextureRequest {
                tile_scale: config.textures.tile_scale,
                color_space: config.textures.color_space,
                bump_scale: config.textures.bump_scale,
                ..FaceTextureRequest::new(dims.tread_width, params.band_height())
            };
            let (factor, units) = LANDING_PLATE_OFFSET;
            let material = material_for(&materials.plate, &request, textures, cache)
                .with_polygon_offset(factor, units);
            let mut node = SceneNode::new(
                format!("landing-plate-{}", landing.landing),
                Placement::identity(),
            );
            node.parts
                .push(ScenePart::new(PartRole::LandingPlate, landing.mesh, material));
            nodes.push(node);
        }
    }

    // Railings
    let params = RailingParams {
        dims,
        tread_thickness,
        railing: &config.railing,
    };
    let geometry = build_railings(layout.treads(), railing, &params);
    warnings.extend(geometry.warnings.iter().cloned());
    if !geometry.is_empty() {
        let material = geometry.material.clone().unwrap_or_default();
        let mut node = SceneNode::new("railing", Placement::identity());
        for panel in geometry.panels {
            node.parts.push(ScenePart::new(
                PartRole::RailingPanel,
                panel.mesh,
                material.clone(),
            ));
        }
        for cable in geometry.cables {
            node.parts
                .push(ScenePart::new(PartRole::Cable, cable.mesh, material.clone()));
        }
        nodes.push(node);
    }

    let scene = StairScene {
        treads: layout.into_treads(),
        nodes,
        markers,
        warnings,
    };
    debug!(
        "Generated {} nodes, {} triangles, {} warnings",
        scene.nodes.len(),
        scene.triangle_count(),
        scene.warnings.len()
    );
    Ok(scene)
}
