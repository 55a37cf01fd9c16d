// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material parameter sets handed to the renderer

use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};

/// Identity of a texture source (typically its URL)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub String);

impl TextureHandle {
    pub fn new(id: impl Into<String>) -> Self {
        TextureHandle(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TextureHandle {
    fn from(id: &str) -> Self {
        TextureHandle::new(id)
    }
}

/// Pixel dimensions of a loaded texture image
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    /// Create an image size, rejecting zero dimensions
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ModelError::InvalidImage { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width over height
    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Texture addressing outside [0, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WrapMode {
    #[default]
    ClampToEdge,
    Repeat,
}

/// Color space the texture is sampled in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSpace {
    #[default]
    Srgb,
    Linear,
}

/// UV transform that fits a shared texture onto one face
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceTexture {
    /// UV repeat (negative components mirror the texture)
    pub repeat: [f64; 2],
    /// UV offset
    pub offset: [f64; 2],
    /// Rotation in radians about `center`
    pub rotation: f64,
    /// Rotation pivot in UV space
    pub center: [f64; 2],
    /// Wrapping for both axes
    pub wrap: WrapMode,
    pub color_space: ColorSpace,
    /// Bump scale for the paired bump map, if any
    pub bump_scale: Option<f64>,
}

impl Default for FaceTexture {
    fn default() -> Self {
        Self {
            repeat: [1.0, 1.0],
            offset: [0.0, 0.0],
            rotation: 0.0,
            center: [0.5, 0.5],
            wrap: WrapMode::ClampToEdge,
            color_space: ColorSpace::Srgb,
            bump_scale: None,
        }
    }
}

/// A texture plus the fit for the face it is applied to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureBinding {
    pub handle: TextureHandle,
    pub fit: FaceTexture,
}

/// Which triangle sides are rendered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceSide {
    #[default]
    Front,
    Back,
    Double,
}

/// Depth bias used to keep coplanar surfaces from fighting
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolygonOffset {
    pub factor: f32,
    pub units: f32,
}

/// Material parameters for one mesh
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialParams {
    /// Color map, mutually exclusive with `color` for metal and stone
    pub map: Option<TextureBinding>,
    /// Solid RGB color in [0, 1]
    pub color: Option<[f32; 3]>,
    pub opacity: f32,
    pub transparent: bool,
    pub side: FaceSide,
    pub depth_test: bool,
    pub depth_write: bool,
    pub polygon_offset: Option<PolygonOffset>,
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            map: None,
            color: Some([0.8, 0.8, 0.8]),
            opacity: 1.0,
            transparent: false,
            side: FaceSide::Front,
            depth_test: true,
            depth_write: true,
            polygon_offset: None,
            metalness: 0.0,
            roughness: 0.8,
        }
    }
}

impl MaterialParams {
    /// Opaque solid color material
    pub fn solid(color: [f32; 3]) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    /// Opaque textured material
    pub fn textured(binding: TextureBinding) -> Self {
        Self {
            map: Some(binding),
            color: None,
            ..Self::default()
        }
    }

    /// Set the polygon offset
    pub fn with_polygon_offset(mut self, factor: f32, units: f32) -> Self {
        self.polygon_offset = Some(PolygonOffset { factor, units });
        self
    }

    /// Make the material translucent and double sided
    pub fn translucent(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.transparent = self.opacity < 1.0;
        self.depth_write = !self.transparent;
        self.side = FaceSide::Double;
        self
    }
}

/// Physical material family of a tread or support
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    #[default]
    Wood,
    Metal,
    Stone,
}

/// Surface appearance: a texture map or a flat color, never both
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finish {
    Texture(TextureHandle),
    Solid([f32; 3]),
}

/// A material choice from the configurator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialChoice {
    pub kind: MaterialKind,
    pub finish: Finish,
}

impl MaterialChoice {
    /// Check the kind/finish combination
    ///
    /// Wood is always textured; metal and stone may use either finish.
    pub fn validate(&self) -> Result<()> {
        match (&self.kind, &self.finish) {
            (MaterialKind::Wood, Finish::Solid(_)) => Err(ModelError::material(
                "wood materials require a texture map",
            )),
            (_, Finish::Solid(color)) if color.iter().any(|c| !(0.0..=1.0).contains(c)) => Err(
                ModelError::material(format!("color {:?} outside [0, 1]", color)),
            ),
            _ => Ok(()),
        }
    }

    /// Metalness/roughness pair for the kind
    pub fn surface_response(&self) -> (f32, f32) {
        match self.kind {
            MaterialKind::Wood => (0.0, 0.75),
            MaterialKind::Metal => (0.85, 0.35),
            MaterialKind::Stone => (0.0, 0.55),
        }
    }
}

/// Glass tint for glass railings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlassTone {
    #[default]
    Clear,
    Smoked,
    Bronze,
}

impl GlassTone {
    /// Tint color and opacity
    pub fn appearance(self) -> ([f32; 3], f32) {
        match self {
            GlassTone::Clear => ([0.86, 0.94, 0.96], 0.25),
            GlassTone::Smoked => ([0.32, 0.34, 0.36], 0.45),
            GlassTone::Bronze => ([0.55, 0.42, 0.28], 0.4),
        }
    }
}

/// Finish of metal railings and cables
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetalFinish {
    #[default]
    Black,
    Stainless,
    Brass,
}

impl MetalFinish {
    /// Color and opacity
    pub fn appearance(self) -> ([f32; 3], f32) {
        match self {
            MetalFinish::Black => ([0.08, 0.08, 0.09], 1.0),
            MetalFinish::Stainless => ([0.72, 0.73, 0.75], 1.0),
            MetalFinish::Brass => ([0.71, 0.57, 0.3], 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_size_rejects_zero() {
        assert!(ImageSize::new(0, 10).is_err());
        let size = ImageSize::new(200, 100).unwrap();
        assert_eq!(size.aspect(), 2.0);
    }

    #[test]
    fn test_material_rules() {
        let wood_solid = MaterialChoice {
            kind: MaterialKind::Wood,
            finish: Finish::Solid([0.5, 0.4, 0.3]),
        };
        assert!(wood_solid.validate().is_err());

        let metal_solid = MaterialChoice {
            kind: MaterialKind::Metal,
            finish: Finish::Solid([0.1, 0.1, 0.1]),
        };
        assert!(metal_solid.validate().is_ok());

        let stone_bad = MaterialChoice {
            kind: MaterialKind::Stone,
            finish: Finish::Solid([1.5, 0.1, 0.1]),
        };
        assert!(stone_bad.validate().is_err());
    }

    #[test]
    fn test_translucent() {
        let params = MaterialParams::solid([1.0, 1.0, 1.0]).translucent(0.3);
        assert!(params.transparent);
        assert!(!params.depth_write);
        assert_eq!(params.side, FaceSide::Double);
    }
}
