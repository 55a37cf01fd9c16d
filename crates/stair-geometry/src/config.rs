// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generator configuration
//!
//! Every section deserializes with defaults for missing fields, so a
//! configurator can send only what the user changed:
//!
//! ```ignore
//! let config = StairConfig::from_json(r#"{"profile": {"kind": "Wedge"}}"#)?;
//! assert_eq!(config.dimensions.riser, 0.18);
//! ```

use crate::error::{Error, Result};
use crate::profile::ProfileKind;
use crate::railing::RailingKind;
use serde::{Deserialize, Serialize};
use stair_model::{
    ColorSpace, Finish, GlassTone, MaterialChoice, MaterialKind, MetalFinish, TextureHandle,
};

/// Global tread dimensions in meters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    /// Span perpendicular to travel; also the landing side length
    pub tread_width: f64,
    /// Run of one step
    pub tread_depth: f64,
    /// Rise per tread
    pub riser: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            tread_width: 1.0,
            tread_depth: 0.28,
            riser: 0.18,
        }
    }
}

impl Dimensions {
    /// Rise over run of a step
    #[inline]
    pub fn slope(&self) -> f64 {
        self.riser / self.tread_depth
    }
}

/// Cross-section profile parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub kind: ProfileKind,
    /// Thickness of thick, wedge and ridge treads
    pub thickness: f64,
    pub thin_thickness: f64,
    /// Walking plate thickness of hi-tech treads
    pub hi_tech_thickness: f64,
    /// Thickness of the walking-surface slab on top of the structural box
    pub surface_thickness: f64,
    /// Gap between coplanar neighbor faces
    pub seam_epsilon: f64,
    /// Front thickness of a wedge as a fraction of the full thickness
    pub wedge_front_fraction: f64,
    /// Depth of the ridge point below the walking surface
    pub ridge_depth: f64,
    /// Offset of the ridge point toward the inner side
    pub ridge_lateral: f64,
    /// Emit labeled corner markers for hi-tech treads
    pub markers: bool,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            kind: ProfileKind::Thick,
            thickness: 0.08,
            thin_thickness: 0.04,
            hi_tech_thickness: 0.02,
            surface_thickness: 0.01,
            seam_epsilon: 0.001,
            wedge_front_fraction: 0.4,
            ridge_depth: 0.11,
            ridge_lateral: 0.15,
            markers: false,
        }
    }
}

impl ProfileConfig {
    /// Slab thickness of the selected profile
    pub fn tread_thickness(&self) -> f64 {
        self.thickness_for(self.kind)
    }

    /// Slab thickness of any profile
    pub fn thickness_for(&self, kind: ProfileKind) -> f64 {
        match kind {
            ProfileKind::Thin => self.thin_thickness,
            ProfileKind::HiTech => self.hi_tech_thickness,
            ProfileKind::Thick | ProfileKind::Wedge | ProfileKind::Ridge => self.thickness,
        }
    }
}

/// Hi-tech connector plate parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateConfig {
    /// Vertical clearance between rails and tread surfaces
    pub gap: f64,
    /// Extrusion depth along the plate normal
    pub thickness: f64,
    /// Second secant start point, ahead of the first along the travel direction
    pub secant_bracket: f64,
    pub secant_max_iterations: usize,
    /// Accepted width mismatch in meters
    pub secant_tolerance: f64,
    /// Emit bands along exposed landing edges
    pub landing_plates: bool,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self {
            gap: 0.03,
            thickness: 0.012,
            secant_bracket: 0.05,
            secant_max_iterations: 8,
            secant_tolerance: 1e-4,
            landing_plates: true,
        }
    }
}

/// Railing parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RailingConfig {
    pub kind: RailingKind,
    pub glass_tone: GlassTone,
    pub metal_finish: MetalFinish,
    /// Height above the tread top
    pub height: f64,
    /// Lateral distance outside the tread edge
    pub panel_offset: f64,
    /// Extension below the tread bottom
    pub panel_overlap: f64,
    /// Spacing of the three cables on a step
    pub cable_pitch: f64,
    pub cable_radius: f64,
    pub cables_per_landing: usize,
    /// Distance of the outermost landing cables from the landing edges
    pub cable_landing_margin: f64,
    /// Shared cable top; defaults to the highest tread top plus `height`
    pub cable_top: Option<f64>,
}

impl Default for RailingConfig {
    fn default() -> Self {
        Self {
            kind: RailingKind::Glass,
            glass_tone: GlassTone::Clear,
            metal_finish: MetalFinish::Black,
            height: 0.9,
            panel_offset: 0.02,
            panel_overlap: 0.05,
            cable_pitch: 0.10,
            cable_radius: 0.004,
            cables_per_landing: 9,
            cable_landing_margin: 0.05,
            cable_top: None,
        }
    }
}

/// Material selections
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    /// Walking surface (color material)
    pub surface: MaterialChoice,
    /// Structural box below the walking surface
    pub structure: MaterialChoice,
    /// Hi-tech connector and landing plates
    pub plate: MaterialChoice,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            surface: MaterialChoice {
                kind: MaterialKind::Wood,
                finish: Finish::Texture(TextureHandle::new("oak")),
            },
            structure: MaterialChoice {
                kind: MaterialKind::Wood,
                finish: Finish::Texture(TextureHandle::new("oak")),
            },
            plate: MaterialChoice {
                kind: MaterialKind::Metal,
                finish: Finish::Solid([0.1, 0.1, 0.11]),
            },
        }
    }
}

/// Texture tiling parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Repeat multiplier applied after the cover fit
    pub tile_scale: f64,
    /// Bump scale override for paired bump maps
    pub bump_scale: Option<f64>,
    pub color_space: ColorSpace,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            tile_scale: 1.0,
            bump_scale: None,
            color_space: ColorSpace::Srgb,
        }
    }
}

/// Complete generator configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StairConfig {
    pub dimensions: Dimensions,
    pub profile: ProfileConfig,
    pub plates: PlateConfig,
    pub railing: RailingConfig,
    pub materials: MaterialConfig,
    pub textures: TextureConfig,
}

impl StairConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Set the cross-section profile
    pub fn with_profile(mut self, kind: ProfileKind) -> Self {
        self.profile.kind = kind;
        self
    }

    /// Set the tread dimensions
    pub fn with_dimensions(mut self, tread_width: f64, tread_depth: f64, riser: f64) -> Self {
        self.dimensions = Dimensions {
            tread_width,
            tread_depth,
            riser,
        };
        self
    }

    /// Set the railing kind
    pub fn with_railing(mut self, kind: RailingKind) -> Self {
        self.railing.kind = kind;
        self
    }

    /// Set the texture tile scale
    pub fn with_tile_scale(mut self, tile_scale: f64) -> Self {
        self.textures.tile_scale = tile_scale;
        self
    }

    /// Set the secant bracket and iteration cap of plate width matching
    pub fn with_secant(mut self, bracket: f64, max_iterations: usize) -> Self {
        self.plates.secant_bracket = bracket;
        self.plates.secant_max_iterations = max_iterations;
        self
    }

    /// Set the materials
    pub fn with_materials(mut self, materials: MaterialConfig) -> Self {
        self.materials = materials;
        self
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        let dims = &self.dimensions;
        positive("dimensions.tread_width", dims.tread_width)?;
        positive("dimensions.tread_depth", dims.tread_depth)?;
        positive("dimensions.riser", dims.riser)?;

        let profile = &self.profile;
        positive("profile.thickness", profile.thickness)?;
        positive("profile.thin_thickness", profile.thin_thickness)?;
        positive("profile.hi_tech_thickness", profile.hi_tech_thickness)?;
        positive("profile.surface_thickness", profile.surface_thickness)?;
        non_negative("profile.seam_epsilon", profile.seam_epsilon)?;
        positive("profile.ridge_depth", profile.ridge_depth)?;
        non_negative("profile.ridge_lateral", profile.ridge_lateral)?;
        if !(profile.wedge_front_fraction > 0.0 && profile.wedge_front_fraction <= 1.0) {
            return Err(Error::config(format!(
                "profile.wedge_front_fraction must be in (0, 1], got {}",
                profile.wedge_front_fraction
            )));
        }
        if profile.kind != ProfileKind::HiTech {
            let body = profile.tread_thickness() - profile.surface_thickness - profile.seam_epsilon;
            if body <= 0.0 {
                return Err(Error::config(format!(
                    "profile thickness {} leaves no room below a {} surface slab",
                    profile.tread_thickness(),
                    profile.surface_thickness
                )));
            }
        }
        if profile.kind == ProfileKind::Wedge
            && profile.wedge_front_fraction * profile.thickness
                <= profile.surface_thickness + profile.seam_epsilon
        {
            return Err(Error::config(
                "wedge front is thinner than the walking-surface slab",
            ));
        }
        if profile.ridge_lateral >= dims.tread_width / 2.0 {
            return Err(Error::config("profile.ridge_lateral must stay inside the tread"));
        }

        let plates = &self.plates;
        non_negative("plates.gap", plates.gap)?;
        positive("plates.thickness", plates.thickness)?;
        positive("plates.secant_tolerance", plates.secant_tolerance)?;
        if plates.secant_bracket == 0.0 || !plates.secant_bracket.is_finite() {
            return Err(Error::config("plates.secant_bracket must be finite and non-zero"));
        }

        let railing = &self.railing;
        positive("railing.height", railing.height)?;
        non_negative("railing.panel_offset", railing.panel_offset)?;
        non_negative("railing.panel_overlap", railing.panel_overlap)?;
        positive("railing.cable_pitch", railing.cable_pitch)?;
        positive("railing.cable_radius", railing.cable_radius)?;
        if railing.cables_per_landing < 2 {
            return Err(Error::config("railing.cables_per_landing must be at least 2"));
        }
        if 2.0 * railing.cable_landing_margin >= dims.tread_width {
            return Err(Error::config("railing.cable_landing_margin leaves no landing span"));
        }

        positive("textures.tile_scale", self.textures.tile_scale)?;

        self.materials.surface.validate()?;
        self.materials.structure.validate()?;
        self.materials.plate.validate()?;
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::config(format!("{} must be positive, got {}", name, value)))
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::config(format!(
            "{} must be non-negative, got {}",
            name, value
        )))
    }
}
