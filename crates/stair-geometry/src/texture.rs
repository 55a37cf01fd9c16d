// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face texture fitting
//!
//! A shared texture is fitted to each face with a cover fit: the visible
//! window of the texture keeps the face's aspect ratio and fills it without
//! margins, cropping the excess. Flips and quarter turns keep the grain
//! direction continuous across rotated neighbor faces.

use log::{debug, warn};
use rustc_hash::FxHashMap;
use stair_model::{
    ColorSpace, FaceTexture, ImageSize, TextureHandle, TextureProvider, WrapMode,
};
use std::cell::RefCell;
use std::f64::consts::FRAC_PI_2;

/// Repeat values above this snap to exactly one
pub const UNITY_SNAP: f64 = 0.995;

/// Face dimensions are keyed at this precision (0.1 mm)
const KEY_PRECISION: f64 = 1e4;

/// Everything about a face that affects its fit
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceTextureRequest {
    pub dim_u: f64,
    pub dim_v: f64,
    /// Quarter turn (grain across the face)
    pub rotate90: bool,
    pub flip_u: bool,
    pub flip_v: bool,
    /// Repeat multiplier applied after the fit
    pub tile_scale: f64,
    pub color_space: ColorSpace,
    pub bump_scale: Option<f64>,
}

impl FaceTextureRequest {
    /// Request for a face of the given size with no flips and unit tiling
    pub fn new(dim_u: f64, dim_v: f64) -> Self {
        Self {
            dim_u,
            dim_v,
            rotate90: false,
            flip_u: false,
            flip_v: false,
            tile_scale: 1.0,
            color_space: ColorSpace::Srgb,
            bump_scale: None,
        }
    }

    pub fn rotated(mut self, rotate90: bool) -> Self {
        self.rotate90 = rotate90;
        self
    }

    pub fn flipped(mut self, flip_u: bool, flip_v: bool) -> Self {
        self.flip_u = flip_u;
        self.flip_v = flip_v;
        self
    }

    pub fn with_tile_scale(mut self, tile_scale: f64) -> Self {
        self.tile_scale = tile_scale;
        self
    }
}

/// Fit a texture onto one face
///
/// `image` is `None` while the texture is still loading; the fit then assumes
/// a square image. `inset` crops a symmetric border (in UV units) from the
/// source.
pub fn fit_face_texture(
    request: &FaceTextureRequest,
    image: Option<ImageSize>,
    inset: f64,
) -> FaceTexture {
    let image_aspect = image.map(|size| size.aspect()).unwrap_or(1.0);
    let tex_aspect = if request.rotate90 {
        1.0 / image_aspect
    } else {
        image_aspect
    };
    let geo_aspect = if request.dim_v > 1e-9 && request.dim_u > 1e-9 {
        request.dim_u / request.dim_v
    } else {
        tex_aspect
    };

    // Cover: the repeat of the axis the face is relatively shorter along shrinks
    let (mut rep_u, mut rep_v) = if geo_aspect > tex_aspect {
        (1.0, tex_aspect / geo_aspect)
    } else {
        (geo_aspect / tex_aspect, 1.0)
    };
    if rep_u > UNITY_SNAP {
        rep_u = 1.0;
    }
    if rep_v > UNITY_SNAP {
        rep_v = 1.0;
    }

    rep_u *= request.tile_scale;
    rep_v *= request.tile_scale;

    // Center the visible window
    let mut off_u = (1.0 - rep_u) / 2.0;
    let mut off_v = (1.0 - rep_v) / 2.0;

    let inset = inset.clamp(0.0, 0.49);
    if inset > 0.0 {
        let keep = 1.0 - 2.0 * inset;
        rep_u *= keep;
        rep_v *= keep;
        off_u = off_u * keep + inset;
        off_v = off_v * keep + inset;
    }

    if request.flip_u {
        off_u += rep_u;
        rep_u = -rep_u;
    }
    if request.flip_v {
        off_v += rep_v;
        rep_v = -rep_v;
    }

    let repeating = request.flip_u
        || request.flip_v
        || rep_u.abs() != 1.0
        || rep_v.abs() != 1.0
        || inset > 0.0;

    FaceTexture {
        repeat: [rep_u, rep_v],
        offset: [off_u, off_v],
        rotation: if request.rotate90 { FRAC_PI_2 } else { 0.0 },
        center: [0.5, 0.5],
        wrap: if repeating {
            WrapMode::Repeat
        } else {
            WrapMode::ClampToEdge
        },
        color_space: request.color_space,
        bump_scale: request.bump_scale,
    }
}

/// Cache key covering every input of [`fit_face_texture`]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FaceTextureKey {
    pub dim_u: i64,
    pub dim_v: i64,
    /// bit 0: rotate90, bit 1: flip u, bit 2: flip v, bit 3: linear color space
    pub flags: u8,
    pub source: TextureHandle,
    pub tile_scale_bits: u64,
    pub bump_bits: Option<u64>,
}

impl FaceTextureKey {
    pub fn new(source: &TextureHandle, request: &FaceTextureRequest) -> Self {
        let mut flags = 0u8;
        if request.rotate90 {
            flags |= 1;
        }
        if request.flip_u {
            flags |= 1 << 1;
        }
        if request.flip_v {
            flags |= 1 << 2;
        }
        if request.color_space == ColorSpace::Linear {
            flags |= 1 << 3;
        }
        Self {
            dim_u: (request.dim_u * KEY_PRECISION).round() as i64,
            dim_v: (request.dim_v * KEY_PRECISION).round() as i64,
            flags,
            source: source.clone(),
            tile_scale_bits: request.tile_scale.to_bits(),
            bump_bits: request.bump_scale.map(f64::to_bits),
        }
    }
}

/// What a source looked like when its entries were cached
#[derive(Clone, Copy, Debug, PartialEq)]
struct SourceState {
    image: Option<ImageSize>,
    inset_bits: u64,
    tile_scale_bits: u64,
}

/// Memoized face fits, cleared wholesale when a source's image or tiling changes
///
/// The cache is the only state kept across generation passes.
#[derive(Debug, Default)]
pub struct FaceTextureCache {
    entries: RefCell<FxHashMap<FaceTextureKey, FaceTexture>>,
    sources: RefCell<FxHashMap<TextureHandle, SourceState>>,
}

impl FaceTextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitted texture for a face, computed on first use
    pub fn get_or_fit(
        &self,
        source: &TextureHandle,
        request: &FaceTextureRequest,
        provider: &dyn TextureProvider,
    ) -> FaceTexture {
        let state = SourceState {
            image: provider.image_size(source),
            inset_bits: provider.inset(source).to_bits(),
            tile_scale_bits: request.tile_scale.to_bits(),
        };
        self.observe(source, state);

        let key = FaceTextureKey::new(source, request);
        if let Some(fit) = self.entries.borrow().get(&key) {
            return *fit;
        }

        if state.image.is_none() {
            debug!("Texture '{}' not loaded, fitting as square", source.as_str());
        }
        let fit = fit_face_texture(request, state.image, f64::from_bits(state.inset_bits));
        self.entries.borrow_mut().insert(key, fit);
        fit
    }

    /// Record a source's state, clearing everything if it changed
    fn observe(&self, source: &TextureHandle, state: SourceState) {
        let mut sources = self.sources.borrow_mut();
        match sources.get(source) {
            Some(previous) if *previous == state => {}
            Some(_) => {
                debug!(
                    "Texture '{}' changed, clearing {} cached fits",
                    source.as_str(),
                    self.entries.borrow().len()
                );
                self.entries.borrow_mut().clear();
                sources.clear();
                sources.insert(source.clone(), state);
            }
            None => {
                sources.insert(source.clone(), state);
            }
        }
    }

    /// Drop every cached fit
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
        self.sources.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct CatalogEntry {
    image: Option<ImageSize>,
    inset: f64,
}

/// In-memory texture registry implementing [`TextureProvider`]
///
/// The host registers sources when it starts loading them and marks them
/// loaded once their pixel size is known.
#[derive(Clone, Debug, Default)]
pub struct TextureCatalog {
    entries: FxHashMap<TextureHandle, CatalogEntry>,
    placeholder: Option<TextureHandle>,
}

impl TextureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source bound in place of unknown or still-loading textures
    pub fn with_placeholder(mut self, placeholder: TextureHandle) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Register a source with its border inset
    pub fn register(&mut self, handle: TextureHandle, inset: f64) {
        let entry = self.entries.entry(handle).or_default();
        entry.inset = inset.clamp(0.0, 0.49);
    }

    /// Record the pixel size of a loaded source, registering it if needed
    pub fn mark_loaded(&mut self, handle: TextureHandle, size: ImageSize) {
        self.entries.entry(handle).or_default().image = Some(size);
    }

    pub fn is_loaded(&self, handle: &TextureHandle) -> bool {
        self.entries
            .get(handle)
            .is_some_and(|entry| entry.image.is_some())
    }
}

impl TextureProvider for TextureCatalog {
    /// Loaded sources bind as themselves; anything else binds the placeholder
    /// when one is configured.
    fn resolve(&self, handle: &TextureHandle) -> TextureHandle {
        if self.is_loaded(handle) {
            return handle.clone();
        }
        if !self.entries.contains_key(handle) {
            warn!("Unknown texture '{}'", handle.as_str());
        }
        match &self.placeholder {
            Some(placeholder) => placeholder.clone(),
            None => handle.clone(),
        }
    }

    fn image_size(&self, handle: &TextureHandle) -> Option<ImageSize> {
        self.entries.get(handle).and_then(|entry| entry.image)
    }

    fn inset(&self, handle: &TextureHandle) -> f64 {
        self.entries.get(handle).map_or(0.0, |entry| entry.inset)
    }

    fn contains(&self, handle: &TextureHandle) -> bool {
        self.entries.contains_key(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn size(w: u32, h: u32) -> Option<ImageSize> {
        Some(ImageSize::new(w, h).unwrap())
    }

    #[test]
    fn test_cover_property() {
        let dims = [(0.28, 1.0), (1.0, 0.28), (1.0, 1.0), (0.08, 1.0), (2.5, 0.3), (0.01, 0.02)];
        let images = [(1024, 1024), (2048, 512), (300, 1200), (640, 480)];
        for &(dim_u, dim_v) in &dims {
            for &(w, h) in &images {
                for rotate in [false, true] {
                    let request = FaceTextureRequest::new(dim_u, dim_v).rotated(rotate);
                    let fit = fit_face_texture(&request, size(w, h), 0.0);
                    let [u, v] = fit.repeat;
                    assert!(u <= 1.0 && v <= 1.0, "{:?} for {:?}", fit.repeat, (dim_u, dim_v, w, h));
                    assert!(u == 1.0 || v == 1.0);
                    assert!(u > 0.0 && v > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_cover_keeps_face_aspect() {
        // Visible texture window in pixels has the face's aspect ratio
        let request = FaceTextureRequest::new(2.0, 0.5);
        let fit = fit_face_texture(&request, size(1000, 500), 0.0);
        let window = (fit.repeat[0] * 1000.0) / (fit.repeat[1] * 500.0);
        assert_relative_eq!(window, 4.0, epsilon = 1e-9);
        assert_relative_eq!(fit.offset[1], (1.0 - fit.repeat[1]) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_near_unity_snaps() {
        let request = FaceTextureRequest::new(1.0, 1.003);
        let fit = fit_face_texture(&request, size(512, 512), 0.0);
        assert_eq!(fit.repeat, [1.0, 1.0]);
        assert_eq!(fit.wrap, WrapMode::ClampToEdge);
    }

    #[test]
    fn test_missing_image_is_square() {
        let request = FaceTextureRequest::new(1.0, 0.5);
        let fit = fit_face_texture(&request, None, 0.0);
        assert_eq!(fit.repeat, [1.0, 0.5]);
        assert_eq!(fit.wrap, WrapMode::Repeat);
    }

    #[test]
    fn test_flip_mirrors_window() {
        let request = FaceTextureRequest::new(1.0, 0.5).flipped(true, true);
        let fit = fit_face_texture(&request, size(512, 512), 0.0);
        assert_eq!(fit.repeat, [-1.0, -0.5]);
        assert_relative_eq!(fit.offset[0], 1.0, epsilon = 1e-12);
        // Window [0.25, 0.75] mirrored: starts at 0.75
        assert_relative_eq!(fit.offset[1], 0.75, epsilon = 1e-12);
        assert_eq!(fit.wrap, WrapMode::Repeat);
    }

    #[test]
    fn test_inset_and_rotation() {
        let request = FaceTextureRequest::new(1.0, 1.0).rotated(true);
        let fit = fit_face_texture(&request, size(512, 512), 0.05);
        assert_relative_eq!(fit.repeat[0], 0.9, epsilon = 1e-12);
        assert_relative_eq!(fit.offset[0], 0.05, epsilon = 1e-12);
        assert_relative_eq!(fit.rotation, FRAC_PI_2);
        assert_eq!(fit.center, [0.5, 0.5]);
        assert_eq!(fit.wrap, WrapMode::Repeat);
    }

    #[test]
    fn test_tile_scale() {
        let request = FaceTextureRequest::new(1.0, 1.0).with_tile_scale(2.0);
        let fit = fit_face_texture(&request, size(256, 256), 0.0);
        assert_eq!(fit.repeat, [2.0, 2.0]);
        assert_relative_eq!(fit.offset[0], -0.5);
        assert_eq!(fit.wrap, WrapMode::Repeat);
    }

    #[test]
    fn test_key_rounds_dimensions() {
        let source = TextureHandle::new("oak");
        let a = FaceTextureKey::new(&source, &FaceTextureRequest::new(0.28, 1.0));
        let b = FaceTextureKey::new(&source, &FaceTextureRequest::new(0.280_000_01, 1.0));
        let c = FaceTextureKey::new(&source, &FaceTextureRequest::new(0.28, 1.0).rotated(true));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_cache_invalidation() {
        let oak = TextureHandle::new("oak");
        let mut catalog = TextureCatalog::new();
        catalog.register(oak.clone(), 0.0);

        let cache = FaceTextureCache::new();
        let request = FaceTextureRequest::new(1.0, 0.5);

        // Not loaded yet: square fallback
        let before = cache.get_or_fit(&oak, &request, &catalog);
        assert_eq!(before.repeat, [1.0, 0.5]);
        assert_eq!(cache.len(), 1);

        // Same inputs hit the cache
        cache.get_or_fit(&oak, &request, &catalog);
        cache.get_or_fit(&oak, &FaceTextureRequest::new(0.5, 0.5), &catalog);
        assert_eq!(cache.len(), 2);

        // Image loads: everything is recomputed
        catalog.mark_loaded(oak.clone(), ImageSize::new(400, 100).unwrap());
        let after = cache.get_or_fit(&oak, &request, &catalog);
        assert_eq!(cache.len(), 1);
        assert_ne!(after, before);

        // Tile scale change clears again
        cache.get_or_fit(&oak, &request, &catalog);
        cache.get_or_fit(&oak, &request.with_tile_scale(2.0), &catalog);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_catalog_placeholder() {
        let placeholder = TextureHandle::new("placeholder");
        let walnut = TextureHandle::new("walnut");
        let mut catalog = TextureCatalog::new().with_placeholder(placeholder.clone());
        catalog.mark_loaded(placeholder.clone(), ImageSize::new(64, 64).unwrap());

        assert_eq!(catalog.resolve(&walnut), placeholder);
        catalog.register(walnut.clone(), 0.02);
        assert_eq!(catalog.resolve(&walnut), placeholder);
        catalog.mark_loaded(walnut.clone(), ImageSize::new(800, 600).unwrap());
        assert_eq!(catalog.resolve(&walnut), walnut);
        assert_relative_eq!(catalog.inset(&walnut), 0.02);
    }
}
