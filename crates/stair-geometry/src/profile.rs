// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cross-section profile builders
//!
//! Each builder turns one tread and its resolved [`LocalFrame`] into per-face
//! meshes in the tread's local space (x along the run, y up, z across). The
//! tread occupies `y` in `[-T/2, T/2]`. Except for hi-tech treads, a thin
//! walking-surface slab forms the top of that range and the structural body
//! sits below it, separated by the seam epsilon.

use crate::config::{Dimensions, ProfileConfig, TextureConfig};
use crate::frame::LocalFrame;
use crate::mesh::{FaceExtent, MeshBuilder};
use crate::texture::FaceTextureRequest;
use crate::{Error, Result};
use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use stair_model::{MeshData, PartRole, Tread, TreadFace};
use std::sync::Arc;

/// Cross-section profile family
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileKind {
    #[default]
    Thick,
    Thin,
    /// Tapered front edge
    Wedge,
    /// Folded underside meeting at one ridge point
    Ridge,
    /// Walking plate carried by connector plates
    HiTech,
}

/// Inputs shared by every tread of one generation pass
#[derive(Clone, Copy, Debug)]
pub struct ProfileContext<'a> {
    pub dims: &'a Dimensions,
    pub profile: &'a ProfileConfig,
    pub textures: &'a TextureConfig,
}

/// One face of a tread with its texture-fit request
#[derive(Clone, Debug, PartialEq)]
pub struct FaceMesh {
    pub face: TreadFace,
    pub role: PartRole,
    pub mesh: MeshData,
    pub request: FaceTextureRequest,
}

/// All faces of one tread, in the tread's local space
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreadMesh {
    pub faces: Vec<FaceMesh>,
    /// Labeled corners in local space
    pub markers: Vec<(String, Point3<f64>)>,
}

impl TreadMesh {
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.mesh.triangle_count()).sum()
    }

    /// Faces with a given role
    pub fn faces_with_role(&self, role: PartRole) -> impl Iterator<Item = &FaceMesh> {
        self.faces.iter().filter(move |f| f.role == role)
    }

    /// Face of a role, if emitted
    pub fn face(&self, role: PartRole, face: TreadFace) -> Option<&FaceMesh> {
        self.faces.iter().find(|f| f.role == role && f.face == face)
    }
}

/// Builds the faces of one tread for a profile
pub trait ProfileBuilder: Send + Sync {
    /// Profile this builder produces
    fn kind(&self) -> ProfileKind;

    /// Build the faces of `tread`
    fn build(&self, tread: &Tread, frame: &LocalFrame, ctx: &ProfileContext) -> Result<TreadMesh>;
}

// ============================================================================
// Solid corners
// ============================================================================

/// Eight corners of a tread solid, indexed `[inner, outer]`
#[derive(Clone, Copy, Debug)]
struct Corners {
    front_top: [Point3<f64>; 2],
    front_bottom: [Point3<f64>; 2],
    back_top: [Point3<f64>; 2],
    back_bottom: [Point3<f64>; 2],
}

impl Corners {
    /// Corners of a solid spanning the tread footprint
    ///
    /// The bottom may slope: `front_bottom_y` and `back_bottom_y` are the
    /// bottom heights at the front and back faces.
    fn new(
        frame: &LocalFrame,
        run: f64,
        width: f64,
        top_y: f64,
        front_bottom_y: f64,
        back_bottom_y: f64,
    ) -> Self {
        let xf = frame.front_x(run);
        let xb = frame.back_x(run);
        let zi = frame.inner_z(width / 2.0);
        let zo = -zi;
        Self {
            front_top: [Point3::new(xf, top_y, zi), Point3::new(xf, top_y, zo)],
            front_bottom: [
                Point3::new(xf, front_bottom_y, zi),
                Point3::new(xf, front_bottom_y, zo),
            ],
            back_top: [Point3::new(xb, top_y, zi), Point3::new(xb, top_y, zo)],
            back_bottom: [
                Point3::new(xb, back_bottom_y, zi),
                Point3::new(xb, back_bottom_y, zo),
            ],
        }
    }

    /// Outline of a face, in walking order around the face
    fn face(&self, face: TreadFace) -> [Point3<f64>; 4] {
        let (i, o) = (0, 1);
        match face {
            TreadFace::Top => [self.front_top[i], self.front_top[o], self.back_top[o], self.back_top[i]],
            TreadFace::Bottom => [
                self.front_bottom[i],
                self.front_bottom[o],
                self.back_bottom[o],
                self.back_bottom[i],
            ],
            TreadFace::Front => [
                self.front_top[i],
                self.front_top[o],
                self.front_bottom[o],
                self.front_bottom[i],
            ],
            TreadFace::Back => [
                self.back_top[i],
                self.back_top[o],
                self.back_bottom[o],
                self.back_bottom[i],
            ],
            TreadFace::Inner => [
                self.front_top[i],
                self.back_top[i],
                self.back_bottom[i],
                self.front_bottom[i],
            ],
            TreadFace::Outer => [
                self.front_top[o],
                self.back_top[o],
                self.back_bottom[o],
                self.front_bottom[o],
            ],
        }
    }
}

/// Outward direction of a face in local space
fn outward(face: TreadFace, frame: &LocalFrame) -> Vector3<f64> {
    match face {
        TreadFace::Top => Vector3::y(),
        TreadFace::Bottom => -Vector3::y(),
        TreadFace::Front => Vector3::new(-frame.along, 0.0, 0.0),
        TreadFace::Back => Vector3::new(frame.along, 0.0, 0.0),
        TreadFace::Inner => Vector3::new(0.0, 0.0, frame.inner_sign_local),
        TreadFace::Outer => Vector3::new(0.0, 0.0, -frame.inner_sign_local),
    }
}

/// Direction the texture U axis follows on a face
fn u_axis(face: TreadFace) -> Vector3<f64> {
    match face {
        TreadFace::Front | TreadFace::Back => Vector3::z(),
        _ => Vector3::x(),
    }
}

/// Texture-fit request for a face, oriented by the frame
fn face_request(
    face: TreadFace,
    extent: &FaceExtent,
    frame: &LocalFrame,
    textures: &TextureConfig,
) -> FaceTextureRequest {
    let (flip_u, flip_v) = match face {
        TreadFace::Top | TreadFace::Bottom => (false, frame.flip_sides),
        TreadFace::Front | TreadFace::Back => (frame.flip_front_back, false),
        TreadFace::Inner | TreadFace::Outer => (frame.flip_sides, false),
    };
    FaceTextureRequest {
        dim_u: extent.dim_u,
        dim_v: extent.dim_v,
        rotate90: match face {
            TreadFace::Top | TreadFace::Bottom => frame.rotate_top,
            TreadFace::Front | TreadFace::Back => frame.rotate_front_back,
            TreadFace::Inner | TreadFace::Outer => frame.rotate_sides,
        },
        flip_u,
        flip_v,
        tile_scale: textures.tile_scale,
        color_space: textures.color_space,
        bump_scale: textures.bump_scale,
    }
}

/// Emit the faces of a solid, pushing front and back out by `seam`
fn emit_solid(
    out: &mut TreadMesh,
    role: PartRole,
    corners: &Corners,
    faces: &[TreadFace],
    frame: &LocalFrame,
    ctx: &ProfileContext,
) -> Result<()> {
    let seam = ctx.profile.seam_epsilon;
    for &face in faces {
        let out_dir = outward(face, frame);
        let mut points = corners.face(face);
        if matches!(face, TreadFace::Front | TreadFace::Back) {
            for p in points.iter_mut() {
                *p += out_dir * seam;
            }
        }

        let mut builder = MeshBuilder::with_capacity(4, 2);
        let extent = builder.add_face(&points, &out_dir, &u_axis(face))?;
        out.faces.push(FaceMesh {
            face,
            role,
            mesh: builder.build(),
            request: face_request(face, &extent, frame, ctx.textures),
        });
    }
    Ok(())
}

/// Walking-surface slab on top of the structural body; returns the body top
fn emit_surface_slab(
    out: &mut TreadMesh,
    tread: &Tread,
    frame: &LocalFrame,
    ctx: &ProfileContext,
    thickness: f64,
) -> Result<f64> {
    let top = thickness / 2.0;
    let bottom = top - ctx.profile.surface_thickness;
    let corners = Corners::new(frame, tread.run, ctx.dims.tread_width, top, bottom, bottom);
    emit_solid(out, PartRole::WalkingSurface, &corners, &TreadFace::ALL, frame, ctx)?;
    Ok(bottom - ctx.profile.seam_epsilon)
}

// ============================================================================
// Builders
// ============================================================================

/// Plain box profile (thick or thin)
pub struct RectangularProfile {
    kind: ProfileKind,
}

impl RectangularProfile {
    pub fn thick() -> Self {
        Self {
            kind: ProfileKind::Thick,
        }
    }

    pub fn thin() -> Self {
        Self {
            kind: ProfileKind::Thin,
        }
    }
}

impl ProfileBuilder for RectangularProfile {
    fn kind(&self) -> ProfileKind {
        self.kind
    }

    fn build(&self, tread: &Tread, frame: &LocalFrame, ctx: &ProfileContext) -> Result<TreadMesh> {
        let thickness = ctx.profile.thickness_for(self.kind);
        let mut out = TreadMesh::default();
        let body_top = emit_surface_slab(&mut out, tread, frame, ctx, thickness)?;
        let bottom = -thickness / 2.0;
        let corners = Corners::new(frame, tread.run, ctx.dims.tread_width, body_top, bottom, bottom);
        emit_solid(&mut out, PartRole::Structure, &corners, &TreadFace::ALL, frame, ctx)?;
        Ok(out)
    }
}

/// Box with a tapered front edge
pub struct WedgeProfile;

impl ProfileBuilder for WedgeProfile {
    fn kind(&self) -> ProfileKind {
        ProfileKind::Wedge
    }

    fn build(&self, tread: &Tread, frame: &LocalFrame, ctx: &ProfileContext) -> Result<TreadMesh> {
        let thickness = ctx.profile.thickness_for(ProfileKind::Wedge);
        let mut out = TreadMesh::default();
        let body_top = emit_surface_slab(&mut out, tread, frame, ctx, thickness)?;

        let front_bottom = thickness / 2.0 - ctx.profile.wedge_front_fraction * thickness;
        if front_bottom >= body_top {
            return Err(Error::profile(format!(
                "wedge front thickness {} leaves no body below the surface slab",
                ctx.profile.wedge_front_fraction * thickness
            )));
        }
        let corners = Corners::new(
            frame,
            tread.run,
            ctx.dims.tread_width,
            body_top,
            front_bottom,
            -thickness / 2.0,
        );
        emit_solid(&mut out, PartRole::Structure, &corners, &TreadFace::ALL, frame, ctx)?;
        Ok(out)
    }
}

/// Box whose underside folds into four triangles meeting at a ridge point
pub struct RidgeProfile;

impl RidgeProfile {
    /// Ridge point in local space
    pub fn ridge_point(frame: &LocalFrame, ctx: &ProfileContext) -> Point3<f64> {
        let thickness = ctx.profile.thickness_for(ProfileKind::Ridge);
        Point3::new(
            0.0,
            thickness / 2.0 - ctx.profile.ridge_depth,
            frame.inner_sign_local * ctx.profile.ridge_lateral,
        )
    }
}

impl ProfileBuilder for RidgeProfile {
    fn kind(&self) -> ProfileKind {
        ProfileKind::Ridge
    }

    fn build(&self, tread: &Tread, frame: &LocalFrame, ctx: &ProfileContext) -> Result<TreadMesh> {
        let thickness = ctx.profile.thickness_for(ProfileKind::Ridge);
        let mut out = TreadMesh::default();
        let body_top = emit_surface_slab(&mut out, tread, frame, ctx, thickness)?;

        let bottom = -thickness / 2.0;
        let corners = Corners::new(frame, tread.run, ctx.dims.tread_width, body_top, bottom, bottom);
        let sides = [
            TreadFace::Top,
            TreadFace::Front,
            TreadFace::Back,
            TreadFace::Inner,
            TreadFace::Outer,
        ];
        emit_solid(&mut out, PartRole::Structure, &corners, &sides, frame, ctx)?;

        // Underside fan: R-A-B, R-B-E, R-E-D, R-D-A
        let ridge = Self::ridge_point(frame, ctx);
        let [a, b] = corners.front_bottom;
        let [d, e] = corners.back_bottom;
        let down = -Vector3::y();
        let mut builder = MeshBuilder::with_capacity(12, 4);
        for (p, q) in [(a, b), (b, e), (e, d), (d, a)] {
            builder.add_face(&[ridge, p, q], &down, &Vector3::x())?;
        }
        let extent = FaceExtent {
            dim_u: tread.run,
            dim_v: ctx.dims.tread_width,
            normal: down,
        };
        out.faces.push(FaceMesh {
            face: TreadFace::Bottom,
            role: PartRole::Structure,
            mesh: builder.build(),
            request: face_request(TreadFace::Bottom, &extent, frame, ctx.textures),
        });
        Ok(out)
    }
}

/// Single walking plate; support comes from connector plates
pub struct HiTechProfile;

impl ProfileBuilder for HiTechProfile {
    fn kind(&self) -> ProfileKind {
        ProfileKind::HiTech
    }

    fn build(&self, tread: &Tread, frame: &LocalFrame, ctx: &ProfileContext) -> Result<TreadMesh> {
        let half = ctx.profile.thickness_for(ProfileKind::HiTech) / 2.0;
        let corners = Corners::new(frame, tread.run, ctx.dims.tread_width, half, -half, -half);

        let mut out = TreadMesh::default();
        emit_solid(&mut out, PartRole::WalkingSurface, &corners, &TreadFace::ALL, frame, ctx)?;

        if ctx.profile.markers {
            let top = corners.face(TreadFace::Top);
            let bottom = corners.face(TreadFace::Bottom);
            for (i, p) in top.iter().enumerate() {
                out.markers.push((format!("T{}", i), *p));
            }
            for (i, p) in bottom.iter().enumerate() {
                out.markers.push((format!("B{}", i), *p));
            }
        }
        Ok(out)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Profile builders by kind
///
/// Dispatches each tread to the builder registered for the configured profile.
pub struct ProfileRegistry {
    builders: FxHashMap<ProfileKind, Arc<dyn ProfileBuilder>>,
}

impl ProfileRegistry {
    /// Create a registry without any builders
    pub fn new() -> Self {
        Self {
            builders: FxHashMap::default(),
        }
    }

    /// Create a registry with every built-in profile
    pub fn with_default_builders() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(RectangularProfile::thick()));
        registry.register(Arc::new(RectangularProfile::thin()));
        registry.register(Arc::new(WedgeProfile));
        registry.register(Arc::new(RidgeProfile));
        registry.register(Arc::new(HiTechProfile));
        registry
    }

    /// Register a builder, replacing any builder of the same kind
    pub fn register(&mut self, builder: Arc<dyn ProfileBuilder>) {
        self.builders.insert(builder.kind(), builder);
    }

    pub fn has_builder(&self, kind: ProfileKind) -> bool {
        self.builders.contains_key(&kind)
    }

    /// Builder for a kind
    pub fn get(&self, kind: ProfileKind) -> Result<Arc<dyn ProfileBuilder>> {
        self.builders
            .get(&kind)
            .cloned()
            .ok_or_else(|| Error::profile(format!("no builder registered for {:?}", kind)))
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::with_default_builders()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::resolve_frame;
    use crate::layout::TreadLayout;
    use approx::assert_relative_eq;
    use stair_path::decode;

    struct Fixture {
        dims: Dimensions,
        profile: ProfileConfig,
        textures: TextureConfig,
    }

    impl Fixture {
        fn new(kind: ProfileKind) -> Self {
            Self {
                dims: Dimensions::default(),
                profile: ProfileConfig {
                    kind,
                    ..Default::default()
                },
                textures: TextureConfig::default(),
            }
        }

        fn ctx(&self) -> ProfileContext<'_> {
            ProfileContext {
                dims: &self.dims,
                profile: &self.profile,
                textures: &self.textures,
            }
        }
    }

    fn first_tread() -> Tread {
        TreadLayout::compute(&decode("s3").unwrap(), &Dimensions::default()).into_treads()[0].clone()
    }

    fn positions(mesh: &MeshData) -> Vec<[f32; 3]> {
        (0..mesh.vertex_count()).map(|i| mesh.position(i)).collect()
    }

    /// Signed volume of a set of face meshes (closed solids only)
    fn volume(faces: &[&FaceMesh]) -> f64 {
        let mut total = 0.0;
        for face in faces {
            let mesh = &face.mesh;
            for tri in mesh.indices.chunks_exact(3) {
                let p = |i: u32| {
                    let v = mesh.position(i as usize);
                    Vector3::new(v[0] as f64, v[1] as f64, v[2] as f64)
                };
                total += p(tri[0]).dot(&p(tri[1]).cross(&p(tri[2]))) / 6.0;
            }
        }
        total
    }

    #[test]
    fn test_thick_face_counts() {
        let fixture = Fixture::new(ProfileKind::Thick);
        let tread = first_tread();
        let frame = resolve_frame(&tread, true);
        let mesh = RectangularProfile::thick()
            .build(&tread, &frame, &fixture.ctx())
            .unwrap();

        assert_eq!(mesh.faces_with_role(PartRole::WalkingSurface).count(), 6);
        assert_eq!(mesh.faces_with_role(PartRole::Structure).count(), 6);
        assert_eq!(mesh.triangle_count(), 24);
        assert!(mesh.markers.is_empty());
    }

    #[test]
    fn test_slab_sits_above_body() {
        let fixture = Fixture::new(ProfileKind::Thick);
        let tread = first_tread();
        let frame = resolve_frame(&tread, true);
        let mesh = RectangularProfile::thick()
            .build(&tread, &frame, &fixture.ctx())
            .unwrap();

        let slab_bottom = mesh.face(PartRole::WalkingSurface, TreadFace::Bottom).unwrap();
        let body_top = mesh.face(PartRole::Structure, TreadFace::Top).unwrap();
        let slab_y = positions(&slab_bottom.mesh)[0][1] as f64;
        let body_y = positions(&body_top.mesh)[0][1] as f64;
        assert_relative_eq!(slab_y - body_y, 0.001, epsilon = 1e-6);

        let top = mesh.face(PartRole::WalkingSurface, TreadFace::Top).unwrap();
        assert_relative_eq!(positions(&top.mesh)[0][1] as f64, 0.04, epsilon = 1e-6);
    }

    #[test]
    fn test_front_face_pushed_out() {
        let fixture = Fixture::new(ProfileKind::Thin);
        let tread = first_tread();
        let frame = resolve_frame(&tread, true);
        let mesh = RectangularProfile::thin()
            .build(&tread, &frame, &fixture.ctx())
            .unwrap();

        let front = mesh.face(PartRole::Structure, TreadFace::Front).unwrap();
        for p in positions(&front.mesh) {
            assert_relative_eq!(p[0] as f64, -0.141, epsilon = 1e-6);
        }
        let normal = &front.mesh.normals[0..3];
        assert_relative_eq!(normal[0], -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_solids_are_closed_and_outward() {
        let tread = first_tread();
        let frame = resolve_frame(&tread, false);
        for kind in [ProfileKind::Thick, ProfileKind::Wedge, ProfileKind::Ridge] {
            let fixture = Fixture::new(kind);
            let registry = ProfileRegistry::with_default_builders();
            let mesh = registry
                .get(kind)
                .unwrap()
                .build(&tread, &frame, &fixture.ctx())
                .unwrap();
            let body: Vec<&FaceMesh> = mesh.faces_with_role(PartRole::Structure).collect();
            // Outward winding gives positive volume
            assert!(volume(&body) > 0.0, "{:?}", kind);
        }
    }

    #[test]
    fn test_wedge_front_is_thinner() {
        let fixture = Fixture::new(ProfileKind::Wedge);
        let tread = first_tread();
        let frame = resolve_frame(&tread, true);
        let mesh = WedgeProfile.build(&tread, &frame, &fixture.ctx()).unwrap();

        let inner = mesh.face(PartRole::Structure, TreadFace::Inner).unwrap();
        let ys: Vec<f64> = positions(&inner.mesh).iter().map(|p| p[1] as f64).collect();
        let min = ys.iter().cloned().fold(f64::MAX, f64::min);
        assert_relative_eq!(min, -0.04, epsilon = 1e-6);
        // Trapezoid: four distinct heights would be a rectangle's two
        let mut distinct: Vec<i64> = ys.iter().map(|y| (y * 1e5).round() as i64).collect();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), 3);
    }

    #[test]
    fn test_ridge_underside_fan() {
        let fixture = Fixture::new(ProfileKind::Ridge);
        let tread = first_tread();
        let frame = resolve_frame(&tread, true);
        let mesh = RidgeProfile.build(&tread, &frame, &fixture.ctx()).unwrap();

        let bottom = mesh.face(PartRole::Structure, TreadFace::Bottom).unwrap();
        assert_eq!(bottom.mesh.triangle_count(), 4);

        let ridge = RidgeProfile::ridge_point(&frame, &fixture.ctx());
        assert_relative_eq!(ridge.y, 0.04 - 0.11, epsilon = 1e-12);
        assert_relative_eq!(ridge.z, 0.15, epsilon = 1e-12);
        let hits = positions(&bottom.mesh)
            .iter()
            .filter(|p| (p[1] as f64 - ridge.y).abs() < 1e-6)
            .count();
        assert_eq!(hits, 4);
    }

    #[test]
    fn test_hi_tech_markers() {
        let mut fixture = Fixture::new(ProfileKind::HiTech);
        fixture.profile.markers = true;
        let tread = first_tread();
        let frame = resolve_frame(&tread, true);
        let mesh = HiTechProfile.build(&tread, &frame, &fixture.ctx()).unwrap();

        assert_eq!(mesh.faces.len(), 6);
        assert!(mesh.faces_with_role(PartRole::Structure).next().is_none());
        let labels: Vec<&str> = mesh.markers.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["T0", "T1", "T2", "T3", "B0", "B1", "B2", "B3"]);
        assert_relative_eq!(mesh.markers[0].1.y, 0.01, epsilon = 1e-12);
        assert_relative_eq!(mesh.markers[4].1.y, -0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_top_texture_rotated() {
        let fixture = Fixture::new(ProfileKind::Thick);
        let tread = first_tread();
        let frame = resolve_frame(&tread, true);
        let mesh = RectangularProfile::thick()
            .build(&tread, &frame, &fixture.ctx())
            .unwrap();
        let top = mesh.face(PartRole::WalkingSurface, TreadFace::Top).unwrap();
        assert!(top.request.rotate90);
        assert_relative_eq!(top.request.dim_u, 0.28, epsilon = 1e-9);
        assert_relative_eq!(top.request.dim_v, 1.0, epsilon = 1e-9);

        let front = mesh.face(PartRole::Structure, TreadFace::Front).unwrap();
        assert!(!front.request.rotate90);
        // First flight reference convention
        assert!(front.request.flip_u);
        // Top grain runs across the run and wraps down the sides
        let inner = mesh.face(PartRole::Structure, TreadFace::Inner).unwrap();
        assert!(inner.request.rotate90);
    }

    #[test]
    fn test_turning_landing_rotates_front_and_back() {
        let fixture = Fixture::new(ProfileKind::Thick);
        let treads =
            TreadLayout::compute(&decode("s2,lr,s2").unwrap(), &Dimensions::default()).into_treads();
        let landing = &treads[2];
        let frame = resolve_frame(landing, true);
        let mesh = RectangularProfile::thick()
            .build(landing, &frame, &fixture.ctx())
            .unwrap();
        for face in [TreadFace::Front, TreadFace::Back] {
            assert!(mesh.face(PartRole::Structure, face).unwrap().request.rotate90);
        }
        for face in [TreadFace::Top, TreadFace::Inner, TreadFace::Outer] {
            assert!(!mesh.face(PartRole::Structure, face).unwrap().request.rotate90);
        }
    }

    #[test]
    fn test_registry_missing_kind() {
        let registry = ProfileRegistry::new();
        assert!(!registry.has_builder(ProfileKind::Thick));
        assert!(matches!(registry.get(ProfileKind::Thick), Err(Error::Profile(_))));
        assert!(ProfileRegistry::default().has_builder(ProfileKind::HiTech));
    }
}
