// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Railing builders: glass and metal panels, cable railings

use crate::config::{Dimensions, RailingConfig};
use crate::frame::resolve_frame;
use crate::mesh::MeshBuilder;
use crate::numeric::{coincident, POINT_EPSILON};
use crate::Result;
use log::{debug, warn};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use stair_model::{
    default_sides, Axis, CableAnchor, MaterialParams, MeshData, RailingSide, RailingState, Tread,
};
use std::f64::consts::PI;
use std::ops::Range;

/// Radial segments of a cable
const CABLE_SEGMENTS: usize = 12;

/// Railing style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RailingKind {
    None,
    #[default]
    Glass,
    Metal,
    Cable,
}

/// Inputs of the railing builders
#[derive(Clone, Copy, Debug)]
pub struct RailingParams<'a> {
    pub dims: &'a Dimensions,
    pub tread_thickness: f64,
    pub railing: &'a RailingConfig,
}

/// A continuous panel strip along the treads it covers
///
/// `base` is the panel's base line: the line through the tread centers raised
/// or lowered along the stair slope. It gets a vertex wherever the slope
/// changes and a vertical jump where a flight meets a flat landing.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelSegment {
    pub side: RailingSide,
    pub axis: Axis,
    pub base: Vec<Point3<f64>>,
    /// Tread indices covered
    pub treads: Range<usize>,
    /// Outward direction of the panel
    pub outward: Vector3<f64>,
}

impl PanelSegment {
    pub fn start(&self) -> Point3<f64> {
        self.base[0]
    }

    pub fn end(&self) -> Point3<f64> {
        self.base[self.base.len() - 1]
    }

    /// Whether `next` continues this strip in the same vertical plane
    fn continues_with(&self, next: &PanelSegment) -> bool {
        if self.side != next.side || self.axis != next.axis {
            return false;
        }
        if self.outward.dot(&next.outward) < 1.0 - POINT_EPSILON {
            return false;
        }
        let gap = next.start() - self.end();
        if Vector3::new(gap.x, 0.0, gap.z).norm() > POINT_EPSILON {
            return false;
        }
        let ahead = self.end() - self.start();
        let onward = next.end() - next.start();
        ahead.x * onward.x + ahead.z * onward.z > 0.0
    }

    /// Append `next`, merging collinear legs
    fn extend(&mut self, next: PanelSegment) {
        let jump = !coincident(&self.end(), &next.start());
        let skip = if jump { 0 } else { 1 };
        for point in next.base.into_iter().skip(skip) {
            let n = self.base.len();
            let a = self.base[n - 1] - self.base[n - 2];
            let b = point - self.base[n - 1];
            if a.cross(&b).norm() <= POINT_EPSILON * a.norm() * b.norm() && a.dot(&b) > 0.0 {
                self.base[n - 1] = point;
            } else {
                self.base.push(point);
            }
        }
        self.treads.end = next.treads.end;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RailingPanel {
    pub segment: PanelSegment,
    pub mesh: MeshData,
}

/// One vertical cable
#[derive(Clone, Debug, PartialEq)]
pub struct Cable {
    pub tread: usize,
    /// Bottom center
    pub base: Point3<f64>,
    pub top: f64,
    pub mesh: MeshData,
}

/// Railing geometry of a stair
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RailingGeometry {
    pub kind: RailingKind,
    pub panels: Vec<RailingPanel>,
    pub cables: Vec<Cable>,
    pub material: Option<MaterialParams>,
    /// Panels skipped for degenerate outlines
    pub warnings: Vec<String>,
}

impl RailingGeometry {
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty() && self.cables.is_empty()
    }
}

/// Material of a railing style
pub fn railing_material(config: &RailingConfig) -> Option<MaterialParams> {
    match config.kind {
        RailingKind::None => None,
        RailingKind::Glass => {
            let (color, opacity) = config.glass_tone.appearance();
            let mut material = MaterialParams::solid(color).translucent(opacity);
            material.roughness = 0.05;
            Some(material)
        }
        RailingKind::Metal | RailingKind::Cable => {
            let (color, opacity) = config.metal_finish.appearance();
            let mut material = MaterialParams::solid(color);
            if opacity < 1.0 {
                material = material.translucent(opacity);
            }
            material.metalness = 0.85;
            material.roughness = 0.35;
            Some(material)
        }
    }
}

fn axis_of(direction: &Vector3<f64>) -> Axis {
    if direction.x.abs() > 0.5 {
        Axis::X
    } else {
        Axis::Z
    }
}

/// Panel base lines for every enabled tread, coalesced
pub fn panel_segments(
    treads: &[Tread],
    state: &RailingState,
    params: &RailingParams,
) -> Vec<PanelSegment> {
    let defaults = default_sides(treads);
    let width = params.dims.tread_width;
    let offset = params.railing.panel_offset;

    let mut segments: Vec<PanelSegment> = Vec::new();
    for (i, tread) in treads.iter().enumerate() {
        if !state.enabled(tread) {
            continue;
        }
        let frame = resolve_frame(tread, defaults[i].is_right());
        let side = state.side(tread, defaults[i]);
        let travel = frame.forward_world();
        let lateral = frame.side_world(side.is_right());

        // The inner side of a turning landing is where the next flight leaves;
        // use the far edge
        let segment = if tread.is_turning_landing() && frame.is_inner(side.is_right()) {
            let center = tread.position + travel * (tread.run / 2.0 + offset);
            PanelSegment {
                side,
                axis: axis_of(&lateral),
                base: vec![center - lateral * (width / 2.0), center + lateral * (width / 2.0)],
                treads: i..i + 1,
                outward: travel,
            }
        } else {
            let slope = if tread.is_landing {
                0.0
            } else {
                params.dims.slope()
            };
            let half = tread.run / 2.0;
            let center = tread.position + lateral * (width / 2.0 + offset);
            PanelSegment {
                side,
                axis: tread.axis,
                base: vec![
                    center - travel * half - Vector3::y() * (slope * half),
                    center + travel * half + Vector3::y() * (slope * half),
                ],
                treads: i..i + 1,
                outward: lateral,
            }
        };

        match segments.last_mut() {
            Some(last) if last.continues_with(&segment) => last.extend(segment),
            _ => segments.push(segment),
        }
    }
    segments
}

/// Panel outline from `tread_thickness/2 + overlap` below the base line to
/// `tread_thickness/2 + height` above it
fn panel_mesh(segment: &PanelSegment, params: &RailingParams) -> Result<MeshData> {
    let half = params.tread_thickness / 2.0;
    let below = Vector3::y() * (half + params.railing.panel_overlap);
    let above = Vector3::y() * (half + params.railing.height);
    let points: Vec<Point3<f64>> = segment
        .base
        .iter()
        .map(|p| p - below)
        .chain(segment.base.iter().rev().map(|p| p + above))
        .collect();
    let n = points.len();
    let mut builder = MeshBuilder::with_capacity(n, n - 2);
    builder.add_face(&points, &segment.outward, &(segment.end() - segment.start()))?;
    Ok(builder.build())
}

/// Closed vertical tube
///
/// Rings of `CABLE_SEGMENTS` vertices at both ends, quads between them and
/// center fans as caps.
fn cable_mesh(base: &Point3<f64>, length: f64, radius: f64) -> MeshData {
    let segments = CABLE_SEGMENTS;
    let mut builder = MeshBuilder::with_capacity(2 * segments + 2, 4 * segments);

    for ring in 0..2 {
        let center = base + Vector3::y() * (length * ring as f64);
        for j in 0..segments {
            let angle = 2.0 * PI * j as f64 / segments as f64;
            let radial = Vector3::new(angle.cos(), 0.0, angle.sin());
            builder.add_vertex(
                center + radial * radius,
                radial,
                [j as f64 / segments as f64, ring as f64],
            );
        }
    }

    for j in 0..segments {
        let j_next = (j + 1) % segments;
        let mid = 2.0 * PI * (j as f64 + 0.5) / segments as f64;
        let facing = Vector3::new(mid.cos(), 0.0, mid.sin());
        builder.add_quad_facing(
            j as u32,
            (segments + j) as u32,
            (segments + j_next) as u32,
            j_next as u32,
            &facing,
        );
    }

    let down = -Vector3::y();
    let up = Vector3::y();
    let bottom = builder.add_vertex(*base, down, [0.5, 0.0]);
    let top = builder.add_vertex(base + up * length, up, [0.5, 1.0]);
    for j in 0..segments {
        let j_next = (j + 1) % segments;
        builder.add_triangle_facing(bottom, j as u32, j_next as u32, &down);
        builder.add_triangle_facing(top, (segments + j) as u32, (segments + j_next) as u32, &up);
    }

    builder.build()
}

/// Travel offsets of the cables on a tread, `None` when it carries none
fn cable_stations(tread: &Tread, config: &RailingConfig, width: f64) -> Option<Vec<f64>> {
    if tread.is_turning_landing() {
        return None;
    }
    if !tread.is_landing {
        let pitch = config.cable_pitch;
        return Some(vec![-pitch, 0.0, pitch]);
    }
    let count = config.cables_per_landing;
    let margin = config.cable_landing_margin;
    let span = width - 2.0 * margin;
    let step = if count > 1 {
        span / (count - 1) as f64
    } else {
        0.0
    };
    Some(
        (0..count)
            .map(|j| -width / 2.0 + margin + step * j as f64)
            .collect(),
    )
}

/// Cables for every enabled step and straight landing
pub fn build_cables(
    treads: &[Tread],
    state: &RailingState,
    params: &RailingParams,
) -> Vec<Cable> {
    let config = params.railing;
    let half = params.tread_thickness / 2.0;
    let width = params.dims.tread_width;

    if treads.is_empty() {
        return Vec::new();
    }
    let (lowest, highest) = treads
        .iter()
        .map(|t| t.position.y)
        .fold((f64::MAX, f64::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)));
    let floor = lowest + half - params.dims.riser;
    let top = config.cable_top.unwrap_or(highest + half + config.height);

    let defaults = default_sides(treads);
    let mut cables = Vec::new();
    for (i, tread) in treads.iter().enumerate() {
        if !state.enabled(tread) {
            continue;
        }
        let Some(stations) = cable_stations(tread, config, width) else {
            continue;
        };

        let frame = resolve_frame(tread, defaults[i].is_right());
        let side = state.side(tread, defaults[i]);
        let lateral = frame.side_world(side.is_right());
        let bottom = match state.anchor(tread) {
            CableAnchor::TreadTop => tread.position.y + half,
            CableAnchor::Floor => floor,
        };
        if top - bottom <= POINT_EPSILON {
            debug!("Tread {}: cable top {:.3} not above bottom {:.3}", i, top, bottom);
            continue;
        }

        let edge = tread.position + lateral * (width / 2.0 + config.panel_offset);
        for s in stations {
            let foot = edge + frame.forward_world() * s;
            let base = Point3::new(foot.x, bottom, foot.z);
            cables.push(Cable {
                tread: i,
                base,
                top,
                mesh: cable_mesh(&base, top - bottom, config.cable_radius),
            });
        }
    }
    cables
}

/// Build the railing of a stair
///
/// A panel whose outline cannot be meshed is left out and reported in
/// [`RailingGeometry::warnings`].
pub fn build_railings(
    treads: &[Tread],
    state: &RailingState,
    params: &RailingParams,
) -> RailingGeometry {
    let kind = params.railing.kind;
    let mut geometry = RailingGeometry {
        kind,
        material: railing_material(params.railing),
        ..Default::default()
    };

    match kind {
        RailingKind::None => {}
        RailingKind::Glass | RailingKind::Metal => {
            for segment in panel_segments(treads, state, params) {
                match panel_mesh(&segment, params) {
                    Ok(mesh) => geometry.panels.push(RailingPanel { segment, mesh }),
                    Err(err) => {
                        let message =
                            format!("Railing panel over treads {:?} skipped: {}", segment.treads, err);
                        warn!("{}", message);
                        geometry.warnings.push(message);
                    }
                }
            }
        }
        RailingKind::Cable => {
            geometry.cables = build_cables(treads, state, params);
        }
    }

    debug!(
        "Railing {:?}: {} panels, {} cables",
        kind,
        geometry.panels.len(),
        geometry.cables.len()
    );
    geometry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout_treads;
    use approx::assert_relative_eq;
    use stair_path::decode;

    fn treads(tokens: &str) -> Vec<Tread> {
        layout_treads(&decode(tokens).unwrap(), &Dimensions::default())
    }

    fn build(tokens: &str, kind: RailingKind, edit: impl Fn(&mut RailingState)) -> RailingGeometry {
        let treads = treads(tokens);
        let mut state = RailingState::for_treads(&treads);
        edit(&mut state);
        let dims = Dimensions::default();
        let railing = RailingConfig {
            kind,
            ..Default::default()
        };
        let params = RailingParams {
            dims: &dims,
            tread_thickness: 0.08,
            railing: &railing,
        };
        build_railings(&treads, &state, &params)
    }

    #[test]
    fn test_straight_flight_coalesces() {
        let railing = build("s10", RailingKind::Glass, |_| {});
        assert_eq!(railing.panels.len(), 1);
        let panel = &railing.panels[0];
        assert_eq!(panel.segment.treads, 0..10);
        assert_eq!(panel.segment.side, RailingSide::Right);
        assert_eq!(panel.mesh.triangle_count(), 2);

        let (min, max) = panel.mesh.bounds().unwrap();
        assert_relative_eq!(min[1] as f64, -0.09 - 0.04 - 0.05, epsilon = 1e-5);
        assert_relative_eq!(max[1] as f64, 9.0 * 0.18 + 0.09 + 0.04 + 0.9, epsilon = 1e-5);
        assert_relative_eq!(min[2] as f64, 0.52, epsilon = 1e-5);

        let material = railing.material.unwrap();
        assert!(material.transparent);
        assert!(!material.depth_write);
    }

    #[test]
    fn test_side_change_breaks() {
        let railing = build("s10", RailingKind::Metal, |state| {
            state.set_step_side(3, RailingSide::Left);
        });
        let ranges: Vec<_> = railing.panels.iter().map(|p| p.segment.treads.clone()).collect();
        assert_eq!(ranges, vec![0..3, 3..4, 4..10]);
        assert!(!railing.material.unwrap().transparent);
    }

    #[test]
    fn test_disabled_tread_breaks() {
        let railing = build("s10", RailingKind::Glass, |state| {
            state.step_enabled[5] = false;
        });
        let ranges: Vec<_> = railing.panels.iter().map(|p| p.segment.treads.clone()).collect();
        assert_eq!(ranges, vec![0..5, 6..10]);
    }

    #[test]
    fn test_flat_landing_joins_strip() {
        let railing = build("s3,l,s3", RailingKind::Glass, |_| {});
        assert_eq!(railing.panels.len(), 1);
        let panel = &railing.panels[0];
        assert_eq!(panel.segment.treads, 0..7);

        // Flight, jump, landing, jump, flight
        let ys: Vec<f64> = panel.segment.base.iter().map(|p| p.y).collect();
        let expected = [-0.09, 0.45, 0.54, 0.54, 0.63, 1.17];
        assert_eq!(ys.len(), expected.len());
        for (y, e) in ys.iter().zip(expected) {
            assert_relative_eq!(*y, e, epsilon = 1e-9);
        }
        assert_relative_eq!(panel.segment.base[1].x, panel.segment.base[2].x, epsilon = 1e-9);

        // Concave outline of 12 corners
        assert_eq!(panel.mesh.vertex_count(), 12);
        assert_eq!(panel.mesh.triangle_count(), 10);
    }

    #[test]
    fn test_disabled_landing_splits_strip() {
        let railing = build("s3,l,s3", RailingKind::Glass, |state| {
            state.landing_enabled[0] = false;
        });
        let ranges: Vec<_> = railing.panels.iter().map(|p| p.segment.treads.clone()).collect();
        assert_eq!(ranges, vec![0..3, 4..7]);
    }

    #[test]
    fn test_turning_landing_panel_on_far_edge() {
        let treads = treads("s3,lr,s3");
        let railing = build("s3,lr,s3", RailingKind::Glass, |_| {});
        let landing = railing
            .panels
            .iter()
            .find(|p| p.segment.treads == (3..4))
            .unwrap();
        assert_eq!(landing.segment.axis, Axis::Z);
        let far = treads[3].position.x + 0.5 + 0.02;
        assert_relative_eq!(landing.segment.start().x, far, epsilon = 1e-9);
        assert_relative_eq!(landing.segment.end().x, far, epsilon = 1e-9);
        assert_eq!(landing.segment.base.len(), 2);
    }

    #[test]
    fn test_cable_counts() {
        let railing = build("s3,l,s2,lr,s2", RailingKind::Cable, |_| {});
        // 7 steps x 3 + one straight landing x 9, none on the turning landing
        assert_eq!(railing.cables.len(), 30);
        assert!(railing.panels.is_empty());
        assert!(railing.cables.iter().all(|c| c.tread != 6));
        assert_eq!(railing.cables[0].mesh.triangle_count(), 48);

        let landing: Vec<_> = railing.cables.iter().filter(|c| c.tread == 3).collect();
        assert_eq!(landing.len(), 9);
        let first = landing[0].base.x;
        let last = landing[8].base.x;
        assert_relative_eq!(last - first, 0.9, epsilon = 1e-9);
    }

    #[test]
    fn test_cable_pitch_and_anchors() {
        let railing = build("s4", RailingKind::Cable, |state| {
            state.step_anchors[2] = CableAnchor::Floor;
            state.step_enabled[3] = false;
        });
        assert_eq!(railing.cables.len(), 9);
        assert_relative_eq!(railing.cables[1].base.x - railing.cables[0].base.x, 0.1, epsilon = 1e-9);

        let top = 3.0 * 0.18 + 0.04 + 0.9;
        for cable in &railing.cables {
            assert_relative_eq!(cable.top, top, epsilon = 1e-9);
        }
        assert_relative_eq!(railing.cables[0].base.y, 0.04, epsilon = 1e-9);
        assert_relative_eq!(railing.cables[6].base.y, 0.04 - 0.18, epsilon = 1e-9);
    }

    #[test]
    fn test_explicit_cable_top() {
        let treads = treads("s2");
        let state = RailingState::for_treads(&treads);
        let dims = Dimensions::default();
        let railing = RailingConfig {
            kind: RailingKind::Cable,
            cable_top: Some(2.0),
            ..Default::default()
        };
        let params = RailingParams {
            dims: &dims,
            tread_thickness: 0.08,
            railing: &railing,
        };
        let cables = build_cables(&treads, &state, &params);
        assert_eq!(cables.len(), 6);
        assert!(cables.iter().all(|c| c.top == 2.0));
    }

    #[test]
    fn test_flat_panel_is_skipped() {
        let treads = treads("s3,lr,s3");
        let state = RailingState::for_treads(&treads);
        let dims = Dimensions::default();
        let railing = RailingConfig {
            kind: RailingKind::Glass,
            height: 0.0,
            panel_overlap: 0.0,
            ..Default::default()
        };
        let params = RailingParams {
            dims: &dims,
            tread_thickness: 0.0,
            railing: &railing,
        };
        let geometry = build_railings(&treads, &state, &params);
        assert!(geometry.panels.is_empty());
        assert_eq!(geometry.warnings.len(), panel_segments(&treads, &state, &params).len());
        assert!(geometry.material.is_some());
    }

    #[test]
    fn test_no_railing() {
        let railing = build("s5", RailingKind::None, |_| {});
        assert!(railing.is_empty());
        assert!(railing.material.is_none());
    }
}
