// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hi-tech connector plates
//!
//! One parameterized builder makes the plate for any run of steps along
//! either diagonal. Rails are computed in the run's side elevation, a 2D frame
//! of travel coordinate `s` and height `y`:
//!
//! ```text
//!   upper rail  U_i = (s_i - run/2, y_i + T/2 + gap)   on one side, +W/2
//!   lower rail  L_i = (s_i + run/2, y_i - T/2 - gap)   on the other, -W/2
//! ```
//!
//! so each plate cuts diagonally through the tread band, and the mirrored
//! plate takes the other diagonal. The strip between the rails is extruded
//! along the plate normal by the plate thickness. A run ending at a landing
//! is extended until the cross-rail distance matches the landing plate's,
//! found with the secant method.

use crate::config::{Dimensions, PlateConfig};
use crate::frame::resolve_frame;
use crate::layout::{StepRun, TreadLayout};
use crate::mesh::MeshBuilder;
use crate::numeric::{
    closest_between_lines, coincident, normalize_or, secant_solve, SecantOutcome,
    DEGENERATE_EPSILON, POINT_EPSILON,
};
use log::{debug, warn};
use nalgebra::{Point2, Point3, Vector2, Vector3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use stair_model::{MeshData, RailingSide, Tread};

/// Which diagonal of the run a plate follows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlateSide {
    /// Upper rail on the side the path turns toward
    Inner,
    /// Upper rail on the side away from the turn
    Outer,
}

impl PlateSide {
    pub const BOTH: [PlateSide; 2] = [PlateSide::Inner, PlateSide::Outer];
}

/// Inputs shared by all plates of one stair
#[derive(Clone, Copy, Debug)]
pub struct PlateParams<'a> {
    pub dims: &'a Dimensions,
    /// Walking plate thickness
    pub tread_thickness: f64,
    pub plates: &'a PlateConfig,
}

impl PlateParams<'_> {
    /// Height of the band between the rails at one tread
    #[inline]
    pub fn band_height(&self) -> f64 {
        self.tread_thickness + 2.0 * self.plates.gap
    }

    /// Cross-rail distance of a landing plate
    #[inline]
    pub fn landing_width(&self) -> f64 {
        self.band_height().hypot(self.dims.tread_width)
    }
}

/// Upper and lower rail point at one station, in side elevation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RailPair {
    pub upper: Point2<f64>,
    pub lower: Point2<f64>,
}

/// Solved termination of a run that ends at a landing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WidthMatch {
    /// Travel coordinate of the solved station
    pub s: f64,
    pub upper: Point2<f64>,
    pub lower: Point2<f64>,
    /// Distance between the rails at `s`
    pub distance: f64,
    pub outcome: SecantOutcome,
}

/// A closed connector plate for one run and diagonal
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorPlate {
    /// Index into [`TreadLayout::runs`]
    pub run: usize,
    pub side: PlateSide,
    pub mesh: MeshData,
    /// Rail stations in world space, upper then lower
    pub rails: Vec<(Point3<f64>, Point3<f64>)>,
    pub front_vertex_count: usize,
    pub back_vertex_count: usize,
    pub width_match: Option<WidthMatch>,
    pub warnings: Vec<String>,
}

/// Both diagonal plates of a landing no run starts from
#[derive(Clone, Debug, PartialEq)]
pub struct LandingPlate {
    /// Tread index of the landing
    pub landing: usize,
    pub mesh: MeshData,
    pub warnings: Vec<String>,
}

/// Every plate of a stair
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlateSet {
    pub connectors: Vec<ConnectorPlate>,
    pub landings: Vec<LandingPlate>,
    pub warnings: Vec<String>,
}

/// Side elevation of a run, mapped to world space
///
/// The upper rail lies `half_width` toward `lateral`, the lower rail the same
/// distance the other way.
#[derive(Clone, Copy, Debug)]
struct RunFrame {
    origin: Point3<f64>,
    travel: Vector3<f64>,
    lateral: Vector3<f64>,
    half_width: f64,
}

impl RunFrame {
    /// Frame of a tread with the upper rail on `side`
    fn new(tread: &Tread, inner_is_right: bool, side: PlateSide, half_width: f64) -> Self {
        let frame = resolve_frame(tread, inner_is_right);
        let lateral = match side {
            PlateSide::Inner => frame.inner_world(),
            PlateSide::Outer => -frame.inner_world(),
        };
        Self {
            origin: Point3::new(tread.position.x, 0.0, tread.position.z),
            travel: frame.forward_world(),
            lateral,
            half_width,
        }
    }

    fn elevation(&self, p: &Point2<f64>) -> Point3<f64> {
        self.origin + self.travel * p.x + Vector3::y() * p.y
    }

    fn upper(&self, p: &Point2<f64>) -> Point3<f64> {
        self.elevation(p) + self.lateral * self.half_width
    }

    fn lower(&self, p: &Point2<f64>) -> Point3<f64> {
        self.elevation(p) - self.lateral * self.half_width
    }

    fn world(&self, pair: &RailPair) -> (Point3<f64>, Point3<f64>) {
        (self.upper(&pair.upper), self.lower(&pair.lower))
    }

    fn direction(&self, v: &Vector2<f64>) -> Vector3<f64> {
        self.travel * v.x + Vector3::y() * v.y
    }

    fn coord(&self, p: &Point3<f64>) -> Point2<f64> {
        Point2::new((p - self.origin).dot(&self.travel), p.y)
    }

    fn s(&self, tread: &Tread) -> f64 {
        (tread.position - self.origin).dot(&self.travel)
    }

    /// Back-top corner on the upper side and front-bottom corner on the other
    fn station(&self, tread: &Tread, half_band: f64) -> RailPair {
        let s = self.s(tread);
        RailPair {
            upper: Point2::new(s - tread.run / 2.0, tread.position.y + half_band),
            lower: Point2::new(s + tread.run / 2.0, tread.position.y - half_band),
        }
    }
}

/// Append a pair, extending the last pair in place when it only moves the upper rail
///
/// Returns `true` when a new station was added.
fn push_pair(pairs: &mut Vec<RailPair>, pair: RailPair, tangent: &Vector2<f64>) -> bool {
    if let Some(last) = pairs.last_mut() {
        if (last.lower - pair.lower).norm() < POINT_EPSILON {
            let step = pair.upper - last.upper;
            let cross = step.x * tangent.y - step.y * tangent.x;
            if cross.abs() < POINT_EPSILON {
                last.upper = pair.upper;
                return false;
            }
        }
    }
    pairs.push(pair);
    true
}

/// Solve where a run's rails are `target` apart across the plate
///
/// The rails are the lines through `last` along `tangent`, `span` apart
/// laterally. The upper rail runs onto the landing's walking surface and stays
/// level at `landing_top` from there. The secant starts at the last lower
/// station (or where the upper rail reaches the landing, if later) and
/// `bracket` beyond it.
pub fn solve_landing_width(
    last: &RailPair,
    tangent: &Vector2<f64>,
    span: f64,
    landing_top: f64,
    target: f64,
    plates: &PlateConfig,
) -> WidthMatch {
    let slope = if tangent.x.abs() > DEGENERATE_EPSILON {
        tangent.y / tangent.x
    } else {
        0.0
    };
    let upper_y = |s: f64| (last.upper.y + slope * (s - last.upper.x)).min(landing_top);
    let lower_y = |s: f64| last.lower.y + slope * (s - last.lower.x);
    let distance = |s: f64| (upper_y(s) - lower_y(s)).hypot(span);

    // Seed on the level part of the upper rail, so the residual moves with s
    let s0 = if slope > DEGENERATE_EPSILON {
        last.lower.x.max(last.upper.x + (landing_top - last.upper.y) / slope)
    } else {
        last.lower.x
    };
    let outcome = secant_solve(
        |s| distance(s) - target,
        s0,
        s0 + plates.secant_bracket,
        plates.secant_tolerance,
        plates.secant_max_iterations,
    );

    let s = outcome.root;
    WidthMatch {
        s,
        upper: Point2::new(s, upper_y(s)),
        lower: Point2::new(s, lower_y(s)),
        distance: distance(s),
        outcome,
    }
}

/// Build the connector plate of one run along one diagonal
///
/// `inner_is_right` tells which side of the walker the inner side is on.
/// Degenerate input degrades the plate and is reported in `warnings`.
pub fn build_connector_plate(
    run_index: usize,
    run: &StepRun,
    treads: &[Tread],
    side: PlateSide,
    inner_is_right: bool,
    params: &PlateParams,
) -> ConnectorPlate {
    let mut warnings = Vec::new();
    let half_band = params.tread_thickness / 2.0 + params.plates.gap;
    let width = params.dims.tread_width;

    let steps = &treads[run.treads.clone()];
    let first = &steps[0];
    let frame = RunFrame::new(first, inner_is_right, side, width / 2.0);

    let mut pairs: Vec<RailPair> = steps.iter().map(|t| frame.station(t, half_band)).collect();

    // Rail tangent, from the first two steps or the nominal slope
    let nominal = Vector2::new(params.dims.tread_depth, params.dims.riser);
    let measured = if pairs.len() > 1 {
        pairs[1].upper - pairs[0].upper
    } else {
        Vector2::zeros()
    };
    let (tangent_w, fallback) = normalize_or(&frame.direction(&measured), &frame.direction(&nominal));
    if fallback {
        debug!("Run {} {:?}: rail tangent from nominal slope", run_index, side);
    }
    let tangent = Vector2::new(tangent_w.dot(&frame.travel), tangent_w.y);

    // Plate normal from the first station, pointing to the upper rail's side
    let (u0, l0) = frame.world(&pairs[0]);
    let (mut normal, _) = normalize_or(&tangent_w.cross(&(l0 - u0)), &frame.lateral);
    if normal.dot(&frame.lateral) < 0.0 {
        normal = -normal;
    }

    // Start: landing pair, or slide the first lower point along its rail
    // until the start edge is square to the rails
    let preceding = run
        .preceding_landing
        .map(|i| &treads[i])
        .filter(|landing| landing.turn.is_none());
    match preceding {
        Some(landing) => {
            pairs.insert(0, frame.station(landing, half_band));
        }
        None => {
            let start = &mut pairs[0];
            let (upper, lower) = frame.world(start);
            let along = (lower - upper).dot(&tangent_w);
            start.lower = frame.coord(&(lower - tangent_w * along));
        }
    }

    // End: width match against a landing, or a vertical cap
    let mut width_match = None;
    let following = run.following_landing.map(|i| &treads[i]);
    match (following, pairs.last().copied()) {
        (Some(landing), Some(last)) => {
            let landing_top = landing.position.y + half_band;
            let solved = solve_landing_width(
                &last,
                &tangent,
                width,
                landing_top,
                params.landing_width(),
                params.plates,
            );
            if !solved.outcome.converged {
                let message = format!(
                    "Run {} {:?}: width match stopped after {} iterations (residual {:.4})",
                    run_index, side, solved.outcome.iterations, solved.outcome.residual
                );
                warn!("{}", message);
                warnings.push(message);
            }

            // Station where the upper rail reaches the landing surface
            if tangent.y > DEGENERATE_EPSILON && tangent.x > DEGENERATE_EPSILON {
                let s_top = last.upper.x + (landing_top - last.upper.y) * tangent.x / tangent.y;
                if s_top > last.upper.x && s_top < solved.s {
                    let lower_y = last.lower.y + (s_top - last.lower.x) * tangent.y / tangent.x;
                    push_pair(
                        &mut pairs,
                        RailPair {
                            upper: Point2::new(s_top, landing_top),
                            lower: Point2::new(s_top, lower_y),
                        },
                        &tangent,
                    );
                }
            }
            push_pair(
                &mut pairs,
                RailPair {
                    upper: solved.upper,
                    lower: solved.lower,
                },
                &tangent,
            );
            width_match = Some(solved);
        }
        (None, Some(last)) => {
            let tread = &steps[steps.len() - 1];
            match end_cap(&frame, tread, &last, &tangent_w) {
                Some(pair) => {
                    push_pair(&mut pairs, pair, &tangent);
                }
                None => {
                    let message = format!("Run {} {:?}: no forward end cap", run_index, side);
                    warn!("{}", message);
                    warnings.push(message);
                }
            }
        }
        (_, None) => {}
    }

    let rails: Vec<(Point3<f64>, Point3<f64>)> = pairs.iter().map(|pair| frame.world(pair)).collect();

    if rails.len() < 2 {
        let message = format!("Run {} {:?}: fewer than two rail stations", run_index, side);
        warn!("{}", message);
        warnings.push(message);
        return ConnectorPlate {
            run: run_index,
            side,
            mesh: MeshData::new(),
            rails,
            front_vertex_count: 0,
            back_vertex_count: 0,
            width_match,
            warnings,
        };
    }

    let (builder, front, back) = extrude_strip(
        &rails,
        &normal,
        &tangent_w,
        params.plates.thickness,
        &mut warnings,
    );

    ConnectorPlate {
        run: run_index,
        side,
        mesh: builder.build(),
        rails,
        front_vertex_count: front,
        back_vertex_count: back,
        width_match,
        warnings,
    }
}

/// Vertical end cap through the last tread's leading corners
///
/// Each rail is projected onto the vertical lines through the front-inner and
/// front-outer corner; the forward projection with the least error wins.
fn end_cap(
    frame: &RunFrame,
    tread: &Tread,
    last: &RailPair,
    tangent: &Vector3<f64>,
) -> Option<RailPair> {
    let front = tread.position + frame.travel * (tread.run / 2.0);
    let corners = [
        front + frame.lateral * frame.half_width,
        front - frame.lateral * frame.half_width,
    ];

    let project = |origin: Point3<f64>| -> Option<Point2<f64>> {
        corners
            .iter()
            .map(|corner| closest_between_lines(&origin, tangent, corner, &Vector3::y()))
            .filter(|(t, _, _)| *t >= -POINT_EPSILON)
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(t, _, _)| frame.coord(&(origin + tangent * t.max(0.0))))
    };

    Some(RailPair {
        upper: project(frame.upper(&last.upper))?,
        lower: project(frame.lower(&last.lower))?,
    })
}

/// Front strip, back strip, rail walls and caps of a plate
///
/// Returns the builder with the front and back vertex counts.
fn extrude_strip(
    rails: &[(Point3<f64>, Point3<f64>)],
    normal: &Vector3<f64>,
    tangent: &Vector3<f64>,
    thickness: f64,
    warnings: &mut Vec<String>,
) -> (MeshBuilder, usize, usize) {
    let n = rails.len();
    let offset = normal * thickness;
    let inward = -normal;

    // In-plane direction from the lower rail toward the upper one
    let across = rails[0].0 - rails[0].1;
    let (up, _) = normalize_or(&(across - tangent * across.dot(tangent)), &Vector3::y());

    let s_min = rails[0].0.coords.dot(tangent);
    let s_max = rails[n - 1].0.coords.dot(tangent);
    let span = (s_max - s_min).abs().max(DEGENERATE_EPSILON);
    let u_of = |p: &Point3<f64>| (p.coords.dot(tangent) - s_min) / span;

    let mut builder = MeshBuilder::with_capacity(8 * n + 8, 8 * n);

    let front_start = builder.vertex_count();
    for (upper, lower) in rails {
        builder.add_vertex(*upper, inward, [u_of(upper), 1.0]);
        builder.add_vertex(*lower, inward, [u_of(lower), 0.0]);
    }
    let front = builder.vertex_count() - front_start;
    for k in 0..n - 1 {
        let base = (front_start + 2 * k) as u32;
        builder.add_quad_facing(base, base + 2, base + 3, base + 1, &inward);
    }

    let back_start = builder.vertex_count();
    for (upper, lower) in rails {
        builder.add_vertex(upper + offset, *normal, [u_of(upper), 1.0]);
        builder.add_vertex(lower + offset, *normal, [u_of(lower), 0.0]);
    }
    let back = builder.vertex_count() - back_start;
    for k in 0..n - 1 {
        let base = (back_start + 2 * k) as u32;
        builder.add_quad_facing(base, base + 2, base + 3, base + 1, normal);
    }

    let mut face = |builder: &mut MeshBuilder, points: [Point3<f64>; 4], outward: &Vector3<f64>| {
        if let Err(err) = builder.add_face(&points, outward, tangent) {
            warnings.push(format!("plate face skipped: {}", err));
        }
    };

    // Rail walls
    let down = -up;
    for k in 0..n - 1 {
        let (u0, l0) = rails[k];
        let (u1, l1) = rails[k + 1];
        if !coincident(&u0, &u1) {
            face(&mut builder, [u0, u1, u1 + offset, u0 + offset], &up);
        }
        if !coincident(&l0, &l1) {
            face(&mut builder, [l0, l1, l1 + offset, l0 + offset], &down);
        }
    }

    // Caps
    let (u0, l0) = rails[0];
    face(&mut builder, [u0, l0, l0 + offset, u0 + offset], &-tangent);
    let (un, ln) = rails[n - 1];
    face(&mut builder, [un, ln, ln + offset, un + offset], tangent);

    (builder, front, back)
}

/// Both diagonal plates of a landing, level across its full run
///
/// Each plate runs from the landing's top edge on one side to its bottom
/// edge on the other, so its cross-rail distance is
/// [`PlateParams::landing_width`].
pub fn build_landing_plate(
    landing: &Tread,
    inner_is_right: bool,
    params: &PlateParams,
) -> LandingPlate {
    let half_band = params.tread_thickness / 2.0 + params.plates.gap;
    let half_run = landing.run / 2.0;
    let top = landing.position.y + half_band;
    let bottom = landing.position.y - half_band;

    let mut warnings = Vec::new();
    let mut builder = MeshBuilder::new();
    for side in PlateSide::BOTH {
        let frame = RunFrame::new(landing, inner_is_right, side, params.dims.tread_width / 2.0);
        let pairs = [
            RailPair {
                upper: Point2::new(-half_run, top),
                lower: Point2::new(-half_run, bottom),
            },
            RailPair {
                upper: Point2::new(half_run, top),
                lower: Point2::new(half_run, bottom),
            },
        ];
        let rails: Vec<(Point3<f64>, Point3<f64>)> = pairs.iter().map(|p| frame.world(p)).collect();
        let (u0, l0) = rails[0];
        let (mut normal, _) = normalize_or(&frame.travel.cross(&(l0 - u0)), &frame.lateral);
        if normal.dot(&frame.lateral) < 0.0 {
            normal = -normal;
        }
        let (plate, _, _) = extrude_strip(
            &rails,
            &normal,
            &frame.travel,
            params.plates.thickness,
            &mut warnings,
        );
        builder.append(&plate);
    }

    LandingPlate {
        landing: landing.index,
        mesh: builder.build(),
        warnings,
    }
}

/// Build every connector and landing plate of a laid-out stair
///
/// `sides` holds the inner side per tread. Runs are independent and built
/// in parallel; each reads only the immutable tread list. Landings that a run
/// starts from are covered by that run's plate and get no plate of their own.
pub fn build_plates(layout: &TreadLayout, sides: &[RailingSide], params: &PlateParams) -> PlateSet {
    let treads = layout.treads();
    let runs = layout.runs();
    let inner_is_right = |tread: usize| {
        sides
            .get(tread)
            .copied()
            .unwrap_or(RailingSide::Right)
            .is_right()
    };

    let jobs: Vec<(usize, &StepRun, PlateSide)> = runs
        .iter()
        .enumerate()
        .flat_map(|(i, run)| PlateSide::BOTH.into_iter().map(move |side| (i, run, side)))
        .collect();

    let built: Vec<ConnectorPlate> = jobs
        .par_iter()
        .map(|(i, run, side)| {
            build_connector_plate(*i, run, treads, *side, inner_is_right(run.treads.start), params)
        })
        .collect();

    let mut set = PlateSet::default();
    for plate in built {
        set.warnings.extend(plate.warnings.iter().cloned());
        if !plate.mesh.is_empty() {
            set.connectors.push(plate);
        }
    }

    if params.plates.landing_plates {
        let prepended: Vec<usize> = runs
            .iter()
            .filter_map(|run| run.preceding_landing)
            .filter(|&i| treads[i].turn.is_none())
            .collect();
        for landing in treads.iter().filter(|t| t.is_landing) {
            if prepended.contains(&landing.index) {
                continue;
            }
            let plate = build_landing_plate(landing, inner_is_right(landing.index), params);
            set.warnings.extend(plate.warnings.iter().cloned());
            set.landings.push(plate);
        }
    }

    debug!(
        "Built {} connector plates and {} landing plates",
        set.connectors.len(),
        set.landings.len()
    );
    set
}
