// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tread layout engine
//!
//! Walks the path with a cursor `(x, z, direction)` where the direction index
//! is 0:+X, 1:+Z, 2:-X, 3:-Z. The cursor always sits on the back edge center
//! of the next tread. Every tread, step or landing, is one riser above the
//! previous one.

use crate::config::Dimensions;
use log::debug;
use nalgebra::{Point3, Vector3};
use stair_model::{Axis, PathSegment, Tread};
use std::f64::consts::{FRAC_PI_2, PI};
use std::ops::Range;

/// World unit vector of a direction index
#[inline]
pub fn direction_vector(direction: usize) -> Vector3<f64> {
    match direction % 4 {
        0 => Vector3::x(),
        1 => Vector3::z(),
        2 => -Vector3::x(),
        _ => -Vector3::z(),
    }
}

/// Travel yaw of a direction index
#[inline]
pub fn direction_yaw(direction: usize) -> f64 {
    match direction % 4 {
        0 => 0.0,
        1 => -FRAC_PI_2,
        2 => PI,
        _ => FRAC_PI_2,
    }
}

/// Render yaw of an axis-snapped landing
#[inline]
fn landing_rotation(axis: Axis) -> f64 {
    match axis {
        Axis::X => 0.0,
        Axis::Z => -FRAC_PI_2,
    }
}

/// A maximal contiguous sequence of steps
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepRun {
    pub flight: usize,
    /// Tread indices of the steps
    pub treads: Range<usize>,
    /// Tread index of a landing right before the run
    pub preceding_landing: Option<usize>,
    /// Tread index of a landing right after the run
    pub following_landing: Option<usize>,
}

impl StepRun {
    #[inline]
    pub fn len(&self) -> usize {
        self.treads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.treads.is_empty()
    }
}

/// Laid-out treads plus the bookkeeping price and railing UI read
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreadLayout {
    treads: Vec<Tread>,
    /// Corner shared with the next flight, per landing index
    anchors: Vec<Option<Point3<f64>>>,
}

impl TreadLayout {
    /// Lay out a path
    pub fn compute(path: &[PathSegment], dims: &Dimensions) -> Self {
        let depth = dims.tread_depth;
        let width = dims.tread_width;

        let mut treads = Vec::with_capacity(path.iter().map(PathSegment::tread_count).sum());
        let mut anchors = Vec::new();

        let mut cursor = Point3::origin();
        let mut direction = 0usize;
        let mut flight = 0usize;
        let mut step_index = 0usize;
        let mut landing_index = 0usize;

        for segment in path {
            match *segment {
                PathSegment::Straight { steps } => {
                    let dir = direction_vector(direction);
                    let heading = direction_yaw(direction);
                    for _ in 0..steps {
                        let level = treads.len();
                        let center = cursor + dir * (depth / 2.0);
                        treads.push(Tread {
                            index: level,
                            position: Point3::new(center.x, level as f64 * dims.riser, center.z),
                            rotation: heading,
                            heading,
                            run: depth,
                            is_landing: false,
                            turn: None,
                            flight,
                            axis: Axis::from_yaw(heading),
                            level,
                            step_index: Some(step_index),
                            landing_index: None,
                        });
                        step_index += 1;
                        cursor += dir * depth;
                    }
                }
                PathSegment::Landing { turn } => {
                    let level = treads.len();
                    let dir = direction_vector(direction);
                    let heading = direction_yaw(direction);
                    let axis = Axis::from_yaw(heading);
                    let center = cursor + dir * (width / 2.0);

                    treads.push(Tread {
                        index: level,
                        position: Point3::new(center.x, level as f64 * dims.riser, center.z),
                        rotation: landing_rotation(axis),
                        heading,
                        run: width,
                        is_landing: true,
                        turn,
                        flight,
                        axis,
                        level,
                        step_index: None,
                        landing_index: Some(landing_index),
                    });
                    landing_index += 1;

                    match turn {
                        None => {
                            cursor += dir * width;
                            anchors.push(None);
                        }
                        Some(turn) => {
                            let next = turn.apply(direction);
                            let side = direction_vector(next);
                            // Far edge corner on the turn side
                            let corner = cursor + dir * width + side * (width / 2.0);
                            cursor = corner - dir * (width / 2.0);
                            direction = next;
                            flight += 1;
                            anchors.push(Some(Point3::new(
                                corner.x,
                                level as f64 * dims.riser,
                                corner.z,
                            )));
                        }
                    }
                }
            }
        }

        debug!(
            "Laid out {} treads ({} steps, {} landings, {} flights)",
            treads.len(),
            step_index,
            landing_index,
            flight + 1
        );

        Self { treads, anchors }
    }

    pub fn treads(&self) -> &[Tread] {
        &self.treads
    }

    pub fn into_treads(self) -> Vec<Tread> {
        self.treads
    }

    pub fn len(&self) -> usize {
        self.treads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.treads.is_empty()
    }

    pub fn step_count(&self) -> usize {
        self.treads.iter().filter(|t| !t.is_landing).count()
    }

    pub fn landing_count(&self) -> usize {
        self.treads.iter().filter(|t| t.is_landing).count()
    }

    /// Tread index ranges of each flight (landings included with their flight)
    pub fn flight_ranges(&self) -> Vec<Range<usize>> {
        let mut ranges: Vec<Range<usize>> = Vec::new();
        for (i, tread) in self.treads.iter().enumerate() {
            let same_flight = ranges
                .last()
                .is_some_and(|range| self.treads[range.start].flight == tread.flight);
            if same_flight {
                if let Some(range) = ranges.last_mut() {
                    range.end = i + 1;
                }
            } else {
                ranges.push(i..i + 1);
            }
        }
        ranges
    }

    /// Maximal contiguous step sequences with their neighbor landings
    pub fn runs(&self) -> Vec<StepRun> {
        let mut runs = Vec::new();
        let mut i = 0;
        while i < self.treads.len() {
            if self.treads[i].is_landing {
                i += 1;
                continue;
            }
            let start = i;
            while i < self.treads.len() && !self.treads[i].is_landing {
                i += 1;
            }
            runs.push(StepRun {
                flight: self.treads[start].flight,
                treads: start..i,
                preceding_landing: start.checked_sub(1),
                following_landing: (i < self.treads.len()).then_some(i),
            });
        }
        runs
    }

    /// Corner a turning landing shares with the next flight's first tread
    ///
    /// `landing` counts landings only. `None` for non-turning landings.
    pub fn landing_anchor(&self, landing: usize) -> Option<Point3<f64>> {
        self.anchors.get(landing).copied().flatten()
    }
}

/// Lay out a path and return the bare tread list
pub fn layout_treads(path: &[PathSegment], dims: &Dimensions) -> Vec<Tread> {
    TreadLayout::compute(path, dims).into_treads()
}

/// Back edge corners of a tread in world space (left, right of travel), at its center height
pub fn back_corners(tread: &Tread, width: f64) -> [Point3<f64>; 2] {
    let back = tread.position - tread.travel() * (tread.run / 2.0);
    let half = tread.right() * (width / 2.0);
    [back - half, back + half]
}
