// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Laid-out treads (steps and landings)
//!
//! Yaw angles are rotations about +Y in a right-handed, Y-up world: a yaw of
//! `a` maps local +X to `(cos a, 0, -sin a)` and local +Z to `(sin a, 0, cos a)`.

use crate::path::Turn;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// World axis a tread's run is most aligned with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    /// Axis closest to a travel yaw
    #[inline]
    pub fn from_yaw(yaw: f64) -> Self {
        if yaw.cos().abs() > 0.5 {
            Axis::X
        } else {
            Axis::Z
        }
    }

    /// Unit vector of the axis
    #[inline]
    pub fn unit(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Z => Vector3::z(),
        }
    }
}

/// World direction local +X points to under `yaw`
#[inline]
pub fn yaw_forward(yaw: f64) -> Vector3<f64> {
    Vector3::new(yaw.cos(), 0.0, -yaw.sin())
}

/// World direction local +Z points to under `yaw`
#[inline]
pub fn yaw_side(yaw: f64) -> Vector3<f64> {
    Vector3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Rotate a local vector about +Y by `yaw`
#[inline]
pub fn rotate_yaw(local: &Vector3<f64>, yaw: f64) -> Vector3<f64> {
    let (s, c) = yaw.sin_cos();
    Vector3::new(local.x * c + local.z * s, local.y, -local.x * s + local.z * c)
}

/// Position plus yaw: the transform the renderer applies to a node
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Point3<f64>,
    pub yaw: f64,
}

impl Placement {
    /// Create a placement
    pub fn new(position: Point3<f64>, yaw: f64) -> Self {
        Self { position, yaw }
    }

    /// Identity placement (world-space geometry)
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            yaw: 0.0,
        }
    }

    /// Map a local point into world space
    #[inline]
    pub fn to_world(&self, local: &Point3<f64>) -> Point3<f64> {
        self.position + rotate_yaw(&local.coords, self.yaw)
    }

    /// Map a world point into local space
    #[inline]
    pub fn to_local(&self, world: &Point3<f64>) -> Point3<f64> {
        Point3::from(rotate_yaw(&(world - self.position), -self.yaw))
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

/// One step or landing, produced in walking order by the layout engine
///
/// The schema is shared with non-geometry consumers (price, railing UI), so
/// it is recomputed wholesale and never mutated in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tread {
    /// Walking-order index among all treads
    pub index: usize,
    /// Slab center at mid-height
    pub position: Point3<f64>,
    /// Render yaw of the tread's local frame
    pub rotation: f64,
    /// Yaw of the walking direction when entering the tread
    pub heading: f64,
    /// Footprint length along the walking direction
    pub run: f64,
    /// Landing or step
    pub is_landing: bool,
    /// Direction change, landings only
    pub turn: Option<Turn>,
    /// Flight index (landings carry the preceding flight)
    pub flight: usize,
    /// World axis the run is aligned with
    pub axis: Axis,
    /// Number of rises below this tread
    pub level: usize,
    /// Index among steps, `None` for landings
    pub step_index: Option<usize>,
    /// Index among landings, `None` for steps
    pub landing_index: Option<usize>,
}

impl Tread {
    /// Placement of the tread's local frame
    #[inline]
    pub fn placement(&self) -> Placement {
        Placement::new(self.position, self.rotation)
    }

    /// World walking direction
    #[inline]
    pub fn travel(&self) -> Vector3<f64> {
        yaw_forward(self.heading)
    }

    /// World direction to the walker's right
    #[inline]
    pub fn right(&self) -> Vector3<f64> {
        yaw_side(self.heading)
    }

    /// Map a local point into world space
    #[inline]
    pub fn to_world(&self, local: &Point3<f64>) -> Point3<f64> {
        self.placement().to_world(local)
    }

    /// Check whether this is a turning landing
    #[inline]
    pub fn is_turning_landing(&self) -> bool {
        self.is_landing && self.turn.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_yaw_conventions() {
        let fwd = yaw_forward(-FRAC_PI_2);
        assert_relative_eq!(fwd, Vector3::z(), epsilon = 1e-12);

        // Walking +X, the right hand points to +Z
        assert_relative_eq!(yaw_side(0.0), Vector3::z(), epsilon = 1e-12);
        // Walking +Z, the right hand points to -X
        assert_relative_eq!(yaw_side(-FRAC_PI_2), -Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_matches_basis() {
        let yaw = 0.7;
        let v = Vector3::new(2.0, 1.0, -3.0);
        let expected = yaw_forward(yaw) * 2.0 + Vector3::y() + yaw_side(yaw) * -3.0;
        assert_relative_eq!(rotate_yaw(&v, yaw), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_placement_round_trip() {
        let placement = Placement::new(Point3::new(1.0, 2.0, 3.0), 1.2);
        let local = Point3::new(0.3, -0.1, 0.5);
        let world = placement.to_world(&local);
        assert_relative_eq!(placement.to_local(&world), local, epsilon = 1e-12);
    }

    #[test]
    fn test_axis_from_yaw() {
        assert_eq!(Axis::from_yaw(0.0), Axis::X);
        assert_eq!(Axis::from_yaw(std::f64::consts::PI), Axis::X);
        assert_eq!(Axis::from_yaw(-FRAC_PI_2), Axis::Z);
        assert_eq!(Axis::from_yaw(FRAC_PI_2), Axis::Z);
    }
}
