// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local frame resolver
//!
//! Every builder asks this module which local face is front or back, which
//! local side is inner, and how face textures are oriented. Steps render in
//! their travel frame; landings render axis-snapped (yaw 0 or -PI/2), so on a
//! landing the travel direction and the walker's right can point against the
//! local axes. Two sign conventions are kept on purpose:
//!
//! - the first flight's facing sign is negated, so texture flips start from a
//!   fixed reference direction;
//! - on landings the right-hand sign follows the render frame, which flips it
//!   for landings heading along -X or -Z.
//!
//! Texture grain wraps over the tread edges: a vertical face gets a quarter
//! turn when the top's grain runs into it rather than along it.

use crate::numeric::sign;
use serde::{Deserialize, Serialize};
use nalgebra::Vector3;
use stair_model::{rotate_yaw, yaw_forward, yaw_side, Axis, Tread};

/// Resolved orientation of one tread
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalFrame {
    /// World axis of the run
    pub axis: Axis,
    /// Render yaw of the tread the frame belongs to
    pub rotation: f64,
    /// Sign of the travel direction along `axis`
    pub forward_sign: f64,
    /// `forward_sign`, negated on the first flight
    pub facing_sign: f64,
    /// Sign of the travel direction along local x
    pub along: f64,
    /// Sign of the walker's right along local z
    pub right_local: f64,
    /// Local z sign of the inner side
    pub inner_sign_local: f64,
    /// Quarter turn of textures on horizontal faces
    pub rotate_top: bool,
    /// Quarter turn of textures on front and back faces
    pub rotate_front_back: bool,
    /// Quarter turn of textures on side faces
    pub rotate_sides: bool,
    /// Mirror textures on front and back faces
    pub flip_front_back: bool,
    /// Mirror textures on side faces
    pub flip_sides: bool,
}

impl LocalFrame {
    /// Local x of the front (nosing) face plane for a run length
    #[inline]
    pub fn front_x(&self, run: f64) -> f64 {
        -self.along * run / 2.0
    }

    /// Local x of the back face plane
    #[inline]
    pub fn back_x(&self, run: f64) -> f64 {
        self.along * run / 2.0
    }

    /// Local z of the inner side at a half-width
    #[inline]
    pub fn inner_z(&self, half_width: f64) -> f64 {
        self.inner_sign_local * half_width
    }

    /// Local z of the walker's right or left at a half-width
    #[inline]
    pub fn side_z(&self, right: bool, half_width: f64) -> f64 {
        if right {
            self.right_local * half_width
        } else {
            -self.right_local * half_width
        }
    }

    /// World direction of a local vector
    #[inline]
    pub fn to_world(&self, local: &Vector3<f64>) -> Vector3<f64> {
        rotate_yaw(local, self.rotation)
    }

    /// World direction of travel
    pub fn forward_world(&self) -> Vector3<f64> {
        yaw_forward(self.rotation) * self.along
    }

    /// World direction of the walker's right or left
    pub fn side_world(&self, right: bool) -> Vector3<f64> {
        yaw_side(self.rotation) * self.side_z(right, 1.0)
    }

    /// World direction of the inner side
    pub fn inner_world(&self) -> Vector3<f64> {
        yaw_side(self.rotation) * self.inner_sign_local
    }

    /// Whether the walker's right (or left) is the inner side
    #[inline]
    pub fn is_inner(&self, right: bool) -> bool {
        self.side_z(right, 1.0) == self.inner_sign_local
    }
}

/// Resolve the local frame of a tread
pub fn resolve_frame(tread: &Tread, inner_is_right: bool) -> LocalFrame {
    let axis = Axis::from_yaw(tread.heading);
    let travel = yaw_forward(tread.heading);
    let right = yaw_side(tread.heading);
    let local_x = yaw_forward(tread.rotation);
    let local_z = yaw_side(tread.rotation);

    let forward_sign = sign(travel.dot(&axis.unit()));
    let facing_sign = if tread.flight == 0 {
        -forward_sign
    } else {
        forward_sign
    };
    let along = sign(travel.dot(&local_x));
    let right_local = sign(right.dot(&local_z));
    let inner_sign_local = if inner_is_right {
        right_local
    } else {
        -right_local
    };

    // Steps carry grain across the run; turning landings along local x
    let rotate_top = !tread.is_turning_landing();

    LocalFrame {
        axis,
        rotation: tread.rotation,
        forward_sign,
        facing_sign,
        along,
        right_local,
        inner_sign_local,
        rotate_top,
        rotate_front_back: !rotate_top,
        rotate_sides: rotate_top,
        flip_front_back: facing_sign < 0.0,
        flip_sides: right_local < 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dimensions;
    use crate::layout::TreadLayout;
    use stair_path::decode;

    fn treads(tokens: &str) -> Vec<Tread> {
        TreadLayout::compute(&decode(tokens).unwrap(), &Dimensions::default()).into_treads()
    }

    #[test]
    fn test_steps_use_travel_frame() {
        for tread in treads("s3,lr,s3,lr,s3,lr,s3").iter().filter(|t| !t.is_landing) {
            let frame = resolve_frame(tread, true);
            assert_eq!(frame.along, 1.0);
            assert_eq!(frame.right_local, 1.0);
            assert_eq!(frame.inner_sign_local, 1.0);
            assert_eq!(frame.axis, tread.axis);
            assert!(frame.rotate_top);
        }
    }

    #[test]
    fn test_first_flight_facing_negated() {
        let treads = treads("s2,lr,s2");
        let first = resolve_frame(&treads[0], true);
        assert_eq!(first.forward_sign, 1.0);
        assert_eq!(first.facing_sign, -1.0);
        assert!(first.flip_front_back);

        // Second flight heads +Z
        let second = resolve_frame(&treads[3], true);
        assert_eq!(second.forward_sign, 1.0);
        assert_eq!(second.facing_sign, 1.0);
        assert!(!second.flip_front_back);
    }

    #[test]
    fn test_reversed_landing_flips_sides() {
        // U-turn then a straight landing heading -X
        let treads = treads("s1,lr,lr,s1,l,s1");
        let landing = &treads[4];
        assert!(landing.is_landing && landing.turn.is_none());

        let frame = resolve_frame(landing, true);
        assert_eq!(frame.forward_sign, -1.0);
        assert_eq!(frame.along, -1.0);
        assert_eq!(frame.right_local, -1.0);
        assert!(frame.flip_sides);
        // Inner side of a right-turning stair is local -z here
        assert_eq!(frame.inner_sign_local, -1.0);
        assert_eq!(resolve_frame(landing, false).inner_sign_local, 1.0);
    }

    #[test]
    fn test_inner_side_is_same_world_side() {
        // The inner side resolved in local space must map to the same world
        // side as the walker's right whenever the inner side is right.
        for tread in &treads("s2,lr,s2,l,s2,lr,l,s2") {
            let frame = resolve_frame(tread, true);
            let inner_world = yaw_side(tread.rotation) * frame.inner_sign_local;
            let right_world = tread.right();
            assert!(inner_world.dot(&right_world) > 0.99);
        }
    }

    #[test]
    fn test_turning_landing_keeps_grain() {
        let treads = treads("s2,ll,s2");
        let frame = resolve_frame(&treads[2], false);
        assert!(!frame.rotate_top);
        assert!(frame.rotate_front_back);
        assert!(!frame.rotate_sides);

        let step = resolve_frame(&treads[0], false);
        assert!(!step.rotate_front_back);
        assert!(step.rotate_sides);
    }

    #[test]
    fn test_world_directions_match_tread() {
        for tread in &treads("s2,lr,s2,l,s2,ll,l,s2,lr,lr,s1") {
            for inner_is_right in [true, false] {
                let frame = resolve_frame(tread, inner_is_right);
                assert!(frame.forward_world().dot(&tread.travel()) > 0.99);
                assert!(frame.side_world(true).dot(&tread.right()) > 0.99);
                assert!(frame.side_world(false).dot(&tread.right()) < -0.99);
                let inner = if inner_is_right { tread.right() } else { -tread.right() };
                assert!(frame.inner_world().dot(&inner) > 0.99);
                assert!(frame.is_inner(inner_is_right));
                assert!(!frame.is_inner(!inner_is_right));
            }
        }
    }
}
