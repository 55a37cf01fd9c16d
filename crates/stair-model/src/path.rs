// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Declarative walking path

use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};

/// Smallest step count of a straight run
pub const MIN_RUN_STEPS: u32 = 1;

/// Largest step count of a straight run (UI constraint)
pub const MAX_RUN_STEPS: u32 = 25;

/// Direction change at a landing, seen by someone walking up the stair
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    Left,
    Right,
}

impl Turn {
    /// Rotate a direction index (0:+X, 1:+Z, 2:-X, 3:-Z) by this turn
    #[inline]
    pub fn apply(self, direction: usize) -> usize {
        match self {
            Turn::Right => (direction + 1) % 4,
            Turn::Left => (direction + 3) % 4,
        }
    }
}

/// One element of the walking path, in walking order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// Straight run of `steps` unit steps
    Straight { steps: u32 },
    /// Square landing, optionally changing direction
    Landing { turn: Option<Turn> },
}

impl PathSegment {
    /// Straight run, clamped to the supported step range
    pub fn straight(steps: u32) -> Self {
        PathSegment::Straight {
            steps: steps.clamp(MIN_RUN_STEPS, MAX_RUN_STEPS),
        }
    }

    /// Landing with an optional turn
    pub fn landing(turn: Option<Turn>) -> Self {
        PathSegment::Landing { turn }
    }

    /// Straight run without clamping, rejecting out-of-range counts
    pub fn try_straight(steps: u32) -> Result<Self> {
        if !(MIN_RUN_STEPS..=MAX_RUN_STEPS).contains(&steps) {
            return Err(ModelError::segment(format!(
                "straight run must have {}..={} steps, got {}",
                MIN_RUN_STEPS, MAX_RUN_STEPS, steps
            )));
        }
        Ok(PathSegment::Straight { steps })
    }

    /// Number of treads this segment expands into
    #[inline]
    pub fn tread_count(&self) -> usize {
        match self {
            PathSegment::Straight { steps } => *steps as usize,
            PathSegment::Landing { .. } => 1,
        }
    }

    /// Check whether this is a turning landing
    #[inline]
    pub fn is_turn(&self) -> bool {
        matches!(self, PathSegment::Landing { turn: Some(_) })
    }
}

/// Canned layouts from the original storefront shape picker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StairShape {
    /// One straight flight
    Straight,
    /// Two flights joined by a right-turning landing
    L,
    /// Two flights joined by two right-turning landings
    U,
}

/// Total number of steps (landings excluded) along a path
pub fn count_steps(path: &[PathSegment]) -> usize {
    path.iter()
        .map(|segment| match segment {
            PathSegment::Straight { steps } => *steps as usize,
            PathSegment::Landing { .. } => 0,
        })
        .sum()
}

/// Total number of landings along a path
pub fn count_landings(path: &[PathSegment]) -> usize {
    path.iter()
        .filter(|segment| matches!(segment, PathSegment::Landing { .. }))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_apply() {
        assert_eq!(Turn::Right.apply(0), 1);
        assert_eq!(Turn::Right.apply(3), 0);
        assert_eq!(Turn::Left.apply(0), 3);
        assert_eq!(Turn::Left.apply(1), 0);
    }

    #[test]
    fn test_straight_clamps() {
        assert_eq!(PathSegment::straight(0), PathSegment::Straight { steps: 1 });
        assert_eq!(PathSegment::straight(40), PathSegment::Straight { steps: 25 });
        assert!(PathSegment::try_straight(0).is_err());
        assert!(PathSegment::try_straight(12).is_ok());
    }

    #[test]
    fn test_counts() {
        let path = vec![
            PathSegment::straight(5),
            PathSegment::landing(Some(Turn::Right)),
            PathSegment::straight(4),
            PathSegment::landing(None),
        ];
        assert_eq!(count_steps(&path), 9);
        assert_eq!(count_landings(&path), 2);
        assert!(path[1].is_turn());
        assert!(!path[3].is_turn());
    }
}
