// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Legacy shape presets and default fallback

use crate::tokenizer::decode;
use log::warn;
use stair_model::{PathSegment, StairShape, Turn};

/// Step count of the fallback flight
pub const DEFAULT_FLIGHT_STEPS: u32 = 10;

/// Smallest total step count accepted by the shape picker
pub const MIN_SHAPE_STEPS: u32 = 2;

/// Largest total step count accepted by the shape picker
pub const MAX_SHAPE_STEPS: u32 = 50;

/// Expand a canned shape with a total step count into path segments
///
/// L and U split the steps between two flights, the first one taking the odd
/// step. Both turn right.
pub fn expand_shape(shape: StairShape, steps: u32) -> Vec<PathSegment> {
    let steps = steps.clamp(MIN_SHAPE_STEPS, MAX_SHAPE_STEPS);
    let first = steps.div_ceil(2);
    let second = steps / 2;
    let turn = PathSegment::landing(Some(Turn::Right));

    match shape {
        StairShape::Straight => {
            // A single run longer than the per-run cap is split by a flat landing
            let mut path = Vec::new();
            let mut remaining = steps;
            while remaining > 0 {
                let run = remaining.min(stair_model::MAX_RUN_STEPS);
                if !path.is_empty() {
                    path.push(PathSegment::landing(None));
                }
                path.push(PathSegment::straight(run));
                remaining -= run;
            }
            path
        }
        StairShape::L => vec![
            PathSegment::straight(first),
            turn,
            PathSegment::straight(second),
        ],
        StairShape::U => vec![
            PathSegment::straight(first),
            turn,
            turn,
            PathSegment::straight(second),
        ],
    }
}

/// Decode a token string, falling back to a single straight flight
pub fn decode_or_default(input: &str) -> Vec<PathSegment> {
    decode(input).unwrap_or_else(|| {
        warn!(
            "Path '{}' has no valid tokens, using s{}",
            input, DEFAULT_FLIGHT_STEPS
        );
        vec![PathSegment::straight(DEFAULT_FLIGHT_STEPS)]
    })
}
