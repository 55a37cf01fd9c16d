// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stair Path - Compact path token codec
//!
//! Shareable configurator URLs carry the walking path as a comma-separated
//! token string:
//!
//! | token | meaning                    |
//! |-------|----------------------------|
//! | `sN`  | straight run of N steps    |
//! | `l`   | landing, no turn           |
//! | `lr`  | landing turning right      |
//! | `ll`  | landing turning left       |
//!
//! # Features
//!
//! - **Lenient decoding** using `nom` combinators: whitespace and case are
//!   ignored, step counts are clamped to 1..=25 and unparseable tokens are
//!   skipped
//! - **Strict single-token parsing** through [`PathToken`]'s `FromStr`
//! - **Legacy shapes** (straight, L, U) expanded to segment lists
//!
//! # Example
//!
//! ```ignore
//! use stair_path::{decode, encode};
//!
//! let path = decode("s8, lr, s3, ll, s2").unwrap();
//! assert_eq!(encode(&path), "s8,lr,s3,ll,s2");
//! ```

mod encoder;
mod error;
mod shapes;
mod tokenizer;

pub use encoder::{encode, StairPath};
pub use error::{PathError, Result};
pub use shapes::{decode_or_default, expand_shape, DEFAULT_FLIGHT_STEPS, MAX_SHAPE_STEPS, MIN_SHAPE_STEPS};
pub use tokenizer::{decode, PathToken};

#[cfg(test)]
mod tests {
    use super::*;
    use stair_model::{PathSegment, Turn, MAX_RUN_STEPS, MIN_RUN_STEPS};

    #[test]
    fn test_mixed_path_round_trip() {
        let first = decode("s8,lr,s3,ll,s2").unwrap();
        assert_eq!(
            first,
            vec![
                PathSegment::Straight { steps: 8 },
                PathSegment::Landing { turn: Some(Turn::Right) },
                PathSegment::Straight { steps: 3 },
                PathSegment::Landing { turn: Some(Turn::Left) },
                PathSegment::Straight { steps: 2 },
            ]
        );

        let encoded = encode(&first);
        assert_eq!(encoded, "s8,lr,s3,ll,s2");
        assert_eq!(decode(&encoded).unwrap(), first);
    }

    #[test]
    fn test_round_trip_every_segment_kind() {
        let mut segments: Vec<PathSegment> = (MIN_RUN_STEPS..=MAX_RUN_STEPS)
            .map(|steps| PathSegment::Straight { steps })
            .collect();
        segments.push(PathSegment::Landing { turn: None });
        segments.push(PathSegment::Landing { turn: Some(Turn::Left) });
        segments.push(PathSegment::Landing { turn: Some(Turn::Right) });

        // Interleave so landings appear between runs too
        let mut path = Vec::new();
        for (i, segment) in segments.iter().enumerate() {
            path.push(*segment);
            path.push(segments[(i * 7 + 3) % segments.len()]);
        }

        assert_eq!(decode(&encode(&path)).unwrap(), path);
    }
}
