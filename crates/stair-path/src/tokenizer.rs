// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Path token parsing using nom combinators

use crate::error::{PathError, Result};
use log::debug;
use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{digit1, multispace0},
    combinator::{all_consuming, opt},
    sequence::delimited,
    IResult, Parser,
};
use stair_model::{PathSegment, Turn, MAX_RUN_STEPS, MIN_RUN_STEPS};
use std::str::FromStr;

/// Token as written, before step-count policy is applied
#[derive(Clone, Copy, Debug, PartialEq)]
enum RawToken {
    Straight(u64),
    Landing(Option<Turn>),
}

// ============================================================================
// Parsing Primitives
// ============================================================================

/// Parse a straight run (s12)
fn straight(input: &str) -> IResult<&str, RawToken> {
    let (input, _) = tag_no_case("s")(input)?;
    let (input, digits) = digit1(input)?;
    // Digit strings too long for u64 saturate; they clamp to the maximum anyway
    let steps: u64 = lexical_core::parse(digits.as_bytes()).unwrap_or(u64::MAX);
    Ok((input, RawToken::Straight(steps)))
}

/// Parse a turn suffix (r / l)
fn turn(input: &str) -> IResult<&str, Turn> {
    let (input, side) = alt((tag_no_case("r"), tag_no_case("l"))).parse(input)?;
    let turn = if side.eq_ignore_ascii_case("r") {
        Turn::Right
    } else {
        Turn::Left
    };
    Ok((input, turn))
}

/// Parse a landing (l, lr, ll)
fn landing(input: &str) -> IResult<&str, RawToken> {
    let (input, _) = tag_no_case("l")(input)?;
    let (input, turn) = opt(turn).parse(input)?;
    Ok((input, RawToken::Landing(turn)))
}

/// Parse exactly one token, surrounding whitespace allowed
fn raw_token(input: &str) -> IResult<&str, RawToken> {
    all_consuming(delimited(multispace0, alt((straight, landing)), multispace0)).parse(input)
}

// ============================================================================
// Public API
// ============================================================================

/// Decode a comma-separated path string
///
/// Step counts are clamped to the supported range and unparseable tokens are
/// skipped. Returns `None` when no valid token remains; callers fall back to a
/// default flight (see [`decode_or_default`](crate::decode_or_default)).
pub fn decode(input: &str) -> Option<Vec<PathSegment>> {
    let segments: Vec<PathSegment> = input
        .split(',')
        .filter(|token| !token.trim().is_empty())
        .filter_map(|token| match raw_token(token) {
            Ok((_, RawToken::Straight(steps))) => {
                let clamped = steps.clamp(MIN_RUN_STEPS as u64, MAX_RUN_STEPS as u64) as u32;
                Some(PathSegment::Straight { steps: clamped })
            }
            Ok((_, RawToken::Landing(turn))) => Some(PathSegment::Landing { turn }),
            Err(_) => {
                debug!("Skipping unparseable path token '{}'", token.trim());
                None
            }
        })
        .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

/// A single path token with strict parsing
///
/// Unlike [`decode`], parsing rejects unknown tokens and out-of-range step
/// counts instead of repairing them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PathToken(pub PathSegment);

impl FromStr for PathToken {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(PathError::Empty);
        }
        let (_, raw) = raw_token(s).map_err(|_| PathError::unknown(s.trim()))?;
        let segment = match raw {
            RawToken::Straight(steps) => {
                let steps = u32::try_from(steps).unwrap_or(u32::MAX);
                PathSegment::try_straight(steps)?
            }
            RawToken::Landing(turn) => PathSegment::Landing { turn },
        };
        Ok(PathToken(segment))
    }
}

impl From<PathSegment> for PathToken {
    fn from(segment: PathSegment) -> Self {
        PathToken(segment)
    }
}
