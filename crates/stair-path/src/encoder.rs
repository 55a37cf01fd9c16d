// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Path token encoding

use crate::error::{PathError, Result};
use crate::tokenizer::{decode, PathToken};
use stair_model::{PathSegment, Turn};
use std::fmt;
use std::str::FromStr;

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            PathSegment::Straight { steps } => write!(f, "s{}", steps),
            PathSegment::Landing { turn: None } => f.write_str("l"),
            PathSegment::Landing {
                turn: Some(Turn::Right),
            } => f.write_str("lr"),
            PathSegment::Landing {
                turn: Some(Turn::Left),
            } => f.write_str("ll"),
        }
    }
}

/// Encode a path as a comma-separated token string
pub fn encode(path: &[PathSegment]) -> String {
    let mut out = String::with_capacity(path.len() * 4);
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&PathToken(*segment).to_string());
    }
    out
}

/// An owned walking path that formats and parses as its token string
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct StairPath(pub Vec<PathSegment>);

impl StairPath {
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn into_segments(self) -> Vec<PathSegment> {
        self.0
    }
}

impl From<Vec<PathSegment>> for StairPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        StairPath(segments)
    }
}

impl fmt::Display for StairPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(&self.0))
    }
}

impl FromStr for StairPath {
    type Err = PathError;

    /// Lenient decode; fails only when nothing valid remains
    fn from_str(s: &str) -> Result<Self> {
        decode(s).map(StairPath).ok_or(PathError::Empty)
    }
}
