// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-tread railing toggles and side preferences
//!
//! Arrays are indexed in walking order, restricted to steps or landings
//! respectively. They are resynchronized to the tread list whenever the path
//! changes; user overrides survive as long as their index is still valid.

use crate::path::Turn;
use crate::tread::Tread;
use serde::{Deserialize, Serialize};

/// Side of the walking direction a railing is mounted on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RailingSide {
    Left,
    Right,
}

impl RailingSide {
    /// Side matching a turn direction (the inner side of that turn)
    #[inline]
    pub fn inner_of(turn: Turn) -> Self {
        match turn {
            Turn::Left => RailingSide::Left,
            Turn::Right => RailingSide::Right,
        }
    }

    #[inline]
    pub fn is_right(self) -> bool {
        self == RailingSide::Right
    }
}

/// Where cable railings start
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CableAnchor {
    /// On the tread's walking surface
    #[default]
    TreadTop,
    /// At the absolute floor level
    Floor,
}

/// Railing toggles, sides and cable anchors for every step and landing
///
/// Sides set through [`set_step_side`](Self::set_step_side) or
/// [`set_landing_side`](Self::set_landing_side) are user overrides and survive
/// resyncs; every other side is recomputed from the current turns.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RailingState {
    pub step_enabled: Vec<bool>,
    pub landing_enabled: Vec<bool>,
    pub step_sides: Vec<RailingSide>,
    pub landing_sides: Vec<RailingSide>,
    pub step_anchors: Vec<CableAnchor>,
    pub landing_anchors: Vec<CableAnchor>,
    /// Steps whose side the user chose
    #[serde(default)]
    pub step_side_overrides: Vec<bool>,
    /// Landings whose side the user chose
    #[serde(default)]
    pub landing_side_overrides: Vec<bool>,
}

impl RailingState {
    /// Create an empty state (every lookup yields defaults)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state already synchronized to a tread list
    pub fn for_treads(treads: &[Tread]) -> Self {
        let mut state = Self::new();
        state.resync(treads);
        state
    }

    /// Resize every array to the tread list and reapply side defaults
    ///
    /// Toggles, anchors and overridden sides keep their value while their
    /// index is still valid. New entries are enabled. Sides without an
    /// override move to the inner side of the nearest upcoming turn (the
    /// previous one when no turn follows, `Right` when the path never turns).
    pub fn resync(&mut self, treads: &[Tread]) {
        let defaults = default_sides(treads);
        let mut step_defaults = Vec::new();
        let mut landing_defaults = Vec::new();
        for (tread, side) in treads.iter().zip(defaults) {
            if tread.is_landing {
                landing_defaults.push(side);
            } else {
                step_defaults.push(side);
            }
        }

        resize_with_defaults(&mut self.step_enabled, step_defaults.len(), |_| true);
        resize_with_defaults(&mut self.landing_enabled, landing_defaults.len(), |_| true);
        resize_with_defaults(&mut self.step_anchors, step_defaults.len(), |_| {
            CableAnchor::default()
        });
        resize_with_defaults(&mut self.landing_anchors, landing_defaults.len(), |_| {
            CableAnchor::default()
        });
        apply_side_defaults(&mut self.step_sides, &mut self.step_side_overrides, &step_defaults);
        apply_side_defaults(
            &mut self.landing_sides,
            &mut self.landing_side_overrides,
            &landing_defaults,
        );
    }

    /// Pin the side of a step; ignored past the end of the synced arrays
    pub fn set_step_side(&mut self, step: usize, side: RailingSide) {
        if let Some(slot) = self.step_sides.get_mut(step) {
            *slot = side;
            set_flag(&mut self.step_side_overrides, step);
        }
    }

    /// Pin the side of a landing; ignored past the end of the synced arrays
    pub fn set_landing_side(&mut self, landing: usize, side: RailingSide) {
        if let Some(slot) = self.landing_sides.get_mut(landing) {
            *slot = side;
            set_flag(&mut self.landing_side_overrides, landing);
        }
    }

    /// Drop every side override; the next resync restores the defaults
    pub fn clear_side_overrides(&mut self) {
        self.step_side_overrides.clear();
        self.landing_side_overrides.clear();
    }

/// Toggle every step and landing at once (global railing switch)
    pub fn set_all(&mut self, enabled: bool) {
        self.step_enabled.iter_mut().for_each(|e| *e = enabled);
        self.landing_enabled.iter_mut().for_each(|e| *e = enabled);
    }

    /// Whether the railing is enabled for a tread; missing entries default to `true`
    pub fn enabled(&self, tread: &Tread) -> bool {
        match (tread.step_index, tread.landing_index) {
            (Some(i), _) => self.step_enabled.get(i).copied().unwrap_or(true),
            (None, Some(i)) => self.landing_enabled.get(i).copied().unwrap_or(true),
            (None, None) => true,
        }
    }

    /// Side for a tread; missing entries fall back to `fallback`
    pub fn side(&self, tread: &Tread, fallback: RailingSide) -> RailingSide {
        match (tread.step_index, tread.landing_index) {
            (Some(i), _) => self.step_sides.get(i).copied().unwrap_or(fallback),
            (None, Some(i)) => self.landing_sides.get(i).copied().unwrap_or(fallback),
            (None, None) => fallback,
        }
    }

    /// Cable anchor for a tread; missing entries default to the tread top
    pub fn anchor(&self, tread: &Tread) -> CableAnchor {
        match (tread.step_index, tread.landing_index) {
            (Some(i), _) => self.step_anchors.get(i).copied().unwrap_or_default(),
            (None, Some(i)) => self.landing_anchors.get(i).copied().unwrap_or_default(),
            (None, None) => CableAnchor::default(),
        }
    }
}

fn set_flag(flags: &mut Vec<bool>, index: usize) {
    if flags.len() <= index {
        flags.resize(index + 1, false);
    }
    flags[index] = true;
}

fn apply_side_defaults(
    sides: &mut Vec<RailingSide>,
    overrides: &mut Vec<bool>,
    defaults: &[RailingSide],
) {
    overrides.resize(defaults.len(), false);
    sides.truncate(defaults.len());
    for (i, default) in defaults.iter().enumerate() {
        if i >= sides.len() {
            sides.push(*default);
        } else if !overrides[i] {
            sides[i] = *default;
        }
    }
}

fn resize_with_defaults<T>(values: &mut Vec<T>, len: usize, default: impl Fn(usize) -> T) {
    values.truncate(len);
    let start = values.len();
    values.extend((start..len).map(default));
}

/// Inner side for every tread, from the nearest upcoming turn, else the previous one
pub fn default_sides(treads: &[Tread]) -> Vec<RailingSide> {
    let mut sides = vec![RailingSide::Right; treads.len()];

    let mut upcoming: Option<Turn> = None;
    let mut has_upcoming = vec![false; treads.len()];
    for (i, tread) in treads.iter().enumerate().rev() {
        if let Some(turn) = tread.turn {
            upcoming = Some(turn);
        }
        if let Some(turn) = upcoming {
            sides[i] = RailingSide::inner_of(turn);
            has_upcoming[i] = true;
        }
    }

    let mut previous: Option<Turn> = None;
    for (i, tread) in treads.iter().enumerate() {
        if !has_upcoming[i] {
            if let Some(turn) = previous {
                sides[i] = RailingSide::inner_of(turn);
            }
        }
        if let Some(turn) = tread.turn {
            previous = Some(turn);
        }
    }

    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tread::Axis;
    use nalgebra::Point3;

    fn tread(index: usize, landing: bool, turn: Option<Turn>, slot: usize) -> Tread {
        Tread {
            index,
            position: Point3::origin(),
            rotation: 0.0,
            heading: 0.0,
            run: 0.28,
            is_landing: landing,
            turn,
            flight: 0,
            axis: Axis::X,
            level: index,
            step_index: (!landing).then_some(slot),
            landing_index: landing.then_some(slot),
        }
    }

    fn l_shape() -> Vec<Tread> {
        vec![
            tread(0, false, None, 0),
            tread(1, false, None, 1),
            tread(2, true, Some(Turn::Left), 0),
            tread(3, false, None, 2),
        ]
    }

    #[test]
    fn test_default_sides_follow_turns() {
        let sides = default_sides(&l_shape());
        assert_eq!(sides[0], RailingSide::Left);
        assert_eq!(sides[2], RailingSide::Left);
        // After the last turn, fall back to the previous one
        assert_eq!(sides[3], RailingSide::Left);
    }

    #[test]
    fn test_default_sides_without_turns() {
        let treads = vec![tread(0, false, None, 0), tread(1, true, None, 0)];
        assert_eq!(default_sides(&treads), vec![RailingSide::Right; 2]);
    }

    #[test]
    fn test_resync_preserves_overrides() {
        let treads = l_shape();
        let mut state = RailingState::for_treads(&treads);
        assert_eq!(state.step_enabled.len(), 3);
        assert_eq!(state.landing_enabled.len(), 1);

        state.step_enabled[1] = false;
        state.set_step_side(0, RailingSide::Right);

        let mut longer = treads.clone();
        longer.push(tread(4, false, None, 3));
        state.resync(&longer);

        assert_eq!(state.step_enabled, vec![true, false, true, true]);
        assert_eq!(state.step_sides[0], RailingSide::Right);

        state.resync(&longer[..2]);
        assert_eq!(state.step_enabled, vec![true, false]);
        assert!(state.landing_enabled.is_empty());
        assert_eq!(state.step_side_overrides, vec![true, false]);
    }

    #[test]
    fn test_resync_recomputes_untouched_sides() {
        let left_turn = l_shape();
        let mut right_turn = l_shape();
        right_turn[2].turn = Some(Turn::Right);

        let mut state = RailingState::for_treads(&left_turn);
        state.set_landing_side(0, RailingSide::Left);
        state.resync(&right_turn);

        let fresh = RailingState::for_treads(&right_turn);
        assert_eq!(state.step_sides, fresh.step_sides);
        assert_eq!(state.step_sides, vec![RailingSide::Right; 3]);
        // The pinned landing keeps its side
        assert_eq!(state.landing_sides, vec![RailingSide::Left]);

        state.clear_side_overrides();
        state.resync(&right_turn);
        assert_eq!(state, fresh);
    }

    #[test]
    fn test_side_override_out_of_range_ignored() {
        let mut state = RailingState::for_treads(&l_shape());
        state.set_step_side(7, RailingSide::Left);
        assert_eq!(state.step_sides.len(), 3);
        assert_eq!(state.step_side_overrides, vec![false; 3]);
    }

    #[test]
    fn test_stale_arrays_default() {
        let treads = l_shape();
        let state = RailingState::new();
        assert!(state.enabled(&treads[3]));
        assert_eq!(state.side(&treads[3], RailingSide::Left), RailingSide::Left);
        assert_eq!(state.anchor(&treads[2]), CableAnchor::TreadTop);
    }

    #[test]
    fn test_set_all() {
        let mut state = RailingState::for_treads(&l_shape());
        state.set_all(false);
        assert!(state.step_enabled.iter().all(|e| !e));
        assert!(state.landing_enabled.iter().all(|e| !e));
    }
}
