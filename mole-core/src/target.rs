//! Mole selection.
//!
//! The controller only needs "give me the next lit segment", so selection is a
//! trait. Every strategy hands out [`TargetIndex`] values, which cannot hold 7
//! or above, so the range invariant does not depend on the strategy.
//!
//! Segment 0 sits on the restart button, which is ignored while a round is
//! running, so the built-in pseudo-random and rotating strategies only light
//! segments 1 to 6.

use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{RESTART_BUTTON, SEGMENT_COUNT};
use crate::rng::Xorshift32;

/// A segment position in `0..7`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TargetIndex(u8);

impl TargetIndex {
    pub const FIRST: Self = Self(0);
    pub const FIRST_PLAYABLE: Self = Self(1);

    pub const fn new(index: u8) -> Option<Self> {
        if index < SEGMENT_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// False for the segment whose button doubles as restart.
    pub const fn is_playable(self) -> bool {
        self.0 != RESTART_BUTTON
    }

    /// The playable target `steps` positions further on, wrapping within
    /// `1..7`. Segment 0 is treated as sitting just before segment 1.
    pub const fn offset_playable(self, steps: u8) -> Self {
        let from = if self.0 == 0 { 0 } else { self.0 as u16 - 1 };
        Self(1 + ((from + steps as u16) % PLAYABLE_COUNT as u16) as u8)
    }
}

const PLAYABLE_COUNT: u8 = SEGMENT_COUNT - 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidTarget(pub u8);

impl fmt::Display for InvalidTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target index {} is outside 0..{SEGMENT_COUNT}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidTarget {}

impl TryFrom<u8> for TargetIndex {
    type Error = InvalidTarget;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidTarget(value))
    }
}

impl From<TargetIndex> for u8 {
    fn from(target: TargetIndex) -> Self {
        target.0
    }
}

impl fmt::Display for TargetIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait TargetSource {
    /// Rewinds to the defined first value. Called on reset and restart.
    fn restart(&mut self);

    /// Picks the next mole. `current` is the mole being replaced, or `None`
    /// when a round is starting.
    fn next_target(&mut self, current: Option<TargetIndex>) -> TargetIndex;
}

impl<T: TargetSource + ?Sized> TargetSource for &mut T {
    fn restart(&mut self) {
        (**self).restart();
    }

    fn next_target(&mut self, current: Option<TargetIndex>) -> TargetIndex {
        (**self).next_target(current)
    }
}

/// Pseudo-random moles on segments 1 to 6 from a seeded xorshift stream. An
/// advance never lands on the segment that was just hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct XorshiftTargets {
    seed: u32,
    rng: Xorshift32,
}

impl XorshiftTargets {
    pub const fn new(seed: u32) -> Self {
        Self {
            seed,
            rng: Xorshift32::new(seed),
        }
    }
}

impl Default for XorshiftTargets {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_TARGET_SEED)
    }
}

impl TargetSource for XorshiftTargets {
    fn restart(&mut self) {
        self.rng = Xorshift32::new(self.seed);
    }

    fn next_target(&mut self, current: Option<TargetIndex>) -> TargetIndex {
        match current.filter(|c| c.is_playable()) {
            None => TargetIndex(1 + self.rng.next_below(PLAYABLE_COUNT)),
            Some(current) => current.offset_playable(1 + self.rng.next_below(PLAYABLE_COUNT - 1)),
        }
    }
}

/// Walks segments 1 to 6 in order with a fixed stride.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotatingTargets {
    start: TargetIndex,
    stride: u8,
}

impl RotatingTargets {
    /// `stride` is taken modulo 6; a stride of 0 is bumped to 1 so the target
    /// always moves. A start on segment 0 moves to segment 1.
    pub fn new(start: TargetIndex, stride: u8) -> Self {
        let stride = match stride % PLAYABLE_COUNT {
            0 => 1,
            s => s,
        };
        let start = if start.is_playable() {
            start
        } else {
            TargetIndex::FIRST_PLAYABLE
        };
        Self { start, stride }
    }
}

impl Default for RotatingTargets {
    fn default() -> Self {
        Self::new(TargetIndex::FIRST_PLAYABLE, 1)
    }
}

impl TargetSource for RotatingTargets {
    fn restart(&mut self) {}

    fn next_target(&mut self, current: Option<TargetIndex>) -> TargetIndex {
        match current {
            None => self.start,
            Some(current) => current.offset_playable(self.stride),
        }
    }
}

/// Plays back a fixed list of targets, cycling when it runs out. Mostly for
/// tests that need to know where the mole will be. A scripted mole on segment 0
/// cannot be hit and stays lit until the round ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptedTargets {
    script: Vec<TargetIndex>,
    cursor: usize,
}

impl ScriptedTargets {
    /// Returns `None` for an empty script.
    pub fn new(script: Vec<TargetIndex>) -> Option<Self> {
        if script.is_empty() {
            return None;
        }
        Some(Self { script, cursor: 0 })
    }

    /// Builds a script from raw indices, rejecting anything outside `0..7`.
    pub fn from_indices(indices: &[u8]) -> Result<Option<Self>, InvalidTarget> {
        let script = indices
            .iter()
            .map(|&i| TargetIndex::try_from(i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(script))
    }
}

impl TargetSource for ScriptedTargets {
    fn restart(&mut self) {
        self.cursor = 0;
    }

    fn next_target(&mut self, _current: Option<TargetIndex>) -> TargetIndex {
        let target = self.script[self.cursor];
        self.cursor = (self.cursor + 1) % self.script.len();
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_is_not_a_target() {
        assert!(TargetIndex::new(6).is_some());
        assert!(TargetIndex::new(7).is_none());
        assert_eq!(TargetIndex::try_from(9), Err(InvalidTarget(9)));
    }

    #[test]
    fn playable_offset_skips_segment_zero() {
        let six = TargetIndex::new(6).unwrap();
        assert_eq!(six.offset_playable(1), TargetIndex::FIRST_PLAYABLE);
        assert_eq!(six.offset_playable(6), six);
        assert_eq!(TargetIndex::FIRST.offset_playable(1).get(), 2);
        assert!(!TargetIndex::FIRST.is_playable());
    }

    #[test]
    fn xorshift_advance_always_moves_and_stays_in_range() {
        let mut source = XorshiftTargets::new(0xABCD_0123);
        let mut current = source.next_target(None);
        let mut seen = [false; 7];
        for _ in 0..10_000 {
            let next = source.next_target(Some(current));
            assert_ne!(next, current);
            assert!(next.get() < 7);
            seen[next.get() as usize] = true;
            current = next;
        }
        assert!(!seen[0], "segment 0 belongs to the restart button");
        assert!(seen[1..].iter().all(|&s| s), "every playable segment should come up");
    }

    #[test]
    fn xorshift_restart_replays_the_sequence() {
        let mut source = XorshiftTargets::new(42);
        let first: Vec<_> = (0..16).map(|_| source.next_target(None)).collect();
        source.restart();
        let second: Vec<_> = (0..16).map(|_| source.next_target(None)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn rotation_never_stands_still() {
        let mut source = RotatingTargets::new(TargetIndex::new(5).unwrap(), 7);
        let first = source.next_target(None);
        assert_eq!(first.get(), 5);
        let second = source.next_target(Some(first));
        assert_eq!(second.get(), 6);
        assert_eq!(source.next_target(Some(second)).get(), 1);

        let mut from_zero = RotatingTargets::new(TargetIndex::FIRST, 6);
        assert_eq!(from_zero.next_target(None), TargetIndex::FIRST_PLAYABLE);
    }

    #[test]
    fn script_cycles_and_restarts() {
        let mut source = ScriptedTargets::from_indices(&[3, 1])
            .unwrap()
            .unwrap();
        let picks: Vec<u8> = (0..3).map(|_| source.next_target(None).get()).collect();
        assert_eq!(picks, [3, 1, 3]);
        source.restart();
        assert_eq!(source.next_target(None).get(), 3);
    }

    #[test]
    fn script_rejects_seven() {
        assert_eq!(ScriptedTargets::from_indices(&[2, 7]), Err(InvalidTarget(7)));
        assert_eq!(ScriptedTargets::from_indices(&[]), Ok(None));
    }
}
