//! Per-line glitch filters.
//!
//! A line's stable value flips only after the raw sample has disagreed with it
//! for `threshold` consecutive ticks. Any agreeing sample clears the run.

use serde::{Deserialize, Serialize};

use crate::constants::BUTTON_COUNT;
use crate::input::ButtonVector;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debouncer {
    stable: bool,
    mismatch_run: u32,
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            stable: false,
            mismatch_run: 0,
        }
    }

    #[inline]
    pub fn stable(&self) -> bool {
        self.stable
    }

    #[inline]
    pub fn mismatch_run(&self) -> u32 {
        self.mismatch_run
    }

    /// Feeds one raw sample and returns the (possibly updated) stable value.
    pub fn sample(&mut self, raw: bool, threshold: u32) -> bool {
        if raw == self.stable {
            self.mismatch_run = 0;
            return self.stable;
        }

        self.mismatch_run += 1;
        if self.mismatch_run >= threshold {
            self.stable = raw;
            self.mismatch_run = 0;
        }
        self.stable
    }
}

/// What the bank reports after one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DebouncedButtons {
    pub level: ButtonVector,
    pub pressed: ButtonVector,
}

/// Eight independent [`Debouncer`]s, one per button line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceBank {
    lines: [Debouncer; BUTTON_COUNT],
}

impl DebounceBank {
    pub const fn new() -> Self {
        Self {
            lines: [Debouncer::new(); BUTTON_COUNT],
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn level(&self) -> ButtonVector {
        self.lines
            .iter()
            .enumerate()
            .fold(ButtonVector::NONE, |acc, (i, line)| {
                acc.with(i as u8, line.stable())
            })
    }

    pub fn line(&self, index: usize) -> &Debouncer {
        &self.lines[index]
    }

    /// Filters one raw sample of all eight lines. `pressed` holds the lines
    /// whose stable value went from released to pressed on this tick.
    pub fn sample(&mut self, raw: ButtonVector, threshold: u32) -> DebouncedButtons {
        let before = self.level();
        for (i, line) in self.lines.iter_mut().enumerate() {
            line.sample(raw.is_pressed(i as u8), threshold);
        }
        let level = self.level();

        DebouncedButtons {
            level,
            pressed: level.rising_since(before),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: u32 = 4;

    fn feed(debouncer: &mut Debouncer, samples: &[bool]) -> bool {
        samples
            .iter()
            .fold(debouncer.stable(), |_, &raw| debouncer.sample(raw, THRESHOLD))
    }

    #[test]
    fn short_hold_never_flips_output() {
        let mut debouncer = Debouncer::new();
        for run in 1..THRESHOLD {
            for _ in 0..run {
                assert!(!debouncer.sample(true, THRESHOLD));
            }
            assert!(!debouncer.sample(false, THRESHOLD));
            assert_eq!(debouncer.mismatch_run(), 0);
        }
    }

    #[test]
    fn flips_on_the_threshold_tick() {
        let mut debouncer = Debouncer::new();
        assert!(!feed(&mut debouncer, &[true, true, true]));
        assert!(debouncer.sample(true, THRESHOLD));
        assert_eq!(debouncer.mismatch_run(), 0);
    }

    #[test]
    fn flicker_restarts_the_run() {
        let mut debouncer = Debouncer::new();
        assert!(!feed(&mut debouncer, &[true, true, true, false, true, true, true]));
        assert!(debouncer.sample(true, THRESHOLD));
    }

    #[test]
    fn release_is_filtered_the_same_way() {
        let mut debouncer = Debouncer::new();
        feed(&mut debouncer, &[true; 4]);
        assert!(feed(&mut debouncer, &[false, false, true, false, false, false]));
        assert!(!debouncer.sample(false, THRESHOLD));
    }

    #[test]
    fn bank_reports_rising_edge_once() {
        let mut bank = DebounceBank::new();
        let raw = ButtonVector::from_bits(0b0000_0100);

        for _ in 0..THRESHOLD - 1 {
            let out = bank.sample(raw, THRESHOLD);
            assert!(out.level.is_empty());
            assert!(out.pressed.is_empty());
        }

        let out = bank.sample(raw, THRESHOLD);
        assert_eq!(out.level, raw);
        assert_eq!(out.pressed, raw);

        let out = bank.sample(raw, THRESHOLD);
        assert_eq!(out.level, raw);
        assert!(out.pressed.is_empty());
    }

    #[test]
    fn bank_lines_are_independent() {
        let mut bank = DebounceBank::new();
        bank.sample(ButtonVector::from_bits(0b0000_0001), THRESHOLD);
        bank.sample(ButtonVector::from_bits(0b0000_0011), THRESHOLD);
        bank.sample(ButtonVector::from_bits(0b0000_0011), THRESHOLD);
        let out = bank.sample(ButtonVector::from_bits(0b0000_0011), THRESHOLD);
        assert_eq!(out.pressed.bits(), 0b0000_0001);
        assert_eq!(bank.line(1).mismatch_run(), 3);

        let out = bank.sample(ButtonVector::from_bits(0b0000_0011), THRESHOLD);
        assert_eq!(out.pressed.bits(), 0b0000_0010);
        assert_eq!(out.level.bits(), 0b0000_0011);
    }
}
