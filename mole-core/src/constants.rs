//! Build-time timing constants and fixed hardware dimensions.
//!
//! The `full-duration` feature selects real-time values for a 1 MHz clock.
//! Without it the short simulation values are used so that a whole round fits
//! in about a thousand ticks. The controller logic is identical in both builds.

use serde::Serialize;

pub const BUTTON_COUNT: usize = 8;
pub const SEGMENT_COUNT: u8 = 7;
pub const RESTART_BUTTON: u8 = 0;

pub const SEGMENT_MASK: u8 = 0x7F;
pub const DECIMAL_POINT: u8 = 0x80;

/// Active-low segment patterns for the digits 0-9 (bit 0 = segment a).
pub const DIGIT_PATTERNS: [u8; 10] = [
    0b100_0000, // 0
    0b111_1001, // 1
    0b010_0100, // 2
    0b011_0000, // 3
    0b001_1001, // 4
    0b001_0010, // 5
    0b000_0010, // 6
    0b111_1000, // 7
    0b000_0000, // 8
    0b001_0000, // 9
];

pub const DEFAULT_TARGET_SEED: u32 = 0x5EED_0A11;

pub const SIM_DEBOUNCE_CYCLES: u32 = 4;
pub const SIM_LOCK_CYCLES: u32 = 10;
pub const SIM_GAME_DURATION_CYCLES: u32 = 1_000;
pub const SIM_SCORE_BLINK_CYCLES: u32 = 500;

pub const FULL_DEBOUNCE_CYCLES: u32 = 4;
pub const FULL_LOCK_CYCLES: u32 = 1_000_000; // 1s @ 1 MHz
pub const FULL_GAME_DURATION_CYCLES: u32 = 15_000_000; // 15s @ 1 MHz
pub const FULL_SCORE_BLINK_CYCLES: u32 = 500_000; // 0.5s @ 1 MHz

#[cfg(not(feature = "full-duration"))]
pub const DEBOUNCE_CYCLES: u32 = SIM_DEBOUNCE_CYCLES;
#[cfg(not(feature = "full-duration"))]
pub const LOCK_CYCLES: u32 = SIM_LOCK_CYCLES;
#[cfg(not(feature = "full-duration"))]
pub const GAME_DURATION_CYCLES: u32 = SIM_GAME_DURATION_CYCLES;
#[cfg(not(feature = "full-duration"))]
pub const SCORE_BLINK_CYCLES: u32 = SIM_SCORE_BLINK_CYCLES;

#[cfg(feature = "full-duration")]
pub const DEBOUNCE_CYCLES: u32 = FULL_DEBOUNCE_CYCLES;
#[cfg(feature = "full-duration")]
pub const LOCK_CYCLES: u32 = FULL_LOCK_CYCLES;
#[cfg(feature = "full-duration")]
pub const GAME_DURATION_CYCLES: u32 = FULL_GAME_DURATION_CYCLES;
#[cfg(feature = "full-duration")]
pub const SCORE_BLINK_CYCLES: u32 = FULL_SCORE_BLINK_CYCLES;

/// The fixed timing constants a controller is built with.
///
/// Only the presets exist. A controller copies one at construction and never
/// changes it afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Timing {
    debounce_cycles: u32,
    lock_cycles: u32,
    game_duration_cycles: u32,
    score_blink_cycles: u32,
}

impl Timing {
    pub const SIMULATION: Self = Self {
        debounce_cycles: SIM_DEBOUNCE_CYCLES,
        lock_cycles: SIM_LOCK_CYCLES,
        game_duration_cycles: SIM_GAME_DURATION_CYCLES,
        score_blink_cycles: SIM_SCORE_BLINK_CYCLES,
    };

    pub const FULL: Self = Self {
        debounce_cycles: FULL_DEBOUNCE_CYCLES,
        lock_cycles: FULL_LOCK_CYCLES,
        game_duration_cycles: FULL_GAME_DURATION_CYCLES,
        score_blink_cycles: FULL_SCORE_BLINK_CYCLES,
    };

    pub const BUILD: Self = Self {
        debounce_cycles: DEBOUNCE_CYCLES,
        lock_cycles: LOCK_CYCLES,
        game_duration_cycles: GAME_DURATION_CYCLES,
        score_blink_cycles: SCORE_BLINK_CYCLES,
    };

    pub const fn debounce_cycles(&self) -> u32 {
        self.debounce_cycles
    }

    pub const fn lock_cycles(&self) -> u32 {
        self.lock_cycles
    }

    pub const fn game_duration_cycles(&self) -> u32 {
        self.game_duration_cycles
    }

    /// Game-over ticks per tens/ones digit when the score needs two digits.
    pub const fn score_blink_cycles(&self) -> u32 {
        self.score_blink_cycles
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::BUILD
    }
}

// Glitch rejection needs a window of at least four samples.
const _: () = assert!(DEBOUNCE_CYCLES >= 4);
const _: () = assert!(LOCK_CYCLES > 0 && GAME_DURATION_CYCLES > 0);
const _: () = assert!(SCORE_BLINK_CYCLES > 0);
// Fifty moles at nine ticks each must fit in one simulated round.
const _: () = assert!(SIM_GAME_DURATION_CYCLES > 50 * 9);
