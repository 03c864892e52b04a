//! Display byte encoding.
//!
//! Bit 7 is the decimal point (lit while a round is running). Bits 6..0 are
//! an active-low 7-segment pattern: a single dark bit marks the mole during
//! play, and the final score is drawn as a digit once the round is over.

use crate::constants::{DECIMAL_POINT, DIGIT_PATTERNS, SEGMENT_MASK};
use crate::target::TargetIndex;

/// Play pattern: every segment bit high except the mole's.
#[inline]
pub const fn encode_playing(target: TargetIndex) -> u8 {
    DECIMAL_POINT | (SEGMENT_MASK & !(1 << target.get()))
}

/// Active-low pattern for a single decimal digit. Only the ones digit of
/// `digit` is used.
#[inline]
pub const fn digit_pattern(digit: u8) -> u8 {
    DIGIT_PATTERNS[(digit % 10) as usize]
}

/// Game-over pattern (decimal point dark).
///
/// Scores below ten show their digit. Larger scores alternate between the tens
/// digit and the ones digit every `blink_cycles` ticks, tens first; with
/// `blink_cycles == 0` only the ones digit is shown.
pub const fn encode_game_over(score: u8, ticks_since_over: u32, blink_cycles: u32) -> u8 {
    if score < 10 || blink_cycles == 0 {
        return digit_pattern(score);
    }

    let showing_ones = (ticks_since_over / blink_cycles) % 2 == 1;
    if showing_ones {
        digit_pattern(score)
    } else {
        digit_pattern(score / 10)
    }
}

/// Index of the single dark segment, if the pattern has exactly one.
pub const fn lit_segment(display: u8) -> Option<u8> {
    let dark = !display & SEGMENT_MASK;
    if dark.count_ones() == 1 {
        Some(dark.trailing_zeros() as u8)
    } else {
        None
    }
}

#[inline]
pub const fn decimal_point(display: u8) -> bool {
    display & DECIMAL_POINT != 0
}

/// Whether `segments` (bits 6..0) is one of the ten digit patterns.
pub fn is_digit_pattern(segments: u8) -> bool {
    DIGIT_PATTERNS.contains(&(segments & SEGMENT_MASK))
}
