use serde::{Deserialize, Serialize};

use crate::constants::BUTTON_COUNT;

/// Eight button lines packed into one byte; bit `i` is button `i`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonVector(u8);

impl ButtonVector {
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// A vector with only `index` pressed. Indices above 7 yield an empty vector.
    #[inline]
    pub const fn single(index: u8) -> Self {
        if (index as usize) < BUTTON_COUNT {
            Self(1 << index)
        } else {
            Self(0)
        }
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_pressed(self, index: u8) -> bool {
        (index as usize) < BUTTON_COUNT && (self.0 >> index) & 1 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The pressed index when exactly one line is set.
    #[inline]
    pub const fn only(self) -> Option<u8> {
        if self.0.count_ones() == 1 {
            Some(self.0.trailing_zeros() as u8)
        } else {
            None
        }
    }

    /// Lines set here but not in `previous`.
    #[inline]
    pub const fn rising_since(self, previous: Self) -> Self {
        Self(self.0 & !previous.0)
    }

    pub fn with(self, index: u8, pressed: bool) -> Self {
        let bit = Self::single(index).0;
        if pressed {
            Self(self.0 | bit)
        } else {
            Self(self.0 & !bit)
        }
    }
}

impl From<[bool; BUTTON_COUNT]> for ButtonVector {
    fn from(lines: [bool; BUTTON_COUNT]) -> Self {
        lines
            .iter()
            .enumerate()
            .fold(Self::NONE, |acc, (i, &pressed)| acc.with(i as u8, pressed))
    }
}

impl From<ButtonVector> for [bool; BUTTON_COUNT] {
    fn from(vector: ButtonVector) -> Self {
        core::array::from_fn(|i| vector.is_pressed(i as u8))
    }
}

/// Everything the controller samples in one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub reset: bool,
    pub buttons: ButtonVector,
}

impl TickInput {
    pub const IDLE: Self = Self {
        reset: false,
        buttons: ButtonVector::NONE,
    };

    pub const RESET: Self = Self {
        reset: true,
        buttons: ButtonVector::NONE,
    };

    #[inline]
    pub const fn buttons(bits: u8) -> Self {
        Self {
            reset: false,
            buttons: ButtonVector::from_bits(bits),
        }
    }
}
