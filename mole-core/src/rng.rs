use serde::{Deserialize, Serialize};

/// 32-bit xorshift generator. A zero seed would lock the sequence at zero, so
/// it is replaced with a fixed non-zero state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Xorshift32 {
    state: u32,
}

const ZERO_SEED_REPLACEMENT: u32 = 0xDEAD_BEEF;

impl Xorshift32 {
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { ZERO_SEED_REPLACEMENT } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform-enough value in `0..bound`. `bound` must be non-zero.
    pub fn next_below(&mut self, bound: u8) -> u8 {
        debug_assert!(bound > 0);
        (self.next_u32() % bound as u32) as u8
    }
}
