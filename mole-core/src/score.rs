use serde::{Deserialize, Serialize};

/// Hits in the current round.
///
/// Overflow past 255 wraps; a real round never gets close.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCounter {
    value: u8,
}

impl ScoreCounter {
    pub const fn new() -> Self {
        Self { value: 0 }
    }

    pub fn on_correct_hit(&mut self) {
        self.value = self.value.wrapping_add(1);
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_hits_and_resets() {
        let mut score = ScoreCounter::new();
        for _ in 0..3 {
            score.on_correct_hit();
        }
        assert_eq!(score.value(), 3);
        score.reset();
        assert_eq!(score.value(), 0);
    }
}
