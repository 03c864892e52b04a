use serde::{Deserialize, Serialize};

/// One-shot countdown armed by a wrong press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutTimer {
    remaining: u32,
}

impl LockoutTimer {
    pub const fn new() -> Self {
        Self { remaining: 0 }
    }

    /// Re-arms the full window, discarding whatever was left.
    pub fn trigger(&mut self, lock_cycles: u32) {
        self.remaining = lock_cycles;
    }

    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.remaining > 0
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn clear(&mut self) {
        self.remaining = 0;
    }
}

/// Round countdown. Loaded on (re)start and never resumed once expired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTimer {
    remaining: u32,
}

impl GameTimer {
    pub const fn loaded(duration_cycles: u32) -> Self {
        Self {
            remaining: duration_cycles,
        }
    }

    pub fn reload(&mut self, duration_cycles: u32) {
        self.remaining = duration_cycles;
    }

    /// Counts one tick down and reports whether the round just ran out.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lockout_counts_down_to_unlocked() {
        let mut lockout = LockoutTimer::new();
        assert!(!lockout.is_locked());
        lockout.trigger(3);
        for expected in [2, 1, 0] {
            assert!(lockout.is_locked());
            lockout.tick();
            assert_eq!(lockout.remaining(), expected);
        }
        assert!(!lockout.is_locked());
        lockout.tick();
        assert_eq!(lockout.remaining(), 0);
    }

    #[test]
    fn second_trigger_rearms_instead_of_adding() {
        let mut lockout = LockoutTimer::new();
        lockout.trigger(10);
        for _ in 0..4 {
            lockout.tick();
        }
        lockout.trigger(10);
        assert_eq!(lockout.remaining(), 10);
    }

    #[test]
    fn game_timer_reports_expiry_exactly_once() {
        let mut timer = GameTimer::loaded(3);
        assert!(!timer.tick());
        assert!(!timer.tick());
        assert!(timer.tick());
        assert_eq!(timer.remaining(), 0);
        assert!(!timer.tick());
        assert_eq!(timer.remaining(), 0);

        timer.reload(2);
        assert_eq!(timer.remaining(), 2);
    }
}
