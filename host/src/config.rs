use std::env;

use mole_core::Timing;

pub const DEFAULT_CHECKPOINT_EVERY: u32 = 100;
pub const MAX_TICKS_ENV: &str = "MOLE_MAX_TICKS";
pub const CHECKPOINT_EVERY_ENV: &str = "MOLE_CHECKPOINT_EVERY";

/// Limits for a host run. Timing itself is fixed at build time; this only
/// bounds how long the host is willing to drive the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPolicy {
    pub max_ticks: u32,
    pub checkpoint_every: u32,
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            checkpoint_every: DEFAULT_CHECKPOINT_EVERY,
        }
    }
}

impl RunPolicy {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let max_ticks = read_env_u32(MAX_TICKS_ENV, defaults.max_ticks);
        let mut checkpoint_every = read_env_u32(CHECKPOINT_EVERY_ENV, defaults.checkpoint_every);

        if checkpoint_every == 0 {
            tracing::warn!(
                "{CHECKPOINT_EVERY_ENV} must be > 0. Falling back to {DEFAULT_CHECKPOINT_EVERY}."
            );
            checkpoint_every = DEFAULT_CHECKPOINT_EVERY;
        }

        Self {
            max_ticks,
            checkpoint_every,
        }
    }

    /// Applies CLI overrides on top of the environment.
    pub fn with_overrides(mut self, max_ticks: Option<u32>, checkpoint_every: Option<u32>) -> Self {
        if let Some(max_ticks) = max_ticks {
            self.max_ticks = max_ticks;
        }
        if let Some(every) = checkpoint_every.filter(|&every| every > 0) {
            self.checkpoint_every = every;
        }
        self
    }
}

/// A full round plus enough slack to restart and look at the result.
fn default_max_ticks() -> u32 {
    Timing::BUILD
        .game_duration_cycles()
        .saturating_mul(2)
        .saturating_add(10_000)
}

pub(crate) fn read_env_u32(name: &str, default: u32) -> u32 {
    match env::var(name) {
        Ok(value) => match value.trim().replace('_', "").parse::<u32>() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!("{name}={value:?} is not a valid u32. Using {default}.");
                default
            }
        },
        Err(_) => default,
    }
}
