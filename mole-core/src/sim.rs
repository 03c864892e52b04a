//! Stimulus replay and rule checking.
//!
//! A stimulus is a byte slice with one raw button byte per tick, applied to a
//! controller fresh out of reset. [`replay_strict`] checks every tick against
//! the controller rules and stops at the first one broken.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::constants::{Timing, RESTART_BUTTON, SEGMENT_COUNT};
use crate::controller::{Controller, ControllerSnapshot, RoundState, TickEvent, TickOutput};
use crate::display::{decimal_point, is_digit_pattern, lit_segment};
use crate::error::RuleCode;
use crate::input::TickInput;
use crate::target::{TargetSource, XorshiftTargets};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayStats {
    pub hits: u32,
    pub wrong_presses: u32,
    pub locked_presses: u32,
    pub rounds_completed: u32,
    pub restarts: u32,
}

impl ReplayStats {
    pub fn record(&mut self, event: TickEvent) {
        match event {
            TickEvent::Hit => self.hits += 1,
            TickEvent::WrongPress => self.wrong_presses += 1,
            TickEvent::LockedPress => self.locked_presses += 1,
            TickEvent::GameOver => self.rounds_completed += 1,
            TickEvent::Restart => self.restarts += 1,
            TickEvent::None | TickEvent::Reset => {}
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayResult {
    pub tick_count: u32,
    pub final_score: u8,
    pub final_display: u8,
    pub final_round: RoundState,
    pub stats: ReplayStats,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayCheckpoint {
    pub snapshot: ControllerSnapshot,
    pub output: TickOutput,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayViolation {
    pub tick_count: u32,
    pub rule: RuleCode,
}

impl core::fmt::Display for ReplayViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "rule violation at tick {}: {}", self.tick_count, self.rule)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ReplayViolation {}

pub fn replay(timing: Timing, seed: u32, inputs: &[u8]) -> ReplayResult {
    replay_source(timing, XorshiftTargets::new(seed), inputs)
}

pub fn replay_source<S: TargetSource>(timing: Timing, source: S, inputs: &[u8]) -> ReplayResult {
    let mut controller = Controller::with_source(timing, source);
    let mut stats = ReplayStats::default();

    for input in inputs {
        controller.step_buttons(*input);
        stats.record(controller.last_event());
    }

    result_of(&controller, stats)
}

pub fn replay_strict(
    timing: Timing,
    seed: u32,
    inputs: &[u8],
) -> Result<ReplayResult, ReplayViolation> {
    replay_source_strict(timing, XorshiftTargets::new(seed), inputs)
}

pub fn replay_source_strict<S: TargetSource>(
    timing: Timing,
    source: S,
    inputs: &[u8],
) -> Result<ReplayResult, ReplayViolation> {
    let mut controller = Controller::with_source(timing, source);
    validate_state(&controller.snapshot(), &timing).map_err(|rule| ReplayViolation {
        tick_count: 0,
        rule,
    })?;

    let mut stats = ReplayStats::default();
    for input in inputs {
        controller
            .step_checked(TickInput::buttons(*input))
            .map_err(|rule| ReplayViolation {
                tick_count: controller.state().tick_count(),
                rule,
            })?;
        stats.record(controller.last_event());
    }

    Ok(result_of(&controller, stats))
}

/// Snapshots the controller before the first tick, every `interval` ticks and
/// after the last tick.
pub fn replay_with_checkpoints(
    timing: Timing,
    seed: u32,
    inputs: &[u8],
    interval: u32,
) -> Vec<ReplayCheckpoint> {
    let interval = interval.max(1);
    let mut controller = Controller::with_source(timing, XorshiftTargets::new(seed));
    let mut checkpoints = Vec::with_capacity(inputs.len() / interval as usize + 2);
    checkpoints.push(checkpoint(&controller));

    for input in inputs {
        controller.step_buttons(*input);
        if controller.state().tick_count() % interval == 0 {
            checkpoints.push(checkpoint(&controller));
        }
    }

    let last_tick = controller.state().tick_count();
    if checkpoints.last().map(|c| c.snapshot.tick_count) != Some(last_tick) {
        checkpoints.push(checkpoint(&controller));
    }

    checkpoints
}

fn checkpoint<S: TargetSource>(controller: &Controller<S>) -> ReplayCheckpoint {
    ReplayCheckpoint {
        snapshot: controller.snapshot(),
        output: controller.output(),
    }
}

fn result_of<S: TargetSource>(controller: &Controller<S>, stats: ReplayStats) -> ReplayResult {
    let output = controller.output();
    ReplayResult {
        tick_count: controller.state().tick_count(),
        final_score: output.score,
        final_display: output.display,
        final_round: controller.round(),
        stats,
    }
}

/// Rules that hold for any single state.
pub fn validate_state(state: &ControllerSnapshot, timing: &Timing) -> Result<(), RuleCode> {
    if state.target.get() >= SEGMENT_COUNT {
        return Err(RuleCode::TargetOutOfRange);
    }

    let timer_consistent = match state.round {
        RoundState::Playing => state.game_remaining > 0,
        RoundState::GameOver => state.game_remaining == 0,
    };
    if !timer_consistent {
        return Err(RuleCode::RoundTimerConsistency);
    }

    if state.lockout_remaining > timing.lock_cycles() {
        return Err(RuleCode::LockoutRange);
    }

    Ok(())
}

fn validate_output(state: &ControllerSnapshot, output: TickOutput) -> Result<(), RuleCode> {
    let playing = state.round == RoundState::Playing;
    if decimal_point(output.display) != playing {
        return Err(RuleCode::DecimalPointMismatch);
    }

    if playing {
        if lit_segment(output.display) != Some(state.target.get()) {
            return Err(RuleCode::PlaySegmentPattern);
        }
    } else if !is_digit_pattern(output.display) {
        return Err(RuleCode::GameOverDigitPattern);
    }

    if output.score != state.score {
        return Err(RuleCode::ScoreStep);
    }

    Ok(())
}

/// Checks one tick: the state after it, the outputs it produced, and the
/// transition from `before`.
pub fn validate_tick(
    before: &ControllerSnapshot,
    after: &ControllerSnapshot,
    input: TickInput,
    output: TickOutput,
    timing: &Timing,
) -> Result<(), RuleCode> {
    validate_state(after, timing)?;
    validate_output(after, output)?;

    if input.reset {
        if after.score != 0 || after.round != RoundState::Playing {
            return Err(RuleCode::ScoreStep);
        }
        return Ok(());
    }

    match (before.round, after.round) {
        (RoundState::GameOver, RoundState::Playing) => {
            let pressed = after.debounced.rising_since(before.debounced);
            if !pressed.is_pressed(RESTART_BUTTON) {
                return Err(RuleCode::RestartWithoutButtonZero);
            }
            if after.score != 0 {
                return Err(RuleCode::ScoreStep);
            }
            Ok(())
        }
        (RoundState::GameOver, RoundState::GameOver) => {
            if after.score != before.score || after.target != before.target {
                return Err(RuleCode::FrozenAfterGameOver);
            }
            Ok(())
        }
        (RoundState::Playing, _) => validate_play_transition(before, after),
    }
}

fn validate_play_transition(
    before: &ControllerSnapshot,
    after: &ControllerSnapshot,
) -> Result<(), RuleCode> {
    if after.score == before.score {
        if after.target != before.target {
            return Err(RuleCode::TargetAdvanceWithoutHit);
        }
        return Ok(());
    }

    if after.score != before.score.wrapping_add(1) || after.round != RoundState::Playing {
        return Err(RuleCode::ScoreStep);
    }

    if before.lockout_remaining > 0 {
        return Err(RuleCode::ScoreWhileLocked);
    }

    let pressed = after.debounced.rising_since(before.debounced);
    if !before.target.is_playable() || pressed.only() != Some(before.target.get()) {
        return Err(RuleCode::HitWithoutTargetPress);
    }

    Ok(())
}
