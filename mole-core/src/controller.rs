//! Top-level round state machine.
//!
//! The whole controller is one owned [`ControllerState`] advanced by the pure
//! [`tick`] function. A tick reads the previous state and one input sample and
//! returns the next state as a whole, so outputs never mix old and new values.
//!
//! Order within a tick: reset check, debounce, countdowns, hit/restart
//! resolution, display encode. Presses are resolved against the lockout as it
//! stood at the end of the previous tick.

use serde::{Deserialize, Serialize};

use crate::constants::{Timing, RESTART_BUTTON};
use crate::debounce::DebounceBank;
use crate::display::{encode_game_over, encode_playing};
use crate::error::RuleCode;
use crate::input::{ButtonVector, TickInput};
use crate::score::ScoreCounter;
use crate::sim::validate_tick;
use crate::target::{TargetIndex, TargetSource, XorshiftTargets};
use crate::timers::{GameTimer, LockoutTimer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Playing,
    GameOver,
}

/// The two output bytes sampled after a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutput {
    pub display: u8,
    pub score: u8,
}

/// How a tick's presses were resolved. Not part of the hardware outputs, but
/// useful to callers that keep statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickEvent {
    #[default]
    None,
    Reset,
    Hit,
    WrongPress,
    /// A press arrived while the lockout was running and was ignored.
    LockedPress,
    GameOver,
    Restart,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerState<S = XorshiftTargets> {
    timing: Timing,
    round: RoundState,
    target: TargetIndex,
    score: ScoreCounter,
    lockout: LockoutTimer,
    game_timer: GameTimer,
    buttons: DebounceBank,
    game_over_ticks: u32,
    tick_count: u32,
    source: S,
}

/// Plain copy of the observable internals, for logging and replay checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    pub tick_count: u32,
    pub round: RoundState,
    pub target: TargetIndex,
    pub score: u8,
    pub lockout_remaining: u32,
    pub game_remaining: u32,
    pub game_over_ticks: u32,
    pub debounced: ButtonVector,
}

impl<S: TargetSource> ControllerState<S> {
    /// A freshly reset controller: playing, first mole already lit.
    pub fn new(timing: Timing, mut source: S) -> Self {
        source.restart();
        let target = source.next_target(None);
        Self {
            timing,
            round: RoundState::Playing,
            target,
            score: ScoreCounter::new(),
            lockout: LockoutTimer::new(),
            game_timer: GameTimer::loaded(timing.game_duration_cycles()),
            buttons: DebounceBank::new(),
            game_over_ticks: 0,
            tick_count: 0,
            source,
        }
    }

    /// Starts a new round. The debounce filters keep their state: they track
    /// the physical buttons, which a restart does not release.
    fn restart_round(&mut self) {
        self.round = RoundState::Playing;
        self.score.reset();
        self.lockout.clear();
        self.game_timer.reload(self.timing.game_duration_cycles());
        self.game_over_ticks = 0;
        self.source.restart();
        self.target = self.source.next_target(None);
    }

    fn hard_reset(&mut self) {
        self.buttons.reset();
        self.restart_round();
    }

    /// `locked` is the lockout as it stood before this tick's countdown.
    fn resolve_play(&mut self, pressed: ButtonVector, locked: bool) -> TickEvent {
        if pressed.is_empty() {
            return TickEvent::None;
        }

        // Button 0 never scores mid-round, even under a scripted mole on
        // segment 0, but it is still a wrong press.
        let is_hit = self.target.is_playable() && pressed.only() == Some(self.target.get());
        if is_hit {
            if locked {
                return TickEvent::LockedPress;
            }
            self.score.on_correct_hit();
            self.target = self.source.next_target(Some(self.target));
            return TickEvent::Hit;
        }

        self.lockout.trigger(self.timing.lock_cycles());
        TickEvent::WrongPress
    }

    fn resolve_game_over(&mut self, pressed: ButtonVector) -> TickEvent {
        if pressed.is_pressed(RESTART_BUTTON) {
            self.restart_round();
            return TickEvent::Restart;
        }
        TickEvent::None
    }

    fn advance(&mut self, input: TickInput) -> TickEvent {
        self.tick_count = self.tick_count.wrapping_add(1);

        if input.reset {
            self.hard_reset();
            return TickEvent::Reset;
        }

        let debounced = self.buttons.sample(input.buttons, self.timing.debounce_cycles());

        let was_locked = self.lockout.is_locked();
        self.lockout.tick();
        match self.round {
            RoundState::Playing => {
                if self.game_timer.tick() {
                    self.round = RoundState::GameOver;
                    self.game_over_ticks = 0;
                    return TickEvent::GameOver;
                }
                self.resolve_play(debounced.pressed, was_locked)
            }
            RoundState::GameOver => {
                self.game_over_ticks = self.game_over_ticks.saturating_add(1);
                self.resolve_game_over(debounced.pressed)
            }
        }
    }

    pub fn output(&self) -> TickOutput {
        let display = match self.round {
            RoundState::Playing => encode_playing(self.target),
            RoundState::GameOver => encode_game_over(
                self.score.value(),
                self.game_over_ticks,
                self.timing.score_blink_cycles(),
            ),
        };
        TickOutput {
            display,
            score: self.score.value(),
        }
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            tick_count: self.tick_count,
            round: self.round,
            target: self.target,
            score: self.score.value(),
            lockout_remaining: self.lockout.remaining(),
            game_remaining: self.game_timer.remaining(),
            game_over_ticks: self.game_over_ticks,
            debounced: self.buttons.level(),
        }
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn round(&self) -> RoundState {
        self.round
    }

    pub fn target(&self) -> TargetIndex {
        self.target
    }

    pub fn score(&self) -> u8 {
        self.score.value()
    }

    pub fn is_locked(&self) -> bool {
        self.lockout.is_locked()
    }

    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }
}

impl Default for ControllerState<XorshiftTargets> {
    fn default() -> Self {
        Self::new(Timing::BUILD, XorshiftTargets::default())
    }
}

/// Advances the controller by one clock tick.
pub fn tick<S: TargetSource>(
    state: ControllerState<S>,
    input: TickInput,
) -> (ControllerState<S>, TickOutput) {
    let (state, output, _) = tick_with_event(state, input);
    (state, output)
}

/// [`tick`], also reporting how the tick's presses were resolved.
pub fn tick_with_event<S: TargetSource>(
    mut state: ControllerState<S>,
    input: TickInput,
) -> (ControllerState<S>, TickOutput, TickEvent) {
    let event = state.advance(input);
    let output = state.output();
    (state, output, event)
}

/// Owning wrapper around [`ControllerState`] for callers that prefer a
/// mutable handle over threading the state by value.
#[derive(Clone, Debug)]
pub struct Controller<S = XorshiftTargets> {
    state: ControllerState<S>,
    last_output: TickOutput,
    last_event: TickEvent,
}

impl Controller<XorshiftTargets> {
    /// Build timing, default pseudo-random moles.
    pub fn new() -> Self {
        Self::with_source(Timing::BUILD, XorshiftTargets::default())
    }
}

impl Default for Controller<XorshiftTargets> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TargetSource> Controller<S> {
    pub fn with_source(timing: Timing, source: S) -> Self {
        Self::from_state(ControllerState::new(timing, source))
    }

    pub fn from_state(state: ControllerState<S>) -> Self {
        let last_output = state.output();
        Self {
            state,
            last_output,
            last_event: TickEvent::Reset,
        }
    }

    pub fn step(&mut self, input: TickInput) -> TickOutput {
        self.last_event = self.state.advance(input);
        self.last_output = self.state.output();
        self.last_output
    }

    pub fn step_buttons(&mut self, buttons: u8) -> TickOutput {
        self.step(TickInput::buttons(buttons))
    }

    pub fn reset(&mut self) -> TickOutput {
        self.step(TickInput::RESET)
    }

    /// Steps and checks the tick against every controller rule. On a violation
    /// the state has still been advanced.
    pub fn step_checked(&mut self, input: TickInput) -> Result<TickOutput, RuleCode> {
        let before = self.snapshot();
        let output = self.step(input);
        validate_tick(&before, &self.snapshot(), input, output, &self.timing())?;
        Ok(output)
    }

    pub fn state(&self) -> &ControllerState<S> {
        &self.state
    }

    pub fn output(&self) -> TickOutput {
        self.last_output
    }

    pub fn last_event(&self) -> TickEvent {
        self.last_event
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        self.state.snapshot()
    }

    pub fn timing(&self) -> Timing {
        self.state.timing()
    }

    pub fn round(&self) -> RoundState {
        self.state.round()
    }

    pub fn target(&self) -> TargetIndex {
        self.state.target()
    }

    pub fn score(&self) -> u8 {
        self.state.score()
    }
}
