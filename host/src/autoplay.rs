//! A simple player that watches the display and presses the lit mole.

use anyhow::{anyhow, Result};
use mole_core::display::lit_segment;
use mole_core::sim::{replay_source_strict, ReplayStats};
use mole_core::{Controller, RoundState, TickInput, Timing, XorshiftTargets};
use serde::Serialize;

use crate::config::RunPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayConfig {
    /// Ticks between seeing a mole and pressing.
    pub reaction_ticks: u32,
    pub hold_ticks: u32,
    pub release_ticks: u32,
    /// Every n-th press goes to the wrong button.
    pub mistake_every: Option<u32>,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            reaction_ticks: 2,
            hold_ticks: 5,
            release_ticks: 4,
            mistake_every: None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayReport {
    pub seed: u32,
    pub ticks: u32,
    pub final_score: u8,
    pub final_display: u8,
    pub round: RoundState,
    pub presses: u32,
    pub hits: u32,
    pub wrong_presses: u32,
    pub locked_presses: u32,
}

#[derive(Clone, Debug)]
pub struct PlayArtifact {
    pub report: PlayReport,
    pub inputs: Vec<u8>,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Waiting { seen: u32 },
    Holding { button: u8, left: u32, mistake: bool },
    Pausing { left: u32 },
}

struct Player {
    config: AutoplayConfig,
    lockout_penalty: u32,
    phase: Phase,
    presses: u32,
}

impl Player {
    fn new(config: AutoplayConfig, timing: &Timing) -> Self {
        Self {
            config,
            lockout_penalty: timing.lock_cycles(),
            phase: Phase::Waiting { seen: 0 },
            presses: 0,
        }
    }

    fn next_mistake(&mut self) -> bool {
        self.presses += 1;
        matches!(self.config.mistake_every, Some(every) if every > 0 && self.presses % every == 0)
    }

    fn next_input(&mut self, display: u8) -> u8 {
        loop {
            match self.phase {
                Phase::Waiting { seen } => {
                    let Some(target) = lit_segment(display) else {
                        return 0;
                    };
                    if seen < self.config.reaction_ticks {
                        self.phase = Phase::Waiting { seen: seen + 1 };
                        return 0;
                    }
                    let mistake = self.next_mistake();
                    let button = if mistake { (target + 1) % 8 } else { target };
                    self.phase = Phase::Holding {
                        button,
                        left: self.config.hold_ticks,
                        mistake,
                    };
                }
                Phase::Holding {
                    button,
                    left,
                    mistake,
                } => {
                    if left > 0 {
                        self.phase = Phase::Holding {
                            button,
                            left: left - 1,
                            mistake,
                        };
                        return 1 << button;
                    }
                    let penalty = if mistake { self.lockout_penalty } else { 0 };
                    self.phase = Phase::Pausing {
                        left: self.config.release_ticks.saturating_add(penalty),
                    };
                }
                Phase::Pausing { left } => {
                    if left > 0 {
                        self.phase = Phase::Pausing { left: left - 1 };
                        return 0;
                    }
                    self.phase = Phase::Waiting { seen: 0 };
                }
            }
        }
    }
}

/// Plays one round with build timing.
pub fn play_round(seed: u32, config: &AutoplayConfig, policy: &RunPolicy) -> Result<PlayArtifact> {
    play_round_with_timing(seed, config, Timing::BUILD, policy)
}

/// Plays from power-on until the round ends, then replays the recorded
/// buttons strictly and checks that the replay agrees.
pub fn play_round_with_timing(
    seed: u32,
    config: &AutoplayConfig,
    timing: Timing,
    policy: &RunPolicy,
) -> Result<PlayArtifact> {
    if config.hold_ticks < timing.debounce_cycles() || config.release_ticks < timing.debounce_cycles() {
        return Err(anyhow!(
            "hold and release must each last at least {} ticks",
            timing.debounce_cycles()
        ));
    }

    let mut controller = Controller::with_source(timing, XorshiftTargets::new(seed));
    let mut player = Player::new(*config, &timing);
    let mut stats = ReplayStats::default();
    let mut inputs = Vec::new();

    while controller.round() == RoundState::Playing {
        if inputs.len() as u64 >= policy.max_ticks as u64 {
            return Err(anyhow!("round did not finish within {} ticks", policy.max_ticks));
        }
        let buttons = player.next_input(controller.output().display);
        inputs.push(buttons);
        controller
            .step_checked(TickInput::buttons(buttons))
            .map_err(|rule| anyhow!("rule {rule} broken at tick {}", inputs.len()))?;
        stats.record(controller.last_event());
    }

    let replayed = replay_source_strict(timing, XorshiftTargets::new(seed), &inputs)
        .map_err(|violation| anyhow!("recorded stimulus failed replay: {violation}"))?;
    let output = controller.output();
    if replayed.final_score != output.score || replayed.stats != stats {
        return Err(anyhow!(
            "replay disagrees with live play: score {} vs {}",
            replayed.final_score,
            output.score
        ));
    }

    tracing::info!(
        seed,
        ticks = inputs.len(),
        score = output.score,
        wrong = stats.wrong_presses,
        "round finished"
    );

    Ok(PlayArtifact {
        report: PlayReport {
            seed,
            ticks: controller.state().tick_count(),
            final_score: output.score,
            final_display: output.display,
            round: controller.round(),
            presses: player.presses,
            hits: stats.hits,
            wrong_presses: stats.wrong_presses,
            locked_presses: stats.locked_presses,
        },
        inputs,
    })
}
