//! Scripted stimulus.
//!
//! A scenario is a JSON list of steps. Steps that press "the target" or "a
//! wrong button" look at the display to find the mole, the same way a person
//! would, so scenarios work with any target seed.

use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use mole_core::controller::TickEvent;
use mole_core::display::lit_segment;
use mole_core::sim::ReplayStats;
use mole_core::{Controller, RoundState, TickInput, TickOutput, Timing, XorshiftTargets};
use serde::{Deserialize, Serialize};

use crate::config::RunPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Reset,
    Idle { ticks: u32 },
    Hold { buttons: Vec<u8>, ticks: u32 },
    HoldTarget { ticks: u32 },
    HoldWrong { ticks: u32 },
    UntilGameOver { max_ticks: u32 },
    Expect(Expectation),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Expectation {
    pub score: Option<u8>,
    pub playing: Option<bool>,
    pub locked: Option<bool>,
    pub display: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub seed: u32,
    pub ticks: u32,
    pub final_score: u8,
    pub final_display: u8,
    pub playing: bool,
    pub expectations_met: u32,
    pub stats: ReplayStats,
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let raw = fs::read(path)
        .with_context(|| format!("failed to read scenario: {}", path.display()))?;
    serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse scenario: {}", path.display()))
}

struct Runner {
    controller: Controller,
    stats: ReplayStats,
    ticks: u32,
    max_ticks: u32,
}

impl Runner {
    fn apply(&mut self, input: TickInput) -> Result<TickOutput> {
        if self.ticks >= self.max_ticks {
            return Err(anyhow!("tick limit {} reached", self.max_ticks));
        }
        self.ticks += 1;

        let output = self
            .controller
            .step_checked(input)
            .map_err(|rule| anyhow!("rule {rule} broken at tick {}", self.ticks))?;
        let event = self.controller.last_event();
        if event != TickEvent::None {
            tracing::debug!(tick = self.ticks, ?event, score = output.score, "controller event");
        }
        self.stats.record(event);
        Ok(output)
    }

    fn drive(&mut self, buttons: u8, ticks: u32) -> Result<()> {
        for _ in 0..ticks {
            self.apply(TickInput::buttons(buttons))?;
        }
        Ok(())
    }

    fn lit_target(&self) -> Result<u8> {
        lit_segment(self.controller.output().display)
            .filter(|_| self.controller.round() == RoundState::Playing)
            .ok_or_else(|| anyhow!("no mole lit at tick {}", self.ticks))
    }

    fn check(&self, expectation: &Expectation) -> Result<()> {
        let output = self.controller.output();
        if let Some(score) = expectation.score {
            if output.score != score {
                return Err(anyhow!("expected score {score}, got {}", output.score));
            }
        }
        if let Some(playing) = expectation.playing {
            let actual = self.controller.round() == RoundState::Playing;
            if actual != playing {
                return Err(anyhow!("expected playing={playing}, got {actual}"));
            }
        }
        if let Some(locked) = expectation.locked {
            let actual = self.controller.state().is_locked();
            if actual != locked {
                return Err(anyhow!("expected locked={locked}, got {actual}"));
            }
        }
        if let Some(display) = expectation.display {
            if output.display != display {
                return Err(anyhow!(
                    "expected display {display:#010b}, got {:#010b}",
                    output.display
                ));
            }
        }
        Ok(())
    }

    fn run_step(&mut self, step: &Step) -> Result<bool> {
        match step {
            Step::Reset => {
                self.apply(TickInput::RESET)?;
            }
            Step::Idle { ticks } => self.drive(0, *ticks)?,
            Step::Hold { buttons, ticks } => {
                let bits = buttons_to_bits(buttons)?;
                self.drive(bits, *ticks)?;
            }
            Step::HoldTarget { ticks } => {
                let target = self.lit_target()?;
                self.drive(1 << target, *ticks)?;
            }
            Step::HoldWrong { ticks } => {
                let wrong = (self.lit_target()? + 1) % 8;
                self.drive(1 << wrong, *ticks)?;
            }
            Step::UntilGameOver { max_ticks } => {
                let mut waited = 0;
                while self.controller.round() == RoundState::Playing {
                    if waited >= *max_ticks {
                        return Err(anyhow!("round still running after {max_ticks} ticks"));
                    }
                    self.apply(TickInput::IDLE)?;
                    waited += 1;
                }
            }
            Step::Expect(expectation) => {
                self.check(expectation)?;
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn buttons_to_bits(buttons: &[u8]) -> Result<u8> {
    buttons.iter().try_fold(0u8, |bits, &index| {
        if index > 7 {
            return Err(anyhow!("button index {index} is outside 0..=7"));
        }
        Ok(bits | (1 << index))
    })
}

/// Runs every step from a fresh reset with build timing.
pub fn run_scenario(scenario: &Scenario, seed: u32, policy: &RunPolicy) -> Result<ScenarioReport> {
    run_scenario_with_timing(scenario, seed, Timing::BUILD, policy)
}

pub fn run_scenario_with_timing(
    scenario: &Scenario,
    seed: u32,
    timing: Timing,
    policy: &RunPolicy,
) -> Result<ScenarioReport> {
    tracing::info!(name = %scenario.name, steps = scenario.steps.len(), seed, "running scenario");

    let mut runner = Runner {
        controller: Controller::with_source(timing, XorshiftTargets::new(seed)),
        stats: ReplayStats::default(),
        ticks: 0,
        max_ticks: policy.max_ticks,
    };

    let mut expectations_met = 0;
    for (index, step) in scenario.steps.iter().enumerate() {
        let was_expectation = runner
            .run_step(step)
            .with_context(|| format!("{}: step {index} ({step:?})", scenario.name))?;
        if was_expectation {
            expectations_met += 1;
        }
    }

    let output = runner.controller.output();
    Ok(ScenarioReport {
        name: scenario.name.clone(),
        seed,
        ticks: runner.ticks,
        final_score: output.score,
        final_display: output.display,
        playing: runner.controller.round() == RoundState::Playing,
        expectations_met,
        stats: runner.stats,
    })
}
