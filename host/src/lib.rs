//! Host-side tooling for the mole controller: scripted scenarios, an
//! autoplayer and stimulus replay. Everything here drives the core through its
//! tick interface and checks every tick against the controller rules.

pub mod autoplay;
pub mod config;
pub mod scenario;

use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use mole_core::sim::{replay_with_checkpoints, ReplayCheckpoint};
use mole_core::{replay_strict, ReplayResult, Timing};

pub use autoplay::{play_round, AutoplayConfig, PlayArtifact, PlayReport};
pub use config::RunPolicy;
pub use scenario::{load_scenario, run_scenario, Scenario, ScenarioReport};

/// Replays a stimulus file (one raw button byte per tick, starting from reset)
/// and checks every tick.
pub fn replay_file(path: &Path, seed: u32, policy: &RunPolicy) -> Result<ReplayResult> {
    let inputs = read_stimulus(path, policy)?;
    tracing::info!(path = %path.display(), ticks = inputs.len(), "replaying stimulus");

    replay_strict(Timing::BUILD, seed, &inputs)
        .map_err(|violation| anyhow!("{}: {violation}", path.display()))
}

pub fn checkpoints_for_file(
    path: &Path,
    seed: u32,
    policy: &RunPolicy,
) -> Result<Vec<ReplayCheckpoint>> {
    let inputs = read_stimulus(path, policy)?;
    Ok(replay_with_checkpoints(
        Timing::BUILD,
        seed,
        &inputs,
        policy.checkpoint_every,
    ))
}

fn read_stimulus(path: &Path, policy: &RunPolicy) -> Result<Vec<u8>> {
    let inputs =
        fs::read(path).with_context(|| format!("failed to read stimulus: {}", path.display()))?;
    if inputs.len() as u64 > policy.max_ticks as u64 {
        return Err(anyhow!(
            "stimulus has {} ticks, limit is {}",
            inputs.len(),
            policy.max_ticks
        ));
    }
    Ok(inputs)
}

pub fn write_stimulus(path: &Path, inputs: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    fs::write(path, inputs)
        .with_context(|| format!("failed writing stimulus: {}", path.display()))
}

/// Accepts decimal or `0x`-prefixed hex.
pub fn parse_seed(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => trimmed.replace('_', "").parse::<u32>(),
    };
    parsed.with_context(|| format!("invalid seed: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_parse_in_hex_and_decimal() {
        assert_eq!(parse_seed("0xDEAD_BEEF").unwrap(), 0xDEAD_BEEF);
        assert_eq!(parse_seed(" 42 ").unwrap(), 42);
        assert!(parse_seed("0xZZ").is_err());
    }
}
