use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use host::{
    checkpoints_for_file, load_scenario, parse_seed, play_round, replay_file, run_scenario,
    write_stimulus, AutoplayConfig, RunPolicy,
};
use mole_core::Timing;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "mole")]
#[command(about = "Drive the whack-a-mole controller from scenarios, a bot or recorded stimulus")]
struct Cli {
    /// Stop any run after this many ticks (overrides MOLE_MAX_TICKS)
    #[arg(long, global = true)]
    max_ticks: Option<u32>,
    /// Checkpoint interval for replay (overrides MOLE_CHECKPOINT_EVERY)
    #[arg(long, global = true)]
    checkpoint_every: Option<u32>,
    /// Print a JSON report instead of key=value lines
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Let the autoplayer play one round
    Play {
        #[arg(long, default_value = "0x5EED0A11")]
        seed: String,
        #[arg(long, default_value_t = 2)]
        reaction: u32,
        #[arg(long, default_value_t = 5)]
        hold: u32,
        #[arg(long, default_value_t = 4)]
        release: u32,
        /// Press the wrong button on every n-th press
        #[arg(long)]
        mistake_every: Option<u32>,
        /// Write the recorded button bytes here
        #[arg(long)]
        tape_out: Option<PathBuf>,
    },
    /// Run a JSON scenario file
    Scenario {
        path: PathBuf,
        #[arg(long, default_value = "0x5EED0A11")]
        seed: String,
    },
    /// Strictly replay a stimulus file (one button byte per tick)
    Replay {
        input: PathBuf,
        #[arg(long, default_value = "0x5EED0A11")]
        seed: String,
        /// Write periodic snapshots as JSON
        #[arg(long)]
        checkpoints_out: Option<PathBuf>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let Cli {
        max_ticks,
        checkpoint_every,
        json,
        command,
    } = Cli::parse();
    let policy = RunPolicy::from_env().with_overrides(max_ticks, checkpoint_every);
    tracing::debug!(timing = ?Timing::BUILD, ?policy, "starting");

    match command {
        Commands::Play {
            seed,
            reaction,
            hold,
            release,
            mistake_every,
            tape_out,
        } => {
            let seed = parse_seed(&seed)?;
            let config = AutoplayConfig {
                reaction_ticks: reaction,
                hold_ticks: hold,
                release_ticks: release,
                mistake_every,
            };
            let artifact = play_round(seed, &config, &policy)?;
            if let Some(path) = &tape_out {
                write_stimulus(path, &artifact.inputs)?;
            }

            let report = &artifact.report;
            if json {
                return print_json(report);
            }
            println!("seed={:#010x}", report.seed);
            println!("ticks={}", report.ticks);
            println!("score={}", report.final_score);
            println!("display={:#010b}", report.final_display);
            println!("presses={}", report.presses);
            println!("hits={}", report.hits);
            println!("wrong_presses={}", report.wrong_presses);
            println!("locked_presses={}", report.locked_presses);
            if let Some(path) = tape_out {
                println!("tape={}", path.display());
            }
        }
        Commands::Scenario { path, seed } => {
            let seed = parse_seed(&seed)?;
            let scenario = load_scenario(&path)?;
            let report = run_scenario(&scenario, seed, &policy)?;
            if json {
                return print_json(&report);
            }
            println!("scenario={}", report.name);
            println!("ticks={}", report.ticks);
            println!("score={}", report.final_score);
            println!("display={:#010b}", report.final_display);
            println!("playing={}", report.playing);
            println!("expectations_met={}", report.expectations_met);
            println!("hits={}", report.stats.hits);
            println!("wrong_presses={}", report.stats.wrong_presses);
        }
        Commands::Replay {
            input,
            seed,
            checkpoints_out,
        } => {
            let seed = parse_seed(&seed)?;
            let result = replay_file(&input, seed, &policy)?;
            if let Some(path) = &checkpoints_out {
                let checkpoints = checkpoints_for_file(&input, seed, &policy)?;
                let encoded = serde_json::to_vec_pretty(&checkpoints)?;
                fs::write(path, encoded)
                    .with_context(|| format!("failed writing {}", path.display()))?;
            }
            if json {
                return print_json(&result);
            }
            println!("input={}", input.display());
            println!("ticks={}", result.tick_count);
            println!("score={}", result.final_score);
            println!("display={:#010b}", result.final_display);
            println!("round={:?}", result.final_round);
            println!("hits={}", result.stats.hits);
            println!("wrong_presses={}", result.stats.wrong_presses);
            println!("locked_presses={}", result.stats.locked_presses);
            println!("rounds_completed={}", result.stats.rounds_completed);
            println!("restarts={}", result.stats.restarts);
            if let Some(path) = checkpoints_out {
                println!("checkpoints={}", path.display());
            }
        }
    }

    Ok(())
}
