//! Crumbtrail - headless training driver
//!
//! Trains or evaluates a Q-learning seeker against the A* hunters and prints
//! a JSON summary on stdout.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crumbtrail::core::config::GameConfig;
use crumbtrail::core::error::Result;
use crumbtrail::learning::{
    run_episode, EpisodeOutcome, EpisodeReport, EpisodeSettings, Hyperparameters, QLearningAgent,
};
use crumbtrail::simulation::Game;

#[derive(Parser, Debug)]
#[command(name = "crumbtrail")]
#[command(about = "Train and evaluate a tabular Q-learning seeker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run ε-greedy training episodes
    Train(RunArgs),
    /// Run greedy episodes without updating the table
    Evaluate(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Number of episodes
    #[arg(long, default_value_t = 500)]
    episodes: usize,

    /// Step ceiling per episode (timeout)
    #[arg(long, default_value_t = 3000)]
    max_steps: usize,

    /// Simulated seconds per step
    #[arg(long, default_value_t = 1.0 / 30.0)]
    dt: f32,

    /// Random seed; overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// TOML game config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Level every episode starts at
    #[arg(long)]
    level: Option<u32>,

    /// Agent export to load before running
    #[arg(long)]
    import: Option<PathBuf>,

    /// Path to write the agent export to afterwards
    #[arg(long)]
    export: Option<PathBuf>,

    /// Log a progress line every N episodes (0 disables)
    #[arg(long, default_value_t = 50)]
    report_every: usize,
}

#[derive(Serialize)]
struct RunSummary {
    mode: &'static str,
    seed: u64,
    episodes: usize,
    goals: usize,
    catches: usize,
    timeouts: usize,
    mean_reward: f64,
    best_reward: Option<f64>,
    mean_steps: f64,
    final_epsilon: f64,
    table_size: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crumbtrail=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let summary = match cli.command {
        Command::Train(args) => run("train", &args, true)?,
        Command::Evaluate(args) => run("evaluate", &args, false)?,
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run(mode: &'static str, args: &RunArgs, learn: bool) -> Result<RunSummary> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let seed = config.seed;

    let mut game = Game::new(config)?;
    let mut agent = QLearningAgent::with_seed(Hyperparameters::default(), seed.wrapping_add(1));
    if let Some(path) = &args.import {
        agent.load_into(path)?;
        tracing::info!("Loaded agent from {} ({} states)", path.display(), agent.table_size());
    }

    let settings = EpisodeSettings {
        level: args.level,
        max_steps: args.max_steps,
        dt: args.dt,
        learn,
    };

    let mut reports: Vec<EpisodeReport> = Vec::with_capacity(args.episodes);
    for episode in 0..args.episodes {
        let report = run_episode(&mut game, &mut agent, &settings);
        reports.push(report);

        if args.report_every > 0 && (episode + 1) % args.report_every == 0 {
            tracing::info!(
                "Episode {}/{}: avg reward {:.2}, epsilon {:.3}, states {}",
                episode + 1,
                args.episodes,
                agent.stats().moving_average(),
                agent.epsilon(),
                agent.table_size()
            );
        }
    }

    if let Some(path) = &args.export {
        agent.save(path)?;
        tracing::info!("Saved agent to {}", path.display());
    }

    Ok(summarize(mode, seed, &reports, &agent))
}

fn summarize(
    mode: &'static str,
    seed: u64,
    reports: &[EpisodeReport],
    agent: &QLearningAgent,
) -> RunSummary {
    let count = |outcome: EpisodeOutcome| reports.iter().filter(|r| r.outcome == outcome).count();
    let n = reports.len().max(1) as f64;

    RunSummary {
        mode,
        seed,
        episodes: reports.len(),
        goals: count(EpisodeOutcome::GoalReached),
        catches: count(EpisodeOutcome::Caught),
        timeouts: count(EpisodeOutcome::Timeout),
        mean_reward: reports.iter().map(|r| r.total_reward).sum::<f64>() / n,
        best_reward: reports
            .iter()
            .map(|r| r.total_reward)
            .fold(None, |best: Option<f64>, r| Some(best.map_or(r, |b| b.max(r)))),
        mean_steps: reports.iter().map(|r| r.steps as f64).sum::<f64>() / n,
        final_epsilon: agent.epsilon(),
        table_size: agent.table_size(),
    }
}
