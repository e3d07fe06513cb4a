//! Episode runner
//!
//! The simulation has no step ceiling of its own; the runner enforces one
//! and reports a timeout when it is hit.

use serde::{Deserialize, Serialize};

use crate::learning::agent::QLearningAgent;
use crate::simulation::game::Game;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeOutcome {
    GoalReached,
    Caught,
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub outcome: EpisodeOutcome,
    pub steps: usize,
    pub total_reward: f64,
    pub survival_time: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct EpisodeSettings {
    pub level: Option<u32>,
    pub max_steps: usize,
    pub dt: f32,
    /// Update the table and close the episode on the agent
    pub learn: bool,
}

impl Default for EpisodeSettings {
    fn default() -> Self {
        Self {
            level: None,
            max_steps: 3000,
            dt: 1.0 / 30.0,
            learn: true,
        }
    }
}

/// Play one episode with `agent` controlling the seeker
///
/// When `settings.learn` is false the agent acts greedily and its table is
/// left as it was apart from lazily created rows.
pub fn run_episode(
    game: &mut Game,
    agent: &mut QLearningAgent,
    settings: &EpisodeSettings,
) -> EpisodeReport {
    let mut obs = game.reset(settings.level);
    let mut total_reward = 0.0;
    let mut survival_time = 0.0;
    let mut outcome = EpisodeOutcome::Timeout;
    let mut steps = 0;

    while steps < settings.max_steps {
        let action = if settings.learn {
            agent.act(&obs)
        } else {
            agent.greedy_action(&obs)
        };
        let result = game.step(action, settings.dt);
        steps += 1;
        total_reward += result.reward;
        survival_time = result.info.survival_time;

        if settings.learn {
            agent.learn(&obs, action, result.reward, &result.observation, result.done);
        }
        obs = result.observation;

        if result.done {
            outcome = if result.info.caught {
                EpisodeOutcome::Caught
            } else {
                EpisodeOutcome::GoalReached
            };
            break;
        }
    }

    if outcome == EpisodeOutcome::Timeout {
        tracing::debug!("Episode timed out after {} steps", steps);
    }
    if settings.learn {
        agent.end_episode(total_reward);
    }

    EpisodeReport {
        outcome,
        steps,
        total_reward,
        survival_time,
    }
}
