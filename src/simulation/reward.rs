//! Step-mode reward shaping

use crate::core::config::RewardConfig;
use crate::simulation::game::TickOutcome;
use crate::simulation::observation::Observation;

/// Reward for the transition `prev -> next` that produced `outcome`
///
/// Terminal ticks pay the flat goal/caught reward. Otherwise progress
/// toward the goal is rewarded, a small survival bonus is added, and
/// proximity to a hunter or standing still is penalized.
pub fn shaped_reward(
    config: &RewardConfig,
    prev: &Observation,
    next: &Observation,
    outcome: TickOutcome,
) -> f64 {
    if outcome.level_complete {
        return config.goal;
    }
    if outcome.caught {
        return config.caught;
    }

    let progress = config.progress_scale * (prev.goal_distance as f64 - next.goal_distance as f64);

    let hunter_distance = next.hunter_distance as f64;
    let danger = if hunter_distance < config.danger_radius {
        config.danger_scale * (1.0 - hunter_distance / config.danger_radius)
    } else {
        0.0
    };

    let stop = if next.dir_x == 0 && next.dir_y == 0 {
        config.stop_penalty
    } else {
        0.0
    };

    progress + config.survival_bonus - danger - stop
}
