//! Observation discretization
//!
//! The key combines the goal octant, the danger tier, the hunter octant
//! (only when a hunter is near or mid-range) and the adjacency bitmask:
//! 8 * (8 * 2 + 1) * 16 = 2176 reachable keys.

use std::f32::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::simulation::observation::Observation;

/// Normalized hunter distance below which danger is `Near`
pub const NEAR_DANGER: f32 = 0.08;
/// Normalized hunter distance below which danger is `Mid`
pub const MID_DANGER: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DangerTier {
    Near,
    Mid,
    Far,
}

impl DangerTier {
    pub fn from_distance(distance: f32) -> Self {
        if distance < NEAR_DANGER {
            DangerTier::Near
        } else if distance < MID_DANGER {
            DangerTier::Mid
        } else {
            DangerTier::Far
        }
    }

    fn code(self) -> u8 {
        match self {
            DangerTier::Near => 0,
            DangerTier::Mid => 1,
            DangerTier::Far => 2,
        }
    }
}

/// Bucket a direction into one of 8 octants
pub fn octant(dx: f32, dy: f32) -> u8 {
    let angle = dy.atan2(dx) + PI;
    ((angle / (PI / 4.0)).round() as i32).rem_euclid(8) as u8
}

/// Discrete state label used as the Q-table key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey(String);

impl StateKey {
    pub fn from_observation(obs: &Observation) -> Self {
        let goal = octant(obs.goal_dx, obs.goal_dy);
        let tier = DangerTier::from_distance(obs.hunter_distance);
        let hunter = match tier {
            DangerTier::Far => "x".to_string(),
            _ => octant(obs.hunter_dx, obs.hunter_dy).to_string(),
        };
        StateKey(format!(
            "g{}|d{}|h{}|a{:04b}",
            goal,
            tier.code(),
            hunter,
            obs.adjacency_mask()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for StateKey {
    fn from(value: String) -> Self {
        StateKey(value)
    }
}

impl From<&str> for StateKey {
    fn from(value: &str) -> Self {
        StateKey(value.to_string())
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shorthand for [`StateKey::from_observation`]
pub fn state_key(obs: &Observation) -> StateKey {
    StateKey::from_observation(obs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn obs(goal: (f32, f32), hunter: (f32, f32), hunter_distance: f32) -> Observation {
        Observation {
            seeker_x: 0.5,
            seeker_y: 0.5,
            goal_dx: goal.0,
            goal_dy: goal.1,
            goal_distance: 0.4,
            hunter_distance,
            hunter_dx: hunter.0,
            hunter_dy: hunter.1,
            blocked_up: true,
            blocked_down: false,
            blocked_left: false,
            blocked_right: true,
            dir_x: 0,
            dir_y: 0,
        }
    }

    #[test]
    fn test_octants() {
        assert_eq!(octant(-1.0, 0.0), 0);
        assert_eq!(octant(0.0, -1.0), 2);
        assert_eq!(octant(1.0, 0.0), 4);
        assert_eq!(octant(0.0, 1.0), 6);
        assert_eq!(octant(-0.7, 0.7), 7);
    }

    #[test]
    fn test_danger_tiers() {
        assert_eq!(DangerTier::from_distance(0.01), DangerTier::Near);
        assert_eq!(DangerTier::from_distance(0.1), DangerTier::Mid);
        assert_eq!(DangerTier::from_distance(0.5), DangerTier::Far);
    }

    #[test]
    fn test_key_format() {
        let key = state_key(&obs((-1.0, 0.0), (1.0, 0.0), 0.05));
        assert_eq!(key.as_str(), "g0|d0|h4|a1001");
    }

    #[test]
    fn test_far_hunter_direction_is_ignored() {
        let a = state_key(&obs((-1.0, 0.0), (1.0, 0.0), 0.9));
        let b = state_key(&obs((-1.0, 0.0), (0.0, 1.0), 0.9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_space_is_small() {
        let mut keys = HashSet::new();
        let steps = 48;
        for gi in 0..steps {
            let ga = gi as f32 / steps as f32 * 2.0 * PI;
            for hi in 0..steps {
                let ha = hi as f32 / steps as f32 * 2.0 * PI;
                for dist in [0.01, 0.1, 0.5] {
                    for mask in 0..16u8 {
                        let mut o = obs((ga.cos(), ga.sin()), (ha.cos(), ha.sin()), dist);
                        o.blocked_up = mask & 8 != 0;
                        o.blocked_down = mask & 4 != 0;
                        o.blocked_left = mask & 2 != 0;
                        o.blocked_right = mask & 1 != 0;
                        keys.insert(state_key(&o));
                    }
                }
            }
        }
        assert_eq!(keys.len(), 2176);
    }
}
