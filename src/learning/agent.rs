//! Tabular Q-learning controller for the seeker
//!
//! Off-policy TD control: every update moves `Q(s, a)` toward
//! `r + γ max_a' Q(s', a')`, or toward `r` alone on terminal transitions.

use std::collections::VecDeque;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::random::{seeded, RandomSource};
use crate::core::types::Action;
use crate::learning::state::StateKey;
use crate::simulation::observation::Observation;

/// Episodes kept for the moving-average reward
pub const REWARD_WINDOW: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// α
    pub learning_rate: f64,
    /// γ
    pub gamma: f64,
    /// Current exploration rate
    pub epsilon: f64,
    /// Multiplicative decay applied after every episode
    pub epsilon_decay: f64,
    pub epsilon_min: f64,
    pub num_actions: usize,
    /// Upper bound of the uniform noise seeded into fresh table rows
    pub init_noise: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            gamma: 0.95,
            epsilon: 1.0,
            epsilon_decay: 0.995,
            epsilon_min: 0.05,
            num_actions: Action::COUNT,
            init_noise: 0.01,
        }
    }
}

impl Hyperparameters {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(format!("learning_rate {} outside (0, 1]", self.learning_rate));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(format!("gamma {} outside [0, 1]", self.gamma));
        }
        if !(0.0..=1.0).contains(&self.epsilon) || !(0.0..=1.0).contains(&self.epsilon_min) {
            return Err("epsilon and epsilon_min must lie in [0, 1]".into());
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(format!("epsilon_decay {} outside (0, 1]", self.epsilon_decay));
        }
        if self.num_actions == 0 {
            return Err("num_actions must be positive".into());
        }
        if !(self.init_noise >= 0.0 && self.init_noise.is_finite()) {
            return Err("init_noise must be finite and non-negative".into());
        }
        Ok(())
    }
}

/// Per-agent training record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    pub episodes: u64,
    pub total_reward: f64,
    /// None until the first episode ends
    pub best_reward: Option<f64>,
    /// Most recent episode rewards, oldest first
    pub recent_rewards: VecDeque<f64>,
}

impl TrainingStats {
    pub fn record(&mut self, reward: f64) {
        self.episodes += 1;
        self.total_reward += reward;
        self.best_reward = Some(self.best_reward.map_or(reward, |best| best.max(reward)));
        self.recent_rewards.push_back(reward);
        while self.recent_rewards.len() > REWARD_WINDOW {
            self.recent_rewards.pop_front();
        }
    }

    /// Mean over the recent window; 0 before any episode
    pub fn moving_average(&self) -> f64 {
        if self.recent_rewards.is_empty() {
            return 0.0;
        }
        self.recent_rewards.iter().sum::<f64>() / self.recent_rewards.len() as f64
    }

    pub fn mean_reward(&self) -> f64 {
        if self.episodes == 0 {
            return 0.0;
        }
        self.total_reward / self.episodes as f64
    }
}

pub struct QLearningAgent {
    pub(crate) params: Hyperparameters,
    pub(crate) stats: TrainingStats,
    pub(crate) table: AHashMap<String, Vec<f64>>,
    rng: Box<dyn RandomSource>,
}

impl std::fmt::Debug for QLearningAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QLearningAgent")
            .field("params", &self.params)
            .field("stats", &self.stats)
            .field("table_size", &self.table.len())
            .finish()
    }
}

impl QLearningAgent {
    pub fn new(params: Hyperparameters, rng: Box<dyn RandomSource>) -> Self {
        Self {
            params,
            stats: TrainingStats::default(),
            table: AHashMap::new(),
            rng,
        }
    }

    /// Agent drawing from a ChaCha8 source seeded with `seed`
    pub fn with_seed(params: Hyperparameters, seed: u64) -> Self {
        Self::new(params, seeded(seed))
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.params
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn epsilon(&self) -> f64 {
        self.params.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.params.epsilon = epsilon.clamp(0.0, 1.0);
    }

    pub fn table_size(&self) -> usize {
        self.table.len()
    }

    /// Stored row for `key` without creating it
    pub fn peek_q(&self, key: &StateKey) -> Option<&[f64]> {
        self.table.get(key.as_str()).map(Vec::as_slice)
    }

    /// Action values for `key`, created with small random noise on first access
    pub fn get_q(&mut self, key: &StateKey) -> &mut [f64] {
        let n = self.params.num_actions;
        let noise = self.params.init_noise;
        let rng = &mut self.rng;
        self.table
            .entry(key.as_str().to_owned())
            .or_insert_with(|| (0..n).map(|_| rng.next_f64() * noise).collect())
    }

    /// ε-greedy action index
    pub fn act(&mut self, obs: &Observation) -> usize {
        if self.rng.next_f64() < self.params.epsilon {
            return self.rng.index(self.params.num_actions);
        }
        self.greedy_action(obs)
    }

    /// Highest-valued action, lowest index on ties
    pub fn greedy_action(&mut self, obs: &Observation) -> usize {
        let key = StateKey::from_observation(obs);
        argmax(self.get_q(&key))
    }

    /// One temporal-difference update. Out-of-range actions are ignored.
    pub fn learn(
        &mut self,
        obs: &Observation,
        action: usize,
        reward: f64,
        next_obs: &Observation,
        done: bool,
    ) {
        if action >= self.params.num_actions {
            return;
        }
        let key = StateKey::from_observation(obs);
        self.learn_key(&key, action, reward, &StateKey::from_observation(next_obs), done);
    }

    /// Key-addressed form of [`learn`](Self::learn)
    pub fn learn_key(
        &mut self,
        key: &StateKey,
        action: usize,
        reward: f64,
        next_key: &StateKey,
        done: bool,
    ) {
        if action >= self.params.num_actions {
            return;
        }
        let target = if done {
            reward
        } else {
            let best_next = self
                .get_q(next_key)
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            reward + self.params.gamma * best_next
        };
        let lr = self.params.learning_rate;
        let q = self.get_q(key);
        let current = q[action];
        q[action] = current + lr * (target - current);
    }

    /// Close an episode: update statistics, then decay ε toward its floor
    pub fn end_episode(&mut self, total_reward: f64) {
        self.stats.record(total_reward);
        self.params.epsilon =
            (self.params.epsilon * self.params.epsilon_decay).max(self.params.epsilon_min);
    }

    /// Forget the table and statistics; hyperparameters are kept
    pub fn reset(&mut self) {
        self.table.clear();
        self.stats = TrainingStats::default();
    }
}

/// Index of the first maximum
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
