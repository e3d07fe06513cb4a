//! Tabular Q-learning controller for the seeker

pub mod agent;
pub mod episode;
pub mod serialization;
pub mod state;

pub use agent::{argmax, Hyperparameters, QLearningAgent, TrainingStats, REWARD_WINDOW};
pub use episode::{run_episode, EpisodeOutcome, EpisodeReport, EpisodeSettings};
pub use serialization::AgentExport;
pub use state::{octant, state_key, DangerTier, StateKey};
