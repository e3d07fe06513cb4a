pub mod config;
pub mod error;
pub mod random;
pub mod types;

pub use config::{
    GameConfig, GoalConfig, GridConfig, HunterConfig, LevelConfig, ObstacleConfig, RewardConfig,
    SeekerConfig,
};
pub use error::{ChaseError, Result};
pub use random::{seeded, RandomSource};
pub use types::{Action, Cell};
