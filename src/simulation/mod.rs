//! Pursuit simulation: game state, tick loop and the driver-facing contract

pub mod game;
pub mod observation;
pub mod reward;
pub mod snapshot;

pub use game::{Game, GameStats, RunState, StepInfo, StepResult, TerminationReason, TickOutcome};
pub use observation::{observe, Observation};
pub use reward::shaped_reward;
pub use snapshot::{EntitySnapshot, HunterSnapshot, Snapshot};
