//! Crumbtrail - grid pursuit simulation with a tabular Q-learning seeker

pub mod agents;
pub mod core;
pub mod grid;
pub mod learning;
pub mod simulation;
