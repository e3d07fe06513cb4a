//! Seeker and hunter entities

pub mod hunter;
pub mod seeker;

pub use hunter::Hunter;
pub use seeker::Seeker;
