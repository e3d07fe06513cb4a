//! Owned, read-only view of a game for renderers

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::types::Cell;
use crate::simulation::game::RunState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HunterSnapshot {
    pub pos: Vec2,
    pub radius: f32,
    /// Remaining waypoints, next first
    pub path: Vec<Cell>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub cols: i32,
    pub rows: i32,
    pub tile_size: f32,
    /// Row-major obstacle strengths
    pub cells: Vec<f32>,
    pub goal_cells: Vec<Cell>,
    pub seeker: EntitySnapshot,
    pub seeker_direction: (i32, i32),
    pub hunters: Vec<HunterSnapshot>,
    pub level: u32,
    pub state: RunState,
}
