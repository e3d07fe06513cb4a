//! Normalized observation handed to controllers
//!
//! Positions and distances are divided by the grid width/height or by its
//! diagonal so every field stays within roughly `-1..=1`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::agents::{Hunter, Seeker};
use crate::grid::field::ObstacleField;
use crate::grid::movement::{cell_center, GridBounds};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Seeker position, 0..1 on each axis
    pub seeker_x: f32,
    pub seeker_y: f32,
    /// Unit vector toward the goal center
    pub goal_dx: f32,
    pub goal_dy: f32,
    /// Distance to the goal center over the grid diagonal
    pub goal_distance: f32,
    /// Distance to the nearest hunter over the grid diagonal; 1 with no hunters
    pub hunter_distance: f32,
    /// Unit vector toward the nearest hunter
    pub hunter_dx: f32,
    pub hunter_dy: f32,
    pub blocked_up: bool,
    pub blocked_down: bool,
    pub blocked_left: bool,
    pub blocked_right: bool,
    /// Committed direction components
    pub dir_x: i32,
    pub dir_y: i32,
}

impl Observation {
    /// Adjacent-obstacle flags packed as up, down, left, right (bit 3..0)
    pub fn adjacency_mask(&self) -> u8 {
        (self.blocked_up as u8) << 3
            | (self.blocked_down as u8) << 2
            | (self.blocked_left as u8) << 1
            | self.blocked_right as u8
    }
}

pub fn observe(
    field: &ObstacleField,
    seeker: &Seeker,
    hunters: &[Hunter],
    bounds: GridBounds,
) -> Observation {
    let diagonal = Vec2::new(bounds.width(), bounds.height()).length();

    let goal = cell_center(field.goal_center(), bounds.tile);
    let to_goal = goal - seeker.pos;
    let goal_dir = to_goal.normalize_or_zero();

    let nearest = hunters
        .iter()
        .map(|h| h.pos - seeker.pos)
        .min_by(|a, b| a.length().total_cmp(&b.length()));
    let (hunter_distance, hunter_dir) = match nearest {
        Some(offset) => ((offset.length() / diagonal).min(1.0), offset.normalize_or_zero()),
        None => (1.0, Vec2::ZERO),
    };

    let cell = seeker.cell();
    let (dir_x, dir_y) = seeker.direction();

    Observation {
        seeker_x: seeker.pos.x / bounds.width(),
        seeker_y: seeker.pos.y / bounds.height(),
        goal_dx: goal_dir.x,
        goal_dy: goal_dir.y,
        goal_distance: to_goal.length() / diagonal,
        hunter_distance,
        hunter_dx: hunter_dir.x,
        hunter_dy: hunter_dir.y,
        blocked_up: field.is_blocking(cell.c, cell.r - 1),
        blocked_down: field.is_blocking(cell.c, cell.r + 1),
        blocked_left: field.is_blocking(cell.c - 1, cell.r),
        blocked_right: field.is_blocking(cell.c + 1, cell.r),
        dir_x,
        dir_y,
    }
}
