//! Pathfinding pursuers

use std::collections::VecDeque;

use glam::Vec2;

use crate::agents::seeker::Seeker;
use crate::core::config::HunterConfig;
use crate::core::random::RandomSource;
use crate::core::types::Cell;
use crate::grid::field::ObstacleField;
use crate::grid::movement::{cell_center, cell_of, GridBounds};

/// Distance at which a waypoint counts as reached
const WAYPOINT_EPSILON: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct Hunter {
    pub pos: Vec2,
    pub radius: f32,
    /// Front is the next waypoint
    path: VecDeque<Cell>,
    recalc_timer: f32,
    jitter: (i32, i32),
    last_cell: Cell,
    /// Pixels per second, as of the last `calculate_speed`
    speed: f32,
}

impl Hunter {
    /// The first `should_recalculate_path` call always fires
    pub fn new(spawn: Cell, radius: f32, tile: f32) -> Self {
        Self {
            pos: cell_center(spawn, tile),
            radius,
            path: VecDeque::new(),
            recalc_timer: 0.0,
            jitter: (0, 0),
            last_cell: spawn,
            speed: 0.0,
        }
    }

    pub fn path(&self) -> impl Iterator<Item = &Cell> {
        self.path.iter()
    }

    pub fn path_len(&self) -> usize {
        self.path.len()
    }

    pub fn set_path(&mut self, path: Vec<Cell>) {
        self.path = path.into();
    }

    pub fn jitter(&self) -> (i32, i32) {
        self.jitter
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn cell(&self, tile: f32) -> Cell {
        cell_of(self.pos, tile)
    }

    /// Count down the recalculation timer. When it elapses the timer is
    /// rearmed, the goal jitter is redrawn, and the caller must recompute
    /// the path this tick.
    pub fn should_recalculate_path(
        &mut self,
        dt: f32,
        config: &HunterConfig,
        rng: &mut dyn RandomSource,
    ) -> bool {
        self.recalc_timer -= dt;
        if self.recalc_timer > 0.0 {
            return false;
        }
        self.recalc_timer = 1.0 / config.recalc_hz;
        let j = config.jitter.abs();
        self.jitter = (rng.range_i32(-j, j), rng.range_i32(-j, j));
        true
    }

    /// Seeker cell plus jitter, clamped to the grid
    pub fn goal_cell(&self, seeker_cell: Cell, cols: i32, rows: i32) -> Cell {
        Cell::new(
            (seeker_cell.c + self.jitter.0).clamp(0, cols - 1),
            (seeker_cell.r + self.jitter.1).clamp(0, rows - 1),
        )
    }

    /// Pixels per second, reduced while on or about to enter an obstacle
    pub fn calculate_speed(
        &mut self,
        field: &ObstacleField,
        config: &HunterConfig,
        speed_factor: f32,
        tile: f32,
    ) -> f32 {
        let mut speed = config.base_speed * speed_factor * tile;
        let on_crumb = field.is_blocking_cell(self.cell(tile));
        let entering_crumb = self
            .path
            .front()
            .is_some_and(|next| field.is_blocking_cell(*next));
        if on_crumb || entering_crumb {
            speed *= config.crumb_speed_factor;
        }
        self.speed = speed;
        speed
    }

    /// Push away from other hunters inside the separation radius
    ///
    /// `positions` holds every hunter's position, including this one's at
    /// `index`, which is skipped.
    pub fn apply_separation(
        &mut self,
        index: usize,
        positions: &[Vec2],
        config: &HunterConfig,
        bounds: GridBounds,
        dt: f32,
    ) {
        let radius = config.separation_radius;
        let mut push = Vec2::ZERO;
        for (i, other) in positions.iter().enumerate() {
            if i == index {
                continue;
            }
            let away = self.pos - *other;
            let dist = away.length();
            if dist > 0.0 && dist < radius {
                push += away / dist * ((radius - dist) / radius);
            }
        }
        if push != Vec2::ZERO {
            self.pos += push.normalize_or_zero() * config.separation_force * dt;
            self.pos = bounds.clamp(self.pos);
        }
    }

    /// Advance toward the next waypoint's center, or straight at
    /// `fallback_target` with a little noise when there is no path
    pub fn move_along_path(
        &mut self,
        speed: f32,
        dt: f32,
        fallback_target: Vec2,
        config: &HunterConfig,
        bounds: GridBounds,
        rng: &mut dyn RandomSource,
    ) {
        let budget = speed * dt;

        if let Some(next) = self.path.front().copied() {
            let target = cell_center(next, bounds.tile);
            let to_target = target - self.pos;
            let dist = to_target.length();
            if dist > 0.0 {
                self.pos += to_target / dist * dist.min(budget);
            }
            let remaining = target - self.pos;
            let arrived = remaining.x.abs() < WAYPOINT_EPSILON && remaining.y.abs() < WAYPOINT_EPSILON;
            if arrived || remaining.length() <= WAYPOINT_EPSILON {
                self.path.pop_front();
            }
        } else {
            let heading = (fallback_target - self.pos).normalize_or_zero();
            let noise = Vec2::new(
                (rng.next_f32() * 2.0 - 1.0) * config.fallback_jitter,
                (rng.next_f32() * 2.0 - 1.0) * config.fallback_jitter,
            );
            self.pos += heading * budget + noise;
        }

        self.pos = bounds.clamp(self.pos);
    }

    /// Report the previously occupied cell if this hunter has moved on
    pub fn check_cell_change(&mut self, tile: f32) -> Option<Cell> {
        let current = self.cell(tile);
        if current == self.last_cell {
            return None;
        }
        let previous = self.last_cell;
        self.last_cell = current;
        Some(previous)
    }

    /// Catching needs genuine overlap, scaled by `catch_margin`
    pub fn has_caught(&self, seeker: &Seeker, catch_margin: f32) -> bool {
        self.pos.distance(seeker.pos) < (self.radius + seeker.radius) * catch_margin
    }
}
