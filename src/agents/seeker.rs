//! The player-controlled seeker
//!
//! Movement follows committed-direction turning: a wished turn only takes
//! effect near a cell center on the axis being left, or after a short wait.

use glam::Vec2;

use crate::core::config::SeekerConfig;
use crate::core::types::Cell;
use crate::grid::movement::{axis_center, cell_center, cell_of};

#[derive(Debug, Clone)]
pub struct Seeker {
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per second
    speed: f32,
    dir: (i32, i32),
    wish: (i32, i32),
    turn_timer: f32,
    turn_tolerance: f32,
    turn_wait: f32,
    tile: f32,
}

impl Seeker {
    pub fn new(spawn: Cell, config: &SeekerConfig, tile: f32) -> Self {
        Self {
            pos: cell_center(spawn, tile),
            radius: config.radius,
            speed: config.speed * tile,
            dir: (0, 0),
            wish: (0, 0),
            turn_timer: 0.0,
            turn_tolerance: config.turn_tolerance,
            turn_wait: config.turn_wait,
            tile,
        }
    }

    /// Committed direction of travel
    pub fn direction(&self) -> (i32, i32) {
        self.dir
    }

    pub fn wish(&self) -> (i32, i32) {
        self.wish
    }

    /// Pixels per second
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_stationary(&self) -> bool {
        self.dir == (0, 0)
    }

    /// Record the wished direction. Components are reduced to their sign;
    /// a diagonal wish keeps only its horizontal part.
    pub fn set_wish(&mut self, dx: i32, dy: i32) {
        let dx = dx.signum();
        let dy = if dx != 0 { 0 } else { dy.signum() };
        self.wish = (dx, dy);
    }

    pub fn stop(&mut self) {
        self.dir = (0, 0);
        self.wish = (0, 0);
        self.turn_timer = 0.0;
    }

    /// Resolve the wished direction against the committed one
    pub fn process_turns(&mut self, dt: f32) {
        let wish = self.wish;
        if wish == (0, 0) || wish == self.dir {
            self.turn_timer = 0.0;
            return;
        }

        if self.is_stationary() {
            self.commit(wish);
            return;
        }

        let reversing = wish.0 == -self.dir.0 && wish.1 == -self.dir.1;
        if reversing {
            self.dir = wish;
            self.turn_timer = 0.0;
            return;
        }

        let off_center = if self.dir.0 != 0 {
            (self.pos.x - axis_center(self.pos.x, self.tile)).abs()
        } else {
            (self.pos.y - axis_center(self.pos.y, self.tile)).abs()
        };

        if off_center <= self.turn_tolerance {
            self.commit(wish);
            return;
        }

        self.turn_timer += dt;
        if self.turn_timer >= self.turn_wait {
            self.commit(wish);
        }
    }

    /// Adopt `dir`, snapping the axis perpendicular to it onto the cell center
    fn commit(&mut self, dir: (i32, i32)) {
        if dir.0 != 0 {
            self.pos.y = axis_center(self.pos.y, self.tile);
        } else if dir.1 != 0 {
            self.pos.x = axis_center(self.pos.x, self.tile);
        }
        self.dir = dir;
        self.turn_timer = 0.0;
    }

    pub fn movement_delta(&self, dt: f32) -> Vec2 {
        Vec2::new(self.dir.0 as f32, self.dir.1 as f32) * self.speed * dt
    }

    /// Keep the axis perpendicular to travel on the cell center; both axes
    /// when stationary
    pub fn snap_to_grid(&mut self) {
        if self.dir.0 != 0 || self.is_stationary() {
            self.pos.y = axis_center(self.pos.y, self.tile);
        }
        if self.dir.1 != 0 || self.is_stationary() {
            self.pos.x = axis_center(self.pos.x, self.tile);
        }
    }

    pub fn cell(&self) -> Cell {
        cell_of(self.pos, self.tile)
    }
}
