//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// A grid cell addressed by column and row
///
/// Signed so that neighbours of edge cells can be expressed and then
/// rejected by bounds checks instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub c: i32,
    pub r: i32,
}

impl Cell {
    pub const fn new(c: i32, r: i32) -> Self {
        Self { c, r }
    }

    /// 4-connected neighbours in fixed order: left, right, up, down
    pub fn neighbors(&self) -> [Cell; 4] {
        [
            Cell::new(self.c - 1, self.r),
            Cell::new(self.c + 1, self.r),
            Cell::new(self.c, self.r - 1),
            Cell::new(self.c, self.r + 1),
        ]
    }

    pub fn manhattan(&self, other: &Cell) -> i32 {
        (self.c - other.c).abs() + (self.r - other.r).abs()
    }

    pub fn offset(&self, dc: i32, dr: i32) -> Cell {
        Cell::new(self.c + dc, self.r + dr)
    }
}

/// Discrete action space for the seeker, index-addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Stop,
}

impl Action {
    pub const COUNT: usize = 5;

    pub const ALL: [Action; Action::COUNT] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Stop,
    ];

    /// Map an action index to an action; out-of-range indices yield None
    pub fn from_index(index: usize) -> Option<Action> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            Action::Left => 0,
            Action::Right => 1,
            Action::Up => 2,
            Action::Down => 3,
            Action::Stop => 4,
        }
    }

    /// Unit direction `(dx, dy)` for this action (screen coordinates, y down)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Stop => (0, 0),
        }
    }
}
