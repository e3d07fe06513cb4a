//! Strength-valued obstacle grid
//!
//! Crumbs, the goal barrier and the goal opening all live here. The ring
//! set and the strength array are two views of the same field, so every
//! mutation goes through this type.

use std::collections::BTreeSet;

use crate::core::config::GoalConfig;
use crate::core::random::RandomSource;
use crate::core::types::Cell;

/// Rows above and below the goal opening covered by the barrier
/// (one margin row plus two capping rows)
const BARRIER_ROW_REACH: i32 = 3;
/// Columns of barrier, starting at the goal column and moving inward
const BARRIER_DEPTH: i32 = 2;

#[derive(Debug, Clone)]
pub struct ObstacleField {
    cols: i32,
    rows: i32,
    cells: Vec<f32>,
    /// Barrier cells that still have strength
    ring: BTreeSet<usize>,
    /// Win region, independent of blocking
    goal_open: BTreeSet<usize>,
    goal: GoalConfig,
}

impl ObstacleField {
    /// Create an empty field. Dimensions below 1 are raised to 1.
    pub fn new(cols: i32, rows: i32, goal: GoalConfig) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cells: vec![0.0; (cols * rows) as usize],
            ring: BTreeSet::new(),
            goal_open: BTreeSet::new(),
            goal,
        }
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn goal(&self) -> &GoalConfig {
        &self.goal
    }

    pub fn in_bounds(&self, c: i32, r: i32) -> bool {
        c >= 0 && r >= 0 && c < self.cols && r < self.rows
    }

    pub fn index(&self, c: i32, r: i32) -> Option<usize> {
        self.in_bounds(c, r).then(|| (r * self.cols + c) as usize)
    }

    pub fn cell_at_index(&self, idx: usize) -> Cell {
        let idx = idx as i32;
        Cell::new(idx % self.cols, idx / self.cols)
    }

    /// Stored strength; 0 for out-of-bounds cells
    pub fn strength(&self, c: i32, r: i32) -> f32 {
        self.index(c, r).map_or(0.0, |i| self.cells[i])
    }

    /// Out-of-bounds cells always block
    pub fn is_blocking(&self, c: i32, r: i32) -> bool {
        match self.index(c, r) {
            Some(i) => self.cells[i] > 0.0,
            None => true,
        }
    }

    pub fn is_blocking_cell(&self, cell: Cell) -> bool {
        self.is_blocking(cell.c, cell.r)
    }

    /// Raise a cell to at least `strength`; never lowers it
    pub fn add_obstacle(&mut self, c: i32, r: i32, strength: f32) {
        if let Some(i) = self.index(c, r) {
            self.cells[i] = self.cells[i].max(strength);
        }
    }

    pub fn weaken(&mut self, c: i32, r: i32, amount: f32) {
        if let Some(i) = self.index(c, r) {
            self.weaken_at_index(i, amount);
        }
    }

    /// Lower a cell by `amount`, flooring at 0. A cell that reaches 0
    /// leaves the ring set.
    pub fn weaken_at_index(&mut self, idx: usize, amount: f32) {
        let Some(strength) = self.cells.get_mut(idx) else {
            return;
        };
        if *strength <= 0.0 || amount.is_nan() || amount <= 0.0 {
            return;
        }
        *strength = (*strength - amount).max(0.0);
        if *strength == 0.0 {
            self.ring.remove(&idx);
        }
    }

    /// Weaken a cell to zero
    pub fn destroy(&mut self, c: i32, r: i32) {
        let strength = self.strength(c, r);
        self.weaken(c, r, strength);
    }

    pub fn count_blocking(&self) -> usize {
        self.cells.iter().filter(|&&s| s > 0.0).count()
    }

    /// Remove every obstacle and forget the barrier and goal bookkeeping
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|s| *s = 0.0);
        self.ring.clear();
        self.goal_open.clear();
    }

    /// Mark the goal opening and surround it with a barrier of `strength`
    ///
    /// The barrier covers the goal column and the next column inward, from
    /// three rows above the opening to three rows below it, with the
    /// opening rows themselves left clear.
    pub fn build_goal_barrier(&mut self, strength: f32) {
        self.ring.clear();
        self.goal_open.clear();

        let top = self.goal.center_row - self.goal.half_height;
        let bottom = self.goal.center_row + self.goal.half_height;
        let goal_col = self.goal.col;

        for r in top..=bottom {
            if let Some(i) = self.index(goal_col, r) {
                self.goal_open.insert(i);
            }
        }

        let inward = if goal_col == 0 { 1 } else { -1 };
        for depth in 0..BARRIER_DEPTH {
            let c = goal_col + depth * inward;
            for r in (top - BARRIER_ROW_REACH)..=(bottom + BARRIER_ROW_REACH) {
                if (top..=bottom).contains(&r) {
                    continue;
                }
                if let Some(i) = self.index(c, r) {
                    self.add_obstacle(c, r, strength);
                    self.ring.insert(i);
                }
            }
        }
    }

    /// One decay event
    ///
    /// With probability `ring_chance` a random barrier cell loses one point
    /// of strength; otherwise a uniformly random cell does, if it is
    /// blocking. Returns the index that was weakened, if any.
    pub fn decay_one_random_obstacle(
        &mut self,
        rng: &mut dyn RandomSource,
        ring_chance: f32,
    ) -> Option<usize> {
        if !self.ring.is_empty() && rng.next_f32() < ring_chance {
            let pick = rng.index(self.ring.len());
            let idx = self.ring.iter().nth(pick).copied()?;
            self.weaken_at_index(idx, 1.0);
            return Some(idx);
        }

        let idx = rng.index(self.cells.len());
        if self.cells[idx] > 0.0 {
            self.weaken_at_index(idx, 1.0);
            Some(idx)
        } else {
            None
        }
    }

    pub fn is_goal_cell(&self, c: i32, r: i32) -> bool {
        c == self.goal.col && self.index(c, r).is_some_and(|i| self.goal_open.contains(&i))
    }

    pub fn is_ring_cell(&self, c: i32, r: i32) -> bool {
        self.index(c, r).is_some_and(|i| self.ring.contains(&i))
    }

    pub fn ring_len(&self) -> usize {
        self.ring.len()
    }

    pub fn goal_cells(&self) -> Vec<Cell> {
        self.goal_open.iter().map(|&i| self.cell_at_index(i)).collect()
    }

    pub fn goal_center(&self) -> Cell {
        Cell::new(self.goal.col, self.goal.center_row)
    }

    /// Row-major strengths
    pub fn strengths(&self) -> &[f32] {
        &self.cells
    }
}
