//! Axis-separated movement with grid collision
//!
//! Horizontal motion resolves first, then vertical, so an entity pressed
//! against a wall on one axis still slides along the other.

use glam::Vec2;

use crate::core::types::Cell;

/// Cell containing a continuous position
pub fn cell_of(pos: Vec2, tile: f32) -> Cell {
    Cell::new((pos.x / tile).floor() as i32, (pos.y / tile).floor() as i32)
}

pub fn cell_center(cell: Cell, tile: f32) -> Vec2 {
    Vec2::new(
        (cell.c as f32 + 0.5) * tile,
        (cell.r as f32 + 0.5) * tile,
    )
}

/// Center coordinate of the cell containing `coord` on one axis
pub fn axis_center(coord: f32, tile: f32) -> f32 {
    ((coord / tile).floor() + 0.5) * tile
}

/// Bounds and collision parameters shared by every move on one grid
#[derive(Debug, Clone, Copy)]
pub struct GridBounds {
    pub cols: i32,
    pub rows: i32,
    pub tile: f32,
}

impl GridBounds {
    pub fn new(cols: i32, rows: i32, tile: f32) -> Self {
        Self { cols, rows, tile }
    }

    pub fn contains(&self, c: i32, r: i32) -> bool {
        c >= 0 && r >= 0 && c < self.cols && r < self.rows
    }

    pub fn width(&self) -> f32 {
        self.cols as f32 * self.tile
    }

    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile
    }

    /// Clamp a position to lie strictly inside the grid
    pub fn clamp(&self, pos: Vec2) -> Vec2 {
        let eps = 1e-3;
        Vec2::new(
            pos.x.clamp(0.0, self.width() - eps),
            pos.y.clamp(0.0, self.height() - eps),
        )
    }
}

/// Move `pos` by `delta`, refusing to enter blocked or out-of-bounds cells
///
/// On each axis, when the next cell in the direction of travel blocks, the
/// move is clamped at the current cell's center and snapped onto it once
/// within `snap_tolerance`.
pub fn move_with_collision<F>(
    pos: Vec2,
    delta: Vec2,
    bounds: GridBounds,
    snap_tolerance: f32,
    blocking: F,
) -> Vec2
where
    F: Fn(i32, i32) -> bool,
{
    let blocked = |c: i32, r: i32| !bounds.contains(c, r) || blocking(c, r);

    let row = (pos.y / bounds.tile).floor() as i32;
    let x = resolve_axis(pos.x, delta.x, bounds.tile, snap_tolerance, |along| {
        blocked(along, row)
    });

    let col = (x / bounds.tile).floor() as i32;
    let y = resolve_axis(pos.y, delta.y, bounds.tile, snap_tolerance, |along| {
        blocked(col, along)
    });

    Vec2::new(x, y)
}

fn resolve_axis<F>(pos: f32, delta: f32, tile: f32, snap_tolerance: f32, blocked: F) -> f32
where
    F: Fn(i32) -> bool,
{
    if delta == 0.0 {
        return pos;
    }

    let cell = (pos / tile).floor() as i32;
    let center = (cell as f32 + 0.5) * tile;
    let step = if delta > 0.0 { 1 } else { -1 };
    let next_blocked = blocked(cell + step);

    let mut d = delta;
    if next_blocked {
        d = if step > 0 {
            d.min((center - pos).max(0.0))
        } else {
            d.max((center - pos).min(0.0))
        };
    }

    let mut new = pos + d;
    let new_cell = (new / tile).floor() as i32;
    if new_cell != cell && blocked(new_cell) {
        new = pos;
    }

    if next_blocked && (new - center).abs() <= snap_tolerance {
        new = center;
    }
    new
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE: f32 = 20.0;

    fn bounds() -> GridBounds {
        GridBounds::new(10, 10, TILE)
    }

    #[test]
    fn test_unobstructed_move() {
        let pos = Vec2::new(100.0, 110.0);
        let moved = move_with_collision(pos, Vec2::new(5.0, 0.0), bounds(), 0.5, |_, _| false);
        assert_eq!(moved, Vec2::new(105.0, 110.0));
    }

    #[test]
    fn test_blocked_next_cell_clamps_and_snaps_to_center() {
        // Cell 5 spans 100..120; cell 6 is blocked
        let pos = Vec2::new(108.0, 110.0);
        let moved = move_with_collision(pos, Vec2::new(5.0, 0.0), bounds(), 0.5, |c, _| c == 6);
        assert_eq!(moved.x, 110.0);
        assert!(moved.x < 120.0);
    }

    #[test]
    fn test_blocked_entity_at_center_does_not_move() {
        let pos = Vec2::new(110.0, 110.0);
        for delta in [
            Vec2::new(3.0, 0.0),
            Vec2::new(-3.0, 0.0),
            Vec2::new(0.0, 3.0),
            Vec2::new(0.0, -3.0),
        ] {
            let moved = move_with_collision(pos, delta, bounds(), 0.5, |c, r| (c, r) != (5, 5));
            assert_eq!(moved, pos);
        }
    }

    #[test]
    fn test_grid_edge_blocks() {
        let pos = Vec2::new(10.0, 10.0);
        let moved = move_with_collision(pos, Vec2::new(-8.0, -8.0), bounds(), 0.5, |_, _| false);
        assert_eq!(moved, Vec2::new(10.0, 10.0));

        let far = Vec2::new(195.0, 100.0);
        let moved = move_with_collision(far, Vec2::new(8.0, 0.0), bounds(), 0.5, |_, _| false);
        assert_eq!(moved.x, 195.0);
    }

    #[test]
    fn test_slides_along_wall() {
        // Moving diagonally into a blocked column still advances vertically
        let pos = Vec2::new(110.0, 110.0);
        let moved = move_with_collision(pos, Vec2::new(4.0, 4.0), bounds(), 0.5, |c, _| c == 6);
        assert_eq!(moved.x, 110.0);
        assert_eq!(moved.y, 114.0);
    }

    #[test]
    fn test_approach_from_far_side_of_center() {
        // Moving left toward a blocked cell 4 from the right half of cell 5
        let pos = Vec2::new(113.0, 110.0);
        let moved = move_with_collision(pos, Vec2::new(-5.0, 0.0), bounds(), 0.5, |c, _| c == 4);
        assert_eq!(moved.x, 110.0);
    }

    #[test]
    fn test_cell_helpers() {
        assert_eq!(cell_of(Vec2::new(39.9, 0.0), TILE), Cell::new(1, 0));
        assert_eq!(cell_center(Cell::new(2, 3), TILE), Vec2::new(50.0, 70.0));
        assert_eq!(axis_center(47.0, TILE), 50.0);
    }
}
