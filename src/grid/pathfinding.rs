//! A* pathfinding over the 4-connected cell grid
//!
//! Step costs come from a caller-supplied function; an infinite cost marks
//! a cell impassable. Ties on `f` are broken by insertion order into the
//! open set, which keeps paths reproducible.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::core::types::Cell;

/// Node in the A* open set
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathNode {
    index: usize,
    f_cost: OrderedFloat<f32>,
    /// Insertion sequence; earlier wins on equal `f`
    seq: Reverse<u64>,
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap on f, then FIFO on seq
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a path from `start` to `goal` on a `cols x rows` grid
///
/// The returned path excludes `start` and ends at `goal`. It is empty when
/// `start == goal`, when either end lies outside the grid, or when the goal
/// is unreachable.
pub fn find_path<F>(cols: i32, rows: i32, start: Cell, goal: Cell, cost: F) -> Vec<Cell>
where
    F: Fn(i32, i32) -> f32,
{
    let in_bounds = |cell: Cell| cell.c >= 0 && cell.r >= 0 && cell.c < cols && cell.r < rows;
    if start == goal || !in_bounds(start) || !in_bounds(goal) {
        return Vec::new();
    }

    let to_index = |cell: Cell| (cell.r * cols + cell.c) as usize;
    let to_cell = |idx: usize| Cell::new(idx as i32 % cols, idx as i32 / cols);
    let total = (cols * rows) as usize;

    let mut g_scores = vec![f32::INFINITY; total];
    let mut came_from: Vec<Option<usize>> = vec![None; total];
    let mut closed = vec![false; total];
    let mut open_set = BinaryHeap::new();
    let mut seq = 0u64;

    let start_idx = to_index(start);
    let goal_idx = to_index(goal);
    g_scores[start_idx] = 0.0;
    open_set.push(PathNode {
        index: start_idx,
        f_cost: OrderedFloat(start.manhattan(&goal) as f32),
        seq: Reverse(seq),
    });

    while let Some(current) = open_set.pop() {
        if closed[current.index] {
            continue;
        }
        if current.index == goal_idx {
            return reconstruct_path(&came_from, start_idx, goal_idx, to_cell);
        }
        closed[current.index] = true;

        let current_cell = to_cell(current.index);
        let current_g = g_scores[current.index];

        for neighbor in current_cell.neighbors() {
            if !in_bounds(neighbor) {
                continue;
            }
            let n_idx = to_index(neighbor);
            if closed[n_idx] {
                continue;
            }

            let step = cost(neighbor.c, neighbor.r);
            if step.is_infinite() || step.is_nan() {
                continue;
            }

            let tentative_g = current_g + step;
            if tentative_g < g_scores[n_idx] {
                came_from[n_idx] = Some(current.index);
                g_scores[n_idx] = tentative_g;
                seq += 1;
                open_set.push(PathNode {
                    index: n_idx,
                    f_cost: OrderedFloat(tentative_g + neighbor.manhattan(&goal) as f32),
                    seq: Reverse(seq),
                });
            }
        }
    }

    Vec::new()
}

/// Walk predecessor links from goal back to start, then reverse
fn reconstruct_path(
    came_from: &[Option<usize>],
    start: usize,
    goal: usize,
    to_cell: impl Fn(usize) -> Cell,
) -> Vec<Cell> {
    let mut path = Vec::new();
    let mut current = goal;
    while current != start {
        path.push(to_cell(current));
        match came_from[current] {
            Some(prev) => current = prev,
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

/// Sum of step costs along a path
pub fn path_cost<F>(path: &[Cell], cost: F) -> f32
where
    F: Fn(i32, i32) -> f32,
{
    path.iter().map(|cell| cost(cell.c, cell.r)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(_: i32, _: i32) -> f32 {
        1.0
    }

    #[test]
    fn test_same_start_goal_is_empty() {
        let p = Cell::new(4, 4);
        assert!(find_path(10, 10, p, p, open).is_empty());
    }

    #[test]
    fn test_straight_line() {
        let path = find_path(10, 10, Cell::new(0, 0), Cell::new(3, 0), open);
        assert_eq!(path.len(), 3);
        assert_eq!(path.last(), Some(&Cell::new(3, 0)));
        assert!(!path.contains(&Cell::new(0, 0)));
    }

    #[test]
    fn test_detours_around_infinite_cost() {
        let wall = |c: i32, r: i32| if (c, r) == (1, 0) { f32::INFINITY } else { 1.0 };
        let path = find_path(10, 10, Cell::new(0, 0), Cell::new(2, 0), wall);
        assert!(!path.is_empty());
        assert!(!path.contains(&Cell::new(1, 0)));
        assert_eq!(path.last(), Some(&Cell::new(2, 0)));
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_walled_goal_is_unreachable() {
        // Ring of walls around (5, 5) closes a 3x3 region
        let walled = |c: i32, r: i32| {
            let ring = (4..=6).contains(&c) && (4..=6).contains(&r) && !(c == 5 && r == 5);
            if ring {
                f32::INFINITY
            } else {
                1.0
            }
        };
        let path = find_path(10, 10, Cell::new(0, 0), Cell::new(5, 5), walled);
        assert!(path.is_empty());
    }

    #[test]
    fn test_out_of_bounds_goal_is_empty() {
        assert!(find_path(5, 5, Cell::new(0, 0), Cell::new(9, 9), open).is_empty());
    }

    #[test]
    fn test_prefers_cheaper_detour() {
        // Expensive cell at (1, 0); a one-row detour costs 4, going through costs 6
        let costly = |c: i32, r: i32| if (c, r) == (1, 0) { 5.0 } else { 1.0 };
        let path = find_path(10, 10, Cell::new(0, 0), Cell::new(2, 0), costly);
        assert!(!path.contains(&Cell::new(1, 0)));
    }

    #[test]
    fn test_cuts_through_when_detour_is_longer() {
        // Full column of cost-4 cells: no detour exists, so the path crosses it
        let column = |c: i32, _r: i32| if c == 3 { 4.0 } else { 1.0 };
        let path = find_path(10, 10, Cell::new(0, 5), Cell::new(6, 5), column);
        assert_eq!(path.last(), Some(&Cell::new(6, 5)));
        assert!(path.iter().any(|cell| cell.c == 3));
        assert_eq!(path_cost(&path, column), 9.0);
    }

    #[test]
    fn test_ties_are_reproducible() {
        let a = find_path(10, 10, Cell::new(0, 0), Cell::new(4, 4), open);
        let b = find_path(10, 10, Cell::new(0, 0), Cell::new(4, 4), open);
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
    }

    #[test]
    fn test_path_cost() {
        let path = vec![Cell::new(1, 0), Cell::new(2, 0), Cell::new(3, 0)];
        assert_eq!(path_cost(&path, open), 3.0);
    }
}
