//! Grid layer: obstacle field, A* search and collision-resolved movement

pub mod field;
pub mod movement;
pub mod pathfinding;

pub use field::ObstacleField;
pub use movement::{axis_center, cell_center, cell_of, move_with_collision, GridBounds};
pub use pathfinding::{find_path, path_cost};
