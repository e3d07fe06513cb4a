//! Game configuration with documented constants
//!
//! All tunable numbers are collected here. Every section defaults
//! independently, so a TOML file only needs to name what it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{ChaseError, Result};
use crate::core::types::Cell;

/// Grid geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub cols: i32,
    pub rows: i32,
    /// Pixel-equivalent edge length of one cell
    pub tile_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: 40,
            rows: 25,
            tile_size: 20.0,
        }
    }
}

/// Goal opening on an edge column
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalConfig {
    pub col: i32,
    pub center_row: i32,
    /// Open rows are `center_row - half_height ..= center_row + half_height`
    pub half_height: i32,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            col: 0,
            center_row: 12,
            half_height: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekerConfig {
    /// Cells per second
    pub speed: f32,
    pub radius: f32,
    pub spawn: Cell,
    /// Pixel distance from a cell center within which a perpendicular turn commits
    pub turn_tolerance: f32,
    /// Seconds a wished turn may wait before it force-commits
    pub turn_wait: f32,
    /// Numeric tolerance for snapping to a center after a blocked move
    pub snap_tolerance: f32,
}

impl Default for SeekerConfig {
    fn default() -> Self {
        Self {
            speed: 6.0,
            radius: 7.0,
            spawn: Cell::new(34, 12),
            turn_tolerance: 3.0,
            turn_wait: 0.25,
            snap_tolerance: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HunterConfig {
    /// Cells per second before the level speed factor
    pub base_speed: f32,
    pub radius: f32,
    /// Path recalculations per second
    pub recalc_hz: f32,
    /// Goal jitter range in cells, applied independently per axis
    pub jitter: i32,
    /// Pixel radius inside which hunters push each other apart
    pub separation_radius: f32,
    /// Pixels per second of separation steering
    pub separation_force: f32,
    /// Speed multiplier while on or heading into an obstacle cell
    pub crumb_speed_factor: f32,
    /// Fraction of the summed radii that must overlap for a catch
    pub catch_margin: f32,
    /// Pathfinding cost of an open cell
    pub open_cost: f32,
    /// Pathfinding cost of an obstacle cell
    pub obstacle_cost: f32,
    /// Per-axis pixel noise added to fallback chasing
    pub fallback_jitter: f32,
    /// Spawn cells, assigned to hunters in order and reused cyclically
    pub spawns: Vec<Cell>,
}

impl Default for HunterConfig {
    fn default() -> Self {
        Self {
            base_speed: 3.0,
            radius: 7.0,
            recalc_hz: 4.0,
            jitter: 2,
            separation_radius: 30.0,
            separation_force: 40.0,
            crumb_speed_factor: 0.5,
            catch_margin: 0.8,
            open_cost: 1.0,
            obstacle_cost: 4.0,
            fallback_jitter: 0.5,
            spawns: vec![
                Cell::new(14, 6),
                Cell::new(14, 18),
                Cell::new(24, 3),
                Cell::new(24, 21),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    /// Strength of a crumb dropped by the seeker
    pub trail_strength: f32,
    /// Strength of each goal barrier cell
    pub barrier_strength: f32,
    /// Random decay events per simulated second
    pub decay_per_second: f32,
    /// Probability that a decay event targets the goal barrier first
    pub ring_decay_chance: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            trail_strength: 3.0,
            barrier_strength: 5.0,
            decay_per_second: 6.0,
            ring_decay_chance: 0.05,
        }
    }
}

/// Difficulty curve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub starting_level: u32,
    pub base_hunters: usize,
    /// One extra hunter every this many levels
    pub levels_per_extra_hunter: u32,
    pub max_hunters: usize,
    /// Added to the hunter speed factor per level above the first
    pub speed_step: f32,
    pub max_speed_factor: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            starting_level: 1,
            base_hunters: 1,
            levels_per_extra_hunter: 2,
            max_hunters: 4,
            speed_step: 0.1,
            max_speed_factor: 1.6,
        }
    }
}

impl LevelConfig {
    pub fn hunter_count(&self, level: u32) -> usize {
        let extra = if self.levels_per_extra_hunter == 0 {
            0
        } else {
            (level.saturating_sub(1) / self.levels_per_extra_hunter) as usize
        };
        (self.base_hunters + extra).min(self.max_hunters)
    }

    pub fn speed_factor(&self, level: u32) -> f32 {
        (1.0 + level.saturating_sub(1) as f32 * self.speed_step).min(self.max_speed_factor)
    }
}

/// Step-mode reward shaping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub goal: f64,
    pub caught: f64,
    /// Multiplier on the normalized goal-distance improvement
    pub progress_scale: f64,
    pub survival_bonus: f64,
    /// Normalized hunter distance inside which the danger penalty applies
    pub danger_radius: f64,
    pub danger_scale: f64,
    pub stop_penalty: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            goal: 100.0,
            caught: -100.0,
            progress_scale: 50.0,
            survival_bonus: 0.05,
            danger_radius: 0.2,
            danger_scale: 2.0,
            stop_penalty: 0.1,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seed for the default random source
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub goal: GoalConfig,
    #[serde(default)]
    pub seeker: SeekerConfig,
    #[serde(default)]
    pub hunter: HunterConfig,
    #[serde(default)]
    pub obstacles: ObstacleConfig,
    #[serde(default)]
    pub levels: LevelConfig,
    #[serde(default)]
    pub reward: RewardConfig,
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let g = &self.grid;
        if g.cols <= 0 || g.rows <= 0 {
            return Err(ChaseError::InvalidConfig(format!(
                "grid must be non-empty, got {}x{}",
                g.cols, g.rows
            )));
        }
        if g.tile_size <= 0.0 {
            return Err(ChaseError::InvalidConfig("tile_size must be positive".into()));
        }

        let goal = &self.goal;
        if goal.col != 0 && goal.col != g.cols - 1 {
            return Err(ChaseError::InvalidConfig(format!(
                "goal column {} is not an edge column",
                goal.col
            )));
        }
        if goal.half_height < 0
            || goal.center_row - goal.half_height < 0
            || goal.center_row + goal.half_height >= g.rows
        {
            return Err(ChaseError::InvalidConfig(
                "goal opening must lie inside the grid".into(),
            ));
        }

        let in_grid = |cell: &Cell| cell.c >= 0 && cell.r >= 0 && cell.c < g.cols && cell.r < g.rows;
        if !in_grid(&self.seeker.spawn) {
            return Err(ChaseError::InvalidConfig("seeker spawn is outside the grid".into()));
        }
        if self.hunter.spawns.iter().any(|s| !in_grid(s)) {
            return Err(ChaseError::InvalidConfig("hunter spawn is outside the grid".into()));
        }
        if self.hunter.spawns.is_empty() && self.levels.max_hunters > 0 {
            return Err(ChaseError::InvalidConfig(
                "hunters are enabled but no spawn points are configured".into(),
            ));
        }

        if self.seeker.speed <= 0.0 || self.hunter.base_speed < 0.0 {
            return Err(ChaseError::InvalidConfig("speeds must be positive".into()));
        }
        if self.hunter.recalc_hz <= 0.0 {
            return Err(ChaseError::InvalidConfig("recalc_hz must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.hunter.crumb_speed_factor) {
            return Err(ChaseError::InvalidConfig(
                "crumb_speed_factor must be within 0..=1".into(),
            ));
        }
        if self.hunter.open_cost <= 0.0 || self.hunter.obstacle_cost < self.hunter.open_cost {
            return Err(ChaseError::InvalidConfig(
                "obstacle_cost must be >= open_cost > 0".into(),
            ));
        }
        if self.obstacles.trail_strength <= 0.0 || self.obstacles.barrier_strength <= 0.0 {
            return Err(ChaseError::InvalidConfig("obstacle strengths must be positive".into()));
        }
        if self.obstacles.decay_per_second < 0.0 {
            return Err(ChaseError::InvalidConfig("decay_per_second must be >= 0".into()));
        }
        if self.reward.danger_radius <= 0.0 {
            return Err(ChaseError::InvalidConfig("danger_radius must be positive".into()));
        }

        Ok(())
    }
}
