//! Game state and the per-tick update
//!
//! One tick runs, in order: seeker turn resolution, collision-resolved
//! seeker movement, grid re-snap, trail laying, the goal check, the hunter
//! loop (path, speed, separation, movement, obstacle destruction, catch),
//! and finally obstacle decay.

use serde::{Deserialize, Serialize};

use crate::agents::{Hunter, Seeker};
use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::random::{seeded, RandomSource};
use crate::core::types::Action;
use crate::grid::field::ObstacleField;
use crate::grid::movement::{move_with_collision, GridBounds};
use crate::grid::pathfinding::find_path;
use crate::simulation::observation::{observe, Observation};
use crate::simulation::reward::shaped_reward;
use crate::simulation::snapshot::{EntitySnapshot, HunterSnapshot, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    Caught,
    GoalReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Running,
    Terminated(TerminationReason),
}

/// Result of one tick; both flags are false on an ordinary tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutcome {
    pub caught: bool,
    pub level_complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub caught: bool,
    pub goal_reached: bool,
    /// Level in play after the step (already advanced on a goal step)
    pub level: u32,
    pub survival_time: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub level: u32,
    pub survival_time: f32,
    pub obstacle_count: usize,
    /// Cells per second before obstacle slowdown
    pub hunter_speed: f32,
    pub hunter_count: usize,
}

/// Owned state of one pursuit game
pub struct Game {
    config: GameConfig,
    bounds: GridBounds,
    field: ObstacleField,
    seeker: Seeker,
    hunters: Vec<Hunter>,
    rng: Box<dyn RandomSource>,
    level: u32,
    survival_time: f32,
    decay_accumulator: f32,
    state: RunState,
}

impl Game {
    /// Build a game using a ChaCha8 source seeded from `config.seed`
    pub fn new(config: GameConfig) -> Result<Self> {
        let rng = seeded(config.seed);
        Self::with_rng(config, rng)
    }

    /// Build a game drawing all randomness from `rng`
    pub fn with_rng(config: GameConfig, rng: Box<dyn RandomSource>) -> Result<Self> {
        config.validate()?;

        let grid = &config.grid;
        let bounds = GridBounds::new(grid.cols, grid.rows, grid.tile_size);
        let field = ObstacleField::new(grid.cols, grid.rows, config.goal.clone());
        let seeker = Seeker::new(config.seeker.spawn, &config.seeker, grid.tile_size);
        let level = config.levels.starting_level.max(1);

        let mut game = Self {
            config,
            bounds,
            field,
            seeker,
            hunters: Vec::new(),
            rng,
            level,
            survival_time: 0.0,
            decay_accumulator: 0.0,
            state: RunState::Running,
        };
        game.start_level(level);
        Ok(game)
    }

    /// Restart at `level`, or at the configured starting level
    pub fn reset(&mut self, level: Option<u32>) -> Observation {
        let level = level.unwrap_or(self.config.levels.starting_level);
        self.start_level(level);
        self.observation()
    }

    /// Reinitialize every piece of mutable state for `level`
    pub fn start_level(&mut self, level: u32) {
        let level = level.max(1);
        let tile = self.bounds.tile;

        self.level = level;
        self.field.clear();
        self.field
            .build_goal_barrier(self.config.obstacles.barrier_strength);
        self.seeker = Seeker::new(self.config.seeker.spawn, &self.config.seeker, tile);

        let count = self.config.levels.hunter_count(level);
        let spawns = &self.config.hunter.spawns;
        self.hunters = (0..count)
            .filter_map(|i| spawns.get(i % spawns.len().max(1)))
            .map(|spawn| Hunter::new(*spawn, self.config.hunter.radius, tile))
            .collect();

        self.survival_time = 0.0;
        self.decay_accumulator = 0.0;
        self.state = RunState::Running;

        tracing::debug!(
            "Level {} started with {} hunters at speed factor {:.2}",
            level,
            self.hunters.len(),
            self.config.levels.speed_factor(level)
        );
    }

    pub fn set_wish(&mut self, dx: i32, dy: i32) {
        self.seeker.set_wish(dx, dy);
    }

    pub fn stop(&mut self) {
        self.seeker.stop();
    }

    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::Stop => self.seeker.stop(),
            other => {
                let (dx, dy) = other.delta();
                self.seeker.set_wish(dx, dy);
            }
        }
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// A terminated game ignores ticks until it is reset. Non-positive `dt`
    /// is a no-op.
    pub fn tick(&mut self, dt: f32) -> TickOutcome {
        if self.state != RunState::Running || dt.is_nan() || dt <= 0.0 {
            return TickOutcome::default();
        }
        self.survival_time += dt;

        let Game {
            config,
            bounds,
            field,
            seeker,
            hunters,
            rng,
            ..
        } = self;
        let bounds = *bounds;
        let tile = bounds.tile;

        // Seeker turn, move, re-snap
        seeker.process_turns(dt);
        let prev_cell = seeker.cell();
        let delta = seeker.movement_delta(dt);
        seeker.pos = move_with_collision(
            seeker.pos,
            delta,
            bounds,
            config.seeker.snap_tolerance,
            |c, r| field.is_blocking(c, r),
        );
        seeker.snap_to_grid();

        // Trail
        let cell = seeker.cell();
        if cell != prev_cell && !field.is_goal_cell(prev_cell.c, prev_cell.r) {
            field.add_obstacle(prev_cell.c, prev_cell.r, config.obstacles.trail_strength);
        }

        if field.is_goal_cell(cell.c, cell.r) {
            let finished = self.level;
            tracing::info!(
                "Goal reached on level {} after {:.2}s",
                finished,
                self.survival_time
            );
            self.start_level(finished + 1);
            return TickOutcome {
                caught: false,
                level_complete: true,
            };
        }

        // Hunters
        let speed_factor = config.levels.speed_factor(self.level);
        let positions: Vec<_> = hunters.iter().map(|h| h.pos).collect();
        for (i, hunter) in hunters.iter_mut().enumerate() {
            if hunter.should_recalculate_path(dt, &config.hunter, rng.as_mut()) {
                let goal = hunter.goal_cell(cell, bounds.cols, bounds.rows);
                let start = hunter.cell(tile);
                let (open, crumb) = (config.hunter.open_cost, config.hunter.obstacle_cost);
                let path = find_path(bounds.cols, bounds.rows, start, goal, |c, r| {
                    if field.is_blocking(c, r) {
                        crumb
                    } else {
                        open
                    }
                });
                if path.is_empty() && start != goal {
                    tracing::debug!("Hunter {} has no path to {:?}; chasing directly", i, goal);
                }
                hunter.set_path(path);
            }

            let speed = hunter.calculate_speed(field, &config.hunter, speed_factor, tile);
            hunter.apply_separation(i, &positions, &config.hunter, bounds, dt);
            hunter.move_along_path(speed, dt, seeker.pos, &config.hunter, bounds, rng.as_mut());

            if let Some(left) = hunter.check_cell_change(tile) {
                field.destroy(left.c, left.r);
            }

            if hunter.has_caught(seeker, config.hunter.catch_margin) {
                self.state = RunState::Terminated(TerminationReason::Caught);
                tracing::info!(
                    "Caught by hunter {} on level {} after {:.2}s",
                    i,
                    self.level,
                    self.survival_time
                );
                return TickOutcome {
                    caught: true,
                    level_complete: false,
                };
            }
        }

        // Decay
        self.decay_accumulator += dt * config.obstacles.decay_per_second;
        while self.decay_accumulator >= 1.0 {
            self.decay_accumulator -= 1.0;
            field.decay_one_random_obstacle(rng.as_mut(), config.obstacles.ring_decay_chance);
        }

        TickOutcome::default()
    }

    /// Agent-controlled step. Out-of-range action indices leave the current
    /// wish untouched.
    pub fn step(&mut self, action: usize, dt: f32) -> StepResult {
        let before = self.observation();
        if let Some(action) = Action::from_index(action) {
            self.apply_action(action);
        }

        let outcome = self.tick(dt);
        let observation = self.observation();
        let reward = shaped_reward(&self.config.reward, &before, &observation, outcome);

        StepResult {
            observation,
            reward,
            done: outcome.caught || outcome.level_complete,
            info: StepInfo {
                caught: outcome.caught,
                goal_reached: outcome.level_complete,
                level: self.level,
                survival_time: self.survival_time,
            },
        }
    }

    pub fn observation(&self) -> Observation {
        observe(&self.field, &self.seeker, &self.hunters, self.bounds)
    }

    pub fn stats(&self) -> GameStats {
        GameStats {
            level: self.level,
            survival_time: self.survival_time,
            obstacle_count: self.field.count_blocking(),
            hunter_speed: self.config.hunter.base_speed * self.config.levels.speed_factor(self.level),
            hunter_count: self.hunters.len(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cols: self.bounds.cols,
            rows: self.bounds.rows,
            tile_size: self.bounds.tile,
            cells: self.field.strengths().to_vec(),
            goal_cells: self.field.goal_cells(),
            seeker: EntitySnapshot {
                pos: self.seeker.pos,
                radius: self.seeker.radius,
            },
            seeker_direction: self.seeker.direction(),
            hunters: self
                .hunters
                .iter()
                .map(|h| HunterSnapshot {
                    pos: h.pos,
                    radius: h.radius,
                    path: h.path().copied().collect(),
                })
                .collect(),
            level: self.level,
            state: self.state,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn field(&self) -> &ObstacleField {
        &self.field
    }

    /// Direct field access for scenario setup
    pub fn field_mut(&mut self) -> &mut ObstacleField {
        &mut self.field
    }

    pub fn seeker(&self) -> &Seeker {
        &self.seeker
    }

    pub fn hunters(&self) -> &[Hunter] {
        &self.hunters
    }
}
