//! Simulation integration tests

use glam::Vec2;

use crumbtrail::agents::Seeker;
use crumbtrail::core::config::{GameConfig, GoalConfig, GridConfig};
use crumbtrail::core::types::{Action, Cell};
use crumbtrail::grid::{find_path, move_with_collision, GridBounds};
use crumbtrail::simulation::{Game, RunState};

fn game(config: GameConfig) -> Game {
    match Game::new(config) {
        Ok(game) => game,
        Err(e) => panic!("config rejected: {e}"),
    }
}

#[test]
fn test_trivial_win_path_stays_winnable() {
    let mut config = GameConfig::default();
    config.seed = 42;
    config.hunter.base_speed = 1.0;

    let mut game = game(config);
    assert_eq!(game.hunters().len(), 1);
    assert_eq!(game.seeker().cell(), Cell::new(34, 12));
    game.apply_action(Action::Left);

    let mut reached = false;
    for _ in 0..1000 {
        let outcome = game.tick(1.0 / 60.0);
        assert!(!outcome.caught, "seeker was caught on the straight run");
        if outcome.level_complete {
            reached = true;
            break;
        }
    }
    assert!(reached, "seeker never reached the goal");
    assert_eq!(game.level(), 2);
    assert!(game.is_running());
}

#[test]
fn test_surrounded_seeker_is_freed_by_decay() {
    let mut config = GameConfig {
        seed: 42,
        grid: GridConfig {
            cols: 12,
            rows: 9,
            tile_size: 20.0,
        },
        goal: GoalConfig {
            col: 0,
            center_row: 4,
            half_height: 1,
        },
        ..GameConfig::default()
    };
    config.seeker.spawn = Cell::new(8, 4);
    config.hunter.spawns = vec![Cell::new(4, 4)];
    config.levels.base_hunters = 0;
    config.levels.max_hunters = 0;
    config.obstacles.decay_per_second = 120.0;

    let mut game = game(config);
    let home = game.seeker().cell();
    for n in home.neighbors() {
        game.field_mut().add_obstacle(n.c, n.r, 3.0);
    }

    let bounds = game.bounds();
    let start = game.seeker().pos;
    for action in [Action::Left, Action::Right, Action::Up, Action::Down] {
        let (dx, dy) = action.delta();
        let delta = Vec2::new(dx as f32, dy as f32) * 15.0;
        let field = game.field();
        let moved = move_with_collision(start, delta, bounds, 0.5, |c, r| field.is_blocking(c, r));
        assert_eq!(moved, start, "{:?} escaped the ring", action);
    }

    let obs = game.observation();
    assert!(obs.blocked_up && obs.blocked_down && obs.blocked_left && obs.blocked_right);

    let mut freed = false;
    for _ in 0..20_000 {
        game.tick(0.05);
        if home.neighbors().iter().any(|n| !game.field().is_blocking(n.c, n.r)) {
            freed = true;
            break;
        }
    }
    assert!(freed, "decay never opened a neighbouring cell");
    assert_eq!(game.seeker().cell(), home);
}

#[test]
fn test_same_seed_same_trajectory() {
    let script = [0usize, 0, 2, 2, 0, 3, 4, 0, 1, 0];

    let run = || {
        let mut config = GameConfig::default();
        config.seed = 42;
        let mut game = game(config);
        game.reset(Some(5));
        for i in 0..600 {
            if !game.is_running() {
                break;
            }
            game.step(script[(i / 30) % script.len()], 1.0 / 30.0);
        }
        match serde_json::to_string(&game.snapshot()) {
            Ok(json) => json,
            Err(e) => panic!("snapshot failed to serialize: {e}"),
        }
    };

    assert_eq!(run(), run());
}

#[test]
fn test_catch_terminates_until_reset() {
    let mut config = GameConfig::default();
    config.seed = 42;
    config.hunter.spawns = vec![Cell::new(30, 12)];

    let mut game = game(config);
    let mut caught = false;
    for _ in 0..3000 {
        let result = game.step(Action::Stop.index(), 1.0 / 30.0);
        if result.info.caught {
            assert!(result.done);
            assert_eq!(result.reward, -100.0);
            caught = true;
            break;
        }
    }
    assert!(caught, "a standing seeker should be caught");
    assert!(matches!(game.state(), RunState::Terminated(_)));

    let time = game.stats().survival_time;
    game.tick(1.0);
    assert_eq!(game.stats().survival_time, time);

    game.reset(None);
    assert!(game.is_running());
    assert_eq!(game.level(), 1);
}

#[test]
fn test_goal_step_pays_goal_reward() {
    let mut config = GameConfig::default();
    config.levels.base_hunters = 0;
    config.obstacles.decay_per_second = 0.0;
    config.seeker.spawn = Cell::new(3, 12);

    let mut game = game(config);
    let mut finished = None;
    for _ in 0..200 {
        let result = game.step(Action::Left.index(), 1.0 / 30.0);
        if result.done {
            finished = Some(result);
            break;
        }
    }
    let result = match finished {
        Some(result) => result,
        None => panic!("goal was never reached"),
    };
    assert!(result.info.goal_reached);
    assert_eq!(result.reward, 100.0);
    assert_eq!(result.info.level, 2);
}

#[test]
fn test_stationary_seeker_commits_immediately() {
    let config = GameConfig::default();
    let mut seeker = Seeker::new(Cell::new(5, 5), &config.seeker, 20.0);
    seeker.pos.y += 4.0;

    seeker.set_wish(-1, 0);
    seeker.process_turns(0.0);
    assert_eq!(seeker.direction(), (-1, 0));
    assert_eq!(seeker.pos.y, 110.0);
}

#[test]
fn test_off_center_turn_waits_then_forces() {
    let config = GameConfig::default();
    let mut seeker = Seeker::new(Cell::new(5, 5), &config.seeker, 20.0);
    seeker.set_wish(-1, 0);
    seeker.process_turns(0.0);
    seeker.pos.x -= 8.0;

    seeker.set_wish(0, -1);
    seeker.process_turns(0.1);
    assert_eq!(seeker.direction(), (-1, 0));
    seeker.process_turns(0.1);
    assert_eq!(seeker.direction(), (-1, 0));
    seeker.process_turns(0.06);
    assert_eq!(seeker.direction(), (0, -1));
    assert_eq!(seeker.pos.x, 110.0);
}

#[test]
fn test_movement_clamps_at_blocked_cell() {
    let bounds = GridBounds::new(10, 10, 20.0);
    let free = move_with_collision(Vec2::new(100.0, 110.0), Vec2::new(5.0, 0.0), bounds, 0.5, |_, _| false);
    assert_eq!(free.x, 105.0);

    let wall = |c: i32, _r: i32| c == 6;
    for start in [104.0, 108.0, 109.7] {
        let moved = move_with_collision(Vec2::new(start, 110.0), Vec2::new(10.0, 0.0), bounds, 0.5, wall);
        assert!(moved.x <= 110.0);
    }
    let snapped = move_with_collision(Vec2::new(108.0, 110.0), Vec2::new(5.0, 0.0), bounds, 0.5, wall);
    assert_eq!(snapped.x, 110.0);
}

#[test]
fn test_pathfinding_reference_cases() {
    let open = |_: i32, _: i32| 1.0;
    assert!(find_path(10, 10, Cell::new(4, 4), Cell::new(4, 4), open).is_empty());

    let path = find_path(10, 10, Cell::new(0, 0), Cell::new(3, 0), open);
    assert_eq!(path.len(), 3);
    assert_eq!(path.last(), Some(&Cell::new(3, 0)));

    let walled = |c: i32, r: i32| if c == 1 && r == 0 { f32::INFINITY } else { 1.0 };
    let detour = find_path(10, 10, Cell::new(0, 0), Cell::new(2, 0), walled);
    assert!(!detour.is_empty());
    assert!(!detour.contains(&Cell::new(1, 0)));

    let boxed = |c: i32, r: i32| {
        let ring = (4..=6).contains(&c) && (4..=6).contains(&r) && !(c == 5 && r == 5);
        if ring {
            f32::INFINITY
        } else {
            1.0
        }
    };
    assert!(find_path(10, 10, Cell::new(0, 0), Cell::new(5, 5), boxed).is_empty());
}
