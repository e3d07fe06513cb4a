//! Property tests for the obstacle field

use proptest::prelude::*;

use crumbtrail::core::config::GoalConfig;
use crumbtrail::grid::ObstacleField;

const COLS: i32 = 16;
const ROWS: i32 = 12;

fn field() -> ObstacleField {
    let goal = GoalConfig {
        col: 0,
        center_row: 6,
        half_height: 1,
    };
    let mut field = ObstacleField::new(COLS, ROWS, goal);
    field.build_goal_barrier(5.0);
    field
}

proptest! {
    #[test]
    fn test_blocking_tracks_strength(
        ops in prop::collection::vec((-3i32..COLS + 3, -3i32..ROWS + 3, 0.0f32..6.0, any::<bool>()), 0..64),
    ) {
        let mut field = field();
        for (c, r, amount, add) in ops {
            if add {
                field.add_obstacle(c, r, amount);
            } else {
                field.weaken(c, r, amount);
            }
        }
        for c in -3..COLS + 3 {
            for r in -3..ROWS + 3 {
                if field.in_bounds(c, r) {
                    prop_assert_eq!(field.is_blocking(c, r), field.strength(c, r) > 0.0);
                } else {
                    prop_assert!(field.is_blocking(c, r));
                }
            }
        }
    }

    #[test]
    fn test_add_obstacle_is_monotonic(
        c in 0i32..COLS,
        r in 0i32..ROWS,
        first in 0.0f32..10.0,
        second in 0.0f32..10.0,
    ) {
        let mut field = field();
        field.add_obstacle(c, r, first);
        let before = field.strength(c, r);
        field.add_obstacle(c, r, second);
        prop_assert!(field.strength(c, r) >= before);
        prop_assert_eq!(field.strength(c, r), before.max(second));
    }

    #[test]
    fn test_weaken_floors_at_zero_and_leaves_ring(
        amounts in prop::collection::vec(0.0f32..3.0, 1..12),
    ) {
        let mut field = field();
        let (c, r) = (1, 2);
        prop_assert!(field.is_ring_cell(c, r));

        for amount in amounts {
            field.weaken(c, r, amount);
            let strength = field.strength(c, r);
            prop_assert!(strength >= 0.0);
            prop_assert_eq!(field.is_ring_cell(c, r), strength > 0.0);
        }

        field.weaken(c, r, 5.0);
        prop_assert_eq!(field.strength(c, r), 0.0);
        prop_assert!(!field.is_ring_cell(c, r));
    }

    #[test]
    fn test_decay_only_weakens(seed in any::<u64>(), events in 1usize..200) {
        let mut field = field();
        field.add_obstacle(8, 6, 3.0);
        let before = field.strengths().to_vec();
        let mut rng = crumbtrail::core::random::seeded(seed);
        for _ in 0..events {
            field.decay_one_random_obstacle(rng.as_mut(), 0.5);
        }
        for (after, before) in field.strengths().iter().zip(&before) {
            prop_assert!(*after <= *before);
            prop_assert!(*after >= 0.0);
        }
        prop_assert!(field.ring_len() <= 12);
    }
}
