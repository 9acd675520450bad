//! Property tests for engine invariants under arbitrary input

use std::time::Duration;

use proptest::prelude::*;

use tetris_board::core::{Board, BoardEngine, EngineConfig, Randomizer};
use tetris_board::types::{GameAction, PieceKind};

fn action_strategy() -> impl Strategy<Value = GameAction> {
    prop_oneof![
        4 => Just(GameAction::MoveLeft),
        4 => Just(GameAction::MoveRight),
        3 => Just(GameAction::SoftDrop),
        3 => Just(GameAction::Rotate),
        2 => Just(GameAction::HardDrop),
    ]
}

fn kind_strategy() -> impl Strategy<Value = PieceKind> {
    prop::sample::select(PieceKind::ALL.to_vec())
}

fn assert_active_in_bounds(engine: &BoardEngine) {
    if engine.game_over() {
        return;
    }
    let active = engine.active().expect("live game has an active piece");
    let w = engine.board().width() as i32;
    let h = engine.board().height() as i32;
    let top = -(engine.config().spawn_buffer_rows as i32);
    for (x, y) in active.cells() {
        assert!((0..w).contains(&x), "x={x} outside 0..{w}");
        assert!((top..h).contains(&y), "y={y} outside {top}..{h}");
        assert!(!engine.board().is_occupied(x, y), "overlap at ({x}, {y})");
    }
}

proptest! {
    #[test]
    fn active_piece_stays_in_bounds(
        seed in any::<u64>(),
        width in 4u16..14,
        height in 4u16..24,
        buffer in 0u16..3,
        actions in prop::collection::vec(action_strategy(), 1..200),
    ) {
        let config = EngineConfig::default()
            .with_size(width, height)
            .with_spawn_buffer_rows(buffer)
            .with_randomizer(Randomizer::SevenBag)
            .with_seed(seed);
        let mut engine = BoardEngine::new(config).unwrap();

        for action in actions {
            let score_before = engine.score();
            engine.apply_action(action);
            engine.tick(Duration::from_millis(16));
            assert_active_in_bounds(&engine);
            prop_assert!(engine.score() >= score_before);
            prop_assert!(engine.board().occupied_count() <= width as usize * height as usize);
        }
    }

    #[test]
    fn moves_are_reversible(
        kind in kind_strategy(),
        dx in -3i32..=3,
        dy in 0i32..=3,
    ) {
        let config = EngineConfig::default().with_randomizer(Randomizer::Cycle(vec![kind]));
        let mut engine = BoardEngine::new(config).unwrap();
        let start = engine.active().unwrap();

        if engine.move_piece(dx, dy) {
            prop_assert!(engine.move_piece(-dx, -dy));
        }
        prop_assert_eq!(engine.active().unwrap(), start);
    }

    #[test]
    fn four_rotations_are_identity(kind in kind_strategy(), dx in -2i32..=2) {
        let config = EngineConfig::default().with_randomizer(Randomizer::Cycle(vec![kind]));
        let mut engine = BoardEngine::new(config).unwrap();
        engine.move_piece(dx, 4);
        let start = engine.active().unwrap();

        for _ in 0..4 {
            prop_assert!(engine.rotate());
        }
        prop_assert_eq!(engine.active().unwrap(), start);
    }

    #[test]
    fn clearing_keeps_partial_rows_in_order(
        rows in prop::collection::vec(prop::collection::vec(any::<bool>(), 5), 1..12),
    ) {
        let text: Vec<String> = rows
            .iter()
            .map(|r| r.iter().map(|&f| if f { 'T' } else { '.' }).collect())
            .collect();
        let refs: Vec<&str> = text.iter().map(String::as_str).collect();
        let mut board = Board::from_rows(&refs).unwrap();

        let full = rows.iter().filter(|r| r.iter().all(|&f| f)).count();
        let kept: Vec<&String> = text.iter().filter(|r| r.contains('.')).collect();

        prop_assert_eq!(board.clear_full_rows(), full);

        let after = board.to_rows();
        prop_assert!(after[..full].iter().all(|r| r == "....."));
        let tail: Vec<&String> = after[full..].iter().collect();
        prop_assert_eq!(tail, kept);
        prop_assert_eq!(board.full_row_count(), 0);
    }

    #[test]
    fn ghost_is_where_hard_drop_lands(
        seed in any::<u64>(),
        moves in prop::collection::vec(action_strategy(), 0..60),
    ) {
        let config = EngineConfig::default()
            .with_randomizer(Randomizer::Uniform)
            .with_seed(seed);
        let mut engine = BoardEngine::new(config).unwrap();
        for action in moves {
            engine.apply_action(action);
        }
        prop_assume!(!engine.game_over());

        let ghost = engine.ghost_y().unwrap();
        let active = engine.active().unwrap();
        let distance = engine.hard_drop();
        prop_assert_eq!(active.y + distance as i32, ghost);
    }
}
