//! End-to-end scenarios driven through the public session API.

use stackfall::{
    Action, Buttons, Cell, Game, GameConfig, GameState, HoldOutcome, InputFrame, InputLatch,
    ScriptedSource, TetrominoType,
};

fn game_with(kinds: &[TetrominoType]) -> Game {
    let mut game = Game::new(GameConfig::default(), Box::new(ScriptedSource::new(kinds)));
    game.start();
    game
}

#[test]
fn o_hard_drop_lands_on_the_floor() {
    let mut game = game_with(&[TetrominoType::O, TetrominoType::I]);
    let landing = game.board.drop_distance(game.current());

    let events = game.step(&InputFrame::tap(&[Action::HardDrop]));

    assert_eq!(events.hard_drop, Some(landing));
    assert_eq!(game.score.points, 2 * landing as u64);
    assert!(game.board.row(23)[4].is_filled() && game.board.row(23)[5].is_filled());
    assert!(game.board.row(21).iter().all(Cell::is_empty));
}

#[test]
fn filling_the_last_gap_clears_one_row() {
    // Vertical I dropped into a one-wide well at column 9
    let mut game = game_with(&[TetrominoType::I, TetrominoType::O]);
    for col in 0..9 {
        game.board.set(col, 23, Cell::Filled(1));
    }
    game.board.set(0, 22, Cell::Filled(4));

    game.step(&InputFrame::tap(&[Action::RotateCW]));
    let mut latch = InputLatch::new();
    for _ in 0..10 {
        game.step(&latch.frame(Buttons::from_actions(&[Action::MoveRight])));
    }
    assert_eq!(game.current().cells().map(|(col, _)| col), [9; 4]);

    let events = game.step(&InputFrame::tap(&[Action::HardDrop]));
    assert_eq!(events.lines_cleared, 1);
    assert_eq!(game.score.lines, 1);
    // The three leftover I cells and the marker each moved down one row
    assert_eq!(game.board.get(0, 23), Some(Cell::Filled(4)));
    for row in 21..=23 {
        assert_eq!(game.board.get(9, row), Some(Cell::Filled(0)));
    }
    assert_eq!(game.board.get(9, 20), Some(Cell::Empty));
}

#[test]
fn hold_is_once_per_piece() {
    let mut game = game_with(&[TetrominoType::S, TetrominoType::Z, TetrominoType::T]);
    assert_eq!(game.hold(), HoldOutcome::Stashed);
    let snapshot = game.snapshot();
    assert_eq!(game.hold(), HoldOutcome::Rejected);
    assert_eq!(game.snapshot(), snapshot);

    game.step(&InputFrame::tap(&[Action::HardDrop]));
    assert_eq!(game.hold(), HoldOutcome::Swapped);
    assert_eq!(game.current().piece_type, TetrominoType::S);
}

#[test]
fn topping_out_ends_the_game_and_keeps_last_score() {
    let mut game = game_with(&[TetrominoType::O]);
    let mut drops = 0;
    while game.state() == GameState::Playing {
        let events = game.step(&InputFrame::tap(&[Action::HardDrop]));
        drops += 1;
        assert!(drops < 50, "stack of O pieces never topped out");
        if events.game_over {
            break;
        }
    }

    assert!(game.is_game_over());
    // 12 O pieces fill the two center columns of a 24-row board
    assert_eq!(drops, 12);
    let last = game.last_score().unwrap();
    assert!(last > 0);
    assert!(game.board.is_empty());
    assert_eq!(game.score.points, 0);

    game.start();
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.last_score(), Some(last));
}

#[test]
fn level_up_speeds_up_gravity() {
    let mut game = game_with(&[TetrominoType::I]);
    // Five single-row clears: a horizontal I completes rows prefilled except columns 3..=6
    for _ in 0..5 {
        for col in (0..3).chain(7..10) {
            game.board.set(col, 23, Cell::Filled(1));
        }
        let events = game.step(&InputFrame::tap(&[Action::HardDrop]));
        assert_eq!(events.lines_cleared, 1);
    }
    assert_eq!(game.score.level, 1);
    assert_eq!(game.score.lines, 5);

    let row = game.current().row;
    game.step(&InputFrame::idle());
    assert!((game.current().row - row - 0.1).abs() < 1e-9);
}
