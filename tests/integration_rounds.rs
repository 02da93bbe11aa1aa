use std::time::Duration;

use assert_matches::assert_matches;
use klear::{BoardSize, ClickOutcome, Game, GameConfig, GameError, Phase};

const BOARD: BoardSize = BoardSize {
    width: 640.0,
    height: 480.0,
};

fn game(points: Option<u32>) -> Game {
    let mut game = Game::with_seed(GameConfig::default(), 2024);
    game.set_point_count(points);
    game
}

#[test]
fn full_session_win_lose_restart() {
    let mut game = game(Some(4));

    game.start_game(BOARD).unwrap();
    for i in 0..4 {
        game.advance(Duration::from_millis(250));
        game.click_node(i);
    }
    assert_eq!(game.phase(), Phase::Won);
    assert!((game.elapsed_time() - 1.0).abs() < 1e-9);

    // a new round from the won screen keeps the point count
    game.start_game(BOARD).unwrap();
    assert_eq!(game.nodes().len(), 4);
    assert_eq!(game.elapsed_time(), 0.0);

    game.click_node(0);
    assert_matches!(game.click_node(2), ClickOutcome::Misclick);
    assert_eq!(game.phase(), Phase::Lost);
    assert!(game.nodes().is_empty());

    game.restart_game();
    let snap = game.snapshot();
    assert_eq!(snap.phase, Phase::Idle);
    assert_eq!(snap.point_count, Some(5));
    assert!(snap.nodes.is_empty());
}

#[test]
fn invalid_configuration_is_recoverable() {
    let mut game = game(None);
    assert_matches!(
        game.start_game(BOARD),
        Err(GameError::InvalidConfiguration { point_count: None })
    );
    assert_eq!(game.phase(), Phase::Idle);

    game.set_point_count(Some(2));
    game.start_game(BOARD).unwrap();
    assert_eq!(game.phase(), Phase::Playing);
}

#[test]
fn manual_and_auto_clicks_mix() {
    let mut game = game(Some(5));
    game.start_game(BOARD).unwrap();
    game.click_node(0);
    game.click_node(1);
    game.toggle_auto_play();

    let mut seen_lost = false;
    for _ in 0..30 {
        game.advance(Duration::from_millis(100));
        seen_lost |= game.phase() == Phase::Lost;
    }

    assert!(!seen_lost);
    assert_eq!(game.phase(), Phase::Won);
}

#[test]
fn countdowns_run_independently_per_node() {
    let mut game = game(Some(3));
    game.start_game(BOARD).unwrap();

    game.click_node(0);
    game.advance(Duration::from_millis(1000));
    game.click_node(1);
    game.advance(Duration::from_millis(1000));

    let nodes = game.nodes();
    assert!((nodes[0].remaining_time - 1.0).abs() < 1e-6);
    assert!((nodes[1].remaining_time - 2.0).abs() < 1e-6);
    assert_eq!(nodes[2].remaining_time, 3.0);

    game.advance(Duration::from_millis(1000));
    let nodes = game.nodes();
    assert!(!nodes[0].active);
    assert!(nodes[1].active);
    assert!(nodes[2].active);
    assert!(game.timers().has_countdown(1));
    assert!(!game.timers().has_countdown(0));
}

#[test]
fn snapshot_serializes_for_renderers() {
    let mut game = game(Some(2));
    game.start_game(BOARD).unwrap();
    game.click_node(0);

    let json = serde_json::to_value(game.snapshot()).unwrap();
    assert_eq!(json["phase"], "playing");
    assert_eq!(json["next_expected_index"], 1);
    assert_eq!(json["nodes"][0]["clicked"], true);
    assert_eq!(json["nodes"][1]["active"], true);
    assert!(json["nodes"][1]["position"]["x"].is_number());
}

#[test]
fn rounds_leave_no_timers_behind() {
    let mut game = game(Some(3));
    for _ in 0..5 {
        game.start_game(BOARD).unwrap();
        game.toggle_auto_play();
        game.click_node(0);
        game.advance(Duration::from_millis(1500));
        game.restart_game();
        assert_eq!(game.timers().running_count(), 0);
        game.set_point_count(Some(3));
    }
}
