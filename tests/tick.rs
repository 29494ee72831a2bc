use glam::Vec2;
use pagechase::collaborators::OpponentContact;
use pagechase::direction::Direction;
use pagechase::events::GameCommand;
use pagechase::game::tick::TickOutcome;
use pagechase::systems::lifecycle::GameStage;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

use common::{small_config, Harness, FRAME_MS};

#[test]
fn test_tick_while_idle_halts() {
    let mut harness = Harness::new(small_config());

    assert_eq!(harness.game.tick(16.0), TickOutcome::Halted);
    assert_eq!(harness.record.borrow().frames_requested, 0);
    assert_that(&harness.record.borrow().hud.is_empty()).is_true();
}

#[test]
fn test_tick_while_starting_halts() {
    let mut harness = Harness::new(small_config());
    harness.game.start().unwrap();

    assert_eq!(harness.frame(), TickOutcome::Halted);
    assert_eq!(harness.game.session().player.position, Vec2::new(200.0, 100.0));
}

#[test]
fn test_active_tick_requests_next_frame() {
    let mut harness = Harness::new(small_config());
    harness.start_active();

    assert_eq!(harness.frame(), TickOutcome::Continue);
    assert_eq!(harness.frame(), TickOutcome::Continue);
    assert_eq!(harness.record.borrow().frames_requested, 3);
}

#[test]
fn test_first_tick_moves_one_frame() {
    let mut harness = Harness::new(small_config());
    harness.start_active();
    harness.game.handle_command(GameCommand::MovePlayer(Direction::Right)).unwrap();

    // The host's first frame arrives late; the first step still covers one 60 Hz frame.
    harness.advance(500.0);
    harness.game.tick(harness.now);

    let position = harness.game.session().player.position;
    assert_that(&position.x).is_close_to(200.0 + 180.0 / 60.0, 1e-3);
    assert_eq!(position.y, 100.0);
}

#[test]
fn test_long_gap_is_clamped() {
    let mut harness = Harness::new(small_config());
    harness.start_active();
    harness.frame();
    harness.game.handle_command(GameCommand::MovePlayer(Direction::Left)).unwrap();

    harness.advance(5_000.0);
    harness.game.tick(harness.now);

    let position = harness.game.session().player.position;
    assert_that(&position.x).is_close_to(200.0 - 180.0 / 30.0, 1e-3);
}

#[test]
fn test_locked_section_stops_player_and_flashes() {
    let mut harness = Harness::new(small_config());
    harness.start_active();
    harness.game.handle_command(GameCommand::MovePlayer(Direction::Down)).unwrap();

    for _ in 0..60 {
        harness.frame();
    }

    let player = harness.game.session().player;
    assert_eq!(player.position.y, 200.0);
    assert_eq!(player.velocity, Vec2::ZERO);
    assert_eq!(harness.record.borrow().boundary_flashes, 1);
}

#[test]
fn test_player_slides_along_locked_edge() {
    let mut harness = Harness::new(small_config());
    harness.start_active();
    harness.game.handle_command(GameCommand::MovePlayer(Direction::Down)).unwrap();
    for _ in 0..60 {
        harness.frame();
    }

    harness.game.handle_command(GameCommand::MovePlayer(Direction::Left)).unwrap();
    for _ in 0..10 {
        harness.frame();
    }

    let player = harness.game.session().player;
    assert_eq!(player.position.y, 200.0);
    assert_that(&player.position.x).is_close_to(200.0 - 30.0, 1e-3);
    assert_eq!(player.velocity, Direction::Left.as_vec2() * 180.0);
    assert_eq!(harness.record.borrow().boundary_flashes, 1);
}

#[test]
fn test_stopped_player_keeps_facing() {
    let mut harness = Harness::new(small_config());
    harness.start_active();
    harness.game.handle_command(GameCommand::MovePlayer(Direction::Up)).unwrap();
    for _ in 0..60 {
        harness.frame();
    }

    let stopped = harness.game.session().player;
    assert_eq!(stopped.position.y, 0.0);
    assert_eq!(stopped.velocity, Vec2::ZERO);
    assert_eq!(harness.record.borrow().boundary_flashes, 1);

    for _ in 0..30 {
        harness.frame();
    }

    let player = harness.game.session().player;
    assert_eq!(player.direction, Direction::Up);
    assert_eq!(player.position, stopped.position);
    assert_eq!(harness.record.borrow().boundary_flashes, 1);
}

#[test]
fn test_player_wraps_horizontally() {
    let mut harness = Harness::new(small_config());
    harness.start_active();
    harness.game.handle_command(GameCommand::MovePlayer(Direction::Right)).unwrap();

    for _ in 0..90 {
        harness.frame();
    }

    let x = harness.game.session().player.position.x;
    assert_that(&x).is_less_than(200.0);
    assert_that(&x).is_greater_than_or_equal_to(-30.0);
    assert_eq!(harness.record.borrow().boundary_flashes, 0);
}

#[test]
fn test_hud_reflects_tick() {
    let mut config = small_config();
    config.collectible_radius = 1_000.0;
    let mut harness = Harness::new(config);
    harness.start_active();
    harness.frame();

    let hud = *harness.record.borrow().hud.last().unwrap();
    assert_eq!(hud.stage, GameStage::Active);
    assert_eq!(hud.score, 540);
    assert_eq!(hud.collectible_score, 540);
    assert_eq!(hud.lives, 3);
    assert_eq!(hud.sections_unlocked, 0);
    assert_eq!(hud.total_sections, 2);
    assert_eq!(hud.next_threshold, Some(300));
    assert_that(&hud.power.is_energized()).is_true();
}

#[test]
fn test_opponents_see_current_player() {
    let mut harness = Harness::new(small_config());
    harness.start_active();
    harness.frame();

    let record = harness.record.borrow();
    let params = record.opponent_updates.last().unwrap();
    assert_eq!(params.player_position, Vec2::new(200.0, 100.0));
    assert_eq!(params.player_speed, 180.0);
    assert_eq!(params.opponent_speed, 140.0);
}

#[test]
fn test_catch_halts_loop() {
    let mut harness = Harness::new(small_config());
    harness.start_active();

    assert_eq!(harness.frame_with(&[OpponentContact::CaughtPlayer]), TickOutcome::Halted);
    let requested = harness.record.borrow().frames_requested;
    assert_eq!(harness.frame(), TickOutcome::Halted);
    assert_eq!(harness.record.borrow().frames_requested, requested);
}

#[test]
fn test_respawn_relaunches_loop() {
    let mut harness = Harness::new(small_config());
    harness.start_active();
    let requested = harness.record.borrow().frames_requested;
    harness.die_and_settle();

    assert_eq!(harness.game.stage(), GameStage::Active);
    assert_eq!(harness.record.borrow().frames_requested, requested + 1);
    assert_eq!(harness.frame(), TickOutcome::Continue);
}

#[test]
fn test_pause_stops_movement() {
    let mut harness = Harness::new(small_config());
    harness.start_active();
    harness.game.handle_command(GameCommand::MovePlayer(Direction::Right)).unwrap();
    harness.frame();

    harness.game.pause();
    let before = harness.game.session().player.position;
    assert_eq!(harness.frame(), TickOutcome::Halted);
    assert_eq!(harness.game.session().player.position, before);

    harness.game.resume();
    harness.advance(10.0 * FRAME_MS);
    harness.game.tick(harness.now);
    assert_that(&(harness.game.session().player.position.x - before.x)).is_close_to(3.0, 1e-3);
}
