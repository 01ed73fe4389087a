//! Whole game sessions over level files in a temporary maps directory.

use std::path::Path;

use glam::Vec2;

use tryhard::assets::{AssetError, HeadlessAssets};
use tryhard::game::{Game, GameError};
use tryhard::resources::gameconfig::GameConfig;
use tryhard::resources::input::HeldActions;
use tryhard::resources::savestate::SaveState;
use tryhard::resources::tilegrid::{CellPos, TileGrid, TileKind};
use tryhard::screens::MenuInput;
use tryhard::systems::render::RecordingRenderer;

/// Floor across the level with the player start at the left end.
fn floor_level(enemies: &[i32]) -> TileGrid {
    let mut grid = TileGrid::new(16);
    for x in 0..30 {
        grid.place(TileKind::Stone, 1, CellPos::new(x, 6));
    }
    grid.place(TileKind::Spawner, 0, CellPos::new(1, 5));
    for &x in enemies {
        grid.place(TileKind::Spawner, 1, CellPos::new(x, 5));
    }
    grid
}

/// Player start over nothing; the enemy stands on a ledge far away.
fn pit_level() -> TileGrid {
    let mut grid = TileGrid::new(16);
    grid.place(TileKind::Spawner, 0, CellPos::new(0, 0));
    for x in 40..45 {
        grid.place(TileKind::Stone, 1, CellPos::new(x, 20));
    }
    grid.place(TileKind::Spawner, 1, CellPos::new(42, 19));
    grid
}

fn make_game(dir: &Path, levels: &[TileGrid]) -> Game {
    for (i, grid) in levels.iter().enumerate() {
        grid.save(dir.join(format!("{}.json", i + 1))).unwrap();
    }
    let config = GameConfig {
        maps_dir: dir.to_path_buf(),
        save_path: dir.join("savefile.json"),
        ..GameConfig::new()
    };
    Game::new(config, &HeadlessAssets::new(), 3).unwrap()
}

fn run(game: &mut Game, frames: usize) {
    for _ in 0..frames {
        game.frame(HeldActions::default()).unwrap();
    }
}

#[test]
fn test_load_level_places_player_and_enemies() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = make_game(dir.path(), &[floor_level(&[10, 20])]);
    game.load_level(1).unwrap();

    assert_eq!(game.enemy_count(), 2);
    assert_eq!(game.player().unwrap().body.pos, Vec2::new(16.0, 80.0));
    assert_eq!(game.level_state().level_count, 1);
    assert_eq!(game.level_state().transition, -30);
}

#[test]
fn test_missing_level_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = make_game(dir.path(), &[floor_level(&[])]);
    assert!(game.load_level(5).is_err());
}

#[test]
fn test_level_with_unknown_variant_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut broken = floor_level(&[3]);
    broken.place(TileKind::Stone, 99, CellPos::new(2, 6));
    let mut game = make_game(dir.path(), &[floor_level(&[5]), broken]);
    game.load_level(1).unwrap();

    let err = game.load_level(2).unwrap_err();
    assert!(matches!(
        err,
        GameError::Asset(AssetError::MissingTileImage {
            kind: TileKind::Stone,
            variant: 99
        })
    ));
    assert_eq!(game.level_state().level, 1);
    assert_eq!(game.enemy_count(), 1);
}

#[test]
fn test_cleared_level_advances_after_iris() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = make_game(dir.path(), &[floor_level(&[]), floor_level(&[12])]);
    game.load_level(1).unwrap();

    // the opening iris counts up twice as fast with no enemies left
    run(&mut game, 45);
    assert_eq!(game.level_state().level, 1);
    assert_eq!(game.level_state().transition, 30);
    run(&mut game, 1);
    let state = game.level_state();
    assert_eq!(state.level, 2);
    assert_eq!(state.max_level, 2);
    assert_eq!(state.transition, -30);
    assert_eq!(game.enemy_count(), 1);
}

#[test]
fn test_last_level_reloads_itself() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = make_game(dir.path(), &[floor_level(&[])]);
    game.load_level(1).unwrap();
    run(&mut game, 46);
    assert_eq!(game.level_state().level, 1);
    assert_eq!(game.level_state().transition, -30);
}

#[test]
fn test_falling_death_reloads_level() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = make_game(dir.path(), &[pit_level()]);
    game.load_level(1).unwrap();

    run(&mut game, 130);
    assert!(game.level_state().is_dead());
    assert_eq!(game.level_state().death_counter, 1);

    run(&mut game, 70);
    let state = game.level_state();
    assert!(!state.is_dead());
    assert_eq!(state.death_counter, 1);
    assert_eq!(state.level, 1);
    assert_eq!(game.enemy_count(), 1);
}

#[test]
fn test_progress_survives_save_and_restore() {
    let dir = tempfile::tempdir().unwrap();
    let levels = [floor_level(&[5]), floor_level(&[5]), floor_level(&[5, 9])];
    let mut game = make_game(dir.path(), &levels);
    game.load_level(3).unwrap();
    game.save_progress().unwrap();

    let saved = SaveState::load(dir.path().join("savefile.json")).unwrap();
    assert_eq!(saved.level, 3);
    assert_eq!(saved.max_level, 3);

    let mut fresh = make_game(dir.path(), &levels);
    fresh.restore_progress().unwrap();
    assert_eq!(fresh.level_state().level, 3);
    assert_eq!(fresh.enemy_count(), 2);
}

#[test]
fn test_restore_without_save_starts_level_one() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = make_game(dir.path(), &[floor_level(&[4])]);
    game.restore_progress().unwrap();
    assert_eq!(game.level_state().level, 1);
    assert_eq!(game.level_state().death_counter, 0);
}

#[test]
fn test_level_select_from_pause_menu() {
    let dir = tempfile::tempdir().unwrap();
    let levels = [floor_level(&[5]), floor_level(&[6]), floor_level(&[7, 8])];
    let mut game = make_game(dir.path(), &levels);
    game.load_level(3).unwrap();
    game.load_level(1).unwrap();

    game.frame(HeldActions {
        pause: true,
        ..Default::default()
    })
    .unwrap();
    assert!(game.is_paused());

    let down = MenuInput {
        down: true,
        ..Default::default()
    };
    let right = MenuInput {
        right: true,
        ..Default::default()
    };
    let confirm = MenuInput {
        confirm: true,
        ..Default::default()
    };
    game.menu(&down).unwrap();
    game.menu(&confirm).unwrap();
    game.menu(&right).unwrap();
    game.menu(&right).unwrap();
    game.menu(&confirm).unwrap();

    assert!(!game.is_paused());
    assert_eq!(game.level_state().level, 3);
    assert_eq!(game.enemy_count(), 2);
}

#[test]
fn test_exit_from_pause_menu() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = make_game(dir.path(), &[floor_level(&[5])]);
    game.load_level(1).unwrap();
    game.frame(HeldActions {
        pause: true,
        ..Default::default()
    })
    .unwrap();
    let up = MenuInput {
        up: true,
        ..Default::default()
    };
    game.menu(&up).unwrap();
    game.menu(&MenuInput {
        confirm: true,
        ..Default::default()
    })
    .unwrap();
    assert!(game.should_quit());
}

#[test]
fn test_render_shows_hud() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = make_game(dir.path(), &[floor_level(&[5, 9, 14])]);
    game.load_level(1).unwrap();
    run(&mut game, 2);

    let assets = HeadlessAssets::new();
    let mut renderer = RecordingRenderer::new(Vec2::new(320.0, 240.0));
    game.render(&mut renderer, &assets);
    let texts = renderer.texts();
    assert!(texts.contains(&"Level: 1"));
    assert!(texts.contains(&"Deaths: 0"));
    assert!(texts.contains(&"Enemies Left: 3"));
}
