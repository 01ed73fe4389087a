//! Level progression, death sequence and camera follow.
//!
//! Loads are never performed inside the schedule. Systems only record the
//! wanted level in [`LevelState::pending_load`]; the game session applies it
//! once the frame is over.

use bevy_ecs::prelude::*;
use log::info;

use crate::components::enemy::Enemy;
use crate::components::player::Player;
use crate::resources::camera::Camera;
use crate::resources::gameconfig::GameConfig;
use crate::resources::levelstate::{
    DEATH_FADE_START, DEATH_RELOAD_AFTER, LevelState, TRANSITION_FRAMES,
};

pub fn update_level_flow(
    mut level_state: ResMut<LevelState>,
    mut camera: ResMut<Camera>,
    enemies: Query<(), With<Enemy>>,
) {
    camera.decay_shake();

    if enemies.is_empty() {
        level_state.transition += 1;
        if level_state.transition > TRANSITION_FRAMES && level_state.pending_load.is_none() {
            let next = level_state.next_level();
            level_state.max_level = level_state.max_level.max(next);
            info!("Level {} cleared, moving to {}", level_state.level, next);
            level_state.request_load(next);
        }
    }
    if level_state.transition < 0 {
        level_state.transition += 1;
    }

    if level_state.is_dead() {
        level_state.dead += 1;
        if level_state.dead >= DEATH_FADE_START {
            level_state.transition = (level_state.transition + 1).min(TRANSITION_FRAMES);
        }
        if level_state.dead > DEATH_RELOAD_AFTER && level_state.pending_load.is_none() {
            let level = level_state.level;
            level_state.request_load(level);
        }
    }
}

pub fn follow_camera(
    mut camera: ResMut<Camera>,
    players: Query<&Player>,
    config: Res<GameConfig>,
) {
    if let Some(player) = players.iter().next() {
        camera.follow(player.body.center(), config.view_size());
    }
}
