//! Player death event and observer.
//!
//! Systems that detect a lethal situation (falling off the level, being hit
//! by a projectile) trigger a [`PlayerDeathEvent`].
//! [`observe_player_death`] then starts the death sequence in
//! [`LevelState`]; the level flow system plays it out and reloads the level.
//! A second death during a running sequence is ignored.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;

use crate::events::audio::AudioCmd;
use crate::resources::animationstore::AnimationStore;
use crate::resources::camera::Camera;
use crate::resources::levelstate::LevelState;
use crate::resources::rng::GameRng;
use crate::systems::fx::spawn_impact_burst;

/// Screenshake applied by any lethal hit.
pub const IMPACT_SHAKE: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Fell,
    Shot,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerDeathEvent {
    pub cause: DeathCause,
    /// Player centre at the moment of death.
    pub at: Vec2,
}

pub fn observe_player_death(
    trigger: On<PlayerDeathEvent>,
    mut commands: Commands,
    mut level_state: ResMut<LevelState>,
    mut camera: ResMut<Camera>,
    mut rng: ResMut<GameRng>,
    animations: Res<AnimationStore>,
    mut audio: MessageWriter<AudioCmd>,
) {
    let event = trigger.event();
    if !level_state.start_death() {
        return;
    }
    camera.shake(IMPACT_SHAKE);
    info!(
        "Player died ({:?}) on level {}, deaths={}",
        event.cause, level_state.level, level_state.death_counter
    );
    if event.cause == DeathCause::Shot {
        audio.write(AudioCmd::Hit);
        spawn_impact_burst(&mut commands, &mut rng.0, &animations, event.at);
    }
}
