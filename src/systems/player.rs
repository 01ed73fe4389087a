//! Player input and movement system.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::player::Player;
use crate::events::audio::AudioCmd;
use crate::events::death::{DeathCause, PlayerDeathEvent};
use crate::resources::animationstore::AnimationStore;
use crate::resources::input::InputState;
use crate::resources::levelstate::LevelState;
use crate::resources::rng::GameRng;
use crate::resources::tilegrid::TileGrid;
use crate::systems::fx::{spawn_dash_burst, spawn_dash_trail};

/// Apply this frame's input to the player and step its movement.
///
/// Skipped entirely during a death sequence: the body freezes where it died.
#[allow(clippy::too_many_arguments)]
pub fn update_player(
    mut commands: Commands,
    mut players: Query<&mut Player>,
    grid: Res<TileGrid>,
    input: Res<InputState>,
    level_state: Res<LevelState>,
    animations: Res<AnimationStore>,
    mut rng: ResMut<GameRng>,
    mut audio: MessageWriter<AudioCmd>,
) {
    if level_state.is_dead() {
        return;
    }
    for mut player in players.iter_mut() {
        if input.jump.just_pressed && player.jump() {
            audio.write(AudioCmd::Jump);
        }
        if input.jump.just_released {
            player.cut_jump();
        }
        if input.dash.just_pressed && player.dash() {
            audio.write(AudioCmd::Dash);
        }

        let movement = Vec2::new(input.horizontal() * player.config.run_speed, 0.0);
        let outcome = player.update(&grid, movement, &animations);
        let center = player.body.center();

        if outcome.fell {
            commands.trigger(PlayerDeathEvent {
                cause: DeathCause::Fell,
                at: center,
            });
        }
        if outcome.dash_burst {
            spawn_dash_burst(&mut commands, &mut rng.0, &animations, center);
        }
        if let Some(direction) = outcome.dash_trail {
            spawn_dash_trail(&mut commands, &mut rng.0, &animations, center, direction);
        }
    }
}
