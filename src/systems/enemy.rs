//! Enemy patrol, shooting and dash-kill detection.

use std::f32::consts::PI;

use bevy_ecs::prelude::*;

use crate::components::enemy::{Enemy, Target};
use crate::components::player::Player;
use crate::components::projectile::Projectile;
use crate::events::audio::AudioCmd;
use crate::events::kill::EnemyKilledEvent;
use crate::resources::animationstore::AnimationStore;
use crate::resources::rng::GameRng;
use crate::resources::tilegrid::TileGrid;
use crate::systems::fx::spawn_shot_sparks;

pub fn update_enemies(
    mut commands: Commands,
    mut enemies: Query<(Entity, &mut Enemy)>,
    players: Query<&Player>,
    grid: Res<TileGrid>,
    animations: Res<AnimationStore>,
    mut rng: ResMut<GameRng>,
    mut audio: MessageWriter<AudioCmd>,
) {
    let Some(target) = players.iter().next().map(|player| Target {
        pos: player.body.pos,
        rect: player.body.rect(),
        dash_active: player.is_dash_active(),
    }) else {
        return;
    };

    for (entity, mut enemy) in enemies.iter_mut() {
        let outcome = enemy.update(&grid, &target, &mut rng.0, &animations);
        if let Some(shot) = outcome.fired {
            commands.spawn(Projectile::new(shot.pos, shot.direction));
            let angle = if shot.direction < 0.0 { PI } else { 0.0 };
            spawn_shot_sparks(&mut commands, &mut rng.0, shot.pos, angle);
            audio.write(AudioCmd::Shoot);
        }
        if outcome.killed {
            commands.trigger(EnemyKilledEvent {
                entity,
                at: enemy.body.center(),
            });
        }
    }
}
