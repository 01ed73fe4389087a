//! Projectile flight and hit resolution.
//!
//! Per projectile and frame, first match wins: a solid tile stops it with a
//! few sparks, old age removes it, and contact with a player who is not
//! dashing kills the player.

use bevy_ecs::prelude::*;

use crate::components::player::Player;
use crate::components::projectile::Projectile;
use crate::events::death::{DeathCause, PlayerDeathEvent};
use crate::resources::gameconfig::GameConfig;
use crate::resources::levelstate::LevelState;
use crate::resources::rng::GameRng;
use crate::resources::tilegrid::TileGrid;
use crate::systems::fx::spawn_shot_sparks;

pub fn update_projectiles(
    mut commands: Commands,
    mut projectiles: Query<(Entity, &mut Projectile)>,
    players: Query<&Player>,
    grid: Res<TileGrid>,
    config: Res<GameConfig>,
    level_state: Res<LevelState>,
    mut rng: ResMut<GameRng>,
) {
    let player = players.iter().next();
    for (entity, mut projectile) in projectiles.iter_mut() {
        projectile.advance();
        if grid.solid_check(projectile.pos) {
            commands.entity(entity).try_despawn();
            let angle = projectile.impact_angle();
            spawn_shot_sparks(&mut commands, &mut rng.0, projectile.pos, angle);
        } else if projectile.age > config.projectile_lifetime {
            commands.entity(entity).try_despawn();
        } else if let Some(player) = player
            && !level_state.is_dead()
            && !player.is_dash_active()
            && player.body.rect().contains_point(projectile.pos)
        {
            commands.entity(entity).try_despawn();
            commands.trigger(PlayerDeathEvent {
                cause: DeathCause::Shot,
                at: player.body.center(),
            });
        }
    }
}
