//! Enemy kill event and observer.
//!
//! The enemy system triggers an [`EnemyKilledEvent`] when a dashing player
//! runs through an enemy; [`observe_enemy_killed`] removes the enemy and
//! plays the impact feedback.

use std::f32::consts::PI;

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;

use crate::components::spark::Spark;
use crate::events::audio::AudioCmd;
use crate::events::death::IMPACT_SHAKE;
use crate::resources::animationstore::AnimationStore;
use crate::resources::camera::Camera;
use crate::resources::rng::GameRng;
use crate::systems::fx::spawn_impact_burst;

#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyKilledEvent {
    pub entity: Entity,
    /// Enemy centre at the moment of the hit.
    pub at: Vec2,
}

pub fn observe_enemy_killed(
    trigger: On<EnemyKilledEvent>,
    mut commands: Commands,
    mut camera: ResMut<Camera>,
    mut rng: ResMut<GameRng>,
    animations: Res<AnimationStore>,
    mut audio: MessageWriter<AudioCmd>,
) {
    let event = trigger.event();
    commands.entity(event.entity).try_despawn();
    camera.shake(IMPACT_SHAKE);
    audio.write(AudioCmd::Hit);
    spawn_impact_burst(&mut commands, &mut rng.0, &animations, event.at);
    // two long streaks along the dash line
    for angle in [0.0, PI] {
        let speed = 5.0 + rng.0.f32();
        commands.spawn(Spark::new(event.at, angle, speed));
    }
    info!("Enemy {:?} killed at {:?}", event.entity, event.at);
}
