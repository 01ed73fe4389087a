//! Ephemeral effects: sparks, particles, clouds and falling leaves.
//!
//! The `spawn_*` helpers are shared by every system and observer that
//! produces feedback (shots, impacts, dashes). The systems below only move
//! effects along and despawn them when they expire; effects never collide.

use std::f32::consts::{PI, TAU};

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::cloud::Cloud;
use crate::components::leafspawner::LeafSpawner;
use crate::components::particle::{Particle, ParticleKind};
use crate::components::spark::Spark;
use crate::resources::animationstore::AnimationStore;
use crate::resources::rng::GameRng;

/// Sparks and dust flying out of a hit body.
pub const IMPACT_PIECES: usize = 30;
/// Sparks thrown by a shot leaving the muzzle or hitting a wall.
pub const SHOT_SPARKS: usize = 4;
/// Dust puffs of a dash start or end.
pub const DASH_BURST_PIECES: usize = 20;

pub fn spawn_particle(
    commands: &mut Commands,
    animations: &AnimationStore,
    kind: ParticleKind,
    pos: Vec2,
    velocity: Vec2,
    frame: u32,
) {
    if let Some(particle) = Particle::new(kind, pos, velocity, frame, animations) {
        commands.spawn(particle);
    }
}

/// Sparks fanning out around `angle` (radians), e.g. from a gun muzzle.
pub fn spawn_shot_sparks(commands: &mut Commands, rng: &mut fastrand::Rng, pos: Vec2, angle: f32) {
    for _ in 0..SHOT_SPARKS {
        commands.spawn(Spark::new(pos, rng.f32() - 0.5 + angle, 2.0 + rng.f32()));
    }
}

/// Radial spray of sparks and dust; dust drifts opposite to its spark.
pub fn spawn_impact_burst(
    commands: &mut Commands,
    rng: &mut fastrand::Rng,
    animations: &AnimationStore,
    center: Vec2,
) {
    for _ in 0..IMPACT_PIECES {
        let angle = rng.f32() * TAU;
        let speed = rng.f32() * 5.0;
        commands.spawn(Spark::new(center, angle, 2.0 + rng.f32()));
        let velocity = Vec2::from_angle(angle + PI) * speed * 0.5;
        spawn_particle(
            commands,
            animations,
            ParticleKind::Dust,
            center,
            velocity,
            rng.u32(0..=7),
        );
    }
}

/// Dust ring at the start and end of a dash burst.
pub fn spawn_dash_burst(
    commands: &mut Commands,
    rng: &mut fastrand::Rng,
    animations: &AnimationStore,
    center: Vec2,
) {
    for _ in 0..DASH_BURST_PIECES {
        let angle = rng.f32() * TAU;
        let speed = rng.f32() * 0.5 + 0.5;
        spawn_particle(
            commands,
            animations,
            ParticleKind::Dust,
            center,
            Vec2::from_angle(angle) * speed,
            rng.u32(0..=7),
        );
    }
}

/// One dust puff left behind while dashing in `direction` (sign).
pub fn spawn_dash_trail(
    commands: &mut Commands,
    rng: &mut fastrand::Rng,
    animations: &AnimationStore,
    center: Vec2,
    direction: f32,
) {
    let velocity = Vec2::new(direction * rng.f32() * 3.0, 0.0);
    spawn_particle(
        commands,
        animations,
        ParticleKind::Dust,
        center,
        velocity,
        rng.u32(0..=7),
    );
}

/// Each tree canopy may drop a leaf this frame.
pub fn spawn_leaves(
    mut commands: Commands,
    spawners: Query<&LeafSpawner>,
    mut rng: ResMut<GameRng>,
    animations: Res<AnimationStore>,
) {
    for spawner in spawners.iter() {
        if let Some(pos) = spawner.roll(&mut rng.0) {
            let frame = rng.0.u32(0..=20);
            spawn_particle(
                &mut commands,
                &animations,
                ParticleKind::Leaf,
                pos,
                Vec2::new(-0.1, 0.3),
                frame,
            );
        }
    }
}

pub fn update_clouds(mut clouds: Query<&mut Cloud>) {
    for mut cloud in clouds.iter_mut() {
        cloud.update();
    }
}

pub fn update_sparks(mut commands: Commands, mut sparks: Query<(Entity, &mut Spark)>) {
    for (entity, mut spark) in sparks.iter_mut() {
        if !spark.update() {
            commands.entity(entity).try_despawn();
        }
    }
}

pub fn update_particles(mut commands: Commands, mut particles: Query<(Entity, &mut Particle)>) {
    for (entity, mut particle) in particles.iter_mut() {
        if !particle.update() {
            commands.entity(entity).try_despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::HeadlessAssets;

    fn make_world() -> World {
        let mut world = World::new();
        world.insert_resource(GameRng::with_seed(3));
        world.insert_resource(AnimationStore::from_assets(&HeadlessAssets::new()).unwrap());
        world
    }

    fn count<T: Component>(world: &mut World) -> usize {
        world.query::<&T>().iter(world).count()
    }

    #[test]
    fn test_impact_burst_spawns_sparks_and_dust() {
        let mut world = make_world();
        let animations = world.resource::<AnimationStore>().clone();
        let mut rng = fastrand::Rng::with_seed(8);
        {
            let mut commands = world.commands();
            spawn_impact_burst(&mut commands, &mut rng, &animations, Vec2::new(10.0, 10.0));
        }
        world.flush();
        assert_eq!(count::<Spark>(&mut world), IMPACT_PIECES);
        assert_eq!(count::<Particle>(&mut world), IMPACT_PIECES);
    }

    #[test]
    fn test_sparks_and_particles_expire() {
        let mut world = make_world();
        let animations = world.resource::<AnimationStore>().clone();
        world.spawn(Spark::new(Vec2::ZERO, 0.0, 0.25));
        world.spawn(
            Particle::new(ParticleKind::Dust, Vec2::ZERO, Vec2::ZERO, 0, &animations).unwrap(),
        );

        let mut schedule = Schedule::default();
        schedule.add_systems((update_sparks, update_particles));
        for _ in 0..3 {
            schedule.run(&mut world);
        }
        assert_eq!(count::<Spark>(&mut world), 0);
        assert_eq!(count::<Particle>(&mut world), 1);
        for _ in 0..30 {
            schedule.run(&mut world);
        }
        assert_eq!(count::<Particle>(&mut world), 0);
    }

    #[test]
    fn test_leaves_fall_from_canopies() {
        let mut world = make_world();
        world.spawn(LeafSpawner::for_tree(Vec2::ZERO));
        let mut schedule = Schedule::default();
        schedule.add_systems(spawn_leaves);
        let mut seen = 0;
        for _ in 0..2000 {
            schedule.run(&mut world);
            let mut particles = world.query::<&Particle>();
            for particle in particles.iter(&world) {
                assert_eq!(particle.kind, ParticleKind::Leaf);
                seen += 1;
            }
        }
        assert!(seen > 0);
    }
}
