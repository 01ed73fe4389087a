//! Gameplay systems ticking together in a World.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use glam::Vec2;

use tryhard::assets::HeadlessAssets;
use tryhard::components::body::BodyConfig;
use tryhard::components::enemy::{Enemy, EnemyConfig};
use tryhard::components::particle::Particle;
use tryhard::components::player::{Player, PlayerConfig, PlayerState};
use tryhard::components::projectile::Projectile;
use tryhard::components::spark::Spark;
use tryhard::events::audio::AudioCmd;
use tryhard::events::death::observe_player_death;
use tryhard::events::kill::observe_enemy_killed;
use tryhard::resources::animationstore::AnimationStore;
use tryhard::resources::camera::Camera;
use tryhard::resources::gameconfig::GameConfig;
use tryhard::resources::input::{HeldActions, InputState};
use tryhard::resources::levelstate::LevelState;
use tryhard::resources::rng::GameRng;
use tryhard::resources::tilegrid::{CellPos, TileGrid, TileKind};
use tryhard::systems::enemy::update_enemies;
use tryhard::systems::fx::{update_particles, update_sparks};
use tryhard::systems::player::update_player;
use tryhard::systems::projectile::update_projectiles;

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn floor_grid() -> TileGrid {
    let mut grid = TileGrid::new(16);
    for x in -5..20 {
        grid.place(TileKind::Stone, 1, CellPos::new(x, 5));
    }
    grid
}

fn make_world(grid: TileGrid) -> World {
    let assets = HeadlessAssets::new();
    let mut world = World::new();
    world.insert_resource(grid);
    world.insert_resource(GameConfig::default());
    world.insert_resource(InputState::default());
    world.insert_resource(LevelState::default());
    world.insert_resource(Camera::default());
    world.insert_resource(GameRng::with_seed(42));
    world.insert_resource(AnimationStore::from_assets(&assets).unwrap());
    world.init_resource::<Messages<AudioCmd>>();
    world.spawn(Observer::new(observe_player_death));
    world.spawn(Observer::new(observe_enemy_killed));
    world.flush();
    world
}

fn spawn_player(world: &mut World, pos: Vec2) -> Entity {
    world
        .spawn(Player::new(pos, BodyConfig::default(), PlayerConfig::default()))
        .id()
}

fn gameplay_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            update_enemies,
            update_player,
            update_projectiles,
            update_sparks,
            update_particles,
        )
            .chain(),
    );
    schedule
}

fn tick(world: &mut World, schedule: &mut Schedule, held: HeldActions) {
    world.resource_mut::<InputState>().advance(held);
    schedule.run(world);
}

fn count<T: Component>(world: &mut World) -> usize {
    world.query::<&T>().iter(world).count()
}

fn drain_audio(world: &mut World) -> Vec<AudioCmd> {
    world
        .resource_mut::<Messages<AudioCmd>>()
        .drain()
        .collect()
}

#[test]
fn test_player_falls_and_lands_on_floor() {
    let mut world = make_world(floor_grid());
    let player = spawn_player(&mut world, Vec2::new(20.0, 20.0));
    let mut schedule = gameplay_schedule();
    for _ in 0..60 {
        tick(&mut world, &mut schedule, HeldActions::default());
    }
    let player = world.get::<Player>(player).unwrap();
    assert!(approx_eq(player.body.pos.y, 65.0));
    assert!(player.is_grounded());
    assert_eq!(player.state, PlayerState::Idle);
}

#[test]
fn test_jump_press_plays_sound_and_leaves_ground() {
    let mut world = make_world(floor_grid());
    let player = spawn_player(&mut world, Vec2::new(20.0, 65.0));
    let mut schedule = gameplay_schedule();
    tick(&mut world, &mut schedule, HeldActions::default());
    drain_audio(&mut world);

    let jump = HeldActions {
        jump: true,
        ..Default::default()
    };
    tick(&mut world, &mut schedule, jump);
    // holding the key does not jump again
    tick(&mut world, &mut schedule, jump);
    assert_eq!(drain_audio(&mut world), vec![AudioCmd::Jump]);
    assert!(world.get::<Player>(player).unwrap().body.pos.y < 65.0);
}

#[test]
fn test_running_right_moves_and_faces_right() {
    let mut world = make_world(floor_grid());
    let player = spawn_player(&mut world, Vec2::new(20.0, 65.0));
    let mut schedule = gameplay_schedule();
    let right = HeldActions {
        right: true,
        ..Default::default()
    };
    for _ in 0..10 {
        tick(&mut world, &mut schedule, right);
    }
    let player = world.get::<Player>(player).unwrap();
    assert!(approx_eq(player.body.pos.x, 30.0));
    assert!(!player.body.flip);
    assert_eq!(player.state, PlayerState::Run);
}

#[test]
fn test_projectile_hit_starts_death_sequence() {
    let mut world = make_world(floor_grid());
    let player = spawn_player(&mut world, Vec2::new(20.0, 65.0));
    let center = world.get::<Player>(player).unwrap().body.center();
    world.spawn(Projectile::new(center + Vec2::new(1.5, 0.0), -1.5));

    let mut schedule = Schedule::default();
    schedule.add_systems(update_projectiles);
    schedule.run(&mut world);

    let state = world.resource::<LevelState>();
    assert!(state.is_dead());
    assert_eq!(state.death_counter, 1);
    assert_eq!(world.resource::<Camera>().screenshake, 16.0);
    assert_eq!(count::<Projectile>(&mut world), 0);
    assert_eq!(count::<Spark>(&mut world), 30);
    assert_eq!(count::<Particle>(&mut world), 30);
    assert_eq!(drain_audio(&mut world), vec![AudioCmd::Hit]);
}

#[test]
fn test_dashing_player_is_not_hit() {
    let mut world = make_world(floor_grid());
    let player = spawn_player(&mut world, Vec2::new(20.0, 65.0));
    let center = {
        let mut player = world.get_mut::<Player>(player).unwrap();
        player.dashing = 55;
        player.body.center()
    };
    world.spawn(Projectile::new(center + Vec2::new(1.5, 0.0), -1.5));

    let mut schedule = Schedule::default();
    schedule.add_systems(update_projectiles);
    schedule.run(&mut world);

    assert!(!world.resource::<LevelState>().is_dead());
    assert_eq!(count::<Projectile>(&mut world), 1);
}

#[test]
fn test_projectile_into_wall_sparks() {
    let mut world = make_world(floor_grid());
    spawn_player(&mut world, Vec2::new(200.0, 65.0));
    // floor row starts at y = 80
    world.spawn(Projectile::new(Vec2::new(30.0, 81.0), 1.5));

    let mut schedule = Schedule::default();
    schedule.add_systems(update_projectiles);
    schedule.run(&mut world);

    assert_eq!(count::<Projectile>(&mut world), 0);
    assert_eq!(count::<Spark>(&mut world), 4);
    assert!(!world.resource::<LevelState>().is_dead());
}

#[test]
fn test_dash_through_enemy_kills_it() {
    let mut world = make_world(floor_grid());
    let player = spawn_player(&mut world, Vec2::new(40.0, 65.0));
    world.get_mut::<Player>(player).unwrap().dashing = 55;
    world.spawn(Enemy::new(
        Vec2::new(42.0, 65.0),
        BodyConfig::default(),
        EnemyConfig::default(),
    ));

    let mut schedule = Schedule::default();
    schedule.add_systems(update_enemies);
    schedule.run(&mut world);

    assert_eq!(count::<Enemy>(&mut world), 0);
    assert_eq!(count::<Spark>(&mut world), 32);
    assert_eq!(world.resource::<Camera>().screenshake, 16.0);
    assert_eq!(drain_audio(&mut world), vec![AudioCmd::Hit]);
}

#[test]
fn test_falling_forever_dies_once() {
    let mut world = make_world(TileGrid::new(16));
    spawn_player(&mut world, Vec2::new(0.0, 0.0));
    let mut schedule = gameplay_schedule();
    for _ in 0..120 {
        tick(&mut world, &mut schedule, HeldActions::default());
    }
    assert!(!world.resource::<LevelState>().is_dead());

    for _ in 0..30 {
        tick(&mut world, &mut schedule, HeldActions::default());
    }
    let state = world.resource::<LevelState>();
    assert!(state.is_dead());
    assert_eq!(state.death_counter, 1);
}
