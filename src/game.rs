//! Game session: world setup, level loading and the per-frame step.
//!
//! [`Game`] owns the ECS [`World`], the gameplay [`Schedule`] and the menu
//! [`ScreenStack`]. The presentation layer drives it with one call to
//! [`Game::frame`] and one to [`Game::render`] per display frame, then drains
//! queued sounds with [`Game::drain_audio`].
//!
//! Level loads requested by systems (next level, reload after death) are
//! applied at the end of [`Game::frame`], outside the schedule, so no system
//! ever sees a half-swapped level.

use std::fs;
use std::path::Path;

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{error, info, warn};
use thiserror::Error;

use crate::assets::{AssetError, AssetProvider, ImageInfo, TileCatalogue, validate_sprites};
use crate::components::body::BodyConfig;
use crate::components::cloud::Cloud;
use crate::components::enemy::{Enemy, EnemyConfig};
use crate::components::leafspawner::LeafSpawner;
use crate::components::particle::Particle;
use crate::components::player::{Player, PlayerConfig};
use crate::components::projectile::Projectile;
use crate::components::spark::Spark;
use crate::events::audio::AudioCmd;
use crate::events::death::observe_player_death;
use crate::events::kill::observe_enemy_killed;
use crate::resources::animationstore::AnimationStore;
use crate::resources::camera::Camera;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::{HeldActions, InputState};
use crate::resources::levelfile::LevelError;
use crate::resources::levelstate::LevelState;
use crate::resources::rng::GameRng;
use crate::resources::savestate::{SaveError, SaveState};
use crate::resources::tilegrid::{TileGrid, TileKind};
use crate::screens::{MenuInput, MenuResult, PauseScreen, ScreenStack};
use crate::systems::audio::update_audio_cmds;
use crate::systems::enemy::update_enemies;
use crate::systems::fx::{spawn_leaves, update_clouds, update_particles, update_sparks};
use crate::systems::levelflow::{follow_camera, update_level_flow};
use crate::systems::player::update_player;
use crate::systems::projectile::update_projectiles;
use crate::systems::render::{Renderer, render_pass};

pub const CLOUD_COUNT: usize = 16;
/// Where the player stands before any level put it somewhere.
const PLAYER_START: Vec2 = Vec2::new(50.0, 50.0);
const CLOUD_SPRITES: [&str; 2] = ["clouds/0", "clouds/1"];

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error(transparent)]
    Asset(#[from] AssetError),
}

pub struct Game {
    world: World,
    schedule: Schedule,
    screens: ScreenStack,
    catalogue: TileCatalogue,
    player: Entity,
    quit: bool,
}

impl Game {
    /// Build a session with no level loaded yet.
    ///
    /// Fails if the asset provider lacks an animation clip or one of the
    /// sprites the session draws.
    pub fn new(
        config: GameConfig,
        assets: &dyn AssetProvider,
        rng_seed: u64,
    ) -> Result<Self, GameError> {
        validate_sprites(assets)?;
        let animations = AnimationStore::from_assets(assets)?;

        let mut world = World::new();
        let mut rng = GameRng::with_seed(rng_seed);

        let cloud_images: Vec<ImageInfo> = CLOUD_SPRITES
            .iter()
            .filter_map(|name| assets.sprite(name))
            .collect();
        for _ in 0..CLOUD_COUNT {
            let image = cloud_images[rng.0.usize(..cloud_images.len())];
            world.spawn(Cloud::random(image, &mut rng.0));
        }

        let mut player = Player::new(
            PLAYER_START,
            BodyConfig::from(&config),
            PlayerConfig::from(&config),
        );
        player.body.set_action("player", "idle", &animations);
        let player = world.spawn(player).id();

        let level_count = count_level_files(&config.maps_dir);
        info!(
            "Found {} level files in {}",
            level_count,
            config.maps_dir.display()
        );

        world.insert_resource(LevelState {
            level_count,
            ..Default::default()
        });
        world.insert_resource(config);
        world.insert_resource(TileGrid::default());
        world.insert_resource(InputState::default());
        world.insert_resource(Camera::default());
        world.insert_resource(rng);
        world.insert_resource(animations);
        world.init_resource::<Messages<AudioCmd>>();

        world.spawn(Observer::new(observe_player_death));
        world.spawn(Observer::new(observe_enemy_killed));
        // Observers must exist before any system triggers.
        world.flush();

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                update_level_flow,
                follow_camera,
                spawn_leaves,
                update_clouds,
                update_enemies,
                update_player,
                update_projectiles,
                update_sparks,
                update_particles,
                // must be last: drops sounds nobody drained
                update_audio_cmds,
            )
                .chain(),
        );

        Ok(Self {
            world,
            schedule,
            screens: ScreenStack::new(),
            catalogue: TileCatalogue::from_assets(assets),
            player,
            quit: false,
        })
    }

    /// Load `maps_dir/<level>.json` and populate the world from it.
    ///
    /// A tile without an image fails the load and leaves the current level
    /// in place.
    pub fn load_level(&mut self, level: u32) -> Result<(), GameError> {
        let path = self.world.resource::<GameConfig>().level_path(level);
        let grid = TileGrid::load(&path)?;
        if let Err(e) = self.catalogue.validate(&grid) {
            error!("Level {} in {}: {}", level, path.display(), e);
            return Err(e.into());
        }
        self.load_grid(level, grid);
        Ok(())
    }

    /// Populate the world from an already parsed level.
    ///
    /// Trees become leaf spawners and stay in the grid; spawner markers are
    /// consumed: variant 0 places the player, variant 1 an enemy.
    pub fn load_grid(&mut self, level: u32, mut grid: TileGrid) {
        self.clear_level_entities();

        let (body_config, enemy_config) = {
            let config = self.world.resource::<GameConfig>();
            (BodyConfig::from(config), EnemyConfig::from(config))
        };

        for tree in grid.extract(&[(TileKind::LargeDecor, 2)], true) {
            self.world.spawn(LeafSpawner::for_tree(tree.pos));
        }

        let mut enemies = 0;
        for spawner in grid.extract(&[(TileKind::Spawner, 0), (TileKind::Spawner, 1)], false) {
            if spawner.variant == 0 {
                if let Some(mut player) = self.world.get_mut::<Player>(self.player) {
                    player.respawn(spawner.pos);
                }
            } else {
                let mut enemy = Enemy::new(spawner.pos, body_config, enemy_config);
                enemy
                    .body
                    .set_action("enemy", "idle", self.world.resource::<AnimationStore>());
                self.world.spawn(enemy);
                enemies += 1;
            }
        }

        self.world.insert_resource(grid);
        self.world.resource_mut::<Camera>().reset();
        self.world.resource_mut::<LevelState>().on_level_loaded(level);
        info!("Loaded level {} with {} enemies", level, enemies);
    }

    fn clear_level_entities(&mut self) {
        let stale: Vec<Entity> = self
            .world
            .query_filtered::<Entity, Or<(
                With<Enemy>,
                With<Projectile>,
                With<Particle>,
                With<Spark>,
                With<LeafSpawner>,
            )>>()
            .iter(&self.world)
            .collect();
        for entity in stale {
            self.world.despawn(entity);
        }
    }

    /// Run one simulation step with this frame's held keys.
    ///
    /// While a menu is open the simulation is frozen; pressing pause opens
    /// the pause menu.
    pub fn frame(&mut self, held: HeldActions) -> Result<(), GameError> {
        self.world.resource_mut::<InputState>().advance(held);
        if self.screens.is_active() {
            return Ok(());
        }
        if self.world.resource::<InputState>().pause.just_pressed {
            let (level, max_level) = {
                let state = self.world.resource::<LevelState>();
                (state.level, state.max_level)
            };
            self.screens.push(Box::new(PauseScreen::new(level, max_level)));
            return Ok(());
        }

        self.schedule.run(&mut self.world);
        self.world.clear_trackers();

        let pending = self.world.resource_mut::<LevelState>().pending_load.take();
        if let Some(level) = pending {
            self.load_level(level)?;
        }
        Ok(())
    }

    /// Route menu input to the open screens, applying their final result.
    pub fn menu(&mut self, input: &MenuInput) -> Result<(), GameError> {
        match self.screens.handle_input(input) {
            Some(MenuResult::Level(level)) => {
                if level != self.world.resource::<LevelState>().level {
                    self.load_level(level)?;
                }
            }
            Some(MenuResult::Exit) => {
                info!("Exit requested from the pause menu");
                self.quit = true;
            }
            None => {}
        }
        Ok(())
    }

    pub fn render(&mut self, renderer: &mut dyn Renderer, assets: &dyn AssetProvider) {
        render_pass(&mut self.world, renderer, assets);
        self.screens.render(renderer);
    }

    /// Sounds queued since the last call, gameplay first then menus.
    pub fn drain_audio(&mut self) -> Vec<AudioCmd> {
        let mut sounds: Vec<AudioCmd> = self
            .world
            .resource_mut::<Messages<AudioCmd>>()
            .drain()
            .collect();
        sounds.extend(self.screens.drain_audio());
        sounds
    }

    pub fn save_progress(&self) -> Result<(), GameError> {
        let state = SaveState::from_level_state(self.world.resource::<LevelState>());
        state.save(&self.world.resource::<GameConfig>().save_path)?;
        Ok(())
    }

    /// Restore progress from the save file and load the saved level.
    pub fn restore_progress(&mut self) -> Result<(), GameError> {
        let path = self.world.resource::<GameConfig>().save_path.clone();
        let state = SaveState::load(path)?;
        state.apply(&mut self.world.resource_mut::<LevelState>());
        self.load_level(state.level)
    }

    pub fn level_state(&self) -> &LevelState {
        self.world.resource::<LevelState>()
    }

    pub fn player(&self) -> Option<&Player> {
        self.world.get::<Player>(self.player)
    }

    pub fn enemy_count(&mut self) -> usize {
        self.world
            .query_filtered::<(), With<Enemy>>()
            .iter(&self.world)
            .count()
    }

    pub fn is_paused(&self) -> bool {
        self.screens.is_active()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

/// Number of `*.json` files in the maps directory.
fn count_level_files(dir: &Path) -> u32 {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
            .count() as u32,
        Err(e) => {
            warn!("Cannot list levels in {}: {}", dir.display(), e);
            0
        }
    }
}
