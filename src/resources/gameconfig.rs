//! Game configuration resource.
//!
//! Manages tuning and paths loaded from an INI configuration file. Every key
//! is optional; defaults reproduce the stock game feel.
//!
//! # Configuration File Format
//!
//! ```ini
//! [display]
//! width = 320
//! height = 240
//! target_fps = 60
//!
//! [physics]
//! gravity = 0.1
//! terminal_velocity = 5.0
//!
//! [player]
//! run_speed = 1.0
//! jump_impulse = 3.0
//! max_jumps = 2
//! jump_cut = 1.0
//! wall_slide_speed = 0.5
//! wall_jump_x = 3.5
//! wall_jump_y = 2.5
//! dash_speed = 8.0
//! death_air_time = 120
//!
//! [enemy]
//! walk_speed = 0.5
//! projectile_speed = 1.5
//! projectile_lifetime = 360
//!
//! [levels]
//! maps_dir = data/maps
//! save_path = savefile.json
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::Vec2;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_VIEW_WIDTH: u32 = 320;
const DEFAULT_VIEW_HEIGHT: u32 = 240;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_GRAVITY: f32 = 0.1;
const DEFAULT_TERMINAL_VELOCITY: f32 = 5.0;
const DEFAULT_RUN_SPEED: f32 = 1.0;
const DEFAULT_JUMP_IMPULSE: f32 = 3.0;
const DEFAULT_MAX_JUMPS: u32 = 2;
const DEFAULT_JUMP_CUT: f32 = 1.0;
const DEFAULT_WALL_SLIDE_SPEED: f32 = 0.5;
const DEFAULT_WALL_JUMP_X: f32 = 3.5;
const DEFAULT_WALL_JUMP_Y: f32 = 2.5;
const DEFAULT_DASH_SPEED: f32 = 8.0;
const DEFAULT_DEATH_AIR_TIME: u32 = 120;
const DEFAULT_WALK_SPEED: f32 = 0.5;
const DEFAULT_PROJECTILE_SPEED: f32 = 1.5;
const DEFAULT_PROJECTILE_LIFETIME: u32 = 360;
const DEFAULT_MAPS_DIR: &str = "data/maps";
const DEFAULT_SAVE_PATH: &str = "savefile.json";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
///
/// The per-entity tuning structs ([`BodyConfig`], [`PlayerConfig`],
/// [`EnemyConfig`]) are derived from it when a level is loaded.
///
/// [`BodyConfig`]: crate::components::body::BodyConfig
/// [`PlayerConfig`]: crate::components::player::PlayerConfig
/// [`EnemyConfig`]: crate::components::enemy::EnemyConfig
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Logical view width in pixels.
    pub view_width: u32,
    /// Logical view height in pixels.
    pub view_height: u32,
    /// Target frames per second. The simulation is frame-stepped.
    pub target_fps: u32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub run_speed: f32,
    pub jump_impulse: f32,
    pub max_jumps: u32,
    /// Upward speed a released jump is cut down to.
    pub jump_cut: f32,
    pub wall_slide_speed: f32,
    pub wall_jump_x: f32,
    pub wall_jump_y: f32,
    pub dash_speed: f32,
    /// Airborne frames before the player counts as fallen off the level.
    pub death_air_time: u32,
    pub walk_speed: f32,
    pub projectile_speed: f32,
    pub projectile_lifetime: u32,
    /// Directory holding `0.json`, `1.json`, ...
    pub maps_dir: PathBuf,
    pub save_path: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            view_width: DEFAULT_VIEW_WIDTH,
            view_height: DEFAULT_VIEW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            gravity: DEFAULT_GRAVITY,
            terminal_velocity: DEFAULT_TERMINAL_VELOCITY,
            run_speed: DEFAULT_RUN_SPEED,
            jump_impulse: DEFAULT_JUMP_IMPULSE,
            max_jumps: DEFAULT_MAX_JUMPS,
            jump_cut: DEFAULT_JUMP_CUT,
            wall_slide_speed: DEFAULT_WALL_SLIDE_SPEED,
            wall_jump_x: DEFAULT_WALL_JUMP_X,
            wall_jump_y: DEFAULT_WALL_JUMP_Y,
            dash_speed: DEFAULT_DASH_SPEED,
            death_air_time: DEFAULT_DEATH_AIR_TIME,
            walk_speed: DEFAULT_WALK_SPEED,
            projectile_speed: DEFAULT_PROJECTILE_SPEED,
            projectile_lifetime: DEFAULT_PROJECTILE_LIFETIME,
            maps_dir: PathBuf::from(DEFAULT_MAPS_DIR),
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Logical view size as a vector.
    pub fn view_size(&self) -> Vec2 {
        Vec2::new(self.view_width as f32, self.view_height as f32)
    }

    /// Path of a level file inside `maps_dir`.
    pub fn level_path(&self, level: u32) -> PathBuf {
        self.maps_dir.join(format!("{level}.json"))
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply_ini(&config);

        info!(
            "Loaded config: {}x{} view, fps={}, gravity={}, max_jumps={}, maps_dir={:?}",
            self.view_width,
            self.view_height,
            self.target_fps,
            self.gravity,
            self.max_jumps,
            self.maps_dir
        );

        Ok(())
    }

    /// Load configuration from INI text, e.g. an embedded default.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply_ini(&config);
        Ok(())
    }

    fn apply_ini(&mut self, config: &Ini) {
        let uint = |section: &str, key: &str| config.getuint(section, key).ok().flatten();
        let float = |section: &str, key: &str| {
            config
                .getfloat(section, key)
                .ok()
                .flatten()
                .map(|v| v as f32)
        };

        // [display] section
        if let Some(width) = uint("display", "width") {
            self.view_width = width as u32;
        }
        if let Some(height) = uint("display", "height") {
            self.view_height = height as u32;
        }
        if let Some(fps) = uint("display", "target_fps") {
            self.target_fps = fps as u32;
        }

        // [physics] section
        if let Some(v) = float("physics", "gravity") {
            self.gravity = v;
        }
        if let Some(v) = float("physics", "terminal_velocity") {
            self.terminal_velocity = v;
        }

        // [player] section
        if let Some(v) = float("player", "run_speed") {
            self.run_speed = v;
        }
        if let Some(v) = float("player", "jump_impulse") {
            self.jump_impulse = v;
        }
        if let Some(v) = uint("player", "max_jumps") {
            self.max_jumps = v as u32;
        }
        if let Some(v) = float("player", "jump_cut") {
            self.jump_cut = v;
        }
        if let Some(v) = float("player", "wall_slide_speed") {
            self.wall_slide_speed = v;
        }
        if let Some(v) = float("player", "wall_jump_x") {
            self.wall_jump_x = v;
        }
        if let Some(v) = float("player", "wall_jump_y") {
            self.wall_jump_y = v;
        }
        if let Some(v) = float("player", "dash_speed") {
            self.dash_speed = v;
        }
        if let Some(v) = uint("player", "death_air_time") {
            self.death_air_time = v as u32;
        }

        // [enemy] section
        if let Some(v) = float("enemy", "walk_speed") {
            self.walk_speed = v;
        }
        if let Some(v) = float("enemy", "projectile_speed") {
            self.projectile_speed = v;
        }
        if let Some(v) = uint("enemy", "projectile_lifetime") {
            self.projectile_lifetime = v as u32;
        }

        // [levels] section
        if let Some(dir) = config.get("levels", "maps_dir") {
            self.maps_dir = PathBuf::from(dir);
        }
        if let Some(path) = config.get("levels", "save_path") {
            self.save_path = PathBuf::from(path);
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();
        let mut set = |section: &str, key: &str, value: String| {
            config.set(section, key, Some(value));
        };

        set("display", "width", self.view_width.to_string());
        set("display", "height", self.view_height.to_string());
        set("display", "target_fps", self.target_fps.to_string());

        set("physics", "gravity", self.gravity.to_string());
        set("physics", "terminal_velocity", self.terminal_velocity.to_string());

        set("player", "run_speed", self.run_speed.to_string());
        set("player", "jump_impulse", self.jump_impulse.to_string());
        set("player", "max_jumps", self.max_jumps.to_string());
        set("player", "jump_cut", self.jump_cut.to_string());
        set("player", "wall_slide_speed", self.wall_slide_speed.to_string());
        set("player", "wall_jump_x", self.wall_jump_x.to_string());
        set("player", "wall_jump_y", self.wall_jump_y.to_string());
        set("player", "dash_speed", self.dash_speed.to_string());
        set("player", "death_air_time", self.death_air_time.to_string());

        set("enemy", "walk_speed", self.walk_speed.to_string());
        set("enemy", "projectile_speed", self.projectile_speed.to_string());
        set("enemy", "projectile_lifetime", self.projectile_lifetime.to_string());

        set("levels", "maps_dir", self.maps_dir.display().to_string());
        set("levels", "save_path", self.save_path.display().to_string());

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
