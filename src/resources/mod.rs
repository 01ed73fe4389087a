//! ECS resources made available to systems.
//!
//! Long-lived data inserted into the world once per session: the level's
//! tile grid, input, camera, progression state, randomness, animation
//! definitions and configuration.
//!
//! Overview
//! - `animationstore` – animation clips resolved from the asset provider
//! - `camera` – eased scroll and screenshake
//! - `gameconfig` – INI-backed tuning and paths
//! - `input` – per-frame gameplay actions with edge detection
//! - `levelfile` – on-disk level format and its errors
//! - `levelstate` – current level, death sequence and iris transition
//! - `rng` – seeded random source
//! - `savestate` – persisted progress
//! - `tilegrid` – sparse tile map with collision queries and autotiling
pub mod animationstore;
pub mod camera;
pub mod gameconfig;
pub mod input;
pub mod levelfile;
pub mod levelstate;
pub mod rng;
pub mod savestate;
pub mod tilegrid;
