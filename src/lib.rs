//! Tryhard: a 2D tile platformer core.
//!
//! This crate exposes the game's ECS components, resources, systems and
//! events, the game session and the level editor model, for use by a
//! presentation layer and in integration tests.

pub mod assets;
pub mod components;
pub mod editor;
pub mod events;
pub mod game;
pub mod geometry;
pub mod resources;
pub mod screens;
pub mod systems;
