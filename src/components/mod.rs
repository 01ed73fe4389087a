//! ECS components for entities.
//!
//! Gameplay entities carry their state and per-frame logic as plain methods
//! on these components; systems in [`crate::systems`] call them and turn the
//! returned outcomes into spawns, events and sounds.
//!
//! Submodules overview:
//! - [`animation`] – playback position inside a shared animation clip
//! - [`body`] – tile-colliding physics body shared by player and enemies
//! - [`cloud`] – parallax background cloud
//! - [`enemy`] – patrolling gunner
//! - [`leafspawner`] – tree canopy that drops leaf particles
//! - [`particle`] – short-lived animated particle (leaf or dust)
//! - [`player`] – player state machine: jumps, wall slide, dash
//! - [`projectile`] – enemy bullet
//! - [`spark`] – fading directional spark

pub mod animation;
pub mod body;
pub mod cloud;
pub mod enemy;
pub mod leafspawner;
pub mod particle;
pub mod player;
pub mod projectile;
pub mod spark;
