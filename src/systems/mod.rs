//! Game systems.
//!
//! The gameplay schedule runs them chained in this order each frame:
//! level flow, camera, leaves, clouds, enemies, player, projectiles, sparks,
//! particles, audio housekeeping. Rendering is not part of the schedule; it
//! reads the world through [`render::render_pass`].
//!
//! Submodules overview
//! - [`audio`] – advance the audio message buffers
//! - [`enemy`] – enemy patrol, shots and dash kills
//! - [`fx`] – spawn helpers and updates for clouds, sparks and particles
//! - [`levelflow`] – level clear, death sequence and camera follow
//! - [`player`] – apply input to the player
//! - [`projectile`] – projectile flight and hits
//! - [`render`] – drawing seam and render pass

pub mod audio;
pub mod enemy;
pub mod fx;
pub mod levelflow;
pub mod player;
pub mod projectile;
pub mod render;
