//! Seeded random source shared by every gameplay system.
//!
//! One generator for the whole world keeps a run reproducible from its seed,
//! which the headless simulation and the integration tests rely on.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Clone)]
pub struct GameRng(pub fastrand::Rng);

impl GameRng {
    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self(fastrand::Rng::new())
    }
}
