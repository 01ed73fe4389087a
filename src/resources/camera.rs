//! Scrolling camera resource.
//!
//! The camera eases toward the player instead of locking onto it, and holds
//! the screenshake budget that impacts top up.

use bevy_ecs::prelude::Resource;
use glam::Vec2;

/// Fraction of the remaining distance the camera covers each frame.
const FOLLOW_RATE: f32 = 1.0 / 30.0;

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub scroll: Vec2,
    /// Shake amplitude in pixels; decays by one per frame.
    pub screenshake: f32,
}

impl Camera {
    /// Ease toward centring `target` in a view of size `view`.
    pub fn follow(&mut self, target: Vec2, view: Vec2) {
        self.scroll += (target - view / 2.0 - self.scroll) * FOLLOW_RATE;
    }

    pub fn shake(&mut self, amount: f32) {
        self.screenshake = self.screenshake.max(amount);
    }

    pub fn decay_shake(&mut self) {
        self.screenshake = (self.screenshake - 1.0).max(0.0);
    }

    /// Whole-pixel offset used for drawing the world.
    pub fn render_offset(&self) -> Vec2 {
        self.scroll.trunc()
    }

    /// Random displacement of the final frame while shaking.
    pub fn shake_offset(&self, rng: &mut fastrand::Rng) -> Vec2 {
        let s = self.screenshake;
        Vec2::new(rng.f32() * s - s / 2.0, rng.f32() * s - s / 2.0)
    }

    pub fn reset(&mut self) {
        self.scroll = Vec2::ZERO;
    }
}
