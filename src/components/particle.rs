//! Animated particles: falling leaves and dust puffs.
//!
//! A particle lives exactly as long as its one-shot animation. Expiry is
//! checked before moving, so the final frame is still drawn once.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::animation::AnimationPlayer;
use crate::resources::animationstore::AnimationStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Leaf,
    Dust,
}

impl ParticleKind {
    pub fn animation_key(self) -> &'static str {
        match self {
            ParticleKind::Leaf => "particle/leaf",
            ParticleKind::Dust => "particle/particle",
        }
    }
}

/// Horizontal sway of a falling leaf, per animation frame.
const LEAF_SWAY_RATE: f32 = 0.035;
const LEAF_SWAY_AMPLITUDE: f32 = 0.3;

#[derive(Component, Debug, Clone)]
pub struct Particle {
    pub kind: ParticleKind,
    /// Centre of the drawn image.
    pub pos: Vec2,
    pub velocity: Vec2,
    pub animation: AnimationPlayer,
}

impl Particle {
    /// `None` when the store lacks the kind's clip.
    pub fn new(
        kind: ParticleKind,
        pos: Vec2,
        velocity: Vec2,
        frame: u32,
        animations: &AnimationStore,
    ) -> Option<Self> {
        let animation = animations.player(kind.animation_key())?.with_frame(frame);
        Some(Self {
            kind,
            pos,
            velocity,
            animation,
        })
    }

    /// Advance one frame. Returns `false` once expired.
    pub fn update(&mut self) -> bool {
        if self.animation.done() {
            return false;
        }
        self.pos += self.velocity;
        self.animation.update();
        if self.kind == ParticleKind::Leaf {
            self.pos.x += (self.animation.frame() as f32 * LEAF_SWAY_RATE).sin() * LEAF_SWAY_AMPLITUDE;
        }
        true
    }
}
