use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::assets::ImageInfo;

/// Background cloud drifting right with parallax.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub pos: Vec2,
    pub speed: f32,
    /// Parallax factor: 0 is pinned to the screen, 1 moves with the world.
    pub depth: f32,
    pub image: ImageInfo,
}

impl Cloud {
    /// A cloud with random placement, speed and depth.
    pub fn random(image: ImageInfo, rng: &mut fastrand::Rng) -> Self {
        Self {
            pos: Vec2::new(rng.f32() * 99999.0, rng.f32() * 99999.0),
            speed: rng.f32() * 0.05 + 0.05,
            depth: rng.f32() * 0.6 + 0.2,
            image,
        }
    }

    pub fn update(&mut self) {
        self.pos.x += self.speed;
    }

    /// Screen position, wrapped so the cloud keeps cycling across the view.
    pub fn screen_pos(&self, offset: Vec2, view: Vec2) -> Vec2 {
        let raw = self.pos - offset * self.depth;
        let span = view + self.image.size;
        Vec2::new(
            raw.x.rem_euclid(span.x) - self.image.size.x,
            raw.y.rem_euclid(span.y) - self.image.size.y,
        )
    }
}
