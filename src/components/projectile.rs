use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Enemy shot travelling horizontally.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    /// Centre of the projectile; also its hit point.
    pub pos: Vec2,
    /// Signed horizontal speed in pixels per frame.
    pub direction: f32,
    /// Frames since it was fired.
    pub age: u32,
}

impl Projectile {
    pub fn new(pos: Vec2, direction: f32) -> Self {
        Self {
            pos,
            direction,
            age: 0,
        }
    }

    pub fn advance(&mut self) {
        self.pos.x += self.direction;
        self.age += 1;
    }

    /// Angle sparks fly off at when it hits a wall: back the way it came.
    pub fn impact_angle(&self) -> f32 {
        if self.direction > 0.0 {
            std::f32::consts::PI
        } else {
            0.0
        }
    }
}
