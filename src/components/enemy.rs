//! Enemy controller.
//!
//! An [`Enemy`] idles until a random roll starts a walk. While walking it
//! probes the ground one cell ahead and one cell below its feet; no ground
//! or a wall turns it around. When a walk ends it fires a projectile if the
//! player stands roughly level with it and in front of it.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::body::{BodyConfig, PhysicsBody};
use crate::geometry::Rect;
use crate::resources::animationstore::AnimationStore;
use crate::resources::gameconfig::GameConfig;
use crate::resources::tilegrid::TileGrid;

pub const ENEMY_SIZE: Vec2 = Vec2::new(8.0, 15.0);
/// Chance per idle frame to start walking.
const WALK_CHANCE: f32 = 0.01;
/// Horizontal reach of the ledge probe and the muzzle, from the centre.
const PROBE_REACH: f32 = 7.0;
/// Max vertical distance for the player to be in line of fire.
const LINE_OF_FIRE: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyConfig {
    pub walk_speed: f32,
    pub projectile_speed: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

impl From<&GameConfig> for EnemyConfig {
    fn from(config: &GameConfig) -> Self {
        Self {
            walk_speed: config.walk_speed,
            projectile_speed: config.projectile_speed,
        }
    }
}

/// The parts of the player an enemy reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub pos: Vec2,
    pub rect: Rect,
    pub dash_active: bool,
}

/// A shot leaving the muzzle this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub pos: Vec2,
    /// Signed horizontal speed in pixels per frame.
    pub direction: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnemyOutcome {
    pub fired: Option<Shot>,
    /// Struck by a dashing player.
    pub killed: bool,
}

#[derive(Component, Debug, Clone)]
pub struct Enemy {
    pub body: PhysicsBody,
    /// Remaining frames of the current walk; 0 while idle.
    pub walking: u32,
    pub config: EnemyConfig,
}

impl Enemy {
    pub fn new(pos: Vec2, body_config: BodyConfig, config: EnemyConfig) -> Self {
        Self {
            body: PhysicsBody::new(pos, ENEMY_SIZE, body_config),
            walking: 0,
            config,
        }
    }

    /// Ground probe point ahead of the enemy in its facing direction.
    pub fn ledge_probe(&self, tile_size: u32) -> Vec2 {
        let ahead = if self.body.flip { -PROBE_REACH } else { PROBE_REACH };
        Vec2::new(
            self.body.center().x + ahead,
            self.body.pos.y + self.body.size.y + tile_size as f32 / 2.0,
        )
    }

    /// Where a gun would be held, and whether it points left.
    pub fn gun_anchor(&self) -> (Vec2, bool) {
        (self.body.center(), self.body.flip)
    }

    pub fn update(
        &mut self,
        grid: &TileGrid,
        target: &Target,
        rng: &mut fastrand::Rng,
        animations: &AnimationStore,
    ) -> EnemyOutcome {
        let mut outcome = EnemyOutcome::default();
        let mut movement = Vec2::ZERO;

        if self.walking > 0 {
            if grid.solid_check(self.ledge_probe(grid.tile_size())) {
                // flags are from the previous frame's move
                if self.body.collisions.left || self.body.collisions.right {
                    self.body.flip = !self.body.flip;
                } else {
                    movement.x = if self.body.flip {
                        -self.config.walk_speed
                    } else {
                        self.config.walk_speed
                    };
                }
            } else {
                self.body.flip = !self.body.flip;
            }
            self.walking -= 1;
            if self.walking == 0 {
                outcome.fired = self.aim(target);
            }
        } else if rng.f32() < WALK_CHANCE {
            self.walking = rng.u32(30..=120);
        }

        self.body.update(grid, movement);
        let action = if movement.x != 0.0 { "run" } else { "idle" };
        self.body.set_action("enemy", action, animations);

        if target.dash_active && self.body.rect().intersects(&target.rect) {
            outcome.killed = true;
        }
        outcome
    }

    fn aim(&self, target: &Target) -> Option<Shot> {
        let distance = target.pos - self.body.pos;
        if distance.y.abs() >= LINE_OF_FIRE {
            return None;
        }
        let center = self.body.center();
        if self.body.flip && distance.x < 0.0 {
            Some(Shot {
                pos: Vec2::new(center.x - PROBE_REACH, center.y),
                direction: -self.config.projectile_speed,
            })
        } else if !self.body.flip && distance.x > 0.0 {
            Some(Shot {
                pos: Vec2::new(center.x + PROBE_REACH, center.y),
                direction: self.config.projectile_speed,
            })
        } else {
            None
        }
    }
}
