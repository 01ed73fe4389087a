//! Axis-separated kinematic body shared by the player and enemies.
//!
//! [`PhysicsBody::update`] moves the body by `intent + velocity` one axis at
//! a time, X first, and after each axis pushes the body out of every
//! physical tile returned by
//! [`TileGrid::physics_rects_around`](crate::resources::tilegrid::TileGrid::physics_rects_around)
//! for its centre. The sides that collided are reported as
//! [`CollisionFlags`], recomputed from scratch every update.
//!
//! Bodies never move more than one cell per frame at the configured speeds,
//! so the 3x3 neighbourhood is always enough. Nothing enforces this; it is a
//! content contract.

use glam::Vec2;

use crate::components::animation::AnimationPlayer;
use crate::geometry::Rect;
use crate::resources::animationstore::AnimationStore;
use crate::resources::gameconfig::GameConfig;
use crate::resources::tilegrid::TileGrid;

/// Which sides of the body hit a tile during the last update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl CollisionFlags {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Gravity tuning, in pixels per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyConfig {
    pub gravity: f32,
    pub terminal_velocity: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            gravity: 0.1,
            terminal_velocity: 5.0,
        }
    }
}

impl From<&GameConfig> for BodyConfig {
    fn from(config: &GameConfig) -> Self {
        Self {
            gravity: config.gravity,
            terminal_velocity: config.terminal_velocity,
        }
    }
}

/// Position, size and velocity of a moving actor plus its current clip.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    /// Top-left corner in pixels.
    pub pos: Vec2,
    pub size: Vec2,
    /// Carried between frames. `x` holds impulses (dash, wall jump),
    /// `y` integrates gravity.
    pub velocity: Vec2,
    pub collisions: CollisionFlags,
    /// Mirrors the drawn image; collision geometry is unaffected.
    pub flip: bool,
    pub last_movement: Vec2,
    /// Draw offset of the image relative to `pos`.
    pub anim_offset: Vec2,
    pub action: &'static str,
    pub animation: Option<AnimationPlayer>,
    pub config: BodyConfig,
}

impl PhysicsBody {
    pub fn new(pos: Vec2, size: Vec2, config: BodyConfig) -> Self {
        Self {
            pos,
            size,
            velocity: Vec2::ZERO,
            collisions: CollisionFlags::default(),
            flip: false,
            last_movement: Vec2::ZERO,
            anim_offset: Vec2::new(-3.0, -3.0),
            action: "",
            animation: None,
            config,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Switch to the clip `<prefix>/<action>`; restarting the same action is
    /// a no-op so looping clips keep their phase.
    pub fn set_action(&mut self, prefix: &str, action: &'static str, animations: &AnimationStore) {
        if self.action == action && self.animation.is_some() {
            return;
        }
        self.action = action;
        self.animation = animations.player(&format!("{prefix}/{action}"));
    }

    /// One simulation step. Returns the fresh collision flags.
    pub fn update(&mut self, grid: &TileGrid, movement: Vec2) -> CollisionFlags {
        self.collisions = CollisionFlags::default();
        let frame_movement = movement + self.velocity;

        self.pos.x += frame_movement.x;
        let mut rect = self.rect();
        for tile in grid.physics_rects_around(rect.center()) {
            if !rect.intersects(&tile) {
                continue;
            }
            if frame_movement.x > 0.0 {
                rect.x = tile.left() - rect.w;
                self.collisions.right = true;
            } else if frame_movement.x < 0.0 {
                rect.x = tile.right();
                self.collisions.left = true;
            }
            self.pos.x = rect.x;
        }

        self.velocity.y = (self.velocity.y + self.config.gravity).min(self.config.terminal_velocity);
        let dy = movement.y + self.velocity.y;
        self.pos.y += dy;
        let mut rect = self.rect();
        for tile in grid.physics_rects_around(rect.center()) {
            if !rect.intersects(&tile) {
                continue;
            }
            if dy > 0.0 {
                rect.y = tile.top() - rect.h;
                self.collisions.down = true;
            } else if dy < 0.0 {
                rect.y = tile.bottom();
                self.collisions.up = true;
            }
            self.pos.y = rect.y;
        }
        if self.collisions.up || self.collisions.down {
            self.velocity.y = 0.0;
        }

        if movement.x > 0.0 {
            self.flip = false;
        } else if movement.x < 0.0 {
            self.flip = true;
        }
        self.last_movement = movement;

        if let Some(animation) = self.animation.as_mut() {
            animation.update();
        }
        self.collisions
    }

    /// Where the current frame image is drawn, in screen space.
    pub fn draw_pos(&self, offset: Vec2) -> Vec2 {
        self.pos - offset + self.anim_offset
    }
}
