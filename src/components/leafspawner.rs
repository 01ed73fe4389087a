use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::geometry::Rect;

/// Odds denominator: a spawner drops a leaf when `rand * LEAF_ODDS < area`.
const LEAF_ODDS: f32 = 49999.0;

/// Canopy area of a tree that sheds leaves.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct LeafSpawner {
    pub rect: Rect,
}

impl LeafSpawner {
    /// Canopy of a tree image placed at `tree_pos`.
    pub fn for_tree(tree_pos: Vec2) -> Self {
        Self {
            rect: Rect::new(tree_pos.x + 4.0, tree_pos.y + 4.0, 23.0, 13.0),
        }
    }

    /// Roll for this frame's leaf. Returns its spawn point.
    pub fn roll(&self, rng: &mut fastrand::Rng) -> Option<Vec2> {
        if rng.f32() * LEAF_ODDS >= self.rect.area() {
            return None;
        }
        Some(Vec2::new(
            self.rect.x + rng.f32() * self.rect.w,
            self.rect.y + rng.f32() * self.rect.h,
        ))
    }
}
