//! Per-frame input resource.
//!
//! The presentation layer owns the keyboard. Each frame it reports which
//! actions are held, either by filling [`InputState`] directly or through
//! [`InputState::advance`], which derives the press/release edges the
//! player controller reacts to.
use bevy_ecs::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Boolean action state with its edges for this frame.
pub struct BoolState {
    /// Whether the action is currently held.
    pub active: bool,
    /// Whether the action was just pressed this frame.
    pub just_pressed: bool,
    /// Whether the action was just released this frame.
    pub just_released: bool,
}

impl BoolState {
    /// Feed the held state for a new frame and recompute the edges.
    pub fn set(&mut self, held: bool) {
        self.just_pressed = held && !self.active;
        self.just_released = !held && self.active;
        self.active = held;
    }

    /// A single-frame press, as produced by a key-down event.
    pub fn pressed() -> Self {
        Self {
            active: true,
            just_pressed: true,
            just_released: false,
        }
    }
}

/// Actions held during one frame, as reported by the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldActions {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub dash: bool,
    pub pause: bool,
}

/// Resource capturing the per-frame gameplay input.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    pub move_left: BoolState,
    pub move_right: BoolState,
    pub jump: BoolState,
    pub dash: BoolState,
    pub pause: BoolState,
}

impl InputState {
    /// Advance one frame from the held actions.
    pub fn advance(&mut self, held: HeldActions) {
        self.move_left.set(held.left);
        self.move_right.set(held.right);
        self.jump.set(held.jump);
        self.dash.set(held.dash);
        self.pause.set(held.pause);
    }

    /// Horizontal intent: -1, 0 or 1. Opposite keys cancel.
    pub fn horizontal(&self) -> f32 {
        (self.move_right.active as i32 - self.move_left.active as i32) as f32
    }
}
