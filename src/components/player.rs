//! Player controller.
//!
//! The [`Player`] component wraps a [`PhysicsBody`] with jumping, wall
//! sliding and dashing. Every frame [`Player::update`] runs the body, then
//! derives the grounded/airborne bookkeeping, resolves the wall slide, steps
//! the dash timer and finally picks one [`PlayerState`] by priority:
//!
//! 1. dash burst -> [`PlayerState::Dash`]
//! 2. wall slide -> [`PlayerState::WallSlide`]
//! 3. airborne   -> [`PlayerState::Jump`]
//! 4. moving     -> [`PlayerState::Run`]
//! 5. otherwise  -> [`PlayerState::Idle`]
//!
//! # Dash timer
//!
//! `dashing` is a signed frame counter: the sign is the direction and the
//! magnitude counts down from [`DASH_START`] to 0. While the magnitude is
//! above [`DASH_BURST_END`] the player moves at dash speed; at exactly
//! [`DASH_BURST_END`] and above the player is invulnerable and kills enemies
//! on contact; below it the dash is cooling down and cannot be retriggered.
//!
//! Random effects (particles) are not spawned here. [`PlayerOutcome`]
//! tells the calling system what to spawn.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::body::{BodyConfig, PhysicsBody};
use crate::resources::animationstore::AnimationStore;
use crate::resources::gameconfig::GameConfig;
use crate::resources::tilegrid::TileGrid;

pub const PLAYER_SIZE: Vec2 = Vec2::new(8.0, 15.0);
/// Dash timer value right after triggering.
pub const DASH_START: i32 = 60;
/// Dash timer magnitude where the burst ends.
pub const DASH_BURST_END: i32 = 50;
/// Airborne frames after which the player counts as in the air for
/// animation and wall-slide purposes.
pub const COYOTE_FRAMES: u32 = 4;
/// Per-frame horizontal velocity decay toward zero.
const VELOCITY_DECAY: f32 = 0.1;

/// Animation-driving state, recomputed every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Run,
    Jump,
    WallSlide,
    Dash,
}

impl PlayerState {
    /// Action name under the `player/` animation prefix.
    pub fn action(self) -> &'static str {
        match self {
            PlayerState::Idle => "idle",
            PlayerState::Run => "run",
            PlayerState::Jump => "jump",
            PlayerState::WallSlide => "wall_slide",
            PlayerState::Dash => "slide",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerConfig {
    pub run_speed: f32,
    pub jump_impulse: f32,
    pub max_jumps: u32,
    pub jump_cut: f32,
    pub wall_slide_speed: f32,
    pub wall_jump: Vec2,
    pub dash_speed: f32,
    pub death_air_time: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

impl From<&GameConfig> for PlayerConfig {
    fn from(config: &GameConfig) -> Self {
        Self {
            run_speed: config.run_speed,
            jump_impulse: config.jump_impulse,
            max_jumps: config.max_jumps,
            jump_cut: config.jump_cut,
            wall_slide_speed: config.wall_slide_speed,
            wall_jump: Vec2::new(config.wall_jump_x, config.wall_jump_y),
            dash_speed: config.dash_speed,
            death_air_time: config.death_air_time,
        }
    }
}

/// What happened during one [`Player::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerOutcome {
    /// Airborne for longer than `death_air_time`.
    pub fell: bool,
    /// The dash just started or its burst just ended: radial particle burst.
    pub dash_burst: bool,
    /// Direction sign of a trailing particle spawned during the burst.
    pub dash_trail: Option<f32>,
}

#[derive(Component, Debug, Clone)]
pub struct Player {
    pub body: PhysicsBody,
    /// Frames since the player last stood on something.
    pub air_time: u32,
    pub jumps: u32,
    pub wall_slide: Option<WallSide>,
    pub dashing: i32,
    pub state: PlayerState,
    pub config: PlayerConfig,
}

impl Player {
    pub fn new(pos: Vec2, body_config: BodyConfig, config: PlayerConfig) -> Self {
        Self {
            body: PhysicsBody::new(pos, PLAYER_SIZE, body_config),
            air_time: 0,
            jumps: config.max_jumps,
            wall_slide: None,
            dashing: 0,
            state: PlayerState::Idle,
            config,
        }
    }

    /// Put the player on a spawn point with a clean movement state.
    pub fn respawn(&mut self, pos: Vec2) {
        self.body.pos = pos;
        self.body.velocity = Vec2::ZERO;
        self.air_time = 0;
        self.jumps = self.config.max_jumps;
        self.wall_slide = None;
        self.dashing = 0;
    }

    /// Dash burst or its last contact frame: invulnerable and lethal.
    pub fn is_dash_active(&self) -> bool {
        self.dashing.abs() >= DASH_BURST_END
    }

    pub fn is_grounded(&self) -> bool {
        self.body.collisions.down
    }

    /// Try to jump. Returns whether a jump happened.
    pub fn jump(&mut self) -> bool {
        if let Some(side) = self.wall_slide {
            let away = match side {
                WallSide::Left if self.body.last_movement.x < 0.0 => 1.0,
                WallSide::Right if self.body.last_movement.x > 0.0 => -1.0,
                _ => return false,
            };
            self.body.velocity.x = away * self.config.wall_jump.x;
            self.body.velocity.y = -self.config.wall_jump.y;
            self.air_time = COYOTE_FRAMES + 1;
            self.jumps = self.jumps.saturating_sub(1);
            return true;
        }
        if self.jumps > 0 {
            self.body.velocity.y = -self.config.jump_impulse;
            self.jumps -= 1;
            self.air_time = COYOTE_FRAMES + 1;
            return true;
        }
        false
    }

    /// Jump key released: cap the upward speed for a shorter jump.
    pub fn cut_jump(&mut self) {
        if self.body.velocity.y < -self.config.jump_cut {
            self.body.velocity.y = -self.config.jump_cut;
        }
    }

    /// Start a dash in the facing direction. Ignored while a dash is
    /// bursting or cooling down.
    pub fn dash(&mut self) -> bool {
        if self.dashing != 0 {
            return false;
        }
        self.dashing = if self.body.flip { -DASH_START } else { DASH_START };
        true
    }

    /// One frame of movement with horizontal intent `movement`.
    pub fn update(
        &mut self,
        grid: &TileGrid,
        movement: Vec2,
        animations: &AnimationStore,
    ) -> PlayerOutcome {
        let mut outcome = PlayerOutcome::default();
        self.body.update(grid, movement);

        self.air_time += 1;
        if self.air_time > self.config.death_air_time {
            outcome.fell = true;
        }
        if self.body.collisions.down {
            self.air_time = 0;
            self.jumps = self.config.max_jumps;
        }

        self.wall_slide = None;
        if self.air_time > COYOTE_FRAMES && self.body.velocity.y >= 0.0 {
            let collisions = self.body.collisions;
            if collisions.right && movement.x > 0.0 {
                self.wall_slide = Some(WallSide::Right);
            } else if collisions.left && movement.x < 0.0 {
                self.wall_slide = Some(WallSide::Left);
            }
        }
        if let Some(side) = self.wall_slide {
            self.body.velocity.y = self.body.velocity.y.min(self.config.wall_slide_speed);
            // wall-slide frames are drawn hugging the wall
            self.body.flip = side == WallSide::Left;
        }

        if matches!(self.dashing.abs(), DASH_START | DASH_BURST_END) {
            outcome.dash_burst = true;
        }
        self.dashing -= self.dashing.signum();
        if self.dashing.abs() > DASH_BURST_END {
            let direction = self.dashing.signum() as f32;
            self.body.velocity.x = direction * self.config.dash_speed;
            if self.dashing.abs() == DASH_BURST_END + 1 {
                self.body.velocity.x *= 0.1;
            }
            outcome.dash_trail = Some(direction);
        }

        if self.body.velocity.x > 0.0 {
            self.body.velocity.x = (self.body.velocity.x - VELOCITY_DECAY).max(0.0);
        } else {
            self.body.velocity.x = (self.body.velocity.x + VELOCITY_DECAY).min(0.0);
        }

        self.state = if self.dashing.abs() > DASH_BURST_END {
            PlayerState::Dash
        } else if self.wall_slide.is_some() {
            PlayerState::WallSlide
        } else if self.air_time > COYOTE_FRAMES {
            PlayerState::Jump
        } else if movement.x != 0.0 {
            PlayerState::Run
        } else {
            PlayerState::Idle
        };
        self.body.set_action("player", self.state.action(), animations);

        outcome
    }
}
