//! Sound effect requests.
//!
//! Gameplay writes [`AudioCmd`] messages into the world's
//! `Messages<AudioCmd>` buffer; the presentation layer drains them each frame
//! (see [`Game::drain_audio`](crate::game::Game::drain_audio)) and plays the
//! matching sample. Nothing in the core holds audio state.

use bevy_ecs::message::Message;

/// A one-shot sound effect to play.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCmd {
    Jump,
    Dash,
    Hit,
    Shoot,
    /// Menu navigation feedback.
    Click,
}

impl AudioCmd {
    /// Sample name, matching `data/sfx/<id>.wav`.
    pub fn id(self) -> &'static str {
        match self {
            AudioCmd::Jump => "jump",
            AudioCmd::Dash => "dash",
            AudioCmd::Hit => "hit",
            AudioCmd::Shoot => "shoot",
            AudioCmd::Click => "click",
        }
    }
}
