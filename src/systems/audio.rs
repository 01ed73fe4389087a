//! Audio message housekeeping.
//!
//! The core only queues [`AudioCmd`] messages. Bevy ECS' [`Messages`] API
//! requires calling `update()` once per frame; run [`update_audio_cmds`] last
//! in the schedule so commands the presentation layer never drained are
//! dropped after two frames instead of piling up.

use bevy_ecs::prelude::*;

use crate::events::audio::AudioCmd;

pub fn update_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}
