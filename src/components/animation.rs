use std::sync::Arc;

use crate::assets::ImageId;
use crate::resources::animationstore::AnimationDefinition;

/// Per-entity playback state over a shared [`AnimationDefinition`].
///
/// `update` advances one simulation frame. Looping clips wrap back to the
/// first frame; one-shot clips hold the last frame and report [`done`].
///
/// [`done`]: AnimationPlayer::done
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    definition: Arc<AnimationDefinition>,
    frame: u32,
    done: bool,
}

impl AnimationPlayer {
    pub fn new(definition: Arc<AnimationDefinition>) -> Self {
        Self {
            definition,
            frame: 0,
            done: false,
        }
    }

    /// Start at an arbitrary counter value, clamped into range.
    pub fn with_frame(mut self, frame: u32) -> Self {
        self.frame = frame.min(self.definition.total_frames() - 1);
        self
    }

    pub fn definition(&self) -> &Arc<AnimationDefinition> {
        &self.definition
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn done(&self) -> bool {
        self.done
    }

    pub fn update(&mut self) {
        let total = self.definition.total_frames();
        if self.definition.looped {
            self.frame = (self.frame + 1) % total;
        } else {
            self.frame = (self.frame + 1).min(total - 1);
            if self.frame >= total - 1 {
                self.done = true;
            }
        }
    }

    /// Image for the current frame.
    pub fn image(&self) -> ImageId {
        let index = (self.frame / self.definition.frame_duration) as usize;
        self.definition.frames[index]
    }

    /// True when both players run the same shared definition.
    pub fn same_clip(&self, other: &Arc<AnimationDefinition>) -> bool {
        Arc::ptr_eq(&self.definition, other)
    }
}
