//! Animation resource registry.
//!
//! Holds the immutable [`AnimationDefinition`]s every entity plays from. A
//! definition is shared through an [`Arc`]; each entity owns only its own
//! [`AnimationPlayer`](crate::components::animation::AnimationPlayer) frame
//! counter, so two enemies running the same clip never step each other.

use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use log::debug;
use rustc_hash::FxHashMap;

use crate::assets::{AssetError, AssetProvider, ImageId};
use crate::components::animation::AnimationPlayer;

/// Immutable frame sequence with its timing.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDefinition {
    pub frames: Vec<ImageId>,
    /// Simulation frames each image stays on screen.
    pub frame_duration: u32,
    /// Whether the animation restarts after the last frame.
    pub looped: bool,
}

impl AnimationDefinition {
    /// Fails on an empty frame list or zero duration; both are content bugs.
    pub fn new(
        key: &str,
        frames: Vec<ImageId>,
        frame_duration: u32,
        looped: bool,
    ) -> Result<Self, AssetError> {
        if frames.is_empty() || frame_duration == 0 {
            return Err(AssetError::EmptyAnimation(key.to_string()));
        }
        Ok(Self {
            frames,
            frame_duration,
            looped,
        })
    }

    /// Counter value range is `0..total_frames()`.
    pub fn total_frames(&self) -> u32 {
        self.frames.len() as u32 * self.frame_duration
    }
}

/// Built-in clip table: key, frame duration, looped.
pub const CLIPS: [(&str, u32, bool); 9] = [
    ("enemy/idle", 6, true),
    ("enemy/run", 4, true),
    ("player/idle", 6, true),
    ("player/run", 4, true),
    ("player/jump", 5, true),
    ("player/slide", 5, true),
    ("player/wall_slide", 5, true),
    ("particle/leaf", 20, false),
    ("particle/particle", 6, false),
];

/// Central registry of reusable animation definitions keyed by clip name.
#[derive(Resource, Debug, Clone, Default)]
pub struct AnimationStore {
    pub animations: FxHashMap<String, Arc<AnimationDefinition>>,
}

impl AnimationStore {
    /// Resolve every clip of [`CLIPS`] against the asset provider.
    pub fn from_assets(assets: &dyn AssetProvider) -> Result<Self, AssetError> {
        let mut store = AnimationStore::default();
        for (key, frame_duration, looped) in CLIPS {
            let frames = assets
                .animation_frames(key)
                .ok_or_else(|| AssetError::MissingAnimation(key.to_string()))?;
            let definition = AnimationDefinition::new(key, frames, frame_duration, looped)?;
            debug!(
                "animation {key}: {} frames x {frame_duration}",
                definition.frames.len()
            );
            store.insert(key, definition);
        }
        Ok(store)
    }

    pub fn insert(&mut self, key: &str, definition: AnimationDefinition) {
        self.animations.insert(key.to_string(), Arc::new(definition));
    }

    pub fn get(&self, key: &str) -> Option<&Arc<AnimationDefinition>> {
        self.animations.get(key)
    }

    /// A fresh player for `key`, starting at frame 0.
    pub fn player(&self, key: &str) -> Option<AnimationPlayer> {
        self.get(key).map(|def| AnimationPlayer::new(Arc::clone(def)))
    }
}
