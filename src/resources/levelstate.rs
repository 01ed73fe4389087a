//! Level progression and death-sequence bookkeeping.

use bevy_ecs::prelude::Resource;

/// Frames of the iris transition; `transition` runs from -30 (opening) to
/// 30 (closed).
pub const TRANSITION_FRAMES: i32 = 30;
/// Death sequence frame at which the iris starts closing.
pub const DEATH_FADE_START: u32 = 10;
/// Death sequence frame after which the level is reloaded.
pub const DEATH_RELOAD_AFTER: u32 = 40;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct LevelState {
    pub level: u32,
    /// Highest level reached; gates level select.
    pub max_level: u32,
    /// Number of level files available.
    pub level_count: u32,
    /// Frames into the death sequence, 0 while alive.
    pub dead: u32,
    pub transition: i32,
    pub death_counter: u32,
    /// Level to load once the current frame finishes.
    pub pending_load: Option<u32>,
}

impl Default for LevelState {
    fn default() -> Self {
        Self {
            level: 1,
            max_level: 1,
            level_count: 1,
            dead: 0,
            transition: 0,
            death_counter: 0,
            pending_load: None,
        }
    }
}

impl LevelState {
    pub fn is_dead(&self) -> bool {
        self.dead > 0
    }

    /// Start a death sequence. Returns `false` if one is already running.
    pub fn start_death(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.dead = 1;
        self.death_counter += 1;
        true
    }

    /// Ask for `level` to be loaded at the end of the frame.
    pub fn request_load(&mut self, level: u32) {
        self.pending_load = Some(level);
    }

    /// Next level, capped at the last level file.
    pub fn next_level(&self) -> u32 {
        (self.level + 1).min(self.level_count.max(1))
    }

    /// Iris radius in pixels; 0 when fully closed.
    pub fn transition_radius(&self) -> f32 {
        ((TRANSITION_FRAMES - self.transition.abs()) * 8) as f32
    }

    /// Bookkeeping for a freshly loaded level.
    pub fn on_level_loaded(&mut self, level: u32) {
        self.level = level;
        self.max_level = self.max_level.max(level);
        self.dead = 0;
        self.transition = -TRANSITION_FRAMES;
        self.pending_load = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_death_counts_once_per_death() {
        let mut state = LevelState::default();
        assert!(state.start_death());
        assert!(!state.start_death());
        assert_eq!(state.death_counter, 1);
        state.on_level_loaded(1);
        assert!(state.start_death());
        assert_eq!(state.death_counter, 2);
    }

    #[test]
    fn test_next_level_capped() {
        let mut state = LevelState {
            level_count: 3,
            ..Default::default()
        };
        assert_eq!(state.next_level(), 2);
        state.level = 3;
        assert_eq!(state.next_level(), 3);
    }

    #[test]
    fn test_level_loaded_raises_max_and_opens_iris() {
        let mut state = LevelState::default();
        state.on_level_loaded(4);
        assert_eq!(state.max_level, 4);
        state.on_level_loaded(2);
        assert_eq!(state.max_level, 4);
        assert_eq!(state.transition, -30);
        assert_eq!(state.transition_radius(), 0.0);
    }
}
