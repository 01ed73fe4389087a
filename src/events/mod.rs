//! Event types and observers used by the game.
//!
//! Submodules:
//! - [`audio`] – sound requests buffered for the presentation layer
//! - [`death`] – player death and the observer that starts the death sequence
//! - [`kill`] – enemy killed by a dash and its observer
pub mod audio;
pub mod death;
pub mod kill;
