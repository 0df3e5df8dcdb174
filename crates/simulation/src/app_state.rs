//! Top-level application state machine.
//!
//! Defines [`AppState`], a Bevy [`States`] enum that governs top-level game
//! flow. The placement session only advances while the state is
//! [`AppState::Playing`]; leaving it releases any live preview (see
//! `session::release_preview_on_freeze`), so placement never persists across
//! a paused or menu context.
//!
//! The state lives in the `simulation` crate so that `rendering`, `ui`, and
//! `save` can all gate systems on it without circular dependencies.

use bevy::prelude::*;

/// Top-level game state governing application flow.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    /// Active gameplay — the placement session is live.
    #[default]
    Playing,
    /// Gameplay is frozen — the world is visible but nothing advances.
    Paused,
}

pub struct AppStatePlugin;

impl Plugin for AppStatePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>();
    }
}
