//! Translates raw button/key input into the discrete session intents. The
//! session never polls input devices; everything it hears has already been
//! debounced here via `just_pressed`.

use bevy::prelude::*;

use simulation::app_state::AppState;
use simulation::catalog::{DefId, PlaceableCatalog};
use simulation::session::{
    CancelActionEvent, CursorTarget, DestroyActionEvent, PlaceActionEvent, PlacementSession,
    RotateActionEvent, SelectPlaceableEvent, ToggleDestroyModeEvent,
};

/// Left click places, right click destroys. Both are suppressed while the
/// pointer is over egui so hotbar clicks don't fall through into the world.
pub fn emit_pointer_intents(
    buttons: Res<ButtonInput<MouseButton>>,
    cursor: Res<CursorTarget>,
    mut place: EventWriter<PlaceActionEvent>,
    mut destroy: EventWriter<DestroyActionEvent>,
) {
    if cursor.over_ui {
        return;
    }
    if buttons.just_pressed(MouseButton::Left) {
        place.send(PlaceActionEvent);
    }
    if buttons.just_pressed(MouseButton::Right) {
        destroy.send(DestroyActionEvent);
    }
}

/// R rotates the preview, Escape cancels it, X toggles destroy mode.
pub fn emit_keyboard_intents(
    keys: Res<ButtonInput<KeyCode>>,
    session: Res<PlacementSession>,
    mut rotate: EventWriter<RotateActionEvent>,
    mut cancel: EventWriter<CancelActionEvent>,
    mut toggle_destroy: EventWriter<ToggleDestroyModeEvent>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        rotate.send(RotateActionEvent);
    }
    if keys.just_pressed(KeyCode::Escape) {
        cancel.send(CancelActionEvent);
    }
    if keys.just_pressed(KeyCode::KeyX) {
        toggle_destroy.send(ToggleDestroyModeEvent {
            active: !session.destroy_mode,
        });
    }
}

const HOTBAR_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// Digit keys mirror the hotbar buttons.
pub fn keyboard_select_hotbar(
    keys: Res<ButtonInput<KeyCode>>,
    catalog: Res<PlaceableCatalog>,
    mut select: EventWriter<SelectPlaceableEvent>,
) {
    for (slot, key) in HOTBAR_KEYS.iter().enumerate() {
        if keys.just_pressed(*key) && slot < catalog.len() {
            select.send(SelectPlaceableEvent {
                def: DefId(slot as u16),
            });
        }
    }
}

/// Space freezes and unfreezes the session.
pub fn toggle_pause(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if keys.just_pressed(KeyCode::Space) {
        next_state.set(match state.get() {
            AppState::Playing => AppState::Paused,
            AppState::Paused => AppState::Playing,
        });
    }
}
