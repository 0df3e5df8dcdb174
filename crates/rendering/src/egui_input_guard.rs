//! Egui input guard: prevents click-through from UI elements to the world.
//!
//! When egui (hotbar, pause window) is handling pointer input, world-level
//! intent systems must not fire — otherwise clicking a hotbar button would
//! also place or destroy whatever sits under the cursor.

use bevy_egui::EguiContexts;

/// Returns `true` when egui wants the pointer — i.e. the cursor is over an
/// egui panel or egui is actively handling a drag/click.
#[inline]
pub fn egui_wants_pointer(contexts: &mut EguiContexts) -> bool {
    let ctx = contexts.ctx_mut();
    ctx.wants_pointer_input() || ctx.is_pointer_over_area()
}
