//! Pointer-to-world projection.
//!
//! Each frame, casts the cursor ray against the Y=0 ground plane and writes
//! the result into [`CursorTarget`], the resource the placement session
//! consumes. A missed projection leaves `world` as `None`, which the session
//! treats as "park the preview" — never as a coordinate to validate against.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use simulation::session::CursorTarget;

use crate::egui_input_guard::egui_wants_pointer;

pub fn update_cursor_target(
    windows: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut contexts: EguiContexts,
    mut cursor: ResMut<CursorTarget>,
) {
    cursor.over_ui = egui_wants_pointer(&mut contexts);
    cursor.world = None;

    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, cam_transform)) = camera_q.get_single() else {
        return;
    };
    let Some(screen_pos) = window.cursor_position() else {
        return;
    };

    // Ray-plane intersection against the Y=0 ground plane
    let Ok(ray) = camera.viewport_to_world(cam_transform, screen_pos) else {
        return;
    };
    if ray.direction.y.abs() < 0.001 {
        return;
    }
    let t = -ray.origin.y / ray.direction.y;
    if t <= 0.0 {
        return;
    }
    cursor.world = Some(ray.origin + ray.direction * t);
}
