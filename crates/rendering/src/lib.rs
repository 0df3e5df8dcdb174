use bevy::prelude::*;

pub mod camera;
pub mod egui_input_guard;
pub mod ground;
pub mod instance_render;
pub mod intents;
pub mod pointer;

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<camera::OrbitCamera>()
            .add_systems(
                Startup,
                (camera::setup_camera, ground::setup_ground, ground::setup_lighting),
            )
            .add_systems(
                Update,
                (
                    camera::camera_pan_keyboard,
                    camera::camera_zoom,
                    camera::apply_orbit_camera,
                ),
            )
            // Projection and intents feed the placement chain; keep them
            // strictly before it so the session never reads a stale frame.
            .add_systems(
                Update,
                (
                    pointer::update_cursor_target,
                    intents::emit_pointer_intents,
                    intents::emit_keyboard_intents,
                    intents::keyboard_select_hotbar,
                    intents::toggle_pause,
                )
                    .before(simulation::session::reenable_collision_volumes),
            )
            .add_systems(
                Update,
                (
                    instance_render::attach_instance_meshes,
                    instance_render::tint_preview_ghost,
                    instance_render::restore_committed_opacity,
                )
                    .chain()
                    .after(simulation::session::tick_preview),
            );
    }
}
