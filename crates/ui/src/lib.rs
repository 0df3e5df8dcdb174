use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use simulation::app_state::AppState;

pub mod hotbar;
pub mod pause;
pub mod status;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .init_resource::<status::StatusMessage>()
            .add_systems(
                Update,
                (
                    hotbar::hotbar_ui,
                    status::collect_refusals,
                    status::tick_status_message,
                    status::status_ui,
                ),
            )
            .add_systems(Update, pause::pause_menu_ui.run_if(in_state(AppState::Paused)));
    }
}
