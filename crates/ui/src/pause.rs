use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use simulation::app_state::AppState;

pub fn pause_menu_ui(mut contexts: EguiContexts, mut next_state: ResMut<NextState<AppState>>) {
    egui::Window::new("Paused")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut(), |ui| {
            ui.label("The homestead waits.");
            if ui.button("Resume (Space)").clicked() {
                next_state.set(AppState::Playing);
            }
        });
}
