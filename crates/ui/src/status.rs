use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use simulation::session::PlacementRefusedEvent;

/// Transient status line shown briefly after a refused click.
#[derive(Resource, Default)]
pub struct StatusMessage {
    pub text: String,
    pub timer: f32,
}

impl StatusMessage {
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.timer = 3.0;
    }

    pub fn active(&self) -> bool {
        self.timer > 0.0
    }
}

pub fn collect_refusals(
    mut refusals: EventReader<PlacementRefusedEvent>,
    mut status: ResMut<StatusMessage>,
) {
    for refusal in refusals.read() {
        status.set(refusal.reason);
    }
}

pub fn tick_status_message(time: Res<Time>, mut status: ResMut<StatusMessage>) {
    if status.timer > 0.0 {
        status.timer -= time.delta_secs();
    }
}

pub fn status_ui(mut contexts: EguiContexts, status: Res<StatusMessage>) {
    if !status.active() {
        return;
    }
    egui::Area::new(egui::Id::new("status_line"))
        .anchor(egui::Align2::CENTER_TOP, [0.0, 24.0])
        .show(contexts.ctx_mut(), |ui| {
            ui.label(
                egui::RichText::new(&status.text)
                    .color(egui::Color32::from_rgb(230, 120, 90))
                    .strong(),
            );
        });
}
