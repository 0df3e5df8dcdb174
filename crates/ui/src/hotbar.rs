//! Bottom hotbar: one button per placeable definition, the inventory
//! readout, the destroy-mode toggle, and save/load.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use save::{LoadGameEvent, SaveGameEvent};
use simulation::catalog::PlaceableCatalog;
use simulation::inventory::{Inventory, ResourceCost, ResourceKind};
use simulation::session::{PlacementSession, SelectPlaceableEvent, ToggleDestroyModeEvent};

fn cost_label(costs: &[ResourceCost]) -> String {
    costs
        .iter()
        .map(|c| format!("{} {}", c.amount, c.kind.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[allow(clippy::too_many_arguments)]
pub fn hotbar_ui(
    mut contexts: EguiContexts,
    catalog: Res<PlaceableCatalog>,
    inventory: Res<Inventory>,
    session: Res<PlacementSession>,
    mut select: EventWriter<SelectPlaceableEvent>,
    mut toggle_destroy: EventWriter<ToggleDestroyModeEvent>,
    mut save_events: EventWriter<SaveGameEvent>,
    mut load_events: EventWriter<LoadGameEvent>,
) {
    egui::TopBottomPanel::bottom("hotbar").show(contexts.ctx_mut(), |ui| {
        ui.horizontal_wrapped(|ui| {
            for (slot, (id, def)) in catalog.iter().enumerate() {
                let selected =
                    session.previewing().is_some_and(|preview| preview.def == id);
                let affordable = inventory.can_afford(&def.cost);
                let label = format!("[{}] {}", slot + 1, def.name);
                let button = ui
                    .selectable_label(selected, label)
                    .on_hover_text(cost_label(&def.cost));
                if button.clicked() {
                    select.send(SelectPlaceableEvent { def: id });
                }
                if !affordable {
                    ui.label(egui::RichText::new("✗").color(egui::Color32::DARK_RED));
                }
            }

            ui.separator();
            let mut destroy = session.destroy_mode;
            if ui.checkbox(&mut destroy, "Destroy (X)").changed() {
                toggle_destroy.send(ToggleDestroyModeEvent { active: destroy });
            }

            ui.separator();
            if ui.button("Save").clicked() {
                save_events.send(SaveGameEvent);
            }
            if ui.button("Load").clicked() {
                load_events.send(LoadGameEvent);
            }
        });

        ui.horizontal(|ui| {
            for kind in ResourceKind::ALL {
                ui.label(format!("{}: {}", kind.label(), inventory.amount(kind)));
                ui.add_space(8.0);
            }
        });
    });
}
