use std::path::PathBuf;

use bevy::prelude::*;

use simulation::catalog::PlaceableCatalog;
use simulation::grid::WorldGrid;
use simulation::inventory::Inventory;
use simulation::pool::ObjectPool;
use simulation::session::PlacedObjectsRoot;

pub mod atomic_write;
pub mod file_header;
pub mod save_codec;
pub mod save_error;
pub mod save_restore;
pub mod save_types;

#[derive(Event)]
pub struct SaveGameEvent;

#[derive(Event)]
pub struct LoadGameEvent;

/// Where the session is saved. Tests point this at a temp directory.
#[derive(Resource, Clone)]
pub struct SaveSlotPath(pub PathBuf);

impl Default for SaveSlotPath {
    fn default() -> Self {
        Self(PathBuf::from("saves/homestead.hstd"))
    }
}

pub fn handle_save_events(
    mut events: EventReader<SaveGameEvent>,
    grid: Res<WorldGrid>,
    catalog: Res<PlaceableCatalog>,
    inventory: Res<Inventory>,
    slot: Res<SaveSlotPath>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    let file = save_restore::gather(&grid, &catalog, &inventory);
    let bytes = save_codec::encode(&file);
    match atomic_write::atomic_write(&slot.0, &bytes) {
        Ok(()) => info!(
            "saved {} objects to {}",
            file.placed.len(),
            slot.0.display()
        ),
        Err(e) => warn!("save failed: {e}"),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_load_events(
    mut events: EventReader<LoadGameEvent>,
    mut commands: Commands,
    mut grid: ResMut<WorldGrid>,
    mut pool: ResMut<ObjectPool>,
    mut inventory: ResMut<Inventory>,
    catalog: Res<PlaceableCatalog>,
    slot: Res<SaveSlotPath>,
    root: Query<Entity, With<PlacedObjectsRoot>>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    let bytes = match std::fs::read(&slot.0) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("no save to load from {}: {e}", slot.0.display());
            return;
        }
    };
    let file = match save_codec::decode(&bytes) {
        Ok(file) => file,
        Err(e) => {
            warn!("load failed: {e}");
            return;
        }
    };

    save_restore::apply(
        &mut commands,
        &mut grid,
        &mut pool,
        &mut inventory,
        &catalog,
        root.get_single().ok(),
        &file,
    );
    info!("loaded {} objects from {}", file.placed.len(), slot.0.display());
}

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SaveGameEvent>()
            .add_event::<LoadGameEvent>()
            .init_resource::<SaveSlotPath>()
            // Load before the placement chain so a freshly restored grid is
            // what the preview tick validates against this frame.
            .add_systems(
                Update,
                (handle_save_events, handle_load_events)
                    .before(simulation::session::reenable_collision_volumes),
            );
    }
}
