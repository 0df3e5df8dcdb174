use bevy::prelude::*;

pub mod app_state;
pub mod catalog;
pub mod config;
pub mod grid;
pub mod inventory;
pub mod pool;
pub mod rules;
pub mod session;

use app_state::AppStatePlugin;
use catalog::PlaceableCatalog;
use grid::WorldGrid;
use inventory::Inventory;
use pool::ObjectPool;
use session::PlacementSessionPlugin;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WorldGrid>()
            .init_resource::<PlaceableCatalog>()
            .init_resource::<Inventory>()
            .init_resource::<ObjectPool>()
            .add_plugins((AppStatePlugin, PlacementSessionPlugin));
    }
}
