//! Gathering the session into a [`SaveFile`] and replaying one back.
//!
//! The resolved layer of a record is not persisted; load re-resolves it from
//! occupancy, exactly like a live commit. That re-resolution only lands
//! correctly when foundations are restored before the objects resting on
//! them, so `gather` serializes ground-layer records first and `apply`
//! re-sorts defensively in case the file was produced elsewhere.

use bevy::prelude::*;

use simulation::catalog::{PlaceableCatalog, PlacementLayer};
use simulation::grid::{GridLayer, WorldGrid};
use simulation::inventory::{Inventory, ResourceKind};
use simulation::pool::ObjectPool;
use simulation::session::{self, CollisionVolume, Facing, JustPlaced, PlacedObject};

use crate::save_types::{PlacedObjectData, SaveFile, SAVE_VERSION};

pub fn gather(grid: &WorldGrid, catalog: &PlaceableCatalog, inventory: &Inventory) -> SaveFile {
    let mut records: Vec<_> = grid.records().map(|(_, r)| r).collect();
    // ground before upper; anchor order keeps the output deterministic
    records.sort_by_key(|r| (r.layer == GridLayer::Upper, r.anchor.x, r.anchor.y));

    let placed = records
        .iter()
        .map(|r| PlacedObjectData {
            def_name: catalog.get(r.def).name.to_string(),
            position: WorldGrid::coord_to_world(r.anchor).to_array(),
            facing: r.facing,
        })
        .collect();

    SaveFile {
        version: SAVE_VERSION,
        inventory: ResourceKind::ALL
            .iter()
            .map(|&kind| (kind, inventory.amount(kind)))
            .collect(),
        placed,
    }
}

/// Replace the current session with the contents of `file`. Existing
/// instances go back to the pool; restored records replay through the same
/// commit path as a live placement.
pub fn apply(
    commands: &mut Commands,
    grid: &mut WorldGrid,
    pool: &mut ObjectPool,
    inventory: &mut Inventory,
    catalog: &PlaceableCatalog,
    parent: Option<Entity>,
    file: &SaveFile,
) {
    let live: Vec<_> = grid
        .records()
        .filter_map(|(_, r)| r.entity.map(|e| (r.def, e)))
        .collect();
    for (def, entity) in live {
        commands
            .entity(entity)
            .remove::<(PlacedObject, Facing, CollisionVolume, JustPlaced)>();
        pool.release(commands, def, entity);
    }
    grid.clear_all();

    *inventory = Inventory::empty();
    for &(kind, amount) in &file.inventory {
        inventory.add(kind, amount);
    }

    // defensive re-sort: definitions targeting the upper layer restore last
    let mut ordered: Vec<_> = file.placed.iter().collect();
    ordered.sort_by_key(|data| {
        catalog
            .find(&data.def_name)
            .is_some_and(|id| catalog.get(id).rules.layer == PlacementLayer::Upper)
    });

    for data in ordered {
        let Some(def_id) = catalog.find(&data.def_name) else {
            warn!("save references unknown placeable '{}'", data.def_name);
            continue;
        };
        let committed = session::commit_placement(
            commands,
            grid,
            pool,
            catalog,
            parent,
            def_id,
            Vec3::from_array(data.position),
            data.facing,
        );
        if committed.is_none() {
            warn!(
                "dropped unsupported '{}' at {:?} during load",
                data.def_name, data.position
            );
        }
    }
}
