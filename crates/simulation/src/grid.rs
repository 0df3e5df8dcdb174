//! Sparse two-layer occupancy grid — the single source of truth for spatial
//! occupancy.
//!
//! [`WorldGrid`] is pure mechanism: it expands footprints, writes and clears
//! slots, and answers occupancy queries. Whether a placement is *allowed* is
//! the rule evaluator's job (`crate::rules`); the grid only debug-asserts
//! against writes that would clobber an occupied slot, since reaching that
//! point means the session and the grid have desynchronized.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::{DefId, Footprint, ObjectCategory, PlaceableCatalog};
use crate::config::CELL_SIZE;

/// One cell of the infinite square tiling. Derived from a continuous world
/// position by floor division on X and Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The four cardinal neighbors.
    pub fn neighbors4(self) -> [GridCoord; 4] {
        [
            GridCoord::new(self.x, self.y + 1),
            GridCoord::new(self.x, self.y - 1),
            GridCoord::new(self.x - 1, self.y),
            GridCoord::new(self.x + 1, self.y),
        ]
    }
}

/// Opaque handle to a committed placement record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedId(u32);

/// The two independent occupancy slots of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridLayer {
    Ground,
    Upper,
}

/// Occupancy record for one coordinate. A cell with both slots empty is
/// pruned from the sparse index; an absent entry and an all-empty cell are
/// indistinguishable to queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridCell {
    pub ground: Option<PlacedId>,
    pub upper: Option<PlacedId>,
}

impl GridCell {
    pub fn is_empty(self) -> bool {
        self.ground.is_none() && self.upper.is_none()
    }

    pub fn slot(self, layer: GridLayer) -> Option<PlacedId> {
        match layer {
            GridLayer::Ground => self.ground,
            GridLayer::Upper => self.upper,
        }
    }
}

/// Runtime identity of one committed instance. Never exists without a
/// matching occupancy entry in every cell of its footprint.
#[derive(Debug, Clone)]
pub struct PlacedRecord {
    pub def: DefId,
    /// Minimum-corner cell of the footprint.
    pub anchor: GridCoord,
    /// Effective footprint, rotation already applied.
    pub footprint: Footprint,
    /// Resolved layer this record occupies.
    pub layer: GridLayer,
    /// Quarter-turns of facing, for visuals and persistence.
    pub facing: u8,
    /// Scene instance backing this record, used for removal. `None` in
    /// headless contexts.
    pub entity: Option<Entity>,
}

impl PlacedRecord {
    /// Every coordinate this record covers, row-major from the anchor.
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        let anchor = self.anchor;
        let width = self.footprint.width as i32;
        let depth = self.footprint.depth as i32;
        (0..depth).flat_map(move |dy| {
            (0..width).map(move |dx| GridCoord::new(anchor.x + dx, anchor.y + dy))
        })
    }
}

#[derive(Resource, Default)]
pub struct WorldGrid {
    cells: HashMap<GridCoord, GridCell>,
    placed: HashMap<PlacedId, PlacedRecord>,
    next_id: u32,
}

impl WorldGrid {
    // -----------------------------------------------------------------------
    // Coordinate math (pure, total)
    // -----------------------------------------------------------------------

    pub fn world_to_coord(world: Vec3) -> GridCoord {
        GridCoord::new(
            (world.x / CELL_SIZE).floor() as i32,
            (world.z / CELL_SIZE).floor() as i32,
        )
    }

    /// Continuous-space center of the cell at `coord`, on the ground plane.
    pub fn coord_to_world(coord: GridCoord) -> Vec3 {
        Vec3::new(
            coord.x as f32 * CELL_SIZE + CELL_SIZE * 0.5,
            0.0,
            coord.y as f32 * CELL_SIZE + CELL_SIZE * 0.5,
        )
    }

    /// Snap a continuous position to the center of its containing cell.
    pub fn snap_to_cell_center(world: Vec3) -> Vec3 {
        Self::coord_to_world(Self::world_to_coord(world))
    }

    /// Expand a footprint anchored at the cell containing `anchor_world`
    /// into every covered coordinate, row-major. Order is deterministic but
    /// carries no meaning.
    pub fn footprint_coords(anchor_world: Vec3, footprint: Footprint) -> Vec<GridCoord> {
        let anchor = Self::world_to_coord(anchor_world);
        let mut coords = Vec::with_capacity(footprint.cell_count());
        for dy in 0..footprint.depth as i32 {
            for dx in 0..footprint.width as i32 {
                coords.push(GridCoord::new(anchor.x + dx, anchor.y + dy));
            }
        }
        coords
    }

    /// World-space center of a whole footprint whose anchor cell center is
    /// `anchor_world` — where the instance's transform goes.
    pub fn footprint_center(anchor_world: Vec3, footprint: Footprint) -> Vec3 {
        anchor_world
            + Vec3::new(
                (footprint.width as f32 - 1.0) * CELL_SIZE * 0.5,
                0.0,
                (footprint.depth as f32 - 1.0) * CELL_SIZE * 0.5,
            )
    }

    // -----------------------------------------------------------------------
    // Occupancy queries
    // -----------------------------------------------------------------------

    /// Occupancy at `coord`. A missing entry is an all-empty cell, never an
    /// error.
    pub fn cell(&self, coord: GridCoord) -> GridCell {
        self.cells.get(&coord).copied().unwrap_or_default()
    }

    pub fn record(&self, id: PlacedId) -> Option<&PlacedRecord> {
        self.placed.get(&id)
    }

    pub fn records(&self) -> impl Iterator<Item = (PlacedId, &PlacedRecord)> {
        self.placed.iter().map(|(&id, r)| (id, r))
    }

    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    /// Number of live cell entries. Exposed for tests and debug overlays.
    pub fn occupied_cell_count(&self) -> usize {
        self.cells.len()
    }

    /// A tile can be walked on when a walkable Block or Bridge occupies the
    /// ground slot and nothing unwalkable occupies the upper slot.
    pub fn is_walkable(&self, coord: GridCoord, catalog: &PlaceableCatalog) -> bool {
        let cell = self.cell(coord);
        let Some(ground) = cell.ground.and_then(|id| self.record(id)) else {
            return false;
        };
        let ground_def = catalog.get(ground.def);
        if !matches!(
            ground_def.category,
            ObjectCategory::Block | ObjectCategory::Bridge
        ) || !ground_def.walkable
        {
            return false;
        }
        if let Some(upper) = cell.upper.and_then(|id| self.record(id)) {
            if !catalog.get(upper.def).walkable {
                return false;
            }
        }
        true
    }

    /// True when a cardinal neighbor's upper slot holds a Wall or Block —
    /// the support that shelf-style furniture hangs from.
    pub fn has_qualifying_neighbor(&self, coord: GridCoord, catalog: &PlaceableCatalog) -> bool {
        coord.neighbors4().iter().any(|&n| {
            self.cell(n)
                .upper
                .and_then(|id| self.record(id))
                .is_some_and(|r| {
                    matches!(
                        catalog.get(r.def).category,
                        ObjectCategory::Wall | ObjectCategory::Block
                    )
                })
        })
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Write `record` into the requested layer slot of every covered cell.
    /// Callers are responsible for having validated occupancy; writing over
    /// an occupied slot means the session and grid have desynchronized.
    pub fn place(&mut self, record: PlacedRecord) -> PlacedId {
        let id = PlacedId(self.next_id);
        self.next_id += 1;
        for coord in record.coords() {
            let cell = self.cells.entry(coord).or_default();
            let slot = match record.layer {
                GridLayer::Ground => &mut cell.ground,
                GridLayer::Upper => &mut cell.upper,
            };
            debug_assert!(
                slot.is_none(),
                "occupied {:?} slot at {:?} overwritten by unvalidated placement",
                record.layer,
                coord
            );
            *slot = Some(id);
        }
        self.placed.insert(id, record);
        id
    }

    /// Clear whichever slot references `id` in every covered cell, pruning
    /// cells that become empty. Returns the removed record.
    pub fn remove(&mut self, id: PlacedId) -> Option<PlacedRecord> {
        let record = self.placed.remove(&id)?;
        for coord in record.coords() {
            let Some(cell) = self.cells.get_mut(&coord) else {
                debug_assert!(false, "record {id:?} covers unoccupied cell {coord:?}");
                continue;
            };
            if cell.ground == Some(id) {
                cell.ground = None;
            }
            if cell.upper == Some(id) {
                cell.upper = None;
            }
            if cell.is_empty() {
                self.cells.remove(&coord);
            }
        }
        Some(record)
    }

    /// Drop every record and cell (load path).
    pub fn clear_all(&mut self) {
        self.cells.clear();
        self.placed.clear();
    }
}
