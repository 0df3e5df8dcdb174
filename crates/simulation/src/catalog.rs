//! The placeable-object catalog: per-type footprint, placement rules, and
//! cost. Authored here as a built-in table, loaded once at startup, and
//! immutable afterwards.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::inventory::{ResourceCost, ResourceKind};

/// Which occupancy slot a definition targets. `Any` resolves dynamically per
/// candidate cell — upper when a ground occupant already exists, ground
/// otherwise — and is never cached on the definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementLayer {
    Ground,
    Upper,
    Any,
}

/// Coarse object class. Drives walkability and which occupants count as
/// qualifying wall-adjacency neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectCategory {
    Block,
    Wall,
    Bridge,
    Furniture,
}

/// The rule triple governing where a definition may be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRules {
    pub layer: PlacementLayer,
    /// Floors and tables set this: another upper-layer object may share the
    /// cell by resting on top.
    pub allows_stacking: bool,
    /// Shelf-style furniture sets this: a Wall or Block must occupy the
    /// upper slot of a directly adjacent cell.
    pub requires_wall_support: bool,
}

impl PlacementRules {
    pub const fn new(layer: PlacementLayer) -> Self {
        Self {
            layer,
            allows_stacking: false,
            requires_wall_support: false,
        }
    }

    pub const fn stacking(mut self) -> Self {
        self.allows_stacking = true;
        self
    }

    pub const fn wall_supported(mut self) -> Self {
        self.requires_wall_support = true;
        self
    }
}

/// Footprint size in cells. Depth is reinterpreted under rotation: a
/// quarter-turn exchanges which axis is "width".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub width: u8,
    pub depth: u8,
}

impl Footprint {
    pub const ONE: Footprint = Footprint { width: 1, depth: 1 };

    pub const fn new(width: u8, depth: u8) -> Self {
        Self { width, depth }
    }

    /// The footprint after a quarter-turn. Rotating twice is the identity.
    pub fn rotated(self) -> Self {
        Self {
            width: self.depth,
            depth: self.width,
        }
    }

    pub fn cell_count(self) -> usize {
        self.width as usize * self.depth as usize
    }
}

/// Index into the catalog. Stable for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefId(pub u16);

/// One placeable type. `name` doubles as the persistence identifier.
#[derive(Debug, Clone)]
pub struct PlaceableDef {
    pub name: &'static str,
    pub footprint: Footprint,
    pub rules: PlacementRules,
    pub category: ObjectCategory,
    /// Characters may stand on this object's tile.
    pub walkable: bool,
    /// Visual height in world units; upper occupants rest on top of it.
    pub height: f32,
    pub cost: Vec<ResourceCost>,
}

#[derive(Resource)]
pub struct PlaceableCatalog {
    defs: Vec<PlaceableDef>,
}

impl PlaceableCatalog {
    pub fn get(&self, id: DefId) -> &PlaceableDef {
        &self.defs[id.0 as usize]
    }

    /// Look up a definition by its persistence name.
    pub fn find(&self, name: &str) -> Option<DefId> {
        self.defs
            .iter()
            .position(|d| d.name == name)
            .map(|i| DefId(i as u16))
    }

    pub fn iter(&self) -> impl Iterator<Item = (DefId, &PlaceableDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, d)| (DefId(i as u16), d))
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl Default for PlaceableCatalog {
    fn default() -> Self {
        use ObjectCategory::*;
        use PlacementLayer::*;
        use ResourceKind::*;

        let def = |name,
                   footprint,
                   rules,
                   category,
                   walkable,
                   height,
                   cost: &[ResourceCost]| PlaceableDef {
            name,
            footprint,
            rules,
            category,
            walkable,
            height,
            cost: cost.to_vec(),
        };

        Self {
            defs: vec![
                def(
                    "Timber Block",
                    Footprint::ONE,
                    PlacementRules::new(Any).stacking(),
                    Block,
                    true,
                    0.5,
                    &[ResourceCost::new(Wood, 2)],
                ),
                def(
                    "Stone Block",
                    Footprint::ONE,
                    PlacementRules::new(Any).stacking(),
                    Block,
                    true,
                    0.5,
                    &[ResourceCost::new(Stone, 2)],
                ),
                def(
                    "Plank Bridge",
                    Footprint::ONE,
                    PlacementRules::new(Ground).stacking(),
                    Bridge,
                    true,
                    0.1,
                    &[
                        ResourceCost::new(Plank, 1),
                        ResourceCost::new(Fiber, 1),
                    ],
                ),
                def(
                    "Timber Deck",
                    Footprint::new(2, 1),
                    PlacementRules::new(Ground).stacking(),
                    Bridge,
                    true,
                    0.1,
                    &[ResourceCost::new(Plank, 2)],
                ),
                def(
                    "Timber Wall",
                    Footprint::ONE,
                    PlacementRules::new(Upper),
                    Wall,
                    false,
                    2.0,
                    &[ResourceCost::new(Wood, 3)],
                ),
                def(
                    "Oak Table",
                    Footprint::new(2, 1),
                    PlacementRules::new(Upper).stacking(),
                    Furniture,
                    false,
                    0.9,
                    &[ResourceCost::new(Plank, 4)],
                ),
                def(
                    "Oak Stool",
                    Footprint::ONE,
                    PlacementRules::new(Upper),
                    Furniture,
                    false,
                    0.5,
                    &[ResourceCost::new(Plank, 2)],
                ),
                def(
                    "Wall Shelf",
                    Footprint::ONE,
                    PlacementRules::new(Upper).wall_supported(),
                    Furniture,
                    false,
                    0.4,
                    &[ResourceCost::new(Plank, 2)],
                ),
                def(
                    "Cauldron",
                    Footprint::ONE,
                    PlacementRules::new(Upper),
                    Furniture,
                    false,
                    1.1,
                    &[
                        ResourceCost::new(Stone, 2),
                        ResourceCost::new(Crystal, 1),
                    ],
                ),
            ],
        }
    }
}
