//! Pure placement-rule evaluation. No mutation, no side effects — the grid
//! is mechanism, this module is policy.

use crate::catalog::{PlaceableCatalog, PlaceableDef, PlacementLayer, PlacementRules};
use crate::config::GROUND_SURFACE_Y;
use crate::grid::{GridCell, GridCoord, GridLayer, PlacedId, WorldGrid};

/// Resolve which slot a definition will occupy at a candidate anchor cell.
/// Explicit layers pass through; `Any` resolves to Upper exactly when the
/// cell already holds a ground occupant. Re-derived per query every frame —
/// the underlying occupancy can change between frames.
pub fn resolve_layer(rules: PlacementRules, anchor_cell: GridCell) -> GridLayer {
    match rules.layer {
        PlacementLayer::Ground => GridLayer::Ground,
        PlacementLayer::Upper => GridLayer::Upper,
        PlacementLayer::Any => {
            if anchor_cell.ground.is_some() {
                GridLayer::Upper
            } else {
                GridLayer::Ground
            }
        }
    }
}

/// Whether `def` may be placed over `coords`. All covered cells must pass;
/// a single blocked cell fails the whole placement — partial placement is
/// never permitted. `affordable` is the inventory collaborator's answer and
/// short-circuits everything else.
pub fn validate(
    def: &PlaceableDef,
    coords: &[GridCoord],
    grid: &WorldGrid,
    catalog: &PlaceableCatalog,
    affordable: bool,
) -> bool {
    if !affordable {
        return false;
    }

    for &coord in coords {
        let cell = grid.cell(coord);
        match def.rules.layer {
            PlacementLayer::Ground => {
                if cell.ground.is_some() {
                    return false;
                }
            }
            PlacementLayer::Upper => {
                // An upper object needs a floor to rest on.
                if cell.ground.is_none() {
                    return false;
                }
                if let Some(upper) = cell.upper {
                    if !allows_stacking(grid, catalog, upper) {
                        return false;
                    }
                }
            }
            PlacementLayer::Any => {
                let ground_occupied = cell.ground.is_some();
                let upper_blocked = cell
                    .upper
                    .is_some_and(|id| !allows_stacking(grid, catalog, id));
                if ground_occupied && upper_blocked {
                    return false;
                }
            }
        }
    }

    if def.rules.requires_wall_support
        && !coords
            .iter()
            .any(|&c| grid.has_qualifying_neighbor(c, catalog))
    {
        return false;
    }

    true
}

/// World-space Y of the surface the object's base rests on, given the layer
/// resolved at the anchor cell. `None` means the placement has no support
/// (upper layer with nothing beneath) and the preview must park off-world.
pub fn support_height(
    resolved: GridLayer,
    anchor_cell: GridCell,
    grid: &WorldGrid,
    catalog: &PlaceableCatalog,
) -> Option<f32> {
    match resolved {
        GridLayer::Ground => Some(GROUND_SURFACE_Y),
        GridLayer::Upper => {
            let ground = grid.record(anchor_cell.ground?)?;
            Some(GROUND_SURFACE_Y + catalog.get(ground.def).height)
        }
    }
}

fn allows_stacking(grid: &WorldGrid, catalog: &PlaceableCatalog, id: PlacedId) -> bool {
    grid.record(id)
        .is_some_and(|r| catalog.get(r.def).rules.allows_stacking)
}
