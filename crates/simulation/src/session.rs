//! The interactive placement session: a two-state machine (Idle /
//! Previewing) advanced once per frame and driven by discrete intents.
//!
//! Intents arrive as Bevy events from the input layer, already debounced.
//! The session owns the preview ghost exclusively; the ghost is never a
//! committed record and never appears in [`WorldGrid`] occupancy. Commits
//! and removals are the only grid writes in the whole workspace, and they
//! run to completion inside their handlers, so every occupancy read
//! observes either the previous frame's state or a finished write.

use bevy::prelude::*;

use crate::app_state::AppState;
use crate::catalog::{DefId, Footprint, PlaceableCatalog};
use crate::config::PARKED_POSITION;
use crate::grid::{GridLayer, PlacedId, PlacedRecord, WorldGrid};
use crate::inventory::Inventory;
use crate::pool::ObjectPool;
use crate::rules;

// ---------------------------------------------------------------------------
// Intents
// ---------------------------------------------------------------------------

/// Player picked a definition from the hotbar. Re-selecting the definition
/// already being previewed toggles the session off.
#[derive(Event)]
pub struct SelectPlaceableEvent {
    pub def: DefId,
}

#[derive(Event)]
pub struct PlaceActionEvent;

#[derive(Event)]
pub struct RotateActionEvent;

#[derive(Event)]
pub struct CancelActionEvent;

#[derive(Event)]
pub struct DestroyActionEvent;

#[derive(Event)]
pub struct ToggleDestroyModeEvent {
    pub active: bool,
}

/// Feedback for the status line when an explicit click is refused.
/// Invalid *hover* is signalled through ghost transparency only.
#[derive(Event)]
pub struct PlacementRefusedEvent {
    pub reason: &'static str,
}

// ---------------------------------------------------------------------------
// Resources and components
// ---------------------------------------------------------------------------

/// Where the pointer projects onto the world this frame. Written by the
/// rendering crate's pointer system; `world` is `None` while the projection
/// misses the ground plane.
#[derive(Resource, Default)]
pub struct CursorTarget {
    pub world: Option<Vec3>,
    pub over_ui: bool,
}

/// Marker for the live preview ghost. Rendered translucent and never
/// counted in grid occupancy.
#[derive(Component)]
pub struct PreviewGhost;

/// A committed instance, back-referencing its grid record.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlacedObject {
    pub id: PlacedId,
}

/// Facing in quarter-turns, applied to the transform and persisted.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Facing(pub u8);

/// Collision geometry flag read by the movement collaborator. Disabled for
/// exactly one frame after a commit so the placing character is not shoved
/// by its own new object.
#[derive(Component, Debug, Clone, Copy)]
pub struct CollisionVolume {
    pub enabled: bool,
}

/// One-frame marker consumed by [`reenable_collision_volumes`].
#[derive(Component)]
pub struct JustPlaced;

/// Container entity all committed instances are parented under.
#[derive(Component)]
pub struct PlacedObjectsRoot;

pub struct Preview {
    pub def: DefId,
    pub entity: Entity,
    pub facing: u8,
    /// Effective footprint, swapped on every quarter-turn.
    pub footprint: Footprint,
    /// Last computed validity, shown through the ghost tint.
    pub valid: bool,
    /// True while the ghost sits at the off-world sentinel.
    pub parked: bool,
    /// Snapped anchor cell center from the last tick.
    pub anchor_world: Vec3,
    /// Layer resolved at the last tick.
    pub layer: GridLayer,
}

#[derive(Default)]
pub enum SessionState {
    #[default]
    Idle,
    Previewing(Preview),
}

#[derive(Resource)]
pub struct PlacementSession {
    pub state: SessionState,
    pub destroy_mode: bool,
}

impl Default for PlacementSession {
    fn default() -> Self {
        Self {
            state: SessionState::Idle,
            destroy_mode: true,
        }
    }
}

impl PlacementSession {
    pub fn previewing(&self) -> Option<&Preview> {
        match &self.state {
            SessionState::Previewing(p) => Some(p),
            SessionState::Idle => None,
        }
    }
}

pub fn facing_rotation(facing: u8) -> Quat {
    Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2 * facing as f32)
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

pub fn setup_placed_root(mut commands: Commands) {
    commands.spawn((
        Name::new("PlacedObjects"),
        PlacedObjectsRoot,
        Transform::default(),
        Visibility::default(),
    ));
}

/// Re-enable collision one frame after commit. Runs at the head of the
/// placement chain so an instance committed this frame keeps its volume off
/// until the next.
pub fn reenable_collision_volumes(
    mut commands: Commands,
    mut query: Query<(Entity, &mut CollisionVolume), With<JustPlaced>>,
) {
    for (entity, mut volume) in &mut query {
        volume.enabled = true;
        commands.entity(entity).remove::<JustPlaced>();
    }
}

pub fn handle_select(
    mut events: EventReader<SelectPlaceableEvent>,
    mut session: ResMut<PlacementSession>,
    mut pool: ResMut<ObjectPool>,
    mut commands: Commands,
    catalog: Res<PlaceableCatalog>,
) {
    for ev in events.read() {
        let previous = std::mem::take(&mut session.state);
        let toggled_off =
            matches!(&previous, SessionState::Previewing(p) if p.def == ev.def);
        if let SessionState::Previewing(preview) = previous {
            release_preview_instance(&mut commands, &mut pool, &preview);
        }
        if toggled_off {
            continue;
        }

        let entity = pool.acquire(
            &mut commands,
            ev.def,
            Transform::from_translation(PARKED_POSITION),
        );
        commands.entity(entity).insert((PreviewGhost, Facing(0)));
        session.state = SessionState::Previewing(Preview {
            def: ev.def,
            entity,
            facing: 0,
            footprint: catalog.get(ev.def).footprint,
            valid: false,
            parked: true,
            anchor_world: PARKED_POSITION,
            layer: GridLayer::Ground,
        });
    }
}

pub fn handle_rotate(
    mut events: EventReader<RotateActionEvent>,
    mut session: ResMut<PlacementSession>,
) {
    for _ in events.read() {
        // rotating while idle is silently ignored
        let SessionState::Previewing(preview) = &mut session.state else {
            continue;
        };
        preview.facing = (preview.facing + 1) % 4;
        preview.footprint = preview.footprint.rotated();
    }
}

pub fn handle_cancel(
    mut events: EventReader<CancelActionEvent>,
    mut session: ResMut<PlacementSession>,
    mut pool: ResMut<ObjectPool>,
    mut commands: Commands,
) {
    if events.is_empty() {
        return;
    }
    events.clear();
    if let SessionState::Previewing(preview) = std::mem::take(&mut session.state) {
        release_preview_instance(&mut commands, &mut pool, &preview);
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_place(
    mut events: EventReader<PlaceActionEvent>,
    cursor: Res<CursorTarget>,
    catalog: Res<PlaceableCatalog>,
    session: Res<PlacementSession>,
    mut grid: ResMut<WorldGrid>,
    mut inventory: ResMut<Inventory>,
    mut pool: ResMut<ObjectPool>,
    mut commands: Commands,
    root: Query<Entity, With<PlacedObjectsRoot>>,
    mut refusals: EventWriter<PlacementRefusedEvent>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();
    if cursor.over_ui {
        return;
    }
    // placing with nothing selected is silently ignored
    let SessionState::Previewing(preview) = &session.state else {
        return;
    };
    if preview.parked {
        return;
    }

    let def = catalog.get(preview.def);
    // Re-validate against the current grid: a rotate earlier this frame may
    // have changed the footprint since the last preview tick.
    let coords = WorldGrid::footprint_coords(preview.anchor_world, preview.footprint);
    let affordable = inventory.can_afford(&def.cost);
    if !rules::validate(def, &coords, &grid, &catalog, affordable) {
        refusals.send(PlacementRefusedEvent {
            reason: if affordable {
                "Cannot place here"
            } else {
                "Not enough resources"
            },
        });
        return;
    }

    inventory.consume(&def.cost);
    let committed = commit_placement(
        &mut commands,
        &mut grid,
        &mut pool,
        &catalog,
        root.get_single().ok(),
        preview.def,
        preview.anchor_world,
        preview.facing,
    );
    debug_assert!(committed.is_some(), "validated placement failed to commit");
    debug!("placed {}", def.name);
    // The session stays in Previewing: the same definition remains selected
    // for rapid successive placement.
}

pub fn handle_destroy(
    mut events: EventReader<DestroyActionEvent>,
    cursor: Res<CursorTarget>,
    session: Res<PlacementSession>,
    mut grid: ResMut<WorldGrid>,
    mut pool: ResMut<ObjectPool>,
    mut commands: Commands,
    mut refusals: EventWriter<PlacementRefusedEvent>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();
    if !session.destroy_mode || cursor.over_ui {
        return;
    }
    let Some(pointer) = cursor.world else {
        return;
    };

    let cell = grid.cell(WorldGrid::world_to_coord(pointer));
    // the upper occupant shadows the ground occupant for picking
    let Some(target) = cell.upper.or(cell.ground) else {
        return;
    };
    let Some(record) = grid.record(target).cloned() else {
        return;
    };
    if record.layer == GridLayer::Ground {
        // never orphan an upper object anywhere over this footprint
        let occupied_above = record.coords().any(|c| grid.cell(c).upper.is_some());
        if occupied_above {
            refusals.send(PlacementRefusedEvent {
                reason: "Something rests on top",
            });
            return;
        }
    }

    let Some(removed) = grid.remove(target) else {
        return;
    };
    if let Some(entity) = removed.entity {
        commands
            .entity(entity)
            .remove::<(PlacedObject, Facing, CollisionVolume, JustPlaced)>();
        pool.release(&mut commands, removed.def, entity);
    }
}

pub fn handle_toggle_destroy_mode(
    mut events: EventReader<ToggleDestroyModeEvent>,
    mut session: ResMut<PlacementSession>,
) {
    for ev in events.read() {
        session.destroy_mode = ev.active;
    }
}

/// Per-frame preview update: project, snap, resolve, validate.
pub fn tick_preview(
    cursor: Res<CursorTarget>,
    grid: Res<WorldGrid>,
    catalog: Res<PlaceableCatalog>,
    inventory: Res<Inventory>,
    mut session: ResMut<PlacementSession>,
    mut ghosts: Query<&mut Transform, With<PreviewGhost>>,
) {
    let SessionState::Previewing(preview) = &mut session.state else {
        return;
    };
    let Ok(mut transform) = ghosts.get_mut(preview.entity) else {
        return;
    };

    // Pointer off the ground plane: park rather than validate against stale
    // coordinates.
    let Some(pointer) = cursor.world else {
        park(preview, &mut transform);
        return;
    };

    let anchor_world = WorldGrid::snap_to_cell_center(pointer);
    let anchor_cell = grid.cell(WorldGrid::world_to_coord(anchor_world));
    let def = catalog.get(preview.def);
    let layer = rules::resolve_layer(def.rules, anchor_cell);

    let Some(surface) = rules::support_height(layer, anchor_cell, &grid, &catalog) else {
        // upper placement with nothing beneath: no surface to rest on
        park(preview, &mut transform);
        return;
    };

    preview.parked = false;
    preview.anchor_world = anchor_world;
    preview.layer = layer;

    let center = WorldGrid::footprint_center(anchor_world, preview.footprint);
    transform.translation = Vec3::new(center.x, surface + def.height * 0.5, center.z);
    transform.rotation = facing_rotation(preview.facing);

    let coords = WorldGrid::footprint_coords(anchor_world, preview.footprint);
    preview.valid = rules::validate(
        def,
        &coords,
        &grid,
        &catalog,
        inventory.can_afford(&def.cost),
    );
}

/// Force-idle on freeze: placement never persists across a paused or menu
/// context.
pub fn release_preview_on_freeze(
    mut session: ResMut<PlacementSession>,
    mut pool: ResMut<ObjectPool>,
    mut commands: Commands,
) {
    if let SessionState::Previewing(preview) = std::mem::take(&mut session.state) {
        release_preview_instance(&mut commands, &mut pool, &preview);
    }
}

fn park(preview: &mut Preview, transform: &mut Transform) {
    preview.parked = true;
    preview.valid = false;
    transform.translation = PARKED_POSITION;
}

fn release_preview_instance(commands: &mut Commands, pool: &mut ObjectPool, preview: &Preview) {
    commands
        .entity(preview.entity)
        .remove::<(PreviewGhost, Facing)>();
    pool.release(commands, preview.def, preview.entity);
}

/// Acquire an instance and write its record into the grid, resolving layer
/// and rest height from current occupancy. Shared by the live commit path
/// and save restoration; validation is the caller's responsibility. Returns
/// `None` when an upper-resolved placement has no support beneath it.
#[allow(clippy::too_many_arguments)]
pub fn commit_placement(
    commands: &mut Commands,
    grid: &mut WorldGrid,
    pool: &mut ObjectPool,
    catalog: &PlaceableCatalog,
    parent: Option<Entity>,
    def_id: DefId,
    anchor_world: Vec3,
    facing: u8,
) -> Option<(PlacedId, Entity)> {
    let def = catalog.get(def_id);
    let mut footprint = def.footprint;
    if facing % 2 == 1 {
        footprint = footprint.rotated();
    }

    let anchor_world = WorldGrid::snap_to_cell_center(anchor_world);
    let anchor = WorldGrid::world_to_coord(anchor_world);
    let anchor_cell = grid.cell(anchor);
    let layer = rules::resolve_layer(def.rules, anchor_cell);
    let surface = rules::support_height(layer, anchor_cell, grid, catalog)?;

    let center = WorldGrid::footprint_center(anchor_world, footprint);
    let transform = Transform {
        translation: Vec3::new(center.x, surface + def.height * 0.5, center.z),
        rotation: facing_rotation(facing),
        ..default()
    };
    let entity = pool.acquire(commands, def_id, transform);
    let id = grid.place(PlacedRecord {
        def: def_id,
        anchor,
        footprint,
        layer,
        facing,
        entity: Some(entity),
    });

    let mut entity_commands = commands.entity(entity);
    entity_commands.insert((
        PlacedObject { id },
        Facing(facing),
        CollisionVolume { enabled: false },
        JustPlaced,
    ));
    if let Some(parent) = parent {
        entity_commands.set_parent(parent);
    }
    Some((id, entity))
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct PlacementSessionPlugin;

impl Plugin for PlacementSessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlacementSession>()
            .init_resource::<CursorTarget>()
            .add_event::<SelectPlaceableEvent>()
            .add_event::<PlaceActionEvent>()
            .add_event::<RotateActionEvent>()
            .add_event::<CancelActionEvent>()
            .add_event::<DestroyActionEvent>()
            .add_event::<ToggleDestroyModeEvent>()
            .add_event::<PlacementRefusedEvent>()
            .add_systems(Startup, setup_placed_root)
            .add_systems(Update, handle_toggle_destroy_mode)
            .add_systems(
                Update,
                (
                    reenable_collision_volumes,
                    handle_select,
                    handle_rotate,
                    handle_cancel,
                    handle_place,
                    handle_destroy,
                    tick_preview,
                )
                    .chain()
                    .run_if(in_state(AppState::Playing)),
            )
            .add_systems(OnExit(AppState::Playing), release_preview_on_freeze);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppStatePlugin;
    use crate::grid::GridCoord;
    use crate::inventory::ResourceKind;
    use bevy::state::app::StatesPlugin;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, AppStatePlugin));
        app.init_resource::<WorldGrid>();
        app.init_resource::<PlaceableCatalog>();
        app.init_resource::<Inventory>();
        app.init_resource::<ObjectPool>();
        app.add_plugins(PlacementSessionPlugin);
        // run Startup so the placed-objects root exists
        app.update();
        app
    }

    fn find_def(app: &App, name: &str) -> DefId {
        app.world()
            .resource::<PlaceableCatalog>()
            .find(name)
            .expect("definition in catalog")
    }

    fn point_at(app: &mut App, x: f32, z: f32) {
        app.world_mut().resource_mut::<CursorTarget>().world = Some(Vec3::new(x, 0.0, z));
        // let the preview tick pick up the new projection
        app.update();
    }

    fn select(app: &mut App, def: DefId) {
        app.world_mut().send_event(SelectPlaceableEvent { def });
        app.update();
    }

    fn place(app: &mut App) {
        app.world_mut().send_event(PlaceActionEvent);
        app.update();
    }

    fn destroy(app: &mut App) {
        app.world_mut().send_event(DestroyActionEvent);
        app.update();
    }

    fn cell(app: &App, x: i32, y: i32) -> crate::grid::GridCell {
        app.world()
            .resource::<WorldGrid>()
            .cell(GridCoord::new(x, y))
    }

    fn stock(app: &App, kind: ResourceKind) -> u32 {
        app.world().resource::<Inventory>().amount(kind)
    }

    #[test]
    fn test_select_is_a_toggle() {
        let mut app = test_app();
        let block = find_def(&app, "Timber Block");

        select(&mut app, block);
        let preview = app
            .world()
            .resource::<PlacementSession>()
            .previewing()
            .expect("previewing after select");
        let ghost = preview.entity;
        assert!(app.world().get::<PreviewGhost>(ghost).is_some());

        // re-selecting the same definition toggles the session off
        select(&mut app, block);
        assert!(app.world().resource::<PlacementSession>().previewing().is_none());
        assert!(app.world().get::<PreviewGhost>(ghost).is_none());
        assert_eq!(app.world().resource::<ObjectPool>().free_count(block), 1);
    }

    #[test]
    fn test_select_other_definition_swaps_preview() {
        let mut app = test_app();
        let block = find_def(&app, "Timber Block");
        let bridge = find_def(&app, "Plank Bridge");

        select(&mut app, block);
        select(&mut app, bridge);
        let preview = app
            .world()
            .resource::<PlacementSession>()
            .previewing()
            .expect("still previewing");
        assert_eq!(preview.def, bridge);
        assert_eq!(app.world().resource::<ObjectPool>().free_count(block), 1);
    }

    #[test]
    fn test_place_commits_and_stays_previewing() {
        let mut app = test_app();
        let bridge = find_def(&app, "Plank Bridge");

        select(&mut app, bridge);
        point_at(&mut app, 0.5, 0.5);
        assert!(app
            .world()
            .resource::<PlacementSession>()
            .previewing()
            .unwrap()
            .valid);

        place(&mut app);
        let c = cell(&app, 0, 0);
        assert!(c.ground.is_some());
        assert_eq!(stock(&app, ResourceKind::Plank), 19);
        assert_eq!(stock(&app, ResourceKind::Fiber), 11);
        // rapid successive placement: the definition stays selected
        assert!(app.world().resource::<PlacementSession>().previewing().is_some());

        // placing again on the occupied cell is refused and consumes nothing
        place(&mut app);
        assert_eq!(cell(&app, 0, 0), c);
        assert_eq!(stock(&app, ResourceKind::Plank), 19);
    }

    #[test]
    fn test_place_with_nothing_selected_is_ignored() {
        let mut app = test_app();
        point_at(&mut app, 0.5, 0.5);
        place(&mut app);
        assert_eq!(app.world().resource::<WorldGrid>().placed_count(), 0);
    }

    #[test]
    fn test_place_refused_when_unaffordable() {
        let mut app = test_app();
        *app.world_mut().resource_mut::<Inventory>() = Inventory::empty();
        let bridge = find_def(&app, "Plank Bridge");

        select(&mut app, bridge);
        point_at(&mut app, 0.5, 0.5);
        assert!(!app
            .world()
            .resource::<PlacementSession>()
            .previewing()
            .unwrap()
            .valid);

        place(&mut app);
        assert_eq!(app.world().resource::<WorldGrid>().placed_count(), 0);
        assert!(!app
            .world()
            .resource::<Events<PlacementRefusedEvent>>()
            .is_empty());
    }

    #[test]
    fn test_any_layer_stacks_dynamically() {
        let mut app = test_app();
        let block = find_def(&app, "Timber Block");

        select(&mut app, block);
        point_at(&mut app, 0.5, 0.5);
        place(&mut app);
        let first = cell(&app, 0, 0);
        assert!(first.ground.is_some() && first.upper.is_none());

        // same definition again: resolves Upper on the now-occupied cell
        point_at(&mut app, 0.5, 0.5);
        place(&mut app);
        let second = cell(&app, 0, 0);
        assert_eq!(second.ground, first.ground);
        assert!(second.upper.is_some());
    }

    #[test]
    fn test_rotate_swaps_footprint() {
        let mut app = test_app();
        let table = find_def(&app, "Oak Table");
        select(&mut app, table);

        let footprint = |app: &App| {
            app.world()
                .resource::<PlacementSession>()
                .previewing()
                .unwrap()
                .footprint
        };
        assert_eq!(footprint(&app), Footprint::new(2, 1));

        app.world_mut().send_event(RotateActionEvent);
        app.update();
        assert_eq!(footprint(&app), Footprint::new(1, 2));

        app.world_mut().send_event(RotateActionEvent);
        app.update();
        assert_eq!(footprint(&app), Footprint::new(2, 1));
    }

    #[test]
    fn test_rotated_footprint_drives_commit() {
        let mut app = test_app();
        let block = find_def(&app, "Timber Block");
        let table = find_def(&app, "Oak Table");

        // pave a 1x2 column of foundations
        select(&mut app, block);
        point_at(&mut app, 0.5, 0.5);
        place(&mut app);
        point_at(&mut app, 0.5, 1.5);
        place(&mut app);
        select(&mut app, block); // toggle off

        select(&mut app, table);
        app.world_mut().send_event(RotateActionEvent);
        app.update();
        point_at(&mut app, 0.5, 0.5);
        place(&mut app);

        assert!(cell(&app, 0, 0).upper.is_some());
        assert!(cell(&app, 0, 1).upper.is_some());
        let grid = app.world().resource::<WorldGrid>();
        let (_, record) = grid
            .records()
            .find(|(_, r)| r.def == table)
            .expect("table committed");
        assert_eq!(record.footprint, Footprint::new(1, 2));
        assert_eq!(record.facing, 1);
    }

    #[test]
    fn test_cancel_releases_preview() {
        let mut app = test_app();
        let block = find_def(&app, "Timber Block");
        select(&mut app, block);

        app.world_mut().send_event(CancelActionEvent);
        app.update();
        assert!(app.world().resource::<PlacementSession>().previewing().is_none());
        assert_eq!(app.world().resource::<ObjectPool>().free_count(block), 1);
    }

    #[test]
    fn test_preview_parks_when_pointer_misses() {
        let mut app = test_app();
        let block = find_def(&app, "Timber Block");
        select(&mut app, block);

        app.world_mut().resource_mut::<CursorTarget>().world = None;
        app.update();

        let preview_entity = {
            let preview = app
                .world()
                .resource::<PlacementSession>()
                .previewing()
                .unwrap();
            assert!(preview.parked);
            assert!(!preview.valid);
            preview.entity
        };
        assert_eq!(
            app.world().get::<Transform>(preview_entity).unwrap().translation,
            PARKED_POSITION
        );

        // placement is impossible while parked
        place(&mut app);
        assert_eq!(app.world().resource::<WorldGrid>().placed_count(), 0);
    }

    #[test]
    fn test_upper_preview_parks_without_support() {
        let mut app = test_app();
        let stool = find_def(&app, "Oak Stool");
        select(&mut app, stool);
        point_at(&mut app, 0.5, 0.5);

        let preview = app
            .world()
            .resource::<PlacementSession>()
            .previewing()
            .unwrap();
        assert!(preview.parked);
        assert!(!preview.valid);
    }

    #[test]
    fn test_destroy_picks_upper_before_ground() {
        let mut app = test_app();
        let block = find_def(&app, "Timber Block");
        let stool = find_def(&app, "Oak Stool");

        select(&mut app, block);
        point_at(&mut app, 0.5, 0.5);
        place(&mut app);
        select(&mut app, block);

        select(&mut app, stool);
        point_at(&mut app, 0.5, 0.5);
        place(&mut app);

        destroy(&mut app);
        let c = cell(&app, 0, 0);
        assert!(c.upper.is_none(), "stool destroyed first");
        assert!(c.ground.is_some(), "block survives");

        destroy(&mut app);
        assert!(cell(&app, 0, 0).is_empty());
        assert_eq!(app.world().resource::<ObjectPool>().free_count(stool), 1);
    }

    #[test]
    fn test_destroy_refuses_supporting_ground() {
        let mut app = test_app();
        let deck = find_def(&app, "Timber Deck");
        let stool = find_def(&app, "Oak Stool");

        // deck covers (0,0)-(1,0); stool sits on (1,0)
        select(&mut app, deck);
        point_at(&mut app, 0.5, 0.5);
        place(&mut app);
        select(&mut app, deck);

        select(&mut app, stool);
        point_at(&mut app, 1.5, 0.5);
        place(&mut app);
        select(&mut app, stool);

        // pointing at the stool-free end still refuses: the deck supports it
        point_at(&mut app, 0.5, 0.5);
        destroy(&mut app);
        assert!(cell(&app, 0, 0).ground.is_some());
        assert!(cell(&app, 1, 0).upper.is_some());
        assert!(!app
            .world()
            .resource::<Events<PlacementRefusedEvent>>()
            .is_empty());
    }

    #[test]
    fn test_destroy_mode_gate() {
        let mut app = test_app();
        let block = find_def(&app, "Timber Block");
        select(&mut app, block);
        point_at(&mut app, 0.5, 0.5);
        place(&mut app);

        app.world_mut()
            .send_event(ToggleDestroyModeEvent { active: false });
        app.update();
        destroy(&mut app);
        assert!(cell(&app, 0, 0).ground.is_some());

        app.world_mut()
            .send_event(ToggleDestroyModeEvent { active: true });
        app.update();
        destroy(&mut app);
        assert!(cell(&app, 0, 0).is_empty());
    }

    #[test]
    fn test_freeze_releases_preview_and_blocks_intents() {
        let mut app = test_app();
        let block = find_def(&app, "Timber Block");
        select(&mut app, block);
        point_at(&mut app, 0.5, 0.5);

        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Paused);
        app.update();
        assert!(app.world().resource::<PlacementSession>().previewing().is_none());
        assert_eq!(app.world().resource::<ObjectPool>().free_count(block), 1);

        // intents are inert while frozen
        app.world_mut().send_event(SelectPlaceableEvent { def: block });
        app.update();
        assert!(app.world().resource::<PlacementSession>().previewing().is_none());
    }

    #[test]
    fn test_collision_volume_deferred_one_frame() {
        let mut app = test_app();
        let block = find_def(&app, "Timber Block");
        select(&mut app, block);
        point_at(&mut app, 0.5, 0.5);
        place(&mut app);

        let entity = {
            let grid = app.world().resource::<WorldGrid>();
            let (_, record) = grid.records().next().expect("one record");
            record.entity.expect("scene-backed record")
        };
        assert!(!app.world().get::<CollisionVolume>(entity).unwrap().enabled);
        assert!(app.world().get::<JustPlaced>(entity).is_some());

        app.update();
        assert!(app.world().get::<CollisionVolume>(entity).unwrap().enabled);
        assert!(app.world().get::<JustPlaced>(entity).is_none());
    }

    #[test]
    fn test_committed_instance_is_parented_and_marked() {
        let mut app = test_app();
        let block = find_def(&app, "Timber Block");
        select(&mut app, block);
        point_at(&mut app, 0.5, 0.5);
        place(&mut app);

        let entity = {
            let grid = app.world().resource::<WorldGrid>();
            grid.records().next().unwrap().1.entity.unwrap()
        };
        assert!(app.world().get::<PlacedObject>(entity).is_some());
        let parent = app.world().get::<Parent>(entity).expect("parented");
        assert!(app.world().get::<PlacedObjectsRoot>(parent.get()).is_some());
    }
}
