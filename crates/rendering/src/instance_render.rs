//! Visuals for pooled placeable instances.
//!
//! Every instance gets a footprint-sized cuboid and its own material
//! instance, so the ghost can be tinted without touching committed objects.
//! The ghost communicates the session's boolean validity purely through
//! transparency and tint; nothing here feeds back into validation.

use bevy::prelude::*;

use simulation::catalog::{ObjectCategory, PlaceableCatalog};
use simulation::config::CELL_SIZE;
use simulation::pool::PlaceableInstance;
use simulation::session::{PlacedObject, PlacementSession, PreviewGhost};

/// Ghost alpha while the candidate position is placeable.
const GHOST_VALID_ALPHA: f32 = 0.5;
/// Ghost alpha while it is not.
const GHOST_INVALID_ALPHA: f32 = 0.2;

/// Shrink factor so adjacent instances read as separate objects.
const MESH_INSET: f32 = 0.96;

fn category_rgb(category: ObjectCategory) -> (f32, f32, f32) {
    match category {
        ObjectCategory::Block => (0.62, 0.45, 0.27),
        ObjectCategory::Wall => (0.78, 0.72, 0.60),
        ObjectCategory::Bridge => (0.50, 0.38, 0.22),
        ObjectCategory::Furniture => (0.40, 0.28, 0.45),
    }
}

fn category_color(category: ObjectCategory, alpha: f32) -> Color {
    let (r, g, b) = category_rgb(category);
    Color::srgba(r, g, b, alpha)
}

/// Give every fresh pool instance a mesh and a private material.
pub fn attach_instance_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    catalog: Res<PlaceableCatalog>,
    query: Query<(Entity, &PlaceableInstance), Without<Mesh3d>>,
) {
    for (entity, instance) in &query {
        let def = catalog.get(instance.def);
        let mesh = meshes.add(Cuboid::new(
            def.footprint.width as f32 * CELL_SIZE * MESH_INSET,
            def.height,
            def.footprint.depth as f32 * CELL_SIZE * MESH_INSET,
        ));
        let material = materials.add(StandardMaterial {
            base_color: category_color(def.category, 1.0),
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 0.9,
            ..default()
        });
        commands
            .entity(entity)
            .insert((Mesh3d(mesh), MeshMaterial3d(material)));
    }
}

/// Drive the ghost's transparency from the session's last computed validity.
pub fn tint_preview_ghost(
    session: Res<PlacementSession>,
    catalog: Res<PlaceableCatalog>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    ghosts: Query<(&PlaceableInstance, &MeshMaterial3d<StandardMaterial>), With<PreviewGhost>>,
) {
    let Some(preview) = session.previewing() else {
        return;
    };
    for (instance, material) in &ghosts {
        let Some(material) = materials.get_mut(material.id()) else {
            continue;
        };
        material.base_color = if preview.valid {
            category_color(catalog.get(instance.def).category, GHOST_VALID_ALPHA)
        } else {
            Color::srgba(0.9, 0.15, 0.1, GHOST_INVALID_ALPHA)
        };
    }
}

/// Committed instances drop any leftover ghost translucency.
pub fn restore_committed_opacity(
    catalog: Res<PlaceableCatalog>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    committed: Query<
        (&PlaceableInstance, &MeshMaterial3d<StandardMaterial>),
        Added<PlacedObject>,
    >,
) {
    for (instance, material) in &committed {
        if let Some(material) = materials.get_mut(material.id()) {
            material.base_color = category_color(catalog.get(instance.def).category, 1.0);
        }
    }
}
