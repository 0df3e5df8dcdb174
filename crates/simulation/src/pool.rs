//! Entity pool for placeable instances, keyed by definition.
//!
//! Instances are never despawned once created: releasing parks the entity
//! off-world, hidden, on a per-definition free list; acquiring reuses a
//! parked entity when one exists and spawns a fresh one otherwise. The pool
//! does not validate what callers do with the instances it hands out.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::catalog::DefId;
use crate::config::PARKED_POSITION;

/// Carried by every pooled instance; identifies which definition it renders.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlaceableInstance {
    pub def: DefId,
}

/// Marker for instances currently parked on the free list.
#[derive(Component)]
pub struct Pooled;

#[derive(Resource, Default)]
pub struct ObjectPool {
    free: HashMap<DefId, Vec<Entity>>,
}

impl ObjectPool {
    /// Hand out an instance of `def` at `transform`, reusing a parked entity
    /// when possible.
    pub fn acquire(
        &mut self,
        commands: &mut Commands,
        def: DefId,
        transform: Transform,
    ) -> Entity {
        if let Some(entity) = self.free.get_mut(&def).and_then(Vec::pop) {
            commands
                .entity(entity)
                .remove::<Pooled>()
                .insert((transform, Visibility::Visible));
            entity
        } else {
            commands
                .spawn((PlaceableInstance { def }, transform, Visibility::Visible))
                .id()
        }
    }

    /// Park `entity` on the free list for `def`. Callers strip their own
    /// marker components first; the pool only hides and positions.
    pub fn release(&mut self, commands: &mut Commands, def: DefId, entity: Entity) {
        commands.entity(entity).insert((
            Transform::from_translation(PARKED_POSITION),
            Visibility::Hidden,
            Pooled,
        ));
        self.free.entry(def).or_default().push(entity);
    }

    pub fn free_count(&self, def: DefId) -> usize {
        self.free.get(&def).map_or(0, Vec::len)
    }
}
