use bevy::math::Vec3;

/// Side length of one grid cell in world units.
pub const CELL_SIZE: f32 = 1.0;

/// World-space Y of the surface that ground-layer objects rest on. Slightly
/// above zero so flat pieces don't z-fight with the terrain slab.
pub const GROUND_SURFACE_Y: f32 = 0.01;

/// Off-world parking spot for pooled instances and for the preview ghost
/// while the pointer misses the ground plane. Anything parked here is
/// invisible and must never be treated as a valid placement position.
pub const PARKED_POSITION: Vec3 = Vec3::new(0.0, -1000.0, 0.0);
