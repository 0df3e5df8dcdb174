use bitcode::{Decode, Encode};

use simulation::inventory::ResourceKind;

/// Current SaveFile schema version. Saves from newer versions are refused.
pub const SAVE_VERSION: u32 = 1;

/// Everything a session needs to be reconstructed.
#[derive(Encode, Decode, Debug, Clone, PartialEq)]
pub struct SaveFile {
    pub version: u32,
    pub inventory: Vec<(ResourceKind, u32)>,
    /// Committed instances. Ground-layer records are serialized before
    /// upper-layer records: the layer itself is not stored and is
    /// re-resolved on load, which only works when foundations come back
    /// before the objects resting on them.
    pub placed: Vec<PlacedObjectData>,
}

/// One committed instance: type identifier, anchor-cell world position, and
/// facing in quarter-turns.
#[derive(Encode, Decode, Debug, Clone, PartialEq)]
pub struct PlacedObjectData {
    pub def_name: String,
    pub position: [f32; 3],
    pub facing: u8,
}
