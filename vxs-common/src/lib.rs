//! Capture, encode, transform and re-materialize bounded regions of blocks.
//!
//! A [`structure::Structure`] is the deduplicated, serializable snapshot of a region. The host
//! world is only ever touched through the traits in [`world`].

pub mod block_storage;
pub mod error;
pub mod structure;
pub mod world;

pub use error::{Result, StructureError};

/// Block name that marks a cell as intentionally empty. Never captured.
pub const STRUCTURE_VOID: &str = "minecraft:structure_void";

/// Block name of the marker block used to define a region. Never captured.
pub const STRUCTURE_BLOCK: &str = "minecraft:structure_block";
