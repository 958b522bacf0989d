//! Types for storing minecraft-format blocks, plus a dense in-memory block grid that can stand in
//! for a live world when capturing or re-materializing structures.

pub mod iter;
pub(crate) mod serialization;


use std::collections::BTreeMap;
use std::fmt::Display;
use std::ops::Add;
use std::vec::Vec;

use crate::error::{Result, StructureError};
use crate::world::{WorldReader, WorldWriter};

/// A concrete block as it exists in a world: the block type name and its configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockState {
    pub name: String,
    pub properties: BTreeMap<String, String>,
}

impl BlockState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl From<[i32; 3]> for Position {
    fn from(v: [i32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl Position {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn in_bounding_box(&self, min: &Self, max: &Self) -> bool {
        let x = min.x <= self.x && self.x < max.x;
        let y = min.y <= self.y && self.y < max.y;
        let z = min.z <= self.z && self.z < max.z;

        x && y && z
    }

    /// True if this position lies within `[0, extents)` on every axis.
    pub fn in_extents(&self, extents: &[u32; 3]) -> bool {
        let max = Position::new(
            extents[0].min(i32::MAX as u32) as i32,
            extents[1].min(i32::MAX as u32) as i32,
            extents[2].min(i32::MAX as u32) as i32,
        );
        self.in_bounding_box(&Position::default(), &max)
    }

    pub fn to_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Z-
    North,
    /// Z+,
    South,
    /// X+
    East,
    /// X-
    West,
    /// +Y
    Up,
    /// -Y
    Down,
}

impl Direction {
    #[inline]
    pub fn mirror(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Quarter turn clockwise when viewed from above. Vertical directions are unchanged.
    #[inline]
    pub fn rotate_clockwise(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
            d => d,
        }
    }

    /// Reflect across the plane perpendicular to the X axis.
    #[inline]
    pub fn flip_x(self) -> Self {
        match self {
            Direction::East | Direction::West => self.mirror(),
            d => d,
        }
    }

    /// Reflect across the plane perpendicular to the Z axis.
    #[inline]
    pub fn flip_z(self) -> Self {
        match self {
            Direction::North | Direction::South => self.mirror(),
            d => d,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "north" => Some(Direction::North),
            "south" => Some(Direction::South),
            "east" => Some(Direction::East),
            "west" => Some(Direction::West),
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }
}

pub const PLANAR_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
];

pub struct BlockStorage {
    /// 3D extents. All the other fields rely on this staying the same for the lifetime of this
    /// BlockStorage.
    pub(self) extents: [u32; 3],
    /// Scale to use for Z coordinates when computing indicies
    pub(self) zsi: u32,
    /// Scale to use for Y coordinates when computing indicies
    pub(self) ysi: u32,

    pub(self) palette: Vec<BlockState>,

    /// Stored in x - z - y order
    pub(self) blocks: Vec<BlockTypeIndex>,
}

/// Represents a type index into the BlockStorage's palette.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BlockTypeIndex(u32);

impl BlockStorage {
    /// Create a storage of the given extents, filled with air. Fails if the cell count does not
    /// fit in a `u32`.
    pub fn new(sx: u32, sy: u32, sz: u32) -> Result<Self> {
        let ysi = sx.checked_mul(sz);
        let total_size = ysi.and_then(|ysi| ysi.checked_mul(sy));
        let (ysi, total_size) = match (ysi, total_size) {
            (Some(ysi), Some(total_size)) => (ysi, total_size),
            _ => {
                return Err(StructureError::invalid(format!(
                    "storage of ({}, {}, {}) has too many cells",
                    sx, sy, sz
                )))
            }
        };

        let blocks = vec![BlockTypeIndex(0); total_size as usize];

        Ok(Self {
            extents: [sx, sy, sz],
            zsi: sx,
            ysi,
            palette: vec![BlockState::new("minecraft:air")],
            blocks,
        })
    }

    pub fn iter_block_coords(&self) -> iter::BlockCoordIter {
        iter::BlockCoordIter::new(self)
    }

    pub fn add_new_block_type(&mut self, b: BlockState) -> BlockTypeIndex {
        // Very stupid implementation, there are rarely more than a few dozen entries here.
        for (i, bti) in self.palette.iter().enumerate() {
            if bti == &b {
                return BlockTypeIndex(i as u32);
            }
        }
        let iidx = self.palette.len();
        self.palette.push(b);
        BlockTypeIndex(iidx as u32)
    }

    pub fn extents(&self) -> &[u32; 3] {
        &self.extents
    }

    pub fn palette(&self) -> &[BlockState] {
        &self.palette
    }

    pub fn info_for_index(&self, index: BlockTypeIndex) -> Option<&BlockState> {
        self.palette.get(index.0 as usize)
    }

    #[inline]
    fn linear_index(&self, pos: Position) -> Result<usize> {
        if !pos.in_extents(&self.extents) {
            return Err(StructureError::OutOfBounds {
                position: pos,
                size: self.extents,
            });
        }
        debug_assert!(
            self.blocks.len() as u32 == self.extents[0] * self.extents[1] * self.extents[2]
        );
        // In extents, so the sum is below the cell count and cannot overflow.
        let (x, y, z) = (pos.x as usize, pos.y as usize, pos.z as usize);
        Ok(x + z * self.zsi as usize + y * self.ysi as usize)
    }

    #[inline]
    pub fn get_block(&self, pos: Position) -> Result<&BlockTypeIndex> {
        let i = self.linear_index(pos)?;
        Ok(&self.blocks[i])
    }

    #[inline]
    pub fn get_block_mut(&mut self, pos: Position) -> Result<&mut BlockTypeIndex> {
        let i = self.linear_index(pos)?;
        Ok(&mut self.blocks[i])
    }

    /// Resolve the full block state at `pos`.
    pub fn get_state(&self, pos: Position) -> Result<&BlockState> {
        let index = *self.get_block(pos)?;
        self.info_for_index(index).ok_or_else(|| {
            StructureError::invalid(format!(
                "Block at {} references missing palette entry {:?}",
                pos, index
            ))
        })
    }
}

impl WorldReader for BlockStorage {
    fn read(&self, pos: Position) -> Result<BlockState> {
        self.get_state(pos).map(Clone::clone)
    }
}

impl WorldWriter for BlockStorage {
    fn write(&mut self, pos: Position, state: BlockState) -> Result<()> {
        // Bounds check before touching the palette so a failed write leaves no trace.
        let i = self.linear_index(pos)?;
        let index = self.add_new_block_type(state);
        self.blocks[i] = index;
        Ok(())
    }
}
