//! The structure model: a captured region as a deduplicated palette plus a list of occupied
//! positions referencing it.

mod codec;
mod palette;
mod serialization;
pub mod transform;

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::sync::Arc;

use log::{debug, trace};

use crate::block_storage::{BlockState, Position};
use crate::error::{Result, StructureError};
use crate::world::{BlockRegistry, WorldReader, WorldWriter};

pub use palette::{Palette, PaletteItem, CONNECTION_FLAGS};
pub use transform::{Mirror, OrientationRules, OrientedProperty, Rotation};

/// One occupied position, relative to the structure origin, and the palette entry occupying it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockEntry {
    pub pos: Position,
    pub state: u32,
}

impl BlockEntry {
    pub fn new(pos: Position, state: u32) -> Self {
        Self { pos, state }
    }
}

/// Inventory-style representation of a single block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemDescriptor {
    pub item: String,
    pub count: u8,
    /// The block state the item would place.
    pub state: BlockState,
}

/// A captured region of blocks.
///
/// Structures are never mutated after construction. Copies and transforms share the palette and
/// block lists wherever they are unchanged.
#[derive(Clone, Debug)]
pub struct Structure {
    author: String,
    version: i32,
    size: [u32; 3],
    palette: Arc<Vec<PaletteItem>>,
    blocks: Arc<Vec<BlockEntry>>,
}

fn check_header(author: &str, version: i32, size: &[u32; 3]) -> Result<()> {
    if author.is_empty() {
        return Err(StructureError::invalid("author must not be empty"));
    }
    if version <= 0 {
        return Err(StructureError::invalid(format!(
            "version must be positive, got {}",
            version
        )));
    }
    if size.iter().any(|s| *s == 0 || *s > i32::MAX as u32) {
        return Err(StructureError::invalid(format!(
            "size components must be positive, got ({}, {}, {})",
            size[0], size[1], size[2]
        )));
    }
    Ok(())
}

/// The far corner of a box at `origin` must be addressable.
fn check_region(origin: Position, size: &[u32; 3]) -> Result<()> {
    let far = [
        origin.x.checked_add(size[0] as i32 - 1),
        origin.y.checked_add(size[1] as i32 - 1),
        origin.z.checked_add(size[2] as i32 - 1),
    ];
    if far.iter().any(Option::is_none) {
        return Err(StructureError::invalid(format!(
            "region at {} with size ({}, {}, {}) overflows world coordinates",
            origin, size[0], size[1], size[2]
        )));
    }
    Ok(())
}

impl Structure {
    /// Build a structure from already-assembled parts, checking every invariant.
    pub fn from_parts(
        author: impl Into<String>,
        version: i32,
        size: [u32; 3],
        palette: Vec<PaletteItem>,
        blocks: Vec<BlockEntry>,
    ) -> Result<Self> {
        let author = author.into();
        check_header(&author, version, &size)?;

        let mut seen = HashSet::with_capacity(blocks.len());
        for block in &blocks {
            if block.state as usize >= palette.len() {
                return Err(StructureError::invalid(format!(
                    "block at {} references palette entry {} but the palette has {} entries",
                    block.pos,
                    block.state,
                    palette.len()
                )));
            }
            if !seen.insert(block.pos) {
                return Err(StructureError::invalid(format!(
                    "position {} is occupied more than once",
                    block.pos
                )));
            }
        }

        Ok(Self {
            author,
            version,
            size,
            palette: Arc::new(palette),
            blocks: Arc::new(blocks),
        })
    }

    /// Scan the box `[origin, origin + size)` of a world, recording every block the world does
    /// not exclude from capture. Positions are stored relative to `origin`.
    ///
    /// Iteration is X-major, then Y, then Z.
    pub fn capture<W: WorldReader + ?Sized>(
        author: impl Into<String>,
        version: i32,
        world: &W,
        origin: Position,
        size: [u32; 3],
    ) -> Result<Self> {
        let author = author.into();
        check_header(&author, version, &size)?;

        check_region(origin, &size)?;

        let mut palette = Palette::new();
        let mut blocks = Vec::new();
        let mut skipped = 0usize;

        for x in 0..size[0] as i32 {
            for y in 0..size[1] as i32 {
                for z in 0..size[2] as i32 {
                    let rel = Position::new(x, y, z);
                    let state = world.read(origin + rel)?;
                    if world.is_capture_excluded(&state) {
                        trace!("Skipping {} at {}", state.name, origin + rel);
                        skipped += 1;
                        continue;
                    }
                    let (index, is_new) = palette.index_of(PaletteItem::from_block_state(&state));
                    if is_new {
                        trace!("New palette entry {} for {}", index, state.name);
                    }
                    blocks.push(BlockEntry::new(rel, index));
                }
            }
        }

        debug!(
            "Captured {} blocks ({} skipped) with {} palette entries from {}",
            blocks.len(),
            skipped,
            palette.len(),
            origin
        );

        Ok(Self {
            author,
            version,
            size,
            palette: Arc::new(palette.into_items()),
            blocks: Arc::new(blocks),
        })
    }

    /// A copy attributed to `author`. A non-positive `version` means "one past this version".
    pub fn copy(&self, author: impl Into<String>, version: i32) -> Result<Self> {
        let author = author.into();
        if author.is_empty() {
            return Err(StructureError::invalid("author must not be empty"));
        }
        let version = if version > 0 {
            version
        } else {
            self.version.checked_add(1).ok_or_else(|| {
                StructureError::invalid(format!("version {} cannot be incremented", self.version))
            })?
        };

        Ok(Self {
            author,
            version,
            size: self.size,
            palette: Arc::clone(&self.palette),
            blocks: Arc::clone(&self.blocks),
        })
    }

    /// Same header, new contents. Used by the transforms, which preserve every invariant.
    pub(crate) fn derive(
        &self,
        palette: Arc<Vec<PaletteItem>>,
        blocks: Arc<Vec<BlockEntry>>,
    ) -> Self {
        Self {
            author: self.author.clone(),
            version: self.version,
            size: self.size,
            palette,
            blocks,
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn size(&self) -> &[u32; 3] {
        &self.size
    }

    pub fn palette(&self) -> &[PaletteItem] {
        &self.palette
    }

    pub fn blocks(&self) -> &[BlockEntry] {
        &self.blocks
    }

    /// Every recorded block with its palette item, in block-list order.
    pub fn iter_blocks(&self) -> impl Iterator<Item = (Position, &PaletteItem)> + '_ {
        self.blocks
            .iter()
            .map(move |b| (b.pos, &self.palette[b.state as usize]))
    }

    /// Number of recorded blocks lying outside `[0, size)`. Only a rotation of a non-square
    /// footprint produces these, and lookups and loads never see them.
    pub fn blocks_outside(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| !b.pos.in_extents(&self.size))
            .count()
    }

    fn check_bounds(&self, pos: Position) -> Result<()> {
        if pos.in_extents(&self.size) {
            Ok(())
        } else {
            Err(StructureError::OutOfBounds {
                position: pos,
                size: self.size,
            })
        }
    }

    /// The palette item recorded at `pos`, if any.
    pub fn palette_entry_at(&self, pos: Position) -> Result<Option<&PaletteItem>> {
        self.check_bounds(pos)?;
        Ok(self
            .blocks
            .iter()
            .find(|b| b.pos == pos)
            .map(|b| &self.palette[b.state as usize]))
    }

    /// A single-item descriptor for the block recorded at `pos`, if any.
    pub fn descriptor_at(
        &self,
        pos: Position,
        registry: &dyn BlockRegistry,
    ) -> Result<Option<ItemDescriptor>> {
        let item = match self.palette_entry_at(pos)? {
            Some(item) => item,
            None => return Ok(None),
        };
        let ty = registry.resolve(&item.name)?;
        let state = item.to_block_state(registry)?;

        Ok(Some(ItemDescriptor {
            item: ty.item_name().to_owned(),
            count: 1,
            state,
        }))
    }

    /// Place the block recorded at `rel` into `world` at `base + rel`. Positions with nothing
    /// recorded leave the world untouched.
    pub fn load_cell<W: WorldWriter + ?Sized>(
        &self,
        world: &mut W,
        registry: &dyn BlockRegistry,
        base: Position,
        rel: Position,
    ) -> Result<()> {
        check_region(base, &self.size)?;
        if let Some(item) = self.palette_entry_at(rel)? {
            let state = item.to_block_state(registry)?;
            world.write(base + rel, state)?;
        }
        Ok(())
    }

    /// Place every recorded block of the structure with its origin at `base`.
    ///
    /// Any rotation or mirroring has to be applied to the structure beforehand.
    pub fn load_all<W: WorldWriter + ?Sized>(
        &self,
        world: &mut W,
        registry: &dyn BlockRegistry,
        base: Position,
    ) -> Result<()> {
        check_region(base, &self.size)?;

        // Equivalent to load_cell over the whole box, without rescanning the block list and
        // re-resolving the palette for every position.
        let by_pos: HashMap<Position, u32> =
            self.blocks.iter().map(|b| (b.pos, b.state)).collect();
        let mut resolved: Vec<Option<BlockState>> = vec![None; self.palette.len()];
        let mut placed = 0usize;

        for x in 0..self.size[0] as i32 {
            for y in 0..self.size[1] as i32 {
                for z in 0..self.size[2] as i32 {
                    let rel = Position::new(x, y, z);
                    let index = match by_pos.get(&rel) {
                        Some(index) => *index as usize,
                        None => continue,
                    };
                    let state = match &resolved[index] {
                        Some(state) => state.clone(),
                        None => {
                            let state = self.palette[index].to_block_state(registry)?;
                            resolved[index] = Some(state.clone());
                            state
                        }
                    };
                    world.write(base + rel, state)?;
                    placed += 1;
                }
            }
        }

        debug!("Placed {} blocks of {} at {}", placed, self, base);
        Ok(())
    }
}

impl PartialEq for Structure {
    /// Equal header and equal `(position, palette item)` pairs, regardless of palette order.
    fn eq(&self, other: &Self) -> bool {
        if self.author != other.author
            || self.version != other.version
            || self.size != other.size
            || self.blocks.len() != other.blocks.len()
        {
            return false;
        }
        let ours: HashMap<Position, &PaletteItem> = self.iter_blocks().collect();
        other
            .iter_blocks()
            .all(|(pos, item)| ours.get(&pos) == Some(&item))
    }
}

impl Eq for Structure {}

impl Display for Structure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Structure{{author={:?}, version={}, size=({}, {}, {})}}",
            self.author, self.version, self.size[0], self.size[1], self.size[2]
        )
    }
}
