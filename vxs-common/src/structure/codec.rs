//! Gzip-compressed NBT encoding of structures.
//!
//! Root compound layout:
//!
//! | field      | tag                                               |
//! |------------|---------------------------------------------------|
//! | `author`   | string                                            |
//! | `version`  | int, > 0                                          |
//! | `size`     | list of 3 ints, each > 0                          |
//! | `palette`  | list of compounds: `name` string, `properties`    |
//! | `blocks`   | list of compounds: `state` int, `pos` 3 ints      |
//! | `entities` | list, always empty                                |

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, warn};
use quartz_nbt::io::{read_nbt, write_nbt, Flavor};
use quartz_nbt::{NbtCompound, NbtList, NbtTag};

use super::{BlockEntry, PaletteItem, Structure};
use crate::block_storage::Position;
use crate::error::{Result, StructureError};

fn field<'a>(compound: &'a NbtCompound, name: &str) -> Result<&'a NbtTag> {
    compound
        .inner()
        .get(name)
        .ok_or_else(|| StructureError::decode(format!("missing field {:?}", name)))
}

/// Structure files written by the game capitalize some palette fields, ours do not.
fn field_either<'a>(compound: &'a NbtCompound, name: &str, alt: &str) -> Option<&'a NbtTag> {
    compound
        .inner()
        .get(name)
        .or_else(|| compound.inner().get(alt))
}

fn int_field(compound: &NbtCompound, name: &str) -> Result<i32> {
    match field(compound, name)? {
        NbtTag::Int(v) => Ok(*v),
        other => Err(StructureError::decode(format!(
            "field {:?} should be an int, got {}",
            name, other
        ))),
    }
}

fn list_field<'a>(compound: &'a NbtCompound, name: &str) -> Result<&'a NbtList> {
    match field(compound, name)? {
        NbtTag::List(list) => Ok(list),
        other => Err(StructureError::decode(format!(
            "field {:?} should be a list, got {}",
            name, other
        ))),
    }
}

/// Accepts both a list of ints and an int array.
fn int_triple(compound: &NbtCompound, name: &str) -> Result<[i32; 3]> {
    let values: Vec<i32> = match field(compound, name)? {
        NbtTag::IntArray(values) => values.clone(),
        NbtTag::List(list) => list
            .iter()
            .map(|tag| match tag {
                NbtTag::Int(v) => Ok(*v),
                other => Err(StructureError::decode(format!(
                    "field {:?} should contain ints, got {}",
                    name, other
                ))),
            })
            .collect::<Result<_>>()?,
        other => {
            return Err(StructureError::decode(format!(
                "field {:?} should be a list of ints, got {}",
                name, other
            )))
        }
    };

    match values[..] {
        [x, y, z] => Ok([x, y, z]),
        _ => Err(StructureError::decode(format!(
            "field {:?} should have 3 components, got {}",
            name,
            values.len()
        ))),
    }
}

fn int_list(values: [i32; 3]) -> NbtList {
    let mut list = NbtList::with_capacity(3);
    for v in values {
        list.push(v);
    }
    list
}

fn compounds<'a>(
    list: &'a NbtList,
    name: &'a str,
) -> impl Iterator<Item = Result<&'a NbtCompound>> + 'a {
    list.iter().enumerate().map(move |(i, tag)| match tag {
        NbtTag::Compound(c) => Ok(c),
        other => Err(StructureError::decode(format!(
            "{}[{}] should be a compound, got {}",
            name, i, other
        ))),
    })
}

impl PaletteItem {
    pub fn to_nbt(&self) -> NbtCompound {
        let mut compound = NbtCompound::new();
        compound.insert("name", self.name.clone());

        let mut properties = NbtCompound::new();
        for (k, v) in &self.properties {
            properties.insert(k.clone(), v.clone());
        }
        compound.insert("properties", properties);

        compound
    }

    pub fn from_nbt(compound: &NbtCompound) -> Result<Self> {
        let name = match field_either(compound, "name", "Name") {
            Some(NbtTag::String(name)) if !name.is_empty() => name.clone(),
            Some(other) => {
                return Err(StructureError::decode(format!(
                    "palette entry name should be a non-empty string, got {}",
                    other
                )))
            }
            None => return Err(StructureError::decode("palette entry is missing its name")),
        };

        let properties = match field_either(compound, "properties", "Properties") {
            None => Default::default(),
            Some(NbtTag::Compound(props)) => props
                .inner()
                .iter()
                .map(|(k, v)| {
                    let v = match v {
                        NbtTag::String(s) => s.clone(),
                        NbtTag::Byte(b) => {
                            warn!("Coercing byte property {:?} of {} to a string", k, name);
                            b.to_string()
                        }
                        NbtTag::Int(i) => {
                            warn!("Coercing int property {:?} of {} to a string", k, name);
                            i.to_string()
                        }
                        _ => {
                            return Err(StructureError::decode(format!(
                                "unsupported property tag {} for {:?} of {}",
                                v, k, name
                            )))
                        }
                    };
                    Ok((k.clone(), v))
                })
                .collect::<Result<_>>()?,
            Some(other) => {
                return Err(StructureError::decode(format!(
                    "properties of {} should be a compound, got {}",
                    name, other
                )))
            }
        };

        Ok(Self { name, properties })
    }
}

impl BlockEntry {
    fn to_nbt(&self) -> NbtCompound {
        let mut compound = NbtCompound::new();
        compound.insert("state", self.state as i32);
        compound.insert("pos", int_list(self.pos.to_array()));
        compound
    }

    fn from_nbt(compound: &NbtCompound) -> Result<Self> {
        let state = int_field(compound, "state")?;
        let state = u32::try_from(state)
            .map_err(|_| StructureError::decode(format!("negative palette index {}", state)))?;
        let pos = Position::from(int_triple(compound, "pos")?);
        Ok(Self { pos, state })
    }
}

impl Structure {
    pub fn to_nbt(&self) -> NbtCompound {
        let mut root = NbtCompound::new();
        root.insert("author", self.author.clone());
        root.insert("version", self.version);
        root.insert(
            "size",
            int_list([
                self.size[0] as i32,
                self.size[1] as i32,
                self.size[2] as i32,
            ]),
        );

        let palette: NbtList = self
            .palette
            .iter()
            .map(|p| NbtTag::Compound(p.to_nbt()))
            .collect();
        root.insert("palette", palette);

        let blocks: NbtList = self
            .blocks
            .iter()
            .map(|b| NbtTag::Compound(b.to_nbt()))
            .collect();
        root.insert("blocks", blocks);

        root.insert("entities", NbtList::new());

        root
    }

    /// Decode a structure from its root compound. Either every field decodes and every invariant
    /// holds, or nothing is returned.
    pub fn from_nbt(root: &NbtCompound) -> Result<Self> {
        let author = match field(root, "author")? {
            NbtTag::String(s) => s.clone(),
            other => {
                return Err(StructureError::decode(format!(
                    "field \"author\" should be a string, got {}",
                    other
                )))
            }
        };
        let version = int_field(root, "version")?;

        let [sx, sy, sz] = int_triple(root, "size")?;
        let to_extent = |v: i32| {
            u32::try_from(v)
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| StructureError::decode(format!("invalid size component {}", v)))
        };
        let size = [to_extent(sx)?, to_extent(sy)?, to_extent(sz)?];

        let palette = compounds(list_field(root, "palette")?, "palette")
            .map(|c| PaletteItem::from_nbt(c?))
            .collect::<Result<Vec<_>>>()?;

        let blocks = compounds(list_field(root, "blocks")?, "blocks")
            .map(|c| BlockEntry::from_nbt(c?))
            .collect::<Result<Vec<_>>>()?;

        if let Some(NbtTag::List(entities)) = root.inner().get("entities") {
            if !entities.is_empty() {
                warn!("Ignoring {} entities, entities are not supported", entities.len());
            }
        }

        let structure =
            Structure::from_parts(author, version, size, palette, blocks).map_err(|e| match e {
                StructureError::InvalidArgument(msg) => StructureError::Decode(msg),
                other => other,
            })?;

        debug!(
            "Decoded {} with {} palette entries and {} blocks",
            structure,
            structure.palette.len(),
            structure.blocks.len()
        );
        Ok(structure)
    }

    /// Write the structure as gzip-compressed NBT.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_nbt(writer, None, &self.to_nbt(), Flavor::GzCompressed)?;
        Ok(())
    }

    /// Read a structure from gzip-compressed NBT.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let (root, _) = read_nbt(reader, Flavor::GzCompressed)?;
        Self::from_nbt(&root)
    }

    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read_from(&mut reader)
    }
}
