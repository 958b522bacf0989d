//! The boundary with a live world. Capture reads through [`WorldReader`], re-materialization writes
//! through [`WorldWriter`], and palette items are turned back into concrete states against a
//! [`BlockRegistry`].

use std::collections::{BTreeMap, HashMap};
use std::io::Read;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::block_storage::{BlockState, Position};
use crate::error::{Result, StructureError};
use crate::structure::PaletteItem;
use crate::{STRUCTURE_BLOCK, STRUCTURE_VOID};

pub trait WorldReader {
    /// Read the block at an absolute world position.
    fn read(&self, pos: Position) -> Result<BlockState>;

    /// Whether a block should be left out of a capture entirely. Excluded positions are simply
    /// absent from the captured structure, which leaves the destination untouched on load.
    fn is_capture_excluded(&self, state: &BlockState) -> bool {
        state.name == STRUCTURE_VOID || state.name == STRUCTURE_BLOCK
    }
}

pub trait WorldWriter {
    /// Replace the block at an absolute world position.
    fn write(&mut self, pos: Position, state: BlockState) -> Result<()>;
}

pub trait BlockRegistry {
    fn resolve(&self, name: &str) -> Result<&BlockType>;
}

/// A block type known to the destination type system.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockType {
    pub name: String,
    /// Valid configuration axes and the values each accepts. The first value is the default.
    #[serde(default)]
    pub properties: BTreeMap<String, Vec<String>>,
    /// Item this block is represented by, when it differs from the block name.
    #[serde(default)]
    pub item: Option<String>,
}

impl BlockType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_axis<I, V>(mut self, axis: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.properties
            .insert(axis.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub fn default_state(&self) -> BlockState {
        BlockState {
            name: self.name.clone(),
            properties: self
                .properties
                .iter()
                .filter_map(|(axis, values)| Some((axis.clone(), values.first()?.clone())))
                .collect(),
        }
    }

    /// `None` if `axis` is not one of this type's axes, otherwise whether `value` is valid for it.
    pub fn accepts(&self, axis: &str, value: &str) -> Option<bool> {
        self.properties
            .get(axis)
            .map(|values| values.iter().any(|v| v == value))
    }

    pub fn item_name(&self) -> &str {
        self.item.as_deref().unwrap_or(&self.name)
    }
}

/// A plain name-keyed [`BlockRegistry`].
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, BlockType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, ty: BlockType) -> &mut Self {
        self.types.insert(ty.name.clone(), ty);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Load a registry from a JSON array of block types.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let types: Vec<BlockType> = serde_json::from_reader(reader)
            .map_err(|e| StructureError::decode(format!("Invalid block type registry: {}", e)))?;

        let mut registry = Self::new();
        for ty in types {
            registry.register(ty);
        }
        Ok(registry)
    }

    /// Build a registry that accepts exactly the configurations present in `palette`.
    pub fn infer_from(palette: &[PaletteItem]) -> Self {
        let mut registry = Self::new();
        for item in palette {
            let ty = registry
                .types
                .entry(item.name.clone())
                .or_insert_with(|| BlockType::new(item.name.clone()));
            for (axis, value) in &item.properties {
                let values = ty.properties.entry(axis.clone()).or_default();
                if !values.contains(value) {
                    values.push(value.clone());
                }
            }
        }
        debug!(
            "Inferred {} block types from {} palette entries",
            registry.len(),
            palette.len()
        );
        registry
    }
}

impl BlockRegistry for TypeRegistry {
    fn resolve(&self, name: &str) -> Result<&BlockType> {
        self.types
            .get(name)
            .ok_or_else(|| StructureError::Resolution {
                name: name.to_owned(),
                reason: "unknown block type".to_owned(),
            })
    }
}
