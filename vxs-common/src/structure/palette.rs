use std::collections::BTreeMap;

use log::{trace, warn};

use crate::block_storage::BlockState;
use crate::error::Result;
use crate::world::BlockRegistry;

/// Connection flags collapsed to `"false"` on capture so that blocks differing only in how they
/// connect to their neighbours share a palette entry.
pub const CONNECTION_FLAGS: [&str; 4] = ["north", "south", "east", "west"];

/// One distinct block configuration in a structure's palette.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaletteItem {
    pub name: String,
    pub properties: BTreeMap<String, String>,
}

impl PaletteItem {
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

    /// Describe a live block, normalizing its connection flags.
    pub fn from_block_state(state: &BlockState) -> Self {
        let mut properties = state.properties.clone();
        for flag in CONNECTION_FLAGS {
            if let Some(v) = properties.get_mut(flag) {
                *v = "false".to_owned();
            }
        }

        Self {
            name: state.name.clone(),
            properties,
        }
    }

    /// Turn this item back into a concrete block state for the destination type system.
    ///
    /// Starts from the type's default state and applies every stored property that names one of
    /// the type's axes. Unknown properties are ignored, as are values the axis does not accept.
    pub fn to_block_state(&self, registry: &dyn BlockRegistry) -> Result<BlockState> {
        let ty = registry.resolve(&self.name)?;
        let mut state = ty.default_state();

        for (key, value) in &self.properties {
            match ty.accepts(key, value) {
                Some(true) => {
                    state.properties.insert(key.clone(), value.clone());
                }
                Some(false) => warn!(
                    "Ignoring value {:?} for property {:?} of {}: not accepted by the block type",
                    value, key, self.name
                ),
                None => trace!("{} has no property {:?}, skipping", self.name, key),
            }
        }

        Ok(state)
    }
}

/// The deduplicating index used while a palette is being built.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    items: Vec<PaletteItem>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the index of `item`, appending it if it is not present yet. The returned flag is true
    /// when the item was newly inserted.
    pub fn index_of(&mut self, item: PaletteItem) -> (u32, bool) {
        // Linear scan, distinct configurations are few compared to captured blocks.
        if let Some(i) = self.items.iter().position(|existing| existing == &item) {
            return (i as u32, false);
        }
        let iidx = self.items.len();
        self.items.push(item);
        (iidx as u32, true)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<PaletteItem> {
        self.items
    }
}
