use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::{BlockEntry, PaletteItem, Structure};
use crate::block_storage::serialization::ArrayAsExtentsMapWrapper;

impl Serialize for PaletteItem {
    fn serialize<S>(&self, s: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        let mut map = s.serialize_map(Some(2))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("properties", &self.properties)?;
        map.end()
    }
}

impl Serialize for BlockEntry {
    fn serialize<S>(&self, s: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        let mut map = s.serialize_map(Some(2))?;
        map.serialize_entry("state", &self.state)?;
        map.serialize_entry("pos", &self.pos.to_array())?;
        map.end()
    }
}

impl Serialize for Structure {
    fn serialize<S>(&self, s: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        let mut map = s.serialize_map(Some(5))?;

        map.serialize_entry("author", &self.author)?;
        map.serialize_entry("version", &self.version)?;
        map.serialize_entry("size", &ArrayAsExtentsMapWrapper(&self.size))?;
        map.serialize_entry("palette", self.palette.as_slice())?;
        map.serialize_entry("blocks", self.blocks.as_slice())?;

        map.end()
    }
}
