use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::{BlockState, BlockStorage, BlockTypeIndex};

impl Serialize for BlockState {
    fn serialize<S>(&self, s: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        let has_properties = !self.properties.is_empty();
        let mut map = s.serialize_map(Some(1 + has_properties as usize))?;
        map.serialize_entry("name", &self.name)?;
        if has_properties {
            map.serialize_entry("properties", &self.properties)?;
        }

        map.end()
    }
}

impl Serialize for BlockStorage {
    fn serialize<S>(&self, s: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        let mut map = s.serialize_map(Some(3))?;

        map.serialize_entry("extents", &ArrayAsExtentsMapWrapper(&self.extents))?;
        map.serialize_entry("palette", &self.palette)?;
        map.serialize_entry("blocks", &BlockIndexSynth(&self.blocks))?;

        map.end()
    }
}

/// Dump a 3-entry u32 slice as x/y/z map
pub(crate) struct ArrayAsExtentsMapWrapper<'a>(pub(crate) &'a [u32; 3]);

impl<'a> Serialize for ArrayAsExtentsMapWrapper<'a> {
    fn serialize<S>(&self, s: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        let mut map = s.serialize_map(Some(3))?;
        map.serialize_entry("x", &self.0[0])?;
        map.serialize_entry("y", &self.0[1])?;
        map.serialize_entry("z", &self.0[2])?;
        map.end()
    }
}

/// Dump the dense index list as individual objects
struct BlockIndexSynth<'a>(&'a [BlockTypeIndex]);

impl<'a> Serialize for BlockIndexSynth<'a> {
    fn serialize<S>(&self, s: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        let mut seq = s.serialize_seq(Some(self.0.len()))?;

        for item in self.0 {
            seq.serialize_element(&BlockIndexEntrySynth(item))?;
        }

        seq.end()
    }
}

struct BlockIndexEntrySynth<'a>(&'a BlockTypeIndex);

impl<'a> Serialize for BlockIndexEntrySynth<'a> {
    fn serialize<S>(&self, s: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        let mut map = s.serialize_map(Some(1))?;
        map.serialize_entry("pi", &(self.0).0)?;
        map.end()
    }
}
