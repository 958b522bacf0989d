//! Rotation and mirroring of structures.
//!
//! Both transforms pivot on the centre of the structure's footprint: the middle of the cell range
//! `[0, size - 1]` on the X and Z axes. Y is never touched. By default only block positions move
//! and the palette is shared with the source structure. The `_oriented` variants additionally
//! remap direction-like block properties according to an [`OrientationRules`] table.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};

use super::{BlockEntry, PaletteItem, Structure};
use crate::block_storage::{Direction, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    /// Accepts any multiple of 90, negative values turn counterclockwise.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        Some(Self::from_quarter_turns(degrees.rem_euclid(360) / 90))
    }

    fn from_quarter_turns(turns: i32) -> Self {
        match turns.rem_euclid(4) {
            0 => Rotation::None,
            1 => Rotation::Clockwise90,
            2 => Rotation::Clockwise180,
            _ => Rotation::Clockwise270,
        }
    }

    pub fn quarter_turns(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 1,
            Rotation::Clockwise180 => 2,
            Rotation::Clockwise270 => 3,
        }
    }

    pub fn degrees(self) -> i32 {
        self.quarter_turns() * 90
    }

    pub fn inverse(self) -> Self {
        Self::from_quarter_turns(-self.quarter_turns())
    }

    /// Exact `(cos, sin)` of the rotation angle.
    fn cos_sin(self) -> (i64, i64) {
        match self {
            Rotation::None => (1, 0),
            Rotation::Clockwise90 => (0, 1),
            Rotation::Clockwise180 => (-1, 0),
            Rotation::Clockwise270 => (0, -1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mirror {
    None,
    /// Flip X coordinates (left/right)
    AcrossX,
    /// Flip Z coordinates (front/back)
    AcrossZ,
}

impl Mirror {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Mirror::None),
            "x" => Some(Mirror::AcrossX),
            "z" => Some(Mirror::AcrossZ),
            _ => None,
        }
    }
}

/// Halve a doubled coordinate, rounding half-cells away from zero.
fn halve(v: i64) -> i32 {
    let v = if v % 2 == 0 {
        v / 2
    } else if v > 0 {
        (v + 1) / 2
    } else {
        (v - 1) / 2
    };
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Coordinates are doubled so that the pivot at `(size - 1) / 2` stays integral.
fn rotate_position(pos: Position, size: &[u32; 3], rotation: Rotation) -> Position {
    let (cos, sin) = rotation.cos_sin();
    let px = size[0] as i64 - 1;
    let pz = size[2] as i64 - 1;

    let rx = 2 * pos.x as i64 - px;
    let rz = 2 * pos.z as i64 - pz;

    let nx = rx * cos - rz * sin;
    let nz = rz * cos + rx * sin;

    Position::new(halve(nx + px), pos.y, halve(nz + pz))
}

fn mirror_position(pos: Position, size: &[u32; 3], mirror: Mirror) -> Position {
    let flip = |c: i32, s: u32| -> i32 {
        let v = s as i64 - 1 - c as i64;
        v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    };
    match mirror {
        Mirror::None => pos,
        Mirror::AcrossX => Position::new(flip(pos.x, size[0]), pos.y, pos.z),
        Mirror::AcrossZ => Position::new(pos.x, pos.y, flip(pos.z, size[2])),
    }
}

/// How a direction-like property value responds to rotation and mirroring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrientedProperty {
    /// `north`/`east`/`south`/`west`; `up` and `down` are left alone.
    Facing,
    /// Sixteen-step rotation as used by signs and banners, 0 = south, increasing clockwise.
    Rotation16,
    /// `x`/`y`/`z` axis alignment.
    Axis,
}

impl OrientedProperty {
    fn rotate(self, value: &str, rotation: Rotation) -> Option<String> {
        let turns = rotation.quarter_turns();
        match self {
            OrientedProperty::Facing => {
                let mut d = Direction::from_name(value)?;
                for _ in 0..turns {
                    d = d.rotate_clockwise();
                }
                Some(d.name().to_owned())
            }
            OrientedProperty::Rotation16 => {
                let r: i32 = value.parse().ok().filter(|r| (0..16).contains(r))?;
                Some(((r + 4 * turns) % 16).to_string())
            }
            OrientedProperty::Axis => match (value, turns % 2) {
                ("x", 1) => Some("z".to_owned()),
                ("z", 1) => Some("x".to_owned()),
                _ => None,
            },
        }
    }

    fn mirror(self, value: &str, mirror: Mirror) -> Option<String> {
        match self {
            OrientedProperty::Facing => {
                let d = Direction::from_name(value)?;
                let d = match mirror {
                    Mirror::None => d,
                    Mirror::AcrossX => d.flip_x(),
                    Mirror::AcrossZ => d.flip_z(),
                };
                Some(d.name().to_owned())
            }
            OrientedProperty::Rotation16 => {
                let r: i32 = value.parse().ok().filter(|r| (0..16).contains(r))?;
                let r = match mirror {
                    Mirror::None => r,
                    Mirror::AcrossX => (16 - r) % 16,
                    Mirror::AcrossZ => (24 - r) % 16,
                };
                Some(r.to_string())
            }
            OrientedProperty::Axis => None,
        }
    }
}

/// Table of `(block name, property name)` pairs that carry an orientation. A block name of `"*"`
/// applies the rule to every block type that has no rule of its own for that property.
#[derive(Clone, Debug)]
pub struct OrientationRules {
    rules: HashMap<(String, String), OrientedProperty>,
}

impl Default for OrientationRules {
    /// `facing`, `rotation` and `axis` on every block type.
    fn default() -> Self {
        Self::empty()
            .with_rule("*", "facing", OrientedProperty::Facing)
            .with_rule("*", "rotation", OrientedProperty::Rotation16)
            .with_rule("*", "axis", OrientedProperty::Axis)
    }
}

impl OrientationRules {
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    pub fn with_rule(
        mut self,
        block: impl Into<String>,
        property: impl Into<String>,
        kind: OrientedProperty,
    ) -> Self {
        self.rules.insert((block.into(), property.into()), kind);
        self
    }

    pub fn lookup(&self, block: &str, property: &str) -> Option<OrientedProperty> {
        self.rules
            .get(&(block.to_owned(), property.to_owned()))
            .or_else(|| self.rules.get(&("*".to_owned(), property.to_owned())))
            .copied()
    }

    fn remap(
        &self,
        item: &PaletteItem,
        f: impl Fn(OrientedProperty, &str) -> Option<String>,
    ) -> PaletteItem {
        let mut out = item.clone();
        for (key, value) in out.properties.iter_mut() {
            let remapped = self
                .lookup(&item.name, key)
                .and_then(|kind| f(kind, value.as_str()));
            if let Some(new_value) = remapped {
                *value = new_value;
            }
        }
        out
    }

    pub fn rotate_item(&self, item: &PaletteItem, rotation: Rotation) -> PaletteItem {
        self.remap(item, |kind, value| kind.rotate(value, rotation))
    }

    pub fn mirror_item(&self, item: &PaletteItem, mirror: Mirror) -> PaletteItem {
        self.remap(item, |kind, value| kind.mirror(value, mirror))
    }
}

impl Structure {
    fn map_positions(&self, f: impl Fn(Position) -> Position) -> Arc<Vec<BlockEntry>> {
        Arc::new(
            self.blocks
                .iter()
                .map(|b| BlockEntry::new(f(b.pos), b.state))
                .collect(),
        )
    }

    /// Rotate block positions about the vertical axis. Block properties are not touched.
    pub fn rotate(&self, rotation: Rotation) -> Structure {
        if rotation == Rotation::None {
            return self.derive(Arc::clone(&self.palette), Arc::clone(&self.blocks));
        }
        let size = self.size;
        let blocks = self.map_positions(|p| rotate_position(p, &size, rotation));
        debug!("Rotated {} by {} degrees", self, rotation.degrees());
        let rotated = self.derive(Arc::clone(&self.palette), blocks);

        let outside = rotated.blocks_outside();
        if outside > 0 {
            warn!(
                "Rotating {} by {} degrees moved {} blocks outside its size, they will not be loaded",
                self,
                rotation.degrees(),
                outside
            );
        }
        rotated
    }

    /// Mirror block positions. Block properties are not touched.
    pub fn mirror(&self, mirror: Mirror) -> Structure {
        if mirror == Mirror::None {
            return self.derive(Arc::clone(&self.palette), Arc::clone(&self.blocks));
        }
        let size = self.size;
        let blocks = self.map_positions(|p| mirror_position(p, &size, mirror));
        debug!("Mirrored {} {:?}", self, mirror);
        self.derive(Arc::clone(&self.palette), blocks)
    }

    /// Like [`Structure::rotate`], and also rotates every property `rules` marks as oriented.
    pub fn rotate_oriented(&self, rotation: Rotation, rules: &OrientationRules) -> Structure {
        let rotated = self.rotate(rotation);
        if rotation == Rotation::None {
            return rotated;
        }
        let palette = self
            .palette
            .iter()
            .map(|item| rules.rotate_item(item, rotation))
            .collect();
        rotated.derive(Arc::new(palette), Arc::clone(&rotated.blocks))
    }

    /// Like [`Structure::mirror`], and also mirrors every property `rules` marks as oriented.
    pub fn mirror_oriented(&self, mirror: Mirror, rules: &OrientationRules) -> Structure {
        let mirrored = self.mirror(mirror);
        if mirror == Mirror::None {
            return mirrored;
        }
        let palette = self
            .palette
            .iter()
            .map(|item| rules.mirror_item(item, mirror))
            .collect();
        mirrored.derive(Arc::new(palette), Arc::clone(&mirrored.blocks))
    }
}
