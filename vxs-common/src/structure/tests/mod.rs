use super::*;
use crate::block_storage::BlockStorage;
use crate::world::{BlockType, TypeRegistry};

mod transform;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn stone() -> BlockState {
    BlockState::new("minecraft:stone")
}

/// A storage of the given extents with the listed cells written into it.
fn world(extents: [u32; 3], cells: &[([i32; 3], BlockState)]) -> anyhow::Result<BlockStorage> {
    let mut storage = BlockStorage::new(extents[0], extents[1], extents[2])?;
    for (pos, state) in cells {
        storage.write(Position::from(*pos), state.clone())?;
    }
    Ok(storage)
}

/// Three blocks in a 4x2x4 box, one of them oriented.
fn sample() -> Structure {
    Structure::from_parts(
        "alice",
        3,
        [4, 2, 4],
        vec![
            PaletteItem::new("minecraft:stone"),
            PaletteItem::new("minecraft:oak_stairs")
                .with_property("facing", "north")
                .with_property("half", "bottom"),
        ],
        vec![
            BlockEntry::new(Position::new(0, 0, 0), 0),
            BlockEntry::new(Position::new(3, 1, 0), 1),
            BlockEntry::new(Position::new(1, 0, 2), 0),
        ],
    )
    .expect("sample structure is valid")
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register(BlockType::new("minecraft:air"))
        .register(BlockType::new("minecraft:stone"))
        .register(BlockType::new("minecraft:dirt"))
        .register(
            BlockType::new("minecraft:oak_stairs")
                .with_axis("facing", ["north", "east", "south", "west"])
                .with_axis("half", ["bottom", "top"])
                .with_item("minecraft:oak_stairs_item"),
        );
    registry
}

fn positions(s: &Structure) -> Vec<Position> {
    let mut positions: Vec<_> = s.blocks().iter().map(|b| b.pos).collect();
    positions.sort();
    positions
}
