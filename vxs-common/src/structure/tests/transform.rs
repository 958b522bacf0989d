use anyhow::Result;

use super::*;

/// One block in every cell of an `sx` x 1 x `sz` footprint.
fn filled(sx: u32, sz: u32) -> Result<Structure> {
    let mut blocks = Vec::new();
    for x in 0..sx as i32 {
        for z in 0..sz as i32 {
            blocks.push(BlockEntry::new(Position::new(x, 0, z), 0));
        }
    }
    Ok(Structure::from_parts(
        "mo",
        1,
        [sx, 1, sz],
        vec![PaletteItem::new("minecraft:stone")],
        blocks,
    )?)
}

fn single(size: [u32; 3], pos: [i32; 3], item: PaletteItem) -> Result<Structure> {
    Ok(Structure::from_parts(
        "mo",
        1,
        size,
        vec![item],
        vec![BlockEntry::new(Position::from(pos), 0)],
    )?)
}

#[test]
fn rotation_parses_degrees() {
    assert_eq!(Rotation::from_degrees(0), Some(Rotation::None));
    assert_eq!(Rotation::from_degrees(90), Some(Rotation::Clockwise90));
    assert_eq!(Rotation::from_degrees(540), Some(Rotation::Clockwise180));
    assert_eq!(Rotation::from_degrees(-90), Some(Rotation::Clockwise270));
    assert_eq!(Rotation::from_degrees(45), None);
    assert_eq!(Rotation::Clockwise90.inverse(), Rotation::Clockwise270);
    assert_eq!(Rotation::Clockwise180.inverse(), Rotation::Clockwise180);
    assert_eq!(Rotation::Clockwise270.degrees(), 270);
    assert_eq!(Mirror::from_name("x"), Some(Mirror::AcrossX));
    assert_eq!(Mirror::from_name("y"), None);
}

#[test]
fn zero_rotation_is_identity() {
    let s = sample();

    let r = s.rotate(Rotation::None);

    assert_eq!(r.blocks(), s.blocks());
    assert_eq!(r, s);
}

#[test]
fn quarter_turn_moves_corners_clockwise() -> Result<()> {
    let s = single([3, 1, 3], [0, 0, 0], PaletteItem::new("minecraft:stone"))?;

    let r = s.rotate(Rotation::Clockwise90);
    assert_eq!(positions(&r), vec![Position::new(2, 0, 0)]);

    let r = s.rotate(Rotation::Clockwise180);
    assert_eq!(positions(&r), vec![Position::new(2, 0, 2)]);

    let r = s.rotate(Rotation::Clockwise270);
    assert_eq!(positions(&r), vec![Position::new(0, 0, 2)]);

    Ok(())
}

#[test]
fn rotation_leaves_y_alone() -> Result<()> {
    let s = single([2, 5, 2], [0, 4, 1], PaletteItem::new("minecraft:stone"))?;

    let r = s.rotate(Rotation::Clockwise90);

    assert_eq!(positions(&r), vec![Position::new(0, 4, 0)]);

    Ok(())
}

#[test]
fn square_footprints_rotate_in_place() -> Result<()> {
    for n in [1, 2, 3, 4, 7] {
        let s = filled(n, n)?;
        for rotation in [
            Rotation::Clockwise90,
            Rotation::Clockwise180,
            Rotation::Clockwise270,
        ] {
            assert_eq!(
                positions(&s.rotate(rotation)),
                positions(&s),
                "{}x{} by {:?}",
                n,
                n,
                rotation
            );
        }
    }

    Ok(())
}

#[test]
fn rotations_undo_each_other() -> Result<()> {
    // Footprints whose X and Z extents share a parity rotate exactly.
    for (sx, sz) in [(3, 3), (4, 2), (5, 3), (6, 8), (1, 7)] {
        let s = filled(sx, sz)?;

        let there_and_back = s
            .rotate(Rotation::Clockwise90)
            .rotate(Rotation::Clockwise270);
        assert_eq!(positions(&there_and_back), positions(&s), "{}x{}", sx, sz);

        let full_turn = s
            .rotate(Rotation::Clockwise90)
            .rotate(Rotation::Clockwise90)
            .rotate(Rotation::Clockwise90)
            .rotate(Rotation::Clockwise90);
        assert_eq!(positions(&full_turn), positions(&s), "{}x{}", sx, sz);

        let half = s.rotate(Rotation::Clockwise180);
        assert_eq!(positions(&half.rotate(Rotation::Clockwise180)), positions(&s));
    }

    Ok(())
}

#[test]
fn mismatched_parity_stays_within_a_cell() -> Result<()> {
    let s = filled(3, 2)?;

    let back = s
        .rotate(Rotation::Clockwise90)
        .rotate(Rotation::Clockwise270);

    assert_eq!(back.blocks().len(), s.blocks().len());
    for (a, b) in s.blocks().iter().zip(back.blocks()) {
        assert!((a.pos.x - b.pos.x).abs() <= 1, "{} vs {}", a.pos, b.pos);
        assert!((a.pos.z - b.pos.z).abs() <= 1, "{} vs {}", a.pos, b.pos);
        assert_eq!(a.pos.y, b.pos.y);
    }
    let mut unique = positions(&s.rotate(Rotation::Clockwise90));
    unique.dedup();
    assert_eq!(unique.len(), s.blocks().len(), "rotation merged positions");

    Ok(())
}

#[test]
fn blocks_leaving_the_size_are_counted() -> Result<()> {
    init();
    let s = filled(4, 2)?;
    assert_eq!(s.blocks_outside(), 0);

    // x' = 2 - z and z' = x - 1, so the x = 0 and x = 3 columns leave the 4x2 footprint.
    let rotated = s.rotate(Rotation::Clockwise90);
    assert_eq!(rotated.blocks_outside(), 4);
    assert!(rotated.palette_entry_at(Position::new(2, 0, 0))?.is_some());
    assert!(rotated.palette_entry_at(Position::new(1, 0, 2)).is_err());

    assert_eq!(filled(3, 3)?.rotate(Rotation::Clockwise90).blocks_outside(), 0);
    assert_eq!(s.mirror(Mirror::AcrossX).blocks_outside(), 0);

    Ok(())
}

#[test]
fn transforms_share_the_palette_and_header() {
    let s = sample();

    for t in [
        s.rotate(Rotation::Clockwise90),
        s.mirror(Mirror::AcrossZ),
        s.mirror(Mirror::None),
    ] {
        assert!(Arc::ptr_eq(&t.palette, &s.palette));
        assert_eq!(t.author(), s.author());
        assert_eq!(t.version(), s.version());
        assert_eq!(t.size(), s.size());
    }
}

#[test]
fn plain_transforms_keep_block_properties() {
    let s = sample();

    let r = s.rotate(Rotation::Clockwise90).mirror(Mirror::AcrossX);

    assert_eq!(r.palette(), s.palette());
    assert_eq!(r.palette()[1].properties["facing"], "north");
    // The input structure is left as it was.
    assert_eq!(s.blocks()[1].pos, Position::new(3, 1, 0));
}

#[test]
fn mirroring_reflects_one_axis() -> Result<()> {
    let s = single([4, 2, 5], [0, 1, 1], PaletteItem::new("minecraft:stone"))?;

    assert_eq!(
        positions(&s.mirror(Mirror::AcrossX)),
        vec![Position::new(3, 1, 1)]
    );
    assert_eq!(
        positions(&s.mirror(Mirror::AcrossZ)),
        vec![Position::new(0, 1, 3)]
    );
    assert_eq!(positions(&s.mirror(Mirror::None)), vec![Position::new(0, 1, 1)]);

    Ok(())
}

#[test]
fn mirroring_twice_is_identity() -> Result<()> {
    for s in [sample(), filled(3, 5)?] {
        for mirror in [Mirror::AcrossX, Mirror::AcrossZ] {
            assert_eq!(s.mirror(mirror).mirror(mirror), s);
        }
        // Mirrored structures stay inside their box.
        for (pos, _) in s.mirror(Mirror::AcrossX).iter_blocks() {
            assert!(pos.in_extents(s.size()), "{} escaped", pos);
        }
    }

    Ok(())
}

#[test]
fn oriented_rotation_remaps_properties() -> Result<()> {
    let s = Structure::from_parts(
        "mo",
        1,
        [3, 1, 3],
        vec![
            PaletteItem::new("minecraft:oak_stairs")
                .with_property("facing", "north")
                .with_property("half", "top"),
            PaletteItem::new("minecraft:oak_sign").with_property("rotation", "14"),
            PaletteItem::new("minecraft:oak_log").with_property("axis", "x"),
            PaletteItem::new("minecraft:observer").with_property("facing", "up"),
        ],
        vec![
            BlockEntry::new(Position::new(0, 0, 0), 0),
            BlockEntry::new(Position::new(1, 0, 0), 1),
            BlockEntry::new(Position::new(2, 0, 0), 2),
            BlockEntry::new(Position::new(1, 0, 1), 3),
        ],
    )?;

    let r = s.rotate_oriented(Rotation::Clockwise90, &OrientationRules::default());

    assert_eq!(r.blocks(), s.rotate(Rotation::Clockwise90).blocks());
    assert_eq!(
        r.palette(),
        &[
            PaletteItem::new("minecraft:oak_stairs")
                .with_property("facing", "east")
                .with_property("half", "top"),
            PaletteItem::new("minecraft:oak_sign").with_property("rotation", "2"),
            PaletteItem::new("minecraft:oak_log").with_property("axis", "z"),
            PaletteItem::new("minecraft:observer").with_property("facing", "up"),
        ]
    );
    // The source palette is not modified.
    assert_eq!(s.palette()[0].properties["facing"], "north");

    let back = r.rotate_oriented(Rotation::Clockwise270, &OrientationRules::default());
    assert_eq!(back, s);

    Ok(())
}

#[test]
fn oriented_mirroring_remaps_properties() -> Result<()> {
    let rules = OrientationRules::default();
    let item = |facing: &str, rotation: &str| {
        PaletteItem::new("minecraft:banner")
            .with_property("facing", facing)
            .with_property("rotation", rotation)
    };
    let s = single([2, 1, 2], [0, 0, 0], item("east", "4"))?;

    let x = s.mirror_oriented(Mirror::AcrossX, &rules);
    assert_eq!(x.palette(), &[item("west", "12")]);
    assert_eq!(positions(&x), vec![Position::new(1, 0, 0)]);

    let z = s.mirror_oriented(Mirror::AcrossZ, &rules);
    assert_eq!(z.palette(), &[item("east", "4")]);

    let s = single([2, 1, 2], [0, 0, 0], item("north", "0"))?;
    let z = s.mirror_oriented(Mirror::AcrossZ, &rules);
    assert_eq!(z.palette(), &[item("south", "8")]);
    assert_eq!(z.mirror_oriented(Mirror::AcrossZ, &rules), s);

    Ok(())
}

#[test]
fn rules_can_be_scoped_to_one_block() -> Result<()> {
    let rules = OrientationRules::empty().with_rule(
        "minecraft:repeater",
        "facing",
        OrientedProperty::Facing,
    );
    let s = Structure::from_parts(
        "mo",
        1,
        [1, 1, 2],
        vec![
            PaletteItem::new("minecraft:repeater").with_property("facing", "south"),
            PaletteItem::new("minecraft:piston").with_property("facing", "south"),
        ],
        vec![
            BlockEntry::new(Position::new(0, 0, 0), 0),
            BlockEntry::new(Position::new(0, 0, 1), 1),
        ],
    )?;

    let r = s.rotate_oriented(Rotation::Clockwise180, &rules);

    assert_eq!(r.palette()[0].properties["facing"], "north");
    assert_eq!(r.palette()[1].properties["facing"], "south");
    assert_eq!(
        rules.lookup("minecraft:piston", "facing"),
        None,
        "scoped rule leaked"
    );
    assert_eq!(
        OrientationRules::default().lookup("minecraft:piston", "facing"),
        Some(OrientedProperty::Facing)
    );

    Ok(())
}

#[test]
fn transformed_structures_round_trip() -> Result<()> {
    let s = sample()
        .rotate_oriented(Rotation::Clockwise180, &OrientationRules::default())
        .mirror(Mirror::AcrossZ);

    let mut buf = Vec::new();
    s.write_to(&mut buf)?;

    assert_eq!(Structure::read_from(&mut buf.as_slice())?, s);

    Ok(())
}
