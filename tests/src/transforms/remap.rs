//! Behavioral properties of the index-remapping transformer.

use dexmorph_core::reader::read_insns;
use dexmorph_core::{CollectingVisitor, IndexKind};
use dexmorph_transforms::{
    Error, HashIndexMap, IdentityIndexMap, InstructionTransformer,
};

/// A method body touching every reference kind plus branches, literals, and
/// a switch payload:
///
/// ```text
/// const/16 v0, #-2            13 00 fffe
/// const-string v1, string@3   1a 01 0003
/// check-cast v1, type@4       1f 01 0004
/// iget v2, v3, field@7        52 32 0007
/// invoke-virtual {v1, v2} @5  6e 20 0005 0021
/// if-eqz v0, +6               38 00 0006
/// packed-switch v0, +4        2b 00 00000004
/// packed-switch-payload       0100 0001 0000000a 00000003
/// return-void                 0e 00
/// ```
fn sample_stream() -> Vec<u16> {
    vec![
        0x0013, 0xfffe, // const/16
        0x011a, 0x0003, // const-string
        0x011f, 0x0004, // check-cast
        0x3252, 0x0007, // iget
        0x206e, 0x0005, 0x0021, // invoke-virtual
        0x0038, 0x0006, // if-eqz
        0x002b, 0x0004, 0x0000, // packed-switch
        0x0100, 0x0001, 0x000a, 0x0000, 0x0003, 0x0000, // payload
        0x000e, // return-void
    ]
}

#[test]
fn identity_table_is_byte_for_byte_identity() {
    let code = sample_stream();
    let out = InstructionTransformer::new(&IdentityIndexMap)
        .transform(&code)
        .expect("transform");
    assert_eq!(out, code);
    assert_eq!(out.len(), code.len(), "identity tables never widen");
}

#[test]
fn remapping_rewrites_only_reference_indices() {
    let mut map = HashIndexMap::new();
    map.strings.insert(3, 11);
    map.types.insert(4, 12);
    map.fields.insert(7, 13);
    map.methods.insert(5, 14);

    let code = sample_stream();
    let out = InstructionTransformer::new(&map)
        .transform(&code)
        .expect("transform");

    let mut expected = code.clone();
    expected[3] = 11; // const-string index unit
    expected[5] = 12; // check-cast index unit
    expected[7] = 13; // iget index unit
    expected[9] = 14; // invoke-virtual index unit
    assert_eq!(out, expected);
}

#[test]
fn branch_targets_and_literals_survive_remapping() {
    let mut map = HashIndexMap::new();
    map.strings.insert(3, 40_000);
    map.methods.insert(5, 60_000);

    let code = sample_stream();
    let out = InstructionTransformer::new(&map)
        .transform(&code)
        .expect("transform");

    let mut before = CollectingVisitor::default();
    read_insns(&code, &mut before).expect("decode input");
    let mut after = CollectingVisitor::default();
    read_insns(&out, &mut after).expect("decode output");

    assert_eq!(before.insns.len(), after.insns.len());
    for (old, new) in before.insns.iter().zip(&after.insns) {
        let (Some(old_fields), Some(new_fields)) = (old.fields(), new.fields()) else {
            assert_eq!(old, new, "payloads pass through untouched");
            continue;
        };
        assert_eq!(old_fields.target, new_fields.target);
        assert_eq!(old_fields.literal, new_fields.literal);
        assert_eq!(old_fields.opcode, new_fields.opcode);
    }
}

#[test]
fn width_promotion_emits_jumbo_with_mapped_index() {
    let mut map = HashIndexMap::new();
    map.strings.insert(7, 0x0001_0005);

    // const/4 v0, #1; const-string v2, string@7; return-void
    let code = vec![0x1012, 0x021a, 0x0007, 0x000e];
    let out = InstructionTransformer::new(&map)
        .transform(&code)
        .expect("transform");

    // const-string/jumbo v2 with the 32-bit mapped index, one unit wider.
    assert_eq!(out, vec![0x1012, 0x021b, 0x0005, 0x0001, 0x000e]);
    assert_eq!(out.len(), code.len() + 1);

    let mut decoded = CollectingVisitor::default();
    read_insns(&out, &mut decoded).expect("decode output");
    let fields = decoded.insns[1].fields().expect("fields");
    assert_eq!(fields.index, 0x0001_0005);
    assert_eq!(fields.index_kind, IndexKind::String);
}

#[test]
fn string_load_at_compact_bound_keeps_compact_form() {
    let mut map = HashIndexMap::new();
    map.strings.insert(7, 0xffff);

    let out = InstructionTransformer::new(&map)
        .transform(&[0x021a, 0x0007])
        .expect("transform");
    assert_eq!(out, vec![0x021a, 0xffff]);
}

#[test]
fn oversized_non_string_index_fails_instead_of_truncating() {
    let mut map = HashIndexMap::new();
    map.methods.insert(5, 70_000);

    // invoke-virtual {v1, v2}, method@5: no wide form exists, and 70000 does
    // not fit the 16-bit index field, so the transform must refuse.
    let err = InstructionTransformer::new(&map)
        .transform(&[0x206e, 0x0005, 0x0021])
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Stream(dexmorph_core::Error::IndexOverflow { index: 70_000, .. })
    ));
}

#[test]
fn transform_is_reusable_across_independent_streams() {
    let mut map = HashIndexMap::new();
    map.strings.insert(1, 2);
    let transformer = InstructionTransformer::new(&map);

    let first = transformer.transform(&[0x001a, 0x0001]).expect("first");
    let second = transformer.transform(&[0x031a, 0x0005]).expect("second");
    assert_eq!(first, vec![0x001a, 0x0002]);
    assert_eq!(second, vec![0x031a, 0x0005]);
}
