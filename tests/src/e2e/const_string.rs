//! End-to-end scenarios: hex stream in, JSON table in, hex stream out.

use dexmorph_core::{code_units_from_hex, code_units_to_hex};
use dexmorph_transforms::{HashIndexMap, IndexMap, InstructionTransformer};

#[test]
fn remaps_a_single_string_load_in_place() {
    // const-string v0, string@3
    let code = code_units_from_hex("1a000300").expect("parse input");
    let map: HashIndexMap =
        serde_json::from_str(r#"{"strings": {"3": 2}}"#).expect("parse map");

    let out = InstructionTransformer::new(&map)
        .transform(&code)
        .expect("transform");

    // Same compact opcode, same register, index 2, identical length.
    assert_eq!(code_units_to_hex(&out), "1a000200");
    assert_eq!(out.len(), code.len());
}

#[test]
fn jumbo_promotion_through_the_byte_surface() {
    // const-string v0, string@1; return-void
    let code = code_units_from_hex("1a0001000e00").expect("parse input");
    let mut map = HashIndexMap::new();
    map.strings.insert(1, 0x0001_0000);

    let out = InstructionTransformer::new(&map)
        .transform(&code)
        .expect("transform");

    // const-string/jumbo v0, string@0x10000; return-void
    assert_eq!(code_units_to_hex(&out), "1b00000001000e00");
    assert_eq!(out.len(), code.len() + 1);
}

#[test]
fn empty_stream_transforms_to_empty_stream() {
    let out = InstructionTransformer::new(&HashIndexMap::new())
        .transform(&[])
        .expect("transform");
    assert!(out.is_empty());
    assert_eq!(HashIndexMap::new().map(dexmorph_core::IndexKind::String, 5), 5);
}
