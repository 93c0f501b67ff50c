//! Writer/reader round-trip coverage across every operand arity shape.

use dexmorph_core::reader::read_insns;
use dexmorph_core::writer::encode_insn;
use dexmorph_core::{CodeOutput, CollectingVisitor, DecodedInsn, InsnFields, opcode};

fn with_index(op: u8, index: u32) -> InsnFields {
    InsnFields {
        index,
        ..InsnFields::plain(op)
    }
}

fn with_target(op: u8, target: i32) -> InsnFields {
    InsnFields {
        target,
        ..InsnFields::plain(op)
    }
}

fn with_literal(op: u8, literal: i64) -> InsnFields {
    InsnFields {
        literal,
        ..InsnFields::plain(op)
    }
}

/// One instruction per format, operands chosen to exercise field widths and
/// sign extension.
fn sample_method_body() -> Vec<DecodedInsn> {
    use DecodedInsn::*;
    vec![
        // nop (10x)
        ZeroRegister {
            fields: InsnFields::plain(opcode::NOP),
        },
        // move v1, v2 (12x)
        TwoRegister {
            fields: InsnFields::plain(opcode::MOVE),
            a: 1,
            b: 2,
        },
        // const/4 v3, #-8 (11n)
        OneRegister {
            fields: with_literal(opcode::CONST_4, -8),
            a: 3,
        },
        // move-result v255 (11x)
        OneRegister {
            fields: InsnFields::plain(opcode::MOVE_RESULT),
            a: 255,
        },
        // goto -2 (10t)
        ZeroRegister {
            fields: with_target(opcode::GOTO, -2),
        },
        // goto/16 +300 (20t)
        ZeroRegister {
            fields: with_target(opcode::GOTO_16, 300),
        },
        // move/from16 v18, v40000 (22x)
        TwoRegister {
            fields: InsnFields::plain(0x02),
            a: 18,
            b: 40_000,
        },
        // if-eqz v5, -10 (21t)
        OneRegister {
            fields: with_target(opcode::IF_EQZ, -10),
            a: 5,
        },
        // const/16 v6, #-32768 (21s)
        OneRegister {
            fields: with_literal(opcode::CONST_16, -32_768),
            a: 6,
        },
        // const/high16 v7, #0x7fff0000 (21h)
        OneRegister {
            fields: with_literal(opcode::CONST_HIGH16, 0x7fff_0000),
            a: 7,
        },
        // const-wide/high16 v8, #i64 top half (21h wide)
        OneRegister {
            fields: with_literal(opcode::CONST_WIDE_HIGH16, -(1i64 << 48)),
            a: 8,
        },
        // const-string v0, string@65535 (21c at the compact bound)
        OneRegister {
            fields: with_index(opcode::CONST_STRING, 0xffff),
            a: 0,
        },
        // add-int v1, v2, v3 (23x)
        ThreeRegister {
            fields: InsnFields::plain(0x90),
            a: 1,
            b: 2,
            c: 3,
        },
        // add-int/lit8 v1, v2, #-5 (22b)
        TwoRegister {
            fields: with_literal(0xd8, -5),
            a: 1,
            b: 2,
        },
        // if-eq v1, v2, +40 (22t)
        TwoRegister {
            fields: with_target(opcode::IF_EQ, 40),
            a: 1,
            b: 2,
        },
        // add-int/lit16 v1, v2, #100 (22s)
        TwoRegister {
            fields: with_literal(0xd0, 100),
            a: 1,
            b: 2,
        },
        // iget v1, v2, field@7 (22c)
        TwoRegister {
            fields: with_index(opcode::IGET, 7),
            a: 1,
            b: 2,
        },
        // goto/32 +100000 (30t)
        ZeroRegister {
            fields: with_target(opcode::GOTO_32, 100_000),
        },
        // move/16 v4660, v22136 (32x)
        TwoRegister {
            fields: InsnFields::plain(0x03),
            a: 4660,
            b: 22_136,
        },
        // const v1, #-100000 (31i)
        OneRegister {
            fields: with_literal(opcode::CONST, -100_000),
            a: 1,
        },
        // packed-switch v2, +8 (31t)
        OneRegister {
            fields: with_target(opcode::PACKED_SWITCH, 8),
            a: 2,
        },
        // const-string/jumbo v1, string@0x12345678 (31c)
        OneRegister {
            fields: with_index(opcode::CONST_STRING_JUMBO, 0x1234_5678),
            a: 1,
        },
        // invoke-static {v1..v5}, method@9 (35c, full list)
        FiveRegister {
            fields: with_index(opcode::INVOKE_STATIC, 9),
            a: 1,
            b: 2,
            c: 3,
            d: 4,
            e: 5,
        },
        // invoke-virtual {v1, v2, v3}, method@2 (35c, partial list)
        ThreeRegister {
            fields: with_index(opcode::INVOKE_VIRTUAL, 2),
            a: 1,
            b: 2,
            c: 3,
        },
        // invoke-virtual/range {v10..v14}, method@3 (3rc)
        RegisterRange {
            fields: with_index(opcode::INVOKE_VIRTUAL_RANGE, 3),
            first: 10,
            count: 5,
        },
        // const-wide v2, #literal64 (51l)
        OneRegister {
            fields: with_literal(opcode::CONST_WIDE, -0x1122_3344_5566_7788),
            a: 2,
        },
        PackedSwitchPayload {
            first_key: -3,
            targets: vec![10, -20, 30],
        },
        SparseSwitchPayload {
            keys: vec![-100, 0, 77],
            targets: vec![5, 6, 7],
        },
        FillArrayDataPayload {
            element_width: 4,
            data: vec![1, 2, 3, 4, 5, 6, 7, 8],
        },
    ]
}

#[test]
fn every_shape_round_trips_through_writer_and_reader() {
    let insns = sample_method_body();

    let mut out = CodeOutput::with_capacity(64);
    for insn in &insns {
        encode_insn(&mut out, insn).expect("encode");
    }
    let units = out.into_units();

    let mut collector = CollectingVisitor::default();
    read_insns(&units, &mut collector).expect("decode");

    assert_eq!(collector.insns, insns);
}

#[test]
fn encoded_size_matches_code_units_accessor() {
    for insn in sample_method_body() {
        let mut out = CodeOutput::with_capacity(16);
        encode_insn(&mut out, &insn).expect("encode");
        assert_eq!(
            out.into_units().len(),
            insn.code_units(),
            "size mismatch for {insn}"
        );
    }
}

#[test]
fn byte_and_unit_views_agree() {
    let mut out = CodeOutput::with_capacity(8);
    for insn in sample_method_body().iter().take(6) {
        encode_insn(&mut out, insn).expect("encode");
    }
    let units = out.into_units();
    let bytes = dexmorph_core::code_units_to_bytes(&units);
    assert_eq!(
        dexmorph_core::code_units_from_bytes(&bytes).expect("convert"),
        units
    );
    assert_eq!(hex::decode(dexmorph_core::code_units_to_hex(&units)).unwrap(), bytes);
}
