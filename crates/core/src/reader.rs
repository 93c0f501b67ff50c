//! Instruction stream reader.
//!
//! Decodes a flat code-unit buffer strictly in stream order, dispatching one
//! visitor call per instruction. The decode layout of each instruction is
//! fixed by its opcode's [`InsnFormat`]; a stream that ends mid-instruction
//! or contains an opcode outside the decode table aborts with an error.

use crate::cursor::CodeInput;
use crate::insn::{DecodedInsn, InsnFields, InsnVisitor};
use crate::opcode::{
    self, IndexKind, InsnFormat, FILL_ARRAY_DATA_PAYLOAD_IDENT, PACKED_SWITCH_PAYLOAD_IDENT,
    SPARSE_SWITCH_PAYLOAD_IDENT,
};
use crate::result::{Error, Result};
use tracing::trace;

/// Decodes every instruction in `code`, dispatching each to `visitor`.
///
/// No side effects beyond visitor dispatch; a visitor error aborts the walk.
pub fn read_insns<V: InsnVisitor + ?Sized>(code: &[u16], visitor: &mut V) -> Result<()> {
    let mut input = CodeInput::new(code);
    while input.has_more() {
        let offset = input.cursor();
        let insn = decode_one(&mut input)?;
        trace!("decoded at unit {offset}: {insn}");
        visitor.visit(insn)?;
    }
    Ok(())
}

/// Decodes a single instruction at the input's cursor.
pub fn decode_one(input: &mut CodeInput<'_>) -> Result<DecodedInsn> {
    let offset = input.cursor();
    let unit = input.read()?;
    let op = (unit & 0xff) as u8;
    let high = (unit >> 8) as u8;

    // Payload pseudo-instructions hide behind a nop low byte.
    if op == opcode::NOP && (0x01..=0x03).contains(&high) {
        return decode_payload(input, high, offset);
    }

    let format = InsnFormat::of(op).ok_or(Error::UnrecognizedOpcode { opcode: op, offset })?;
    let mut fields = InsnFields {
        opcode: op,
        index: 0,
        index_kind: IndexKind::of(op),
        target: 0,
        literal: 0,
    };

    use InsnFormat::*;
    let insn = match format {
        Format10x => DecodedInsn::ZeroRegister { fields },
        Format12x => DecodedInsn::TwoRegister {
            fields,
            a: (high & 0xf) as u16,
            b: (high >> 4) as u16,
        },
        Format11n => {
            fields.literal = ((high as i8) >> 4) as i64;
            DecodedInsn::OneRegister {
                fields,
                a: (high & 0xf) as u16,
            }
        }
        Format11x => DecodedInsn::OneRegister {
            fields,
            a: high as u16,
        },
        Format10t => {
            fields.target = (high as i8) as i32;
            DecodedInsn::ZeroRegister { fields }
        }
        Format20t => {
            fields.target = input.read()? as i16 as i32;
            DecodedInsn::ZeroRegister { fields }
        }
        Format22x => DecodedInsn::TwoRegister {
            fields,
            a: high as u16,
            b: input.read()?,
        },
        Format21t => {
            fields.target = input.read()? as i16 as i32;
            DecodedInsn::OneRegister {
                fields,
                a: high as u16,
            }
        }
        Format21s => {
            fields.literal = input.read()? as i16 as i64;
            DecodedInsn::OneRegister {
                fields,
                a: high as u16,
            }
        }
        Format21h => {
            // const/high16 stores bits 16..32, const-wide/high16 bits 48..64.
            let shift = if op == opcode::CONST_HIGH16 { 16 } else { 48 };
            fields.literal = ((input.read()? as i16) as i64) << shift;
            DecodedInsn::OneRegister {
                fields,
                a: high as u16,
            }
        }
        Format21c => {
            fields.index = input.read()? as u32;
            DecodedInsn::OneRegister {
                fields,
                a: high as u16,
            }
        }
        Format23x => {
            let unit1 = input.read()?;
            DecodedInsn::ThreeRegister {
                fields,
                a: high as u16,
                b: unit1 & 0xff,
                c: unit1 >> 8,
            }
        }
        Format22b => {
            let unit1 = input.read()?;
            fields.literal = ((unit1 >> 8) as u8 as i8) as i64;
            DecodedInsn::TwoRegister {
                fields,
                a: high as u16,
                b: unit1 & 0xff,
            }
        }
        Format22t => {
            fields.target = input.read()? as i16 as i32;
            DecodedInsn::TwoRegister {
                fields,
                a: (high & 0xf) as u16,
                b: (high >> 4) as u16,
            }
        }
        Format22s => {
            fields.literal = input.read()? as i16 as i64;
            DecodedInsn::TwoRegister {
                fields,
                a: (high & 0xf) as u16,
                b: (high >> 4) as u16,
            }
        }
        Format22c => {
            fields.index = input.read()? as u32;
            DecodedInsn::TwoRegister {
                fields,
                a: (high & 0xf) as u16,
                b: (high >> 4) as u16,
            }
        }
        Format30t => {
            fields.target = input.read_i32()?;
            DecodedInsn::ZeroRegister { fields }
        }
        Format32x => DecodedInsn::TwoRegister {
            fields,
            a: input.read()?,
            b: input.read()?,
        },
        Format31i => {
            fields.literal = input.read_i32()? as i64;
            DecodedInsn::OneRegister {
                fields,
                a: high as u16,
            }
        }
        Format31t => {
            fields.target = input.read_i32()?;
            DecodedInsn::OneRegister {
                fields,
                a: high as u16,
            }
        }
        Format31c => {
            fields.index = input.read_u32()?;
            DecodedInsn::OneRegister {
                fields,
                a: high as u16,
            }
        }
        Format35c => {
            fields.index = input.read()? as u32;
            let unit2 = input.read()?;
            let g = (high & 0xf) as u16;
            let c = unit2 & 0xf;
            let d = (unit2 >> 4) & 0xf;
            let e = (unit2 >> 8) & 0xf;
            let f = unit2 >> 12;
            match high >> 4 {
                0 => DecodedInsn::ZeroRegister { fields },
                1 => DecodedInsn::OneRegister { fields, a: c },
                2 => DecodedInsn::TwoRegister { fields, a: c, b: d },
                3 => DecodedInsn::ThreeRegister {
                    fields,
                    a: c,
                    b: d,
                    c: e,
                },
                4 => DecodedInsn::FourRegister {
                    fields,
                    a: c,
                    b: d,
                    c: e,
                    d: f,
                },
                5 => DecodedInsn::FiveRegister {
                    fields,
                    a: c,
                    b: d,
                    c: e,
                    d: f,
                    e: g,
                },
                count => {
                    return Err(Error::InvalidRegisterCount {
                        count: count as u16,
                        offset,
                    });
                }
            }
        }
        Format3rc => {
            fields.index = input.read()? as u32;
            let first = input.read()?;
            DecodedInsn::RegisterRange {
                fields,
                first,
                count: high as u16,
            }
        }
        Format51l => {
            fields.literal = input.read_i64()?;
            DecodedInsn::OneRegister {
                fields,
                a: high as u16,
            }
        }
    };
    Ok(insn)
}

fn decode_payload(input: &mut CodeInput<'_>, ident: u8, offset: usize) -> Result<DecodedInsn> {
    match ident {
        PACKED_SWITCH_PAYLOAD_IDENT => {
            let size = input.read()? as usize;
            let first_key = input.read_i32()?;
            let mut targets = Vec::with_capacity(size);
            for _ in 0..size {
                targets.push(input.read_i32()?);
            }
            Ok(DecodedInsn::PackedSwitchPayload { first_key, targets })
        }
        SPARSE_SWITCH_PAYLOAD_IDENT => {
            let size = input.read()? as usize;
            let mut keys = Vec::with_capacity(size);
            for _ in 0..size {
                keys.push(input.read_i32()?);
            }
            let mut targets = Vec::with_capacity(size);
            for _ in 0..size {
                targets.push(input.read_i32()?);
            }
            Ok(DecodedInsn::SparseSwitchPayload { keys, targets })
        }
        FILL_ARRAY_DATA_PAYLOAD_IDENT => {
            let element_width = input.read()?;
            if element_width == 0 {
                return Err(Error::InvalidPayload {
                    offset,
                    msg: "fill-array-data element width is zero".into(),
                });
            }
            let size = input.read_u32()? as usize;
            let byte_len = size * element_width as usize;
            // A size field larger than the stream itself fails in the read
            // loop; don't let it drive the allocation.
            let mut data = Vec::with_capacity(byte_len.min(input.remaining() * 2));
            for _ in 0..byte_len.div_ceil(2) {
                let unit = input.read()?;
                data.push((unit & 0xff) as u8);
                data.push((unit >> 8) as u8);
            }
            data.truncate(byte_len);
            Ok(DecodedInsn::FillArrayDataPayload {
                element_width,
                data,
            })
        }
        _ => unreachable!("payload ident checked by caller"),
    }
}
