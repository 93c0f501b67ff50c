//! Instruction stream writer.
//!
//! Re-encodes visited instruction events into a [`CodeOutput`], each per its
//! opcode's format. The writer validates only what the binary layout forces
//! on it: an index that no longer fits its field width is surfaced as an
//! error rather than truncated, since silent truncation would corrupt the
//! program. Everything else is the upstream visitor's responsibility.

use crate::cursor::CodeOutput;
use crate::insn::{DecodedInsn, InsnVisitor};
use crate::opcode::{
    self, InsnFormat, FILL_ARRAY_DATA_PAYLOAD_IDENT, PACKED_SWITCH_PAYLOAD_IDENT,
    SPARSE_SWITCH_PAYLOAD_IDENT,
};
use crate::result::{Error, Result};

/// Visitor that encodes each instruction into an output buffer.
#[derive(Debug)]
pub struct InsnWriter<'a> {
    out: &'a mut CodeOutput,
}

impl<'a> InsnWriter<'a> {
    /// Creates a writer appending to `out`.
    pub fn new(out: &'a mut CodeOutput) -> Self {
        InsnWriter { out }
    }
}

impl InsnVisitor for InsnWriter<'_> {
    fn visit(&mut self, insn: DecodedInsn) -> Result<()> {
        encode_insn(self.out, &insn)
    }
}

/// First code unit: opcode in the low byte, `high` above it.
fn unit0(opcode: u8, high: u8) -> u16 {
    opcode as u16 | ((high as u16) << 8)
}

/// Packs two register nibbles into a byte, `a` low.
fn nibbles(a: u16, b: u16) -> u8 {
    ((a & 0xf) | ((b & 0xf) << 4)) as u8
}

/// 16-bit index field, failing instead of truncating an oversized index.
fn index_unit(opcode: u8, index: u32) -> Result<u16> {
    u16::try_from(index).map_err(|_| Error::IndexOverflow { opcode, index })
}

/// Encodes one instruction into `out`.
pub fn encode_insn(out: &mut CodeOutput, insn: &DecodedInsn) -> Result<()> {
    match insn {
        DecodedInsn::PackedSwitchPayload { first_key, targets } => {
            out.write(unit0(opcode::NOP, PACKED_SWITCH_PAYLOAD_IDENT));
            out.write(targets.len() as u16);
            out.write_i32(*first_key);
            for target in targets {
                out.write_i32(*target);
            }
            return Ok(());
        }
        DecodedInsn::SparseSwitchPayload { keys, targets } => {
            out.write(unit0(opcode::NOP, SPARSE_SWITCH_PAYLOAD_IDENT));
            out.write(keys.len() as u16);
            for key in keys {
                out.write_i32(*key);
            }
            for target in targets {
                out.write_i32(*target);
            }
            return Ok(());
        }
        DecodedInsn::FillArrayDataPayload {
            element_width,
            data,
        } => {
            if *element_width == 0 {
                return Err(Error::InvalidPayload {
                    offset: out.cursor(),
                    msg: "fill-array-data element width is zero".into(),
                });
            }
            out.write(unit0(opcode::NOP, FILL_ARRAY_DATA_PAYLOAD_IDENT));
            out.write(*element_width);
            out.write_u32((data.len() / *element_width as usize) as u32);
            for pair in data.chunks(2) {
                let low = pair[0] as u16;
                let high = pair.get(1).map_or(0, |b| *b as u16);
                out.write(low | (high << 8));
            }
            return Ok(());
        }
        _ => {}
    }

    let fields = insn.fields().expect("register shape has fields");
    let op = fields.opcode;
    let format = InsnFormat::of(op).ok_or(Error::UnrecognizedOpcode {
        opcode: op,
        offset: out.cursor(),
    })?;

    use InsnFormat::*;
    match format {
        Format10x => out.write(unit0(op, 0)),
        Format12x => out.write(unit0(op, nibbles(insn.a(), insn.b()))),
        Format11n => out.write(unit0(op, nibbles(insn.a(), fields.literal as u16))),
        Format11x => out.write(unit0(op, insn.a() as u8)),
        Format10t => out.write(unit0(op, fields.target as u8)),
        Format20t => {
            out.write(unit0(op, 0));
            out.write(fields.target as u16);
        }
        Format22x => {
            out.write(unit0(op, insn.a() as u8));
            out.write(insn.b());
        }
        Format21t => {
            out.write(unit0(op, insn.a() as u8));
            out.write(fields.target as u16);
        }
        Format21s => {
            out.write(unit0(op, insn.a() as u8));
            out.write(fields.literal as u16);
        }
        Format21h => {
            let shift = if op == opcode::CONST_HIGH16 { 16 } else { 48 };
            out.write(unit0(op, insn.a() as u8));
            out.write((fields.literal >> shift) as u16);
        }
        Format21c => {
            out.write(unit0(op, insn.a() as u8));
            out.write(index_unit(op, fields.index)?);
        }
        Format23x => {
            out.write(unit0(op, insn.a() as u8));
            out.write((insn.b() & 0xff) | ((insn.c() & 0xff) << 8));
        }
        Format22b => {
            out.write(unit0(op, insn.a() as u8));
            out.write((insn.b() & 0xff) | ((fields.literal as u16 & 0xff) << 8));
        }
        Format22t => {
            out.write(unit0(op, nibbles(insn.a(), insn.b())));
            out.write(fields.target as u16);
        }
        Format22s => {
            out.write(unit0(op, nibbles(insn.a(), insn.b())));
            out.write(fields.literal as u16);
        }
        Format22c => {
            out.write(unit0(op, nibbles(insn.a(), insn.b())));
            out.write(index_unit(op, fields.index)?);
        }
        Format30t => {
            out.write(unit0(op, 0));
            out.write_i32(fields.target);
        }
        Format32x => {
            out.write(unit0(op, 0));
            out.write(insn.a());
            out.write(insn.b());
        }
        Format31i => {
            out.write(unit0(op, insn.a() as u8));
            out.write_i32(fields.literal as i32);
        }
        Format31t => {
            out.write(unit0(op, insn.a() as u8));
            out.write_i32(fields.target);
        }
        Format31c => {
            out.write(unit0(op, insn.a() as u8));
            out.write_u32(fields.index);
        }
        Format35c => {
            let count = insn.reg_count();
            out.write(unit0(op, nibbles(insn.e(), count)));
            out.write(index_unit(op, fields.index)?);
            out.write(
                (insn.a() & 0xf)
                    | ((insn.b() & 0xf) << 4)
                    | ((insn.c() & 0xf) << 8)
                    | ((insn.d() & 0xf) << 12),
            );
        }
        Format3rc => {
            out.write(unit0(op, insn.reg_count() as u8));
            out.write(index_unit(op, fields.index)?);
            out.write(insn.a());
        }
        Format51l => {
            out.write(unit0(op, insn.a() as u8));
            out.write_i64(fields.literal);
        }
    }
    Ok(())
}
