//! Decoded instruction model.
//!
//! An instruction decodes into a [`DecodedInsn`] variant chosen by its
//! operand arity shape (how many register operands it carries), not by its
//! raw encoding format. A `filled-new-array` or `invoke-kind` instruction
//! (format 35c) lands on the zero- through five-register variant matching
//! its actual register count; the writer recovers the encoding format from
//! the opcode. Events are transient: the reader creates one per instruction
//! and hands it to a visitor, which consumes it.

use crate::opcode::{IndexKind, InsnFormat};
use crate::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operand fields shared by every register-bearing instruction shape.
///
/// Mirrors the flat operand model of the dex encoding: every instruction has
/// an index, a branch target, and a literal slot, with the opcode's format
/// deciding which of them are meaningful. `target` is the raw branch offset
/// in code units, relative to the start of the instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsnFields {
    /// Raw opcode byte.
    pub opcode: u8,
    /// Constant-pool index operand, if the opcode carries one.
    pub index: u32,
    /// What `index` refers to; `IndexKind::None` when the opcode has no index.
    pub index_kind: IndexKind,
    /// Relative branch offset in code units, if the opcode carries one.
    pub target: i32,
    /// Embedded numeric literal, if the opcode carries one.
    pub literal: i64,
}

impl InsnFields {
    /// Builds the fields for an opcode with no index, target, or literal.
    pub fn plain(opcode: u8) -> Self {
        InsnFields {
            opcode,
            index: 0,
            index_kind: IndexKind::of(opcode),
            target: 0,
            literal: 0,
        }
    }
}

/// One decoded instruction, tagged by operand arity shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DecodedInsn {
    /// No register operands (10x, 10t, 20t, 30t, and empty 35c lists).
    ZeroRegister { fields: InsnFields },
    /// One register operand.
    OneRegister { fields: InsnFields, a: u16 },
    /// Two register operands.
    TwoRegister { fields: InsnFields, a: u16, b: u16 },
    /// Three register operands (23x and three-argument 35c lists).
    ThreeRegister {
        fields: InsnFields,
        a: u16,
        b: u16,
        c: u16,
    },
    /// Four register operands (four-argument 35c lists).
    FourRegister {
        fields: InsnFields,
        a: u16,
        b: u16,
        c: u16,
        d: u16,
    },
    /// Five register operands (full 35c lists).
    FiveRegister {
        fields: InsnFields,
        a: u16,
        b: u16,
        c: u16,
        d: u16,
        e: u16,
    },
    /// Contiguous register range `first .. first + count` (3rc).
    RegisterRange {
        fields: InsnFields,
        first: u16,
        count: u16,
    },
    /// packed-switch-payload pseudo-instruction.
    PackedSwitchPayload { first_key: i32, targets: Vec<i32> },
    /// sparse-switch-payload pseudo-instruction.
    SparseSwitchPayload { keys: Vec<i32>, targets: Vec<i32> },
    /// fill-array-data-payload pseudo-instruction.
    FillArrayDataPayload { element_width: u16, data: Vec<u8> },
}

impl DecodedInsn {
    /// Shared operand fields, or `None` for payload pseudo-instructions.
    pub fn fields(&self) -> Option<&InsnFields> {
        match self {
            DecodedInsn::ZeroRegister { fields }
            | DecodedInsn::OneRegister { fields, .. }
            | DecodedInsn::TwoRegister { fields, .. }
            | DecodedInsn::ThreeRegister { fields, .. }
            | DecodedInsn::FourRegister { fields, .. }
            | DecodedInsn::FiveRegister { fields, .. }
            | DecodedInsn::RegisterRange { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Mutable access to the shared operand fields.
    pub fn fields_mut(&mut self) -> Option<&mut InsnFields> {
        match self {
            DecodedInsn::ZeroRegister { fields }
            | DecodedInsn::OneRegister { fields, .. }
            | DecodedInsn::TwoRegister { fields, .. }
            | DecodedInsn::ThreeRegister { fields, .. }
            | DecodedInsn::FourRegister { fields, .. }
            | DecodedInsn::FiveRegister { fields, .. }
            | DecodedInsn::RegisterRange { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Number of register operands; the range shape reports its count.
    pub fn reg_count(&self) -> u16 {
        match self {
            DecodedInsn::ZeroRegister { .. } => 0,
            DecodedInsn::OneRegister { .. } => 1,
            DecodedInsn::TwoRegister { .. } => 2,
            DecodedInsn::ThreeRegister { .. } => 3,
            DecodedInsn::FourRegister { .. } => 4,
            DecodedInsn::FiveRegister { .. } => 5,
            DecodedInsn::RegisterRange { count, .. } => *count,
            _ => 0,
        }
    }

    /// First register operand, or 0 when absent.
    pub fn a(&self) -> u16 {
        match self {
            DecodedInsn::OneRegister { a, .. }
            | DecodedInsn::TwoRegister { a, .. }
            | DecodedInsn::ThreeRegister { a, .. }
            | DecodedInsn::FourRegister { a, .. }
            | DecodedInsn::FiveRegister { a, .. } => *a,
            DecodedInsn::RegisterRange { first, .. } => *first,
            _ => 0,
        }
    }

    /// Second register operand, or 0 when absent.
    pub fn b(&self) -> u16 {
        match self {
            DecodedInsn::TwoRegister { b, .. }
            | DecodedInsn::ThreeRegister { b, .. }
            | DecodedInsn::FourRegister { b, .. }
            | DecodedInsn::FiveRegister { b, .. } => *b,
            _ => 0,
        }
    }

    /// Third register operand, or 0 when absent.
    pub fn c(&self) -> u16 {
        match self {
            DecodedInsn::ThreeRegister { c, .. }
            | DecodedInsn::FourRegister { c, .. }
            | DecodedInsn::FiveRegister { c, .. } => *c,
            _ => 0,
        }
    }

    /// Fourth register operand, or 0 when absent.
    pub fn d(&self) -> u16 {
        match self {
            DecodedInsn::FourRegister { d, .. } | DecodedInsn::FiveRegister { d, .. } => *d,
            _ => 0,
        }
    }

    /// Fifth register operand, or 0 when absent.
    pub fn e(&self) -> u16 {
        match self {
            DecodedInsn::FiveRegister { e, .. } => *e,
            _ => 0,
        }
    }

    /// Size of this instruction's encoding in 16-bit code units.
    ///
    /// Payload sizes follow the dex payload layouts; register shapes defer
    /// to their opcode's format.
    pub fn code_units(&self) -> usize {
        match self {
            DecodedInsn::PackedSwitchPayload { targets, .. } => 4 + targets.len() * 2,
            DecodedInsn::SparseSwitchPayload { targets, .. } => 2 + targets.len() * 4,
            DecodedInsn::FillArrayDataPayload { data, .. } => 4 + data.len().div_ceil(2),
            _ => {
                let fields = self.fields().expect("register shape has fields");
                InsnFormat::of(fields.opcode).map_or(1, |f| f.code_units())
            }
        }
    }
}

impl fmt::Display for DecodedInsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedInsn::PackedSwitchPayload { first_key, targets } => {
                return write!(
                    f,
                    "packed-switch-payload first_key={first_key} ({} targets)",
                    targets.len()
                );
            }
            DecodedInsn::SparseSwitchPayload { keys, .. } => {
                return write!(f, "sparse-switch-payload ({} entries)", keys.len());
            }
            DecodedInsn::FillArrayDataPayload {
                element_width,
                data,
            } => {
                return write!(
                    f,
                    "fill-array-data-payload width={element_width} ({} bytes)",
                    data.len()
                );
            }
            _ => {}
        }

        let fields = self.fields().expect("register shape has fields");
        write!(f, "op {:02x}", fields.opcode)?;

        if let DecodedInsn::RegisterRange { first, count, .. } = self {
            if *count > 0 {
                let last = *first as u32 + *count as u32 - 1;
                write!(f, " {{v{first}..v{last}}}")?;
            } else {
                write!(f, " {{}}")?;
            }
        } else {
            for (i, reg) in [self.a(), self.b(), self.c(), self.d(), self.e()]
                .iter()
                .take(self.reg_count() as usize)
                .enumerate()
            {
                let sep = if i == 0 { " " } else { ", " };
                write!(f, "{sep}v{reg}")?;
            }
        }

        if fields.index_kind != IndexKind::None {
            write!(f, " {}@{}", fields.index_kind, fields.index)?;
        }
        if let Some(format) = InsnFormat::of(fields.opcode) {
            if format.carries_target() {
                write!(f, " {:+}", fields.target)?;
            }
            if format.carries_literal() {
                write!(f, " #{}", fields.literal)?;
            }
        }
        Ok(())
    }
}

/// Receiver for decoded instruction events.
///
/// The reader dispatches one call per instruction in stream order. The
/// remapping stage and the writer are both visitors, chained back to back.
pub trait InsnVisitor {
    /// Consumes one decoded instruction.
    fn visit(&mut self, insn: DecodedInsn) -> Result<()>;
}

impl<V: InsnVisitor + ?Sized> InsnVisitor for &mut V {
    fn visit(&mut self, insn: DecodedInsn) -> Result<()> {
        (**self).visit(insn)
    }
}

/// Visitor that collects every event into a `Vec`, for listings and tests.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    /// Instructions in visitation order.
    pub insns: Vec<DecodedInsn>,
}

impl InsnVisitor for CollectingVisitor {
    fn visit(&mut self, insn: DecodedInsn) -> Result<()> {
        self.insns.push(insn);
        Ok(())
    }
}
