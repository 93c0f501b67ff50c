//! Opcode classification tables for the Dalvik instruction set.
//!
//! Every decodable opcode maps to exactly one [`InsnFormat`] (its encoding
//! layout and code-unit size) and one [`IndexKind`] (what its embedded index,
//! if any, refers to in the constant pool). Both are fixed per opcode and
//! drive the reader's decode layout and the writer's encode layout.

use serde::{Deserialize, Serialize};
use std::fmt;

// Opcodes referred to by name elsewhere in the workspace. The classification
// tables below cover the full dex-era set by value range.
pub const NOP: u8 = 0x00;
pub const MOVE: u8 = 0x01;
pub const MOVE_RESULT: u8 = 0x0a;
pub const RETURN_VOID: u8 = 0x0e;
pub const RETURN: u8 = 0x0f;
pub const CONST_4: u8 = 0x12;
pub const CONST_16: u8 = 0x13;
pub const CONST: u8 = 0x14;
pub const CONST_HIGH16: u8 = 0x15;
pub const CONST_WIDE_16: u8 = 0x16;
pub const CONST_WIDE: u8 = 0x18;
pub const CONST_WIDE_HIGH16: u8 = 0x19;
pub const CONST_STRING: u8 = 0x1a;
pub const CONST_STRING_JUMBO: u8 = 0x1b;
pub const CONST_CLASS: u8 = 0x1c;
pub const CHECK_CAST: u8 = 0x1f;
pub const INSTANCE_OF: u8 = 0x20;
pub const NEW_INSTANCE: u8 = 0x22;
pub const NEW_ARRAY: u8 = 0x23;
pub const FILLED_NEW_ARRAY: u8 = 0x24;
pub const FILLED_NEW_ARRAY_RANGE: u8 = 0x25;
pub const FILL_ARRAY_DATA: u8 = 0x26;
pub const THROW: u8 = 0x27;
pub const GOTO: u8 = 0x28;
pub const GOTO_16: u8 = 0x29;
pub const GOTO_32: u8 = 0x2a;
pub const PACKED_SWITCH: u8 = 0x2b;
pub const SPARSE_SWITCH: u8 = 0x2c;
pub const IF_EQ: u8 = 0x32;
pub const IF_EQZ: u8 = 0x38;
pub const IGET: u8 = 0x52;
pub const IPUT: u8 = 0x59;
pub const SGET: u8 = 0x60;
pub const SPUT: u8 = 0x67;
pub const INVOKE_VIRTUAL: u8 = 0x6e;
pub const INVOKE_SUPER: u8 = 0x6f;
pub const INVOKE_DIRECT: u8 = 0x70;
pub const INVOKE_STATIC: u8 = 0x71;
pub const INVOKE_INTERFACE: u8 = 0x72;
pub const INVOKE_VIRTUAL_RANGE: u8 = 0x74;
pub const INVOKE_INTERFACE_RANGE: u8 = 0x78;

/// High byte of the `nop` code unit that introduces a packed-switch payload.
pub const PACKED_SWITCH_PAYLOAD_IDENT: u8 = 0x01;
/// High byte of the `nop` code unit that introduces a sparse-switch payload.
pub const SPARSE_SWITCH_PAYLOAD_IDENT: u8 = 0x02;
/// High byte of the `nop` code unit that introduces a fill-array-data payload.
pub const FILL_ARRAY_DATA_PAYLOAD_IDENT: u8 = 0x03;

/// What an instruction's embedded index refers to in the constant pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// The instruction carries no indexed reference.
    None,
    /// Index into the string pool.
    String,
    /// Index into the type pool.
    Type,
    /// Index into the field pool.
    Field,
    /// Index into the method pool.
    Method,
}

impl IndexKind {
    /// Returns the reference kind fixed by the given opcode.
    pub fn of(opcode: u8) -> IndexKind {
        match opcode {
            CONST_STRING | CONST_STRING_JUMBO => IndexKind::String,
            // const-class, check-cast, instance-of, new-instance, new-array,
            // filled-new-array and its range form
            CONST_CLASS | CHECK_CAST | INSTANCE_OF | NEW_INSTANCE | NEW_ARRAY
            | FILLED_NEW_ARRAY | FILLED_NEW_ARRAY_RANGE => IndexKind::Type,
            // iget/iput and sget/sput families
            0x52..=0x6d => IndexKind::Field,
            // invoke-kind and invoke-kind/range families
            0x6e..=0x72 | 0x74..=0x78 => IndexKind::Method,
            _ => IndexKind::None,
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndexKind::None => "none",
            IndexKind::String => "string",
            IndexKind::Type => "type",
            IndexKind::Field => "field",
            IndexKind::Method => "method",
        };
        write!(f, "{name}")
    }
}

/// Dalvik instruction encoding format.
///
/// Format names follow the dex specification: the first digit is the size in
/// 16-bit code units, the second the register count, and the trailing letter
/// the extra operand (`c` index, `t` branch target, `s`/`b`/`n`/`h`/`i`/`l`
/// literal widths, `x` none).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsnFormat {
    Format10x,
    Format12x,
    Format11n,
    Format11x,
    Format10t,
    Format20t,
    Format22x,
    Format21t,
    Format21s,
    Format21h,
    Format21c,
    Format23x,
    Format22b,
    Format22t,
    Format22s,
    Format22c,
    Format30t,
    Format32x,
    Format31i,
    Format31t,
    Format31c,
    Format35c,
    Format3rc,
    Format51l,
}

impl InsnFormat {
    /// Returns the encoding format fixed by the given opcode, or `None` for
    /// opcodes outside the decode table (unused gaps and odex-only values).
    pub fn of(opcode: u8) -> Option<InsnFormat> {
        use InsnFormat::*;
        let format = match opcode {
            // nop, return-void
            0x00 | 0x0e => Format10x,
            // move, move-wide, move-object
            0x01 | 0x04 | 0x07 => Format12x,
            0x02 | 0x05 | 0x08 => Format22x,
            0x03 | 0x06 | 0x09 => Format32x,
            // move-result family, move-exception, return family,
            // monitor-enter/exit, throw
            0x0a..=0x0d | 0x0f..=0x11 | 0x1d | 0x1e | 0x27 => Format11x,
            // const/4
            0x12 => Format11n,
            // const/16, const-wide/16
            0x13 | 0x16 => Format21s,
            // const, const-wide/32
            0x14 | 0x17 => Format31i,
            // const/high16, const-wide/high16
            0x15 | 0x19 => Format21h,
            // const-wide
            0x18 => Format51l,
            // const-string, const-class, check-cast, new-instance
            0x1a | 0x1c | 0x1f | 0x22 => Format21c,
            // const-string/jumbo
            0x1b => Format31c,
            // instance-of, new-array
            0x20 | 0x23 => Format22c,
            // array-length
            0x21 => Format12x,
            // filled-new-array
            0x24 => Format35c,
            // filled-new-array/range
            0x25 => Format3rc,
            // fill-array-data, packed-switch, sparse-switch
            0x26 | 0x2b | 0x2c => Format31t,
            0x28 => Format10t,
            0x29 => Format20t,
            0x2a => Format30t,
            // cmpkind
            0x2d..=0x31 => Format23x,
            // if-test
            0x32..=0x37 => Format22t,
            // if-testz
            0x38..=0x3d => Format21t,
            // arrayop
            0x44..=0x51 => Format23x,
            // iinstanceop
            0x52..=0x5f => Format22c,
            // sstaticop
            0x60..=0x6d => Format21c,
            // invoke-kind
            0x6e..=0x72 => Format35c,
            // invoke-kind/range
            0x74..=0x78 => Format3rc,
            // unop
            0x7b..=0x8f => Format12x,
            // binop
            0x90..=0xaf => Format23x,
            // binop/2addr
            0xb0..=0xcf => Format12x,
            // binop/lit16
            0xd0..=0xd7 => Format22s,
            // binop/lit8
            0xd8..=0xe2 => Format22b,
            // 0x3e-0x43, 0x73, 0x79-0x7a, 0xe3-0xff are unused in dex files
            _ => return None,
        };
        Some(format)
    }

    /// Size of the encoded instruction in 16-bit code units.
    pub const fn code_units(&self) -> usize {
        use InsnFormat::*;
        match self {
            Format10x | Format12x | Format11n | Format11x | Format10t => 1,
            Format20t | Format22x | Format21t | Format21s | Format21h | Format21c
            | Format23x | Format22b | Format22t | Format22s | Format22c => 2,
            Format30t | Format32x | Format31i | Format31t | Format31c | Format35c
            | Format3rc => 3,
            Format51l => 5,
        }
    }

    /// Whether the format embeds a branch target.
    pub const fn carries_target(&self) -> bool {
        use InsnFormat::*;
        matches!(
            self,
            Format10t | Format20t | Format21t | Format22t | Format30t | Format31t
        )
    }

    /// Whether the format embeds a numeric literal.
    pub const fn carries_literal(&self) -> bool {
        use InsnFormat::*;
        matches!(
            self,
            Format11n | Format21s | Format21h | Format22b | Format22s | Format31i | Format51l
        )
    }
}
