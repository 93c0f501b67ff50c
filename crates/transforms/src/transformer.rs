//! The index-remapping instruction transformer.
//!
//! Single pass, one direction: raw code units decode into instruction
//! events, the remapping visitor rewrites each event's constant-pool index
//! through the translation table, and the writer re-encodes the result into
//! a fresh buffer. No cross-instruction state exists anywhere in the chain,
//! so the transform is a pure function of (stream, table).

use crate::index_map::IndexMap;
use crate::Result;
use dexmorph_core::opcode::{CONST_STRING, CONST_STRING_JUMBO};
use dexmorph_core::reader::read_insns;
use dexmorph_core::writer::InsnWriter;
use dexmorph_core::{CodeOutput, DecodedInsn, IndexKind, InsnVisitor};
use tracing::debug;

/// Compact string-load indices are capped at 16 bits.
const COMPACT_STRING_INDEX_MAX: u32 = 0xffff;

/// Substitutes the wide string-load opcode when a translated index outgrows
/// the compact form.
///
/// Returns `const-string/jumbo` iff `opcode` is `const-string` and
/// `new_index` exceeds the compact form's 16-bit operand width; every other
/// opcode passes through unchanged. The caller keeps the already-translated
/// index either way — the substituted instruction carries the mapped value,
/// never the original and never a truncated one.
pub fn promote_string_load(opcode: u8, new_index: u32) -> u8 {
    if opcode == CONST_STRING && new_index > COMPACT_STRING_INDEX_MAX {
        CONST_STRING_JUMBO
    } else {
        opcode
    }
}

/// Visitor stage that translates constant-pool indices and forwards events.
///
/// Branch targets, literals, and register operands pass through untouched;
/// payload pseudo-instructions carry no references and are forwarded as-is.
#[derive(Debug)]
pub struct RemappingVisitor<'a, M: IndexMap + ?Sized, V: InsnVisitor> {
    map: &'a M,
    inner: V,
}

impl<'a, M: IndexMap + ?Sized, V: InsnVisitor> RemappingVisitor<'a, M, V> {
    /// Creates a remapping stage that forwards to `inner`.
    pub fn new(map: &'a M, inner: V) -> Self {
        RemappingVisitor { map, inner }
    }
}

impl<M: IndexMap + ?Sized, V: InsnVisitor> InsnVisitor for RemappingVisitor<'_, M, V> {
    fn visit(&mut self, mut insn: DecodedInsn) -> dexmorph_core::Result<()> {
        match &mut insn {
            // Opcode substitution lives on the one-register path: the compact
            // string load is the only reference opcode with two encoding
            // widths, and it always carries exactly one register.
            DecodedInsn::OneRegister { fields, .. } => {
                if fields.index_kind != IndexKind::None {
                    let mapped = self.map.map(fields.index_kind, fields.index);
                    let opcode = promote_string_load(fields.opcode, mapped);
                    if opcode != fields.opcode {
                        debug!(
                            "promoting const-string to jumbo form for index {:#x} -> {:#x}",
                            fields.index, mapped
                        );
                    }
                    fields.index = mapped;
                    fields.opcode = opcode;
                }
            }
            DecodedInsn::ZeroRegister { fields }
            | DecodedInsn::TwoRegister { fields, .. }
            | DecodedInsn::ThreeRegister { fields, .. }
            | DecodedInsn::FourRegister { fields, .. }
            | DecodedInsn::FiveRegister { fields, .. }
            | DecodedInsn::RegisterRange { fields, .. } => {
                if fields.index_kind != IndexKind::None {
                    fields.index = self.map.map(fields.index_kind, fields.index);
                }
            }
            DecodedInsn::PackedSwitchPayload { .. }
            | DecodedInsn::SparseSwitchPayload { .. }
            | DecodedInsn::FillArrayDataPayload { .. } => {}
        }
        self.inner.visit(insn)
    }
}

/// Rewrites every constant-pool reference in an encoded method body through
/// an index translation table.
///
/// Stateless per call: each [`transform`](Self::transform) owns its output
/// buffer and reads the shared table without mutation, so independent calls
/// may run concurrently against the same table.
#[derive(Debug)]
pub struct InstructionTransformer<'a, M: IndexMap + ?Sized> {
    map: &'a M,
}

impl<'a, M: IndexMap + ?Sized> InstructionTransformer<'a, M> {
    /// Creates a transformer over the given translation table.
    pub fn new(map: &'a M) -> Self {
        InstructionTransformer { map }
    }

    /// Transforms one encoded method body, returning the new stream.
    ///
    /// The output is pre-sized to twice the input length: jumbo substitution
    /// is the only width change, and it can at most grow each instruction by
    /// one code unit. A malformed input aborts with no partial output.
    pub fn transform(&self, code: &[u16]) -> Result<Vec<u16>> {
        let mut out = CodeOutput::with_capacity(code.len() * 2);
        let writer = InsnWriter::new(&mut out);
        let mut visitor = RemappingVisitor::new(self.map, writer);
        read_insns(code, &mut visitor)?;

        let units = out.into_units();
        debug!(
            "transformed {} code units into {} code units",
            code.len(),
            units.len()
        );
        Ok(units)
    }
}
