//! 16-bit code-unit cursors over instruction streams.
//!
//! [`CodeInput`] reads a borrowed stream front to back; [`CodeOutput`] owns a
//! growable output buffer. Multi-unit values are little-unit-first, matching
//! the dex encoding.

use crate::result::{Error, Result};

/// Read cursor over a borrowed code-unit stream.
#[derive(Debug)]
pub struct CodeInput<'a> {
    units: &'a [u16],
    cursor: usize,
}

impl<'a> CodeInput<'a> {
    /// Wraps a code-unit slice, cursor at unit 0.
    pub fn new(units: &'a [u16]) -> Self {
        CodeInput { units, cursor: 0 }
    }

    /// Current position in code units.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether at least one more unit remains.
    pub fn has_more(&self) -> bool {
        self.cursor < self.units.len()
    }

    /// Units left before the end of the stream.
    pub fn remaining(&self) -> usize {
        self.units.len() - self.cursor
    }

    /// Reads the next unit, failing when the stream is exhausted.
    pub fn read(&mut self) -> Result<u16> {
        let unit = self
            .units
            .get(self.cursor)
            .copied()
            .ok_or(Error::UnexpectedEndOfStream {
                offset: self.cursor,
            })?;
        self.cursor += 1;
        Ok(unit)
    }

    /// Reads a 32-bit value stored low unit first.
    pub fn read_u32(&mut self) -> Result<u32> {
        let low = self.read()? as u32;
        let high = self.read()? as u32;
        Ok(low | (high << 16))
    }

    /// Reads a signed 32-bit value stored low unit first.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Reads a 64-bit value stored low unit first.
    pub fn read_i64(&mut self) -> Result<i64> {
        let low = self.read_u32()? as u64;
        let high = self.read_u32()? as u64;
        Ok((low | (high << 32)) as i64)
    }
}

/// Growable output buffer of code units.
///
/// Callers pass a capacity hint so the common case never reallocates; `Vec`
/// growth is the fallback when an estimate turns out low.
#[derive(Debug)]
pub struct CodeOutput {
    units: Vec<u16>,
}

impl CodeOutput {
    /// Creates an output buffer pre-sized to `capacity_hint` units.
    pub fn with_capacity(capacity_hint: usize) -> Self {
        CodeOutput {
            units: Vec::with_capacity(capacity_hint),
        }
    }

    /// Current position in code units.
    pub fn cursor(&self) -> usize {
        self.units.len()
    }

    /// Appends one unit.
    pub fn write(&mut self, unit: u16) {
        self.units.push(unit);
    }

    /// Appends a 32-bit value, low unit first.
    pub fn write_u32(&mut self, value: u32) {
        self.write(value as u16);
        self.write((value >> 16) as u16);
    }

    /// Appends a signed 32-bit value, low unit first.
    pub fn write_i32(&mut self, value: i32) {
        self.write_u32(value as u32);
    }

    /// Appends a 64-bit value, low unit first.
    pub fn write_i64(&mut self, value: i64) {
        self.write_u32(value as u32);
        self.write_u32((value as u64 >> 32) as u32);
    }

    /// Consumes the buffer, yielding the encoded stream.
    pub fn into_units(self) -> Vec<u16> {
        self.units
    }
}
