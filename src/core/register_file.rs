// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Scalar and vector register banks
//!
//! A `RegisterFile` owns 8 registers of one [`RegisterKind`], each holding
//! `elem_len` [`BitVec`] lanes (1 for scalar files, `MVL` for vector files).

use std::io::Write;
use std::path::Path;

use super::bitvec::BitVec;
use super::error::{Result, SimError};
use super::register::{Register, RegisterKind};

/// A bank of 8 registers, each `elem_len` lanes wide
pub struct RegisterFile {
    kind: RegisterKind,
    elem_len: usize,
    registers: Vec<Vec<BitVec>>,
}

impl RegisterFile {
    /// Build a register file of the given kind
    ///
    /// `elem_len` is 1 for a scalar file and `MVL` for a vector file.
    pub fn new(kind: RegisterKind, elem_len: usize) -> Self {
        Self {
            kind,
            elem_len,
            registers: (0..Register::COUNT as usize)
                .map(|_| vec![BitVec::default(); elem_len])
                .collect(),
        }
    }

    fn assert_kind(&self, reg: Register) -> Result<()> {
        if reg.kind() != self.kind {
            return Err(SimError::RegisterKind {
                expected: self.kind,
                got: reg.kind(),
            });
        }
        Ok(())
    }

    /// Read the full lane sequence of a register (length 1 for scalar files)
    pub fn read(&self, reg: Register) -> Result<&[BitVec]> {
        self.assert_kind(reg)?;
        Ok(&self.registers[reg.index()])
    }

    /// Read a scalar register's single value
    ///
    /// # Panics
    /// Panics if called on a vector-kind file; use [`RegisterFile::read`]
    /// for vector registers.
    pub fn read_scalar(&self, reg: Register) -> Result<BitVec> {
        assert_eq!(self.elem_len, 1, "read_scalar on a vector register file");
        Ok(self.read(reg)?[0])
    }

    /// Overwrite a scalar register's single value
    pub fn write_scalar(&mut self, reg: Register, value: BitVec) -> Result<()> {
        assert_eq!(self.elem_len, 1, "write_scalar on a vector register file");
        self.assert_kind(reg)?;
        self.registers[reg.index()][0] = value;
        Ok(())
    }

    /// Masked, length-limited write to a vector register
    ///
    /// For `i` in `[0, length)`: if `mask[i]`, `values[i]` is copied into
    /// lane `i`. Lanes at or beyond `length`, and masked-off lanes within
    /// it, are left bit-identical to their prior contents.
    pub fn write_vector(
        &mut self,
        reg: Register,
        values: &[BitVec],
        mask: &[bool],
        length: usize,
    ) -> Result<()> {
        self.assert_kind(reg)?;
        let dst = &mut self.registers[reg.index()];
        for i in 0..length.min(dst.len()) {
            if mask.get(i).copied().unwrap_or(false) {
                dst[i] = values[i];
            }
        }
        Ok(())
    }

    /// Dump all registers to `path`, one row per register
    ///
    /// Matches the §6 format: a header row of column indices, a separator
    /// of dashes, then one row per register with each column 13 characters
    /// wide, left-justified.
    pub fn dump(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)?;
        let header: String = (0..self.elem_len)
            .map(|i| format!("{i:<13}"))
            .collect();
        writeln!(file, "{header}")?;
        writeln!(file, "{}", "-".repeat(self.elem_len * 13))?;
        for reg in &self.registers {
            let row: String = reg
                .iter()
                .map(|v| format!("{:<13}", v.signed()))
                .collect();
            writeln!(file, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_write_then_read() {
        let mut srf = RegisterFile::new(RegisterKind::Scalar, 1);
        srf.write_scalar(Register::scalar(3), BitVec::new(12)).unwrap();
        assert_eq!(srf.read_scalar(Register::scalar(3)).unwrap().signed(), 12);
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let srf = RegisterFile::new(RegisterKind::Scalar, 1);
        assert!(matches!(
            srf.read(Register::vector(0)),
            Err(SimError::RegisterKind { .. })
        ));
    }

    #[test]
    fn masked_vector_write_preserves_unwritten_lanes() {
        let mut vrf = RegisterFile::new(RegisterKind::Vector, 64);
        let reg = Register::vector(3);
        let values: Vec<BitVec> = (0..4).map(|i| BitVec::new(10 * (i as i64 + 1))).collect();
        let mask = [true, false, true, true];
        vrf.write_vector(reg, &values, &mask, 4).unwrap();
        let out = vrf.read(reg).unwrap();
        assert_eq!(out[0].signed(), 10);
        assert_eq!(out[1].signed(), 0); // masked off, unchanged
        assert_eq!(out[2].signed(), 30);
        assert_eq!(out[3].signed(), 40);
        assert_eq!(out[4].signed(), 0); // beyond length, unchanged
    }

    #[test]
    fn zero_length_write_touches_nothing() {
        let mut vrf = RegisterFile::new(RegisterKind::Vector, 64);
        let reg = Register::vector(1);
        let values = vec![BitVec::new(99); 64];
        let mask = vec![true; 64];
        vrf.write_vector(reg, &values, &mask, 0).unwrap();
        assert!(vrf.read(reg).unwrap().iter().all(|v| v.signed() == 0));
    }
}
