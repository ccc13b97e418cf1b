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

//! The vector ISA's opcode set
//!
//! Represented as a tagged enum rather than a string-keyed executor
//! registry, so both the functional core's execution match and the
//! timing core's classification queries (`is_vector_data`, `compute_backend`,
//! ...) are exhaustive and checked at compile time.

use std::fmt;
use std::str::FromStr;

/// The functional unit a vector-compute instruction is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeBackend {
    /// `MUL*`
    Multiplier,
    /// `DIV*`
    Divider,
    /// Everything else routed through the vector-compute queue: add, sub,
    /// logical, and all mask-producing compares.
    Adder,
}

/// One opcode in the vector ISA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Scalar ALU
    Add,
    Sub,
    And,
    Or,
    Xor,
    Sll,
    Srl,
    Sra,
    // Scalar memory
    Ls,
    Ss,
    // Vector-vector ALU
    AddVv,
    SubVv,
    MulVv,
    DivVv,
    // Vector-scalar ALU
    AddVs,
    SubVs,
    MulVs,
    DivVs,
    // Vector memory
    Lv,
    Lvws,
    Lvi,
    Sv,
    Svws,
    Svi,
    // Branches
    Beq,
    Bne,
    Bgt,
    Blt,
    Bge,
    Ble,
    // Vector compare to mask
    SeqVv,
    SneVv,
    SgtVv,
    SltVv,
    SgeVv,
    SleVv,
    SeqVs,
    SneVs,
    SgtVs,
    SltVs,
    SgeVs,
    SleVs,
    // Mask/length control
    Cvm,
    Pop,
    Mtcl,
    Mfcl,
    // Halt
    Halt,
}

impl Opcode {
    /// `true` for `LV/LVWS/LVI/SV/SVWS/SVI` — routed to the vector-data
    /// dispatch queue and the banked load/store backend.
    pub fn is_vector_data(&self) -> bool {
        matches!(
            self,
            Opcode::Lv | Opcode::Lvws | Opcode::Lvi | Opcode::Sv | Opcode::Svws | Opcode::Svi
        )
    }

    /// `true` for V-V/V-S arithmetic and vector-compare-to-mask — routed to
    /// the vector-compute dispatch queue.
    pub fn is_vector_compute(&self) -> bool {
        self.is_vector_arithmetic() || self.is_mask_compare()
    }

    fn is_vector_arithmetic(&self) -> bool {
        matches!(
            self,
            Opcode::AddVv
                | Opcode::SubVv
                | Opcode::MulVv
                | Opcode::DivVv
                | Opcode::AddVs
                | Opcode::SubVs
                | Opcode::MulVs
                | Opcode::DivVs
        )
    }

    /// `true` for the twelve `S**VV`/`S**VS` mask-producing compares
    pub fn is_mask_compare(&self) -> bool {
        matches!(
            self,
            Opcode::SeqVv
                | Opcode::SneVv
                | Opcode::SgtVv
                | Opcode::SltVv
                | Opcode::SgeVv
                | Opcode::SleVv
                | Opcode::SeqVs
                | Opcode::SneVs
                | Opcode::SgtVs
                | Opcode::SltVs
                | Opcode::SgeVs
                | Opcode::SleVs
        )
    }

    /// `true` for any instruction that touches the vector register file,
    /// vector memory, or the mask (i.e. the union the original source
    /// calls `VEC_OPS`)
    pub fn is_vector_op(&self) -> bool {
        self.is_vector_data() || self.is_vector_compute()
    }

    /// `true` for the six branch opcodes, which skip scoreboard checking
    pub fn is_branch(&self) -> bool {
        matches!(
            self,
            Opcode::Beq | Opcode::Bne | Opcode::Bgt | Opcode::Blt | Opcode::Bge | Opcode::Ble
        )
    }

    /// `true` if this instruction reads or writes VMR: any vector op,
    /// `CVM`, `POP`, or a mask compare
    pub fn touches_vmr(&self) -> bool {
        self.is_vector_op() || matches!(self, Opcode::Cvm | Opcode::Pop)
    }

    /// `true` if this instruction reads or writes VLR: any vector op,
    /// `MTCL`, or `MFCL`
    pub fn touches_vlr(&self) -> bool {
        self.is_vector_op() || matches!(self, Opcode::Mtcl | Opcode::Mfcl)
    }

    /// `true` if `CVM` or a mask compare — the opcodes that write VMR
    pub fn writes_vmr(&self) -> bool {
        matches!(self, Opcode::Cvm) || self.is_mask_compare()
    }

    /// `true` only for `MTCL` — the opcode that writes VLR
    pub fn writes_vlr(&self) -> bool {
        matches!(self, Opcode::Mtcl)
    }

    /// `true` if `op(0)` is the scalar destination register (the only
    /// scalar operand marked busy by the scoreboard on dispatch)
    pub fn has_scalar_dest(&self) -> bool {
        matches!(
            self,
            Opcode::Add
                | Opcode::Sub
                | Opcode::And
                | Opcode::Or
                | Opcode::Xor
                | Opcode::Ls
                | Opcode::Sll
                | Opcode::Srl
                | Opcode::Sra
                | Opcode::Mfcl
                | Opcode::Pop
        )
    }

    /// Which functional-unit backend a vector-compute instruction routes to
    pub fn compute_backend(&self) -> ComputeBackend {
        match self {
            Opcode::MulVv | Opcode::MulVs => ComputeBackend::Multiplier,
            Opcode::DivVv | Opcode::DivVs => ComputeBackend::Divider,
            _ => ComputeBackend::Adder,
        }
    }
}

impl FromStr for Opcode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "ADD" => Opcode::Add,
            "SUB" => Opcode::Sub,
            "AND" => Opcode::And,
            "OR" => Opcode::Or,
            "XOR" => Opcode::Xor,
            "SLL" => Opcode::Sll,
            "SRL" => Opcode::Srl,
            "SRA" => Opcode::Sra,
            "LS" => Opcode::Ls,
            "SS" => Opcode::Ss,
            "ADDVV" => Opcode::AddVv,
            "SUBVV" => Opcode::SubVv,
            "MULVV" => Opcode::MulVv,
            "DIVVV" => Opcode::DivVv,
            "ADDVS" => Opcode::AddVs,
            "SUBVS" => Opcode::SubVs,
            "MULVS" => Opcode::MulVs,
            "DIVVS" => Opcode::DivVs,
            "LV" => Opcode::Lv,
            "LVWS" => Opcode::Lvws,
            "LVI" => Opcode::Lvi,
            "SV" => Opcode::Sv,
            "SVWS" => Opcode::Svws,
            "SVI" => Opcode::Svi,
            "BEQ" => Opcode::Beq,
            "BNE" => Opcode::Bne,
            "BGT" => Opcode::Bgt,
            "BLT" => Opcode::Blt,
            "BGE" => Opcode::Bge,
            "BLE" => Opcode::Ble,
            "SEQVV" => Opcode::SeqVv,
            "SNEVV" => Opcode::SneVv,
            "SGTVV" => Opcode::SgtVv,
            "SLTVV" => Opcode::SltVv,
            "SGEVV" => Opcode::SgeVv,
            "SLEVV" => Opcode::SleVv,
            "SEQVS" => Opcode::SeqVs,
            "SNEVS" => Opcode::SneVs,
            "SGTVS" => Opcode::SgtVs,
            "SLTVS" => Opcode::SltVs,
            "SGEVS" => Opcode::SgeVs,
            "SLEVS" => Opcode::SleVs,
            "CVM" => Opcode::Cvm,
            "POP" => Opcode::Pop,
            "MTCL" => Opcode::Mtcl,
            "MFCL" => Opcode::Mfcl,
            "HALT" => Opcode::Halt,
            _ => return Err(()),
        })
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Xor => "XOR",
            Opcode::Sll => "SLL",
            Opcode::Srl => "SRL",
            Opcode::Sra => "SRA",
            Opcode::Ls => "LS",
            Opcode::Ss => "SS",
            Opcode::AddVv => "ADDVV",
            Opcode::SubVv => "SUBVV",
            Opcode::MulVv => "MULVV",
            Opcode::DivVv => "DIVVV",
            Opcode::AddVs => "ADDVS",
            Opcode::SubVs => "SUBVS",
            Opcode::MulVs => "MULVS",
            Opcode::DivVs => "DIVVS",
            Opcode::Lv => "LV",
            Opcode::Lvws => "LVWS",
            Opcode::Lvi => "LVI",
            Opcode::Sv => "SV",
            Opcode::Svws => "SVWS",
            Opcode::Svi => "SVI",
            Opcode::Beq => "BEQ",
            Opcode::Bne => "BNE",
            Opcode::Bgt => "BGT",
            Opcode::Blt => "BLT",
            Opcode::Bge => "BGE",
            Opcode::Ble => "BLE",
            Opcode::SeqVv => "SEQVV",
            Opcode::SneVv => "SNEVV",
            Opcode::SgtVv => "SGTVV",
            Opcode::SltVv => "SLTVV",
            Opcode::SgeVv => "SGEVV",
            Opcode::SleVv => "SLEVV",
            Opcode::SeqVs => "SEQVS",
            Opcode::SneVs => "SNEVS",
            Opcode::SgtVs => "SGTVS",
            Opcode::SltVs => "SLTVS",
            Opcode::SgeVs => "SGEVS",
            Opcode::SleVs => "SLEVS",
            Opcode::Cvm => "CVM",
            Opcode::Pop => "POP",
            Opcode::Mtcl => "MTCL",
            Opcode::Mfcl => "MFCL",
            Opcode::Halt => "HALT",
        };
        write!(f, "{s}")
    }
}
