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

//! The dispatch scoreboard (the "busyboard")
//!
//! Tracks which scalar registers, vector registers, and the two mask/length
//! pseudo-registers (`VMR`, `VLR`) are currently held by an in-flight
//! instruction. Unlike the source's scalar busy array, which overloads two
//! extra slots at indices 8 and 9 for VMR/VLR, this tracks them as named
//! fields so the mark/check logic reads directly from the opcode
//! classification rather than magic indices.

use crate::core::instruction::Instruction;
use crate::core::register::{Register, RegisterKind};

/// Register/mask busy-state consulted by decode and updated by retirement
#[derive(Debug, Default)]
pub struct Scoreboard {
    scalar_busy: [bool; Register::COUNT as usize],
    vector_busy: [bool; Register::COUNT as usize],
    vmr_busy: bool,
    vlr_busy: bool,
}

impl Scoreboard {
    /// A scoreboard with every entry free
    pub fn new() -> Self {
        Self::default()
    }

    fn register_operands(ins: &Instruction) -> impl Iterator<Item = Register> + '_ {
        ins.ops.iter().filter_map(|op| op.as_register())
    }

    fn vector_operands(ins: &Instruction) -> impl Iterator<Item = Register> + '_ {
        Self::register_operands(ins).filter(|r| r.kind() == RegisterKind::Vector)
    }

    /// `true` if every register/mask resource `ins` touches is free
    pub fn is_free(&self, ins: &Instruction) -> bool {
        let registers_free = Self::register_operands(ins).all(|r| match r.kind() {
            RegisterKind::Scalar => !self.scalar_busy[r.index()],
            RegisterKind::Vector => !self.vector_busy[r.index()],
        });
        let vmr_free = !ins.opcode.touches_vmr() || !self.vmr_busy;
        let vlr_free = !ins.opcode.touches_vlr() || !self.vlr_busy;
        registers_free && vmr_free && vlr_free
    }

    /// Mark every resource `ins` holds while in flight
    pub fn mark(&mut self, ins: &Instruction) {
        for reg in Self::vector_operands(ins) {
            self.vector_busy[reg.index()] = true;
        }
        if ins.opcode.writes_vmr() {
            self.vmr_busy = true;
        }
        if ins.opcode.writes_vlr() {
            self.vlr_busy = true;
        }
        if ins.opcode.has_scalar_dest() {
            self.scalar_busy[ins.dst().index()] = true;
        }
    }

    /// Release every resource `ins` held, symmetric with [`Scoreboard::mark`]
    pub fn unmark(&mut self, ins: &Instruction) {
        for reg in Self::vector_operands(ins) {
            self.vector_busy[reg.index()] = false;
        }
        if ins.opcode.writes_vmr() {
            self.vmr_busy = false;
        }
        if ins.opcode.writes_vlr() {
            self.vlr_busy = false;
        }
        if ins.opcode.has_scalar_dest() {
            self.scalar_busy[ins.dst().index()] = false;
        }
    }
}
