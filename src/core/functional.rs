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

//! The functional (interpreting) core
//!
//! Executes decoded instructions against the architectural state — `PC`,
//! `VL`, `VM`, the scalar and vector register files, and the two data
//! memories — one instruction per [`FunctionalCore::step`]. Optionally
//! emits a dynamic trace consumed by the timing core.

use std::path::Path;

use super::bitvec::BitVec;
use super::dmem::DMem;
use super::error::{Result, SimError};
use super::imem::IMem;
use super::instruction::{Annotation, Instruction, TracedInstruction};
use super::itrace::TraceWriter;
use super::opcode::Opcode;
use super::register::RegisterKind;
use super::register_file::RegisterFile;

/// Maximum vector length
pub const MVL: usize = 64;

/// `SDMEM` address width: `2^13` words
pub const SDMEM_ADDRESS_BITS: u32 = 13;
/// `VDMEM` address width: `2^17` words
pub const VDMEM_ADDRESS_BITS: u32 = 17;

/// The functional core's architectural state
pub struct FunctionalCore {
    pc: usize,
    vl: usize,
    vm: Vec<bool>,
    srf: RegisterFile,
    vrf: RegisterFile,
    halted: bool,
    branch_taken: bool,
    branch_pc: usize,
    imem: IMem,
    sdmem: DMem,
    vdmem: DMem,
    trace: Option<TraceWriter>,
    instructions_executed: u64,
}

impl FunctionalCore {
    /// Build a core over the given memories
    ///
    /// `VL` resets to `MVL` and `VM` resets to all-set, so a program that
    /// never touches `MTCL`/`CVM` operates over the full vector width by
    /// default.
    pub fn new(imem: IMem, sdmem: DMem, vdmem: DMem) -> Self {
        Self {
            pc: 0,
            vl: MVL,
            vm: vec![true; MVL],
            srf: RegisterFile::new(RegisterKind::Scalar, 1),
            vrf: RegisterFile::new(RegisterKind::Vector, MVL),
            halted: false,
            branch_taken: false,
            branch_pc: 0,
            imem,
            sdmem,
            vdmem,
            trace: None,
            instructions_executed: 0,
        }
    }

    /// Enable dynamic instruction tracing to `path`
    pub fn enable_trace(&mut self, path: &Path) -> Result<()> {
        self.trace = Some(TraceWriter::create(path)?);
        Ok(())
    }

    /// `true` once `HALT` has retired
    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Number of instructions retired so far
    pub fn instructions_executed(&self) -> u64 {
        self.instructions_executed
    }

    /// Run until `HALT`, optionally aborting after `max_instructions`
    ///
    /// `max_instructions = None` runs unbounded, matching the architectural
    /// semantics exactly; the cap is a host-side safety net for malformed
    /// programs that never halt, not part of the ISA.
    pub fn run(&mut self, max_instructions: Option<u64>) -> Result<()> {
        while !self.halted {
            if let Some(limit) = max_instructions {
                if self.instructions_executed >= limit {
                    return Err(SimError::MaxInstructionsExceeded { limit });
                }
            }
            self.step()?;
        }
        Ok(())
    }

    /// Execute exactly one instruction
    pub fn step(&mut self) -> Result<()> {
        self.branch_taken = false;
        let ins = self.imem.read(self.pc)?;
        log::debug!("FunctionalCore - PC={} executing {ins}", self.pc);
        let annotation = self.execute(&ins)?;

        if let Some(trace) = &mut self.trace {
            trace.write(&TracedInstruction {
                instruction: ins.clone(),
                annotation,
            })?;
        }

        self.pc = if self.branch_taken { self.branch_pc } else { self.pc + 1 };
        self.instructions_executed += 1;
        Ok(())
    }

    fn execute(&mut self, ins: &Instruction) -> Result<Option<Annotation>> {
        use Opcode::*;

        match ins.opcode {
            Add | Sub | And | Or | Xor | Sll | Srl | Sra => {
                self.exec_scalar_alu(ins)?;
                Ok(None)
            }
            Ls => Ok(Some(self.exec_load_scalar(ins)?)),
            Ss => Ok(Some(self.exec_store_scalar(ins)?)),
            AddVv | SubVv | MulVv | DivVv => {
                self.exec_vector_vector_alu(ins)?;
                Ok(Some(Annotation::Scalar(self.vl as i64)))
            }
            AddVs | SubVs | MulVs | DivVs => {
                self.exec_vector_scalar_alu(ins)?;
                Ok(Some(Annotation::Scalar(self.vl as i64)))
            }
            Lv | Lvws | Lvi => Ok(Some(self.exec_vector_load(ins)?)),
            Sv | Svws | Svi => Ok(Some(self.exec_vector_store(ins)?)),
            Beq | Bne | Bgt | Blt | Bge | Ble => Ok(Some(self.exec_branch(ins)?)),
            SeqVv | SneVv | SgtVv | SltVv | SgeVv | SleVv => {
                self.exec_vector_vector_compare(ins)?;
                Ok(None)
            }
            SeqVs | SneVs | SgtVs | SltVs | SgeVs | SleVs => {
                self.exec_vector_scalar_compare(ins)?;
                Ok(None)
            }
            Cvm => {
                self.vm.iter_mut().for_each(|b| *b = true);
                Ok(None)
            }
            Pop => {
                let count = self.vm.iter().filter(|b| **b).count();
                self.srf.write_scalar(ins.dst(), BitVec::new(count as i64))?;
                Ok(None)
            }
            Mtcl => {
                let requested = self.srf.read_scalar(ins.dst())?.unsigned() as usize;
                self.vl = requested.min(MVL);
                Ok(None)
            }
            Mfcl => {
                self.srf.write_scalar(ins.dst(), BitVec::new(self.vl as i64))?;
                Ok(None)
            }
            Halt => {
                self.halted = true;
                Ok(None)
            }
        }
    }

    fn scalar_op(op: Opcode, a: BitVec, b: BitVec) -> BitVec {
        match op {
            Opcode::Add => BitVec::add(&a, &b),
            Opcode::Sub => BitVec::sub(&a, &b),
            Opcode::And => BitVec::bitand(&a, &b),
            Opcode::Or => BitVec::bitor(&a, &b),
            Opcode::Xor => BitVec::bitxor(&a, &b),
            Opcode::Sll => BitVec::sll(&a, &b),
            Opcode::Srl => BitVec::srl(&a, &b),
            Opcode::Sra => BitVec::sra(&a, &b),
            _ => unreachable!("scalar_op called on non-ALU opcode {op}"),
        }
    }

    fn vector_op(op: Opcode, a: BitVec, b: BitVec) -> BitVec {
        match op {
            Opcode::AddVv | Opcode::AddVs => BitVec::add(&a, &b),
            Opcode::SubVv | Opcode::SubVs => BitVec::sub(&a, &b),
            Opcode::MulVv | Opcode::MulVs => BitVec::mul(&a, &b),
            Opcode::DivVv | Opcode::DivVs => BitVec::div(&a, &b),
            _ => unreachable!("vector_op called on non-ALU opcode {op}"),
        }
    }

    fn compare(op: Opcode, a: i64, b: i64) -> bool {
        match op {
            Opcode::SeqVv | Opcode::SeqVs | Opcode::Beq => a == b,
            Opcode::SneVv | Opcode::SneVs | Opcode::Bne => a != b,
            Opcode::SgtVv | Opcode::SgtVs | Opcode::Bgt => a > b,
            Opcode::SltVv | Opcode::SltVs | Opcode::Blt => a < b,
            Opcode::SgeVv | Opcode::SgeVs | Opcode::Bge => a >= b,
            Opcode::SleVv | Opcode::SleVs | Opcode::Ble => a <= b,
            _ => unreachable!("compare called on non-compare opcode {op}"),
        }
    }

    fn exec_scalar_alu(&mut self, ins: &Instruction) -> Result<()> {
        let a = self.srf.read_scalar(ins.src(0))?;
        let b = self.srf.read_scalar(ins.src(1))?;
        let result = Self::scalar_op(ins.opcode, a, b);
        self.srf.write_scalar(ins.dst(), result)?;
        Ok(())
    }

    fn exec_load_scalar(&mut self, ins: &Instruction) -> Result<Annotation> {
        let base = self.srf.read_scalar(ins.src(0))?.unsigned();
        let addr = (base as i64 + ins.imm()) as usize;
        let value = self.sdmem.read(addr)?;
        self.srf.write_scalar(ins.dst(), BitVec::from_signed(value as i64, 32))?;
        Ok(Annotation::Scalar(addr as i64))
    }

    fn exec_store_scalar(&mut self, ins: &Instruction) -> Result<Annotation> {
        let base = self.srf.read_scalar(ins.src(0))?.unsigned();
        let addr = (base as i64 + ins.imm()) as usize;
        let value = self.srf.read_scalar(ins.op(0).as_register().expect("SS source register"))?;
        self.sdmem.write(addr, value.signed() as i32)?;
        Ok(Annotation::Scalar(addr as i64))
    }

    fn exec_vector_vector_alu(&mut self, ins: &Instruction) -> Result<()> {
        let a = self.vrf.read(ins.src(0))?.to_vec();
        let b = self.vrf.read(ins.src(1))?.to_vec();
        let values: Vec<BitVec> = (0..self.vl)
            .map(|i| Self::vector_op(ins.opcode, a[i], b[i]))
            .collect();
        self.vrf.write_vector(ins.dst(), &values, &self.vm, self.vl)?;
        Ok(())
    }

    fn exec_vector_scalar_alu(&mut self, ins: &Instruction) -> Result<()> {
        let a = self.vrf.read(ins.src(0))?.to_vec();
        let b = self.srf.read_scalar(ins.src(1))?;
        let values: Vec<BitVec> = (0..self.vl)
            .map(|i| Self::vector_op(ins.opcode, a[i], b))
            .collect();
        self.vrf.write_vector(ins.dst(), &values, &self.vm, self.vl)?;
        Ok(())
    }

    fn exec_vector_vector_compare(&mut self, ins: &Instruction) -> Result<()> {
        // Mask compares carry no destination register: op(0)/op(1) are the
        // two vector sources directly, unlike the dst-first ALU layout.
        let a = self.vrf.read(ins.op(0).as_register().expect("compare lhs"))?.to_vec();
        let b = self.vrf.read(ins.op(1).as_register().expect("compare rhs"))?.to_vec();
        for i in 0..MVL {
            self.vm[i] = Self::compare(ins.opcode, a[i].signed(), b[i].signed());
        }
        Ok(())
    }

    fn exec_vector_scalar_compare(&mut self, ins: &Instruction) -> Result<()> {
        let a = self.vrf.read(ins.op(0).as_register().expect("compare lhs"))?.to_vec();
        let b = self.srf.read_scalar(ins.op(1).as_register().expect("compare rhs"))?.signed();
        for i in 0..MVL {
            self.vm[i] = Self::compare(ins.opcode, a[i].signed(), b);
        }
        Ok(())
    }

    /// Generate the `MVL` addresses a vector memory op touches, per §4.3's
    /// stride/indexed/strided variants
    fn vector_mem_addresses(&self, ins: &Instruction, base: u64) -> Result<Vec<u64>> {
        match ins.opcode {
            Opcode::Lv | Opcode::Sv => Ok((0..MVL as u64).map(|i| base + i).collect()),
            Opcode::Lvws | Opcode::Svws => {
                let stride = self.srf.read_scalar(ins.op(2).as_register().expect("stride register"))?.unsigned();
                if stride > 0 {
                    Ok((0..MVL as u64).map(|i| base + i * stride).collect())
                } else {
                    Ok(vec![base; MVL])
                }
            }
            Opcode::Lvi | Opcode::Svi => {
                let offsets = self.vrf.read(ins.op(2).as_register().expect("index register"))?;
                Ok(offsets.iter().map(|o| base + o.unsigned()).collect())
            }
            _ => unreachable!("vector_mem_addresses called on non-vector-memory opcode"),
        }
    }

    fn exec_vector_load(&mut self, ins: &Instruction) -> Result<Annotation> {
        let base = self.srf.read_scalar(ins.src(0))?.unsigned();
        let addrs = self.vector_mem_addresses(ins, base)?;
        let mut values = vec![BitVec::default(); self.vl];
        for i in 0..self.vl {
            if self.vm[i] {
                let word = self.vdmem.read(addrs[i] as usize)?;
                values[i] = BitVec::from_signed(word as i64, 32);
            }
        }
        self.vrf.write_vector(ins.dst(), &values, &self.vm, self.vl)?;
        Ok(Annotation::Vector(addrs[..self.vl].iter().map(|a| *a as i64).collect()))
    }

    fn exec_vector_store(&mut self, ins: &Instruction) -> Result<Annotation> {
        let base = self.srf.read_scalar(ins.src(0))?.unsigned();
        let addrs = self.vector_mem_addresses(ins, base)?;
        let source = self.vrf.read(ins.dst())?.to_vec();
        for i in 0..self.vl {
            if self.vm[i] {
                self.vdmem.write(addrs[i] as usize, source[i].signed() as i32)?;
            }
        }
        Ok(Annotation::Vector(addrs[..self.vl].iter().map(|a| *a as i64).collect()))
    }

    fn exec_branch(&mut self, ins: &Instruction) -> Result<Annotation> {
        let d1 = self.srf.read_scalar(ins.op(0).as_register().expect("branch lhs"))?.signed();
        let d2 = self.srf.read_scalar(ins.op(1).as_register().expect("branch rhs"))?.signed();
        let imm = ins.op(2).as_immediate().expect("branch immediate");
        if Self::compare(ins.opcode, d1, d2) {
            self.branch_taken = true;
            self.branch_pc = (self.pc as i64 + imm) as usize;
        }
        let next_pc = if self.branch_taken { self.branch_pc } else { self.pc + 1 };
        Ok(Annotation::Scalar(next_pc as i64))
    }

    /// Dump `SRF.txt` and `VRF.txt` in the §6 register-dump format
    pub fn dump_registers(&self, srf_path: &Path, vrf_path: &Path) -> Result<()> {
        self.srf.dump(srf_path)?;
        self.vrf.dump(vrf_path)?;
        Ok(())
    }

    /// Dump `SDMEMOP.txt` and `VDMEMOP.txt` in the §6 memory-dump format
    pub fn dump_memories(&self, sdmem_path: &Path, vdmem_path: &Path) -> Result<()> {
        self.sdmem.dump(sdmem_path)?;
        self.vdmem.dump(vdmem_path)?;
        Ok(())
    }

    /// Current program counter, for diagnostics
    pub fn pc(&self) -> usize {
        self.pc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn core_with_program(lines: &[&str]) -> FunctionalCore {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
        let imem = IMem::load(f.path()).unwrap();
        let sdmem = DMem::new("SDMEM", SDMEM_ADDRESS_BITS);
        let vdmem = DMem::new("VDMEM", VDMEM_ADDRESS_BITS);
        FunctionalCore::new(imem, sdmem, vdmem)
    }

    #[test]
    fn scalar_add_end_to_end() {
        let mut core = core_with_program(&["ADD SR3 SR1 SR2", "HALT"]);
        core.srf.write_scalar(crate::core::register::Register::scalar(1), BitVec::new(5)).unwrap();
        core.srf.write_scalar(crate::core::register::Register::scalar(2), BitVec::new(7)).unwrap();
        core.run(None).unwrap();
        assert!(core.halted());
        assert_eq!(
            core.srf.read_scalar(crate::core::register::Register::scalar(3)).unwrap().signed(),
            12
        );
    }

    #[test]
    fn vector_vector_add_respects_mask_and_vl() {
        use crate::core::register::Register;
        let mut core = core_with_program(&["ADDVV VR3 VR1 VR2", "HALT"]);
        core.vl = 4;
        core.vm = vec![false; MVL];
        core.vm[0] = true;
        core.vm[2] = true;
        core.vm[3] = true;
        let v1: Vec<BitVec> = (0..MVL).map(|i| BitVec::new(10 * (i as i64 + 1))).collect();
        let v2: Vec<BitVec> = (0..MVL).map(|i| BitVec::new(i as i64 + 1)).collect();
        core.vrf.write_vector(Register::vector(1), &v1, &vec![true; MVL], MVL).unwrap();
        core.vrf.write_vector(Register::vector(2), &v2, &vec![true; MVL], MVL).unwrap();
        core.run(None).unwrap();
        let out = core.vrf.read(Register::vector(3)).unwrap();
        assert_eq!(out[0].signed(), 11);
        assert_eq!(out[1].signed(), 0);
        assert_eq!(out[2].signed(), 33);
        assert_eq!(out[3].signed(), 44);
        assert_eq!(out[4].signed(), 0);
    }

    #[test]
    fn strided_store_then_indexed_load() {
        use crate::core::register::Register;
        let mut core = core_with_program(&["SVWS VR1 SR0 SR4", "LVI VR2 SR0 VR3", "HALT"]);
        core.vl = 64;
        core.vm = vec![true; MVL];
        let values: Vec<BitVec> = (0..MVL).map(|i| BitVec::new(i as i64)).collect();
        core.vrf.write_vector(Register::vector(1), &values, &vec![true; MVL], MVL).unwrap();
        core.srf.write_scalar(Register::scalar(0), BitVec::new(0)).unwrap();
        core.srf.write_scalar(Register::scalar(4), BitVec::new(2)).unwrap();
        let idx: Vec<BitVec> = (0..MVL).map(|i| BitVec::new(2 * i as i64)).collect();
        core.vrf.write_vector(Register::vector(3), &idx, &vec![true; MVL], MVL).unwrap();

        core.step().unwrap();
        assert_eq!(core.vdmem.read(0).unwrap(), 0);
        assert_eq!(core.vdmem.read(2).unwrap(), 1);
        assert_eq!(core.vdmem.read(126).unwrap(), 63);

        core.step().unwrap();
        let out = core.vrf.read(Register::vector(2)).unwrap();
        assert_eq!(out[0].signed(), 0);
        assert_eq!(out[1].signed(), 1);
        assert_eq!(out[2].signed(), 2);
    }

    #[test]
    fn branch_loop_runs_until_condition_false() {
        use crate::core::register::Register;
        let mut core = core_with_program(&[
            "ADD SR1 SR1 SR2",
            "BLT SR1 SR3 -1",
            "HALT",
        ]);
        core.srf.write_scalar(Register::scalar(2), BitVec::new(1)).unwrap();
        core.srf.write_scalar(Register::scalar(3), BitVec::new(5)).unwrap();
        core.run(Some(1000)).unwrap();
        assert_eq!(core.srf.read_scalar(Register::scalar(1)).unwrap().signed(), 5);
    }

    #[test]
    fn max_instructions_cap_trips_on_infinite_loop() {
        let mut core = core_with_program(&["BEQ SR0 SR0 0"]);
        assert!(matches!(
            core.run(Some(10)),
            Err(SimError::MaxInstructionsExceeded { limit: 10 })
        ));
    }

    #[test]
    fn cvm_then_pop_writes_mvl() {
        use crate::core::register::Register;
        let mut core = core_with_program(&["CVM", "POP SR1", "HALT"]);
        core.vm = vec![false; MVL];
        core.run(None).unwrap();
        assert_eq!(core.srf.read_scalar(Register::scalar(1)).unwrap().signed(), MVL as i64);
    }

    #[test]
    fn mtcl_mfcl_round_trips_in_range() {
        use crate::core::register::Register;
        let mut core = core_with_program(&["MTCL SR1", "MFCL SR2", "HALT"]);
        core.srf.write_scalar(Register::scalar(1), BitVec::new(4)).unwrap();
        core.run(None).unwrap();
        assert_eq!(core.srf.read_scalar(Register::scalar(2)).unwrap().signed(), 4);
    }

    #[test]
    fn divide_by_zero_in_vector_lane_saturates() {
        use crate::core::register::Register;
        let mut core = core_with_program(&["DIVVS VR2 VR1 SR0", "HALT"]);
        core.vl = 1;
        let v1 = vec![BitVec::new(10); MVL];
        core.vrf.write_vector(Register::vector(1), &v1, &vec![true; MVL], MVL).unwrap();
        core.srf.write_scalar(Register::scalar(0), BitVec::new(0)).unwrap();
        core.run(None).unwrap();
        let out = core.vrf.read(Register::vector(2)).unwrap();
        assert_eq!(out[0].signed(), i32::MAX as i64);
    }

    #[test]
    fn trace_records_vector_memory_addresses() {
        use crate::core::register::Register;
        let dir = tempfile::tempdir().unwrap();
        let trace_path = dir.path().join("trace.txt");
        let mut core = core_with_program(&["LV VR1 SR0", "HALT"]);
        core.vl = 4;
        core.vm = vec![true; MVL];
        core.enable_trace(&trace_path).unwrap();
        core.run(None).unwrap();

        let written = std::fs::read_to_string(&trace_path).unwrap();
        assert!(written.lines().next().unwrap().starts_with("LV VR1 SR0 (0,1,2,3)"));
    }
}
