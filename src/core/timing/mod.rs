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

//! The cycle-accurate timing core
//!
//! Walks a dynamic instruction trace through fetch, decode, dispatch and
//! backend stages, charging cycles for structural hazards (queue depth,
//! functional-unit occupancy, bank conflicts) and data hazards (the
//! [`scoreboard::Scoreboard`]). Each cycle's phases are evaluated in
//! reverse pipeline order — backend, then dispatch, then decode, then
//! fetch — so that a stage never acts on a slot another stage has already
//! refilled in the same cycle.

pub mod lsu;
pub mod scoreboard;
pub mod unit;

use std::collections::VecDeque;
use std::io::Write;
use std::path::Path;

use super::config::Config;
use super::error::Result;
use super::functional::MVL;
use super::itrace::ITrace;
use super::opcode::ComputeBackend;
use super::instruction::{Annotation, TracedInstruction};
use lsu::LoadStorePipeline;
use scoreboard::Scoreboard;
use unit::FunctionalUnit;

fn vector_length(entry: &TracedInstruction) -> u64 {
    match &entry.annotation {
        Some(Annotation::Scalar(vl)) => (*vl).max(0) as u64,
        _ => MVL as u64,
    }
}

/// Cycles charged to a vector-compute instruction of the given pipeline
/// depth operating on `length` elements across `num_lanes` lanes
fn compute_cycles(depth: usize, length: u64, num_lanes: usize) -> u64 {
    let lanes = num_lanes.max(1) as u64;
    let ceil_div = length.div_ceil(lanes).max(1);
    depth.saturating_sub(1) as u64 + ceil_div
}

/// The cycle-stepping timing simulator
pub struct TimingCore {
    config: Config,
    trace: ITrace,
    pc: usize,
    halted: bool,

    scoreboard: Scoreboard,
    decode_slot: Option<TracedInstruction>,
    scalar_slot: Option<TracedInstruction>,
    data_queue: VecDeque<TracedInstruction>,
    compute_queue: VecDeque<TracedInstruction>,

    lsu: LoadStorePipeline,
    multiplier: FunctionalUnit,
    divider: FunctionalUnit,
    adder: FunctionalUnit,
    scalar_unit: FunctionalUnit,

    cycle: u64,
    cyclewise: Option<std::fs::File>,
}

impl TimingCore {
    /// Build a timing core over the given dynamic trace and config
    pub fn new(config: Config, trace: ITrace) -> Self {
        Self {
            lsu: LoadStorePipeline::new(&config),
            config,
            trace,
            pc: 0,
            halted: false,
            scoreboard: Scoreboard::new(),
            decode_slot: None,
            scalar_slot: None,
            data_queue: VecDeque::new(),
            compute_queue: VecDeque::new(),
            multiplier: FunctionalUnit::new(),
            divider: FunctionalUnit::new(),
            adder: FunctionalUnit::new(),
            scalar_unit: FunctionalUnit::new(),
            cycle: 0,
            cyclewise: None,
        }
    }

    /// Enable a per-cycle event log, truncating any existing file at `path`
    pub fn enable_cyclewise_log(&mut self, path: &Path) -> Result<()> {
        self.cyclewise = Some(std::fs::File::create(path)?);
        Ok(())
    }

    fn log_cycle(&mut self, event: &str) {
        if let Some(file) = &mut self.cyclewise {
            let _ = writeln!(file, "cycle {}: {event}", self.cycle);
        }
    }

    /// Total cycles this core has stepped through so far
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    fn backend_phase(&mut self) {
        if let Some(entry) = self.lsu.advance() {
            self.scoreboard.unmark(&entry.instruction);
            self.log_cycle(&format!("retire (lsu) {entry}"));
        }
        if let Some(entry) = self.multiplier.advance() {
            self.scoreboard.unmark(&entry.instruction);
            self.log_cycle(&format!("retire (mul) {entry}"));
        }
        if let Some(entry) = self.divider.advance() {
            self.scoreboard.unmark(&entry.instruction);
            self.log_cycle(&format!("retire (div) {entry}"));
        }
        if let Some(entry) = self.adder.advance() {
            self.scoreboard.unmark(&entry.instruction);
            self.log_cycle(&format!("retire (add) {entry}"));
        }
        if let Some(entry) = self.scalar_unit.advance() {
            self.scoreboard.unmark(&entry.instruction);
            self.log_cycle(&format!("retire (scalar) {entry}"));
        }
    }

    fn try_dispatch_data(&mut self) -> bool {
        let Some(entry) = self.data_queue.front() else {
            return false;
        };
        if !self.lsu.is_free() {
            return false;
        }
        let entry = self.data_queue.pop_front().unwrap();
        self.log_cycle(&format!("dispatch (data) {entry}"));
        self.lsu.dispatch(entry);
        true
    }

    fn try_dispatch_compute(&mut self) -> bool {
        let Some(entry) = self.compute_queue.front() else {
            return false;
        };
        let backend = entry.instruction.opcode.compute_backend();
        let (unit, depth) = match backend {
            ComputeBackend::Multiplier => (&mut self.multiplier, self.config.pipeline_depth_mul),
            ComputeBackend::Divider => (&mut self.divider, self.config.pipeline_depth_div),
            ComputeBackend::Adder => (&mut self.adder, self.config.pipeline_depth_add),
        };
        if !unit.is_free() {
            return false;
        }
        let entry = self.compute_queue.pop_front().unwrap();
        let cycles = compute_cycles(depth, vector_length(&entry), self.config.num_lanes);
        self.log_cycle(&format!("dispatch (compute) {entry}"));
        unit.dispatch(entry, cycles);
        true
    }

    fn try_dispatch_scalar(&mut self) -> bool {
        let Some(entry) = self.scalar_slot.take() else {
            return false;
        };
        if !self.scalar_unit.is_free() {
            self.scalar_slot = Some(entry);
            return false;
        }
        self.log_cycle(&format!("dispatch (scalar) {entry}"));
        self.scalar_unit.dispatch(entry, 1);
        true
    }

    /// Fixed-priority arbitration: at most one of data, compute, scalar
    /// fires per cycle, in that order.
    fn dispatch_phase(&mut self) {
        if self.try_dispatch_data() {
            return;
        }
        if self.try_dispatch_compute() {
            return;
        }
        self.try_dispatch_scalar();
    }

    fn decode_phase(&mut self) {
        let Some(entry) = self.decode_slot.take() else {
            return;
        };

        if entry.instruction.opcode.is_branch() {
            self.log_cycle(&format!("decode (branch, retires immediately) {entry}"));
            return;
        }

        if !self.scoreboard.is_free(&entry.instruction) {
            self.decode_slot = Some(entry);
            return;
        }

        let opcode = entry.instruction.opcode;
        let admitted = if opcode.is_vector_data() {
            self.data_queue.len() < self.config.data_queue_depth
        } else if opcode.is_vector_compute() {
            self.compute_queue.len() < self.config.compute_queue_depth
        } else {
            self.scalar_slot.is_none()
        };

        if !admitted {
            self.decode_slot = Some(entry);
            return;
        }

        self.scoreboard.mark(&entry.instruction);
        self.log_cycle(&format!("decode -> queue {entry}"));
        if opcode.is_vector_data() {
            self.data_queue.push_back(entry);
        } else if opcode.is_vector_compute() {
            self.compute_queue.push_back(entry);
        } else {
            self.scalar_slot = Some(entry);
        }
    }

    fn fetch_phase(&mut self) {
        if self.halted || self.decode_slot.is_some() {
            return;
        }
        let entry = self.trace.read(self.pc);
        if entry.instruction.opcode == super::opcode::Opcode::Halt {
            self.halted = true;
            return;
        }
        self.pc += 1;
        self.log_cycle(&format!("fetch {entry}"));
        self.decode_slot = Some(entry);
    }

    fn terminated(&self) -> bool {
        self.halted
            && self.decode_slot.is_none()
            && self.scalar_slot.is_none()
            && self.data_queue.is_empty()
            && self.compute_queue.is_empty()
            && self.lsu.is_free()
            && self.multiplier.is_free()
            && self.divider.is_free()
            && self.adder.is_free()
            && self.scalar_unit.is_free()
    }

    fn step(&mut self) {
        self.cycle += 1;
        self.backend_phase();
        self.dispatch_phase();
        self.decode_phase();
        self.fetch_phase();
    }

    /// Run to completion, returning the total cycle count
    pub fn run(&mut self) -> Result<u64> {
        while !self.terminated() {
            self.step();
        }
        log::info!("TimingCore - run complete in {} cycles", self.cycle);
        Ok(self.cycle)
    }
}
