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

//! The banked, multi-lane vector load/store pipeline
//!
//! Addresses from a vector memory instruction's annotation are striped
//! across `numLanes` per-lane pipelines of depth `vlsPipelineDepth`. Stage
//! 0 of each lane is the bank-access stage: an address cannot leave it
//! while its target bank is busy, so two lanes racing for the same bank in
//! the same cycle force one of them to stall and bubble downstream.

use std::collections::VecDeque;

use super::super::config::Config;
use crate::core::instruction::{Annotation, TracedInstruction};

struct Lane {
    stages: Vec<Option<u64>>,
    pending: VecDeque<u64>,
}

/// The single in-flight vector memory instruction's pipeline state
pub struct LoadStorePipeline {
    lanes: Vec<Lane>,
    bank_busy: Vec<u64>,
    num_banks: usize,
    bank_wait: u64,
    depth: usize,
    current: Option<TracedInstruction>,
    total_addresses: usize,
    completed: usize,
}

impl LoadStorePipeline {
    /// Build a pipeline sized per the microarchitectural config
    pub fn new(config: &Config) -> Self {
        Self {
            lanes: (0..config.num_lanes.max(1))
                .map(|_| Lane {
                    stages: vec![None; config.vls_pipeline_depth.max(1)],
                    pending: VecDeque::new(),
                })
                .collect(),
            bank_busy: vec![0; config.vdm_num_banks.max(1)],
            num_banks: config.vdm_num_banks.max(1),
            bank_wait: config.vdm_bank_wait as u64,
            depth: config.vls_pipeline_depth.max(1),
            current: None,
            total_addresses: 0,
            completed: 0,
        }
    }

    /// `true` if no vector memory instruction currently occupies the unit
    pub fn is_free(&self) -> bool {
        self.current.is_none()
    }

    /// Admit a vector memory instruction, striping its address annotation
    /// across the lanes (lane `i` takes addresses at index `i, i+L, i+2L, …`)
    pub fn dispatch(&mut self, entry: TracedInstruction) {
        let addresses: Vec<u64> = match &entry.annotation {
            Some(Annotation::Vector(addrs)) => addrs.iter().map(|a| *a as u64).collect(),
            Some(Annotation::Scalar(addr)) => vec![*addr as u64],
            None => Vec::new(),
        };
        self.total_addresses = addresses.len();
        self.completed = 0;

        let num_lanes = self.lanes.len();
        for (i, lane) in self.lanes.iter_mut().enumerate() {
            lane.pending = addresses
                .iter()
                .enumerate()
                .filter(|(idx, _)| idx % num_lanes == i)
                .map(|(_, addr)| *addr)
                .collect();
            lane.stages.iter_mut().for_each(|s| *s = None);
            lane.stages[0] = lane.pending.pop_front();
        }
        self.current = Some(entry);
    }

    /// Advance every lane by one pipeline stage, returning the retiring
    /// instruction once every address it generated has exited the pipeline
    pub fn advance(&mut self) -> Option<TracedInstruction> {
        self.current.as_ref()?;

        let depth = self.depth;
        for lane in &mut self.lanes {
            if let Some(_addr) = lane.stages[depth - 1].take() {
                self.completed += 1;
            }
            for s in (1..depth.saturating_sub(1)).rev() {
                lane.stages[s + 1] = lane.stages[s].take();
            }
            if depth > 1 {
                if let Some(addr) = lane.stages[0] {
                    let bank = (addr as usize) % self.num_banks;
                    if self.bank_busy[bank] == 0 {
                        lane.stages[1] = Some(addr);
                        lane.stages[0] = None;
                        self.bank_busy[bank] = self.bank_wait;
                    }
                }
            }
            if lane.stages[0].is_none() {
                if let Some(addr) = lane.pending.pop_front() {
                    lane.stages[0] = Some(addr);
                }
            }
        }

        for busy in &mut self.bank_busy {
            if *busy > 0 {
                *busy -= 1;
            }
        }

        if self.completed >= self.total_addresses {
            self.current.take()
        } else {
            None
        }
    }
}
