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

//! A depth-pipelined functional unit: multiplier, divider, adder, or the
//! single-cycle scalar backend. Holds at most one instruction at a time.

use crate::core::instruction::TracedInstruction;

/// One functional unit with a fixed-latency countdown
#[derive(Debug, Default)]
pub struct FunctionalUnit {
    current: Option<(TracedInstruction, u64)>,
}

impl FunctionalUnit {
    /// An idle unit
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if no instruction currently occupies the unit
    pub fn is_free(&self) -> bool {
        self.current.is_none()
    }

    /// Occupy the unit for `cycles` cycles (at least 1)
    pub fn dispatch(&mut self, entry: TracedInstruction, cycles: u64) {
        self.current = Some((entry, cycles.max(1)));
    }

    /// Advance the countdown by one cycle, returning the retiring
    /// instruction on the cycle its counter reaches 1
    pub fn advance(&mut self) -> Option<TracedInstruction> {
        match &mut self.current {
            Some((_, counter)) if *counter == 1 => self.current.take().map(|(entry, _)| entry),
            Some((_, counter)) => {
                *counter -= 1;
                None
            }
            None => None,
        }
    }
}
