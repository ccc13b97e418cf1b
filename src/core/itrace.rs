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

//! Dynamic instruction trace, read by the timing core and written by the
//! functional core.

use std::io::{BufRead, Write};
use std::path::Path;

use super::error::Result;
use super::instruction::{parse_traced_line, Instruction, TracedInstruction};

/// An in-memory dynamic instruction trace
pub struct ITrace {
    instructions: Vec<TracedInstruction>,
}

impl ITrace {
    /// Load a `trace.txt`-format file
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let mut instructions = Vec::new();
        for (i, line) in std::io::BufReader::new(file).lines().enumerate() {
            let line = line?;
            if let Some(ins) = parse_traced_line(&line, i + 1)? {
                instructions.push(ins);
            }
        }
        log::info!("ITrace - instruction trace loaded from file: {}", path.display());
        Ok(Self { instructions })
    }

    /// Number of retired instructions recorded in the trace
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// `true` if the trace is empty
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Read the trace entry at `idx`, or a synthetic `HALT` past the end
    pub fn read(&self, idx: usize) -> TracedInstruction {
        self.instructions
            .get(idx)
            .cloned()
            .unwrap_or(TracedInstruction {
                instruction: Instruction::halt(),
                annotation: None,
            })
    }
}

/// Writes retired instructions to `trace.txt` in the §4.3 format, one line
/// per instruction: `OPCODE op0 op1 ... (annotation)`, the annotation
/// omitted when absent.
pub struct TraceWriter {
    file: std::fs::File,
}

impl TraceWriter {
    /// Create (truncating) the trace file at `path`
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self {
            file: std::fs::File::create(path)?,
        })
    }

    /// Append one retired instruction to the trace file
    pub fn write(&mut self, entry: &TracedInstruction) -> Result<()> {
        writeln!(self.file, "{entry}")?;
        Ok(())
    }
}
