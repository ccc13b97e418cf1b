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

//! Program memory for the functional core
//!
//! Holds the decoded `Code.asm` program. Reads beyond the program but
//! within the `2^16`-instruction capacity return a synthetic `HALT`.

use std::io::BufRead;
use std::path::Path;

use super::error::{Result, SimError};
use super::instruction::{parse_line, Instruction};

/// Immutable, decoded instruction memory
pub struct IMem {
    capacity: usize,
    instructions: Vec<Instruction>,
}

impl IMem {
    /// Maximum number of instructions addressable, `2^16`
    pub const CAPACITY: usize = 1 << 16;

    /// Load and decode a `Code.asm`-format file
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let mut instructions = Vec::new();
        for (i, line) in std::io::BufReader::new(file).lines().enumerate() {
            let line = line?;
            if let Some(ins) = parse_line(&line, i + 1)? {
                instructions.push(ins);
            }
        }
        log::info!("IMEM - instructions loaded from file: {}", path.display());
        Ok(Self {
            capacity: Self::CAPACITY,
            instructions,
        })
    }

    /// Number of decoded instructions in the program
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// `true` if the program is empty
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Read the instruction at `idx`
    ///
    /// Returns a synthetic `HALT` for addresses past the end of the
    /// program but within the `2^16` capacity; fails beyond that.
    pub fn read(&self, idx: usize) -> Result<Instruction> {
        if idx < self.instructions.len() {
            Ok(self.instructions[idx].clone())
        } else if idx < self.capacity {
            Ok(Instruction::halt())
        } else {
            Err(SimError::Addressing {
                memory: "IMEM",
                index: idx,
                size: self.capacity,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_program(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
        f
    }

    #[test]
    fn reads_past_program_end_as_halt() {
        let f = write_program(&["ADD SR1 SR2 SR3"]);
        let imem = IMem::load(f.path()).unwrap();
        assert_eq!(imem.len(), 1);
        assert_eq!(imem.read(1).unwrap().opcode, super::super::opcode::Opcode::Halt);
    }

    #[test]
    fn reads_beyond_capacity_fail() {
        let f = write_program(&["HALT"]);
        let imem = IMem::load(f.path()).unwrap();
        assert!(imem.read(IMem::CAPACITY).is_err());
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let f = write_program(&["# comment", "", "HALT  # trailing"]);
        let imem = IMem::load(f.path()).unwrap();
        assert_eq!(imem.len(), 1);
    }
}
