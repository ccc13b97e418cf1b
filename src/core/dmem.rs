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

//! Word-addressed scalar and vector data memory
//!
//! Each cell holds one signed 32-bit word. `SDMEM` has `2^13` words,
//! `VDMEM` has `2^17` words (§3, §6).

use std::io::{BufRead, Write};
use std::path::Path;

use super::error::{Result, SimError};

/// A flat, word-addressed memory of `2^address_bits` 32-bit cells
pub struct DMem {
    name: &'static str,
    data: Vec<i32>,
}

impl DMem {
    /// Create a zero-filled memory of `2^address_bits` words
    pub fn new(name: &'static str, address_bits: u32) -> Self {
        Self {
            name,
            data: vec![0; 1usize << address_bits],
        }
    }

    /// Load initial contents from a text file, one signed decimal integer
    /// per line; line `k` becomes word `k`. Missing trailing lines default
    /// to zero, matching the reset state.
    pub fn load(name: &'static str, address_bits: u32, path: &Path) -> Result<Self> {
        let mut mem = Self::new(name, address_bits);
        let file = std::fs::File::open(path)?;
        for (i, line) in std::io::BufReader::new(file).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if i >= mem.data.len() {
                break;
            }
            let value: i32 = line.parse().map_err(|_| SimError::Config(
                format!("{name} - invalid integer on line {}: `{line}`", i + 1),
            ))?;
            mem.data[i] = value;
        }
        log::info!("{name} - data loaded from file: {}", path.display());
        Ok(mem)
    }

    /// Number of addressable words
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Read word `idx`
    pub fn read(&self, idx: usize) -> Result<i32> {
        self.data.get(idx).copied().ok_or(SimError::Addressing {
            memory: self.name,
            index: idx,
            size: self.data.len(),
        })
    }

    /// Write word `idx`
    pub fn write(&mut self, idx: usize, value: i32) -> Result<()> {
        let size = self.data.len();
        let slot = self
            .data
            .get_mut(idx)
            .ok_or(SimError::Addressing {
                memory: self.name,
                index: idx,
                size,
            })?;
        *slot = value;
        Ok(())
    }

    /// Dump all `size()` cells to `path`, one decimal integer per line
    pub fn dump(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)?;
        for word in &self.data {
            writeln!(file, "{word}")?;
        }
        log::info!("{} - dumped data into output file: {}", self.name, path.display());
        Ok(())
    }
}
