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

//! Test fixtures for building a temporary `--iodir` on disk

use std::path::PathBuf;

use tempfile::TempDir;

/// One on-disk `--iodir`: `Code.asm`, `SDMEM.txt`, `VDMEM.txt`, `Config.txt`
#[allow(dead_code)]
pub struct IoDir {
    dir: TempDir,
}

const DEFAULT_CONFIG: &str = "\
dataQueueDepth=4
computeQueueDepth=4
numLanes=4
pipelineDepthMul=8
pipelineDepthDiv=20
pipelineDepthAdd=2
vlsPipelineDepth=4
vdmNumBanks=4
vdmBankWait=1
";

#[allow(dead_code)]
impl IoDir {
    /// Build an iodir with the given `Code.asm` lines and the default config
    pub fn new(code_lines: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Code.asm"), code_lines.join("\n")).unwrap();
        std::fs::write(dir.path().join("SDMEM.txt"), "").unwrap();
        std::fs::write(dir.path().join("VDMEM.txt"), "").unwrap();
        std::fs::write(dir.path().join("Config.txt"), DEFAULT_CONFIG).unwrap();
        Self { dir }
    }

    /// Override `SDMEM.txt` with the given words, one per line
    pub fn with_sdmem(self, words: &[i32]) -> Self {
        let text: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        std::fs::write(self.dir.path().join("SDMEM.txt"), text.join("\n")).unwrap();
        self
    }

    /// Override `VDMEM.txt` with the given words, one per line
    pub fn with_vdmem(self, words: &[i32]) -> Self {
        let text: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        std::fs::write(self.dir.path().join("VDMEM.txt"), text.join("\n")).unwrap();
        self
    }

    /// Override `Config.txt` with arbitrary text
    pub fn with_config(self, text: &str) -> Self {
        std::fs::write(self.dir.path().join("Config.txt"), text).unwrap();
        self
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
