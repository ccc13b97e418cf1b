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

//! Microarchitectural configuration (`Config.txt`)
//!
//! A key=value text file of positive integers, `#`-comments and blank
//! lines ignored. Every key in [`Config`] is required; a missing key is a
//! fatal config error at startup rather than a silent default, since a
//! missing knob would otherwise silently change the timing model.

use std::path::Path;

use super::error::{Result, SimError};

/// Microarchitectural parameters consumed by the timing core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Max entries in the vector-data dispatch queue
    pub data_queue_depth: usize,
    /// Max entries in the vector-compute dispatch queue
    pub compute_queue_depth: usize,
    /// Parallel lanes in vector functional units and the LSU
    pub num_lanes: usize,
    /// Multiplier pipeline depth
    pub pipeline_depth_mul: usize,
    /// Divider pipeline depth
    pub pipeline_depth_div: usize,
    /// Adder pipeline depth (covers add/sub/logical/shift/compare)
    pub pipeline_depth_add: usize,
    /// Per-lane load-store pipeline depth
    pub vls_pipeline_depth: usize,
    /// Number of interleaved VDMEM banks
    pub vdm_num_banks: usize,
    /// Cycles a bank remains busy after an access starts
    pub vdm_bank_wait: usize,
}

const REQUIRED_KEYS: &[&str] = &[
    "dataQueueDepth",
    "computeQueueDepth",
    "numLanes",
    "pipelineDepthMul",
    "pipelineDepthDiv",
    "pipelineDepthAdd",
    "vlsPipelineDepth",
    "vdmNumBanks",
    "vdmBankWait",
];

impl Config {
    /// Parse a `Config.txt`-format file
    ///
    /// Follows the same key=value / `#`-comment / blank-line-skipping
    /// shape as a typical SYSTEM.CNF-style parser: `line.split_once('=')`
    /// per non-comment line, trimmed on both sides.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse config text directly (used by tests and [`Config::load`])
    pub fn parse(text: &str) -> Result<Self> {
        let mut values = std::collections::HashMap::new();

        for (i, raw) in text.lines().enumerate() {
            let line = match raw.find('#') {
                Some(idx) => &raw[..idx],
                None => raw,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, val) = line.split_once('=').ok_or_else(|| {
                SimError::Config(format!("malformed line {}: `{line}`", i + 1))
            })?;
            let key = key.trim();
            let val = val.trim();
            let parsed: i64 = val.parse().map_err(|_| {
                SimError::Config(format!("`{key}` is not an integer: `{val}`"))
            })?;
            values.insert(key.to_string(), parsed);
        }

        for key in REQUIRED_KEYS {
            if !values.contains_key(*key) {
                return Err(SimError::Config(format!("missing required key `{key}`")));
            }
        }

        let get = |key: &str| -> usize { values[key] as usize };

        log::info!("Config - parameters loaded: {values:?}");

        Ok(Self {
            data_queue_depth: get("dataQueueDepth"),
            compute_queue_depth: get("computeQueueDepth"),
            num_lanes: get("numLanes"),
            pipeline_depth_mul: get("pipelineDepthMul"),
            pipeline_depth_div: get("pipelineDepthDiv"),
            pipeline_depth_add: get("pipelineDepthAdd"),
            vls_pipeline_depth: get("vlsPipelineDepth"),
            vdm_num_banks: get("vdmNumBanks"),
            vdm_bank_wait: get("vdmBankWait"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
        # a comment
        dataQueueDepth=4
        computeQueueDepth = 4
        numLanes=4
        pipelineDepthMul=8
        pipelineDepthDiv=20
        pipelineDepthAdd=2
        vlsPipelineDepth=4
        vdmNumBanks=4
        vdmBankWait=1
    ";

    #[test]
    fn parses_all_required_keys() {
        let cfg = Config::parse(SAMPLE).unwrap();
        assert_eq!(cfg.num_lanes, 4);
        assert_eq!(cfg.pipeline_depth_div, 20);
        assert_eq!(cfg.vdm_bank_wait, 1);
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let missing = SAMPLE.replace("vdmBankWait=1", "");
        assert!(matches!(Config::parse(&missing), Err(SimError::Config(_))));
    }

    #[test]
    fn non_integer_value_is_a_config_error() {
        let bad = SAMPLE.replace("numLanes=4", "numLanes=four");
        assert!(matches!(Config::parse(&bad), Err(SimError::Config(_))));
    }
}
