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

//! Simulator error types

use thiserror::Error;

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimError>;

/// Simulator error types
#[derive(Debug, Error)]
pub enum SimError {
    /// Malformed instruction line, unknown opcode, or invalid operand
    #[error("decode error on line {line_no}: {reason} (`{line}`)")]
    Decode {
        /// 1-based line number in the source file
        line_no: usize,
        /// Offending line text, with comments already stripped
        line: String,
        /// Human-readable reason
        reason: String,
    },

    /// Memory index out of range
    #[error("{memory} - invalid memory access at index {index} (size {size})")]
    Addressing {
        /// Name of the memory (`SDMEM`, `VDMEM`, `IMEM`, `ITrace`, ...)
        memory: &'static str,
        /// The index that was accessed
        index: usize,
        /// The memory's capacity
        size: usize,
    },

    /// A `Register` was presented to a `RegisterFile` of the wrong kind
    #[error("register kind mismatch: expected {expected:?}, got {got:?}")]
    RegisterKind {
        /// Kind the register file expects
        expected: crate::core::register::RegisterKind,
        /// Kind the caller actually passed
        got: crate::core::register::RegisterKind,
    },

    /// Config file is missing a required key, or a value fails to parse
    #[error("config error: {0}")]
    Config(String),

    /// The functional core's optional `--max-instructions` safety cap tripped
    #[error("exceeded the maximum instruction count ({limit}) without halting")]
    MaxInstructionsExceeded {
        /// The cap that was hit
        limit: u64,
    },

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
