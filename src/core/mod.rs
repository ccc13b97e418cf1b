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

//! Core simulator components
//!
//! This module contains the two-stage vector processor model:
//! - Fixed-width two's-complement arithmetic (`bitvec`)
//! - Scalar/vector register naming and storage (`register`, `register_file`)
//! - Word-addressed data memories and program memory (`dmem`, `imem`)
//! - The opcode set and instruction decoding (`opcode`, `instruction`)
//! - The dynamic instruction trace shared between stages (`itrace`)
//! - Microarchitectural configuration (`config`)
//! - The functional (interpreting) core (`functional`)
//! - The cycle-accurate timing core (`timing`)

pub mod bitvec;
pub mod config;
pub mod dmem;
pub mod error;
pub mod functional;
pub mod imem;
pub mod instruction;
pub mod itrace;
pub mod opcode;
pub mod register;
pub mod register_file;
pub mod timing;

pub use config::Config;
pub use error::{Result, SimError};
pub use functional::FunctionalCore;
pub use timing::TimingCore;
