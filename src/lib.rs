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

//! Two-stage vector processor simulator core library
//!
//! This library provides the functional (interpreting) core and the
//! cycle-accurate timing core for a configurable vector processor, along
//! with the shared instruction, register and memory model both stages
//! operate on.
//!
//! # Example
//!
//! ```no_run
//! use vecsim::core::dmem::DMem;
//! use vecsim::core::functional::{FunctionalCore, SDMEM_ADDRESS_BITS, VDMEM_ADDRESS_BITS};
//! use vecsim::core::imem::IMem;
//!
//! let imem = IMem::load("Code.asm".as_ref()).unwrap();
//! let sdmem = DMem::new("SDMEM", SDMEM_ADDRESS_BITS);
//! let vdmem = DMem::new("VDMEM", VDMEM_ADDRESS_BITS);
//! let mut core = FunctionalCore::new(imem, sdmem, vdmem);
//! core.run(None).unwrap();
//! ```

pub mod core;
