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

use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use vecsim::core::dmem::DMem;
use vecsim::core::error::Result;
use vecsim::core::functional::{FunctionalCore, SDMEM_ADDRESS_BITS, VDMEM_ADDRESS_BITS};
use vecsim::core::imem::IMem;

/// Functional (interpreting) vector processor simulator
#[derive(Parser)]
#[command(name = "funcsim")]
#[command(about = "Run a vector program to completion and dump architectural state", long_about = None)]
struct Args {
    /// Directory containing Code.asm, SDMEM.txt, VDMEM.txt
    #[arg(long)]
    iodir: PathBuf,

    /// Emit a dynamic instruction trace to trace.txt in --iodir
    #[arg(long)]
    trace: bool,

    /// Abort with an error after this many instructions without halting
    #[arg(long)]
    max_instructions: Option<u64>,

    /// Raise the log level to debug
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_level = if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::from_default_env()
        .filter_level(default_level)
        .init();

    info!("funcsim v{}", env!("CARGO_PKG_VERSION"));
    info!("iodir: {}", args.iodir.display());

    let imem = IMem::load(&args.iodir.join("Code.asm"))?;
    let sdmem = DMem::load("SDMEM", SDMEM_ADDRESS_BITS, &args.iodir.join("SDMEM.txt"))?;
    let vdmem = DMem::load("VDMEM", VDMEM_ADDRESS_BITS, &args.iodir.join("VDMEM.txt"))?;

    let mut core = FunctionalCore::new(imem, sdmem, vdmem);

    if args.trace {
        core.enable_trace(&args.iodir.join("trace.txt"))?;
    }

    if let Err(e) = core.run(args.max_instructions) {
        error!("funcsim - aborted at PC={}: {e}", core.pc());
        return Err(e);
    }

    core.dump_registers(&args.iodir.join("SRF.txt"), &args.iodir.join("VRF.txt"))?;
    core.dump_memories(&args.iodir.join("SDMEMOP.txt"), &args.iodir.join("VDMEMOP.txt"))?;

    info!("funcsim - completed in {} instructions", core.instructions_executed());
    Ok(())
}
