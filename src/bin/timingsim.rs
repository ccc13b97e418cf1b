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

use vecsim::core::config::Config;
use vecsim::core::error::Result;
use vecsim::core::itrace::ITrace;
use vecsim::core::timing::TimingCore;

/// Cycle-accurate vector processor timing simulator
#[derive(Parser)]
#[command(name = "timingsim")]
#[command(about = "Replay a dynamic instruction trace and report the cycle count", long_about = None)]
struct Args {
    /// Directory containing trace.txt and Config.txt
    #[arg(long)]
    iodir: PathBuf,

    /// Emit a per-cycle event log to cyclewise.log in --iodir
    #[arg(long)]
    cyclewise: bool,

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

    info!("timingsim v{}", env!("CARGO_PKG_VERSION"));
    info!("iodir: {}", args.iodir.display());

    let config = Config::load(&args.iodir.join("Config.txt"))?;
    let trace = ITrace::load(&args.iodir.join("trace.txt"))?;

    let mut core = TimingCore::new(config, trace);

    if args.cyclewise {
        core.enable_cyclewise_log(&args.iodir.join("cyclewise.log"))?;
    }

    let cycles = match core.run() {
        Ok(cycles) => cycles,
        Err(e) => {
            error!("timingsim - run failed: {e}");
            return Err(e);
        }
    };

    info!("timingsim - completed in {cycles} cycles");
    println!("{cycles}");
    Ok(())
}
