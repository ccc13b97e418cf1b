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

use std::hint::black_box;
use std::io::Write as _;

use criterion::{criterion_group, criterion_main, Criterion};

use vecsim::core::config::Config;
use vecsim::core::dmem::DMem;
use vecsim::core::functional::{FunctionalCore, SDMEM_ADDRESS_BITS, VDMEM_ADDRESS_BITS};
use vecsim::core::imem::IMem;
use vecsim::core::itrace::ITrace;
use vecsim::core::timing::TimingCore;

const CONFIG_TEXT: &str = "\
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

fn scalar_loop_program() -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "ADD SR1 SR1 SR2").unwrap();
    writeln!(f, "BLT SR1 SR3 -1").unwrap();
    writeln!(f, "HALT").unwrap();
    f
}

fn functional_step_benchmark(c: &mut Criterion) {
    c.bench_function("functional_core_step", |b| {
        let program = scalar_loop_program();
        b.iter(|| {
            let imem = IMem::load(program.path()).unwrap();
            let sdmem = DMem::new("SDMEM", SDMEM_ADDRESS_BITS);
            let vdmem = DMem::new("VDMEM", VDMEM_ADDRESS_BITS);
            let mut core = FunctionalCore::new(imem, sdmem, vdmem);
            black_box(core.step().unwrap());
        });
    });
}

fn functional_run_benchmark(c: &mut Criterion) {
    c.bench_function("functional_core_run_to_halt", |b| {
        let program = scalar_loop_program();
        b.iter(|| {
            let imem = IMem::load(program.path()).unwrap();
            let sdmem = DMem::new("SDMEM", SDMEM_ADDRESS_BITS);
            let vdmem = DMem::new("VDMEM", VDMEM_ADDRESS_BITS);
            let mut core = FunctionalCore::new(imem, sdmem, vdmem);
            black_box(core.run(Some(10_000)).unwrap());
        });
    });
}

fn timing_run_benchmark(c: &mut Criterion) {
    c.bench_function("timing_core_run", |b| {
        let mut trace_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(trace_file, "LV VR1 SR0 (0,1,2,3)").unwrap();
        writeln!(trace_file, "ADDVV VR2 VR1 VR1 (4)").unwrap();
        writeln!(trace_file, "HALT").unwrap();

        b.iter(|| {
            let config = Config::parse(CONFIG_TEXT).unwrap();
            let trace = ITrace::load(trace_file.path()).unwrap();
            let mut core = TimingCore::new(config, trace);
            black_box(core.run().unwrap());
        });
    });
}

criterion_group!(
    benches,
    functional_step_benchmark,
    functional_run_benchmark,
    timing_run_benchmark
);
criterion_main!(benches);
