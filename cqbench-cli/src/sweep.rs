//
// Licensed to the Apache Software Foundation (ASF) under one or more
// contributor license agreements.  See the NOTICE file distributed with
// this work for additional information regarding copyright ownership.
// The ASF licenses this file to You under the Apache License, Version 2.0
// (the "License"); you may not use this file except in compliance with
// the License.  You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Sweep drivers over problem sizes and batch counts.
//!
//! Two drivers share the same engine. The compare driver times each grid
//! point once on a plain-queue context and once on a profiling-queue
//! context. The repeat driver times each size several times on one
//! workload and prints min/average/max per profiling mode. Result rows go
//! to the writer; everything else goes to the log, so the two streams
//! never meet on one line.

use std::io::Write;

use cqbench_core::cl::engine;
use cqbench_core::{
    CompiledProgram, CqError, DeviceContext, DiagSink, KernelSource, Result, WorkloadBufferSet,
};

use crate::stats::RunStats;

/// Compare-driver grid: (width, height, num_images).
pub const COMPARE_GRID: &[(usize, usize, usize)] = &[
    (256, 256, 4),
    (256, 256, 8),
    (256, 256, 16),
    (512, 512, 4),
    (512, 512, 8),
    (512, 512, 16),
    (1024, 1024, 4),
    (1024, 1024, 8),
    (1024, 1024, 16),
    (2048, 2048, 4),
    (2048, 2048, 8),
];

/// Repeat-driver sizes: powers of two, square.
pub const REPEAT_SIZES: &[(usize, usize)] = &[(256, 256), (512, 512), (1024, 1024), (2048, 2048)];

/// Parameters of the repeat driver.
#[derive(Debug, Clone, Copy)]
pub struct RepeatSweep {
    pub sizes: &'static [(usize, usize)],
    pub num_images: usize,
    pub repeats: usize,
}

impl Default for RepeatSweep {
    fn default() -> Self {
        Self {
            sizes: REPEAT_SIZES,
            num_images: 8,
            repeats: 16,
        }
    }
}

/// Build the program, allocate the workload and measure `repeats` runs
/// on it.
fn bench_point(
    ctx: &DeviceContext,
    source: &KernelSource,
    width: usize,
    height: usize,
    num_images: usize,
    repeats: usize,
    sink: &dyn DiagSink,
) -> Result<RunStats> {
    let program = CompiledProgram::build(ctx, source, "", sink)?;
    let mut buffers = WorkloadBufferSet::create(ctx, width, height, num_images)?;
    let mut stats = RunStats::new();
    for _ in 0..repeats {
        stats.record(engine::run(ctx, &program, &mut buffers, sink));
    }
    Ok(stats)
}

/// Skip-vs-abort policy for one data point. An unreadable kernel source
/// affects every remaining point, so it aborts; other per-point failures
/// are logged and the sweep moves on.
fn point_or_skip(
    point: Result<RunStats>,
    width: usize,
    height: usize,
) -> Result<Option<RunStats>> {
    match point {
        Ok(stats) => Ok(Some(stats)),
        Err(e @ CqError::SourceUnreadable(..)) => Err(e),
        Err(e) => {
            log::error!("skipping {width}x{height}: {e}");
            Ok(None)
        }
    }
}

pub fn compare_row(
    width: usize,
    height: usize,
    num_images: usize,
    plain_seconds: f64,
    profiled_seconds: f64,
) -> String {
    format!("{width} {height} {num_images} {plain_seconds:.6} {profiled_seconds:.6}")
}

pub fn repeat_row(profiling: bool, width: usize, height: usize, stats: &RunStats) -> String {
    format!(
        "{} {} {} {:.6} {:.6} {:.6}",
        profiling as u8,
        width,
        height,
        stats.avg(),
        stats.min(),
        stats.max()
    )
}

/// One row per grid point: `width height num_images time_no_profiling
/// time_profiling`, each time a single measured run.
pub fn run_compare_sweep(
    grid: &[(usize, usize, usize)],
    source: &KernelSource,
    out: &mut dyn Write,
    sink: &dyn DiagSink,
) -> Result<()> {
    writeln!(out, "# width height num_images time_no_profiling time_profiling")?;

    let plain = DeviceContext::create(false)?;
    let profiled = DeviceContext::create(true)?;

    for &(width, height, num_images) in grid {
        let plain_stats = point_or_skip(
            bench_point(&plain, source, width, height, num_images, 1, sink),
            width,
            height,
        )?;
        let profiled_stats = point_or_skip(
            bench_point(&profiled, source, width, height, num_images, 1, sink),
            width,
            height,
        )?;
        if let (Some(p), Some(q)) = (plain_stats, profiled_stats) {
            writeln!(
                out,
                "{}",
                compare_row(width, height, num_images, p.avg(), q.avg())
            )?;
        }
    }
    Ok(())
}

/// One row per (profiling mode, size): `profiling width height avg min
/// max` over `sweep.repeats` runs of one workload. Profiling mode runs
/// first.
pub fn run_repeat_sweep(
    sweep: &RepeatSweep,
    source: &KernelSource,
    out: &mut dyn Write,
    sink: &dyn DiagSink,
) -> Result<()> {
    writeln!(out, "# profiling width height avg min max")?;

    for profiling in [true, false] {
        let ctx = DeviceContext::create(profiling)?;
        for &(width, height) in sweep.sizes {
            let stats = point_or_skip(
                bench_point(
                    &ctx,
                    source,
                    width,
                    height,
                    sweep.num_images,
                    sweep.repeats,
                    sink,
                ),
                width,
                height,
            )?;
            if let Some(stats) = stats {
                writeln!(out, "{}", repeat_row(profiling, width, height, &stats))?;
            }
        }
    }
    Ok(())
}

/// Environment variable naming an external kernel file for the drivers.
pub const KERNEL_FILE_ENV: &str = "CQBENCH_KERNEL_FILE";

/// Kernel source selection: `CQBENCH_KERNEL_FILE` if set, otherwise the
/// built-in doubling kernel.
pub fn kernel_source_from_env() -> KernelSource {
    match std::env::var(KERNEL_FILE_ENV) {
        Ok(path) if !path.is_empty() => KernelSource::File(path.into()),
        _ => KernelSource::Inline(cqbench_core::DOUBLE_KERNEL_SOURCE),
    }
}
