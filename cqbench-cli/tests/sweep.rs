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

//! Sweep drivers end to end, against a real device when one exists.

use cqbench_cli::{RepeatSweep, run_compare_sweep, run_repeat_sweep};
use cqbench_core::{CaptureSink, DOUBLE_KERNEL_SOURCE, KernelSource};

fn field_count(line: &str) -> usize {
    line.split_whitespace()
        .map(|f| f.parse::<f64>().expect("numeric field"))
        .count()
}

#[test]
fn repeat_sweep_prints_header_and_six_field_rows() {
    let sweep = RepeatSweep {
        sizes: &[(32, 32)],
        num_images: 16,
        repeats: 2,
    };
    let source = KernelSource::Inline(DOUBLE_KERNEL_SOURCE);
    let sink = CaptureSink::new();
    let mut out = Vec::new();

    if let Err(e) = run_repeat_sweep(&sweep, &source, &mut out, &sink) {
        eprintln!("no usable OpenCL runtime, skipping: {e}");
        return;
    }

    let text = String::from_utf8(out).expect("utf8 output");
    let mut lines = text.lines();
    let header = lines.next().expect("header line");
    assert!(header.starts_with('#'));
    assert!(header.contains("profiling"));

    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 2, "one row per profiling mode: {text}");
    for row in rows {
        assert_eq!(field_count(row), 6, "row {row:?}");
    }
    assert!(sink.is_empty(), "unexpected diagnostics: {:?}", sink.entries());
}

#[test]
fn compare_sweep_prints_header_and_five_field_rows() {
    let grid = [(32usize, 32usize, 4usize)];
    let source = KernelSource::Inline(DOUBLE_KERNEL_SOURCE);
    let sink = CaptureSink::new();
    let mut out = Vec::new();

    if let Err(e) = run_compare_sweep(&grid, &source, &mut out, &sink) {
        eprintln!("no usable OpenCL runtime, skipping: {e}");
        return;
    }

    let text = String::from_utf8(out).expect("utf8 output");
    let mut lines = text.lines();
    let header = lines.next().expect("header line");
    assert!(header.starts_with('#'));
    assert!(header.contains("num_images"));

    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 1, "one row per grid point: {text}");
    assert_eq!(field_count(rows[0]), 5);
    assert!(rows[0].starts_with("32 32 4 "));
}

#[test]
fn unreadable_source_aborts_the_sweep() {
    let sweep = RepeatSweep {
        sizes: &[(32, 32)],
        num_images: 4,
        repeats: 1,
    };
    let source = KernelSource::File("/no/such/dir/kernel.cl".into());
    let sink = CaptureSink::new();
    let mut out = Vec::new();

    match run_repeat_sweep(&sweep, &source, &mut out, &sink) {
        Err(cqbench_core::CqError::SourceUnreadable(label, _)) => {
            assert!(label.contains("kernel.cl"));
        }
        Err(e) => eprintln!("no usable OpenCL runtime, skipping: {e}"),
        Ok(()) => panic!("sweep must not succeed with an unreadable source"),
    }
}
