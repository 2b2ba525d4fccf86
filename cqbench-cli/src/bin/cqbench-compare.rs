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

//! Plain-queue vs profiling-queue comparison over the fixed grid.

use std::io::Write;
use std::process;

use cqbench_cli::{COMPARE_GRID, kernel_source_from_env, run_compare_sweep};
use cqbench_core::LogSink;

fn main() {
    env_logger::init();

    let source = kernel_source_from_env();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = run_compare_sweep(COMPARE_GRID, &source, &mut out, &LogSink) {
        log::error!("sweep aborted: {e}");
        process::exit(1);
    }
    let _ = out.flush();
}
