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

//! Sweep drivers and output formatting for the cqbench executables.

pub mod stats;
pub mod sweep;

pub use stats::RunStats;
pub use sweep::{
    COMPARE_GRID, KERNEL_FILE_ENV, REPEAT_SIZES, RepeatSweep, kernel_source_from_env,
    run_compare_sweep, run_repeat_sweep,
};
