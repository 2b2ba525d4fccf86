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

//! Command-queue microbenchmark engine.
//!
//! Measures the cost of issuing many concurrent compute + readback
//! chains through OpenCL command queues, with and without per-operation
//! profiling enabled on the queue. The pieces compose in order: a
//! [`DeviceContext`] binds the platform's devices to one context and one
//! queue per device, a [`CompiledProgram`] turns kernel source into a
//! callable entry point, a [`WorkloadBufferSet`] owns the per-image
//! buffer pairs, and [`cl::engine::run`] issues the pipelined batch and
//! reports its wall-clock time.

pub mod error;
#[macro_use]
pub mod diag;
#[cfg(feature = "opencl")]
pub mod cl;

pub use diag::{CaptureSink, DiagSink, Diagnostic, LogSink};
pub use error::{CqError, Result, cl_error_name};

#[cfg(feature = "opencl")]
pub use cl::{
    CompiledProgram, DOUBLE_KERNEL_SOURCE, DeviceContext, KERNEL_ENTRY_POINT, KernelSource,
    WorkloadBufferSet,
};
