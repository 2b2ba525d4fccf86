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

//! Error taxonomy and OpenCL status-code mapping.
//!
//! Raw status codes are translated exactly once, at the boundary where the
//! underlying API call returns. Everything above that boundary works with
//! the named variants below.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CqError>;

/// Failure kinds, grouped by benchmark phase.
///
/// Setup failures (platform, devices, context, queues) abort the run;
/// program and buffer failures abort the current data point; enqueue and
/// wait failures are reported through the diagnostic sink and execution
/// continues.
#[derive(Debug, Error)]
pub enum CqError {
    #[error("no OpenCL platform available: {0}")]
    PlatformUnavailable(String),

    #[error("device enumeration failed: {0}")]
    DeviceEnumerationFailed(String),

    #[error("context creation failed: {0}")]
    ContextCreationFailed(String),

    #[error("command queue creation failed: {0}")]
    QueueCreationFailed(String),

    #[error("kernel source {0} unreadable: {1}")]
    SourceUnreadable(String, String),

    #[error("program build failed for {0}")]
    CompileFailed(String),

    #[error("kernel entry point {0:?} not found: {1}")]
    KernelResolutionFailed(&'static str, String),

    #[error("buffer allocation failed: {0}")]
    BufferAllocationFailed(String),

    #[error("{op} failed with OpenCL status {code}")]
    EnqueueFailed { op: &'static str, code: i32 },

    #[error("{op} failed with OpenCL status {code}")]
    WaitFailed { op: &'static str, code: i32 },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Marker returned for status codes outside the mapped ranges.
pub const UNKNOWN_CL_ERROR: &str = "CL_UNKNOWN_ERROR";

/// Symbolic name for an OpenCL status code.
///
/// Covers the runtime range `[-14, 0]` and the compile/argument range
/// `[-49, -30]`; any other code yields [`UNKNOWN_CL_ERROR`] rather than
/// an out-of-range lookup.
pub fn cl_error_name(code: i32) -> &'static str {
    match code {
        0 => "CL_SUCCESS",
        -1 => "CL_DEVICE_NOT_FOUND",
        -2 => "CL_DEVICE_NOT_AVAILABLE",
        -3 => "CL_COMPILER_NOT_AVAILABLE",
        -4 => "CL_MEM_OBJECT_ALLOCATION_FAILURE",
        -5 => "CL_OUT_OF_RESOURCES",
        -6 => "CL_OUT_OF_HOST_MEMORY",
        -7 => "CL_PROFILING_INFO_NOT_AVAILABLE",
        -8 => "CL_MEM_COPY_OVERLAP",
        -9 => "CL_IMAGE_FORMAT_MISMATCH",
        -10 => "CL_IMAGE_FORMAT_NOT_SUPPORTED",
        -11 => "CL_BUILD_PROGRAM_FAILURE",
        -12 => "CL_MAP_FAILURE",
        -13 => "CL_MISALIGNED_SUB_BUFFER_OFFSET",
        -14 => "CL_EXEC_STATUS_ERROR_FOR_EVENTS_IN_WAIT_LIST",
        -30 => "CL_INVALID_VALUE",
        -31 => "CL_INVALID_DEVICE_TYPE",
        -32 => "CL_INVALID_PLATFORM",
        -33 => "CL_INVALID_DEVICE",
        -34 => "CL_INVALID_CONTEXT",
        -35 => "CL_INVALID_QUEUE_PROPERTIES",
        -36 => "CL_INVALID_COMMAND_QUEUE",
        -37 => "CL_INVALID_HOST_PTR",
        -38 => "CL_INVALID_MEM_OBJECT",
        -39 => "CL_INVALID_IMAGE_FORMAT_DESCRIPTOR",
        -40 => "CL_INVALID_IMAGE_SIZE",
        -41 => "CL_INVALID_SAMPLER",
        -42 => "CL_INVALID_BINARY",
        -43 => "CL_INVALID_BUILD_OPTIONS",
        -44 => "CL_INVALID_PROGRAM",
        -45 => "CL_INVALID_PROGRAM_EXECUTABLE",
        -46 => "CL_INVALID_KERNEL_NAME",
        -47 => "CL_INVALID_KERNEL_DEFINITION",
        -48 => "CL_INVALID_KERNEL",
        -49 => "CL_INVALID_ARG_INDEX",
        _ => UNKNOWN_CL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_runtime_range() {
        for code in -14..=0 {
            let name = cl_error_name(code);
            assert!(!name.is_empty());
            assert_ne!(name, UNKNOWN_CL_ERROR, "code {code} should be mapped");
        }
    }

    #[test]
    fn maps_compile_and_argument_range() {
        for code in -49..=-30 {
            let name = cl_error_name(code);
            assert!(!name.is_empty());
            assert_ne!(name, UNKNOWN_CL_ERROR, "code {code} should be mapped");
        }
    }

    #[test]
    fn known_codes_are_stable() {
        assert_eq!(cl_error_name(0), "CL_SUCCESS");
        assert_eq!(cl_error_name(-5), "CL_OUT_OF_RESOURCES");
        assert_eq!(cl_error_name(-11), "CL_BUILD_PROGRAM_FAILURE");
        assert_eq!(cl_error_name(-30), "CL_INVALID_VALUE");
        assert_eq!(cl_error_name(-46), "CL_INVALID_KERNEL_NAME");
    }

    #[test]
    fn codes_outside_known_ranges_fall_back() {
        for code in [1, 42, -15, -29, -50, -64, i32::MIN, i32::MAX] {
            assert_eq!(cl_error_name(code), UNKNOWN_CL_ERROR);
        }
    }

    #[test]
    fn execution_errors_name_the_failing_operation() {
        let err = CqError::EnqueueFailed {
            op: "clEnqueueNDRangeKernel",
            code: -36,
        };
        let text = err.to_string();
        assert!(text.contains("clEnqueueNDRangeKernel"));
        assert!(text.contains("-36"));

        let err = CqError::WaitFailed {
            op: "clWaitForEvents",
            code: -58,
        };
        assert!(err.to_string().contains("clWaitForEvents"));
    }
}
