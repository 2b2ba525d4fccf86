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

//! Kernel source loading and program compilation.

use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

use opencl3::kernel::Kernel;
use opencl3::program::Program;

use crate::cl::context::DeviceContext;
use crate::diag::{BUILD_LOG_LIMIT, DiagSink, Diagnostic, truncate_log};
use crate::error::{CqError, Result};

/// Entry point every benchmark kernel must export: two buffer arguments
/// (input, output) over a 2D index space.
pub const KERNEL_ENTRY_POINT: &str = "test";

/// Built-in kernel: writes twice the input at every index.
pub const DOUBLE_KERNEL_SOURCE: &str = "\
__kernel void test(__global float *input, __global float *output)
{
    const int idx = get_global_id(1) * get_global_size(0) + get_global_id(0);
    output[idx] = input[idx] * 2.0f;
}
";

/// Where the kernel text comes from: a compiled-in literal or a file on
/// disk.
#[derive(Debug, Clone)]
pub enum KernelSource {
    Inline(&'static str),
    File(PathBuf),
}

impl KernelSource {
    /// Identifier used in diagnostics.
    pub fn label(&self) -> String {
        match self {
            KernelSource::Inline(_) => "<inline>".into(),
            KernelSource::File(path) => path.display().to_string(),
        }
    }

    /// Obtain the source text. A missing or unreadable file is
    /// [`CqError::SourceUnreadable`].
    pub fn load(&self) -> Result<Cow<'static, str>> {
        match self {
            KernelSource::Inline(text) => Ok(Cow::Borrowed(text)),
            KernelSource::File(path) => fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|e| CqError::SourceUnreadable(self.label(), e.to_string())),
        }
    }
}

/// A program built for every device of a [`DeviceContext`], plus its
/// resolved entry point. Construction either yields both or fails; no
/// partially built program escapes.
pub struct CompiledProgram {
    kernel: Kernel,
    _program: Program,
}

impl CompiledProgram {
    /// Compile `source` with `options` and resolve the entry point.
    ///
    /// On a build failure the compiler log, bounded to
    /// [`BUILD_LOG_LIMIT`] bytes, is forwarded through `sink` under a
    /// banner naming the source.
    pub fn build(
        ctx: &DeviceContext,
        source: &KernelSource,
        options: &str,
        sink: &dyn DiagSink,
    ) -> Result<Self> {
        let text = source.load()?;
        let label = source.label();

        let program = match Program::create_and_build_from_source(ctx.context(), &text, options)
        {
            Ok(program) => program,
            Err(build_log) => {
                sink.report(Diagnostic::message(
                    file!(),
                    line!(),
                    format!(
                        "=== Build log ({label}) ===\n{}",
                        truncate_log(&build_log, BUILD_LOG_LIMIT)
                    ),
                ));
                return Err(CqError::CompileFailed(label));
            }
        };

        let kernel = Kernel::create(&program, KERNEL_ENTRY_POINT).map_err(|e| {
            CqError::KernelResolutionFailed(KERNEL_ENTRY_POINT, e.to_string())
        })?;

        Ok(Self {
            kernel,
            _program: program,
        })
    }

    pub(crate) fn kernel(&self) -> &Kernel {
        &self.kernel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_source_loads_verbatim() {
        let source = KernelSource::Inline(DOUBLE_KERNEL_SOURCE);
        assert_eq!(source.load().unwrap(), DOUBLE_KERNEL_SOURCE);
        assert_eq!(source.label(), "<inline>");
    }

    #[test]
    fn missing_file_is_source_unreadable() {
        let source = KernelSource::File(PathBuf::from("/no/such/kernel.cl"));
        match source.load() {
            Err(CqError::SourceUnreadable(label, _)) => {
                assert!(label.contains("kernel.cl"));
            }
            other => panic!("expected SourceUnreadable, got {other:?}"),
        }
    }

    #[test]
    fn file_source_loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("double.cl");
        std::fs::write(&path, DOUBLE_KERNEL_SOURCE).unwrap();
        let source = KernelSource::File(path);
        assert_eq!(source.load().unwrap(), DOUBLE_KERNEL_SOURCE);
    }

    #[test]
    fn builtin_kernel_exports_the_expected_entry_point() {
        assert!(DOUBLE_KERNEL_SOURCE.contains(&format!("__kernel void {KERNEL_ENTRY_POINT}(")));
    }
}
