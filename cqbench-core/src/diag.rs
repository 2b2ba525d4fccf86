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

//! Diagnostic reporting for best-effort execution paths.
//!
//! Enqueue and wait failures must not abort a running batch, so they are
//! handed to an injected [`DiagSink`] instead of being returned. The sink
//! is a trait so tests can capture reports instead of scraping the log.

use std::fmt;
use std::sync::Mutex;

use crate::error::cl_error_name;

/// Upper bound on a single compiler log forwarded through the sink.
pub const BUILD_LOG_LIMIT: usize = 4096;

/// One reported failure, tagged with the call site that observed it.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub file: &'static str,
    pub line: u32,
    pub message: String,
}

impl Diagnostic {
    /// Report for a failed OpenCL call: operation, raw status, mapped name.
    pub fn cl(file: &'static str, line: u32, op: &str, code: i32) -> Self {
        Self {
            file,
            line,
            message: format!("{op}: {} ({code})", cl_error_name(code)),
        }
    }

    /// Free-form report (compiler logs, banners).
    pub fn message(file: &'static str, line: u32, message: String) -> Self {
        Self { file, line, message }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpenCL error <{}:{}>: {}", self.file, self.line, self.message)
    }
}

/// Receiver for diagnostics emitted by the loader and the engine.
pub trait DiagSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Default sink: forwards every report to the `log` facade at warn level.
#[derive(Debug, Default)]
pub struct LogSink;

impl DiagSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
    }
}

/// Test sink: retains every report for later inspection.
#[derive(Debug, Default)]
pub struct CaptureSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().expect("diag sink poisoned").clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().expect("diag sink poisoned").is_empty()
    }
}

impl DiagSink for CaptureSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries.lock().expect("diag sink poisoned").push(diagnostic);
    }
}

/// Report a failed OpenCL call through `$sink`, stamping the call site.
macro_rules! cl_report {
    ($sink:expr, $op:expr, $code:expr) => {
        $sink.report($crate::diag::Diagnostic::cl(file!(), line!(), $op, $code))
    };
}

/// Bound `text` to at most `limit` bytes without splitting a character.
pub fn truncate_log(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
