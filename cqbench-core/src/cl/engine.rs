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

//! Pipelined dispatch/readback execution.
//!
//! For every slot, a 2D compute dispatch and a dependent device-to-host
//! readback are enqueued without blocking, so independent slot chains are
//! free to overlap on the device. The host suspends exactly once, after
//! the whole batch has been issued, and the wall clock around that span
//! is the measurement.

use std::time::Instant;

use opencl3::event::Event;
use opencl3::kernel::ExecuteKernel;
use opencl3::memory::ClMem;
use opencl3::types::CL_NON_BLOCKING;

use crate::cl::context::DeviceContext;
use crate::cl::program::CompiledProgram;
use crate::cl::workload::WorkloadBufferSet;
use crate::diag::DiagSink;

/// Completion tokens for one slot. The readback is chained on the
/// dispatch through its wait list; dropping the pair releases both
/// events.
struct InFlight {
    _dispatch: Event,
    readback: Event,
}

/// Issue the full batch on queue 0 and measure it.
///
/// Per slot: bind the shared kernel's arguments, enqueue the dispatch
/// over `(width, height)` work items with the work-group size left to
/// the runtime, then enqueue a non-blocking readback of the output
/// buffer into host staging, dependent on that slot's dispatch only.
/// Argument binding mutates shared kernel state, so bind and dispatch
/// are issued back to back before the loop advances; only device-side
/// execution overlaps across slots.
///
/// Enqueue and wait failures are reported through `sink` and do not
/// abort the rest of the batch. Returns wall-clock seconds from the
/// first enqueue to the completion of every readback that was issued.
pub fn run(
    ctx: &DeviceContext,
    program: &CompiledProgram,
    buffers: &mut WorkloadBufferSet,
    sink: &dyn DiagSink,
) -> f64 {
    let queue = ctx.primary_queue();
    let global_work_size = [buffers.width(), buffers.height()];
    let mut in_flight: Vec<InFlight> = Vec::with_capacity(buffers.num_images());

    let started = Instant::now();

    for slot in buffers.slots_mut() {
        let dispatch = unsafe {
            ExecuteKernel::new(program.kernel())
                .set_arg(&slot.dev_in.get())
                .set_arg(&slot.dev_out.get())
                .set_global_work_sizes(&global_work_size)
                .enqueue_nd_range(queue)
        };
        let dispatch = match dispatch {
            Ok(event) => event,
            Err(e) => {
                cl_report!(sink, "clEnqueueNDRangeKernel", e.0);
                continue;
            }
        };

        let wait_list = [dispatch.get()];
        // Host staging lives in the buffer set, which outlives the final
        // wait below, so the non-blocking read target stays valid.
        let readback = unsafe {
            queue.enqueue_read_buffer(
                &slot.dev_out,
                CL_NON_BLOCKING,
                0,
                &mut slot.host,
                &wait_list,
            )
        };
        match readback {
            Ok(event) => in_flight.push(InFlight {
                _dispatch: dispatch,
                readback: event,
            }),
            Err(e) => cl_report!(sink, "clEnqueueReadBuffer", e.0),
        }
    }

    for pending in &in_flight {
        if let Err(e) = pending.readback.wait() {
            cl_report!(sink, "clWaitForEvents", e.0);
        }
    }
    let elapsed = started.elapsed().as_secs_f64();

    // Events are released after the wait, whatever its outcome.
    drop(in_flight);

    elapsed
}
