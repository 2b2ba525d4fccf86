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

//! Device discovery and per-device command queues.

use std::ptr;

use opencl3::command_queue::{CL_QUEUE_PROFILING_ENABLE, CommandQueue};
use opencl3::context::Context;
use opencl3::device::{CL_DEVICE_TYPE_ALL, Device};
use opencl3::platform::get_platforms;

use crate::error::{CqError, Result};

/// All devices of the first platform, one shared context, one queue per
/// device. Queue `i` submits to device `i`.
///
/// Field order is the release order: queues, then the context, then the
/// device handles.
pub struct DeviceContext {
    queues: Vec<CommandQueue>,
    context: Context,
    devices: Vec<Device>,
    profiling: bool,
}

impl DeviceContext {
    /// Discover devices and create one command queue per device.
    ///
    /// With `profiling` set, every queue is created with
    /// `CL_QUEUE_PROFILING_ENABLE`. The timestamps are never read here;
    /// the flag exists so its overhead can be measured against a plain
    /// queue.
    pub fn create(profiling: bool) -> Result<Self> {
        let platforms =
            get_platforms().map_err(|e| CqError::PlatformUnavailable(e.to_string()))?;
        let platform = platforms
            .first()
            .ok_or_else(|| CqError::PlatformUnavailable("no platform registered".into()))?;

        let device_ids = platform
            .get_devices(CL_DEVICE_TYPE_ALL)
            .map_err(|e| CqError::DeviceEnumerationFailed(e.to_string()))?;
        if device_ids.is_empty() {
            return Err(CqError::DeviceEnumerationFailed(
                "platform reports zero devices".into(),
            ));
        }

        let context = Context::from_devices(&device_ids, &[], None, ptr::null_mut())
            .map_err(|e| CqError::ContextCreationFailed(e.to_string()))?;

        let queue_properties = if profiling { CL_QUEUE_PROFILING_ENABLE } else { 0 };
        let devices: Vec<Device> = device_ids.into_iter().map(Device::new).collect();
        let mut queues = Vec::with_capacity(devices.len());
        for device in &devices {
            let name = device.name().unwrap_or_default();
            log::debug!("creating command queue for device {}", name.trim());
            // In-order queue per device; the 1.2 entry point keeps older
            // runtimes usable.
            #[allow(deprecated)]
            let queue = unsafe { CommandQueue::create(&context, device.id(), queue_properties) }
                .map_err(|e| CqError::QueueCreationFailed(e.to_string()))?;
            queues.push(queue);
        }

        Ok(Self {
            queues,
            context,
            devices,
            profiling,
        })
    }

    pub(crate) fn context(&self) -> &Context {
        &self.context
    }

    /// Queue of device 0. All benchmark submissions go through it.
    pub(crate) fn primary_queue(&self) -> &CommandQueue {
        &self.queues[0]
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn profiling_enabled(&self) -> bool {
        self.profiling
    }
}
