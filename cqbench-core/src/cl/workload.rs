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

//! Device-resident buffer pairs with host staging.

use std::ffi::c_void;
use std::ptr;

use opencl3::memory::{Buffer, CL_MEM_COPY_HOST_PTR, CL_MEM_READ_WRITE};

use crate::cl::context::DeviceContext;
use crate::error::{CqError, Result};

/// One independent dispatch/readback target: host staging block plus the
/// input and output device buffers it round-trips through.
pub struct ImageSlot {
    pub(crate) host: Vec<f32>,
    pub(crate) dev_in: Buffer<f32>,
    pub(crate) dev_out: Buffer<f32>,
}

/// A fixed set of [`ImageSlot`]s sharing one 2D problem size.
///
/// Input buffers are populated from host staging at creation, so a
/// measured run never pays first-touch cost. Everything is released
/// together when the set is dropped; a slot never outlives the data
/// point it was allocated for.
pub struct WorkloadBufferSet {
    width: usize,
    height: usize,
    slots: Vec<ImageSlot>,
}

impl WorkloadBufferSet {
    /// Allocate `num_images` zero-initialized slots of `width * height`
    /// f32 elements each.
    pub fn create(
        ctx: &DeviceContext,
        width: usize,
        height: usize,
        num_images: usize,
    ) -> Result<Self> {
        Self::create_filled(ctx, width, height, num_images, 0.0)
    }

    /// Same as [`create`](Self::create) with every host element set to
    /// `fill` before the device copy.
    pub fn create_filled(
        ctx: &DeviceContext,
        width: usize,
        height: usize,
        num_images: usize,
        fill: f32,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CqError::InvalidInput(format!(
                "problem size {width}x{height} has a zero dimension"
            )));
        }
        let elements = width.checked_mul(height).ok_or_else(|| {
            CqError::BufferAllocationFailed(format!("size overflow: {width}x{height}"))
        })?;

        let mut slots = Vec::with_capacity(num_images);
        for _ in 0..num_images {
            // Earlier slots are dropped, and their buffers released, if a
            // later allocation fails.
            let mut host = vec![fill; elements];
            let dev_in = unsafe {
                Buffer::<f32>::create(
                    ctx.context(),
                    CL_MEM_READ_WRITE | CL_MEM_COPY_HOST_PTR,
                    elements,
                    host.as_mut_ptr() as *mut c_void,
                )
            }
            .map_err(|e| CqError::BufferAllocationFailed(format!("input buffer: {e}")))?;
            let dev_out = unsafe {
                Buffer::<f32>::create(
                    ctx.context(),
                    CL_MEM_READ_WRITE,
                    elements,
                    ptr::null_mut(),
                )
            }
            .map_err(|e| CqError::BufferAllocationFailed(format!("output buffer: {e}")))?;
            slots.push(ImageSlot {
                host,
                dev_in,
                dev_out,
            });
        }

        Ok(Self {
            width,
            height,
            slots,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn num_images(&self) -> usize {
        self.slots.len()
    }

    /// Elements per image.
    pub fn image_len(&self) -> usize {
        self.width * self.height
    }

    /// Host staging content of slot `index`; overwritten in place by that
    /// slot's readback.
    pub fn host(&self, index: usize) -> &[f32] {
        &self.slots[index].host
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [ImageSlot] {
        &mut self.slots
    }
}
