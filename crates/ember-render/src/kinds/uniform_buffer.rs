// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::vertex_buffer::check_range;
use crate::proxy::Proxy;
use crate::resource::{Bindable, Creatable, DataSettable, RenderResource};
use crate::submit::Submitter;
use ember_core::renderer::{
    BufferDescriptor, BufferId, BufferUsage, GraphicsDevice, ResourceError,
};

/// A uniform block bound to a fixed binding point.
#[derive(Debug)]
pub struct UniformBuffer {
    buffer: BufferId,
    size: u64,
    binding: u32,
}

impl UniformBuffer {
    /// The backend buffer.
    pub fn buffer_id(&self) -> BufferId {
        self.buffer
    }

    /// The binding point the block is bound to.
    pub fn binding(&self) -> u32 {
        self.binding
    }
}

/// Arguments captured by the `Create` command of a [`UniformBuffer`].
#[derive(Debug, Clone, Copy)]
pub struct UniformBufferArgs {
    /// Size of the block in bytes.
    pub size: u64,
    /// Binding point.
    pub binding: u32,
}

impl RenderResource for UniformBuffer {
    const KIND: &'static str = "UniformBuffer";

    fn release(self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.destroy_buffer(self.buffer)
    }
}

impl Creatable for UniformBuffer {
    type Args = UniformBufferArgs;

    fn create(device: &mut dyn GraphicsDevice, args: Self::Args) -> Result<Self, ResourceError> {
        let buffer = device.create_buffer(&BufferDescriptor {
            label: None,
            size: args.size,
            usage: BufferUsage::Uniform,
        })?;
        device.bind_buffer_base(buffer, args.binding)?;
        Ok(Self {
            buffer,
            size: args.size,
            binding: args.binding,
        })
    }
}

impl Bindable for UniformBuffer {
    fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.bind_buffer_base(self.buffer, self.binding)
    }

    fn unbind(&self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.unbind_buffer(BufferUsage::Uniform);
        Ok(())
    }
}

impl DataSettable for UniformBuffer {
    fn set_data(
        &mut self,
        device: &mut dyn GraphicsDevice,
        offset: u64,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        check_range(offset, data.len(), self.size)?;
        device.write_buffer(self.buffer, offset, data)
    }
}

/// Application-side value of a [`UniformBuffer`].
pub type UniformBufferProxy = Proxy<UniformBuffer>;

impl Proxy<UniformBuffer> {
    /// Creates a zeroed uniform block of `size` bytes bound at `binding`.
    pub fn create(submitter: &impl AsRef<Submitter>, size: u64, binding: u32) -> Self {
        Self::spawn(submitter.as_ref(), UniformBufferArgs { size, binding })
    }
}
