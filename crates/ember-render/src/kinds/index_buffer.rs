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

use crate::proxy::Proxy;
use crate::resource::{Bindable, Creatable, RenderResource};
use crate::submit::Submitter;
use ember_core::renderer::{
    BufferDescriptor, BufferId, BufferUsage, GraphicsDevice, ResourceError,
};

/// A GPU buffer of `u32` indices.
#[derive(Debug)]
pub struct IndexBuffer {
    buffer: BufferId,
    count: u32,
}

impl IndexBuffer {
    /// The backend buffer.
    pub fn buffer_id(&self) -> BufferId {
        self.buffer
    }

    /// Number of indices.
    pub fn count(&self) -> u32 {
        self.count
    }
}

impl RenderResource for IndexBuffer {
    const KIND: &'static str = "IndexBuffer";

    fn release(self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.destroy_buffer(self.buffer)
    }
}

impl Creatable for IndexBuffer {
    type Args = Vec<u32>;

    fn create(device: &mut dyn GraphicsDevice, indices: Self::Args) -> Result<Self, ResourceError> {
        let count = u32::try_from(indices.len()).map_err(|_| {
            ResourceError::InvalidParameter(format!("{} indices", indices.len()))
        })?;
        let bytes: &[u8] = bytemuck::cast_slice(&indices);
        let descriptor = BufferDescriptor {
            label: None,
            size: bytes.len() as u64,
            usage: BufferUsage::Index,
        };
        let buffer = device.create_buffer_with_data(&descriptor, bytes)?;
        Ok(Self { buffer, count })
    }
}

impl Bindable for IndexBuffer {
    fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.bind_buffer(self.buffer, BufferUsage::Index)
    }

    fn unbind(&self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.unbind_buffer(BufferUsage::Index);
        Ok(())
    }
}

/// Application-side value of an [`IndexBuffer`].
pub type IndexBufferProxy = Proxy<IndexBuffer>;

impl Proxy<IndexBuffer> {
    /// Creates an index buffer holding a copy of `indices`.
    pub fn create(submitter: &impl AsRef<Submitter>, indices: &[u32]) -> Self {
        Self::spawn(submitter.as_ref(), indices.to_vec())
    }
}
