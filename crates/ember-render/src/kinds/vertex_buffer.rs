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

//! Per-vertex attribute buffers.

use crate::command::{Command, CommandContext};
use crate::proxy::Proxy;
use crate::resource::{Bindable, Creatable, DataSettable, RenderResource, ResourceId};
use crate::submit::Submitter;
use bytemuck::Pod;
use ember_core::renderer::{
    BufferDescriptor, BufferId, BufferLayout, BufferUsage, GraphicsDevice, ResourceError,
};
use std::fmt;

/// A GPU buffer of vertex data plus the layout describing one vertex.
#[derive(Debug)]
pub struct VertexBuffer {
    buffer: BufferId,
    size: u64,
    layout: BufferLayout,
}

impl VertexBuffer {
    /// The backend buffer.
    pub fn buffer_id(&self) -> BufferId {
        self.buffer
    }

    /// Size of the buffer in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The layout set by the last `SetLayout`, empty until then.
    pub fn layout(&self) -> &BufferLayout {
        &self.layout
    }
}

/// How a [`VertexBuffer`] is initialized.
pub enum VertexBufferInit {
    /// A zeroed buffer of the given byte size, filled later through `SetData`.
    Dynamic(u64),
    /// A buffer holding exactly these bytes.
    Data(Vec<u8>),
}

impl fmt::Debug for VertexBufferInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexBufferInit::Dynamic(size) => write!(f, "Dynamic({size} bytes)"),
            VertexBufferInit::Data(bytes) => write!(f, "Data({} bytes)", bytes.len()),
        }
    }
}

impl RenderResource for VertexBuffer {
    const KIND: &'static str = "VertexBuffer";

    fn release(self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.destroy_buffer(self.buffer)
    }
}

impl Creatable for VertexBuffer {
    type Args = VertexBufferInit;

    fn create(device: &mut dyn GraphicsDevice, args: Self::Args) -> Result<Self, ResourceError> {
        let (buffer, size) = match args {
            VertexBufferInit::Dynamic(size) => {
                let descriptor = BufferDescriptor {
                    label: None,
                    size,
                    usage: BufferUsage::Vertex,
                };
                (device.create_buffer(&descriptor)?, size)
            }
            VertexBufferInit::Data(bytes) => {
                let descriptor = BufferDescriptor {
                    label: None,
                    size: bytes.len() as u64,
                    usage: BufferUsage::Vertex,
                };
                (device.create_buffer_with_data(&descriptor, &bytes)?, descriptor.size)
            }
        };
        Ok(Self {
            buffer,
            size,
            layout: BufferLayout::default(),
        })
    }
}

impl Bindable for VertexBuffer {
    fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.bind_buffer(self.buffer, BufferUsage::Vertex)
    }

    fn unbind(&self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.unbind_buffer(BufferUsage::Vertex);
        Ok(())
    }
}

impl DataSettable for VertexBuffer {
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

/// Rejects writes that do not fit in a buffer of `size` bytes.
pub(crate) fn check_range(offset: u64, len: usize, size: u64) -> Result<(), ResourceError> {
    match offset.checked_add(len as u64) {
        Some(end) if end <= size => Ok(()),
        _ => Err(ResourceError::InvalidParameter(format!(
            "write of {len} bytes at offset {offset} exceeds the {size}-byte buffer"
        ))),
    }
}

/// Replaces the layout of a vertex buffer.
#[derive(Debug)]
pub struct SetLayout {
    id: ResourceId,
    layout: BufferLayout,
}

impl Command for SetLayout {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        let SetLayout { id, layout } = *self;
        ctx.with_resource::<VertexBuffer, _, _>(id, "SetLayout", move |buffer, _| {
            buffer.layout = layout;
            Ok(())
        });
    }
}

/// Application-side value of a [`VertexBuffer`].
pub type VertexBufferProxy = Proxy<VertexBuffer>;

impl Proxy<VertexBuffer> {
    /// Creates a zeroed vertex buffer of `size` bytes.
    pub fn create(submitter: &impl AsRef<Submitter>, size: u64) -> Self {
        Self::spawn(submitter.as_ref(), VertexBufferInit::Dynamic(size))
    }

    /// Creates a vertex buffer holding a copy of `vertices`.
    pub fn create_with_data<D: Pod>(submitter: &impl AsRef<Submitter>, vertices: &[D]) -> Self {
        let bytes = bytemuck::cast_slice::<D, u8>(vertices).to_vec();
        Self::spawn(submitter.as_ref(), VertexBufferInit::Data(bytes))
    }

    /// Queues a replacement of the vertex layout.
    pub fn set_layout(&self, layout: BufferLayout) {
        self.submitter().push(SetLayout {
            id: self.id(),
            layout,
        });
    }
}
