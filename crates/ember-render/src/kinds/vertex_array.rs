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

//! Vertex input state: which buffers feed which attributes.

use super::{IndexBuffer, IndexBufferProxy, VertexBuffer, VertexBufferProxy};
use crate::command::{Command, CommandContext};
use crate::proxy::Proxy;
use crate::resource::{Bindable, Creatable, ErasedHandle, RenderResource, ResourceId};
use crate::submit::Submitter;
use ember_core::renderer::{GraphicsDevice, ResourceError, VertexArrayId};

/// A vertex array and the buffers attached to it.
///
/// The array holds a handle to every attached buffer, so the buffers stay alive as long
/// as the array does even once their own proxies are gone.
#[derive(Debug)]
pub struct VertexArray {
    vertex_array: VertexArrayId,
    vertex_buffers: Vec<ErasedHandle>,
    index_buffer: Option<ErasedHandle>,
    index_count: u32,
    next_attribute: u32,
}

impl VertexArray {
    /// The backend vertex array.
    pub fn backend_id(&self) -> VertexArrayId {
        self.vertex_array
    }

    /// Number of indices in the attached index buffer, zero without one.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// The attached vertex buffers, in attachment order.
    pub fn vertex_buffers(&self) -> &[ErasedHandle] {
        &self.vertex_buffers
    }

    /// The attached index buffer, if any.
    pub fn index_buffer(&self) -> Option<&ErasedHandle> {
        self.index_buffer.as_ref()
    }
}

impl RenderResource for VertexArray {
    const KIND: &'static str = "VertexArray";

    fn release(self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        // The buffer handles drop after the array is gone.
        device.destroy_vertex_array(self.vertex_array)
    }
}

impl Creatable for VertexArray {
    type Args = ();

    fn create(device: &mut dyn GraphicsDevice, _args: ()) -> Result<Self, ResourceError> {
        Ok(Self {
            vertex_array: device.create_vertex_array()?,
            vertex_buffers: Vec::new(),
            index_buffer: None,
            index_count: 0,
            next_attribute: 0,
        })
    }
}

impl Bindable for VertexArray {
    fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.bind_vertex_array(Some(self.vertex_array))
    }

    fn unbind(&self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.bind_vertex_array(None)
    }
}

/// Attaches a vertex buffer, declaring attributes from its current layout.
#[derive(Debug)]
pub struct AddVertexBuffer {
    vertex_array: ResourceId,
    buffer: ErasedHandle,
}

impl Command for AddVertexBuffer {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        let AddVertexBuffer {
            vertex_array,
            buffer,
        } = *self;
        let Some((buffer_id, layout)) = ctx.inspect::<VertexBuffer, _, _>(
            buffer.id(),
            "AddVertexBuffer",
            |vb| (vb.buffer_id(), vb.layout().clone()),
        ) else {
            return;
        };
        if layout.is_empty() {
            log::warn!(
                "Skipping AddVertexBuffer on {} {vertex_array}: {} {} has no layout",
                VertexArray::KIND,
                VertexBuffer::KIND,
                buffer.id()
            );
            return;
        }
        ctx.with_resource::<VertexArray, _, _>(vertex_array, "AddVertexBuffer", move |va, device| {
            let slots =
                device.attach_vertex_buffer(va.vertex_array, buffer_id, &layout, va.next_attribute)?;
            va.next_attribute += slots;
            va.vertex_buffers.push(buffer);
            Ok(())
        });
    }
}

/// Sets the index buffer used by indexed draws.
#[derive(Debug)]
pub struct SetIndexBuffer {
    vertex_array: ResourceId,
    buffer: ErasedHandle,
}

impl Command for SetIndexBuffer {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        let SetIndexBuffer {
            vertex_array,
            buffer,
        } = *self;
        let Some((buffer_id, count)) =
            ctx.inspect::<IndexBuffer, _, _>(buffer.id(), "SetIndexBuffer", |ib| {
                (ib.buffer_id(), ib.count())
            })
        else {
            return;
        };
        ctx.with_resource::<VertexArray, _, _>(vertex_array, "SetIndexBuffer", move |va, device| {
            device.attach_index_buffer(va.vertex_array, buffer_id)?;
            va.index_buffer = Some(buffer);
            va.index_count = count;
            Ok(())
        });
    }
}

/// Application-side value of a [`VertexArray`].
pub type VertexArrayProxy = Proxy<VertexArray>;

impl Proxy<VertexArray> {
    /// Creates an empty vertex array.
    pub fn create(submitter: &impl AsRef<Submitter>) -> Self {
        Self::spawn(submitter.as_ref(), ())
    }

    /// Queues the attachment of `buffer`. Its layout must be set beforehand.
    pub fn add_vertex_buffer(&self, buffer: &VertexBufferProxy) {
        self.submitter().push(AddVertexBuffer {
            vertex_array: self.id(),
            buffer: buffer.erase(),
        });
    }

    /// Queues the replacement of the index buffer.
    pub fn set_index_buffer(&self, buffer: &IndexBufferProxy) {
        self.submitter().push(SetIndexBuffer {
            vertex_array: self.id(),
            buffer: buffer.erase(),
        });
    }
}
