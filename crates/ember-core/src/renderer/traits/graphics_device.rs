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

use crate::math::LinearRgba;
use crate::renderer::api::*;
use crate::renderer::error::{RenderError, ResourceError};
use std::fmt::Debug;

/// The capability a concrete graphics backend exposes to the command layer.
///
/// Every method is only ever invoked from the render thread, after the device has been
/// created there. Implementations may therefore wrap thread-bound contexts (an OpenGL
/// context, for instance) and are not required to be `Send` or `Sync`.
///
/// Resource creation returns opaque ids; the command layer stores those ids in its
/// resource containers and hands them back for every later operation.
pub trait GraphicsDevice: Debug {
    // --- Buffers ---

    /// Creates a zero-initialized GPU buffer.
    /// ## Arguments
    /// * `descriptor` - The buffer size, usage and debug label.
    /// ## Returns
    /// The id of the new buffer, or an error if the backend could not allocate it.
    fn create_buffer(&mut self, descriptor: &BufferDescriptor<'_>) -> Result<BufferId, ResourceError>;

    /// Creates a GPU buffer and initializes it with `data`.
    /// `descriptor.size` must equal `data.len()`.
    fn create_buffer_with_data(
        &mut self,
        descriptor: &BufferDescriptor<'_>,
        data: &[u8],
    ) -> Result<BufferId, ResourceError>;

    /// Writes `data` into the buffer starting at `offset` bytes.
    /// ## Errors
    /// * `ResourceError::OutOfBounds` - If the write does not fit inside the buffer.
    fn write_buffer(&mut self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError>;

    /// Binds a buffer to the target matching `usage`.
    fn bind_buffer(&mut self, id: BufferId, usage: BufferUsage) -> Result<(), ResourceError>;

    /// Binds a uniform buffer to an indexed binding point.
    fn bind_buffer_base(&mut self, id: BufferId, binding: u32) -> Result<(), ResourceError>;

    /// Clears the binding of the target matching `usage`.
    fn unbind_buffer(&mut self, usage: BufferUsage);

    /// Destroys a GPU buffer.
    fn destroy_buffer(&mut self, id: BufferId) -> Result<(), ResourceError>;

    // --- Vertex arrays ---

    /// Creates an empty vertex array.
    fn create_vertex_array(&mut self) -> Result<VertexArrayId, ResourceError>;

    /// Binds a vertex array, or clears the binding when `id` is `None`.
    fn bind_vertex_array(&mut self, id: Option<VertexArrayId>) -> Result<(), ResourceError>;

    /// Attaches a vertex buffer to a vertex array, declaring one attribute per element
    /// of `layout` starting at attribute index `first_attribute`.
    /// ## Returns
    /// The number of attribute slots consumed.
    fn attach_vertex_buffer(
        &mut self,
        vertex_array: VertexArrayId,
        buffer: BufferId,
        layout: &BufferLayout,
        first_attribute: u32,
    ) -> Result<u32, ResourceError>;

    /// Sets the index buffer used by indexed draws of a vertex array.
    fn attach_index_buffer(
        &mut self,
        vertex_array: VertexArrayId,
        buffer: BufferId,
    ) -> Result<(), ResourceError>;

    /// Destroys a vertex array. Attached buffers are not destroyed.
    fn destroy_vertex_array(&mut self, id: VertexArrayId) -> Result<(), ResourceError>;

    // --- Shaders ---

    /// Compiles and links a shader program.
    /// ## Errors
    /// * `ResourceError::Shader` - If the source is invalid or fails to compile or link.
    fn create_shader(&mut self, descriptor: &ShaderDescriptor<'_>) -> Result<ShaderId, ResourceError>;

    /// Makes a program current, or clears the current program when `id` is `None`.
    fn bind_shader(&mut self, id: Option<ShaderId>) -> Result<(), ResourceError>;

    /// Uploads a value to a named uniform of a program.
    fn set_uniform(
        &mut self,
        id: ShaderId,
        name: &str,
        value: &UniformValue,
    ) -> Result<(), ResourceError>;

    /// Destroys a shader program.
    fn destroy_shader(&mut self, id: ShaderId) -> Result<(), ResourceError>;

    // --- Textures ---

    /// Allocates a 2D texture, optionally uploading its full contents.
    fn create_texture(
        &mut self,
        properties: &TextureProperties,
        data: Option<&[u8]>,
    ) -> Result<TextureId, ResourceError>;

    /// Replaces the full contents of a texture.
    fn write_texture(&mut self, id: TextureId, data: &[u8]) -> Result<(), ResourceError>;

    /// Binds a texture to a sampler slot.
    fn bind_texture(&mut self, id: TextureId, slot: u32) -> Result<(), ResourceError>;

    /// Destroys a texture.
    fn destroy_texture(&mut self, id: TextureId) -> Result<(), ResourceError>;

    // --- Framebuffers ---

    /// Allocates a framebuffer and its attachments.
    fn create_framebuffer(
        &mut self,
        properties: &FramebufferProperties,
    ) -> Result<FramebufferId, ResourceError>;

    /// Recreates the attachments of a framebuffer at a new size.
    fn resize_framebuffer(
        &mut self,
        id: FramebufferId,
        width: u32,
        height: u32,
    ) -> Result<(), ResourceError>;

    /// Binds a framebuffer as render target, or restores the default one when `id` is `None`.
    fn bind_framebuffer(&mut self, id: Option<FramebufferId>) -> Result<(), ResourceError>;

    /// Destroys a framebuffer and its attachments.
    fn destroy_framebuffer(&mut self, id: FramebufferId) -> Result<(), ResourceError>;

    // --- Global state and drawing ---

    /// Sets the viewport transform.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Sets the color used by [`GraphicsDevice::clear`].
    fn set_clear_color(&mut self, color: LinearRgba);

    /// Clears the color and depth of the current render target.
    fn clear(&mut self);

    /// Sets the rasterized width of lines.
    fn set_line_width(&mut self, width: f32);

    /// Draws `index_count` indices of the vertex array's index buffer as triangles.
    fn draw_indexed(
        &mut self,
        vertex_array: VertexArrayId,
        index_count: u32,
    ) -> Result<(), ResourceError>;

    /// Draws `vertex_count` vertices of the vertex array as a line list.
    fn draw_lines(
        &mut self,
        vertex_array: VertexArrayId,
        vertex_count: u32,
    ) -> Result<(), ResourceError>;

    /// Presents the back buffer.
    fn swap_buffers(&mut self) -> Result<(), RenderError>;
}
