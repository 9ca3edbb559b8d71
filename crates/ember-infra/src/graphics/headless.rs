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

//! A graphics device that keeps every object in memory.
//!
//! It performs the bookkeeping and validation a real backend would (sizes, bounds,
//! binding targets, attached buffers) without any GPU, so the renderer can run in
//! tests, tools and CI.

use ember_core::math::LinearRgba;
use ember_core::renderer::{
    is_valid_framebuffer_size, BufferDescriptor, BufferId, BufferLayout, BufferUsage,
    FramebufferId, FramebufferProperties, GraphicsDevice, RenderError, ResourceError,
    ShaderDescriptor, ShaderError, ShaderId, ShaderSource, TextureId, TextureProperties,
    UniformValue, VertexArrayId, Viewport, MAX_TEXTURE_SIZE,
};
use std::collections::HashMap;

struct BufferEntry {
    usage: BufferUsage,
    contents: Vec<u8>,
}

#[derive(Default)]
struct VertexArrayEntry {
    vertex_buffers: Vec<BufferId>,
    index_buffer: Option<BufferId>,
    attributes: u32,
}

struct ShaderEntry {
    label: String,
    uniforms: HashMap<String, UniformValue>,
}

struct TextureEntry {
    properties: TextureProperties,
    contents: Vec<u8>,
}

/// Counters describing the work a [`HeadlessDevice`] has performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadlessStats {
    /// Bytes currently held by buffers and textures.
    pub allocated_bytes: u64,
    /// Draw calls issued since creation.
    pub draw_calls: u64,
    /// Frames presented since creation.
    pub frames_presented: u64,
}

/// A [`GraphicsDevice`] without a GPU.
#[derive(Default)]
pub struct HeadlessDevice {
    buffers: HashMap<BufferId, BufferEntry>,
    vertex_arrays: HashMap<VertexArrayId, VertexArrayEntry>,
    shaders: HashMap<ShaderId, ShaderEntry>,
    textures: HashMap<TextureId, TextureEntry>,
    framebuffers: HashMap<FramebufferId, FramebufferProperties>,

    next_id: usize,

    bound_buffers: HashMap<BufferUsage, BufferId>,
    uniform_bindings: HashMap<u32, BufferId>,
    bound_vertex_array: Option<VertexArrayId>,
    bound_shader: Option<ShaderId>,
    bound_framebuffer: Option<FramebufferId>,
    texture_slots: HashMap<u32, TextureId>,
    viewport: Option<Viewport>,
    clear_color: LinearRgba,
    line_width: f32,

    stats: HeadlessStats,
}

impl HeadlessDevice {
    /// Creates a device with no objects.
    pub fn new() -> Self {
        log::info!("HeadlessDevice: created");
        Self {
            line_width: 1.0,
            ..Default::default()
        }
    }

    fn generate_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn buffer(&self, id: BufferId) -> Result<&BufferEntry, ResourceError> {
        self.buffers.get(&id).ok_or(ResourceError::NotFound)
    }

    fn vertex_array(&self, id: VertexArrayId) -> Result<&VertexArrayEntry, ResourceError> {
        self.vertex_arrays.get(&id).ok_or(ResourceError::NotFound)
    }

    fn insert_buffer(&mut self, usage: BufferUsage, contents: Vec<u8>) -> BufferId {
        let id = BufferId(self.generate_id());
        self.stats.allocated_bytes += contents.len() as u64;
        log::debug!(
            "HeadlessDevice: created {usage:?} buffer {id:?}, {} bytes",
            contents.len()
        );
        self.buffers.insert(id, BufferEntry { usage, contents });
        id
    }

    /// Counters describing the work performed so far.
    pub fn stats(&self) -> HeadlessStats {
        self.stats
    }

    /// Number of live buffers.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Number of live vertex arrays.
    pub fn vertex_array_count(&self) -> usize {
        self.vertex_arrays.len()
    }

    /// Number of live shader programs.
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    /// Number of live textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of live framebuffers.
    pub fn framebuffer_count(&self) -> usize {
        self.framebuffers.len()
    }

    /// Contents of a buffer.
    pub fn buffer_contents(&self, id: BufferId) -> Option<&[u8]> {
        self.buffers.get(&id).map(|b| b.contents.as_slice())
    }

    /// Contents of a texture.
    pub fn texture_contents(&self, id: TextureId) -> Option<&[u8]> {
        self.textures.get(&id).map(|t| t.contents.as_slice())
    }

    /// The last value uploaded to a uniform.
    pub fn uniform(&self, shader: ShaderId, name: &str) -> Option<UniformValue> {
        self.shaders.get(&shader)?.uniforms.get(name).copied()
    }

    /// Size of a framebuffer.
    pub fn framebuffer_size(&self, id: FramebufferId) -> Option<(u32, u32)> {
        self.framebuffers.get(&id).map(|p| (p.width, p.height))
    }

    /// Number of attribute slots declared on a vertex array.
    pub fn vertex_array_attributes(&self, id: VertexArrayId) -> Option<u32> {
        self.vertex_arrays.get(&id).map(|va| va.attributes)
    }

    /// The currently bound vertex array.
    pub fn bound_vertex_array(&self) -> Option<VertexArrayId> {
        self.bound_vertex_array
    }

    /// The currently bound shader program.
    pub fn bound_shader(&self) -> Option<ShaderId> {
        self.bound_shader
    }

    /// The current viewport, if one was set.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// The current clear color.
    pub fn clear_color(&self) -> LinearRgba {
        self.clear_color
    }

    /// The current line width.
    pub fn line_width(&self) -> f32 {
        self.line_width
    }
}

impl std::fmt::Debug for HeadlessDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessDevice")
            .field("buffers", &self.buffers.len())
            .field("vertex_arrays", &self.vertex_arrays.len())
            .field("shaders", &self.shaders.len())
            .field("textures", &self.textures.len())
            .field("framebuffers", &self.framebuffers.len())
            .field("stats", &self.stats)
            .finish()
    }
}

/// Minimal syntax check standing in for a GLSL front end.
fn check_braces(code: &str) -> Result<(), String> {
    let mut depth = 0usize;
    for (line, text) in code.lines().enumerate() {
        for c in text.chars() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| format!("0:{}: unexpected '}}'", line + 1))?
                }
                _ => {}
            }
        }
    }
    if depth == 0 {
        Ok(())
    } else {
        Err(format!("{depth} unclosed '{{' at end of source"))
    }
}

fn texture_bytes(properties: &TextureProperties) -> Result<u64, ResourceError> {
    properties.byte_size().ok_or_else(|| {
        ResourceError::InvalidParameter(format!(
            "texture size {}x{} overflows",
            properties.width, properties.height
        ))
    })
}

impl GraphicsDevice for HeadlessDevice {
    fn create_buffer(&mut self, descriptor: &BufferDescriptor<'_>) -> Result<BufferId, ResourceError> {
        if descriptor.size == 0 {
            return Err(ResourceError::InvalidParameter(
                "buffer size must be non-zero".to_string(),
            ));
        }
        let size = usize::try_from(descriptor.size).map_err(|_| {
            ResourceError::BackendError(format!("buffer of {} bytes", descriptor.size))
        })?;
        Ok(self.insert_buffer(descriptor.usage, vec![0; size]))
    }

    fn create_buffer_with_data(
        &mut self,
        descriptor: &BufferDescriptor<'_>,
        data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        if data.is_empty() {
            return Err(ResourceError::InvalidParameter(
                "buffer data must not be empty".to_string(),
            ));
        }
        if descriptor.size != data.len() as u64 {
            return Err(ResourceError::InvalidParameter(format!(
                "descriptor size {} does not match {} bytes of data",
                descriptor.size,
                data.len()
            )));
        }
        Ok(self.insert_buffer(descriptor.usage, data.to_vec()))
    }

    fn write_buffer(&mut self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        let entry = self.buffers.get_mut(&id).ok_or(ResourceError::NotFound)?;
        let start = usize::try_from(offset).map_err(|_| ResourceError::OutOfBounds)?;
        let end = start
            .checked_add(data.len())
            .filter(|end| *end <= entry.contents.len())
            .ok_or(ResourceError::OutOfBounds)?;
        entry.contents[start..end].copy_from_slice(data);
        Ok(())
    }

    fn bind_buffer(&mut self, id: BufferId, usage: BufferUsage) -> Result<(), ResourceError> {
        let entry = self.buffer(id)?;
        if entry.usage != usage {
            return Err(ResourceError::InvalidParameter(format!(
                "{:?} buffer {id:?} bound as {usage:?}",
                entry.usage
            )));
        }
        self.bound_buffers.insert(usage, id);
        Ok(())
    }

    fn bind_buffer_base(&mut self, id: BufferId, binding: u32) -> Result<(), ResourceError> {
        if self.buffer(id)?.usage != BufferUsage::Uniform {
            return Err(ResourceError::InvalidParameter(format!(
                "buffer {id:?} is not a uniform buffer"
            )));
        }
        self.uniform_bindings.insert(binding, id);
        Ok(())
    }

    fn unbind_buffer(&mut self, usage: BufferUsage) {
        self.bound_buffers.remove(&usage);
    }

    fn destroy_buffer(&mut self, id: BufferId) -> Result<(), ResourceError> {
        let entry = self.buffers.remove(&id).ok_or(ResourceError::NotFound)?;
        self.stats.allocated_bytes -= entry.contents.len() as u64;
        self.bound_buffers.retain(|_, bound| *bound != id);
        self.uniform_bindings.retain(|_, bound| *bound != id);
        log::debug!("HeadlessDevice: destroyed buffer {id:?}");
        Ok(())
    }

    fn create_vertex_array(&mut self) -> Result<VertexArrayId, ResourceError> {
        let id = VertexArrayId(self.generate_id());
        self.vertex_arrays.insert(id, VertexArrayEntry::default());
        Ok(id)
    }

    fn bind_vertex_array(&mut self, id: Option<VertexArrayId>) -> Result<(), ResourceError> {
        if let Some(id) = id {
            self.vertex_array(id)?;
        }
        self.bound_vertex_array = id;
        Ok(())
    }

    fn attach_vertex_buffer(
        &mut self,
        vertex_array: VertexArrayId,
        buffer: BufferId,
        layout: &BufferLayout,
        first_attribute: u32,
    ) -> Result<u32, ResourceError> {
        if layout.is_empty() {
            return Err(ResourceError::InvalidParameter(
                "vertex buffer has no layout".to_string(),
            ));
        }
        if self.buffer(buffer)?.usage != BufferUsage::Vertex {
            return Err(ResourceError::InvalidParameter(format!(
                "buffer {buffer:?} is not a vertex buffer"
            )));
        }
        let entry = self
            .vertex_arrays
            .get_mut(&vertex_array)
            .ok_or(ResourceError::NotFound)?;
        let slots = layout.attribute_slots();
        entry.vertex_buffers.push(buffer);
        entry.attributes = first_attribute + slots;
        Ok(slots)
    }

    fn attach_index_buffer(
        &mut self,
        vertex_array: VertexArrayId,
        buffer: BufferId,
    ) -> Result<(), ResourceError> {
        if self.buffer(buffer)?.usage != BufferUsage::Index {
            return Err(ResourceError::InvalidParameter(format!(
                "buffer {buffer:?} is not an index buffer"
            )));
        }
        let entry = self
            .vertex_arrays
            .get_mut(&vertex_array)
            .ok_or(ResourceError::NotFound)?;
        entry.index_buffer = Some(buffer);
        Ok(())
    }

    fn destroy_vertex_array(&mut self, id: VertexArrayId) -> Result<(), ResourceError> {
        self.vertex_arrays
            .remove(&id)
            .ok_or(ResourceError::NotFound)?;
        if self.bound_vertex_array == Some(id) {
            self.bound_vertex_array = None;
        }
        Ok(())
    }

    fn create_shader(&mut self, descriptor: &ShaderDescriptor<'_>) -> Result<ShaderId, ResourceError> {
        descriptor.source.validate(descriptor.label)?;
        if let ShaderSource::Glsl(code) = descriptor.source {
            check_braces(code).map_err(|details| ShaderError::CompilationError {
                label: descriptor.label.to_string(),
                details,
            })?;
        }
        let id = ShaderId(self.generate_id());
        log::debug!("HeadlessDevice: linked shader '{}' as {id:?}", descriptor.label);
        self.shaders.insert(
            id,
            ShaderEntry {
                label: descriptor.label.to_string(),
                uniforms: HashMap::new(),
            },
        );
        Ok(id)
    }

    fn bind_shader(&mut self, id: Option<ShaderId>) -> Result<(), ResourceError> {
        if let Some(id) = id {
            if !self.shaders.contains_key(&id) {
                return Err(ResourceError::NotFound);
            }
        }
        self.bound_shader = id;
        Ok(())
    }

    fn set_uniform(
        &mut self,
        id: ShaderId,
        name: &str,
        value: &UniformValue,
    ) -> Result<(), ResourceError> {
        let shader = self.shaders.get_mut(&id).ok_or(ResourceError::NotFound)?;
        if name.is_empty() {
            return Err(ResourceError::InvalidParameter(format!(
                "empty uniform name in shader '{}'",
                shader.label
            )));
        }
        shader.uniforms.insert(name.to_string(), *value);
        Ok(())
    }

    fn destroy_shader(&mut self, id: ShaderId) -> Result<(), ResourceError> {
        self.shaders.remove(&id).ok_or(ResourceError::NotFound)?;
        if self.bound_shader == Some(id) {
            self.bound_shader = None;
        }
        Ok(())
    }

    fn create_texture(
        &mut self,
        properties: &TextureProperties,
        data: Option<&[u8]>,
    ) -> Result<TextureId, ResourceError> {
        if !properties.has_valid_size() {
            return Err(ResourceError::InvalidParameter(format!(
                "texture size {}x{} exceeds 1..={MAX_TEXTURE_SIZE}",
                properties.width, properties.height
            )));
        }
        let size = texture_bytes(properties)?;
        let contents = match data {
            Some(bytes) if bytes.len() as u64 != size => {
                return Err(ResourceError::InvalidParameter(format!(
                    "texture data is {} bytes, expected {size}",
                    bytes.len()
                )))
            }
            Some(bytes) => bytes.to_vec(),
            None => {
                let len = usize::try_from(size)
                    .map_err(|_| ResourceError::BackendError(format!("texture of {size} bytes")))?;
                vec![0; len]
            }
        };
        let id = TextureId(self.generate_id());
        self.stats.allocated_bytes += size;
        self.textures.insert(
            id,
            TextureEntry {
                properties: properties.clone(),
                contents,
            },
        );
        Ok(id)
    }

    fn write_texture(&mut self, id: TextureId, data: &[u8]) -> Result<(), ResourceError> {
        let entry = self.textures.get_mut(&id).ok_or(ResourceError::NotFound)?;
        let expected = texture_bytes(&entry.properties)?;
        if data.len() as u64 != expected {
            return Err(ResourceError::InvalidParameter(format!(
                "texture data is {} bytes, expected {expected}",
                data.len()
            )));
        }
        entry.contents.copy_from_slice(data);
        Ok(())
    }

    fn bind_texture(&mut self, id: TextureId, slot: u32) -> Result<(), ResourceError> {
        if !self.textures.contains_key(&id) {
            return Err(ResourceError::NotFound);
        }
        self.texture_slots.insert(slot, id);
        Ok(())
    }

    fn destroy_texture(&mut self, id: TextureId) -> Result<(), ResourceError> {
        let entry = self.textures.remove(&id).ok_or(ResourceError::NotFound)?;
        self.stats.allocated_bytes -= entry.contents.len() as u64;
        self.texture_slots.retain(|_, bound| *bound != id);
        Ok(())
    }

    fn create_framebuffer(
        &mut self,
        properties: &FramebufferProperties,
    ) -> Result<FramebufferId, ResourceError> {
        if !is_valid_framebuffer_size(properties.width, properties.height) {
            return Err(ResourceError::InvalidParameter(format!(
                "framebuffer size {}x{}",
                properties.width, properties.height
            )));
        }
        let id = FramebufferId(self.generate_id());
        self.framebuffers.insert(id, properties.clone());
        Ok(id)
    }

    fn resize_framebuffer(
        &mut self,
        id: FramebufferId,
        width: u32,
        height: u32,
    ) -> Result<(), ResourceError> {
        if !is_valid_framebuffer_size(width, height) {
            return Err(ResourceError::InvalidParameter(format!(
                "framebuffer size {width}x{height}"
            )));
        }
        let properties = self
            .framebuffers
            .get_mut(&id)
            .ok_or(ResourceError::NotFound)?;
        properties.width = width;
        properties.height = height;
        Ok(())
    }

    fn bind_framebuffer(&mut self, id: Option<FramebufferId>) -> Result<(), ResourceError> {
        if let Some(id) = id {
            if !self.framebuffers.contains_key(&id) {
                return Err(ResourceError::NotFound);
            }
        }
        self.bound_framebuffer = id;
        Ok(())
    }

    fn destroy_framebuffer(&mut self, id: FramebufferId) -> Result<(), ResourceError> {
        self.framebuffers
            .remove(&id)
            .ok_or(ResourceError::NotFound)?;
        if self.bound_framebuffer == Some(id) {
            self.bound_framebuffer = None;
        }
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    fn set_clear_color(&mut self, color: LinearRgba) {
        self.clear_color = color;
    }

    fn clear(&mut self) {}

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    fn draw_indexed(
        &mut self,
        vertex_array: VertexArrayId,
        index_count: u32,
    ) -> Result<(), ResourceError> {
        let entry = self.vertex_array(vertex_array)?;
        let index_buffer = entry.index_buffer.ok_or_else(|| {
            ResourceError::InvalidParameter(format!(
                "vertex array {vertex_array:?} has no index buffer"
            ))
        })?;
        let available = self.buffer(index_buffer)?.contents.len() as u64 / 4;
        if u64::from(index_count) > available {
            return Err(ResourceError::OutOfBounds);
        }
        self.stats.draw_calls += 1;
        Ok(())
    }

    fn draw_lines(
        &mut self,
        vertex_array: VertexArrayId,
        vertex_count: u32,
    ) -> Result<(), ResourceError> {
        if self.vertex_array(vertex_array)?.vertex_buffers.is_empty() {
            return Err(ResourceError::InvalidParameter(format!(
                "vertex array {vertex_array:?} has no vertex buffer"
            )));
        }
        if vertex_count == 0 {
            return Ok(());
        }
        self.stats.draw_calls += 1;
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<(), RenderError> {
        self.stats.frames_presented += 1;
        log::trace!("HeadlessDevice: presented frame {}", self.stats.frames_presented);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::renderer::{BufferElement, ShaderDataType, TextureFormat};

    fn descriptor(size: u64, usage: BufferUsage) -> BufferDescriptor<'static> {
        BufferDescriptor {
            label: None,
            size,
            usage,
        }
    }

    #[test]
    fn buffer_lifecycle_tracks_memory() {
        let mut device = HeadlessDevice::new();
        let id = device
            .create_buffer(&descriptor(64, BufferUsage::Vertex))
            .unwrap();
        assert_eq!(device.stats().allocated_bytes, 64);

        device.write_buffer(id, 60, &[1, 2, 3, 4]).unwrap();
        assert_eq!(&device.buffer_contents(id).unwrap()[60..], &[1, 2, 3, 4]);
        assert!(matches!(
            device.write_buffer(id, 62, &[0; 4]),
            Err(ResourceError::OutOfBounds)
        ));

        device.destroy_buffer(id).unwrap();
        assert_eq!(device.buffer_count(), 0);
        assert_eq!(device.stats().allocated_bytes, 0);
        assert!(matches!(device.destroy_buffer(id), Err(ResourceError::NotFound)));
    }

    #[test]
    fn zero_sized_buffers_are_rejected() {
        let mut device = HeadlessDevice::new();
        assert!(matches!(
            device.create_buffer(&descriptor(0, BufferUsage::Vertex)),
            Err(ResourceError::InvalidParameter(_))
        ));
    }

    #[test]
    fn binding_checks_usage() {
        let mut device = HeadlessDevice::new();
        let id = device
            .create_buffer_with_data(&descriptor(4, BufferUsage::Index), &[0; 4])
            .unwrap();
        assert!(device.bind_buffer(id, BufferUsage::Index).is_ok());
        assert!(matches!(
            device.bind_buffer(id, BufferUsage::Vertex),
            Err(ResourceError::InvalidParameter(_))
        ));
    }

    #[test]
    fn indexed_draw_needs_enough_indices() {
        let mut device = HeadlessDevice::new();
        let vertices = device
            .create_buffer(&descriptor(36, BufferUsage::Vertex))
            .unwrap();
        let indices = device
            .create_buffer_with_data(&descriptor(12, BufferUsage::Index), &[0; 12])
            .unwrap();
        let va = device.create_vertex_array().unwrap();
        let layout = BufferLayout::new([BufferElement::new(ShaderDataType::Float3, "a_Position")]);

        assert!(matches!(
            device.draw_indexed(va, 3),
            Err(ResourceError::InvalidParameter(_))
        ));

        assert_eq!(device.attach_vertex_buffer(va, vertices, &layout, 0).unwrap(), 1);
        assert_eq!(device.vertex_array_attributes(va), Some(1));
        device.attach_index_buffer(va, indices).unwrap();
        device.draw_indexed(va, 3).unwrap();
        assert!(matches!(device.draw_indexed(va, 4), Err(ResourceError::OutOfBounds)));
        assert_eq!(device.stats().draw_calls, 1);

        device.destroy_vertex_array(va).unwrap();
        assert_eq!(device.buffer_count(), 2);
    }

    #[test]
    fn shader_source_is_validated() {
        let mut device = HeadlessDevice::new();
        let source = ShaderSource::Glsl("void main() {}".to_string());
        let result = device.create_shader(&ShaderDescriptor {
            label: "broken",
            source: &source,
        });
        assert!(matches!(
            result,
            Err(ResourceError::Shader(ShaderError::InvalidSource { .. }))
        ));

        let source = ShaderSource::Glsl("void VSMain() {} void PSMain() {}".to_string());
        let id = device
            .create_shader(&ShaderDescriptor {
                label: "flat",
                source: &source,
            })
            .unwrap();
        device
            .set_uniform(id, "u_Color", &UniformValue::Float4([1.0; 4]))
            .unwrap();
        assert_eq!(
            device.uniform(id, "u_Color"),
            Some(UniformValue::Float4([1.0; 4]))
        );
    }

    #[test]
    fn unbalanced_glsl_fails_to_compile() {
        let mut device = HeadlessDevice::new();
        for code in ["void VSMain() {\nvoid PSMain() {}", "void VSMain() {}}\nvoid PSMain() {}"] {
            let source = ShaderSource::Glsl(code.to_string());
            let result = device.create_shader(&ShaderDescriptor {
                label: "broken",
                source: &source,
            });
            match result {
                Err(ResourceError::Shader(ShaderError::CompilationError { label, .. })) => {
                    assert_eq!(label, "broken")
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }
        assert_eq!(device.shader_count(), 0);
    }

    #[test]
    fn texture_uploads_must_cover_the_texture() {
        let mut device = HeadlessDevice::new();
        let props = TextureProperties {
            width: 2,
            height: 2,
            ..Default::default()
        };
        let id = device.create_texture(&props, None).unwrap();
        assert!(matches!(
            device.write_texture(id, &[0; 8]),
            Err(ResourceError::InvalidParameter(_))
        ));
        device.write_texture(id, &[7; 16]).unwrap();
        assert_eq!(device.texture_contents(id), Some(&[7u8; 16][..]));
    }

    #[test]
    fn oversized_textures_are_rejected() {
        let mut device = HeadlessDevice::new();
        for (width, height) in [(u32::MAX, u32::MAX), (MAX_TEXTURE_SIZE + 1, 1), (0, 4)] {
            let props = TextureProperties {
                width,
                height,
                format: TextureFormat::Rgba32Float,
                ..Default::default()
            };
            assert!(matches!(
                device.create_texture(&props, None),
                Err(ResourceError::InvalidParameter(_))
            ));
        }
        assert_eq!(device.texture_count(), 0);
        assert_eq!(device.stats().allocated_bytes, 0);
    }

    #[test]
    fn framebuffer_resize_is_bounded() {
        let mut device = HeadlessDevice::new();
        let id = device
            .create_framebuffer(&FramebufferProperties {
                width: 1280,
                height: 720,
                ..Default::default()
            })
            .unwrap();
        assert!(device.resize_framebuffer(id, 0, 720).is_err());
        assert!(device.resize_framebuffer(id, 9000, 720).is_err());
        device.resize_framebuffer(id, 1920, 1080).unwrap();
        assert_eq!(device.framebuffer_size(id), Some((1920, 1080)));
    }
}
