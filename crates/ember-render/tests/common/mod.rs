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

//! Shared helpers for the `ember-render` integration tests: a graphics device that
//! records every call it receives, and a command that holds the render thread.

#![allow(dead_code)]

use ember_core::math::LinearRgba;
use ember_core::renderer::{
    BufferDescriptor, BufferId, BufferLayout, BufferUsage, FramebufferId, FramebufferProperties,
    GraphicsDevice, RenderError, ResourceError, ShaderDescriptor, ShaderError, ShaderId,
    TextureId, TextureProperties, UniformValue, VertexArrayId, Viewport,
};
use ember_core::RendererConfig;
use ember_render::{Command, CommandContext, Renderer};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One call received by a [`RecordingDevice`]. Ids are the raw backend ids.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    CreateBuffer { id: usize, size: u64, usage: BufferUsage },
    WriteBuffer { id: usize, offset: u64, len: usize },
    BindBuffer { id: usize, usage: BufferUsage },
    BindBufferBase { id: usize, binding: u32 },
    UnbindBuffer(BufferUsage),
    DestroyBuffer(usize),
    CreateVertexArray(usize),
    BindVertexArray(Option<usize>),
    AttachVertexBuffer { vertex_array: usize, buffer: usize, stride: u32, first_attribute: u32 },
    AttachIndexBuffer { vertex_array: usize, buffer: usize },
    DestroyVertexArray(usize),
    CreateShader { id: usize, label: String },
    BindShader(Option<usize>),
    SetUniform { id: usize, name: String, value: UniformValue },
    DestroyShader(usize),
    CreateTexture { id: usize, width: u32, height: u32, with_data: bool },
    WriteTexture { id: usize, len: usize },
    BindTexture { id: usize, slot: u32 },
    DestroyTexture(usize),
    CreateFramebuffer { id: usize, width: u32, height: u32 },
    ResizeFramebuffer { id: usize, width: u32, height: u32 },
    BindFramebuffer(Option<usize>),
    DestroyFramebuffer(usize),
    SetViewport(Viewport),
    SetClearColor(LinearRgba),
    Clear,
    SetLineWidth(f32),
    DrawIndexed { vertex_array: usize, count: u32 },
    DrawLines { vertex_array: usize, count: u32 },
    SwapBuffers,
}

impl DeviceCall {
    /// Returns `true` for every `Destroy*` call.
    pub fn is_destroy(&self) -> bool {
        matches!(
            self,
            DeviceCall::DestroyBuffer(_)
                | DeviceCall::DestroyVertexArray(_)
                | DeviceCall::DestroyShader(_)
                | DeviceCall::DestroyTexture(_)
                | DeviceCall::DestroyFramebuffer(_)
        )
    }
}

/// The call log shared between a test and the device living on the render thread.
#[derive(Debug, Clone, Default)]
pub struct DeviceLog {
    calls: Arc<Mutex<Vec<DeviceCall>>>,
}

impl DeviceLog {
    fn record(&self, call: DeviceCall) {
        self.calls.lock().unwrap().push(call);
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&DeviceCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    /// Position of the first recorded call matching `predicate`.
    pub fn position(&self, predicate: impl Fn(&DeviceCall) -> bool) -> Option<usize> {
        self.calls.lock().unwrap().iter().position(|c| predicate(c))
    }

    /// Number of backend objects destroyed.
    pub fn destroyed(&self) -> usize {
        self.count(DeviceCall::is_destroy)
    }
}

/// A [`GraphicsDevice`] accepting every call and recording it.
#[derive(Debug)]
pub struct RecordingDevice {
    log: DeviceLog,
    next_id: usize,
    fail_shaders: bool,
}

impl RecordingDevice {
    pub fn new(log: DeviceLog) -> Self {
        Self {
            log,
            next_id: 0,
            fail_shaders: false,
        }
    }

    /// A device on which every shader fails to link.
    pub fn failing_shaders(log: DeviceLog) -> Self {
        Self {
            fail_shaders: true,
            ..Self::new(log)
        }
    }

    fn next(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }
}

impl GraphicsDevice for RecordingDevice {
    fn create_buffer(&mut self, descriptor: &BufferDescriptor<'_>) -> Result<BufferId, ResourceError> {
        let id = self.next();
        self.log.record(DeviceCall::CreateBuffer {
            id,
            size: descriptor.size,
            usage: descriptor.usage,
        });
        Ok(BufferId(id))
    }

    fn create_buffer_with_data(
        &mut self,
        descriptor: &BufferDescriptor<'_>,
        _data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        self.create_buffer(descriptor)
    }

    fn write_buffer(&mut self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::WriteBuffer {
            id: id.0,
            offset,
            len: data.len(),
        });
        Ok(())
    }

    fn bind_buffer(&mut self, id: BufferId, usage: BufferUsage) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::BindBuffer { id: id.0, usage });
        Ok(())
    }

    fn bind_buffer_base(&mut self, id: BufferId, binding: u32) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::BindBufferBase { id: id.0, binding });
        Ok(())
    }

    fn unbind_buffer(&mut self, usage: BufferUsage) {
        self.log.record(DeviceCall::UnbindBuffer(usage));
    }

    fn destroy_buffer(&mut self, id: BufferId) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::DestroyBuffer(id.0));
        Ok(())
    }

    fn create_vertex_array(&mut self) -> Result<VertexArrayId, ResourceError> {
        let id = self.next();
        self.log.record(DeviceCall::CreateVertexArray(id));
        Ok(VertexArrayId(id))
    }

    fn bind_vertex_array(&mut self, id: Option<VertexArrayId>) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::BindVertexArray(id.map(|id| id.0)));
        Ok(())
    }

    fn attach_vertex_buffer(
        &mut self,
        vertex_array: VertexArrayId,
        buffer: BufferId,
        layout: &BufferLayout,
        first_attribute: u32,
    ) -> Result<u32, ResourceError> {
        self.log.record(DeviceCall::AttachVertexBuffer {
            vertex_array: vertex_array.0,
            buffer: buffer.0,
            stride: layout.stride(),
            first_attribute,
        });
        Ok(layout.attribute_slots())
    }

    fn attach_index_buffer(
        &mut self,
        vertex_array: VertexArrayId,
        buffer: BufferId,
    ) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::AttachIndexBuffer {
            vertex_array: vertex_array.0,
            buffer: buffer.0,
        });
        Ok(())
    }

    fn destroy_vertex_array(&mut self, id: VertexArrayId) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::DestroyVertexArray(id.0));
        Ok(())
    }

    fn create_shader(&mut self, descriptor: &ShaderDescriptor<'_>) -> Result<ShaderId, ResourceError> {
        if self.fail_shaders {
            return Err(ShaderError::LinkError {
                label: descriptor.label.to_string(),
                details: "PSMain input `v_Color` has no matching VSMain output".to_string(),
            }
            .into());
        }
        let id = self.next();
        self.log.record(DeviceCall::CreateShader {
            id,
            label: descriptor.label.to_string(),
        });
        Ok(ShaderId(id))
    }

    fn bind_shader(&mut self, id: Option<ShaderId>) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::BindShader(id.map(|id| id.0)));
        Ok(())
    }

    fn set_uniform(
        &mut self,
        id: ShaderId,
        name: &str,
        value: &UniformValue,
    ) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::SetUniform {
            id: id.0,
            name: name.to_string(),
            value: *value,
        });
        Ok(())
    }

    fn destroy_shader(&mut self, id: ShaderId) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::DestroyShader(id.0));
        Ok(())
    }

    fn create_texture(
        &mut self,
        properties: &TextureProperties,
        data: Option<&[u8]>,
    ) -> Result<TextureId, ResourceError> {
        let id = self.next();
        self.log.record(DeviceCall::CreateTexture {
            id,
            width: properties.width,
            height: properties.height,
            with_data: data.is_some(),
        });
        Ok(TextureId(id))
    }

    fn write_texture(&mut self, id: TextureId, data: &[u8]) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::WriteTexture {
            id: id.0,
            len: data.len(),
        });
        Ok(())
    }

    fn bind_texture(&mut self, id: TextureId, slot: u32) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::BindTexture { id: id.0, slot });
        Ok(())
    }

    fn destroy_texture(&mut self, id: TextureId) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::DestroyTexture(id.0));
        Ok(())
    }

    fn create_framebuffer(
        &mut self,
        properties: &FramebufferProperties,
    ) -> Result<FramebufferId, ResourceError> {
        let id = self.next();
        self.log.record(DeviceCall::CreateFramebuffer {
            id,
            width: properties.width,
            height: properties.height,
        });
        Ok(FramebufferId(id))
    }

    fn resize_framebuffer(
        &mut self,
        id: FramebufferId,
        width: u32,
        height: u32,
    ) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::ResizeFramebuffer {
            id: id.0,
            width,
            height,
        });
        Ok(())
    }

    fn bind_framebuffer(&mut self, id: Option<FramebufferId>) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::BindFramebuffer(id.map(|id| id.0)));
        Ok(())
    }

    fn destroy_framebuffer(&mut self, id: FramebufferId) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::DestroyFramebuffer(id.0));
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.log.record(DeviceCall::SetViewport(viewport));
    }

    fn set_clear_color(&mut self, color: LinearRgba) {
        self.log.record(DeviceCall::SetClearColor(color));
    }

    fn clear(&mut self) {
        self.log.record(DeviceCall::Clear);
    }

    fn set_line_width(&mut self, width: f32) {
        self.log.record(DeviceCall::SetLineWidth(width));
    }

    fn draw_indexed(
        &mut self,
        vertex_array: VertexArrayId,
        index_count: u32,
    ) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::DrawIndexed {
            vertex_array: vertex_array.0,
            count: index_count,
        });
        Ok(())
    }

    fn draw_lines(
        &mut self,
        vertex_array: VertexArrayId,
        vertex_count: u32,
    ) -> Result<(), ResourceError> {
        self.log.record(DeviceCall::DrawLines {
            vertex_array: vertex_array.0,
            count: vertex_count,
        });
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<(), RenderError> {
        self.log.record(DeviceCall::SwapBuffers);
        Ok(())
    }
}

/// Holds the render thread until the paired [`GateKey`] is opened or dropped.
#[derive(Debug)]
pub struct Gate(flume::Receiver<()>);

impl Command for Gate {
    fn execute(self: Box<Self>, _ctx: &mut CommandContext<'_>) {
        let _ = self.0.recv_timeout(Duration::from_secs(10));
    }
}

/// Opens a [`Gate`].
pub struct GateKey(flume::Sender<()>);

impl GateKey {
    pub fn open(self) {
        let _ = self.0.send(());
    }
}

pub fn gate() -> (Gate, GateKey) {
    let (tx, rx) = flume::bounded(1);
    (Gate(rx), GateKey(tx))
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A configuration suited to tests: short idle waits, no trap on create failure.
pub fn test_config() -> RendererConfig {
    RendererConfig {
        thread_name: "ember-render-test".to_string(),
        idle_wait_ms: 1,
        trap_on_create_failure: false,
        ..Default::default()
    }
}

/// Starts a renderer over a [`RecordingDevice`] built by `make_device`.
pub fn start_with(
    config: RendererConfig,
    make_device: impl FnOnce(DeviceLog) -> RecordingDevice + Send + 'static,
) -> (Renderer, DeviceLog) {
    init_logger();
    let log = DeviceLog::default();
    let device_log = log.clone();
    let renderer = Renderer::new(config, move || {
        Ok(Box::new(make_device(device_log)) as Box<dyn GraphicsDevice>)
    })
    .expect("renderer should start");
    (renderer, log)
}

/// Starts a renderer over a plain [`RecordingDevice`].
pub fn start() -> (Renderer, DeviceLog) {
    start_with(test_config(), RecordingDevice::new)
}
