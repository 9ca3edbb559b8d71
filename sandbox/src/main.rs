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

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use ember_core::math::{LinearRgba, MAT4_IDENTITY};
use ember_core::renderer::{
    BufferElement, BufferLayout, FramebufferProperties, GraphicsDevice, ShaderDataType,
    ShaderSource, TextureProperties, Viewport,
};
use ember_core::RendererConfig;
use ember_infra::HeadlessDevice;
use ember_render::{
    FramebufferProxy, IndexBufferProxy, Renderer, ShaderProxy, Texture2DProxy,
    UniformBufferProxy, VertexArrayProxy, VertexBufferProxy,
};

const FRAMES: u32 = 3;

const FLAT_SHADER: &str = r#"
#version 450
layout(location = 0) in vec3 a_Position;
layout(location = 1) in vec4 a_Color;
layout(location = 0) out vec4 v_Color;
uniform mat4 u_ViewProjection;

void VSMain() {
    v_Color = a_Color;
    gl_Position = u_ViewProjection * vec4(a_Position, 1.0);
}

layout(location = 0) out vec4 o_Color;

void PSMain() {
    o_Color = v_Color;
}
"#;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 4],
}

const QUAD: [Vertex; 4] = [
    Vertex {
        position: [-0.5, -0.5, 0.0],
        color: [1.0, 0.0, 0.0, 1.0],
    },
    Vertex {
        position: [0.5, -0.5, 0.0],
        color: [0.0, 1.0, 0.0, 1.0],
    },
    Vertex {
        position: [0.5, 0.5, 0.0],
        color: [0.0, 0.0, 1.0, 1.0],
    },
    Vertex {
        position: [-0.5, 0.5, 0.0],
        color: [1.0, 1.0, 1.0, 1.0],
    },
];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

fn load_config() -> Result<RendererConfig> {
    match std::env::args().nth(1) {
        Some(path) => RendererConfig::from_file(&path)
            .with_context(|| format!("cannot load renderer config from {path}")),
        None => Ok(RendererConfig {
            clear_color: Some(LinearRgba::new(0.1, 0.1, 0.12, 1.0)),
            viewport: Some(Viewport::new(0, 0, 1280, 720)),
            ..Default::default()
        }),
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let mut renderer = Renderer::new(config, || {
        Ok(Box::new(HeadlessDevice::new()) as Box<dyn GraphicsDevice>)
    })?;

    let vertices = VertexBufferProxy::create_with_data(&renderer, &QUAD);
    vertices.set_layout(BufferLayout::new([
        BufferElement::new(ShaderDataType::Float3, "a_Position"),
        BufferElement::new(ShaderDataType::Float4, "a_Color"),
    ]));
    let indices = IndexBufferProxy::create(&renderer, &QUAD_INDICES);

    let quad = VertexArrayProxy::create(&renderer);
    quad.add_vertex_buffer(&vertices);
    quad.set_index_buffer(&indices);
    // The vertex array keeps both buffers alive from here on.
    drop((vertices, indices));

    let shader = ShaderProxy::create(&renderer, "flat", ShaderSource::Glsl(FLAT_SHADER.into()));
    let camera = UniformBufferProxy::create(&renderer, 64, 0);
    camera.set_data(&MAT4_IDENTITY);

    let checker = Texture2DProxy::create_with_data(
        &renderer,
        TextureProperties {
            width: 2,
            height: 2,
            ..Default::default()
        },
        &[
            255, 255, 255, 255, 0, 0, 0, 255, //
            0, 0, 0, 255, 255, 255, 255, 255,
        ],
    );

    let target = FramebufferProxy::create(
        &renderer,
        FramebufferProperties {
            width: 1280,
            height: 720,
            ..Default::default()
        },
    );

    for frame in 0..FRAMES {
        target.bind();
        renderer.clear();
        shader.bind();
        shader.set_mat4("u_ViewProjection", MAT4_IDENTITY);
        shader.set_float("u_Time", frame as f32 / 60.0);
        checker.bind_slot(0);
        camera.bind();
        quad.bind();
        renderer.submit(&quad);
        target.unbind();
        renderer.swap_buffers();
    }

    target.resize(1920, 1080);
    renderer.flush()?;

    let stats = renderer.stats();
    log::info!(
        "Rendered {FRAMES} frames: {} commands, {} resources, {} creation failures",
        stats.commands_executed,
        stats.resources_created,
        stats.create_failures
    );

    drop((quad, shader, camera, checker, target));
    renderer.shutdown()?;
    Ok(())
}
