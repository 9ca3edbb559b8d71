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

//! Integration tests for the ordering guarantees of the command queue: commands run in
//! exactly the order they were submitted, across resources and device-global state.

mod common;

use common::{gate, start, start_with, test_config, DeviceCall, RecordingDevice};
use ember_core::math::LinearRgba;
use ember_core::renderer::{BufferElement, BufferLayout, BufferUsage, ShaderDataType, Viewport};
use ember_core::RendererConfig;
use ember_render::{VertexArrayProxy, VertexBufferProxy};

fn position_layout() -> BufferLayout {
    BufferLayout::new([BufferElement::new(ShaderDataType::Float3, "a_Position")])
}

// ─────────────────────────────────────────────────────────────────────────────
// FIFO
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_commands_execute_in_submission_order() {
    let (renderer, log) = start();

    let vb = VertexBufferProxy::create(&renderer, 64);
    renderer.set_clear_color(LinearRgba::RED);
    vb.bind();
    vb.set_data(&[1.0f32; 4]);
    renderer.clear();
    vb.unbind();
    renderer.swap_buffers();
    renderer.flush().unwrap();

    assert_eq!(
        log.calls(),
        vec![
            DeviceCall::CreateBuffer {
                id: 1,
                size: 64,
                usage: BufferUsage::Vertex
            },
            DeviceCall::SetClearColor(LinearRgba::RED),
            DeviceCall::BindBuffer {
                id: 1,
                usage: BufferUsage::Vertex
            },
            DeviceCall::WriteBuffer {
                id: 1,
                offset: 0,
                len: 16
            },
            DeviceCall::Clear,
            DeviceCall::UnbindBuffer(BufferUsage::Vertex),
            DeviceCall::SwapBuffers,
        ]
    );
}

#[test]
fn test_long_sequences_keep_their_order() {
    let (renderer, log) = start();

    for i in 1..=500 {
        renderer.set_line_width(i as f32);
    }
    renderer.flush().unwrap();

    let widths: Vec<f32> = log
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            DeviceCall::SetLineWidth(w) => Some(w),
            _ => None,
        })
        .collect();
    let expected: Vec<f32> = (1..=500).map(|i| i as f32).collect();
    assert_eq!(widths, expected);
}

#[test]
fn test_commands_from_a_cloned_submitter_share_the_queue() {
    let (renderer, log) = start();
    let submitter = renderer.submitter().clone();

    let vb = VertexBufferProxy::create(&submitter, 16);
    std::thread::spawn(move || {
        vb.bind();
        vb.unbind();
    })
    .join()
    .unwrap();
    renderer.flush().unwrap();

    let calls = log.calls();
    assert!(matches!(calls[0], DeviceCall::CreateBuffer { .. }));
    assert!(matches!(calls[1], DeviceCall::BindBuffer { .. }));
    assert_eq!(calls[2], DeviceCall::UnbindBuffer(BufferUsage::Vertex));
    // The proxy was dropped on the spawned thread.
    assert_eq!(calls[3], DeviceCall::DestroyBuffer(1));
}

// ─────────────────────────────────────────────────────────────────────────────
// Deferred execution
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_vertex_buffer_creation_and_layout_are_deferred() {
    let (renderer, log) = start();
    let (gate, key) = gate();
    renderer.push(gate);

    let vertices: [f32; 9] = [-0.5, -0.5, 0.0, 0.5, -0.5, 0.0, 0.0, 0.5, 0.0];
    let vb = VertexBufferProxy::create_with_data(&renderer, &vertices);
    assert_eq!(
        renderer.stats().commands_submitted,
        2,
        "creating a proxy must queue exactly one command"
    );

    vb.set_layout(position_layout());
    assert_eq!(renderer.stats().commands_submitted, 3);
    assert_eq!(renderer.stats().pending_commands(), 3);
    assert!(
        log.calls().is_empty(),
        "nothing may reach the device while the render thread is held"
    );

    key.open();
    renderer.flush().unwrap();
    assert_eq!(
        log.calls(),
        vec![DeviceCall::CreateBuffer {
            id: 1,
            size: 36,
            usage: BufferUsage::Vertex
        }]
    );

    // The layout set above is the one the vertex array sees.
    let va = VertexArrayProxy::create(&renderer);
    va.add_vertex_buffer(&vb);
    renderer.flush().unwrap();
    assert_eq!(
        log.calls().last(),
        Some(&DeviceCall::AttachVertexBuffer {
            vertex_array: 2,
            buffer: 1,
            stride: 12,
            first_attribute: 0
        })
    );
}

#[test]
fn test_initial_device_state_comes_from_config() {
    let config = RendererConfig {
        clear_color: Some(LinearRgba::BLUE),
        viewport: Some(Viewport::new(0, 0, 800, 600)),
        ..test_config()
    };
    let (renderer, log) = start_with(config, RecordingDevice::new);
    renderer.clear();
    renderer.flush().unwrap();

    assert_eq!(
        log.calls(),
        vec![
            DeviceCall::SetClearColor(LinearRgba::BLUE),
            DeviceCall::SetViewport(Viewport::new(0, 0, 800, 600)),
            DeviceCall::Clear,
        ]
    );
}

#[test]
fn test_degenerate_global_state_is_skipped() {
    let (renderer, log) = start();
    renderer.set_viewport(Viewport::new(0, 0, 0, 600));
    renderer.set_line_width(0.0);
    renderer.set_viewport(Viewport::new(0, 0, 1280, 720));
    renderer.flush().unwrap();

    assert_eq!(
        log.calls(),
        vec![DeviceCall::SetViewport(Viewport::new(0, 0, 1280, 720))]
    );
}
