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

//! # Ember Render
//!
//! Deferred command execution and cross-thread resource ownership.
//!
//! Application code holds [`Proxy`] values and calls methods on them; each call queues a
//! [`Command`] that the render thread, the only thread allowed to touch the
//! [`GraphicsDevice`](ember_core::renderer::GraphicsDevice), executes in submission
//! order. Dropping the last proxy of a resource queues its release behind every
//! command already submitted for it.

#![warn(missing_docs)]

pub mod command;
pub mod kinds;
pub mod proxy;
pub mod queue;
pub mod renderer;
pub mod resource;
pub mod stats;
pub mod submit;
pub mod worker;

pub use command::{Command, CommandContext, ExecutionPolicy};
pub use kinds::{
    Framebuffer, FramebufferProxy, IndexBuffer, IndexBufferProxy, Shader, ShaderProxy,
    Texture2D, Texture2DProxy, UniformBuffer, UniformBufferProxy, VertexArray, VertexArrayProxy,
    VertexBuffer, VertexBufferProxy,
};
pub use proxy::Proxy;
pub use queue::CommandQueue;
pub use renderer::Renderer;
pub use resource::{ResourceContainer, ResourceHandle, ResourceId};
pub use stats::RendererStats;
pub use submit::Submitter;
pub use worker::{DeviceFactory, WorkerState};
