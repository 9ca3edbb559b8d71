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

//! The resource kinds the renderer manages, each with its backend state, its
//! kind-specific commands and the operations of its [`Proxy`](crate::Proxy).

mod framebuffer;
mod index_buffer;
mod shader;
mod texture;
mod uniform_buffer;
mod vertex_array;
mod vertex_buffer;

pub use self::framebuffer::{Framebuffer, FramebufferProxy, Resize};
pub use self::index_buffer::{IndexBuffer, IndexBufferProxy};
pub use self::shader::{SetUniform, Shader, ShaderArgs, ShaderProxy};
pub use self::texture::{BindTexture, Texture2D, Texture2DProxy, TextureArgs};
pub use self::uniform_buffer::{UniformBuffer, UniformBufferArgs, UniformBufferProxy};
pub use self::vertex_array::{AddVertexBuffer, SetIndexBuffer, VertexArray, VertexArrayProxy};
pub use self::vertex_buffer::{SetLayout, VertexBuffer, VertexBufferInit, VertexBufferProxy};
