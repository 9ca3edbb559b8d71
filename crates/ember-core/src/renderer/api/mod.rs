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

//! Backend-agnostic rendering API.
//!
//! - **[`common`]**: Opaque backend ids, viewport and uniform values.
//! - **[`buffer`]**: Buffer usages, descriptors and vertex layouts.
//! - **[`shader`]**: Shader sources and descriptors.
//! - **[`texture`]**: 2D texture properties.
//! - **[`framebuffer`]**: Off-screen render target properties.

pub mod buffer;
pub mod common;
pub mod framebuffer;
pub mod shader;
pub mod texture;

pub use self::buffer::*;
pub use self::common::*;
pub use self::framebuffer::*;
pub use self::shader::*;
pub use self::texture::*;
