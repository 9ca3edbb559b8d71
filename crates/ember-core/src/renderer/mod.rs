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

//! Provides the public, backend-agnostic rendering contracts.
//!
//! This module defines the "common language" spoken between the deferred command
//! layer and a concrete graphics backend. It contains the abstract [`GraphicsDevice`]
//! trait, the descriptors used to create resources (like [`BufferLayout`] or
//! [`TextureProperties`]), and the error types reported by backends.
//!
//! The command layer only ever calls into a [`GraphicsDevice`] from the render thread;
//! implementations are therefore free to wrap thread-bound contexts.

pub mod api;
pub mod error;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::{RenderError, ResourceError, ShaderError};
pub use self::traits::GraphicsDevice;
