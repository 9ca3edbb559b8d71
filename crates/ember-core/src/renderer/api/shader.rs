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

//! Shader program sources and descriptors.

use crate::renderer::error::ShaderError;

/// Entry point of the vertex stage inside a combined GLSL source.
pub const VERTEX_ENTRY_POINT: &str = "VSMain";
/// Entry point of the pixel (fragment) stage inside a combined GLSL source.
pub const PIXEL_ENTRY_POINT: &str = "PSMain";
/// The first word of every valid SPIR-V module.
pub const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Where the code of a shader program comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderSource {
    /// A single GLSL source containing both stage entry points
    /// ([`VERTEX_ENTRY_POINT`] and [`PIXEL_ENTRY_POINT`]).
    Glsl(String),
    /// Pre-compiled SPIR-V words for each stage.
    SpirV {
        /// Vertex stage module.
        vertex: Vec<u32>,
        /// Pixel stage module.
        pixel: Vec<u32>,
    },
}

impl ShaderSource {
    /// Checks that the source can be handed to a backend at all.
    /// ## Errors
    /// * `ShaderError::InvalidSource` - If the GLSL text is blank or lacks one of the
    ///   entry points, or if a SPIR-V module is empty or does not start with [`SPIRV_MAGIC`].
    pub fn validate(&self, label: &str) -> Result<(), ShaderError> {
        let invalid = |reason: String| ShaderError::InvalidSource {
            label: label.to_owned(),
            reason,
        };
        match self {
            ShaderSource::Glsl(code) => {
                if code.trim().is_empty() {
                    return Err(invalid("empty GLSL source".to_owned()));
                }
                for entry in [VERTEX_ENTRY_POINT, PIXEL_ENTRY_POINT] {
                    if !code.contains(entry) {
                        return Err(invalid(format!("missing entry point `{entry}`")));
                    }
                }
                Ok(())
            }
            ShaderSource::SpirV { vertex, pixel } => {
                for (stage, words) in [("vertex", vertex), ("pixel", pixel)] {
                    if words.first() != Some(&SPIRV_MAGIC) {
                        return Err(invalid(format!("{stage} stage is not a SPIR-V module")));
                    }
                }
                Ok(())
            }
        }
    }
}

/// A descriptor used to create a [`ShaderId`](super::ShaderId).
#[derive(Debug, Clone, Copy)]
pub struct ShaderDescriptor<'a> {
    /// Debug name of the program.
    pub label: &'a str,
    /// The program code.
    pub source: &'a ShaderSource,
}
