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

//! Defines data structures related to GPU buffer resources and vertex layouts.

use std::borrow::Cow;

/// Describes what a buffer is bound as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Per-vertex attribute data.
    Vertex,
    /// `u32` indices for indexed drawing.
    Index,
    /// Uniform block data bound to a binding point.
    Uniform,
}

/// A descriptor used to create a [`BufferId`](super::BufferId).
#[derive(Debug, Clone)]
pub struct BufferDescriptor<'a> {
    /// An optional debug label for the buffer.
    pub label: Option<Cow<'a, str>>,
    /// The total size of the buffer in bytes.
    pub size: u64,
    /// How the buffer will be bound.
    pub usage: BufferUsage,
}

/// The type of a single vertex attribute or uniform member as seen by a shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderDataType {
    /// `float`
    Float,
    /// `vec2`
    Float2,
    /// `vec3`
    Float3,
    /// `vec4`
    Float4,
    /// `mat3`
    Mat3,
    /// `mat4`
    Mat4,
    /// `int`
    Int,
    /// `ivec2`
    Int2,
    /// `ivec3`
    Int3,
    /// `ivec4`
    Int4,
    /// `bool`
    Bool,
}

impl ShaderDataType {
    /// Size of the type in bytes.
    pub const fn size(self) -> u32 {
        match self {
            ShaderDataType::Float => 4,
            ShaderDataType::Float2 => 4 * 2,
            ShaderDataType::Float3 => 4 * 3,
            ShaderDataType::Float4 => 4 * 4,
            ShaderDataType::Mat3 => 4 * 3 * 3,
            ShaderDataType::Mat4 => 4 * 4 * 4,
            ShaderDataType::Int => 4,
            ShaderDataType::Int2 => 4 * 2,
            ShaderDataType::Int3 => 4 * 3,
            ShaderDataType::Int4 => 4 * 4,
            ShaderDataType::Bool => 1,
        }
    }

    /// Number of scalar components. Matrices count their column vectors.
    pub const fn component_count(self) -> u32 {
        match self {
            ShaderDataType::Float | ShaderDataType::Int | ShaderDataType::Bool => 1,
            ShaderDataType::Float2 | ShaderDataType::Int2 => 2,
            ShaderDataType::Float3 | ShaderDataType::Int3 | ShaderDataType::Mat3 => 3,
            ShaderDataType::Float4 | ShaderDataType::Int4 | ShaderDataType::Mat4 => 4,
        }
    }

    /// Number of attribute slots the type occupies in a vertex array.
    pub const fn attribute_slots(self) -> u32 {
        match self {
            ShaderDataType::Mat3 => 3,
            ShaderDataType::Mat4 => 4,
            _ => 1,
        }
    }
}

/// A single named attribute inside a [`BufferLayout`].
#[derive(Debug, Clone, PartialEq)]
pub struct BufferElement {
    /// The attribute name, for debugging.
    pub name: String,
    /// The attribute type.
    pub data_type: ShaderDataType,
    /// Size in bytes, derived from `data_type`.
    pub size: u32,
    /// Byte offset within one vertex. Filled in by [`BufferLayout::new`].
    pub offset: u32,
    /// Whether integer data is normalized when read as floating point.
    pub normalized: bool,
}

impl BufferElement {
    /// Creates a non-normalized element.
    pub fn new(data_type: ShaderDataType, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type,
            size: data_type.size(),
            offset: 0,
            normalized: false,
        }
    }

    /// Marks the element as normalized.
    pub fn normalized(mut self) -> Self {
        self.normalized = true;
        self
    }
}

/// Describes how one vertex is laid out inside a vertex buffer.
///
/// Offsets and the stride are computed once at construction, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferLayout {
    elements: Vec<BufferElement>,
    stride: u32,
}

impl BufferLayout {
    /// Builds a layout from its elements, computing offsets and the stride.
    pub fn new(elements: impl IntoIterator<Item = BufferElement>) -> Self {
        let mut elements: Vec<BufferElement> = elements.into_iter().collect();
        let mut offset = 0;
        for element in &mut elements {
            element.offset = offset;
            offset += element.size;
        }
        Self {
            elements,
            stride: offset,
        }
    }

    /// Size of one vertex in bytes.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// The elements in declaration order.
    pub fn elements(&self) -> &[BufferElement] {
        &self.elements
    }

    /// Returns `true` if the layout has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Total number of vertex attribute slots the layout occupies.
    pub fn attribute_slots(&self) -> u32 {
        self.elements
            .iter()
            .map(|e| e.data_type.attribute_slots())
            .sum()
    }
}
