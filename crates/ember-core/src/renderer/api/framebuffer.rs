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

//! Defines the properties of off-screen framebuffers.

/// Largest width or height a framebuffer may be resized to.
pub const MAX_FRAMEBUFFER_SIZE: u32 = 8192;

/// Format of a single framebuffer attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentFormat {
    /// 8-bit RGBA color.
    Rgba8,
    /// Single-channel integer color (e.g. entity ids for picking).
    RedInteger,
    /// Combined 24-bit depth and 8-bit stencil.
    Depth24Stencil8,
}

impl AttachmentFormat {
    /// Returns `true` for depth/stencil formats.
    pub const fn is_depth(self) -> bool {
        matches!(self, AttachmentFormat::Depth24Stencil8)
    }
}

/// Everything needed to allocate a framebuffer.
#[derive(Debug, Clone, PartialEq)]
pub struct FramebufferProperties {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Attachments, in order. At most one depth attachment is allowed.
    pub attachments: Vec<AttachmentFormat>,
    /// Sample count.
    pub samples: u32,
    /// Whether this framebuffer stands for the swap chain.
    pub swap_chain_target: bool,
}

impl Default for FramebufferProperties {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            attachments: Vec::new(),
            samples: 1,
            swap_chain_target: false,
        }
    }
}

/// Returns `true` if a framebuffer may take the given dimensions.
pub fn is_valid_framebuffer_size(width: u32, height: u32) -> bool {
    width != 0 && height != 0 && width <= MAX_FRAMEBUFFER_SIZE && height <= MAX_FRAMEBUFFER_SIZE
}
