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

//! Device-wide state and draw commands.

use super::{report_failure, Command, CommandContext};
use crate::kinds::VertexArray;
use crate::resource::{RenderResource, ResourceId};
use ember_core::math::LinearRgba;
use ember_core::renderer::Viewport;

/// Sets the viewport transform.
#[derive(Debug)]
pub struct SetViewport(pub Viewport);

impl Command for SetViewport {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        let viewport = self.0;
        if viewport.width == 0 || viewport.height == 0 {
            log::warn!("Ignoring degenerate viewport ({viewport})");
            return;
        }
        ctx.device.set_viewport(viewport);
    }
}

/// Sets the color used by [`Clear`].
#[derive(Debug)]
pub struct SetClearColor(pub LinearRgba);

impl Command for SetClearColor {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        ctx.device.set_clear_color(self.0);
    }
}

/// Clears the current render target.
#[derive(Debug)]
pub struct Clear;

impl Command for Clear {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        ctx.device.clear();
    }
}

/// Presents the back buffer.
#[derive(Debug)]
pub struct SwapBuffers;

impl Command for SwapBuffers {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        if let Err(e) = ctx.device.swap_buffers() {
            log::error!("Failed to present the frame: {e}");
        }
    }
}

/// Sets the rasterized width of lines.
#[derive(Debug)]
pub struct SetLineWidth(pub f32);

impl Command for SetLineWidth {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        if self.0.is_nan() || self.0 <= 0.0 {
            log::warn!("Ignoring line width {}", self.0);
            return;
        }
        ctx.device.set_line_width(self.0);
    }
}

/// Draws a vertex array through its index buffer.
#[derive(Debug)]
pub struct DrawIndexed {
    vertex_array: ResourceId,
    index_count: Option<u32>,
}

impl DrawIndexed {
    /// Draws `index_count` indices, or the whole index buffer when `None` or zero.
    pub(crate) fn new(vertex_array: ResourceId, index_count: Option<u32>) -> Self {
        Self {
            vertex_array,
            index_count,
        }
    }
}

impl Command for DrawIndexed {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        let Some((backend, attached)) =
            ctx.inspect::<VertexArray, _, _>(self.vertex_array, "DrawIndexed", |va| {
                (va.backend_id(), va.index_count())
            })
        else {
            return;
        };
        let count = match self.index_count {
            Some(count) if count > 0 => count,
            _ => attached,
        };
        if count == 0 {
            log::warn!(
                "Skipping DrawIndexed on {} {}: no indices",
                VertexArray::KIND,
                self.vertex_array
            );
            return;
        }
        if let Err(e) = ctx.device.draw_indexed(backend, count) {
            report_failure("DrawIndexed", VertexArray::KIND, self.vertex_array, &e);
        }
    }
}

/// Draws the vertices of a vertex array as a line list.
#[derive(Debug)]
pub struct DrawLines {
    vertex_array: ResourceId,
    vertex_count: u32,
}

impl DrawLines {
    pub(crate) fn new(vertex_array: ResourceId, vertex_count: u32) -> Self {
        Self {
            vertex_array,
            vertex_count,
        }
    }
}

impl Command for DrawLines {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        let Some(backend) = ctx.inspect::<VertexArray, _, _>(self.vertex_array, "DrawLines", |va| {
            va.backend_id()
        }) else {
            return;
        };
        if let Err(e) = ctx.device.draw_lines(backend, self.vertex_count) {
            report_failure("DrawLines", VertexArray::KIND, self.vertex_array, &e);
        }
    }
}
