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

use crate::command::{Command, CommandContext};
use crate::proxy::Proxy;
use crate::resource::{Bindable, Creatable, RenderResource, ResourceId};
use crate::submit::Submitter;
use ember_core::renderer::{
    is_valid_framebuffer_size, FramebufferId, FramebufferProperties, GraphicsDevice,
    ResourceError, MAX_FRAMEBUFFER_SIZE,
};

/// An off-screen render target.
#[derive(Debug)]
pub struct Framebuffer {
    framebuffer: FramebufferId,
    properties: FramebufferProperties,
}

impl Framebuffer {
    /// The backend framebuffer.
    pub fn framebuffer_id(&self) -> FramebufferId {
        self.framebuffer
    }

    /// Current size and attachments.
    pub fn properties(&self) -> &FramebufferProperties {
        &self.properties
    }
}

fn check_size(width: u32, height: u32) -> Result<(), ResourceError> {
    if is_valid_framebuffer_size(width, height) {
        Ok(())
    } else {
        Err(ResourceError::InvalidParameter(format!(
            "framebuffer size {width}x{height} (each side must be in 1..={MAX_FRAMEBUFFER_SIZE})"
        )))
    }
}

impl RenderResource for Framebuffer {
    const KIND: &'static str = "Framebuffer";

    fn release(self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.destroy_framebuffer(self.framebuffer)
    }
}

impl Creatable for Framebuffer {
    type Args = FramebufferProperties;

    fn create(device: &mut dyn GraphicsDevice, properties: Self::Args) -> Result<Self, ResourceError> {
        check_size(properties.width, properties.height)?;
        let framebuffer = device.create_framebuffer(&properties)?;
        Ok(Self {
            framebuffer,
            properties,
        })
    }
}

impl Bindable for Framebuffer {
    fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.bind_framebuffer(Some(self.framebuffer))
    }

    fn unbind(&self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.bind_framebuffer(None)
    }
}

/// Recreates the attachments of a framebuffer at a new size.
#[derive(Debug)]
pub struct Resize {
    id: ResourceId,
    width: u32,
    height: u32,
}

impl Command for Resize {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        let Resize { id, width, height } = *self;
        ctx.with_resource::<Framebuffer, _, _>(id, "Resize", |fb, device| {
            check_size(width, height)?;
            device.resize_framebuffer(fb.framebuffer, width, height)?;
            fb.properties.width = width;
            fb.properties.height = height;
            Ok(())
        });
    }
}

/// Application-side value of a [`Framebuffer`].
pub type FramebufferProxy = Proxy<Framebuffer>;

impl Proxy<Framebuffer> {
    /// Creates a framebuffer with the given size and attachments.
    pub fn create(submitter: &impl AsRef<Submitter>, properties: FramebufferProperties) -> Self {
        Self::spawn(submitter.as_ref(), properties)
    }

    /// Queues a resize. Zero or oversized dimensions are skipped with a warning.
    pub fn resize(&self, width: u32, height: u32) {
        self.submitter().push(Resize {
            id: self.id(),
            width,
            height,
        });
    }
}
