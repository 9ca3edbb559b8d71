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
use crate::resource::{Creatable, DataSettable, RenderResource, ResourceId};
use crate::submit::Submitter;
use ember_core::renderer::{
    GraphicsDevice, ResourceError, TextureId, TextureProperties, MAX_TEXTURE_SIZE,
};
use std::fmt;

/// A 2D texture.
#[derive(Debug)]
pub struct Texture2D {
    texture: TextureId,
    properties: TextureProperties,
}

impl Texture2D {
    /// The backend texture.
    pub fn texture_id(&self) -> TextureId {
        self.texture
    }

    /// Size and format of the texture.
    pub fn properties(&self) -> &TextureProperties {
        &self.properties
    }

    fn check_size(properties: &TextureProperties) -> Result<(), ResourceError> {
        if properties.has_valid_size() {
            Ok(())
        } else {
            Err(ResourceError::InvalidParameter(format!(
                "texture size {}x{} (each side must be in 1..={MAX_TEXTURE_SIZE})",
                properties.width, properties.height
            )))
        }
    }

    fn check_upload(properties: &TextureProperties, len: usize) -> Result<(), ResourceError> {
        let expected = properties.byte_size().ok_or_else(|| {
            ResourceError::InvalidParameter(format!(
                "texture size {}x{} overflows",
                properties.width, properties.height
            ))
        })?;
        if len as u64 != expected {
            return Err(ResourceError::InvalidParameter(format!(
                "texture data is {len} bytes, a {}x{} {:?} texture needs {expected}",
                properties.width, properties.height, properties.format
            )));
        }
        Ok(())
    }
}

/// Arguments captured by the `Create` command of a [`Texture2D`].
pub struct TextureArgs {
    /// Size and format.
    pub properties: TextureProperties,
    /// Initial contents covering the whole texture.
    pub data: Option<Vec<u8>>,
}

impl fmt::Debug for TextureArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureArgs")
            .field("properties", &self.properties)
            .field("data", &self.data.as_ref().map(Vec::len))
            .finish()
    }
}

impl RenderResource for Texture2D {
    const KIND: &'static str = "Texture2D";

    fn release(self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.destroy_texture(self.texture)
    }
}

impl Creatable for Texture2D {
    type Args = TextureArgs;

    fn create(device: &mut dyn GraphicsDevice, args: Self::Args) -> Result<Self, ResourceError> {
        let TextureArgs { properties, data } = args;
        Self::check_size(&properties)?;
        if let Some(bytes) = &data {
            Self::check_upload(&properties, bytes.len())?;
        }
        let texture = device.create_texture(&properties, data.as_deref())?;
        Ok(Self {
            texture,
            properties,
        })
    }
}

impl DataSettable for Texture2D {
    /// Replaces the whole texture; partial uploads are rejected.
    fn set_data(
        &mut self,
        device: &mut dyn GraphicsDevice,
        offset: u64,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        if offset != 0 {
            return Err(ResourceError::InvalidParameter(format!(
                "texture uploads cannot start at offset {offset}"
            )));
        }
        Self::check_upload(&self.properties, data.len())?;
        device.write_texture(self.texture, data)
    }
}

/// Binds a texture to a sampler slot.
#[derive(Debug)]
pub struct BindTexture {
    id: ResourceId,
    slot: u32,
}

impl Command for BindTexture {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        let slot = self.slot;
        ctx.with_resource::<Texture2D, _, _>(self.id, "BindTexture", |texture, device| {
            device.bind_texture(texture.texture, slot)
        });
    }
}

/// Application-side value of a [`Texture2D`].
pub type Texture2DProxy = Proxy<Texture2D>;

impl Proxy<Texture2D> {
    /// Creates an uninitialized texture.
    pub fn create(submitter: &impl AsRef<Submitter>, properties: TextureProperties) -> Self {
        Self::spawn(
            submitter.as_ref(),
            TextureArgs {
                properties,
                data: None,
            },
        )
    }

    /// Creates a texture initialized with a copy of `data`, which must cover it entirely.
    pub fn create_with_data(
        submitter: &impl AsRef<Submitter>,
        properties: TextureProperties,
        data: &[u8],
    ) -> Self {
        Self::spawn(
            submitter.as_ref(),
            TextureArgs {
                properties,
                data: Some(data.to_vec()),
            },
        )
    }

    /// Queues a bind of the texture to sampler `slot`.
    pub fn bind_slot(&self, slot: u32) {
        self.submitter().push(BindTexture { id: self.id(), slot });
    }
}
