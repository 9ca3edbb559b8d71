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

//! Defines the properties of 2D textures.

/// Largest accepted width or height of a texture, in pixels.
pub const MAX_TEXTURE_SIZE: u32 = 8192;

/// Pixel format of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// One 8-bit channel.
    R8,
    /// Three 8-bit channels.
    Rgb8,
    /// Four 8-bit channels.
    Rgba8,
    /// Four 32-bit float channels.
    Rgba32Float,
}

impl TextureFormat {
    /// Bytes used by one pixel of this format.
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            TextureFormat::R8 => 1,
            TextureFormat::Rgb8 => 3,
            TextureFormat::Rgba8 => 4,
            TextureFormat::Rgba32Float => 16,
        }
    }
}

/// Sampling filter used for minification or magnification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Bilinear filtering.
    Linear,
    /// Nearest-texel sampling.
    Nearest,
}

/// Everything needed to allocate a 2D texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureProperties {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel format.
    pub format: TextureFormat,
    /// Whether a full mip chain is generated after uploads.
    pub generate_mips: bool,
    /// Magnification filter.
    pub mag_filter: FilterMode,
    /// Minification filter.
    pub min_filter: FilterMode,
}

impl TextureProperties {
    /// Size in bytes of a full upload covering the whole texture, or `None` if it
    /// does not fit in a `u64`.
    pub fn byte_size(&self) -> Option<u64> {
        u64::from(self.width)
            .checked_mul(u64::from(self.height))?
            .checked_mul(u64::from(self.format.bytes_per_pixel()))
    }

    /// Returns `true` if both sides are in `1..=MAX_TEXTURE_SIZE`.
    pub fn has_valid_size(&self) -> bool {
        (1..=MAX_TEXTURE_SIZE).contains(&self.width) && (1..=MAX_TEXTURE_SIZE).contains(&self.height)
    }
}

impl Default for TextureProperties {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            format: TextureFormat::Rgba8,
            generate_mips: true,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_size_accounts_for_format() {
        let props = TextureProperties {
            width: 4,
            height: 2,
            format: TextureFormat::Rgba32Float,
            ..Default::default()
        };
        assert_eq!(props.byte_size(), Some(4 * 2 * 16));
        assert_eq!(TextureProperties::default().byte_size(), Some(4));
    }

    #[test]
    fn huge_textures_are_rejected_without_overflowing() {
        let props = TextureProperties {
            width: u32::MAX,
            height: u32::MAX,
            format: TextureFormat::Rgba32Float,
            ..Default::default()
        };
        assert_eq!(props.byte_size(), None);
        assert!(!props.has_valid_size());

        let edge = TextureProperties {
            width: MAX_TEXTURE_SIZE,
            height: MAX_TEXTURE_SIZE,
            ..Default::default()
        };
        assert!(edge.has_valid_size());
        assert!(!TextureProperties {
            width: 0,
            ..Default::default()
        }
        .has_valid_size());
    }
}
