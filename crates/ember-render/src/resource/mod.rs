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

//! Resource identity and the traits a backend resource kind implements.
//!
//! A resource kind (vertex buffer, shader, ...) is a plain struct holding the backend
//! ids it owns. It lives exclusively on the render thread inside a
//! [`ResourceContainer`], and the application thread refers to it only through a
//! [`ResourceHandle`] carrying its [`ResourceId`].

mod arena;
mod handle;

pub use self::arena::{AnyContainer, ArenaError, ResourceArena, ResourceContainer};
pub use self::handle::{ErasedHandle, ResourceHandle};
pub(crate) use self::handle::IdAllocator;

use ember_core::renderer::{GraphicsDevice, ResourceError};
use std::fmt;

/// Identifies one resource container.
///
/// It combines a slot index with a generation count. The index is recycled once the
/// container has been released, and the generation is incremented, so a stale id can
/// never reach the container that reuses its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId {
    /// The slot in the render thread's [`ResourceArena`].
    pub index: u32,
    /// The generation of the slot this id was issued for.
    pub generation: u32,
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// A backend object owned by a [`ResourceContainer`].
pub trait RenderResource: 'static {
    /// Human readable name of the kind, used in logs and error messages.
    const KIND: &'static str;

    /// Destroys the backend objects this resource owns.
    fn release(self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError>;
}

/// A resource kind that can be built by a `Create` command.
pub trait Creatable: RenderResource + Sized {
    /// The arguments captured by the `Create` command.
    type Args: fmt::Debug + Send + 'static;

    /// Calls the backend factory for this kind.
    fn create(device: &mut dyn GraphicsDevice, args: Self::Args) -> Result<Self, ResourceError>;
}

/// A resource kind with `Bind`/`Unbind` commands.
pub trait Bindable: RenderResource {
    /// Makes the resource current on the device.
    fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError>;

    /// Clears the binding made by [`Bindable::bind`].
    fn unbind(&self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError>;
}

/// A resource kind whose contents can be replaced by a `SetData` command.
pub trait DataSettable: RenderResource {
    /// Uploads `data` at `offset` bytes.
    fn set_data(
        &mut self,
        device: &mut dyn GraphicsDevice,
        offset: u64,
        data: &[u8],
    ) -> Result<(), ResourceError>;
}
