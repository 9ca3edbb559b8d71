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

//! Commands shared by every resource kind.

use super::{Command, CommandContext};
use crate::resource::{Bindable, Creatable, DataSettable, ResourceContainer, ResourceId};
use ember_core::renderer::ResourceError;
use std::fmt;
use std::marker::PhantomData;

/// Populates the container at `id` by calling the backend factory of `T`.
///
/// On failure the container is stored empty so that later commands addressing it
/// are skipped instead of crashing.
pub struct Create<T: Creatable> {
    id: ResourceId,
    args: T::Args,
}

impl<T: Creatable> Create<T> {
    pub(crate) fn new(id: ResourceId, args: T::Args) -> Self {
        Self { id, args }
    }
}

impl<T: Creatable> fmt::Debug for Create<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Create")
            .field("kind", &T::KIND)
            .field("id", &self.id)
            .field("args", &self.args)
            .finish()
    }
}

impl<T: Creatable> Command for Create<T> {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        let Create { id, args } = *self;
        let container = match T::create(&mut *ctx.device, args) {
            Ok(resource) => {
                ctx.stats.resource_created();
                log::debug!("Created {} {id}", T::KIND);
                ResourceContainer::populated(resource)
            }
            Err(ResourceError::InvalidParameter(msg)) => {
                ctx.stats.create_failed();
                log::warn!("Skipping creation of {} {id}: {msg}", T::KIND);
                ResourceContainer::<T>::empty()
            }
            Err(e) => {
                ctx.stats.create_failed();
                log::error!("Failed to create {} {id}: {e}", T::KIND);
                if ctx.policy.trap_on_create_failure {
                    panic!("creation of {} {id} failed: {e}", T::KIND);
                }
                ResourceContainer::<T>::empty()
            }
        };
        if let Err(e) = ctx.resources.insert(id, container) {
            panic!("Create {} {id}: {e}", T::KIND);
        }
    }
}

macro_rules! resource_command {
    ($(#[$meta:meta])* $name:ident, $bound:ident) => {
        $(#[$meta])*
        pub struct $name<T: $bound> {
            id: ResourceId,
            _marker: PhantomData<fn() -> T>,
        }

        impl<T: $bound> $name<T> {
            pub(crate) fn new(id: ResourceId) -> Self {
                Self {
                    id,
                    _marker: PhantomData,
                }
            }
        }

        impl<T: $bound> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({} {})", stringify!($name), T::KIND, self.id)
            }
        }
    };
}

resource_command!(
    /// Makes a resource current on the device.
    Bind,
    Bindable
);
resource_command!(
    /// Clears the binding made by [`Bind`].
    Unbind,
    Bindable
);

impl<T: Bindable> Command for Bind<T> {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        ctx.with_resource::<T, _, _>(self.id, "Bind", |resource, device| resource.bind(device));
    }
}

impl<T: Bindable> Command for Unbind<T> {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        ctx.with_resource::<T, _, _>(self.id, "Unbind", |resource, device| {
            resource.unbind(device)
        });
    }
}

/// Uploads a byte snapshot into a resource at a byte offset.
pub struct SetData<T: DataSettable> {
    id: ResourceId,
    offset: u64,
    data: Vec<u8>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DataSettable> SetData<T> {
    pub(crate) fn new(id: ResourceId, offset: u64, data: Vec<u8>) -> Self {
        Self {
            id,
            offset,
            data,
            _marker: PhantomData,
        }
    }
}

impl<T: DataSettable> fmt::Debug for SetData<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetData")
            .field("kind", &T::KIND)
            .field("id", &self.id)
            .field("offset", &self.offset)
            .field("len", &self.data.len())
            .finish()
    }
}

impl<T: DataSettable> Command for SetData<T> {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        let SetData {
            id, offset, data, ..
        } = *self;
        ctx.with_resource::<T, _, _>(id, "SetData", |resource, device| {
            resource.set_data(device, offset, &data)
        });
    }
}
