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

//! Render-thread storage for resource containers.

use super::{RenderResource, ResourceId};
use ember_core::renderer::{GraphicsDevice, ResourceError};
use std::any::Any;
use std::fmt;

/// Exclusive owner of one backend resource.
///
/// A container starts empty and is populated by the `Create` command of its kind. If the
/// backend fails to create the resource the container stays empty, and every later
/// command addressing it is skipped with a warning.
pub struct ResourceContainer<T> {
    resource: Option<T>,
}

impl<T> ResourceContainer<T> {
    /// An empty shell, waiting for its resource.
    pub fn empty() -> Self {
        Self { resource: None }
    }

    /// A container holding `resource`.
    pub fn populated(resource: T) -> Self {
        Self {
            resource: Some(resource),
        }
    }

    /// Returns `true` once the backend resource exists.
    pub fn is_populated(&self) -> bool {
        self.resource.is_some()
    }

    /// The backend resource, if creation succeeded.
    pub fn get(&self) -> Option<&T> {
        self.resource.as_ref()
    }

    /// Mutable access to the backend resource, if creation succeeded.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.resource.as_mut()
    }
}

impl<T> fmt::Debug for ResourceContainer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceContainer")
            .field("populated", &self.is_populated())
            .finish()
    }
}

/// Type-erased view of a [`ResourceContainer`] stored in the arena.
pub trait AnyContainer: Any {
    /// The [`RenderResource::KIND`] of the contained resource.
    fn kind(&self) -> &'static str;

    /// Returns `true` once the backend resource exists.
    fn is_populated(&self) -> bool;

    /// Upcast for downcasting to the concrete container.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for downcasting to the concrete container.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Destroys the backend resource, if any.
    ///
    /// ## Returns
    /// `Ok(true)` if a backend resource was destroyed, `Ok(false)` for an empty container.
    fn release(self: Box<Self>, device: &mut dyn GraphicsDevice) -> Result<bool, ResourceError>;
}

impl fmt::Debug for dyn AnyContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceContainer")
            .field("kind", &self.kind())
            .field("populated", &self.is_populated())
            .finish()
    }
}

impl<T: RenderResource> AnyContainer for ResourceContainer<T> {
    fn kind(&self) -> &'static str {
        T::KIND
    }

    fn is_populated(&self) -> bool {
        self.resource.is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn release(self: Box<Self>, device: &mut dyn GraphicsDevice) -> Result<bool, ResourceError> {
        match self.resource {
            Some(resource) => resource.release(device).map(|()| true),
            None => Ok(false),
        }
    }
}

/// Why an arena lookup failed. Every variant is a violation of the ownership model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    /// No container lives at this id: it was never created or was already released.
    Vacant(ResourceId),
    /// The slot holds a newer container than the one the id was issued for.
    Stale {
        /// The id used for the lookup.
        id: ResourceId,
        /// The generation currently stored in the slot.
        current: u32,
    },
    /// The container holds a different kind of resource.
    KindMismatch {
        /// The id used for the lookup.
        id: ResourceId,
        /// The kind the caller asked for.
        expected: &'static str,
        /// The kind actually stored.
        found: &'static str,
    },
    /// A container already lives at this id.
    Occupied(ResourceId),
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaError::Vacant(id) => write!(f, "no resource container at {id}"),
            ArenaError::Stale { id, current } => write!(
                f,
                "stale resource id {id}, slot is at generation {current}"
            ),
            ArenaError::KindMismatch {
                id,
                expected,
                found,
            } => write!(f, "resource {id} is a {found}, expected a {expected}"),
            ArenaError::Occupied(id) => write!(f, "resource container {id} already exists"),
        }
    }
}

impl std::error::Error for ArenaError {}

struct Slot {
    generation: u32,
    container: Option<Box<dyn AnyContainer>>,
}

/// Generation-checked storage of every live [`ResourceContainer`].
///
/// The arena is owned by the render thread. Ids are handed out on the application
/// thread, and the FIFO command order guarantees a slot is released before its index
/// is reused by a later `Create`.
#[derive(Default)]
pub struct ResourceArena {
    slots: Vec<Slot>,
    live: usize,
}

impl ResourceArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live containers.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if no container is alive.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Returns `true` if a container lives at `id`.
    pub fn contains(&self, id: ResourceId) -> bool {
        self.slot(id).is_ok()
    }

    /// Stores a container at `id`.
    pub fn insert<T: RenderResource>(
        &mut self,
        id: ResourceId,
        container: ResourceContainer<T>,
    ) -> Result<(), ArenaError> {
        let index = id.index as usize;
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || Slot {
                generation: 0,
                container: None,
            });
        }
        let slot = &mut self.slots[index];
        if slot.container.is_some() {
            return Err(ArenaError::Occupied(id));
        }
        slot.generation = id.generation;
        slot.container = Some(Box::new(container));
        self.live += 1;
        Ok(())
    }

    /// The container of kind `T` at `id`.
    pub fn get<T: RenderResource>(&self, id: ResourceId) -> Result<&ResourceContainer<T>, ArenaError> {
        let container = self.slot(id)?;
        let found = container.kind();
        container
            .as_any()
            .downcast_ref::<ResourceContainer<T>>()
            .ok_or(ArenaError::KindMismatch {
                id,
                expected: T::KIND,
                found,
            })
    }

    /// The container of kind `T` at `id`, mutably.
    pub fn get_mut<T: RenderResource>(
        &mut self,
        id: ResourceId,
    ) -> Result<&mut ResourceContainer<T>, ArenaError> {
        let container = self.slot_mut(id)?;
        let found = container.kind();
        container
            .as_any_mut()
            .downcast_mut::<ResourceContainer<T>>()
            .ok_or(ArenaError::KindMismatch {
                id,
                expected: T::KIND,
                found,
            })
    }

    /// Takes the container at `id` out of the arena, freeing its slot.
    pub fn remove(&mut self, id: ResourceId) -> Result<Box<dyn AnyContainer>, ArenaError> {
        self.slot_mut(id)?;
        let container = self.slots[id.index as usize]
            .container
            .take()
            .ok_or(ArenaError::Vacant(id))?;
        self.live -= 1;
        Ok(container)
    }

    /// Takes every remaining container out of the arena.
    pub fn drain(&mut self) -> Vec<(ResourceId, Box<dyn AnyContainer>)> {
        self.live = 0;
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.container.take().map(|container| {
                    let id = ResourceId {
                        index: index as u32,
                        generation: slot.generation,
                    };
                    (id, container)
                })
            })
            .collect()
    }

    fn slot(&self, id: ResourceId) -> Result<&(dyn AnyContainer + 'static), ArenaError> {
        let slot = self
            .slots
            .get(id.index as usize)
            .ok_or(ArenaError::Vacant(id))?;
        let current = slot.generation;
        match &slot.container {
            Some(_) if current != id.generation => Err(ArenaError::Stale { id, current }),
            Some(container) => Ok(container.as_ref()),
            None => Err(ArenaError::Vacant(id)),
        }
    }

    fn slot_mut(
        &mut self,
        id: ResourceId,
    ) -> Result<&mut (dyn AnyContainer + 'static), ArenaError> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .ok_or(ArenaError::Vacant(id))?;
        let current = slot.generation;
        match &mut slot.container {
            Some(_) if current != id.generation => Err(ArenaError::Stale { id, current }),
            Some(container) => Ok(container.as_mut()),
            None => Err(ArenaError::Vacant(id)),
        }
    }
}

impl fmt::Debug for ResourceArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceArena")
            .field("slots", &self.slots.len())
            .field("live", &self.live)
            .finish()
    }
}
