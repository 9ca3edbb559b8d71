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

//! Application-side, reference-counted handles to render-thread containers.

use super::{RenderResource, ResourceId};
use crate::submit::Submitter;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Hands out [`ResourceId`]s and recycles their slots once released.
#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    generations: Vec<u32>,
    free: Vec<u32>,
}

impl IdAllocator {
    pub(crate) fn allocate(&mut self) -> ResourceId {
        match self.free.pop() {
            Some(index) => ResourceId {
                index,
                generation: self.generations[index as usize],
            },
            None => {
                self.generations.push(0);
                ResourceId {
                    index: (self.generations.len() - 1) as u32,
                    generation: 0,
                }
            }
        }
    }

    /// Recycles the slot of `id`. Must only be called after the release of `id`
    /// has been queued, so that any reuse is ordered after it.
    pub(crate) fn free(&mut self, id: ResourceId) {
        let generation = &mut self.generations[id.index as usize];
        debug_assert_eq!(*generation, id.generation, "double free of {id}");
        *generation = id.generation.wrapping_add(1);
        self.free.push(id.index);
    }
}

/// The shared state behind every copy of a handle.
///
/// Dropping the last reference queues exactly one release of the container.
struct HandleInner {
    id: ResourceId,
    kind: &'static str,
    submitter: Submitter,
}

impl Drop for HandleInner {
    fn drop(&mut self) {
        log::debug!("Last handle to {} {} dropped", self.kind, self.id);
        self.submitter.release(self.id, self.kind);
    }
}

/// A thread-safe, reference-counted handle to a [`ResourceContainer`](super::ResourceContainer).
///
/// Cloning a handle only increments the reference count. When the last clone is
/// dropped a single `Release` command is queued behind every command already
/// submitted for the container, so no in-flight command can observe it destroyed.
pub struct ResourceHandle<T: RenderResource> {
    inner: Arc<HandleInner>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: RenderResource> ResourceHandle<T> {
    pub(crate) fn new(id: ResourceId, submitter: Submitter) -> Self {
        log::debug!("Allocated {} handle {}", T::KIND, id);
        Self {
            inner: Arc::new(HandleInner {
                id,
                kind: T::KIND,
                submitter,
            }),
            _marker: PhantomData,
        }
    }

    /// The id of the container this handle keeps alive.
    pub fn id(&self) -> ResourceId {
        self.inner.id
    }

    /// Number of live references to the container, including attachments held by
    /// other resources and handles captured by queued commands.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// A kind-less reference keeping the same container alive.
    pub fn erase(&self) -> ErasedHandle {
        ErasedHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    pub(crate) fn submitter(&self) -> &Submitter {
        &self.inner.submitter
    }
}

impl<T: RenderResource> Clone for ResourceHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        }
    }
}

impl<T: RenderResource> PartialEq for ResourceHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: RenderResource> Eq for ResourceHandle<T> {}

impl<T: RenderResource> fmt::Debug for ResourceHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("kind", &T::KIND)
            .field("id", &self.inner.id)
            .field("refs", &self.ref_count())
            .finish()
    }
}

/// A handle whose resource kind has been forgotten.
///
/// Resources that reference other resources (a vertex array and its buffers) store
/// these to keep their dependencies alive.
#[derive(Clone)]
pub struct ErasedHandle {
    inner: Arc<HandleInner>,
}

impl ErasedHandle {
    /// The id of the referenced container.
    pub fn id(&self) -> ResourceId {
        self.inner.id
    }

    /// The kind of the referenced container.
    pub fn kind(&self) -> &'static str {
        self.inner.kind
    }
}

impl fmt::Debug for ErasedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.inner.kind, self.inner.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_recycles_with_new_generation() {
        let mut ids = IdAllocator::default();
        let a = ids.allocate();
        let b = ids.allocate();
        assert_eq!((a.index, a.generation), (0, 0));
        assert_eq!((b.index, b.generation), (1, 0));

        ids.free(a);
        let c = ids.allocate();
        assert_eq!((c.index, c.generation), (0, 1));
        assert_ne!(a, c);

        let d = ids.allocate();
        assert_eq!((d.index, d.generation), (2, 0));
    }
}
