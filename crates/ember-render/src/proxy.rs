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

//! Application-facing resource values.

use crate::command::{Bind, Create, SetData, Unbind};
use crate::resource::{
    Bindable, Creatable, DataSettable, ErasedHandle, RenderResource, ResourceHandle, ResourceId,
};
use crate::submit::Submitter;
use bytemuck::Pod;
use std::fmt;

/// A value standing for one render-thread resource of kind `T`.
///
/// Proxies are plain values: clone, move and store them freely. Every method builds
/// the matching command and queues it; nothing touches the backend synchronously, and
/// there is no read-back. Dropping the last clone queues the release of the resource.
pub struct Proxy<T: RenderResource> {
    handle: ResourceHandle<T>,
}

impl<T: Creatable> Proxy<T> {
    /// Reserves an empty container and queues the `Create` command that fills it.
    pub(crate) fn spawn(submitter: &Submitter, args: T::Args) -> Self {
        let handle = submitter.allocate::<T>();
        submitter.push(Create::<T>::new(handle.id(), args));
        Self { handle }
    }
}

impl<T: RenderResource> Proxy<T> {
    /// The shared handle behind this proxy.
    pub fn handle(&self) -> &ResourceHandle<T> {
        &self.handle
    }

    /// The id of the underlying container.
    pub fn id(&self) -> ResourceId {
        self.handle.id()
    }

    /// Number of live references to the underlying container.
    pub fn ref_count(&self) -> usize {
        self.handle.ref_count()
    }

    pub(crate) fn erase(&self) -> ErasedHandle {
        self.handle.erase()
    }

    pub(crate) fn submitter(&self) -> &Submitter {
        self.handle.submitter()
    }
}

impl<T: Bindable> Proxy<T> {
    /// Queues a `Bind` command.
    pub fn bind(&self) {
        self.submitter().push(Bind::<T>::new(self.id()));
    }

    /// Queues an `Unbind` command.
    pub fn unbind(&self) {
        self.submitter().push(Unbind::<T>::new(self.id()));
    }
}

impl<T: DataSettable> Proxy<T> {
    /// Queues an upload of a snapshot of `data` at the start of the resource.
    pub fn set_data<D: Pod>(&self, data: &[D]) {
        self.set_data_at(0, data);
    }

    /// Queues an upload of a snapshot of `data` at `offset` bytes.
    pub fn set_data_at<D: Pod>(&self, offset: u64, data: &[D]) {
        let bytes = bytemuck::cast_slice::<D, u8>(data).to_vec();
        self.submitter()
            .push(SetData::<T>::new(self.id(), offset, bytes));
    }
}

impl<T: RenderResource> Clone for Proxy<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<T: RenderResource> PartialEq for Proxy<T> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<T: RenderResource> Eq for Proxy<T> {}

impl<T: RenderResource> fmt::Debug for Proxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Proxy").field(&self.handle).finish()
    }
}
