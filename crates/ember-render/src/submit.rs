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

//! The application-side entry point into the command queue.

use crate::command::{Command, ExecutionPolicy, Release};
use crate::queue::CommandQueue;
use crate::resource::{IdAllocator, RenderResource, ResourceHandle, ResourceId};
use crate::stats::{RenderStats, RendererStats};
use crate::worker::WorkerState;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// State shared by the renderer facade, every submitter clone and the render thread.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) queue: CommandQueue,
    ids: Mutex<IdAllocator>,
    pub(crate) stats: RenderStats,
    pub(crate) policy: ExecutionPolicy,
    state: AtomicU8,
}

impl Shared {
    pub(crate) fn new(policy: ExecutionPolicy) -> Self {
        Self {
            queue: CommandQueue::new(),
            ids: Mutex::new(IdAllocator::default()),
            stats: RenderStats::default(),
            policy,
            state: AtomicU8::new(WorkerState::Uninitialized as u8),
        }
    }

    pub(crate) fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn set_state(&self, state: WorkerState) {
        let previous = WorkerState::from_u8(self.state.swap(state as u8, Ordering::AcqRel));
        if previous != state {
            log::debug!("Render worker: {previous:?} -> {state:?}");
        }
    }
}

/// A cheap, cloneable sender of commands to the render thread.
///
/// Every [`Proxy`](crate::Proxy) and [`ResourceHandle`] carries one, so resources can
/// enqueue work (and their own release) without access to the [`Renderer`](crate::Renderer).
#[derive(Debug, Clone)]
pub struct Submitter {
    shared: Arc<Shared>,
}

impl Submitter {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Queues a command behind everything submitted so far.
    ///
    /// Commands submitted after the render thread stopped are logged and dropped.
    pub fn push<C: Command>(&self, command: C) {
        self.push_boxed(Box::new(command));
    }

    /// Queues an already boxed command.
    pub fn push_boxed(&self, command: Box<dyn Command>) {
        if let Err(rejected) = self.try_push(command) {
            log::warn!("Renderer is shut down, dropping {rejected:?}");
            drop(rejected);
        }
    }

    fn try_push(&self, command: Box<dyn Command>) -> Result<(), Box<dyn Command>> {
        if self.shared.policy.trace_commands {
            log::trace!("Queued {command:?}");
        }
        match self.shared.queue.push(command) {
            Ok(()) => {
                self.shared.stats.command_submitted();
                Ok(())
            }
            Err(rejected) => {
                self.shared.stats.command_rejected();
                Err(rejected)
            }
        }
    }

    /// Reserves an empty container slot and returns the first handle to it.
    pub(crate) fn allocate<T: RenderResource>(&self) -> ResourceHandle<T> {
        let id = self
            .shared
            .ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .allocate();
        ResourceHandle::new(id, self.clone())
    }

    /// Queues the release of a container whose last handle was dropped, then recycles
    /// its id. The id is freed only once the release is in the queue, so a `Create`
    /// reusing the slot is always ordered after it.
    pub(crate) fn release(&self, id: ResourceId, kind: &'static str) {
        match self.try_push(Box::new(Release::new(id, kind))) {
            Ok(()) => self.shared.stats.release_submitted(),
            // Containers left behind are released by the worker during teardown.
            Err(_) => log::debug!("Renderer is shut down, not queueing release of {kind} {id}"),
        }
        self.shared
            .ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .free(id);
    }

    /// A snapshot of the renderer counters.
    pub fn stats(&self) -> RendererStats {
        self.shared.stats.snapshot()
    }

    /// The queue commands are pushed to.
    pub fn queue(&self) -> &CommandQueue {
        &self.shared.queue
    }

    pub(crate) fn shared(&self) -> &Arc<Shared> {
        &self.shared
    }
}

impl AsRef<Submitter> for Submitter {
    fn as_ref(&self) -> &Submitter {
        self
    }
}
