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

//! The render thread: device ownership and the drain loop.

use crate::command::{execute_batch, CommandContext, SetClearColor, SetViewport};
use crate::resource::ResourceArena;
use crate::submit::Shared;
use ember_core::math::LinearRgba;
use ember_core::renderer::{GraphicsDevice, RenderError, Viewport};
use ember_core::RendererConfig;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Creates the graphics device. Runs on the render thread, exactly once.
pub type DeviceFactory =
    Box<dyn FnOnce() -> Result<Box<dyn GraphicsDevice>, RenderError> + Send + 'static>;

/// Lifecycle of the render thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WorkerState {
    /// The thread is spawned but the device does not exist yet.
    Uninitialized = 0,
    /// Executing commands as they arrive.
    Running = 1,
    /// Shutdown was requested; executing the remaining backlog.
    Draining = 2,
    /// The loop exited and the device is gone.
    Stopped = 3,
}

impl WorkerState {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => WorkerState::Uninitialized,
            1 => WorkerState::Running,
            2 => WorkerState::Draining,
            _ => WorkerState::Stopped,
        }
    }
}

/// Marks the worker stopped and closes the queue however the thread exits.
struct StopGuard<'a> {
    shared: &'a Shared,
}

impl Drop for StopGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            log::error!("Render thread panicked, discarding pending commands");
            // Dropped here, outside the queue lock.
            drop(self.shared.queue.close());
        }
        self.shared.set_state(WorkerState::Stopped);
    }
}

/// The loop owning the render thread.
pub(crate) struct RenderWorker {
    shared: Arc<Shared>,
    idle_wait: Duration,
    clear_color: Option<LinearRgba>,
    viewport: Option<Viewport>,
}

impl RenderWorker {
    pub(crate) fn new(shared: Arc<Shared>, config: &RendererConfig) -> Self {
        Self {
            shared,
            idle_wait: config.idle_wait(),
            clear_color: config.clear_color,
            viewport: config.viewport,
        }
    }

    /// Creates the device, reports the outcome on `ready`, then executes commands until
    /// a shutdown is requested and the queue is empty.
    pub(crate) fn run(
        self,
        factory: DeviceFactory,
        ready: flume::Sender<Result<(), RenderError>>,
    ) {
        let shared = &*self.shared;
        let _guard = StopGuard { shared };

        let mut device = match factory() {
            Ok(device) => device,
            Err(e) => {
                log::error!("Failed to create the graphics device: {e}");
                drop(shared.queue.close());
                let _ = ready.send(Err(e));
                return;
            }
        };
        log::debug!("Graphics device ready: {device:?}");

        let mut arena = ResourceArena::new();
        shared.set_state(WorkerState::Running);
        {
            let mut ctx =
                CommandContext::new(device.as_mut(), &mut arena, &shared.stats, shared.policy);
            let mut initial = crate::queue::CommandBatch::new();
            if let Some(color) = self.clear_color {
                initial.push_back(Box::new(SetClearColor(color)));
            }
            if let Some(viewport) = self.viewport {
                initial.push_back(Box::new(SetViewport(viewport)));
            }
            for command in initial {
                command.execute(&mut ctx);
            }
        }
        // The caller may have stopped waiting; the loop runs regardless.
        let _ = ready.send(Ok(()));

        {
            let mut ctx =
                CommandContext::new(device.as_mut(), &mut arena, &shared.stats, shared.policy);
            loop {
                let shutdown_requested = shared.queue.wait_for_work(self.idle_wait);
                if shutdown_requested {
                    shared.set_state(WorkerState::Draining);
                }
                let executed = shared.queue.drain_all(&mut ctx);
                if shutdown_requested && executed == 0 {
                    break;
                }
            }
            // Anything that slipped in before the queue closed still runs.
            let leftover = shared.queue.close();
            execute_batch(leftover, &mut ctx);
        }

        let remaining = arena.drain();
        if !remaining.is_empty() {
            log::warn!(
                "{} resources still referenced at shutdown, releasing them",
                remaining.len()
            );
        }
        for (id, container) in remaining {
            let kind = container.kind();
            if let Err(e) = container.release(device.as_mut()) {
                log::error!("Destroying {kind} {id} during shutdown failed: {e}");
            }
        }
        drop(device);

        let stats = shared.stats.snapshot();
        log::info!(
            "Render worker stopped: {} commands executed, {} resources created, {} released",
            stats.commands_executed,
            stats.resources_created,
            stats.releases_executed
        );
    }
}
