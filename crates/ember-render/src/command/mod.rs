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

//! Deferred units of backend work.
//!
//! A [`Command`] captures an operation and copies of its arguments on the application
//! thread, travels through the [`CommandQueue`](crate::CommandQueue), and is executed
//! exactly once on the render thread against a [`CommandContext`].
//!
//! - [`generic`]: per-resource commands shared by every kind (`Create`, `Bind`, ...).
//! - [`global`]: device-wide state and draw commands.

pub mod generic;
pub mod global;

pub use self::generic::{Bind, Create, SetData, Unbind};
pub use self::global::{
    Clear, DrawIndexed, DrawLines, SetClearColor, SetLineWidth, SetViewport, SwapBuffers,
};

use crate::queue::CommandBatch;
use crate::resource::{RenderResource, ResourceArena, ResourceId};
use crate::stats::RenderStats;
use ember_core::renderer::{GraphicsDevice, ResourceError};
use ember_core::RendererConfig;
use std::fmt;

/// A self-contained unit of deferred backend work.
///
/// Implementations own everything they need: arguments are copied or moved in when the
/// command is built, never borrowed.
pub trait Command: fmt::Debug + Send + 'static {
    /// Runs the command on the render thread.
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>);
}

/// How commands react to failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionPolicy {
    /// Panic the render thread when a `Create` command fails.
    pub trap_on_create_failure: bool,
    /// Trace every executed command.
    pub trace_commands: bool,
}

impl From<&RendererConfig> for ExecutionPolicy {
    fn from(config: &RendererConfig) -> Self {
        Self {
            trap_on_create_failure: config.trap_on_create_failure,
            trace_commands: config.trace_commands,
        }
    }
}

/// Everything a command may touch while executing.
pub struct CommandContext<'a> {
    /// The graphics backend.
    pub device: &'a mut dyn GraphicsDevice,
    /// The containers of every live resource.
    pub resources: &'a mut ResourceArena,
    pub(crate) stats: &'a RenderStats,
    pub(crate) policy: ExecutionPolicy,
}

impl<'a> CommandContext<'a> {
    /// Bundles the render-thread state commands execute against.
    pub fn new(
        device: &'a mut dyn GraphicsDevice,
        resources: &'a mut ResourceArena,
        stats: &'a RenderStats,
        policy: ExecutionPolicy,
    ) -> Self {
        Self {
            device,
            resources,
            stats,
            policy,
        }
    }

    /// Runs `op` against the populated resource of kind `T` at `id`.
    ///
    /// Addressing a container that does not exist, or that holds another kind, breaks
    /// the ownership model and panics. An empty container (its creation failed) is
    /// skipped with a warning. Backend errors are logged: invalid parameters as
    /// warnings, everything else as errors.
    pub fn with_resource<T, R, F>(&mut self, id: ResourceId, operation: &str, op: F) -> Option<R>
    where
        T: RenderResource,
        F: FnOnce(&mut T, &mut dyn GraphicsDevice) -> Result<R, ResourceError>,
    {
        let container = match self.resources.get_mut::<T>(id) {
            Ok(container) => container,
            Err(e) => panic!("{operation} on {} {id}: {e}", T::KIND),
        };
        let Some(resource) = container.get_mut() else {
            log::warn!(
                "Skipping {operation} on {} {id}: the resource was never created",
                T::KIND
            );
            return None;
        };
        match op(resource, &mut *self.device) {
            Ok(value) => Some(value),
            Err(e) => {
                report_failure(operation, T::KIND, id, &e);
                None
            }
        }
    }

    /// Reads the populated resource of kind `T` at `id`, with the same rules as
    /// [`CommandContext::with_resource`].
    pub fn inspect<T, R, F>(&self, id: ResourceId, operation: &str, op: F) -> Option<R>
    where
        T: RenderResource,
        F: FnOnce(&T) -> R,
    {
        let container = match self.resources.get::<T>(id) {
            Ok(container) => container,
            Err(e) => panic!("{operation} on {} {id}: {e}", T::KIND),
        };
        match container.get() {
            Some(resource) => Some(op(resource)),
            None => {
                log::warn!(
                    "Skipping {operation}: {} {id} was never created",
                    T::KIND
                );
                None
            }
        }
    }
}

pub(crate) fn report_failure(operation: &str, kind: &str, id: ResourceId, error: &ResourceError) {
    match error {
        ResourceError::InvalidParameter(msg) => {
            log::warn!("Skipping {operation} on {kind} {id}: {msg}")
        }
        other => log::error!("{operation} on {kind} {id} failed: {other}"),
    }
}

/// Executes a batch in order.
/// ## Returns
/// The number of commands executed.
pub fn execute_batch(batch: CommandBatch, ctx: &mut CommandContext<'_>) -> usize {
    let mut executed = 0;
    for command in batch {
        if ctx.policy.trace_commands {
            log::trace!("Executing {command:?}");
        }
        command.execute(ctx);
        ctx.stats.command_executed();
        executed += 1;
    }
    executed
}

/// Destroys a resource container and its backend object.
///
/// Queued by the last [`ResourceHandle`](crate::ResourceHandle) of a container; it is the
/// only path through which backend resources are destroyed while the renderer runs.
#[derive(Debug)]
pub struct Release {
    id: ResourceId,
    kind: &'static str,
}

impl Release {
    pub(crate) fn new(id: ResourceId, kind: &'static str) -> Self {
        Self { id, kind }
    }
}

impl Command for Release {
    fn execute(self: Box<Self>, ctx: &mut CommandContext<'_>) {
        let container = match ctx.resources.remove(self.id) {
            Ok(container) => container,
            Err(e) => panic!("Release of {} {}: {e}", self.kind, self.id),
        };
        match container.release(&mut *ctx.device) {
            Ok(true) => log::debug!("Released {} {}", self.kind, self.id),
            Ok(false) => log::debug!("Released empty {} container {}", self.kind, self.id),
            Err(e) => log::error!("Destroying {} {} failed: {e}", self.kind, self.id),
        }
        ctx.stats.release_executed();
    }
}

/// Signals the application thread once every command queued before it has executed.
#[derive(Debug)]
pub(crate) struct Fence {
    signal: flume::Sender<()>,
}

impl Fence {
    pub(crate) fn new(signal: flume::Sender<()>) -> Self {
        Self { signal }
    }
}

impl Command for Fence {
    fn execute(self: Box<Self>, _ctx: &mut CommandContext<'_>) {
        // The waiter may have given up already.
        let _ = self.signal.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{Shader, ShaderArgs, VertexBuffer, VertexBufferInit};
    use crate::resource::{Creatable, DataSettable, ResourceContainer};
    use ember_core::renderer::ShaderSource;
    use ember_infra::graphics::HeadlessDevice;

    const ID: ResourceId = ResourceId {
        index: 0,
        generation: 0,
    };

    fn run(
        device: &mut HeadlessDevice,
        arena: &mut ResourceArena,
        stats: &RenderStats,
        policy: ExecutionPolicy,
        commands: Vec<Box<dyn Command>>,
    ) -> usize {
        let mut ctx = CommandContext::new(device, arena, stats, policy);
        execute_batch(commands.into_iter().collect(), &mut ctx)
    }

    #[test]
    fn create_populates_the_container() {
        let mut device = HeadlessDevice::new();
        let mut arena = ResourceArena::new();
        let stats = RenderStats::default();

        let create = Create::<VertexBuffer>::new(ID, VertexBufferInit::Dynamic(16));
        run(&mut device, &mut arena, &stats, ExecutionPolicy::default(), vec![Box::new(create)]);

        let container = arena.get::<VertexBuffer>(ID).unwrap();
        assert!(container.is_populated());
        assert_eq!(container.get().unwrap().size(), 16);
        assert_eq!(device.buffer_count(), 1);
        assert_eq!(stats.snapshot().resources_created, 1);
    }

    #[test]
    fn failed_create_stores_an_empty_container() {
        let mut device = HeadlessDevice::new();
        let mut arena = ResourceArena::new();
        let stats = RenderStats::default();

        // Zero-sized buffers are rejected by the device.
        let create = Create::<VertexBuffer>::new(ID, VertexBufferInit::Dynamic(0));
        let bind = Bind::<VertexBuffer>::new(ID);
        let executed = run(
            &mut device,
            &mut arena,
            &stats,
            ExecutionPolicy::default(),
            vec![Box::new(create), Box::new(bind)],
        );

        assert_eq!(executed, 2);
        assert!(!arena.get::<VertexBuffer>(ID).unwrap().is_populated());
        assert_eq!(stats.snapshot().create_failures, 1);
        assert_eq!(device.buffer_count(), 0);
    }

    #[test]
    #[should_panic(expected = "creation of Shader")]
    fn failed_create_traps_when_asked_to() {
        let mut device = HeadlessDevice::new();
        let mut arena = ResourceArena::new();
        let stats = RenderStats::default();
        let policy = ExecutionPolicy {
            trap_on_create_failure: true,
            trace_commands: false,
        };

        let args = ShaderArgs {
            name: "broken".to_string(),
            source: ShaderSource::Glsl("void VSMain() {\nvoid PSMain() {}".to_string()),
        };
        let create = Create::<Shader>::new(ID, args);
        run(&mut device, &mut arena, &stats, policy, vec![Box::new(create)]);
    }

    #[test]
    fn rejected_create_parameters_never_trap() {
        let mut device = HeadlessDevice::new();
        let mut arena = ResourceArena::new();
        let stats = RenderStats::default();
        let policy = ExecutionPolicy {
            trap_on_create_failure: true,
            trace_commands: false,
        };

        let create = Create::<VertexBuffer>::new(ID, VertexBufferInit::Dynamic(0));
        run(&mut device, &mut arena, &stats, policy, vec![Box::new(create)]);

        assert!(!arena.get::<VertexBuffer>(ID).unwrap().is_populated());
        assert_eq!(stats.snapshot().create_failures, 1);
    }

    #[test]
    #[should_panic(expected = "Bind on VertexBuffer")]
    fn addressing_a_missing_container_panics() {
        let mut device = HeadlessDevice::new();
        let mut arena = ResourceArena::new();
        let stats = RenderStats::default();

        let bind = Bind::<VertexBuffer>::new(ID);
        run(&mut device, &mut arena, &stats, ExecutionPolicy::default(), vec![Box::new(bind)]);
    }

    #[test]
    fn invalid_parameters_are_skipped() {
        let mut device = HeadlessDevice::new();
        let mut arena = ResourceArena::new();
        let stats = RenderStats::default();
        let buffer = VertexBuffer::create(&mut device, VertexBufferInit::Dynamic(8)).unwrap();
        arena.insert(ID, ResourceContainer::populated(buffer)).unwrap();

        let mut ctx =
            CommandContext::new(&mut device, &mut arena, &stats, ExecutionPolicy::default());
        let too_long = ctx.with_resource::<VertexBuffer, _, _>(ID, "SetData", |vb, device| {
            vb.set_data(device, 4, &[0; 8])
        });
        assert!(too_long.is_none());

        let fits = ctx.with_resource::<VertexBuffer, _, _>(ID, "SetData", |vb, device| {
            vb.set_data(device, 4, &[9; 4])
        });
        assert_eq!(fits, Some(()));
        drop(ctx);

        let id = arena.get::<VertexBuffer>(ID).unwrap().get().unwrap().buffer_id();
        assert_eq!(device.buffer_contents(id), Some(&[0, 0, 0, 0, 9, 9, 9, 9][..]));
    }

    #[test]
    fn release_destroys_the_backend_resource() {
        let mut device = HeadlessDevice::new();
        let mut arena = ResourceArena::new();
        let stats = RenderStats::default();
        let buffer = VertexBuffer::create(&mut device, VertexBufferInit::Dynamic(4)).unwrap();
        arena.insert(ID, ResourceContainer::populated(buffer)).unwrap();

        let release = Release::new(ID, "VertexBuffer");
        run(&mut device, &mut arena, &stats, ExecutionPolicy::default(), vec![Box::new(release)]);

        assert!(arena.is_empty());
        assert_eq!(device.buffer_count(), 0);
        assert_eq!(stats.snapshot().releases_executed, 1);
    }

    #[test]
    fn fence_signals_once_executed() {
        let mut device = HeadlessDevice::new();
        let mut arena = ResourceArena::new();
        let stats = RenderStats::default();
        let (signal, done) = flume::bounded(1);

        assert!(done.try_recv().is_err());
        run(
            &mut device,
            &mut arena,
            &stats,
            ExecutionPolicy::default(),
            vec![Box::new(Fence::new(signal))],
        );
        assert!(done.try_recv().is_ok());
    }
}
