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

//! The renderer facade owned by the application thread.

use crate::command::{
    Clear, Command, DrawIndexed, DrawLines, ExecutionPolicy, Fence, SetClearColor, SetLineWidth,
    SetViewport, SwapBuffers,
};
use crate::kinds::VertexArrayProxy;
use crate::stats::RendererStats;
use crate::submit::{Shared, Submitter};
use crate::worker::{RenderWorker, WorkerState};
use ember_core::math::LinearRgba;
use ember_core::renderer::{GraphicsDevice, RenderError, Viewport};
use ember_core::RendererConfig;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Owns the render thread and the command queue feeding it.
///
/// Resources are created through the proxy constructors, which take the renderer (or
/// any [`Submitter`] cloned from it). Device-global state and draws are queued through
/// the methods below. Every call returns immediately; use [`Renderer::flush`] to wait
/// until the render thread caught up.
///
/// Dropping the renderer shuts it down: queued commands still execute, then resources
/// still referenced by live proxies are destroyed and the device is dropped.
#[derive(Debug)]
pub struct Renderer {
    submitter: Submitter,
    thread: Option<JoinHandle<()>>,
}

impl Renderer {
    /// Spawns the render thread and creates the graphics device on it with `factory`.
    ///
    /// Blocks until the device exists.
    /// ## Errors
    /// * `RenderError::InitializationFailed` - If `factory` fails or the thread cannot
    ///   be spawned.
    /// * `RenderError::WorkerPanicked` - If the render thread died during initialization.
    pub fn new<F>(config: RendererConfig, factory: F) -> Result<Self, RenderError>
    where
        F: FnOnce() -> Result<Box<dyn GraphicsDevice>, RenderError> + Send + 'static,
    {
        let shared = Arc::new(Shared::new(ExecutionPolicy::from(&config)));
        let worker = RenderWorker::new(Arc::clone(&shared), &config);
        let (ready_tx, ready_rx) = flume::bounded(1);

        let thread = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || worker.run(Box::new(factory), ready_tx))
            .map_err(|e| {
                RenderError::InitializationFailed(format!("cannot spawn the render thread: {e}"))
            })?;

        let outcome = match ready_rx.recv() {
            Ok(Ok(())) => Ok(()),
            Ok(Err(RenderError::InitializationFailed(msg))) => {
                Err(RenderError::InitializationFailed(msg))
            }
            Ok(Err(e)) => Err(RenderError::InitializationFailed(e.to_string())),
            Err(_) => Err(RenderError::WorkerPanicked),
        };
        if let Err(e) = outcome {
            let _ = thread.join();
            return Err(e);
        }

        log::info!("Renderer started on thread '{}'", config.thread_name);
        Ok(Self {
            submitter: Submitter::new(shared),
            thread: Some(thread),
        })
    }

    /// A sender for commands, to hand to code that creates resources.
    pub fn submitter(&self) -> &Submitter {
        &self.submitter
    }

    /// Queues any command.
    pub fn push<C: Command>(&self, command: C) {
        self.submitter.push(command);
    }

    /// Queues a viewport change.
    pub fn set_viewport(&self, viewport: Viewport) {
        self.push(SetViewport(viewport));
    }

    /// Queues a clear color change.
    pub fn set_clear_color(&self, color: LinearRgba) {
        self.push(SetClearColor(color));
    }

    /// Queues a clear of the current render target.
    pub fn clear(&self) {
        self.push(Clear);
    }

    /// Queues the presentation of the frame.
    pub fn swap_buffers(&self) {
        self.push(SwapBuffers);
    }

    /// Queues a line width change.
    pub fn set_line_width(&self, width: f32) {
        self.push(SetLineWidth(width));
    }

    /// Queues an indexed draw of `index_count` indices, or of the whole index buffer
    /// when `None`.
    pub fn draw_indexed(&self, vertex_array: &VertexArrayProxy, index_count: Option<u32>) {
        self.push(DrawIndexed::new(vertex_array.id(), index_count));
    }

    /// Queues a line-list draw of `vertex_count` vertices.
    pub fn draw_lines(&self, vertex_array: &VertexArrayProxy, vertex_count: u32) {
        self.push(DrawLines::new(vertex_array.id(), vertex_count));
    }

    /// Queues a draw of the whole index buffer of `vertex_array`.
    pub fn submit(&self, vertex_array: &VertexArrayProxy) {
        self.draw_indexed(vertex_array, None);
    }

    /// Blocks until every command queued before this call has executed.
    ///
    /// Releases triggered by those commands (a vertex array dropping its buffers) are
    /// queued behind the fence and may still be pending when this returns.
    /// ## Errors
    /// * `RenderError::ShutDown` - If the renderer was shut down.
    /// * `RenderError::WorkerPanicked` - If the render thread died.
    pub fn flush(&self) -> Result<(), RenderError> {
        if self.thread.is_none() {
            return Err(RenderError::ShutDown);
        }
        let (signal, done) = flume::bounded(1);
        self.push(Fence::new(signal));
        // Only a dead render thread drops the fence unsignalled.
        done.recv().map_err(|_| RenderError::WorkerPanicked)
    }

    /// A snapshot of the renderer counters.
    pub fn stats(&self) -> RendererStats {
        self.submitter.stats()
    }

    /// The current lifecycle state of the render thread.
    pub fn worker_state(&self) -> WorkerState {
        self.submitter.shared().state()
    }

    /// Stops the render thread once every queued command has executed.
    ///
    /// Calling it again is a no-op.
    /// ## Errors
    /// * `RenderError::WorkerPanicked` - If the render thread panicked.
    pub fn shutdown(&mut self) -> Result<(), RenderError> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        log::debug!("Shutting down the renderer");
        self.submitter.queue().request_shutdown();
        thread.join().map_err(|_| RenderError::WorkerPanicked)?;
        log::info!("Renderer shut down");
        Ok(())
    }
}

impl AsRef<Submitter> for Renderer {
    fn as_ref(&self) -> &Submitter {
        &self.submitter
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::error!("Renderer shutdown failed: {e}");
        }
    }
}
