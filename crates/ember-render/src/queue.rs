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

//! The FIFO mailbox shared by the application thread and the render thread.

use crate::command::{execute_batch, Command, CommandContext};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// An ordered batch of commands taken out of the queue.
pub type CommandBatch = VecDeque<Box<dyn Command>>;

#[derive(Default)]
struct QueueState {
    commands: CommandBatch,
    shutdown_requested: bool,
    closed: bool,
}

/// A mutex-guarded FIFO of pending commands.
///
/// Commands leave the queue in exactly the order they entered it. The lock is held
/// only to move commands in or out; execution always happens outside of it, so a
/// command may itself push new commands (a release triggered while executing, for
/// instance) without deadlocking.
#[derive(Default)]
pub struct CommandQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl CommandQueue {
    /// Creates an empty, open queue.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a command to the tail of the queue.
    ///
    /// ## Errors
    /// Gives the command back if the queue has been closed. The caller must drop it
    /// itself: dropping a command may release handles, which pushes again.
    pub fn push(&self, command: Box<dyn Command>) -> Result<(), Box<dyn Command>> {
        let mut state = self.lock();
        if state.closed {
            return Err(command);
        }
        state.commands.push_back(command);
        drop(state);
        self.available.notify_one();
        Ok(())
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.lock().commands.len()
    }

    /// Returns `true` if no command is queued.
    pub fn is_empty(&self) -> bool {
        self.lock().commands.is_empty()
    }

    /// Moves the whole backlog out of the queue without blocking.
    pub fn take_all(&self) -> CommandBatch {
        std::mem::take(&mut self.lock().commands)
    }

    /// Executes the whole backlog in submission order.
    ///
    /// The backlog is moved out under the lock and executed after releasing it.
    /// The render worker calls this once per wakeup.
    /// ## Returns
    /// The number of commands executed.
    pub fn drain_all(&self, ctx: &mut CommandContext<'_>) -> usize {
        let batch = self.take_all();
        execute_batch(batch, ctx)
    }

    /// Asks the render thread to stop once the queue is empty.
    pub fn request_shutdown(&self) {
        self.lock().shutdown_requested = true;
        self.available.notify_all();
    }

    /// Returns `true` once a shutdown has been requested.
    pub fn is_shutdown_requested(&self) -> bool {
        self.lock().shutdown_requested
    }

    /// Returns `true` once the queue stopped accepting commands.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Blocks until commands are available, a shutdown is requested, or `timeout` elapses.
    /// Returns whether a shutdown has been requested.
    pub(crate) fn wait_for_work(&self, timeout: Duration) -> bool {
        let mut state = self.lock();
        if state.commands.is_empty() && !state.shutdown_requested {
            state = self
                .available
                .wait_timeout_while(state, timeout, |s| {
                    s.commands.is_empty() && !s.shutdown_requested
                })
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        state.shutdown_requested
    }

    /// Stops accepting commands and hands back whatever was still queued.
    pub(crate) fn close(&self) -> CommandBatch {
        let mut state = self.lock();
        state.closed = true;
        state.shutdown_requested = true;
        std::mem::take(&mut state.commands)
    }
}

impl std::fmt::Debug for CommandQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("CommandQueue")
            .field("pending", &state.commands.len())
            .field("shutdown_requested", &state.shutdown_requested)
            .field("closed", &state.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ExecutionPolicy;
    use crate::resource::ResourceArena;
    use crate::stats::RenderStats;
    use ember_infra::graphics::HeadlessDevice;
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[derive(Debug)]
    struct Record {
        tag: usize,
        log: Arc<Mutex<Vec<usize>>>,
    }

    impl Command for Record {
        fn execute(self: Box<Self>, _ctx: &mut CommandContext<'_>) {
            self.log.lock().unwrap().push(self.tag);
        }
    }

    fn record(tag: usize, log: &Arc<Mutex<Vec<usize>>>) -> Box<dyn Command> {
        Box::new(Record {
            tag,
            log: Arc::clone(log),
        })
    }

    #[test]
    fn drain_preserves_push_order() {
        let queue = CommandQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for tag in 0..64 {
            queue.push(record(tag, &log)).unwrap();
        }
        assert_eq!(queue.len(), 64);

        let mut device = HeadlessDevice::new();
        let mut arena = ResourceArena::new();
        let stats = RenderStats::default();
        let mut ctx =
            CommandContext::new(&mut device, &mut arena, &stats, ExecutionPolicy::default());

        assert_eq!(queue.drain_all(&mut ctx), 64);
        assert!(queue.is_empty());
        assert_eq!(*log.lock().unwrap(), (0..64).collect::<Vec<_>>());
        assert_eq!(stats.snapshot().commands_executed, 64);
    }

    #[test]
    fn closed_queue_gives_commands_back() {
        let queue = CommandQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        queue.push(record(1, &log)).unwrap();

        let leftover = queue.close();
        assert_eq!(leftover.len(), 1);
        assert!(queue.is_closed());
        assert!(queue.push(record(2, &log)).is_err());
        assert!(queue.is_empty());
    }

    #[test]
    fn shutdown_request_wakes_a_waiting_consumer() {
        let queue = Arc::new(CommandQueue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.wait_for_work(Duration::from_secs(10)))
        };
        thread::sleep(Duration::from_millis(20));
        queue.request_shutdown();

        assert!(consumer.join().expect("consumer thread"));
        assert!(queue.is_empty());
    }

    #[test]
    fn pushes_from_another_thread_keep_their_order() {
        let queue = Arc::new(CommandQueue::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        let producer = {
            let queue = Arc::clone(&queue);
            let log = Arc::clone(&log);
            thread::spawn(move || {
                for tag in 0..500 {
                    queue.push(record(tag, &log)).unwrap();
                }
            })
        };

        let mut device = HeadlessDevice::new();
        let mut arena = ResourceArena::new();
        let stats = RenderStats::default();
        let mut executed = 0;
        let mut ctx =
            CommandContext::new(&mut device, &mut arena, &stats, ExecutionPolicy::default());
        while executed < 500 {
            queue.wait_for_work(Duration::from_millis(5));
            executed += queue.drain_all(&mut ctx);
        }
        producer.join().expect("producer thread");

        assert_eq!(*log.lock().unwrap(), (0..500).collect::<Vec<_>>());
    }
}
