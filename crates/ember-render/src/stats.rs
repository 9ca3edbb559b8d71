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

//! Counters describing the traffic through the command layer.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live, thread-safe counters updated by the submitting and executing sides.
#[derive(Debug, Default)]
pub struct RenderStats {
    commands_submitted: AtomicU64,
    commands_rejected: AtomicU64,
    commands_executed: AtomicU64,
    resources_created: AtomicU64,
    create_failures: AtomicU64,
    releases_submitted: AtomicU64,
    releases_executed: AtomicU64,
}

/// A point-in-time copy of [`RenderStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererStats {
    /// Commands accepted by the queue.
    pub commands_submitted: u64,
    /// Commands discarded because the queue was already closed.
    pub commands_rejected: u64,
    /// Commands executed by the render thread.
    pub commands_executed: u64,
    /// Resources successfully created by the backend.
    pub resources_created: u64,
    /// `Create` commands whose backend call failed.
    pub create_failures: u64,
    /// `Release` commands queued by dropped handles.
    pub releases_submitted: u64,
    /// `Release` commands executed by the render thread.
    pub releases_executed: u64,
}

impl RendererStats {
    /// Commands queued but not yet executed.
    pub fn pending_commands(&self) -> u64 {
        self.commands_submitted.saturating_sub(self.commands_executed)
    }
}

impl RenderStats {
    /// Takes a snapshot of every counter.
    pub fn snapshot(&self) -> RendererStats {
        RendererStats {
            commands_submitted: self.commands_submitted.load(Ordering::Acquire),
            commands_rejected: self.commands_rejected.load(Ordering::Acquire),
            commands_executed: self.commands_executed.load(Ordering::Acquire),
            resources_created: self.resources_created.load(Ordering::Acquire),
            create_failures: self.create_failures.load(Ordering::Acquire),
            releases_submitted: self.releases_submitted.load(Ordering::Acquire),
            releases_executed: self.releases_executed.load(Ordering::Acquire),
        }
    }

    pub(crate) fn command_submitted(&self) {
        self.commands_submitted.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn command_rejected(&self) {
        self.commands_rejected.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn command_executed(&self) {
        self.commands_executed.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn resource_created(&self) {
        self.resources_created.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn create_failed(&self) {
        self.create_failures.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn release_submitted(&self) {
        self.releases_submitted.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn release_executed(&self) {
        self.releases_executed.fetch_add(1, Ordering::AcqRel);
    }
}
