// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cancellable deferred tasks keyed to controller instances.
//!
//! After opening from the keyboard, focusing the first entry has to wait one
//! macrotask turn so the host can mount the panel. The [`Scheduler`] models
//! that turn explicitly: tasks queued now are handed back by the next
//! [`tick`](Scheduler::tick), never synchronously. Each task carries the
//! instance that queued it, and [`cancel_instance`](Scheduler::cancel_instance)
//! drops everything an instance left behind when it is torn down.
//!
//! ```
//! use understory_disclosure::document::InstanceId;
//! use understory_disclosure::schedule::{Scheduler, Task};
//!
//! let mut s = Scheduler::new();
//! let owner = InstanceId::from_raw(1).unwrap();
//! s.schedule(owner, Task::FocusFirstItem);
//! let due = s.tick();
//! assert_eq!(due.len(), 1);
//! assert_eq!(due[0].task, Task::FocusFirstItem);
//! assert!(s.tick().is_empty());
//! ```

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::document::InstanceId;

/// Work a controller can defer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Task {
    /// Focus the first menu entry once the panel is mounted.
    FocusFirstItem,
}

/// Identifier of a queued task.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

/// A queued task.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Scheduled {
    /// Task identifier.
    pub id: TaskId,
    /// Instance that queued the task.
    pub instance: InstanceId,
    /// The task.
    pub task: Task,
}

/// FIFO queue of deferred tasks.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    queue: VecDeque<Scheduled>,
    next_id: u64,
}

impl Scheduler {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` for `instance`; it runs on the next [`tick`](Self::tick).
    pub fn schedule(&mut self, instance: InstanceId, task: Task) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.queue.push_back(Scheduled { id, instance, task });
        tracing::trace!(?instance, ?task, "task scheduled");
        id
    }

    /// Cancel a single task. Returns whether it was still queued.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|s| s.id != id);
        before != self.queue.len()
    }

    /// Cancel every task queued by `instance`. Returns how many were dropped.
    pub fn cancel_instance(&mut self, instance: InstanceId) -> usize {
        let before = self.queue.len();
        self.queue.retain(|s| s.instance != instance);
        let dropped = before - self.queue.len();
        if dropped > 0 {
            tracing::debug!(?instance, dropped, "pending tasks cancelled");
        }
        dropped
    }

    /// Number of queued tasks for `instance`.
    pub fn pending_for(&self, instance: InstanceId) -> usize {
        self.queue.iter().filter(|s| s.instance == instance).count()
    }

    /// Whether nothing is queued.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Run one macrotask turn: take every queued task, in queue order.
    ///
    /// Tasks scheduled while the caller processes the result wait for the
    /// following turn.
    pub fn tick(&mut self) -> Vec<Scheduled> {
        self.queue.drain(..).collect()
    }
}
