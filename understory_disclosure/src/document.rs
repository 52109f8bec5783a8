// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document-wide resources shared by every controller instance.
//!
//! A [`Document`] bundles the three pieces of state that outlive any single
//! controller: the [`ListenerRegistry`], the [`Scheduler`], and the
//! [`Coordination`] table of registered element handles. There is one per
//! host document; controllers borrow it for the duration of each call.

use core::num::NonZeroU64;

use smallvec::SmallVec;

use crate::context::Coordination;
use crate::listeners::{ListenerChange, ListenerRegistry};
use crate::outside::EventKind;
use crate::schedule::{Scheduled, Scheduler};

/// Stable identity of a mounted controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(NonZeroU64);

impl InstanceId {
    /// Wrap a raw non-zero value.
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Raw value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

/// Shared per-document state.
#[derive(Clone, Debug)]
pub struct Document<K> {
    /// Reference-counted document listeners.
    pub listeners: ListenerRegistry,
    /// Deferred tasks.
    pub scheduler: Scheduler,
    /// Registered element handles per instance.
    pub coordination: Coordination<K>,
    last_instance: u64,
}

impl<K> Default for Document<K> {
    fn default() -> Self {
        Self {
            listeners: ListenerRegistry::default(),
            scheduler: Scheduler::default(),
            coordination: Coordination::default(),
            last_instance: 0,
        }
    }
}

impl<K: Copy> Document<K> {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a fresh instance identity. Identities are never reused.
    pub fn allocate_instance(&mut self) -> InstanceId {
        self.last_instance += 1;
        InstanceId(NonZeroU64::MIN.saturating_add(self.last_instance - 1))
    }

    /// Instances to notify for a document event of `kind`, in subscription
    /// order.
    pub fn subscribers(&self, kind: EventKind) -> SmallVec<[InstanceId; 4]> {
        self.listeners.subscribers(kind).collect()
    }

    /// Net document listener changes since the last call; see
    /// [`ListenerRegistry::take_changes`].
    pub fn take_listener_changes(&mut self) -> ListenerChange {
        self.listeners.take_changes()
    }

    /// Run one macrotask turn of the scheduler.
    pub fn tick(&mut self) -> alloc::vec::Vec<Scheduled> {
        self.scheduler.tick()
    }
}
