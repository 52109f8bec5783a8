// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference-counted document listener table.
//!
//! Document-level listeners are a process-wide resource. Instead of every open
//! controller installing its own capture-phase listeners, the table keeps one
//! real listener per [`EventKind`] and a subscriber count. A kind's listener is
//! installed when its count goes from zero to one and removed when it returns
//! to zero. Events are then routed to each subscribed instance separately, in
//! subscription order.
//!
//! Every change is also accumulated until the host drains it with
//! [`take_changes`](ListenerRegistry::take_changes). A kind installed and
//! removed again between two drains nets out to nothing.
//!
//! ```
//! use understory_disclosure::listeners::{EventKinds, ListenerRegistry};
//! use understory_disclosure::document::InstanceId;
//!
//! let mut reg = ListenerRegistry::new();
//! let a = InstanceId::from_raw(1).unwrap();
//! let b = InstanceId::from_raw(2).unwrap();
//!
//! assert_eq!(reg.subscribe(a, EventKinds::ALL).installed, EventKinds::ALL);
//! assert!(reg.subscribe(b, EventKinds::ALL).is_empty());
//! assert!(reg.unsubscribe(a).is_empty());
//! assert_eq!(reg.unsubscribe(b).removed, EventKinds::ALL);
//! // Idempotent.
//! assert!(reg.unsubscribe(b).is_empty());
//! // a's subscription came and went; nothing is left for the host to do.
//! assert!(reg.take_changes().is_empty());
//! ```

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::document::InstanceId;
use crate::outside::EventKind;

bitflags::bitflags! {
    /// Set of document event kinds.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventKinds: u8 {
        /// Pointer press / click.
        const CLICK       = 0b0000_0001;
        /// Touch start.
        const TOUCH_START = 0b0000_0010;
        /// Key release.
        const KEY_UP      = 0b0000_0100;
        /// Everything an open controller listens to.
        const ALL = Self::CLICK.bits() | Self::TOUCH_START.bits() | Self::KEY_UP.bits();
    }
}

impl From<EventKind> for EventKinds {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Click => Self::CLICK,
            EventKind::TouchStart => Self::TOUCH_START,
            EventKind::KeyUp => Self::KEY_UP,
        }
    }
}

/// Real listeners the host must install or remove after a table change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListenerChange {
    /// Kinds whose count went from zero to one.
    pub installed: EventKinds,
    /// Kinds whose count returned to zero.
    pub removed: EventKinds,
}

impl ListenerChange {
    /// Whether the host has nothing to do.
    pub fn is_empty(&self) -> bool {
        self.installed.is_empty() && self.removed.is_empty()
    }

    /// Fold a later change into this one.
    ///
    /// A removal cancels a pending install of the same kind and vice versa,
    /// since the host's real listener state is then unchanged.
    pub fn merge(&mut self, later: Self) {
        let reinstalled = later.installed & self.removed;
        self.removed -= reinstalled;
        self.installed |= later.installed - reinstalled;

        let uninstalled = later.removed & self.installed;
        self.installed -= uninstalled;
        self.removed |= later.removed - uninstalled;
    }
}

/// Per-kind subscriber counts plus per-instance subscriptions.
#[derive(Clone, Debug, Default)]
pub struct ListenerRegistry {
    counts: HashMap<EventKind, usize>,
    // Subscription order is dispatch order.
    order: Vec<InstanceId>,
    subscriptions: HashMap<InstanceId, EventKinds>,
    pending: ListenerChange,
}

impl ListenerRegistry {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `instance` to `kinds`.
    ///
    /// Kinds the instance already holds are not counted twice.
    pub fn subscribe(&mut self, instance: InstanceId, kinds: EventKinds) -> ListenerChange {
        let held = self.subscriptions.get(&instance).copied().unwrap_or_default();
        let added = kinds - held;
        let mut change = ListenerChange::default();
        if added.is_empty() {
            return change;
        }
        if held.is_empty() {
            self.order.push(instance);
        }
        self.subscriptions.insert(instance, held | added);
        for kind in EventKind::ALL {
            if added.contains(kind.into()) {
                let count = self.counts.entry(kind).or_insert(0);
                *count += 1;
                if *count == 1 {
                    change.installed |= kind.into();
                }
            }
        }
        if !change.installed.is_empty() {
            tracing::debug!(?instance, installed = ?change.installed, "document listeners installed");
        }
        self.pending.merge(change);
        change
    }

    /// Drop every subscription of `instance`.
    ///
    /// Unsubscribing an instance that holds nothing is a no-op.
    pub fn unsubscribe(&mut self, instance: InstanceId) -> ListenerChange {
        let mut change = ListenerChange::default();
        let Some(held) = self.subscriptions.remove(&instance) else {
            return change;
        };
        self.order.retain(|i| *i != instance);
        for kind in EventKind::ALL {
            if !held.contains(kind.into()) {
                continue;
            }
            if let Some(count) = self.counts.get_mut(&kind) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    self.counts.remove(&kind);
                    change.removed |= kind.into();
                }
            }
        }
        if !change.removed.is_empty() {
            tracing::debug!(?instance, removed = ?change.removed, "document listeners removed");
        }
        self.pending.merge(change);
        change
    }

    /// Net listener changes since the last call.
    ///
    /// The host installs a capture-phase listener for every kind in
    /// `installed` and removes the one for every kind in `removed`.
    pub fn take_changes(&mut self) -> ListenerChange {
        core::mem::take(&mut self.pending)
    }

    /// Whether a real listener for `kind` is currently installed.
    pub fn is_installed(&self, kind: EventKind) -> bool {
        self.counts.contains_key(&kind)
    }

    /// Number of instances subscribed to `kind`.
    pub fn count(&self, kind: EventKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Kinds `instance` is subscribed to.
    pub fn kinds_of(&self, instance: InstanceId) -> EventKinds {
        self.subscriptions.get(&instance).copied().unwrap_or_default()
    }

    /// Instances to notify for `kind`, in subscription order.
    pub fn subscribers(&self, kind: EventKind) -> impl Iterator<Item = InstanceId> + '_ {
        let bit = EventKinds::from(kind);
        self.order
            .iter()
            .copied()
            .filter(move |i| self.kinds_of(*i).contains(bit))
    }
}
