// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Effects requested by the controller.
//!
//! The controller does not own the element tree, the focus system, or the
//! open flag, so every handler returns a [`Reaction`]: an ordered list of
//! [`Effect`]s for the host to apply. Order matters. For example, closing a
//! menu from an entry yields `RequestToggle` followed by `Focus(toggle)`.
//!
//! ```
//! use understory_disclosure::reaction::{Effect, Reaction};
//!
//! let mut r: Reaction<u32> = Reaction::new();
//! r.push(Effect::PreventDefault);
//! r.push(Effect::Focus(3));
//! assert!(r.default_prevented());
//! assert!(!r.requests_toggle());
//! assert_eq!(r.focus_target(), Some(3));
//! ```

use smallvec::SmallVec;

/// A single side effect for the host to perform.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Effect<K> {
    /// Suppress the host's default action for the triggering event.
    PreventDefault,
    /// Ask the owner to flip the open flag (the owner's `toggle` callback).
    RequestToggle,
    /// Move keyboard focus to the element.
    Focus(K),
    /// Activate the element as if it had been clicked.
    Click(K),
}

/// Ordered effects produced by one handler invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reaction<K> {
    effects: SmallVec<[Effect<K>; 4]>,
}

impl<K> Default for Reaction<K> {
    fn default() -> Self {
        Self {
            effects: SmallVec::new(),
        }
    }
}

impl<K: Copy + PartialEq> Reaction<K> {
    /// An empty reaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an effect.
    pub fn push(&mut self, effect: Effect<K>) {
        self.effects.push(effect);
    }

    /// Append all effects of `other`.
    pub fn extend(&mut self, other: Self) {
        self.effects.extend(other.effects);
    }

    /// The effects, in order.
    pub fn effects(&self) -> &[Effect<K>] {
        &self.effects
    }

    /// Whether nothing needs to happen.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Whether the owner is asked to flip the open flag.
    pub fn requests_toggle(&self) -> bool {
        self.effects.contains(&Effect::RequestToggle)
    }

    /// Number of toggle requests (at most one per handler call).
    pub fn toggle_requests(&self) -> usize {
        self.effects
            .iter()
            .filter(|e| matches!(e, Effect::RequestToggle))
            .count()
    }

    /// Whether the default action should be suppressed.
    pub fn default_prevented(&self) -> bool {
        self.effects.contains(&Effect::PreventDefault)
    }

    /// Element that ends up focused after applying all effects.
    pub fn focus_target(&self) -> Option<K> {
        self.effects.iter().rev().find_map(|e| match e {
            Effect::Focus(k) => Some(*k),
            _ => None,
        })
    }

    /// Element activated by a synthesized click, if any.
    pub fn clicked(&self) -> Option<K> {
        self.effects.iter().find_map(|e| match e {
            Effect::Click(k) => Some(*k),
            _ => None,
        })
    }
}

impl<K> IntoIterator for Reaction<K> {
    type Item = Effect<K>;
    type IntoIter = smallvec::IntoIter<[Effect<K>; 4]>;

    fn into_iter(self) -> Self::IntoIter {
        self.effects.into_iter()
    }
}
