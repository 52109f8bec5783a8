// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context shared with the toggle, panel and entry components.
//!
//! ## Coordination
//!
//! The controller needs to know which elements are its container, panel and
//! toggle, but those elements belong to the rendering tree, not to the
//! controller. Components therefore *register* their element handle with a
//! [`Coordination`] table, keyed by the controller's
//! [`InstanceId`]. The table only stores lookup handles; registering `None`
//! on unmount clears the slot, and the controller drops its whole entry when
//! it unmounts. Clearing never creates an entry, and an entry whose slots are
//! all empty is dropped, so children unmounting after their controller leave
//! nothing behind.
//!
//! ## Context
//!
//! [`DisclosureContext`] is the snapshot a controller hands to its
//! descendants on every render: open flag, effective direction, flags, menu
//! role, and the registration/toggle entry points.
//!
//! ```
//! use understory_disclosure::config::DisclosureConfig;
//! use understory_disclosure::controller::Disclosure;
//! use understory_disclosure::document::Document;
//! use understory_disclosure::reaction::Effect;
//!
//! let mut doc: Document<u32> = Document::new();
//! let menu = Disclosure::mount(&mut doc, DisclosureConfig::default());
//! let ctx = menu.context();
//!
//! ctx.register_toggle(&mut doc, Some(10));
//! ctx.register_panel(&mut doc, Some(20));
//! assert_eq!(doc.coordination.refs(ctx.instance).toggle, Some(10));
//!
//! // A toggle click asks the owner to flip the flag.
//! assert_eq!(ctx.request_toggle::<u32>().effects(), &[Effect::RequestToggle]);
//! assert_eq!(ctx.toggle_aria().has_popup.as_str(), "menu");
//! ```

use hashbrown::HashMap;

use crate::config::{Direction, DisclosureConfig};
use crate::document::{Document, InstanceId};
use crate::items::{ItemRole, MenuRole};
use crate::reaction::{Effect, Reaction};

/// Element handles registered for one controller instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Refs<K> {
    /// Root element rendered by the controller itself.
    pub container: Option<K>,
    /// Root of the panel; may live outside the container (portals).
    pub panel: Option<K>,
    /// The toggle control.
    pub toggle: Option<K>,
}

impl<K> Refs<K> {
    fn is_empty(&self) -> bool {
        self.container.is_none() && self.panel.is_none() && self.toggle.is_none()
    }
}

impl<K> Default for Refs<K> {
    fn default() -> Self {
        Self {
            container: None,
            panel: None,
            toggle: None,
        }
    }
}

/// Which registered element a handle refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The controller's root element.
    Container,
    /// The panel root.
    Panel,
    /// The toggle control.
    Toggle,
}

/// Lookup-only element handles for every live controller instance.
#[derive(Clone, Debug)]
pub struct Coordination<K> {
    slots: HashMap<InstanceId, Refs<K>>,
}

impl<K> Default for Coordination<K> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<K: Copy> Coordination<K> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the latest handle for `slot` of `instance`; `None` clears it.
    pub fn register(&mut self, instance: InstanceId, slot: Slot, node: Option<K>) {
        let refs = match node {
            Some(_) => self.slots.entry(instance).or_default(),
            None => match self.slots.get_mut(&instance) {
                Some(refs) => refs,
                None => return,
            },
        };
        match slot {
            Slot::Container => refs.container = node,
            Slot::Panel => refs.panel = node,
            Slot::Toggle => refs.toggle = node,
        }
        if refs.is_empty() {
            self.slots.remove(&instance);
        }
    }

    /// Handles currently registered for `instance` (all `None` when unknown).
    pub fn refs(&self, instance: InstanceId) -> Refs<K> {
        self.slots.get(&instance).copied().unwrap_or_default()
    }

    /// Forget everything registered for `instance`.
    pub fn release(&mut self, instance: InstanceId) {
        self.slots.remove(&instance);
    }

    /// Whether `instance` has any entry.
    pub fn is_known(&self, instance: InstanceId) -> bool {
        self.slots.contains_key(&instance)
    }
}

/// ARIA state the toggle control should expose.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ToggleAria {
    /// Value of `aria-haspopup`: the menu role.
    pub has_popup: MenuRole,
    /// Value of `aria-expanded`.
    pub expanded: bool,
}

impl ToggleAria {
    /// The state as attribute name/value pairs.
    pub fn attributes(&self) -> [(&'static str, &'static str); 2] {
        [
            ("aria-haspopup", self.has_popup.as_str()),
            ("aria-expanded", if self.expanded { "true" } else { "false" }),
        ]
    }
}

/// Snapshot of controller state handed to descendant components.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DisclosureContext {
    /// Identity of the providing controller.
    pub instance: InstanceId,
    /// Whether the panel is shown.
    pub is_open: bool,
    /// Effective direction (a `Down` menu with `dropup` reads as `Up`).
    pub direction: Direction,
    /// The controller renders as a navigation item.
    pub nav: bool,
    /// The controller lives inside a navigation bar.
    pub in_navbar: bool,
    /// Toggle requests are suppressed.
    pub disabled: bool,
    /// Role of the panel.
    pub menu_role: MenuRole,
}

impl DisclosureContext {
    pub(crate) fn from_config(instance: InstanceId, config: &DisclosureConfig) -> Self {
        Self {
            instance,
            is_open: config.is_open,
            direction: config.effective_direction(),
            nav: config.nav,
            in_navbar: config.in_navbar,
            disabled: config.disabled,
            menu_role: config.menu_role,
        }
    }

    /// Called by the panel on mount with its root, and with `None` on unmount.
    pub fn register_panel<K: Copy>(&self, doc: &mut Document<K>, node: Option<K>) {
        doc.coordination.register(self.instance, Slot::Panel, node);
    }

    /// Called by the toggle on mount with its element, and with `None` on unmount.
    pub fn register_toggle<K: Copy>(&self, doc: &mut Document<K>, node: Option<K>) {
        doc.coordination.register(self.instance, Slot::Toggle, node);
    }

    /// Ask the owner to flip the open flag.
    ///
    /// A disabled controller only prevents the default action.
    pub fn request_toggle<K: Copy + PartialEq>(&self) -> Reaction<K> {
        let mut reaction = Reaction::new();
        if self.disabled {
            reaction.push(Effect::PreventDefault);
        } else {
            tracing::debug!(instance = ?self.instance, "toggle requested");
            reaction.push(Effect::RequestToggle);
        }
        reaction
    }

    /// Role entries of this panel must carry.
    pub fn item_role(&self) -> ItemRole {
        self.menu_role.item_role()
    }

    /// ARIA state for the toggle control.
    pub fn toggle_aria(&self) -> ToggleAria {
        ToggleAria {
            has_popup: self.menu_role,
            expanded: self.is_open,
        }
    }
}
