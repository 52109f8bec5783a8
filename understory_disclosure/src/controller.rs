// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The disclosure state controller.
//!
//! ## Overview
//!
//! [`Disclosure`] is a *reactive* two-state machine. The owner holds the open
//! flag in [`DisclosureConfig::is_open`] and passes a fresh config on every
//! render through [`Disclosure::update`]; the controller keeps its document
//! listener subscription in step with that flag and otherwise only answers
//! events with a [`Reaction`]. A [`Effect::RequestToggle`] in a reaction is
//! the owner's cue to flip the flag.
//!
//! ## Lifecycle
//!
//! - Closed → Open: subscribe to capture-phase `Click`, `TouchStart` and
//!   `KeyUp` document events.
//! - Open → Closed, and [`unmount`](Disclosure::unmount): unsubscribe. The
//!   listener table makes this idempotent.
//! - The real listeners to install or remove are collected on the document;
//!   the host drains them with [`Document::take_listener_changes`] after
//!   mounting, updating or unmounting.
//! - An unmounted controller ignores further updates.
//! - Unmount also cancels the instance's deferred tasks and drops its
//!   registered element handles.
//!
//! ## Event flow
//!
//! - Document events: the host asks [`Document::subscribers`] which instances
//!   to notify and calls [`handle_document_event`](Disclosure::handle_document_event)
//!   on each.
//! - Key-down events on the toggle or on menu entries go to
//!   [`handle_key_down`](Disclosure::handle_key_down).
//! - Deferred tasks come back from [`Document::tick`] and go to
//!   [`run_task`](Disclosure::run_task).
//!
//! ## Example
//!
//! ```
//! use understory_disclosure::config::DisclosureConfig;
//! use understory_disclosure::controller::Disclosure;
//! use understory_disclosure::document::Document;
//! use understory_disclosure::key::KeyboardEvent;
//! use understory_disclosure::tree::{ElementSpec, NodeTree};
//!
//! let mut tree = NodeTree::new();
//! let container = tree.insert(None, ElementSpec::default());
//! let toggle = tree.insert(Some(container), ElementSpec::default());
//! let panel = tree.insert(Some(container), ElementSpec::default());
//! let first = tree.insert(Some(panel), ElementSpec::item("menuitem", "Copy"));
//!
//! let mut doc = Document::new();
//! let mut config = DisclosureConfig::default();
//! let mut menu = Disclosure::mount(&mut doc, config.clone());
//! menu.attach_container(&mut doc, Some(container));
//! menu.context().register_toggle(&mut doc, Some(toggle));
//! menu.context().register_panel(&mut doc, Some(panel));
//!
//! // Enter on the closed toggle asks the owner to open…
//! let r = menu.handle_key_down(&mut doc, &tree, &KeyboardEvent::with_key(toggle, "Enter"));
//! assert!(r.requests_toggle());
//! config.is_open = true;
//! menu.update(&mut doc, config.clone());
//! assert!(menu.is_listening());
//! assert!(!doc.take_listener_changes().installed.is_empty());
//!
//! // …and focuses the first entry on the next tick.
//! for task in doc.tick() {
//!     let r = menu.run_task(&doc, &tree, &task);
//!     assert_eq!(r.focus_target(), Some(first));
//! }
//! ```

use smallvec::SmallVec;

use crate::config::DisclosureConfig;
use crate::context::{DisclosureContext, Refs, Slot};
use crate::document::{Document, InstanceId};
use crate::items::{ItemRole, locate};
use crate::key::{Key, KeyboardEvent};
use crate::listeners::EventKinds;
use crate::outside::{DocumentEvent, should_dismiss};
use crate::reaction::{Effect, Reaction};
use crate::schedule::{Scheduled, Task};
use crate::traversal::next_target;
use crate::tree::ElementTree;

/// A mounted disclosure-menu controller.
///
/// Not `Clone`: registration state belongs to exactly one value per
/// instance.
#[derive(Debug)]
pub struct Disclosure {
    instance: InstanceId,
    config: DisclosureConfig,
    listening: bool,
    mounted: bool,
}

impl Disclosure {
    /// Mount a controller and bring its listener subscription in line with
    /// `config.is_open`.
    pub fn mount<K: Copy>(doc: &mut Document<K>, config: DisclosureConfig) -> Self {
        let instance = doc.allocate_instance();
        let mut this = Self {
            instance,
            config,
            listening: false,
            mounted: true,
        };
        tracing::debug!(?instance, open = this.config.is_open, "disclosure mounted");
        this.sync_listeners(doc);
        this
    }

    /// Accept a new config from the owner.
    ///
    /// Listener registration only changes when the open flag did. Does
    /// nothing after [`unmount`](Self::unmount).
    pub fn update<K: Copy>(&mut self, doc: &mut Document<K>, config: DisclosureConfig) {
        if !self.mounted {
            return;
        }
        let open_changed = config.is_open != self.config.is_open;
        self.config = config;
        if open_changed {
            self.sync_listeners(doc);
        }
    }

    /// Tear the controller down.
    ///
    /// Unsubscribes from document events, cancels deferred tasks and drops
    /// registered element handles. Calling it again does nothing.
    pub fn unmount<K: Copy>(&mut self, doc: &mut Document<K>) {
        if !self.mounted {
            return;
        }
        self.remove_listeners(doc);
        doc.scheduler.cancel_instance(self.instance);
        doc.coordination.release(self.instance);
        self.mounted = false;
        tracing::debug!(instance = ?self.instance, "disclosure unmounted");
    }

    /// Register (or clear, with `None`) the root element this controller renders.
    pub fn attach_container<K: Copy>(&self, doc: &mut Document<K>, node: Option<K>) {
        if self.mounted {
            doc.coordination.register(self.instance, Slot::Container, node);
        }
    }

    /// Identity of this controller.
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// The config last supplied by the owner.
    pub fn config(&self) -> &DisclosureConfig {
        &self.config
    }

    /// Whether the controller is subscribed to document events.
    ///
    /// Equals `config().is_open` while mounted, and `false` after unmount.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Context for descendant components.
    pub fn context(&self) -> DisclosureContext {
        DisclosureContext::from_config(self.instance, &self.config)
    }

    /// Ask the owner to flip the open flag, unless disabled.
    pub fn request_toggle<K: Copy + PartialEq>(&self) -> Reaction<K> {
        self.context().request_toggle()
    }

    /// Handle a capture-phase document event.
    ///
    /// Events outside the toggle and panel ask the owner to close the menu.
    /// Events reaching a controller that is not listening are ignored.
    pub fn handle_document_event<K, T>(
        &self,
        doc: &Document<K>,
        tree: &T,
        event: &DocumentEvent<K>,
    ) -> Reaction<K>
    where
        K: Copy + Eq,
        T: ElementTree<K> + ?Sized,
    {
        if !self.listening {
            return Reaction::new();
        }
        let refs = doc.coordination.refs(self.instance);
        if should_dismiss(tree, event, &refs) {
            tracing::trace!(instance = ?self.instance, kind = ?event.kind, "outside interaction");
            self.request_toggle()
        } else {
            Reaction::new()
        }
    }

    /// Handle a key-down event on the toggle or on a menu entry.
    pub fn handle_key_down<K, T>(
        &self,
        doc: &mut Document<K>,
        tree: &T,
        event: &KeyboardEvent<K>,
    ) -> Reaction<K>
    where
        K: Copy + Eq,
        T: ElementTree<K> + ?Sized,
    {
        let mut reaction = Reaction::new();
        if !self.mounted {
            return reaction;
        }
        let refs = doc.coordination.refs(self.instance);
        let target = event.target;
        let on_item = ItemRole::is_item_role(tree.role(target));
        let on_toggle = refs.toggle == Some(target);
        let key = event.normalized();
        let is_tab = key == Key::Tab;

        // Native editing wins inside text entry; Tab is only intercepted on
        // our own controls, and only in accessibility mode.
        if tree.kind(target).is_text_entry()
            || (is_tab && !self.config.a11y)
            || (is_tab && !(on_item || on_toggle))
        {
            return reaction;
        }

        if key.has_menu_default() {
            reaction.push(Effect::PreventDefault);
        }
        if self.config.disabled {
            return reaction;
        }
        tracing::trace!(instance = ?self.instance, %key, on_toggle, on_item, "key down");

        let open = self.config.is_open;
        if on_toggle {
            match key {
                Key::Space | Key::Enter | Key::ArrowUp | Key::ArrowDown if !open => {
                    reaction.extend(self.request_toggle());
                    doc.scheduler.schedule(self.instance, Task::FocusFirstItem);
                }
                Key::Tab if open => {
                    // The panel may be portalled, so it is not necessarily
                    // next in the native tab order.
                    reaction.push(Effect::PreventDefault);
                    if let Some(first) = self.items(tree, &refs).first() {
                        reaction.push(Effect::Focus(*first));
                    }
                }
                Key::Escape if open => reaction.extend(self.request_toggle()),
                _ => {}
            }
        }

        if open && on_item {
            match key {
                Key::Tab | Key::Escape => {
                    reaction.extend(self.request_toggle());
                    if let Some(toggle) = refs.toggle {
                        reaction.push(Effect::Focus(toggle));
                    }
                }
                Key::Space | Key::Enter => {
                    reaction.push(Effect::Click(target));
                    if let Some(toggle) = refs.toggle {
                        reaction.push(Effect::Focus(toggle));
                    }
                }
                _ => {
                    let items = self.items(tree, &refs);
                    let current = items.iter().position(|i| *i == target);
                    if let Some(next) = next_target(tree, &items, current, &key, event.ctrl()) {
                        reaction.push(Effect::Focus(next));
                    }
                }
            }
        }
        reaction
    }

    /// Run a deferred task handed back by the scheduler.
    ///
    /// Tasks queued by other instances are ignored, as is everything after
    /// unmount. Focus requests skip entries that are no longer connected.
    pub fn run_task<K, T>(&self, doc: &Document<K>, tree: &T, task: &Scheduled) -> Reaction<K>
    where
        K: Copy + Eq,
        T: ElementTree<K> + ?Sized,
    {
        let mut reaction = Reaction::new();
        if !self.mounted || task.instance != self.instance {
            return reaction;
        }
        match task.task {
            Task::FocusFirstItem => {
                let refs = doc.coordination.refs(self.instance);
                let items = self.items(tree, &refs);
                if let Some(first) = items.first().filter(|k| tree.is_connected(**k)) {
                    reaction.push(Effect::Focus(*first));
                }
            }
        }
        reaction
    }

    fn items<K, T>(&self, tree: &T, refs: &Refs<K>) -> SmallVec<[K; 8]>
    where
        K: Copy,
        T: ElementTree<K> + ?Sized,
    {
        locate(
            tree,
            refs.panel,
            refs.container,
            self.config.menu_role.item_role(),
        )
    }

    fn sync_listeners<K: Copy>(&mut self, doc: &mut Document<K>) {
        if !self.mounted {
            return;
        }
        if self.config.is_open {
            if !self.listening {
                doc.listeners.subscribe(self.instance, EventKinds::ALL);
                self.listening = true;
            }
        } else {
            self.remove_listeners(doc);
        }
    }

    fn remove_listeners<K: Copy>(&mut self, doc: &mut Document<K>) {
        if self.listening {
            doc.listeners.unsubscribe(self.instance);
            self.listening = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::MenuRole;
    use crate::key::Modifiers;
    use crate::outside::{EventKind, PointerButton};
    use crate::tree::{ElementKind, ElementSpec, NodeId, NodeTree};
    use alloc::vec::Vec;

    struct Harness {
        tree: NodeTree,
        doc: Document<NodeId>,
        menu: Disclosure,
        config: DisclosureConfig,
        outside: NodeId,
        container: NodeId,
        toggle: NodeId,
        panel: NodeId,
        items: Vec<NodeId>,
        toggles: usize,
    }

    impl Harness {
        fn new(config: DisclosureConfig, labels: &[&str]) -> Self {
            let role = config.menu_role.item_role().as_str();
            let mut tree = NodeTree::new();
            let outside = tree.insert(None, ElementSpec::default());
            let container = tree.insert(None, ElementSpec::default().class("dropdown"));
            let toggle = tree.insert(Some(container), ElementSpec::default());
            let panel = tree.insert(Some(container), ElementSpec::default());
            let items = labels
                .iter()
                .map(|t| tree.insert(Some(panel), ElementSpec::item(role, t)))
                .collect();

            let mut doc = Document::new();
            let menu = Disclosure::mount(&mut doc, config.clone());
            menu.attach_container(&mut doc, Some(container));
            let ctx = menu.context();
            ctx.register_toggle(&mut doc, Some(toggle));
            ctx.register_panel(&mut doc, Some(panel));
            Self {
                tree,
                doc,
                menu,
                config,
                outside,
                container,
                toggle,
                panel,
                items,
                toggles: 0,
            }
        }

        fn open(labels: &[&str]) -> Self {
            Self::new(
                DisclosureConfig {
                    is_open: true,
                    ..DisclosureConfig::default()
                },
                labels,
            )
        }

        /// Apply a reaction the way an owner would: flip the flag on a
        /// toggle request and hand the new config back.
        fn apply(&mut self, reaction: &Reaction<NodeId>) {
            for _ in 0..reaction.toggle_requests() {
                self.toggles += 1;
                self.config.is_open = !self.config.is_open;
                self.menu.update(&mut self.doc, self.config.clone());
            }
        }

        fn key(&mut self, target: NodeId, key: &str) -> Reaction<NodeId> {
            self.key_event(KeyboardEvent::with_key(target, key))
        }

        fn key_event(&mut self, event: KeyboardEvent<NodeId>) -> Reaction<NodeId> {
            let r = self.menu.handle_key_down(&mut self.doc, &self.tree, &event);
            self.apply(&r);
            r
        }

        fn document(&mut self, event: DocumentEvent<NodeId>) -> Reaction<NodeId> {
            let mut out = Reaction::new();
            for instance in self.doc.subscribers(event.kind) {
                assert_eq!(instance, self.menu.instance());
                out.extend(self.menu.handle_document_event(&self.doc, &self.tree, &event));
            }
            self.apply(&out);
            out
        }

        fn tick(&mut self) -> Reaction<NodeId> {
            let mut out = Reaction::new();
            for task in self.doc.tick() {
                out.extend(self.menu.run_task(&self.doc, &self.tree, &task));
            }
            out
        }
    }

    #[test]
    fn listener_registration_tracks_open_flag() {
        let mut h = Harness::new(DisclosureConfig::default(), &["A"]);
        assert!(!h.menu.is_listening());
        assert!(!h.doc.listeners.is_installed(EventKind::Click));

        h.config.is_open = true;
        h.menu.update(&mut h.doc, h.config.clone());
        assert!(h.menu.is_listening());
        for kind in EventKind::ALL {
            assert!(h.doc.listeners.is_installed(kind));
        }

        // Re-rendering with the same flag changes nothing.
        h.menu.update(&mut h.doc, h.config.clone());
        assert_eq!(h.doc.listeners.count(EventKind::Click), 1);

        h.config.is_open = false;
        h.menu.update(&mut h.doc, h.config.clone());
        assert!(!h.menu.is_listening());
        assert!(!h.doc.listeners.is_installed(EventKind::KeyUp));
    }

    #[test]
    fn listener_changes_reach_the_host() {
        let mut h = Harness::new(DisclosureConfig::default(), &["A"]);
        assert!(h.doc.take_listener_changes().is_empty());

        h.key(h.toggle, "Enter");
        let change = h.doc.take_listener_changes();
        assert_eq!(change.installed, EventKinds::ALL);
        assert!(change.removed.is_empty());

        h.key(h.toggle, "Escape");
        let change = h.doc.take_listener_changes();
        assert_eq!(change.removed, EventKinds::ALL);
        assert!(change.installed.is_empty());
    }

    #[test]
    fn unmounting_an_open_menu_removes_real_listeners() {
        let mut h = Harness::open(&["A"]);
        assert_eq!(h.doc.take_listener_changes().installed, EventKinds::ALL);
        h.menu.unmount(&mut h.doc);
        assert_eq!(h.doc.take_listener_changes().removed, EventKinds::ALL);
        h.menu.unmount(&mut h.doc);
        assert!(h.doc.take_listener_changes().is_empty());
    }

    #[test]
    fn updates_after_unmount_are_ignored() {
        let mut h = Harness::new(DisclosureConfig::default(), &["A"]);
        h.menu.unmount(&mut h.doc);
        h.config.is_open = true;
        h.menu.update(&mut h.doc, h.config.clone());
        assert!(!h.menu.is_listening());
        assert!(!h.doc.listeners.is_installed(EventKind::Click));
        assert!(h.doc.take_listener_changes().is_empty());
        assert!(!h.menu.config().is_open);
    }

    #[test]
    fn late_child_unregistration_does_not_revive_the_instance() {
        let mut h = Harness::open(&["A"]);
        let ctx = h.menu.context();
        h.menu.unmount(&mut h.doc);
        ctx.register_toggle(&mut h.doc, None);
        ctx.register_panel(&mut h.doc, None);
        h.menu.attach_container(&mut h.doc, None);
        assert!(!h.doc.coordination.is_known(h.menu.instance()));
    }

    #[test]
    fn unmount_removes_listeners_tasks_and_refs_once() {
        let mut h = Harness::new(DisclosureConfig::default(), &["A"]);
        let r = h.key(h.toggle, "ArrowDown");
        assert!(r.requests_toggle());
        assert_eq!(h.doc.scheduler.pending_for(h.menu.instance()), 1);

        h.menu.unmount(&mut h.doc);
        h.menu.unmount(&mut h.doc);
        assert!(!h.menu.is_listening());
        assert!(!h.doc.listeners.is_installed(EventKind::Click));
        assert_eq!(h.doc.scheduler.pending_for(h.menu.instance()), 0);
        assert!(!h.doc.coordination.is_known(h.menu.instance()));
        assert!(h.tick().is_empty());
    }

    #[test]
    fn enter_on_closed_toggle_opens_then_focuses_first_item() {
        let mut h = Harness::new(DisclosureConfig::default(), &["A", "B"]);
        let r = h.key(h.toggle, "Enter");
        assert_eq!(r.toggle_requests(), 1);
        assert!(r.default_prevented());
        // Focus is deferred, not immediate.
        assert_eq!(r.focus_target(), None);
        assert!(h.config.is_open);

        let later = h.tick();
        assert_eq!(later.focus_target(), Some(h.items[0]));
        assert_eq!(h.toggles, 1);
    }

    #[test]
    fn legacy_key_codes_drive_the_toggle() {
        let mut h = Harness::new(DisclosureConfig::default(), &["A"]);
        let r = h.key_event(KeyboardEvent::with_code(h.toggle, 38));
        assert!(r.requests_toggle());
        assert_eq!(h.tick().focus_target(), Some(h.items[0]));
    }

    #[test]
    fn opening_keys_on_open_toggle_do_not_toggle() {
        let mut h = Harness::open(&["A"]);
        for key in [" ", "Enter", "ArrowUp", "ArrowDown"] {
            let r = h.key(h.toggle, key);
            assert!(!r.requests_toggle(), "{key:?} should not toggle an open menu");
            assert!(r.default_prevented());
        }
        assert!(h.doc.scheduler.is_idle());
    }

    #[test]
    fn escape_on_toggle_closes_only_when_open() {
        let mut closed = Harness::new(DisclosureConfig::default(), &["A"]);
        assert!(closed.key(closed.toggle, "Escape").is_empty());

        let mut open = Harness::open(&["A"]);
        let r = open.key(open.toggle, "Escape");
        assert_eq!(r.toggle_requests(), 1);
        assert!(!open.config.is_open);
    }

    #[test]
    fn tab_on_open_toggle_moves_into_the_menu() {
        let mut h = Harness::open(&["A", "B"]);
        let r = h.key(h.toggle, "Tab");
        assert_eq!(
            r.effects(),
            &[Effect::PreventDefault, Effect::Focus(h.items[0])]
        );
    }

    #[test]
    fn tab_is_left_alone_without_a11y() {
        let mut h = Harness::new(
            DisclosureConfig {
                is_open: true,
                a11y: false,
                ..DisclosureConfig::default()
            },
            &["A"],
        );
        assert!(h.key(h.toggle, "Tab").is_empty());
        assert!(h.key(h.items[0], "Tab").is_empty());
        assert_eq!(h.toggles, 0);
    }

    #[test]
    fn tab_elsewhere_is_ignored() {
        let mut h = Harness::open(&["A"]);
        assert!(h.key(h.container, "Tab").is_empty());
    }

    #[test]
    fn arrow_down_twice_from_first_lands_on_third() {
        let mut h = Harness::open(&["A", "B", "C"]);
        let r = h.key(h.items[0], "ArrowDown");
        let focused = r.focus_target().unwrap();
        assert_eq!(focused, h.items[1]);
        let r = h.key(focused, "ArrowDown");
        assert_eq!(r.focus_target(), Some(h.items[2]));
    }

    #[test]
    fn arrows_wrap_and_ctrl_letters_navigate() {
        let mut h = Harness::open(&["A", "B", "C"]);
        assert_eq!(h.key(h.items[2], "ArrowDown").focus_target(), Some(h.items[0]));
        assert_eq!(h.key(h.items[0], "ArrowUp").focus_target(), Some(h.items[2]));

        let ctrl_n = KeyboardEvent::with_key(h.items[0], "n").modifiers(Modifiers::CTRL);
        assert_eq!(h.key_event(ctrl_n).focus_target(), Some(h.items[1]));
        let ctrl_p = KeyboardEvent::with_code(h.items[0], 80).modifiers(Modifiers::CTRL);
        assert_eq!(h.key_event(ctrl_p).focus_target(), Some(h.items[2]));
    }

    #[test]
    fn home_end_and_first_letter() {
        let mut h = Harness::open(&["Copy", "Cut", "Paste", "Delete"]);
        assert_eq!(h.key(h.items[2], "Home").focus_target(), Some(h.items[0]));
        assert_eq!(h.key(h.items[0], "End").focus_target(), Some(h.items[3]));
        assert_eq!(h.key(h.items[3], "p").focus_target(), Some(h.items[2]));
        assert_eq!(h.key(h.items[3], "C").focus_target(), Some(h.items[0]));
        let miss = h.key(h.items[3], "z");
        assert_eq!(miss.focus_target(), None);
        assert!(miss.default_prevented());
    }

    #[test]
    fn escape_and_tab_on_item_close_and_return_focus() {
        for key in ["Escape", "Tab"] {
            let mut h = Harness::open(&["A", "B"]);
            let r = h.key(h.items[1], key);
            assert_eq!(
                r.effects(),
                &[Effect::RequestToggle, Effect::Focus(h.toggle)],
                "{key:?}"
            );
            assert!(!h.config.is_open);
        }
    }

    #[test]
    fn space_and_enter_click_the_item() {
        for key in [" ", "Enter"] {
            let mut h = Harness::open(&["A", "B"]);
            let r = h.key(h.items[1], key);
            assert_eq!(
                r.effects(),
                &[
                    Effect::PreventDefault,
                    Effect::Click(h.items[1]),
                    Effect::Focus(h.toggle),
                ]
            );
            assert_eq!(h.toggles, 0);
        }
    }

    #[test]
    fn item_keys_do_nothing_while_closed() {
        let mut h = Harness::new(DisclosureConfig::default(), &["A", "B"]);
        let r = h.key(h.items[0], "ArrowDown");
        assert_eq!(r.effects(), &[Effect::PreventDefault]);
        assert!(h.key(h.items[0], "Escape").is_empty());
    }

    #[test]
    fn text_entry_targets_are_ignored() {
        for kind in [ElementKind::Input, ElementKind::TextArea] {
            let mut h = Harness::open(&["A"]);
            let field = h.tree.insert(Some(h.panel), ElementSpec::of_kind(kind));
            for key in ["ArrowDown", "Escape", "a", " "] {
                assert!(h.key(field, key).is_empty(), "{kind:?} {key:?}");
            }
        }
    }

    #[test]
    fn disabled_only_prevents_defaults() {
        let mut h = Harness::new(
            DisclosureConfig {
                disabled: true,
                ..DisclosureConfig::default()
            },
            &["A"],
        );
        let r = h.key(h.toggle, "ArrowDown");
        assert_eq!(r.effects(), &[Effect::PreventDefault]);
        assert!(h.key(h.toggle, "Escape").is_empty());
        assert!(h.doc.scheduler.is_idle());
        assert_eq!(h.toggles, 0);
    }

    #[test]
    fn disabled_open_menu_does_not_dismiss() {
        let mut h = Harness::new(
            DisclosureConfig {
                disabled: true,
                is_open: true,
                ..DisclosureConfig::default()
            },
            &["A"],
        );
        let r = h.document(DocumentEvent::click(h.outside));
        assert!(!r.requests_toggle());
        assert!(r.default_prevented());
    }

    #[test]
    fn keys_without_menu_defaults_are_not_prevented() {
        let mut h = Harness::open(&["A"]);
        assert!(h.key(h.toggle, "F5").is_empty());
        assert!(h.key(h.items[0], "F5").is_empty());
        assert!(h.key(h.items[0], "Shift").is_empty());
        for key in ["ArrowUp", "ArrowDown", "Home", "End", "x", "7"] {
            assert!(h.key(h.items[0], key).default_prevented(), "{key:?}");
        }
        assert_eq!(h.toggles, 0);
    }

    #[test]
    fn outside_click_dismisses_once_and_secondary_click_never() {
        let mut h = Harness::open(&["A"]);
        let secondary = DocumentEvent::click(h.outside).with_button(PointerButton::Secondary);
        assert!(h.document(secondary).is_empty());

        let r = h.document(DocumentEvent::click(h.outside));
        assert_eq!(r.toggle_requests(), 1);
        assert!(!h.config.is_open);
        // Closed: no longer subscribed, so a second click reaches nobody.
        assert!(h.document(DocumentEvent::click(h.outside)).is_empty());
        assert_eq!(h.toggles, 1);
    }

    #[test]
    fn clicks_on_toggle_and_items_are_not_outside() {
        let mut h = Harness::open(&["A"]);
        assert!(h.document(DocumentEvent::click(h.toggle)).is_empty());
        assert!(h.document(DocumentEvent::touch_start(h.items[0])).is_empty());
        assert!(
            h.document(DocumentEvent::key_up(h.outside, Some("Escape"), 0))
                .is_empty()
        );
        assert_eq!(
            h.document(DocumentEvent::key_up(h.outside, Some("Tab"), 0))
                .toggle_requests(),
            1
        );
    }

    #[test]
    fn without_a_toggle_nothing_dismisses() {
        let mut h = Harness::open(&["A"]);
        h.menu.context().register_toggle(&mut h.doc, None);
        assert!(h.document(DocumentEvent::click(h.outside)).is_empty());
    }

    #[test]
    fn items_fall_back_to_container_without_panel() {
        let mut h = Harness::open(&["A", "B"]);
        h.menu.context().register_panel(&mut h.doc, None);
        assert_eq!(h.key(h.toggle, "Tab").focus_target(), Some(h.items[0]));
    }

    #[test]
    fn deferred_focus_skips_detached_panels() {
        let mut h = Harness::new(DisclosureConfig::default(), &["A"]);
        h.key(h.toggle, "Enter");
        h.tree.detach(h.panel);
        assert!(h.tick().is_empty());
    }

    #[test]
    fn empty_menu_focuses_nothing() {
        let mut h = Harness::new(DisclosureConfig::default(), &[]);
        assert!(h.key(h.toggle, "Enter").requests_toggle());
        assert!(h.tick().is_empty());
        assert_eq!(h.key(h.toggle, "Tab").effects(), &[Effect::PreventDefault]);
    }

    #[test]
    fn listbox_menus_navigate_options() {
        let mut h = Harness::new(
            DisclosureConfig {
                is_open: true,
                menu_role: MenuRole::Listbox,
                ..DisclosureConfig::default()
            },
            &["One", "Two"],
        );
        // Entries with the menu role are not part of a listbox.
        let stray = h.tree.insert(Some(h.panel), ElementSpec::item("menuitem", "Alpha"));
        assert_eq!(h.key(h.items[1], "ArrowDown").focus_target(), Some(h.items[0]));
        assert_eq!(h.key(h.items[0], "End").focus_target(), Some(h.items[1]));
        assert_eq!(h.key(h.items[0], "t").focus_target(), Some(h.items[1]));
        assert_eq!(h.key(h.items[0], "a").focus_target(), None);
        assert!(h.tree.is_alive(stray));
        assert_eq!(h.menu.context().toggle_aria().has_popup, MenuRole::Listbox);
    }

    #[test]
    fn tasks_of_other_instances_are_ignored() {
        let mut h = Harness::new(DisclosureConfig::default(), &["A"]);
        let other = Disclosure::mount(&mut h.doc, DisclosureConfig::default());
        other.context().register_toggle(&mut h.doc, Some(h.toggle));
        h.doc
            .scheduler
            .schedule(other.instance(), Task::FocusFirstItem);
        for task in h.doc.tick() {
            assert!(h.menu.run_task(&h.doc, &h.tree, &task).is_empty());
        }
    }

    #[test]
    fn two_open_instances_share_listeners_and_clean_up_independently() {
        let mut h = Harness::open(&["A"]);
        let open = DisclosureConfig {
            is_open: true,
            ..DisclosureConfig::default()
        };
        let mut second = Disclosure::mount(&mut h.doc, open);
        assert_eq!(h.doc.listeners.count(EventKind::Click), 2);
        assert_eq!(
            h.doc.subscribers(EventKind::Click).as_slice(),
            &[h.menu.instance(), second.instance()]
        );

        second.unmount(&mut h.doc);
        assert_eq!(h.doc.listeners.count(EventKind::Click), 1);
        assert!(h.menu.is_listening());
        assert_eq!(h.document(DocumentEvent::click(h.outside)).toggle_requests(), 1);
        assert!(!h.doc.listeners.is_installed(EventKind::Click));
    }
}
