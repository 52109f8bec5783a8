// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard-driven dropdown: a small host loop around `understory_disclosure`.
//!
//! This example shows how a host:
//! - registers container, toggle and panel handles,
//! - installs and removes real document listeners as the table reports them,
//! - applies the effects of each `Reaction` (toggle requests, focus, clicks),
//! - fans document events out to subscribed controllers,
//! - drains deferred tasks once per tick.
//!
//! Run:
//! - `cargo run -p understory_demos --example disclosure_keyboard`

use kurbo::Point;
use understory_disclosure::config::{DisclosureConfig, RootProps};
use understory_disclosure::controller::Disclosure;
use understory_disclosure::document::Document;
use understory_disclosure::key::KeyboardEvent;
use understory_disclosure::listeners::EventKinds;
use understory_disclosure::outside::DocumentEvent;
use understory_disclosure::reaction::{Effect, Reaction};
use understory_disclosure::render::render_root;
use understory_disclosure::tree::{ElementSpec, ElementTree, NodeId, NodeTree};

struct Host {
    tree: NodeTree,
    doc: Document<NodeId>,
    menu: Disclosure,
    config: DisclosureConfig,
    focused: Option<NodeId>,
    installed: EventKinds,
}

impl Host {
    /// Mirror the listener table onto "real" capture-phase listeners.
    fn sync_listeners(&mut self) {
        let change = self.doc.take_listener_changes();
        if change.is_empty() {
            return;
        }
        self.installed |= change.installed;
        self.installed -= change.removed;
        println!(
            "  listeners: +{:?} -{:?} => {:?}",
            change.installed, change.removed, self.installed
        );
    }

    fn apply(&mut self, label: &str, reaction: Reaction<NodeId>) {
        println!("{label}: {:?}", reaction.effects());
        for effect in reaction {
            match effect {
                Effect::RequestToggle => {
                    self.config.is_open = !self.config.is_open;
                    self.menu.update(&mut self.doc, self.config.clone());
                    println!("  menu is now {}", if self.config.is_open { "open" } else { "closed" });
                    self.sync_listeners();
                }
                Effect::Focus(node) => {
                    self.focused = Some(node);
                    println!("  focus -> {:?}", self.tree.text(node));
                }
                Effect::Click(node) => println!("  activated {:?}", self.tree.text(node)),
                Effect::PreventDefault => {}
            }
        }
    }

    fn key(&mut self, key: &str) {
        let Some(target) = self.focused else {
            return;
        };
        let event = KeyboardEvent::with_key(target, key);
        let reaction = self.menu.handle_key_down(&mut self.doc, &self.tree, &event);
        self.apply(&format!("key {key:?}"), reaction);
    }

    fn document(&mut self, event: DocumentEvent<NodeId>) {
        let mut reaction = Reaction::new();
        for instance in self.doc.subscribers(event.kind) {
            if instance == self.menu.instance() {
                reaction.extend(self.menu.handle_document_event(&self.doc, &self.tree, &event));
            }
        }
        self.apply(&format!("{:?} at {:?}", event.kind, event.position), reaction);
    }

    fn tick(&mut self) {
        for task in self.doc.tick() {
            let reaction = self.menu.run_task(&self.doc, &self.tree, &task);
            self.apply("tick", reaction);
        }
    }
}

fn main() {
    let props = RootProps::from_attributes([("className", "file-menu"), ("id", "file")])
        .expect("valid attributes");
    println!("root: {:?}", render_root(&props, []));

    let mut tree = NodeTree::new();
    let page = tree.insert(None, ElementSpec::default());
    let container = tree.insert(None, ElementSpec::default().class("dropdown"));
    let toggle = tree.insert(Some(container), ElementSpec::item("button", "File"));
    let panel = tree.insert(Some(container), ElementSpec::default());
    for label in ["New", "Open", "Save", "Quit"] {
        tree.insert(Some(panel), ElementSpec::item("menuitem", label));
    }

    let mut doc = Document::new();
    let config = props.config.clone();
    let menu = Disclosure::mount(&mut doc, config.clone());
    menu.attach_container(&mut doc, Some(container));
    let ctx = menu.context();
    ctx.register_toggle(&mut doc, Some(toggle));
    ctx.register_panel(&mut doc, Some(panel));

    let mut host = Host {
        tree,
        doc,
        menu,
        config,
        focused: Some(toggle),
        installed: EventKinds::empty(),
    };
    host.sync_listeners();

    host.key("ArrowDown");
    host.tick();
    host.key("ArrowDown");
    host.key("s");
    host.key("End");
    host.key("Enter");
    host.key("Escape");

    host.focused = Some(toggle);
    host.key("Enter");
    host.tick();
    host.document(DocumentEvent::click(page).at(Point::new(400.0, 300.0)));

    host.menu.unmount(&mut host.doc);
    host.sync_listeners();
}
