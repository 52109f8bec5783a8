// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Disclosure: a headless, `no_std` controller for dropdown menus.
//!
//! ## Overview
//!
//! A disclosure menu is a toggle control plus a panel of entries. This crate
//! owns the behavior between them and nothing else: it does not render,
//! position or animate anything.
//!
//! - The open flag belongs to the owner. The controller only *requests* a
//!   flip through [`Effect::RequestToggle`](crate::reaction::Effect::RequestToggle)
//!   and picks up the new flag from the next [`update`](crate::controller::Disclosure::update).
//! - Handlers return a [`Reaction`](crate::reaction::Reaction): an ordered
//!   list of effects (prevent default, request toggle, focus, click) for the
//!   host to perform. Nothing is dispatched synchronously.
//! - Elements are opaque keys resolved through the host's
//!   [`ElementTree`](crate::tree::ElementTree).
//!   [`NodeTree`](crate::tree::NodeTree) is a small in-memory implementation
//!   for tests and simple hosts.
//!
//! ## Document
//!
//! State that outlives a single controller lives in a
//! [`Document`](crate::document::Document):
//!
//! - [`ListenerRegistry`](crate::listeners::ListenerRegistry): document event
//!   listeners, installed once per event kind and reference-counted across
//!   open controllers. The host drains the resulting install/remove
//!   changes with [`take_listener_changes`](crate::document::Document::take_listener_changes).
//! - [`Scheduler`](crate::schedule::Scheduler): deferred, cancellable tasks
//!   such as "focus the first entry after the panel mounts".
//! - [`Coordination`](crate::context::Coordination): the container, panel
//!   and toggle handles each controller's components registered.
//!
//! ## Keyboard
//!
//! Raw input is normalized by [`key::normalize`] (modern names first, then
//! legacy key codes). On the toggle, Space/Enter/arrows open the menu and
//! focus the first entry on the next tick; Tab moves into an open menu;
//! Escape closes it. On entries, arrows and Ctrl+N/Ctrl+P move with
//! wrap-around, Home/End jump, a letter or digit jumps to the first entry
//! starting with it, Space/Enter click, and Tab/Escape close and return focus
//! to the toggle. See [`traversal`] for the movement rules.
//!
//! ## Outside dismissal
//!
//! While open, a controller listens for capture-phase click, touch-start and
//! key-up events on the whole document. [`outside::classify`] decides where an
//! event landed; only events outside both toggle and panel request a close.
//! Secondary-button clicks and key-ups other than Tab are ignored.
//!
//! ## Rendering helpers
//!
//! [`config::RootProps`] parses the root element's attributes and
//! [`render::render_root`] produces the tag, class tokens and forwarded
//! attributes the host should emit.
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to Kurbo, `tracing` and `thiserror`.
//! - `libm`: floating point support for Kurbo in `no_std` builds.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod context;
pub mod controller;
pub mod document;
pub mod error;
pub mod items;
pub mod key;
pub mod listeners;
pub mod outside;
pub mod reaction;
pub mod render;
pub mod schedule;
pub mod traversal;
pub mod tree;
