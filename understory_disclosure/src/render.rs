// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What the controller's root element looks like.
//!
//! The root carries class tokens reflecting open/group/size/direction state
//! and every attribute the controller did not consume. Inside an input group
//! there is no wrapper at all: the children render in place and the host
//! attaches the key handler to each of them.
//!
//! ```
//! use understory_disclosure::config::RootProps;
//! use understory_disclosure::render::{RenderedRoot, render_root};
//!
//! let props = RootProps::from_attributes([
//!     ("isOpen", "true"),
//!     ("direction", "up"),
//!     ("className", "actions"),
//! ])?;
//! let RenderedRoot::Element { tag, class, .. } = render_root(&props, []) else {
//!     unreachable!()
//! };
//! assert_eq!(tag, "div");
//! assert_eq!(class, "actions dropdown dropup show");
//! # Ok::<(), understory_disclosure::error::ConfigError>(())
//! ```

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::config::{Direction, DisclosureConfig, RootProps};

/// Rendered form of the controller's root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderedRoot {
    /// A wrapper element.
    Element {
        /// Tag name.
        tag: String,
        /// Space-separated class tokens.
        class: String,
        /// Forwarded attributes, in input order.
        attributes: Vec<(String, String)>,
    },
    /// No wrapper; children render in place with the key handler attached.
    Inline,
}

/// Class tokens for a root with `config`.
///
/// `children_active` reports, for each immediate panel child, whether it is
/// marked active. It is only consulted when
/// [`set_active_from_child`](DisclosureConfig::set_active_from_child) is set.
pub fn root_classes(
    config: &DisclosureConfig,
    class_name: Option<&str>,
    children_active: impl IntoIterator<Item = bool>,
) -> String {
    let mut tokens: SmallVec<[String; 8]> = SmallVec::new();
    if let Some(extra) = class_name.filter(|c| !c.is_empty()) {
        tokens.push(extra.into());
    }
    let child_active =
        config.set_active_from_child && children_active.into_iter().any(core::convert::identity);
    if (config.nav && config.active) || child_active {
        tokens.push("active".into());
    }
    if config.group {
        tokens.push("btn-group".into());
    } else {
        tokens.push("dropdown".into());
    }
    if let Some(size) = config.size.as_deref() {
        tokens.push(format!("btn-group-{size}"));
    }
    match config.effective_direction() {
        Direction::Up => tokens.push("dropup".into()),
        Direction::Start => tokens.push("dropstart".into()),
        Direction::End => tokens.push("dropend".into()),
        Direction::Down => {}
    }
    if config.is_open {
        tokens.push("show".into());
    }
    if config.nav {
        tokens.push("nav-item".into());
    }
    tokens.join(" ")
}

/// Render the root for `props`.
pub fn render_root(
    props: &RootProps,
    children_active: impl IntoIterator<Item = bool>,
) -> RenderedRoot {
    if props.in_input_group {
        return RenderedRoot::Inline;
    }
    let tag = match props.tag.as_deref() {
        Some(tag) => tag.into(),
        None if props.config.nav => "li".into(),
        None => "div".into(),
    };
    RenderedRoot::Element {
        tag,
        class: root_classes(&props.config, props.class_name.as_deref(), children_active),
        attributes: props.forwarded.clone(),
    }
}
