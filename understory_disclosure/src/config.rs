// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controller configuration.
//!
//! [`DisclosureConfig`] is a plain struct with public fields and defaults,
//! supplied by the owner on every render. [`RootProps`] reads the same
//! settings from string attributes (as a markup layer or a declarative host
//! would provide them) and separates the attributes the controller consumes
//! from the ones that must be forwarded to the rendered root element.
//!
//! ```
//! use understory_disclosure::config::{Direction, RootProps};
//!
//! let props = RootProps::from_attributes([
//!     ("isOpen", "true"),
//!     ("direction", "left"),
//!     ("a11y", "false"),
//!     ("data-testid", "menu"),
//! ])?;
//!
//! assert!(props.config.is_open);
//! assert!(!props.config.a11y);
//! assert_eq!(props.config.direction, Direction::Start);
//! assert_eq!(
//!     props.forwarded,
//!     vec![(String::from("data-testid"), String::from("menu"))]
//! );
//! # Ok::<(), understory_disclosure::error::ConfigError>(())
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::error::ConfigError;
use crate::items::MenuRole;

/// Placement of the panel relative to the toggle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Above the toggle.
    Up,
    /// Below the toggle.
    #[default]
    Down,
    /// On the inline-start side (`left` is accepted when parsing).
    Start,
    /// On the inline-end side (`right` is accepted when parsing).
    End,
}

impl Direction {
    /// Keyword for this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

impl FromStr for Direction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "start" | "left" => Ok(Self::Start),
            "end" | "right" => Ok(Self::End),
            other => Err(ConfigError::UnknownDirection(other.into())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings recognized by the controller.
///
/// `is_open` belongs to the owner: the controller reads it and asks for
/// changes through [`Effect::RequestToggle`](crate::reaction::Effect::RequestToggle),
/// but never writes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisclosureConfig {
    /// Intercept Tab on the toggle and entries. When false, native tab order
    /// is left alone.
    pub a11y: bool,
    /// Suppress all key handling and toggle requests.
    pub disabled: bool,
    /// Requested panel placement.
    pub direction: Direction,
    /// Flip a `Down` direction to `Up`.
    pub dropup: bool,
    /// Whether the panel is shown.
    pub is_open: bool,
    /// Role of the panel; selects the entry role.
    pub menu_role: MenuRole,
    /// Derive the active state from the panel's immediate children.
    pub set_active_from_child: bool,
    /// Render as a navigation item.
    pub nav: bool,
    /// The menu lives inside a navigation bar.
    pub in_navbar: bool,
    /// Render as a button group rather than a plain dropdown.
    pub group: bool,
    /// Mark a navigation item active.
    pub active: bool,
    /// Button group size suffix (for example `lg` or `sm`).
    pub size: Option<String>,
}

impl Default for DisclosureConfig {
    fn default() -> Self {
        Self {
            a11y: true,
            disabled: false,
            direction: Direction::Down,
            dropup: false,
            is_open: false,
            menu_role: MenuRole::Menu,
            set_active_from_child: false,
            nav: false,
            in_navbar: false,
            group: false,
            active: false,
            size: None,
        }
    }
}

impl DisclosureConfig {
    /// Direction after applying [`dropup`](Self::dropup).
    pub fn effective_direction(&self) -> Direction {
        if self.dropup && self.direction == Direction::Down {
            Direction::Up
        } else {
            self.direction
        }
    }
}

/// Root element settings read from string attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RootProps {
    /// Controller settings.
    pub config: DisclosureConfig,
    /// Caller-supplied class tokens, prepended to the computed ones.
    pub class_name: Option<String>,
    /// Explicit root tag.
    pub tag: Option<String>,
    /// Render without a wrapper because the menu sits inside an input group.
    pub in_input_group: bool,
    /// Attributes the controller does not recognize, in input order.
    pub forwarded: Vec<(String, String)>,
}

impl RootProps {
    /// Split `attrs` into controller settings and forwarded attributes.
    ///
    /// Controller-only attributes (`toggle`, `disabled`, `inNavbar`, `a11y`)
    /// and all other recognized settings are consumed; everything else is
    /// forwarded verbatim. Boolean attributes accept `true`, `false`, or an
    /// empty value meaning `true`.
    pub fn from_attributes<'a>(
        attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, ConfigError> {
        let mut props = Self::default();
        for (name, value) in attrs {
            let config = &mut props.config;
            match name {
                "a11y" => config.a11y = parse_bool(name, value)?,
                "disabled" => config.disabled = parse_bool(name, value)?,
                "direction" => config.direction = value.parse()?,
                "dropup" => config.dropup = parse_bool(name, value)?,
                "isOpen" => config.is_open = parse_bool(name, value)?,
                "menuRole" => config.menu_role = value.parse()?,
                "setActiveFromChild" => config.set_active_from_child = parse_bool(name, value)?,
                "nav" => config.nav = parse_bool(name, value)?,
                "inNavbar" => config.in_navbar = parse_bool(name, value)?,
                "group" => config.group = parse_bool(name, value)?,
                "active" => config.active = parse_bool(name, value)?,
                "size" => config.size = Some(value.to_string()).filter(|s| !s.is_empty()),
                "className" => props.class_name = Some(value.to_string()),
                "tag" => props.tag = Some(value.to_string()),
                // The owner's callback; never rendered.
                "toggle" => {}
                _ => props.forwarded.push((name.to_string(), value.to_string())),
            }
        }
        Ok(props)
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "" | "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}
