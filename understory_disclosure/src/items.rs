// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu item lookup.
//!
//! The item set is a live view, not stored state: panels re-render their
//! children freely, so [`locate`] is called again on every keyboard
//! interaction.

use core::fmt;
use core::str::FromStr;

use smallvec::SmallVec;

use crate::error::ConfigError;
use crate::tree::ElementTree;

/// Accessibility role of the panel as a whole.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MenuRole {
    /// An action menu (`role="menu"`).
    #[default]
    Menu,
    /// A selection list (`role="listbox"`).
    Listbox,
}

impl MenuRole {
    /// Attribute value of this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Listbox => "listbox",
        }
    }

    /// Role carried by the entries of a panel with this role.
    pub fn item_role(self) -> ItemRole {
        match self {
            Self::Menu => ItemRole::MenuItem,
            Self::Listbox => ItemRole::Option,
        }
    }
}

impl FromStr for MenuRole {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "menu" => Ok(Self::Menu),
            "listbox" => Ok(Self::Listbox),
            other => Err(ConfigError::UnknownMenuRole(other.into())),
        }
    }
}

impl fmt::Display for MenuRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accessibility role of a focusable menu entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemRole {
    /// `role="menuitem"`.
    MenuItem,
    /// `role="option"`.
    Option,
}

impl ItemRole {
    /// Attribute value of this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MenuItem => "menuitem",
            Self::Option => "option",
        }
    }

    /// Whether `role` names any menu entry role.
    pub fn is_item_role(role: Option<&str>) -> bool {
        matches!(role, Some("menuitem" | "option"))
    }
}

/// Ordered menu entries under the panel, or under the container when no
/// panel is registered.
///
/// Disabled entries are included; hosts make them unfocusable, and a focus
/// request on them is expected to be a no-op. Returns an empty list when
/// neither root is known.
pub fn locate<K, T>(
    tree: &T,
    panel: Option<K>,
    container: Option<K>,
    role: ItemRole,
) -> SmallVec<[K; 8]>
where
    K: Copy,
    T: ElementTree<K> + ?Sized,
{
    let Some(root) = panel.or(container) else {
        return SmallVec::new();
    };
    let wanted = role.as_str();
    tree.descendants(root)
        .into_iter()
        .filter(|node| tree.role(*node) == Some(wanted))
        .collect()
}
