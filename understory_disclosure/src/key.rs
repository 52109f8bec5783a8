// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key normalization: raw keyboard input to a canonical [`Key`].
//!
//! Hosts deliver keyboard input in two shapes. Modern platforms report a key
//! *name* (`"ArrowDown"`, `"a"`, `" "`), while legacy input paths and some
//! synthetic test harnesses only report a numeric key *code*. [`normalize`]
//! folds both into one [`Key`] so the rest of the crate never has to care.
//!
//! ```
//! use understory_disclosure::key::{Key, normalize};
//!
//! assert_eq!(normalize(Some("ArrowDown"), 0), Key::ArrowDown);
//! assert_eq!(normalize(None, 40), Key::ArrowDown);
//! assert_eq!(normalize(Some("Unidentified"), 65), Key::Character('a'));
//! assert_eq!(normalize(None, 0), Key::Empty);
//! ```

use alloc::string::{String, ToString};
use core::fmt;

bitflags::bitflags! {
    /// Modifier keys held while an event was produced.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Control.
        const CTRL  = 0b0000_0001;
        /// Shift.
        const SHIFT = 0b0000_0010;
        /// Alt / Option.
        const ALT   = 0b0000_0100;
        /// Meta / Command / Windows.
        const META  = 0b0000_1000;
    }
}

/// Canonical key identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Tab.
    Tab,
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// The space bar (reported as `" "` by modern hosts).
    Space,
    /// End.
    End,
    /// Home.
    Home,
    /// Arrow up.
    ArrowUp,
    /// Arrow down.
    ArrowDown,
    /// A single printable character, case preserved.
    Character(char),
    /// Any other named key, verbatim (for example `"F5"` or `"Shift"`).
    Named(String),
    /// Nothing could be resolved from the raw input.
    Empty,
}

/// Sentinel some hosts report when they cannot name a key.
const UNIDENTIFIED: &str = "Unidentified";

impl Key {
    /// Parse a modern key name.
    ///
    /// Names with exactly one character become [`Key::Character`]; unknown
    /// multi-character names are kept as [`Key::Named`]. An empty name yields
    /// [`Key::Empty`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "" => Self::Empty,
            "Tab" => Self::Tab,
            "Enter" => Self::Enter,
            "Escape" => Self::Escape,
            " " => Self::Space,
            "End" => Self::End,
            "Home" => Self::Home,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Named(name.to_string()),
                }
            }
        }
    }

    /// Map a legacy numeric key code.
    ///
    /// Codes in the `48..=90` range that are not part of the fixed table map
    /// to their lowercase character.
    pub fn from_code(code: u32) -> Self {
        match code {
            9 => Self::Tab,
            13 => Self::Enter,
            27 => Self::Escape,
            32 => Self::Space,
            35 => Self::End,
            36 => Self::Home,
            38 => Self::ArrowUp,
            40 => Self::ArrowDown,
            78 => Self::Character('n'),
            80 => Self::Character('p'),
            48..=90 => char::from_u32(code)
                .map(|c| Self::Character(c.to_ascii_lowercase()))
                .unwrap_or(Self::Empty),
            _ => Self::Empty,
        }
    }

    /// Whether this is a single ASCII letter or digit.
    pub fn is_alphanumeric(&self) -> bool {
        matches!(self, Self::Character(c) if c.is_ascii_alphanumeric())
    }

    /// The character carried by [`Key::Character`], if any.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Character(c) => Some(*c),
            _ => None,
        }
    }

    /// Whether a host would scroll, activate or otherwise act on this key by
    /// default while focus sits inside a menu.
    ///
    /// Used to decide when the controller asks the host to prevent the
    /// default action.
    pub fn has_menu_default(&self) -> bool {
        matches!(
            self,
            Self::Space | Self::Enter | Self::ArrowUp | Self::ArrowDown | Self::End | Self::Home
        ) || self.is_alphanumeric()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tab => f.write_str("Tab"),
            Self::Enter => f.write_str("Enter"),
            Self::Escape => f.write_str("Escape"),
            Self::Space => f.write_str(" "),
            Self::End => f.write_str("End"),
            Self::Home => f.write_str("Home"),
            Self::ArrowUp => f.write_str("ArrowUp"),
            Self::ArrowDown => f.write_str("ArrowDown"),
            Self::Character(c) => write!(f, "{c}"),
            Self::Named(name) => f.write_str(name),
            Self::Empty => Ok(()),
        }
    }
}

/// Resolve raw keyboard input to a canonical [`Key`].
///
/// Resolution order:
/// 1. a non-empty `key` name other than `"Unidentified"` is used verbatim;
/// 2. otherwise `code` goes through the legacy table ([`Key::from_code`]);
/// 3. otherwise the result is [`Key::Empty`].
///
/// Never fails. A `code` of `0` means "no code".
pub fn normalize(key: Option<&str>, code: u32) -> Key {
    if let Some(name) = key
        && !name.is_empty()
        && name != UNIDENTIFIED
    {
        return Key::from_name(name);
    }
    if code != 0 {
        return Key::from_code(code);
    }
    Key::Empty
}

/// A key-down event delivered to the toggle or to a menu item.
///
/// Constructed by the host, consumed synchronously by
/// [`Disclosure::handle_key_down`](crate::controller::Disclosure::handle_key_down),
/// then dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardEvent<K> {
    /// Modern key name, if the host supplied one.
    pub key: Option<String>,
    /// Legacy numeric key code, `0` when absent.
    pub key_code: u32,
    /// Element the event was dispatched to.
    pub target: K,
    /// Modifier keys held.
    pub modifiers: Modifiers,
}

impl<K> KeyboardEvent<K> {
    /// Event carrying a modern key name.
    pub fn with_key(target: K, key: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            key_code: 0,
            target,
            modifiers: Modifiers::empty(),
        }
    }

    /// Event carrying only a legacy key code.
    pub fn with_code(target: K, key_code: u32) -> Self {
        Self {
            key: None,
            key_code,
            target,
            modifiers: Modifiers::empty(),
        }
    }

    /// Replace the modifier set.
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Canonical key for this event.
    pub fn normalized(&self) -> Key {
        normalize(self.key.as_deref(), self.key_code)
    }

    /// Whether Control was held.
    pub fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }
}
