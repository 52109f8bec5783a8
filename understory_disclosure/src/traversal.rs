// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus traversal inside an open menu.
//!
//! Traversal is split into two steps:
//! - [`MenuMove::from_key`] turns a canonical key (plus Control) into a
//!   navigation intent;
//! - [`next_index`] resolves that intent against the current item list.
//!
//! [`next_target`] chains both and returns the element to focus. Nothing here
//! moves focus; the controller reports the target as an effect.
//!
//! ```
//! use understory_disclosure::traversal::{MenuMove, next_index};
//!
//! let labels = ["Copy", "Cut", "Paste"];
//! let text = |i: usize| labels[i];
//!
//! // Arrow down wraps from the last entry to the first…
//! assert_eq!(next_index(3, Some(2), MenuMove::Next, text), Some(0));
//! // …and a letter jumps to the first entry starting with it.
//! assert_eq!(next_index(3, Some(0), MenuMove::Letter('p'), text), Some(2));
//! ```

use crate::key::Key;
use crate::tree::ElementTree;

/// Navigation intent within a menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MenuMove {
    /// Previous entry, wrapping to the last.
    Prev,
    /// Next entry, wrapping to the first.
    Next,
    /// First entry.
    First,
    /// Last entry.
    Last,
    /// First entry whose text starts with this character (case-insensitive).
    Letter(char),
}

impl MenuMove {
    /// Derive an intent from a canonical key.
    ///
    /// Priority: ArrowUp / Ctrl+P, ArrowDown / Ctrl+N, Home, End, then any
    /// single ASCII letter or digit. Other keys yield `None`.
    pub fn from_key(key: &Key, ctrl: bool) -> Option<Self> {
        match key {
            Key::ArrowUp => Some(Self::Prev),
            Key::Character('p' | 'P') if ctrl => Some(Self::Prev),
            Key::ArrowDown => Some(Self::Next),
            Key::Character('n' | 'N') if ctrl => Some(Self::Next),
            Key::Home => Some(Self::First),
            Key::End => Some(Self::Last),
            Key::Character(c) if c.is_ascii_alphanumeric() => Some(Self::Letter(*c)),
            _ => None,
        }
    }
}

/// Resolve `mv` against `len` entries.
///
/// `current` is the index of the focused entry, or `None` when focus is not
/// on an entry. From outside the list, `Next` lands on the first entry and
/// `Prev` on the last. `text` returns the visible text of an entry.
pub fn next_index<'a>(
    len: usize,
    current: Option<usize>,
    mv: MenuMove,
    text: impl Fn(usize) -> &'a str,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let last = len - 1;
    match mv {
        MenuMove::Prev => Some(match current {
            Some(i) if i > 0 && i <= last => i - 1,
            _ => last,
        }),
        MenuMove::Next => Some(match current {
            Some(i) if i < last => i + 1,
            _ => 0,
        }),
        MenuMove::First => Some(0),
        MenuMove::Last => Some(last),
        MenuMove::Letter(c) => (0..len).find(|&i| {
            text(i)
                .chars()
                .next()
                .is_some_and(|first| first.to_lowercase().eq(c.to_lowercase()))
        }),
    }
}

/// Element to focus after `key` is pressed on `items[current]`.
///
/// Returns `None` for an empty list, for keys that do not navigate, and for
/// letter searches without a match.
pub fn next_target<K, T>(
    tree: &T,
    items: &[K],
    current: Option<usize>,
    key: &Key,
    ctrl: bool,
) -> Option<K>
where
    K: Copy,
    T: ElementTree<K> + ?Sized,
{
    let mv = MenuMove::from_key(key, ctrl)?;
    next_index(items.len(), current, mv, |i| tree.text(items[i])).map(|i| items[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{ElementSpec, NodeTree};
    use alloc::vec::Vec;

    const LABELS: [&str; 4] = ["Alpha", "bravo", "Beta", "9 lives"];

    fn text(i: usize) -> &'static str {
        LABELS[i]
    }

    #[test]
    fn wrap_invariant_holds_for_all_lengths() {
        for len in 1..6 {
            assert_eq!(next_index(len, Some(len - 1), MenuMove::Next, |_| ""), Some(0));
            assert_eq!(next_index(len, Some(0), MenuMove::Prev, |_| ""), Some(len - 1));
        }
    }

    #[test]
    fn steps_within_bounds() {
        assert_eq!(next_index(4, Some(1), MenuMove::Next, text), Some(2));
        assert_eq!(next_index(4, Some(2), MenuMove::Prev, text), Some(1));
        assert_eq!(next_index(4, Some(2), MenuMove::First, text), Some(0));
        assert_eq!(next_index(4, Some(0), MenuMove::Last, text), Some(3));
    }

    #[test]
    fn outside_the_list_enters_at_the_edges() {
        assert_eq!(next_index(4, None, MenuMove::Next, text), Some(0));
        assert_eq!(next_index(4, None, MenuMove::Prev, text), Some(3));
    }

    #[test]
    fn letter_search_is_case_insensitive_and_starts_at_the_top() {
        assert_eq!(next_index(4, Some(3), MenuMove::Letter('B'), text), Some(1));
        assert_eq!(next_index(4, Some(0), MenuMove::Letter('a'), text), Some(0));
        assert_eq!(next_index(4, Some(0), MenuMove::Letter('9'), text), Some(3));
        assert_eq!(next_index(4, Some(0), MenuMove::Letter('z'), text), None);
    }

    #[test]
    fn empty_list_never_moves() {
        for mv in [
            MenuMove::Prev,
            MenuMove::Next,
            MenuMove::First,
            MenuMove::Last,
            MenuMove::Letter('a'),
        ] {
            assert_eq!(next_index(0, None, mv, |_| ""), None);
        }
    }

    #[test]
    fn keys_map_to_moves() {
        assert_eq!(MenuMove::from_key(&Key::ArrowUp, false), Some(MenuMove::Prev));
        assert_eq!(MenuMove::from_key(&Key::Character('P'), true), Some(MenuMove::Prev));
        assert_eq!(MenuMove::from_key(&Key::Character('n'), true), Some(MenuMove::Next));
        // Without Control, n and p are plain letters.
        assert_eq!(
            MenuMove::from_key(&Key::Character('n'), false),
            Some(MenuMove::Letter('n'))
        );
        assert_eq!(MenuMove::from_key(&Key::Home, false), Some(MenuMove::First));
        assert_eq!(MenuMove::from_key(&Key::End, false), Some(MenuMove::Last));
        assert_eq!(MenuMove::from_key(&Key::Character('-'), false), None);
        assert_eq!(MenuMove::from_key(&Key::Tab, false), None);
    }

    #[test]
    fn two_arrow_downs_from_first_reach_third() {
        let mut tree = NodeTree::new();
        let panel = tree.insert(None, ElementSpec::default());
        let items: Vec<_> = ["A", "B", "C"]
            .iter()
            .map(|t| tree.insert(Some(panel), ElementSpec::item("menuitem", t)))
            .collect();

        let first = next_target(&tree, &items, Some(0), &Key::ArrowDown, false);
        assert_eq!(first, Some(items[1]));
        let pos = items.iter().position(|i| Some(*i) == first);
        let second = next_target(&tree, &items, pos, &Key::ArrowDown, false);
        assert_eq!(second, Some(items[2]));
    }

    #[test]
    fn target_lookup_uses_tree_text() {
        let mut tree = NodeTree::new();
        let panel = tree.insert(None, ElementSpec::default());
        let items: Vec<_> = ["Open", "Save", "Share"]
            .iter()
            .map(|t| tree.insert(Some(panel), ElementSpec::item("menuitem", t)))
            .collect();
        assert_eq!(
            next_target(&tree, &items, Some(0), &Key::Character('s'), false),
            Some(items[1])
        );
        assert_eq!(
            next_target(&tree, &items, Some(0), &Key::Character('x'), false),
            None
        );
        assert_eq!(
            next_target(&tree, &[], None, &Key::ArrowDown, false),
            None::<crate::tree::NodeId>
        );
    }
}
