// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element tree abstraction and a small in-memory implementation.
//!
//! The controller never walks a concrete DOM. It asks an [`ElementTree`] a
//! handful of read-only questions (containment, role, element kind, text,
//! class tokens, document-order descendants). Hosts implement the trait over
//! whatever retained tree they have; [`NodeTree`] is a minimal arena
//! implementation used by tests and demos.
//!
//! ```
//! use understory_disclosure::tree::{ElementKind, ElementSpec, ElementTree, NodeTree};
//!
//! let mut tree = NodeTree::new();
//! let menu = tree.insert(None, ElementSpec::default());
//! let item = tree.insert(Some(menu), ElementSpec::item("menuitem", "Copy"));
//!
//! assert!(tree.contains(menu, item));
//! assert_eq!(tree.role(item), Some("menuitem"));
//! assert_eq!(tree.kind(item), ElementKind::Other);
//! assert_eq!(tree.descendants(menu), vec![item]);
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use smallvec::SmallVec;

/// Coarse element classification relevant to keyboard handling.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A single-line text input.
    Input,
    /// A multi-line text area.
    TextArea,
    /// Anything else.
    #[default]
    Other,
}

impl ElementKind {
    /// Whether native text editing owns keyboard input on this element.
    pub fn is_text_entry(self) -> bool {
        matches!(self, Self::Input | Self::TextArea)
    }
}

/// Read-only view of the host's element tree.
///
/// `K` is a small copyable handle. Handles are lookup-only: holding one does
/// not keep the element alive, and every method must tolerate stale handles
/// (answering `false`, `None`, or empty).
pub trait ElementTree<K: Copy> {
    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: K, node: K) -> bool;

    /// Accessibility role attribute of `node`.
    fn role(&self, node: K) -> Option<&str>;

    /// Element classification of `node`.
    fn kind(&self, node: K) -> ElementKind;

    /// Visible text content of `node` (empty when unknown).
    fn text(&self, node: K) -> &str;

    /// Whether `node` carries the class token `class`.
    fn has_class(&self, node: K, class: &str) -> bool;

    /// All descendants of `root` in document order, excluding `root`.
    fn descendants(&self, root: K) -> Vec<K>;

    /// Whether `node` is still attached to the document.
    fn is_connected(&self, node: K) -> bool {
        let _ = node;
        true
    }
}

/// Identifier for a node in a [`NodeTree`] (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(u32, u32);

impl NodeId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Construction parameters for a [`NodeTree`] element.
#[derive(Clone, Debug, Default)]
pub struct ElementSpec {
    /// Element classification.
    pub kind: ElementKind,
    /// Accessibility role attribute.
    pub role: Option<String>,
    /// Visible text.
    pub text: String,
    /// Class tokens.
    pub classes: SmallVec<[String; 2]>,
}

impl ElementSpec {
    /// An element with a role and text, typically a menu entry.
    pub fn item(role: &str, text: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            text: text.to_string(),
            ..Self::default()
        }
    }

    /// An element of the given kind.
    pub fn of_kind(kind: ElementKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Add a class token.
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    spec: ElementSpec,
}

/// Arena-backed element tree with a single implicit document root.
///
/// Nodes inserted with no parent are top-level nodes of the document. A node
/// that is [`detach`](Self::detach)ed keeps its subtree but is no longer
/// connected; [`remove`](Self::remove) frees the whole subtree and bumps the
/// slot generations so stale handles stop resolving.
#[derive(Clone, Debug, Default)]
pub struct NodeTree {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    roots: Vec<NodeId>,
}

impl NodeTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `parent`, or at the document top level.
    ///
    /// A stale `parent` is treated as `None`.
    pub fn insert(&mut self, parent: Option<NodeId>, spec: ElementSpec) -> NodeId {
        let parent = parent.filter(|p| self.node(*p).is_some());
        let node = Node {
            parent,
            children: Vec::new(),
            spec,
        };
        let id = if let Some(idx) = self.free_list.pop() {
            self.nodes[idx] = Some(node);
            NodeId(idx as u32, self.generations[idx])
        } else {
            self.nodes.push(Some(node));
            self.generations.push(0);
            NodeId((self.nodes.len() - 1) as u32, 0)
        };
        match parent {
            Some(p) => {
                if let Some(pn) = self.node_mut(p) {
                    pn.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        id
    }

    /// Move `id` (with its subtree) under a new parent, appending it last.
    ///
    /// Models portal rendering, where a panel lives outside its container.
    pub fn reparent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if self.node(id).is_none() {
            return;
        }
        self.unlink(id);
        let parent = parent.filter(|p| self.node(*p).is_some() && !self.contains(id, *p));
        if let Some(n) = self.node_mut(id) {
            n.parent = parent;
        }
        match parent {
            Some(p) => {
                if let Some(pn) = self.node_mut(p) {
                    pn.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
    }

    /// Detach `id` from the document without freeing it.
    pub fn detach(&mut self, id: NodeId) {
        if self.node(id).is_none() {
            return;
        }
        self.unlink(id);
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    /// Remove `id` and its subtree.
    pub fn remove(&mut self, id: NodeId) {
        if self.node(id).is_none() {
            return;
        }
        self.unlink(id);
        let mut stack = alloc::vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(n) = self.nodes[cur.idx()].take() {
                stack.extend(n.children);
                self.generations[cur.idx()] = self.generations[cur.idx()].wrapping_add(1);
                self.free_list.push(cur.idx());
            }
        }
    }

    /// Replace the visible text of `id`.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(n) = self.node_mut(id) {
            n.spec.text = text.to_string();
        }
    }

    /// Replace the role attribute of `id`.
    pub fn set_role(&mut self, id: NodeId, role: Option<&str>) {
        if let Some(n) = self.node_mut(id) {
            n.spec.role = role.map(ToString::to_string);
        }
    }

    /// Add a class token to `id`.
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(n) = self.node_mut(id)
            && !n.spec.classes.iter().any(|c| c == class)
        {
            n.spec.classes.push(class.to_string());
        }
    }

    /// Parent of `id`, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Direct children of `id`.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Whether `id` still resolves to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        if self.generations.get(id.idx()) != Some(&id.1) {
            return None;
        }
        self.nodes.get(id.idx()).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.generations.get(id.idx()) != Some(&id.1) {
            return None;
        }
        self.nodes.get_mut(id.idx()).and_then(Option::as_mut)
    }

    fn unlink(&mut self, id: NodeId) {
        match self.parent(id) {
            Some(p) => {
                if let Some(pn) = self.node_mut(p) {
                    pn.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
    }
}

impl ElementTree<NodeId> for NodeTree {
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if self.node(ancestor).is_none() {
            return false;
        }
        let mut cur = Some(node);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent(c);
        }
        false
    }

    fn role(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(|n| n.spec.role.as_deref())
    }

    fn kind(&self, node: NodeId) -> ElementKind {
        self.node(node).map(|n| n.spec.kind).unwrap_or_default()
    }

    fn text(&self, node: NodeId) -> &str {
        self.node(node).map(|n| n.spec.text.as_str()).unwrap_or("")
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node)
            .is_some_and(|n| n.spec.classes.iter().any(|c| c == class))
    }

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(cur) = stack.pop() {
            out.push(cur);
            stack.extend(self.children(cur).iter().rev().copied());
        }
        out
    }

    fn is_connected(&self, node: NodeId) -> bool {
        let mut cur = node;
        loop {
            if self.node(cur).is_none() {
                return false;
            }
            match self.parent(cur) {
                Some(p) => cur = p,
                None => return self.roots.contains(&cur),
            }
        }
    }
}
