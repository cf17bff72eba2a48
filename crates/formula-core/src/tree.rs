//! Node arena: blocks, commands, and the sibling-chain primitives.
//!
//! # Overview
//!
//! The document is a tree of two alternating layers: a **Block** is an
//! ordered (possibly empty) run of sibling **Command** nodes, and a Command
//! owns a fixed number of child Blocks (its arguments; zero for atomic
//! symbols). Every node carries `parent`, `prev`, `next`, `first_child` and
//! `last_child` links stored as optional arena indices, so every splice is
//! an index rewrite with no dangling-pointer risk.
//!
//! The arena is append-only: removing a node only rewrites links, leaving
//! the slot unreachable until the whole tree is rebuilt (the same
//! reclamation model as a piece-table add buffer). Bounded by the number of
//! edits between two `set_markup` calls, which rebuild the arena from
//! scratch.
//!
//! Link invariants, checked by [`Tree::validate`] in debug builds:
//!
//! - `prev(n) == Some(p)` implies `next(p) == Some(n)`, and mirrored;
//! - a node without `prev` is exactly its parent's `first_child`, a node
//!   without `next` is exactly its parent's `last_child`;
//! - `first_child`/`last_child` are both `None` or both `Some` and joined
//!   by the sibling chain.

use std::ops::ControlFlow;

use crate::catalog::{CommandData, CommandKind};
use crate::view::ViewHandle;

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a node is: a block or a command.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Ordered sibling container; the only thing a cursor can be inside.
    Block,
    /// Structural node or atomic symbol.
    Command(CommandData),
}

/// A tree node: relationship links plus payload.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) payload: Payload,
    pub(crate) view: Option<ViewHandle>,
}

impl Node {
    fn detached(payload: Payload) -> Self {
        Self {
            parent: None,
            prev: None,
            next: None,
            first_child: None,
            last_child: None,
            payload,
            view: None,
        }
    }
}

/// The node arena.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// An empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of slots ever allocated (detached slots included).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Allocate a detached block.
    pub fn alloc_block(&mut self) -> NodeId {
        self.alloc(Payload::Block)
    }

    /// Allocate a detached command node.
    pub fn alloc_command(&mut self, data: CommandData) -> NodeId {
        self.alloc(Payload::Command(data))
    }

    fn alloc(&mut self, payload: Payload) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::detached(payload));
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Structural owner: the containing Block for a command, the owning
    /// Command for an argument block, `None` for the root block.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Left sibling.
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev
    }

    /// Right sibling.
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next
    }

    /// First child (argument block for commands, first command for blocks).
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    /// Last child.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    /// Whether the node is a block.
    pub fn is_block(&self, id: NodeId) -> bool {
        matches!(self.node(id).payload, Payload::Block)
    }

    /// Command payload, if the node is a command.
    pub fn command(&self, id: NodeId) -> Option<&CommandData> {
        match &self.node(id).payload {
            Payload::Command(data) => Some(data),
            Payload::Block => None,
        }
    }

    /// Mutable command payload.
    pub(crate) fn command_mut(&mut self, id: NodeId) -> Option<&mut CommandData> {
        match &mut self.node_mut(id).payload {
            Payload::Command(data) => Some(data),
            Payload::Block => None,
        }
    }

    /// Kind of a command node, if any.
    pub fn kind(&self, id: NodeId) -> Option<&CommandKind> {
        self.command(id).map(|data| &data.kind)
    }

    /// View handle attached to the node, if any.
    pub fn view_handle(&self, id: NodeId) -> Option<ViewHandle> {
        self.node(id).view
    }

    pub(crate) fn set_view_handle(&mut self, id: NodeId, handle: ViewHandle) {
        self.node_mut(id).view = Some(handle);
    }

    /// Iterator over a node's children, front to back.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            cursor: self.first_child(id),
        }
    }

    /// Visit children in order; the visitor may break early. Early exit is
    /// a control signal, not a failure.
    pub fn each_child<B>(
        &self,
        id: NodeId,
        mut visit: impl FnMut(NodeId) -> ControlFlow<B>,
    ) -> Option<B> {
        let mut child = self.first_child(id);
        while let Some(c) = child {
            if let ControlFlow::Break(out) = visit(c) {
                return Some(out);
            }
            child = self.next(c);
        }
        None
    }

    /// Left fold over children with early exit.
    pub fn fold_children<T>(
        &self,
        id: NodeId,
        init: T,
        mut combine: impl FnMut(T, NodeId) -> ControlFlow<T, T>,
    ) -> T {
        let mut acc = init;
        let mut child = self.first_child(id);
        while let Some(c) = child {
            match combine(acc, c) {
                ControlFlow::Continue(next) => acc = next,
                ControlFlow::Break(out) => return out,
            }
            child = self.next(c);
        }
        acc
    }

    /// True for a block with no children; true for a command iff all of its
    /// argument blocks are empty.
    pub fn is_empty(&self, id: NodeId) -> bool {
        match &self.node(id).payload {
            Payload::Block => self.node(id).first_child.is_none(),
            Payload::Command(_) => self.fold_children(id, true, |_, child| {
                if self.is_empty(child) {
                    ControlFlow::Continue(true)
                } else {
                    ControlFlow::Break(false)
                }
            }),
        }
    }

    /// Link a detached node into the sibling chain of `parent` between
    /// `prev` and `next` (either may be `None` for the block boundary).
    pub(crate) fn link_between(
        &mut self,
        id: NodeId,
        parent: NodeId,
        prev: Option<NodeId>,
        next: Option<NodeId>,
    ) {
        {
            let node = self.node_mut(id);
            node.parent = Some(parent);
            node.prev = prev;
            node.next = next;
        }
        match prev {
            Some(p) => self.node_mut(p).next = Some(id),
            None => self.node_mut(parent).first_child = Some(id),
        }
        match next {
            Some(n) => self.node_mut(n).prev = Some(id),
            None => self.node_mut(parent).last_child = Some(id),
        }
        self.debug_validate_around(id);
    }

    /// Append a detached node as the last child of `parent`.
    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let last = self.last_child(parent);
        self.link_between(child, parent, last, None);
    }

    /// Splice a node out of its sibling chain, repairing the boundary
    /// links. The node keeps its own children; it is simply unreachable
    /// from the tree afterwards.
    pub(crate) fn unlink(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = self.node(id);
            (node.parent, node.prev, node.next)
        };
        if let Some(parent) = parent {
            match prev {
                Some(p) => self.node_mut(p).next = next,
                None => self.node_mut(parent).first_child = next,
            }
            match next {
                Some(n) => self.node_mut(n).prev = prev,
                None => self.node_mut(parent).last_child = prev,
            }
        }
        let node = self.node_mut(id);
        node.parent = None;
        node.prev = None;
        node.next = None;
        if let Some(parent) = parent {
            self.debug_validate_around(parent);
        }
    }

    // Raw link surgery for fragment extraction and the unwrap path. The
    // caller is responsible for leaving the chain consistent before the
    // next validate point.
    pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.node_mut(id).parent = parent;
    }

    pub(crate) fn set_prev(&mut self, id: NodeId, prev: Option<NodeId>) {
        self.node_mut(id).prev = prev;
    }

    pub(crate) fn set_next(&mut self, id: NodeId, next: Option<NodeId>) {
        self.node_mut(id).next = next;
    }

    pub(crate) fn set_first_child(&mut self, id: NodeId, child: Option<NodeId>) {
        self.node_mut(id).first_child = child;
    }

    pub(crate) fn set_last_child(&mut self, id: NodeId, child: Option<NodeId>) {
        self.node_mut(id).last_child = child;
    }

    fn debug_validate_around(&self, id: NodeId) {
        if cfg!(debug_assertions) {
            let scope = self.parent(id).unwrap_or(id);
            self.validate_children(scope);
        }
    }

    /// Walk the whole tree under `root` and assert every link invariant.
    /// Programming-error detector; unconditionally fatal when it fires.
    pub fn validate(&self, root: NodeId) {
        self.validate_children(root);
        let mut child = self.first_child(root);
        while let Some(c) = child {
            self.validate(c);
            child = self.next(c);
        }
    }

    fn validate_children(&self, parent: NodeId) {
        let first = self.first_child(parent);
        let last = self.last_child(parent);
        debug_assert_eq!(
            first.is_none(),
            last.is_none(),
            "first/last child must be both set or both absent"
        );
        let mut prev: Option<NodeId> = None;
        let mut child = first;
        while let Some(c) = child {
            debug_assert_eq!(self.parent(c), Some(parent), "child parent link broken");
            debug_assert_eq!(self.prev(c), prev, "prev link broken");
            if let Some(p) = prev {
                debug_assert_eq!(self.next(p), Some(c), "next link broken");
            }
            prev = Some(c);
            child = self.next(c);
        }
        debug_assert_eq!(last, prev, "last_child does not terminate the chain");
    }
}

/// Iterator over a node's children.
pub struct Children<'a> {
    tree: &'a Tree,
    cursor: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.cursor?;
        self.cursor = self.tree.next(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CommandData;

    fn symbol(tree: &mut Tree, ch: char) -> NodeId {
        tree.alloc_command(CommandData::plain_char(ch))
    }

    #[test]
    fn test_append_and_iterate() {
        let mut tree = Tree::new();
        let block = tree.alloc_block();
        let a = symbol(&mut tree, 'a');
        let b = symbol(&mut tree, 'b');
        let c = symbol(&mut tree, 'c');
        tree.append_child(block, a);
        tree.append_child(block, b);
        tree.append_child(block, c);

        let children: Vec<NodeId> = tree.children(block).collect();
        assert_eq!(children, vec![a, b, c]);
        assert_eq!(tree.first_child(block), Some(a));
        assert_eq!(tree.last_child(block), Some(c));
        tree.validate(block);
    }

    #[test]
    fn test_link_between_middle_and_boundaries() {
        let mut tree = Tree::new();
        let block = tree.alloc_block();
        let a = symbol(&mut tree, 'a');
        let c = symbol(&mut tree, 'c');
        tree.append_child(block, a);
        tree.append_child(block, c);

        let b = symbol(&mut tree, 'b');
        tree.link_between(b, block, Some(a), Some(c));
        assert_eq!(tree.children(block).collect::<Vec<_>>(), vec![a, b, c]);

        let start = symbol(&mut tree, 's');
        tree.link_between(start, block, None, Some(a));
        assert_eq!(tree.first_child(block), Some(start));
        tree.validate(block);
    }

    #[test]
    fn test_unlink_repairs_chain() {
        let mut tree = Tree::new();
        let block = tree.alloc_block();
        let a = symbol(&mut tree, 'a');
        let b = symbol(&mut tree, 'b');
        let c = symbol(&mut tree, 'c');
        tree.append_child(block, a);
        tree.append_child(block, b);
        tree.append_child(block, c);

        tree.unlink(b);
        assert_eq!(tree.children(block).collect::<Vec<_>>(), vec![a, c]);
        assert_eq!(tree.next(a), Some(c));
        assert_eq!(tree.prev(c), Some(a));

        tree.unlink(a);
        tree.unlink(c);
        assert!(tree.is_empty(block));
        tree.validate(block);
    }

    #[test]
    fn test_command_empty_is_and_over_child_blocks() {
        let mut tree = Tree::new();
        let cmd = tree.alloc_command(CommandData::new(
            crate::catalog::CommandKind::Fraction,
            "\\frac",
            "⁄",
        ));
        let numer = tree.alloc_block();
        let denom = tree.alloc_block();
        tree.append_child(cmd, numer);
        tree.append_child(cmd, denom);
        assert!(tree.is_empty(cmd));

        let x = symbol(&mut tree, 'x');
        tree.append_child(denom, x);
        assert!(!tree.is_empty(cmd));
        assert!(tree.is_empty(numer));
    }

    #[test]
    fn test_fold_children_early_stop() {
        let mut tree = Tree::new();
        let block = tree.alloc_block();
        for ch in ['a', 'b', 'c', 'd'] {
            let id = symbol(&mut tree, ch);
            tree.append_child(block, id);
        }
        let count = tree.fold_children(block, 0usize, |acc, _| {
            if acc == 2 {
                ControlFlow::Break(acc)
            } else {
                ControlFlow::Continue(acc + 1)
            }
        });
        assert_eq!(count, 2);
    }
}
