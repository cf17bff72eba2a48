//! Fragments: unowned views over a contiguous run of siblings.
//!
//! A fragment `(parent, prev, next)` denotes every sibling of `parent`
//! strictly between `prev` and `next`; either bound may be absent, meaning
//! the start or end of the parent's children. Fragments own nothing and are
//! invalidated by structural mutation unless updated in lockstep — the
//! cursor is careful to do exactly that for the one persisted fragment, the
//! active selection.

use crate::tree::{NodeId, Tree};

/// An unowned span of siblings inside one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    /// Block whose children the span covers.
    pub parent: NodeId,
    /// Exclusive left bound (`None` = block start).
    pub prev: Option<NodeId>,
    /// Exclusive right bound (`None` = block end).
    pub next: Option<NodeId>,
}

impl Fragment {
    /// Span strictly between `prev` and `next` inside `parent`.
    pub fn new(parent: NodeId, prev: Option<NodeId>, next: Option<NodeId>) -> Self {
        Self { parent, prev, next }
    }

    /// First node inside the span, if any.
    pub fn first(&self, tree: &Tree) -> Option<NodeId> {
        let candidate = match self.prev {
            Some(p) => tree.next(p),
            None => tree.first_child(self.parent),
        };
        if candidate == self.next { None } else { candidate }
    }

    /// Last node inside the span, if any.
    pub fn last(&self, tree: &Tree) -> Option<NodeId> {
        let candidate = match self.next {
            Some(n) => tree.prev(n),
            None => tree.last_child(self.parent),
        };
        if candidate == self.prev { None } else { candidate }
    }

    /// Whether the span contains no nodes.
    pub fn is_empty(&self, tree: &Tree) -> bool {
        self.first(tree).is_none()
    }

    /// Nodes inside the span, front to back, collected eagerly (the span is
    /// typically mutated right after being walked).
    pub fn nodes(&self, tree: &Tree) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.first(tree);
        while let Some(id) = cursor {
            out.push(id);
            cursor = if tree.next(id) == self.next {
                None
            } else {
                tree.next(id)
            };
        }
        out
    }

    /// Detach the span from `parent` and re-home it in a fresh block, which
    /// is returned. This is how a selection becomes a fraction numerator or
    /// a root radicand when swallowed by a newly typed command.
    pub fn blockify(self, tree: &mut Tree) -> NodeId {
        let block = tree.alloc_block();
        let Some(first) = self.first(tree) else {
            return block;
        };
        let last = self.last(tree).expect("non-empty span has a last node");

        // Close the gap in the old parent.
        match self.prev {
            Some(p) => tree.set_next(p, self.next),
            None => tree.set_first_child(self.parent, self.next),
        }
        match self.next {
            Some(n) => tree.set_prev(n, self.prev),
            None => tree.set_last_child(self.parent, self.prev),
        }

        // Re-home the run.
        tree.set_first_child(block, Some(first));
        tree.set_last_child(block, Some(last));
        tree.set_prev(first, None);
        tree.set_next(last, None);
        let mut cursor = Some(first);
        while let Some(id) = cursor {
            tree.set_parent(id, Some(block));
            cursor = tree.next(id);
        }
        block
    }

    /// Splice the whole span out of the tree in one step. The removed nodes
    /// keep their internal structure but become unreachable.
    pub fn remove(self, tree: &mut Tree) -> Vec<NodeId> {
        let nodes = self.nodes(tree);
        if nodes.is_empty() {
            return nodes;
        }
        match self.prev {
            Some(p) => tree.set_next(p, self.next),
            None => tree.set_first_child(self.parent, self.next),
        }
        match self.next {
            Some(n) => tree.set_prev(n, self.prev),
            None => tree.set_last_child(self.parent, self.prev),
        }
        for &id in &nodes {
            tree.set_parent(id, None);
        }
        if let Some(&first) = nodes.first() {
            tree.set_prev(first, None);
        }
        if let Some(&last) = nodes.last() {
            tree.set_next(last, None);
        }
        nodes
    }
}

/// The persisted, user-visible fragment: the active selection.
///
/// Owned by the cursor; extended, retracted and leveled up in lockstep with
/// every mutation so its bounds stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection(pub Fragment);

impl Selection {
    /// Selection spanning the given bounds.
    pub fn new(parent: NodeId, prev: Option<NodeId>, next: Option<NodeId>) -> Self {
        Self(Fragment::new(parent, prev, next))
    }

    /// Promote the selection from inside a block to span that block's
    /// wrapping command within *its* parent.
    pub fn level_up(&mut self, tree: &Tree) {
        let wrapper = tree
            .parent(self.0.parent)
            .expect("level_up is only reachable below the root");
        self.0 = Fragment::new(
            tree.parent(wrapper).expect("commands always live in a block"),
            tree.prev(wrapper),
            tree.next(wrapper),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CommandData;
    use crate::tree::Tree;

    fn block_with(tree: &mut Tree, chars: &str) -> (NodeId, Vec<NodeId>) {
        let block = tree.alloc_block();
        let ids = chars
            .chars()
            .map(|ch| {
                let id = tree.alloc_command(CommandData::plain_char(ch));
                tree.append_child(block, id);
                id
            })
            .collect();
        (block, ids)
    }

    #[test]
    fn test_span_bounds() {
        let mut tree = Tree::new();
        let (block, ids) = block_with(&mut tree, "abcd");

        let whole = Fragment::new(block, None, None);
        assert_eq!(whole.nodes(&tree), ids);

        let middle = Fragment::new(block, Some(ids[0]), Some(ids[3]));
        assert_eq!(middle.nodes(&tree), vec![ids[1], ids[2]]);

        let empty = Fragment::new(block, Some(ids[1]), Some(ids[2]));
        assert!(empty.is_empty(&tree));
        assert_eq!(empty.first(&tree), None);
        assert_eq!(empty.last(&tree), None);
    }

    #[test]
    fn test_blockify_extracts_run() {
        let mut tree = Tree::new();
        let (block, ids) = block_with(&mut tree, "abcd");

        let span = Fragment::new(block, Some(ids[0]), Some(ids[3]));
        let extracted = span.blockify(&mut tree);

        assert_eq!(
            tree.children(block).collect::<Vec<_>>(),
            vec![ids[0], ids[3]]
        );
        assert_eq!(tree.next(ids[0]), Some(ids[3]));
        assert_eq!(
            tree.children(extracted).collect::<Vec<_>>(),
            vec![ids[1], ids[2]]
        );
        assert_eq!(tree.parent(ids[1]), Some(extracted));
        assert_eq!(tree.parent(ids[2]), Some(extracted));
        tree.validate(block);
        tree.validate(extracted);
    }

    #[test]
    fn test_blockify_whole_block() {
        let mut tree = Tree::new();
        let (block, ids) = block_with(&mut tree, "xy");

        let extracted = Fragment::new(block, None, None).blockify(&mut tree);
        assert!(tree.is_empty(block));
        assert_eq!(tree.children(extracted).collect::<Vec<_>>(), ids);
    }

    #[test]
    fn test_blockify_empty_span_yields_empty_block() {
        let mut tree = Tree::new();
        let (block, ids) = block_with(&mut tree, "ab");
        let extracted = Fragment::new(block, Some(ids[0]), Some(ids[1])).blockify(&mut tree);
        assert!(tree.is_empty(extracted));
        assert_eq!(tree.children(block).collect::<Vec<_>>(), ids);
    }

    #[test]
    fn test_remove_closes_gap() {
        let mut tree = Tree::new();
        let (block, ids) = block_with(&mut tree, "abcd");
        let removed = Fragment::new(block, Some(ids[0]), None).remove(&mut tree);
        assert_eq!(removed, vec![ids[1], ids[2], ids[3]]);
        assert_eq!(tree.children(block).collect::<Vec<_>>(), vec![ids[0]]);
        tree.validate(block);
    }
}
