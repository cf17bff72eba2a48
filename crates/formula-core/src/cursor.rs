//! Cursor movement, selection and structural deletion.
//!
//! # Overview
//!
//! The cursor is a gap between siblings inside one block, held as
//! `(parent, prev, next)`. It never points at a node; `prev`/`next` are the
//! neighbors of the gap and `None` marks a block edge. All movement,
//! selection and deletion entry points live here as methods on
//! [`Document`](crate::Document) so they can reach the tree, the cursor and
//! the view host together.
//!
//! Selection is an extension of the cursor: the cursor always sits at one
//! edge of the selected run, and the edge it sits at decides whether the
//! next shift-arrow extends or retracts.

use crate::document::Document;
use crate::fragment::{Fragment, Selection};
use crate::tree::{NodeId, Tree};
use crate::view::NodeFlag;

/// Cursor state: a gap in one block, plus the optional selection.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor {
    pub(crate) parent: NodeId,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) selection: Option<Selection>,
}

impl Cursor {
    pub(crate) fn at_end_of(block: NodeId, tree: &Tree) -> Self {
        Cursor {
            parent: block,
            prev: tree.last_child(block),
            next: None,
            selection: None,
        }
    }
}

impl Document {
    // -- gap placement ------------------------------------------------------

    /// Move the gap to `(parent, prev, next)`, updating block focus flags
    /// when the cursor changes blocks.
    fn place_gap(&mut self, parent: NodeId, prev: Option<NodeId>, next: Option<NodeId>) {
        let old = self.cursor.parent;
        self.cursor.parent = parent;
        self.cursor.prev = prev;
        self.cursor.next = next;
        if old != parent {
            self.blur_block(old);
            self.focus_block(parent);
        }
    }

    pub(crate) fn insert_before_node(&mut self, el: NodeId) {
        let parent = self.tree.parent(el).expect("cursor target has a parent");
        let prev = self.tree.prev(el);
        self.place_gap(parent, prev, Some(el));
    }

    pub(crate) fn insert_after_node(&mut self, el: NodeId) {
        let parent = self.tree.parent(el).expect("cursor target has a parent");
        let next = self.tree.next(el);
        self.place_gap(parent, Some(el), next);
    }

    pub(crate) fn prepend_to(&mut self, block: NodeId) {
        let first = self.tree.first_child(block);
        self.place_gap(block, None, first);
    }

    pub(crate) fn append_to(&mut self, block: NodeId) {
        let last = self.tree.last_child(block);
        self.place_gap(block, last, None);
    }

    fn focus_block(&mut self, block: NodeId) {
        if let Some(handle) = self.tree.view_handle(block) {
            self.view.set_flag(handle, NodeFlag::HasCursor, true);
            if self.tree.is_empty(block) {
                self.view.set_flag(handle, NodeFlag::Empty, false);
            }
        }
    }

    fn blur_block(&mut self, block: NodeId) {
        if let Some(handle) = self.tree.view_handle(block) {
            self.view.set_flag(handle, NodeFlag::HasCursor, false);
            if self.tree.is_empty(block) {
                self.view.set_flag(handle, NodeFlag::Empty, true);
            }
        }
    }

    /// Slide the gap one sibling left, staying in the same block.
    fn hop_left(&mut self) {
        let p = self.cursor.prev.expect("hop_left requires a left neighbor");
        self.cursor.next = Some(p);
        self.cursor.prev = self.tree.prev(p);
    }

    /// Slide the gap one sibling right, staying in the same block.
    fn hop_right(&mut self) {
        let n = self.cursor.next.expect("hop_right requires a right neighbor");
        self.cursor.prev = Some(n);
        self.cursor.next = self.tree.next(n);
    }

    // -- movement -----------------------------------------------------------

    /// Arrow-left: descend into a structured neighbor, hop over a symbol,
    /// or climb out at a block edge. With a selection, collapse to its left
    /// edge instead.
    pub fn move_left(&mut self) {
        if let Some(sel) = self.cursor.selection {
            let target = sel
                .0
                .first(&self.tree)
                .expect("active selection is never empty");
            self.clear_selection();
            self.insert_before_node(target);
            return;
        }
        if let Some(p) = self.cursor.prev {
            if let Some(last_block) = self.tree.last_child(p) {
                self.append_to(last_block);
            } else {
                self.hop_left();
            }
        } else if let Some(prev_block) = self.tree.prev(self.cursor.parent) {
            self.append_to(prev_block);
        } else if self.cursor.parent != self.root {
            let wrapper = self
                .tree
                .parent(self.cursor.parent)
                .expect("non-root block has a wrapper");
            self.insert_before_node(wrapper);
        }
    }

    /// Mirror of [`Document::move_left`].
    pub fn move_right(&mut self) {
        if let Some(sel) = self.cursor.selection {
            let target = sel
                .0
                .last(&self.tree)
                .expect("active selection is never empty");
            self.clear_selection();
            self.insert_after_node(target);
            return;
        }
        if let Some(n) = self.cursor.next {
            if let Some(first_block) = self.tree.first_child(n) {
                self.prepend_to(first_block);
            } else {
                self.hop_right();
            }
        } else if let Some(next_block) = self.tree.next(self.cursor.parent) {
            self.prepend_to(next_block);
        } else if self.cursor.parent != self.root {
            let wrapper = self
                .tree
                .parent(self.cursor.parent)
                .expect("non-root block has a wrapper");
            self.insert_after_node(wrapper);
        }
    }

    // -- selection ----------------------------------------------------------

    fn flag_selected(&mut self, node: NodeId, selected: bool) {
        if let Some(handle) = self.tree.view_handle(node) {
            self.view.set_flag(handle, NodeFlag::Selected, selected);
        }
    }

    /// Shift-left: start or extend a selection leftward, retract a
    /// rightward one, or promote the selection to the enclosing command at
    /// a block edge. At the left edge of the root this is a no-op.
    pub fn select_left(&mut self) {
        if let Some(mut sel) = self.cursor.selection {
            if sel.0.prev == self.cursor.prev {
                // cursor at the left edge: grow
                if self.cursor.prev.is_some() {
                    self.hop_left();
                    let grabbed = self.cursor.next.expect("hop_left fills next");
                    self.flag_selected(grabbed, true);
                    sel.0.prev = self.cursor.prev;
                    self.cursor.selection = Some(sel);
                } else if self.cursor.parent != self.root {
                    self.promote_selection_left(sel);
                }
            } else {
                // cursor at the right edge: shrink
                let dropped = self.cursor.prev.expect("selection edge has a node");
                self.flag_selected(dropped, false);
                self.hop_left();
                sel.0.next = self.cursor.next;
                if sel.0.prev == self.cursor.prev {
                    self.cursor.selection = None;
                } else {
                    self.cursor.selection = Some(sel);
                }
            }
            return;
        }
        if self.cursor.prev.is_some() {
            self.hop_left();
            let grabbed = self.cursor.next.expect("hop_left fills next");
            self.flag_selected(grabbed, true);
            self.cursor.selection = Some(Selection(Fragment::new(
                self.cursor.parent,
                self.cursor.prev,
                self.tree.next(grabbed),
            )));
        } else if self.cursor.parent != self.root {
            let wrapper = self
                .tree
                .parent(self.cursor.parent)
                .expect("non-root block has a wrapper");
            self.insert_before_node(wrapper);
            self.flag_selected(wrapper, true);
            self.cursor.selection = Some(Selection(Fragment::new(
                self.cursor.parent,
                self.cursor.prev,
                self.tree.next(wrapper),
            )));
        }
    }

    /// Mirror of [`Document::select_left`].
    pub fn select_right(&mut self) {
        if let Some(mut sel) = self.cursor.selection {
            if sel.0.next == self.cursor.next {
                if self.cursor.next.is_some() {
                    self.hop_right();
                    let grabbed = self.cursor.prev.expect("hop_right fills prev");
                    self.flag_selected(grabbed, true);
                    sel.0.next = self.cursor.next;
                    self.cursor.selection = Some(sel);
                } else if self.cursor.parent != self.root {
                    self.promote_selection_right(sel);
                }
            } else {
                let dropped = self.cursor.next.expect("selection edge has a node");
                self.flag_selected(dropped, false);
                self.hop_right();
                sel.0.prev = self.cursor.prev;
                if sel.0.next == self.cursor.next {
                    self.cursor.selection = None;
                } else {
                    self.cursor.selection = Some(sel);
                }
            }
            return;
        }
        if self.cursor.next.is_some() {
            self.hop_right();
            let grabbed = self.cursor.prev.expect("hop_right fills prev");
            self.flag_selected(grabbed, true);
            self.cursor.selection = Some(Selection(Fragment::new(
                self.cursor.parent,
                self.tree.prev(grabbed),
                self.cursor.next,
            )));
        } else if self.cursor.parent != self.root {
            let wrapper = self
                .tree
                .parent(self.cursor.parent)
                .expect("non-root block has a wrapper");
            self.insert_after_node(wrapper);
            self.flag_selected(wrapper, true);
            self.cursor.selection = Some(Selection(Fragment::new(
                self.cursor.parent,
                self.tree.prev(wrapper),
                self.cursor.next,
            )));
        }
    }

    /// Replace a block-wide selection with one covering the enclosing
    /// command, cursor on its left.
    fn promote_selection_left(&mut self, mut sel: Selection) {
        for node in sel.0.nodes(&self.tree) {
            self.flag_selected(node, false);
        }
        sel.level_up(&self.tree);
        let wrapper = sel.0.first(&self.tree).expect("promoted selection wraps a command");
        self.insert_before_node(wrapper);
        self.flag_selected(wrapper, true);
        self.cursor.selection = Some(sel);
    }

    /// Mirror of [`Document::promote_selection_left`], cursor on the right.
    fn promote_selection_right(&mut self, mut sel: Selection) {
        for node in sel.0.nodes(&self.tree) {
            self.flag_selected(node, false);
        }
        sel.level_up(&self.tree);
        let wrapper = sel.0.last(&self.tree).expect("promoted selection wraps a command");
        self.insert_after_node(wrapper);
        self.flag_selected(wrapper, true);
        self.cursor.selection = Some(sel);
    }

    /// Drop the selection without touching the tree.
    pub fn clear_selection(&mut self) {
        if let Some(sel) = self.cursor.selection.take() {
            for node in sel.0.nodes(&self.tree) {
                self.flag_selected(node, false);
            }
        }
    }

    /// Remove the selected run from the tree. Returns whether there was a
    /// selection to delete.
    pub fn delete_selection(&mut self) -> bool {
        let Some(sel) = self.cursor.selection.take() else {
            return false;
        };
        self.cursor.parent = sel.0.parent;
        self.cursor.prev = sel.0.prev;
        self.cursor.next = sel.0.next;
        for node in sel.0.nodes(&self.tree) {
            if let Some(handle) = self.tree.view_handle(node) {
                self.view.detach(handle);
            }
        }
        sel.0.remove(&mut self.tree);
        true
    }

    // -- deletion -----------------------------------------------------------

    /// Backspace. A structured left neighbor is selected rather than
    /// destroyed; a second backspace deletes the selection. At the left
    /// edge of a block the cursor either escapes an empty wrapper or
    /// splices the wrapper's contents into the outer block.
    pub fn backspace(&mut self) {
        if self.delete_selection() {
            // fall through to respace and redraw
        } else if let Some(p) = self.cursor.prev {
            if self.tree.is_empty(p) {
                self.remove_prev();
            } else {
                self.select_left();
            }
        } else if self.cursor.parent != self.root {
            let wrapper = self
                .tree
                .parent(self.cursor.parent)
                .expect("non-root block has a wrapper");
            if self.tree.is_empty(wrapper) {
                self.insert_after_node(wrapper);
                self.backspace();
                return;
            }
            self.unwrap_wrapper();
        }
        if let Some(p) = self.cursor.prev {
            self.respace(p);
        }
        if let Some(n) = self.cursor.next {
            self.respace(n);
        }
        self.redraw();
    }

    /// Forward delete, the mirror of [`Document::backspace`].
    pub fn delete_forward(&mut self) {
        if self.delete_selection() {
            // fall through to respace and redraw
        } else if let Some(n) = self.cursor.next {
            if self.tree.is_empty(n) {
                self.remove_next();
            } else {
                self.select_right();
            }
        } else if self.cursor.parent != self.root {
            let wrapper = self
                .tree
                .parent(self.cursor.parent)
                .expect("non-root block has a wrapper");
            if self.tree.is_empty(wrapper) {
                self.insert_before_node(wrapper);
                self.delete_forward();
                return;
            }
            self.unwrap_wrapper();
        }
        if let Some(p) = self.cursor.prev {
            self.respace(p);
        }
        if let Some(n) = self.cursor.next {
            self.respace(n);
        }
        self.redraw();
    }

    fn remove_prev(&mut self) {
        let p = self.cursor.prev.expect("remove_prev requires a left neighbor");
        self.cursor.prev = self.tree.prev(p);
        if let Some(handle) = self.tree.view_handle(p) {
            self.view.detach(handle);
        }
        self.tree.unlink(p);
    }

    fn remove_next(&mut self) {
        let n = self.cursor.next.expect("remove_next requires a right neighbor");
        self.cursor.next = self.tree.next(n);
        if let Some(handle) = self.tree.view_handle(n) {
            self.view.detach(handle);
        }
        self.tree.unlink(n);
    }

    /// Dissolve the command enclosing the cursor's block: splice the
    /// contents of all its non-empty argument blocks, in order, into the
    /// outer block at the command's position, then discard the shell. The
    /// cursor keeps its logical position among the spliced nodes.
    fn unwrap_wrapper(&mut self) {
        let wrapper = self
            .tree
            .parent(self.cursor.parent)
            .expect("unwrap target has a wrapper");
        let outer = self
            .tree
            .parent(wrapper)
            .expect("wrapper command lives in a block");
        let outer_prev = self.tree.prev(wrapper);
        let wrapper_next = self.tree.next(wrapper);

        let mut prev = outer_prev;
        let blocks: Vec<NodeId> = self.tree.children(wrapper).collect();
        for block in &blocks {
            if self.tree.is_empty(*block) {
                continue;
            }
            let first = self
                .tree
                .first_child(*block)
                .expect("non-empty block has a first child");
            let last = self
                .tree
                .last_child(*block)
                .expect("non-empty block has a last child");
            let run: Vec<NodeId> = self.tree.children(*block).collect();
            let wrapper_handle = self.tree.view_handle(wrapper);
            for node in run {
                self.tree.set_parent(node, Some(outer));
                if let (Some(h), Some(w)) = (self.tree.view_handle(node), wrapper_handle) {
                    self.view.attach_before(h, w);
                }
            }
            self.tree.set_prev(first, prev);
            match prev {
                Some(p) => self.tree.set_next(p, Some(first)),
                None => self.tree.set_first_child(outer, Some(first)),
            }
            prev = Some(last);
        }
        let spliced_last = prev;
        match spliced_last {
            Some(last) => {
                self.tree.set_next(last, wrapper_next);
                match wrapper_next {
                    Some(n) => self.tree.set_prev(n, Some(last)),
                    None => self.tree.set_last_child(outer, Some(last)),
                }
            }
            None => {
                // every argument block was empty
                match outer_prev {
                    Some(p) => self.tree.set_next(p, wrapper_next),
                    None => self.tree.set_first_child(outer, wrapper_next),
                }
                match wrapper_next {
                    Some(n) => self.tree.set_prev(n, outer_prev),
                    None => self.tree.set_last_child(outer, outer_prev),
                }
            }
        }

        // re-anchor the cursor: its block links are stale but the spliced
        // nodes now live in the outer block, so following them is correct
        if self.cursor.next.is_none() {
            if let Some(p) = self.cursor.prev {
                self.cursor.next = self.tree.next(p);
            } else {
                let mut block = self.cursor.parent;
                loop {
                    match self.tree.next(block) {
                        Some(next_block) => {
                            block = next_block;
                            if let Some(fc) = self.tree.first_child(block) {
                                self.cursor.next = Some(fc);
                                break;
                            }
                        }
                        None => {
                            self.cursor.next = wrapper_next;
                            self.cursor.parent = outer;
                            break;
                        }
                    }
                }
            }
        }
        match self.cursor.next {
            Some(n) => self.insert_before_node(n),
            None => self.append_to(outer),
        }

        if let Some(handle) = self.tree.view_handle(wrapper) {
            self.view.detach(handle);
        }
        if let Some(p) = outer_prev {
            self.respace(p);
        }
        if let Some(n) = wrapper_next {
            self.respace(n);
        }
    }
}
