//! Document: one editable formula instance and its public surface.
//!
//! # Overview
//!
//! A [`Document`] owns the node arena, the root block, the single cursor
//! (with its at-most-one selection) and the boxed [`ViewHost`] the kernel
//! notifies about structural changes. Every public operation runs to
//! completion synchronously; the tree invariants hold at every boundary
//! between operations.
//!
//! Input routing mirrors the event model of the embedding layer: a
//! [`KeyEvent`] is delivered to the innermost block containing the cursor
//! and falls back up the parent chain (vectors, text blocks and the command
//! composer intercept), ending at the root dispatch table; a typed
//! character goes through the same chain to the `keypress` hooks.
//!
//! # Example
//!
//! ```rust
//! use formula_core::Document;
//!
//! let mut doc = Document::new();
//! doc.set_markup("\\frac{1}{2}+x");
//! assert_eq!(doc.get_markup(), "\\frac{1}{2}+x");
//!
//! doc.backspace(); // selects the trailing x
//! doc.backspace(); // deletes it
//! assert_eq!(doc.get_markup(), "\\frac{1}{2}+");
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::catalog::CommandKind;
use crate::cursor::Cursor;
use crate::latex;
use crate::tree::{NodeId, Tree};
use crate::view::{Key, KeyEvent, NullView, ViewHost};

/// A read-only snapshot of the cursor's gap, for inspection and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    /// Block the cursor is inside.
    pub parent: NodeId,
    /// Node immediately left of the gap, if any.
    pub prev: Option<NodeId>,
    /// Node immediately right of the gap, if any.
    pub next: Option<NodeId>,
}

/// One editable formula document.
pub struct Document {
    pub(crate) tree: Tree,
    pub(crate) root: NodeId,
    pub(crate) cursor: Cursor,
    pub(crate) view: Box<dyn ViewHost>,
}

impl Document {
    /// An empty document with a headless [`NullView`] host.
    pub fn new() -> Self {
        Self::with_view(Box::new(NullView::new()))
    }

    /// An empty document notifying the given view host.
    pub fn with_view(mut view: Box<dyn ViewHost>) -> Self {
        let mut tree = Tree::new();
        let root = tree.alloc_block();
        let handle = view.create_root();
        tree.set_view_handle(root, handle);
        let cursor = Cursor::at_end_of(root, &tree);
        Self {
            tree,
            root,
            cursor,
            view,
        }
    }

    /// The node arena (read-only).
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The root block.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Snapshot of the cursor's current gap.
    pub fn cursor_position(&self) -> CursorPosition {
        CursorPosition {
            parent: self.cursor.parent,
            prev: self.cursor.prev,
            next: self.cursor.next,
        }
    }

    /// Whether a selection is attached to the cursor.
    pub fn has_selection(&self) -> bool {
        self.cursor.selection.is_some()
    }

    /// Whether the document holds no content.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty(self.root)
    }

    /// Serialize the whole document to markup (normalized).
    pub fn get_markup(&self) -> String {
        latex::normalize(&latex::serialize(&self.tree, self.root))
    }

    /// Markup of a single subtree, without root normalization.
    pub fn node_markup(&self, id: NodeId) -> String {
        latex::serialize(&self.tree, id)
    }

    /// Markup of the current selection, if any.
    pub fn selection_markup(&self) -> Option<String> {
        let sel = self.cursor.selection?;
        let mut out = String::new();
        for node in sel.0.nodes(&self.tree) {
            out.push_str(&latex::serialize(&self.tree, node));
        }
        Some(out)
    }

    /// Replace the whole document with the tree parsed from `markup`.
    ///
    /// Malformed markup is never an error: consumption stops at the end of
    /// the stream and whatever tree was built so far stays. The cursor ends
    /// at the end of the root block.
    pub fn set_markup(&mut self, markup: &str) {
        self.reset();
        latex::parse_into(self, markup);
        let root = self.root;
        self.append_to(root);
        self.clear_selection();
    }

    /// Write the characters of `text` at the cursor, as if typed in math
    /// mode (grapheme by grapheme).
    pub fn insert_at_cursor(&mut self, text: &str) {
        for grapheme in text.graphemes(true) {
            for ch in grapheme.chars() {
                self.write(ch);
            }
        }
    }

    /// Select the entire root block.
    pub fn select_all(&mut self) {
        self.clear_selection();
        let root = self.root;
        self.append_to(root);
        while self.cursor.prev.is_some() {
            self.select_left();
        }
    }

    fn reset(&mut self) {
        let mut tree = Tree::new();
        let root = tree.alloc_block();
        let handle = self.view.create_root();
        tree.set_view_handle(root, handle);
        self.tree = tree;
        self.root = root;
        self.cursor = Cursor::at_end_of(root, &self.tree);
    }

    /// Route a character to the innermost keypress handler.
    ///
    /// Text blocks and the command composer intercept; everything else
    /// reaches the default handler, [`Document::write`].
    pub fn typed_char(&mut self, ch: char) {
        let mut block = Some(self.cursor.parent);
        while let Some(b) = block {
            let Some(cmd) = self.tree.parent(b) else { break };
            match self.tree.kind(cmd) {
                Some(CommandKind::TextBlock) => {
                    self.text_block_keypress(cmd, ch);
                    return;
                }
                Some(CommandKind::CommandInput) => {
                    self.composer_keypress(cmd, ch);
                    return;
                }
                _ => {}
            }
            block = self.tree.parent(cmd);
        }
        self.write(ch);
    }

    /// Route a key event to the innermost keydown handler, falling back to
    /// the root dispatch table. Returns whether the event was consumed.
    pub fn keystroke(&mut self, event: KeyEvent) -> bool {
        let mut block = Some(self.cursor.parent);
        while let Some(b) = block {
            let Some(cmd) = self.tree.parent(b) else { break };
            match self.tree.kind(cmd) {
                Some(CommandKind::Vector) if self.tree.parent(self.cursor.parent) == Some(cmd) => {
                    if self.vector_keydown(cmd, event) {
                        return true;
                    }
                }
                Some(CommandKind::TextBlock) => {
                    if self.text_block_keydown(cmd, event) {
                        return true;
                    }
                }
                Some(CommandKind::CommandInput) => {
                    if matches!(event.key, Key::Tab | Key::Enter) {
                        self.materialize_composer(cmd);
                        return true;
                    }
                }
                _ => {}
            }
            block = self.tree.parent(cmd);
        }
        self.root_keydown(event)
    }

    /// The root block's key table.
    fn root_keydown(&mut self, event: KeyEvent) -> bool {
        match event.key {
            Key::Backspace => {
                if event.ctrl {
                    while self.cursor.prev.is_some() || self.has_selection() {
                        self.backspace();
                    }
                } else {
                    self.backspace();
                }
                true
            }
            Key::Delete => {
                if event.ctrl {
                    while self.cursor.next.is_some() || self.has_selection() {
                        self.delete_forward();
                    }
                } else {
                    self.delete_forward();
                }
                true
            }
            Key::Left => {
                if event.ctrl {
                    return false;
                }
                if event.shift {
                    self.select_left();
                } else {
                    self.move_left();
                }
                true
            }
            Key::Right => {
                if event.ctrl {
                    return false;
                }
                if event.shift {
                    self.select_right();
                } else {
                    self.move_right();
                }
                true
            }
            Key::Up => {
                if event.ctrl {
                    return false;
                }
                if event.shift {
                    if self.cursor.prev.is_some() {
                        while self.cursor.prev.is_some() {
                            self.select_left();
                        }
                    } else {
                        self.select_left();
                    }
                } else if let Some(prev_block) = self.tree.prev(self.cursor.parent) {
                    self.clear_selection();
                    self.append_to(prev_block);
                } else if self.cursor.prev.is_some() {
                    self.clear_selection();
                    let parent = self.cursor.parent;
                    self.prepend_to(parent);
                } else if self.cursor.parent != self.root {
                    self.clear_selection();
                    let wrapper = self
                        .tree
                        .parent(self.cursor.parent)
                        .expect("non-root block has a wrapper");
                    self.insert_before_node(wrapper);
                }
                true
            }
            Key::Down => {
                if event.ctrl {
                    return false;
                }
                if event.shift {
                    if self.cursor.next.is_some() {
                        while self.cursor.next.is_some() {
                            self.select_right();
                        }
                    } else {
                        self.select_right();
                    }
                } else if let Some(next_block) = self.tree.next(self.cursor.parent) {
                    self.clear_selection();
                    self.prepend_to(next_block);
                } else if self.cursor.next.is_some() {
                    self.clear_selection();
                    let parent = self.cursor.parent;
                    self.append_to(parent);
                } else if self.cursor.parent != self.root {
                    self.clear_selection();
                    let wrapper = self
                        .tree
                        .parent(self.cursor.parent)
                        .expect("non-root block has a wrapper");
                    self.insert_after_node(wrapper);
                }
                true
            }
            Key::Home => {
                if event.shift {
                    while self.cursor.prev.is_some()
                        || (event.ctrl && self.cursor.parent != self.root)
                    {
                        self.select_left();
                    }
                } else {
                    self.clear_selection();
                    let target = if event.ctrl {
                        self.root
                    } else {
                        self.cursor.parent
                    };
                    self.prepend_to(target);
                }
                true
            }
            Key::End => {
                if event.shift {
                    while self.cursor.next.is_some()
                        || (event.ctrl && self.cursor.parent != self.root)
                    {
                        self.select_right();
                    }
                } else {
                    self.clear_selection();
                    let target = if event.ctrl {
                        self.root
                    } else {
                        self.cursor.parent
                    };
                    self.append_to(target);
                }
                true
            }
            Key::Tab | Key::Escape => {
                if event.ctrl {
                    return false;
                }
                let parent = self.cursor.parent;
                if parent == self.root {
                    return false;
                }
                if event.shift {
                    if let Some(prev_block) = self.tree.prev(parent) {
                        self.append_to(prev_block);
                    } else {
                        let wrapper = self
                            .tree
                            .parent(parent)
                            .expect("non-root block has a wrapper");
                        self.insert_before_node(wrapper);
                    }
                } else if let Some(next_block) = self.tree.next(parent) {
                    self.prepend_to(next_block);
                } else {
                    let wrapper = self
                        .tree
                        .parent(parent)
                        .expect("non-root block has a wrapper");
                    self.insert_after_node(wrapper);
                }
                self.clear_selection();
                true
            }
            Key::Enter => true,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
