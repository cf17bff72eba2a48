//! Command construction and the typing state machine.
//!
//! # Overview
//!
//! [`Document::write`] is the single entry point for a character typed in
//! math mode: it resolves the character through the [`Registry`], builds
//! the node (swallowing any selection the way that kind demands) and
//! splices it in at the cursor. Everything context-sensitive that follows
//! an insertion lives here too: cursor placement hooks per kind, the
//! respace pass that keeps contextual spacing flags fresh, and the redraw
//! walk that lets enclosing commands react to content changes.
//!
//! The text-block, command-composer and vector input hooks are also here
//! since they are extensions of the same machine.

use crate::catalog::{CommandData, CommandKind, CommandSpec};
use crate::document::Document;
use crate::fragment::Fragment;
use crate::registry::Registry;
use crate::tree::{NodeId, Tree};
use crate::view::{Key, KeyEvent, NodeFlag};

/// Flatten a subtree to its rendered text, block by block.
fn flatten_text(tree: &Tree, id: NodeId, out: &mut String) {
    match tree.command(id) {
        Some(data) if data.kind.arity() == 0 => out.push_str(&data.display),
        _ => {
            for child in tree.children(id) {
                flatten_text(tree, child, out);
            }
        }
    }
}

impl Document {
    // -- construction -------------------------------------------------------

    /// Build a detached command node with its argument blocks. `replaced`
    /// supplies a pre-filled first argument (from a swallowed selection).
    pub(crate) fn make_command(&mut self, data: CommandData, replaced: Option<NodeId>) -> NodeId {
        let arity = data.kind.arity();
        debug_assert!(replaced.is_none() || arity > 0);
        let display = data.display.clone();
        let cmd = self.tree.alloc_command(data);
        let handle = self.view.create_command(&display);
        self.tree.set_view_handle(cmd, handle);
        for slot in 0..arity {
            let block = match (slot, replaced) {
                (0, Some(b)) => b,
                _ => self.tree.alloc_block(),
            };
            let block_handle = self.view.create_block(handle, slot);
            self.tree.set_view_handle(block, block_handle);
            let swallowed: Vec<NodeId> = self.tree.children(block).collect();
            for child in swallowed {
                if let Some(ch) = self.tree.view_handle(child) {
                    self.view.attach_end(ch, block_handle);
                }
            }
            self.tree.append_child(cmd, block);
        }
        cmd
    }

    pub(crate) fn make_from_spec(
        &mut self,
        spec: &CommandSpec,
        replaced: Option<NodeId>,
    ) -> NodeId {
        self.make_command(spec.data(), replaced)
    }

    /// Splice a freshly built command into the cursor's gap, refresh the
    /// spacing of the neighborhood, run the kind's cursor-placement hook
    /// and redraw the enclosing commands.
    pub(crate) fn insert_new(&mut self, cmd: NodeId) {
        let parent = self.cursor.parent;
        let prev = self.cursor.prev;
        let next = self.cursor.next;
        self.tree.link_between(cmd, parent, prev, next);
        if let Some(handle) = self.tree.view_handle(cmd) {
            match next.and_then(|n| self.tree.view_handle(n)) {
                Some(sibling) => self.view.attach_before(handle, sibling),
                None => {
                    if let Some(parent_handle) = self.tree.view_handle(parent) {
                        self.view.attach_end(handle, parent_handle);
                    }
                }
            }
        }
        self.cursor.prev = Some(cmd);
        self.respace(cmd);
        if let Some(left) = self.tree.prev(cmd) {
            self.respace(left);
        }
        if let Some(right) = self.tree.next(cmd) {
            self.respace(right);
        }
        self.place_cursor_in(cmd);
        self.redraw();
    }

    // -- typing -------------------------------------------------------------

    /// Type one character in math mode. Letters (except `f`, which the
    /// catalog claims for the florin glyph) become variables directly;
    /// everything else goes through the registry, falling back to a plain
    /// symbol. An active selection is replaced: structural commands swallow
    /// it into their first argument, text blocks flatten it to text, the
    /// command composer holds it pending, and plain symbols delete it.
    pub fn write(&mut self, ch: char) {
        if let Some(sel) = self.cursor.selection {
            self.cursor.parent = sel.0.parent;
            self.cursor.prev = sel.0.prev;
            self.cursor.next = sel.0.next;
        }
        if ch.is_ascii_alphabetic() && ch != 'f' {
            self.delete_selection();
            let cmd = self.make_command(CommandData::variable(ch), None);
            self.insert_new(cmd);
            return;
        }
        let Some(spec) = Registry::global().resolve_char(ch).cloned() else {
            self.delete_selection();
            let cmd = self.make_command(CommandData::plain_char(ch), None);
            self.insert_new(cmd);
            return;
        };
        match spec.kind {
            CommandKind::TextBlock => {
                let text = self.take_selection_text();
                self.insert_text_block(&text);
            }
            CommandKind::CommandInput => {
                let pending = self.take_selection_block();
                let cmd = self.make_from_spec(&spec, None);
                if let Some(data) = self.tree.command_mut(cmd) {
                    data.pending = pending;
                }
                self.insert_new(cmd);
            }
            _ if spec.kind.swallows_selection() => {
                let replaced = self.take_selection_block();
                let cmd = self.make_from_spec(&spec, replaced);
                self.insert_new(cmd);
            }
            _ => {
                self.delete_selection();
                let cmd = self.make_from_spec(&spec, None);
                self.insert_new(cmd);
            }
        }
    }

    /// Detach the selected run into a fresh block for a command to adopt.
    fn take_selection_block(&mut self) -> Option<NodeId> {
        let sel = self.cursor.selection.take()?;
        for node in sel.0.nodes(&self.tree) {
            if let Some(handle) = self.tree.view_handle(node) {
                self.view.set_flag(handle, NodeFlag::Selected, false);
                self.view.detach(handle);
            }
        }
        Some(sel.0.blockify(&mut self.tree))
    }

    /// Remove the selected run, returning its flattened text.
    fn take_selection_text(&mut self) -> String {
        let Some(sel) = self.cursor.selection.take() else {
            return String::new();
        };
        let mut text = String::new();
        for node in sel.0.nodes(&self.tree) {
            flatten_text(&self.tree, node, &mut text);
            if let Some(handle) = self.tree.view_handle(node) {
                self.view.detach(handle);
            }
        }
        sel.0.remove(&mut self.tree);
        text
    }

    /// Build a text block at the cursor containing `text`, leaving the
    /// cursor inside it after the last character.
    pub(crate) fn insert_text_block(&mut self, text: &str) -> NodeId {
        let cmd = self.make_command(
            CommandData::new(CommandKind::TextBlock, "\\text", "text"),
            None,
        );
        self.insert_new(cmd);
        for ch in text.chars() {
            let sym = self.make_command(CommandData::plain_char(ch), None);
            self.insert_new(sym);
        }
        cmd
    }

    // -- cursor placement hooks --------------------------------------------

    fn place_cursor_in(&mut self, cmd: NodeId) {
        let Some(kind) = self.tree.kind(cmd).cloned() else {
            return;
        };
        match kind {
            CommandKind::LiveFraction | CommandKind::ChooseBinomial => {
                self.gobble_left_operand(cmd);
                let denominator = self
                    .tree
                    .last_child(cmd)
                    .expect("fractions have two blocks");
                self.append_to(denominator);
            }
            CommandKind::Bracket {
                end,
                closing: true,
                enters,
            } => {
                self.place_close_bracket(cmd, end, enters);
            }
            CommandKind::TextBlock | CommandKind::CommandInput | CommandKind::Vector => {
                let first = self
                    .tree
                    .first_child(cmd)
                    .expect("command has a child block");
                self.append_to(first);
            }
            _ => {
                if let Some(first) = self.tree.first_child(cmd) {
                    // first empty argument, else the last one
                    let mut target = first;
                    let blocks: Vec<NodeId> = self.tree.children(cmd).collect();
                    for block in blocks {
                        if !self.tree.is_empty(target) {
                            target = block;
                        }
                    }
                    self.append_to(target);
                }
            }
        }
    }

    /// When a live fraction (or `\choose`) arrives with an empty first
    /// argument, steal the operand run to its left: walk back until an
    /// operator, big operator or text block, keeping a big operator's
    /// attached scripts on its side of the cut.
    fn gobble_left_operand(&mut self, cmd: NodeId) {
        let first = self
            .tree
            .first_child(cmd)
            .expect("fractions have two blocks");
        if !self.tree.is_empty(first) {
            return;
        }
        let parent = self.tree.parent(cmd).expect("inserted command is linked");
        let mut boundary = self.tree.prev(cmd);
        while let Some(p) = boundary {
            let stop = match self.tree.kind(p) {
                Some(k) if k.is_operator() => true,
                Some(CommandKind::BigOperator) | Some(CommandKind::TextBlock) => true,
                _ => false,
            };
            if stop {
                break;
            }
            boundary = self.tree.prev(p);
        }
        if let Some(b) = boundary {
            if matches!(self.tree.kind(b), Some(CommandKind::BigOperator)) {
                if let Some(script) = self.tree.next(b) {
                    if matches!(self.tree.kind(script), Some(CommandKind::SupSub)) {
                        boundary = Some(script);
                        if let Some(second) = self.tree.next(script) {
                            let paired = matches!(
                                self.tree.kind(second),
                                Some(CommandKind::SupSub)
                            ) && self.tree.command(second).map(|d| &d.token)
                                != self.tree.command(script).map(|d| &d.token);
                            if paired {
                                boundary = Some(second);
                            }
                        }
                    }
                }
            }
        }
        if boundary == self.tree.prev(cmd) {
            return;
        }
        let span = Fragment::new(parent, boundary, Some(cmd));
        let operand = span.nodes(&self.tree);
        let stolen = span.blockify(&mut self.tree);
        let denominator = self.tree.next(first);
        if let Some(handle) = self.tree.view_handle(first) {
            self.view.detach(handle);
        }
        self.tree.unlink(first);
        self.tree.link_between(stolen, cmd, None, denominator);
        if let Some(cmd_handle) = self.tree.view_handle(cmd) {
            let block_handle = self.view.create_block(cmd_handle, 0);
            self.tree.set_view_handle(stolen, block_handle);
            for node in operand {
                if let Some(h) = self.tree.view_handle(node) {
                    self.view.attach_end(h, block_handle);
                }
            }
        }
    }

    /// A freshly typed closing bracket that is empty, last in its block and
    /// directly inside the matching bracket merges with it: the redundant
    /// node is dropped and the cursor exits the enclosing bracket.
    fn place_close_bracket(&mut self, cmd: NodeId, end: &'static str, enters: bool) {
        let child = self.tree.first_child(cmd).expect("brackets have one block");
        let block = self.tree.parent(cmd).expect("inserted command is linked");
        let enclosing = self.tree.parent(block);
        let matching = enclosing
            .and_then(|g| self.tree.kind(g))
            .is_some_and(|k| matches!(k, CommandKind::Bracket { end: ge, .. } if *ge == end));
        if self.tree.next(cmd).is_none() && matching && self.tree.is_empty(child) {
            self.backspace();
            let wrapper = enclosing.expect("matching bracket exists");
            self.insert_after_node(wrapper);
        } else if enters {
            self.append_to(child);
        }
    }

    // -- respace and redraw -------------------------------------------------

    /// Refresh the contextual spacing state of one node.
    pub(crate) fn respace(&mut self, id: NodeId) {
        let Some(kind) = self.tree.kind(id).cloned() else {
            return;
        };
        match kind {
            CommandKind::PlusMinus => {
                let prev = self.tree.prev(id);
                let next = self.tree.next(id);
                let (unary, binary) = match prev {
                    None => (false, false),
                    Some(p) => {
                        let after_operator =
                            self.tree.kind(p).is_some_and(CommandKind::is_operator);
                        let before_operand = next.is_some()
                            && !next
                                .and_then(|n| self.tree.kind(n))
                                .is_some_and(CommandKind::is_operator);
                        if after_operator && before_operand {
                            (true, false)
                        } else {
                            (false, true)
                        }
                    }
                };
                if let Some(handle) = self.tree.view_handle(id) {
                    self.view.set_flag(handle, NodeFlag::UnaryOperator, unary);
                    self.view.set_flag(handle, NodeFlag::BinaryOperator, binary);
                }
            }
            CommandKind::NamedFunction => {
                // the trailing gap disappears before scripts and brackets
                let tight = self
                    .tree
                    .next(id)
                    .and_then(|n| self.tree.kind(n))
                    .is_some_and(|k| {
                        matches!(k, CommandKind::SupSub | CommandKind::Bracket { .. })
                    });
                if let Some(handle) = self.tree.view_handle(id) {
                    self.view.set_flag(handle, NodeFlag::NonItalicized, !tight);
                }
            }
            CommandKind::SupSub => self.respace_scripts(id),
            _ => {}
        }
    }

    /// Scripts directly over an integral take limit styling; a subscript
    /// crowding a superscript (or vice versa) on the same base marks itself
    /// respaced so only one of the pair pads the base.
    fn respace_scripts(&mut self, id: NodeId) {
        let token = match self.tree.command(id) {
            Some(data) => data.token.clone(),
            None => return,
        };
        let prev = self.tree.prev(id);
        let over_integral = prev
            .and_then(|p| self.tree.command(p))
            .is_some_and(|d| d.token == "\\int ");
        let over_paired_integral = prev.is_some_and(|p| {
            matches!(self.tree.kind(p), Some(CommandKind::SupSub))
                && self.tree.command(p).is_some_and(|d| d.token != token)
                && self
                    .tree
                    .prev(p)
                    .and_then(|pp| self.tree.command(pp))
                    .is_some_and(|d| d.token == "\\int ")
        });
        let limit = over_integral || over_paired_integral;
        let respaced = prev.is_some_and(|p| {
            matches!(self.tree.kind(p), Some(CommandKind::SupSub))
                && self
                    .tree
                    .command(p)
                    .is_some_and(|d| d.token != token && !d.respaced)
        });
        let crowded_by_root = token == "^"
            && self
                .tree
                .next(id)
                .and_then(|n| self.tree.kind(n))
                .is_some_and(|k| matches!(k, CommandKind::Root));
        if let Some(data) = self.tree.command_mut(id) {
            data.limit = limit;
            data.respaced = respaced;
        }
        if let Some(handle) = self.tree.view_handle(id) {
            self.view
                .set_flag(handle, NodeFlag::LimitStyle, limit || crowded_by_root);
        }
    }

    /// Walk from the cursor's block to the root, letting every enclosing
    /// command refresh whatever depends on its contents.
    pub(crate) fn redraw(&mut self) {
        let mut current = Some(self.cursor.parent);
        while let Some(id) = current {
            self.redraw_node(id);
            current = self.tree.parent(id);
        }
    }

    fn redraw_node(&mut self, id: NodeId) {
        let Some(kind) = self.tree.kind(id).cloned() else {
            return;
        };
        match kind {
            CommandKind::SupSub => {
                self.respace(id);
                if let Some(n) = self.tree.next(id) {
                    self.respace(n);
                }
                if let Some(p) = self.tree.prev(id) {
                    self.respace(p);
                }
            }
            CommandKind::Root
            | CommandKind::Bracket { .. }
            | CommandKind::Binomial
            | CommandKind::ChooseBinomial => {
                self.rescale_to_contents(id);
            }
            _ => {}
        }
    }

    fn rescale_to_contents(&mut self, id: NodeId) {
        let Some(handle) = self.tree.view_handle(id) else {
            return;
        };
        let Some(child) = self.tree.first_child(id) else {
            return;
        };
        let Some(child_handle) = self.tree.view_handle(child) else {
            return;
        };
        let m = self.view.metrics(child_handle);
        let font = if m.font_size > 0.0 { m.font_size } else { 1.0 };
        let scale = (m.height / font).max(1.0);
        self.view.set_scale(handle, scale);
    }

    // -- text block hooks ---------------------------------------------------

    /// Keypress hook for text blocks: characters are literal, `$` exits or
    /// splits the block.
    pub(crate) fn text_block_keypress(&mut self, tb: NodeId, ch: char) {
        self.delete_selection();
        if ch != '$' {
            let sym = self.make_command(CommandData::plain_char(ch), None);
            self.insert_new(sym);
            return;
        }
        if self.tree.is_empty(tb) {
            // an empty block collapses into a literal dollar sign
            self.insert_after_node(tb);
            self.backspace();
            let sym = self.make_command(CommandData::new(CommandKind::Plain, "\\$", "$"), None);
            self.insert_new(sym);
        } else if self.cursor.next.is_none() {
            self.insert_after_node(tb);
        } else if self.cursor.prev.is_none() {
            self.insert_before_node(tb);
        } else {
            // split: the tail becomes a second text block after this one
            let child = self.tree.first_child(tb).expect("text block has one block");
            let tail = Fragment::new(child, self.cursor.prev, None);
            let mut text = String::new();
            for node in tail.nodes(&self.tree) {
                if let Some(data) = self.tree.command(node) {
                    text.push_str(&data.display);
                }
                if let Some(handle) = self.tree.view_handle(node) {
                    self.view.detach(handle);
                }
            }
            tail.remove(&mut self.tree);
            self.insert_after_node(tb);
            let second = self.insert_text_block(&text);
            self.insert_before_node(second);
        }
    }

    /// Keydown hook for text blocks: a deletion that would dissolve the
    /// block from its inner edge is swallowed (escaping instead when the
    /// block is empty).
    pub(crate) fn text_block_keydown(&mut self, tb: NodeId, event: KeyEvent) -> bool {
        if self.has_selection() {
            return false;
        }
        match event.key {
            Key::Backspace if self.cursor.prev.is_none() => {
                if self.tree.is_empty(tb) {
                    self.insert_after_node(tb);
                }
                true
            }
            Key::Delete if self.cursor.next.is_none() => {
                if self.tree.is_empty(tb) {
                    self.insert_after_node(tb);
                }
                true
            }
            _ => false,
        }
    }

    // -- command composer ---------------------------------------------------

    /// Keypress hook for the command composer: letters accumulate into the
    /// command name, anything else materializes it first.
    pub(crate) fn composer_keypress(&mut self, input: NodeId, ch: char) {
        if ch.is_ascii_alphabetic() {
            self.delete_selection();
            let sym = self.make_command(CommandData::plain_char(ch), None);
            self.insert_new(sym);
            return;
        }
        let rendered = self.materialize_composer(input);
        let empty_argument = rendered
            .and_then(|cmd| self.tree.first_child(cmd))
            .is_some_and(|block| self.tree.is_empty(block));
        if ch == ' ' || (ch == '\\' && empty_argument) {
            return;
        }
        self.typed_char(ch);
    }

    /// Replace the composer with whatever its accumulated name resolves
    /// to: a catalog command (adopting the pending swallowed selection when
    /// the kind takes one), literal text for unknown names, or a lone
    /// backslash symbol for an empty name.
    pub(crate) fn materialize_composer(&mut self, input: NodeId) -> Option<NodeId> {
        let child = self
            .tree
            .first_child(input)
            .expect("composer has one block");
        let mut name = String::new();
        for sym in self.tree.children(child) {
            if let Some(data) = self.tree.command(sym) {
                name.push_str(&data.token);
            }
        }
        let pending = self.tree.command(input).and_then(|d| d.pending);
        let next = self.tree.next(input);
        let parent = self.tree.parent(input).expect("composer is linked");
        if let Some(handle) = self.tree.view_handle(input) {
            self.view.detach(handle);
        }
        self.tree.unlink(input);
        match next {
            Some(n) => self.insert_before_node(n),
            None => self.append_to(parent),
        }

        if name.is_empty() {
            let sym = self.make_command(
                CommandData::new(CommandKind::Plain, "\\backslash ", "\\"),
                None,
            );
            self.insert_new(sym);
            return Some(sym);
        }
        match Registry::global().resolve_name(&name).cloned() {
            Some(spec) => {
                let replaced = if spec.kind.swallows_selection() {
                    pending
                } else {
                    None
                };
                let cmd = self.make_from_spec(&spec, replaced);
                self.insert_new(cmd);
                Some(cmd)
            }
            None => {
                let tb = self.insert_text_block(&name);
                self.insert_after_node(tb);
                Some(tb)
            }
        }
    }

    // -- vector hooks -------------------------------------------------------

    /// Keydown hook for vectors, active when the cursor block is a row:
    /// Enter inserts a row below, Tab in the last row appends one (or exits
    /// when the row is an empty trailing one), and backspace in an empty
    /// row removes the row.
    pub(crate) fn vector_keydown(&mut self, vector: NodeId, event: KeyEvent) -> bool {
        let row = self.cursor.parent;
        match event.key {
            Key::Enter => {
                let next = self.tree.next(row);
                self.add_row(vector, row, next);
                true
            }
            Key::Tab if !event.shift && self.tree.next(row).is_none() => {
                if self.tree.is_empty(row) {
                    if self.tree.prev(row).is_some() {
                        self.insert_after_node(vector);
                        self.remove_row(row);
                        self.redraw();
                        return true;
                    }
                    // a lone empty row: hand the tab to the root table
                    return false;
                }
                self.add_row(vector, row, None);
                true
            }
            Key::Backspace => {
                if self.tree.is_empty(row) {
                    if let Some(prev_row) = self.tree.prev(row) {
                        self.append_to(prev_row);
                    } else {
                        self.insert_before_node(vector);
                    }
                    self.remove_row(row);
                    if self.tree.is_empty(vector) {
                        self.delete_forward();
                    } else {
                        self.redraw();
                    }
                    true
                } else {
                    // deletion never crosses a row edge
                    self.cursor.prev.is_none() && !self.has_selection()
                }
            }
            _ => false,
        }
    }

    fn add_row(&mut self, vector: NodeId, after: NodeId, next: Option<NodeId>) {
        let new_row = self.tree.alloc_block();
        self.tree.link_between(new_row, vector, Some(after), next);
        if let Some(handle) = self.tree.view_handle(vector) {
            let slot = self
                .tree
                .children(vector)
                .position(|b| b == new_row)
                .unwrap_or(0);
            let block_handle = self.view.create_block(handle, slot);
            self.tree.set_view_handle(new_row, block_handle);
        }
        self.append_to(new_row);
        self.redraw();
    }

    fn remove_row(&mut self, row: NodeId) {
        if let Some(handle) = self.tree.view_handle(row) {
            self.view.detach(handle);
        }
        self.tree.unlink(row);
    }
}
