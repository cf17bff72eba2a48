//! Markup parsing and serialization.
//!
//! # Overview
//!
//! Serialization walks the tree: a block is the concatenation of its
//! children, a command is its token followed by each argument in braces
//! (with the handful of notational exceptions below). The root result is
//! normalized so the separator space after a command name survives only
//! when the next character is a letter, making serialization a fixed
//! point: parsing the output reproduces the tree.
//!
//! Parsing deliberately reuses the editing machine instead of building
//! nodes directly: tokens are replayed through the cursor, so typing `1/2`
//! and parsing `\frac{1}{2}` go through the same construction paths.
//! Malformed input is never an error; consumption simply stops when the
//! stream runs out and unrecognized names turn into literal text.

use std::collections::VecDeque;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::{CommandData, CommandKind};
use crate::document::Document;
use crate::registry::Registry;
use crate::tree::{NodeId, Tree};

/// A token is a backslash command name (possibly empty, for an escaping
/// backslash) or a single non-space character.
static TOKENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\[a-zA-Z]*|\S").expect("valid regex"));

/// Separator spaces after command names, for normalization.
static COMMAND_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[a-zA-Z]+ ").expect("valid regex"));

pub(crate) fn tokenize(markup: &str) -> VecDeque<String> {
    TOKENS
        .find_iter(markup)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Drop the separator space after a command name unless the following
/// character is a letter (which would otherwise extend the name).
pub(crate) fn normalize(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut copied = 0;
    for m in COMMAND_SPACE.find_iter(markup) {
        let keep = markup[m.end()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic());
        out.push_str(&markup[copied..m.end() - 1]);
        if keep {
            out.push(' ');
        }
        copied = m.end();
    }
    out.push_str(&markup[copied..]);
    out
}

// -- serialization ----------------------------------------------------------

/// Markup of one subtree (block or command), without normalization.
pub(crate) fn serialize(tree: &Tree, id: NodeId) -> String {
    let Some(data) = tree.command(id) else {
        let mut out = String::new();
        for child in tree.children(id) {
            out.push_str(&serialize(tree, child));
        }
        return out;
    };
    match &data.kind {
        CommandKind::SupSub => {
            let inner = tree
                .first_child(id)
                .map(|c| serialize(tree, c))
                .unwrap_or_default();
            if inner.chars().count() == 1 {
                format!("{}{}", data.token, inner)
            } else if inner.is_empty() {
                format!("{}{{ }}", data.token)
            } else {
                format!("{}{{{}}}", data.token, inner)
            }
        }
        CommandKind::Bracket { end, .. } => {
            let inner = tree
                .first_child(id)
                .map(|c| serialize(tree, c))
                .unwrap_or_default();
            format!("{}{}{}", data.token, inner, end)
        }
        CommandKind::TextBlock => {
            let inner = tree
                .first_child(id)
                .map(|c| serialize(tree, c))
                .unwrap_or_default();
            format!("\\text{{{}}}", inner)
        }
        CommandKind::CommandInput => {
            let inner = tree
                .first_child(id)
                .map(|c| serialize(tree, c))
                .unwrap_or_default();
            format!("\\{} ", inner)
        }
        CommandKind::Vector => {
            let rows: Vec<String> = tree.children(id).map(|row| serialize(tree, row)).collect();
            format!("\\begin{{matrix}}{}\\end{{matrix}}", rows.join("\\\\"))
        }
        _ if data.kind.arity() == 0 => data.token.clone(),
        _ => {
            let mut out = data.token.clone();
            for child in tree.children(id) {
                let inner = serialize(tree, child);
                out.push('{');
                if inner.is_empty() {
                    out.push(' ');
                } else {
                    out.push_str(&inner);
                }
                out.push('}');
            }
            out
        }
    }
}

// -- parsing ----------------------------------------------------------------

/// Replay `markup` through the cursor of `doc` at its current position.
pub(crate) fn parse_into(doc: &mut Document, markup: &str) {
    let mut tokens = tokenize(markup);
    parse_run(doc, &mut tokens);
}

/// Consume tokens until a closing `}`, a closing delimiter, or the end of
/// the stream.
fn parse_run(doc: &mut Document, tokens: &mut VecDeque<String>) {
    while let Some(token) = tokens.pop_front() {
        if token == "}" {
            return;
        }
        if token == "\\text" {
            parse_text(doc, tokens);
            continue;
        }
        if token == "\\left" || token == "\\right" {
            // the prefix carries no structure of its own; the delimiter
            // character that follows decides everything
            let Some(mut delim) = tokens.pop_front() else {
                return;
            };
            if delim == "\\" {
                match tokens.pop_front() {
                    Some(next) => delim = next,
                    None => return,
                }
            }
            let Some(ch) = delim.chars().next() else {
                return;
            };
            doc.write(ch);
            if doc.cursor_position().prev.is_some() {
                // a closing delimiter put the cursor after itself; it
                // terminates this run like a brace would
                return;
            }
            // an opening delimiter left the cursor inside: parse the body
            // as its argument
            tokens.push_front("{".to_string());
            let cmd = doc
                .tree()
                .parent(doc.cursor_position().parent)
                .expect("cursor sits inside the delimiter just written");
            fill_arguments(doc, tokens, cmd);
            continue;
        }
        if let Some(name) = token.strip_prefix('\\') {
            if !name.is_empty() {
                match Registry::global().resolve_name(name).cloned() {
                    Some(spec) => {
                        let cmd = doc.make_from_spec(&spec, None);
                        doc.insert_new(cmd);
                        fill_arguments(doc, tokens, cmd);
                    }
                    None => {
                        let tb = doc.insert_text_block(name);
                        doc.insert_after_node(tb);
                    }
                }
                continue;
            }
        }
        let Some(ch) = token.chars().next() else {
            continue;
        };
        write_char(doc, tokens, ch);
    }
}

/// One character token: the same resolution typing uses, except that the
/// lookup goes through the name table only, so characters with a typing
/// shortcut (like `*`) stay literal when parsed.
fn write_char(doc: &mut Document, tokens: &mut VecDeque<String>, ch: char) {
    let data = if ch.is_ascii_alphabetic() && ch != 'f' {
        CommandData::variable(ch)
    } else {
        match Registry::global()
            .resolve_name(ch.to_string().as_str())
            .cloned()
        {
            Some(spec) => spec.data(),
            None => CommandData::plain_char(ch),
        }
    };
    let cmd = doc.make_command(data, None);
    doc.insert_new(cmd);
    fill_arguments(doc, tokens, cmd);
}

/// Consume one brace group (or a single token as an implicit group) per
/// argument block of `cmd`, then leave the cursor after it.
fn fill_arguments(doc: &mut Document, tokens: &mut VecDeque<String>, cmd: NodeId) {
    if doc.tree().parent(cmd).is_none() {
        // the placement hook removed the node (a coalesced close bracket):
        // there is nothing to fill and the cursor is already placed
        return;
    }
    let blocks: Vec<NodeId> = doc.tree().children(cmd).collect();
    for block in blocks {
        doc.append_to(block);
        let Some(token) = tokens.pop_front() else {
            break;
        };
        if token == "{" {
            parse_run(doc, tokens);
        } else if let Some(name) = token.strip_prefix('\\') {
            // implicit one-token group holding a command
            if name.is_empty() {
                continue;
            }
            match Registry::global().resolve_name(name).cloned() {
                Some(spec) => {
                    let inner = doc.make_from_spec(&spec, None);
                    doc.insert_new(inner);
                }
                None => {
                    let tb = doc.insert_text_block(name);
                    doc.insert_after_node(tb);
                }
            }
        } else if let Some(ch) = token.chars().next() {
            doc.write(ch);
        }
    }
    doc.insert_after_node(cmd);
}

/// `\text{...}`: the braced content is raw, with `\` passing the following
/// token through literally.
fn parse_text(doc: &mut Document, tokens: &mut VecDeque<String>) {
    let Some(first) = tokens.pop_front() else {
        return;
    };
    let text = if first == "{" {
        let mut text = String::new();
        while let Some(token) = tokens.pop_front() {
            if token == "}" {
                break;
            }
            if token == "\\" {
                match tokens.pop_front() {
                    Some(escaped) => text.push_str(&escaped),
                    None => break,
                }
                continue;
            }
            text.push_str(&token);
        }
        text
    } else {
        first
    };
    let tb = doc.insert_text_block(&text);
    doc.insert_after_node(tb);
}
