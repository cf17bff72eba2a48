#![warn(missing_docs)]
//! Formula Core - Headless Structural Editor Kernel for Math Notation
//!
//! # Overview
//!
//! `formula-core` is a headless editing kernel for mathematical notation.
//! A formula is a tree of blocks and commands rather than a string: editing
//! operations are structural (enter a fraction, select a radical as one
//! unit, dissolve a bracket into its surroundings), and a LaTeX-subset
//! markup is the serialization format, not the document model. Rendering is
//! not involved; the kernel notifies a pluggable view host about structural
//! changes and stays fully functional headless.
//!
//! # Core Features
//!
//! - **Structural Tree Model**: alternating block/command levels in an
//!   index arena, cheap identity, no reference cycles
//! - **Gap Cursor**: the cursor is a position between siblings, never "on"
//!   a node; movement mirrors visual reading order
//! - **Directional Selection**: grow, shrink and level-up semantics driven
//!   by which edge the cursor sits at
//! - **Typing State Machine**: every typed character resolves through a
//!   command catalog; structural commands swallow the selection
//! - **Markup Round-Trip**: serialization is a fixed point of parse →
//!   serialize, with error-free, truncating parsing
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Document (markup API, input routing)       │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Latex (tokenizer, parser, serializer)      │  ← Markup
//! ├─────────────────────────────────────────────┤
//! │  Commands (typing machine, catalog hooks)   │  ← Construction
//! ├─────────────────────────────────────────────┤
//! │  Cursor & Fragment (movement, selection)    │  ← Editing State
//! ├─────────────────────────────────────────────┤
//! │  Tree (arena of blocks and commands)        │  ← Storage
//! ├─────────────────────────────────────────────┤
//! │  View (host trait, flags, metrics)          │  ← Render Boundary
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use formula_core::Document;
//!
//! let mut doc = Document::new();
//! doc.set_markup("x^2");
//!
//! // Type "+1" at the end of the formula.
//! doc.insert_at_cursor("+1");
//! assert_eq!(doc.get_markup(), "x^2+1");
//!
//! // Typing "/" wraps the preceding operand into a live fraction.
//! doc.write('/');
//! doc.write('2');
//! assert_eq!(doc.get_markup(), "x^2+\\frac{1}{2}");
//! ```
//!
//! # Module Description
//!
//! - [`tree`] - index arena of blocks and commands
//! - [`fragment`] - contiguous sibling runs and the selection
//! - [`catalog`] - command kinds and the symbol tables
//! - [`registry`] - name and typed-character resolution
//! - [`cursor`] - movement, selection and structural deletion
//! - [`commands`] - command construction and the typing state machine
//! - [`latex`] - markup parsing and serialization
//! - [`document`] - the document facade and input routing
//! - [`view`] - the view host boundary
//!
//! # Unicode Support
//!
//! - UTF-8 internal encoding; tokens and display strings are `String`s
//! - Text insertion iterates grapheme clusters before characters
//! - Symbol display forms carry the proper Unicode glyphs (`\pm` → `±`)

pub mod catalog;
mod commands;
mod cursor;
pub mod document;
pub mod fragment;
mod latex;
pub mod registry;
pub mod tree;
pub mod view;

pub use catalog::{CommandData, CommandKind, CommandSpec};
pub use document::{CursorPosition, Document};
pub use fragment::{Fragment, Selection};
pub use registry::Registry;
pub use tree::{NodeId, Tree};
pub use view::{Key, KeyEvent, Metrics, NodeFlag, NullView, ViewHandle, ViewHost};
