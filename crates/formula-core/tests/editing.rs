//! Structural editing: typing, backspace/delete semantics, wrapper
//! dissolution and the live-fraction and bracket behaviors.

use formula_core::{Document, Key, KeyEvent};

#[test]
fn test_typing_builds_markup() {
    let mut doc = Document::new();
    for ch in "x+1".chars() {
        doc.typed_char(ch);
    }
    assert_eq!(doc.get_markup(), "x+1");
}

#[test]
fn test_backspace_selects_structures_before_destroying() {
    let mut doc = Document::new();
    doc.set_markup("\\sqrt{4}");

    // first backspace only selects the radical
    doc.backspace();
    assert!(doc.has_selection());
    assert_eq!(doc.get_markup(), "\\sqrt{4}");

    // second backspace deletes it
    doc.backspace();
    assert!(doc.is_empty());
}

#[test]
fn test_backspace_removes_empty_structures_directly() {
    let mut doc = Document::new();
    doc.write('x');
    doc.write('^');
    // cursor is inside the empty exponent; backspace escapes it and then
    // removes the empty script outright
    doc.backspace();
    assert_eq!(doc.get_markup(), "x");
    assert!(!doc.has_selection());
}

#[test]
fn test_backspace_at_block_start_dissolves_the_wrapper() {
    let mut doc = Document::new();
    doc.set_markup("\\frac{12}{34}");

    doc.move_left(); // denominator end
    doc.keystroke(KeyEvent::plain(Key::Home));
    doc.backspace();

    // numerator and denominator contents are spliced into the root in order
    assert_eq!(doc.get_markup(), "1234");
    // the cursor keeps its place: between the 2 and the 3
    let children: Vec<_> = doc.tree().children(doc.root()).collect();
    assert_eq!(doc.cursor_position().prev, Some(children[1]));
    assert_eq!(doc.cursor_position().next, Some(children[2]));
}

#[test]
fn test_delete_forward_mirrors_backspace() {
    let mut doc = Document::new();
    doc.set_markup("\\sqrt{4}");
    doc.keystroke(KeyEvent::ctrl(Key::Home));

    doc.delete_forward();
    assert!(doc.has_selection());
    doc.delete_forward();
    assert!(doc.is_empty());
}

#[test]
fn test_ctrl_backspace_clears_to_block_start() {
    let mut doc = Document::new();
    doc.set_markup("x+y+z");
    assert!(doc.keystroke(KeyEvent::ctrl(Key::Backspace)));
    assert!(doc.is_empty());
}

#[test]
fn test_live_fraction_steals_the_operand_run() {
    let mut doc = Document::new();
    doc.set_markup("1+23");
    doc.write('/');
    doc.write('4');
    // the stolen run stops at the operator
    assert_eq!(doc.get_markup(), "1+\\frac{23}{4}");
}

#[test]
fn test_live_fraction_with_nothing_to_steal() {
    let mut doc = Document::new();
    doc.write('/');
    doc.write('2');
    assert_eq!(doc.get_markup(), "\\frac{ }{2}");
}

#[test]
fn test_live_fraction_keeps_big_operator_scripts_behind() {
    let mut doc = Document::new();
    doc.set_markup("\\sum_n k");
    doc.write('/');
    doc.write('2');
    // the sum and its subscript stay outside; only the k is stolen
    assert_eq!(doc.get_markup(), "\\sum_n\\frac{k}{2}");
}

#[test]
fn test_close_bracket_coalesces_with_matching_open() {
    let mut doc = Document::new();
    doc.write('(');
    doc.write('1');
    doc.write(')');
    assert_eq!(doc.get_markup(), "\\left(1\\right)");
    // the cursor exited the bracket
    assert_eq!(doc.cursor_position().parent, doc.root());
    assert!(doc.cursor_position().prev.is_some());
}

#[test]
fn test_close_bracket_without_match_stands_alone() {
    let mut doc = Document::new();
    doc.write(')');
    assert_eq!(doc.get_markup(), "\\left(\\right)");
    // a close paren does not put the cursor inside itself
    assert_eq!(doc.cursor_position().parent, doc.root());
}

#[test]
fn test_mismatched_close_bracket_nests() {
    let mut doc = Document::new();
    doc.write('(');
    doc.write(']');
    // no coalescing across different bracket families
    assert_eq!(doc.get_markup(), "\\left(\\left[\\right]\\right)");
}

#[test]
fn test_pipes_enter_and_coalesce() {
    let mut doc = Document::new();
    doc.write('|');
    doc.write('x');
    doc.write('|');
    assert_eq!(doc.get_markup(), "\\left|x\\right|");
    assert_eq!(doc.cursor_position().parent, doc.root());
}

#[test]
fn test_typing_into_bracket_after_coalesce() {
    let mut doc = Document::new();
    doc.write('(');
    doc.write('x');
    doc.write(')');
    doc.write('+');
    doc.write('y');
    assert_eq!(doc.get_markup(), "\\left(x\\right)+y");
}

#[test]
fn test_insert_at_cursor_writes_each_character() {
    let mut doc = Document::new();
    doc.set_markup("x");
    doc.insert_at_cursor("+2");
    assert_eq!(doc.get_markup(), "x+2");
}

#[test]
fn test_florin_is_a_catalog_symbol() {
    let mut doc = Document::new();
    doc.write('f');
    assert_eq!(doc.get_markup(), "f");
    // uppercase F stays a plain variable
    doc.write('F');
    assert_eq!(doc.get_markup(), "fF");
}

#[test]
fn test_space_types_a_thin_space() {
    let mut doc = Document::new();
    doc.write('a');
    doc.write(' ');
    doc.write('b');
    assert_eq!(doc.get_markup(), "a\\:b");
}
