//! Directional selection: growing, shrinking, promotion to the enclosing
//! command, and what editing does to an active selection.

use formula_core::{Document, Key, KeyEvent};

#[test]
fn test_select_left_grows_and_select_right_shrinks() {
    let mut doc = Document::new();
    doc.set_markup("abc");

    doc.select_left();
    assert_eq!(doc.selection_markup().as_deref(), Some("c"));
    doc.select_left();
    assert_eq!(doc.selection_markup().as_deref(), Some("bc"));

    // the opposite gesture retracts instead of extending
    doc.select_right();
    assert_eq!(doc.selection_markup().as_deref(), Some("c"));
    doc.select_right();
    assert!(!doc.has_selection());
}

#[test]
fn test_selection_survives_direction_roundtrip() {
    let mut doc = Document::new();
    doc.set_markup("abc");

    doc.move_left();
    doc.move_left(); // between a and b
    doc.select_right();
    assert_eq!(doc.selection_markup().as_deref(), Some("b"));
    doc.select_right();
    assert_eq!(doc.selection_markup().as_deref(), Some("bc"));
    doc.select_left();
    assert_eq!(doc.selection_markup().as_deref(), Some("b"));
}

#[test]
fn test_selection_promotes_to_enclosing_command() {
    let mut doc = Document::new();
    doc.set_markup("\\frac{1}{2}");
    let frac = doc.tree().last_child(doc.root()).expect("fraction present");

    doc.move_left(); // denominator end
    doc.select_left(); // the 2
    assert_eq!(doc.selection_markup().as_deref(), Some("2"));

    // at the block edge the whole fraction becomes the selection
    doc.select_left();
    assert_eq!(doc.selection_markup().as_deref(), Some("\\frac{1}{2}"));
    assert_eq!(doc.cursor_position().parent, doc.root());
    assert_eq!(doc.cursor_position().next, Some(frac));
}

#[test]
fn test_select_left_at_root_start_is_noop() {
    let mut doc = Document::new();
    doc.set_markup("x");
    doc.move_left();
    doc.select_left();
    assert!(!doc.has_selection());
}

#[test]
fn test_arrow_collapses_selection_to_its_edge() {
    let mut doc = Document::new();
    doc.set_markup("abc");

    doc.select_left();
    doc.select_left(); // "bc" selected, cursor on the left edge
    doc.move_left();
    assert!(!doc.has_selection());
    let pos = doc.cursor_position();
    let children: Vec<_> = doc.tree().children(doc.root()).collect();
    assert_eq!(pos.next, Some(children[1])); // before the b

    doc.select_right();
    doc.move_right();
    assert_eq!(doc.cursor_position().prev, Some(children[1]));
}

#[test]
fn test_select_all() {
    let mut doc = Document::new();
    doc.set_markup("\\frac{1}{2}+x");
    doc.select_all();
    assert_eq!(doc.selection_markup().as_deref(), Some("\\frac{1}{2}+x"));
}

#[test]
fn test_delete_selection_closes_the_gap() {
    let mut doc = Document::new();
    doc.set_markup("abc");
    doc.move_left();
    doc.select_left(); // the b
    assert!(doc.delete_selection());
    assert_eq!(doc.get_markup(), "ac");
    assert!(!doc.has_selection());
    assert!(!doc.delete_selection());
}

#[test]
fn test_typing_a_symbol_replaces_the_selection() {
    let mut doc = Document::new();
    doc.set_markup("12");
    doc.select_left();
    doc.write('3');
    assert_eq!(doc.get_markup(), "13");
}

#[test]
fn test_typing_a_script_swallows_the_selection() {
    let mut doc = Document::new();
    doc.set_markup("x+1");
    doc.select_left();
    doc.write('^');
    assert_eq!(doc.get_markup(), "x+^1");
}

#[test]
fn test_typing_a_bracket_wraps_the_selection() {
    let mut doc = Document::new();
    doc.set_markup("x+1");
    doc.select_all();
    doc.write('(');
    assert_eq!(doc.get_markup(), "\\left(x+1\\right)");
}

#[test]
fn test_shift_arrows_route_through_the_key_table() {
    let mut doc = Document::new();
    doc.set_markup("xy");
    assert!(doc.keystroke(KeyEvent::shifted(Key::Left)));
    assert_eq!(doc.selection_markup().as_deref(), Some("y"));

    // shift-up extends to the start of the block
    assert!(doc.keystroke(KeyEvent::shifted(Key::Up)));
    assert_eq!(doc.selection_markup().as_deref(), Some("xy"));
}

#[test]
fn test_backspace_deletes_an_active_selection() {
    let mut doc = Document::new();
    doc.set_markup("abc");
    doc.select_left();
    doc.select_left();
    doc.backspace();
    assert_eq!(doc.get_markup(), "a");
    assert!(!doc.has_selection());
}
