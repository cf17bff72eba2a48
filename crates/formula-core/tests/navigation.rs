//! Cursor movement: visual reading order, block entry/exit, and the
//! vertical/tab shortcuts of the root key table.

use formula_core::{CursorPosition, Document, Key, KeyEvent};

#[test]
fn test_move_left_descends_into_structures() {
    let mut doc = Document::new();
    doc.set_markup("\\frac{1}{2}");

    // set_markup leaves the cursor at the end of the root
    let frac = doc.tree().last_child(doc.root()).expect("fraction present");
    let numerator = doc.tree().first_child(frac).expect("numerator");
    let denominator = doc.tree().last_child(frac).expect("denominator");

    doc.move_left();
    assert_eq!(doc.cursor_position().parent, denominator);
    doc.move_left();
    doc.move_left();
    assert_eq!(doc.cursor_position().parent, numerator);
    doc.move_left();
    doc.move_left();
    // out on the left of the fraction
    assert_eq!(
        doc.cursor_position(),
        CursorPosition {
            parent: doc.root(),
            prev: None,
            next: Some(frac),
        }
    );
}

#[test]
fn test_move_right_mirrors_move_left() {
    let mut doc = Document::new();
    doc.set_markup("\\frac{1}{2}+x");

    // walk to the far left, recording every position
    let mut positions = vec![doc.cursor_position()];
    loop {
        let before = doc.cursor_position();
        doc.move_left();
        if doc.cursor_position() == before {
            break;
        }
        positions.push(doc.cursor_position());
    }

    // walking right replays the same positions in reverse
    for expected in positions.into_iter().rev().skip(1) {
        doc.move_right();
        assert_eq!(doc.cursor_position(), expected);
    }
}

#[test]
fn test_move_is_noop_at_root_edges() {
    let mut doc = Document::new();
    doc.set_markup("x");

    let end = doc.cursor_position();
    doc.move_right();
    assert_eq!(doc.cursor_position(), end);

    doc.move_left();
    let start = doc.cursor_position();
    doc.move_left();
    assert_eq!(doc.cursor_position(), start);
}

#[test]
fn test_symbols_are_hopped_not_entered() {
    let mut doc = Document::new();
    doc.set_markup("xy");
    let children: Vec<_> = doc.tree().children(doc.root()).collect();

    doc.move_left();
    assert_eq!(doc.cursor_position().next, Some(children[1]));
    assert_eq!(doc.cursor_position().parent, doc.root());
}

#[test]
fn test_up_down_between_fraction_blocks() {
    let mut doc = Document::new();
    doc.set_markup("\\frac{1}{2}");
    let frac = doc.tree().last_child(doc.root()).expect("fraction present");
    let numerator = doc.tree().first_child(frac).expect("numerator");
    let denominator = doc.tree().last_child(frac).expect("denominator");

    doc.move_left(); // into the denominator
    assert_eq!(doc.cursor_position().parent, denominator);

    assert!(doc.keystroke(KeyEvent::plain(Key::Up)));
    assert_eq!(doc.cursor_position().parent, numerator);

    assert!(doc.keystroke(KeyEvent::plain(Key::Down)));
    assert_eq!(doc.cursor_position().parent, denominator);
}

#[test]
fn test_tab_advances_argument_blocks() {
    let mut doc = Document::new();
    doc.set_markup("\\frac{1}{2}");
    let frac = doc.tree().last_child(doc.root()).expect("fraction present");
    let numerator = doc.tree().first_child(frac).expect("numerator");
    let denominator = doc.tree().last_child(frac).expect("denominator");

    doc.move_left();
    doc.keystroke(KeyEvent::plain(Key::Up));
    assert_eq!(doc.cursor_position().parent, numerator);

    assert!(doc.keystroke(KeyEvent::plain(Key::Tab)));
    assert_eq!(doc.cursor_position().parent, denominator);

    // tab out of the last block lands after the command
    assert!(doc.keystroke(KeyEvent::plain(Key::Tab)));
    assert_eq!(doc.cursor_position().parent, doc.root());
    assert_eq!(doc.cursor_position().prev, Some(frac));

    // at the root, tab is not consumed
    assert!(!doc.keystroke(KeyEvent::plain(Key::Tab)));
}

#[test]
fn test_home_and_end() {
    let mut doc = Document::new();
    doc.set_markup("\\frac{12}{34}");
    let frac = doc.tree().last_child(doc.root()).expect("fraction present");
    let denominator = doc.tree().last_child(frac).expect("denominator");

    doc.move_left(); // denominator end
    doc.keystroke(KeyEvent::plain(Key::Home));
    assert_eq!(
        doc.cursor_position(),
        CursorPosition {
            parent: denominator,
            prev: None,
            next: doc.tree().first_child(denominator),
        }
    );

    doc.keystroke(KeyEvent::plain(Key::End));
    assert_eq!(doc.cursor_position().parent, denominator);
    assert_eq!(doc.cursor_position().next, None);

    // ctrl-home escapes to the very start of the document
    doc.keystroke(KeyEvent::ctrl(Key::Home));
    assert_eq!(
        doc.cursor_position(),
        CursorPosition {
            parent: doc.root(),
            prev: None,
            next: Some(frac),
        }
    );
}

#[test]
fn test_ctrl_arrows_are_not_consumed() {
    let mut doc = Document::new();
    doc.set_markup("x+y");
    assert!(!doc.keystroke(KeyEvent::ctrl(Key::Left)));
    assert!(!doc.keystroke(KeyEvent::ctrl(Key::Right)));
}
