//! Typing session example
//!
//! Drives the document through `typed_char` and `keystroke` the way an
//! interactive frontend would, printing the markup after each step.

use formula_core::{Document, Key, KeyEvent};

fn show(doc: &Document, action: &str) {
    println!("  {action:<24} {}", doc.get_markup());
}

fn main() {
    println!("=== formula-core typing session ===\n");

    let mut doc = Document::new();

    // 1. Plain typing with automatic structure
    println!("1. Typing 'x^2+1/2':");
    for ch in "x^2".chars() {
        doc.typed_char(ch);
    }
    show(&doc, "x^2");
    // leave the exponent before continuing the sum
    doc.keystroke(KeyEvent::plain(Key::Right));
    doc.typed_char('+');
    show(&doc, "+");
    for ch in "1/2".chars() {
        doc.typed_char(ch);
    }
    // '/' promoted the 1 into a live fraction
    show(&doc, "1/2");
    println!();

    // 2. Command composition with backslash
    println!("2. Composing \\sqrt:");
    doc.keystroke(KeyEvent::plain(Key::Right));
    doc.typed_char('+');
    for ch in "\\sqrt".chars() {
        doc.typed_char(ch);
    }
    doc.keystroke(KeyEvent::plain(Key::Enter));
    doc.typed_char('y');
    show(&doc, "\\sqrt then y");
    println!();

    // 3. Selection editing
    println!("3. Select-all, then replace with 'z':");
    doc.select_all();
    doc.typed_char('z');
    show(&doc, "z over selection");
    println!();

    // 4. Structural backspace
    println!("4. Backspace through a fraction:");
    doc.set_markup("\\frac{ab}{cd}");
    show(&doc, "start");
    doc.keystroke(KeyEvent::plain(Key::Backspace));
    show(&doc, "backspace (select)");
    doc.keystroke(KeyEvent::plain(Key::Backspace));
    show(&doc, "backspace (delete)");
}
