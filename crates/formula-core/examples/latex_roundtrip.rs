//! Markup round-trip example
//!
//! Parses a formula from markup, inspects the resulting tree, and
//! serializes it back.

use formula_core::Document;

fn main() {
    println!("=== formula-core markup round-trip ===\n");

    let mut doc = Document::new();

    // 1. Parse a formula into the tree
    println!("1. Parsing:");
    let input = "\\frac{x+1}{2}+\\sqrt{y^2}";
    doc.set_markup(input);
    println!("  input:  {input}");
    println!("  output: {}\n", doc.get_markup());

    // 2. Walk the top-level commands
    println!("2. Top-level commands:");
    let root = doc.root();
    for (i, child) in doc.tree().children(root).enumerate() {
        let blocks = doc.tree().children(child).count();
        println!("  [{i}] {} argument block(s)", blocks);
        println!("      markup: {}", doc.node_markup(child));
    }
    println!();

    // 3. Truncated markup never fails, missing arguments render as blanks
    println!("3. Truncation tolerance:");
    for partial in ["\\frac{1}", "x^", "\\frac"] {
        doc.set_markup(partial);
        println!("  {partial:<10} -> {}", doc.get_markup());
    }
    println!();

    // 4. Unknown command names degrade to text
    println!("4. Unknown names:");
    doc.set_markup("\\foobar+1");
    println!("  \\foobar+1  -> {}", doc.get_markup());
}
