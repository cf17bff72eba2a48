//! Parser and serializer behavior: round-trips, normalization, and the
//! error-free handling of malformed markup.

use formula_core::{CommandKind, Document};

fn markup_of(input: &str) -> String {
    let mut doc = Document::new();
    doc.set_markup(input);
    doc.get_markup()
}

#[test]
fn test_parse_simple_run() {
    let mut doc = Document::new();
    doc.set_markup("\\frac{1}{2}+x");

    let root = doc.root();
    let children: Vec<_> = doc.tree().children(root).collect();
    assert_eq!(children.len(), 3);
    assert!(matches!(
        doc.tree().kind(children[0]),
        Some(CommandKind::Fraction)
    ));
    assert!(matches!(
        doc.tree().kind(children[1]),
        Some(CommandKind::PlusMinus)
    ));
    assert!(matches!(
        doc.tree().kind(children[2]),
        Some(CommandKind::Variable)
    ));

    // the fraction has two argument blocks
    let blocks: Vec<_> = doc.tree().children(children[0]).collect();
    assert_eq!(blocks.len(), 2);
    assert_eq!(doc.node_markup(blocks[0]), "1");
    assert_eq!(doc.node_markup(blocks[1]), "2");
}

#[test]
fn test_roundtrip_is_fixed_point() {
    for markup in [
        "x",
        "x+y",
        "x^2",
        "x_i^2",
        "\\frac{1}{2}+x",
        "\\sqrt{x+1}",
        "\\alpha+\\beta",
        "\\alpha x",
        "\\pm x",
        "\\left(x+1\\right)",
        "\\left|x\\right|",
        "\\sum x",
        "\\int_0^1x",
        "\\text{hello}",
        "\\binom{n}{k}",
        "\\sin x",
        "a\\cdot b",
    ] {
        let mut doc = Document::new();
        doc.set_markup(markup);
        let first = doc.get_markup();
        doc.set_markup(&first);
        assert_eq!(doc.get_markup(), first, "not a fixed point: {markup}");
    }
}

#[test]
fn test_scripts_brace_only_multichar_arguments() {
    assert_eq!(markup_of("x^{2}"), "x^2");
    assert_eq!(markup_of("x^{25}"), "x^{25}");
    assert_eq!(markup_of("x_{i}"), "x_i");
    assert_eq!(markup_of("x^{\\alpha}"), "x^{\\alpha}");
}

#[test]
fn test_normalization_keeps_space_only_before_letters() {
    assert_eq!(markup_of("\\pm x"), "\\pm x");
    assert_eq!(markup_of("\\pm+"), "\\pm+");
    assert_eq!(markup_of("\\alpha"), "\\alpha");
    assert_eq!(markup_of("\\alpha\\beta"), "\\alpha\\beta");
    assert_eq!(markup_of("\\alpha b"), "\\alpha b");
}

#[test]
fn test_parse_ignores_whitespace() {
    assert_eq!(markup_of("x + y"), markup_of("x+y"));
    assert_eq!(markup_of("\\frac { 1 } { 2 }"), markup_of("\\frac{1}{2}"));
}

#[test]
fn test_unknown_command_becomes_text() {
    assert_eq!(markup_of("\\foobar"), "\\text{foobar}");
}

#[test]
fn test_truncated_input_fills_placeholders() {
    // missing arguments serialize as blank placeholders instead of erroring
    assert_eq!(markup_of("\\frac{1}"), "\\frac{1}{ }");
    assert_eq!(markup_of("x^"), "x^{ }");
    assert_eq!(markup_of("\\frac"), "\\frac{ }{ }");
}

#[test]
fn test_unbalanced_braces_truncate() {
    assert_eq!(markup_of("\\frac{1}{2"), "\\frac{1}{2}");
    assert_eq!(markup_of("{x"), "{x");
}

#[test]
fn test_star_is_literal_only_when_parsed() {
    // parsing resolves names only, so a literal star survives; typing the
    // same character produces \cdot
    assert_eq!(markup_of("1*2"), "1*2");

    let mut doc = Document::new();
    doc.write('1');
    doc.write('*');
    doc.write('2');
    assert_eq!(doc.get_markup(), "1\\cdot2");
}

#[test]
fn test_bare_paren_is_plain_when_parsed() {
    // a bare ( without \left has no name-table entry
    assert_eq!(markup_of("(x)"), "(x)");
    assert_eq!(markup_of("\\left(x\\right)"), "\\left(x\\right)");
}

#[test]
fn test_delimiter_commands_by_name() {
    assert_eq!(markup_of("\\lparen{x}"), "\\left(x\\right)");
    assert_eq!(markup_of("\\lbrace{x}"), "\\left\\{x\\right\\}");
    assert_eq!(
        markup_of("\\langle{x}"),
        "\\left\\langle x\\right\\rangle"
    );
    // a closing delimiter name on its own is an empty pair
    assert_eq!(markup_of("\\rparen"), "\\left(\\right)");
}

#[test]
fn test_text_block_content_is_raw() {
    assert_eq!(markup_of("\\text{hi there}"), "\\text{hithere}");
    assert_eq!(markup_of("\\text{a+b}"), "\\text{a+b}");
    // a backslash escapes the following token into the text
    assert_eq!(markup_of("\\text{a\\}b}"), "\\text{a}b}");
}

#[test]
fn test_trig_family_expansion() {
    assert_eq!(markup_of("\\sin x"), "\\sin x");
    assert_eq!(markup_of("\\arcsin x"), "\\arcsin x");
    assert_eq!(markup_of("\\sinh x"), "\\sinh x");
}

#[test]
fn test_florin_parses_as_f() {
    // `f` is a catalog symbol (florin), not a plain variable, but its
    // markup is still the letter
    assert_eq!(markup_of("f"), "f");
    assert_eq!(markup_of("f(x)"), "f(x)");
}

#[test]
fn test_empty_markup_gives_empty_document() {
    let mut doc = Document::new();
    doc.set_markup("");
    assert!(doc.is_empty());
    assert_eq!(doc.get_markup(), "");
}

#[test]
fn test_set_markup_replaces_previous_content() {
    let mut doc = Document::new();
    doc.set_markup("x+y");
    doc.set_markup("z");
    assert_eq!(doc.get_markup(), "z");
    assert_eq!(doc.tree().children(doc.root()).count(), 1);
}
