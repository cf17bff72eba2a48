//! Registry: immutable lookup tables from markup names and typed characters
//! to catalog entries.
//!
//! Built once at first use and never mutated afterwards; shared by every
//! document in the process.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::catalog::{self, CommandSpec};

/// The process-wide command lookup tables.
pub struct Registry {
    names: HashMap<String, CommandSpec>,
    chars: HashMap<char, CommandSpec>,
}

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let mut names = HashMap::new();
    let mut chars = HashMap::new();
    catalog::populate(&mut names, &mut chars);
    Registry { names, chars }
});

impl Registry {
    /// The shared registry instance.
    pub fn global() -> &'static Registry {
        &REGISTRY
    }

    /// Resolve a markup command name (without the leading backslash) or a
    /// single-character markup token. Used by the parser and by the command
    /// composer when a typed name materializes.
    pub fn resolve_name(&self, name: &str) -> Option<&CommandSpec> {
        self.names.get(name)
    }

    /// Resolve a typed character: the typed-character table first, then the
    /// name table (single-character names like `^`, `_`, `+`).
    pub fn resolve_char(&self, ch: char) -> Option<&CommandSpec> {
        self.chars
            .get(&ch)
            .or_else(|| self.names.get(ch.to_string().as_str()))
    }

    /// Number of registered names (diagnostic).
    pub fn name_count(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CommandKind;

    #[test]
    fn test_aliases_resolve_to_same_token() {
        let reg = Registry::global();
        let frac = reg.resolve_name("frac").unwrap();
        let fraction = reg.resolve_name("fraction").unwrap();
        assert_eq!(frac.token, fraction.token);
        assert_eq!(frac.kind, CommandKind::Fraction);
    }

    #[test]
    fn test_typed_char_and_name_tables_differ() {
        let reg = Registry::global();
        // Typing `*` produces \cdot, but `*` is not a markup name.
        assert!(reg.resolve_char('*').is_some());
        assert!(reg.resolve_name("*").is_none());
        // `^` reaches the scripts through the name table from both paths.
        assert_eq!(
            reg.resolve_char('^').unwrap().kind,
            CommandKind::SupSub
        );
        assert_eq!(
            reg.resolve_name("^").unwrap().kind,
            CommandKind::SupSub
        );
    }

    #[test]
    fn test_generated_trig_family() {
        let reg = Registry::global();
        for name in ["sin", "sinh", "asin", "arcsin", "asinh", "arcsinh"] {
            let spec = reg.resolve_name(name).unwrap();
            assert_eq!(spec.kind, CommandKind::NamedFunction);
            assert_eq!(spec.token, format!("\\{name} "));
        }
    }

    #[test]
    fn test_greek_tokens_keep_trailing_space() {
        let reg = Registry::global();
        assert_eq!(reg.resolve_name("alpha").unwrap().token, "\\alpha ");
        assert_eq!(reg.resolve_name("pi").unwrap().token, "\\pi ");
    }
}
