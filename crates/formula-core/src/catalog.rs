//! Command catalog: the closed set of node kinds and the table of concrete
//! commands (with their markup tokens, display templates and aliases).
//!
//! Most entries are table-driven instances of a handful of patterns; the
//! interesting per-kind behavior (cursor homing, respacing, redraw, key
//! interception) is dispatched on [`CommandKind`] in the cursor and document
//! modules. Defaults live once; overrides are explicit per variant.

use std::collections::HashMap;

use crate::tree::NodeId;

/// The closed variant set of command node kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    /// An italicized letter variable.
    Variable,
    /// A plain atomic symbol with no contextual behavior.
    Plain,
    /// A relation or operation rendered with binary spacing.
    BinaryOperator,
    /// `+`/`-`/`±`/`∓`: binary operators that respace to unary in prefix
    /// position.
    PlusMinus,
    /// Sum/product/coproduct/integral.
    BigOperator,
    /// Upright named function (`sin`, `log`, ...); respaces when followed by
    /// a script or bracket.
    NamedFunction,
    /// Superscript (`^`) or subscript (`_`); one child block.
    SupSub,
    /// Two-block fraction.
    Fraction,
    /// Fraction typed as `/`: steals the preceding operand run into its
    /// numerator on insertion.
    LiveFraction,
    /// Square root; one child block.
    Root,
    /// Any paired delimiter. `end` is the canonical closing token used both
    /// for serialization and for open/close pair matching; `closing` marks
    /// close-delimiter commands (they coalesce with a matching enclosing
    /// open delimiter instead of nesting); `enters` controls whether the
    /// cursor moves inside when no coalescing happens (pipes do, close
    /// parens do not).
    Bracket {
        /// Closing markup token, e.g. `"\\right)"`.
        end: &'static str,
        /// True for close-delimiter commands.
        closing: bool,
        /// Whether the cursor enters the child block on plain insertion.
        enters: bool,
    },
    /// Free-text island (`\text{...}`, toggled with `$`).
    TextBlock,
    /// Interactive backslash-command composer: letters accumulate in its
    /// child block until the name is materialized.
    CommandInput,
    /// Two-block binomial coefficient.
    Binomial,
    /// `\choose`: a binomial with live-fraction cursor homing.
    ChooseBinomial,
    /// Column vector; starts with one row block, rows are added by editing.
    Vector,
}

impl CommandKind {
    /// Number of child argument blocks created at construction.
    pub fn arity(&self) -> usize {
        match self {
            CommandKind::Variable
            | CommandKind::Plain
            | CommandKind::BinaryOperator
            | CommandKind::PlusMinus
            | CommandKind::BigOperator
            | CommandKind::NamedFunction => 0,
            CommandKind::SupSub
            | CommandKind::Root
            | CommandKind::Bracket { .. }
            | CommandKind::TextBlock
            | CommandKind::CommandInput
            | CommandKind::Vector => 1,
            CommandKind::Fraction
            | CommandKind::LiveFraction
            | CommandKind::Binomial
            | CommandKind::ChooseBinomial => 2,
        }
    }

    /// True for kinds that act as a binary operator for respacing and for
    /// the live fraction's operand-run lookbehind.
    pub fn is_operator(&self) -> bool {
        matches!(self, CommandKind::BinaryOperator | CommandKind::PlusMinus)
    }

    /// True when a selection swallowed by this command lands in its first
    /// child block (structural commands), false when the selection is
    /// consumed otherwise (symbols delete it, text blocks flatten it to
    /// characters, the command composer keeps it pending).
    pub fn swallows_selection(&self) -> bool {
        self.arity() > 0
            && !matches!(self, CommandKind::TextBlock | CommandKind::CommandInput)
    }
}

/// Per-node command payload stored in the arena.
#[derive(Debug, Clone)]
pub struct CommandData {
    /// Node kind; fixed for the node's lifetime.
    pub kind: CommandKind,
    /// Canonical markup spelling (trailing space included where the
    /// notation requires a separator, e.g. `"\\pm "`).
    pub token: String,
    /// Rendering template handed to the view layer.
    pub display: String,
    /// Limit-style bookkeeping (scripts attached to an integral).
    pub limit: bool,
    /// Stacked sup/sub pair bookkeeping for respace chaining.
    pub respaced: bool,
    /// Detached block holding a selection swallowed by the command
    /// composer, reattached when the typed name materializes.
    pub pending: Option<NodeId>,
}

impl CommandData {
    /// Payload with the given kind, token and display template.
    pub fn new(kind: CommandKind, token: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            kind,
            token: token.into(),
            display: display.into(),
            limit: false,
            respaced: false,
            pending: None,
        }
    }

    /// An italicized letter variable.
    pub fn variable(ch: char) -> Self {
        Self::new(CommandKind::Variable, ch.to_string(), ch.to_string())
    }

    /// A plain symbol whose token is the character itself.
    pub fn plain_char(ch: char) -> Self {
        Self::new(CommandKind::Plain, ch.to_string(), ch.to_string())
    }
}

/// One resolvable catalog entry.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Node kind constructed for this entry.
    pub kind: CommandKind,
    /// Canonical markup token.
    pub token: String,
    /// Display template.
    pub display: String,
}

impl CommandSpec {
    fn new(kind: CommandKind, token: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            kind,
            token: token.into(),
            display: display.into(),
        }
    }

    /// Instantiate the per-node payload.
    pub fn data(&self) -> CommandData {
        CommandData::new(self.kind.clone(), self.token.clone(), self.display.clone())
    }
}

/// `(aliases, kind, token, display)` rows for the symbol bulk of the
/// catalog. Structural kinds and generated families are added in
/// [`populate`].
#[rustfmt::skip]
const SYMBOLS: &[(&[&str], CommandKind, &str, &str)] = &[
    // Florin: `f` serializes as itself but renders as the florin glyph,
    // which is why plain `f` is excluded from the variable fast path.
    (&["f"], CommandKind::Variable, "f", "ƒ"),
    (&["prime"], CommandKind::Plain, "'", "′"),
    (&["@"], CommandKind::Plain, "@", "@"),
    (&["&"], CommandKind::Plain, "\\&", "&"),
    (&["%"], CommandKind::Plain, "\\%", "%"),

    // Greek variants whose aliases disagree across standards.
    (&["phi"], CommandKind::Variable, "\\phi ", "ϕ"),
    (&["phiv", "varphi"], CommandKind::Variable, "\\varphi ", "φ"),
    (&["epsilon"], CommandKind::Variable, "\\epsilon ", "ϵ"),
    (&["epsiv", "varepsilon"], CommandKind::Variable, "\\varepsilon ", "ε"),
    (&["sigmaf", "sigmav", "varsigma"], CommandKind::Variable, "\\varsigma ", "ς"),
    (&["upsilon", "upsi"], CommandKind::Variable, "\\upsilon ", "υ"),
    (&["gammad", "Gammad", "digamma"], CommandKind::Variable, "\\digamma ", "ϝ"),
    (&["kappav", "varkappa"], CommandKind::Variable, "\\varkappa ", "ϰ"),
    (&["piv", "varpi"], CommandKind::Variable, "\\varpi ", "ϖ"),
    (&["rhov", "varrho"], CommandKind::Variable, "\\varrho ", "ϱ"),
    (&["thetav", "vartheta"], CommandKind::Variable, "\\vartheta ", "ϑ"),
    (&["Upsilon", "Upsi"], CommandKind::Variable, "\\Upsilon ", "Υ"),
    (&["pi"], CommandKind::Plain, "\\pi ", "π"),
    (&["lambda"], CommandKind::Plain, "\\lambda ", "λ"),

    // Plus/minus family (unary-vs-binary respacing).
    (&["+"], CommandKind::PlusMinus, "+", "+"),
    (&["-"], CommandKind::PlusMinus, "-", "−"),
    (&["pm", "plusmn", "plusminus"], CommandKind::PlusMinus, "\\pm ", "±"),
    (&["mp", "mnplus", "minusplus"], CommandKind::PlusMinus, "\\mp ", "∓"),

    // Binary operators and relations.
    (&["sdot", "cdot"], CommandKind::BinaryOperator, "\\cdot ", "·"),
    (&["="], CommandKind::BinaryOperator, "=", "="),
    (&["<", "lt"], CommandKind::BinaryOperator, "<", "<"),
    (&[">", "gt"], CommandKind::BinaryOperator, ">", ">"),
    (&["notin"], CommandKind::BinaryOperator, "\\notin ", "∉"),
    (&["sim"], CommandKind::BinaryOperator, "\\sim ", "∼"),
    (&["cong"], CommandKind::BinaryOperator, "\\cong ", "≅"),
    (&["equiv"], CommandKind::BinaryOperator, "\\equiv ", "≡"),
    (&["times"], CommandKind::BinaryOperator, "\\times ", "×"),
    (&["oplus"], CommandKind::BinaryOperator, "\\oplus ", "⊕"),
    (&["otimes"], CommandKind::BinaryOperator, "\\otimes ", "⊗"),
    (&["div", "divide", "divides"], CommandKind::BinaryOperator, "\\div ", "÷"),
    (&["ne", "neq"], CommandKind::BinaryOperator, "\\ne ", "≠"),
    (&["ast", "star", "loast", "lowast"], CommandKind::BinaryOperator, "\\ast ", "∗"),
    (&["therefor", "therefore"], CommandKind::BinaryOperator, "\\therefore ", "∴"),
    (&["cuz", "because"], CommandKind::BinaryOperator, "\\because ", "∵"),
    (&["prop", "propto"], CommandKind::BinaryOperator, "\\propto ", "∝"),
    (&["asymp", "approx"], CommandKind::BinaryOperator, "\\approx ", "≈"),
    (&["le", "leq"], CommandKind::BinaryOperator, "\\le ", "≤"),
    (&["ge", "geq"], CommandKind::BinaryOperator, "\\ge ", "≥"),
    (&["isin", "in"], CommandKind::BinaryOperator, "\\in ", "∈"),
    (&["ni", "contains"], CommandKind::BinaryOperator, "\\ni ", "∋"),
    (&["notni", "niton", "notcontains", "doesnotcontain"],
        CommandKind::BinaryOperator, "\\not\\ni ", "∌"),
    (&["sub", "subset"], CommandKind::BinaryOperator, "\\subset ", "⊂"),
    (&["sup", "supset", "superset"], CommandKind::BinaryOperator, "\\supset ", "⊃"),
    (&["nsub", "notsub", "nsubset", "notsubset"],
        CommandKind::BinaryOperator, "\\not\\subset ", "⊄"),
    (&["nsup", "notsup", "nsupset", "notsupset", "nsuperset", "notsuperset"],
        CommandKind::BinaryOperator, "\\not\\supset ", "⊅"),
    (&["sube", "subeq", "subsete", "subseteq"],
        CommandKind::BinaryOperator, "\\subseteq ", "⊆"),
    (&["supe", "supeq", "supsete", "supseteq", "supersete", "superseteq"],
        CommandKind::BinaryOperator, "\\supseteq ", "⊇"),
    (&["nsube", "nsubeq", "notsube", "notsubeq", "nsubsete", "nsubseteq",
        "notsubsete", "notsubseteq"],
        CommandKind::BinaryOperator, "\\not\\subseteq ", "⊈"),
    (&["nsupe", "nsupeq", "notsupe", "notsupeq", "nsupsete", "nsupseteq",
        "notsupsete", "notsupseteq", "nsupersete", "nsuperseteq",
        "notsupersete", "notsuperseteq"],
        CommandKind::BinaryOperator, "\\not\\supseteq ", "⊉"),
    (&["to"], CommandKind::BinaryOperator, "\\to ", "→"),
    (&["implies"], CommandKind::BinaryOperator, "\\Rightarrow ", "⇒"),
    (&["gets"], CommandKind::BinaryOperator, "\\gets ", "←"),
    (&["impliedby"], CommandKind::BinaryOperator, "\\Leftarrow ", "⇐"),
    (&["iff"], CommandKind::BinaryOperator, "\\Leftrightarrow ", "⇔"),
    (&["o", "O", "empty", "emptyset", "oslash", "Oslash", "nothing", "varnothing"],
        CommandKind::BinaryOperator, "\\varnothing ", "∅"),

    // Big operators.
    (&["sum", "summation"], CommandKind::BigOperator, "\\sum ", "∑"),
    (&["prod", "product"], CommandKind::BigOperator, "\\prod ", "∏"),
    (&["coprod", "coproduct"], CommandKind::BigOperator, "\\coprod ", "∐"),
    (&["int", "integral"], CommandKind::BigOperator, "\\int ", "∫"),

    // Blackboard-bold number sets.
    (&["N", "naturals", "Naturals"], CommandKind::Plain, "\\mathbb{N}", "ℕ"),
    (&["P", "primes", "Primes", "projective", "Projective", "probability", "Probability"],
        CommandKind::Plain, "\\mathbb{P}", "ℙ"),
    (&["Z", "integers", "Integers"], CommandKind::Plain, "\\mathbb{Z}", "ℤ"),
    (&["Q", "rationals", "Rationals"], CommandKind::Plain, "\\mathbb{Q}", "ℚ"),
    (&["R", "reals", "Reals"], CommandKind::Plain, "\\mathbb{R}", "ℝ"),
    (&["C", "complex", "Complex", "complexes", "Complexes",
        "complexplane", "Complexplane", "ComplexPlane"],
        CommandKind::Plain, "\\mathbb{C}", "ℂ"),
    (&["H", "Hamiltonian", "quaternions", "Quaternions"],
        CommandKind::Plain, "\\mathbb{H}", "ℍ"),

    // Spacing.
    (&["quad", "emsp"], CommandKind::Plain, "\\quad ", "    "),
    (&["qquad"], CommandKind::Plain, "\\qquad ", "        "),

    // Assorted symbols.
    (&["caret"], CommandKind::Plain, "\\caret ", "^"),
    (&["underscore"], CommandKind::Plain, "\\underscore ", "_"),
    (&["backslash"], CommandKind::Plain, "\\backslash ", "\\"),
    (&["vert"], CommandKind::Plain, "|", "|"),
    (&["perp", "perpendicular"], CommandKind::Plain, "\\perp ", "⊥"),
    (&["nabla", "del"], CommandKind::Plain, "\\nabla ", "∇"),
    (&["hbar"], CommandKind::Plain, "\\hbar ", "ℏ"),
    (&["AA", "Angstrom", "angstrom"], CommandKind::Plain, "\\text\\AA ", "Å"),
    (&["ring", "circ", "circle"], CommandKind::Plain, "\\circ ", "∘"),
    (&["bull", "bullet"], CommandKind::Plain, "\\bullet ", "•"),
    (&["setminus", "smallsetminus"], CommandKind::Plain, "\\setminus ", "∖"),
    (&["not", "neg"], CommandKind::Plain, "\\neg ", "¬"),
    (&["dots", "ellip", "hellip", "ellipsis", "hellipsis"],
        CommandKind::Plain, "\\dots ", "…"),
    (&["converges", "darr", "dnarr", "dnarrow", "downarrow"],
        CommandKind::Plain, "\\downarrow ", "↓"),
    (&["dArr", "dnArr", "dnArrow", "Downarrow"], CommandKind::Plain, "\\Downarrow ", "⇓"),
    (&["diverges", "uarr", "uparrow"], CommandKind::Plain, "\\uparrow ", "↑"),
    (&["uArr", "Uparrow"], CommandKind::Plain, "\\Uparrow ", "⇑"),
    (&["rarr", "rightarrow"], CommandKind::Plain, "\\rightarrow ", "→"),
    (&["rArr", "Rightarrow"], CommandKind::Plain, "\\Rightarrow ", "⇒"),
    (&["larr", "leftarrow"], CommandKind::Plain, "\\leftarrow ", "←"),
    (&["lArr", "Leftarrow"], CommandKind::Plain, "\\Leftarrow ", "⇐"),
    (&["harr", "lrarr", "leftrightarrow"], CommandKind::Plain, "\\leftrightarrow ", "↔"),
    (&["hArr", "lrArr", "Leftrightarrow"], CommandKind::Plain, "\\Leftrightarrow ", "⇔"),
    (&["Re", "Real", "real"], CommandKind::Plain, "\\Re ", "ℜ"),
    (&["Im", "imag", "image", "imagin", "imaginary", "Imaginary"],
        CommandKind::Plain, "\\Im ", "ℑ"),
    (&["part", "partial"], CommandKind::Plain, "\\partial ", "∂"),
    (&["inf", "infin", "infty", "infinity"], CommandKind::Plain, "\\infty ", "∞"),
    (&["alef", "alefsym", "aleph", "alephsym"], CommandKind::Plain, "\\aleph ", "ℵ"),
    (&["xist", "xists", "exist", "exists"], CommandKind::Plain, "\\exists ", "∃"),
    (&["and", "land", "wedge"], CommandKind::Plain, "\\wedge ", "∧"),
    (&["or", "lor", "vee"], CommandKind::Plain, "\\vee ", "∨"),
    (&["cup", "union"], CommandKind::Plain, "\\cup ", "∪"),
    (&["cap", "intersect", "intersection"], CommandKind::Plain, "\\cap ", "∩"),
    (&["deg", "degree"], CommandKind::Plain, "^\\circ ", "°"),
    (&["ang", "angle"], CommandKind::Plain, "\\angle ", "∠"),
];

/// Lowercase Greek letters sharing the `\name ` token pattern.
const GREEK_LOWER: &[(&str, &str)] = &[
    ("alpha", "α"),
    ("beta", "β"),
    ("gamma", "γ"),
    ("delta", "δ"),
    ("zeta", "ζ"),
    ("eta", "η"),
    ("theta", "θ"),
    ("iota", "ι"),
    ("kappa", "κ"),
    ("mu", "μ"),
    ("nu", "ν"),
    ("xi", "ξ"),
    ("rho", "ρ"),
    ("sigma", "σ"),
    ("tau", "τ"),
    ("chi", "χ"),
    ("psi", "ψ"),
    ("omega", "ω"),
];

/// Uppercase Greek letters and quantifiers with the same token pattern.
const GREEK_UPPER: &[(&str, &str)] = &[
    ("Gamma", "Γ"),
    ("Delta", "Δ"),
    ("Theta", "Θ"),
    ("Lambda", "Λ"),
    ("Xi", "Ξ"),
    ("Pi", "Π"),
    ("Sigma", "Σ"),
    ("Phi", "Φ"),
    ("Psi", "Ψ"),
    ("Omega", "Ω"),
    ("forall", "∀"),
];

/// Upright function names without the trig family.
const NAMED_FUNCTIONS: &[&str] = &[
    "ln", "lg", "log", "span", "proj", "det", "dim", "min", "max", "mod", "lcm", "gcd", "gcf",
    "hcf", "lim",
];

/// Trig roots; each expands to the plain, hyperbolic, arc and arc-hyperbolic
/// spellings.
const TRIG: &[&str] = &["sin", "cos", "tan", "sec", "cosec", "csc", "cotan", "cot"];

fn bracket(end: &'static str, closing: bool, enters: bool) -> CommandKind {
    CommandKind::Bracket {
        end,
        closing,
        enters,
    }
}

/// Fill the name→spec and typed-char→spec tables.
///
/// The two tables are deliberately not symmetric: parsing resolves only
/// names (so a literal `*` in markup stays a plain star, while typing `*`
/// produces `\cdot`), and several structural commands are reachable only by
/// typing (`/` for the live fraction, `$` for a text block, `\` for the
/// command composer).
pub(crate) fn populate(
    names: &mut HashMap<String, CommandSpec>,
    chars: &mut HashMap<char, CommandSpec>,
) {
    let mut add = |aliases: &[&str], spec: CommandSpec| {
        for alias in aliases {
            names.insert((*alias).to_string(), spec.clone());
        }
    };

    for (aliases, kind, token, display) in SYMBOLS {
        add(aliases, CommandSpec::new(kind.clone(), *token, *display));
    }
    for (name, display) in GREEK_LOWER {
        add(
            &[name],
            CommandSpec::new(CommandKind::Variable, format!("\\{name} "), *display),
        );
    }
    for (name, display) in GREEK_UPPER {
        add(
            &[name],
            CommandSpec::new(CommandKind::Plain, format!("\\{name} "), *display),
        );
    }
    for name in NAMED_FUNCTIONS {
        add(
            &[name],
            CommandSpec::new(CommandKind::NamedFunction, format!("\\{name} "), *name),
        );
    }
    for root in TRIG {
        for name in [
            (*root).to_string(),
            format!("{root}h"),
            format!("a{root}"),
            format!("arc{root}"),
            format!("a{root}h"),
            format!("arc{root}h"),
        ] {
            let spec = CommandSpec::new(CommandKind::NamedFunction, format!("\\{name} "), &name);
            add(&[&name], spec);
        }
    }

    // Scripts.
    add(
        &["subscript", "_"],
        CommandSpec::new(CommandKind::SupSub, "_", "_"),
    );
    add(
        &["superscript", "supscript", "^"],
        CommandSpec::new(CommandKind::SupSub, "^", "^"),
    );

    // Structural commands.
    add(
        &["frac", "fraction"],
        CommandSpec::new(CommandKind::Fraction, "\\frac", "⁄"),
    );
    add(&["sqrt"], CommandSpec::new(CommandKind::Root, "\\sqrt", "√"));
    add(
        &["binom", "binomial"],
        CommandSpec::new(CommandKind::Binomial, "\\binom", "binom"),
    );
    add(
        &["choose"],
        CommandSpec::new(CommandKind::ChooseBinomial, "\\binom", "binom"),
    );
    add(
        &["vector"],
        CommandSpec::new(CommandKind::Vector, "\\vector", "vec"),
    );
    add(
        &["text"],
        CommandSpec::new(CommandKind::TextBlock, "\\text", "text"),
    );

    // Delimiters. Open and close are independent commands; pairing happens
    // at insertion time (close coalesces into a matching enclosing open).
    let lparen = CommandSpec::new(bracket("\\right)", false, true), "\\left(", "(");
    let rparen = CommandSpec::new(bracket("\\right)", true, false), "\\left(", ")");
    let lbrack = CommandSpec::new(bracket("\\right]", false, true), "\\left[", "[");
    let rbrack = CommandSpec::new(bracket("\\right]", true, false), "\\left[", "]");
    let lbrace = CommandSpec::new(bracket("\\right\\}", false, true), "\\left\\{", "{");
    let rbrace = CommandSpec::new(bracket("\\right\\}", true, false), "\\left\\{", "}");
    let langle = CommandSpec::new(
        bracket("\\right\\rangle ", false, true),
        "\\left\\langle ",
        "⟨",
    );
    let rangle = CommandSpec::new(
        bracket("\\right\\rangle ", true, false),
        "\\left\\langle ",
        "⟩",
    );
    let pipes = CommandSpec::new(bracket("\\right|", true, true), "\\left|", "|");

    add(&["lparen"], lparen.clone());
    add(&["rparen"], rparen.clone());
    add(&["lbrack", "lbracket"], lbrack.clone());
    add(&["rbrack", "rbracket"], rbrack.clone());
    add(&["lbrace"], lbrace.clone());
    add(&["rbrace"], rbrace.clone());
    add(&["langle", "lang"], langle);
    add(&["rangle", "rang"], rangle);
    add(&["lpipe", "rpipe"], pipes.clone());

    // Typed-character table.
    chars.insert(' ', CommandSpec::new(CommandKind::Plain, "\\:", " "));
    chars.insert('\'', CommandSpec::new(CommandKind::Plain, "'", "′"));
    chars.insert('*', CommandSpec::new(CommandKind::BinaryOperator, "\\cdot ", "·"));
    chars.insert('/', CommandSpec::new(CommandKind::LiveFraction, "\\frac", "⁄"));
    chars.insert('$', CommandSpec::new(CommandKind::TextBlock, "\\text", "text"));
    chars.insert('\\', CommandSpec::new(CommandKind::CommandInput, "\\", "\\"));
    chars.insert('(', lparen);
    chars.insert(')', rparen);
    chars.insert('[', lbrack);
    chars.insert(']', rbrack);
    chars.insert('{', lbrace);
    chars.insert('}', rbrace);
    chars.insert('|', pipes);
}
