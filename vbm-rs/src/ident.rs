//! Identifier rules and naming styles.
//!
//! A binding name may contain only letters, digits, underscores and dollar
//! signs, must not start with a digit, and must not be a reserved word.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

const RESERVED: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "import", "in", "instanceof", "let", "new", "null", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("static regex"))
}

/// `true` if `name` has the shape of an identifier, reserved or not.
pub fn is_identifier_name(name: &str) -> bool {
    identifier_re().is_match(name)
}

/// `true` if `name` may be declared as a binding.
pub fn is_valid_identifier(name: &str) -> bool {
    is_identifier_name(name) && !RESERVED.contains(&name)
}

/// Multi-word naming convention of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingStyle {
    /// `firstName`
    CamelCase,
    /// `FirstName`
    PascalCase,
    /// `first_name`
    SnakeCase,
    /// `COLOR_GREEN`
    ScreamingSnakeCase,
    /// `firstname`
    Lowercase,
    Other,
}

impl fmt::Display for NamingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NamingStyle::CamelCase => "camelCase",
            NamingStyle::PascalCase => "PascalCase",
            NamingStyle::SnakeCase => "snake_case",
            NamingStyle::ScreamingSnakeCase => "SCREAMING_SNAKE_CASE",
            NamingStyle::Lowercase => "lowercase",
            NamingStyle::Other => "other",
        })
    }
}

fn style_res() -> &'static [(NamingStyle, Regex)] {
    static RES: OnceLock<Vec<(NamingStyle, Regex)>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            (NamingStyle::Lowercase, r"^[a-z][a-z0-9]*$"),
            (NamingStyle::CamelCase, r"^[a-z][a-z0-9]*(?:[A-Z][a-z0-9]*)+$"),
            (NamingStyle::PascalCase, r"^(?:[A-Z][a-z0-9]+)+$"),
            (NamingStyle::SnakeCase, r"^[a-z][a-z0-9]*(?:_[a-z0-9]+)+$"),
            (NamingStyle::ScreamingSnakeCase, r"^[A-Z][A-Z0-9]*(?:_[A-Z0-9]+)*$"),
        ]
        .into_iter()
        .map(|(style, re)| (style, Regex::new(re).expect("static regex")))
        .collect()
    })
}

/// Classify the naming convention of `name`.
pub fn naming_style(name: &str) -> NamingStyle {
    style_res()
        .iter()
        .find(|(_, re)| re.is_match(name))
        .map_or(NamingStyle::Other, |(style, _)| *style)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
