//! Directive line recognition
//!
//! A line is tested against the recognizers for `~begin`, `~end`, `~def`
//! and `~undef`, in that order. The first one that matches consumes the
//! line; anything left over is a plain line.
//!
//! ```text
//! ~begin
//! ~end
//! ~def <name>[:<type>] (<name>[:<type>])*
//! ~undef <name> (<name>)*
//! ```

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use thiserror::Error;

/// Identifier syntax shared by directives and plain lines.
pub const IDENTIFIER: &str = r"[A-Za-z_$][A-Za-z0-9_$]*";

/// One `name[:type]` entry of a `def` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Declared name
    pub name: String,

    /// Declared type tag, if one was written
    pub ty: Option<String>,
}

impl Declaration {
    /// Create a declaration.
    pub fn new(name: impl Into<String>, ty: Option<&str>) -> Self {
        Self {
            name: name.into(),
            ty: ty.map(str::to_string),
        }
    }
}

/// Classification of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `~begin`
    Begin {
        /// Leading whitespace
        indent: String,
    },

    /// `~end`
    End {
        /// Leading whitespace
        indent: String,
    },

    /// `~def x:int y:float`
    Def {
        /// Leading whitespace
        indent: String,
        /// Declarations, left to right
        decls: Vec<Declaration>,
    },

    /// `~undef x y`
    Undef {
        /// Leading whitespace
        indent: String,
        /// Names, left to right
        names: Vec<String>,
    },

    /// Any other line
    Plain,
}

/// Malformed `def`/`undef` argument list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {directive} directive (symbol \"{symbol}\")")]
pub struct SyntaxError {
    /// `def` or `undef`
    pub directive: &'static str,

    /// The first symbol that is not part of a valid entry (empty when the
    /// list is empty)
    pub symbol: String,
}

type Recognizer = fn(&str) -> Option<Result<Directive, SyntaxError>>;

const RECOGNIZERS: &[Recognizer] = &[match_begin, match_end, match_def, match_undef];

/// Classify one line.
///
/// # Errors
///
/// `SyntaxError` if the line is a `def`/`undef` directive whose argument
/// list is malformed.
///
/// # Example
///
/// ```
/// use varscope::directive::{classify, Declaration, Directive};
///
/// let d = classify("  ~def x:int y").unwrap();
/// assert_eq!(
///     d,
///     Directive::Def {
///         indent: "  ".to_string(),
///         decls: vec![Declaration::new("x", Some("int")), Declaration::new("y", None)],
///     }
/// );
/// assert_eq!(classify("x = 1;").unwrap(), Directive::Plain);
/// ```
pub fn classify(line: &str) -> Result<Directive, SyntaxError> {
    RECOGNIZERS
        .iter()
        .find_map(|recognize| recognize(line))
        .unwrap_or(Ok(Directive::Plain))
}

/// Iterate over the identifier tokens of a plain line.
pub fn identifiers(line: &str) -> impl Iterator<Item = &str> {
    identifier_re().find_iter(line).map(|m| m.as_str())
}

/// Rewrite the identifier tokens of a plain line.
///
/// Tokens for which `replace` returns `None` are kept as they are.
pub fn replace_identifiers<'a, F>(line: &'a str, mut replace: F) -> Cow<'a, str>
where
    F: FnMut(&str) -> Option<String>,
{
    identifier_re().replace_all(line, |caps: &Captures<'_>| {
        let token = &caps[0];
        replace(token).unwrap_or_else(|| token.to_string())
    })
}

// ═══════════════════════════════════════════════════════════════════════
// Recognizers
// ═══════════════════════════════════════════════════════════════════════

fn match_begin(line: &str) -> Option<Result<Directive, SyntaxError>> {
    let caps = patterns().begin.captures(line)?;
    Some(Ok(Directive::Begin {
        indent: caps[1].to_string(),
    }))
}

fn match_end(line: &str) -> Option<Result<Directive, SyntaxError>> {
    let caps = patterns().end.captures(line)?;
    Some(Ok(Directive::End {
        indent: caps[1].to_string(),
    }))
}

fn match_def(line: &str) -> Option<Result<Directive, SyntaxError>> {
    let caps = patterns().def.captures(line)?;
    let indent = caps[1].to_string();
    Some(parse_decls(&caps[2]).map(|decls| Directive::Def { indent, decls }))
}

fn match_undef(line: &str) -> Option<Result<Directive, SyntaxError>> {
    let caps = patterns().undef.captures(line)?;
    let indent = caps[1].to_string();
    Some(parse_names(&caps[2]).map(|names| Directive::Undef { indent, names }))
}

fn parse_decls(list: &str) -> Result<Vec<Declaration>, SyntaxError> {
    let mut decls = Vec::new();
    for caps in patterns().decl.captures_iter(list) {
        if let Some(bad) = caps.name("bad") {
            return Err(SyntaxError {
                directive: "def",
                symbol: bad.as_str().to_string(),
            });
        }
        decls.push(Declaration::new(
            &caps["name"],
            caps.name("ty").map(|m| m.as_str()),
        ));
    }
    non_empty(decls, "def")
}

fn parse_names(list: &str) -> Result<Vec<String>, SyntaxError> {
    let mut names = Vec::new();
    for caps in patterns().name.captures_iter(list) {
        if let Some(bad) = caps.name("bad") {
            return Err(SyntaxError {
                directive: "undef",
                symbol: bad.as_str().to_string(),
            });
        }
        names.push(caps["name"].to_string());
    }
    non_empty(names, "undef")
}

fn non_empty<T>(items: Vec<T>, directive: &'static str) -> Result<Vec<T>, SyntaxError> {
    if items.is_empty() {
        return Err(SyntaxError {
            directive,
            symbol: String::new(),
        });
    }
    Ok(items)
}

// ═══════════════════════════════════════════════════════════════════════
// Patterns
// ═══════════════════════════════════════════════════════════════════════

struct Patterns {
    begin: Regex,
    end: Regex,
    def: Regex,
    undef: Regex,
    decl: Regex,
    name: Regex,
}

fn directive_re(word: &str, tail: &str) -> Regex {
    compile(&format!(r"^(\s*)~\s*{word}\b{tail}\s*$"))
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern is valid")
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        begin: directive_re("begin", ""),
        end: directive_re("end", ""),
        def: directive_re("def", r"\s*(.*?)"),
        undef: directive_re("undef", r"\s*(.*?)"),
        decl: compile(&format!(
            r"(?P<name>{IDENTIFIER})\s*(?::\s*(?P<ty>{IDENTIFIER})\s*)?|(?P<bad>.)"
        )),
        name: compile(&format!(r"(?P<name>{IDENTIFIER})\s*|(?P<bad>.)")),
    })
}

fn identifier_re() -> &'static Regex {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    IDENT.get_or_init(|| compile(IDENTIFIER))
}
