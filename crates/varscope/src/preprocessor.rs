//! The preprocessing pass
//!
//! ```text
//! text → lines → classify (mutating the scope stack) → actions
//!      → drop unused variables → generate → joined text
//! ```

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, trace};

use crate::action::{Action, ActionKind, ActionList};
use crate::directive::{self, Declaration, Directive, SyntaxError};
use crate::emit::emit;
use crate::error::{PreprocessError, Result};
use crate::generator::{CodeGenerator, Target};
use crate::options::PreprocessOptions;
use crate::scope::ScopeStack;
use crate::variable::VariableArena;

/// Actions and variables recorded from one document, before generation.
#[derive(Debug, Clone, Default)]
pub struct Recording {
    /// One action per input line
    pub actions: ActionList,

    /// Every variable the actions refer to
    pub arena: VariableArena,
}

impl Recording {
    /// Render the recording with `generator`.
    pub fn render(&self, generator: &dyn CodeGenerator, separator: &str) -> String {
        emit(&self.actions, &self.arena, generator, separator)
    }
}

/// A configured preprocessor bound to one code generator.
///
/// # Example
///
/// ```
/// use varscope::{PreprocessOptions, Preprocessor};
///
/// let pre = Preprocessor::for_target("c")
///     .unwrap()
///     .with_options(PreprocessOptions::new().with_line_separator("\r\n"));
///
/// let out = pre.run("~begin\r\n~def n:int\r\nn++;\r\n~end").unwrap();
/// assert_eq!(out, "int i0;\r\n\r\ni0++;\r\n");
/// ```
#[derive(Clone)]
pub struct Preprocessor {
    generator: Arc<dyn CodeGenerator>,
    options: PreprocessOptions,
}

impl std::fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preprocessor")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Preprocessor {
    /// Create a preprocessor with default options.
    pub fn new(generator: Arc<dyn CodeGenerator>) -> Self {
        Self {
            generator,
            options: PreprocessOptions::default(),
        }
    }

    /// Create a preprocessor for a built-in language name or custom
    /// generator.
    ///
    /// # Errors
    ///
    /// `InputType` if the name is not a built-in language.
    pub fn for_target(target: impl Into<Target>) -> Result<Self> {
        let target = target.into();
        let generator = target.resolve().ok_or_else(|| match &target {
            Target::Named(name) => {
                PreprocessError::input_type(format!("Invalid language \"{}\"", name))
            }
            Target::Custom(_) => PreprocessError::input_type("Invalid generator"),
        })?;
        Ok(Self::new(generator))
    }

    /// Replace the options.
    pub fn with_options(mut self, options: PreprocessOptions) -> Self {
        self.options = options;
        self
    }

    /// The active options.
    pub fn options(&self) -> &PreprocessOptions {
        &self.options
    }

    /// Rewrite a document.
    ///
    /// # Errors
    ///
    /// Any directive, scope or binding error; no partial output is
    /// produced.
    pub fn run(&self, text: &str) -> Result<String> {
        let recording = record(text, &self.options)?;
        Ok(recording.render(self.generator.as_ref(), &self.options.line_separator))
    }
}

/// Rewrite `text` for a built-in language or custom generator.
///
/// # Example
///
/// ```
/// use varscope::preprocess;
///
/// let src = "~begin\n~def i:int\ni = 2;\n~undef i\n~end";
/// assert_eq!(preprocess(src, "python").unwrap(), "\n\ni0 = 2;\n\n");
/// ```
pub fn preprocess(text: &str, target: impl Into<Target>) -> Result<String> {
    Preprocessor::for_target(target)?.run(text)
}

/// Rewrite `text` with a borrowed generator and default options.
pub fn preprocess_with(text: &str, generator: &dyn CodeGenerator) -> Result<String> {
    let options = PreprocessOptions::default();
    let recording = record(text, &options)?;
    Ok(recording.render(generator, &options.line_separator))
}

/// Rewrite raw bytes, rejecting input that is not UTF-8 text.
pub fn preprocess_bytes(bytes: &[u8], target: impl Into<Target>) -> Result<String> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| PreprocessError::input_type(format!("Invalid text: {}", e)))?;
    preprocess(text, target)
}

/// Classify every line of `text` and record its actions, with unused
/// variables already filtered out when the options ask for it.
pub fn record(text: &str, options: &PreprocessOptions) -> Result<Recording> {
    let lines = split_lines(text);
    let mut recorder = Recorder::new(options);

    for (number, line) in lines.iter().enumerate() {
        recorder.feed(number, line)?;
    }

    if let Some(frame) = recorder.stack.outermost() {
        return Err(PreprocessError::UnbalancedScope {
            reason: "begin without matching end".to_string(),
            line: frame.line,
            text: lines[frame.line].to_string(),
        });
    }

    let Recorder {
        mut actions, arena, ..
    } = recorder;
    if options.elide_unused {
        actions.retain_used(&arena);
    }
    debug!(
        lines = lines.len(),
        variables = arena.len(),
        "recorded document"
    );
    Ok(Recording { actions, arena })
}

/// Split on `\r\n`, `\r` or `\n`.
pub fn split_lines(text: &str) -> Vec<&str> {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR
        .get_or_init(|| Regex::new(r"\r\n|\r|\n").expect("built-in pattern is valid"))
        .split(text)
        .collect()
}

/// Line-by-line state machine.
struct Recorder<'o> {
    options: &'o PreprocessOptions,
    stack: ScopeStack,
    arena: VariableArena,
    actions: ActionList,
}

impl<'o> Recorder<'o> {
    fn new(options: &'o PreprocessOptions) -> Self {
        Self {
            options,
            stack: ScopeStack::new(),
            arena: VariableArena::new(),
            actions: ActionList::new(),
        }
    }

    fn feed(&mut self, number: usize, line: &str) -> Result<()> {
        let directive = directive::classify(line).map_err(|e| syntax_error(e, number, line))?;

        let action = match directive {
            Directive::Begin { indent } => {
                let id = self
                    .actions
                    .push(Action::new(ActionKind::Begin(Vec::new()), indent));
                self.stack.push(id, number);
                trace!(line = number, "begin");
                return Ok(());
            }
            Directive::End { indent } => self.end(indent, number, line)?,
            Directive::Def { indent, decls } => self.def(indent, decls, number, line)?,
            Directive::Undef { indent, names } => self.undef(indent, names, number, line)?,
            Directive::Plain => self.plain(line),
        };

        trace!(line = number, kind = action.kind.name(), "recorded");
        self.actions.push(action);
        Ok(())
    }

    fn end(&mut self, indent: String, number: usize, line: &str) -> Result<Action> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| unbalanced("end without matching begin", number, line))?;

        let vars = frame.scope.collect_all();
        self.actions.patch_begin(frame.begin, vars.clone());
        Ok(Action::new(ActionKind::End(vars), indent))
    }

    fn def(
        &mut self,
        indent: String,
        decls: Vec<Declaration>,
        number: usize,
        line: &str,
    ) -> Result<Action> {
        let scope = self
            .stack
            .current_mut()
            .ok_or_else(|| unbalanced("def outside of any block", number, line))?;

        let mut refs = Vec::with_capacity(decls.len());
        for decl in decls {
            let ty = match decl.ty {
                Some(ty) => ty,
                None if self.options.require_types => {
                    return Err(PreprocessError::MissingType {
                        name: decl.name,
                        line: number,
                        text: line.to_string(),
                    });
                }
                None => String::new(),
            };
            refs.push(scope.allocate(&mut self.arena, &decl.name, &ty));
        }
        Ok(Action::new(ActionKind::Def(refs), indent))
    }

    fn undef(
        &mut self,
        indent: String,
        names: Vec<String>,
        number: usize,
        line: &str,
    ) -> Result<Action> {
        let scope = self
            .stack
            .current_mut()
            .ok_or_else(|| unbalanced("undef outside of any block", number, line))?;

        let refs = names
            .iter()
            .map(|name| {
                scope
                    .release(&self.arena, name)
                    .map_err(|e| PreprocessError::from_scope(e, number, line))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Action::new(ActionKind::Undef(refs), indent))
    }

    /// Plain lines outside any block are copied unchanged.
    fn plain(&mut self, line: &str) -> Action {
        let mut uses = IndexMap::new();
        if let Some(scope) = self.stack.current() {
            for token in directive::identifiers(line) {
                if let Some(r) = scope.lookup(token) {
                    self.arena.mark_used(r);
                    uses.insert(token.to_string(), r);
                }
            }
        }
        Action::new(
            ActionKind::Plain {
                line: line.to_string(),
                uses,
            },
            "",
        )
    }
}

fn syntax_error(err: SyntaxError, number: usize, line: &str) -> PreprocessError {
    PreprocessError::DirectiveSyntax {
        directive: err.directive,
        symbol: err.symbol,
        line: number,
        text: line.to_string(),
    }
}

fn unbalanced(reason: &str, number: usize, line: &str) -> PreprocessError {
    PreprocessError::UnbalancedScope {
        reason: reason.to_string(),
        line: number,
        text: line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionId;

    #[test]
    fn test_split_lines_mixed_separators() {
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines(""), vec![""]);
        assert_eq!(split_lines("a\n"), vec!["a", ""]);
    }

    #[test]
    fn test_record_patches_begin_with_whole_block() {
        let rec = record(
            "~begin\n~def a:int\na;\n~undef a\n~def b:float\nb;\n~end",
            &PreprocessOptions::default(),
        )
        .unwrap();

        let kinds: Vec<_> = rec.actions.iter().map(|a| &a.kind).collect();
        match (kinds[0], kinds[6]) {
            (ActionKind::Begin(begin), ActionKind::End(end)) => {
                assert_eq!(begin.len(), 2);
                assert_eq!(begin, end);
            }
            other => panic!("unexpected actions: {:?}", other),
        }
    }

    #[test]
    fn test_plain_outside_block_untouched() {
        let rec = record("x = 1;", &PreprocessOptions::default()).unwrap();
        let action = rec.actions.get(ActionId::new(0)).unwrap();
        match &action.kind {
            ActionKind::Plain { uses, .. } => assert!(uses.is_empty()),
            other => panic!("expected plain action, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_target() {
        let err = Preprocessor::for_target("cobol").unwrap_err();
        assert_eq!(
            err,
            PreprocessError::InputType {
                reason: "Invalid language \"cobol\"".to_string()
            }
        );
        assert_eq!(
            err.to_string(),
            "Input type error: Invalid language \"cobol\""
        );
    }
}
