//! Code generator interface
//!
//! A code generator turns scope and variable data into target-language
//! text. The preprocessor calls it once per directive line and once per
//! substituted identifier:
//!
//! ```text
//! ~begin        → begin(all used slots of the block)
//! ~def x:int    → def(declared variables)
//! x = 1;        → "{use(x)} = 1;"
//! ~undef x      → undef(released variables)
//! ~end          → end(all used slots of the block)
//! ```
//!
//! Every method has a default, so a generator only overrides what it needs.

use std::fmt;
use std::sync::Arc;

use crate::variable::Variable;

/// Pluggable target-language backend.
///
/// # Example Implementation
///
/// ```
/// use varscope::{preprocess_with, CodeGenerator, Variable};
///
/// struct Heap;
///
/// impl CodeGenerator for Heap {
///     fn begin(&self, vars: &[Variable]) -> String {
///         vars.iter()
///             .map(|v| format!("{}* i{};", v.ty, v.id))
///             .collect::<Vec<_>>()
///             .join(" ")
///     }
///
///     fn use_variable(&self, var: &Variable) -> String {
///         format!("(*i{})", var.id)
///     }
/// }
///
/// let out = preprocess_with("~begin\n~def n:int\nn = 1;\n~end", &Heap).unwrap();
/// assert_eq!(out, "int* i0;\n\n(*i0) = 1;\n");
/// ```
pub trait CodeGenerator: Send + Sync {
    /// Text for a `begin` line, given every used slot of the block.
    fn begin(&self, _vars: &[Variable]) -> String {
        String::new()
    }

    /// Text for an `end` line, given every used slot of the block.
    fn end(&self, _vars: &[Variable]) -> String {
        String::new()
    }

    /// Text for a `def` line, given the used variables it declares.
    fn def(&self, _vars: &[Variable]) -> String {
        String::new()
    }

    /// Text for an `undef` line, given the used variables it releases.
    fn undef(&self, _vars: &[Variable]) -> String {
        String::new()
    }

    /// Storage reference substituted for an identifier on a plain line.
    fn use_variable(&self, var: &Variable) -> String {
        default_use(var)
    }
}

/// The default storage reference: `i` followed by the slot id.
pub fn default_use(var: &Variable) -> String {
    format!("i{}", var.id)
}

/// Callback for `begin`, `end`, `def` and `undef`.
pub type ListFn = Arc<dyn Fn(&[Variable]) -> String + Send + Sync>;

/// Callback for `use`.
pub type UseFn = Arc<dyn Fn(&Variable) -> String + Send + Sync>;

/// A generator assembled from closures.
///
/// All five capabilities are filled with their defaults at construction;
/// the `with_*` methods replace individual ones.
///
/// # Example
///
/// ```
/// use varscope::{preprocess_with, CallbackGenerator};
///
/// let gen = CallbackGenerator::new()
///     .with_use(|v| format!("t{}_{}", v.type_info.type_id, v.type_info.slot_index));
///
/// let out = preprocess_with("~begin\n~def a:int b:float\nb = a;\n~end", &gen).unwrap();
/// assert_eq!(out, "\n\nt1_0 = t0_0;\n");
/// ```
#[derive(Clone)]
pub struct CallbackGenerator {
    begin: ListFn,
    end: ListFn,
    def: ListFn,
    undef: ListFn,
    use_variable: UseFn,
}

fn emit_nothing(_vars: &[Variable]) -> String {
    String::new()
}

impl Default for CallbackGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CallbackGenerator {
    /// Create a generator where every capability has its default.
    pub fn new() -> Self {
        Self {
            begin: Arc::new(emit_nothing),
            end: Arc::new(emit_nothing),
            def: Arc::new(emit_nothing),
            undef: Arc::new(emit_nothing),
            use_variable: Arc::new(default_use),
        }
    }

    /// Replace the `begin` capability.
    pub fn with_begin(mut self, f: impl Fn(&[Variable]) -> String + Send + Sync + 'static) -> Self {
        self.begin = Arc::new(f);
        self
    }

    /// Replace the `end` capability.
    pub fn with_end(mut self, f: impl Fn(&[Variable]) -> String + Send + Sync + 'static) -> Self {
        self.end = Arc::new(f);
        self
    }

    /// Replace the `def` capability.
    pub fn with_def(mut self, f: impl Fn(&[Variable]) -> String + Send + Sync + 'static) -> Self {
        self.def = Arc::new(f);
        self
    }

    /// Replace the `undef` capability.
    pub fn with_undef(mut self, f: impl Fn(&[Variable]) -> String + Send + Sync + 'static) -> Self {
        self.undef = Arc::new(f);
        self
    }

    /// Replace the `use` capability.
    pub fn with_use(mut self, f: impl Fn(&Variable) -> String + Send + Sync + 'static) -> Self {
        self.use_variable = Arc::new(f);
        self
    }
}

impl CodeGenerator for CallbackGenerator {
    fn begin(&self, vars: &[Variable]) -> String {
        (self.begin)(vars)
    }

    fn end(&self, vars: &[Variable]) -> String {
        (self.end)(vars)
    }

    fn def(&self, vars: &[Variable]) -> String {
        (self.def)(vars)
    }

    fn undef(&self, vars: &[Variable]) -> String {
        (self.undef)(vars)
    }

    fn use_variable(&self, var: &Variable) -> String {
        (self.use_variable)(var)
    }
}

impl fmt::Debug for CallbackGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallbackGenerator")
    }
}

/// Selects the generator for a run: a built-in language or a custom one.
#[derive(Clone)]
pub enum Target {
    /// A name from the built-in language table (case-insensitive)
    Named(String),

    /// A caller-supplied generator
    Custom(Arc<dyn CodeGenerator>),
}

impl Target {
    /// Resolve to a generator.
    ///
    /// Returns `None` for a name that is not in the built-in table.
    pub fn resolve(&self) -> Option<Arc<dyn CodeGenerator>> {
        match self {
            Target::Named(name) => crate::languages::lookup(name),
            Target::Custom(generator) => Some(Arc::clone(generator)),
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Named(name) => write!(f, "Target::Named({:?})", name),
            Target::Custom(_) => write!(f, "Target::Custom(..)"),
        }
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::Named(name.to_string())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::Named(name)
    }
}

impl From<Arc<dyn CodeGenerator>> for Target {
    fn from(generator: Arc<dyn CodeGenerator>) -> Self {
        Target::Custom(generator)
    }
}

impl From<CallbackGenerator> for Target {
    fn from(generator: CallbackGenerator) -> Self {
        Target::Custom(Arc::new(generator))
    }
}
