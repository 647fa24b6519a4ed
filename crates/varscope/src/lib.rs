//! # varscope
//!
//! A lexical-scope-aware variable preprocessor.
//!
//! varscope rewrites a text document in which variables are declared with
//! `~def`/`~undef` directives inside `~begin`/`~end` blocks. Each declared
//! name is mapped to a storage slot, and every reference on an ordinary
//! line is replaced with whatever a pluggable code generator renders for
//! that slot.
//!
//! ```text
//! ~begin                      int i0; float i1;
//! ~def x:int
//! x = 1;               →      i0 = 1;
//! ~def x:float
//! x = 0.5;                    i1 = 0.5;
//! ~undef x
//! x++;                        i0++;
//! ~end
//! ```
//!
//! ## Architecture
//!
//! - **Directive matcher** ([`directive`]): classifies each line
//! - **Scopes** ([`scope`]): allocate and recycle typed slots per block
//! - **Actions** ([`action`]): one recorded intention per line
//! - **Generators** ([`generator`], [`languages`]): render actions as text
//!
//! Slots are recycled only for the same type tag, so a generator can lay
//! storage out as one array per type. Variables that no ordinary line
//! references are hidden from the generator.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod action;
pub mod directive;
pub mod emit;
pub mod error;
pub mod generator;
pub mod languages;
pub mod options;
pub mod preprocessor;
pub mod scope;
pub mod variable;

// Re-export main types
pub use action::{Action, ActionId, ActionKind, ActionList};
pub use error::{PreprocessError, Result, ScopeError};
pub use generator::{CallbackGenerator, CodeGenerator, Target};
pub use languages::language_names;
pub use options::PreprocessOptions;
pub use preprocessor::{preprocess, preprocess_bytes, preprocess_with, Preprocessor, Recording};
pub use scope::{Scope, ScopeStack};
pub use variable::{TypeInfo, VarRef, Variable, VariableArena};

/// varscope version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
