//! Built-in language generators
//!
//! This module contains [`CodeGenerator`] implementations for common
//! targets and the read-only table that maps language names to them.

pub mod c;
pub mod heap;
pub mod javascript;

pub use c::C;
pub use heap::CHeap;
pub use javascript::{ActionScript, JavaScript};

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::generator::CodeGenerator;
use crate::variable::Variable;

/// Generator that keeps every default: directives vanish and variables
/// become `i<id>`. Suits dynamically typed targets without declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Python;

impl CodeGenerator for Python {}

type Table = IndexMap<&'static str, Arc<dyn CodeGenerator>>;

fn table() -> &'static Table {
    static LANGUAGES: OnceLock<Table> = OnceLock::new();
    LANGUAGES.get_or_init(|| {
        let javascript: Arc<dyn CodeGenerator> = Arc::new(JavaScript);
        let c: Arc<dyn CodeGenerator> = Arc::new(C);
        let python: Arc<dyn CodeGenerator> = Arc::new(Python);
        let actionscript: Arc<dyn CodeGenerator> = Arc::new(ActionScript);
        let heap: Arc<dyn CodeGenerator> = Arc::new(CHeap);

        let mut table = Table::new();
        for name in ["js", "javascript", "ecmascript", "jscript"] {
            table.insert(name, Arc::clone(&javascript));
        }
        for name in ["c", "h", "c++", "cpp", "cc", "cxx", "hpp", "java", "c#", "cs"] {
            table.insert(name, Arc::clone(&c));
        }
        for name in ["python", "py"] {
            table.insert(name, Arc::clone(&python));
        }
        for name in ["actionscript", "typescript"] {
            table.insert(name, Arc::clone(&actionscript));
        }
        table.insert("c-heap", heap);
        table
    })
}

/// Find a built-in generator by name, ignoring ASCII case.
pub fn lookup(name: &str) -> Option<Arc<dyn CodeGenerator>> {
    table().get(name.to_ascii_lowercase().as_str()).cloned()
}

/// Names accepted by [`lookup`], in registration order.
pub fn language_names() -> Vec<&'static str> {
    table().keys().copied().collect()
}

/// Join one rendered entry per variable with single spaces.
pub(crate) fn join_each(vars: &[Variable], render: impl Fn(&Variable) -> String) -> String {
    vars.iter().map(render).collect::<Vec<_>>().join(" ")
}
