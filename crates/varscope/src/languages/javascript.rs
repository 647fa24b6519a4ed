//! JavaScript and ActionScript generators

use super::join_each;
use crate::generator::CodeGenerator;
use crate::variable::Variable;

/// Declares each slot of a block with `var`.
///
/// # Example
///
/// ```
/// use varscope::preprocess;
///
/// let out = preprocess("~begin\n~def n:number\nn = 1;\n~end", "js").unwrap();
/// assert_eq!(out, "var i0;\n\ni0 = 1;\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaScript;

impl CodeGenerator for JavaScript {
    fn begin(&self, vars: &[Variable]) -> String {
        join_each(vars, |v| format!("var {};", self.use_variable(v)))
    }
}

/// Like [`JavaScript`], with a type annotation when the `def` gave one.
///
/// Shared by ActionScript and TypeScript.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionScript;

impl CodeGenerator for ActionScript {
    fn begin(&self, vars: &[Variable]) -> String {
        join_each(vars, |v| {
            if v.ty.is_empty() {
                format!("var {};", self.use_variable(v))
            } else {
                format!("var {}:{};", self.use_variable(v), v.ty)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::preprocess;

    #[test]
    fn test_javascript_ignores_types() {
        let out = preprocess("~begin\n~def a:int b\na + b;\n~end", "javascript").unwrap();
        assert_eq!(out, "var i0; var i1;\n\ni0 + i1;\n");
    }

    #[test]
    fn test_actionscript_annotates_typed_slots() {
        let out = preprocess("~begin\n~def a:int b\na + b;\n~end", "typescript").unwrap();
        assert_eq!(out, "var i0:int; var i1;\n\ni0 + i1;\n");
    }
}
