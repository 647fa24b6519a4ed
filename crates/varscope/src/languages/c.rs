//! C-family generator

use super::join_each;
use crate::generator::CodeGenerator;
use crate::variable::Variable;

/// Declares each slot of a block as a local of its own type.
///
/// Shared by C, C++, Java and C#.
///
/// # Example
///
/// ```
/// use varscope::preprocess;
///
/// let out = preprocess("~begin\n~def n:int\nn = 1;\n~end", "c").unwrap();
/// assert_eq!(out, "int i0;\n\ni0 = 1;\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct C;

impl CodeGenerator for C {
    fn begin(&self, vars: &[Variable]) -> String {
        join_each(vars, |v| format!("{} {};", v.ty, self.use_variable(v)))
    }
}
