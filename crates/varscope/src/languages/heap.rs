//! C generator backed by one heap array per type

use indexmap::IndexMap;

use crate::generator::CodeGenerator;
use crate::variable::Variable;

/// Per-type storage within a block.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TypeArray<'a> {
    name: &'a str,
    count: usize,
}

/// Group a block's slots by type, in `type_id` order.
///
/// Each array is sized to cover the highest slot index handed in, since
/// slots dropped as unused still keep their position.
fn type_arrays(vars: &[Variable]) -> IndexMap<usize, TypeArray<'_>> {
    let mut arrays: IndexMap<usize, TypeArray<'_>> = IndexMap::new();
    for v in vars {
        let entry = arrays
            .entry(v.type_info.type_id)
            .or_insert(TypeArray {
                name: &v.ty,
                count: 0,
            });
        entry.count = entry.count.max(v.type_info.slot_index + 1);
    }
    arrays.sort_keys();
    arrays
}

/// Stores each type's slots in a `malloc`ed array `v<type_id>` and frees
/// the arrays at the end of the block.
///
/// Variables are rendered as `v<type_id>[<slot_index>]`.
///
/// # Example
///
/// ```
/// use varscope::preprocess;
///
/// let out = preprocess("~begin\n~def n:int\nn = 1;\n~end", "c-heap").unwrap();
/// assert_eq!(
///     out,
///     "int* v0 = malloc(1 * sizeof(int)); if(v0 == NULL) exit(1);\n\nv0[0] = 1;\nfree(v0);"
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CHeap;

impl CodeGenerator for CHeap {
    fn begin(&self, vars: &[Variable]) -> String {
        let arrays = type_arrays(vars);
        let allocs = arrays.iter().map(|(id, t)| {
            format!("{}* v{} = malloc({} * sizeof({}));", t.name, id, t.count, t.name)
        });
        let checks = arrays
            .keys()
            .map(|id| format!("if(v{} == NULL) exit(1);", id));
        allocs.chain(checks).collect::<Vec<_>>().join(" ")
    }

    fn end(&self, vars: &[Variable]) -> String {
        type_arrays(vars)
            .keys()
            .map(|id| format!("free(v{});", id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn use_variable(&self, var: &Variable) -> String {
        format!("v{}[{}]", var.type_info.type_id, var.type_info.slot_index)
    }
}
