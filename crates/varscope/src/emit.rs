//! Text generation from recorded actions

use std::collections::HashSet;

use crate::action::{Action, ActionKind, ActionList};
use crate::directive::replace_identifiers;
use crate::generator::CodeGenerator;
use crate::variable::{ScopeId, VarRef, Variable, VariableArena};

/// Render every action and join the lines with `separator`.
///
/// Produces exactly one output line per action.
pub fn emit(
    actions: &ActionList,
    arena: &VariableArena,
    generator: &dyn CodeGenerator,
    separator: &str,
) -> String {
    let used_slots = arena.used_slots();
    actions
        .iter()
        .map(|action| render(action, arena, &used_slots, generator))
        .collect::<Vec<_>>()
        .join(separator)
}

fn render(
    action: &Action,
    arena: &VariableArena,
    used_slots: &HashSet<(ScopeId, usize)>,
    generator: &dyn CodeGenerator,
) -> String {
    let text = match &action.kind {
        ActionKind::Begin(refs) => generator.begin(&slots(refs, arena, used_slots)),
        ActionKind::End(refs) => generator.end(&slots(refs, arena, used_slots)),
        ActionKind::Def(refs) => generator.def(&bindings(refs, arena)),
        ActionKind::Undef(refs) => generator.undef(&bindings(refs, arena)),
        ActionKind::Plain { line, uses } => replace_identifiers(line, |token| {
            uses.get(token)
                .map(|&r| generator.use_variable(arena.get(r)))
        })
        .into_owned(),
    };
    format!("{}{}", action.indent, text)
}

fn bindings(refs: &[VarRef], arena: &VariableArena) -> Vec<Variable> {
    refs.iter().map(|&r| arena.get(r).clone()).collect()
}

/// A block-level entry stands for its whole slot, so it counts as used
/// when any binding of the slot was.
fn slots(
    refs: &[VarRef],
    arena: &VariableArena,
    used_slots: &HashSet<(ScopeId, usize)>,
) -> Vec<Variable> {
    refs.iter()
        .map(|&r| {
            let mut var = arena.get(r).clone();
            var.used = used_slots.contains(&var.slot_key());
            var
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;
    use crate::{CallbackGenerator, PreprocessOptions};
    use indexmap::IndexMap;

    #[test]
    fn test_one_line_per_action() {
        let arena = VariableArena::new();
        let mut list = ActionList::new();
        list.push(Action::new(ActionKind::Begin(vec![]), "  "));
        list.push(Action::new(
            ActionKind::Plain {
                line: "foo();".to_string(),
                uses: IndexMap::new(),
            },
            "",
        ));
        list.push(Action::new(ActionKind::End(vec![]), "  "));

        let sep = PreprocessOptions::default().line_separator;
        let out = emit(&list, &arena, &CallbackGenerator::new(), &sep);
        assert_eq!(out, "  \nfoo();\n  ");
    }

    #[test]
    fn test_plain_line_substitutes_only_mapped_tokens() {
        let mut arena = VariableArena::new();
        let mut scope = Scope::new(ScopeId::root());
        let x = scope.allocate(&mut arena, "x", "int");

        let mut uses = IndexMap::new();
        uses.insert("x".to_string(), x);
        let mut list = ActionList::new();
        list.push(Action::new(
            ActionKind::Plain {
                line: "x = y + x;".to_string(),
                uses,
            },
            "",
        ));

        let gen = CallbackGenerator::new().with_use(|v| format!("<{}>", v.name));
        assert_eq!(emit(&list, &arena, &gen, "\n"), "<x> = y + <x>;");
    }

    #[test]
    fn test_block_entries_report_slot_usage() {
        let mut arena = VariableArena::new();
        let mut scope = Scope::new(ScopeId::root());
        let x = scope.allocate(&mut arena, "x", "int");
        arena.mark_used(x);
        scope.release(&arena, "x").unwrap();
        let y = scope.allocate(&mut arena, "y", "int");

        let mut list = ActionList::new();
        list.push(Action::new(ActionKind::End(vec![y]), ""));
        list.push(Action::new(ActionKind::Def(vec![y]), ""));

        let gen = CallbackGenerator::new()
            .with_end(|vs| format!("end {} {}", vs[0].name, vs[0].used))
            .with_def(|vs| format!("def {} {}", vs[0].name, vs[0].used));
        assert_eq!(emit(&list, &arena, &gen, "|"), "end y true|def y false");
    }
}
