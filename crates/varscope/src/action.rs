//! Line-ordered actions awaiting code generation

use indexmap::IndexMap;

use crate::variable::{VarRef, VariableArena};

/// Stable index of an action in its [`ActionList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(usize);

impl ActionId {
    /// Create an id from a raw index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// The raw index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a line turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// Block entry; filled in when the block's `end` is reached
    Begin(Vec<VarRef>),

    /// Block exit
    End(Vec<VarRef>),

    /// Declarations
    Def(Vec<VarRef>),

    /// Releases
    Undef(Vec<VarRef>),

    /// A plain line and the visible bindings it references
    Plain {
        /// The original line
        line: String,
        /// Identifier token → binding, in first-reference order
        uses: IndexMap<String, VarRef>,
    },
}

impl ActionKind {
    /// Directive name, as used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Begin(_) => "begin",
            ActionKind::End(_) => "end",
            ActionKind::Def(_) => "def",
            ActionKind::Undef(_) => "undef",
            ActionKind::Plain { .. } => "plain",
        }
    }
}

/// One recorded line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// What to generate
    pub kind: ActionKind,

    /// Leading whitespace reproduced before the generated text
    pub indent: String,
}

impl Action {
    /// Create an action.
    pub fn new(kind: ActionKind, indent: impl Into<String>) -> Self {
        Self {
            kind,
            indent: indent.into(),
        }
    }
}

/// Actions in input line order, one per line.
#[derive(Debug, Clone, Default)]
pub struct ActionList {
    actions: Vec<Action>,
}

impl ActionList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action and return its id.
    pub fn push(&mut self, action: Action) -> ActionId {
        self.actions.push(action);
        ActionId(self.actions.len() - 1)
    }

    /// Borrow an action.
    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(id.0)
    }

    /// Fill in a `begin` action with the variables of its whole block.
    ///
    /// Ids that do not point at a `begin` action are ignored.
    pub fn patch_begin(&mut self, id: ActionId, vars: Vec<VarRef>) {
        if let Some(Action {
            kind: ActionKind::Begin(slot),
            ..
        }) = self.actions.get_mut(id.0)
        {
            *slot = vars;
        }
    }

    /// Drop every variable that no plain line referenced.
    ///
    /// `def`/`undef` keep a binding if that binding was used. `begin`/`end`
    /// list one entry per slot and keep it if any binding that ever lived
    /// in the slot was used.
    pub fn retain_used(&mut self, arena: &VariableArena) {
        let used_slots = arena.used_slots();

        for action in &mut self.actions {
            match &mut action.kind {
                ActionKind::Begin(vars) | ActionKind::End(vars) => {
                    vars.retain(|&r| used_slots.contains(&arena.get(r).slot_key()));
                }
                ActionKind::Def(vars) | ActionKind::Undef(vars) => {
                    vars.retain(|&r| arena.get(r).used);
                }
                ActionKind::Plain { .. } => {}
            }
        }
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterate over actions in line order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }
}
