//! Variable records and the arena that owns them

use std::collections::HashSet;

/// Per-type numbering of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// Index of the type tag within its scope, in first-seen order
    pub type_id: usize,

    /// Index of the slot among slots of the same type within its scope
    pub slot_index: usize,
}

/// Identifies one `begin`/`end` block across a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub(crate) usize);

/// A declared variable, as seen by code generators.
///
/// Each `def` produces one of these. When a freed slot is reused, the new
/// record shares `id` and `type_info` with the previous occupant; only
/// `name` and `used` differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// The identifier as written in the source
    pub name: String,

    /// The user-supplied type tag (empty when the `def` gave none)
    pub ty: String,

    /// Slot number, unique within the owning scope
    pub id: usize,

    /// Whether a plain line referenced this binding while it was visible
    pub used: bool,

    /// Per-type slot numbering
    pub type_info: TypeInfo,

    /// Block the slot belongs to
    pub(crate) scope: ScopeId,
}

impl Variable {
    /// Key identifying the physical slot across the whole run.
    pub(crate) fn slot_key(&self) -> (ScopeId, usize) {
        (self.scope, self.id)
    }

    /// Copy this record's slot under a new name.
    pub(crate) fn rebind(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: self.ty.clone(),
            id: self.id,
            used: false,
            type_info: self.type_info,
            scope: self.scope,
        }
    }
}

/// Stable handle to a [`Variable`] stored in a [`VariableArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarRef(usize);

/// Owns every variable record created during one run.
///
/// Scopes and actions hold [`VarRef`]s, so records outlive the scope that
/// created them and can still be emitted after its `end`.
#[derive(Debug, Clone, Default)]
pub struct VariableArena {
    vars: Vec<Variable>,
}

impl VariableArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record and return its handle.
    pub fn insert(&mut self, var: Variable) -> VarRef {
        self.vars.push(var);
        VarRef(self.vars.len() - 1)
    }

    /// Borrow a record.
    ///
    /// Handles are only produced by `insert`, so they are always in bounds.
    pub fn get(&self, r: VarRef) -> &Variable {
        &self.vars[r.0]
    }

    /// Flag a record as referenced.
    pub fn mark_used(&mut self, r: VarRef) {
        self.vars[r.0].used = true;
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Check if the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Slots that at least one used binding has occupied.
    pub(crate) fn used_slots(&self) -> HashSet<(ScopeId, usize)> {
        self.vars
            .iter()
            .filter(|v| v.used)
            .map(Variable::slot_key)
            .collect()
    }

    /// Iterate over all records in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.vars.iter()
    }
}
