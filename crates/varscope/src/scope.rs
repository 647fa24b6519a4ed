//! Lexical scopes and their storage slots

mod stack;

pub use stack::{Frame, ScopeStack};

use indexmap::IndexMap;
use tracing::trace;

use crate::error::ScopeError;
use crate::variable::{ScopeId, TypeInfo, VarRef, Variable, VariableArena};

/// Per-type slot counter.
#[derive(Debug, Clone, Copy)]
struct TypeCounter {
    type_id: usize,
    count: usize,
}

/// A single `begin`/`end` block.
///
/// Slots are handed out per type tag and recycled only for the same tag,
/// so a generator can lay out storage as one array per type. Names are
/// independent of slots: any name may be bound to any type, and binding a
/// live name again shadows it until the matching `undef`.
///
/// # Example
///
/// ```
/// use varscope::{Scope, VariableArena};
/// use varscope::variable::ScopeId;
///
/// let mut arena = VariableArena::new();
/// let mut scope = Scope::new(ScopeId::root());
///
/// let x = scope.allocate(&mut arena, "x", "int");
/// scope.release(&arena, "x").unwrap();
/// let y = scope.allocate(&mut arena, "y", "int");
///
/// // y took over x's slot
/// assert_eq!(arena.get(x).id, arena.get(y).id);
/// ```
#[derive(Debug, Clone)]
pub struct Scope {
    id: ScopeId,

    /// Freed bindings per type, most recently freed last
    free: IndexMap<String, Vec<VarRef>>,

    /// Live bindings per name, innermost shadow last
    busy: IndexMap<String, Vec<VarRef>>,

    /// Type tags in first-seen order
    types: IndexMap<String, TypeCounter>,

    /// Number of slots ever created
    slots: usize,
}

impl ScopeId {
    /// Identifier of the first block in a run.
    pub fn root() -> Self {
        ScopeId(0)
    }
}

impl Scope {
    /// Create an empty scope.
    pub fn new(id: ScopeId) -> Self {
        Self {
            id,
            free: IndexMap::new(),
            busy: IndexMap::new(),
            types: IndexMap::new(),
            slots: 0,
        }
    }

    /// This scope's identifier.
    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Bind `name` to a slot of type `ty`.
    ///
    /// Reuses the most recently freed slot of the same type if there is
    /// one, otherwise creates a new slot.
    pub fn allocate(&mut self, arena: &mut VariableArena, name: &str, ty: &str) -> VarRef {
        let reused = self.free.get_mut(ty).and_then(|pool| pool.pop());

        let var = match reused {
            Some(prev) => {
                let var = arena.get(prev).rebind(name);
                trace!(binding = name, ty, id = var.id, "reusing slot");
                var
            }
            None => {
                let next_type_id = self.types.len();
                let counter = self
                    .types
                    .entry(ty.to_string())
                    .or_insert(TypeCounter {
                        type_id: next_type_id,
                        count: 0,
                    });
                let type_info = TypeInfo {
                    type_id: counter.type_id,
                    slot_index: counter.count,
                };
                counter.count += 1;

                let id = self.slots;
                self.slots += 1;
                trace!(binding = name, ty, id, "new slot");

                Variable {
                    name: name.to_string(),
                    ty: ty.to_string(),
                    id,
                    used: false,
                    type_info,
                    scope: self.id,
                }
            }
        };

        let r = arena.insert(var);
        self.busy.entry(name.to_string()).or_default().push(r);
        r
    }

    /// Unbind the visible binding of `name` and free its slot.
    ///
    /// The previously shadowed binding of `name`, if any, becomes visible.
    ///
    /// # Errors
    ///
    /// `UnboundName` if `name` has no live binding in this scope.
    pub fn release(&mut self, arena: &VariableArena, name: &str) -> Result<VarRef, ScopeError> {
        let r = self
            .busy
            .get_mut(name)
            .and_then(|stack| stack.pop())
            .ok_or_else(|| ScopeError::UnboundName {
                name: name.to_string(),
            })?;

        let ty = arena.get(r).ty.clone();
        self.free.entry(ty).or_default().push(r);
        Ok(r)
    }

    /// Look up the visible binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<VarRef> {
        self.busy.get(name).and_then(|stack| stack.last()).copied()
    }

    /// Check if `name` has a live binding.
    pub fn is_bound(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Every slot of this scope, one entry each.
    ///
    /// Live bindings come first (by name, then declaration order), then
    /// freed ones (by type, then free order).
    pub fn collect_all(&self) -> Vec<VarRef> {
        self.busy
            .values()
            .chain(self.free.values())
            .flat_map(|refs| refs.iter().copied())
            .collect()
    }

    /// Number of slots ever created in this scope.
    pub fn slot_count(&self) -> usize {
        self.slots
    }

    /// Number of distinct type tags seen in this scope.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}
