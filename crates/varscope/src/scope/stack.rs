//! Stack of open scopes

use tracing::debug;

use super::Scope;
use crate::action::ActionId;
use crate::variable::ScopeId;

/// An open block: its scope plus the `begin` action waiting to be patched.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The block's scope
    pub scope: Scope,

    /// The `begin` action this block's `end` fills in
    pub begin: ActionId,

    /// 0-based line of the `begin` directive
    pub line: usize,
}

/// Nested scope manager.
///
/// The innermost open block is the active scope; its parents are
/// suspended below it and become active again as blocks close.
///
/// # Example
///
/// ```
/// use varscope::{ScopeStack, VariableArena};
/// use varscope::action::ActionId;
///
/// let mut arena = VariableArena::new();
/// let mut stack = ScopeStack::new();
/// assert!(stack.current().is_none());
///
/// stack.push(ActionId::new(0), 0);
/// stack.current_mut().unwrap().allocate(&mut arena, "x", "int");
/// assert_eq!(stack.depth(), 1);
///
/// let frame = stack.pop().unwrap();
/// assert_eq!(frame.begin, ActionId::new(0));
/// assert_eq!(stack.depth(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    frames: Vec<Frame>,

    /// Number of scopes ever opened
    opened: usize,
}

impl ScopeStack {
    /// Create a stack with no open scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new block whose `begin` action is `begin`.
    pub fn push(&mut self, begin: ActionId, line: usize) -> ScopeId {
        let id = ScopeId(self.opened);
        self.opened += 1;
        self.frames.push(Frame {
            scope: Scope::new(id),
            begin,
            line,
        });
        debug!(depth = self.frames.len(), line, "entered scope");
        id
    }

    /// Close the innermost block, making its parent active again.
    ///
    /// Returns `None` if no block is open.
    pub fn pop(&mut self) -> Option<Frame> {
        let frame = self.frames.pop()?;
        debug!(depth = self.frames.len(), line = frame.line, "left scope");
        Some(frame)
    }

    /// The active scope, if any block is open.
    pub fn current(&self) -> Option<&Scope> {
        self.frames.last().map(|f| &f.scope)
    }

    /// Mutable access to the active scope.
    pub fn current_mut(&mut self) -> Option<&mut Scope> {
        self.frames.last_mut().map(|f| &mut f.scope)
    }

    /// Number of open blocks.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Check if no block is open.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The outermost block that is still open.
    pub fn outermost(&self) -> Option<&Frame> {
        self.frames.first()
    }
}
