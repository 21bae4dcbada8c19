//! The variable scope stack.
//!
//! Scopes nest lexically and resolve by name (`spec.md` §4.E), which is a
//! deliberate departure from a slot-indexed namespace: this engine walks the
//! AST directly rather than compiling to bytecode ahead of time, so there is
//! no compile pass available to pre-resolve a name to a fixed frame/slot
//! pair. Each frame is therefore a name-keyed map, and both read and write
//! search frames innermost-first.
//!
//! Read and write follow different rules once a name is not found in any
//! live frame:
//! - a read of an unbound name is always `RuntimeError::UndeclaredVariable`.
//! - a write searches innermost-to-outermost for an existing binding and
//!   updates it in place wherever found; only when no frame holds the name
//!   does the write create one, in the innermost frame. This matches the
//!   source's own `Context::getVarValue`/`Context::getVar` walk exactly, and
//!   is what lets a loop body's `x := x - 1` keep mutating the loop
//!   counter declared outside the loop across iterations even though the
//!   body itself is a fresh scope each time around.

use ahash::AHashMap;

use crate::{error::RuntimeError, intern::NameId, value::Value};

/// One lexical block's bindings.
type Frame = AHashMap<NameId, Value>;

/// A stack of lexical scopes, innermost last.
///
/// The root program body occupies the single always-present bottom frame;
/// every `Scope` statement and the body of an `if`/`while` push one frame on
/// entry and pop it on exit, regardless of how that block was left (normal
/// fall-through or a propagating `RuntimeError`, since unwinding through `?`
/// drops the guard the same way either way).
#[derive(Debug, Default)]
pub struct Scopes {
    frames: Vec<Frame>,
}

impl Scopes {
    /// Creates a scope stack with one empty frame already open.
    #[must_use]
    pub fn new() -> Self {
        Self { frames: vec![Frame::default()] }
    }

    /// Pushes a fresh, empty frame.
    pub fn enter(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Pops the innermost frame.
    ///
    /// # Panics
    /// Panics if called with no frame open (would drop the root frame),
    /// which indicates an `enter`/`leave` mismatch in the evaluator.
    pub fn leave(&mut self) {
        assert!(self.frames.len() > 1, "attempted to leave the root scope");
        self.frames.pop();
    }

    /// Reads a bound name, searching innermost frame first.
    pub fn read(&self, name: NameId, display: impl FnOnce() -> String) -> Result<&Value, RuntimeError> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(&name))
            .ok_or_else(|| RuntimeError::UndeclaredVariable(display()))
    }

    /// Resolves a mutable reference to a bound name, searching innermost
    /// frame first. Does not create a binding; use [`Scopes::write`] for
    /// that.
    pub fn read_mut(&mut self, name: NameId, display: impl FnOnce() -> String) -> Result<&mut Value, RuntimeError> {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.get_mut(&name))
            .ok_or_else(|| RuntimeError::UndeclaredVariable(display()))
    }

    /// Binds `name` to `value`: updates the nearest enclosing existing
    /// binding if one exists, otherwise creates a new binding in the
    /// innermost frame.
    pub fn write(&mut self, name: NameId, value: Value) {
        if let Some(frame) = self.frames.iter_mut().rev().find(|frame| frame.contains_key(&name)) {
            frame.insert(name, value);
            return;
        }
        self.innermost_mut().insert(name, value);
    }

    fn innermost_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("root frame is never popped")
    }
}
