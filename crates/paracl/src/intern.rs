//! Identifier interning.
//!
//! Equal identifier text always resolves to the same [`NameId`]. The parser
//! interns every identifier it sees; the evaluator and scope stack compare
//! and hash `NameId`s instead of strings, which is cheaper and sidesteps any
//! borrow-lifetime entanglement between the source text and the AST.
//!
//! Once interned, a name's text never changes and a `NameId` never becomes
//! invalid: the interner only grows for the lifetime of the [`crate::arena::Arena`]
//! it is paired with.

use ahash::AHashMap;

/// Index into the interner's backing storage.
///
/// `u32` keeps the handle small; ParaC programs are not going to declare
/// four billion distinct identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameId(u32);

impl NameId {
    #[inline]
    fn new(index: usize) -> Self {
        Self(u32::try_from(index).expect("more identifiers than fit in a u32"))
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Deduplicating store of identifier text.
///
/// `intern` is idempotent: interning the same text twice returns the same
/// [`NameId`]. Text is never removed once interned.
#[derive(Debug, Default)]
pub struct Interner {
    names: Vec<Box<str>>,
    lookup: AHashMap<Box<str>, NameId>,
}

impl Interner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `text`, returning its stable handle.
    ///
    /// If `text` was interned before, the existing handle is returned and no
    /// allocation happens.
    pub fn intern(&mut self, text: &str) -> NameId {
        if let Some(id) = self.lookup.get(text) {
            return *id;
        }
        let id = NameId::new(self.names.len());
        let boxed: Box<str> = text.into();
        self.names.push(boxed.clone());
        self.lookup.insert(boxed, id);
        id
    }

    /// Resolves a handle back to its text.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this interner.
    #[must_use]
    pub fn resolve(&self, id: NameId) -> &str {
        &self.names[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_text_shares_one_id() {
        let mut interner = Interner::new();
        let a = interner.intern("x");
        let b = interner.intern("x");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_text_gets_distinct_ids() {
        let mut interner = Interner::new();
        let a = interner.intern("x");
        let b = interner.intern("y");
        assert_ne!(a, b);
    }

    #[test]
    fn resolve_round_trips() {
        let mut interner = Interner::new();
        let id = interner.intern("count");
        assert_eq!(interner.resolve(id), "count");
    }

    #[test]
    fn order_of_interning_does_not_affect_identity() {
        let mut interner = Interner::new();
        let first = interner.intern("a");
        interner.intern("b");
        let first_again = interner.intern("a");
        assert_eq!(first, first_again);
    }
}
