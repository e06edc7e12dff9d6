//! Name environment with a scope stack.
//!
//! Bindings map names to their type id, accumulated effects, and (for sum
//! type constructors) a back-reference to the owning type record and
//! variant. Entering a function body, block, lambda, or match arm pushes a
//! frame; lookups search from the innermost frame outward. Duplicate
//! detection is against the current frame only, so inner scopes may shadow
//! outer bindings.

use nova_common::token::Token;
use rustc_hash::FxHashMap;

use crate::ty::{EffectMask, TypeId, TypeRecordId};

/// Back-reference from a constructor binding to its declaring type.
#[derive(Debug, Clone, Copy)]
pub struct ConstructorRef {
    /// Index of the owning [`crate::ty::TypeRecord`].
    pub record: TypeRecordId,
    /// Index of the variant within the record.
    pub variant: usize,
}

/// One name binding.
#[derive(Debug, Clone, Copy)]
pub struct ScopeEntry {
    /// The token that introduced the binding.
    pub name: Token,
    pub ty: TypeId,
    pub effects: EffectMask,
    /// Present when the binding is a sum-type constructor.
    pub constructor: Option<ConstructorRef>,
}

impl ScopeEntry {
    /// Whether this binding is a constructor.
    pub fn is_constructor(&self) -> bool {
        self.constructor.is_some()
    }
}

/// A stack of scope frames mapping names to bindings.
///
/// Index 0 is the outermost (global) scope.
pub struct ScopeStack {
    frames: Vec<FxHashMap<String, ScopeEntry>>,
}

impl ScopeStack {
    /// Create a new stack with one empty global scope.
    pub fn new() -> Self {
        ScopeStack {
            frames: vec![FxHashMap::default()],
        }
    }

    /// Push a new empty frame onto the stack.
    pub fn push(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    /// Pop the top frame.
    ///
    /// # Panics
    ///
    /// Panics if called when only the global scope remains.
    pub fn pop(&mut self) {
        assert!(self.frames.len() > 1, "cannot pop the global scope");
        self.frames.pop();
    }

    /// Define a binding in the current frame.
    ///
    /// Returns `false` (without inserting) when the name is already bound in
    /// the current frame; the caller reports the duplicate.
    pub fn define(&mut self, name: &str, entry: ScopeEntry) -> bool {
        let frame = self
            .frames
            .last_mut()
            .expect("scope stack should never be empty");
        if frame.contains_key(name) {
            return false;
        }
        frame.insert(name.to_string(), entry);
        true
    }

    /// Look up a name, searching from the innermost frame outward.
    pub fn lookup(&self, name: &str) -> Option<&ScopeEntry> {
        for frame in self.frames.iter().rev() {
            if let Some(entry) = frame.get(name) {
                return Some(entry);
            }
        }
        None
    }

    /// Number of frames on the stack.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nova_common::span::Span;
    use nova_common::token::TokenKind;

    fn entry(ty: TypeId) -> ScopeEntry {
        ScopeEntry {
            name: Token::new(TokenKind::Identifier, Span::new(0, 1), 1, 1),
            ty,
            effects: EffectMask::NONE,
            constructor: None,
        }
    }

    #[test]
    fn lookup_in_current_scope() {
        let mut scopes = ScopeStack::new();
        assert!(scopes.define("x", entry(TypeId(2))));
        assert!(scopes.lookup("x").is_some());
        assert!(scopes.lookup("y").is_none());
    }

    #[test]
    fn lookup_in_outer_scope() {
        let mut scopes = ScopeStack::new();
        scopes.define("x", entry(TypeId(2)));
        scopes.push();
        assert!(scopes.lookup("x").is_some());
    }

    #[test]
    fn shadowing_is_allowed_across_frames() {
        let mut scopes = ScopeStack::new();
        scopes.define("x", entry(TypeId(2)));
        scopes.push();
        assert!(scopes.define("x", entry(TypeId(3))));
        assert_eq!(scopes.lookup("x").unwrap().ty, TypeId(3));
        scopes.pop();
        assert_eq!(scopes.lookup("x").unwrap().ty, TypeId(2));
    }

    #[test]
    fn duplicate_in_same_frame_rejected() {
        let mut scopes = ScopeStack::new();
        assert!(scopes.define("x", entry(TypeId(2))));
        assert!(!scopes.define("x", entry(TypeId(3))));
        // The original binding wins.
        assert_eq!(scopes.lookup("x").unwrap().ty, TypeId(2));
    }

    #[test]
    fn scope_cleanup() {
        let mut scopes = ScopeStack::new();
        scopes.push();
        scopes.define("y", entry(TypeId(4)));
        assert!(scopes.lookup("y").is_some());
        scopes.pop();
        assert!(scopes.lookup("y").is_none());
    }

    #[test]
    #[should_panic(expected = "cannot pop the global scope")]
    fn pop_global_scope_panics() {
        let mut scopes = ScopeStack::new();
        scopes.pop();
    }
}
