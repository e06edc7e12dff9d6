//! Type representation for the Nova type system.
//!
//! Types are interned into a pool owned by the semantic context and
//! identified by dense [`TypeId`]s. The reserved ids (Unknown, Unit,
//! Number, String, Bool) are allocated before any user-declared type.
//! User-declared sum and tuple types additionally get a [`TypeRecord`] in a
//! second owning vector; records reference each other by index so the pool
//! can grow without invalidating anything.

use std::ops::{BitOr, BitOrAssign};

use nova_common::token::Token;
use serde::Serialize;

/// A dense identifier into the semantic context's type pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Index into the owning pool.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a [`TypeRecord`] in the semantic context's record table.
pub type TypeRecordId = usize;

/// The shape of one interned type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeInfo {
    /// Not yet known; unification treats this as a wildcard.
    Unknown,
    Unit,
    Number,
    String,
    Bool,
    List {
        element: TypeId,
    },
    Function {
        params: Vec<TypeId>,
        result: TypeId,
        effects: EffectMask,
    },
    /// A user-declared type; the record holds the declaration details.
    Custom {
        record: TypeRecordId,
    },
}

/// Canonical description of a user-declared type.
#[derive(Debug, Clone)]
pub struct TypeRecord {
    /// The declaration's name token.
    pub name: Token,
    /// The interned id of this type.
    pub type_id: TypeId,
    /// Declared variants; empty for tuple-style types.
    pub variants: Vec<VariantRecord>,
}

/// One named case of a sum type.
#[derive(Debug, Clone)]
pub struct VariantRecord {
    pub name: Token,
    /// Resolved payload field types, in declaration order.
    pub params: Vec<TypeId>,
}

impl VariantRecord {
    /// Number of payload fields.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A bitset recording observable non-purity of an expression or function.
///
/// Absence of bits means pure. Effects propagate monotonically: a composite
/// expression's mask is the union of its sub-expressions' masks plus
/// whatever the operator contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
pub struct EffectMask(u8);

impl EffectMask {
    pub const NONE: EffectMask = EffectMask(0);
    /// Set by `async { ... }` blocks.
    pub const ASYNC: EffectMask = EffectMask(1);
    /// Set by the `!` prefix.
    pub const IMPURE: EffectMask = EffectMask(1 << 1);

    /// Whether no effect bits are set.
    pub fn is_pure(self) -> bool {
        self.0 == 0
    }

    /// Whether every bit of `other` is set in `self`.
    pub fn contains(self, other: EffectMask) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for EffectMask {
    type Output = EffectMask;

    fn bitor(self, rhs: EffectMask) -> EffectMask {
        EffectMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for EffectMask {
    fn bitor_assign(&mut self, rhs: EffectMask) {
        self.0 |= rhs.0;
    }
}
