//! Nova semantic analyzer: scopes, type interning, type and effect
//! inference.
//!
//! [`analyze`] walks a parsed program in two passes -- type registration,
//! then declaration analysis with a function-signature pre-pass -- and
//! produces a [`SemanticContext`]: the interned type pool, the table of
//! user-declared type records, a side table mapping every expression to its
//! `(type, effects)` pair, and the accumulated diagnostics. The context is
//! read-only afterwards; IR lowering and the tooling crates query it
//! through the accessors below.
//!
//! # Architecture
//!
//! - [`ty`]: `TypeId` pool entries, type records, effect masks
//! - [`env`]: scope stack with constructor back-references
//! - [`analyze`] (module): the two-pass analyzer and expression rules
//! - [`diagnostics`]: ariadne rendering for accumulated diagnostics

mod analyze;
pub mod diagnostics;
pub mod env;
pub mod ty;

use nova_common::diagnostic::Diagnostic;
use nova_parser::ast::{Expr, ExprId, Program};
use rustc_hash::FxHashMap;

use ty::{EffectMask, TypeId, TypeInfo, TypeRecord};

/// The result of analyzing a Nova program.
///
/// Owns the type pool, the type-record table, and the expression side
/// table. Built exclusively by [`analyze`]; read-only afterwards.
pub struct SemanticContext {
    /// The type pool; `TypeId`s index into it.
    types: Vec<TypeInfo>,
    /// User-declared type records, referenced by index.
    records: Vec<TypeRecord>,
    /// Per-expression `(type, effects)` annotations, keyed by node identity.
    expr_info: FxHashMap<ExprId, (TypeId, EffectMask)>,
    /// Diagnostics accumulated during analysis, in reporting order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Reserved ids, allocated before any user-declared type.
const TYPE_UNKNOWN: TypeId = TypeId(0);
const TYPE_UNIT: TypeId = TypeId(1);
const TYPE_NUMBER: TypeId = TypeId(2);
const TYPE_STRING: TypeId = TypeId(3);
const TYPE_BOOL: TypeId = TypeId(4);

impl SemanticContext {
    pub(crate) fn new() -> Self {
        SemanticContext {
            types: vec![
                TypeInfo::Unknown,
                TypeInfo::Unit,
                TypeInfo::Number,
                TypeInfo::String,
                TypeInfo::Bool,
            ],
            records: Vec::new(),
            expr_info: FxHashMap::default(),
            diagnostics: Vec::new(),
        }
    }

    // ── Reserved ids ───────────────────────────────────────────────────

    pub fn unknown_type(&self) -> TypeId {
        TYPE_UNKNOWN
    }

    pub fn unit_type(&self) -> TypeId {
        TYPE_UNIT
    }

    pub fn number_type(&self) -> TypeId {
        TYPE_NUMBER
    }

    pub fn string_type(&self) -> TypeId {
        TYPE_STRING
    }

    pub fn bool_type(&self) -> TypeId {
        TYPE_BOOL
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Number of interned types. Every `TypeId` handed out is below this.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// The pool entry for a type id, if the id is in range.
    pub fn type_info(&self, id: TypeId) -> Option<&TypeInfo> {
        self.types.get(id.index())
    }

    /// The `(type, effects)` annotation recorded for an expression.
    pub fn lookup_expr(&self, expr: &Expr) -> Option<(TypeId, EffectMask)> {
        self.lookup_expr_id(expr.id)
    }

    /// Like [`Self::lookup_expr`], keyed by id directly.
    pub fn lookup_expr_id(&self, id: ExprId) -> Option<(TypeId, EffectMask)> {
        self.expr_info.get(&id).copied()
    }

    /// Find a user-declared type record by name.
    pub fn find_type(&self, name: &str, source: &str) -> Option<&TypeRecord> {
        self.records
            .iter()
            .find(|record| record.name.text(source) == name)
    }

    /// All user-declared type records.
    pub fn records(&self) -> &[TypeRecord] {
        &self.records
    }

    /// Resolve a type name to an id: the primitive keyword table first, then
    /// the record table. Unresolvable names silently map to `Unknown`; the
    /// analyzer layers its own diagnostic on top where one is warranted.
    pub fn resolve_type_name(&self, name: &str, source: &str) -> TypeId {
        match name {
            "Number" => TYPE_NUMBER,
            "String" => TYPE_STRING,
            "Bool" => TYPE_BOOL,
            "Unit" => TYPE_UNIT,
            _ => self
                .find_type(name, source)
                .map(|record| record.type_id)
                .unwrap_or(TYPE_UNKNOWN),
        }
    }

    /// A short human-readable name for a type, as shown by hover and
    /// diagnostics.
    pub fn type_name(&self, id: TypeId, source: &str) -> String {
        match self.type_info(id) {
            Some(TypeInfo::Unit) => "Unit".to_string(),
            Some(TypeInfo::Number) => "Number".to_string(),
            Some(TypeInfo::String) => "String".to_string(),
            Some(TypeInfo::Bool) => "Bool".to_string(),
            Some(TypeInfo::List { .. }) => "List".to_string(),
            Some(TypeInfo::Function { .. }) => "Function".to_string(),
            Some(TypeInfo::Custom { record }) => self
                .records
                .get(*record)
                .map(|r| r.name.text(source).to_string())
                .unwrap_or_else(|| "Custom".to_string()),
            Some(TypeInfo::Unknown) | None => "Unknown".to_string(),
        }
    }

    // ── Mutation (analyzer-internal) ───────────────────────────────────

    /// Intern a type, reusing an existing id for structurally equal
    /// immutable entries.
    ///
    /// Function types are always interned fresh: the analyzer writes the
    /// body's type and effects back into them, so they must never alias.
    pub(crate) fn intern(&mut self, info: TypeInfo) -> TypeId {
        if !matches!(info, TypeInfo::Function { .. }) {
            if let Some(existing) = self.types.iter().position(|t| *t == info) {
                return TypeId(existing as u32);
            }
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(info);
        id
    }

    pub(crate) fn types_mut(&mut self) -> &mut Vec<TypeInfo> {
        &mut self.types
    }

    pub(crate) fn records_mut(&mut self) -> &mut Vec<TypeRecord> {
        &mut self.records
    }

    pub(crate) fn record_expr(&mut self, id: ExprId, ty: TypeId, effects: EffectMask) {
        self.expr_info.insert(id, (ty, effects));
    }
}

/// Analyze a parsed program.
///
/// This is the main entry point for the semantic analyzer. The source text
/// is borrowed for token-text access only; nothing in the returned context
/// aliases it beyond copied tokens.
pub fn analyze(program: &Program, source: &str) -> SemanticContext {
    analyze::analyze_program(program, source)
}
