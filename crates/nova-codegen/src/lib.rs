//! Nova object backend: lowers the IR to a C translation unit and drives
//! the host C compiler.
//!
//! The backend is deliberately small: it can express literals, identifiers,
//! calls, if-expressions (flattened to C conditional expressions), and
//! while-expressions in statement position. Lists and matches are rejected
//! with a human-readable error. [`emit_object`] writes the derived `.c`
//! file next to the requested object path, runs
//! `cc -std=c11 -O3 -c <c> -o <obj>`, and removes the temporary source
//! whether or not the compiler succeeds.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::Command;

use nova_ir::{IrExpr, IrExprKind, IrFunction, IrProgram};
use nova_typeck::ty::{TypeId, TypeInfo};
use nova_typeck::SemanticContext;

/// Why object emission failed.
#[derive(Debug)]
pub enum CodegenError {
    /// The IR contains a form the C backend cannot express.
    Unsupported(&'static str),
    /// The derived C file could not be written.
    Write(std::io::Error),
    /// The host C compiler exited with a failure status.
    CompilerFailed(String),
}

impl std::fmt::Display for CodegenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodegenError::Unsupported(what) => write!(f, "unsupported expression: {what}"),
            CodegenError::Write(err) => write!(f, "failed to write C source: {err}"),
            CodegenError::CompilerFailed(detail) => {
                write!(f, "code generation failed ({detail})")
            }
        }
    }
}

impl std::error::Error for CodegenError {}

/// Render the whole program as a C translation unit.
pub fn emit_translation_unit(
    program: &IrProgram,
    semantics: &SemanticContext,
    source: &str,
) -> Result<String, CodegenError> {
    let mut out = String::from("#include <stdbool.h>\n\n");
    for function in &program.functions {
        emit_function(&mut out, semantics, source, function)?;
    }
    Ok(out)
}

/// Emit the program as an object file at `object_path`.
///
/// The C source is written to a sibling path (`.o` swapped for `.c`, or
/// `.c` appended) and removed again before returning.
pub fn emit_object(
    program: &IrProgram,
    semantics: &SemanticContext,
    source: &str,
    object_path: &Path,
) -> Result<(), CodegenError> {
    let unit = emit_translation_unit(program, semantics, source)?;

    let c_path = derive_c_path(object_path);
    std::fs::write(&c_path, unit).map_err(CodegenError::Write)?;

    let status = Command::new("cc")
        .args(["-std=c11", "-O3", "-c"])
        .arg(&c_path)
        .arg("-o")
        .arg(object_path)
        .status();

    let _ = std::fs::remove_file(&c_path);

    match status {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(CodegenError::CompilerFailed(format!(
            "cc exit {}",
            status.code().unwrap_or(-1)
        ))),
        Err(err) => Err(CodegenError::CompilerFailed(format!(
            "failed to run cc: {err}"
        ))),
    }
}

/// The path of the temporary C file derived from the object path.
fn derive_c_path(object_path: &Path) -> PathBuf {
    if object_path.extension().is_some_and(|ext| ext == "o") {
        object_path.with_extension("c")
    } else {
        let mut path = object_path.as_os_str().to_owned();
        path.push(".c");
        PathBuf::from(path)
    }
}

/// The C spelling of a Nova type. Anything without a C shape decays to
/// `double`, matching what the checker exercises.
fn type_to_c(semantics: &SemanticContext, ty: TypeId) -> &'static str {
    match semantics.type_info(ty) {
        Some(TypeInfo::Number) => "double",
        Some(TypeInfo::Bool) => "bool",
        Some(TypeInfo::String) => "const char *",
        Some(TypeInfo::Unit) => "void",
        _ => "double",
    }
}

fn emit_function(
    out: &mut String,
    semantics: &SemanticContext,
    source: &str,
    function: &IrFunction,
) -> Result<(), CodegenError> {
    let return_type = type_to_c(semantics, function.return_type);
    let _ = write!(out, "{} {}(", return_type, function.name.text(source));
    if function.params.is_empty() {
        out.push_str("void");
    } else {
        for (i, param) in function.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(
                out,
                "{} {}",
                type_to_c(semantics, param.ty),
                param.name.text(source)
            );
        }
    }
    out.push_str(") {\n    ");

    if return_type == "void" {
        emit_statement(out, source, &function.body)?;
    } else {
        out.push_str("return ");
        emit_expr(out, source, &function.body)?;
        out.push_str(";\n");
    }
    out.push_str("}\n\n");
    Ok(())
}

/// Emit an expression in statement position. Only here may a while loop
/// appear; everything else falls through to value emission.
fn emit_statement(out: &mut String, source: &str, expr: &IrExpr) -> Result<(), CodegenError> {
    if let IrExprKind::While { condition, body } = &expr.kind {
        out.push_str("while (");
        emit_expr(out, source, condition)?;
        out.push_str(") {\n        ");
        emit_expr(out, source, body)?;
        out.push_str(";\n    }\n");
        return Ok(());
    }
    emit_expr(out, source, expr)?;
    out.push_str(";\n");
    Ok(())
}

/// Emit an expression in value position.
fn emit_expr(out: &mut String, source: &str, expr: &IrExpr) -> Result<(), CodegenError> {
    match &expr.kind {
        IrExprKind::Number(value) => {
            let _ = write!(out, "{value}");
            Ok(())
        }
        IrExprKind::Bool(value) => {
            out.push_str(if *value { "true" } else { "false" });
            Ok(())
        }
        // String lexemes still carry their quotes, so they are already
        // valid C string literals.
        IrExprKind::String(text) => {
            out.push_str(text);
            Ok(())
        }
        IrExprKind::Unit => {
            out.push('0');
            Ok(())
        }
        IrExprKind::Identifier(token) => {
            out.push_str(token.text(source));
            Ok(())
        }
        IrExprKind::Call { callee, args } => {
            out.push_str(callee.text(source));
            out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                emit_expr(out, source, arg)?;
            }
            out.push(')');
            Ok(())
        }
        IrExprKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            out.push('(');
            emit_expr(out, source, condition)?;
            out.push_str(" ? ");
            emit_expr(out, source, then_branch)?;
            out.push_str(" : ");
            emit_expr(out, source, else_branch)?;
            out.push(')');
            Ok(())
        }
        IrExprKind::While { .. } => Err(CodegenError::Unsupported(
            "while in value position",
        )),
        IrExprKind::List(_) => Err(CodegenError::Unsupported("list literal")),
        IrExprKind::Match { .. } => Err(CodegenError::Unsupported("match expression")),
        IrExprKind::Sequence(_) => Err(CodegenError::Unsupported("sequence expression")),
    }
}
