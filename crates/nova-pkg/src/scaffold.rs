//! Project scaffolding for `novac new`.
//!
//! Creates the standard Nova project layout:
//!
//! ```text
//! <dir>/
//!   nova.toml
//!   src/
//!     main.nova
//! ```

use std::path::Path;

/// Create a new Nova project at the given path.
///
/// The project name derives from the final path component; the module name
/// in the generated program is a lowercased, identifier-safe version of it.
/// Existing directories are filled in (missing parents are created);
/// returns an error if either generated file cannot be written.
pub fn scaffold_project(dir: &Path) -> Result<(), String> {
    let project_name = derive_project_name(dir);
    let module_name = sanitize_module_name(&project_name);

    let src_dir = dir.join("src");
    std::fs::create_dir_all(&src_dir)
        .map_err(|e| format!("Failed to create directory '{}': {}", src_dir.display(), e))?;

    let manifest = format!(
        "[project]\n\
         name = \"{project_name}\"\n\
         version = \"0.1.0\"\n\
         targets = [\"native\"]\n\
         \n\
         [build]\n\
         entry = \"src/main.nova\"\n"
    );
    std::fs::write(dir.join("nova.toml"), manifest)
        .map_err(|e| format!("Failed to write nova.toml: {}", e))?;

    let main_nova = format!(
        "module {module_name}.main\n\
         \n\
         fun answer(): Number = 42\n\
         \n\
         fun main(): Number = if true {{ answer() }} else {{ 0 }}\n"
    );
    std::fs::write(src_dir.join("main.nova"), main_nova)
        .map_err(|e| format!("Failed to write src/main.nova: {}", e))?;

    Ok(())
}

/// The project name: the last path component, or a stock fallback.
fn derive_project_name(dir: &Path) -> String {
    dir.file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("nova_project")
        .to_string()
}

/// Turn a project name into a usable module name: alphanumerics are
/// lowercased, `-` and `_` become `_`, everything else is dropped.
fn sanitize_module_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c == '-' || c == '_' {
                Some('_')
            } else {
                None
            }
        })
        .collect();
    if sanitized.is_empty() {
        "app".to_string()
    } else {
        sanitized
    }
}
