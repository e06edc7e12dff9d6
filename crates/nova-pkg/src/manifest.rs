use std::path::Path;

use serde::Deserialize;

/// A parsed `nova.toml` manifest.
#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub project: Project,
    pub build: Build,
}

/// The `[project]` table.
#[derive(Debug, Deserialize)]
pub struct Project {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub targets: Vec<String>,
}

/// The `[build]` table.
#[derive(Debug, Deserialize)]
pub struct Build {
    /// Path of the entry module, relative to the project root.
    pub entry: String,
}

impl Manifest {
    /// Read and parse a `nova.toml` from a file path.
    pub fn from_file(path: &Path) -> Result<Manifest, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    /// Parse a `nova.toml` manifest from a string.
    pub fn parse(content: &str) -> Result<Manifest, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse manifest: {}", e))
    }
}
