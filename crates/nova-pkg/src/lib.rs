//! Nova project tooling: scaffolding for `novac new` and `nova.toml`
//! manifest parsing.

pub mod manifest;
pub mod scaffold;

pub use manifest::Manifest;
pub use scaffold::scaffold_project;
