//! CLI commands

mod run;
mod schema;

pub use run::{run_script, RunArgs};
pub use schema::{print_schema, SchemaArgs};

use anyhow::{Context, Result};
use custform_core::config::FormConfig;
use std::path::Path;

/// Load configuration from a JSON file if given, else from the environment.
pub(crate) fn load_config(path: Option<&Path>) -> Result<FormConfig> {
    let config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            FormConfig::from_json_str(&json)?
        }
        None => FormConfig::default(),
    };
    Ok(config.with_overrides(std::env::vars())?)
}
