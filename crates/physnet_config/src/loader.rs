//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::RunConfig;
use std::collections::BTreeSet;
use std::path::Path;

/// Name of the configuration file inside a project directory.
pub const CONFIG_FILE_NAME: &str = "physnet.toml";

/// Loads and validates `<project_dir>/physnet.toml`.
pub fn load_config(project_dir: &Path) -> Result<RunConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<RunConfig, ConfigError> {
    let config: RunConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &RunConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::EmptyProjectName);
    }
    if config.designs.is_empty() {
        return Err(ConfigError::NoDesigns);
    }
    let mut seen = BTreeSet::new();
    for (i, design) in config.designs.iter().enumerate() {
        if design.name.is_empty() {
            return Err(ConfigError::EmptyDesignName(i));
        }
        if !seen.insert(design.name.as_str()) {
            return Err(ConfigError::DuplicateDesign(design.name.clone()));
        }
    }
    Ok(())
}
