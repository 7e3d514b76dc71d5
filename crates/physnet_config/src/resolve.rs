//! Design resolution: turning configured names into concrete paths.

use crate::error::ConfigError;
use crate::types::{OutputFormat, RunConfig};
use std::path::{Path, PathBuf};

/// A design with its paths resolved against the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDesign {
    /// The design name.
    pub name: String,
    /// Directory searched for the design's checkpoint.
    pub checkpoint_dir: PathBuf,
    /// Explicit checkpoint file, when the configuration names one.
    pub checkpoint: Option<PathBuf>,
    /// Where the lowered netlist is written.
    pub output: PathBuf,
    /// Encoding of the lowered netlist.
    pub format: OutputFormat,
}

/// Resolves one configured design.
pub fn resolve_design(
    config: &RunConfig,
    project_dir: &Path,
    name: &str,
) -> Result<ResolvedDesign, ConfigError> {
    let entry = config
        .designs
        .iter()
        .find(|d| d.name == name)
        .ok_or_else(|| ConfigError::UnknownDesign {
            design: name.to_string(),
            known: config.designs.iter().map(|d| d.name.clone()).collect(),
        })?;

    let format = config.output.format;
    let output = project_dir
        .join(&config.project.output_dir)
        .join(format!("{}.{}", entry.name, format.extension()));

    Ok(ResolvedDesign {
        name: entry.name.clone(),
        checkpoint_dir: project_dir.join(&config.project.checkpoint_dir),
        checkpoint: entry.checkpoint.as_ref().map(|p| project_dir.join(p)),
        output,
        format,
    })
}

/// Resolves every configured design in order, or only `only` when given.
pub fn resolve_designs(
    config: &RunConfig,
    project_dir: &Path,
    only: Option<&str>,
) -> Result<Vec<ResolvedDesign>, ConfigError> {
    match only {
        Some(name) => Ok(vec![resolve_design(config, project_dir, name)?]),
        None => config
            .designs
            .iter()
            .map(|d| resolve_design(config, project_dir, &d.name))
            .collect(),
    }
}
