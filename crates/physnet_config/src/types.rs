//! Configuration types deserialized from `physnet.toml`.

use serde::Deserialize;

/// The top-level run configuration parsed from `physnet.toml`.
#[derive(Debug, Deserialize)]
pub struct RunConfig {
    /// Project name and directories.
    pub project: ProjectMeta,
    /// How lowered netlists are written.
    #[serde(default)]
    pub output: OutputConfig,
    /// The designs to lower.
    #[serde(default)]
    pub designs: Vec<DesignEntry>,
}

/// Project metadata and directory layout.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// Directory holding `<design>.pnc` / `<design>.json` checkpoints,
    /// relative to the configuration file.
    #[serde(default = "default_checkpoint_dir")]
    pub checkpoint_dir: String,
    /// Directory lowered netlists are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_checkpoint_dir() -> String {
    "build/checkpoints".to_string()
}

fn default_output_dir() -> String {
    "build/physical".to_string()
}

/// Output settings.
#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Encoding of exported netlists.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Encoding of an exported netlist.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON (default).
    #[default]
    Json,
    /// Header-validated binary checkpoint.
    Checkpoint,
}

impl OutputFormat {
    /// File extension of exported netlists in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Checkpoint => "pnc",
        }
    }
}

/// One design to lower.
#[derive(Debug, Clone, Deserialize)]
pub struct DesignEntry {
    /// The design name, used to find its checkpoint and name its output.
    pub name: String,
    /// Explicit checkpoint path overriding the lookup in `checkpoint_dir`.
    #[serde(default)]
    pub checkpoint: Option<String>,
}
