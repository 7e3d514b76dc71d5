//! Errors raised while reading a `physnet.toml`.

use std::path::PathBuf;

/// Why a project configuration could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// The file that was opened.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The content is not TOML or does not match the configuration schema.
    #[error("invalid physnet.toml: {0}")]
    Parse(String),

    /// `[project] name` is empty.
    #[error("[project] name must not be empty")]
    EmptyProjectName,

    /// The file lists no `[[designs]]`.
    #[error("no [[designs]] configured, nothing to lower")]
    NoDesigns,

    /// The design at this position in `[[designs]]` has an empty name.
    #[error("designs[{0}] has an empty name")]
    EmptyDesignName(usize),

    /// Two `[[designs]]` entries share a name.
    #[error("design `{0}` is listed more than once")]
    DuplicateDesign(String),

    /// `--design` names a design the configuration does not list.
    #[error("design `{design}` is not configured (known: {})", .known.join(", "))]
    UnknownDesign {
        /// The requested design.
        design: String,
        /// Every configured design, in file order.
        known: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_design_lists_the_configured_ones() {
        let err = ConfigError::UnknownDesign {
            design: "uart".to_string(),
            known: vec!["counter".to_string(), "spi".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "design `uart` is not configured (known: counter, spi)"
        );
    }

    #[test]
    fn read_error_names_the_file() {
        let err = ConfigError::Read {
            path: PathBuf::from("proj/physnet.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        assert_eq!(
            err.to_string(),
            "cannot read proj/physnet.toml: file not found"
        );
    }

    #[test]
    fn empty_design_name_points_at_the_entry() {
        assert_eq!(
            ConfigError::EmptyDesignName(2).to_string(),
            "designs[2] has an empty name"
        );
    }
}
