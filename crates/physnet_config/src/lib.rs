//! Parsing and validation of `physnet.toml` run configuration files.
//!
//! The configuration names the checkpoint and output directories and the
//! designs a `physnet run` lowers. The lowering pass itself reads none of it.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_design, resolve_designs, ResolvedDesign};
pub use types::*;
