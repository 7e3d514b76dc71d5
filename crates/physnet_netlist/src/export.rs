//! The boundary to external netlist serializers.

use crate::graph::NetlistGraph;
use std::path::{Path, PathBuf};

/// Errors returned by an [`ExportAdapter`].
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing the destination failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Encoding the graph failed.
    #[error("failed to encode netlist: {0}")]
    Encode(String),
}

/// Serializes a lowered graph to a destination file.
///
/// The lowering pass calls this once, only after it succeeded, so an aborted
/// run never produces output.
pub trait ExportAdapter {
    /// Writes `graph` to `dest`.
    fn export(&self, graph: &NetlistGraph, dest: &Path) -> Result<(), ExportError>;
}
