//! Export adapters writing lowered graphs to disk.

use std::path::Path;

use physnet_netlist::{ExportAdapter, ExportError, NetlistGraph};

use crate::error::CheckpointError;
use crate::store::{write_file, CheckpointFormat};

/// Writes the graph as pretty-printed JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonExporter;

/// Writes the graph as a binary checkpoint artifact.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckpointExporter;

impl ExportAdapter for JsonExporter {
    fn export(&self, graph: &NetlistGraph, dest: &Path) -> Result<(), ExportError> {
        write_file(graph, dest, CheckpointFormat::Json)
            .map(|_| ())
            .map_err(into_export_error)
    }
}

impl ExportAdapter for CheckpointExporter {
    fn export(&self, graph: &NetlistGraph, dest: &Path) -> Result<(), ExportError> {
        write_file(graph, dest, CheckpointFormat::Binary)
            .map(|_| ())
            .map_err(into_export_error)
    }
}

/// Returns the exporter for a checkpoint format.
pub fn exporter_for(format: CheckpointFormat) -> Box<dyn ExportAdapter + Send + Sync> {
    match format {
        CheckpointFormat::Json => Box::new(JsonExporter),
        CheckpointFormat::Binary => Box::new(CheckpointExporter),
    }
}

fn into_export_error(err: CheckpointError) -> ExportError {
    match err {
        CheckpointError::Io { path, source } => ExportError::Io { path, source },
        other => ExportError::Encode(other.to_string()),
    }
}
