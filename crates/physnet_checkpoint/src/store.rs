//! Directory-backed checkpoint provider.

use std::path::{Path, PathBuf};

use physnet_netlist::NetlistGraph;

use crate::artifact;
use crate::checksum::Checksum;
use crate::error::CheckpointError;

/// File extension of binary checkpoints.
pub const BINARY_EXTENSION: &str = "pnc";

/// File extension of JSON checkpoints.
pub const JSON_EXTENSION: &str = "json";

/// On-disk encoding of a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointFormat {
    /// Header-validated `bincode` artifact.
    Binary,
    /// Plain `serde_json` graph.
    Json,
}

impl CheckpointFormat {
    /// Guesses the format from a file extension; anything but `.json` is binary.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(JSON_EXTENSION) => Self::Json,
            _ => Self::Binary,
        }
    }

    /// The file extension used for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Binary => BINARY_EXTENSION,
            Self::Json => JSON_EXTENSION,
        }
    }
}

/// A persisted design snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    /// The design the snapshot belongs to.
    pub design: String,
    /// Where it was written.
    pub path: PathBuf,
    /// Digest of the written payload.
    pub checksum: Checksum,
}

/// Supplies design graphs to the lowering pass and persists results.
pub trait CheckpointProvider {
    /// Loads the graph of `design`.
    fn load(&self, design: &str) -> Result<NetlistGraph, CheckpointError>;

    /// Persists `graph` as the checkpoint of `design`.
    fn persist(&self, graph: &NetlistGraph, design: &str) -> Result<Checkpoint, CheckpointError>;
}

/// Checkpoints stored as `<dir>/<design>.pnc` or `<dir>/<design>.json`.
#[derive(Debug, Clone)]
pub struct DirCheckpointStore {
    dir: PathBuf,
    format: CheckpointFormat,
}

impl DirCheckpointStore {
    /// Creates a store over `dir` that persists binary checkpoints.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            format: CheckpointFormat::Binary,
        }
    }

    /// Sets the format used by [`CheckpointProvider::persist`].
    pub fn with_format(mut self, format: CheckpointFormat) -> Self {
        self.format = format;
        self
    }

    /// The directory this store reads and writes.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path of a design's checkpoint in the given format.
    pub fn checkpoint_path(&self, design: &str, format: CheckpointFormat) -> PathBuf {
        self.dir.join(format!("{design}.{}", format.extension()))
    }

    /// Returns the existing checkpoint of `design`, binary first.
    pub fn locate(&self, design: &str) -> Option<PathBuf> {
        [CheckpointFormat::Binary, CheckpointFormat::Json]
            .into_iter()
            .map(|format| self.checkpoint_path(design, format))
            .find(|path| path.is_file())
    }
}

impl CheckpointProvider for DirCheckpointStore {
    fn load(&self, design: &str) -> Result<NetlistGraph, CheckpointError> {
        let path = self
            .locate(design)
            .ok_or_else(|| CheckpointError::UnknownDesign {
                design: design.to_string(),
                dir: self.dir.clone(),
            })?;
        load_file(&path)
    }

    fn persist(&self, graph: &NetlistGraph, design: &str) -> Result<Checkpoint, CheckpointError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CheckpointError::Io {
            path: self.dir.clone(),
            source: e,
        })?;
        let path = self.checkpoint_path(design, self.format);
        let checksum = write_file(graph, &path, self.format)?;
        Ok(Checkpoint {
            design: design.to_string(),
            path,
            checksum,
        })
    }
}

/// Loads a checkpoint file, picking the decoder from its extension.
pub fn load_file(path: &Path) -> Result<NetlistGraph, CheckpointError> {
    let raw = std::fs::read(path).map_err(|e| CheckpointError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    match CheckpointFormat::from_path(path) {
        CheckpointFormat::Binary => artifact::decode(&raw, path),
        CheckpointFormat::Json => {
            let graph: NetlistGraph =
                serde_json::from_slice(&raw).map_err(|e| CheckpointError::Serialization {
                    reason: format!("{}: {e}", path.display()),
                })?;
            artifact::restore(graph, path)
        }
    }
}

/// Writes `graph` to `path` and returns the checksum of the written payload.
pub fn write_file(
    graph: &NetlistGraph,
    path: &Path,
    format: CheckpointFormat,
) -> Result<Checksum, CheckpointError> {
    let (bytes, checksum) = match format {
        CheckpointFormat::Binary => artifact::encode(graph)?,
        CheckpointFormat::Json => {
            let bytes = serde_json::to_vec_pretty(graph).map_err(|e| {
                CheckpointError::Serialization {
                    reason: e.to_string(),
                }
            })?;
            let checksum = Checksum::of(&bytes);
            (bytes, checksum)
        }
    };
    std::fs::write(path, &bytes).map_err(|e| CheckpointError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(checksum)
}
