//! Checkpoint storage and export adapters for netlist graphs.
//!
//! Designs are read from and written to a checkpoint directory, either as a
//! validated binary artifact (`<design>.pnc`) or as JSON (`<design>.json`).
//! The [`JsonExporter`] and [`CheckpointExporter`] adapters let the lowering
//! pass write its result in either form.

#![warn(missing_docs)]

pub mod artifact;
pub mod checksum;
pub mod error;
pub mod export;
pub mod store;

pub use artifact::{CheckpointHeader, CHECKPOINT_FORMAT_VERSION};
pub use checksum::Checksum;
pub use error::CheckpointError;
pub use export::{exporter_for, CheckpointExporter, JsonExporter};
pub use store::{
    load_file, write_file, Checkpoint, CheckpointFormat, CheckpointProvider, DirCheckpointStore,
};
