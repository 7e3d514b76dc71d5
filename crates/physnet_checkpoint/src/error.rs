//! Error types for checkpoint operations.

use std::path::PathBuf;

/// Errors that can occur while loading or persisting a checkpoint.
///
/// Unlike a cache miss, a checkpoint that fails validation is a hard error:
/// the design it holds cannot be lowered.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    /// An I/O error occurred while reading or writing a checkpoint file.
    #[error("checkpoint I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is too short or its header does not decode.
    #[error("invalid checkpoint header in {path}: {reason}")]
    InvalidHeader {
        /// The checkpoint file path.
        path: PathBuf,
        /// Description of the header problem.
        reason: String,
    },

    /// The header does not start with the checkpoint magic bytes.
    #[error("{path} is not a physnet checkpoint")]
    BadMagic {
        /// The checkpoint file path.
        path: PathBuf,
    },

    /// The checkpoint format version does not match the current version.
    #[error("version mismatch in {path}: expected {expected}, got {actual}")]
    VersionMismatch {
        /// The checkpoint file path.
        path: PathBuf,
        /// The expected format version.
        expected: u32,
        /// The actual format version found in the file.
        actual: u32,
    },

    /// The stored checksum does not match the computed checksum of the payload.
    #[error("checksum mismatch in {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The checkpoint file path.
        path: PathBuf,
        /// The checksum recorded in the header.
        expected: String,
        /// The checksum computed from the payload.
        actual: String,
    },

    /// Encoding or decoding the graph failed.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// The decoded graph breaks a netlist invariant, such as two cells
    /// sharing a name.
    #[error("corrupt netlist in {path}: {source}")]
    Corrupt {
        /// The checkpoint file path.
        path: PathBuf,
        /// The broken invariant.
        source: physnet_netlist::NetlistError,
    },

    /// No checkpoint exists for the requested design.
    #[error("no checkpoint for design `{design}` in {dir}")]
    UnknownDesign {
        /// The requested design.
        design: String,
        /// The directory that was searched.
        dir: PathBuf,
    },
}
