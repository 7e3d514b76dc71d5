//! Binary checkpoint artifacts.
//!
//! A checkpoint file is a 4-byte little-endian header length, a `bincode`
//! encoded [`CheckpointHeader`], and the `bincode` encoded graph. The header
//! carries magic bytes, the format version and a checksum of the payload.

use std::path::Path;

use physnet_netlist::NetlistGraph;
use serde::{Deserialize, Serialize};

use crate::checksum::Checksum;
use crate::error::CheckpointError;

/// Magic bytes identifying a physnet checkpoint.
pub const CHECKPOINT_MAGIC: [u8; 4] = *b"PNCK";

/// Current checkpoint format version. Increment on breaking changes to
/// the header or payload format.
pub const CHECKPOINT_FORMAT_VERSION: u32 = 1;

/// Header prepended to every checkpoint for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointHeader {
    /// Magic bytes: must be `b"PNCK"`.
    pub magic: [u8; 4],

    /// Checkpoint format version.
    pub format_version: u32,

    /// Version of the tool that wrote the checkpoint.
    pub producer_version: String,

    /// Digest of the payload.
    pub checksum: Checksum,
}

/// Encodes a graph as checkpoint bytes and returns them with the payload
/// checksum.
pub fn encode(graph: &NetlistGraph) -> Result<(Vec<u8>, Checksum), CheckpointError> {
    let payload = bincode::serde::encode_to_vec(graph, bincode::config::standard()).map_err(
        |e| CheckpointError::Serialization {
            reason: e.to_string(),
        },
    )?;
    let checksum = Checksum::of(&payload);

    let header = CheckpointHeader {
        magic: CHECKPOINT_MAGIC,
        format_version: CHECKPOINT_FORMAT_VERSION,
        producer_version: env!("CARGO_PKG_VERSION").to_string(),
        checksum,
    };
    let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
        .map_err(|e| CheckpointError::Serialization {
            reason: e.to_string(),
        })?;

    let header_len = header_bytes.len() as u32;
    let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
    output.extend_from_slice(&header_len.to_le_bytes());
    output.extend_from_slice(&header_bytes);
    output.extend_from_slice(&payload);
    Ok((output, checksum))
}

/// Decodes checkpoint bytes read from `path`.
///
/// Every header check is a hard error, as is a graph in which two cells,
/// nets or sites share a name. The returned graph has its name indices
/// rebuilt.
pub fn decode(raw: &[u8], path: &Path) -> Result<NetlistGraph, CheckpointError> {
    let invalid = |reason: &str| CheckpointError::InvalidHeader {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let len_bytes: [u8; 4] = raw
        .get(..4)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| invalid("file shorter than the header length field"))?;
    let header_len = u32::from_le_bytes(len_bytes) as usize;
    let header_bytes = raw
        .get(4..4 + header_len)
        .ok_or_else(|| invalid("header extends past end of file"))?;

    let header: CheckpointHeader =
        bincode::serde::decode_from_slice(header_bytes, bincode::config::standard())
            .map_err(|e| invalid(&e.to_string()))?
            .0;

    if header.magic != CHECKPOINT_MAGIC {
        return Err(CheckpointError::BadMagic {
            path: path.to_path_buf(),
        });
    }
    if header.format_version != CHECKPOINT_FORMAT_VERSION {
        return Err(CheckpointError::VersionMismatch {
            path: path.to_path_buf(),
            expected: CHECKPOINT_FORMAT_VERSION,
            actual: header.format_version,
        });
    }

    let payload = &raw[4 + header_len..];
    header.checksum.verify(payload, path)?;

    let graph: NetlistGraph =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())
            .map_err(|e| CheckpointError::Serialization {
                reason: e.to_string(),
            })?
            .0;
    restore(graph, path)
}

/// Rebuilds the name indices of a freshly decoded graph.
pub(crate) fn restore(
    mut graph: NetlistGraph,
    path: &Path,
) -> Result<NetlistGraph, CheckpointError> {
    graph
        .rebuild_indices()
        .map_err(|source| CheckpointError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(graph)
}
