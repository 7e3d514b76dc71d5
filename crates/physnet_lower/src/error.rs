//! Fatal lowering errors.

use physnet_diagnostics::{Category, DiagnosticCode};
use physnet_netlist::{ExportError, NetlistError};

/// Why lowering a design failed. Every variant is fatal for the design and
/// no output is written.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// A primitive kind outside the set the pass knows how to lower.
    #[error("unsupported cell type {kind} (cell `{cell}`)")]
    UnsupportedCellType {
        /// Cell name.
        cell: String,
        /// Primitive kind name.
        kind: String,
    },
    /// A pass-through primitive whose placement permutes its pins.
    #[error("cell `{cell}` ({kind}) has a non-default pin mapping")]
    UnsupportedPinPermutation {
        /// Cell name.
        cell: String,
        /// Primitive kind name.
        kind: String,
    },
    /// The design breaks a data-model contract.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    /// The export adapter failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl TransformError {
    /// Shorthand for [`TransformError::InvariantViolation`].
    pub fn invariant(message: impl Into<String>) -> Self {
        TransformError::InvariantViolation(message.into())
    }

    /// The diagnostic code this error is reported under.
    pub fn code(&self) -> DiagnosticCode {
        let number = match self {
            TransformError::UnsupportedCellType { .. } => 1,
            TransformError::UnsupportedPinPermutation { .. } => 2,
            TransformError::InvariantViolation(_) => 3,
            TransformError::Export(_) => 4,
        };
        DiagnosticCode::new(Category::Error, number)
    }
}

impl From<NetlistError> for TransformError {
    fn from(err: NetlistError) -> Self {
        TransformError::InvariantViolation(err.to_string())
    }
}
