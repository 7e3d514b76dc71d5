//! How serious a lowering diagnostic is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a lowering diagnostic.
///
/// - `Note`: a rewrite the pass performed (a merged LUT, a new constant net).
/// - `Warning`: cells the pass left as they were, e.g. an unmergeable LUTRAM
///   group. The design is still exported.
/// - `Error`: the pass stopped and nothing was exported.
///
/// Declaration order is the console ranking used by [`Severity::threshold`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A rewrite record.
    Note,
    /// A conservative decision worth reviewing.
    Warning,
    /// A fatal problem for the design.
    Error,
}

impl Severity {
    /// Every severity, least serious first.
    pub const ALL: [Severity; 3] = [Severity::Note, Severity::Warning, Severity::Error];

    /// Returns `true` if this severity is [`Error`](Severity::Error).
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }

    /// The least serious severity shown on the console.
    ///
    /// `quiet` wins over `verbose`.
    pub fn threshold(quiet: bool, verbose: bool) -> Severity {
        match (quiet, verbose) {
            (true, _) => Severity::Error,
            (false, true) => Severity::Note,
            (false, false) => Severity::Warning,
        }
    }

    pub(crate) fn rank(self) -> usize {
        self as usize
    }

    /// ANSI SGR color code for the severity word.
    pub(crate) fn ansi_color(self) -> &'static str {
        match self {
            Severity::Note => "36",
            Severity::Warning => "33",
            Severity::Error => "31",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}
