//! Errors raised by netlist graph mutators and validation.

use crate::ids::{CellId, HierCellId, NetId, PortInstId, SiteId};

/// A data-model contract violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetlistError {
    /// A cell handle refers to a removed or unknown cell.
    #[error("dangling cell reference #{0}")]
    DanglingCell(CellId),
    /// A net handle refers to a removed or unknown net.
    #[error("dangling net reference #{0}")]
    DanglingNet(NetId),
    /// A port-instance handle refers to a removed or unknown port instance.
    #[error("dangling port instance reference #{0}")]
    DanglingPortInst(PortInstId),
    /// A site handle refers to an unknown site.
    #[error("dangling site reference #{0}")]
    DanglingSite(SiteId),
    /// A hierarchical-cell handle refers to an unknown cell.
    #[error("dangling hierarchical cell reference #{0}")]
    DanglingHierCell(HierCellId),
    /// A cell with this name already exists.
    #[error("duplicate cell name `{0}`")]
    DuplicateCell(String),
    /// A net with this name already exists.
    #[error("duplicate net name `{0}`")]
    DuplicateNet(String),
    /// A site with this name already exists.
    #[error("duplicate site name `{0}`")]
    DuplicateSite(String),
    /// The primitive kind does not declare the pin.
    #[error("cell `{cell}` ({kind}) has no pin `{pin}`")]
    UnknownPort {
        /// Cell name.
        cell: String,
        /// Primitive kind name.
        kind: String,
        /// Requested pin.
        pin: String,
    },
    /// The port instance is already bound to a net.
    #[error("pin `{pin}` is already connected to net `{net}`")]
    AlreadyConnected {
        /// `cell/pin` text.
        pin: String,
        /// The net it is bound to.
        net: String,
    },
    /// The port instance is not a member of the given net.
    #[error("pin `{pin}` is not connected to net `{net}`")]
    NotOnNet {
        /// `cell/pin` text.
        pin: String,
        /// The net it was expected on.
        net: String,
    },
    /// The BEL already holds an occupant.
    #[error("BEL `{site}/{bel}` is already occupied")]
    BelOccupied {
        /// Site name.
        site: String,
        /// BEL name.
        bel: String,
    },
    /// A truth-table or memory property is missing or not a bit literal.
    #[error("cell `{cell}` lacks a bit-literal `{property}` property")]
    MissingInit {
        /// Cell name.
        cell: String,
        /// Property name.
        property: String,
    },
    /// A truth-table or memory property has the wrong width.
    #[error("cell `{cell}` property `{property}` is {found} bits wide, expected {expected}")]
    InitWidth {
        /// Cell name.
        cell: String,
        /// Property name.
        property: String,
        /// Width the primitive declares.
        expected: u32,
        /// Width found.
        found: u32,
    },
    /// Cross references between cells, nets and port instances disagree.
    #[error("inconsistent netlist: {0}")]
    Inconsistent(String),
}
