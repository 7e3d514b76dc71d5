//! Opaque ID types for netlist entities.
//!
//! All IDs are `u32` newtypes used as arena keys. A handle stays valid for the
//! lifetime of the graph; removing an entity leaves a tombstone so lookups of
//! its handle report a dangling reference instead of aliasing a newer entity.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a primitive cell instance.
    CellId
);

define_id!(
    /// Opaque, copyable ID for a net.
    NetId
);

define_id!(
    /// Opaque, copyable ID for a port instance (a cell pin bound to a net).
    PortInstId
);

define_id!(
    /// Opaque, copyable ID for a placement site.
    SiteId
);

define_id!(
    /// Opaque, copyable ID for a hierarchical (non-primitive) cell.
    HierCellId
);
