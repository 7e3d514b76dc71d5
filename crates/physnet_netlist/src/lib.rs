//! Arena-backed netlist graph for placed and routed designs.
//!
//! The graph holds technology-mapped primitive cells, the nets joining their
//! port instances, the hierarchy that owns both, and the placement sites the
//! lowering pass walks. Primitive kinds, their port declarations and the
//! default logical-to-physical pin tables live here too, as does the
//! [`ExportAdapter`] boundary to external serializers.

#![warn(missing_docs)]

pub mod arena;
pub mod error;
pub mod export;
pub mod graph;
pub mod ids;
pub mod pin;
pub mod pin_map;
pub mod primitive;
pub mod property;
pub mod site;

pub use arena::{Arena, ArenaId};
pub use error::NetlistError;
pub use export::{ExportAdapter, ExportError};
pub use graph::{Cell, HierCell, Net, NetlistGraph, Placement, PortInst};
pub use ids::{CellId, HierCellId, NetId, PortInstId, SiteId};
pub use pin::{ParsePinError, PinMap, PinRef};
pub use pin_map::PIN_MAP_VERSION;
pub use primitive::{PortDecl, PortDirection, PrimitiveKind};
pub use property::{PropertyMap, PropertyValue};
pub use site::{BelOccupant, BelPin, LutSlot, Site, SiteKind};
