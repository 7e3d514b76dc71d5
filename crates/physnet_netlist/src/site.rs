//! Placement sites, BEL occupancy and constant sitewires.

use crate::ids::CellId;
use crate::pin::PinMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The LUT slots of a SLICE, in traversal order.
pub const LUT_SLOTS: [char; 4] = ['A', 'B', 'C', 'D'];

/// The kind of a site. Only slices carry LUTs the pass rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteKind {
    /// Logic slice.
    SliceL,
    /// Logic slice whose LUTs can also act as distributed RAM.
    SliceM,
    /// Anything else (IOB, BUFG, RAMB36 sites).
    Other,
}

impl SiteKind {
    /// Returns `true` for `SLICEL` and `SLICEM`.
    pub fn is_slice(self) -> bool {
        matches!(self, SiteKind::SliceL | SiteKind::SliceM)
    }
}

/// What occupies a BEL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BelOccupant {
    /// A genuine cell of the netlist and its placement pin map.
    Cell {
        /// The placed cell.
        cell: CellId,
        /// Logical-to-physical pin map of the placement.
        pins: PinMap,
    },
    /// A LUT used only to route a signal to another cell in the site.
    ///
    /// The pin map has a single entry: the consumer's logical pin mapped to
    /// the LUT input the signal enters on.
    Routethru {
        /// The cell the routed signal continues to.
        consumer: CellId,
        /// Consumer logical pin to LUT input pin.
        pins: PinMap,
    },
}

impl BelOccupant {
    /// Returns the placement pin map.
    pub fn pins(&self) -> &PinMap {
        match self {
            BelOccupant::Cell { pins, .. } | BelOccupant::Routethru { pins, .. } => pins,
        }
    }

    /// Returns the genuine cell, or `None` for a routethrough.
    pub fn cell(&self) -> Option<CellId> {
        match self {
            BelOccupant::Cell { cell, .. } => Some(*cell),
            BelOccupant::Routethru { .. } => None,
        }
    }
}

/// One pin of a BEL, as reached by a sitewire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BelPin {
    /// BEL name, e.g. `CARRY4`.
    pub bel: String,
    /// Physical pin name on the BEL, e.g. `DI0`.
    pub pin: String,
}

impl BelPin {
    /// Creates a BEL pin.
    pub fn new(bel: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            bel: bel.into(),
            pin: pin.into(),
        }
    }
}

/// A placed site instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    /// Site name, e.g. `SLICE_X2Y7`.
    pub name: String,
    /// Site kind.
    pub kind: SiteKind,
    /// BEL name to occupant.
    pub bels: BTreeMap<String, BelOccupant>,
    /// Sitewires (`A6LUT_O6`, ...) tied to the design's ground net.
    pub gnd_sitewires: BTreeSet<String>,
    /// Sitewire to the BEL input pins it reaches.
    pub sitewire_pins: BTreeMap<String, Vec<BelPin>>,
}

impl Site {
    /// Creates an empty site.
    pub fn new(name: impl Into<String>, kind: SiteKind) -> Self {
        Self {
            name: name.into(),
            kind,
            bels: BTreeMap::new(),
            gnd_sitewires: BTreeSet::new(),
            sitewire_pins: BTreeMap::new(),
        }
    }

    /// Returns the occupant of a BEL.
    pub fn occupant(&self, bel: &str) -> Option<&BelOccupant> {
        self.bels.get(bel)
    }

    /// Returns the genuine cell on a BEL, ignoring routethroughs.
    pub fn cell_at(&self, bel: &str) -> Option<CellId> {
        self.occupant(bel).and_then(BelOccupant::cell)
    }

    /// Returns the BELs holding `cell` as a genuine occupant.
    pub fn bels_of(&self, cell: CellId) -> impl Iterator<Item = &str> {
        self.bels
            .iter()
            .filter(move |(_, occ)| occ.cell() == Some(cell))
            .map(|(bel, _)| bel.as_str())
    }

    /// Returns the BEL pins a sitewire reaches.
    pub fn sitewire_pins(&self, sitewire: &str) -> &[BelPin] {
        self.sitewire_pins
            .get(sitewire)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns `true` if the sitewire carries the ground constant.
    pub fn is_gnd_sitewire(&self, sitewire: &str) -> bool {
        self.gnd_sitewires.contains(sitewire)
    }
}

/// BEL and output-sitewire names of one LUT slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LutSlot {
    /// Slot letter, `A`..`D`.
    pub letter: char,
    /// 6-input BEL, e.g. `A6LUT`.
    pub lut6_bel: String,
    /// Its output sitewire, e.g. `A6LUT_O6`.
    pub lut6_out: String,
    /// 5-input BEL, e.g. `A5LUT`.
    pub lut5_bel: String,
    /// Its output sitewire, e.g. `A5LUT_O5`.
    pub lut5_out: String,
}

impl LutSlot {
    /// Builds the names for a slot letter.
    pub fn new(letter: char) -> Self {
        Self {
            letter,
            lut6_bel: format!("{letter}6LUT"),
            lut6_out: format!("{letter}6LUT_O6"),
            lut5_bel: format!("{letter}5LUT"),
            lut5_out: format!("{letter}5LUT_O5"),
        }
    }

    /// All four slots in traversal order.
    pub fn all() -> [LutSlot; 4] {
        LUT_SLOTS.map(LutSlot::new)
    }
}
