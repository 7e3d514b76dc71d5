//! Summary counters of one lowering run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a lowering run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowerReport {
    /// LUT6_2 cells created from logical LUTs and routethroughs.
    pub luts_merged: usize,
    /// LUT6_2 cells created to drive ground sitewires.
    pub gnd_generators: usize,
    /// Routethrough nets reconstructed.
    pub routethrus: usize,
    /// RAM32X1D cells created from LUTRAM pairs.
    pub ram32x1d: usize,
    /// RAM32M cells created from LUTRAM quads.
    pub ram32m: usize,
    /// LUTRAM cells left as RAM32X1S.
    pub lutrams_unmerged: usize,
    /// BUFGs rewritten to BUFGCTRL.
    pub bufgs_rewritten: usize,
    /// CARRY4/MUXF7/MUXF8 cells checked for default pin mapping.
    pub validated: usize,
    /// Cells of kinds that need no rewrite.
    pub passed_through: usize,
    /// Constant generator instances created.
    pub constants_created: usize,
    /// Logical cells deleted after being replaced.
    pub cells_removed: usize,
}

impl fmt::Display for LowerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  LUT6_2 merged:        {}", self.luts_merged)?;
        writeln!(f, "  ground generators:    {}", self.gnd_generators)?;
        writeln!(f, "  routethrus:           {}", self.routethrus)?;
        writeln!(f, "  RAM32X1D merged:      {}", self.ram32x1d)?;
        writeln!(f, "  RAM32M merged:        {}", self.ram32m)?;
        writeln!(f, "  LUTRAM unmerged:      {}", self.lutrams_unmerged)?;
        writeln!(f, "  BUFG -> BUFGCTRL:     {}", self.bufgs_rewritten)?;
        writeln!(f, "  validated mappings:   {}", self.validated)?;
        writeln!(f, "  passed through:       {}", self.passed_through)?;
        writeln!(f, "  constants created:    {}", self.constants_created)?;
        write!(f, "  cells removed:        {}", self.cells_removed)
    }
}
