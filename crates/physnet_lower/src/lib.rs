//! Logical-to-physical netlist lowering.
//!
//! Takes a placed and routed design built from technology-mapped logical
//! primitives and rewrites it so every remaining primitive matches what the
//! device configuration implements:
//!
//! - LUT pairs and routethroughs become LUT6_2 cells with physical pin order
//!   and a recomputed `INIT`,
//! - ground-driving LUT sitewires get an explicit generator,
//! - neighbouring RAM32X1S cells become RAM32X1D or RAM32M macros,
//! - BUFGs become BUFGCTRLs, and CARRY4/MUXF7/MUXF8 are checked to use their
//!   default pin mapping.
//!
//! # Usage
//!
//! ```ignore
//! let sink = DiagnosticSink::new();
//! let lowered = lower_with_sink(graph, &sink)?;
//! println!("{}", lowered.report);
//! ```

#![warn(missing_docs)]

mod codes;
pub mod constants;
mod context;
pub mod error;
mod lut;
mod lutram;
mod pass;
mod passthrough;
pub mod report;
pub mod truth_table;

pub use constants::{ConstantKind, ConstantNets};
pub use error::TransformError;
pub use pass::{lower, lower_and_export, lower_with_sink, Lowered};
pub use report::LowerReport;
