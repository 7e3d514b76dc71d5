//! Shared foundational types used across the physnet netlist-lowering tools.
//!
//! This crate provides sized bit literals (`64'h...`, `1'b1`) used by
//! primitive properties such as LUT and RAM `INIT` values.

#![warn(missing_docs)]

pub mod bits;

pub use bits::{BitLiteral, ParseBitsError, Radix};
