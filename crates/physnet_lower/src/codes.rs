//! Diagnostic codes for rewrites the pass reports.

use physnet_diagnostics::{Category, DiagnosticCode};

pub(crate) const LUT_MERGED: DiagnosticCode = DiagnosticCode::new(Category::Lut, 101);
pub(crate) const GND_GENERATOR: DiagnosticCode = DiagnosticCode::new(Category::Lut, 102);
pub(crate) const ROUTETHRU_NET: DiagnosticCode = DiagnosticCode::new(Category::Lut, 103);

pub(crate) const RAM32X1D_MERGED: DiagnosticCode = DiagnosticCode::new(Category::Ram, 201);
pub(crate) const RAM32M_MERGED: DiagnosticCode = DiagnosticCode::new(Category::Ram, 202);
pub(crate) const LUTRAM_UNMERGED: DiagnosticCode = DiagnosticCode::new(Category::Ram, 203);

pub(crate) const BUFG_REWRITTEN: DiagnosticCode = DiagnosticCode::new(Category::Primitive, 301);
pub(crate) const DEFAULT_MAPPING: DiagnosticCode = DiagnosticCode::new(Category::Primitive, 302);

pub(crate) const CONSTANT_CREATED: DiagnosticCode = DiagnosticCode::new(Category::Netlist, 401);
pub(crate) const CELL_REMOVED: DiagnosticCode = DiagnosticCode::new(Category::Netlist, 402);
