//! State shared by the rewrite engines during one run.

use crate::codes;
use crate::constants::{ConstantKind, ConstantNets};
use crate::error::TransformError;
use crate::report::LowerReport;
use physnet_common::BitLiteral;
use physnet_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use physnet_netlist::{CellId, NetId, NetlistGraph, PinRef, PropertyValue};
use std::collections::BTreeSet;

pub(crate) struct PassContext<'s> {
    pub graph: NetlistGraph,
    pub sink: &'s DiagnosticSink,
    pub constants: ConstantNets,
    /// Cells already consumed by a site-level rewrite.
    pub visited: BTreeSet<CellId>,
    /// Replaced cells, deleted once every site and cell has been handled.
    pub to_remove: BTreeSet<CellId>,
    pub report: LowerReport,
}

impl<'s> PassContext<'s> {
    pub fn new(graph: NetlistGraph, sink: &'s DiagnosticSink) -> Self {
        Self {
            graph,
            sink,
            constants: ConstantNets::new(),
            visited: BTreeSet::new(),
            to_remove: BTreeSet::new(),
            report: LowerReport::default(),
        }
    }

    pub fn note(&self, code: DiagnosticCode, message: impl Into<String>, subject: &str) {
        self.sink
            .emit(Diagnostic::note(code, message).with_subject(subject));
    }

    pub fn constant(&mut self, kind: ConstantKind) -> Result<NetId, TransformError> {
        let before = self.constants.created();
        let net = self.constants.get_or_create(&mut self.graph, kind)?;
        if self.constants.created() > before {
            self.report.constants_created += 1;
            let name = self.graph.net(net)?.name.clone();
            self.note(
                codes::CONSTANT_CREATED,
                format!("created {} generator driving `{name}`", kind.primitive()),
                &name,
            );
        }
        Ok(net)
    }

    /// Ties every listed input of `cell` that is still unconnected to VCC.
    pub fn tie_unconnected_to_vcc(&mut self, cell: CellId, pins: &[&str]) -> Result<(), TransformError> {
        for pin in pins {
            let pin = PinRef::scalar(*pin);
            if self.graph.net_of(cell, &pin).is_none() {
                let vcc = self.constant(ConstantKind::Vcc)?;
                self.graph.connect_pin(vcc, cell, &pin)?;
            }
        }
        Ok(())
    }

    /// Moves the net on `from`'s pin to `to`'s pin. Returns the net, or
    /// `None` if the source pin was unconnected.
    pub fn transfer(
        &mut self,
        from: CellId,
        from_pin: &PinRef,
        to: CellId,
        to_pin: &PinRef,
    ) -> Result<Option<NetId>, TransformError> {
        let Some(net) = self.graph.disconnect_pin(from, from_pin)? else {
            return Ok(None);
        };
        self.graph.connect_pin(net, to, to_pin)?;
        Ok(Some(net))
    }

    pub fn queue_removal(&mut self, cell: CellId) {
        self.visited.insert(cell);
        self.to_remove.insert(cell);
    }

    pub fn cell_name(&self, cell: CellId) -> Result<String, TransformError> {
        Ok(self.graph.cell(cell)?.name.clone())
    }

    /// Returns a bit-literal property of a cell.
    pub fn bits_property(&self, cell: CellId, property: &str) -> Result<BitLiteral, TransformError> {
        let entry = self.graph.cell(cell)?;
        entry
            .properties
            .get(property)
            .and_then(PropertyValue::as_bits)
            .copied()
            .ok_or_else(|| {
                TransformError::invariant(format!(
                    "cell `{}` lacks a bit-literal {property} property",
                    entry.name
                ))
            })
    }
}
