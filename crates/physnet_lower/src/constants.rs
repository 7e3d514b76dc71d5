//! Memoized constant-net materialization.
//!
//! The design has at most one top-level GND and one VCC generator. The
//! registry reuses an existing instance when the loader provided one and
//! otherwise creates it on first request, so any number of requests yields a
//! single generator per kind.

use crate::error::TransformError;
use physnet_netlist::{CellId, NetId, NetlistGraph, PinRef, PrimitiveKind};

/// A constant value a net can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantKind {
    /// Logic 0, driven by a `GND` primitive.
    Gnd,
    /// Logic 1, driven by a `VCC` primitive.
    Vcc,
}

impl ConstantKind {
    /// The generating primitive.
    pub fn primitive(self) -> PrimitiveKind {
        match self {
            ConstantKind::Gnd => PrimitiveKind::Gnd,
            ConstantKind::Vcc => PrimitiveKind::Vcc,
        }
    }

    /// The generator's output port.
    pub fn port(self) -> &'static str {
        match self {
            ConstantKind::Gnd => "G",
            ConstantKind::Vcc => "P",
        }
    }

    fn cell_name(self) -> &'static str {
        match self {
            ConstantKind::Gnd => "gnd_phys_netlist",
            ConstantKind::Vcc => "vcc_phys_netlist",
        }
    }

    fn net_name(self) -> &'static str {
        match self {
            ConstantKind::Gnd => "gnd_net_phys_netlist",
            ConstantKind::Vcc => "vcc_net_phys_netlist",
        }
    }
}

/// Per-run cache of the constant nets.
#[derive(Debug, Default)]
pub struct ConstantNets {
    gnd: Option<NetId>,
    vcc: Option<NetId>,
    created: usize,
    hits: usize,
}

impl ConstantNets {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the net carrying `kind`, reusing or creating the top-level
    /// generator as needed.
    pub fn get_or_create(
        &mut self,
        graph: &mut NetlistGraph,
        kind: ConstantKind,
    ) -> Result<NetId, TransformError> {
        let slot = match kind {
            ConstantKind::Gnd => &mut self.gnd,
            ConstantKind::Vcc => &mut self.vcc,
        };
        if let Some(net) = *slot {
            self.hits += 1;
            return Ok(net);
        }

        let top = graph.top();
        let primitive = kind.primitive();
        let existing: Vec<CellId> = graph
            .cells()
            .filter(|(_, c)| c.parent == top && c.kind == primitive)
            .map(|(id, _)| id)
            .collect();
        if existing.len() > 1 {
            return Err(TransformError::invariant(format!(
                "design has {} top-level {primitive} generators",
                existing.len()
            )));
        }

        let port = PinRef::scalar(kind.port());
        let net = match existing.first() {
            Some(&cell) => match graph.net_of(cell, &port) {
                Some(net) => net,
                None => {
                    let net = graph.create_net(top, kind.net_name())?;
                    graph.connect_pin(net, cell, &port)?;
                    net
                }
            },
            None => {
                let cell = graph.create_cell(top, primitive, kind.cell_name())?;
                let net = graph.create_net(top, kind.net_name())?;
                graph.connect_pin(net, cell, &port)?;
                self.created += 1;
                net
            }
        };
        *slot = Some(net);
        Ok(net)
    }

    /// Number of generator instances this registry created.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Number of requests answered from the cache.
    pub fn cache_hits(&self) -> usize {
        self.hits
    }
}
