//! Shared fixture builder for the lowering integration tests.

#![allow(dead_code)]

use physnet_common::BitLiteral;
use physnet_diagnostics::{Diagnostic, DiagnosticSink};
use physnet_lower::{lower_with_sink, Lowered, TransformError};
use physnet_netlist::{
    BelPin, CellId, NetId, NetlistGraph, PinMap, PinRef, PrimitiveKind, SiteId, SiteKind,
};

/// Builds small placed designs by name.
pub struct Fixture {
    pub graph: NetlistGraph,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            graph: NetlistGraph::new("top"),
        }
    }

    /// Returns the net with this name, creating it at the top level.
    pub fn net(&mut self, name: &str) -> NetId {
        if let Some(net) = self.graph.net_by_name(name) {
            return net;
        }
        let top = self.graph.top();
        self.graph.create_net(top, name).unwrap()
    }

    /// Creates a top-level cell and connects `(pin, net)` pairs.
    pub fn cell(&mut self, kind: PrimitiveKind, name: &str, pins: &[(&str, &str)]) -> CellId {
        let top = self.graph.top();
        let cell = self.graph.create_cell(top, kind, name).unwrap();
        for (pin, net) in pins {
            let net = self.net(net);
            self.graph.connect_pin(net, cell, &pin_ref(pin)).unwrap();
        }
        cell
    }

    /// Creates a `LUTk` with the given `INIT` literal.
    pub fn lut(&mut self, name: &str, init: &str, pins: &[(&str, &str)]) -> CellId {
        let init: BitLiteral = init.parse().unwrap();
        let kind = match init.width() {
            2 => PrimitiveKind::Lut1,
            4 => PrimitiveKind::Lut2,
            8 => PrimitiveKind::Lut3,
            16 => PrimitiveKind::Lut4,
            32 => PrimitiveKind::Lut5,
            64 => PrimitiveKind::Lut6,
            other => panic!("no LUT has a {other}-bit INIT"),
        };
        let cell = self.cell(kind, name, pins);
        self.graph.set_property(cell, "INIT", init).unwrap();
        cell
    }

    /// Creates a RAM32X1S with the usual non-inverted clock flag.
    pub fn ram(&mut self, name: &str, init: u32, pins: &[(&str, &str)]) -> CellId {
        let cell = self.cell(PrimitiveKind::Ram32X1S, name, pins);
        self.graph
            .set_property(cell, "INIT", BitLiteral::new(32, init as u64).unwrap())
            .unwrap();
        self.graph
            .set_property(cell, "IS_CLK_INVERTED", "1'b1".parse::<BitLiteral>().unwrap())
            .unwrap();
        cell
    }

    pub fn site(&mut self, name: &str, kind: SiteKind) -> SiteId {
        match self.graph.site_by_name(name) {
            Some(site) => site,
            None => self.graph.create_site(name, kind).unwrap(),
        }
    }

    pub fn slice(&mut self, name: &str) -> SiteId {
        self.site(name, SiteKind::SliceL)
    }

    pub fn place(&mut self, cell: CellId, site: SiteId, bel: &str, pins: &[(&str, &str)]) {
        self.graph
            .place(cell, site, bel, pin_map(pins))
            .unwrap();
    }

    pub fn routethru(
        &mut self,
        site: SiteId,
        bel: &str,
        consumer: CellId,
        logical: &str,
        physical: &str,
    ) {
        self.graph
            .place_routethru(site, bel, consumer, pin_map(&[(logical, physical)]))
            .unwrap();
    }

    /// Marks a sitewire as carrying ground and lists the BEL pins it reaches.
    pub fn gnd_sitewire(&mut self, site: SiteId, wire: &str, reaches: &[(&str, &str)]) {
        let entry = self.graph.site_mut(site).unwrap();
        entry.gnd_sitewires.insert(wire.to_string());
        entry.sitewire_pins.insert(
            wire.to_string(),
            reaches.iter().map(|(bel, pin)| BelPin::new(*bel, *pin)).collect(),
        );
    }

    pub fn finish(self) -> NetlistGraph {
        self.graph
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn pin_ref(text: &str) -> PinRef {
    text.parse().unwrap()
}

pub fn pin_map(pairs: &[(&str, &str)]) -> PinMap {
    PinMap::from_pairs(pairs.iter().copied()).unwrap()
}

/// Identity placement of a `LUTk`: `Ij` on `A{j+1}`, `O` on `O6`.
pub fn identity_pins(inputs: usize) -> Vec<(String, String)> {
    let mut pins: Vec<(String, String)> = (0..inputs)
        .map(|j| (format!("I{j}"), format!("A{}", j + 1)))
        .collect();
    pins.push(("O".to_string(), "O6".to_string()));
    pins
}

pub fn as_pairs(pins: &[(String, String)]) -> Vec<(&str, &str)> {
    pins.iter().map(|(l, p)| (l.as_str(), p.as_str())).collect()
}

/// Name of the net on a cell pin, looked up by names.
pub fn net_name(graph: &NetlistGraph, cell: &str, pin: &str) -> Option<String> {
    let cell = graph.cell_by_name(cell)?;
    let net = graph.net_of(cell, &pin_ref(pin))?;
    Some(graph.net(net).unwrap().name.clone())
}

pub fn init_of(graph: &NetlistGraph, cell: &str, property: &str) -> BitLiteral {
    let cell = graph.cell_by_name(cell).unwrap();
    *graph
        .cell(cell)
        .unwrap()
        .properties
        .get(property)
        .and_then(|v| v.as_bits())
        .unwrap()
}

pub fn kind_count(graph: &NetlistGraph, kind: &str) -> usize {
    graph.kind_histogram().get(kind).copied().unwrap_or(0)
}

/// Lowers and returns the result together with every diagnostic emitted.
pub fn run(graph: NetlistGraph) -> (Result<Lowered, TransformError>, Vec<Diagnostic>) {
    let sink = DiagnosticSink::new();
    let result = lower_with_sink(graph, &sink);
    (result, sink.take_all())
}

pub fn lower_ok(graph: NetlistGraph) -> Lowered {
    match run(graph) {
        (Ok(lowered), _) => lowered,
        (Err(err), _) => panic!("lowering failed: {err}"),
    }
}
