//! The mutable netlist graph: hierarchy, primitive cells, nets, port
//! instances and placement sites.
//!
//! All cross references are arena handles. Nets own the set of port-instance
//! handles they connect and each port instance records its single net, so
//! there are no reference cycles; every mutator checks its handles and
//! reports a [`NetlistError`] instead of panicking on a dangling one.

use crate::arena::Arena;
use crate::error::NetlistError;
use crate::ids::{CellId, HierCellId, NetId, PortInstId, SiteId};
use crate::pin::{PinMap, PinRef};
use crate::primitive::PrimitiveKind;
use crate::property::{PropertyMap, PropertyValue};
use crate::site::{BelOccupant, Site, SiteKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A hierarchical (non-primitive) cell. The top cell has no parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierCell {
    /// Instance name.
    pub name: String,
    /// Enclosing hierarchical cell.
    pub parent: Option<HierCellId>,
}

/// Where a primitive cell is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// The site.
    pub site: SiteId,
    /// The BEL within the site.
    pub bel: String,
}

/// A primitive cell instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    /// Unique instance name.
    pub name: String,
    /// Primitive kind.
    pub kind: PrimitiveKind,
    /// Owning hierarchical cell.
    pub parent: HierCellId,
    /// Ordered properties.
    pub properties: PropertyMap,
    /// Port instances by pin.
    pub ports: BTreeMap<PinRef, PortInstId>,
    /// Placement, if placed.
    pub placement: Option<Placement>,
}

/// A net and the port instances it connects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    /// Unique net name.
    pub name: String,
    /// Owning hierarchical cell.
    pub parent: HierCellId,
    /// Connected port instances.
    pub members: BTreeSet<PortInstId>,
}

/// One pin of one cell, bound to at most one net.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortInst {
    /// The cell.
    pub cell: CellId,
    /// The pin on the cell.
    pub pin: PinRef,
    /// The net, if connected.
    pub net: Option<NetId>,
}

/// A design's netlist with its placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetlistGraph {
    top: HierCellId,
    hier_cells: Arena<HierCellId, HierCell>,
    cells: Arena<CellId, Cell>,
    nets: Arena<NetId, Net>,
    port_insts: Arena<PortInstId, PortInst>,
    sites: Arena<SiteId, Site>,
    /// Auxiliary index: cell name to ID (rebuilt on deserialization).
    #[serde(skip)]
    cell_index: HashMap<String, CellId>,
    /// Auxiliary index: net name to ID (rebuilt on deserialization).
    #[serde(skip)]
    net_index: HashMap<String, NetId>,
    /// Auxiliary index: site name to ID (rebuilt on deserialization).
    #[serde(skip)]
    site_index: HashMap<String, SiteId>,
}

impl NetlistGraph {
    /// Creates an empty graph whose top cell has the given name.
    pub fn new(top_name: impl Into<String>) -> Self {
        let mut hier_cells = Arena::new();
        let top = hier_cells.alloc(HierCell {
            name: top_name.into(),
            parent: None,
        });
        Self {
            top,
            hier_cells,
            cells: Arena::new(),
            nets: Arena::new(),
            port_insts: Arena::new(),
            sites: Arena::new(),
            cell_index: HashMap::new(),
            net_index: HashMap::new(),
            site_index: HashMap::new(),
        }
    }

    /// Returns the top hierarchical cell.
    pub fn top(&self) -> HierCellId {
        self.top
    }

    /// Returns the design name (the top cell's name).
    pub fn design_name(&self) -> &str {
        self.hier_cells
            .get(self.top)
            .map(|h| h.name.as_str())
            .unwrap_or_default()
    }

    // ---- hierarchy ----

    /// Returns a hierarchical cell.
    pub fn hier_cell(&self, id: HierCellId) -> Result<&HierCell, NetlistError> {
        self.hier_cells
            .get(id)
            .ok_or(NetlistError::DanglingHierCell(id))
    }

    /// Creates a hierarchical cell under `parent`.
    pub fn create_hier_cell(
        &mut self,
        parent: HierCellId,
        name: impl Into<String>,
    ) -> Result<HierCellId, NetlistError> {
        self.hier_cell(parent)?;
        Ok(self.hier_cells.alloc(HierCell {
            name: name.into(),
            parent: Some(parent),
        }))
    }

    // ---- cells ----

    /// Returns a live cell.
    pub fn cell(&self, id: CellId) -> Result<&Cell, NetlistError> {
        self.cells.get(id).ok_or(NetlistError::DanglingCell(id))
    }

    fn cell_entry(&mut self, id: CellId) -> Result<&mut Cell, NetlistError> {
        self.cells.get_mut(id).ok_or(NetlistError::DanglingCell(id))
    }

    /// Looks up a live cell by name.
    pub fn cell_by_name(&self, name: &str) -> Option<CellId> {
        self.cell_index.get(name).copied()
    }

    /// Iterates over live cells in allocation order.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter()
    }

    /// Returns the number of live cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Creates a primitive cell instance under `parent`.
    pub fn create_cell(
        &mut self,
        parent: HierCellId,
        kind: PrimitiveKind,
        name: impl Into<String>,
    ) -> Result<CellId, NetlistError> {
        self.hier_cell(parent)?;
        let name = name.into();
        if self.cell_index.contains_key(&name) {
            return Err(NetlistError::DuplicateCell(name));
        }
        let id = self.cells.alloc(Cell {
            name: name.clone(),
            kind,
            parent,
            properties: PropertyMap::new(),
            ports: BTreeMap::new(),
            placement: None,
        });
        self.cell_index.insert(name, id);
        Ok(id)
    }

    /// Returns a cell's properties for modification.
    pub fn properties_mut(&mut self, id: CellId) -> Result<&mut PropertyMap, NetlistError> {
        Ok(&mut self.cell_entry(id)?.properties)
    }

    /// Sets one property on a cell.
    pub fn set_property(
        &mut self,
        id: CellId,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Result<(), NetlistError> {
        self.properties_mut(id)?.set(name, value);
        Ok(())
    }

    /// Removes a cell: disconnects and drops its port instances, clears any
    /// BEL it occupies, and tombstones its handle.
    pub fn remove_cell(&mut self, id: CellId) -> Result<(), NetlistError> {
        let cell = self.cells.remove(id).ok_or(NetlistError::DanglingCell(id))?;
        for pi in cell.ports.values() {
            if let Some(port) = self.port_insts.remove(*pi) {
                if let Some(net) = port.net.and_then(|n| self.nets.get_mut(n)) {
                    net.members.remove(pi);
                }
            }
        }
        for (_, site) in self.sites.iter_mut() {
            site.bels.retain(|_, occ| match occ {
                BelOccupant::Cell { cell, .. } => *cell != id,
                BelOccupant::Routethru { consumer, .. } => *consumer != id,
            });
        }
        self.cell_index.remove(&cell.name);
        Ok(())
    }

    // ---- nets ----

    /// Returns a live net.
    pub fn net(&self, id: NetId) -> Result<&Net, NetlistError> {
        self.nets.get(id).ok_or(NetlistError::DanglingNet(id))
    }

    /// Looks up a net by name.
    pub fn net_by_name(&self, name: &str) -> Option<NetId> {
        self.net_index.get(name).copied()
    }

    /// Iterates over live nets in allocation order.
    pub fn nets(&self) -> impl Iterator<Item = (NetId, &Net)> {
        self.nets.iter()
    }

    /// Returns the number of live nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Creates an empty net under `parent`.
    pub fn create_net(
        &mut self,
        parent: HierCellId,
        name: impl Into<String>,
    ) -> Result<NetId, NetlistError> {
        self.hier_cell(parent)?;
        let name = name.into();
        if self.net_index.contains_key(&name) {
            return Err(NetlistError::DuplicateNet(name));
        }
        let id = self.nets.alloc(Net {
            name: name.clone(),
            parent,
            members: BTreeSet::new(),
        });
        self.net_index.insert(name, id);
        Ok(id)
    }

    // ---- port instances ----

    /// Returns a live port instance.
    pub fn port_inst(&self, id: PortInstId) -> Result<&PortInst, NetlistError> {
        self.port_insts
            .get(id)
            .ok_or(NetlistError::DanglingPortInst(id))
    }

    /// Returns the existing port instance for a cell pin.
    pub fn find_port_inst(&self, cell: CellId, pin: &PinRef) -> Option<PortInstId> {
        self.cells.get(cell)?.ports.get(pin).copied()
    }

    /// Returns the port instance for a cell pin, creating an unconnected one
    /// if needed. The pin must be declared by the cell's primitive kind.
    pub fn ensure_port_inst(
        &mut self,
        cell: CellId,
        pin: &PinRef,
    ) -> Result<PortInstId, NetlistError> {
        if let Some(pi) = self.find_port_inst(cell, pin) {
            return Ok(pi);
        }
        let entry = self.cell(cell)?;
        if let Some(ports) = entry.kind.ports() {
            let declared = ports.iter().find(|p| p.name == pin.port);
            let valid = match (declared.map(|p| p.width), pin.index) {
                (Some(None), None) => true,
                (Some(Some(width)), Some(index)) => index < width,
                _ => false,
            };
            if !valid {
                return Err(NetlistError::UnknownPort {
                    cell: entry.name.clone(),
                    kind: entry.kind.name().to_string(),
                    pin: pin.to_string(),
                });
            }
        }
        let pi = self.port_insts.alloc(PortInst {
            cell,
            pin: pin.clone(),
            net: None,
        });
        self.cell_entry(cell)?.ports.insert(pin.clone(), pi);
        Ok(pi)
    }

    /// Renders a port instance as `cell/pin` for messages.
    pub fn pin_label(&self, pi: PortInstId) -> String {
        match self.port_insts.get(pi) {
            Some(port) => {
                let cell = self
                    .cells
                    .get(port.cell)
                    .map(|c| c.name.as_str())
                    .unwrap_or("<removed>");
                format!("{cell}/{}", port.pin)
            }
            None => format!("<port #{pi}>"),
        }
    }

    fn net_name(&self, net: NetId) -> String {
        self.nets
            .get(net)
            .map(|n| n.name.clone())
            .unwrap_or_else(|| format!("<net #{net}>"))
    }

    /// Adds a port instance to a net.
    pub fn connect(&mut self, net: NetId, pi: PortInstId) -> Result<(), NetlistError> {
        self.net(net)?;
        let port = self.port_inst(pi)?;
        if let Some(existing) = port.net {
            return Err(NetlistError::AlreadyConnected {
                pin: self.pin_label(pi),
                net: self.net_name(existing),
            });
        }
        if let Some(port) = self.port_insts.get_mut(pi) {
            port.net = Some(net);
        }
        if let Some(entry) = self.nets.get_mut(net) {
            entry.members.insert(pi);
        }
        Ok(())
    }

    /// Removes a port instance from a net. The port instance stays on its
    /// cell, unconnected.
    pub fn disconnect(&mut self, net: NetId, pi: PortInstId) -> Result<(), NetlistError> {
        self.net(net)?;
        let port = self.port_inst(pi)?;
        if port.net != Some(net) {
            return Err(NetlistError::NotOnNet {
                pin: self.pin_label(pi),
                net: self.net_name(net),
            });
        }
        if let Some(port) = self.port_insts.get_mut(pi) {
            port.net = None;
        }
        if let Some(entry) = self.nets.get_mut(net) {
            entry.members.remove(&pi);
        }
        Ok(())
    }

    /// Connects a cell pin to a net, creating the port instance if needed.
    pub fn connect_pin(
        &mut self,
        net: NetId,
        cell: CellId,
        pin: &PinRef,
    ) -> Result<PortInstId, NetlistError> {
        let pi = self.ensure_port_inst(cell, pin)?;
        self.connect(net, pi)?;
        Ok(pi)
    }

    /// Disconnects a cell pin from whatever net it is on, returning that net.
    pub fn disconnect_pin(
        &mut self,
        cell: CellId,
        pin: &PinRef,
    ) -> Result<Option<NetId>, NetlistError> {
        self.cell(cell)?;
        let Some(pi) = self.find_port_inst(cell, pin) else {
            return Ok(None);
        };
        let Some(net) = self.port_inst(pi)?.net else {
            return Ok(None);
        };
        self.disconnect(net, pi)?;
        Ok(Some(net))
    }

    /// Returns the net a cell pin is connected to.
    pub fn net_of(&self, cell: CellId, pin: &PinRef) -> Option<NetId> {
        let pi = self.find_port_inst(cell, pin)?;
        self.port_insts.get(pi)?.net
    }

    /// Returns the connected `(cell, pin)` pairs of a net, ordered by cell
    /// name then pin.
    pub fn net_pins(&self, net: NetId) -> Result<Vec<(CellId, PinRef)>, NetlistError> {
        let mut pins = Vec::new();
        for pi in &self.net(net)?.members {
            let port = self.port_inst(*pi)?;
            pins.push((port.cell, port.pin.clone()));
        }
        pins.sort_by(|a, b| {
            let name = |id: CellId| self.cells.get(id).map(|c| c.name.as_str());
            name(a.0).cmp(&name(b.0)).then_with(|| a.1.cmp(&b.1))
        });
        Ok(pins)
    }

    // ---- sites and placement ----

    /// Returns a site.
    pub fn site(&self, id: SiteId) -> Result<&Site, NetlistError> {
        self.sites.get(id).ok_or(NetlistError::DanglingSite(id))
    }

    /// Returns a site for modification of its sitewire tables.
    ///
    /// BEL occupancy should go through [`place`](Self::place) and
    /// [`place_routethru`](Self::place_routethru) so cell placements stay in sync.
    pub fn site_mut(&mut self, id: SiteId) -> Result<&mut Site, NetlistError> {
        self.sites.get_mut(id).ok_or(NetlistError::DanglingSite(id))
    }

    /// Looks up a site by name.
    pub fn site_by_name(&self, name: &str) -> Option<SiteId> {
        self.site_index.get(name).copied()
    }

    /// Iterates over sites in creation order.
    pub fn sites(&self) -> impl Iterator<Item = (SiteId, &Site)> {
        self.sites.iter()
    }

    /// Returns the number of sites.
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Creates an empty site.
    pub fn create_site(
        &mut self,
        name: impl Into<String>,
        kind: SiteKind,
    ) -> Result<SiteId, NetlistError> {
        let name = name.into();
        if self.site_index.contains_key(&name) {
            return Err(NetlistError::DuplicateSite(name));
        }
        let id = self.sites.alloc(Site::new(name.clone(), kind));
        self.site_index.insert(name, id);
        Ok(id)
    }

    fn claim_bel(
        &mut self,
        site: SiteId,
        bel: &str,
        occupant: BelOccupant,
    ) -> Result<(), NetlistError> {
        let entry = self.sites.get_mut(site).ok_or(NetlistError::DanglingSite(site))?;
        if entry.bels.contains_key(bel) {
            return Err(NetlistError::BelOccupied {
                site: entry.name.clone(),
                bel: bel.to_string(),
            });
        }
        entry.bels.insert(bel.to_string(), occupant);
        Ok(())
    }

    /// Places a cell on a BEL with its logical-to-physical pin map.
    pub fn place(
        &mut self,
        cell: CellId,
        site: SiteId,
        bel: &str,
        pins: PinMap,
    ) -> Result<(), NetlistError> {
        let entry = self.cell(cell)?;
        if entry.placement.is_some() {
            return Err(NetlistError::Inconsistent(format!(
                "cell `{}` is already placed",
                entry.name
            )));
        }
        self.claim_bel(site, bel, BelOccupant::Cell { cell, pins })?;
        self.cell_entry(cell)?.placement = Some(Placement {
            site,
            bel: bel.to_string(),
        });
        Ok(())
    }

    /// Marks a LUT BEL as a routethrough feeding `consumer`.
    pub fn place_routethru(
        &mut self,
        site: SiteId,
        bel: &str,
        consumer: CellId,
        pins: PinMap,
    ) -> Result<(), NetlistError> {
        self.cell(consumer)?;
        self.claim_bel(site, bel, BelOccupant::Routethru { consumer, pins })
    }

    /// Returns the placement pin map of a placed cell.
    pub fn placement_pins(&self, cell: CellId) -> Option<&PinMap> {
        let placement = self.cells.get(cell)?.placement.as_ref()?;
        match self.sites.get(placement.site)?.occupant(&placement.bel)? {
            BelOccupant::Cell { cell: placed, pins } if *placed == cell => Some(pins),
            _ => None,
        }
    }

    /// Drops all sites and placement records.
    pub fn unplace(&mut self) {
        self.sites = Arena::new();
        self.site_index.clear();
        for (_, cell) in self.cells.iter_mut() {
            cell.placement = None;
        }
    }

    // ---- whole-graph queries ----

    /// Rebuilds auxiliary indices after deserialization.
    ///
    /// Fails if two cells, nets or sites share a name, since lookups by name
    /// could then only reach one of them.
    pub fn rebuild_indices(&mut self) -> Result<(), NetlistError> {
        self.cell_index = name_index(
            self.cells.iter().map(|(id, c)| (c.name.as_str(), id)),
            NetlistError::DuplicateCell,
        )?;
        self.net_index = name_index(
            self.nets.iter().map(|(id, n)| (n.name.as_str(), id)),
            NetlistError::DuplicateNet,
        )?;
        self.site_index = name_index(
            self.sites.iter().map(|(id, s)| (s.name.as_str(), id)),
            NetlistError::DuplicateSite,
        )?;
        Ok(())
    }

    /// Counts live cells per primitive kind name.
    pub fn kind_histogram(&self) -> BTreeMap<String, usize> {
        let mut histogram = BTreeMap::new();
        for (_, cell) in self.cells.iter() {
            *histogram.entry(cell.kind.name().to_string()).or_insert(0) += 1;
        }
        histogram
    }

    /// Checks the graph's structural invariants:
    ///
    /// - every port instance belongs to a live cell that lists it, and every
    ///   net member is a live port instance recording that net;
    /// - removed cells have left no port instances behind and no BEL refers
    ///   to them;
    /// - every truth-table or memory property has its kind's declared width.
    pub fn validate(&self) -> Result<(), NetlistError> {
        for (pi, port) in self.port_insts.iter() {
            let cell = self.cell(port.cell)?;
            if cell.ports.get(&port.pin) != Some(&pi) {
                return Err(NetlistError::Inconsistent(format!(
                    "port instance {} is not listed on its cell",
                    self.pin_label(pi)
                )));
            }
            if let Some(net) = port.net {
                if !self.net(net)?.members.contains(&pi) {
                    return Err(NetlistError::Inconsistent(format!(
                        "{} records net `{}` but is not a member",
                        self.pin_label(pi),
                        self.net_name(net)
                    )));
                }
            }
        }
        for (id, net) in self.nets.iter() {
            self.hier_cell(net.parent)?;
            for pi in &net.members {
                if self.port_inst(*pi)?.net != Some(id) {
                    return Err(NetlistError::Inconsistent(format!(
                        "net `{}` lists {} which records another net",
                        net.name,
                        self.pin_label(*pi)
                    )));
                }
            }
        }
        for (_, cell) in self.cells.iter() {
            self.hier_cell(cell.parent)?;
            for pi in cell.ports.values() {
                self.port_inst(*pi)?;
            }
            for (property, expected) in cell.kind.init_properties() {
                let bits = cell
                    .properties
                    .get(property)
                    .and_then(PropertyValue::as_bits)
                    .ok_or_else(|| NetlistError::MissingInit {
                        cell: cell.name.clone(),
                        property: property.to_string(),
                    })?;
                if bits.width() != *expected {
                    return Err(NetlistError::InitWidth {
                        cell: cell.name.clone(),
                        property: property.to_string(),
                        expected: *expected,
                        found: bits.width(),
                    });
                }
            }
        }
        for (_, site) in self.sites.iter() {
            for occupant in site.bels.values() {
                let referenced = match occupant {
                    BelOccupant::Cell { cell, .. } => *cell,
                    BelOccupant::Routethru { consumer, .. } => *consumer,
                };
                self.cell(referenced)?;
            }
        }
        Ok(())
    }
}

fn name_index<'a, Id>(
    entries: impl Iterator<Item = (&'a str, Id)>,
    duplicate: fn(String) -> NetlistError,
) -> Result<HashMap<String, Id>, NetlistError> {
    let mut index = HashMap::new();
    for (name, id) in entries {
        if index.insert(name.to_string(), id).is_some() {
            return Err(duplicate(name.to_string()));
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use physnet_common::BitLiteral;

    fn pin(text: &str) -> PinRef {
        text.parse().unwrap()
    }

    fn init(text: &str) -> BitLiteral {
        text.parse().unwrap()
    }

    fn lut2(graph: &mut NetlistGraph, name: &str) -> CellId {
        let top = graph.top();
        let id = graph.create_cell(top, PrimitiveKind::Lut2, name).unwrap();
        graph.set_property(id, "INIT", init("4'h8")).unwrap();
        id
    }

    #[test]
    fn create_and_lookup() {
        let mut g = NetlistGraph::new("top");
        let c = lut2(&mut g, "u_and");
        let n = g.create_net(g.top(), "a").unwrap();
        assert_eq!(g.cell_by_name("u_and"), Some(c));
        assert_eq!(g.net_by_name("a"), Some(n));
        assert_eq!(g.cell(c).unwrap().kind, PrimitiveKind::Lut2);
        assert_eq!(g.design_name(), "top");
        assert!(g.cell_by_name("missing").is_none());
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut g = NetlistGraph::new("top");
        lut2(&mut g, "u");
        let top = g.top();
        assert_eq!(
            g.create_cell(top, PrimitiveKind::Fdre, "u").unwrap_err(),
            NetlistError::DuplicateCell("u".to_string())
        );
        g.create_net(top, "n").unwrap();
        assert!(matches!(
            g.create_net(top, "n"),
            Err(NetlistError::DuplicateNet(_))
        ));
    }

    #[test]
    fn connect_and_disconnect() {
        let mut g = NetlistGraph::new("top");
        let c = lut2(&mut g, "u");
        let n = g.create_net(g.top(), "a").unwrap();
        let pi = g.connect_pin(n, c, &pin("I0")).unwrap();
        assert_eq!(g.net_of(c, &pin("I0")), Some(n));
        assert_eq!(g.net(n).unwrap().members.len(), 1);

        g.disconnect(n, pi).unwrap();
        assert_eq!(g.net_of(c, &pin("I0")), None);
        assert!(g.net(n).unwrap().members.is_empty());
        // the port instance survives, unconnected
        assert_eq!(g.find_port_inst(c, &pin("I0")), Some(pi));
    }

    #[test]
    fn connect_twice_is_error() {
        let mut g = NetlistGraph::new("top");
        let c = lut2(&mut g, "u");
        let a = g.create_net(g.top(), "a").unwrap();
        let b = g.create_net(g.top(), "b").unwrap();
        let pi = g.connect_pin(a, c, &pin("I0")).unwrap();
        let err = g.connect(b, pi).unwrap_err();
        assert_eq!(
            err,
            NetlistError::AlreadyConnected {
                pin: "u/I0".to_string(),
                net: "a".to_string()
            }
        );
    }

    #[test]
    fn disconnect_wrong_net_is_error() {
        let mut g = NetlistGraph::new("top");
        let c = lut2(&mut g, "u");
        let a = g.create_net(g.top(), "a").unwrap();
        let b = g.create_net(g.top(), "b").unwrap();
        let pi = g.connect_pin(a, c, &pin("I0")).unwrap();
        assert!(matches!(
            g.disconnect(b, pi),
            Err(NetlistError::NotOnNet { .. })
        ));
    }

    #[test]
    fn undeclared_pins_rejected() {
        let mut g = NetlistGraph::new("top");
        let c = lut2(&mut g, "u");
        let n = g.create_net(g.top(), "a").unwrap();
        assert!(matches!(
            g.connect_pin(n, c, &pin("I5")),
            Err(NetlistError::UnknownPort { .. })
        ));
        let top = g.top();
        let carry = g.create_cell(top, PrimitiveKind::Carry4, "c4").unwrap();
        assert!(g.connect_pin(n, carry, &pin("DI[3]")).is_ok());
        assert!(g.ensure_port_inst(carry, &pin("DI[4]")).is_err());
        assert!(g.ensure_port_inst(carry, &pin("DI")).is_err());
        assert!(g.ensure_port_inst(carry, &pin("CI[0]")).is_err());
    }

    #[test]
    fn opaque_kinds_accept_any_pin() {
        let mut g = NetlistGraph::new("top");
        let top = g.top();
        let bram = g.create_cell(top, PrimitiveKind::Ramb36e1, "bram").unwrap();
        let n = g.create_net(top, "addr0").unwrap();
        let pi = g.connect_pin(n, bram, &pin("ADDRARDADDR[0]")).unwrap();
        assert_eq!(g.port_inst(pi).unwrap().pin, pin("ADDRARDADDR[0]"));
    }

    #[test]
    fn dangling_handles_reported() {
        let mut g = NetlistGraph::new("top");
        let c = lut2(&mut g, "u");
        let n = g.create_net(g.top(), "a").unwrap();
        g.remove_cell(c).unwrap();
        assert_eq!(g.cell(c).unwrap_err(), NetlistError::DanglingCell(c));
        assert_eq!(g.remove_cell(c).unwrap_err(), NetlistError::DanglingCell(c));
        assert!(g.connect_pin(n, c, &pin("I0")).is_err());
        assert_eq!(
            g.connect(NetId::from_raw(99), PortInstId::from_raw(0))
                .unwrap_err(),
            NetlistError::DanglingNet(NetId::from_raw(99))
        );
    }

    #[test]
    fn remove_cell_clears_connections_and_bels() {
        let mut g = NetlistGraph::new("top");
        let c = lut2(&mut g, "u");
        let top = g.top();
        let ff = g.create_cell(top, PrimitiveKind::Fdre, "ff").unwrap();
        let n = g.create_net(top, "o").unwrap();
        g.connect_pin(n, c, &pin("O")).unwrap();
        g.connect_pin(n, ff, &pin("D")).unwrap();
        let site = g.create_site("SLICE_X0Y0", SiteKind::SliceL).unwrap();
        g.place(c, site, "A6LUT", PinMap::new()).unwrap();
        g.place_routethru(site, "B6LUT", ff, PinMap::new()).unwrap();

        g.remove_cell(c).unwrap();
        assert_eq!(g.net(n).unwrap().members.len(), 1);
        assert!(g.site(site).unwrap().occupant("A6LUT").is_none());
        assert!(g.site(site).unwrap().occupant("B6LUT").is_some());
        assert!(g.cell_by_name("u").is_none());
        g.validate().unwrap();

        g.remove_cell(ff).unwrap();
        assert!(g.site(site).unwrap().bels.is_empty());
        g.validate().unwrap();
    }

    #[test]
    fn placement_and_pins() {
        let mut g = NetlistGraph::new("top");
        let c = lut2(&mut g, "u");
        let site = g.create_site("SLICE_X0Y0", SiteKind::SliceL).unwrap();
        let pins = PinMap::from_pairs([("I0", "A3"), ("I1", "A5"), ("O", "O6")]).unwrap();
        g.place(c, site, "A6LUT", pins.clone()).unwrap();
        assert_eq!(g.placement_pins(c), Some(&pins));
        assert_eq!(g.cell(c).unwrap().placement.as_ref().unwrap().bel, "A6LUT");

        let other = lut2(&mut g, "v");
        assert!(matches!(
            g.place(other, site, "A6LUT", PinMap::new()),
            Err(NetlistError::BelOccupied { .. })
        ));
        assert!(matches!(
            g.place(c, site, "B6LUT", PinMap::new()),
            Err(NetlistError::Inconsistent(_))
        ));
    }

    #[test]
    fn unplace_drops_sites() {
        let mut g = NetlistGraph::new("top");
        let c = lut2(&mut g, "u");
        let site = g.create_site("SLICE_X0Y0", SiteKind::SliceL).unwrap();
        g.place(c, site, "A6LUT", PinMap::new()).unwrap();
        g.unplace();
        assert_eq!(g.site_count(), 0);
        assert!(g.site_by_name("SLICE_X0Y0").is_none());
        assert!(g.cell(c).unwrap().placement.is_none());
        assert!(g.placement_pins(c).is_none());
    }

    #[test]
    fn validate_checks_init_width() {
        let mut g = NetlistGraph::new("top");
        let c = lut2(&mut g, "u");
        g.validate().unwrap();
        g.set_property(c, "INIT", init("64'h8")).unwrap();
        assert_eq!(
            g.validate().unwrap_err(),
            NetlistError::InitWidth {
                cell: "u".to_string(),
                property: "INIT".to_string(),
                expected: 4,
                found: 64
            }
        );
        g.properties_mut(c).unwrap().remove("INIT");
        assert!(matches!(
            g.validate(),
            Err(NetlistError::MissingInit { .. })
        ));
    }

    #[test]
    fn net_pins_sorted_by_cell_name() {
        let mut g = NetlistGraph::new("top");
        let b = lut2(&mut g, "b");
        let a = lut2(&mut g, "a");
        let n = g.create_net(g.top(), "x").unwrap();
        g.connect_pin(n, b, &pin("I0")).unwrap();
        g.connect_pin(n, a, &pin("I1")).unwrap();
        g.connect_pin(n, a, &pin("I0")).unwrap();
        let pins = g.net_pins(n).unwrap();
        assert_eq!(
            pins,
            vec![(a, pin("I0")), (a, pin("I1")), (b, pin("I0"))]
        );
    }

    #[test]
    fn kind_histogram_counts_live_cells() {
        let mut g = NetlistGraph::new("top");
        let a = lut2(&mut g, "a");
        lut2(&mut g, "b");
        let top = g.top();
        g.create_cell(top, PrimitiveKind::Fdre, "ff").unwrap();
        g.remove_cell(a).unwrap();
        let hist = g.kind_histogram();
        assert_eq!(hist.get("LUT2"), Some(&1));
        assert_eq!(hist.get("FDRE"), Some(&1));
    }

    #[test]
    fn serde_roundtrip_rebuilds_indices() {
        let mut g = NetlistGraph::new("top");
        let c = lut2(&mut g, "u");
        let n = g.create_net(g.top(), "a").unwrap();
        g.connect_pin(n, c, &pin("I0")).unwrap();
        g.create_site("SLICE_X0Y0", SiteKind::SliceM).unwrap();

        let json = serde_json::to_string(&g).unwrap();
        let mut back: NetlistGraph = serde_json::from_str(&json).unwrap();
        assert!(back.cell_by_name("u").is_none());
        back.rebuild_indices().unwrap();
        assert_eq!(back.cell_by_name("u"), Some(c));
        assert_eq!(back.net_by_name("a"), Some(n));
        assert!(back.site_by_name("SLICE_X0Y0").is_some());
        back.validate().unwrap();
    }

    #[test]
    fn rebuild_rejects_duplicate_names() {
        let mut g = NetlistGraph::new("top");
        lut2(&mut g, "u_first");
        lut2(&mut g, "u_second");
        let json = serde_json::to_string(&g).unwrap().replace("u_second", "u_first");
        let mut back: NetlistGraph = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            back.rebuild_indices(),
            Err(NetlistError::DuplicateCell(name)) if name == "u_first"
        ));

        let mut g = NetlistGraph::new("top");
        g.create_net(g.top(), "n_first").unwrap();
        g.create_net(g.top(), "n_second").unwrap();
        let json = serde_json::to_string(&g).unwrap().replace("n_second", "n_first");
        let mut back: NetlistGraph = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            back.rebuild_indices(),
            Err(NetlistError::DuplicateNet(_))
        ));
    }

    #[test]
    fn hierarchy() {
        let mut g = NetlistGraph::new("top");
        let top = g.top();
        let sub = g.create_hier_cell(top, "u_ram").unwrap();
        assert_eq!(g.hier_cell(sub).unwrap().parent, Some(top));
        let c = g.create_cell(sub, PrimitiveKind::Fdre, "u_ram/ff").unwrap();
        assert_eq!(g.cell(c).unwrap().parent, sub);
        assert!(g
            .create_cell(HierCellId::from_raw(42), PrimitiveKind::Fdre, "x")
            .is_err());
    }
}
