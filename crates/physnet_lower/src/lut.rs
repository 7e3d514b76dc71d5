//! LUT merge engine.
//!
//! Each SLICE LUT slot (`A`..`D`) pairs a 6-input BEL with a 5-input BEL
//! that share the same six physical inputs. Whatever occupies a slot (a
//! logical LUT on either half, a routethrough, or nothing but a ground
//! sitewire) is replaced by one LUT6_2 whose logical pins are the physical
//! ones, so the netlist matches what the bitstream configures.

use crate::codes;
use crate::context::PassContext;
use crate::error::TransformError;
use crate::truth_table::{depends_on, physical_input, physical_table, routethru_table};
use physnet_common::BitLiteral;
use physnet_netlist::pin_map::{default_logical, is_default_mapping};
use physnet_netlist::{
    BelOccupant, CellId, LutSlot, NetId, PinMap, PinRef, PrimitiveKind, SiteId,
};
use std::collections::BTreeMap;

const LUT6_2_INPUTS: [&str; 6] = ["I0", "I1", "I2", "I3", "I4", "I5"];
const LOW_HALF: u64 = 0xFFFF_FFFF;
/// Physical input `A6`, which a fractured LUT cannot use.
const A6: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Half {
    Six,
    Five,
}

impl Half {
    fn output(self) -> &'static str {
        match self {
            Half::Six => "O6",
            Half::Five => "O5",
        }
    }

    fn digit(self) -> char {
        match self {
            Half::Six => '6',
            Half::Five => '5',
        }
    }
}

/// One occupied half of a slot, checked and ready to rewrite.
struct Source {
    half: Half,
    /// The logical LUT, or for a routethrough the consumer whose pin the
    /// routed signal currently lands on.
    owner: CellId,
    owner_name: String,
    genuine: bool,
    pins: PinMap,
    table: u64,
}

/// Rewrites one LUT slot of a slice whose 6-input BEL is not a LUTRAM.
pub(crate) fn lower_slot(
    cx: &mut PassContext<'_>,
    site: SiteId,
    slot: &LutSlot,
) -> Result<(), TransformError> {
    let site_ref = cx.graph.site(site)?;
    let site_name = site_ref.name.clone();
    let six = site_ref.occupant(&slot.lut6_bel).cloned();
    let five = site_ref.occupant(&slot.lut5_bel).cloned();
    let gnd_wires: Vec<String> = [&slot.lut6_out, &slot.lut5_out]
        .into_iter()
        .filter(|wire| site_ref.is_gnd_sitewire(wire))
        .cloned()
        .collect();

    if !gnd_wires.is_empty() {
        if six.is_some() || five.is_some() {
            return Err(TransformError::invariant(format!(
                "{site_name} slot {}: ground sitewire driven from an occupied LUT",
                slot.letter
            )));
        }
        return lower_gnd_generator(cx, site, &gnd_wires);
    }

    let mut sources = Vec::new();
    if let Some(occupant) = six {
        sources.push(plan_source(cx, site, Half::Six, occupant)?);
    }
    if let Some(occupant) = five {
        sources.push(plan_source(cx, site, Half::Five, occupant)?);
    }
    if sources.is_empty() {
        return Ok(());
    }
    merge(cx, &site_name, slot, &sources)
}

impl Source {
    fn places_on_a6(&self) -> bool {
        self.pins
            .iter()
            .any(|(_, physical)| physical_input(physical) == Some(A6))
    }
}

fn plan_source(
    cx: &PassContext<'_>,
    site: SiteId,
    half: Half,
    occupant: BelOccupant,
) -> Result<Source, TransformError> {
    match occupant {
        BelOccupant::Cell { cell, pins } => {
            let entry = cx.graph.cell(cell)?;
            let Some(inputs) = entry.kind.lut_inputs() else {
                return Err(TransformError::UnsupportedCellType {
                    cell: entry.name.clone(),
                    kind: entry.kind.name().to_string(),
                });
            };
            let init = cx.bits_property(cell, "INIT")?;
            let table = physical_table(&entry.name, &init, inputs, &pins)?;
            Ok(Source {
                half,
                owner: cell,
                owner_name: entry.name.clone(),
                genuine: true,
                pins,
                table,
            })
        }
        BelOccupant::Routethru { consumer, pins } => {
            let name = cx.cell_name(consumer)?;
            let placed_here = cx.graph.site(site)?.bels_of(consumer).count();
            if placed_here != 1 {
                return Err(TransformError::invariant(format!(
                    "routethrough into `{name}` has {placed_here} consumers in its site, expected 1"
                )));
            }
            let table = routethru_table(&name, &pins)?;
            Ok(Source {
                half,
                owner: consumer,
                owner_name: name,
                genuine: false,
                pins,
                table,
            })
        }
    }
}

fn combined_init(site: &str, slot: char, sources: &[Source]) -> Result<u64, TransformError> {
    // A6 is held at VCC in a fractured slot.
    if sources.iter().any(|s| s.half == Half::Five) {
        if let Some(source) = sources.iter().find(|s| s.places_on_a6()) {
            return Err(TransformError::invariant(format!(
                "{site} slot {slot}: `{}` is placed on A6 of a fractured LUT",
                source.owner_name
            )));
        }
    }
    let table_of = |half| sources.iter().find(|s| s.half == half).map(|s| s.table);
    let uses_a6 = |table| {
        TransformError::invariant(format!(
            "{site} slot {slot}: fractured LUT function {table:#018x} depends on A6"
        ))
    };
    match (table_of(Half::Six), table_of(Half::Five)) {
        (Some(six), Some(five)) => {
            for table in [six, five] {
                if depends_on(table, A6) {
                    return Err(uses_a6(table));
                }
            }
            Ok(((six & LOW_HALF) << 32) | (five & LOW_HALF))
        }
        (Some(six), None) => Ok(six),
        (None, Some(five)) => {
            if depends_on(five, A6) {
                return Err(uses_a6(five));
            }
            Ok(five & LOW_HALF)
        }
        (None, None) => Err(TransformError::invariant(format!(
            "{site} slot {slot}: nothing to merge"
        ))),
    }
}

fn lut6_2_pin(cell: &str, physical: &str) -> Result<PinRef, TransformError> {
    if let Some(n) = physical_input(physical) {
        return Ok(PinRef::scalar(format!("I{n}")));
    }
    if physical == "O6" || physical == "O5" {
        return Ok(PinRef::scalar(physical));
    }
    Err(TransformError::invariant(format!(
        "cell `{cell}` is mapped to unknown LUT pin `{physical}`"
    )))
}

fn merge(
    cx: &mut PassContext<'_>,
    site: &str,
    slot: &LutSlot,
    sources: &[Source],
) -> Result<(), TransformError> {
    let init = combined_init(site, slot.letter, sources)?;
    let init = BitLiteral::new(64, init).map_err(|e| TransformError::invariant(e.to_string()))?;

    let primary = sources.iter().find(|s| s.genuine);
    let anchor = primary.unwrap_or(&sources[0]);
    let mut name = match primary {
        Some(source) => format!("{}_phys", source.owner_name),
        None => format!("{}_routethru_{}", anchor.owner_name, slot.letter),
    };
    if sources.len() == 2 {
        name.push_str("_shared");
    }
    let parent = cx.graph.cell(anchor.owner)?.parent;
    let merged = cx.graph.create_cell(parent, PrimitiveKind::Lut6_2, name.clone())?;

    if let Some(source) = primary {
        let copied: Vec<_> = cx
            .graph
            .cell(source.owner)?
            .properties
            .iter()
            .filter(|(prop, _)| *prop != "INIT")
            .map(|(prop, value)| (prop.to_string(), value.clone()))
            .collect();
        let props = cx.graph.properties_mut(merged)?;
        for (prop, value) in copied {
            props.set(prop, value);
        }
    }
    cx.graph.set_property(merged, "INIT", init)?;

    // Nets already landed on the LUT6_2 by the 6-input half, by physical pin.
    let mut landed: BTreeMap<String, NetId> = BTreeMap::new();
    for source in sources {
        for (logical, physical) in source.pins.iter() {
            let new_pin = lut6_2_pin(&source.owner_name, physical)?;
            let Some(net) = cx.graph.net_of(source.owner, logical) else {
                continue;
            };
            let shared = match source.half {
                Half::Five => landed.get(physical).copied(),
                Half::Six => None,
            };
            match shared {
                Some(existing) if existing != net => {
                    return Err(TransformError::invariant(format!(
                        "{site} slot {}: physical pin {physical} carries different nets for the two LUT halves",
                        slot.letter
                    )));
                }
                Some(_) => {
                    cx.graph.disconnect_pin(source.owner, logical)?;
                }
                None => {
                    cx.transfer(source.owner, logical, merged, &new_pin)?;
                    if source.half == Half::Six {
                        landed.insert(physical.to_string(), net);
                    }
                }
            }
        }
    }

    cx.tie_unconnected_to_vcc(merged, &LUT6_2_INPUTS)?;

    for source in sources.iter().filter(|s| !s.genuine) {
        connect_routethru(cx, slot, source, merged)?;
    }

    for source in sources.iter().filter(|s| s.genuine) {
        cx.queue_removal(source.owner);
    }
    cx.report.luts_merged += 1;
    let described: Vec<String> = sources
        .iter()
        .map(|s| {
            if s.genuine {
                s.owner_name.clone()
            } else {
                format!("{} (routethru)", s.owner_name)
            }
        })
        .collect();
    cx.note(
        codes::LUT_MERGED,
        format!("merged {} into LUT6_2 `{name}`", described.join(", ")),
        &format!("{site}/{}", slot.letter),
    );
    Ok(())
}

/// Routethrough LUTs did not exist in the logical netlist: the routed net went
/// straight to the consumer. Now that the net stops at the LUT6_2 input, a new
/// net carries the LUT output on to the consumer's pin.
fn connect_routethru(
    cx: &mut PassContext<'_>,
    slot: &LutSlot,
    source: &Source,
    merged: CellId,
) -> Result<(), TransformError> {
    let Some((consumer_pin, _)) = source.pins.iter().next() else {
        return Err(TransformError::invariant(format!(
            "routethrough into `{}` maps no pin",
            source.owner_name
        )));
    };
    let consumer_pin = consumer_pin.clone();
    let parent = cx.graph.cell(source.owner)?.parent;
    let net_name = format!(
        "{}_routethru_{}{}",
        source.owner_name,
        slot.letter,
        source.half.digit()
    );
    let net = cx.graph.create_net(parent, net_name.clone())?;
    cx.graph
        .connect_pin(net, merged, &PinRef::scalar(source.half.output()))?;
    cx.graph.connect_pin(net, source.owner, &consumer_pin)?;
    cx.report.routethrus += 1;
    cx.note(
        codes::ROUTETHRU_NET,
        format!(
            "created routethrough net `{net_name}` to {}/{consumer_pin}",
            source.owner_name
        ),
        &net_name,
    );
    Ok(())
}

/// Synthesizes a LUT6_2 for a slot with no cell whose output sitewire carries
/// the ground constant, and rewires that sitewire's consumers onto it.
fn lower_gnd_generator(
    cx: &mut PassContext<'_>,
    site: SiteId,
    wires: &[String],
) -> Result<(), TransformError> {
    let site_ref = cx.graph.site(site)?;
    let site_name = site_ref.name.clone();

    let mut plan: Vec<(&String, Vec<(CellId, PinRef)>)> = Vec::new();
    for wire in wires {
        let mut consumers = Vec::new();
        for bel_pin in site_ref.sitewire_pins(wire) {
            let Some(occupant) = site_ref.occupant(&bel_pin.bel) else {
                continue;
            };
            let Some(cell) = occupant.cell() else {
                continue;
            };
            let entry = cx.graph.cell(cell)?;
            if !is_default_mapping(&entry.kind, occupant.pins()) {
                return Err(TransformError::UnsupportedPinPermutation {
                    cell: entry.name.clone(),
                    kind: entry.kind.name().to_string(),
                });
            }
            let logical = default_logical(&entry.kind, &bel_pin.pin).ok_or_else(|| {
                TransformError::invariant(format!(
                    "{site_name}: {} has no logical pin for {}/{}",
                    entry.kind, bel_pin.bel, bel_pin.pin
                ))
            })?;
            consumers.push((cell, logical));
        }
        plan.push((wire, consumers));
    }

    let top = cx.graph.top();
    let name = format!("{site_name}.{}.GND.gen", wires.join("."));
    let generator = cx.graph.create_cell(top, PrimitiveKind::Lut6_2, name.clone())?;
    let zero = BitLiteral::new(64, 0).map_err(|e| TransformError::invariant(e.to_string()))?;
    cx.graph.set_property(generator, "INIT", zero)?;

    let mut rewired = 0;
    for (wire, consumers) in plan {
        let net = cx.graph.create_net(top, format!("{site_name}.{wire}.GND"))?;
        let output = if wire.ends_with("O6") { "O6" } else { "O5" };
        cx.graph
            .connect_pin(net, generator, &PinRef::scalar(output))?;
        for (cell, pin) in consumers {
            cx.graph.disconnect_pin(cell, &pin)?;
            cx.graph.connect_pin(net, cell, &pin)?;
            rewired += 1;
        }
    }
    cx.tie_unconnected_to_vcc(generator, &LUT6_2_INPUTS)?;

    cx.report.gnd_generators += 1;
    cx.note(
        codes::GND_GENERATOR,
        format!("created ground generator `{name}` for {rewired} consumer pin(s)"),
        &site_name,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use physnet_diagnostics::DiagnosticSink;
    use physnet_netlist::{NetlistGraph, SiteKind};

    fn source(half: Half, genuine: bool, table: u64) -> Source {
        Source {
            half,
            owner: CellId::from_raw(0),
            owner_name: "u".to_string(),
            genuine,
            pins: PinMap::new(),
            table,
        }
    }

    #[test]
    fn paired_init_puts_six_high_and_five_low() {
        let six = 0x0000_00FF_0000_00FF;
        let five = 0xAAAA_AAAA_AAAA_AAAA;
        let init = combined_init(
            "S",
            'A',
            &[source(Half::Six, true, six), source(Half::Five, true, five)],
        )
        .unwrap();
        assert_eq!(init, 0x0000_00FF_AAAA_AAAA);
    }

    #[test]
    fn paired_init_rejects_a6_use() {
        let six = 0xFFFF_FFFF_0000_0000;
        let err = combined_init(
            "S",
            'B',
            &[source(Half::Six, true, six), source(Half::Five, true, 0)],
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::InvariantViolation(_)));
    }

    #[test]
    fn paired_init_rejects_a6_placement() {
        let mut six = source(Half::Six, true, 0xCAFE_BABE_CAFE_BABE);
        six.pins = PinMap::from_pairs([("I0", "A1"), ("I5", "A6"), ("O", "O6")]).unwrap();
        let err = combined_init("S", 'C', &[six, source(Half::Five, true, 0x5A5A_5A5A)])
            .unwrap_err();
        assert!(matches!(err, TransformError::InvariantViolation(_)));
    }

    #[test]
    fn unfractured_lut6_may_use_a6() {
        let mut six = source(Half::Six, true, 0xFFFF_FFFF_0000_0000);
        six.pins = PinMap::from_pairs([("I0", "A6"), ("O", "O6")]).unwrap();
        assert_eq!(
            combined_init("S", 'D', &[six]).unwrap(),
            0xFFFF_FFFF_0000_0000
        );
    }

    #[test]
    fn single_halves() {
        let table = 0x1234_5678_9ABC_DEF0;
        assert_eq!(
            combined_init("S", 'A', &[source(Half::Six, true, table)]).unwrap(),
            table
        );
        let five = 0x9ABC_DEF0_9ABC_DEF0;
        assert_eq!(
            combined_init("S", 'A', &[source(Half::Five, true, five)]).unwrap(),
            0x9ABC_DEF0
        );
    }

    #[test]
    fn lut6_2_pin_names() {
        assert_eq!(lut6_2_pin("u", "A1").unwrap(), PinRef::scalar("I0"));
        assert_eq!(lut6_2_pin("u", "A6").unwrap(), PinRef::scalar("I5"));
        assert_eq!(lut6_2_pin("u", "O5").unwrap(), PinRef::scalar("O5"));
        assert!(lut6_2_pin("u", "DI1").is_err());
    }

    #[test]
    fn occupied_ground_slot_is_invariant_violation() {
        let mut graph = NetlistGraph::new("top");
        let top = graph.top();
        let lut = graph.create_cell(top, PrimitiveKind::Lut1, "u").unwrap();
        graph
            .set_property(lut, "INIT", "2'h1".parse::<BitLiteral>().unwrap())
            .unwrap();
        let site = graph.create_site("SLICE_X0Y0", SiteKind::SliceL).unwrap();
        graph
            .place(lut, site, "A6LUT", PinMap::from_pairs([("I0", "A1")]).unwrap())
            .unwrap();
        graph
            .site_mut(site)
            .unwrap()
            .gnd_sitewires
            .insert("A6LUT_O6".to_string());
        let sink = DiagnosticSink::new();
        let mut cx = PassContext::new(graph, &sink);
        let err = lower_slot(&mut cx, site, &LutSlot::new('A')).unwrap_err();
        assert!(matches!(err, TransformError::InvariantViolation(_)));
    }

    #[test]
    fn non_lut_on_lut_bel_is_unsupported() {
        let mut graph = NetlistGraph::new("top");
        let top = graph.top();
        let ff = graph.create_cell(top, PrimitiveKind::Fdre, "ff").unwrap();
        let site = graph.create_site("SLICE_X0Y0", SiteKind::SliceL).unwrap();
        graph.place(ff, site, "B6LUT", PinMap::new()).unwrap();
        let sink = DiagnosticSink::new();
        let mut cx = PassContext::new(graph, &sink);
        let err = lower_slot(&mut cx, site, &LutSlot::new('B')).unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedCellType { .. }));
    }

    #[test]
    fn empty_slot_is_untouched() {
        let mut graph = NetlistGraph::new("top");
        let site = graph.create_site("SLICE_X0Y0", SiteKind::SliceL).unwrap();
        let sink = DiagnosticSink::new();
        let mut cx = PassContext::new(graph, &sink);
        lower_slot(&mut cx, site, &LutSlot::new('C')).unwrap();
        assert_eq!(cx.graph.cell_count(), 0);
        assert!(sink.diagnostics().is_empty());
    }
}
