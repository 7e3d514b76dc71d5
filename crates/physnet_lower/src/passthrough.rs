//! Rewrites or checks every cell the site walk did not consume, by kind.

use crate::codes;
use crate::context::PassContext;
use crate::error::TransformError;
use physnet_netlist::pin_map::{default_pin_map, is_default_mapping};
use physnet_netlist::{CellId, PinRef, PrimitiveKind, PropertyValue};

/// BUFGCTRL inputs that stay tied high so input 0 is always selected.
const BUFGCTRL_TIED: [&str; 7] = ["CE0", "CE1", "I1", "IGNORE0", "IGNORE1", "S0", "S1"];

const BUFGCTRL_CONFIG: [(&str, i64); 6] = [
    ("IS_CE0_INVERTED", 0),
    ("IS_IGNORE1_INVERTED", 0),
    ("IS_S0_INVERTED", 0),
    ("IS_CE1_INVERTED", 1),
    ("IS_IGNORE0_INVERTED", 1),
    ("IS_S1_INVERTED", 1),
];

/// Handles one cell not visited by the LUT or LUTRAM engines.
pub(crate) fn lower_cell(cx: &mut PassContext<'_>, cell: CellId) -> Result<(), TransformError> {
    let entry = cx.graph.cell(cell)?;
    let kind = entry.kind.clone();
    let name = entry.name.clone();
    match kind {
        PrimitiveKind::Bufg => rewrite_bufg(cx, cell),
        PrimitiveKind::Carry4 | PrimitiveKind::Muxf7 | PrimitiveKind::Muxf8 => {
            check_default_mapping(cx, cell, &kind)
        }
        PrimitiveKind::Ibuf
        | PrimitiveKind::Obuf
        | PrimitiveKind::Obuft
        | PrimitiveKind::Fdre
        | PrimitiveKind::Fdse
        | PrimitiveKind::Fdce
        | PrimitiveKind::Fdpe
        | PrimitiveKind::Ramb36e1
        | PrimitiveKind::Gnd
        | PrimitiveKind::Vcc
        | PrimitiveKind::Lut6_2
        | PrimitiveKind::Bufgctrl
        | PrimitiveKind::Ram32X1D
        | PrimitiveKind::Ram32M => {
            cx.report.passed_through += 1;
            Ok(())
        }
        PrimitiveKind::Lut1
        | PrimitiveKind::Lut2
        | PrimitiveKind::Lut3
        | PrimitiveKind::Lut4
        | PrimitiveKind::Lut5
        | PrimitiveKind::Lut6
        | PrimitiveKind::Ram32X1S => Err(TransformError::invariant(format!(
            "{kind} `{name}` is not placed on a SLICE LUT BEL"
        ))),
        PrimitiveKind::Unsupported(_) => Err(TransformError::UnsupportedCellType {
            cell: name,
            kind: kind.name().to_string(),
        }),
    }
}

fn check_default_mapping(
    cx: &mut PassContext<'_>,
    cell: CellId,
    kind: &PrimitiveKind,
) -> Result<(), TransformError> {
    let name = cx.cell_name(cell)?;
    if let Some(pins) = cx.graph.placement_pins(cell) {
        if !is_default_mapping(kind, pins) {
            return Err(TransformError::UnsupportedPinPermutation {
                cell: name,
                kind: kind.name().to_string(),
            });
        }
    }
    cx.report.validated += 1;
    cx.note(
        codes::DEFAULT_MAPPING,
        format!("{kind} `{name}` uses its default pin mapping"),
        &name,
    );
    Ok(())
}

/// Replaces a BUFG with the BUFGCTRL the clock tile actually configures.
fn rewrite_bufg(cx: &mut PassContext<'_>, cell: CellId) -> Result<(), TransformError> {
    let entry = cx.graph.cell(cell)?;
    let name = entry.name.clone();
    let parent = entry.parent;
    let properties: Vec<(String, PropertyValue)> = entry
        .properties
        .iter()
        .map(|(prop, value)| (prop.to_string(), value.clone()))
        .collect();
    let pins = match cx.graph.placement_pins(cell) {
        Some(pins) => pins.clone(),
        None => default_pin_map(&PrimitiveKind::Bufg).ok_or_else(|| {
            TransformError::invariant("BUFG has no default pin mapping")
        })?,
    };
    if !is_default_mapping(&PrimitiveKind::Bufg, &pins) {
        return Err(TransformError::UnsupportedPinPermutation {
            cell: name,
            kind: PrimitiveKind::Bufg.name().to_string(),
        });
    }

    let phys_name = format!("{name}_phys");
    let bufgctrl = cx
        .graph
        .create_cell(parent, PrimitiveKind::Bufgctrl, phys_name.clone())?;
    {
        let props = cx.graph.properties_mut(bufgctrl)?;
        for (prop, value) in properties {
            props.set(prop, value);
        }
        props.set("INIT_OUT", 0i64);
        for (prop, value) in BUFGCTRL_CONFIG {
            props.set(prop, value);
        }
        props.set("PRESELECT_I0", "TRUE");
        props.set("PRESELECT_I1", "FALSE");
    }

    for (logical, physical) in pins.iter() {
        cx.transfer(cell, logical, bufgctrl, &PinRef::scalar(physical))?;
    }
    cx.tie_unconnected_to_vcc(bufgctrl, &BUFGCTRL_TIED)?;

    cx.queue_removal(cell);
    cx.report.bufgs_rewritten += 1;
    cx.note(
        codes::BUFG_REWRITTEN,
        format!("rewrote BUFG `{name}` as BUFGCTRL `{phys_name}`"),
        &name,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use physnet_diagnostics::DiagnosticSink;
    use physnet_netlist::NetlistGraph;

    #[test]
    fn unplaced_lut_is_invariant_violation() {
        let mut graph = NetlistGraph::new("top");
        let top = graph.top();
        let lut = graph.create_cell(top, PrimitiveKind::Lut2, "u").unwrap();
        let sink = DiagnosticSink::new();
        let mut cx = PassContext::new(graph, &sink);
        let err = lower_cell(&mut cx, lut).unwrap_err();
        assert!(matches!(err, TransformError::InvariantViolation(_)));
    }

    #[test]
    fn unknown_kind_is_unsupported() {
        let mut graph = NetlistGraph::new("top");
        let top = graph.top();
        let dsp = graph
            .create_cell(top, PrimitiveKind::from_name("DSP48E1"), "mul")
            .unwrap();
        let sink = DiagnosticSink::new();
        let mut cx = PassContext::new(graph, &sink);
        match lower_cell(&mut cx, dsp).unwrap_err() {
            TransformError::UnsupportedCellType { cell, kind } => {
                assert_eq!(cell, "mul");
                assert_eq!(kind, "DSP48E1");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn flip_flops_pass_through() {
        let mut graph = NetlistGraph::new("top");
        let top = graph.top();
        let ff = graph.create_cell(top, PrimitiveKind::Fdre, "q_reg").unwrap();
        let sink = DiagnosticSink::new();
        let mut cx = PassContext::new(graph, &sink);
        lower_cell(&mut cx, ff).unwrap();
        assert_eq!(cx.report.passed_through, 1);
        assert!(cx.to_remove.is_empty());
    }

    #[test]
    fn bufg_configuration() {
        let mut graph = NetlistGraph::new("top");
        let top = graph.top();
        let bufg = graph.create_cell(top, PrimitiveKind::Bufg, "clk_BUFG").unwrap();
        let ibuf = graph.create_net(top, "clk_IBUF").unwrap();
        let clk = graph.create_net(top, "clk_BUFG_out").unwrap();
        graph.connect_pin(ibuf, bufg, &PinRef::scalar("I")).unwrap();
        graph.connect_pin(clk, bufg, &PinRef::scalar("O")).unwrap();

        let sink = DiagnosticSink::new();
        let mut cx = PassContext::new(graph, &sink);
        lower_cell(&mut cx, bufg).unwrap();

        let graph = &cx.graph;
        let ctrl = graph.cell_by_name("clk_BUFG_phys").unwrap();
        let props = &graph.cell(ctrl).unwrap().properties;
        assert_eq!(props.get("INIT_OUT"), Some(&PropertyValue::Int(0)));
        assert_eq!(props.get("IS_S1_INVERTED"), Some(&PropertyValue::Int(1)));
        assert_eq!(props.get("IS_S0_INVERTED"), Some(&PropertyValue::Int(0)));
        assert_eq!(
            props.get("PRESELECT_I0"),
            Some(&PropertyValue::String("TRUE".to_string()))
        );
        assert_eq!(graph.net_of(ctrl, &PinRef::scalar("I0")), Some(ibuf));
        assert_eq!(graph.net_of(ctrl, &PinRef::scalar("O")), Some(clk));
        let vcc = graph.net_by_name("vcc_net_phys_netlist").unwrap();
        for pin in BUFGCTRL_TIED {
            assert_eq!(graph.net_of(ctrl, &PinRef::scalar(pin)), Some(vcc), "{pin}");
        }
        assert!(cx.to_remove.contains(&bufg));
        assert_eq!(cx.report.bufgs_rewritten, 1);
    }
}
