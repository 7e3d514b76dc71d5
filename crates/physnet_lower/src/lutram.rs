//! LUTRAM merge engine.
//!
//! Vivado wraps every distributed-RAM LUT in its own RAM32X1S. When
//! neighbouring slots share write control, the bitstream configures them as
//! one dual-port (RAM32X1D) or quad-port (RAM32M) macro, so the logical
//! cells are recombined here.

use crate::codes;
use crate::context::PassContext;
use crate::error::TransformError;
use physnet_common::BitLiteral;
use physnet_diagnostics::Diagnostic;
use physnet_netlist::{CellId, LutSlot, NetId, PinRef, PrimitiveKind};

const ADDRESS: [&str; 5] = ["A0", "A1", "A2", "A3", "A4"];
const READ_ADDRESS: [&str; 5] = ["DPRA0", "DPRA1", "DPRA2", "DPRA3", "DPRA4"];

/// A RAM32X1S collected from a LUT slot, with the control nets the merge
/// rules compare.
#[derive(Debug, Clone)]
pub(crate) struct Lutram {
    cell: CellId,
    name: String,
    slot: char,
    we: Option<NetId>,
    wclk: Option<NetId>,
    d: Option<NetId>,
    init: BitLiteral,
}

impl Lutram {
    fn shares_write_port(&self, other: &Lutram) -> bool {
        self.we.is_some() && self.we == other.we && self.wclk.is_some() && self.wclk == other.wclk
    }

    fn pairs_with(&self, other: &Lutram) -> bool {
        self.shares_write_port(other)
            && self.d.is_some()
            && self.d == other.d
            && self.init == other.init
    }
}

/// Checks a RAM32X1S on a slot's 6-input BEL and records it for merging.
pub(crate) fn collect(
    cx: &mut PassContext<'_>,
    cell: CellId,
    slot: &LutSlot,
) -> Result<Lutram, TransformError> {
    let entry = cx.graph.cell(cell)?;
    let name = entry.name.clone();
    let clk = cx.bits_property(cell, "IS_CLK_INVERTED")?;
    if clk.width() != 1 || clk.value() != 1 {
        return Err(TransformError::invariant(format!(
            "LUTRAM `{name}` has IS_CLK_INVERTED = {clk}, expected 1'b1"
        )));
    }
    let net = |pin: &str| cx.graph.net_of(cell, &PinRef::scalar(pin));
    let ram = Lutram {
        cell,
        slot: slot.letter,
        we: net("WE"),
        wclk: net("WCLK"),
        d: net("D"),
        init: cx.bits_property(cell, "INIT")?,
        name,
    };
    cx.visited.insert(cell);
    Ok(ram)
}

/// Merges a run of LUTRAMs from consecutive slots of one site.
///
/// Four cells sharing WE and WCLK become a RAM32M. Otherwise neighbouring
/// cells that also share D and INIT are paired into RAM32X1D. Anything left
/// stays a RAM32X1S.
pub(crate) fn merge_run(
    cx: &mut PassContext<'_>,
    site: &str,
    run: &[Lutram],
) -> Result<(), TransformError> {
    if run.len() < 2 {
        cx.report.passed_through += run.len();
        return Ok(());
    }
    let parent = cx.graph.cell(run[0].cell)?.parent;
    for ram in &run[1..] {
        if cx.graph.cell(ram.cell)?.parent != parent {
            return Err(TransformError::invariant(format!(
                "{site}: LUTRAMs `{}` and `{}` have different parents",
                run[0].name, ram.name
            )));
        }
    }

    if run.len() == 4 && run.iter().all(|ram| run[0].shares_write_port(ram)) {
        return merge_ram32m(cx, site, run);
    }

    let mut leftover = Vec::new();
    let mut i = 0;
    while i < run.len() {
        match run.get(i + 1) {
            Some(next) if run[i].pairs_with(next) => {
                merge_ram32x1d(cx, site, &run[i], next)?;
                i += 2;
            }
            _ => {
                leftover.push(&run[i]);
                i += 1;
            }
        }
    }

    if !leftover.is_empty() {
        cx.report.lutrams_unmerged += leftover.len();
        let names: Vec<&str> = leftover.iter().map(|ram| ram.name.as_str()).collect();
        cx.sink.emit(
            Diagnostic::warning(
                codes::LUTRAM_UNMERGED,
                format!("left {} LUTRAM(s) unmerged: {}", names.len(), names.join(", ")),
            )
            .with_subject(site)
            .with_note("neighbouring cells do not share WE, WCLK, D and INIT"),
        );
    }
    Ok(())
}

fn merged_name(rams: &[&Lutram]) -> String {
    rams.iter()
        .map(|ram| ram.name.as_str())
        .collect::<Vec<_>>()
        .join("__")
}

fn move_pin(
    cx: &mut PassContext<'_>,
    from: CellId,
    from_pin: &str,
    to: CellId,
    to_pin: PinRef,
) -> Result<(), TransformError> {
    cx.transfer(from, &PinRef::scalar(from_pin), to, &to_pin)?;
    Ok(())
}

fn merge_ram32x1d(
    cx: &mut PassContext<'_>,
    site: &str,
    write: &Lutram,
    read: &Lutram,
) -> Result<(), TransformError> {
    let name = merged_name(&[write, read]);
    let parent = cx.graph.cell(write.cell)?.parent;
    let ram = cx
        .graph
        .create_cell(parent, PrimitiveKind::Ram32X1D, name.clone())?;
    cx.graph.set_property(ram, "INIT", write.init)?;

    for pin in ["WE", "WCLK", "D"].into_iter().chain(ADDRESS) {
        move_pin(cx, write.cell, pin, ram, PinRef::scalar(pin))?;
    }
    move_pin(cx, write.cell, "O", ram, PinRef::scalar("DPO"))?;
    for (pin, read_pin) in ADDRESS.into_iter().zip(READ_ADDRESS) {
        move_pin(cx, read.cell, pin, ram, PinRef::scalar(read_pin))?;
    }
    move_pin(cx, read.cell, "O", ram, PinRef::scalar("SPO"))?;

    cx.queue_removal(write.cell);
    cx.queue_removal(read.cell);
    cx.report.ram32x1d += 1;
    cx.note(
        codes::RAM32X1D_MERGED,
        format!(
            "merged `{}` (slot {}) and `{}` (slot {}) into RAM32X1D `{name}`",
            write.name, write.slot, read.name, read.slot
        ),
        site,
    );
    Ok(())
}

fn merge_ram32m(cx: &mut PassContext<'_>, site: &str, run: &[Lutram]) -> Result<(), TransformError> {
    let rams: Vec<&Lutram> = run.iter().collect();
    let name = merged_name(&rams);
    let parent = cx.graph.cell(run[0].cell)?.parent;
    let merged = cx
        .graph
        .create_cell(parent, PrimitiveKind::Ram32M, name.clone())?;

    for (quadrant, ram) in ['A', 'B', 'C', 'D'].into_iter().zip(run) {
        let init = ram
            .init
            .widen(64)
            .map_err(|e| TransformError::invariant(format!("LUTRAM `{}`: {e}", ram.name)))?;
        cx.graph
            .set_property(merged, format!("INIT_{quadrant}"), init)?;
    }

    move_pin(cx, run[0].cell, "WE", merged, PinRef::scalar("WE"))?;
    move_pin(cx, run[0].cell, "WCLK", merged, PinRef::scalar("WCLK"))?;
    for (quadrant, ram) in ['A', 'B', 'C', 'D'].into_iter().zip(run) {
        for (bit, pin) in ADDRESS.into_iter().enumerate() {
            let to = PinRef::bit(format!("ADDR{quadrant}"), bit as u32);
            move_pin(cx, ram.cell, pin, merged, to)?;
        }
        move_pin(cx, ram.cell, "D", merged, PinRef::bit(format!("DI{quadrant}"), 0))?;
        move_pin(cx, ram.cell, "O", merged, PinRef::bit(format!("DO{quadrant}"), 0))?;
    }

    for ram in run {
        cx.queue_removal(ram.cell);
    }
    cx.report.ram32m += 1;
    cx.note(
        codes::RAM32M_MERGED,
        format!("merged {} into RAM32M `{name}`", merged_name(&rams).replace("__", ", ")),
        site,
    );
    Ok(())
}
