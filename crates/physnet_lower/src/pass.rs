//! The lowering driver: walks sites, then cells, then removes what was replaced.

use crate::codes;
use crate::context::PassContext;
use crate::error::TransformError;
use crate::report::LowerReport;
use crate::{lut, lutram, passthrough};
use physnet_diagnostics::{Diagnostic, DiagnosticSink};
use physnet_netlist::{
    CellId, ExportAdapter, LutSlot, NetlistGraph, PrimitiveKind, SiteId,
};
use std::path::Path;

/// A successfully lowered graph and what the pass did to it.
#[derive(Debug)]
pub struct Lowered {
    /// The physical netlist.
    pub graph: NetlistGraph,
    /// Counters of the rewrites performed.
    pub report: LowerReport,
}

/// Lowers a placed logical netlist to its physical form.
///
/// Diagnostics are discarded; use [`lower_with_sink`] to keep them.
pub fn lower(graph: NetlistGraph) -> Result<NetlistGraph, TransformError> {
    let sink = DiagnosticSink::new();
    lower_with_sink(graph, &sink).map(|lowered| lowered.graph)
}

/// Lowers a graph, reporting every rewrite to `sink`.
///
/// On failure the error is also emitted as an error diagnostic and the
/// partially rewritten graph is dropped.
pub fn lower_with_sink(
    graph: NetlistGraph,
    sink: &DiagnosticSink,
) -> Result<Lowered, TransformError> {
    let design = graph.design_name().to_string();
    run(graph, sink).map_err(|err| report_error(sink, &design, err))
}

/// Lowers a graph and hands the result to an exporter. Nothing is exported
/// unless lowering succeeds.
pub fn lower_and_export(
    graph: NetlistGraph,
    exporter: &dyn ExportAdapter,
    dest: &Path,
    sink: &DiagnosticSink,
) -> Result<LowerReport, TransformError> {
    let design = graph.design_name().to_string();
    let Lowered { mut graph, report } = lower_with_sink(graph, sink)?;
    graph.unplace();
    exporter
        .export(&graph, dest)
        .map_err(|err| report_error(sink, &design, err.into()))?;
    Ok(report)
}

fn report_error(sink: &DiagnosticSink, design: &str, err: TransformError) -> TransformError {
    sink.emit(Diagnostic::error(err.code(), err.to_string()).with_subject(design));
    err
}

fn run(graph: NetlistGraph, sink: &DiagnosticSink) -> Result<Lowered, TransformError> {
    let mut cells: Vec<(String, CellId)> = graph
        .cells()
        .map(|(id, cell)| (cell.name.clone(), id))
        .collect();
    cells.sort();
    let mut sites: Vec<(String, SiteId)> = graph
        .sites()
        .filter(|(_, site)| site.kind.is_slice())
        .map(|(id, site)| (site.name.clone(), id))
        .collect();
    sites.sort();

    let mut cx = PassContext::new(graph, sink);
    for (name, site) in &sites {
        lower_site(&mut cx, name, *site)?;
    }
    for (_, cell) in cells {
        if !cx.visited.contains(&cell) {
            passthrough::lower_cell(&mut cx, cell)?;
        }
    }

    for cell in std::mem::take(&mut cx.to_remove) {
        let name = cx.cell_name(cell)?;
        cx.graph.remove_cell(cell)?;
        cx.report.cells_removed += 1;
        cx.note(codes::CELL_REMOVED, format!("removed `{name}`"), &name);
    }
    cx.graph.validate()?;

    Ok(Lowered {
        graph: cx.graph,
        report: cx.report,
    })
}

/// Walks the LUT slots of one slice. Slots whose 6-input BEL holds a
/// LUTRAM are gathered into runs for the LUTRAM engine; a run ends at the
/// first ordinary slot and at the end of the site.
fn lower_site(cx: &mut PassContext<'_>, name: &str, site: SiteId) -> Result<(), TransformError> {
    let mut run = Vec::new();
    for slot in LutSlot::all() {
        if let Some(ram) = lutram_at(cx, site, &slot)? {
            run.push(lutram::collect(cx, ram, &slot)?);
            continue;
        }
        lutram::merge_run(cx, name, &run)?;
        run.clear();
        lut::lower_slot(cx, site, &slot)?;
    }
    lutram::merge_run(cx, name, &run)
}

fn lutram_at(
    cx: &PassContext<'_>,
    site: SiteId,
    slot: &LutSlot,
) -> Result<Option<CellId>, TransformError> {
    let entry = cx.graph.site(site)?;
    let Some(cell) = entry.cell_at(&slot.lut6_bel) else {
        return Ok(None);
    };
    if cx.graph.cell(cell)?.kind != PrimitiveKind::Ram32X1S {
        return Ok(None);
    }
    if entry.occupant(&slot.lut5_bel).is_some() {
        return Err(TransformError::invariant(format!(
            "{} slot {}: LUTRAM shares its LUT with a 5-input occupant",
            entry.name, slot.letter
        )));
    }
    Ok(Some(cell))
}
