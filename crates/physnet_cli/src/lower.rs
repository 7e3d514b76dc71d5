//! `physnet lower`: lower one graph file.

use physnet_checkpoint::{exporter_for, load_file};
use physnet_diagnostics::{DiagnosticSink, Severity};
use physnet_lower::lower_and_export;

use crate::pipeline::{export_format, render_diagnostics, render_report};
use crate::{GlobalArgs, LowerArgs, ReportFormat};

/// Runs the `physnet lower` command.
///
/// Returns exit code 0 when the design lowered and was written, 1 when the
/// pass rejected it. Load failures are returned as errors.
pub fn run(args: &LowerArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let graph = load_file(&args.input)?;
    let design = graph.design_name().to_string();

    if !global.quiet && args.report == ReportFormat::Text {
        eprintln!("   Lowering {design} ({} cells)", graph.cell_count());
    }

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let sink = DiagnosticSink::new();
    let exporter = exporter_for(export_format(args.format, &args.output));
    let result = lower_and_export(graph, exporter.as_ref(), &args.output, &sink);

    render_diagnostics(&sink, args.report, global);

    match result {
        Ok(report) => {
            render_report(&design, &report, args.report, global);
            if !global.quiet && args.report == ReportFormat::Text {
                eprintln!(
                    "   Wrote {} ({} warning(s))",
                    args.output.display(),
                    sink.count(Severity::Warning)
                );
            }
            Ok(0)
        }
        Err(_) => Ok(1),
    }
}
