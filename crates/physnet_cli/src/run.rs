//! `physnet run`: lower every configured design.
//!
//! 1. Find the project root (walk up looking for `physnet.toml`)
//! 2. Load config and resolve the selected designs
//! 3. Lower the designs in parallel into one shared sink
//! 4. Render diagnostics and per-design reports

use physnet_checkpoint::{exporter_for, load_file, CheckpointProvider, DirCheckpointStore};
use physnet_config::ResolvedDesign;
use physnet_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use physnet_lower::{lower_and_export, LowerReport};
use physnet_netlist::NetlistGraph;
use rayon::prelude::*;

use crate::pipeline::{
    configured_format, render_diagnostics, render_report, resolve_project_root,
    CHECKPOINT_LOAD_FAILED,
};
use crate::{GlobalArgs, ReportFormat, RunArgs};

/// Result of lowering one design.
struct Outcome {
    design: String,
    report: Option<LowerReport>,
}

/// Runs the `physnet run` command.
///
/// Every selected design is attempted; the exit code is 1 if any failed.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = physnet_config::load_config(&project_dir)?;
    let designs = physnet_config::resolve_designs(&config, &project_dir, args.design.as_deref())?;

    if !global.quiet && args.report == ReportFormat::Text {
        eprintln!(
            "   Lowering {} design(s) for {}",
            designs.len(),
            config.project.name
        );
    }

    let output_dir = project_dir.join(&config.project.output_dir);
    std::fs::create_dir_all(&output_dir)?;

    let sink = DiagnosticSink::new();
    let outcomes: Vec<Outcome> = designs
        .par_iter()
        .map(|design| lower_design(design, &sink))
        .collect();

    render_diagnostics(&sink, args.report, global);

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.report {
            Some(report) => render_report(&outcome.design, report, args.report, global),
            None => failed += 1,
        }
    }

    if !global.quiet && args.report == ReportFormat::Text {
        eprintln!(
            "   Result: {} lowered, {failed} failed, {} error(s), {} warning(s)",
            outcomes.len() - failed,
            sink.count(Severity::Error),
            sink.count(Severity::Warning)
        );
    }

    Ok(if failed == 0 { 0 } else { 1 })
}

fn lower_design(design: &ResolvedDesign, sink: &DiagnosticSink) -> Outcome {
    let report = match load_design(design) {
        Ok(graph) => {
            let exporter = exporter_for(configured_format(design.format));
            lower_and_export(graph, exporter.as_ref(), &design.output, sink).ok()
        }
        Err(reason) => {
            sink.emit(
                Diagnostic::error(CHECKPOINT_LOAD_FAILED, reason).with_subject(&design.name),
            );
            None
        }
    };
    Outcome {
        design: design.name.clone(),
        report,
    }
}

fn load_design(design: &ResolvedDesign) -> Result<NetlistGraph, String> {
    let loaded = match &design.checkpoint {
        Some(path) => load_file(path),
        None => DirCheckpointStore::new(&design.checkpoint_dir).load(&design.name),
    };
    loaded.map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use physnet_checkpoint::CheckpointFormat;
    use physnet_netlist::PrimitiveKind;
    use std::path::Path;

    fn global_for(dir: &Path) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: Some(dir.to_string_lossy().into_owned()),
        }
    }

    fn write_project(dir: &Path, designs: &[&str]) {
        let mut toml = String::from(
            "[project]\nname = \"bench\"\ncheckpoint_dir = \"cp\"\noutput_dir = \"out\"\n",
        );
        for design in designs {
            toml.push_str(&format!("\n[[designs]]\nname = \"{design}\"\n"));
        }
        std::fs::write(dir.join("physnet.toml"), toml).unwrap();
    }

    fn persist(dir: &Path, name: &str) {
        let mut graph = NetlistGraph::new(name);
        let top = graph.top();
        let bufg = graph
            .create_cell(top, PrimitiveKind::Bufg, "clk_BUFG_inst")
            .unwrap();
        let net = graph.create_net(top, "clk").unwrap();
        graph.connect_pin(net, bufg, &"O".parse().unwrap()).unwrap();
        DirCheckpointStore::new(&dir.join("cp"))
            .with_format(CheckpointFormat::Json)
            .persist(&graph, name)
            .unwrap();
    }

    #[test]
    fn lowers_every_design() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), &["a", "b"]);
        persist(dir.path(), "a");
        persist(dir.path(), "b");
        let args = RunArgs {
            design: None,
            report: ReportFormat::Text,
        };

        assert_eq!(run(&args, &global_for(dir.path())).unwrap(), 0);
        for name in ["a", "b"] {
            let out = dir.path().join("out").join(format!("{name}.json"));
            let graph = load_file(&out).unwrap();
            assert!(graph.cell_by_name("clk_BUFG_inst_phys").is_some());
        }
    }

    #[test]
    fn missing_checkpoint_fails_run_but_not_others() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), &["a", "ghost"]);
        persist(dir.path(), "a");
        let args = RunArgs {
            design: None,
            report: ReportFormat::Json,
        };

        assert_eq!(run(&args, &global_for(dir.path())).unwrap(), 1);
        assert!(dir.path().join("out").join("a.json").is_file());
        assert!(!dir.path().join("out").join("ghost.json").exists());
    }

    #[test]
    fn single_design_selection() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), &["a", "b"]);
        persist(dir.path(), "b");
        let args = RunArgs {
            design: Some("b".to_string()),
            report: ReportFormat::Text,
        };

        assert_eq!(run(&args, &global_for(dir.path())).unwrap(), 0);
        assert!(!dir.path().join("out").join("a.json").exists());
    }

    #[test]
    fn unknown_design_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), &["a"]);
        let args = RunArgs {
            design: Some("zzz".to_string()),
            report: ReportFormat::Text,
        };
        assert!(run(&args, &global_for(dir.path())).is_err());
    }
}
