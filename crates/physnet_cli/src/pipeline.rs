//! Shared helpers for CLI commands.
//!
//! Project root resolution, output format selection and diagnostic/report
//! rendering used by `lower`, `run` and `inspect`.

use std::path::{Path, PathBuf};

use physnet_checkpoint::CheckpointFormat;
use physnet_config::{OutputFormat, CONFIG_FILE_NAME};
use physnet_diagnostics::{
    Category, DiagnosticCode, DiagnosticRenderer, DiagnosticSink, JsonRenderer, Severity,
    TerminalRenderer,
};
use physnet_lower::LowerReport;

use crate::{GlobalArgs, OutputKind, ReportFormat};

/// A design's checkpoint could not be loaded.
pub const CHECKPOINT_LOAD_FAILED: DiagnosticCode = DiagnosticCode::new(Category::Error, 10);

/// Walks up from `start` looking for the nearest directory containing `physnet.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE_NAME} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `physnet.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Picks the export encoding: the explicit flag, else the output extension.
pub fn export_format(kind: Option<OutputKind>, output: &Path) -> CheckpointFormat {
    match kind {
        Some(OutputKind::Json) => CheckpointFormat::Json,
        Some(OutputKind::Checkpoint) => CheckpointFormat::Binary,
        None => CheckpointFormat::from_path(output),
    }
}

/// Maps the configured output format onto a checkpoint encoding.
pub fn configured_format(format: OutputFormat) -> CheckpointFormat {
    match format {
        OutputFormat::Json => CheckpointFormat::Json,
        OutputFormat::Checkpoint => CheckpointFormat::Binary,
    }
}

/// Drains the sink and renders what the verbosity flags let through: text to
/// stderr, JSON lines to stdout.
///
/// `--quiet` shows errors only, the default adds warnings, `--verbose` shows
/// every rewrite note.
pub fn render_diagnostics(sink: &DiagnosticSink, format: ReportFormat, global: &GlobalArgs) {
    let shown = sink.take_at_least(Severity::threshold(global.quiet, global.verbose));
    match format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in &shown {
                eprint!("{}", renderer.render(diag));
            }
        }
        ReportFormat::Json => {
            for diag in &shown {
                print!("{}", JsonRenderer.render(diag));
            }
        }
    }
}

/// Prints one design's lowering report.
pub fn render_report(design: &str, report: &LowerReport, format: ReportFormat, global: &GlobalArgs) {
    match format {
        ReportFormat::Text => {
            if !global.quiet {
                eprintln!("   Lowered {design}");
                eprintln!("{report}");
            }
        }
        ReportFormat::Json => println!("{}", report_json(design, report)),
    }
}

/// One JSON line describing a design's lowering report.
pub fn report_json(design: &str, report: &LowerReport) -> String {
    serde_json::json!({ "design": design, "report": report }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(quiet: bool, verbose: bool) -> GlobalArgs {
        GlobalArgs {
            quiet,
            verbose,
            color: false,
            config: None,
        }
    }

    #[test]
    fn find_root_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();
        let nested = dir.path().join("build").join("checkpoints");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested).unwrap(), dir.path());
    }

    #[test]
    fn find_root_fails_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_project_root(dir.path()).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn config_file_resolves_to_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&file, "").unwrap();
        let mut args = global(false, false);
        args.config = Some(file.to_string_lossy().into_owned());
        assert_eq!(resolve_project_root(&args).unwrap(), dir.path());
    }

    #[test]
    fn export_format_prefers_flag() {
        assert_eq!(
            export_format(Some(OutputKind::Checkpoint), Path::new("out.json")),
            CheckpointFormat::Binary
        );
        assert_eq!(
            export_format(None, Path::new("out.json")),
            CheckpointFormat::Json
        );
        assert_eq!(
            export_format(None, Path::new("out.pnc")),
            CheckpointFormat::Binary
        );
    }

    #[test]
    fn report_json_names_design() {
        let report = LowerReport {
            bufgs_rewritten: 2,
            ..LowerReport::default()
        };
        let value: serde_json::Value =
            serde_json::from_str(&report_json("counter", &report)).unwrap();
        assert_eq!(value["design"], "counter");
        assert_eq!(value["report"]["bufgs_rewritten"], 2);
    }

    #[test]
    fn rendering_drains_the_sink_but_keeps_totals() {
        let sink = DiagnosticSink::new();
        let code = DiagnosticCode::new(Category::Ram, 203);
        sink.emit(physnet_diagnostics::Diagnostic::warning(code, "left unmerged"));
        sink.emit(physnet_diagnostics::Diagnostic::error(
            CHECKPOINT_LOAD_FAILED,
            "missing",
        ));

        render_diagnostics(&sink, ReportFormat::Text, &global(true, false));

        assert!(sink.diagnostics().is_empty());
        assert_eq!(sink.count(Severity::Warning), 1);
        assert!(sink.has_errors());
    }
}
