//! Structured diagnostics for the lowering pipeline.
//!
//! Rewrites, conservative decisions and fatal errors are all reported as
//! [`Diagnostic`] values accumulated in a thread-safe [`DiagnosticSink`], then
//! formatted by a [`DiagnosticRenderer`] for the terminal or as JSON lines.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
