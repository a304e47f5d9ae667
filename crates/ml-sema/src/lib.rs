// ML semantic analysis: type model, scope chain, and the analyzer pass.

mod analyzer;
mod infer;
pub mod scope;
pub mod ty;

pub use analyzer::Analyzer;

use ml_common::diagnostic::Diagnostic;
use ml_parser::ast::Program;

/// The analyzer's verdict for one program.
pub struct Analysis {
    /// True when no Error-level diagnostic was produced.
    pub valid: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Convenience entry point: analyze a parsed program in a fresh global
/// scope.
pub fn analyze(program: &Program, source: &str, file: &str) -> Analysis {
    let mut analyzer = Analyzer::new(source, file);
    let valid = analyzer.analyze(program);
    Analysis {
        valid,
        diagnostics: analyzer.into_diagnostics(),
    }
}
