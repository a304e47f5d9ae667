//! The ML compiler driver.
//!
//! Wires the pipeline together: lex + parse, analyze, report diagnostics in
//! stage order, and map the outcome to a process exit code.

mod printer;

pub use printer::TreePrinter;

use ml_common::diagnostic::has_errors;
use ml_lexer::Lexer;
use ml_parser::Parser;

/// Driver configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Print the AST tree after parsing.
    pub debug: bool,
}

/// Compile a source string. `file` labels the source in diagnostics.
///
/// Diagnostics from every stage are rendered to stderr in pipeline order;
/// no stage aborts the ones after it. Returns 0 when the program parsed and
/// analyzed without any Error-level diagnostic, 1 otherwise.
pub fn compile_source(source: &str, file: &str, config: &Config) -> i32 {
    let (tokens, lex_diagnostics) = Lexer::tokenize(source, file);

    let mut parser = Parser::new(tokens, source, file);
    let program = parser.parse_program();
    let parse_diagnostics = parser.into_diagnostics();

    let analysis = ml_sema::analyze(&program, source, file);

    if config.debug {
        print!("{}", TreePrinter::print(&program));
    }

    for diagnostic in lex_diagnostics
        .iter()
        .chain(&parse_diagnostics)
        .chain(&analysis.diagnostics)
    {
        diagnostic.eprint();
    }

    if has_errors(&lex_diagnostics) || has_errors(&parse_diagnostics) || !analysis.valid {
        1
    } else {
        0
    }
}

/// Read `path` and compile its contents.
pub fn compile_file(path: &str, config: &Config) -> i32 {
    match std::fs::read_to_string(path) {
        Ok(source) => compile_source(&source, path, config),
        Err(err) => {
            eprintln!("error: failed to read '{}': {}", path, err);
            1
        }
    }
}
