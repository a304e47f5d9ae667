// ML parser -- recursive-descent front half of the ML compiler.

pub mod ast;
mod parser;

pub use parser::Parser;

use ml_common::diagnostic::Diagnostic;
use ml_lexer::Lexer;

use ast::Program;

/// The result of parsing a source string: the program plus every diagnostic
/// the lexer and parser produced, in discovery order.
pub struct Parse {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

/// Convenience entry point: tokenize and parse `source` in one call.
///
/// Lexer diagnostics come first in the returned list, then the parser's,
/// which matches the order the problems appear in the pipeline.
pub fn parse(source: &str, file: &str) -> Parse {
    let (tokens, mut diagnostics) = Lexer::tokenize(source, file);
    let mut parser = Parser::new(tokens, source, file);
    let program = parser.parse_program();
    diagnostics.extend(parser.into_diagnostics());
    Parse { program, diagnostics }
}
