//! Levelled diagnostics anchored to source spans.
//!
//! Every compilation stage accumulates diagnostics in its own list and keeps
//! going; nothing here aborts. A diagnostic owns a copy of the source text it
//! points into so rendering never needs the producing stage alive.

use std::io::Write;

use is_terminal::IsTerminal;
use serde::Serialize;

use crate::span::Span;
use crate::style::Style;

/// Severity of a diagnostic, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Level {
    Info,
    Warning,
    Error,
    Fatal,
}

impl Level {
    /// Display name used in rendered output.
    pub fn name(&self) -> &'static str {
        match self {
            Level::Info => "Info",
            Level::Warning => "Warning",
            Level::Error => "Error",
            Level::Fatal => "Fatal",
        }
    }

    fn paint(&self, s: &str) -> String {
        match self {
            Level::Info => Style::bold_blue(s),
            Level::Warning => Style::bold_yellow(s),
            Level::Error | Level::Fatal => Style::bold_red(s),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A levelled message anchored to a span, renderable with source context.
///
/// Immutable after construction. `code` 0 means "no code" and is omitted
/// from rendered output.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub help: String,
    pub span: Span,
    pub file: String,
    pub source: String,
    pub code: u32,
}

impl Diagnostic {
    pub fn new(
        level: Level,
        message: impl Into<String>,
        help: impl Into<String>,
        span: Span,
        file: impl Into<String>,
        source: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            help: help.into(),
            span,
            file: file.into(),
            source: source.into(),
            code,
        }
    }

    /// Render the diagnostic to a string.
    ///
    /// Pure; may be called repeatedly. The layout is:
    ///
    /// ```text
    /// Error[0203]: Type mismatch in variable initializer
    ///    --> main.ml:1:14
    ///     |
    ///   1 | let x: int = "hi";
    ///     |              ^^^^
    /// help: the initializer cannot widen to the declared type
    /// ```
    ///
    /// Carets cover the span's columns with a minimum of two. `colors`
    /// toggles ANSI styling; pass the result of a terminal check.
    pub fn render(&self, colors: bool) -> String {
        let line = self.span.start.line;
        let column = self.span.start.column;

        let head = if self.code == 0 {
            format!("{}", self.level)
        } else {
            format!("{}[{:04}]", self.level, self.code)
        };
        let head = if colors { self.level.paint(&head) } else { head };

        let arrow = if colors { Style::bold_blue("-->") } else { "-->".to_string() };
        let location = format!("   {} {}:{}:{}", arrow, self.file, line, column);

        let source_line = self.line_text(line);
        let width = line.to_string().len().max(3);
        let gutter = " ".repeat(width + 1);
        let pipe = if colors { Style::bold_blue("|") } else { "|".to_string() };
        let line_no = format!("{:>width$}", line, width = width);
        let line_no = if colors { Style::bold_blue(&line_no) } else { line_no };

        let pad = (column.saturating_sub(1) as usize).min(source_line.len());
        let count = if self.span.end.line == line {
            self.span.end.column.saturating_sub(column) as usize
        } else {
            source_line.len().saturating_sub(pad)
        };
        let carets = "^".repeat(count.max(2));
        let carets = if colors { self.level.paint(&carets) } else { carets };

        let help_label = if colors { Style::cyan("help") } else { "help".to_string() };

        format!(
            "{}: {}\n{}\n{}{}\n{} {} {}\n{}{} {}{}\n{}: {}",
            head,
            self.message,
            location,
            gutter,
            pipe,
            line_no,
            pipe,
            source_line,
            gutter,
            pipe,
            " ".repeat(pad),
            carets,
            help_label,
            self.help,
        )
    }

    /// Render and write to stderr, with color iff stderr is a terminal.
    pub fn eprint(&self) {
        let colors = std::io::stderr().is_terminal();
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{}", self.render(colors));
    }

    /// The text of a 1-based source line, without its terminator.
    fn line_text(&self, line: u32) -> &str {
        self.source
            .split('\n')
            .nth(line.saturating_sub(1) as usize)
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or("")
    }
}

/// Whether any diagnostic in `list` is Error level or above.
pub fn has_errors(list: &[Diagnostic]) -> bool {
    list.iter().any(|d| d.level >= Level::Error)
}
