//! Source context for diagnostics.
//!
//! [`Source`] is the per-call context the interpreter threads through its recursion:
//! it recovers the verbatim text a node covers. [`render`] turns an error into a
//! compiler-style snippet with the offending span underlined.

use std::fmt::Write;

use colored::Colorize;

use crate::error::TypeParseError;
use crate::span::Span;

#[derive(Debug, Clone, Copy)]
pub struct Source<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: usize, // 1-based
    pub col: usize,  // 1-based, in chars
}

impl<'a> Source<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Verbatim text covered by `span`, clamped to the input.
    pub fn slice(&self, span: Span) -> &'a str {
        let end = span.end.min(self.text.len());
        let start = span.start.min(end);
        self.text.get(start..end).unwrap_or(self.text)
    }

    pub fn line_col(&self, offset: usize) -> LineCol {
        let offset = offset.min(self.text.len());
        let before = self.text.get(..offset).unwrap_or(self.text);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let col = before[line_start..].chars().count() + 1;
        LineCol { line, col }
    }

    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        self.text.lines().nth(line.checked_sub(1)?)
    }
}

/// Render `err` against the text it was raised for.
///
/// ```text
/// error[InvalidParameterCount]: Invalid number of type parameters specified: ...
///  --> 1:1
///   |
/// 1 | Array[String,Integer]
///   | ^^^^^^^^^^^^^^^^^^^^^
/// ```
pub fn render(err: &TypeParseError, source: &Source<'_>, color: bool) -> String {
    let mut out = String::new();
    let header = format!("error[{}]", err.kind().as_str());
    let header = if color { header.red().bold().to_string() } else { header };
    let _ = writeln!(out, "{header}: {err}");

    let span = err.span();
    let lc = source.line_col(span.start);
    let _ = writeln!(out, " --> {}:{}", lc.line, lc.col);

    if let Some(line_text) = source.line_text(lc.line) {
        let gutter = lc.line.to_string().len();
        let line_chars = line_text.chars().count();
        let underline_start = lc.col - 1;
        // an empty span (end of input, blank input) still gets one caret
        let underline_len = if span.is_empty() {
            1
        } else {
            let span_chars = source.slice(span).chars().count();
            span_chars.min(line_chars.saturating_sub(underline_start)).max(1)
        };
        let carets = "^".repeat(underline_len);
        let carets = if color { carets.red().bold().to_string() } else { carets };

        let _ = writeln!(out, "{:gutter$} |", "");
        let _ = writeln!(out, "{} | {}", lc.line, line_text);
        let _ = writeln!(out, "{:gutter$} | {:underline_start$}{}", "", "", carets);
    }
    out
}
