//! Diagnostic messages, the append-only `MessageContext` sink, and a
//! terminal reporter that renders messages with source samples.

use colored::{Color, Colorize};
use std::cmp::Ordering;

use crate::source::SourceRange;

/// Severity ordered `Suggestion < Note < Warning < Error < FatalError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Suggestion,
    Note,
    Warning,
    Error,
    FatalError,
}

impl Severity {
    pub fn name(self) -> &'static str {
        match self {
            Severity::Suggestion => "suggestion",
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::FatalError => "fatal error",
        }
    }

    fn color(self) -> Color {
        match self {
            Severity::Suggestion => Color::Green,
            Severity::Note => Color::BrightBlue,
            Severity::Warning => Color::Yellow,
            Severity::Error => Color::Red,
            Severity::FatalError => Color::BrightRed,
        }
    }

    pub fn is_at_least_error(self) -> bool {
        self >= Severity::Error
    }
}

/// One diagnostic: a severity, optional machine-readable code, human text,
/// the range it applies to (empty if unbound to source), and nested
/// sub-messages (e.g. "note: previously declared here").
#[derive(Debug, Clone)]
pub struct Message {
    pub range: SourceRange,
    pub severity: Severity,
    pub code: Option<&'static str>,
    pub text: String,
    pub children: Vec<Message>,
}

impl Message {
    pub fn new(severity: Severity, range: SourceRange, text: impl Into<String>) -> Self {
        Self {
            range,
            severity,
            code: None,
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_child(mut self, child: Message) -> Self {
        self.children.push(child);
        self
    }
}

/// Append-only diagnostic sink shared by every pipeline stage.
#[derive(Debug, Default)]
pub struct MessageContext {
    messages: Vec<Message>,
    max_line_seen: usize,
}

impl MessageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, message: Message) {
        if let Some(start) = &message.range.start {
            self.max_line_seen = self.max_line_seen.max(start.line);
        }
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity >= severity)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.count_at_least(Severity::Error) > 0
    }

    /// Messages sorted by severity descending, then by source offset
    /// ascending. Messages with no range sort after all that have one.
    pub fn sorted_messages(&self) -> Vec<&Message> {
        let mut sorted: Vec<&Message> = self.messages.iter().collect();
        sorted.sort_by(|a, b| {
            match b.severity.cmp(&a.severity) {
                Ordering::Equal => {
                    let a_offset = a.range.start.as_ref().map(|s| s.offset);
                    let b_offset = b.range.start.as_ref().map(|s| s.offset);
                    match (a_offset, b_offset) {
                        (Some(x), Some(y)) => x.cmp(&y),
                        (Some(_), None) => Ordering::Less,
                        (None, Some(_)) => Ordering::Greater,
                        (None, None) => Ordering::Equal,
                    }
                }
                other => other,
            }
        });
        sorted
    }

    fn gutter_width(&self) -> usize {
        self.max_line_seen.to_string().len().max(1)
    }
}

/// Renders a [`MessageContext`]'s messages to `out`, severity-descending
/// then offset-ascending, with a colored severity tag, the bracketed code if
/// present, the text, and a line sample with the range underlined when the
/// message carries a source location. Children are rendered directly after
/// their parent, in original insertion order.
pub fn report(context: &MessageContext, out: &mut dyn std::io::Write) -> std::io::Result<()> {
    let gutter = context.gutter_width();
    for message in context.sorted_messages() {
        render_message(message, gutter, 0, out)?;
    }
    Ok(())
}

fn render_message(
    message: &Message,
    gutter: usize,
    indent: usize,
    out: &mut dyn std::io::Write,
) -> std::io::Result<()> {
    let pad = " ".repeat(indent);
    let tag = message.severity.name().color(message.severity.color()).bold();
    let code = message
        .code
        .map(|c| format!(" [{c}]"))
        .unwrap_or_default();
    writeln!(out, "{pad}{tag}{code}: {}", message.text)?;

    if let Some(start) = &message.range.start {
        let line_text = start.source.try_get_line(start.line);
        let end_column = message
            .range
            .end
            .as_ref()
            .map(|e| e.column)
            .unwrap_or(start.column + 1);
        let number = format!("{:>width$}", start.line, width = gutter);
        writeln!(out, "{pad}{number} | {line_text}")?;
        let underline_start = start.column.saturating_sub(1);
        let underline_len = end_column.saturating_sub(start.column).max(1);
        let spaces = " ".repeat(gutter + 3 + underline_start);
        let carets = "^".repeat(underline_len).color(message.severity.color());
        writeln!(out, "{pad}{spaces}{carets}")?;
    }

    for child in &message.children {
        render_message(child, gutter, indent + 2, out)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::FatalError > Severity::Error);
        assert!(Severity::Suggestion < Severity::Note);
    }

    #[test]
    fn sorts_by_severity_then_offset() {
        let source = Source::from_literal("a\nb\nc");
        let mut ctx = MessageContext::new();
        let loc_late = crate::source::SourceLocation {
            source: source.clone(),
            line: 3,
            column: 1,
            offset: 4,
        };
        let loc_early = crate::source::SourceLocation {
            source: source.clone(),
            line: 1,
            column: 1,
            offset: 0,
        };
        ctx.emit(Message::new(
            Severity::Warning,
            SourceRange::new(loc_late.clone(), loc_late),
            "late warning",
        ));
        ctx.emit(Message::new(
            Severity::Error,
            SourceRange::new(loc_early.clone(), loc_early),
            "early error",
        ));
        let sorted = ctx.sorted_messages();
        assert_eq!(sorted[0].text, "early error");
        assert_eq!(sorted[1].text, "late warning");
    }

    #[test]
    fn has_errors_reflects_severity_floor() {
        let mut ctx = MessageContext::new();
        ctx.emit(Message::new(Severity::Warning, SourceRange::empty(), "w"));
        assert!(!ctx.has_errors());
        ctx.emit(Message::new(Severity::Error, SourceRange::empty(), "e"));
        assert!(ctx.has_errors());
    }
}
