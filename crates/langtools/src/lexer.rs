//! Grapheme-cluster based lexer framework.
//!
//! Mirrors the teacher's `Lexer`/`LexerContext` split: a generic driver loop
//! owns position tracking over a source's grapheme-cluster stream, and a
//! language-specific [`LexerDriver`] implementation decides what to do with
//! each cluster.

use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

use crate::diagnostics::{Message, MessageContext, Severity};
use crate::source::{Source, SourceLocation, SourceRange};
use crate::token::{Token, TokenKind};

/// Iterates a source's content one extended grapheme cluster at a time.
///
/// This is the Rust-ecosystem analogue of the original's ICU
/// `BreakIterator`-backed reader: `unicode-segmentation` implements the same
/// UAX #29 extended grapheme cluster algorithm without a native ICU
/// dependency.
pub struct GraphemeClusterReader<'a> {
    clusters: Vec<&'a str>,
    index: usize,
}

impl<'a> GraphemeClusterReader<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            clusters: content.graphemes(true).collect(),
            index: 0,
        }
    }

    pub fn are_more(&self) -> bool {
        self.index < self.clusters.len()
    }

    pub fn peek_next(&self) -> Option<&'a str> {
        self.clusters.get(self.index).copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<&'a str> {
        self.clusters.get(self.index + offset).copied()
    }

    pub fn read_next(&mut self) -> Option<&'a str> {
        let next = self.clusters.get(self.index).copied();
        if next.is_some() {
            self.index += 1;
        }
        next
    }

    pub fn current_cluster_offset(&self) -> usize {
        self.index
    }
}

/// Lexer-facing cursor over a source's grapheme clusters with line/column
/// tracking and a token-emission sink.
pub struct LexerContext<'a> {
    source: Arc<Source>,
    reader: GraphemeClusterReader<'a>,
    line: usize,
    column: usize,
    offset: usize,
    tokens: Vec<Token>,
    message_context: &'a mut MessageContext,
}

impl<'a> LexerContext<'a> {
    pub fn new(message_context: &'a mut MessageContext, source: Arc<Source>, content: &'a str) -> Self {
        Self {
            source,
            reader: GraphemeClusterReader::new(content),
            line: 1,
            column: 1,
            offset: 0,
            tokens: Vec::new(),
            message_context,
        }
    }

    pub fn are_more_grapheme_clusters(&self) -> bool {
        self.reader.are_more()
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.reader.peek_next()
    }

    pub fn peek_at(&self, offset: usize) -> Option<&'a str> {
        self.reader.peek_at(offset)
    }

    pub fn read(&mut self) -> Option<&'a str> {
        let cluster = self.reader.read_next()?;
        self.offset += cluster.len();
        if cluster == "\n" {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(cluster)
    }

    pub fn current_location(&self) -> SourceLocation {
        SourceLocation {
            source: self.source.clone(),
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    pub fn emit(&mut self, kind: TokenKind, range: SourceRange, value: impl Into<String>) {
        self.tokens.push(Token {
            kind,
            range,
            value: value.into(),
        });
    }

    pub fn report(&mut self, message: Message) {
        self.message_context.emit(message);
    }

    pub fn message_context(&mut self) -> &mut MessageContext {
        self.message_context
    }

    fn take_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

/// Implemented by language-specific lexers. `lex_one` must consume at least
/// one grapheme cluster per call; the driver asserts this, since failing to
/// make progress is a programming error in the lexer, not a recoverable
/// input condition.
pub trait LexerDriver {
    fn lex_one(&mut self, ctx: &mut LexerContext<'_>);
}

/// Drives `driver` over `source`'s content until EOF, returning the emitted
/// token stream in source order.
pub fn drive<D: LexerDriver>(
    driver: &mut D,
    message_context: &mut MessageContext,
    source: Arc<Source>,
) -> Vec<Token> {
    let content = source.content.as_str().to_owned();
    let mut ctx = LexerContext::new(message_context, source, &content);

    while ctx.are_more_grapheme_clusters() {
        let before = ctx.offset;
        driver.lex_one(&mut ctx);
        let after = ctx.offset;
        assert!(
            after != before,
            "lex_one must consume at least one grapheme cluster"
        );
    }

    assert!(
        !ctx.are_more_grapheme_clusters(),
        "lexer did not consume all grapheme clusters"
    );

    ctx.take_tokens()
}

pub fn unexpected_character(range: SourceRange, cluster: &str) -> Message {
    Message {
        range,
        severity: Severity::Error,
        code: Some("unexpected-character"),
        text: format!("unexpected character '{cluster}'"),
        children: Vec::new(),
    }
}

pub fn unclosed_block_comment(range: SourceRange) -> Message {
    Message {
        range,
        severity: Severity::Error,
        code: Some("unclosed-block-comment"),
        text: "unclosed block comment".to_string(),
        children: Vec::new(),
    }
}

pub fn invalid_number_literal(range: SourceRange, text: &str) -> Message {
    Message {
        range,
        severity: Severity::Error,
        code: Some("invalid-number-literal"),
        text: format!("invalid number literal '{text}'"),
        children: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grapheme_reader_iterates_clusters() {
        let mut reader = GraphemeClusterReader::new("ab");
        assert_eq!(reader.peek_next(), Some("a"));
        assert_eq!(reader.read_next(), Some("a"));
        assert_eq!(reader.read_next(), Some("b"));
        assert_eq!(reader.read_next(), None);
        assert!(!reader.are_more());
    }
}
