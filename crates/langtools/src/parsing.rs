//! Backtrackable token cursor and small parser-combinator helpers.
//!
//! Modeled on the teacher's `ParseState`: a `Vec<T>` plus an index, with
//! `save`/`restore` giving combinators cheap backtracking instead of
//! needing a full copy of the remaining input.

use crate::diagnostics::{Message, Severity};
use crate::source::SourceRange;

/// An opaque cursor position captured by [`ParsingContext::save`] and handed
/// back to [`ParsingContext::restore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Backtrackable cursor over a fixed token vector.
pub struct ParsingContext<T> {
    tokens: Vec<T>,
    index: usize,
    pub errors: Vec<Message>,
}

impl<T: Clone> ParsingContext<T> {
    pub fn new(tokens: Vec<T>) -> Self {
        Self {
            tokens,
            index: 0,
            errors: Vec::new(),
        }
    }

    pub fn peek(&self) -> Option<T> {
        self.tokens.get(self.index).cloned()
    }

    pub fn peek_at(&self, offset: usize) -> Option<T> {
        self.tokens.get(self.index + offset).cloned()
    }

    pub fn read(&mut self) -> Option<T> {
        let item = self.tokens.get(self.index).cloned();
        if item.is_some() {
            self.index += 1;
        }
        item
    }

    pub fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    pub fn save(&self) -> Checkpoint {
        Checkpoint(self.index)
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.index = checkpoint.0;
    }

    pub fn last(&self) -> Option<T> {
        self.tokens.last().cloned()
    }

    pub fn report_error(&mut self, message: Message) {
        self.errors.push(message);
    }
}

impl<T: Clone> From<Vec<T>> for ParsingContext<T> {
    fn from(tokens: Vec<T>) -> Self {
        Self::new(tokens)
    }
}

/// Builds an "expected one of {set}" diagnostic at `range`, for use once a
/// combinator has committed to a production and its continuation is
/// malformed.
pub fn expected(range: SourceRange, expected_set: &[&str], actual: impl std::fmt::Display) -> Message {
    let expected_text = expected_set.join(", ");
    Message {
        range,
        severity: Severity::Error,
        code: Some("unexpected-token"),
        text: format!("expected one of [{expected_text}], found {actual}"),
        children: Vec::new(),
    }
}

pub fn unrecoverable_parse_failure(range: SourceRange, text: impl Into<String>) -> Message {
    Message {
        range,
        severity: Severity::FatalError,
        code: Some("unrecoverable-parse-failure"),
        text: text.into(),
        children: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_restore_roundtrips() {
        let mut ctx: ParsingContext<i32> = ParsingContext::new(vec![1, 2, 3]);
        assert_eq!(ctx.read(), Some(1));
        let checkpoint = ctx.save();
        assert_eq!(ctx.read(), Some(2));
        ctx.restore(checkpoint);
        assert_eq!(ctx.read(), Some(2));
        assert_eq!(ctx.read(), Some(3));
        assert!(ctx.at_end());
    }
}
