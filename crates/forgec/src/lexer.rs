//! Forge's lexer: identifiers, numeric literals with type suffixes,
//! punctuation/operators, line and block comments, and the keyword table.

use langtools::lexer::{self, LexerContext, LexerDriver};
use langtools::source::SourceRange;
use langtools::token::TokenKind;

use crate::token::{self, KEYWORDS};

pub struct ForgeLexer;

fn is_ident_start(cluster: &str) -> bool {
    cluster.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
}

fn is_ident_continue(cluster: &str) -> bool {
    cluster.chars().next().is_some_and(|c| c.is_alphanumeric() || c == '_')
}

fn is_digit(cluster: &str) -> bool {
    cluster.chars().next().is_some_and(|c| c.is_ascii_digit())
}

impl ForgeLexer {
    fn lex_identifier_or_keyword(&mut self, ctx: &mut LexerContext<'_>) {
        let start = ctx.current_location();
        let mut text = String::new();
        while let Some(cluster) = ctx.peek() {
            if is_ident_continue(cluster) {
                text.push_str(cluster);
                ctx.read();
            } else {
                break;
            }
        }
        let end = ctx.current_location();
        let range = SourceRange::new(start, end);
        let kind = KEYWORDS.get(text.as_str()).copied().unwrap_or(token::IDENTIFIER);
        ctx.emit(kind, range, text);
    }

    fn lex_number(&mut self, ctx: &mut LexerContext<'_>) {
        let start = ctx.current_location();
        let mut text = String::new();
        let mut is_float = false;

        while let Some(cluster) = ctx.peek() {
            if is_digit(cluster) {
                text.push_str(cluster);
                ctx.read();
            } else {
                break;
            }
        }

        if ctx.peek() == Some(".") && ctx.peek_at(1).is_some_and(|c| is_digit(c)) {
            is_float = true;
            text.push('.');
            ctx.read();
            while let Some(cluster) = ctx.peek() {
                if is_digit(cluster) {
                    text.push_str(cluster);
                    ctx.read();
                } else {
                    break;
                }
            }
        }

        let mut suffix = String::new();
        while let Some(cluster) = ctx.peek() {
            if is_ident_continue(cluster) {
                suffix.push_str(cluster);
                ctx.read();
            } else {
                break;
            }
        }
        text.push_str(&suffix);

        let end = ctx.current_location();
        let range = SourceRange::new(start, end);

        let valid_int_suffix = matches!(
            suffix.as_str(),
            "" | "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" | "isize" | "usize"
        );
        let valid_float_suffix = matches!(suffix.as_str(), "" | "f32" | "f64");

        if is_float && !valid_float_suffix {
            ctx.report(lexer::invalid_number_literal(range.clone(), &text));
        } else if !is_float && !valid_int_suffix {
            ctx.report(lexer::invalid_number_literal(range.clone(), &text));
        }

        let kind = if is_float { token::FLOAT_LITERAL } else { token::INTEGER_LITERAL };
        ctx.emit(kind, range, text);
    }

    fn lex_line_comment(&mut self, ctx: &mut LexerContext<'_>) {
        while let Some(cluster) = ctx.peek() {
            if cluster == "\n" {
                break;
            }
            ctx.read();
        }
    }

    fn lex_block_comment(&mut self, ctx: &mut LexerContext<'_>) {
        let start = ctx.current_location();
        ctx.read();
        ctx.read();
        loop {
            match ctx.peek() {
                Some("*") => {
                    ctx.read();
                    if ctx.peek() == Some("/") {
                        ctx.read();
                        return;
                    }
                }
                Some(_) => {
                    ctx.read();
                }
                None => {
                    let end = ctx.current_location();
                    ctx.report(lexer::unclosed_block_comment(SourceRange::new(start, end)));
                    return;
                }
            }
        }
    }

    fn lex_punctuation(&mut self, ctx: &mut LexerContext<'_>) {
        let start = ctx.current_location();
        let first = ctx.read().expect("lex_one only called with input remaining");

        macro_rules! two_char {
            ($second:literal, $kind:expr, $fallback:expr) => {{
                if ctx.peek() == Some($second) {
                    ctx.read();
                    $kind
                } else {
                    $fallback
                }
            }};
        }

        let kind: Option<TokenKind> = match first {
            "(" => Some(token::LPAREN),
            ")" => Some(token::RPAREN),
            "{" => Some(token::LBRACE),
            "}" => Some(token::RBRACE),
            "," => Some(token::COMMA),
            ":" => Some(token::COLON),
            ";" => Some(token::SEMICOLON),
            "." => Some(token::DOT),
            "+" => Some(two_char!("=", token::PLUS_EQ, token::PLUS)),
            "-" => Some(if ctx.peek() == Some(">") {
                ctx.read();
                token::ARROW
            } else {
                two_char!("=", token::MINUS_EQ, token::MINUS)
            }),
            "*" => Some(if ctx.peek() == Some("*") {
                ctx.read();
                token::STAR_STAR
            } else {
                two_char!("=", token::STAR_EQ, token::STAR)
            }),
            "/" => Some(two_char!("=", token::SLASH_EQ, token::SLASH)),
            "%" => Some(two_char!("=", token::PERCENT_EQ, token::PERCENT)),
            "^" => Some(two_char!("=", token::CARET_EQ, token::CARET)),
            "~" => Some(token::TILDE),
            "!" => Some(two_char!("=", token::BANG_EQ, token::BANG)),
            "=" => Some(if ctx.peek() == Some(">") {
                ctx.read();
                token::FAT_ARROW
            } else {
                two_char!("=", token::EQ_EQ, token::EQ)
            }),
            "&" => {
                if ctx.peek() == Some("&") {
                    ctx.read();
                    Some(token::AMP_AMP)
                } else {
                    Some(two_char!("=", token::AMP_EQ, token::AMP))
                }
            }
            "|" => {
                if ctx.peek() == Some("|") {
                    ctx.read();
                    Some(token::PIPE_PIPE)
                } else {
                    Some(two_char!("=", token::PIPE_EQ, token::PIPE))
                }
            }
            "<" => {
                if ctx.peek() == Some("<") {
                    ctx.read();
                    Some(two_char!("=", token::SHL_EQ, token::SHL))
                } else {
                    Some(two_char!("=", token::LE, token::LT))
                }
            }
            ">" => {
                if ctx.peek() == Some(">") {
                    ctx.read();
                    Some(two_char!("=", token::SHR_EQ, token::SHR))
                } else {
                    Some(two_char!("=", token::GE, token::GT))
                }
            }
            _ => None,
        };

        let end = ctx.current_location();
        let range = SourceRange::new(start, end);
        match kind {
            Some(kind) => ctx.emit(kind, range, first),
            None => ctx.report(lexer::unexpected_character(range, first)),
        }
    }
}

impl LexerDriver for ForgeLexer {
    fn lex_one(&mut self, ctx: &mut LexerContext<'_>) {
        match ctx.peek() {
            Some(cluster) if cluster.chars().all(char::is_whitespace) => {
                ctx.read();
            }
            Some("/") if ctx.peek_at(1) == Some("/") => self.lex_line_comment(ctx),
            Some("/") if ctx.peek_at(1) == Some("*") => self.lex_block_comment(ctx),
            Some(cluster) if is_ident_start(cluster) => self.lex_identifier_or_keyword(ctx),
            Some(cluster) if is_digit(cluster) => self.lex_number(ctx),
            Some(_) => self.lex_punctuation(ctx),
            None => unreachable!("lex_one is only called while input remains"),
        }
    }
}

pub fn lex(
    message_context: &mut langtools::diagnostics::MessageContext,
    source: std::sync::Arc<langtools::source::Source>,
) -> Vec<langtools::token::Token> {
    let mut driver = ForgeLexer;
    lexer::drive(&mut driver, message_context, source)
}
