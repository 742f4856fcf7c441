//! Forge's token kind table and the keyword lookup it's built from.

use langtools::token_kind;
use once_cell::sync::Lazy;
use std::collections::HashMap;

token_kind!(IDENTIFIER, "identifier");
token_kind!(INTEGER_LITERAL, "integer-literal");
token_kind!(FLOAT_LITERAL, "float-literal");

token_kind!(KW_FUNC, "func");
token_kind!(KW_LET, "let");
token_kind!(KW_CONST, "const");
token_kind!(KW_IF, "if");
token_kind!(KW_ELSE, "else");
token_kind!(KW_WHILE, "while");
token_kind!(KW_RETURN, "return");
token_kind!(KW_CONTINUE, "continue");
token_kind!(KW_BREAK, "break");
token_kind!(KW_TYPE, "type");
token_kind!(KW_STRUCT, "struct");
token_kind!(KW_NAMESPACE, "namespace");
token_kind!(KW_TRUE, "true");
token_kind!(KW_FALSE, "false");
token_kind!(KW_EXPLICIT, "explicit");
token_kind!(KW_AS, "as");

token_kind!(ARROW, "->");
token_kind!(FAT_ARROW, "=>");
token_kind!(LPAREN, "(");
token_kind!(RPAREN, ")");
token_kind!(LBRACE, "{");
token_kind!(RBRACE, "}");
token_kind!(COMMA, ",");
token_kind!(COLON, ":");
token_kind!(SEMICOLON, ";");

token_kind!(PLUS, "+");
token_kind!(MINUS, "-");
token_kind!(STAR, "*");
token_kind!(STAR_STAR, "**");
token_kind!(SLASH, "/");
token_kind!(PERCENT, "%");
token_kind!(CARET, "^");
token_kind!(AMP, "&");
token_kind!(PIPE, "|");
token_kind!(TILDE, "~");
token_kind!(BANG, "!");
token_kind!(SHL, "<<");
token_kind!(SHR, ">>");

token_kind!(PLUS_EQ, "+=");
token_kind!(MINUS_EQ, "-=");
token_kind!(STAR_EQ, "*=");
token_kind!(SLASH_EQ, "/=");
token_kind!(PERCENT_EQ, "%=");
token_kind!(CARET_EQ, "^=");
token_kind!(AMP_EQ, "&=");
token_kind!(PIPE_EQ, "|=");
token_kind!(SHL_EQ, "<<=");
token_kind!(SHR_EQ, ">>=");

token_kind!(EQ, "=");
token_kind!(EQ_EQ, "==");
token_kind!(BANG_EQ, "!=");
token_kind!(LT, "<");
token_kind!(LE, "<=");
token_kind!(GT, ">");
token_kind!(GE, ">=");
token_kind!(AMP_AMP, "&&");
token_kind!(PIPE_PIPE, "||");
token_kind!(DOT, ".");

/// Keyword spellings, built once. Identifiers not found here lex as
/// `IDENTIFIER`.
pub static KEYWORDS: Lazy<HashMap<&'static str, langtools::token::TokenKind>> = Lazy::new(|| {
    HashMap::from([
        ("func", KW_FUNC),
        ("let", KW_LET),
        ("const", KW_CONST),
        ("if", KW_IF),
        ("else", KW_ELSE),
        ("while", KW_WHILE),
        ("return", KW_RETURN),
        ("continue", KW_CONTINUE),
        ("break", KW_BREAK),
        ("type", KW_TYPE),
        ("struct", KW_STRUCT),
        ("namespace", KW_NAMESPACE),
        ("true", KW_TRUE),
        ("false", KW_FALSE),
        ("explicit", KW_EXPLICIT),
        ("as", KW_AS),
    ])
});
