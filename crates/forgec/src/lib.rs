//! Forge language front-end: lexer, parser, semantic passes, and LLVM
//! codegen, built on the `langtools` toolkit.

pub mod ast;
pub mod codegen;
pub mod lexer;
pub mod parser;
pub mod passes;
pub mod token;
pub mod types;

use std::sync::Arc;

use langtools::diagnostics::MessageContext;
use langtools::source::Source;
use langtools::tree::{NodeId, Tree};

use ast::Payload;

/// Lexes and parses `source` into a tree, returning the translation-unit
/// root. Parse errors land in `messages`; the tree is still usable (partial)
/// for further diagnostics.
pub fn parse_source(source: Arc<Source>, tree: &mut Tree<Payload>, messages: &mut MessageContext) -> NodeId {
    let tokens = lexer::lex(messages, source.clone());
    parser::parse(tokens, source, tree, messages)
}

/// Runs the full semantic pipeline over an already-parsed tree.
pub fn analyze(tree: &mut Tree<Payload>, root: NodeId, messages: &mut MessageContext) -> NodeId {
    passes::run_pipeline(tree, root, messages)
}
