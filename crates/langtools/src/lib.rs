//! Reusable toolkit for building ahead-of-time compilers: source handling,
//! a grapheme-cluster lexer framework, a backtrackable parser cursor, an
//! arena-based syntax tree, lexical scopes, a tree-walking pass manager,
//! diagnostics, and LLVM codegen helpers.
//!
//! None of this is specific to any one language; `forgec` is the first
//! consumer.

pub mod codegen;
pub mod diagnostics;
pub mod init;
pub mod lexer;
pub mod parsing;
pub mod pass;
pub mod scope;
pub mod source;
pub mod token;
pub mod tree;
