//! The semantic pipeline: an ordered sequence of tree-walking passes shared
//! across one well-known context, wired up with `langtools::pass`.

mod cast_insertion;
mod control_flow;
mod symbol_declaration;
mod symbol_resolution;
mod type_resolution;

use langtools::diagnostics::MessageContext;
use langtools::pass::{Pass, PassManager};
use langtools::source::SourceRange;
use langtools::tree::{NodeId, Tree};

use crate::ast::types::{BasicTypeKind, Type};
use crate::ast::{kinds, Payload};

/// Shared state threaded through every pass: the well-known `bool`/`void`
/// type nodes, inserted once so later passes can point at them without
/// synthesizing a fresh node per use site.
pub struct SemaCtx {
    pub bool_type: NodeId,
    pub void_type: NodeId,
}

impl SemaCtx {
    pub fn new(tree: &mut Tree<Payload>) -> Self {
        let bool_type = tree.insert(kinds::TYPE_BASIC, SourceRange::empty(), Payload::Type(Type::Basic(BasicTypeKind::Bool)));
        let void_type = tree.insert(kinds::TYPE_BASIC, SourceRange::empty(), Payload::Type(Type::Basic(BasicTypeKind::Void)));
        Self { bool_type, void_type }
    }
}

/// Runs the full semantic pipeline over `root`, in spec order: declare
/// symbols, resolve references, resolve value types, insert implicit
/// casts, then validate control flow. Stops after the first pass that
/// leaves an error, mirroring `PassManager::run`.
pub fn run_pipeline(tree: &mut Tree<Payload>, root: NodeId, messages: &mut MessageContext) -> NodeId {
    let mut ctx = SemaCtx::new(tree);
    let mut manager = PassManager::new()
        .with_pass(Pass::new("symbol-declaration").with_handler(symbol_declaration::SymbolDeclaration))
        .with_pass(Pass::new("symbol-resolution").with_handler(symbol_resolution::SymbolResolution))
        .with_pass(Pass::new("type-resolution").with_handler(type_resolution::TypeResolution))
        .with_pass(Pass::new("cast-insertion").with_handler(cast_insertion::CastInsertion))
        .with_pass(Pass::new("control-flow-validation").with_handler(control_flow::ControlFlowValidation::new()));

    let (_, root) = manager.run(tree, root, &mut ctx, messages);
    root
}
