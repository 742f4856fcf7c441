//! First semantic pass: populates every scope-owning node's table with the
//! declarations made directly inside it. Runs before resolution so
//! module-level forward references (mutually recursive functions, a type
//! alias used before its own declaration) see every sibling regardless of
//! source order.

use langtools::diagnostics::{Message, MessageContext, Severity};
use langtools::pass::{AncestorStack, Handler, HandlerOutput};
use langtools::scope::ScopeInsertError;
use langtools::tree::{NodeId, Tree};

use crate::ast::Payload;
use super::SemaCtx;

pub struct SymbolDeclaration;

fn nearest_scope_owner(tree: &Tree<Payload>, ancestors: &[NodeId]) -> Option<NodeId> {
    ancestors
        .iter()
        .rev()
        .find(|id| tree.get(**id).payload.scope().is_some())
        .copied()
}

impl Handler<Payload, SemaCtx> for SymbolDeclaration {
    fn on_enter(
        &mut self,
        tree: &mut Tree<Payload>,
        node: NodeId,
        ancestors: &AncestorStack,
        _ctx: &mut SemaCtx,
        messages: &mut MessageContext,
    ) -> HandlerOutput {
        let Some(name) = tree.get(node).payload.declared_symbol_name().map(str::to_string) else {
            return HandlerOutput::cont();
        };
        let Some(owner) = nearest_scope_owner(tree, ancestors.as_slice()) else {
            return HandlerOutput::cont();
        };

        let range = tree.get(node).range.clone();
        let result = tree
            .get_mut(owner)
            .payload
            .scope_mut()
            .expect("nearest_scope_owner only returns nodes with a scope")
            .declare(&name, node);

        if let Err(ScopeInsertError::AlreadyDeclaredInScope(previous)) = result {
            let previous_range = tree.get(previous).range.clone();
            messages.emit(
                Message::new(Severity::Error, range, format!("'{name}' is already declared in this scope"))
                    .with_code("duplicate-declaration")
                    .with_child(Message::new(Severity::Note, previous_range, "previously declared here")),
            );
        }

        HandlerOutput::cont()
    }
}
