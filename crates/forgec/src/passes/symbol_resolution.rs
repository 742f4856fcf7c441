//! Second semantic pass: resolves every `Symbol`/`Type::Symbol` reference to
//! the declaration node `symbol_declaration` placed in an enclosing scope.

use langtools::diagnostics::{Message, MessageContext, Severity};
use langtools::pass::{AncestorStack, Handler, HandlerOutput};
use langtools::tree::{NodeId, Tree};

use crate::ast::Payload;
use super::SemaCtx;

pub struct SymbolResolution;

/// Walks the scope chain from innermost to outermost looking for `name`,
/// same as `resolve_in_chain`, but additionally enforces declaration order
/// within ordered (non-`unordered`) scopes: a binding there is only visible
/// to a reference whose node comes after it. `Tree::insert` assigns ids in
/// strict insertion order for this recursive-descent parser, so comparing
/// `NodeId`s is the same as comparing source position.
///
/// A name found in an ordered scope but not yet visible stops the search
/// rather than falling through to an outer scope: the local declaration
/// still shadows the outer one, it's just used too early.
fn resolve_ordered(tree: &Tree<Payload>, ancestors: &[NodeId], node: NodeId, name: &str) -> Option<NodeId> {
    for &ancestor in ancestors.iter().rev() {
        let Some(scope) = tree.get(ancestor).payload.scope() else { continue };
        if let Some(target) = scope.get_local(name) {
            if scope.flags().unordered || target < node {
                return Some(target);
            }
            return None;
        }
    }
    None
}

impl Handler<Payload, SemaCtx> for SymbolResolution {
    fn on_enter(
        &mut self,
        tree: &mut Tree<Payload>,
        node: NodeId,
        ancestors: &AncestorStack,
        _ctx: &mut SemaCtx,
        messages: &mut MessageContext,
    ) -> HandlerOutput {
        let Some(name) = tree.get(node).payload.referenced_symbol_name().map(str::to_string) else {
            return HandlerOutput::cont();
        };
        if tree.get(node).payload.resolved_reference().is_some() {
            return HandlerOutput::cont();
        }

        let resolved = resolve_ordered(tree, ancestors.as_slice(), node, &name);

        match resolved {
            Some(target) => tree.get_mut(node).payload.set_resolved_reference(target),
            None => {
                let range = tree.get(node).range.clone();
                messages.emit(
                    Message::new(Severity::Error, range, format!("undeclared identifier '{name}'"))
                        .with_code("undeclared-symbol"),
                );
            }
        }

        HandlerOutput::cont()
    }
}
