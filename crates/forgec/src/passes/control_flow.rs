//! Fifth semantic pass: `break`/`continue` only inside a loop, and every
//! path through a non-`void` function ends in a `return`.

use langtools::diagnostics::{Message, MessageContext, Severity};
use langtools::pass::{AncestorStack, Handler, HandlerOutput, HandlerStatus};
use langtools::tree::{NodeId, Tree};

use super::SemaCtx;
use crate::ast::declarations::Declaration;
use crate::ast::statements::{BasicKind, Statement};
use crate::ast::Payload;
use crate::types as semtypes;

pub struct ControlFlowValidation {
    loop_depth: u32,
}

impl ControlFlowValidation {
    pub fn new() -> Self {
        Self { loop_depth: 0 }
    }
}

fn always_returns(tree: &Tree<Payload>, node: NodeId) -> bool {
    match &tree.get(node).payload {
        Payload::Statement(Statement::Basic(BasicKind::ReturnVoid)) => true,
        Payload::Statement(Statement::Return(_)) => true,
        Payload::Statement(Statement::Block(b)) => b.statements.last().is_some_and(|s| always_returns(tree, *s)),
        Payload::Statement(Statement::If(i)) => match i.else_branch {
            Some(else_branch) => always_returns(tree, i.then_block) && always_returns(tree, else_branch),
            None => false,
        },
        _ => false,
    }
}

/// Like `always_returns`, but also counts `break`/`continue` as ending the
/// current block, since they too make every statement after them in the
/// same block unreachable.
fn is_terminating_statement(tree: &Tree<Payload>, node: NodeId) -> bool {
    match &tree.get(node).payload {
        Payload::Statement(Statement::Basic(BasicKind::ReturnVoid | BasicKind::Break | BasicKind::Continue)) => true,
        Payload::Statement(Statement::Return(_)) => true,
        Payload::Statement(Statement::Block(b)) => b.statements.last().is_some_and(|s| is_terminating_statement(tree, *s)),
        Payload::Statement(Statement::If(i)) => match i.else_branch {
            Some(else_branch) => is_terminating_statement(tree, i.then_block) && is_terminating_statement(tree, else_branch),
            None => false,
        },
        _ => false,
    }
}

impl Handler<Payload, SemaCtx> for ControlFlowValidation {
    fn on_enter(
        &mut self,
        tree: &mut Tree<Payload>,
        node: NodeId,
        _ancestors: &AncestorStack,
        _ctx: &mut SemaCtx,
        messages: &mut MessageContext,
    ) -> HandlerOutput {
        match &tree.get(node).payload {
            Payload::Statement(Statement::While(_)) => {
                self.loop_depth += 1;
            }
            Payload::Statement(Statement::Basic(BasicKind::Continue)) if self.loop_depth == 0 => {
                let range = tree.get(node).range.clone();
                messages.emit(
                    Message::new(Severity::Error, range, "'continue' outside of a loop").with_code("invalid-continue"),
                );
            }
            Payload::Statement(Statement::Basic(BasicKind::Break)) if self.loop_depth == 0 => {
                let range = tree.get(node).range.clone();
                messages.emit(Message::new(Severity::Error, range, "'break' outside of a loop").with_code("break-outside-loop"));
            }
            Payload::Statement(Statement::Block(b)) => {
                let statements = b.statements.clone();
                if let Some(terminator) = statements.iter().position(|s| is_terminating_statement(tree, *s)) {
                    if let Some(first_dead) = statements.get(terminator + 1) {
                        let range = tree.get(*first_dead).range.clone();
                        messages.emit(
                            Message::new(Severity::Warning, range, "unreachable code after this point")
                                .with_code("dead-code-after-terminator"),
                        );
                    }
                }
            }
            _ => {}
        }
        HandlerOutput::cont()
    }

    fn on_leave(
        &mut self,
        tree: &mut Tree<Payload>,
        node: NodeId,
        _ancestors: &AncestorStack,
        _ctx: &mut SemaCtx,
        messages: &mut MessageContext,
    ) -> HandlerOutput {
        if matches!(&tree.get(node).payload, Payload::Statement(Statement::While(_))) {
            self.loop_depth -= 1;
        }

        if let Payload::Declaration(Declaration::Function(f)) = &tree.get(node).payload {
            if let Some(body) = f.body {
                if !semtypes::is_void(tree, f.return_type) && !always_returns(tree, body) {
                    let range = tree.get(node).range.clone();
                    messages.emit(
                        Message::new(Severity::Error, range, "function does not return a value on all paths")
                            .with_code("missing-return"),
                    );
                }
            }
        }

        HandlerOutput::status(HandlerStatus::Continue)
    }
}
