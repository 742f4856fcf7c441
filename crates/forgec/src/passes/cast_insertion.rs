//! Fourth semantic pass: inserts implicit casts around operands whose type
//! doesn't already match what they're being used as (a narrower operand in
//! an arithmetic expression, an initializer against a declared type, a
//! `return` value against its function's return type), and rejects the
//! cases where no implicit cast exists. This pass does double duty as type
//! validation — both operations share the same `get_casting_mode` lookup,
//! so splitting them into two separate tree walks would just repeat it.

use langtools::diagnostics::{Message, MessageContext, Severity};
use langtools::pass::{AncestorStack, Handler, HandlerOutput};
use langtools::source::SourceRange;
use langtools::tree::{NodeId, Tree};

use super::SemaCtx;
use crate::ast::declarations::Declaration;
use crate::ast::operators::BinaryOperator;
use crate::ast::statements::{BasicKind, Return, Statement};
use crate::ast::values::{BinaryValue, CastValue, Value, ValueKind};
use crate::ast::{kinds, Payload};
use crate::types::{self as semtypes, CastingMode};

pub struct CastInsertion;

fn value_type(tree: &Tree<Payload>, node: NodeId) -> Option<NodeId> {
    match &tree.get(node).payload {
        Payload::Value(v) => v.resolved_type,
        _ => None,
    }
}

/// Wraps `value` in an implicit `Cast` node targeting `target_type`,
/// returning the new node's id. The cast's own `resolved_type` is already
/// known, so later passes don't need to revisit it.
fn wrap_in_cast(tree: &mut Tree<Payload>, value: NodeId, target_type: NodeId, range: SourceRange) -> NodeId {
    let mut cast_value = Value::new(ValueKind::Cast(CastValue {
        value,
        target_type,
        implicit: true,
    }));
    cast_value.resolved_type = Some(target_type);
    tree.insert(kinds::VALUE_CAST, range, Payload::Value(cast_value))
}

/// Ensures `value`'s type matches `target`, inserting an implicit cast if
/// one is legal and needed, or reporting a type-mismatch error otherwise.
/// Returns the (possibly replaced) node id for `value`.
fn coerce(
    tree: &mut Tree<Payload>,
    value: NodeId,
    target: NodeId,
    messages: &mut MessageContext,
    context: &str,
) -> NodeId {
    let Some(value_ty) = value_type(tree, value) else {
        return value;
    };
    if value_ty == target {
        return value;
    }
    match semtypes::get_casting_mode(tree, value_ty, target) {
        CastingMode::Implicit => {
            let range = tree.get(value).range.clone();
            wrap_in_cast(tree, value, target, range)
        }
        CastingMode::Explicit | CastingMode::Illegal => {
            let range = tree.get(value).range.clone();
            messages.emit(
                Message::new(Severity::Error, range, format!("type mismatch {context}"))
                    .with_code("type-mismatch"),
            );
            value
        }
    }
}

fn nearest_function_return_type(tree: &Tree<Payload>, ancestors: &[NodeId]) -> Option<NodeId> {
    ancestors.iter().rev().find_map(|id| match &tree.get(*id).payload {
        Payload::Declaration(Declaration::Function(f)) => Some(f.return_type),
        _ => None,
    })
}

impl Handler<Payload, SemaCtx> for CastInsertion {
    fn on_leave(
        &mut self,
        tree: &mut Tree<Payload>,
        node: NodeId,
        ancestors: &AncestorStack,
        ctx: &mut SemaCtx,
        messages: &mut MessageContext,
    ) -> HandlerOutput {
        match &tree.get(node).payload {
            Payload::Value(v) => {
                if let ValueKind::Binary(BinaryValue { op, lhs, rhs }) = v.kind.clone() {
                    self.fixup_binary(tree, node, op, lhs, rhs, ctx, messages);
                }
            }
            Payload::Declaration(Declaration::Variable(var)) => {
                if let (Some(declared), Some(initial)) = (var.declared_type, var.initial) {
                    let new_initial = coerce(tree, initial, declared, messages, "in this initializer");
                    if new_initial != initial {
                        if let Payload::Declaration(Declaration::Variable(v)) = &mut tree.get_mut(node).payload {
                            v.initial = Some(new_initial);
                        }
                    }
                }
            }
            Payload::Statement(Statement::Return(Return { value })) => {
                let value = *value;
                if let Some(return_type) = nearest_function_return_type(tree, ancestors.as_slice()) {
                    let new_value = coerce(tree, value, return_type, messages, "in this return statement");
                    if new_value != value {
                        if let Payload::Statement(Statement::Return(r)) = &mut tree.get_mut(node).payload {
                            r.value = new_value;
                        }
                    }
                }
            }
            Payload::Statement(Statement::Basic(BasicKind::ReturnVoid)) => {
                if let Some(return_type) = nearest_function_return_type(tree, ancestors.as_slice()) {
                    if !semtypes::is_void(tree, return_type) {
                        let range = tree.get(node).range.clone();
                        messages.emit(
                            Message::new(Severity::Error, range, "'return;' in a function with a non-void return type")
                                .with_code("type-mismatch"),
                        );
                    }
                }
            }
            _ => {}
        }
        HandlerOutput::cont()
    }
}

impl CastInsertion {
    fn fixup_binary(
        &self,
        tree: &mut Tree<Payload>,
        node: NodeId,
        op: BinaryOperator,
        lhs: NodeId,
        rhs: NodeId,
        ctx: &mut SemaCtx,
        messages: &mut MessageContext,
    ) {
        let _ = ctx;
        if matches!(op, BinaryOperator::Assign) {
            let Some(lhs_ty) = value_type(tree, lhs) else { return };
            let new_rhs = coerce(tree, rhs, lhs_ty, messages, "in this assignment");
            if new_rhs != rhs {
                set_binary_operands(tree, node, lhs, new_rhs);
            }
            return;
        }
        if op.is_compound_assignment()
            || op.is_comparison()
            || matches!(op, BinaryOperator::BoolAnd | BinaryOperator::BoolOr | BinaryOperator::MemberAccess)
        {
            return;
        }

        let (Some(lhs_ty), Some(rhs_ty)) = (value_type(tree, lhs), value_type(tree, rhs)) else { return };
        let Some(containing) = semtypes::get_arithmetic_containing_type(tree, lhs_ty, rhs_ty) else {
            let range = tree.get(node).range.clone();
            messages.emit(
                Message::new(Severity::Error, range, "operands have incompatible types").with_code("type-mismatch"),
            );
            return;
        };

        let new_lhs = coerce(tree, lhs, containing, messages, "in this expression");
        let new_rhs = coerce(tree, rhs, containing, messages, "in this expression");
        if new_lhs != lhs || new_rhs != rhs {
            set_binary_operands(tree, node, new_lhs, new_rhs);
        }
    }
}

fn set_binary_operands(tree: &mut Tree<Payload>, node: NodeId, lhs: NodeId, rhs: NodeId) {
    if let Payload::Value(v) = &mut tree.get_mut(node).payload {
        if let ValueKind::Binary(b) = &mut v.kind {
            b.lhs = lhs;
            b.rhs = rhs;
        }
    }
}
