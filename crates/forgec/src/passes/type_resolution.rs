//! Third semantic pass: fills in every value's `resolved_type`/
//! `is_assignable` and every variable declaration's `resolved_type`, bottom
//! up so a node's children are always already resolved by the time its own
//! `on_leave` runs.

use langtools::diagnostics::{Message, MessageContext, Severity};
use langtools::pass::{AncestorStack, Handler, HandlerOutput};
use langtools::tree::{NodeId, Tree};

use super::SemaCtx;
use crate::ast::declarations::Declaration;
use crate::ast::operators::{BinaryOperator, UnaryOperator};
use crate::ast::types::Type;
use crate::ast::values::{BinaryValue, UnaryValue, ValueKind};
use crate::ast::Payload;
use crate::types as semtypes;

pub struct TypeResolution;

fn value_resolved_type(tree: &Tree<Payload>, node: NodeId) -> Option<NodeId> {
    match &tree.get(node).payload {
        Payload::Value(v) => v.resolved_type,
        _ => None,
    }
}

fn value_is_assignable(tree: &Tree<Payload>, node: NodeId) -> bool {
    match &tree.get(node).payload {
        Payload::Value(v) => v.is_assignable,
        _ => false,
    }
}

fn variable_is_const(tree: &Tree<Payload>, node: NodeId) -> bool {
    match &tree.get(node).payload {
        Payload::Declaration(Declaration::Variable(v)) => v.is_const,
        _ => false,
    }
}

fn variable_resolved_type(tree: &Tree<Payload>, node: NodeId) -> Option<NodeId> {
    match &tree.get(node).payload {
        Payload::Declaration(Declaration::Variable(v)) => v.resolved_type,
        _ => None,
    }
}

fn function_return_type(tree: &Tree<Payload>, node: NodeId) -> Option<NodeId> {
    match &tree.get(node).payload {
        Payload::Declaration(Declaration::Function(f)) => Some(f.return_type),
        _ => None,
    }
}

/// The `Declaration::StructuredType` a type node names, following through a
/// `Type::Symbol` to its resolved declaration (set by symbol resolution).
fn struct_decl_for_type(tree: &Tree<Payload>, type_node: NodeId) -> Option<NodeId> {
    match &tree.get(type_node).payload {
        Payload::Type(Type::Symbol(s)) => s.resolved,
        _ => None,
    }
    .filter(|&decl| matches!(&tree.get(decl).payload, Payload::Declaration(Declaration::StructuredType(_))))
}

fn member_name_of(tree: &Tree<Payload>, node: NodeId) -> Option<String> {
    match &tree.get(node).payload {
        Payload::Value(v) => match &v.kind {
            ValueKind::MemberName(name) => Some(name.clone()),
            _ => None,
        },
        _ => None,
    }
}

impl TypeResolution {
    fn resolve_value(&self, tree: &mut Tree<Payload>, node: NodeId, ctx: &SemaCtx, messages: &mut MessageContext) {
        let range = tree.get(node).range.clone();
        let (kind, current_resolved) = match &tree.get(node).payload {
            Payload::Value(v) => (v.kind.clone(), v.resolved_type),
            _ => return,
        };
        if current_resolved.is_some() {
            return;
        }

        if matches!(kind, ValueKind::MemberName(_)) {
            // Resolved as part of its parent `MemberAccess` node; it never
            // carries a type of its own.
            return;
        }

        let (resolved_type, is_assignable) = match &kind {
            ValueKind::LiteralBool(_) => (Some(ctx.bool_type), false),
            ValueKind::LiteralNumber(n) => (Some(n.type_node), false),
            ValueKind::Symbol(s) => match s.resolved {
                Some(target) => (variable_resolved_type(tree, target), !variable_is_const(tree, target)),
                None => (None, false),
            },
            ValueKind::Unary(UnaryValue { op, operand }) => self.resolve_unary(tree, *op, *operand, ctx, messages),
            ValueKind::Binary(BinaryValue { op, lhs, rhs }) => self.resolve_binary(tree, *op, *lhs, *rhs, ctx, messages),
            ValueKind::Call(c) => {
                let callee_target = match &tree.get(c.callee).payload {
                    Payload::Value(v) => v.resolved_reference(),
                    _ => None,
                };
                let return_type = callee_target.and_then(|target| function_return_type(tree, target));
                (return_type, false)
            }
            ValueKind::Cast(c) => (Some(c.target_type), false),
            ValueKind::MemberName(_) => unreachable!("handled above"),
        };

        if resolved_type.is_none() {
            messages.emit(
                Message::new(Severity::Error, range, "could not determine the type of this expression")
                    .with_code("unresolved-type"),
            );
        }

        if let Payload::Value(v) = &mut tree.get_mut(node).payload {
            v.resolved_type = resolved_type;
            v.is_assignable = is_assignable;
        }
    }

    fn resolve_unary(
        &self,
        tree: &mut Tree<Payload>,
        op: UnaryOperator,
        operand: NodeId,
        ctx: &SemaCtx,
        messages: &mut MessageContext,
    ) -> (Option<NodeId>, bool) {
        let operand_type = value_resolved_type(tree, operand);
        match op {
            UnaryOperator::BoolNot => (Some(ctx.bool_type), false),
            UnaryOperator::BitNot | UnaryOperator::Pos | UnaryOperator::Neg => (operand_type, false),
            UnaryOperator::Deref => (operand_type.and_then(|t| semtypes::try_get_pointer_element_type(tree, t)), true),
            UnaryOperator::GetAddr => {
                if !value_is_assignable(tree, operand) {
                    let range = tree.get(operand).range.clone();
                    messages.emit(
                        Message::new(Severity::Error, range, "operand of '&' must be an assignable expression")
                            .with_code("type-mismatch"),
                    );
                    return (None, false);
                }
                match operand_type {
                    Some(inner) => {
                        let range = tree.get(operand).range.clone();
                        let pointer = tree.insert(crate::ast::kinds::TYPE_POINTER, range, Payload::Type(Type::Pointer(inner)));
                        (Some(pointer), false)
                    }
                    None => (None, false),
                }
            }
        }
    }

    fn resolve_binary(
        &self,
        tree: &mut Tree<Payload>,
        op: BinaryOperator,
        lhs: NodeId,
        rhs: NodeId,
        ctx: &SemaCtx,
        messages: &mut MessageContext,
    ) -> (Option<NodeId>, bool) {
        if op == BinaryOperator::MemberAccess {
            return self.resolve_member_access(tree, lhs, rhs, messages);
        }

        let lhs_type = value_resolved_type(tree, lhs);
        let rhs_type = value_resolved_type(tree, rhs);

        if op.is_comparison() || matches!(op, BinaryOperator::BoolAnd | BinaryOperator::BoolOr) {
            return (Some(ctx.bool_type), false);
        }
        if matches!(op, BinaryOperator::Assign) || op.is_compound_assignment() {
            return (lhs_type, false);
        }

        match (lhs_type, rhs_type) {
            (Some(a), Some(b)) => (semtypes::get_arithmetic_containing_type(tree, a, b), false),
            _ => (None, false),
        }
    }

    fn resolve_member_access(
        &self,
        tree: &mut Tree<Payload>,
        lhs: NodeId,
        rhs: NodeId,
        messages: &mut MessageContext,
    ) -> (Option<NodeId>, bool) {
        let Some(member_name) = member_name_of(tree, rhs) else {
            return (None, false);
        };
        let Some(lhs_type) = value_resolved_type(tree, lhs) else {
            return (None, false);
        };
        let Some(struct_decl) = struct_decl_for_type(tree, lhs_type) else {
            let range = tree.get(rhs).range.clone();
            messages.emit(
                Message::new(Severity::Error, range, "member access on a value that is not a struct")
                    .with_code("type-mismatch"),
            );
            return (None, false);
        };
        let member = match &tree.get(struct_decl).payload {
            Payload::Declaration(Declaration::StructuredType(s)) => s.scope.get_local(&member_name),
            _ => None,
        };
        match member {
            Some(member) => (
                variable_resolved_type(tree, member),
                !variable_is_const(tree, member) && value_is_assignable(tree, lhs),
            ),
            None => {
                let range = tree.get(rhs).range.clone();
                messages.emit(
                    Message::new(Severity::Error, range, format!("no member named '{member_name}' on this struct"))
                        .with_code("type-mismatch"),
                );
                (None, false)
            }
        }
    }
}

impl Handler<Payload, SemaCtx> for TypeResolution {
    fn on_leave(
        &mut self,
        tree: &mut Tree<Payload>,
        node: NodeId,
        _ancestors: &AncestorStack,
        ctx: &mut SemaCtx,
        messages: &mut MessageContext,
    ) -> HandlerOutput {
        match &tree.get(node).payload {
            Payload::Value(_) => self.resolve_value(tree, node, ctx, messages),
            Payload::Declaration(Declaration::Variable(_)) => self.resolve_variable(tree, node, messages),
            _ => {}
        }
        HandlerOutput::cont()
    }
}

impl TypeResolution {
    fn resolve_variable(&self, tree: &mut Tree<Payload>, node: NodeId, messages: &mut MessageContext) {
        let range = tree.get(node).range.clone();
        let (declared_type, initial) = match &tree.get(node).payload {
            Payload::Declaration(Declaration::Variable(v)) => (v.declared_type, v.initial),
            _ => return,
        };

        let inferred = declared_type.or_else(|| initial.and_then(|i| value_resolved_type(tree, i)));

        if inferred.is_none() {
            messages.emit(
                Message::new(Severity::Error, range, "cannot infer a type for this declaration")
                    .with_code("unresolved-type"),
            );
        }

        if let Payload::Declaration(Declaration::Variable(v)) = &mut tree.get_mut(node).payload {
            v.resolved_type = inferred;
        }
    }
}
