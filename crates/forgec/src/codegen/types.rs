//! Lowers Forge `Type` nodes to `inkwell` basic types.
//!
//! `isize`/`usize` are lowered to a 64-bit integer; Forge targets hosts with
//! a 64-bit pointer width only, which keeps this a plain constant rather
//! than a `TargetData` query.

use inkwell::context::Context;
use inkwell::types::BasicTypeEnum;

use langtools::tree::{NodeId, Tree};

use crate::ast::declarations::Declaration;
use crate::ast::types::{BasicTypeKind, Type};
use crate::ast::Payload;

const POINTER_WIDTH: u32 = 64;

fn member_type(tree: &Tree<Payload>, member: NodeId) -> NodeId {
    match &tree.get(member).payload {
        Payload::Declaration(Declaration::Variable(v)) => v.resolved_type.expect("member typed before codegen"),
        _ => panic!("struct member is not a variable declaration"),
    }
}

pub fn llvm_type<'ctx>(context: &'ctx Context, tree: &Tree<Payload>, node: NodeId) -> BasicTypeEnum<'ctx> {
    match &tree.get(node).payload {
        Payload::Type(Type::Basic(BasicTypeKind::Bool)) => context.bool_type().into(),
        Payload::Type(Type::Basic(BasicTypeKind::Void)) => {
            panic!("void has no value representation; callers must special-case it")
        }
        Payload::Type(Type::Basic(BasicTypeKind::Isize | BasicTypeKind::Usize)) => {
            context.custom_width_int_type(POINTER_WIDTH).into()
        }
        Payload::Type(Type::WithBitWidth(w)) if w.float && w.width == 32 => context.f32_type().into(),
        Payload::Type(Type::WithBitWidth(w)) if w.float => context.f64_type().into(),
        Payload::Type(Type::WithBitWidth(w)) => context.custom_width_int_type(w.width).into(),
        Payload::Type(Type::Pointer(_)) => context.ptr_type(Default::default()).into(),
        Payload::Type(Type::Symbol(s)) => {
            let target = s.resolved.expect("type symbol resolved before codegen");
            match &tree.get(target).payload {
                Payload::Declaration(Declaration::TypeAlias(alias)) => llvm_type(context, tree, alias.aliased_type),
                Payload::Declaration(Declaration::StructuredType(_)) => llvm_type(context, tree, target),
                _ => panic!("type symbol resolved to a non-type declaration"),
            }
        }
        Payload::Declaration(Declaration::StructuredType(s)) => {
            let field_types: Vec<BasicTypeEnum> = s
                .members
                .iter()
                .map(|m| llvm_type(context, tree, member_type(tree, *m)))
                .collect();
            context.struct_type(&field_types, false).into()
        }
        Payload::Type(Type::Structured(members)) => {
            let field_types: Vec<BasicTypeEnum> =
                members.iter().map(|m| llvm_type(context, tree, m.member_type)).collect();
            context.struct_type(&field_types, false).into()
        }
        Payload::Type(Type::Function(_)) => panic!("function types are not first-class values in codegen"),
        _ => panic!("node {:?} is not a type", tree.get(node).kind.0),
    }
}

pub fn is_void_type(tree: &Tree<Payload>, node: NodeId) -> bool {
    matches!(&tree.get(node).payload, Payload::Type(Type::Basic(BasicTypeKind::Void)))
}

pub fn is_signed(tree: &Tree<Payload>, node: NodeId) -> bool {
    match &tree.get(node).payload {
        Payload::Type(Type::Basic(BasicTypeKind::Isize)) => true,
        Payload::Type(Type::Basic(BasicTypeKind::Usize)) => false,
        Payload::Type(Type::WithBitWidth(w)) => w.signed,
        _ => true,
    }
}

pub fn is_float(tree: &Tree<Payload>, node: NodeId) -> bool {
    matches!(&tree.get(node).payload, Payload::Type(Type::WithBitWidth(w)) if w.float)
}
