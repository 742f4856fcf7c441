//! AST-to-LLVM-IR lowering built on `langtools::codegen::CodegenContext`.
//!
//! LLVM values never live on AST payloads (see the note in `ast/mod.rs`), so
//! this module keeps its own `NodeId`-keyed side tables: [`FunctionCodegen`]
//! maps each local/parameter declaration to the stack slot allocated for it,
//! and a small loop-target stack resolves `break`/`continue` to the nearest
//! enclosing `while`'s exit/condition blocks.

mod statements;
mod types;
mod values;

use std::collections::HashMap;

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::values::{BasicBlock, FunctionValue, PointerValue};

use langtools::tree::{NodeId, Tree};

use crate::ast::declarations::Declaration;
use crate::ast::statements::Statement;
use crate::ast::{Payload, TranslationUnit};
use types::{is_void_type, llvm_type};

/// Per-function codegen state: the locals this function has allocated slots
/// for, and the stack of enclosing loops' `(condition, exit)` blocks.
pub struct FunctionCodegen<'ctx, 'a> {
    context: &'ctx Context,
    module: &'a Module<'ctx>,
    builder: &'a Builder<'ctx>,
    tree: &'a Tree<Payload>,
    current_function: FunctionValue<'ctx>,
    locals: HashMap<NodeId, PointerValue<'ctx>>,
    loop_targets: Vec<(BasicBlock<'ctx>, BasicBlock<'ctx>)>,
}

fn collect_locals(tree: &Tree<Payload>, node: NodeId, out: &mut Vec<NodeId>) {
    match &tree.get(node).payload {
        Payload::Statement(Statement::Declaration(d)) => out.push(*d),
        Payload::Statement(Statement::Block(b)) => {
            for stmt in &b.statements {
                collect_locals(tree, *stmt, out);
            }
        }
        Payload::Statement(Statement::If(i)) => {
            collect_locals(tree, i.then_block, out);
            if let Some(else_branch) = i.else_branch {
                collect_locals(tree, else_branch, out);
            }
        }
        Payload::Statement(Statement::While(w)) => collect_locals(tree, w.body, out),
        _ => {}
    }
}

fn variable_resolved_type(tree: &Tree<Payload>, node: NodeId) -> NodeId {
    match &tree.get(node).payload {
        Payload::Declaration(Declaration::Variable(v)) => v.resolved_type.expect("variable typed before codegen"),
        _ => panic!("node is not a variable declaration"),
    }
}

impl<'ctx, 'a> FunctionCodegen<'ctx, 'a> {
    /// Allocates one stack slot per parameter and per local declared
    /// anywhere in the body (even mid-block), then copies parameter values
    /// into their slots and lowers the body.
    fn run(
        context: &'ctx Context,
        module: &'a Module<'ctx>,
        builder: &'a Builder<'ctx>,
        tree: &'a Tree<Payload>,
        function_node: NodeId,
        llvm_function: FunctionValue<'ctx>,
    ) {
        let (parameters, body) = match &tree.get(function_node).payload {
            Payload::Declaration(Declaration::Function(f)) => (f.parameters.clone(), f.body),
            _ => panic!("node is not a function declaration"),
        };

        let mut codegen = FunctionCodegen {
            context,
            module,
            builder,
            tree,
            current_function: llvm_function,
            locals: HashMap::new(),
            loop_targets: Vec::new(),
        };

        let entry = context.append_basic_block(llvm_function, "entry");
        builder.position_at_end(entry);

        for (index, param) in parameters.iter().enumerate() {
            let ty = variable_resolved_type(tree, *param);
            let slot = builder.build_alloca(llvm_type(context, tree, ty), "").unwrap();
            let arg = llvm_function.get_nth_param(index as u32).expect("parameter count matches signature");
            builder.build_store(slot, arg).unwrap();
            codegen.locals.insert(*param, slot);
        }

        if let Some(body) = body {
            let mut locals = Vec::new();
            collect_locals(tree, body, &mut locals);
            for local in locals {
                let ty = variable_resolved_type(tree, local);
                let slot = builder.build_alloca(llvm_type(context, tree, ty), "").unwrap();
                codegen.locals.insert(local, slot);
            }

            codegen.gen_block(body);
        }

        if builder.get_insert_block().and_then(|b| b.get_terminator()).is_none() {
            builder.build_unreachable().unwrap();
        }
    }
}

fn function_llvm_type<'ctx>(context: &'ctx Context, tree: &Tree<Payload>, f: &crate::ast::declarations::Function) -> inkwell::types::FunctionType<'ctx> {
    let param_types: Vec<inkwell::types::BasicMetadataTypeEnum> = f
        .parameters
        .iter()
        .map(|p| llvm_type(context, tree, variable_resolved_type(tree, *p)).into())
        .collect();

    if is_void_type(tree, f.return_type) {
        context.void_type().fn_type(&param_types, false)
    } else {
        llvm_type(context, tree, f.return_type).fn_type(&param_types, false)
    }
}

/// Lowers an entire translation unit to one LLVM module: declares every
/// function first (so mutually recursive calls resolve), then fills in
/// bodies.
pub fn compile_module<'ctx>(
    context: &'ctx Context,
    module_name: &str,
    tree: &Tree<Payload>,
    root: NodeId,
) -> langtools::codegen::CodegenContext<'ctx> {
    let codegen_ctx = langtools::codegen::CodegenContext::new(context, module_name);

    let declarations = match &tree.get(root).payload {
        Payload::TranslationUnit(TranslationUnit { declarations, .. }) => declarations.clone(),
        _ => panic!("root node is not a translation unit"),
    };

    let mut functions: Vec<(NodeId, FunctionValue, bool)> = Vec::new();
    for decl in &declarations {
        if let Payload::Declaration(Declaration::Function(f)) = &tree.get(*decl).payload {
            let fn_type = function_llvm_type(context, tree, f);
            let llvm_function = codegen_ctx.module().add_function(&f.name, fn_type, None);
            functions.push((*decl, llvm_function, f.body.is_some()));
        }
    }

    for (decl, llvm_function, has_body) in functions {
        if !has_body {
            continue;
        }
        FunctionCodegen::run(context, codegen_ctx.module(), codegen_ctx.builder(), tree, decl, llvm_function);
    }

    codegen_ctx
}
