//! Value-expression codegen: literals, symbol loads, unary/binary
//! instructions, calls, and casts.

use inkwell::values::{BasicValueEnum, FloatValue, IntValue};
use inkwell::{FloatPredicate, IntPredicate};

use langtools::tree::{NodeId, Tree};

use super::types::{is_float, is_signed, llvm_type};
use super::FunctionCodegen;
use crate::ast::declarations::Declaration;
use crate::ast::operators::{BinaryOperator, UnaryOperator};
use crate::ast::types::Type;
use crate::ast::values::{NumberBits, ValueKind};
use crate::ast::Payload;

/// The field index of `member_name` within the `StructuredType` that
/// `lhs_type` (a `Type::Symbol` resolved to a struct declaration) names.
fn struct_member_index(tree: &Tree<Payload>, lhs_type: NodeId, member_name: &str) -> u32 {
    let struct_decl = match &tree.get(lhs_type).payload {
        Payload::Type(Type::Symbol(s)) => s.resolved.expect("struct type resolved before codegen"),
        _ => panic!("member access base is not a named struct type"),
    };
    match &tree.get(struct_decl).payload {
        Payload::Declaration(Declaration::StructuredType(s)) => s
            .members
            .iter()
            .position(|m| match &tree.get(*m).payload {
                Payload::Declaration(Declaration::Variable(v)) => v.name == member_name,
                _ => false,
            })
            .expect("member resolved before codegen") as u32,
        _ => panic!("struct symbol resolved to a non-struct declaration"),
    }
}

impl<'ctx, 'a> FunctionCodegen<'ctx, 'a> {
    /// Returns the stack slot a value refers to, for contexts that need an
    /// address rather than a loaded value (assignment targets, `&expr`).
    pub fn lvalue_ptr(&self, node: NodeId) -> inkwell::values::PointerValue<'ctx> {
        match &self.tree.get(node).payload {
            Payload::Value(v) => match &v.kind {
                ValueKind::Symbol(s) => {
                    let target = s.resolved.expect("symbol resolved before codegen");
                    *self.locals.get(&target).expect("local has an allocated slot")
                }
                ValueKind::Unary(u) if u.op == UnaryOperator::Deref => {
                    self.gen_expr(u.operand).into_pointer_value()
                }
                ValueKind::Binary(b) if b.op == BinaryOperator::MemberAccess => self.member_access_ptr(b.lhs, b.rhs),
                _ => panic!("value is not an lvalue"),
            },
            _ => panic!("node is not a value"),
        }
    }

    fn member_access_ptr(&self, lhs: NodeId, rhs: NodeId) -> inkwell::values::PointerValue<'ctx> {
        let member_name = match &self.tree.get(rhs).payload {
            Payload::Value(v) => match &v.kind {
                ValueKind::MemberName(name) => name.clone(),
                _ => panic!("member access rhs is not a member name"),
            },
            _ => panic!("member access rhs is not a value"),
        };
        let base_ptr = self.lvalue_ptr(lhs);
        let lhs_type = self.resolved_type(lhs);
        let struct_llvm_ty = llvm_type(self.context, self.tree, lhs_type);
        let index = struct_member_index(self.tree, lhs_type, &member_name);
        self.builder
            .build_struct_gep(struct_llvm_ty, base_ptr, index, "")
            .unwrap()
    }

    pub fn gen_expr(&self, node: NodeId) -> BasicValueEnum<'ctx> {
        let kind = match &self.tree.get(node).payload {
            Payload::Value(v) => v.kind.clone(),
            _ => panic!("node is not a value"),
        };

        match kind {
            ValueKind::LiteralBool(b) => self.context.bool_type().const_int(b as u64, false).into(),
            ValueKind::LiteralNumber(n) => self.gen_number_literal(node, n.type_node, n.bits),
            ValueKind::Symbol(s) => {
                let target = s.resolved.expect("symbol resolved before codegen");
                let ty = self.resolved_type(node);
                let ptr = *self.locals.get(&target).expect("local has an allocated slot");
                self.builder.build_load(llvm_type(self.context, self.tree, ty), ptr, "").unwrap()
            }
            ValueKind::Unary(u) => self.gen_unary(node, u.op, u.operand),
            ValueKind::Binary(b) => self.gen_binary(node, b.op, b.lhs, b.rhs),
            ValueKind::Call(c) => self.gen_call(c.callee, &c.args),
            ValueKind::Cast(c) => self.gen_cast(c.value, c.target_type),
        }
    }

    fn resolved_type(&self, node: NodeId) -> NodeId {
        match &self.tree.get(node).payload {
            Payload::Value(v) => v.resolved_type.expect("value resolved before codegen"),
            _ => panic!("node is not a value"),
        }
    }

    fn gen_number_literal(&self, node: NodeId, type_node: NodeId, bits: NumberBits) -> BasicValueEnum<'ctx> {
        let _ = node;
        match bits {
            NumberBits::Signed(v) => llvm_type(self.context, self.tree, type_node)
                .into_int_type()
                .const_int(v as u64, true)
                .into(),
            NumberBits::Unsigned(v) => llvm_type(self.context, self.tree, type_node)
                .into_int_type()
                .const_int(v, false)
                .into(),
            NumberBits::Float(v) => llvm_type(self.context, self.tree, type_node).into_float_type().const_float(v).into(),
        }
    }

    fn gen_unary(&self, node: NodeId, op: UnaryOperator, operand: NodeId) -> BasicValueEnum<'ctx> {
        match op {
            UnaryOperator::GetAddr => self.lvalue_ptr(operand).into(),
            UnaryOperator::Deref => {
                let ptr = self.gen_expr(operand).into_pointer_value();
                let ty = self.resolved_type(node);
                self.builder.build_load(llvm_type(self.context, self.tree, ty), ptr, "").unwrap()
            }
            UnaryOperator::BoolNot => {
                let v = self.gen_expr(operand).into_int_value();
                self.builder.build_not(v, "").unwrap().into()
            }
            UnaryOperator::BitNot => {
                let v = self.gen_expr(operand).into_int_value();
                self.builder.build_not(v, "").unwrap().into()
            }
            UnaryOperator::Pos => self.gen_expr(operand),
            UnaryOperator::Neg => {
                let operand_type = self.resolved_type(operand);
                let v = self.gen_expr(operand);
                if is_float(self.tree, operand_type) {
                    self.builder.build_float_neg(v.into_float_value(), "").unwrap().into()
                } else {
                    self.builder.build_int_neg(v.into_int_value(), "").unwrap().into()
                }
            }
        }
    }

    fn gen_binary(&self, node: NodeId, op: BinaryOperator, lhs: NodeId, rhs: NodeId) -> BasicValueEnum<'ctx> {
        if op == BinaryOperator::MemberAccess {
            let ptr = self.member_access_ptr(lhs, rhs);
            let ty = self.resolved_type(node);
            return self.builder.build_load(llvm_type(self.context, self.tree, ty), ptr, "").unwrap();
        }
        if op == BinaryOperator::Assign {
            let value = self.gen_expr(rhs);
            let ptr = self.lvalue_ptr(lhs);
            self.builder.build_store(ptr, value).unwrap();
            return value;
        }
        if let Some(base) = op.try_get_compound_assignment_base_operator() {
            let ptr = self.lvalue_ptr(lhs);
            let current = self.gen_expr(lhs);
            let rhs_value = self.gen_expr(rhs);
            let operand_type = self.resolved_type(lhs);
            let result = self.apply_binary_op(base, current, rhs_value, operand_type);
            self.builder.build_store(ptr, result).unwrap();
            return result;
        }

        let lhs_value = self.gen_expr(lhs);
        let rhs_value = self.gen_expr(rhs);
        let operand_type = self.resolved_type(lhs);
        let _ = node;
        self.apply_binary_op(op, lhs_value, rhs_value, operand_type)
    }

    fn apply_binary_op(
        &self,
        op: BinaryOperator,
        lhs: BasicValueEnum<'ctx>,
        rhs: BasicValueEnum<'ctx>,
        operand_type: NodeId,
    ) -> BasicValueEnum<'ctx> {
        if is_float(self.tree, operand_type) {
            let l = lhs.into_float_value();
            let r = rhs.into_float_value();
            return match op {
                BinaryOperator::Add => self.builder.build_float_add(l, r, "").unwrap().into(),
                BinaryOperator::Sub => self.builder.build_float_sub(l, r, "").unwrap().into(),
                BinaryOperator::Mul => self.builder.build_float_mul(l, r, "").unwrap().into(),
                BinaryOperator::Div => self.builder.build_float_div(l, r, "").unwrap().into(),
                BinaryOperator::Mod => self.builder.build_float_rem(l, r, "").unwrap().into(),
                BinaryOperator::Eq => self.builder.build_float_compare(FloatPredicate::OEQ, l, r, "").unwrap().into(),
                BinaryOperator::Ne => self.builder.build_float_compare(FloatPredicate::ONE, l, r, "").unwrap().into(),
                BinaryOperator::Lt => self.builder.build_float_compare(FloatPredicate::OLT, l, r, "").unwrap().into(),
                BinaryOperator::Le => self.builder.build_float_compare(FloatPredicate::OLE, l, r, "").unwrap().into(),
                BinaryOperator::Gt => self.builder.build_float_compare(FloatPredicate::OGT, l, r, "").unwrap().into(),
                BinaryOperator::Ge => self.builder.build_float_compare(FloatPredicate::OGE, l, r, "").unwrap().into(),
                BinaryOperator::Exp => self.build_float_pow(l, r).into(),
                other => panic!("operator {other:?} is not valid on floats"),
            };
        }

        let signed = is_signed(self.tree, operand_type);
        let l = lhs.into_int_value();
        let r = rhs.into_int_value();
        match op {
            BinaryOperator::BoolAnd | BinaryOperator::BitAnd => self.builder.build_and(l, r, "").unwrap().into(),
            BinaryOperator::BoolOr | BinaryOperator::BitOr => self.builder.build_or(l, r, "").unwrap().into(),
            BinaryOperator::BitXor => self.builder.build_xor(l, r, "").unwrap().into(),
            BinaryOperator::Shl => self.builder.build_left_shift(l, r, "").unwrap().into(),
            BinaryOperator::Shr => self.builder.build_right_shift(l, r, signed, "").unwrap().into(),
            BinaryOperator::Add => self.builder.build_int_add(l, r, "").unwrap().into(),
            BinaryOperator::Sub => self.builder.build_int_sub(l, r, "").unwrap().into(),
            BinaryOperator::Mul => self.builder.build_int_mul(l, r, "").unwrap().into(),
            BinaryOperator::Div if signed => self.builder.build_int_signed_div(l, r, "").unwrap().into(),
            BinaryOperator::Div => self.builder.build_int_unsigned_div(l, r, "").unwrap().into(),
            BinaryOperator::Mod if signed => self.builder.build_int_signed_rem(l, r, "").unwrap().into(),
            BinaryOperator::Mod => self.builder.build_int_unsigned_rem(l, r, "").unwrap().into(),
            BinaryOperator::Eq => self.builder.build_int_compare(IntPredicate::EQ, l, r, "").unwrap().into(),
            BinaryOperator::Ne => self.builder.build_int_compare(IntPredicate::NE, l, r, "").unwrap().into(),
            BinaryOperator::Lt if signed => self.builder.build_int_compare(IntPredicate::SLT, l, r, "").unwrap().into(),
            BinaryOperator::Lt => self.builder.build_int_compare(IntPredicate::ULT, l, r, "").unwrap().into(),
            BinaryOperator::Le if signed => self.builder.build_int_compare(IntPredicate::SLE, l, r, "").unwrap().into(),
            BinaryOperator::Le => self.builder.build_int_compare(IntPredicate::ULE, l, r, "").unwrap().into(),
            BinaryOperator::Gt if signed => self.builder.build_int_compare(IntPredicate::SGT, l, r, "").unwrap().into(),
            BinaryOperator::Gt => self.builder.build_int_compare(IntPredicate::UGT, l, r, "").unwrap().into(),
            BinaryOperator::Ge if signed => self.builder.build_int_compare(IntPredicate::SGE, l, r, "").unwrap().into(),
            BinaryOperator::Ge => self.builder.build_int_compare(IntPredicate::UGE, l, r, "").unwrap().into(),
            BinaryOperator::Exp => self.build_int_pow(l, r).into(),
            other => panic!("operator {other:?} is not valid on integers"),
        }
    }

    /// Raises `base` to `exp` by repeated squaring-free multiplication: LLVM
    /// has no integer power instruction, so this builds the loop directly
    /// into the current function.
    fn build_int_pow(&self, base: IntValue<'ctx>, exp: IntValue<'ctx>) -> IntValue<'ctx> {
        let int_ty = base.get_type();
        let result_ptr = self.builder.build_alloca(int_ty, "pow.result").unwrap();
        let base_ptr = self.builder.build_alloca(int_ty, "pow.base").unwrap();
        let exp_ptr = self.builder.build_alloca(int_ty, "pow.exp").unwrap();
        self.builder.build_store(result_ptr, int_ty.const_int(1, false)).unwrap();
        self.builder.build_store(base_ptr, base).unwrap();
        self.builder.build_store(exp_ptr, exp).unwrap();

        let function = self.current_function;
        let cond_bb = self.context.append_basic_block(function, "pow.cond");
        let body_bb = self.context.append_basic_block(function, "pow.body");
        let exit_bb = self.context.append_basic_block(function, "pow.exit");

        self.builder.build_unconditional_branch(cond_bb).unwrap();

        self.builder.position_at_end(cond_bb);
        let exp_cur = self.builder.build_load(int_ty, exp_ptr, "").unwrap().into_int_value();
        let cond = self
            .builder
            .build_int_compare(IntPredicate::NE, exp_cur, int_ty.const_zero(), "")
            .unwrap();
        self.builder.build_conditional_branch(cond, body_bb, exit_bb).unwrap();

        self.builder.position_at_end(body_bb);
        let result_cur = self.builder.build_load(int_ty, result_ptr, "").unwrap().into_int_value();
        let base_cur = self.builder.build_load(int_ty, base_ptr, "").unwrap().into_int_value();
        let new_result = self.builder.build_int_mul(result_cur, base_cur, "").unwrap();
        self.builder.build_store(result_ptr, new_result).unwrap();
        let exp_cur = self.builder.build_load(int_ty, exp_ptr, "").unwrap().into_int_value();
        let new_exp = self.builder.build_int_sub(exp_cur, int_ty.const_int(1, false), "").unwrap();
        self.builder.build_store(exp_ptr, new_exp).unwrap();
        self.builder.build_unconditional_branch(cond_bb).unwrap();

        self.builder.position_at_end(exit_bb);
        self.builder.build_load(int_ty, result_ptr, "").unwrap().into_int_value()
    }

    /// Lowers floating-point exponentiation to the `llvm.pow.f32`/`llvm.pow.f64`
    /// intrinsic, declaring it the first time it's needed in this module.
    fn build_float_pow(&self, base: FloatValue<'ctx>, exp: FloatValue<'ctx>) -> FloatValue<'ctx> {
        let float_ty = base.get_type();
        let name = if float_ty == self.context.f64_type() {
            "llvm.pow.f64"
        } else {
            "llvm.pow.f32"
        };
        let function = self.module.get_function(name).unwrap_or_else(|| {
            let fn_type = float_ty.fn_type(&[float_ty.into(), float_ty.into()], false);
            self.module.add_function(name, fn_type, None)
        });
        self.builder
            .build_call(function, &[base.into(), exp.into()], "")
            .unwrap()
            .try_as_basic_value()
            .left()
            .unwrap()
            .into_float_value()
    }

    fn gen_call(&self, callee: NodeId, args: &[NodeId]) -> BasicValueEnum<'ctx> {
        let target = match &self.tree.get(callee).payload {
            Payload::Value(v) => v.resolved_reference().expect("callee resolved before codegen"),
            _ => panic!("callee is not a value"),
        };
        let name = match &self.tree.get(target).payload {
            Payload::Declaration(Declaration::Function(f)) => f.name.clone(),
            _ => panic!("callee does not resolve to a function"),
        };
        let function = self.module.get_function(&name).expect("function declared before calls to it");
        let arg_values: Vec<inkwell::values::BasicMetadataValueEnum> =
            args.iter().map(|a| self.gen_expr(*a).into()).collect();
        let call = self.builder.build_call(function, &arg_values, "").unwrap();
        call.try_as_basic_value()
            .left()
            .unwrap_or_else(|| self.context.bool_type().const_zero().into())
    }

    fn gen_cast(&self, value: NodeId, target_type: NodeId) -> BasicValueEnum<'ctx> {
        let from_type = self.resolved_type(value);
        let v = self.gen_expr(value);
        let target_llvm = llvm_type(self.context, self.tree, target_type);

        let from_float = is_float(self.tree, from_type);
        let to_float = is_float(self.tree, target_type);

        if from_float && to_float {
            let float_ty = target_llvm.into_float_type();
            if float_ty.get_bit_width() >= v.into_float_value().get_type().get_bit_width() {
                return self.builder.build_float_ext(v.into_float_value(), float_ty, "").unwrap().into();
            }
            return self.builder.build_float_trunc(v.into_float_value(), float_ty, "").unwrap().into();
        }
        if from_float && !to_float {
            let int_ty = target_llvm.into_int_type();
            return if is_signed(self.tree, target_type) {
                self.builder.build_float_to_signed_int(v.into_float_value(), int_ty, "").unwrap().into()
            } else {
                self.builder.build_float_to_unsigned_int(v.into_float_value(), int_ty, "").unwrap().into()
            };
        }
        if !from_float && to_float {
            let float_ty = target_llvm.into_float_type();
            return if is_signed(self.tree, from_type) {
                self.builder.build_signed_int_to_float(v.into_int_value(), float_ty, "").unwrap().into()
            } else {
                self.builder.build_unsigned_int_to_float(v.into_int_value(), float_ty, "").unwrap().into()
            };
        }

        if target_llvm.is_pointer_type() {
            return self.builder.build_int_to_ptr(v.into_int_value(), target_llvm.into_pointer_type(), "").unwrap().into();
        }
        if v.is_pointer_value() {
            return self.builder.build_ptr_to_int(v.into_pointer_value(), target_llvm.into_int_type(), "").unwrap().into();
        }

        let int_ty = target_llvm.into_int_type();
        let source_width = v.into_int_value().get_type().get_bit_width();
        if int_ty.get_bit_width() == source_width {
            return v;
        }
        if int_ty.get_bit_width() < source_width {
            return self.builder.build_int_truncate(v.into_int_value(), int_ty, "").unwrap().into();
        }
        if is_signed(self.tree, from_type) {
            self.builder.build_int_s_extend(v.into_int_value(), int_ty, "").unwrap().into()
        } else {
            self.builder.build_int_z_extend(v.into_int_value(), int_ty, "").unwrap().into()
        }
    }
}
