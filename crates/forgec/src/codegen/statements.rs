//! Statement codegen: blocks, `if`/`while` control flow, and `return`.

use langtools::tree::NodeId;

use super::FunctionCodegen;
use crate::ast::statements::{BasicKind, Statement};
use crate::ast::Payload;

impl<'ctx, 'a> FunctionCodegen<'ctx, 'a> {
    pub fn gen_block(&mut self, node: NodeId) {
        let statements = match &self.tree.get(node).payload {
            Payload::Statement(Statement::Block(b)) => b.statements.clone(),
            _ => panic!("node is not a block"),
        };
        for stmt in statements {
            if self.current_block_has_terminator() {
                break;
            }
            self.gen_statement(stmt);
        }
    }

    fn current_block_has_terminator(&self) -> bool {
        self.builder
            .get_insert_block()
            .and_then(|b| b.get_terminator())
            .is_some()
    }

    pub fn gen_statement(&mut self, node: NodeId) {
        let statement = match &self.tree.get(node).payload {
            Payload::Statement(s) => s.clone(),
            _ => panic!("node is not a statement"),
        };

        match statement {
            Statement::Basic(BasicKind::ReturnVoid) => {
                self.builder.build_return(None).unwrap();
            }
            Statement::Basic(BasicKind::Continue) => {
                let (cond, _) = *self.loop_targets.last().expect("continue validated inside a loop");
                self.builder.build_unconditional_branch(cond).unwrap();
            }
            Statement::Basic(BasicKind::Break) => {
                let (_, exit) = *self.loop_targets.last().expect("break validated inside a loop");
                self.builder.build_unconditional_branch(exit).unwrap();
            }
            Statement::Value(v) => {
                self.gen_expr(v);
            }
            Statement::Declaration(d) => self.gen_local_declaration(d),
            Statement::Block(_) => self.gen_block(node),
            Statement::If(i) => self.gen_if(i.condition, i.then_block, i.else_branch),
            Statement::While(w) => self.gen_while(w.condition, w.body),
            Statement::Return(r) => {
                let value = self.gen_expr(r.value);
                self.builder.build_return(Some(&value)).unwrap();
            }
        }
    }

    fn gen_local_declaration(&mut self, decl: NodeId) {
        use crate::ast::declarations::Declaration;
        let initial = match &self.tree.get(decl).payload {
            Payload::Declaration(Declaration::Variable(v)) => v.initial,
            _ => panic!("declaration statement does not wrap a variable"),
        };
        if let Some(initial) = initial {
            let value = self.gen_expr(initial);
            let ptr = *self.locals.get(&decl).expect("local slot allocated at function entry");
            self.builder.build_store(ptr, value).unwrap();
        }
    }

    fn gen_if(&mut self, condition: NodeId, then_block: NodeId, else_branch: Option<NodeId>) {
        let cond_value = self.gen_expr(condition).into_int_value();
        let function = self.current_function;

        let then_bb = self.context.append_basic_block(function, "if.then");
        let else_bb = self.context.append_basic_block(function, "if.else");
        let merge_bb = self.context.append_basic_block(function, "if.merge");

        self.builder.build_conditional_branch(cond_value, then_bb, else_bb).unwrap();

        self.builder.position_at_end(then_bb);
        self.gen_statement(then_block);
        if !self.current_block_has_terminator() {
            self.builder.build_unconditional_branch(merge_bb).unwrap();
        }

        self.builder.position_at_end(else_bb);
        if let Some(else_branch) = else_branch {
            self.gen_statement(else_branch);
        }
        if !self.current_block_has_terminator() {
            self.builder.build_unconditional_branch(merge_bb).unwrap();
        }

        self.builder.position_at_end(merge_bb);
    }

    fn gen_while(&mut self, condition: NodeId, body: NodeId) {
        let function = self.current_function;
        let cond_bb = self.context.append_basic_block(function, "while.cond");
        let body_bb = self.context.append_basic_block(function, "while.body");
        let exit_bb = self.context.append_basic_block(function, "while.exit");

        self.builder.build_unconditional_branch(cond_bb).unwrap();

        self.builder.position_at_end(cond_bb);
        let cond_value = self.gen_expr(condition).into_int_value();
        self.builder.build_conditional_branch(cond_value, body_bb, exit_bb).unwrap();

        self.builder.position_at_end(body_bb);
        self.loop_targets.push((cond_bb, exit_bb));
        self.gen_statement(body);
        self.loop_targets.pop();
        if !self.current_block_has_terminator() {
            self.builder.build_unconditional_branch(cond_bb).unwrap();
        }

        self.builder.position_at_end(exit_bb);
    }
}
