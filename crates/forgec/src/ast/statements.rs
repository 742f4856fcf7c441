use langtools::scope::{Scope, ScopeFlags};
use langtools::tree::{DebugFormatter, NodeId};

use super::Payload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicKind {
    Continue,
    Break,
    ReturnVoid,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub statements: Vec<NodeId>,
    pub scope: Scope,
}

impl Block {
    pub fn new() -> Self {
        Self {
            statements: Vec::new(),
            scope: Scope::new(ScopeFlags::BLOCK),
        }
    }
}

#[derive(Debug, Clone)]
pub struct If {
    pub condition: NodeId,
    pub then_block: NodeId,
    /// Either another `Statement::If` (an `else if`) or a `Statement::Block`.
    pub else_branch: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct While {
    pub condition: NodeId,
    pub body: NodeId,
}

#[derive(Debug, Clone)]
pub struct Return {
    pub value: NodeId,
}

#[derive(Debug, Clone)]
pub enum Statement {
    Basic(BasicKind),
    Value(NodeId),
    Declaration(NodeId),
    Block(Block),
    If(If),
    While(While),
    Return(Return),
}

impl Statement {
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Statement::Basic(_) => Vec::new(),
            Statement::Value(v) => vec![*v],
            Statement::Declaration(d) => vec![*d],
            Statement::Block(b) => b.statements.clone(),
            Statement::If(i) => {
                let mut out = vec![i.condition, i.then_block];
                out.extend(i.else_branch);
                out
            }
            Statement::While(w) => vec![w.condition, w.body],
            Statement::Return(r) => vec![r.value],
        }
    }

    pub fn compare(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Statement::Basic(a), Statement::Basic(b)) if a == b
        ) || matches!(
            (self, other),
            (Statement::Value(_), Statement::Value(_))
                | (Statement::Declaration(_), Statement::Declaration(_))
                | (Statement::Block(_), Statement::Block(_))
                | (Statement::If(_), Statement::If(_))
                | (Statement::While(_), Statement::While(_))
                | (Statement::Return(_), Statement::Return(_))
        )
    }

    pub fn shallow_clone_reset(&self) -> Self {
        match self {
            Statement::Block(b) => Statement::Block(Block {
                statements: b.statements.clone(),
                scope: Scope::new(b.scope.flags()),
            }),
            other => other.clone(),
        }
    }

    pub fn rewire(&mut self, old: NodeId, new: NodeId) {
        let replace = |id: &mut NodeId| {
            if *id == old {
                *id = new;
            }
        };
        let replace_opt = |id: &mut Option<NodeId>| {
            if *id == Some(old) {
                *id = Some(new);
            }
        };
        match self {
            Statement::Basic(_) => {}
            Statement::Value(v) => replace(v),
            Statement::Declaration(d) => replace(d),
            Statement::Block(b) => {
                for s in b.statements.iter_mut() {
                    replace(s);
                }
            }
            Statement::If(i) => {
                replace(&mut i.condition);
                replace(&mut i.then_block);
                replace_opt(&mut i.else_branch);
            }
            Statement::While(w) => {
                replace(&mut w.condition);
                replace(&mut w.body);
            }
            Statement::Return(r) => replace(&mut r.value),
        }
    }

    pub fn fmt_fields(&self, f: &mut DebugFormatter<'_, Payload>) {
        match self {
            Statement::Basic(k) => f.field("kind", format!("{k:?}")),
            Statement::Value(v) => f.field_node("value", *v),
            Statement::Declaration(d) => f.field_node("declaration", *d),
            Statement::Block(b) => f.field_nodes("statements", &b.statements),
            Statement::If(i) => {
                f.field_node("condition", i.condition);
                f.field_node("then", i.then_block);
                f.field_node_opt("else", i.else_branch);
            }
            Statement::While(w) => {
                f.field_node("condition", w.condition);
                f.field_node("body", w.body);
            }
            Statement::Return(r) => f.field_node("value", r.value),
        }
    }

    pub fn scope(&self) -> Option<&Scope> {
        match self {
            Statement::Block(b) => Some(&b.scope),
            _ => None,
        }
    }

    pub fn scope_mut(&mut self) -> Option<&mut Scope> {
        match self {
            Statement::Block(b) => Some(&mut b.scope),
            _ => None,
        }
    }
}
