use langtools::scope::{Scope, ScopeFlags};
use langtools::tree::{DebugFormatter, NodeId};

use super::Payload;

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub is_const: bool,
    pub declared_type: Option<NodeId>,
    pub initial: Option<NodeId>,
    pub resolved_type: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<NodeId>,
    pub return_type: NodeId,
    pub body: Option<NodeId>,
    pub scope: Scope,
}

#[derive(Debug, Clone)]
pub struct TypeAlias {
    pub name: String,
    pub aliased_type: NodeId,
    pub explicit: bool,
}

#[derive(Debug, Clone)]
pub struct StructuredType {
    pub name: String,
    pub members: Vec<NodeId>,
    pub scope: Scope,
}

#[derive(Debug, Clone)]
pub struct Namespace {
    pub name: String,
    pub members: Vec<NodeId>,
    pub scope: Scope,
}

#[derive(Debug, Clone)]
pub enum Declaration {
    Variable(Variable),
    Function(Function),
    TypeAlias(TypeAlias),
    StructuredType(StructuredType),
    Namespace(Namespace),
}

impl Declaration {
    pub fn variable(name: impl Into<String>, is_const: bool, declared_type: Option<NodeId>, initial: Option<NodeId>) -> Self {
        Declaration::Variable(Variable {
            name: name.into(),
            is_const,
            declared_type,
            initial,
            resolved_type: None,
        })
    }

    pub fn function(name: impl Into<String>, return_type: NodeId) -> Self {
        Declaration::Function(Function {
            name: name.into(),
            parameters: Vec::new(),
            return_type,
            body: None,
            scope: Scope::new(ScopeFlags::PARAMETERS),
        })
    }

    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Declaration::Variable(v) => {
                let mut out = Vec::new();
                out.extend(v.declared_type);
                out.extend(v.initial);
                out
            }
            Declaration::Function(f) => {
                let mut out = f.parameters.clone();
                out.push(f.return_type);
                out.extend(f.body);
                out
            }
            Declaration::TypeAlias(t) => vec![t.aliased_type],
            Declaration::StructuredType(s) => s.members.clone(),
            Declaration::Namespace(n) => n.members.clone(),
        }
    }

    pub fn compare(&self, other: &Self) -> bool {
        match (self, other) {
            (Declaration::Variable(a), Declaration::Variable(b)) => a.name == b.name && a.is_const == b.is_const,
            (Declaration::Function(a), Declaration::Function(b)) => a.name == b.name,
            (Declaration::TypeAlias(a), Declaration::TypeAlias(b)) => a.name == b.name && a.explicit == b.explicit,
            (Declaration::StructuredType(a), Declaration::StructuredType(b)) => a.name == b.name,
            (Declaration::Namespace(a), Declaration::Namespace(b)) => a.name == b.name,
            _ => false,
        }
    }

    pub fn shallow_clone_reset(&self) -> Self {
        self.clone()
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
            Declaration::Variable(v) => {
                replace_opt(&mut v.declared_type);
                replace_opt(&mut v.initial);
            }
            Declaration::Function(f) => {
                for p in f.parameters.iter_mut() {
                    replace(p);
                }
                replace(&mut f.return_type);
                replace_opt(&mut f.body);
            }
            Declaration::TypeAlias(t) => replace(&mut t.aliased_type),
            Declaration::StructuredType(s) => {
                for m in s.members.iter_mut() {
                    replace(m);
                }
            }
            Declaration::Namespace(n) => {
                for m in n.members.iter_mut() {
                    replace(m);
                }
            }
        }
    }

    pub fn fmt_fields(&self, f: &mut DebugFormatter<'_, Payload>) {
        match self {
            Declaration::Variable(v) => {
                f.field("name", &v.name);
                f.field("const", v.is_const);
                f.field_node_opt("type", v.declared_type);
                f.field_node_opt("initial", v.initial);
            }
            Declaration::Function(func) => {
                f.field("name", &func.name);
                f.field_nodes("parameters", &func.parameters);
                f.field_node("return_type", func.return_type);
                f.field_node_opt("body", func.body);
            }
            Declaration::TypeAlias(t) => {
                f.field("name", &t.name);
                f.field("explicit", t.explicit);
                f.field_node("aliased_type", t.aliased_type);
            }
            Declaration::StructuredType(s) => {
                f.field("name", &s.name);
                f.field_nodes("members", &s.members);
            }
            Declaration::Namespace(n) => {
                f.field("name", &n.name);
                f.field_nodes("members", &n.members);
            }
        }
    }

    pub fn declared_symbol_name(&self) -> Option<&str> {
        Some(match self {
            Declaration::Variable(v) => v.name.as_str(),
            Declaration::Function(f) => f.name.as_str(),
            Declaration::TypeAlias(t) => t.name.as_str(),
            Declaration::StructuredType(s) => s.name.as_str(),
            Declaration::Namespace(n) => n.name.as_str(),
        })
    }

    pub fn scope(&self) -> Option<&Scope> {
        match self {
            Declaration::Function(f) => Some(&f.scope),
            Declaration::StructuredType(s) => Some(&s.scope),
            Declaration::Namespace(n) => Some(&n.scope),
            _ => None,
        }
    }

    pub fn scope_mut(&mut self) -> Option<&mut Scope> {
        match self {
            Declaration::Function(f) => Some(&mut f.scope),
            Declaration::StructuredType(s) => Some(&mut s.scope),
            Declaration::Namespace(n) => Some(&mut n.scope),
            _ => None,
        }
    }
}
