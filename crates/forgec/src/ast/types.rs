use langtools::tree::{DebugFormatter, NodeId};

use super::Payload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicTypeKind {
    Bool,
    Void,
    Isize,
    Usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithBitWidth {
    pub signed: bool,
    pub float: bool,
    pub width: u32,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub resolved: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct StructuredMember {
    pub name: String,
    pub member_type: NodeId,
}

#[derive(Debug, Clone)]
pub struct FunctionType {
    pub return_type: NodeId,
    pub arg_types: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub enum Type {
    Basic(BasicTypeKind),
    WithBitWidth(WithBitWidth),
    Symbol(Symbol),
    Pointer(NodeId),
    Function(FunctionType),
    Structured(Vec<StructuredMember>),
}

impl Type {
    pub fn i32_type() -> Self {
        Type::WithBitWidth(WithBitWidth {
            signed: true,
            float: false,
            width: 32,
        })
    }

    pub fn f64_type() -> Self {
        Type::WithBitWidth(WithBitWidth {
            signed: true,
            float: true,
            width: 64,
        })
    }

    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Type::Basic(_) | Type::WithBitWidth(_) | Type::Symbol(_) => Vec::new(),
            Type::Pointer(inner) => vec![*inner],
            Type::Function(f) => {
                let mut out = f.arg_types.clone();
                out.push(f.return_type);
                out
            }
            Type::Structured(members) => members.iter().map(|m| m.member_type).collect(),
        }
    }

    pub fn compare(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Basic(a), Type::Basic(b)) => a == b,
            (Type::WithBitWidth(a), Type::WithBitWidth(b)) => a == b,
            (Type::Symbol(a), Type::Symbol(b)) => a.name == b.name,
            (Type::Pointer(_), Type::Pointer(_)) => true,
            (Type::Function(_), Type::Function(_)) => true,
            (Type::Structured(a), Type::Structured(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.name == y.name)
            }
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
        match self {
            Type::Basic(_) | Type::WithBitWidth(_) | Type::Symbol(_) => {}
            Type::Pointer(inner) => replace(inner),
            Type::Function(f) => {
                for a in f.arg_types.iter_mut() {
                    replace(a);
                }
                replace(&mut f.return_type);
            }
            Type::Structured(members) => {
                for m in members.iter_mut() {
                    replace(&mut m.member_type);
                }
            }
        }
    }

    pub fn fmt_fields(&self, f: &mut DebugFormatter<'_, Payload>) {
        match self {
            Type::Basic(k) => f.field("kind", format!("{k:?}")),
            Type::WithBitWidth(w) => {
                f.field("signed", w.signed);
                f.field("float", w.float);
                f.field("width", w.width);
            }
            Type::Symbol(s) => f.field("name", &s.name),
            Type::Pointer(inner) => f.field_node("element", *inner),
            Type::Function(func) => {
                f.field_nodes("arg_types", &func.arg_types);
                f.field_node("return_type", func.return_type);
            }
            Type::Structured(members) => {
                for m in members {
                    f.field(&m.name, "member");
                    f.field_node("type", m.member_type);
                }
            }
        }
    }

    pub fn referenced_symbol_name(&self) -> Option<&str> {
        match self {
            Type::Symbol(s) => Some(s.name.as_str()),
            _ => None,
        }
    }

    pub fn resolved_reference(&self) -> Option<NodeId> {
        match self {
            Type::Symbol(s) => s.resolved,
            _ => None,
        }
    }

    pub fn set_resolved_reference(&mut self, target: NodeId) {
        if let Type::Symbol(s) = self {
            s.resolved = Some(target);
        }
    }
}
