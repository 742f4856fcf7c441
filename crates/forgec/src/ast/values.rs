use langtools::tree::{DebugFormatter, NodeId};

use super::operators::{BinaryOperator, UnaryOperator};
use super::Payload;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberBits {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

#[derive(Debug, Clone)]
pub struct LiteralNumber {
    pub type_node: NodeId,
    pub bits: NumberBits,
}

#[derive(Debug, Clone)]
pub struct SymbolRef {
    pub name: String,
    pub resolved: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct UnaryValue {
    pub op: UnaryOperator,
    pub operand: NodeId,
}

#[derive(Debug, Clone)]
pub struct BinaryValue {
    pub op: BinaryOperator,
    pub lhs: NodeId,
    pub rhs: NodeId,
}

#[derive(Debug, Clone)]
pub struct CallValue {
    pub callee: NodeId,
    pub args: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct CastValue {
    pub value: NodeId,
    pub target_type: NodeId,
    /// `true` when inserted by the cast-insertion pass rather than written
    /// by the programmer, so codegen and debug-dumps can distinguish them
    /// if ever needed; currently informational only.
    pub implicit: bool,
}

#[derive(Debug, Clone)]
pub enum ValueKind {
    LiteralBool(bool),
    LiteralNumber(LiteralNumber),
    Symbol(SymbolRef),
    Unary(UnaryValue),
    Binary(BinaryValue),
    Call(CallValue),
    Cast(CastValue),
    /// The right-hand side of a `BinaryOperator::MemberAccess` node: a bare
    /// field name, not itself a symbol reference (it's resolved against the
    /// left-hand side's struct type, not a scope chain).
    MemberName(String),
}

/// A `Value` node: its concrete kind plus the two fields every value
/// acquires during type resolution. Monotonic once set — the
/// type-resolution pass never overwrites a `Some`.
#[derive(Debug, Clone)]
pub struct Value {
    pub kind: ValueKind,
    pub resolved_type: Option<NodeId>,
    pub is_assignable: bool,
}

impl Value {
    pub fn new(kind: ValueKind) -> Self {
        Self {
            kind,
            resolved_type: None,
            is_assignable: false,
        }
    }

    pub fn children(&self) -> Vec<NodeId> {
        match &self.kind {
            ValueKind::LiteralBool(_) => Vec::new(),
            ValueKind::LiteralNumber(n) => vec![n.type_node],
            ValueKind::Symbol(_) => Vec::new(),
            ValueKind::Unary(u) => vec![u.operand],
            ValueKind::Binary(b) => vec![b.lhs, b.rhs],
            ValueKind::Call(c) => {
                let mut out = vec![c.callee];
                out.extend(c.args.iter().copied());
                out
            }
            ValueKind::Cast(c) => vec![c.value, c.target_type],
            ValueKind::MemberName(_) => Vec::new(),
        }
    }

    pub fn compare(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (ValueKind::LiteralBool(a), ValueKind::LiteralBool(b)) => a == b,
            (ValueKind::LiteralNumber(a), ValueKind::LiteralNumber(b)) => a.bits == b.bits,
            (ValueKind::Symbol(a), ValueKind::Symbol(b)) => a.name == b.name,
            (ValueKind::Unary(a), ValueKind::Unary(b)) => a.op == b.op,
            (ValueKind::Binary(a), ValueKind::Binary(b)) => a.op == b.op,
            (ValueKind::Call(_), ValueKind::Call(_)) => true,
            (ValueKind::Cast(_), ValueKind::Cast(_)) => true,
            (ValueKind::MemberName(a), ValueKind::MemberName(b)) => a == b,
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
        match &mut self.kind {
            ValueKind::LiteralBool(_) | ValueKind::Symbol(_) => {}
            ValueKind::LiteralNumber(n) => replace(&mut n.type_node),
            ValueKind::Unary(u) => replace(&mut u.operand),
            ValueKind::Binary(b) => {
                replace(&mut b.lhs);
                replace(&mut b.rhs);
            }
            ValueKind::Call(c) => {
                replace(&mut c.callee);
                for a in c.args.iter_mut() {
                    replace(a);
                }
            }
            ValueKind::Cast(c) => {
                replace(&mut c.value);
                replace(&mut c.target_type);
            }
            ValueKind::MemberName(_) => {}
        }
        if self.resolved_type == Some(old) {
            self.resolved_type = Some(new);
        }
    }

    pub fn fmt_fields(&self, f: &mut DebugFormatter<'_, Payload>) {
        match &self.kind {
            ValueKind::LiteralBool(b) => f.field("value", b),
            ValueKind::LiteralNumber(n) => {
                f.field("bits", format!("{:?}", n.bits));
                f.field_node("type", n.type_node);
            }
            ValueKind::Symbol(s) => f.field("name", &s.name),
            ValueKind::Unary(u) => {
                f.field("op", format!("{:?}", u.op));
                f.field_node("operand", u.operand);
            }
            ValueKind::Binary(b) => {
                f.field("op", format!("{:?}", b.op));
                f.field_node("lhs", b.lhs);
                f.field_node("rhs", b.rhs);
            }
            ValueKind::Call(c) => {
                f.field_node("callee", c.callee);
                f.field_nodes("args", &c.args);
            }
            ValueKind::Cast(c) => {
                f.field("implicit", c.implicit);
                f.field_node("value", c.value);
                f.field_node("target_type", c.target_type);
            }
            ValueKind::MemberName(name) => f.field("member", name),
        }
        f.field_node_opt("resolved_type", self.resolved_type);
        f.field("is_assignable", self.is_assignable);
    }

    pub fn referenced_symbol_name(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Symbol(s) => Some(s.name.as_str()),
            _ => None,
        }
    }

    pub fn resolved_reference(&self) -> Option<NodeId> {
        match &self.kind {
            ValueKind::Symbol(s) => s.resolved,
            _ => None,
        }
    }

    pub fn set_resolved_reference(&mut self, target: NodeId) {
        if let ValueKind::Symbol(s) = &mut self.kind {
            s.resolved = Some(target);
        }
    }
}
