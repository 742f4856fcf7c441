//! The Forge node catalogue: declarations, statements, types, values and
//! operators, unified behind a single [`Payload`] sum so the tree lives in
//! one `langtools::tree::Tree<Payload>` arena.
//!
//! LLVM-handle annotations are deliberately *not* stored on these payloads.
//! Threading the LLVM context's lifetime through every node would force
//! `Payload` (and therefore `Tree<Payload>`) to carry a `'ctx` parameter,
//! which defeats the point of the arena-of-indices scheme (see
//! `langtools::tree`): codegen instead keeps its own `NodeId`-keyed side
//! tables for the LLVM values/slots it produces per node. `compare` and
//! `clone` therefore never need to reset an LLVM field — there isn't one.

pub mod declarations;
pub mod operators;
pub mod statements;
pub mod types;
pub mod values;

use langtools::scope::Scope;
use langtools::tree::{DebugFormatter, NodeId, NodeKind, NodePayload};

pub use declarations::Declaration;
pub use statements::Statement;
pub use types::Type;
pub use values::Value;

pub mod kinds {
    use langtools::tree::NodeKind;

    pub const TRANSLATION_UNIT: NodeKind = NodeKind("translation-unit");

    pub const DECL_VARIABLE: NodeKind = NodeKind("decl-variable");
    pub const DECL_FUNCTION: NodeKind = NodeKind("decl-function");
    pub const DECL_TYPE_ALIAS: NodeKind = NodeKind("decl-type-alias");
    pub const DECL_STRUCTURED_TYPE: NodeKind = NodeKind("decl-structured-type");
    pub const DECL_NAMESPACE: NodeKind = NodeKind("decl-namespace");

    pub const STMT_CONTINUE: NodeKind = NodeKind("stmt-continue");
    pub const STMT_BREAK: NodeKind = NodeKind("stmt-break");
    pub const STMT_RETURN_VOID: NodeKind = NodeKind("stmt-return-void");
    pub const STMT_VALUE: NodeKind = NodeKind("stmt-value");
    pub const STMT_DECLARATION: NodeKind = NodeKind("stmt-declaration");
    pub const STMT_BLOCK: NodeKind = NodeKind("stmt-block");
    pub const STMT_IF: NodeKind = NodeKind("stmt-if");
    pub const STMT_WHILE: NodeKind = NodeKind("stmt-while");
    pub const STMT_RETURN: NodeKind = NodeKind("stmt-return");

    pub const TYPE_BASIC: NodeKind = NodeKind("type-basic");
    pub const TYPE_WITH_BIT_WIDTH: NodeKind = NodeKind("type-with-bit-width");
    pub const TYPE_SYMBOL: NodeKind = NodeKind("type-symbol");
    pub const TYPE_POINTER: NodeKind = NodeKind("type-pointer");
    pub const TYPE_FUNCTION: NodeKind = NodeKind("type-function");
    pub const TYPE_STRUCTURED: NodeKind = NodeKind("type-structured");

    pub const VALUE_LITERAL_BOOL: NodeKind = NodeKind("value-literal-bool");
    pub const VALUE_LITERAL_NUMBER: NodeKind = NodeKind("value-literal-number");
    pub const VALUE_SYMBOL: NodeKind = NodeKind("value-symbol");
    pub const VALUE_UNARY: NodeKind = NodeKind("value-unary");
    pub const VALUE_BINARY: NodeKind = NodeKind("value-binary");
    pub const VALUE_CALL: NodeKind = NodeKind("value-call");
    pub const VALUE_CAST: NodeKind = NodeKind("value-cast");
    pub const VALUE_MEMBER_NAME: NodeKind = NodeKind("value-member-name");
}

/// The root node of a parsed file: an `unordered` scope of top-level
/// declarations, enabling mutually-recursive functions and forward type
/// references.
#[derive(Debug, Clone)]
pub struct TranslationUnit {
    pub declarations: Vec<NodeId>,
    pub scope: Scope,
}

/// The closed sum of every node payload kind in the Forge grammar.
#[derive(Debug, Clone)]
pub enum Payload {
    TranslationUnit(TranslationUnit),
    Declaration(Declaration),
    Statement(Statement),
    Type(Type),
    Value(Value),
}

impl NodePayload for Payload {
    fn children(&self) -> Vec<NodeId> {
        match self {
            Payload::TranslationUnit(tu) => tu.declarations.clone(),
            Payload::Declaration(d) => d.children(),
            Payload::Statement(s) => s.children(),
            Payload::Type(t) => t.children(),
            Payload::Value(v) => v.children(),
        }
    }

    fn compare(&self, other: &Self) -> bool {
        match (self, other) {
            (Payload::TranslationUnit(_), Payload::TranslationUnit(_)) => true,
            (Payload::Declaration(a), Payload::Declaration(b)) => a.compare(b),
            (Payload::Statement(a), Payload::Statement(b)) => a.compare(b),
            (Payload::Type(a), Payload::Type(b)) => a.compare(b),
            (Payload::Value(a), Payload::Value(b)) => a.compare(b),
            _ => false,
        }
    }

    fn shallow_clone_reset(&self) -> Self {
        match self {
            Payload::TranslationUnit(tu) => Payload::TranslationUnit(TranslationUnit {
                declarations: tu.declarations.clone(),
                scope: Scope::new(tu.scope.flags()),
            }),
            Payload::Declaration(d) => Payload::Declaration(d.shallow_clone_reset()),
            Payload::Statement(s) => Payload::Statement(s.shallow_clone_reset()),
            Payload::Type(t) => Payload::Type(t.shallow_clone_reset()),
            Payload::Value(v) => Payload::Value(v.shallow_clone_reset()),
        }
    }

    fn rewire(&mut self, old: NodeId, new: NodeId) {
        match self {
            Payload::TranslationUnit(tu) => {
                for id in tu.declarations.iter_mut() {
                    if *id == old {
                        *id = new;
                    }
                }
            }
            Payload::Declaration(d) => d.rewire(old, new),
            Payload::Statement(s) => s.rewire(old, new),
            Payload::Type(t) => t.rewire(old, new),
            Payload::Value(v) => v.rewire(old, new),
        }
    }

    fn fmt_fields(&self, f: &mut DebugFormatter<'_, Self>) {
        match self {
            Payload::TranslationUnit(tu) => f.field_nodes("declarations", &tu.declarations),
            Payload::Declaration(d) => d.fmt_fields(f),
            Payload::Statement(s) => s.fmt_fields(f),
            Payload::Type(t) => t.fmt_fields(f),
            Payload::Value(v) => v.fmt_fields(f),
        }
    }

    fn declared_symbol_name(&self) -> Option<&str> {
        match self {
            Payload::Declaration(d) => d.declared_symbol_name(),
            _ => None,
        }
    }

    fn referenced_symbol_name(&self) -> Option<&str> {
        match self {
            Payload::Type(t) => t.referenced_symbol_name(),
            Payload::Value(v) => v.referenced_symbol_name(),
            _ => None,
        }
    }

    fn scope(&self) -> Option<&Scope> {
        match self {
            Payload::TranslationUnit(tu) => Some(&tu.scope),
            Payload::Declaration(d) => d.scope(),
            Payload::Statement(s) => s.scope(),
            _ => None,
        }
    }

    fn scope_mut(&mut self) -> Option<&mut Scope> {
        match self {
            Payload::TranslationUnit(tu) => Some(&mut tu.scope),
            Payload::Declaration(d) => d.scope_mut(),
            Payload::Statement(s) => s.scope_mut(),
            _ => None,
        }
    }

    fn resolved_reference(&self) -> Option<NodeId> {
        match self {
            Payload::Type(t) => t.resolved_reference(),
            Payload::Value(v) => v.resolved_reference(),
            _ => None,
        }
    }

    fn set_resolved_reference(&mut self, target: NodeId) {
        match self {
            Payload::Type(t) => t.set_resolved_reference(target),
            Payload::Value(v) => v.set_resolved_reference(target),
            _ => {}
        }
    }
}

pub fn insert_node(
    tree: &mut langtools::tree::Tree<Payload>,
    kind: NodeKind,
    range: langtools::source::SourceRange,
    payload: Payload,
) -> NodeId {
    tree.insert(kind, range, payload)
}
