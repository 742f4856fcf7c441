//! Lexical scopes and generic symbol-name-to-declaration resolution.
//!
//! Grounded on the original's `scope.cpp`: a scope is an ordered map from
//! declared name to the declaring node, plus a small set of policy flags
//! that govern insertion (can a later declaration shadow an earlier one in
//! the same scope, can an inner scope shadow an outer one, does declaration
//! order matter for forward references).

use indexmap::IndexMap;

use crate::tree::NodeId;

/// Insertion/lookup policy for a single scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeFlags {
    /// If true, a name may be used before its declaring statement (module
    /// and struct-member scopes); if false, lookup only sees declarations
    /// that precede the reference (block scopes).
    pub unordered: bool,
    /// If true, redeclaring a name already present in the *same* scope
    /// replaces it instead of erroring.
    pub allow_shadowing_within: bool,
    /// If true, a name may be declared even if an *enclosing* scope already
    /// binds it.
    pub allow_shadowing_parent: bool,
}

impl ScopeFlags {
    pub const MODULE: ScopeFlags = ScopeFlags {
        unordered: true,
        allow_shadowing_within: false,
        allow_shadowing_parent: true,
    };

    pub const BLOCK: ScopeFlags = ScopeFlags {
        unordered: false,
        allow_shadowing_within: false,
        allow_shadowing_parent: true,
    };

    pub const PARAMETERS: ScopeFlags = ScopeFlags {
        unordered: false,
        allow_shadowing_within: false,
        allow_shadowing_parent: true,
    };
}

/// What went wrong inserting a name into a [`Scope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeInsertError {
    /// The name is already declared in this exact scope and
    /// `allow_shadowing_within` is false.
    AlreadyDeclaredInScope(NodeId),
}

/// One lexical scope: a flat, insertion-ordered name table plus the policy
/// flags that were used to build it.
#[derive(Debug, Clone)]
pub struct Scope {
    flags: ScopeFlags,
    entries: IndexMap<String, NodeId>,
}

impl Scope {
    pub fn new(flags: ScopeFlags) -> Self {
        Self {
            flags,
            entries: IndexMap::new(),
        }
    }

    pub fn flags(&self) -> ScopeFlags {
        self.flags
    }

    /// Declares `name` as bound to `declaration`. Fails if the name is
    /// already present in this scope and shadowing-within is disallowed;
    /// otherwise inserts (replacing any prior binding for the same name).
    pub fn declare(&mut self, name: &str, declaration: NodeId) -> Result<(), ScopeInsertError> {
        if let Some(existing) = self.entries.get(name) {
            if !self.flags.allow_shadowing_within {
                return Err(ScopeInsertError::AlreadyDeclaredInScope(*existing));
            }
        }
        self.entries.insert(name.to_string(), declaration);
        Ok(())
    }

    /// Looks up `name` directly in this scope, ignoring parents.
    pub fn get_local(&self, name: &str) -> Option<NodeId> {
        self.entries.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Resolves `name` by walking `scope_chain` from innermost (last element) to
/// outermost (first element), returning the first binding found. Scope
/// ordering (`unordered`) is enforced by the caller restricting which
/// declarations are visible before calling this, not by `Scope` itself,
/// since that requires knowing each node's position in its parent's
/// children, which only the tree has.
pub fn resolve_in_chain(scope_chain: &[&Scope], name: &str) -> Option<NodeId> {
    scope_chain
        .iter()
        .rev()
        .find_map(|scope| scope.get_local(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_then_lookup() {
        let mut scope = Scope::new(ScopeFlags::BLOCK);
        scope.declare("x", NodeId(1)).unwrap();
        assert_eq!(scope.get_local("x"), Some(NodeId(1)));
        assert_eq!(scope.get_local("y"), None);
    }

    #[test]
    fn redeclare_without_shadowing_within_errors() {
        let mut scope = Scope::new(ScopeFlags::BLOCK);
        scope.declare("x", NodeId(1)).unwrap();
        let err = scope.declare("x", NodeId(2)).unwrap_err();
        assert_eq!(err, ScopeInsertError::AlreadyDeclaredInScope(NodeId(1)));
    }

    #[test]
    fn chain_resolves_innermost_first() {
        let mut outer = Scope::new(ScopeFlags::MODULE);
        outer.declare("x", NodeId(1)).unwrap();
        let mut inner = Scope::new(ScopeFlags::BLOCK);
        inner.declare("x", NodeId(2)).unwrap();

        let chain = [&outer, &inner];
        assert_eq!(resolve_in_chain(&chain, "x"), Some(NodeId(2)));
    }
}
