//! Generic tree-walking pass manager.
//!
//! A [`Pass`] owns an ordered list of [`Handler`]s and implements the tree
//! visitor itself: at every node it runs every handler's `on_enter`, then
//! recurses into children (unless told not to), then runs every handler's
//! `on_leave`. Handlers may substitute the node being visited; the manager
//! rewires the parent's owning edge to the replacement before continuing.

use crate::diagnostics::MessageContext;
use crate::tree::{NodeId, NodePayload, Tree};

/// Controls traversal after a handler runs on a node. Ordered by strength:
/// `Continue < DoNotTraverseChildren < Halt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandlerStatus {
    Continue,
    DoNotTraverseChildren,
    Halt,
}

/// What a handler's `on_enter`/`on_leave` callback reports: how the walk
/// should proceed, and an optional node to substitute for the one just
/// visited.
#[derive(Debug, Clone, Copy)]
pub struct HandlerOutput {
    pub status: HandlerStatus,
    pub replacement: Option<NodeId>,
}

impl HandlerOutput {
    pub fn cont() -> Self {
        Self {
            status: HandlerStatus::Continue,
            replacement: None,
        }
    }

    pub fn status(status: HandlerStatus) -> Self {
        Self {
            status,
            replacement: None,
        }
    }

    pub fn replace_with(node: NodeId) -> Self {
        Self {
            status: HandlerStatus::Continue,
            replacement: Some(node),
        }
    }
}

/// A read-only view of ancestor node ids, root first, immediate parent last.
#[derive(Debug, Default)]
pub struct AncestorStack(Vec<NodeId>);

impl AncestorStack {
    fn new() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.0
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.0.last().copied()
    }

    fn push(&mut self, node: NodeId) {
        self.0.push(node);
    }

    fn pop(&mut self) {
        self.0.pop();
    }
}

/// One rewrite rule applied during a pass. `Ctx` is the language-specific
/// shared state threaded through the walk (e.g. the active scope stack, or
/// the type table); both callbacks default to a no-op `Continue`, so a
/// handler that only cares about one of enter/leave need not implement the
/// other.
pub trait Handler<P: NodePayload, Ctx> {
    fn on_enter(
        &mut self,
        tree: &mut Tree<P>,
        node: NodeId,
        ancestors: &AncestorStack,
        ctx: &mut Ctx,
        messages: &mut MessageContext,
    ) -> HandlerOutput {
        let _ = (tree, node, ancestors, ctx, messages);
        HandlerOutput::cont()
    }

    fn on_leave(
        &mut self,
        tree: &mut Tree<P>,
        node: NodeId,
        ancestors: &AncestorStack,
        ctx: &mut Ctx,
        messages: &mut MessageContext,
    ) -> HandlerOutput {
        let _ = (tree, node, ancestors, ctx, messages);
        HandlerOutput::cont()
    }
}

fn strongest(a: HandlerStatus, b: HandlerStatus) -> HandlerStatus {
    if b > a {
        b
    } else {
        a
    }
}

/// A named group of handlers walked together over one tree in one
/// traversal.
pub struct Pass<P: NodePayload, Ctx> {
    pub name: &'static str,
    handlers: Vec<Box<dyn Handler<P, Ctx>>>,
}

impl<P: NodePayload, Ctx> Pass<P, Ctx> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handlers: Vec::new(),
        }
    }

    pub fn with_handler(mut self, handler: impl Handler<P, Ctx> + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Runs enter or leave callbacks for every handler at `node`, in order.
    /// Statuses combine by taking the strongest; the first handler to
    /// provide a replacement wins, and every handler after it observes the
    /// replacement rather than the original node.
    fn run_callbacks(
        &mut self,
        tree: &mut Tree<P>,
        mut node: NodeId,
        ancestors: &AncestorStack,
        ctx: &mut Ctx,
        messages: &mut MessageContext,
        enter: bool,
    ) -> (HandlerStatus, NodeId) {
        let mut status = HandlerStatus::Continue;
        for handler in self.handlers.iter_mut() {
            let output = if enter {
                handler.on_enter(tree, node, ancestors, ctx, messages)
            } else {
                handler.on_leave(tree, node, ancestors, ctx, messages)
            };
            if let Some(replacement) = output.replacement {
                node = replacement;
            }
            status = strongest(status, output.status);
            if status == HandlerStatus::Halt {
                break;
            }
        }
        (status, node)
    }

    /// Walks `root` depth-first, pre-order, running every handler at each
    /// node. Returns `(final_root_id, completed)`: `final_root_id` is
    /// `root` unless a handler substituted the root itself; `completed` is
    /// `false` if some handler halted the walk.
    pub fn run(
        &mut self,
        tree: &mut Tree<P>,
        root: NodeId,
        ctx: &mut Ctx,
        messages: &mut MessageContext,
    ) -> (NodeId, bool) {
        let mut ancestors = AncestorStack::new();
        self.visit(tree, root, &mut ancestors, ctx, messages)
    }

    fn visit(
        &mut self,
        tree: &mut Tree<P>,
        node: NodeId,
        ancestors: &mut AncestorStack,
        ctx: &mut Ctx,
        messages: &mut MessageContext,
    ) -> (NodeId, bool) {
        let (enter_status, node) = self.run_callbacks(tree, node, ancestors, ctx, messages, true);
        if enter_status == HandlerStatus::Halt {
            return (node, false);
        }

        if enter_status != HandlerStatus::DoNotTraverseChildren {
            ancestors.push(node);
            let children = tree.get(node).payload.children();
            for child in children {
                let (new_child, completed) = self.visit(tree, child, ancestors, ctx, messages);
                if new_child != child {
                    tree.get_mut(node).payload.rewire(child, new_child);
                }
                if !completed {
                    ancestors.pop();
                    return (node, false);
                }
            }
            ancestors.pop();
        }

        let (leave_status, node) = self.run_callbacks(tree, node, ancestors, ctx, messages, false);
        (node, leave_status != HandlerStatus::Halt)
    }
}

/// Runs an ordered sequence of named passes over the same tree and shared
/// context, stopping at the first pass that leaves any error-or-worse
/// message in `messages`.
pub struct PassManager<P: NodePayload, Ctx> {
    passes: Vec<Pass<P, Ctx>>,
}

impl<P: NodePayload, Ctx> PassManager<P, Ctx> {
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    pub fn with_pass(mut self, pass: Pass<P, Ctx>) -> Self {
        self.passes.push(pass);
        self
    }

    /// Runs every pass in order over `root`, threading the (possibly
    /// replaced) root id from one pass into the next. Returns the name of
    /// the last pass that ran and the final root id.
    pub fn run(
        &mut self,
        tree: &mut Tree<P>,
        root: NodeId,
        ctx: &mut Ctx,
        messages: &mut MessageContext,
    ) -> (&'static str, NodeId) {
        let mut last = "none";
        let mut root = root;
        for pass in &mut self.passes {
            last = pass.name;
            let (new_root, _) = pass.run(tree, root, ctx, messages);
            root = new_root;
            if messages.has_errors() {
                break;
            }
        }
        (last, root)
    }
}

impl<P: NodePayload, Ctx> Default for PassManager<P, Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceRange;
    use crate::tree::{DebugFormatter, NodeKind};

    #[derive(Clone)]
    struct Counter(i64);

    impl NodePayload for Counter {
        fn children(&self) -> Vec<NodeId> {
            Vec::new()
        }
        fn compare(&self, other: &Self) -> bool {
            self.0 == other.0
        }
        fn shallow_clone_reset(&self) -> Self {
            self.clone()
        }
        fn rewire(&mut self, _old: NodeId, _new: NodeId) {}
        fn fmt_fields(&self, f: &mut DebugFormatter<'_, Self>) {
            f.field("value", self.0);
        }
    }

    struct Increment;
    impl Handler<Counter, i64> for Increment {
        fn on_enter(
            &mut self,
            tree: &mut Tree<Counter>,
            node: NodeId,
            _ancestors: &AncestorStack,
            ctx: &mut i64,
            _messages: &mut MessageContext,
        ) -> HandlerOutput {
            tree.get_mut(node).payload.0 += 1;
            *ctx += 1;
            HandlerOutput::cont()
        }
    }

    #[test]
    fn pass_visits_root_and_updates_context() {
        let mut tree: Tree<Counter> = Tree::new();
        let root = tree.insert(NodeKind("counter"), SourceRange::empty(), Counter(0));
        let mut messages = MessageContext::new();
        let mut ctx = 0i64;

        let mut pass = Pass::new("increment").with_handler(Increment);
        let (final_root, completed) = pass.run(&mut tree, root, &mut ctx, &mut messages);
        assert!(completed);
        assert_eq!(final_root, root);
        assert_eq!(tree.get(root).payload.0, 1);
        assert_eq!(ctx, 1);
    }

    struct HaltImmediately;
    impl Handler<Counter, i64> for HaltImmediately {
        fn on_enter(
            &mut self,
            _tree: &mut Tree<Counter>,
            _node: NodeId,
            _ancestors: &AncestorStack,
            _ctx: &mut i64,
            _messages: &mut MessageContext,
        ) -> HandlerOutput {
            HandlerOutput::status(HandlerStatus::Halt)
        }
    }

    #[test]
    fn halt_stops_traversal() {
        let mut tree: Tree<Counter> = Tree::new();
        let root = tree.insert(NodeKind("counter"), SourceRange::empty(), Counter(0));
        let mut messages = MessageContext::new();
        let mut ctx = 0i64;

        let mut pass = Pass::new("halt").with_handler(HaltImmediately).with_handler(Increment);
        let (_, completed) = pass.run(&mut tree, root, &mut ctx, &mut messages);
        assert!(!completed);
        assert_eq!(tree.get(root).payload.0, 0);
    }
}
