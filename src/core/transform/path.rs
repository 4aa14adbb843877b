//! Ancestor tracking for the rewrite pass.
//!
//! swc nodes carry no parent links, so the transformer keeps an explicit
//! stack of the syntactic kinds it is currently inside. Only kinds that
//! some placement or skip rule asks about get their own variant; every
//! other expression level is [`NodeKind::Other`]. Parentheses push nothing.

/// Syntactic kind of an enclosing node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    JsxAttr,
    JsxElement,
    ImportDecl,
    Other,
}

/// Stack of enclosing node kinds, innermost last.
#[derive(Debug, Default)]
pub struct Ancestry {
    stack: Vec<NodeKind>,
}

impl Ancestry {
    pub fn push(&mut self, kind: NodeKind) {
        self.stack.push(kind);
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// The `n`th ancestor, where 1 is the direct parent.
    pub fn nth(&self, n: usize) -> Option<NodeKind> {
        if n == 0 {
            return None;
        }
        self.stack.len().checked_sub(n).map(|i| self.stack[i])
    }

    pub fn parent(&self) -> Option<NodeKind> {
        self.nth(1)
    }

    /// True if any ancestor is `kind`.
    pub fn any(&self, kind: NodeKind) -> bool {
        self.stack.contains(&kind)
    }
}
