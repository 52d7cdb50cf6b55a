//! Constituency tree representation
//!
//! A [`ParseTree`] is a labeled node whose children are either subtrees or
//! leaf words. Nodes whose children are all leaves are *preterminals*; their
//! label is the slot the span/tag merger rewrites.

/// A child of a [`ParseTree`] node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Tree(ParseTree),
    Leaf(String),
}

impl Child {
    pub fn leaf(word: impl Into<String>) -> Self {
        Child::Leaf(word.into())
    }

    pub fn as_tree(&self) -> Option<&ParseTree> {
        match self {
            Child::Tree(t) => Some(t),
            Child::Leaf(_) => None,
        }
    }
}

impl From<ParseTree> for Child {
    fn from(tree: ParseTree) -> Self {
        Child::Tree(tree)
    }
}

/// A labeled phrase-structure tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    label: String,
    children: Vec<Child>,
}

impl ParseTree {
    pub fn new(label: impl Into<String>, children: Vec<Child>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// A preterminal node `(label word)`.
    pub fn preterminal(label: impl Into<String>, word: impl Into<String>) -> Self {
        Self::new(label, vec![Child::leaf(word)])
    }

    /// An internal node over subtrees.
    pub fn node(label: impl Into<String>, subtrees: Vec<ParseTree>) -> Self {
        Self::new(label, subtrees.into_iter().map(Child::Tree).collect())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// `true` when every child is a leaf (tree height 2).
    pub fn is_preterminal(&self) -> bool {
        !self.children.is_empty() && self.children.iter().all(|c| matches!(c, Child::Leaf(_)))
    }

    /// Leaf words, left to right.
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_pos(&mut |word, _| out.push(word));
        out
    }

    /// `(leaf, label of the leaf's parent)` pairs, left to right.
    pub fn pos(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        self.collect_pos(&mut |word, label| out.push((word, label)));
        out
    }

    fn collect_pos<'a>(&'a self, f: &mut impl FnMut(&'a str, &'a str)) {
        for child in &self.children {
            match child {
                Child::Tree(t) => t.collect_pos(f),
                Child::Leaf(w) => f(w.as_str(), self.label.as_str()),
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| match c {
                Child::Tree(t) => t.leaf_count(),
                Child::Leaf(_) => 1,
            })
            .sum()
    }

    /// Number of preterminal nodes.
    pub fn preterminal_count(&self) -> usize {
        self.subtrees().filter(|t| t.is_preterminal()).count()
    }

    /// All subtrees in pre-order, starting with `self`.
    pub fn subtrees(&self) -> Subtrees<'_> {
        Subtrees { stack: vec![self] }
    }

    /// Visit preterminals mutably in left-to-right (pre-order) order.
    pub fn for_each_preterminal_mut(&mut self, f: &mut impl FnMut(&mut ParseTree)) {
        if self.is_preterminal() {
            f(self);
            return;
        }
        for child in &mut self.children {
            if let Child::Tree(t) = child {
                t.for_each_preterminal_mut(f);
            }
        }
    }
}

/// Pre-order iterator over a tree's subtrees.
pub struct Subtrees<'a> {
    stack: Vec<&'a ParseTree>,
}

impl<'a> Iterator for Subtrees<'a> {
    type Item = &'a ParseTree;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.stack.pop()?;
        self.stack
            .extend(tree.children.iter().rev().filter_map(Child::as_tree));
        Some(tree)
    }
}
