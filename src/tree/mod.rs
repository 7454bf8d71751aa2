mod core;
mod error;
mod imp;
mod leaf;
mod params;

pub(crate) use self::core::validate;
pub use self::error::RouterError;
pub use self::imp::match_test;
pub use self::leaf::{Leaf, LeafId};
pub use self::params::Params;

use crate::pattern::{Matcher, Pattern, PatternKind};

/// A routing trie for a single HTTP method.
///
/// Every node owns one path segment. Child trees and leaves are kept sorted by
/// [`PatternKind`], so the first match found while walking a node is the most
/// specific one. Nodes live in one arena and point at their parent by index.
#[derive(Debug)]
pub struct Tree<T> {
    nodes: Vec<Node>,
    leaves: Vec<LeafNode<T>>,
}

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug)]
struct Node {
    pattern: Option<Pattern>,
    parent: Option<NodeId>,
    subtrees: Vec<NodeId>,
    leaves: Vec<LeafId>,
}

#[derive(Debug)]
struct LeafNode<T> {
    pattern: Pattern,
    parent: NodeId,
    data: T,
}

impl Node {
    fn root() -> Self {
        Self {
            pattern: None,
            parent: None,
            subtrees: Vec::new(),
            leaves: Vec::new(),
        }
    }

    fn text(&self) -> &str {
        self.pattern.as_ref().map_or("", Pattern::text)
    }

    fn raw(&self) -> &str {
        self.pattern.as_ref().map_or("", Pattern::raw)
    }

    fn kind(&self) -> PatternKind {
        self.pattern.as_ref().map_or(PatternKind::Static, Pattern::kind)
    }

    fn matcher(&self) -> Option<&Matcher> {
        self.pattern.as_ref().map(Pattern::matcher)
    }
}
