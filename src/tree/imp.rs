use super::leaf::{Leaf, LeafId};
use super::params::Params;
use super::{Node, RouterError, Tree};

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::root()],
            leaves: Vec::new(),
        }
    }

    /// Number of leaves, optional variants included.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn leaf(&self, id: LeafId) -> Option<Leaf<'_, T>> {
        if id.index() < self.leaves.len() {
            Some(Leaf::new(self, id))
        } else {
            None
        }
    }

    /// Matches an escaped request path.
    pub fn find(&self, path: &str) -> Option<(Leaf<'_, T>, Params)> {
        let mut params = Params::new();
        let id = self.match_path(path, &mut params)?;
        params.dedup();
        Some((Leaf::new(self, id), params))
    }
}

impl<T: Clone> Tree<T> {
    pub fn insert(&mut self, pattern: &str, data: T) -> LeafId {
        match self.add(pattern, data) {
            Ok(id) => id,
            Err(e) => panic!("{}: pattern = {:?}", e, pattern),
        }
    }

    pub fn try_insert(&mut self, pattern: &str, data: T) -> Result<LeafId, RouterError> {
        self.add(pattern, data)
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reports whether `url` is matched by `pattern`.
pub fn match_test(pattern: &str, url: &str) -> bool {
    let mut tree: Tree<()> = Tree::new();
    tree.insert(pattern, ());
    tree.find(url).is_some()
}
