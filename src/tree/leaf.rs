use super::{RouterError, Tree};

use crate::pattern::PatternKind;

use std::borrow::Cow;
use std::fmt;

use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafId(usize);

impl LeafId {
    #[inline]
    pub(super) fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub(super) fn index(self) -> usize {
        self.0
    }
}

/// A terminal route pattern inside a [`Tree`].
pub struct Leaf<'t, T> {
    tree: &'t Tree<T>,
    id: LeafId,
}

impl<'t, T> Leaf<'t, T> {
    pub(super) fn new(tree: &'t Tree<T>, id: LeafId) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> LeafId {
        self.id
    }

    pub fn data(&self) -> &'t T {
        &self.tree.leaves[self.id.index()].data
    }

    pub fn kind(&self) -> PatternKind {
        self.tree.leaves[self.id.index()].pattern.kind()
    }

    /// The last segment of the pattern as it was registered.
    pub fn segment(&self) -> &'t str {
        self.tree.leaves[self.id.index()].pattern.text()
    }

    pub fn wildcards(&self) -> impl Iterator<Item = &'t str> + 't {
        self.tree.leaves[self.id.index()]
            .pattern
            .wildcards()
            .iter()
            .map(|w| &**w)
    }

    /// The full pattern with regular expressions removed, e.g. `/users/:id`.
    pub fn raw_pattern(&self) -> String {
        let leaf = &self.tree.leaves[self.id.index()];
        let mut parts: SmallVec<[&str; 8]> = SmallVec::new();
        parts.push(leaf.pattern.raw());
        let mut node = Some(leaf.parent);
        while let Some(n) = node {
            let tree_node = &self.tree.nodes[n];
            parts.push(tree_node.raw());
            node = tree_node.parent;
        }
        parts.reverse();
        parts.join("/")
    }

    /// Builds the path of this route from `(wildcard, value)` pairs.
    ///
    /// A name without sigil is looked up as `:name`. Panics on an empty name
    /// or value.
    pub fn url_path(&self, pairs: &[(&str, &str)]) -> String {
        match self.try_url_path(pairs) {
            Ok(url) => url,
            Err(e) => panic!("{}: pattern = {:?}", e, self.raw_pattern()),
        }
    }

    pub fn try_url_path(&self, pairs: &[(&str, &str)]) -> Result<String, RouterError> {
        let mut url = self.raw_pattern();
        for (index, &(name, value)) in pairs.iter().enumerate() {
            if name.is_empty() || value.is_empty() {
                return Err(RouterError::InvalidUrlPair { index });
            }
            let token: Cow<'_, str> = if name.starts_with(':') || name == "*" || name == "*.*" {
                Cow::Borrowed(name)
            } else {
                Cow::Owned(format!(":{}", name))
            };
            if let Some(at) = find_token(&url, &token) {
                url.replace_range(at..at + token.len(), value);
            }
        }
        Ok(url)
    }
}

/// Finds `token` as a whole placeholder, so `:id` never hits `:idx`.
fn find_token(url: &str, token: &str) -> Option<usize> {
    if !token.starts_with(':') {
        return url.find(token);
    }
    url.match_indices(token)
        .map(|(at, _)| at)
        .find(|&at| match url[at + token.len()..].chars().next() {
            Some(c) => !(c.is_ascii_alphanumeric() || c == '_'),
            None => true,
        })
}

impl<T> Clone for Leaf<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Leaf<'_, T> {}

impl<T> PartialEq for Leaf<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<T> fmt::Debug for Leaf<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaf")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("pattern", &self.raw_pattern())
            .finish()
    }
}
