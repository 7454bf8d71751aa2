use super::KNOWN_METHODS;
use crate::tree::LeafId;

use std::collections::HashMap;

use http::Method;
use parking_lot::RwLock;

/// Registration ledger: `(method, literal pattern) -> leaf`.
///
/// The first registration of a key wins. Literal request paths are looked up
/// here before walking a tree.
#[derive(Debug)]
pub(crate) struct RouteMap {
    routes: RwLock<HashMap<Method, HashMap<Box<str>, LeafId>>>,
}

impl RouteMap {
    pub(crate) fn new() -> Self {
        let routes = KNOWN_METHODS
            .iter()
            .map(|m| (m.clone(), HashMap::new()))
            .collect();
        Self {
            routes: RwLock::new(routes),
        }
    }

    /// Returns `false` if the key was already present.
    pub(crate) fn add(&self, method: &Method, pattern: &str, leaf: LeafId) -> bool {
        let mut routes = self.routes.write();
        let inner = routes.entry(method.clone()).or_insert_with(HashMap::new);
        if inner.contains_key(pattern) {
            return false;
        }
        inner.insert(pattern.into(), leaf);
        true
    }

    pub(crate) fn get(&self, method: &Method, pattern: &str) -> Option<LeafId> {
        self.routes.read().get(method)?.get(pattern).copied()
    }

    pub(crate) fn contains(&self, method: &Method, pattern: &str) -> bool {
        self.get(method, pattern).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;

    #[test]
    fn first_registration_wins() {
        let mut tree: Tree<u8> = Tree::new();
        let a = tree.insert("/a", 1);
        let b = tree.insert("/b", 2);

        let map = RouteMap::new();
        assert!(map.add(&Method::GET, "/a", a));
        assert!(!map.add(&Method::GET, "/a", b));
        assert_eq!(map.get(&Method::GET, "/a"), Some(a));
        assert_eq!(map.get(&Method::POST, "/a"), None);
        assert!(map.contains(&Method::GET, "/a"));
        assert!(!map.contains(&Method::GET, "/b"));
    }
}
