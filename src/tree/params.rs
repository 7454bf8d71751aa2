use std::collections::HashMap;
use std::ops::Deref;
use std::str::FromStr;

use smallvec::SmallVec;

/// Values captured while matching a path, keyed by wildcard name.
///
/// Keys keep their sigil: `":id"`, `"*"`, `"*0"`, `":path"`, `":ext"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    buf: SmallVec<[(String, String); 4]>,
}

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.buf
            .iter()
            .rev()
            .find_map(|(k, v)| if name == k { Some(v.as_str()) } else { None })
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        self.get(name).map(T::from_str)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.buf.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.buf.into_iter().collect()
    }
}

impl Deref for Params {
    type Target = [(String, String)];
    fn deref(&self) -> &Self::Target {
        &*self.buf
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = smallvec::IntoIter<[(String, String); 4]>;
    fn into_iter(self) -> Self::IntoIter {
        self.buf.into_iter()
    }
}

impl Params {
    pub(crate) fn new() -> Self {
        Self {
            buf: SmallVec::new(),
        }
    }

    pub(crate) fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.buf.push((name.into(), value.into()))
    }

    /// Position to roll back to when a branch fails.
    #[inline]
    pub(crate) fn mark(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub(crate) fn rollback(&mut self, mark: usize) {
        self.buf.truncate(mark)
    }

    /// Drops shadowed entries so that every key appears once, keeping the
    /// value that was captured last.
    pub(crate) fn dedup(&mut self) {
        let mut i = 0;
        while i < self.buf.len() {
            let shadowed = self.buf[i + 1..].iter().any(|(k, _)| *k == self.buf[i].0);
            if shadowed {
                self.buf.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_capture_wins() {
        let mut params = Params::new();
        params.push("*", "a");
        params.push(":id", "1");
        params.push("*", "b");
        assert_eq!(params.get("*"), Some("b"));
        params.dedup();
        assert_eq!(params.len(), 2);
        assert_eq!(&*params[0].0, ":id");
        assert_eq!(params.get("*"), Some("b"));
    }

    #[test]
    fn rollback_to_mark() {
        let mut params = Params::new();
        params.push(":a", "1");
        let mark = params.mark();
        params.push(":b", "2");
        params.rollback(mark);
        assert!(params.contains_key(":a"));
        assert!(!params.contains_key(":b"));
        assert_eq!(params.parse::<u32>(":a"), Some(Ok(1)));
    }
}
