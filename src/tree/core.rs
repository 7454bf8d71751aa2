use super::leaf::LeafId;
use super::params::Params;
use super::{LeafNode, Node, NodeId, RouterError, Tree, ROOT};

use crate::decode::unescape;
use crate::pattern::{Matcher, Pattern, PatternKind};

use std::borrow::Cow;

use regex::Regex;

const SLASH: char = '/';
const OPTIONAL: char = '?';

impl<T: Clone> Tree<T> {
    pub(super) fn add(&mut self, pattern: &str, data: T) -> Result<LeafId, RouterError> {
        validate(pattern)?;
        let pattern = mark_last_optional(pattern);
        let pattern = trim_last_slash(&pattern);
        self.add_next_segment(ROOT, pattern, data)
    }

    fn add_next_segment(
        &mut self,
        node: NodeId,
        pattern: &str,
        data: T,
    ) -> Result<LeafId, RouterError> {
        let pattern = trim_first_slash(pattern);
        match pattern.find(SLASH) {
            None => self.add_leaf(node, pattern, data),
            Some(i) => self.add_subtree(node, &pattern[..i], &pattern[i + 1..], data),
        }
    }

    fn add_subtree(
        &mut self,
        node: NodeId,
        segment: &str,
        rest: &str,
        data: T,
    ) -> Result<LeafId, RouterError> {
        let nodes = &self.nodes;
        let existing = nodes[node]
            .subtrees
            .iter()
            .copied()
            .find(|&c| nodes[c].text() == segment);

        let child = match existing {
            Some(c) => c,
            None => {
                let pattern = Pattern::compile(segment)?;
                let pos = sorted_position(&self.nodes[node].subtrees, pattern.kind(), |c| {
                    self.nodes[c].kind()
                });
                let id = self.nodes.len();
                self.nodes.push(Node {
                    pattern: Some(pattern),
                    parent: Some(node),
                    subtrees: Vec::new(),
                    leaves: Vec::new(),
                });
                self.nodes[node].subtrees.insert(pos, id);
                id
            }
        };

        self.add_next_segment(child, rest, data)
    }

    fn add_leaf(&mut self, node: NodeId, segment: &str, data: T) -> Result<LeafId, RouterError> {
        let leaves = &self.leaves;
        let existing = self.nodes[node]
            .leaves
            .iter()
            .copied()
            .find(|id| leaves[id.index()].pattern.text() == segment);
        if let Some(id) = existing {
            return Ok(id);
        }

        let pattern = Pattern::compile(segment)?;

        // the same route without its last segment
        if pattern.is_optional() {
            match self.nodes[node].parent {
                Some(grand) => {
                    let parent_segment = self.nodes[node].text().to_owned();
                    self.add_leaf(grand, &parent_segment, data.clone())?;
                }
                None => {
                    self.add_leaf(node, "", data.clone())?;
                }
            }
        }

        let pos = sorted_position(&self.nodes[node].leaves, pattern.kind(), |id| {
            self.leaves[id.index()].pattern.kind()
        });
        let id = LeafId::new(self.leaves.len());
        self.leaves.push(LeafNode {
            pattern,
            parent: node,
            data,
        });
        self.nodes[node].leaves.insert(pos, id);

        Ok(id)
    }
}

impl<T> Tree<T> {
    pub(super) fn match_path(&self, path: &str, params: &mut Params) -> Option<LeafId> {
        let url = trim_last_slash(trim_first_slash(path));
        self.match_next_segment(ROOT, 0, url, params)
    }

    fn match_next_segment(
        &self,
        node: NodeId,
        glob: usize,
        url: &str,
        params: &mut Params,
    ) -> Option<LeafId> {
        match url.find(SLASH) {
            None => self.match_leaf(node, glob, url, params),
            Some(i) => self.match_subtree(node, glob, url, i, params),
        }
    }

    fn match_leaf(
        &self,
        node: NodeId,
        glob: usize,
        segment: &str,
        params: &mut Params,
    ) -> Option<LeafId> {
        let segment = unescape(segment).ok()?;
        for &id in &self.nodes[node].leaves {
            let matched = match self.leaves[id.index()].pattern.matcher() {
                Matcher::Static(lit) => **lit == *segment,
                Matcher::Regexp { regex, wildcards } => {
                    capture_regex(regex, wildcards, &segment, params)
                }
                Matcher::PathExt => {
                    capture_path_ext(&segment, params);
                    true
                }
                Matcher::Holder(name) => {
                    if segment.is_empty() {
                        false
                    } else {
                        params.push(&**name, &*segment);
                        true
                    }
                }
                Matcher::MatchAll => {
                    capture_match_all(glob, &segment, params);
                    true
                }
            };
            if matched {
                return Some(id);
            }
        }
        None
    }

    fn match_subtree(
        &self,
        node: NodeId,
        glob: usize,
        url: &str,
        split: usize,
        params: &mut Params,
    ) -> Option<LeafId> {
        let segment = unescape(&url[..split]).ok()?;
        let rest = &url[split + 1..];

        for &child in &self.nodes[node].subtrees {
            let mark = params.mark();
            let found = self.enter_subtree(child, glob, &segment, rest, params);
            if found.is_some() {
                return found;
            }
            params.rollback(mark);
        }

        // a trailing catch-all takes whatever the subtrees left over.
        // leaves are sorted by kind, so catch-alls sit at the end.
        let leaves = &self.nodes[node].leaves;
        let leaf = leaves.iter().rev().copied().find(|id| {
            matches!(
                self.leaves[id.index()].pattern.kind(),
                PatternKind::MatchAll | PatternKind::PathExt
            )
        })?;
        let remainder = unescape(url).ok()?;
        match self.leaves[leaf.index()].pattern.matcher() {
            Matcher::PathExt => capture_path_ext(&remainder, params),
            _ => capture_match_all(glob, &remainder, params),
        }
        Some(leaf)
    }

    fn enter_subtree(
        &self,
        child: NodeId,
        glob: usize,
        segment: &str,
        rest: &str,
        params: &mut Params,
    ) -> Option<LeafId> {
        match self.nodes[child].matcher()? {
            Matcher::Static(lit) => {
                if **lit != *segment {
                    return None;
                }
                self.match_next_segment(child, glob, rest, params)
            }
            Matcher::Regexp { regex, wildcards } => {
                if !capture_regex(regex, wildcards, segment, params) {
                    return None;
                }
                self.match_next_segment(child, glob, rest, params)
            }
            Matcher::Holder(name) => {
                if segment.is_empty() {
                    return None;
                }
                params.push(&**name, segment);
                self.match_next_segment(child, glob + 1, rest, params)
            }
            Matcher::MatchAll => {
                capture_match_all(glob, segment, params);
                self.match_next_segment(child, glob + 1, rest, params)
            }
            Matcher::PathExt => None,
        }
    }
}

/// Compiles every segment of `pattern` without touching any tree.
pub(crate) fn validate(pattern: &str) -> Result<(), RouterError> {
    let pattern = mark_last_optional(pattern);
    let body = trim_first_slash(trim_last_slash(&pattern));
    body.split(SLASH).try_for_each(|segment| Pattern::compile(segment).map(drop))
}

fn capture_regex(regex: &Regex, wildcards: &[Box<str>], text: &str, params: &mut Params) -> bool {
    let caps = match regex.captures(text) {
        Some(caps) => caps,
        None => return false,
    };
    if caps.len() - 1 != wildcards.len() {
        return false;
    }
    for (i, name) in wildcards.iter().enumerate() {
        let value = caps.get(i + 1).map_or("", |m| m.as_str());
        params.push(&**name, value);
    }
    true
}

fn capture_path_ext(text: &str, params: &mut Params) {
    match text.rfind('.') {
        Some(i) => {
            params.push(":path", &text[..i]);
            params.push(":ext", &text[i + 1..]);
        }
        None => params.push(":path", text),
    }
}

fn capture_match_all(glob: usize, text: &str, params: &mut Params) {
    params.push("*", text);
    params.push(glob_key(glob), text);
}

#[inline]
fn glob_key(glob: usize) -> String {
    format!("*{}", glob)
}

fn sorted_position<I: Copy>(
    list: &[I],
    kind: PatternKind,
    kind_of: impl Fn(I) -> PatternKind,
) -> usize {
    list.iter()
        .position(|&i| kind < kind_of(i))
        .unwrap_or_else(|| list.len())
}

/// Moves a whole-pattern `?` prefix onto the last segment:
/// `?/foo/:id` becomes `/foo/?:id`.
fn mark_last_optional(pattern: &str) -> Cow<'_, str> {
    if !pattern.starts_with(OPTIONAL) {
        return Cow::Borrowed(pattern);
    }
    let body = trim_last_slash(&pattern[1..]);
    let at = body.rfind(SLASH).map_or(0, |i| i + 1);
    if body[at..].starts_with(OPTIONAL) {
        return Cow::Borrowed(body);
    }
    let mut marked = String::with_capacity(body.len() + 1);
    marked.push_str(&body[..at]);
    marked.push(OPTIONAL);
    marked.push_str(&body[at..]);
    Cow::Owned(marked)
}

#[inline]
fn trim_first_slash(s: &str) -> &str {
    if s.starts_with(SLASH) {
        &s[1..]
    } else {
        s
    }
}

#[inline]
fn trim_last_slash(s: &str) -> &str {
    if s.ends_with(SLASH) {
        &s[..s.len() - 1]
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::mark_last_optional;

    #[test]
    fn optional_prefix_moves_to_last_segment() {
        assert_eq!(mark_last_optional("?/foo/:id"), "/foo/?:id");
        assert_eq!(mark_last_optional("?/foo/:id/"), "/foo/?:id");
        assert_eq!(mark_last_optional("?/foo/?:id"), "/foo/?:id");
        assert_eq!(mark_last_optional("?:id"), "?:id");
        assert_eq!(mark_last_optional("/foo/:id"), "/foo/:id");
    }
}
