//! Compilation of a single pattern segment.
//!
//! A segment is one `/`-delimited piece of a route pattern. It compiles into a
//! [`Pattern`]: the matcher used at request time, plus the raw text used to
//! rebuild URLs.

use crate::tree::RouterError;

use std::fmt;

use regex::Regex;
use smallvec::SmallVec;
use tracing::trace;

const COLON: char = ':';
const OPTIONAL: char = '?';

const MATCH_ALL: &str = "*";
const PATH_EXT: &str = "*.*";

const HOLDER_REGEX: &str = "(.+)";
const INT_SUFFIX: &str = ":int";
const INT_REGEX: &str = "([0-9]+)";
const STRING_SUFFIX: &str = ":string";
const STRING_REGEX: &str = r"([\w]+)";

/// Matching precedence, from the most specific to the least.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternKind {
    Static,
    Regexp,
    PathExt,
    Holder,
    MatchAll,
}

#[derive(Debug)]
pub(crate) enum Matcher {
    Static(Box<str>),
    Regexp {
        regex: Regex,
        wildcards: Box<[Box<str>]>,
    },
    PathExt,
    Holder(Box<str>),
    MatchAll,
}

#[derive(Debug)]
pub(crate) struct Pattern {
    text: Box<str>,
    raw: Box<str>,
    optional: bool,
    matcher: Matcher,
}

impl Pattern {
    pub(crate) fn compile(text: &str) -> Result<Self, RouterError> {
        let optional = text.starts_with(OPTIONAL);
        let body = text.trim_start_matches(OPTIONAL);
        let raw = raw_pattern(body);

        let matcher = if body == MATCH_ALL {
            Matcher::MatchAll
        } else if body == PATH_EXT {
            Matcher::PathExt
        } else if body.contains(COLON) {
            let (source, mut wildcards) = extract_wildcards(body);
            if source == HOLDER_REGEX && wildcards.len() == 1 {
                Matcher::Holder(wildcards.remove(0))
            } else {
                let anchored = format!("^(?:{})$", source);
                let regex = Regex::new(&anchored).map_err(|source| RouterError::InvalidRegex {
                    segment: text.to_owned(),
                    source,
                })?;
                Matcher::Regexp {
                    regex,
                    wildcards: wildcards.into_vec().into_boxed_slice(),
                }
            }
        } else {
            Matcher::Static(body.into())
        };

        let pattern = Self {
            text: text.into(),
            raw: raw.into(),
            optional,
            matcher,
        };
        trace!(segment = text, kind = ?pattern.kind(), "compiled pattern segment");
        Ok(pattern)
    }

    pub(crate) fn kind(&self) -> PatternKind {
        match self.matcher {
            Matcher::Static(_) => PatternKind::Static,
            Matcher::Regexp { .. } => PatternKind::Regexp,
            Matcher::PathExt => PatternKind::PathExt,
            Matcher::Holder(_) => PatternKind::Holder,
            Matcher::MatchAll => PatternKind::MatchAll,
        }
    }

    /// Segment text exactly as registered, including a leading `?`.
    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn raw(&self) -> &str {
        &self.raw
    }

    pub(crate) fn is_optional(&self) -> bool {
        self.optional
    }

    pub(crate) fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub(crate) fn wildcards(&self) -> &[Box<str>] {
        match self.matcher {
            Matcher::Regexp { ref wildcards, .. } => wildcards,
            Matcher::Holder(ref name) => std::slice::from_ref(name),
            _ => &[],
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[inline]
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Finds the next `:name` token, returning its byte range.
fn next_wildcard(s: &str) -> Option<(usize, usize)> {
    let mut from = 0;
    while let Some(i) = s[from..].find(COLON) {
        let start = from + i;
        let name_len = s[start + 1..]
            .find(|c: char| !is_name_char(c))
            .unwrap_or(s.len() - start - 1);
        if name_len > 0 {
            return Some((start, start + 1 + name_len));
        }
        from = start + 1;
    }
    None
}

/// Replaces every wildcard token with its capture regex.
fn extract_wildcards(pattern: &str) -> (String, SmallVec<[Box<str>; 2]>) {
    let mut source = String::with_capacity(pattern.len() + 8);
    let mut wildcards: SmallVec<[Box<str>; 2]> = SmallVec::new();
    let mut rest = pattern;

    while let Some((start, end)) = next_wildcard(rest) {
        source.push_str(&rest[..start]);
        let name = &rest[start..end];
        let after = &rest[end..];
        wildcards.push(name.into());

        if name == INT_SUFFIX {
            source.push_str(INT_REGEX);
            rest = after;
        } else if name == STRING_SUFFIX {
            source.push_str(STRING_REGEX);
            rest = after;
        } else if after.starts_with('(') {
            // explicit group stays in the text
            rest = after;
        } else if after.starts_with(INT_SUFFIX) {
            source.push_str(INT_REGEX);
            rest = &after[INT_SUFFIX.len()..];
        } else if after.starts_with(STRING_SUFFIX) {
            source.push_str(STRING_REGEX);
            rest = &after[STRING_SUFFIX.len()..];
        } else {
            source.push_str(HOLDER_REGEX);
            rest = after;
        }
    }
    source.push_str(rest);

    (source, wildcards)
}

/// Strips typed suffixes and regex groups, keeping `:name` placeholders.
fn raw_pattern(pattern: &str) -> String {
    let mut raw = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some((_, end)) = next_wildcard(rest) {
        raw.push_str(&rest[..end]);
        let mut after = &rest[end..];
        if after.starts_with(INT_SUFFIX) {
            after = &after[INT_SUFFIX.len()..];
        } else if after.starts_with(STRING_SUFFIX) {
            after = &after[STRING_SUFFIX.len()..];
        }
        rest = after;
    }
    raw.push_str(rest);

    strip_groups(&raw)
}

fn strip_groups(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth: usize = 0;
    let mut escaped = false;
    for c in s.chars() {
        if depth > 0 {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            continue;
        }
        if c == '(' {
            depth = 1;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(text: &str) -> PatternKind {
        Pattern::compile(text).unwrap().kind()
    }

    #[test]
    fn classify_segments() {
        assert_eq!(kind("users"), PatternKind::Static);
        assert_eq!(kind("*"), PatternKind::MatchAll);
        assert_eq!(kind("*.*"), PatternKind::PathExt);
        assert_eq!(kind(":id"), PatternKind::Holder);
        assert_eq!(kind(":id:int"), PatternKind::Regexp);
        assert_eq!(kind(":int"), PatternKind::Regexp);
        assert_eq!(kind(r":id([0-9]+)"), PatternKind::Regexp);
        assert_eq!(kind(":name.html"), PatternKind::Regexp);
        assert_eq!(kind("?:id"), PatternKind::Holder);
    }

    #[test]
    fn precedence_order() {
        assert!(PatternKind::Static < PatternKind::Regexp);
        assert!(PatternKind::Regexp < PatternKind::PathExt);
        assert!(PatternKind::PathExt < PatternKind::Holder);
        assert!(PatternKind::Holder < PatternKind::MatchAll);
    }

    #[test]
    fn wildcards_in_order() {
        let p = Pattern::compile(r":year([0-9]{4})-:month:int-:slug").unwrap();
        let names: Vec<&str> = p.wildcards().iter().map(|s| &**s).collect();
        assert_eq!(names, [":year", ":month", ":slug"]);
        match p.matcher() {
            Matcher::Regexp { regex, .. } => {
                let caps = regex.captures("2020-12-hello").unwrap();
                assert_eq!(&caps[1], "2020");
                assert_eq!(&caps[2], "12");
                assert_eq!(&caps[3], "hello");
            }
            other => panic!("unexpected matcher: {:?}", other),
        }
    }

    #[test]
    fn raw_keeps_placeholders() {
        let cases = [
            (r":id([0-9]+)", ":id"),
            (":id:int", ":id"),
            (":name:string", ":name"),
            (":int", ":int"),
            (":name.html", ":name.html"),
            (r"v:major(\d+(\.\d+)?)", "v:major"),
            ("?:id", ":id"),
            ("*.*", "*.*"),
            ("static", "static"),
        ];
        for &(text, raw) in cases.iter() {
            assert_eq!(Pattern::compile(text).unwrap().raw(), raw, "segment {:?}", text);
        }
    }

    #[test]
    fn optional_marker() {
        let p = Pattern::compile("?:id").unwrap();
        assert!(p.is_optional());
        assert_eq!(p.text(), "?:id");
        assert_eq!(p.wildcards().len(), 1);
        assert!(!Pattern::compile(":id").unwrap().is_optional());
    }

    #[test]
    fn typed_shorthand_is_anchored() {
        let p = Pattern::compile(":int").unwrap();
        match p.matcher() {
            Matcher::Regexp { regex, .. } => {
                assert!(regex.is_match("42"));
                assert!(!regex.is_match("abc"));
                assert!(!regex.is_match("a42"));
            }
            other => panic!("unexpected matcher: {:?}", other),
        }
    }

    #[test]
    fn invalid_regex() {
        let err = Pattern::compile(":id([0-9]+").unwrap_err();
        match err {
            RouterError::InvalidRegex { segment, .. } => assert_eq!(segment, ":id([0-9]+"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
