//! Route pattern grammar.
//!
//! A pattern is a literal path with `{name}` / `{name:regex}` placeholders and
//! an optional trailing block `[...]`, which may itself end with another
//! optional block: `/user/{id:\d+}[/{name}[/edit]]`.

mod wildcard;

pub use self::wildcard::Wildcards;

use crate::error::RouterError;

use regex::Regex;
use smallvec::SmallVec;

const SLASH: char = '/';
const OPEN_OPT: char = '[';
const CLOSE_OPT: char = ']';
const OPEN_VAR: char = '{';
const CLOSE_VAR: char = '}';
const SEP: char = ':';

/// Matches one non-empty path segment.
pub const DEFAULT_REGEX: &str = "[^/]+";

/// A concrete pattern translated into a regex.
#[derive(Debug, Clone)]
pub struct Compiled {
    regex: String,
    names: Vec<Box<str>>,
    // capture group index of each placeholder, local to `regex`
    slots: SmallVec<[usize; 8]>,
    groups: usize,
}

impl Compiled {
    /// Unanchored regex source.
    pub fn regex(&self) -> &str {
        &self.regex
    }

    /// Placeholder names in source order.
    pub fn names(&self) -> &[Box<str>] {
        &self.names
    }

    pub(crate) fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Number of capture groups in `regex`, including groups nested in
    /// placeholder regexes.
    pub fn groups(&self) -> usize {
        self.groups
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Var { name: &'a str, regex: Option<&'a str> },
}

/// Expands trailing optional blocks into concrete patterns, shortest first.
///
/// `/a[/b[/c]]` yields `/a`, `/a/b`, `/a/b/c`.
pub fn expand_optionals(pattern: &str) -> Result<Vec<String>, RouterError> {
    let trimmed = pattern.trim_end_matches(CLOSE_OPT);
    let closing = pattern.len() - trimmed.len();

    let mut segments: SmallVec<[&str; 4]> = SmallVec::new();
    let mut misplaced_close = false;
    let mut depth = 0_usize;
    let mut start = 0;

    for (i, c) in trimmed.char_indices() {
        match c {
            OPEN_VAR => depth += 1,
            CLOSE_VAR => depth = depth.saturating_sub(1),
            OPEN_OPT if depth == 0 => {
                segments.push(&trimmed[start..i]);
                start = i + c.len_utf8();
            }
            CLOSE_OPT if depth == 0 => misplaced_close = true,
            _ => {}
        }
    }
    segments.push(&trimmed[start..]);

    if closing != segments.len() - 1 {
        if misplaced_close {
            return Err(RouterError::OptionalSegmentsInMiddle(pattern.to_owned()));
        }
        return Err(RouterError::UnclosedOptionalSegments(pattern.to_owned()));
    }
    if misplaced_close {
        return Err(RouterError::OptionalSegmentsInMiddle(pattern.to_owned()));
    }

    let mut current = String::with_capacity(trimmed.len());
    let mut ret = Vec::with_capacity(segments.len());
    for (n, segment) in segments.iter().enumerate() {
        if segment.is_empty() && n != 0 {
            return Err(RouterError::EmptySegmentInOptional(pattern.to_owned()));
        }
        current.push_str(segment);
        ret.push(current.clone());
    }
    Ok(ret)
}

fn tokenize(pattern: &str) -> Result<SmallVec<[Token<'_>; 8]>, RouterError> {
    let mut tokens = SmallVec::new();
    let mut rest = pattern;

    while let Some(open) = rest.find(OPEN_VAR) {
        if open > 0 {
            tokens.push(Token::Text(&rest[..open]));
        }
        let body = &rest[open + 1..];

        // one level of nested braces is allowed for quantifiers like `\d{2,4}`
        let mut depth = 0_usize;
        let mut end = None;
        for (i, c) in body.char_indices() {
            match c {
                OPEN_VAR => depth += 1,
                CLOSE_VAR if depth == 0 => {
                    end = Some(i);
                    break;
                }
                CLOSE_VAR => depth -= 1,
                _ => {}
            }
        }
        let end = end.ok_or_else(|| RouterError::UnclosedPlaceholder(pattern.to_owned()))?;

        let inner = &body[..end];
        let (name, regex) = match inner.find(SEP) {
            Some(i) => (inner[..i].trim(), Some(inner[i + 1..].trim())),
            None => (inner.trim(), None),
        };
        if name.is_empty() {
            return Err(RouterError::EmptyPlaceholderName(pattern.to_owned()));
        }
        tokens.push(Token::Var { name, regex });

        rest = &body[end + 1..];
    }
    if !rest.is_empty() {
        tokens.push(Token::Text(rest));
    }
    Ok(tokens)
}

/// Whether a concrete pattern contains no placeholder.
pub fn is_static(concrete: &str) -> bool {
    !concrete.contains(OPEN_VAR)
}

/// Count of path separators minus one.
pub fn segment_offset(path: &str) -> usize {
    path.matches(SLASH).count().saturating_sub(1)
}

/// Offset of a concrete pattern, counting separators outside placeholders.
pub(crate) fn pattern_offset(concrete: &str) -> Result<usize, RouterError> {
    let slashes: usize = tokenize(concrete)?
        .iter()
        .map(|t| match t {
            Token::Text(s) => s.matches(SLASH).count(),
            Token::Var { .. } => 0,
        })
        .sum();
    Ok(slashes.saturating_sub(1))
}

/// Translates placeholders into capture groups.
///
/// `{name}` becomes `([^/]+)`, `{name:re}` becomes `(re)`, and `{name:int}`
/// uses the wildcard alias when `re` names one. Literal text is escaped.
pub fn compile_placeholders(concrete: &str, wildcards: &Wildcards) -> Result<Compiled, RouterError> {
    let tokens = tokenize(concrete)?;

    let mut source = String::with_capacity(concrete.len() * 2);
    let mut names: Vec<Box<str>> = Vec::new();
    let mut slots = SmallVec::new();
    let mut groups = 0;

    for token in tokens {
        match token {
            Token::Text(text) => source.push_str(&regex::escape(text)),
            Token::Var { name, regex: custom } => {
                if names.iter().any(|n| &**n == name) {
                    return Err(RouterError::DuplicatePlaceholder {
                        pattern: concrete.to_owned(),
                        name: name.to_owned(),
                    });
                }
                let fragment = match custom {
                    Some(r) => wildcards.resolve(r),
                    None => DEFAULT_REGEX,
                };
                let checked = Regex::new(fragment).map_err(|e| RouterError::InvalidPlaceholderRegex {
                    pattern: concrete.to_owned(),
                    name: name.to_owned(),
                    source: e,
                })?;
                // names would collide once routes share a chunk
                if checked.capture_names().flatten().next().is_some() {
                    return Err(RouterError::NamedGroupInPlaceholder {
                        pattern: concrete.to_owned(),
                        name: name.to_owned(),
                    });
                }
                let inner = checked.captures_len() - 1;

                groups += 1;
                slots.push(groups);
                groups += inner;

                source.push('(');
                source.push_str(fragment);
                source.push(')');
                names.push(name.into());
            }
        }
    }

    Ok(Compiled {
        regex: source,
        names,
        slots,
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchored(c: &Compiled) -> Regex {
        Regex::new(&format!("^(?:{})$", c.regex())).unwrap()
    }

    #[test]
    fn expand_plain() {
        assert_eq!(expand_optionals("/users").unwrap(), vec!["/users"]);
    }

    #[test]
    fn expand_nested() {
        let v = expand_optionals("/a[/b[/c]]").unwrap();
        assert_eq!(v, vec!["/a", "/a/b", "/a/b/c"]);
        for w in v.windows(2) {
            assert!(w[1].starts_with(&w[0]));
        }
    }

    #[test]
    fn expand_keeps_brackets_inside_placeholders() {
        let v = expand_optionals("/user/{id:[0-9]+}[/{name:[a-z]+}]").unwrap();
        assert_eq!(v, vec!["/user/{id:[0-9]+}", "/user/{id:[0-9]+}/{name:[a-z]+}"]);
    }

    #[test]
    fn expand_errors() {
        assert!(matches!(
            expand_optionals("/a[/b"),
            Err(RouterError::UnclosedOptionalSegments(_))
        ));
        assert!(matches!(
            expand_optionals("/a/b]"),
            Err(RouterError::UnclosedOptionalSegments(_))
        ));
        assert!(matches!(
            expand_optionals("/a[/b]/c"),
            Err(RouterError::OptionalSegmentsInMiddle(_))
        ));
        assert!(matches!(
            expand_optionals("/a[/b]/c]"),
            Err(RouterError::OptionalSegmentsInMiddle(_))
        ));
        assert!(matches!(
            expand_optionals("/a[[/b]]"),
            Err(RouterError::EmptySegmentInOptional(_))
        ));
        assert!(matches!(
            expand_optionals("/a[]"),
            Err(RouterError::EmptySegmentInOptional(_))
        ));
    }

    #[test]
    fn expand_leading_optional() {
        assert_eq!(expand_optionals("[/a]").unwrap(), vec!["", "/a"]);
    }

    #[test]
    fn default_placeholder() {
        let c = compile_placeholders("/users/{id}", &Wildcards::new()).unwrap();
        assert_eq!(c.names().len(), 1);
        assert_eq!(&*c.names()[0], "id");
        let re = anchored(&c);
        assert!(re.is_match("/users/abc-42"));
        assert!(!re.is_match("/users/a/b"));
        assert!(!re.is_match("/users/"));
    }

    #[test]
    fn custom_placeholder() {
        let c = compile_placeholders(r"/users/{id:\d+}", &Wildcards::new()).unwrap();
        let re = anchored(&c);
        assert!(re.is_match("/users/42"));
        assert!(!re.is_match("/users/abc"));
    }

    #[test]
    fn nested_braces_and_spaces() {
        let c = compile_placeholders(r"/y/{ year : \d{4} }/{m}", &Wildcards::new()).unwrap();
        assert_eq!(c.names().len(), 2);
        assert_eq!(&*c.names()[0], "year");
        let re = anchored(&c);
        assert!(re.is_match("/y/2020/01"));
        assert!(!re.is_match("/y/20/01"));
    }

    #[test]
    fn alias_placeholder() {
        let c = compile_placeholders("/p/{id:int}/{on:bool}", &Wildcards::new()).unwrap();
        let re = anchored(&c);
        assert!(re.is_match("/p/7/yes"));
        assert!(!re.is_match("/p/x/yes"));
        assert!(!re.is_match("/p/7/maybe"));
    }

    #[test]
    fn inner_groups_shift_slots() {
        let c = compile_placeholders("/{lang:(en|de)}/{page}", &Wildcards::new()).unwrap();
        assert_eq!(c.slots(), &[1, 3]);
        assert_eq!(c.groups(), 3);
        let caps = anchored(&c).captures("/de/home").unwrap();
        assert_eq!(&caps[c.slots()[0]], "de");
        assert_eq!(&caps[c.slots()[1]], "home");
    }

    #[test]
    fn literal_text_is_escaped() {
        let c = compile_placeholders("/files/{name}.json", &Wildcards::new()).unwrap();
        let re = anchored(&c);
        assert!(re.is_match("/files/a.json"));
        assert!(!re.is_match("/files/axjson"));
    }

    #[test]
    fn placeholder_errors() {
        let w = Wildcards::new();
        assert!(matches!(
            compile_placeholders("/a/{id", &w),
            Err(RouterError::UnclosedPlaceholder(_))
        ));
        assert!(matches!(
            compile_placeholders("/a/{:x}", &w),
            Err(RouterError::EmptyPlaceholderName(_))
        ));
        assert!(matches!(
            compile_placeholders("/a/{id}/{id}", &w),
            Err(RouterError::DuplicatePlaceholder { .. })
        ));
        assert!(matches!(
            compile_placeholders("/a/{id:(}", &w),
            Err(RouterError::InvalidPlaceholderRegex { .. })
        ));
        assert!(matches!(
            compile_placeholders(r"/a/{id:(?P<n>\d+)}", &w),
            Err(RouterError::NamedGroupInPlaceholder { ref name, .. }) if name == "id"
        ));
        assert!(compile_placeholders(r"/a/{id:(?:\d+)}", &w).is_ok());
    }

    #[test]
    fn offsets() {
        assert_eq!(segment_offset("/users/42"), 1);
        assert_eq!(segment_offset("/"), 0);
        assert_eq!(segment_offset(""), 0);
        assert_eq!(pattern_offset("/users/{id}").unwrap(), 1);
        assert_eq!(pattern_offset("/files/{path:.+/.+}").unwrap(), 1);
    }
}
