//! Combined alternation regexes over a bucket of dynamic routes.
//!
//! The `regex` crate has no branch reset group, so capture groups are numbered
//! across all alternatives. Each alternative is emitted as `()` followed by
//! the route's own regex. The empty marker group participates only when its
//! alternative matched, and marker indices strictly increase along the chunk,
//! so a match identifies exactly one route. A route without placeholders still
//! owns its marker.

use super::DynamicRoute;
use crate::pattern::Compiled;

use regex::Regex;
use smallvec::SmallVec;
use tracing::warn;

#[derive(Debug)]
pub struct Chunk {
    regex: Regex,
    entries: Vec<Entry>,
}

#[derive(Debug)]
struct Entry {
    marker: usize,
    route: usize,
    slots: SmallVec<[usize; 8]>,
}

impl Chunk {
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Marker group index of every route, in chunk order.
    pub fn markers(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|e| e.marker)
    }

    /// Returns the bucket index of the matched route and its captured values
    /// in placeholder order.
    pub fn find<'p>(&self, path: &'p str) -> Option<(usize, SmallVec<[&'p str; 8]>)> {
        let caps = self.regex.captures(path)?;
        let entry = self.entries.iter().find(|e| caps.get(e.marker).is_some())?;
        let values = entry
            .slots
            .iter()
            .map(|&i| caps.get(i).map_or("", |m| m.as_str()))
            .collect();
        Some((entry.route, values))
    }
}

/// Partitions `routes`, in order, into groups of `size` and compiles each.
///
/// A group whose combined regex is rejected falls back to one chunk per
/// route, so the rest of the bucket keeps matching.
pub fn compile_bucket<R>(routes: &[DynamicRoute<R>], size: usize) -> Result<Vec<Chunk>, regex::Error> {
    let size = size.max(1);
    let mut chunks = Vec::with_capacity(routes.len() / size + 1);
    for (i, group) in routes.chunks(size).enumerate() {
        let base = i * size;
        match compile_chunk(group, base) {
            Ok(chunk) => chunks.push(chunk),
            Err(e) if group.len() > 1 => {
                warn!(base, routes = group.len(), error = %e, "combined regex rejected, splitting chunk");
                for (j, route) in group.iter().enumerate() {
                    chunks.push(compile_chunk(std::slice::from_ref(route), base + j)?);
                }
            }
            Err(e) => return Err(e),
        }
    }
    Ok(chunks)
}

/// Compiles `compiled` the way a single-route chunk would.
pub fn check_route(compiled: &Compiled) -> Result<(), regex::Error> {
    let mut source = String::from("^(?:");
    push_alternative(&mut source, compiled);
    source.push_str(")$");
    Regex::new(&source).map(drop)
}

fn push_alternative(source: &mut String, compiled: &Compiled) {
    source.push_str("()");
    source.push_str(compiled.regex());
}

fn compile_chunk<R>(routes: &[DynamicRoute<R>], base: usize) -> Result<Chunk, regex::Error> {
    let mut source = String::from("^(?:");
    let mut entries = Vec::with_capacity(routes.len());

    // group 0 is the whole match
    let mut next = 1;

    for (i, route) in routes.iter().enumerate() {
        if i > 0 {
            source.push('|');
        }
        push_alternative(&mut source, &route.compiled);

        let marker = next;
        let slots = route.compiled.slots().iter().map(|&s| marker + s).collect();
        next = marker + 1 + route.compiled.groups();

        entries.push(Entry {
            marker,
            route: base + i,
            slots,
        });
    }
    source.push_str(")$");

    let regex = Regex::new(&source)?;
    debug_assert_eq!(regex.captures_len(), next);

    Ok(Chunk { regex, entries })
}

#[cfg(test)]
mod tests {
    use super::super::{RouteOptions, RouteTable};
    use crate::config::ChunkSize;
    use crate::dispatch::Action;
    use crate::pattern::Wildcards;

    use std::sync::Arc;

    use http::Method;

    fn bucket(patterns: &[&str], size: usize) -> RouteTable<()> {
        let mut t = RouteTable::new(ChunkSize::Fixed(size));
        for p in patterns {
            t.register("get", p, Action::from("C#m"), Arc::new(RouteOptions::new()), &Wildcards::new())
                .unwrap();
        }
        t
    }

    #[test]
    fn markers_account_for_inner_groups() {
        let t = bucket(&["/a/{x}", "/b/{x:(p|q)(r)?}/{y}", "/c/{x}"], 8);
        let chunks = t.chunks(&Method::GET, 1).unwrap();
        assert_eq!(chunks.len(), 1);
        // `()` + x | `()` + x(2 inner) + y | `()` + x
        assert_eq!(chunks[0].markers().collect::<Vec<_>>(), vec![1, 3, 8]);

        let (route, values) = chunks[0].find("/b/pr/z").unwrap();
        assert_eq!(route, 1);
        assert_eq!(&values[..], &["pr", "z"]);

        let (route, values) = chunks[0].find("/c/k").unwrap();
        assert_eq!(route, 2);
        assert_eq!(&values[..], &["k"]);
    }

    #[test]
    fn single_route_check() {
        let w = Wildcards::new();
        let ok = crate::pattern::compile_placeholders("/a/{x:(p|q)}", &w).unwrap();
        assert!(super::check_route(&ok).is_ok());
    }

    #[test]
    fn bucket_is_split_in_order() {
        let t = bucket(&["/a/{x}", "/b/{x}", "/c/{x}", "/d/{x}", "/e/{x}"], 2);
        let chunks = t.chunks(&Method::GET, 1).unwrap();
        let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);

        let (route, _) = chunks[2].find("/e/1").unwrap();
        assert_eq!(route, 4);
        assert!(chunks[0].find("/e/1").is_none());
    }
}
