use std::collections::HashMap;
use std::iter::{DoubleEndedIterator, ExactSizeIterator, FusedIterator};
use std::ops::Index;
use std::str::FromStr;
use std::sync::Arc;

use smallvec::SmallVec;

type ParamVec = SmallVec<[(Arc<str>, String); 8]>;

/// Path parameters of a match, in capture order.
///
/// Values are reachable by name or by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    buf: ParamVec,
}

impl Params {
    pub fn new() -> Self {
        Self {
            buf: SmallVec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.buf
            .iter()
            .find_map(|(n, v)| some_if(&**n == name, || v.as_str()))
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        self.get(name).map(T::from_str)
    }

    /// Value at `index` in capture order.
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.buf.get(index).map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.buf.iter(),
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.buf.iter().map(|(_, v)| v.as_str())
    }

    pub fn to_map(&self) -> HashMap<String, String> {
        self.buf
            .iter()
            .map(|(n, v)| (n.to_string(), v.clone()))
            .collect()
    }
}

impl Params {
    pub(crate) fn push(&mut self, name: Arc<str>, value: String) {
        self.buf.push((name, value))
    }

    /// Appends `value` unless `name` is already present.
    pub(crate) fn push_default(&mut self, name: &Arc<str>, value: &str) {
        if self.get(name).is_none() {
            self.buf.push((Arc::clone(name), value.to_owned()))
        }
    }
}

impl Index<&str> for Params {
    type Output = str;
    fn index(&self, name: &str) -> &str {
        match self.get(name) {
            Some(v) => v,
            None => panic!("no param named {:?}", name),
        }
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl IntoIterator for Params {
    type Item = (Arc<str>, String);
    type IntoIter = smallvec::IntoIter<[(Arc<str>, String); 8]>;
    fn into_iter(self) -> Self::IntoIter {
        self.buf.into_iter()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Params {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self {
            buf: iter
                .into_iter()
                .map(|(n, v)| (Arc::from(n), v.to_owned()))
                .collect(),
        }
    }
}

#[inline(always)]
fn some_if<T>(cond: bool, f: impl FnOnce() -> T) -> Option<T> {
    if cond {
        Some(f())
    } else {
        None
    }
}

pub struct Iter<'a> {
    inner: std::slice::Iter<'a, (Arc<str>, String)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(n, v)| (&**n, v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(n, v)| (&**n, v.as_str()))
    }
}

impl ExactSizeIterator for Iter<'_> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl FusedIterator for Iter<'_> {}
