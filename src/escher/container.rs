//! Tree traversal and search over Escher record trees.
//!
//! Every lookup is built on two primitives, [`find_first`] and [`find_all`],
//! both driven by a [`Walk`]: a lazy pre-order traversal that visits
//! children in document order. A walk can be limited to a depth, so "direct
//! children only" is the same primitive with `max_depth(1)`.

use super::record::{EscherRecord, RecordVariant};
use smallvec::SmallVec;
use std::slice;

/// Location of a record as child indices from a list of top-level records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RecordPath(SmallVec<[usize; 6]>);

impl RecordPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path one level below this one.
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.0.push(index);
        path
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of levels below the top-level list.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Path of the enclosing container and this record's index in it.
    pub fn split_last(&self) -> Option<(RecordPath, usize)> {
        let (&last, parent) = self.0.split_last()?;
        Some((Self::from(parent), last))
    }

    /// Child list of the record at this path; the empty path names `records`.
    pub fn children<'a>(&self, records: &'a [EscherRecord]) -> Option<&'a [EscherRecord]> {
        if self.0.is_empty() {
            Some(records)
        } else {
            self.resolve(records).map(EscherRecord::children)
        }
    }

    pub fn resolve<'a>(&self, records: &'a [EscherRecord]) -> Option<&'a EscherRecord> {
        let (first, rest) = self.0.split_first()?;
        rest.iter()
            .try_fold(records.get(*first)?, |record, &i| record.children().get(i))
    }

    pub fn resolve_mut<'a>(
        &self,
        records: &'a mut [EscherRecord],
    ) -> Option<&'a mut EscherRecord> {
        let (first, rest) = self.0.split_first()?;
        rest.iter().try_fold(records.get_mut(*first)?, |record, &i| {
            record.children_mut()?.get_mut(i)
        })
    }
}

impl From<&[usize]> for RecordPath {
    fn from(indices: &[usize]) -> Self {
        Self(SmallVec::from_slice(indices))
    }
}

/// Lazy pre-order traversal over a record list.
pub struct Walk<'a> {
    stack: Vec<(slice::Iter<'a, EscherRecord>, usize)>,
    path: RecordPath,
    max_depth: usize,
}

impl<'a> Walk<'a> {
    /// Walk every record below `records`, paths relative to `records`.
    pub fn new(records: &'a [EscherRecord]) -> Self {
        Self::under(RecordPath::new(), records)
    }

    /// Walk `records`, which are the children of the record at `base`.
    pub fn under(base: RecordPath, records: &'a [EscherRecord]) -> Self {
        Self {
            stack: vec![(records.iter(), 0)],
            path: base,
            max_depth: usize::MAX,
        }
    }

    /// Stop descending after `depth` levels (1 = only the given records).
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (RecordPath, &'a EscherRecord);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let depth = self.stack.len();
            let (iter, next_index) = self.stack.last_mut()?;
            match iter.next() {
                Some(record) => {
                    let index = *next_index;
                    *next_index += 1;
                    let path = self.path.child(index);
                    if record.is_container() && depth < self.max_depth {
                        self.stack.push((record.children().iter(), 0));
                        self.path = path.clone();
                    }
                    return Some((path, record));
                },
                None => {
                    self.stack.pop();
                    if !self.stack.is_empty() {
                        self.path.0.pop();
                    }
                },
            }
        }
    }
}

/// A record located by a search, with its path.
#[derive(Debug, Clone)]
pub struct Found<'a, T> {
    pub path: RecordPath,
    pub record: &'a T,
}

/// First record of kind `T` matching `predicate`, in walk order.
pub fn find_first<'a, T, P>(walk: Walk<'a>, predicate: P) -> Option<Found<'a, T>>
where
    T: RecordVariant + 'a,
    P: FnMut(&T) -> bool,
{
    find_all(walk, predicate).next()
}

/// Every record of kind `T` matching `predicate`, lazily, in walk order.
pub fn find_all<'a, T, P>(walk: Walk<'a>, mut predicate: P) -> impl Iterator<Item = Found<'a, T>>
where
    T: RecordVariant + 'a,
    P: FnMut(&T) -> bool,
{
    walk.filter_map(move |(path, record)| {
        T::from_record(record)
            .filter(|r| predicate(r))
            .map(|record| Found { path, record })
    })
}
