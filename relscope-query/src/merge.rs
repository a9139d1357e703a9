// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Streaming two-way intersection of sorted posting lists.

use relscope_core::ScopeId;
use relscope_index::{IndexResult, PostingStream, Postings, RelationIndex};
use std::cmp::Ordering;

/// Yields the scope ids present in both streams, ascending.
///
/// The smaller head is advanced with `seek` to the larger one, so an
/// in-memory side skips by binary search. Iteration stops as soon as either
/// side runs out; the rest of the other side is never read.
pub struct SortedIntersection<'a> {
    left: PostingStream<'a>,
    right: PostingStream<'a>,
    done: bool,
}

impl<'a> SortedIntersection<'a> {
    pub fn new(left: PostingStream<'a>, right: PostingStream<'a>) -> Self {
        Self {
            left,
            right,
            done: false,
        }
    }

    fn step(&mut self) -> IndexResult<Option<ScopeId>> {
        let Some(mut a) = self.left.next_scope()? else {
            return Ok(None);
        };
        let Some(mut b) = self.right.next_scope()? else {
            return Ok(None);
        };

        loop {
            match a.cmp(&b) {
                Ordering::Equal => return Ok(Some(a)),
                Ordering::Less => match self.left.seek(b)? {
                    Some(next) => a = next,
                    None => return Ok(None),
                },
                Ordering::Greater => match self.right.seek(a)? {
                    Some(next) => b = next,
                    None => return Ok(None),
                },
            }
        }
    }
}

impl Iterator for SortedIntersection<'_> {
    type Item = IndexResult<ScopeId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(id)) => Some(Ok(id)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Materialize the intersection of two posting lists.
///
/// Either side may be lazy; cursors are closed before this returns, on
/// success and on error.
pub fn intersect(
    left: &Postings,
    right: &Postings,
    index: &dyn RelationIndex,
) -> IndexResult<Vec<ScopeId>> {
    let known_empty = |p: &Postings| !p.is_lazy() && p.is_empty();
    if known_empty(left) || known_empty(right) {
        return Ok(Vec::new());
    }

    let left = left.stream(index)?;
    let right = right.stream(index)?;
    SortedIntersection::new(left, right).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use relscope_core::RelationKey;
    use relscope_index::MemoryRelationIndex;

    fn ids(raw: &[u64]) -> Vec<ScopeId> {
        raw.iter().map(|&i| ScopeId(i)).collect()
    }

    fn lazy_index(key: u64, scopes: &[u64]) -> (MemoryRelationIndex, Postings) {
        let index = MemoryRelationIndex::new();
        index.insert_relation(RelationKey(key), 1, vec![]);
        index.record_batch(RelationKey(key), ids(scopes)).unwrap();
        let postings = Postings::Lazy {
            key: RelationKey(key),
            len: scopes.len(),
        };
        (index, postings)
    }

    #[test]
    fn test_in_memory_intersection() {
        let index = MemoryRelationIndex::new();
        let a = Postings::from_sorted(ids(&[1, 2, 3, 4, 5]));
        let b = Postings::from_sorted(ids(&[2, 4, 6]));
        assert_eq!(intersect(&a, &b, &index).unwrap(), ids(&[2, 4]));
    }

    #[test]
    fn test_disjoint_is_empty() {
        let index = MemoryRelationIndex::new();
        let a = Postings::from_sorted(ids(&[1, 3]));
        let b = Postings::from_sorted(ids(&[2, 4]));
        assert!(intersect(&a, &b, &index).unwrap().is_empty());
    }

    #[test]
    fn test_mixed_lazy_and_in_memory() {
        let (index, lazy) = lazy_index(1, &[1, 5, 9, 12, 40]);
        let memory = Postings::from_sorted(ids(&[5, 12, 13]));

        assert_eq!(intersect(&lazy, &memory, &index).unwrap(), ids(&[5, 12]));
        assert_eq!(intersect(&memory, &lazy, &index).unwrap(), ids(&[5, 12]));
        assert_eq!(index.open_cursors(), 0);
    }

    #[test]
    fn test_lazy_against_lazy() {
        let index = MemoryRelationIndex::new();
        index.insert_relation(RelationKey(1), 1, vec![]);
        index.insert_relation(RelationKey(2), 1, vec![]);
        index.record_batch(RelationKey(1), ids(&[1, 2, 3, 7])).unwrap();
        index.record_batch(RelationKey(2), ids(&[3, 7, 8])).unwrap();

        let a = Postings::Lazy { key: RelationKey(1), len: 4 };
        let b = Postings::Lazy { key: RelationKey(2), len: 3 };
        assert_eq!(intersect(&a, &b, &index).unwrap(), ids(&[3, 7]));
        assert_eq!(index.open_cursors(), 0);
    }

    #[test]
    fn test_empty_in_memory_side_opens_no_cursor() {
        let (index, lazy) = lazy_index(1, &[1, 2]);
        let empty = Postings::empty();
        assert!(intersect(&lazy, &empty, &index).unwrap().is_empty());
        assert_eq!(index.open_cursors(), 0);
    }

    #[test]
    fn test_stops_reading_lazy_side_early() {
        let (index, lazy) = lazy_index(1, &[1, 2, 3, 100, 200, 300]);
        let memory = Postings::from_sorted(ids(&[2]));

        let mut it = SortedIntersection::new(
            memory.stream(&index).unwrap(),
            lazy.stream(&index).unwrap(),
        );
        assert_eq!(it.next().unwrap().unwrap(), ScopeId(2));
        assert!(it.next().is_none());
        // the lazy cursor is still open: nothing past scope 2 was requested
        assert_eq!(index.open_cursors(), 1);
        drop(it);
        assert_eq!(index.open_cursors(), 0);
    }
}
