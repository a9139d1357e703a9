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

//! Posting list representations
//!
//! Small posting lists are materialized once and shared; large ones stay in
//! the store and are re-read through a fresh cursor each time they are
//! streamed, which bounds memory for very common relations.
//!
//! ```text
//! count <= threshold   ->  Postings::InMemory(Arc<[ScopeId]>)
//! count  > threshold   ->  Postings::Lazy { key, len }  --stream-->  CursorGuard
//! ```

use crate::cursor::CursorGuard;
use crate::error::IndexResult;
use crate::traits::RelationIndex;
use relscope_core::{RelationKey, ScopeId};
use std::sync::Arc;

/// Sorted, duplicate-free set of scope ids.
#[derive(Debug, Clone)]
pub enum Postings {
    /// Materialized, ascending ids.
    InMemory(Arc<[ScopeId]>),
    /// Read from the index on demand. `len` is the count seen at load time.
    Lazy { key: RelationKey, len: usize },
}

impl Postings {
    /// Choose a representation for `key` given its cardinality.
    pub fn load(
        index: &dyn RelationIndex,
        key: RelationKey,
        count: usize,
        in_memory_threshold: usize,
    ) -> IndexResult<Self> {
        if count <= in_memory_threshold {
            let ids = index.postings(key)?;
            debug_assert!(
                ids.windows(2).all(|w| w[0] < w[1]),
                "postings must be strictly ascending"
            );
            Ok(Postings::InMemory(ids.into()))
        } else {
            Ok(Postings::Lazy { key, len: count })
        }
    }

    /// Wrap ids that are already strictly ascending.
    pub fn from_sorted(ids: Vec<ScopeId>) -> Self {
        debug_assert!(ids.windows(2).all(|w| w[0] < w[1]), "postings must be strictly ascending");
        Postings::InMemory(ids.into())
    }

    pub fn empty() -> Self {
        Postings::InMemory(Arc::from(Vec::new()))
    }

    /// Number of ids; for lazy postings this is the count at load time.
    pub fn len(&self) -> usize {
        match self {
            Postings::InMemory(ids) => ids.len(),
            Postings::Lazy { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Postings::Lazy { .. })
    }

    /// Open a stream over the ids. Lazy postings open a new cursor.
    pub fn stream<'a>(&'a self, index: &'a dyn RelationIndex) -> IndexResult<PostingStream<'a>> {
        match self {
            Postings::InMemory(ids) => Ok(PostingStream::Slice { ids, pos: 0 }),
            Postings::Lazy { key, .. } => {
                let cursor = index.open_cursor(*key)?;
                Ok(PostingStream::Cursor(CursorGuard::new(*key, cursor)))
            }
        }
    }
}

/// One forward pass over a [`Postings`].
pub enum PostingStream<'a> {
    Slice { ids: &'a [ScopeId], pos: usize },
    Cursor(CursorGuard<'a>),
}

impl PostingStream<'_> {
    pub fn next_scope(&mut self) -> IndexResult<Option<ScopeId>> {
        match self {
            PostingStream::Slice { ids, pos } => {
                let next = ids.get(*pos).copied();
                if next.is_some() {
                    *pos += 1;
                }
                Ok(next)
            }
            PostingStream::Cursor(guard) => guard.advance(),
        }
    }

    /// Skip to the first remaining id `>= target` and consume it.
    pub fn seek(&mut self, target: ScopeId) -> IndexResult<Option<ScopeId>> {
        match self {
            PostingStream::Slice { ids, pos } => {
                *pos += ids[*pos..].partition_point(|id| *id < target);
                let next = ids.get(*pos).copied();
                if next.is_some() {
                    *pos += 1;
                }
                Ok(next)
            }
            PostingStream::Cursor(guard) => guard.seek(target),
        }
    }

    /// Drain the rest of the stream.
    pub fn collect_remaining(mut self) -> IndexResult<Vec<ScopeId>> {
        let mut out = Vec::new();
        while let Some(id) = self.next_scope()? {
            out.push(id);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRelationIndex;

    fn ids(raw: &[u64]) -> Vec<ScopeId> {
        raw.iter().map(|&i| ScopeId(i)).collect()
    }

    fn index_with(key: u64, scopes: &[u64]) -> MemoryRelationIndex {
        let index = MemoryRelationIndex::new();
        index.insert_relation(RelationKey(key), 1, vec!["enzyme".into()]);
        for &s in scopes {
            index.record(RelationKey(key), ScopeId(s)).unwrap();
        }
        index
    }

    #[test]
    fn test_threshold_selects_representation() {
        let index = index_with(1, &[3, 1, 2]);

        let small = Postings::load(&index, RelationKey(1), 3, 3).unwrap();
        assert!(!small.is_lazy());
        assert_eq!(small.len(), 3);

        let large = Postings::load(&index, RelationKey(1), 3, 2).unwrap();
        assert!(large.is_lazy());
        assert_eq!(large.len(), 3);
    }

    #[test]
    fn test_both_representations_stream_same_ids() {
        let index = index_with(1, &[9, 4, 7]);
        for threshold in [0, 10] {
            let postings = Postings::load(&index, RelationKey(1), 3, threshold).unwrap();
            let stream = postings.stream(&index).unwrap();
            assert_eq!(stream.collect_remaining().unwrap(), ids(&[4, 7, 9]));
        }
        assert_eq!(index.open_cursors(), 0);
    }

    #[test]
    fn test_slice_seek() {
        let postings = Postings::from_sorted(ids(&[1, 4, 6, 10]));
        let index = MemoryRelationIndex::new();
        let mut stream = postings.stream(&index).unwrap();
        assert_eq!(stream.seek(ScopeId(5)).unwrap(), Some(ScopeId(6)));
        assert_eq!(stream.next_scope().unwrap(), Some(ScopeId(10)));
        assert_eq!(stream.seek(ScopeId(11)).unwrap(), None);
        assert_eq!(stream.next_scope().unwrap(), None);
    }

    #[test]
    fn test_empty() {
        let postings = Postings::empty();
        assert!(postings.is_empty());
        let index = MemoryRelationIndex::new();
        assert!(postings.stream(&index).unwrap().collect_remaining().unwrap().is_empty());
    }
}
