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

//! In-memory relation index.

use crate::error::{IndexError, IndexResult};
use crate::traits::{PostingCursor, RelationIndex};
use parking_lot::RwLock;
use relscope_core::{RelationKey, ScopeId};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A stored relation and the scopes it occurs in.
#[derive(Debug, Clone)]
struct RelationEntry {
    arity: usize,
    fillers: Vec<String>,
    scopes: BTreeSet<ScopeId>,
}

/// In-memory relation index.
///
/// Cursors do not pin a snapshot: every step re-reads the live map, so a
/// relation removed while it is being iterated shows up as a stale reference
/// and concurrent inserts may or may not be observed.
pub struct MemoryRelationIndex {
    /// Primary index: relation -> entry with sorted postings
    relations: RwLock<BTreeMap<RelationKey, RelationEntry>>,
    /// Cursors handed out and not yet closed
    open_cursors: AtomicUsize,
}

impl Default for MemoryRelationIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRelationIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            relations: RwLock::new(BTreeMap::new()),
            open_cursors: AtomicUsize::new(0),
        }
    }

    /// Register a relation. Re-inserting keeps recorded scopes and replaces
    /// arity and fillers.
    pub fn insert_relation(&self, key: RelationKey, arity: usize, fillers: Vec<String>) {
        let mut relations = self.relations.write();
        relations
            .entry(key)
            .and_modify(|entry| {
                entry.arity = arity;
                entry.fillers = fillers.clone();
            })
            .or_insert_with(|| RelationEntry {
                arity,
                fillers,
                scopes: BTreeSet::new(),
            });
    }

    /// Record that `key` occurs in `scope`.
    pub fn record(&self, key: RelationKey, scope: ScopeId) -> IndexResult<()> {
        let mut relations = self.relations.write();
        let entry = relations.get_mut(&key).ok_or_else(|| IndexError::stale(key))?;
        entry.scopes.insert(scope);
        Ok(())
    }

    /// Record many occurrences of `key`.
    pub fn record_batch(
        &self,
        key: RelationKey,
        scopes: impl IntoIterator<Item = ScopeId>,
    ) -> IndexResult<()> {
        let mut relations = self.relations.write();
        let entry = relations.get_mut(&key).ok_or_else(|| IndexError::stale(key))?;
        entry.scopes.extend(scopes);
        Ok(())
    }

    /// Remove a relation. Returns whether it existed.
    pub fn remove_relation(&self, key: RelationKey) -> bool {
        self.relations.write().remove(&key).is_some()
    }

    /// Remove one occurrence. Returns whether it existed.
    pub fn remove_scope_from(&self, key: RelationKey, scope: ScopeId) -> bool {
        self.relations
            .write()
            .get_mut(&key)
            .map(|entry| entry.scopes.remove(&scope))
            .unwrap_or(false)
    }

    /// Number of cursors opened and not yet closed.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::Acquire)
    }

    /// Get index statistics.
    pub fn stats(&self) -> MemoryIndexStats {
        let relations = self.relations.read();
        let mut distinct = HashSet::new();
        let mut postings = 0;
        for entry in relations.values() {
            postings += entry.scopes.len();
            distinct.extend(entry.scopes.iter().copied());
        }
        MemoryIndexStats {
            relations: relations.len(),
            postings,
            distinct_scopes: distinct.len(),
        }
    }

    /// Clear the index.
    pub fn clear(&self) {
        self.relations.write().clear();
    }

    fn with_entry<T>(
        &self,
        key: RelationKey,
        f: impl FnOnce(&RelationEntry) -> T,
    ) -> IndexResult<T> {
        self.relations
            .read()
            .get(&key)
            .map(f)
            .ok_or_else(|| IndexError::stale(key))
    }
}

impl RelationIndex for MemoryRelationIndex {
    fn count(&self, key: RelationKey) -> IndexResult<usize> {
        self.with_entry(key, |e| e.scopes.len())
    }

    fn arity(&self, key: RelationKey) -> IndexResult<usize> {
        self.with_entry(key, |e| e.arity)
    }

    fn fillers(&self, key: RelationKey) -> IndexResult<Vec<String>> {
        self.with_entry(key, |e| e.fillers.clone())
    }

    fn postings(&self, key: RelationKey) -> IndexResult<Vec<ScopeId>> {
        self.with_entry(key, |e| e.scopes.iter().copied().collect())
    }

    fn open_cursor(&self, key: RelationKey) -> IndexResult<Box<dyn PostingCursor + '_>> {
        if !self.relations.read().contains_key(&key) {
            return Err(IndexError::stale(key));
        }
        self.open_cursors.fetch_add(1, Ordering::AcqRel);
        Ok(Box::new(MemoryCursor {
            index: self,
            key,
            last: None,
            closed: false,
        }))
    }
}

/// Cursor that remembers the last id it returned and re-reads the live map.
struct MemoryCursor<'a> {
    index: &'a MemoryRelationIndex,
    key: RelationKey,
    last: Option<ScopeId>,
    closed: bool,
}

impl MemoryCursor<'_> {
    fn step(&mut self, lower: Bound<ScopeId>) -> IndexResult<Option<ScopeId>> {
        if self.closed {
            return Err(IndexError::CursorClosed(self.key.to_string()));
        }
        let next = self.index.with_entry(self.key, |e| {
            e.scopes.range((lower, Bound::Unbounded)).next().copied()
        })?;
        if next.is_some() {
            self.last = next;
        }
        Ok(next)
    }
}

impl PostingCursor for MemoryCursor<'_> {
    fn advance(&mut self) -> IndexResult<Option<ScopeId>> {
        let lower = match self.last {
            Some(last) => Bound::Excluded(last),
            None => Bound::Unbounded,
        };
        self.step(lower)
    }

    fn seek(&mut self, target: ScopeId) -> IndexResult<Option<ScopeId>> {
        let lower = match self.last {
            Some(last) if last >= target => Bound::Excluded(last),
            _ => Bound::Included(target),
        };
        self.step(lower)
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.index.open_cursors.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

/// Memory index statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryIndexStats {
    /// Stored relations.
    pub relations: usize,
    /// Total (relation, scope) occurrences.
    pub postings: usize,
    /// Distinct scopes referenced by any relation.
    pub distinct_scopes: usize,
}
