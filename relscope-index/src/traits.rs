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

//! Collaborator traits consumed by the retrieval engine.

use crate::error::IndexResult;
use relscope_core::{RelationKey, ScopeId};
use std::sync::Arc;

/// Forward-only, non-restartable cursor over a sorted posting list.
///
/// Implementations may hold store resources (iterators, locks) until
/// [`PostingCursor::close`] is called. Callers should not use a cursor
/// directly but wrap it in a [`crate::CursorGuard`].
pub trait PostingCursor {
    /// Next scope id in ascending order, `None` once exhausted.
    fn advance(&mut self) -> IndexResult<Option<ScopeId>>;

    /// Position on the first remaining scope id `>= target`.
    ///
    /// The default scans forward; stores with a seekable iterator should
    /// override it.
    fn seek(&mut self, target: ScopeId) -> IndexResult<Option<ScopeId>> {
        loop {
            match self.advance()? {
                Some(id) if id < target => continue,
                other => return Ok(other),
            }
        }
    }

    /// Release underlying resources. Must be idempotent.
    fn close(&mut self);
}

/// Read access to stored relations and their posting lists.
pub trait RelationIndex {
    /// Number of scopes the relation occurs in.
    fn count(&self, key: RelationKey) -> IndexResult<usize>;

    /// Number of argument slots (>= 1).
    fn arity(&self, key: RelationKey) -> IndexResult<usize>;

    /// Argument filler words, used for stop-relation filtering.
    fn fillers(&self, key: RelationKey) -> IndexResult<Vec<String>>;

    /// Fully materialized posting list, sorted ascending without duplicates.
    fn postings(&self, key: RelationKey) -> IndexResult<Vec<ScopeId>>;

    /// Lazy cursor over the same posting list.
    fn open_cursor(&self, key: RelationKey) -> IndexResult<Box<dyn PostingCursor + '_>>;
}

/// Resolves scopes to the top-level document that owns them.
pub trait ScopeResolver {
    /// Nearest enclosing scope of kind document (the scope itself if it is one).
    fn find_first_ancestor_document(&self, scope: ScopeId) -> IndexResult<ScopeId>;
}

impl<T: RelationIndex + ?Sized> RelationIndex for Arc<T> {
    fn count(&self, key: RelationKey) -> IndexResult<usize> {
        (**self).count(key)
    }

    fn arity(&self, key: RelationKey) -> IndexResult<usize> {
        (**self).arity(key)
    }

    fn fillers(&self, key: RelationKey) -> IndexResult<Vec<String>> {
        (**self).fillers(key)
    }

    fn postings(&self, key: RelationKey) -> IndexResult<Vec<ScopeId>> {
        (**self).postings(key)
    }

    fn open_cursor(&self, key: RelationKey) -> IndexResult<Box<dyn PostingCursor + '_>> {
        (**self).open_cursor(key)
    }
}

impl<T: ScopeResolver + ?Sized> ScopeResolver for Arc<T> {
    fn find_first_ancestor_document(&self, scope: ScopeId) -> IndexResult<ScopeId> {
        (**self).find_first_ancestor_document(scope)
    }
}
