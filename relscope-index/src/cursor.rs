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

//! Scoped ownership of lazy posting cursors.

use crate::error::IndexResult;
use crate::traits::PostingCursor;
use relscope_core::{RelationKey, ScopeId};
use tracing::warn;

/// Owns an open [`PostingCursor`] and closes it exactly once.
///
/// The cursor is closed as soon as it reports exhaustion or an error, and in
/// any case when the guard is dropped, so an early return or a panic while
/// iterating still releases the store's resources.
///
/// A cursor whose relation becomes stale mid-iteration is treated as
/// exhausted: the remainder of that relation is skipped.
pub struct CursorGuard<'a> {
    key: RelationKey,
    cursor: Box<dyn PostingCursor + 'a>,
    closed: bool,
}

impl<'a> CursorGuard<'a> {
    pub fn new(key: RelationKey, cursor: Box<dyn PostingCursor + 'a>) -> Self {
        Self {
            key,
            cursor,
            closed: false,
        }
    }

    pub fn key(&self) -> RelationKey {
        self.key
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Next scope id, `None` once exhausted or closed.
    pub fn advance(&mut self) -> IndexResult<Option<ScopeId>> {
        if self.closed {
            return Ok(None);
        }
        let step = self.cursor.advance();
        self.settle(step)
    }

    /// First remaining scope id `>= target`.
    pub fn seek(&mut self, target: ScopeId) -> IndexResult<Option<ScopeId>> {
        if self.closed {
            return Ok(None);
        }
        let step = self.cursor.seek(target);
        self.settle(step)
    }

    /// Close explicitly; dropping the guard has the same effect.
    pub fn close(mut self) {
        self.release();
    }

    fn settle(&mut self, step: IndexResult<Option<ScopeId>>) -> IndexResult<Option<ScopeId>> {
        match step {
            Ok(Some(id)) => Ok(Some(id)),
            Ok(None) => {
                self.release();
                Ok(None)
            }
            Err(e) if e.is_stale() => {
                warn!(
                    relation = %self.key,
                    error = %e,
                    "Relation went stale while iterating, skipping the rest"
                );
                self.release();
                Ok(None)
            }
            Err(e) => {
                self.release();
                Err(e)
            }
        }
    }

    fn release(&mut self) {
        if !self.closed {
            self.closed = true;
            self.cursor.close();
        }
    }
}

impl Drop for CursorGuard<'_> {
    fn drop(&mut self) {
        self.release();
    }
}
