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

//! Relscope Index Layer
//!
//! Contracts the retrieval engine consumes from the relation store, plus
//! in-memory implementations of them.
//!
//! ## Contracts
//!
//! - [`RelationIndex`]: cardinality, arity, argument fillers and sorted
//!   posting lists per relation. Postings are read either fully
//!   materialized or through a forward-only [`PostingCursor`].
//! - [`ScopeResolver`]: maps any scope to its enclosing document.
//!
//! ## Postings
//!
//! [`Postings`] decides between an in-memory array and a lazy cursor based on
//! the relation's cardinality. Cursors are always held through a
//! [`CursorGuard`], which closes them on every exit path.
//!
//! ## Consistency
//!
//! Reads are not isolated. A relation deleted while a search is running
//! surfaces as [`IndexError::StaleReference`] and is skipped by callers.

pub mod cursor;
pub mod error;
pub mod memory;
pub mod postings;
pub mod scope_tree;
pub mod snapshot;
pub mod traits;

pub use cursor::CursorGuard;
pub use error::{IndexError, IndexResult};
pub use memory::{MemoryIndexStats, MemoryRelationIndex};
pub use postings::{PostingStream, Postings};
pub use scope_tree::ScopeTree;
pub use snapshot::{IndexSnapshot, RelationRecord, ScopeRecord};
pub use traits::{PostingCursor, RelationIndex, ScopeResolver};
