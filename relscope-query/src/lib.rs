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

//! Relscope Query Engine
//!
//! Ranks documents against a query given as a list of candidate relations.
//!
//! # Algorithm
//!
//! Each retained relation starts as a [`SearchSet`]: a singleton
//! [`Signature`] plus the relation's posting list. For a fixed number of
//! generations every set is paired with the next compatible set in the
//! population (wrapping around), and the pair's postings are intersected.
//! Children are appended after the round, so the population grows by at
//! most its own size per generation. [`Signature`]s already produced are
//! never recomputed.
//!
//! After the last generation every scope collects the union of the
//! signatures whose postings contain it, and scopes are folded into their
//! owning documents:
//!
//! ```text
//! score(document) = Σ_scope Σ_{i ∈ signature(scope)} base(i) * sentence_boost_factor
//! base(i)         = arity(i) * (1 - count(i) / Σ count)
//! ```
//!
//! This is a heuristic: it does not enumerate every subset of relations and
//! does not guarantee an optimal top-k.
//!
//! # Example
//!
//! ```rust,ignore
//! use relscope_query::Search;
//!
//! let mut search = Search::new(&index, &scopes, &candidates)?;
//! for hit in search.search(10)? {
//!     println!("{} {:.3}", hit.document, hit.score);
//! }
//! ```

pub mod aggregation;
pub mod engine;
pub mod error;
pub mod merge;
pub mod population;
pub mod prune;
pub mod scoring;
pub mod search_set;
pub mod signature;

pub use aggregation::DocumentResult;
pub use engine::{Search, SearchStats};
pub use error::{Result, SearchError};
pub use merge::{intersect, SortedIntersection};
pub use population::Population;
pub use prune::{DropEmpty, KeepAll, Pruner};
pub use scoring::RelationWeights;
pub use search_set::SearchSet;
pub use signature::Signature;
