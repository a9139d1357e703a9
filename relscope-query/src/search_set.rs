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

use crate::signature::Signature;
use relscope_index::Postings;

/// A signature, the scopes matching every relation in it, and its score.
///
/// Postings are always the intersection of the singleton postings of every
/// ordinal in the signature.
#[derive(Debug, Clone)]
pub struct SearchSet {
    signature: Signature,
    postings: Postings,
    score: f64,
}

impl SearchSet {
    pub fn new(signature: Signature, postings: Postings, score: f64) -> Self {
        Self {
            signature,
            postings,
            score,
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn postings(&self) -> &Postings {
        &self.postings
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Posting count (load-time count for lazy postings).
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}
