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

//! Opaque identifiers for stored relations and scope nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a stored semantic relation (predicate plus argument fillers).
///
/// The relation itself is owned by the external store; the engine only
/// carries the key around and asks the index for arity, fillers and postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationKey(pub u64);

/// Identifier of a node in the scope hierarchy (document, sentence, sub-scope).
///
/// Posting lists are sorted by this id, so the ordering is load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(pub u64);

/// Kind of a scope node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    /// Top-level document; results are aggregated to this level.
    Document,
    Sentence,
    /// Any finer-grained scope below a sentence.
    SubScope,
}

impl fmt::Display for RelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rel:{}", self.0)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope:{}", self.0)
    }
}

impl From<u64> for RelationKey {
    fn from(raw: u64) -> Self {
        RelationKey(raw)
    }
}

impl From<u64> for ScopeId {
    fn from(raw: u64) -> Self {
        ScopeId(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_ordering_follows_raw_id() {
        let mut scopes = vec![ScopeId(7), ScopeId(2), ScopeId(5)];
        scopes.sort();
        assert_eq!(scopes, vec![ScopeId(2), ScopeId(5), ScopeId(7)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(RelationKey(3).to_string(), "rel:3");
        assert_eq!(ScopeId(42).to_string(), "scope:42");
    }

    #[test]
    fn test_scope_kind_serde() {
        #[derive(Serialize)]
        struct Node {
            kind: ScopeKind,
        }
        let out = toml::to_string(&Node { kind: ScopeKind::SubScope }).unwrap();
        assert_eq!(out.trim(), "kind = \"sub_scope\"");
    }
}
