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

//! JSON snapshot of a relation store
//!
//! ```json
//! {
//!   "scopes":    [{ "id": 1, "kind": "document" },
//!                 { "id": 10, "parent": 1, "kind": "sentence" }],
//!   "relations": [{ "key": 7, "arity": 2, "fillers": ["cell", "divide"], "scopes": [10] }]
//! }
//! ```

use crate::error::{IndexError, IndexResult};
use crate::memory::MemoryRelationIndex;
use crate::scope_tree::ScopeTree;
use relscope_core::{RelationKey, ScopeId, ScopeKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One node of the scope hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeRecord {
    pub id: ScopeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
}

/// One stored relation with its occurrences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationRecord {
    pub key: RelationKey,
    pub arity: usize,
    #[serde(default)]
    pub fillers: Vec<String>,
    #[serde(default)]
    pub scopes: Vec<ScopeId>,
}

/// Serializable contents of a relation store and its scope hierarchy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexSnapshot {
    #[serde(default)]
    pub scopes: Vec<ScopeRecord>,
    #[serde(default)]
    pub relations: Vec<RelationRecord>,
}

impl IndexSnapshot {
    pub fn from_json_str(text: &str) -> IndexResult<Self> {
        let snapshot: IndexSnapshot = serde_json::from_str(text)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn load(path: impl AsRef<Path>) -> IndexResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> IndexResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check arities and duplicate relation keys.
    pub fn validate(&self) -> IndexResult<()> {
        let mut seen = std::collections::HashSet::new();
        for relation in &self.relations {
            if relation.arity == 0 {
                return Err(IndexError::Snapshot(format!("{} has arity 0", relation.key)));
            }
            if !seen.insert(relation.key) {
                return Err(IndexError::Snapshot(format!("{} listed twice", relation.key)));
            }
        }
        Ok(())
    }

    /// Build an index and a scope tree from the snapshot.
    pub fn build(&self) -> IndexResult<(MemoryRelationIndex, ScopeTree)> {
        self.validate()?;

        let tree = ScopeTree::new();
        for scope in &self.scopes {
            tree.add_scope(scope.id, scope.parent, scope.kind);
        }

        let index = MemoryRelationIndex::new();
        for relation in &self.relations {
            index.insert_relation(relation.key, relation.arity, relation.fillers.clone());
            index.record_batch(relation.key, relation.scopes.iter().copied())?;
        }

        tracing::debug!(
            scopes = self.scopes.len(),
            relations = self.relations.len(),
            "Built index from snapshot"
        );
        Ok((index, tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{RelationIndex, ScopeResolver};

    const SAMPLE: &str = r#"{
        "scopes": [
            { "id": 1, "kind": "document" },
            { "id": 10, "parent": 1, "kind": "sentence" },
            { "id": 11, "parent": 1, "kind": "sentence" }
        ],
        "relations": [
            { "key": 7, "arity": 2, "fillers": ["cell", "divide"], "scopes": [11, 10] }
        ]
    }"#;

    #[test]
    fn test_build_from_json() {
        let snapshot = IndexSnapshot::from_json_str(SAMPLE).unwrap();
        let (index, tree) = snapshot.build().unwrap();

        assert_eq!(index.count(RelationKey(7)).unwrap(), 2);
        assert_eq!(index.postings(RelationKey(7)).unwrap(), vec![ScopeId(10), ScopeId(11)]);
        assert_eq!(tree.find_first_ancestor_document(ScopeId(11)).unwrap(), ScopeId(1));
    }

    #[test]
    fn test_zero_arity_rejected() {
        let text = r#"{ "relations": [{ "key": 1, "arity": 0 }] }"#;
        assert!(matches!(
            IndexSnapshot::from_json_str(text),
            Err(IndexError::Snapshot(_))
        ));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let text = r#"{ "relations": [{ "key": 1, "arity": 1 }, { "key": 1, "arity": 2 }] }"#;
        assert!(IndexSnapshot::from_json_str(text).is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            IndexSnapshot::from_json_str("{ not json"),
            Err(IndexError::Snapshot(_))
        ));
    }

    #[test]
    fn test_json_round_trip_preserves_content() {
        let snapshot = IndexSnapshot::from_json_str(SAMPLE).unwrap();
        let again = IndexSnapshot::from_json_str(&snapshot.to_json_string().unwrap()).unwrap();
        assert_eq!(again.scopes.len(), 3);
        assert_eq!(again.relations[0].fillers, vec!["cell", "divide"]);
    }
}
