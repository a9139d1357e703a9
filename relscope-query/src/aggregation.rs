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

//! Aggregation of matched scopes into ranked documents
//!
//! Every scope first collects the merged signature of all search sets that
//! contain it, so a relation counts at most once per scope no matter how
//! many overlapping sets reached that scope.

use crate::scoring::RelationWeights;
use crate::search_set::SearchSet;
use crate::signature::Signature;
use relscope_core::{RelationKey, ScopeId};
use relscope_index::{IndexResult, RelationIndex, ScopeResolver};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;

/// A ranked document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub document: ScopeId,
    pub score: f64,
    /// Query relations matched somewhere in the document.
    pub relations: BTreeSet<RelationKey>,
    /// Matched scopes owned by the document.
    pub sub_scopes: BTreeSet<ScopeId>,
}

impl DocumentResult {
    pub fn new(document: ScopeId) -> Self {
        Self {
            document,
            score: 0.0,
            relations: BTreeSet::new(),
            sub_scopes: BTreeSet::new(),
        }
    }
}

/// Union of signatures per matched scope.
pub fn scope_signatures(
    sets: &[SearchSet],
    index: &dyn RelationIndex,
) -> IndexResult<BTreeMap<ScopeId, Signature>> {
    let mut per_scope: BTreeMap<ScopeId, Signature> = BTreeMap::new();

    for set in sets {
        let mut stream = match set.postings().stream(index) {
            Ok(stream) => stream,
            Err(e) if e.is_stale() => {
                warn!(signature = ?set.signature(), error = %e, "Skipping stale search set");
                continue;
            }
            Err(e) => return Err(e),
        };

        while let Some(scope) = stream.next_scope()? {
            per_scope
                .entry(scope)
                .and_modify(|existing| *existing = Signature::merge(existing, set.signature()))
                .or_insert_with(|| set.signature().clone());
        }
    }
    Ok(per_scope)
}

/// Fold scopes into documents and rank them by score, highest first.
///
/// Ties are broken by ascending document id.
pub fn aggregate(
    sets: &[SearchSet],
    index: &dyn RelationIndex,
    resolver: &dyn ScopeResolver,
    weights: &RelationWeights,
    relations: &[RelationKey],
) -> IndexResult<Vec<DocumentResult>> {
    let per_scope = scope_signatures(sets, index)?;
    let mut by_document: HashMap<ScopeId, DocumentResult> = HashMap::new();

    for (scope, signature) in per_scope {
        let document = match resolver.find_first_ancestor_document(scope) {
            Ok(document) => document,
            Err(e) if e.is_stale() => {
                warn!(%scope, error = %e, "Skipping scope without a resolvable document");
                continue;
            }
            Err(e) => return Err(e),
        };

        let result = by_document
            .entry(document)
            .or_insert_with(|| DocumentResult::new(document));
        result.score += weights.signature_score(&signature);
        result
            .relations
            .extend(signature.iter().filter_map(|i| relations.get(i as usize).copied()));
        result.sub_scopes.insert(scope);
    }

    let mut results: Vec<DocumentResult> = by_document.into_values().collect();
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.document.cmp(&b.document))
    });
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relscope_core::ScopeKind;
    use relscope_index::{MemoryRelationIndex, Postings, ScopeTree};

    fn set(ordinals: &[u32], scopes: &[u64]) -> SearchSet {
        SearchSet::new(
            Signature::from_ordinals(ordinals.iter().copied()),
            Postings::from_sorted(scopes.iter().map(|&s| ScopeId(s)).collect()),
            0.0,
        )
    }

    /// Documents 100 and 200; sentences 1, 2 in 100 and 3 in 200.
    fn tree() -> ScopeTree {
        let tree = ScopeTree::new();
        tree.add_document(ScopeId(100));
        tree.add_document(ScopeId(200));
        tree.add_scope(ScopeId(1), Some(ScopeId(100)), ScopeKind::Sentence);
        tree.add_scope(ScopeId(2), Some(ScopeId(100)), ScopeKind::Sentence);
        tree.add_scope(ScopeId(3), Some(ScopeId(200)), ScopeKind::Sentence);
        tree
    }

    fn keys(n: u64) -> Vec<RelationKey> {
        (0..n).map(|i| RelationKey(1000 + i)).collect()
    }

    #[test]
    fn test_overlapping_signatures_count_once_per_scope() {
        let index = MemoryRelationIndex::new();
        let sets = vec![set(&[0], &[1]), set(&[0, 1], &[1]), set(&[1], &[1])];

        let per_scope = scope_signatures(&sets, &index).unwrap();
        assert_eq!(per_scope[&ScopeId(1)], Signature::from_ordinals([0, 1]));

        // bases 0.5, 0.5 with boost 2.0: relation 0 and 1 each add 1.0 once
        let weights = RelationWeights::compute(&[1, 1], &[5, 5], 2.0);
        let results = aggregate(&sets, &index, &tree(), &weights, &keys(2)).unwrap();
        assert_eq!(results.len(), 1);
        assert!((results[0].score - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_scopes_fold_into_documents() {
        let index = MemoryRelationIndex::new();
        let sets = vec![set(&[0], &[1, 2, 3])];
        let weights = RelationWeights::compute(&[1], &[3], 2.0);
        let results = aggregate(&sets, &index, &tree(), &weights, &keys(1)).unwrap();

        assert_eq!(results.len(), 2);
        let first = &results[0];
        assert_eq!(first.document, ScopeId(100));
        assert_eq!(first.sub_scopes, [ScopeId(1), ScopeId(2)].into_iter().collect());
        assert_eq!(first.relations, [RelationKey(1000)].into_iter().collect());
    }

    #[test]
    fn test_unresolvable_scope_is_skipped() {
        let index = MemoryRelationIndex::new();
        let sets = vec![set(&[0], &[1, 42])];
        let weights = RelationWeights::compute(&[1], &[2], 2.0);
        let results = aggregate(&sets, &index, &tree(), &weights, &keys(1)).unwrap();

        assert_eq!(results.len(), 1);
        assert!(!results[0].sub_scopes.contains(&ScopeId(42)));
    }

    #[test]
    fn test_ranking_descends_with_document_tiebreak() {
        let index = MemoryRelationIndex::new();
        let sets = vec![set(&[0], &[1, 3]), set(&[1], &[3])];
        let weights = RelationWeights::compute(&[1, 1], &[2, 8], 1.0);
        let results = aggregate(&sets, &index, &tree(), &weights, &keys(2)).unwrap();
        assert_eq!(results[0].document, ScopeId(200));
        assert!(results[0].score > results[1].score);

        let tied = vec![set(&[0], &[1, 3])];
        let results = aggregate(&tied, &index, &tree(), &weights, &keys(2)).unwrap();
        assert_eq!(results[0].score, results[1].score);
        assert_eq!(results[0].document, ScopeId(100));
    }

    #[test]
    fn test_empty_postings_contribute_nothing() {
        let index = MemoryRelationIndex::new();
        let sets = vec![set(&[0, 1], &[])];
        let weights = RelationWeights::compute(&[1, 1], &[1, 1], 2.0);
        assert!(aggregate(&sets, &index, &tree(), &weights, &keys(2)).unwrap().is_empty());
    }
}
