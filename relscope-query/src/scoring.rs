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

//! Rarity- and arity-weighted relation scores.

use crate::signature::Signature;

/// Per-relation base scores for one search.
#[derive(Debug, Clone)]
pub struct RelationWeights {
    base: Vec<f64>,
    boost: f64,
    total_scopes: usize,
}

impl RelationWeights {
    /// Compute weights from per-relation arities and posting counts.
    ///
    /// `arities` and `counts` are indexed by relation ordinal.
    pub fn compute(arities: &[usize], counts: &[usize], sentence_boost_factor: f64) -> Self {
        debug_assert_eq!(arities.len(), counts.len());
        let total_scopes: usize = counts.iter().sum();
        let base = arities
            .iter()
            .zip(counts)
            .map(|(&arity, &count)| Self::base_score(arity, count, total_scopes))
            .collect();
        Self {
            base,
            boost: sentence_boost_factor,
            total_scopes,
        }
    }

    /// `arity * (1 - count / total)`, or 0 when nothing was found at all.
    pub fn base_score(arity: usize, count: usize, total_scopes: usize) -> f64 {
        if total_scopes == 0 {
            return 0.0;
        }
        arity as f64 * (1.0 - count as f64 / total_scopes as f64)
    }

    /// Base score of one relation.
    pub fn base(&self, ordinal: u32) -> f64 {
        self.base.get(ordinal as usize).copied().unwrap_or(0.0)
    }

    /// Sum of boosted base scores over the signature's ordinals.
    pub fn signature_score(&self, signature: &Signature) -> f64 {
        signature.iter().map(|i| self.base(i) * self.boost).sum()
    }

    pub fn total_scopes(&self) -> usize {
        self.total_scopes
    }

    pub fn sentence_boost_factor(&self) -> f64 {
        self.boost
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_score_formula() {
        assert!((RelationWeights::base_score(2, 3, 10) - 1.4).abs() < 1e-12);
        assert_eq!(RelationWeights::base_score(1, 10, 10), 0.0);
    }

    #[test]
    fn test_zero_total_scores_zero() {
        let weights = RelationWeights::compute(&[2, 3], &[0, 0], 2.0);
        assert_eq!(weights.total_scopes(), 0);
        assert_eq!(weights.base(0), 0.0);
        assert_eq!(weights.signature_score(&Signature::from_ordinals([0, 1])), 0.0);
    }

    #[test]
    fn test_rarer_and_wider_relations_score_higher() {
        let weights = RelationWeights::compute(&[1, 1, 3], &[8, 2, 8], 1.0);
        assert!(weights.base(1) > weights.base(0));
        assert!(weights.base(2) > weights.base(0));
    }

    #[test]
    fn test_signature_score_sums_boosted_bases() {
        let weights = RelationWeights::compute(&[1, 2], &[5, 5], 2.0);
        // bases: 0.5 and 1.0
        let score = weights.signature_score(&Signature::from_ordinals([0, 1]));
        assert!((score - 3.0).abs() < 1e-12);
        assert_eq!(weights.signature_score(&Signature::singleton(0)), 1.0);
    }
}
