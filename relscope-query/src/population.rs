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

//! Generation loop over search sets
//!
//! One generation:
//!
//! 1. prune the population
//! 2. freeze the current generation (the population as it stands now)
//! 3. for every set in it, scan forward cyclically for the first partner
//!    whose merged signature is new and which does not share its prefix
//! 4. intersect each pair's postings into a child
//! 5. append all children to the population and mark their signatures
//!    examined
//!
//! Children never mate within the generation that produced them. A partner
//! may be chosen by several sets, and two sets choosing each other produce
//! the same child twice; aggregation merges signatures, so duplicates do
//! not change scores.

use crate::merge::intersect;
use crate::prune::Pruner;
use crate::scoring::RelationWeights;
use crate::search_set::SearchSet;
use crate::signature::Signature;
use relscope_index::{IndexResult, Postings, RelationIndex};
use std::collections::HashSet;
use tracing::{trace, warn};

/// Search sets plus the signatures already produced.
#[derive(Debug, Default)]
pub struct Population {
    sets: Vec<SearchSet>,
    examined: HashSet<Signature>,
}

impl Population {
    /// Start from the initial singleton sets.
    pub fn new(initial: Vec<SearchSet>) -> Self {
        let examined = initial.iter().map(|s| s.signature().clone()).collect();
        Self {
            sets: initial,
            examined,
        }
    }

    pub fn sets(&self) -> &[SearchSet] {
        &self.sets
    }

    pub fn examined(&self) -> &HashSet<Signature> {
        &self.examined
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Whether `left` and `right` may produce a child.
    pub fn can_mate(&self, left: &SearchSet, right: &SearchSet) -> bool {
        !left.signature().is_prefix_or_superfix(right.signature())
            && !self
                .examined
                .contains(&Signature::merge(left.signature(), right.signature()))
    }

    /// Pick at most one partner for every set, as `(left, right)` positions.
    ///
    /// Partners are searched cyclically starting after `left`; the scan
    /// stops when it wraps back to `left`.
    pub fn find_mates(&self, generation: &[SearchSet]) -> Vec<(usize, usize)> {
        let n = generation.len();
        let mut pairs = Vec::new();

        for (i, left) in generation.iter().enumerate() {
            let partner = (1..n)
                .map(|step| (i + step) % n)
                .find(|&j| self.can_mate(left, &generation[j]));
            if let Some(j) = partner {
                pairs.push((i, j));
            }
        }
        pairs
    }

    /// Run one generation. Returns the number of children appended.
    ///
    /// On error no child is appended and nothing new is marked examined.
    pub fn evolve_once(
        &mut self,
        index: &dyn RelationIndex,
        weights: &RelationWeights,
        pruner: &dyn Pruner,
    ) -> IndexResult<usize> {
        let sets = std::mem::take(&mut self.sets);
        self.sets = pruner.prune(sets);

        let current_generation = self.sets.as_slice();
        let pairs = self.find_mates(current_generation);

        let mut children = Vec::with_capacity(pairs.len());
        for (i, j) in pairs {
            let child = mate(index, weights, &current_generation[i], &current_generation[j])?;
            trace!(
                left = ?current_generation[i].signature(),
                right = ?current_generation[j].signature(),
                child = ?child.signature(),
                postings = child.len(),
                "Mated search sets"
            );
            children.push(child);
        }

        let produced = children.len();
        for child in children {
            self.examined.insert(child.signature().clone());
            self.sets.push(child);
        }
        Ok(produced)
    }
}

/// Combine two sets: merged signature, intersected postings, summed score.
///
/// A side whose relation has gone stale contributes no postings.
pub fn mate(
    index: &dyn RelationIndex,
    weights: &RelationWeights,
    left: &SearchSet,
    right: &SearchSet,
) -> IndexResult<SearchSet> {
    let signature = Signature::merge(left.signature(), right.signature());
    let postings = match intersect(left.postings(), right.postings(), index) {
        Ok(ids) => Postings::from_sorted(ids),
        Err(e) if e.is_stale() => {
            warn!(
                signature = ?signature,
                error = %e,
                "Stale relation while mating, child is empty"
            );
            Postings::empty()
        }
        Err(e) => return Err(e),
    };
    let score = weights.signature_score(&signature);
    Ok(SearchSet::new(signature, postings, score))
}
