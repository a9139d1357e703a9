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

//! Search entry point
//!
//! Construction filters the candidate relations and builds the initial
//! population; [`Search::search`] evolves it and ranks documents.

use crate::aggregation::{aggregate, DocumentResult};
use crate::error::{Result, SearchError};
use crate::population::Population;
use crate::prune::{KeepAll, Pruner};
use crate::scoring::RelationWeights;
use crate::search_set::SearchSet;
use crate::signature::Signature;
use relscope_core::{RelationKey, SearchConfig, StopWords};
use relscope_index::{IndexResult, Postings, RelationIndex, ScopeResolver};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Counters describing one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub relations_retained: usize,
    /// Stop relations plus relations that were stale at construction.
    pub relations_ignored: usize,
    pub generations_run: usize,
    pub population: usize,
    pub examined: usize,
    /// Documents returned by the most recent `search` call.
    pub documents: usize,
}

/// A retained relation before it is assigned an ordinal.
struct LoadedRelation {
    key: RelationKey,
    arity: usize,
    count: usize,
    postings: Postings,
}

/// One query over a relation index.
///
/// A `Search` owns its population and opens its own cursors; it is not meant
/// to be shared between threads while searching.
pub struct Search<'a> {
    index: &'a dyn RelationIndex,
    resolver: &'a dyn ScopeResolver,
    config: SearchConfig,
    relations: Vec<RelationKey>,
    weights: RelationWeights,
    population: Population,
    pruner: Box<dyn Pruner + 'a>,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    /// Build a search with the default config.
    pub fn new(
        index: &'a dyn RelationIndex,
        resolver: &'a dyn ScopeResolver,
        candidates: &[RelationKey],
    ) -> Result<Self> {
        Self::with_config(index, resolver, candidates, SearchConfig::default())
    }

    /// Build a search with an explicit config.
    ///
    /// Fails with [`SearchError::EmptyQuery`] when `candidates` is empty or
    /// when every candidate is a stop relation or stale.
    pub fn with_config(
        index: &'a dyn RelationIndex,
        resolver: &'a dyn ScopeResolver,
        candidates: &[RelationKey],
        config: SearchConfig,
    ) -> Result<Self> {
        if candidates.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        config.validate()?;

        let stop_words = StopWords::with_extra(&config.extra_stop_words);
        let mut loaded = Vec::with_capacity(candidates.len());
        let mut ignored = 0;
        let mut seen = HashSet::new();

        for &key in candidates {
            if !seen.insert(key) {
                debug!(%key, "Duplicate candidate relation");
            }
            match load_relation(index, key, &stop_words, config.in_memory_threshold) {
                Ok(Some(relation)) => loaded.push(relation),
                Ok(None) => {
                    debug!(%key, "Ignoring stop relation");
                    ignored += 1;
                }
                Err(e) if e.is_stale() => {
                    warn!(%key, error = %e, "Skipping stale relation");
                    ignored += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        if loaded.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let arities: Vec<usize> = loaded.iter().map(|r| r.arity).collect();
        let counts: Vec<usize> = loaded.iter().map(|r| r.count).collect();
        let weights = RelationWeights::compute(&arities, &counts, config.sentence_boost_factor);

        let mut relations = Vec::with_capacity(loaded.len());
        let mut initial = Vec::with_capacity(loaded.len());
        for (ordinal, relation) in (0u32..).zip(loaded) {
            let signature = Signature::singleton(ordinal);
            let score = weights.signature_score(&signature);
            relations.push(relation.key);
            initial.push(SearchSet::new(signature, relation.postings, score));
        }

        debug!(
            retained = relations.len(),
            ignored,
            total_scopes = weights.total_scopes(),
            "Built initial population"
        );

        let population = Population::new(initial);
        let stats = SearchStats {
            relations_retained: relations.len(),
            relations_ignored: ignored,
            population: population.len(),
            examined: population.examined().len(),
            ..SearchStats::default()
        };

        Ok(Self {
            index,
            resolver,
            config,
            relations,
            weights,
            population,
            pruner: Box::new(KeepAll),
            stats,
        })
    }

    /// Replace the pruning strategy run at the start of each generation.
    pub fn with_pruner(mut self, pruner: impl Pruner + 'a) -> Self {
        self.pruner = Box::new(pruner);
        self
    }

    /// Run the configured number of generations.
    ///
    /// Called by [`Search::search`]. Completed generations are never rerun:
    /// after an index error a later call resumes with the generation that
    /// failed, and once all generations ran this is a no-op.
    pub fn evolve(&mut self) -> Result<()> {
        while self.stats.generations_run < self.config.generations {
            let generation = self.stats.generations_run;
            let produced =
                self.population
                    .evolve_once(self.index, &self.weights, self.pruner.as_ref())?;
            self.stats.generations_run += 1;
            self.stats.population = self.population.len();
            self.stats.examined = self.population.examined().len();
            debug!(
                generation,
                produced,
                population = self.population.len(),
                examined = self.population.examined().len(),
                "Generation complete"
            );
        }
        Ok(())
    }

    /// Rank documents, best first.
    ///
    /// With `truncate_results` set (the default) at most `max_results`
    /// documents are returned, otherwise the full ranking.
    pub fn search(&mut self, max_results: usize) -> Result<Vec<DocumentResult>> {
        self.evolve()?;

        let mut results = aggregate(
            self.population.sets(),
            self.index,
            self.resolver,
            &self.weights,
            &self.relations,
        )?;
        let ranked = results.len();
        if self.config.truncate_results {
            results.truncate(max_results);
        }
        self.stats.documents = results.len();

        info!(
            relations = self.relations.len(),
            population = self.population.len(),
            ranked,
            returned = results.len(),
            "Search complete"
        );
        Ok(results)
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn examined(&self) -> &HashSet<Signature> {
        self.population.examined()
    }

    pub fn weights(&self) -> &RelationWeights {
        &self.weights
    }

    /// Retained relation keys, indexed by ordinal.
    pub fn relations(&self) -> &[RelationKey] {
        &self.relations
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

/// Read everything needed about one candidate. `None` for a stop relation.
fn load_relation(
    index: &dyn RelationIndex,
    key: RelationKey,
    stop_words: &StopWords,
    in_memory_threshold: usize,
) -> IndexResult<Option<LoadedRelation>> {
    let fillers = index.fillers(key)?;
    if stop_words.covers_all(&fillers) {
        return Ok(None);
    }

    let arity = index.arity(key)?;
    let count = index.count(key)?;
    let postings = Postings::load(index, key, count, in_memory_threshold)?;
    Ok(Some(LoadedRelation {
        key,
        arity,
        count,
        postings,
    }))
}
