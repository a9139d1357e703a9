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

//! Population pruning strategies
//!
//! A pruner runs at the start of every generation, before mates are chosen.
//! Signatures of removed sets stay examined and are never produced again.

use crate::search_set::SearchSet;

/// Decides which search sets survive into the next generation.
pub trait Pruner {
    fn prune(&self, population: Vec<SearchSet>) -> Vec<SearchSet>;
}

/// Keeps every search set. This is the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAll;

impl Pruner for KeepAll {
    fn prune(&self, population: Vec<SearchSet>) -> Vec<SearchSet> {
        population
    }
}

/// Drops materialized search sets whose postings are empty.
///
/// Lazy postings are kept since their size is only known by reading them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropEmpty;

impl Pruner for DropEmpty {
    fn prune(&self, mut population: Vec<SearchSet>) -> Vec<SearchSet> {
        population.retain(|set| set.postings().is_lazy() || !set.is_empty());
        population
    }
}

impl<F> Pruner for F
where
    F: Fn(Vec<SearchSet>) -> Vec<SearchSet>,
{
    fn prune(&self, population: Vec<SearchSet>) -> Vec<SearchSet> {
        self(population)
    }
}
