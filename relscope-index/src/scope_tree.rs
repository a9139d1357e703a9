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

//! In-memory scope hierarchy.

use crate::error::{IndexError, IndexResult};
use crate::traits::ScopeResolver;
use parking_lot::RwLock;
use relscope_core::{ScopeId, ScopeKind};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
struct ScopeNode {
    parent: Option<ScopeId>,
    kind: ScopeKind,
}

/// Parent links between scopes: document -> sentence -> sub-scope.
///
/// Parents may be registered after their children; links are only followed
/// at resolution time.
#[derive(Default)]
pub struct ScopeTree {
    nodes: RwLock<HashMap<ScopeId, ScopeNode>>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level document.
    pub fn add_document(&self, id: ScopeId) {
        self.add_scope(id, None, ScopeKind::Document);
    }

    /// Register a scope under `parent`.
    pub fn add_scope(&self, id: ScopeId, parent: Option<ScopeId>, kind: ScopeKind) {
        self.nodes.write().insert(id, ScopeNode { parent, kind });
    }

    /// Remove a scope. Its children become unresolvable.
    pub fn remove(&self, id: ScopeId) -> bool {
        self.nodes.write().remove(&id).is_some()
    }

    pub fn kind(&self, id: ScopeId) -> Option<ScopeKind> {
        self.nodes.read().get(&id).map(|n| n.kind)
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.nodes.read().get(&id).and_then(|n| n.parent)
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }
}

impl ScopeResolver for ScopeTree {
    fn find_first_ancestor_document(&self, scope: ScopeId) -> IndexResult<ScopeId> {
        let nodes = self.nodes.read();
        let mut current = scope;
        // A well-formed chain visits every node at most once.
        for _ in 0..=nodes.len() {
            let node = nodes.get(&current).ok_or_else(|| IndexError::stale(current))?;
            if node.kind == ScopeKind::Document {
                return Ok(current);
            }
            current = node
                .parent
                .ok_or_else(|| IndexError::stale(format!("{scope} has no enclosing document")))?;
        }
        Err(IndexError::stale(format!("{scope} has a cyclic parent chain")))
    }
}
