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

//! Index error types

use thiserror::Error;

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors raised by relation indexes and scope resolvers
#[derive(Debug, Error)]
pub enum IndexError {
    /// The handle no longer resolves, e.g. it was deleted concurrently
    #[error("Stale reference: {0}")]
    StaleReference(String),

    /// Cursor used after it was closed
    #[error("Cursor for {0} used after close")]
    CursorClosed(String),

    /// Underlying store failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// Snapshot document is malformed
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IndexError {
    /// Stale references are skipped by the search, everything else aborts it.
    pub fn is_stale(&self) -> bool {
        matches!(self, IndexError::StaleReference(_))
    }

    pub fn stale(what: impl std::fmt::Display) -> Self {
        IndexError::StaleReference(what.to_string())
    }
}

impl From<serde_json::Error> for IndexError {
    fn from(e: serde_json::Error) -> Self {
        IndexError::Snapshot(e.to_string())
    }
}
