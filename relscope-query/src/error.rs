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

//! Search error types

use relscope_core::ConfigError;
use relscope_index::IndexError;
use thiserror::Error;

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that abort a search
///
/// Stale relations and scopes are not errors: they are skipped and logged.
#[derive(Debug, Error)]
pub enum SearchError {
    /// No informative relation left to search for
    #[error("Empty query: no informative relations to search for")]
    EmptyQuery,

    /// Index failure other than a stale reference
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// Invalid search configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
