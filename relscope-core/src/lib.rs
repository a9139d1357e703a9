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

//! Relscope Core
//!
//! Identifiers and configuration shared by the relation index and the
//! retrieval engine.

pub mod config;
pub mod error;
pub mod id;
pub mod stopwords;

pub use config::{
    SearchConfig, DEFAULT_GENERATIONS, DEFAULT_IN_MEMORY_THRESHOLD, DEFAULT_SENTENCE_BOOST_FACTOR,
};
pub use error::{ConfigError, ConfigResult};
pub use id::{RelationKey, ScopeId, ScopeKind};
pub use stopwords::StopWords;
