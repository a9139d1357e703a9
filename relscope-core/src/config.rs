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

//! Configuration for the relation search engine
//!
//! All knobs have defaults matching the established ranking behaviour, so an
//! empty TOML document yields [`SearchConfig::default`].

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of mating rounds per search
pub const DEFAULT_GENERATIONS: usize = 10;

/// Default posting-list size up to which postings are loaded into memory
pub const DEFAULT_IN_MEMORY_THRESHOLD: usize = 10_000;

/// Default multiplier applied to every relation's base score
pub const DEFAULT_SENTENCE_BOOST_FACTOR: f64 = 2.0;

/// Configuration for a single search
///
/// - `generations`: fixed work bound, the search is not adaptive
/// - `in_memory_threshold`: relations with `count <= threshold` are
///   materialized, larger ones are read through a lazy cursor
/// - `truncate_results`: when false, `search(max_results)` returns every
///   ranked document and ignores `max_results`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of generations to evolve the population for.
    pub generations: usize,

    /// Largest posting list that is materialized as an in-memory array.
    pub in_memory_threshold: usize,

    /// Multiplier applied to each relation's base score when a scope matches.
    pub sentence_boost_factor: f64,

    /// Whether `search(max_results)` truncates the ranked list.
    pub truncate_results: bool,

    /// Words treated as stop words in addition to the built-in list.
    pub extra_stop_words: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            generations: DEFAULT_GENERATIONS,
            in_memory_threshold: DEFAULT_IN_MEMORY_THRESHOLD,
            sentence_boost_factor: DEFAULT_SENTENCE_BOOST_FACTOR,
            truncate_results: true,
            extra_stop_words: Vec::new(),
        }
    }
}

impl SearchConfig {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: SearchConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "Loaded search config");
        Ok(config)
    }

    /// Reject values the scoring code cannot handle.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.sentence_boost_factor.is_finite() || self.sentence_boost_factor < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "sentence_boost_factor must be a finite, non-negative number (got {})",
                self.sentence_boost_factor
            )));
        }
        Ok(())
    }

    /// Config that returns every ranked document regardless of `max_results`
    pub fn untruncated() -> Self {
        Self {
            truncate_results: false,
            ..Self::default()
        }
    }

    /// Config with a custom number of generations
    pub fn with_generations(generations: usize) -> Self {
        Self {
            generations,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.generations, DEFAULT_GENERATIONS);
        assert_eq!(config.in_memory_threshold, DEFAULT_IN_MEMORY_THRESHOLD);
        assert_eq!(config.sentence_boost_factor, DEFAULT_SENTENCE_BOOST_FACTOR);
        assert!(config.truncate_results);
        assert!(config.extra_stop_words.is_empty());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = SearchConfig::from_toml_str("").unwrap();
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = SearchConfig::from_toml_str(
            r#"
            generations = 3
            extra_stop_words = ["thing"]
            "#,
        )
        .unwrap();
        assert_eq!(config.generations, 3);
        assert_eq!(config.in_memory_threshold, DEFAULT_IN_MEMORY_THRESHOLD);
        assert_eq!(config.extra_stop_words, vec!["thing".to_string()]);
    }

    #[test]
    fn test_negative_boost_rejected() {
        let err = SearchConfig::from_toml_str("sentence_boost_factor = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = SearchConfig::from_toml_str("generations = \"ten\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "in_memory_threshold = 5\ntruncate_results = false").unwrap();

        let config = SearchConfig::load(file.path()).unwrap();
        assert_eq!(config.in_memory_threshold, 5);
        assert!(!config.truncate_results);
    }

    #[test]
    fn test_presets() {
        assert!(!SearchConfig::untruncated().truncate_results);
        assert_eq!(SearchConfig::with_generations(0).generations, 0);
    }
}
