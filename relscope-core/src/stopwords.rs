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

//! Stop-word / basic-word set used to drop uninformative relations.

use std::collections::HashSet;

/// High-frequency function words and basic verbs.
const BUILTIN_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "am", "an", "and", "any", "are", "as", "at",
    "be", "been", "before", "being", "below", "between", "both", "but", "by", "can", "could",
    "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from", "further",
    "get", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "make", "me",
    "more", "most", "my", "myself", "no", "nor", "not", "of", "off", "on", "once", "one", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "will", "with", "would", "you", "your", "yours", "yourself", "yourselves",
];

/// Case-insensitive set of words that carry no retrieval signal.
#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl Default for StopWords {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StopWords {
    /// The built-in English list.
    pub fn builtin() -> Self {
        Self {
            words: BUILTIN_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// An empty set; nothing is filtered.
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// Built-in list extended with `extra`.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::builtin();
        for word in extra {
            set.insert(word.as_ref());
        }
        set
    }

    pub fn insert(&mut self, word: &str) {
        self.words.insert(word.trim().to_lowercase());
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.trim().to_lowercase())
    }

    /// True when every filler is a stop word.
    ///
    /// A relation with no fillers at all is not considered uninformative.
    pub fn covers_all<S: AsRef<str>>(&self, fillers: &[S]) -> bool {
        !fillers.is_empty() && fillers.iter().all(|f| self.contains(f.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
