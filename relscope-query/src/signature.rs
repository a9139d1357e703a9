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

//! Relation signatures
//!
//! A signature is the set of relation ordinals a search set was derived
//! from. Ordinals index the dense, per-search array of retained relations.

use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

/// Queries rarely carry more than a handful of relations.
const MAX_INLINE_ORDINALS: usize = 8;

type Ordinals = SmallVec<[u32; MAX_INLINE_ORDINALS]>;

/// Immutable, strictly ascending set of relation ordinals.
///
/// The content hash is computed once at construction; equality and hashing
/// depend only on the ordinals.
#[derive(Clone)]
pub struct Signature {
    ordinals: Ordinals,
    hash: u64,
}

impl Signature {
    /// Signature of a single relation.
    pub fn singleton(ordinal: u32) -> Self {
        let mut ordinals = Ordinals::new();
        ordinals.push(ordinal);
        Self::from_sorted(ordinals)
    }

    /// Build from arbitrary ordinals; sorts and removes duplicates.
    pub fn from_ordinals(ordinals: impl IntoIterator<Item = u32>) -> Self {
        let mut ordinals: Ordinals = ordinals.into_iter().collect();
        ordinals.sort_unstable();
        ordinals.dedup();
        Self::from_sorted(ordinals)
    }

    /// Sorted union of two signatures, O(|a| + |b|).
    pub fn merge(a: &Signature, b: &Signature) -> Self {
        let (x, y) = (a.ordinals.as_slice(), b.ordinals.as_slice());
        let mut out = Ordinals::with_capacity(x.len() + y.len());
        let (mut i, mut j) = (0, 0);

        while i < x.len() && j < y.len() {
            match x[i].cmp(&y[j]) {
                Ordering::Less => {
                    out.push(x[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    out.push(y[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    out.push(x[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        out.extend_from_slice(&x[i..]);
        out.extend_from_slice(&y[j..]);

        Self::from_sorted(out)
    }

    /// True when both signatures agree on their first `min(|a|, |b|)` ordinals.
    ///
    /// This is positional equality over the common length, not a subset
    /// test: `[1, 2]` vs `[1, 2, 3]` is true, but `[1, 3]` vs `[1, 2, 3]` is
    /// false even though `{1, 3}` is a subset of `{1, 2, 3}`.
    pub fn is_prefix_or_superfix(&self, other: &Signature) -> bool {
        self.ordinals
            .iter()
            .zip(other.ordinals.iter())
            .all(|(a, b)| a == b)
    }

    pub fn ordinals(&self) -> &[u32] {
        &self.ordinals
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ordinals.iter().copied()
    }

    pub fn contains(&self, ordinal: u32) -> bool {
        self.ordinals.binary_search(&ordinal).is_ok()
    }

    pub fn len(&self) -> usize {
        self.ordinals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }

    fn from_sorted(ordinals: Ordinals) -> Self {
        debug_assert!(ordinals.windows(2).all(|w| w[0] < w[1]));
        let mut hasher = XxHash64::with_seed(0);
        for ordinal in &ordinals {
            hasher.write_u32(*ordinal);
        }
        let hash = hasher.finish();
        Self { ordinals, hash }
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.ordinals == other.ordinals
    }
}

impl Eq for Signature {}

impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl Ord for Signature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinals.cmp(&other.ordinals)
    }
}

impl PartialOrd for Signature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ordinals.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sig(ordinals: &[u32]) -> Signature {
        Signature::from_ordinals(ordinals.iter().copied())
    }

    #[test]
    fn test_merge_is_sorted_union() {
        let merged = Signature::merge(&sig(&[0, 3, 5]), &sig(&[1, 3, 4, 9]));
        assert_eq!(merged.ordinals(), &[0, 1, 3, 4, 5, 9]);
    }

    #[test]
    fn test_merge_with_self_is_identity() {
        let a = sig(&[2, 4]);
        assert_eq!(Signature::merge(&a, &a), a);
    }

    #[test]
    fn test_prefix_or_superfix_literal_semantics() {
        assert!(sig(&[1, 2]).is_prefix_or_superfix(&sig(&[1, 2, 3])));
        assert!(sig(&[1, 2, 3]).is_prefix_or_superfix(&sig(&[1, 2])));
        assert!(!sig(&[1, 3]).is_prefix_or_superfix(&sig(&[1, 2, 3])));
        assert!(!sig(&[0]).is_prefix_or_superfix(&sig(&[1])));
        // A true subset that is not a positional prefix still reports false.
        assert!(!sig(&[2]).is_prefix_or_superfix(&sig(&[1, 2])));
    }

    #[test]
    fn test_from_ordinals_normalizes() {
        assert_eq!(sig(&[5, 1, 5, 3]).ordinals(), &[1, 3, 5]);
    }

    #[test]
    fn test_equal_content_hashes_equal() {
        let mut set = HashSet::new();
        set.insert(Signature::merge(&Signature::singleton(1), &Signature::singleton(0)));
        assert!(set.contains(&sig(&[0, 1])));
        assert!(!set.contains(&sig(&[0, 2])));
    }

    #[test]
    fn test_contains_and_debug() {
        let s = sig(&[1, 4]);
        assert!(s.contains(4));
        assert!(!s.contains(2));
        assert_eq!(format!("{:?}", s), "[1, 4]");
        assert_eq!(s.len(), 2);
    }
}
