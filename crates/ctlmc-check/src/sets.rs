//! Packed state sets and the fixpoint drivers that run over them.
//!
//! Satisfaction records are two disjoint bitsets over dense state indices
//! rather than a per-state tri-state, so the fixpoint loops stay plain
//! word-level set algebra.

use std::fmt;
use tracing::trace;

/// A set of states over a fixed universe of dense indices `0..universe`.
#[derive(Clone, PartialEq, Eq)]
pub struct StateSet {
    words: Vec<u64>,
    universe: usize,
}

impl StateSet {
    /// The empty set over a universe of `universe` states.
    pub fn empty(universe: usize) -> Self {
        Self {
            words: vec![0; universe.div_ceil(64)],
            universe,
        }
    }

    /// The full set over a universe of `universe` states.
    pub fn full(universe: usize) -> Self {
        let mut set = Self::empty(universe);
        for i in 0..set.words.len() {
            set.words[i] = u64::MAX;
        }
        set.mask_tail();
        set
    }

    /// Build a set from the given member indices.
    pub fn from_indices<I>(universe: usize, indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut set = Self::empty(universe);
        for i in indices {
            set.insert(i);
        }
        set
    }

    /// Clear bits beyond the universe so whole-word algebra stays exact.
    fn mask_tail(&mut self) {
        let tail = self.universe % 64;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
    }

    /// Universe size in states (not the cardinality).
    pub fn universe(&self) -> usize {
        self.universe
    }

    /// Number of member states.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        debug_assert!(index < self.universe);
        self.words[index / 64] & (1u64 << (index % 64)) != 0
    }

    /// Insert a state. Returns true if it was newly inserted.
    #[inline]
    pub fn insert(&mut self, index: usize) -> bool {
        debug_assert!(index < self.universe);
        let word = &mut self.words[index / 64];
        let bit = 1u64 << (index % 64);
        let fresh = *word & bit == 0;
        *word |= bit;
        fresh
    }

    /// Remove a state. Returns true if it was present.
    #[inline]
    pub fn remove(&mut self, index: usize) -> bool {
        debug_assert!(index < self.universe);
        let word = &mut self.words[index / 64];
        let bit = 1u64 << (index % 64);
        let present = *word & bit != 0;
        *word &= !bit;
        present
    }

    pub fn union(&self, other: &StateSet) -> StateSet {
        self.zip_words(other, |a, b| a | b)
    }

    pub fn intersection(&self, other: &StateSet) -> StateSet {
        self.zip_words(other, |a, b| a & b)
    }

    /// Members of `self` that are not in `other`.
    pub fn difference(&self, other: &StateSet) -> StateSet {
        self.zip_words(other, |a, b| a & !b)
    }

    /// All states of the universe not in `self`.
    pub fn complement(&self) -> StateSet {
        let mut out = StateSet {
            words: self.words.iter().map(|&w| !w).collect(),
            universe: self.universe,
        };
        out.mask_tail();
        out
    }

    pub fn is_disjoint(&self, other: &StateSet) -> bool {
        debug_assert_eq!(self.universe, other.universe);
        self.words
            .iter()
            .zip(&other.words)
            .all(|(&a, &b)| a & b == 0)
    }

    pub fn is_subset(&self, other: &StateSet) -> bool {
        debug_assert_eq!(self.universe, other.universe);
        self.words
            .iter()
            .zip(&other.words)
            .all(|(&a, &b)| a & !b == 0)
    }

    /// Iterate over member indices in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            set: self,
            word_idx: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    fn zip_words(&self, other: &StateSet, f: impl Fn(u64, u64) -> u64) -> StateSet {
        debug_assert_eq!(self.universe, other.universe);
        StateSet {
            words: self
                .words
                .iter()
                .zip(&other.words)
                .map(|(&a, &b)| f(a, b))
                .collect(),
            universe: self.universe,
        }
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Iterator over the member indices of a [`StateSet`].
pub struct Iter<'a> {
    set: &'a StateSet,
    word_idx: usize,
    current: u64,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.word_idx += 1;
            if self.word_idx >= self.set.words.len() {
                return None;
            }
            self.current = self.set.words[self.word_idx];
        }
        let bit = self.current.trailing_zeros() as usize;
        self.current &= self.current - 1;
        Some(self.word_idx * 64 + bit)
    }
}

impl<'a> IntoIterator for &'a StateSet {
    type Item = usize;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

// === Fixpoint drivers ===

/// Least fixpoint: sweep the universe, adding every state the monotone
/// `grow` rule admits given the current set, until a sweep adds nothing.
///
/// `grow` must be monotone in the set argument (once admitted, always
/// admitted), which makes the result the unique least fixpoint regardless
/// of sweep order.
pub fn least_fixpoint<F>(seed: StateSet, mut grow: F) -> StateSet
where
    F: FnMut(usize, &StateSet) -> bool,
{
    let mut current = seed;
    let mut iterations = 0usize;
    loop {
        iterations += 1;
        let mut additions = Vec::new();
        for s in 0..current.universe() {
            if !current.contains(s) && grow(s, &current) {
                additions.push(s);
            }
        }
        if additions.is_empty() {
            trace!(iterations, size = current.len(), "least fixpoint converged");
            return current;
        }
        for s in additions {
            current.insert(s);
        }
    }
}

/// Greatest fixpoint: start from a candidate set and remove every state
/// the `keep` rule no longer justifies, until a sweep removes nothing.
pub fn greatest_fixpoint<F>(start: StateSet, mut keep: F) -> StateSet
where
    F: FnMut(usize, &StateSet) -> bool,
{
    let mut current = start;
    let mut iterations = 0usize;
    loop {
        iterations += 1;
        let mut removals = Vec::new();
        for s in current.iter() {
            if !keep(s, &current) {
                removals.push(s);
            }
        }
        if removals.is_empty() {
            trace!(
                iterations,
                size = current.len(),
                "greatest fixpoint converged"
            );
            return current;
        }
        for s in removals {
            current.remove(s);
        }
    }
}
