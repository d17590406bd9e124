use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::vector_math::dot_unchecked;
use crate::word_vector::WordRef;

/// Strategy for resolving a word to its first position in the vocabulary.
///
/// Both implementations answer identically; they differ only in cost.
pub trait WordLookup: Send + Sync {
    /// Record that `word` lives at `index`. Indices arrive in ascending order.
    fn insert(&mut self, word: &str, index: usize);

    fn find(&self, words: &[String], word: &str) -> Option<usize>;
}

/// First-match scan over the word list. O(n) per lookup, no extra memory.
#[derive(Debug, Default)]
pub struct LinearScan;

impl WordLookup for LinearScan {
    fn insert(&mut self, _word: &str, _index: usize) {}

    fn find(&self, words: &[String], word: &str) -> Option<usize> {
        words.iter().position(|w| w == word)
    }
}

/// Word to first index map.
#[derive(Debug, Default)]
pub struct HashLookup {
    word_map: HashMap<String, usize>,
}

impl WordLookup for HashLookup {
    fn insert(&mut self, word: &str, index: usize) {
        // duplicates keep the earliest entry, as a linear scan would
        if !self.word_map.contains_key(word) {
            self.word_map.insert(word.to_string(), index);
        }
    }

    fn find(&self, _words: &[String], word: &str) -> Option<usize> {
        self.word_map.get(word).copied()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LookupKind {
    Linear,
    #[default]
    Hash,
}

impl LookupKind {
    fn build(self) -> Box<dyn WordLookup> {
        match self {
            LookupKind::Linear => Box::new(LinearScan),
            LookupKind::Hash => Box::new(HashLookup::default()),
        }
    }
}

// Upper bounds on the capacity reserved from header values before any
// record has been read.
const PREALLOC_WORDS: usize = 1 << 16;
const PREALLOC_VALUES: usize = 1 << 24;

/// The loaded table: words in file order and their vectors in one
/// contiguous buffer.
pub struct Vocabulary {
    words: Vec<String>,               // index to word
    vectors: Vec<f32>,                // flattened, `dims` values per word
    dims: usize,                      // length of every vector
    declared_words: usize,            // word count from the header
    lookup: Box<dyn WordLookup>,      // word to index
}

impl Vocabulary {
    pub(crate) fn new(declared_words: usize, dims: usize, lookup: LookupKind) -> Self {
        Vocabulary {
            words: Vec::with_capacity(declared_words.min(PREALLOC_WORDS)),
            vectors: Vec::with_capacity(
                declared_words
                    .min(PREALLOC_WORDS)
                    .saturating_mul(dims)
                    .min(PREALLOC_VALUES),
            ),
            dims,
            declared_words,
            lookup: lookup.build(),
        }
    }

    pub(crate) fn push(&mut self, word: &str, values: &[f32]) -> Result<()> {
        if values.len() != self.dims {
            return Err(Error::DimensionMismatch {
                expected: self.dims,
                actual: values.len(),
            });
        }
        self.lookup.insert(word, self.words.len());
        self.words.push(word.to_string());
        self.vectors.extend_from_slice(values);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn declared_words(&self) -> usize {
        self.declared_words
    }

    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.lookup.find(&self.words, word)
    }

    pub fn word(&self, idx: usize) -> &str {
        &self.words[idx]
    }

    pub fn values(&self, idx: usize) -> &[f32] {
        &self.vectors[idx * self.dims..(idx + 1) * self.dims]
    }

    pub fn entry(&self, idx: usize) -> WordRef<'_> {
        WordRef {
            index: idx,
            word: self.word(idx),
            values: self.values(idx),
        }
    }

    /// First entry whose word equals `word` exactly.
    pub fn get_vector(&self, word: &str) -> Option<WordRef<'_>> {
        self.index_of(word).map(|idx| self.entry(idx))
    }

    /// All entries, or only those whose word is in `filter`, in vocabulary order.
    pub fn get_vectors(&self, filter: Option<&[&str]>) -> Vec<WordRef<'_>> {
        match filter {
            None => self.iter().collect(),
            Some(words) => {
                let wanted: HashSet<&str> = words.iter().copied().collect();
                self.iter().filter(|e| wanted.contains(e.word)).collect()
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = WordRef<'_>> + '_ {
        (0..self.len()).map(|idx| self.entry(idx))
    }

    /// Dot product of `target` with every entry, in index order.
    ///
    /// `target` must already have `dims` components.
    pub(crate) fn scores(&self, target: &[f32]) -> Vec<f32> {
        debug_assert_eq!(target.len(), self.dims);
        self.vectors
            .par_chunks_exact(self.dims)
            .map(|v_slice| dot_unchecked(v_slice, target))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(kind: LookupKind) -> Vocabulary {
        let mut vocab = Vocabulary::new(4, 2, kind);
        vocab.push("and", &[1.0, 0.0]).unwrap();
        vocab.push("or", &[0.0, 1.0]).unwrap();
        vocab.push("And", &[0.6, 0.8]).unwrap();
        vocab.push("and", &[0.8, 0.6]).unwrap();
        vocab
    }

    #[test]
    fn lookup_is_exact_and_first_match() {
        for kind in [LookupKind::Linear, LookupKind::Hash] {
            let vocab = sample(kind);
            let and = vocab.get_vector("and").unwrap();
            assert_eq!(and.index, 0);
            assert_eq!(and.values, &[1.0, 0.0]);
            assert_eq!(vocab.index_of("And"), Some(2));
            assert_eq!(vocab.index_of("AND"), None);
            assert!(vocab.get_vector("").is_none());
        }
    }

    #[test]
    fn get_vectors_keeps_vocabulary_order() {
        let vocab = sample(LookupKind::Hash);
        let all = vocab.get_vectors(None);
        assert_eq!(all.len(), 4);

        let picked: Vec<usize> = vocab
            .get_vectors(Some(&["or", "and", "missing"][..]))
            .iter()
            .map(|e| e.index)
            .collect();
        assert_eq!(picked, vec![0, 1, 3]);
    }

    #[test]
    fn push_rejects_wrong_length() {
        let mut vocab = Vocabulary::new(1, 3, LookupKind::Linear);
        assert!(matches!(
            vocab.push("x", &[1.0]),
            Err(Error::DimensionMismatch {
                expected: 3,
                actual: 1
            })
        ));
        assert!(vocab.is_empty());
    }

    #[test]
    fn oversized_header_values_do_not_preallocate() {
        let mut unbounded = Vocabulary::new(usize::MAX, usize::MAX, LookupKind::Hash);
        assert_eq!(unbounded.declared_words(), usize::MAX);
        assert!(matches!(
            unbounded.push("a", &[1.0]),
            Err(Error::DimensionMismatch { .. })
        ));

        let mut large = Vocabulary::new(100_000_000_000, 300, LookupKind::Linear);
        large.push("a", &[0.5; 300]).unwrap();
        assert_eq!(large.len(), 1);
    }

    #[test]
    fn scores_follow_index_order() {
        let vocab = sample(LookupKind::Hash);
        assert_eq!(vocab.scores(&[1.0, 0.0]), vec![1.0, 0.0, 0.6, 0.8]);
    }
}
