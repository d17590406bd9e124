use std::collections::HashSet;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::warn;

use crate::error::{Error, Result};
use crate::loader::{self, LoadOptions};
use crate::top_n::TopN;
use crate::vector_math::{self, normalize};
use crate::vocabulary::Vocabulary;
use crate::word_vector::{ScoredWord, WordRef};

pub const DEFAULT_NEAREST_WORDS: usize = 10;
pub const DEFAULT_MOST_SIMILAR: usize = 40;
pub const DEFAULT_ANALOGY: usize = 40;

/// A loaded embedding table and the queries it answers.
///
/// Every vector is unit length, so a dot product is a cosine similarity.
/// Queries take `&self` and never touch the stored vectors.
pub struct WordVectors {
    vocab: Vocabulary,
}

impl WordVectors {
    pub fn from_reader<R: BufRead>(reader: R, options: &LoadOptions) -> Result<WordVectors> {
        let vocab = loader::read_vocabulary(reader, options)?;
        Ok(WordVectors { vocab })
    }

    /// Read word vectors from a text file, normalising each to unit length.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<WordVectors> {
        Self::from_file_with(path, &LoadOptions::default())
    }

    pub fn from_file_with<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<WordVectors> {
        let file = fs::File::open(path)?;
        Self::from_reader(BufReader::new(file), options)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    pub fn dims(&self) -> usize {
        self.vocab.dims()
    }

    pub fn get_word(&self, idx: usize) -> &str {
        self.vocab.word(idx)
    }

    pub fn get_index(&self, word: &str) -> Option<usize> {
        self.vocab.index_of(word)
    }

    pub fn get_vector(&self, word: &str) -> Option<WordRef<'_>> {
        self.vocab.get_vector(word)
    }

    pub fn get_vectors(&self, words: Option<&[&str]>) -> Vec<WordRef<'_>> {
        self.vocab.get_vectors(words)
    }

    /// Cosine similarity of two vocabulary words.
    ///
    /// A known word compared with itself is exactly 1.0. `None` if either
    /// word is out of vocabulary.
    pub fn similarity(&self, word1: &str, word2: &str) -> Option<f32> {
        let a = self.vocab.index_of(word1)?;
        if word1 == word2 {
            return Some(1.0);
        }
        let b = self.vocab.index_of(word2)?;
        Some(vector_math::dot_unchecked(
            self.vocab.values(a),
            self.vocab.values(b),
        ))
    }

    /// Normalised copy of a query vector.
    fn query_target(&self, values: &[f32]) -> Result<Vec<f32>> {
        if values.len() != self.dims() {
            return Err(Error::DimensionMismatch {
                expected: self.dims(),
                actual: values.len(),
            });
        }
        let mut target = values.to_vec();
        normalize(&mut target)?;
        Ok(target)
    }

    fn scored(&self, ranked: Vec<(usize, f32)>) -> Vec<ScoredWord> {
        ranked
            .into_iter()
            .map(|(idx, score)| ScoredWord {
                word: self.vocab.word(idx).to_string(),
                score,
            })
            .collect()
    }

    /// Score every entry against `target`, skipping `excluded` indices.
    fn top_n(&self, target: &[f32], n: usize, excluded: &HashSet<usize>) -> Vec<ScoredWord> {
        let mut top = TopN::new(n);
        for (idx, score) in self.vocab.scores(target).into_iter().enumerate() {
            if !excluded.contains(&idx) {
                top.offer(idx, score);
            }
        }
        self.scored(top.into_sorted_vec())
    }

    /// The single entry closest to `values`; ties go to the earlier entry.
    pub fn nearest_word(&self, values: &[f32]) -> Result<ScoredWord> {
        let target = self.query_target(values)?;
        let scores = self.vocab.scores(&target);

        let mut best: Option<(usize, f32)> = None;
        for (idx, score) in scores.into_iter().enumerate() {
            match best {
                Some((_, best_score)) if score <= best_score || score.is_nan() => {}
                _ => best = Some((idx, score)),
            }
        }

        let (idx, score) = best.ok_or(Error::EmptyVocabulary)?;
        Ok(ScoredWord {
            word: self.vocab.word(idx).to_string(),
            score,
        })
    }

    /// The `n` entries closest to `values`, best first.
    pub fn nearest_words(&self, values: &[f32], n: usize) -> Result<Vec<ScoredWord>> {
        let target = self.query_target(values)?;
        Ok(self.top_n(&target, n, &HashSet::new()))
    }

    /// `nearest_word` for a vocabulary word; `None` if it is unknown.
    pub fn nearest_word_to(&self, word: &str) -> Result<Option<ScoredWord>> {
        match self.vocab.get_vector(word) {
            Some(entry) => self.nearest_word(entry.values).map(Some),
            None => Ok(None),
        }
    }

    pub fn nearest_words_to(&self, word: &str, n: usize) -> Result<Option<Vec<ScoredWord>>> {
        match self.vocab.get_vector(word) {
            Some(entry) => self.nearest_words(entry.values, n).map(Some),
            None => Ok(None),
        }
    }

    /// Words closest to the centroid of a space separated phrase.
    ///
    /// Unknown phrase words are logged and skipped; `None` if none are known.
    /// The matched entries themselves are left out of the ranking.
    pub fn most_similar(&self, phrase: &str, n: usize) -> Result<Option<Vec<ScoredWord>>> {
        let mut indices = Vec::new();
        for word in phrase.split(' ') {
            match self.vocab.index_of(word) {
                Some(idx) => indices.push(idx),
                None => warn!("Out of dictionary word: {word}"),
            }
        }
        if indices.is_empty() {
            return Ok(None);
        }

        // repeated words count once per occurrence in the sum
        let mut target = vec![0.0; self.dims()];
        for &idx in &indices {
            for (t, v) in target.iter_mut().zip(self.vocab.values(idx)) {
                *t += v;
            }
        }
        normalize(&mut target)?;

        let excluded: HashSet<usize> = indices.into_iter().collect();
        Ok(Some(self.top_n(&target, n, &excluded)))
    }

    /// Words `d` completing `pair[0] : pair[1] :: word : d`, best first.
    ///
    /// The three input words are left out of the ranking.
    pub fn analogy(&self, word: &str, pair: &[&str], n: usize) -> Result<Vec<ScoredWord>> {
        if word.is_empty() || word.contains(' ') {
            return Err(Error::invalid_argument(format!(
                "word of interest has to be a single word, got {word:?}"
            )));
        }
        let &[a, b] = pair else {
            return Err(Error::invalid_argument(format!(
                "word pair has to hold exactly two words, got {}",
                pair.len()
            )));
        };

        let resolved: Vec<(&str, Option<usize>)> = [a, b, word]
            .into_iter()
            .map(|w| (w, self.vocab.index_of(w)))
            .collect();
        let missing: Vec<&str> = resolved
            .iter()
            .filter(|(_, idx)| idx.is_none())
            .map(|&(w, _)| w)
            .collect();
        if !missing.is_empty() {
            for w in &missing {
                warn!("Out of dictionary word: {w}");
            }
            return Err(Error::invalid_argument(format!(
                "out of vocabulary: {}",
                missing.join(", ")
            )));
        }
        let indices: Vec<usize> = resolved.iter().filter_map(|&(_, idx)| idx).collect();

        let mut target = self.analogy_target(indices[0], indices[1], indices[2]);
        normalize(&mut target)?;

        let excluded: HashSet<usize> = indices.into_iter().collect();
        Ok(self.top_n(&target, n, &excluded))
    }

    // b - a + c
    fn analogy_target(&self, a_idx: usize, b_idx: usize, c_idx: usize) -> Vec<f32> {
        let va = self.vocab.values(a_idx);
        let vb = self.vocab.values(b_idx);
        let vc = self.vocab.values(c_idx);
        (0..self.dims()).map(|i| vb[i] - va[i] + vc[i]).collect()
    }

    /// Index of the best single answer to `a : b :: c : ?`.
    ///
    /// `None` if any of the three words is out of vocabulary.
    pub fn analogy_best(&self, a: &str, b: &str, c: &str) -> Option<usize> {
        let (Some(a_idx), Some(b_idx), Some(c_idx)) = (
            self.vocab.index_of(a),
            self.vocab.index_of(b),
            self.vocab.index_of(c),
        ) else {
            return None;
        };

        let target = self.analogy_target(a_idx, b_idx, c_idx);
        let mut top = TopN::new(1);
        for (idx, score) in self.vocab.scores(&target).into_iter().enumerate() {
            if idx != a_idx && idx != b_idx && idx != c_idx {
                top.offer(idx, score);
            }
        }
        top.into_sorted_vec().first().map(|&(idx, _)| idx)
    }
}
