use crate::error::Result;
use crate::vector_math;

/// Anything that carries a vector and, optionally, the word it belongs to.
///
/// Implemented by the owned [`WordVector`] and by [`WordRef`], the borrowed
/// view handed out by the vocabulary. Arithmetic always allocates a fresh,
/// unnamed [`WordVector`].
pub trait Embedding {
    fn word(&self) -> Option<&str>;

    fn values(&self) -> &[f32];

    fn dims(&self) -> usize {
        self.values().len()
    }

    fn add<E: Embedding + ?Sized>(&self, other: &E) -> Result<WordVector> {
        vector_math::add(self.values(), other.values()).map(WordVector::unnamed)
    }

    fn subtract<E: Embedding + ?Sized>(&self, other: &E) -> Result<WordVector> {
        vector_math::subtract(self.values(), other.values()).map(WordVector::unnamed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordVector {
    word: Option<String>,
    values: Vec<f32>,
}

impl WordVector {
    pub fn new(word: impl Into<String>, values: Vec<f32>) -> Self {
        WordVector {
            word: Some(word.into()),
            values,
        }
    }

    /// A derived vector with no word attached.
    pub fn unnamed(values: Vec<f32>) -> Self {
        WordVector { word: None, values }
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}

impl Embedding for WordVector {
    fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    fn values(&self) -> &[f32] {
        &self.values
    }
}

/// A vocabulary entry borrowed from a loaded model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordRef<'a> {
    pub index: usize,
    pub word: &'a str,
    pub values: &'a [f32],
}

impl WordRef<'_> {
    pub fn to_word_vector(&self) -> WordVector {
        WordVector::new(self.word, self.values.to_vec())
    }
}

impl Embedding for WordRef<'_> {
    fn word(&self) -> Option<&str> {
        Some(self.word)
    }

    fn values(&self) -> &[f32] {
        self.values
    }
}

/// A query result: a vocabulary word and its cosine similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredWord {
    pub word: String,
    pub score: f32,
}
