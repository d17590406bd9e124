pub mod error;
pub mod loader;
pub mod logging;
pub mod top_n;
pub mod vector_math;
pub mod vocabulary;
pub mod word_vector;
pub mod word_vectors;

pub use error::{Error, Result};
pub use loader::{LoadOptions, load_model};
pub use top_n::TopN;
pub use vocabulary::{HashLookup, LinearScan, LookupKind, Vocabulary, WordLookup};
pub use word_vector::{Embedding, ScoredWord, WordRef, WordVector};
pub use word_vectors::{DEFAULT_ANALOGY, DEFAULT_MOST_SIMILAR, DEFAULT_NEAREST_WORDS, WordVectors};
