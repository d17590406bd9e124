use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// First line must read `<number of words> <length of vector>`.
    #[error("malformed header {line:?}: expected '<number of words> <length of vector>'")]
    MalformedHeader { line: String },

    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("header declares {declared} words but {found} were read")]
    WordCountMismatch { declared: usize, found: usize },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("vector has zero length and cannot be normalized")]
    DegenerateVector,

    #[error("vocabulary is empty")]
    EmptyVocabulary,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }
}
