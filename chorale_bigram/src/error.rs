// Error taxonomy for the bigram engine.
//
// The three domain variants (`MissingTerminator`, `UnknownToken`,
// `EmptyDistribution`) signal corpus/vocabulary mismatches. They are fatal
// to the operation that raised them and carry the offending token or row so
// the mismatch can be diagnosed. Retrying is pointless for deterministic data
// bugs, so nothing in the crate does.
//
// I/O failures while reading a corpus or config are wrapped with the path
// but otherwise passed through untouched.

use std::path::PathBuf;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = BigramError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum BigramError {
    /// The corpus never contains the designated terminator token.
    #[error("terminator token {token:?} does not occur in the corpus")]
    MissingTerminator { token: String },

    /// Counting met a token the vocabulary does not know.
    #[error("token {token:?} (chorale {chorale}, position {position}) is not in the vocabulary")]
    UnknownToken {
        token: String,
        chorale: usize,
        position: usize,
    },

    /// A sampled transition row is not a usable probability distribution.
    #[error("transition row {row} has no valid distribution")]
    EmptyDistribution { row: usize },

    /// A token id outside the vocabulary, from a matrix built over a
    /// different vocabulary.
    #[error("token id {id} is outside the vocabulary of {len} tokens")]
    VocabularyMismatch { id: usize, len: usize },

    /// A bounded walk ran past its step limit without reaching the terminator.
    #[error("generation did not reach the terminator within {limit} steps")]
    StepLimitExceeded { limit: usize },

    /// Filesystem error, with the path being read or written.
    #[error("io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed or inconsistent configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Corpus selection answers could not be resolved to a file.
    #[error("invalid corpus selection: {0}")]
    InvalidSelection(String),
}

impl BigramError {
    /// Wrap an IO error with the path it concerns.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for BigramError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
