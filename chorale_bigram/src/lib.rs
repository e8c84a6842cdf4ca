// Chorale bigram model.
//
// Builds a first-order Markov (bigram) model over tokenized chorales and
// samples new chorale-like token sequences from it. Each line of a corpus is
// one chorale; a designated terminator token (conventionally `.`) opens and
// closes every chorale and is always token id 0.
//
// Architecture (data flows top to bottom):
// - corpus.rs: Corpus loading, whitespace tokenizing, marker substitution
// - vocab.rs: Sorted vocabulary with the terminator pinned at id 0
// - counts.rs: Dense bigram count matrix, one chorale at a time
// - distribution.rs: Row-normalized transition matrix; empty rows go to the
//   terminator
// - generate.rs: Random walk from the terminator back to the terminator
// - stats.rs: Singleton-token count, largest row sums, corpus summary
// - heatmap.rs: Log-scaled PGM rendering of the count matrix
// - model.rs: `BigramModel`, the engine tying the stages together
// - config.rs: JSON `ModelConfig` and corpus file selection
// - error.rs: `BigramError`
//
// All randomness comes from `chorale_prng::ChoraleRng`; output is
// deterministic given a seed.

pub mod config;
pub mod corpus;
pub mod counts;
pub mod distribution;
pub mod error;
pub mod generate;
pub mod heatmap;
pub mod model;
pub mod stats;
pub mod vocab;

pub use config::{CorpusSelection, Encoding, ModelConfig, Voicing};
pub use corpus::Corpus;
pub use counts::CountMatrix;
pub use distribution::TransitionMatrix;
pub use error::{BigramError, Result};
pub use model::BigramModel;
pub use stats::{CorpusSummary, CountStats, SortOrder};
pub use vocab::{TERMINATOR_ID, TokenId, Vocabulary};
