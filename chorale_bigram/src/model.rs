// The bigram engine: one configurable pipeline from corpus to chorales.
//
// `BigramModel` owns the artifacts of one run: the vocabulary, the count
// matrix, and a lazily built transition matrix. The count matrix is never
// mutated after construction, so the transition matrix is computed at most
// once and cached for every later generation call.
//
// Randomness is not owned by the model. Each generation call borrows the
// caller's `ChoraleRng`, so a model can serve several independently seeded
// streams.

use std::cell::OnceCell;

use chorale_prng::ChoraleRng;
use log::{debug, info};

use crate::config::ModelConfig;
use crate::corpus::Corpus;
use crate::counts::CountMatrix;
use crate::distribution::TransitionMatrix;
use crate::error::Result;
use crate::generate::{generate_ids, generate_ids_bounded, ids_to_tokens};
use crate::stats::{CorpusSummary, CountStats, SortOrder};
use crate::vocab::Vocabulary;

#[derive(Debug)]
pub struct BigramModel {
    vocab: Vocabulary,
    counts: CountMatrix,
    summary: CorpusSummary,
    transitions: OnceCell<TransitionMatrix>,
}

impl BigramModel {
    /// Load the configured corpus and build the model.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        config.validate()?;
        let corpus = Corpus::load(&config.corpus_path, &config.marker_substitutions)?;
        Self::from_corpus(&corpus, config)
    }

    /// Build the model from an already loaded corpus.
    pub fn from_corpus(corpus: &Corpus, config: &ModelConfig) -> Result<Self> {
        let vocab = Vocabulary::build(corpus, &config.terminator)?;
        let summary = CorpusSummary::compute(corpus, &vocab);
        if config.verbose {
            info!("Total number of tokens in the corpus: {}", summary.total_tokens);
            info!(
                "Number of unique tokens in the corpus: {} ({:.2}%)",
                summary.unique_tokens,
                summary.unique_percent()
            );
        } else {
            debug!(
                "corpus: {} chorales, {} tokens, {} unique",
                summary.chorales, summary.total_tokens, summary.unique_tokens
            );
        }

        let counts = CountMatrix::build(corpus, &vocab)?;
        debug!(
            "counted {} bigrams in {} non-zero cells of a {}x{} matrix",
            counts.total(),
            counts.nonzero_cells(),
            counts.dim(),
            counts.dim()
        );

        Ok(BigramModel {
            vocab,
            counts,
            summary,
            transitions: OnceCell::new(),
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Read access to the bigram counts.
    pub fn counts(&self) -> &CountMatrix {
        &self.counts
    }

    pub fn corpus_summary(&self) -> &CorpusSummary {
        &self.summary
    }

    /// Transition matrix, built on first use.
    pub fn transitions(&self) -> &TransitionMatrix {
        self.transitions
            .get_or_init(|| TransitionMatrix::from_counts(&self.counts))
    }

    /// Generate one chorale. The last token is always the terminator.
    pub fn generate(&self, rng: &mut ChoraleRng) -> Result<Vec<String>> {
        let ids = generate_ids(self.transitions(), rng)?;
        ids_to_tokens(&ids, &self.vocab)
    }

    /// Generate one chorale, failing if it runs longer than `max_steps`.
    pub fn generate_bounded(&self, rng: &mut ChoraleRng, max_steps: usize) -> Result<Vec<String>> {
        let ids = generate_ids_bounded(self.transitions(), rng, max_steps)?;
        ids_to_tokens(&ids, &self.vocab)
    }

    /// Generate `count` chorales from one sequential stream.
    pub fn generate_many(&self, count: usize, rng: &mut ChoraleRng) -> Result<Vec<Vec<String>>> {
        (0..count).map(|_| self.generate(rng)).collect()
    }

    pub fn count_stats(&self, top_n: usize, order: SortOrder) -> CountStats {
        CountStats::compute(&self.counts, top_n, order)
    }
}
