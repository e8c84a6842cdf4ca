// Diagnostic statistics over a corpus and its count matrix.
//
// Everything here is computed from row sums (total outgoing count per
// token), never from individual cells. Token identity is dropped from the
// frequency ranking; only magnitudes are reported.

use serde::Serialize;

use crate::corpus::Corpus;
use crate::counts::CountMatrix;
use crate::vocab::Vocabulary;

/// Ordering of a frequency ranking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum SortOrder {
    /// Smallest of the top N first, largest last.
    #[default]
    Ascending,
    Descending,
}

/// Number of tokens whose row sum is exactly 1.
pub fn singleton_count(counts: &CountMatrix) -> usize {
    counts.row_sums().iter().filter(|&&s| s == 1).count()
}

/// The `n` largest row sums in `order`. Returns fewer than `n` values if the
/// vocabulary is smaller.
pub fn top_row_sums(counts: &CountMatrix, n: usize, order: SortOrder) -> Vec<u64> {
    let mut sums = counts.row_sums();
    sums.sort_unstable();
    let top = sums.split_off(sums.len().saturating_sub(n));
    match order {
        SortOrder::Ascending => top,
        SortOrder::Descending => top.into_iter().rev().collect(),
    }
}

/// Summary of a count matrix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CountStats {
    /// Tokens followed by exactly one other token across the corpus.
    pub singleton_tokens: usize,
    /// Largest row sums, ordered per the request.
    pub top_frequencies: Vec<u64>,
    /// Cells with a non-zero count.
    pub nonzero_bigrams: usize,
    /// Sum of all counts.
    pub total_bigrams: u64,
}

impl CountStats {
    pub fn compute(counts: &CountMatrix, top_n: usize, order: SortOrder) -> Self {
        CountStats {
            singleton_tokens: singleton_count(counts),
            top_frequencies: top_row_sums(counts, top_n, order),
            nonzero_bigrams: counts.nonzero_cells(),
            total_bigrams: counts.total(),
        }
    }
}

/// Size of a corpus relative to its vocabulary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CorpusSummary {
    pub chorales: usize,
    pub total_tokens: usize,
    pub unique_tokens: usize,
}

impl CorpusSummary {
    pub fn compute(corpus: &Corpus, vocab: &Vocabulary) -> Self {
        CorpusSummary {
            chorales: corpus.len(),
            total_tokens: corpus.total_tokens(),
            unique_tokens: vocab.len(),
        }
    }

    /// Unique tokens as a percentage of all tokens (0 for an empty corpus).
    pub fn unique_percent(&self) -> f64 {
        if self.total_tokens == 0 {
            0.0
        } else {
            self.unique_tokens as f64 / self.total_tokens as f64 * 100.0
        }
    }
}
