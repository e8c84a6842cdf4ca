// Row-stochastic transition matrix derived from bigram counts.
//
// Row `i` is `N[i] / sum(N[i])`. A row whose total is zero (a token that is
// only ever the last token of its chorales, or never occurs as a
// predecessor) has no defined distribution; such rows are redirected to a
// one-hot distribution at the terminator. Every row of a `TransitionMatrix`
// therefore sums to 1 and every walk can reach the terminator.
//
// Which rows were redirected is kept so callers can report it.

use log::warn;

use crate::counts::CountMatrix;
use crate::vocab::{TERMINATOR_ID, TokenId};

#[derive(Clone, Debug, PartialEq)]
pub struct TransitionMatrix {
    dim: usize,
    probs: Vec<f64>,
    redirected: Vec<TokenId>,
}

impl TransitionMatrix {
    /// Normalize every row of `counts`, redirecting empty rows to the
    /// terminator.
    pub fn from_counts(counts: &CountMatrix) -> Self {
        let dim = counts.dim();
        let mut probs = Vec::with_capacity(dim * dim);
        let mut redirected = Vec::new();

        for (from, row) in counts.rows().enumerate().take(dim) {
            let total: u64 = row.iter().map(|&c| u64::from(c)).sum();
            if total == 0 {
                redirected.push(from);
                probs.extend((0..dim).map(|to| if to == TERMINATOR_ID { 1.0 } else { 0.0 }));
            } else {
                let total = total as f64;
                probs.extend(row.iter().map(|&c| f64::from(c) / total));
            }
        }

        if !redirected.is_empty() {
            warn!(
                "{} token(s) never precede another token; their transitions go to the terminator",
                redirected.len()
            );
        }

        TransitionMatrix {
            dim,
            probs,
            redirected,
        }
    }

    /// Build from raw row-major probabilities without validation.
    ///
    /// Rows that are not distributions are caught when a walk samples them.
    pub fn from_raw(dim: usize, probs: Vec<f64>) -> Self {
        assert_eq!(
            probs.len(),
            dim * dim,
            "from_raw: expected {} cells for dim {dim}",
            dim * dim
        );
        TransitionMatrix {
            dim,
            probs,
            redirected: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Successor distribution of `from`.
    pub fn row(&self, from: TokenId) -> &[f64] {
        &self.probs[from * self.dim..(from + 1) * self.dim]
    }

    /// Probability of `from -> to`.
    pub fn get(&self, from: TokenId, to: TokenId) -> f64 {
        self.row(from)[to]
    }

    /// Rows that had no observed successors and were sent to the terminator.
    pub fn redirected_rows(&self) -> &[TokenId] {
        &self.redirected
    }
}
