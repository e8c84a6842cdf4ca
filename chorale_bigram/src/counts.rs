// Bigram count matrix.
//
// `CountMatrix` is a dense, row-major `n x n` table of `u32` where
// `get(i, j)` is the number of times token `j` immediately follows token `i`
// somewhere in the corpus. Each chorale is scanned independently with a
// window of two, so pairs never bridge chorale boundaries and chorales of
// fewer than two tokens add nothing.
//
// The matrix is mostly zeros. Dense storage is fine at chorale vocabulary
// sizes (tens to low thousands of tokens); memory grows with the square of
// the vocabulary.

use crate::corpus::Corpus;
use crate::error::{BigramError, Result};
use crate::vocab::{TokenId, Vocabulary};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountMatrix {
    dim: usize,
    cells: Vec<u32>,
}

impl CountMatrix {
    /// An all-zero `dim x dim` matrix.
    pub fn zeros(dim: usize) -> Self {
        CountMatrix {
            dim,
            cells: vec![0; dim * dim],
        }
    }

    /// Count every adjacent token pair in `corpus`.
    ///
    /// All-or-nothing: fails with `UnknownToken` on the first token the
    /// vocabulary does not contain, returning no partial matrix.
    pub fn build(corpus: &Corpus, vocab: &Vocabulary) -> Result<Self> {
        let mut matrix = Self::zeros(vocab.len());
        for (chorale_idx, chorale) in corpus.chorales().iter().enumerate() {
            let ids = chorale
                .iter()
                .enumerate()
                .map(|(position, token)| {
                    vocab.id(token).ok_or_else(|| BigramError::UnknownToken {
                        token: token.clone(),
                        chorale: chorale_idx,
                        position,
                    })
                })
                .collect::<Result<Vec<TokenId>>>()?;

            for pair in ids.windows(2) {
                matrix.increment(pair[0], pair[1]);
            }
        }
        Ok(matrix)
    }

    fn increment(&mut self, from: TokenId, to: TokenId) {
        self.cells[from * self.dim + to] += 1;
    }

    /// Side length (vocabulary size).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Count for `from -> to`. Panics if either id is out of range.
    pub fn get(&self, from: TokenId, to: TokenId) -> u32 {
        assert!(
            from < self.dim && to < self.dim,
            "bigram ({from}, {to}) out of range for dim {}",
            self.dim
        );
        self.cells[from * self.dim + to]
    }

    /// Successor counts of `from`.
    pub fn row(&self, from: TokenId) -> &[u32] {
        &self.cells[from * self.dim..(from + 1) * self.dim]
    }

    /// Iterate rows in id order.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        // `max(1)` keeps `chunks` happy for the empty matrix.
        self.cells.chunks(self.dim.max(1))
    }

    /// Total outgoing count of `from`.
    pub fn row_sum(&self, from: TokenId) -> u64 {
        self.row(from).iter().map(|&c| u64::from(c)).sum()
    }

    /// Total outgoing count of every token, in id order.
    pub fn row_sums(&self) -> Vec<u64> {
        self.rows()
            .map(|row| row.iter().map(|&c| u64::from(c)).sum())
            .collect()
    }

    /// Sum of every cell: the number of bigrams counted.
    pub fn total(&self) -> u64 {
        self.cells.iter().map(|&c| u64::from(c)).sum()
    }

    /// Number of cells with a non-zero count.
    pub fn nonzero_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c > 0).count()
    }

    /// Largest single cell count (0 for an empty matrix).
    pub fn max_count(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }
}
