// Chorale generation by random walk over a transition matrix.
//
// The walk starts in the terminator's state (id 0) without emitting it. Each
// step draws a successor from the current row with `ChoraleRng::weighted_index`,
// appends it, and moves to it. Drawing the terminator ends the walk, so the
// output always ends with exactly one terminator and contains no other.
//
// For a fixed matrix and a fixed seed the output is fully reproducible: the
// walk consumes exactly one `f64` from the generator per emitted token.

use chorale_prng::ChoraleRng;

use crate::distribution::TransitionMatrix;
use crate::error::{BigramError, Result};
use crate::vocab::{TERMINATOR_ID, TokenId, Vocabulary};

/// Walk from the terminator until it is drawn again. Returns token ids, the
/// last of which is the terminator.
pub fn generate_ids(matrix: &TransitionMatrix, rng: &mut ChoraleRng) -> Result<Vec<TokenId>> {
    walk(matrix, rng, None)
}

/// Like `generate_ids`, but fails with `StepLimitExceeded` if the terminator
/// is not drawn within `max_steps` draws.
pub fn generate_ids_bounded(
    matrix: &TransitionMatrix,
    rng: &mut ChoraleRng,
    max_steps: usize,
) -> Result<Vec<TokenId>> {
    walk(matrix, rng, Some(max_steps))
}

/// Generate one chorale as tokens.
pub fn generate_chorale(
    matrix: &TransitionMatrix,
    vocab: &Vocabulary,
    rng: &mut ChoraleRng,
) -> Result<Vec<String>> {
    let ids = generate_ids(matrix, rng)?;
    ids_to_tokens(&ids, vocab)
}

/// Map ids back to tokens. Fails with `VocabularyMismatch` for an id the
/// vocabulary does not have, i.e. a matrix built from another vocabulary.
pub fn ids_to_tokens(ids: &[TokenId], vocab: &Vocabulary) -> Result<Vec<String>> {
    ids.iter()
        .map(|&id| {
            vocab
                .token(id)
                .map(str::to_string)
                .ok_or(BigramError::VocabularyMismatch {
                    id,
                    len: vocab.len(),
                })
        })
        .collect()
}

fn walk(
    matrix: &TransitionMatrix,
    rng: &mut ChoraleRng,
    max_steps: Option<usize>,
) -> Result<Vec<TokenId>> {
    if matrix.dim() == 0 {
        return Err(BigramError::EmptyDistribution { row: TERMINATOR_ID });
    }

    let mut current = TERMINATOR_ID;
    let mut out = Vec::new();
    loop {
        if let Some(limit) = max_steps {
            if out.len() >= limit {
                return Err(BigramError::StepLimitExceeded { limit });
            }
        }
        let next = rng
            .weighted_index(matrix.row(current))
            .ok_or(BigramError::EmptyDistribution { row: current })?;
        out.push(next);
        if next == TERMINATOR_ID {
            return Ok(out);
        }
        current = next;
    }
}
