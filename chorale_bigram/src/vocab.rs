// Vocabulary: the distinct tokens of a corpus with dense integer ids.
//
// Tokens are sorted byte-wise (equivalently, by Unicode code point), then
// the terminator is pulled out of its sorted position and placed at id 0.
// Every other token keeps its sorted order shifted by one. `stoi` and `itos`
// are exact inverses for the vocabulary's lifetime.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::corpus::Corpus;
use crate::error::{BigramError, Result};

/// Dense token index into the vocabulary and the bigram matrices.
pub type TokenId = usize;

/// Id of the terminator token in every vocabulary.
pub const TERMINATOR_ID: TokenId = 0;

#[derive(Clone, Debug)]
pub struct Vocabulary {
    itos: Vec<String>,
    stoi: FxHashMap<String, TokenId>,
}

impl Vocabulary {
    /// Build the vocabulary of `corpus` with `terminator` at id 0.
    ///
    /// Fails with `MissingTerminator` if `terminator` never occurs.
    pub fn build(corpus: &Corpus, terminator: &str) -> Result<Self> {
        let mut distinct: BTreeSet<&str> = BTreeSet::new();
        for chorale in corpus.chorales() {
            distinct.extend(chorale.iter().map(String::as_str));
        }

        if !distinct.remove(terminator) {
            return Err(BigramError::MissingTerminator {
                token: terminator.to_string(),
            });
        }

        let mut itos = Vec::with_capacity(distinct.len() + 1);
        itos.push(terminator.to_string());
        itos.extend(distinct.into_iter().map(str::to_string));

        let stoi = itos
            .iter()
            .enumerate()
            .map(|(id, tok)| (tok.clone(), id))
            .collect();

        Ok(Vocabulary { itos, stoi })
    }

    /// Number of distinct tokens, terminator included.
    pub fn len(&self) -> usize {
        self.itos.len()
    }

    /// Always false for a built vocabulary (the terminator is present).
    pub fn is_empty(&self) -> bool {
        self.itos.is_empty()
    }

    pub fn terminator(&self) -> &str {
        &self.itos[TERMINATOR_ID]
    }

    pub fn id(&self, token: &str) -> Option<TokenId> {
        self.stoi.get(token).copied()
    }

    pub fn token(&self, id: TokenId) -> Option<&str> {
        self.itos.get(id).map(String::as_str)
    }

    /// Tokens in id order.
    pub fn tokens(&self) -> &[String] {
        &self.itos
    }
}
