// Corpus loading and marker preprocessing.
//
// A corpus file holds one chorale per line, tokens separated by whitespace.
// Marked-up corpus variants carry bracketed markers (start/end of chorale,
// end of measure) that are rewritten to canonical tokens here, token by
// token, before any statistics see them. After loading, a `Corpus` is
// immutable.
//
// Blank lines are kept as empty chorales so chorale indices in error
// messages match line numbers (0-based). They contribute no tokens and no
// bigrams.

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;

use crate::error::{BigramError, Result};

/// Ordered list of tokenized chorales.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Corpus {
    chorales: Vec<Vec<String>>,
}

impl Corpus {
    /// Build a corpus from already tokenized chorales.
    pub fn from_chorales(chorales: Vec<Vec<String>>) -> Self {
        Corpus { chorales }
    }

    /// Split `text` into one chorale per line, applying `substitutions` to
    /// every token.
    pub fn parse(text: &str, substitutions: &BTreeMap<String, String>) -> Self {
        let chorales = text
            .lines()
            .map(|line| tokenize(line, substitutions))
            .collect();
        Corpus { chorales }
    }

    /// Read and parse a corpus file.
    pub fn load(path: &Path, substitutions: &BTreeMap<String, String>) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| BigramError::io(e, path))?;
        let corpus = Self::parse(&text, substitutions);
        debug!(
            "loaded {} chorales ({} tokens) from {}",
            corpus.len(),
            corpus.total_tokens(),
            path.display()
        );
        Ok(corpus)
    }

    pub fn chorales(&self) -> &[Vec<String>] {
        &self.chorales
    }

    pub fn len(&self) -> usize {
        self.chorales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chorales.is_empty()
    }

    /// Number of tokens across all chorales.
    pub fn total_tokens(&self) -> usize {
        self.chorales.iter().map(Vec::len).sum()
    }

    /// Number of adjacent token pairs across all chorales. Pairs never span
    /// two chorales.
    pub fn total_pairs(&self) -> usize {
        self.chorales
            .iter()
            .map(|c| c.len().saturating_sub(1))
            .sum()
    }
}

/// Whitespace-split one line, replacing any token found in `substitutions`.
pub fn tokenize(line: &str, substitutions: &BTreeMap<String, String>) -> Vec<String> {
    line.split_whitespace()
        .map(|tok| match substitutions.get(tok) {
            Some(canonical) => canonical.clone(),
            None => tok.to_string(),
        })
        .collect()
}
