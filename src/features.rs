//! Character n-gram features with word-boundary padding.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const MIN_N: usize = 2;
pub const MAX_N: usize = 4;

/// Emits the n-grams of every whitespace-separated word, padded with a
/// space on each side so prefixes and suffixes get their own tokens.
///
/// A word whose padded form is not longer than `n` is emitted whole, once,
/// and no longer n-grams are produced for it.
pub fn char_wb_ngrams(text: &str, min_n: usize, max_n: usize) -> Vec<String> {
    let mut ngrams = Vec::new();

    for word in text.split_whitespace() {
        let padded: Vec<char> = std::iter::once(' ')
            .chain(word.chars())
            .chain(std::iter::once(' '))
            .collect();
        let len = padded.len();

        for n in min_n..=max_n {
            if len <= n {
                ngrams.push(padded.iter().collect());
                break;
            }
            for window in padded.windows(n) {
                ngrams.push(window.iter().collect());
            }
        }
    }

    ngrams
}

/// Count vectorizer over a vocabulary fixed at fit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NgramVectorizer {
    min_n: usize,
    max_n: usize,
    vocab: BTreeMap<String, usize>,
}

impl NgramVectorizer {
    /// Learns the vocabulary from normalized names. Token indices follow
    /// sorted token order, so the same corpus always yields the same
    /// vocabulary.
    pub fn fit<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tokens: BTreeSet<String> = names
            .into_iter()
            .flat_map(|name| char_wb_ngrams(name, MIN_N, MAX_N))
            .collect();

        let vocab = tokens
            .into_iter()
            .enumerate()
            .map(|(idx, token)| (token, idx))
            .collect();

        NgramVectorizer {
            min_n: MIN_N,
            max_n: MAX_N,
            vocab,
        }
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocab
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocab.len()
    }

    /// Sparse counts of the in-vocabulary n-grams of `name`.
    pub fn count_ngrams(&self, name: &str) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for ngram in char_wb_ngrams(name, self.min_n, self.max_n) {
            if self.vocab.contains_key(&ngram) {
                *counts.entry(ngram).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Dense count row for one name. Unknown n-grams are ignored.
    pub fn transform(&self, name: &str) -> Array1<f64> {
        let mut row = Array1::zeros(self.vocab.len());
        for ngram in char_wb_ngrams(name, self.min_n, self.max_n) {
            if let Some(&i) = self.vocab.get(&ngram) {
                row[i] += 1.0;
            }
        }
        row
    }

    pub fn transform_batch<'a, I>(&self, names: I) -> Array2<f64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let rows: Vec<Array1<f64>> = names.into_iter().map(|n| self.transform(n)).collect();
        let mut matrix = Array2::zeros((rows.len(), self.vocab.len()));
        for (mut target, row) in matrix.rows_mut().into_iter().zip(&rows) {
            target.assign(row);
        }
        matrix
    }
}
