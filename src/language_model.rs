// Reference n-gram statistics used to judge how language-like a candidate
// plaintext is.
//
// The model counts every overlapping n-gram of a fixed order in a corpus and
// stores the natural-log probability of each possible n-gram in a dense
// table indexed by the n-gram's base-V value (V being the alphabet size).
// Additive smoothing gives unseen n-grams a small, finite probability, so a
// score is never negative infinity.

use serde::{Deserialize, Serialize};

use crate::{analysis, Alphabet, Error, Result};

const MAX_ORDER: usize = 4;
const MAX_TABLE_SIZE: usize = 1 << 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Length of the n-grams the model is built from (1 to 4).
    pub order: usize,
    /// Pseudo-count added to every n-gram.
    pub smoothing: f64,
    /// Symbols of the model alphabet, in order.
    pub alphabet: String,
    pub fold_case: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            order: 3,
            smoothing: 0.01,
            alphabet: "ABCDEFGHIJKLMNOPQRSTUVWXYZ".to_string(),
            fold_case: true,
        }
    }
}

impl ModelConfig {
    pub fn with_order(order: usize) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct LanguageModel {
    alphabet: Alphabet,
    order: usize,
    log_probs: Vec<f64>,
    floor: f64,
    baseline: f64,
    entropy: f64,
    total: u64,
}

impl LanguageModel {
    pub fn from_corpus(corpus: &[u8], config: &ModelConfig) -> Result<Self> {
        if !(1..=MAX_ORDER).contains(&config.order) {
            return Err(Error::InvalidConfig(format!(
                "n-gram order must be between 1 and {MAX_ORDER}, got {}",
                config.order
            )));
        }
        if !(config.smoothing.is_finite() && config.smoothing > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "smoothing must be positive, got {}",
                config.smoothing
            )));
        }
        let mut alphabet = Alphabet::new(config.alphabet.as_bytes())
            .map_err(|e| Error::InvalidConfig(format!("model alphabet: {e}")))?;
        if config.fold_case {
            alphabet = alphabet.with_case_folding();
        }
        let table_size = alphabet
            .len()
            .checked_pow(config.order as u32)
            .filter(|&size| size <= MAX_TABLE_SIZE)
            .ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "{} symbols at order {} exceed the n-gram table limit",
                    alphabet.len(),
                    config.order
                ))
            })?;

        let symbols: Vec<usize> = corpus
            .iter()
            .filter_map(|&b| alphabet.folded_index_of(b))
            .collect();
        if symbols.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let mut counts = vec![0u64; table_size];
        for window in symbols.windows(config.order) {
            counts[ngram_index(window, alphabet.len())] += 1;
        }
        let total: u64 = counts.iter().sum();

        let denominator = total as f64 + config.smoothing * table_size as f64;
        let floor = (config.smoothing / denominator).ln();
        let log_probs: Vec<f64> = counts
            .iter()
            .map(|&c| ((c as f64 + config.smoothing) / denominator).ln())
            .collect();

        let (baseline, entropy) = if total == 0 {
            (floor, 0.0)
        } else {
            let observed = counts.iter().filter(|&&c| c > 0);
            let baseline = counts
                .iter()
                .zip(log_probs.iter())
                .filter(|(&c, _)| c > 0)
                .map(|(&c, &lp)| c as f64 / total as f64 * lp)
                .sum();
            let entropy = analysis::entropy(observed.map(|&c| c as f64 / total as f64), 2.0);
            (baseline, entropy)
        };

        tracing::debug!(
            order = config.order,
            symbols = alphabet.len(),
            ngrams = total,
            baseline,
            "built language model"
        );

        Ok(Self {
            alphabet,
            order: config.order,
            log_probs,
            floor,
            baseline,
            entropy,
            total,
        })
    }

    /// Sum of the log-probabilities of every overlapping n-gram in `text`.
    pub fn score(&self, text: &[u8]) -> f64 {
        let n = self.order;
        let size = self.log_probs.len();
        let radix = self.alphabet.len();

        let mut score = 0.0;
        let mut idx = 0usize;
        let mut run = 0usize;
        for (pos, &byte) in text.iter().enumerate() {
            match self.alphabet.folded_index_of(byte) {
                Some(symbol) => {
                    idx = (idx * radix + symbol) % size;
                    run += 1;
                }
                None => run = 0,
            }
            if pos + 1 >= n {
                score += if run >= n {
                    self.log_probs[idx]
                } else {
                    self.floor
                };
            }
        }
        score
    }

    /// Log-probability of a single n-gram of the model's order.
    pub fn log_prob(&self, ngram: &[u8]) -> Option<f64> {
        if ngram.len() != self.order {
            return None;
        }
        let indices: Option<Vec<usize>> = ngram
            .iter()
            .map(|&b| self.alphabet.folded_index_of(b))
            .collect();
        Some(match indices {
            Some(indices) => self.log_probs[ngram_index(&indices, self.alphabet.len())],
            None => self.floor,
        })
    }

    /// Number of n-grams `score` sums over for a text of `len` symbols.
    pub fn windows(&self, len: usize) -> usize {
        (len + 1).saturating_sub(self.order)
    }

    /// Expected log-probability of one n-gram of corpus-like text.
    pub fn baseline_per_ngram(&self) -> f64 {
        self.baseline
    }

    /// Shannon entropy, in bits, of the corpus n-gram distribution.
    pub fn entropy(&self) -> f64 {
        self.entropy
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn ngram_count(&self) -> u64 {
        self.total
    }
}

fn ngram_index(symbols: &[usize], radix: usize) -> usize {
    symbols.iter().fold(0, |idx, &s| idx * radix + s)
}

#[cfg(test)]
pub(crate) fn english_model() -> &'static LanguageModel {
    use std::sync::OnceLock;

    static MODEL: OnceLock<LanguageModel> = OnceLock::new();
    MODEL.get_or_init(|| {
        let corpus = std::fs::read(concat!(env!("CARGO_MANIFEST_DIR"), "/data/english.txt")).unwrap();
        LanguageModel::from_corpus(&corpus, &ModelConfig::default()).unwrap()
    })
}
