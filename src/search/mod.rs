// Strategies for exploring a cipher's key space. Each one decrypts the
// ciphertext under candidate keys, scores the result and keeps the best
// distinct keys it has seen.

pub mod annealing;
pub mod exhaustive;
pub mod hill_climb;
mod local;
mod top_k;

pub use top_k::{Candidate, TopK};

use serde::{Deserialize, Serialize};

use crate::{
    cipher::{Cipher, CipherKey},
    scorer::Scorer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Exhaustive,
    HillClimb,
    Annealing,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Exhaustive => "exhaustive",
            Strategy::HillClimb => "hill_climb",
            Strategy::Annealing => "annealing",
        }
    }
}

/// Ranked candidates, best first, plus how the search got there.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<K> {
    pub candidates: Vec<Candidate<K>>,
    pub strategy: Strategy,
    /// Search steps taken: keys enumerated, or neighbour moves across all runs.
    pub iterations: u64,
    /// Decrypt-and-score calls.
    pub evaluations: u64,
    /// Local search runs started from a fresh random key.
    pub restarts: u64,
    /// Seed the randomized strategies ran with.
    pub seed: Option<u64>,
}

impl<K: Ord> SearchResult<K> {
    pub fn empty(strategy: Strategy) -> Self {
        Self {
            candidates: Vec::new(),
            strategy,
            iterations: 0,
            evaluations: 0,
            restarts: 0,
            seed: None,
        }
    }

    pub fn best(&self) -> Option<&Candidate<K>> {
        self.candidates.first()
    }

    /// Fold `other` into this result, keeping the best `top_k` candidates of
    /// both and reporting `other`'s strategy.
    pub fn absorb(&mut self, other: SearchResult<K>, top_k: usize) {
        let mut top = TopK::new(top_k);
        for candidate in std::mem::take(&mut self.candidates)
            .into_iter()
            .chain(other.candidates)
        {
            top.offer(candidate);
        }
        self.candidates = top.into_sorted_vec();
        self.strategy = other.strategy;
        self.iterations += other.iterations;
        self.evaluations += other.evaluations;
        self.restarts += other.restarts;
        self.seed = self.seed.or(other.seed);
    }
}

/// Budget and knobs shared by the restart-based strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSearchParams {
    pub top_k: usize,
    /// Total decrypt-and-score calls allowed across all runs.
    pub max_iterations: u64,
    /// Number of runs, each from a fresh random key.
    pub max_restarts: u64,
    /// Neighbour moves allowed in one run.
    pub run_iterations: u64,
    /// A run stops after this many moves without a new best.
    pub patience: u64,
    pub seed: u64,
    /// Number given to the first run. A later phase of the same attack
    /// starts after the runs of earlier phases so it draws fresh keys.
    pub first_run: u64,
}

/// Decrypts under a key and scores the plaintext. Keys that fail to decrypt
/// score negative infinity and are never retained.
pub(crate) struct Evaluator<'a, C: ?Sized, S: ?Sized> {
    cipher: &'a C,
    ciphertext: &'a [u8],
    scorer: &'a S,
}

impl<'a, C, S> Evaluator<'a, C, S>
where
    C: Cipher,
    S: Scorer + ?Sized,
{
    pub fn new(cipher: &'a C, ciphertext: &'a [u8], scorer: &'a S) -> Self {
        Self {
            cipher,
            ciphertext,
            scorer,
        }
    }

    pub fn cipher(&self) -> &C {
        self.cipher
    }

    pub fn evaluate(&self, key: CipherKey<C>) -> Candidate<CipherKey<C>> {
        match self.cipher.decrypt(self.ciphertext, &key) {
            Ok(plaintext) => Candidate {
                score: self.scorer.evaluate(&plaintext),
                key,
                plaintext,
            },
            Err(err) => {
                tracing::trace!(?key, %err, "discarding key that failed to decrypt");
                Candidate {
                    key,
                    plaintext: Vec::new(),
                    score: f64::NEG_INFINITY,
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::{
        cipher::{caesar::Caesar, caesar::ShiftKeys, Cipher},
        Error, Result,
    };

    /// A Caesar cipher that refuses to decrypt under odd keys.
    pub struct OddKeysFail(pub Caesar);

    impl Cipher for OddKeysFail {
        type Space = ShiftKeys;

        fn name(&self) -> &'static str {
            "odd-keys-fail"
        }

        fn key_space(&self) -> &ShiftKeys {
            self.0.key_space()
        }

        fn check_input(&self, input: &[u8]) -> Result<()> {
            self.0.check_input(input)
        }

        fn encrypt(&self, plaintext: &[u8], key: &usize) -> Result<Vec<u8>> {
            self.0.encrypt(plaintext, key)
        }

        fn decrypt(&self, ciphertext: &[u8], key: &usize) -> Result<Vec<u8>> {
            if key % 2 == 1 {
                return Err(Error::InvalidKey(format!("{key} is odd")));
            }
            self.0.decrypt(ciphertext, key)
        }
    }
}
