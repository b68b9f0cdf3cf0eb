// Brute force over every key of a finite key space.

use rayon::prelude::*;

use crate::{
    cipher::{Cipher, CipherKey, KeySpace},
    scorer::Scorer,
    search::{Evaluator, SearchResult, Strategy, TopK},
    Error, Result,
};

const CHUNK_SIZE: u128 = 4096;

/// Decrypt under every key and keep the `top_k` best. Fails with
/// `IntractableKeySpace` when the space is unbounded or holds more than
/// `limit` keys.
pub fn exhaustive<C, S>(
    ciphertext: &[u8],
    cipher: &C,
    scorer: &S,
    top_k: usize,
    limit: u64,
) -> Result<SearchResult<CipherKey<C>>>
where
    C: Cipher,
    S: Scorer + ?Sized,
{
    let space = cipher.key_space();
    let total = space
        .cardinality()
        .at_most(limit as u128)
        .ok_or(Error::IntractableKeySpace {
            cipher: cipher.name(),
            budget: limit,
        })?;
    let eval = Evaluator::new(cipher, ciphertext, scorer);

    let chunks = total.div_ceil(CHUNK_SIZE) as usize;
    let top = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let start = chunk as u128 * CHUNK_SIZE;
            let end = (start + CHUNK_SIZE).min(total);
            let mut top = TopK::new(top_k);
            for key in (start..end).filter_map(|i| space.key_at(i)) {
                top.offer(eval.evaluate(key));
            }
            top
        })
        .reduce(
            || TopK::new(top_k),
            |mut acc, part| {
                acc.merge(part);
                acc
            },
        );

    Ok(SearchResult {
        candidates: top.into_sorted_vec(),
        strategy: Strategy::Exhaustive,
        iterations: total as u64,
        evaluations: total as u64,
        restarts: 0,
        seed: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        cipher::{affine::Affine, caesar::Caesar, substitution::Substitution, xor::SingleByteXor},
        language_model::english_model,
        scorer::{ChiSquaredScorer, NgramScorer},
        search::testing::OddKeysFail,
        Alphabet,
    };

    #[test]
    fn finds_caesar_shift() {
        let cipher = Caesar::default();
        let scorer = NgramScorer::new(english_model());
        let ciphertext = cipher.encrypt(b"MEETMEBYTHEOLDOAKTREEATNOON", &11).unwrap();

        let result = exhaustive(&ciphertext, &cipher, &scorer, 3, 1_000).unwrap();

        assert_eq!(result.candidates.len(), 3);
        assert_eq!(result.best().unwrap().key, 11);
        assert_eq!(result.best().unwrap().plaintext, b"MEETMEBYTHEOLDOAKTREEATNOON");
        assert_eq!(result.evaluations, 26);
    }

    #[test]
    fn finds_single_byte_xor_key() {
        // Challenge 3 of the Cryptopals set 1.
        let ciphertext = [
            0x1b, 0x37, 0x37, 0x33, 0x31, 0x36, 0x3f, 0x78, 0x15, 0x1b, 0x7f, 0x2b, 0x78, 0x34,
            0x31, 0x33, 0x3d, 0x78, 0x39, 0x78, 0x28, 0x37, 0x2d, 0x36, 0x3c, 0x78, 0x37, 0x3e,
            0x78, 0x3a, 0x39, 0x3b, 0x37, 0x36,
        ];

        let result =
            exhaustive(&ciphertext, &SingleByteXor::default(), &ChiSquaredScorer, 1, 256).unwrap();

        let best = result.best().unwrap();
        assert_eq!(best.key, 88);
        assert_eq!(best.plaintext, b"Cooking MC's like a pound of bacon");
    }

    #[test]
    fn candidates_are_sorted_and_distinct() {
        let cipher = Affine::default();
        let scorer = NgramScorer::new(english_model());
        let key = cipher.key_space().parse_key("11,20").unwrap();
        let ciphertext = cipher.encrypt(b"NOWISTHEWINTEROFOURDISCONTENT", &key).unwrap();

        let result = exhaustive(&ciphertext, &cipher, &scorer, 25, 1_000).unwrap();

        assert_eq!(result.best().unwrap().key, key);
        assert_eq!(result.candidates.len(), 25);
        assert!(result.candidates.windows(2).all(|w| w[0].score >= w[1].score));
        let mut keys: Vec<_> = result.candidates.iter().map(|c| c.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 25);
    }

    #[test]
    fn enumerates_small_permutation_space_across_chunks() {
        // 7! = 5040 keys spans two chunks.
        let cipher = Substitution::new(Alphabet::new(b"ABCDEFG").unwrap());
        let key = cipher.key_space().parse_key("GFEDCBA").unwrap();
        let ciphertext = cipher.encrypt(b"ABBAGEDCAFE", &key).unwrap();

        let result =
            exhaustive(&ciphertext, &cipher, &OnlyPlaintext(b"ABBAGEDCAFE"), 2, 10_000).unwrap();

        assert_eq!(result.evaluations, 5040);
        assert_eq!(result.best().unwrap().key, key);
        assert_eq!(result.best().unwrap().score, 0.0);
    }

    #[test]
    fn repeated_runs_agree() {
        let cipher = Caesar::default();
        let scorer = NgramScorer::new(english_model());

        let first = exhaustive(b"WKLVLVDWHVW", &cipher, &scorer, 5, 100).unwrap();
        let second = exhaustive(b"WKLVLVDWHVW", &cipher, &scorer, 5, 100).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn failed_decryptions_are_never_candidates() {
        let cipher = OddKeysFail(Caesar::default());
        let scorer = NgramScorer::new(english_model());

        let result = exhaustive(b"KHOOR", &cipher, &scorer, 26, 100).unwrap();

        assert_eq!(result.candidates.len(), 13);
        assert!(result.candidates.iter().all(|c| c.key % 2 == 0));
    }

    #[test]
    fn refuses_spaces_beyond_the_limit() {
        let scorer = NgramScorer::new(english_model());

        let err = exhaustive(b"ABC", &Substitution::default(), &scorer, 5, 1_000_000).unwrap_err();

        assert_eq!(
            err,
            Error::IntractableKeySpace {
                cipher: "substitution",
                budget: 1_000_000
            }
        );
        assert!(exhaustive(b"ABC", &Caesar::default(), &scorer, 5, 25).is_err());
    }

    /// Scores 0 for one exact text and -1 for anything else.
    struct OnlyPlaintext(&'static [u8]);

    impl Scorer for OnlyPlaintext {
        fn name(&self) -> &'static str {
            "only-plaintext"
        }

        fn evaluate(&self, text: &[u8]) -> f64 {
            if text == self.0 {
                0.0
            } else {
                -1.0
            }
        }
    }
}
