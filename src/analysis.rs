// Information-theoretic measures for judging texts and distributions.

use crate::Alphabet;

/// Information content, in units of `log_base`, of an event with
/// probability `probability`.
pub fn information_content(probability: f64, log_base: f64) -> f64 {
    -probability.log(log_base)
}

/// Shannon entropy of a distribution. Zero probabilities contribute nothing.
pub fn entropy<I>(probabilities: I, log_base: f64) -> f64
where
    I: IntoIterator<Item = f64>,
{
    probabilities
        .into_iter()
        .filter(|&p| p > 0.0)
        .map(|p| p * information_content(p, log_base))
        .sum()
}

/// The fraction of symbols carrying no information: `1 - H / log(n)`.
pub fn redundancy(alphabet_len: usize, entropy: f64, log_base: f64) -> f64 {
    if alphabet_len < 2 {
        return 0.0;
    }
    1.0 - entropy / (alphabet_len as f64).log(log_base)
}

/// Relative frequency of each alphabet symbol in `text`, honouring the
/// alphabet's case folding. Other bytes are ignored.
pub fn symbol_frequencies(text: &[u8], alphabet: &Alphabet) -> Vec<f64> {
    let counts = symbol_counts(text, alphabet);
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return vec![0.0; alphabet.len()];
    }
    counts.iter().map(|&c| c as f64 / total as f64).collect()
}

/// Probability that two symbols drawn from `text` without replacement are
/// equal. English sits around 0.067, uniformly random letters around 0.038.
pub fn index_of_coincidence(text: &[u8], alphabet: &Alphabet) -> f64 {
    let counts = symbol_counts(text, alphabet);
    let n: u64 = counts.iter().sum();
    if n < 2 {
        return 0.0;
    }
    let pairs: u64 = counts.iter().map(|&c| c * c.saturating_sub(1)).sum();
    pairs as f64 / (n * (n - 1)) as f64
}

/// Number of differing bits between two equal-length byte strings.
pub fn hamming_distance(a: &[u8], b: &[u8]) -> u32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum()
}

fn symbol_counts(text: &[u8], alphabet: &Alphabet) -> Vec<u64> {
    let mut counts = vec![0u64; alphabet.len()];
    for idx in text.iter().filter_map(|&b| alphabet.folded_index_of(b)) {
        counts[idx] += 1;
    }
    counts
}
