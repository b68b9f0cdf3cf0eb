// Fitness functions for candidate plaintexts. Every scorer reduces a text to
// one number where higher means more language-like; one attack uses exactly
// one scorer so the numbers it compares are commensurable.

use crate::LanguageModel;

// http://practicalcryptography.com/cryptanalysis/letter-frequencies-various-languages/english-letter-frequencies/
const LETTER_FREQUENCIES: [f64; 26] = [
    0.08551690673195275,   // A
    0.016047959168228293,  // B
    0.03164435380900101,   // C
    0.03871183735737418,   // D
    0.1209652247516903,    // E
    0.021815103969122528,  // F
    0.020863354250923158,  // G
    0.04955707280570641,   // H
    0.0732511860723129,    // I
    0.002197788956104563,  // J
    0.008086975227142329,  // K
    0.04206464329306453,   // L
    0.025263217360184446,  // M
    0.07172184876283856,   // N
    0.07467265410810447,   // O
    0.020661660788966266,  // P
    0.0010402453014323196, // Q
    0.0633271013284023,    // R
    0.06728203117491646,   // S
    0.08938126949659495,   // T
    0.026815809362304373,  // U
    0.01059346274662571,   // V
    0.018253618950416498,  // W
    0.0019135048594134572, // X
    0.017213606152473405,  // Y
    0.001137563214703838,  // Z
];
const SEPARATORS: &[u8] = b" ,.!?'\":;";

pub trait Scorer: Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, text: &[u8]) -> f64;

    /// Expected score of genuine language text of `len` bytes, if the scorer
    /// can estimate one.
    fn baseline(&self, _len: usize) -> Option<f64> {
        None
    }
}

/// Sum of n-gram log-probabilities under a language model.
#[derive(Debug, Clone, Copy)]
pub struct NgramScorer<'a> {
    model: &'a LanguageModel,
}

impl<'a> NgramScorer<'a> {
    pub fn new(model: &'a LanguageModel) -> Self {
        Self { model }
    }
}

impl Scorer for NgramScorer<'_> {
    fn name(&self) -> &'static str {
        "ngram"
    }

    fn evaluate(&self, text: &[u8]) -> f64 {
        self.model.score(text)
    }

    fn baseline(&self, len: usize) -> Option<f64> {
        Some(self.model.baseline_per_ngram() * self.model.windows(len) as f64)
    }
}

/// Chi-squared distance of the letter distribution to English, weighted by
/// how much of the text is letters and punctuation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChiSquaredScorer;

impl Scorer for ChiSquaredScorer {
    fn name(&self) -> &'static str {
        "chi-squared"
    }

    fn evaluate(&self, text: &[u8]) -> f64 {
        score_english_by_frequency(text)
    }
}

/// Scores text as English by how closely its letter counts follow English
/// letter frequencies, scaled by the share of bytes that are letters or
/// separators. The result lies in `[0, 1]`; text without letters scores
/// negative infinity.
pub fn score_english_by_frequency(text: &[u8]) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let mut counts = [0u64; 26];
    let mut coverage = 0.0;
    for b in text.iter().map(u8::to_ascii_uppercase) {
        if b.is_ascii_uppercase() {
            counts[(b - b'A') as usize] += 1;
            coverage += 1.0;
        } else if SEPARATORS.contains(&b) {
            coverage += 0.5;
        }
    }
    let Some(distance) = chi_squared(&counts, &LETTER_FREQUENCIES) else {
        return f64::NEG_INFINITY;
    };
    let coverage = coverage / text.len() as f64;

    // Short texts say little about letter frequencies; lean on coverage
    // until there are 40 bytes.
    let confidence = (text.len() as f64 / 40.0).min(1.0);
    coverage * (confidence / (1.0 + distance) + (1.0 - confidence))
}

/// Pearson's chi-squared statistic of `observed` counts against `expected`
/// proportions. `None` when nothing was observed.
fn chi_squared(observed: &[u64], expected: &[f64]) -> Option<f64> {
    let total = observed.iter().sum::<u64>() as f64;
    if total == 0.0 {
        return None;
    }
    Some(
        observed
            .iter()
            .zip(expected)
            .map(|(&obs, &p)| {
                let want = p * total;
                (obs as f64 - want).powi(2) / want
            })
            .sum(),
    )
}

/// Weighted sum of other scorers, e.g. n-gram models of several orders.
#[derive(Default)]
pub struct CombinedScorer<'a> {
    parts: Vec<(f64, Box<dyn Scorer + 'a>)>,
}

impl<'a> CombinedScorer<'a> {
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    pub fn with(mut self, weight: f64, scorer: impl Scorer + 'a) -> Self {
        self.parts.push((weight, Box::new(scorer)));
        self
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl Scorer for CombinedScorer<'_> {
    fn name(&self) -> &'static str {
        "combined"
    }

    fn evaluate(&self, text: &[u8]) -> f64 {
        self.parts
            .iter()
            .map(|(weight, scorer)| weight * scorer.evaluate(text))
            .sum()
    }

    fn baseline(&self, len: usize) -> Option<f64> {
        self.parts
            .iter()
            .map(|(weight, scorer)| scorer.baseline(len).map(|b| weight * b))
            .sum()
    }
}
