use std::cmp::Ordering;

/// A decrypted candidate and its score.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<K> {
    pub key: K,
    pub plaintext: Vec<u8>,
    pub score: f64,
}

impl<K: Ord> Candidate<K> {
    /// Best first: higher score, then the smaller key.
    pub fn rank(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.key.cmp(&other.key))
    }
}

/// The `capacity` best distinct-key candidates seen so far, best first.
///
/// Merging two collections keeps the best of their union, so the result
/// does not depend on the order candidates or collections arrive in.
#[derive(Debug, Clone, PartialEq)]
pub struct TopK<K> {
    capacity: usize,
    candidates: Vec<Candidate<K>>,
}

impl<K: Ord> TopK<K> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            candidates: Vec::with_capacity(capacity),
        }
    }

    /// Insert `candidate` if it ranks among the best. Candidates scoring
    /// negative infinity or NaN, and keys already held, are refused.
    pub fn offer(&mut self, candidate: Candidate<K>) -> bool {
        if candidate.score.is_nan() || candidate.score == f64::NEG_INFINITY {
            return false;
        }
        if self.candidates.iter().any(|c| c.key == candidate.key) {
            return false;
        }
        let pos = self
            .candidates
            .partition_point(|c| c.rank(&candidate) == Ordering::Less);
        if pos >= self.capacity {
            return false;
        }
        self.candidates.insert(pos, candidate);
        self.candidates.truncate(self.capacity);
        true
    }

    pub fn merge(&mut self, other: TopK<K>) {
        for candidate in other.candidates {
            self.offer(candidate);
        }
    }

    pub fn best(&self) -> Option<&Candidate<K>> {
        self.candidates.first()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn into_sorted_vec(self) -> Vec<Candidate<K>> {
        self.candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    fn candidate(key: u32, score: f64) -> Candidate<u32> {
        Candidate {
            key,
            plaintext: Vec::new(),
            score,
        }
    }

    fn keys(top: &TopK<u32>) -> Vec<u32> {
        top.candidates.iter().map(|c| c.key).collect()
    }

    #[test]
    fn keeps_best_candidates_in_descending_order() {
        let mut top = TopK::new(3);
        for (key, score) in [(1, -5.0), (2, -1.0), (3, -3.0), (4, -2.0), (5, -9.0)] {
            top.offer(candidate(key, score));
        }

        assert_eq!(keys(&top), vec![2, 4, 3]);
        assert_eq!(top.best().unwrap().score, -1.0);
    }

    #[test]
    fn equal_scores_fall_back_to_smaller_key() {
        let mut top = TopK::new(2);
        top.offer(candidate(9, 1.0));
        top.offer(candidate(4, 1.0));
        top.offer(candidate(7, 1.0));

        assert_eq!(keys(&top), vec![4, 7]);
    }

    #[test]
    fn refuses_duplicates_and_discarded_scores() {
        let mut top = TopK::new(5);

        assert!(top.offer(candidate(1, 2.0)));
        assert!(!top.offer(candidate(1, 2.0)));
        assert!(!top.offer(candidate(2, f64::NEG_INFINITY)));
        assert!(!top.offer(candidate(3, f64::NAN)));
        assert_eq!(top.len(), 1);
    }

    #[test]
    fn merge_is_independent_of_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut all: Vec<Candidate<u32>> = (0..60)
            .map(|k| candidate(k, ((k * 37) % 11) as f64))
            .collect();

        let mut reference = TopK::new(7);
        for c in all.iter().cloned() {
            reference.offer(c);
        }

        for _ in 0..10 {
            all.shuffle(&mut rng);
            let mut merged = TopK::new(7);
            for chunk in all.chunks(9) {
                let mut part = TopK::new(7);
                for c in chunk.iter().cloned() {
                    part.offer(c);
                }
                merged.merge(part);
            }
            assert_eq!(merged, reference);
        }
    }
}
