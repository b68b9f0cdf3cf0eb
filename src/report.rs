// Key-type-erased view of a search result, for printing and serialization.

use serde::Serialize;

use crate::{
    cipher::{Cipher, CipherKey, KeySpace},
    search::{SearchResult, Strategy},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackReport {
    pub cipher: &'static str,
    /// Size of the key space searched, as decimal text or `unbounded`.
    pub key_space: String,
    pub strategy: Strategy,
    pub iterations: u64,
    pub evaluations: u64,
    pub restarts: u64,
    pub seed: Option<u64>,
    pub candidates: Vec<ReportCandidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCandidate {
    pub key: String,
    pub plaintext: String,
    pub score: f64,
}

impl AttackReport {
    pub fn new<C: Cipher>(cipher: &C, result: SearchResult<CipherKey<C>>) -> Self {
        let space = cipher.key_space();
        Self {
            cipher: cipher.name(),
            key_space: space.cardinality().to_string(),
            strategy: result.strategy,
            iterations: result.iterations,
            evaluations: result.evaluations,
            restarts: result.restarts,
            seed: result.seed,
            candidates: result
                .candidates
                .into_iter()
                .map(|c| ReportCandidate {
                    key: space.format_key(&c.key),
                    plaintext: String::from_utf8_lossy(&c.plaintext).into_owned(),
                    score: c.score,
                })
                .collect(),
        }
    }

    pub fn best(&self) -> Option<&ReportCandidate> {
        self.candidates.first()
    }

    /// One line of metadata followed by one line per candidate.
    pub fn render_text(&self) -> String {
        let mut out = format!(
            "{} ({} keys) via {}: {} evaluations, {} restarts",
            self.cipher,
            self.key_space,
            self.strategy.name(),
            self.evaluations,
            self.restarts
        );
        if let Some(seed) = self.seed {
            out.push_str(&format!(", seed {seed}"));
        }
        out.push('\n');
        for (rank, c) in self.candidates.iter().enumerate() {
            out.push_str(&format!(
                "{:>3}. {:>12.3}  key={}  {}\n",
                rank + 1,
                c.score,
                c.key,
                c.plaintext.escape_debug()
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{cipher::affine::Affine, cipher::affine::AffineKey, search::Candidate};

    fn report() -> AttackReport {
        let result = SearchResult {
            candidates: vec![
                Candidate {
                    key: AffineKey { a: 5, b: 8 },
                    plaintext: b"AFFINECIPHER".to_vec(),
                    score: -40.5,
                },
                Candidate {
                    key: AffineKey { a: 3, b: 0 },
                    plaintext: vec![b'X', 0xff],
                    score: -90.0,
                },
            ],
            strategy: Strategy::Exhaustive,
            iterations: 312,
            evaluations: 312,
            restarts: 0,
            seed: None,
        };
        AttackReport::new(&Affine::default(), result)
    }

    #[test]
    fn keys_are_rendered_as_text() {
        let report = report();

        assert_eq!(report.cipher, "affine");
        assert_eq!(report.best().unwrap().key, "5,8");
        assert_eq!(report.candidates[1].plaintext, "X\u{fffd}");
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(report()).unwrap();

        assert_eq!(json["strategy"], "exhaustive");
        assert_eq!(json["evaluations"], 312);
        assert_eq!(json["key_space"], "312");
        assert_eq!(json["candidates"][0]["plaintext"], "AFFINECIPHER");
        assert!(json["seed"].is_null());
    }

    #[test]
    fn text_lists_candidates_in_rank_order() {
        let text = report().render_text();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("affine (312 keys) via exhaustive"));
        assert!(lines[1].contains("key=5,8"));
        assert!(lines[2].starts_with("  2."));
    }
}
