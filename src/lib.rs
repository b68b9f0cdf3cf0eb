mod alphabet;
pub mod analysis;
mod attack;
mod catalog;
pub mod cipher;
mod error;
mod language_model;
mod report;
pub mod scorer;
pub mod search;

pub use alphabet::Alphabet;
pub use attack::{attack, AttackConfig, StrategyChoice};
pub use catalog::{Catalog, CatalogCipher};
pub use cipher::affine::{Affine, AffineKey};
pub use cipher::caesar::Caesar;
pub use cipher::substitution::Substitution;
pub use cipher::xor::{
    bytes_to_hex, hex_to_bytes, random_pad, xor_bytes, xor_with_key, SingleByteXor,
};
pub use cipher::{Cardinality, Cipher, CipherKey, KeySpace};
pub use error::{Error, Result};
pub use language_model::{LanguageModel, ModelConfig};
pub use report::{AttackReport, ReportCandidate};
pub use scorer::{ChiSquaredScorer, CombinedScorer, NgramScorer, Scorer};
pub use search::annealing::CoolingSchedule;
pub use search::{Candidate, SearchResult, Strategy};
