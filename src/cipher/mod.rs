// The contract every primitive in the catalog implements, and the key-space
// description the search strategies explore.

pub mod affine;
pub mod caesar;
pub mod substitution;
pub mod xor;

use std::fmt::{self, Debug};

use rand::rngs::StdRng;

use crate::{Error, Result};

/// How many keys a key space holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Enumerable by index with `KeySpace::key_at`.
    Finite(u128),
    /// Too large to count.
    Unbounded,
}

impl Cardinality {
    /// The number of keys, if it does not exceed `limit`.
    pub fn at_most(&self, limit: u128) -> Option<u128> {
        match *self {
            Cardinality::Finite(n) if n <= limit => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Finite(n) => write!(f, "{n}"),
            Cardinality::Unbounded => f.write_str("unbounded"),
        }
    }
}

pub trait KeySpace: Sync {
    type Key: Clone + Ord + Debug + Send + Sync;

    fn cardinality(&self) -> Cardinality;

    /// The key at `index` in enumeration order. `None` past the end.
    fn key_at(&self, index: u128) -> Option<Self::Key>;

    fn random_key(&self, rng: &mut StdRng) -> Self::Key;

    /// A small perturbation of `key`, used by local search.
    fn neighbor(&self, key: &Self::Key, rng: &mut StdRng) -> Self::Key;

    fn is_valid(&self, key: &Self::Key) -> bool;

    fn format_key(&self, key: &Self::Key) -> String;

    fn parse_key(&self, text: &str) -> Result<Self::Key>;
}

pub trait Cipher: Sync {
    type Space: KeySpace;

    fn name(&self) -> &'static str;

    fn key_space(&self) -> &Self::Space;

    /// Fails with `InvalidInput` if `input` holds symbols the cipher cannot
    /// process.
    fn check_input(&self, input: &[u8]) -> Result<()>;

    fn encrypt(
        &self,
        plaintext: &[u8],
        key: &<Self::Space as KeySpace>::Key,
    ) -> Result<Vec<u8>>;

    fn decrypt(
        &self,
        ciphertext: &[u8],
        key: &<Self::Space as KeySpace>::Key,
    ) -> Result<Vec<u8>>;
}

pub type CipherKey<C> = <<C as Cipher>::Space as KeySpace>::Key;

pub(crate) fn ensure_valid_key<S: KeySpace>(space: &S, key: &S::Key) -> Result<()> {
    if space.is_valid(key) {
        Ok(())
    } else {
        Err(Error::InvalidKey(format!("{key:?}")))
    }
}
