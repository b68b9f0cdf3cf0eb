// Affine cipher: E(i) = (a * i + b) mod n, with a coprime to n.

use rand::{rngs::StdRng, Rng};

use crate::{
    cipher::{ensure_valid_key, Cardinality, Cipher, KeySpace},
    Alphabet, Error, Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AffineKey {
    pub a: usize,
    pub b: usize,
}

#[derive(Debug, Clone)]
pub struct Affine {
    alphabet: Alphabet,
    keys: AffineKeys,
}

#[derive(Debug, Clone)]
pub struct AffineKeys {
    modulus: usize,
    multipliers: Vec<usize>,
}

impl Affine {
    pub fn new(alphabet: Alphabet) -> Self {
        let modulus = alphabet.len();
        let multipliers = (1..modulus.max(2))
            .filter(|&a| gcd(a, modulus) == 1)
            .collect();
        Self {
            alphabet,
            keys: AffineKeys {
                modulus,
                multipliers,
            },
        }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::new(Alphabet::english())
    }
}

impl Cipher for Affine {
    type Space = AffineKeys;

    fn name(&self) -> &'static str {
        "affine"
    }

    fn key_space(&self) -> &AffineKeys {
        &self.keys
    }

    fn check_input(&self, input: &[u8]) -> Result<()> {
        self.alphabet.check(input)
    }

    fn encrypt(&self, plaintext: &[u8], key: &AffineKey) -> Result<Vec<u8>> {
        ensure_valid_key(&self.keys, key)?;
        let n = self.keys.modulus;
        Ok(self
            .alphabet
            .to_indices(plaintext)?
            .into_iter()
            .map(|i| self.alphabet.symbol((key.a * i + key.b) % n))
            .collect())
    }

    fn decrypt(&self, ciphertext: &[u8], key: &AffineKey) -> Result<Vec<u8>> {
        ensure_valid_key(&self.keys, key)?;
        let n = self.keys.modulus;
        let a_inv = mod_inverse(key.a, n)
            .ok_or_else(|| Error::InvalidKey(format!("{} has no inverse mod {n}", key.a)))?;
        Ok(self
            .alphabet
            .to_indices(ciphertext)?
            .into_iter()
            .map(|c| self.alphabet.symbol(a_inv * (c + n - key.b) % n))
            .collect())
    }
}

impl KeySpace for AffineKeys {
    type Key = AffineKey;

    fn cardinality(&self) -> Cardinality {
        Cardinality::Finite((self.multipliers.len() * self.modulus) as u128)
    }

    fn key_at(&self, index: u128) -> Option<AffineKey> {
        let n = self.modulus as u128;
        let a = *self.multipliers.get(usize::try_from(index / n).ok()?)?;
        Some(AffineKey {
            a,
            b: (index % n) as usize,
        })
    }

    fn random_key(&self, rng: &mut StdRng) -> AffineKey {
        AffineKey {
            a: self.multipliers[rng.gen_range(0..self.multipliers.len())],
            b: rng.gen_range(0..self.modulus),
        }
    }

    fn neighbor(&self, key: &AffineKey, rng: &mut StdRng) -> AffineKey {
        let mut next = *key;
        if self.multipliers.len() > 1 && rng.gen_bool(0.5) {
            next.a = self.multipliers[rng.gen_range(0..self.multipliers.len())];
        } else {
            next.b = (key.b + rng.gen_range(1..self.modulus.max(2))) % self.modulus;
        }
        next
    }

    fn is_valid(&self, key: &AffineKey) -> bool {
        key.b < self.modulus && self.multipliers.binary_search(&key.a).is_ok()
    }

    fn format_key(&self, key: &AffineKey) -> String {
        format!("{},{}", key.a, key.b)
    }

    fn parse_key(&self, text: &str) -> Result<AffineKey> {
        let (a, b) = text
            .split_once(',')
            .ok_or_else(|| Error::InvalidKey(format!("expected \"a,b\", got {text:?}")))?;
        let parse = |s: &str| {
            s.trim()
                .parse::<usize>()
                .map_err(|e| Error::InvalidKey(format!("cannot parse {s:?}: {e}")))
        };
        let key = AffineKey {
            a: parse(a)?,
            b: parse(b)?,
        };
        ensure_valid_key(self, &key)?;
        Ok(key)
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Inverse of `a` modulo `n` by the extended Euclidean algorithm.
fn mod_inverse(a: usize, n: usize) -> Option<usize> {
    let (mut old_r, mut r) = (a as i64, n as i64);
    let (mut old_s, mut s) = (1i64, 0i64);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    if old_r != 1 {
        return None;
    }
    Some(old_s.rem_euclid(n as i64) as usize)
}
