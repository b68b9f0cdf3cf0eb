// Caesar (shift) cipher: a cyclic shift of the alphabet, E(i) = (i + k) mod n.

use rand::{rngs::StdRng, Rng};

use crate::{
    cipher::{ensure_valid_key, Cardinality, Cipher, KeySpace},
    Alphabet, Error, Result,
};

#[derive(Debug, Clone)]
pub struct Caesar {
    alphabet: Alphabet,
    keys: ShiftKeys,
}

#[derive(Debug, Clone, Copy)]
pub struct ShiftKeys {
    modulus: usize,
}

impl Caesar {
    pub fn new(alphabet: Alphabet) -> Self {
        let keys = ShiftKeys {
            modulus: alphabet.len(),
        };
        Self { alphabet, keys }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn shift(&self, text: &[u8], shift: usize) -> Result<Vec<u8>> {
        let n = self.alphabet.len();
        Ok(self
            .alphabet
            .to_indices(text)?
            .into_iter()
            .map(|i| self.alphabet.symbol((i + shift) % n))
            .collect())
    }
}

impl Default for Caesar {
    fn default() -> Self {
        Self::new(Alphabet::english())
    }
}

impl Cipher for Caesar {
    type Space = ShiftKeys;

    fn name(&self) -> &'static str {
        "caesar"
    }

    fn key_space(&self) -> &ShiftKeys {
        &self.keys
    }

    fn check_input(&self, input: &[u8]) -> Result<()> {
        self.alphabet.check(input)
    }

    fn encrypt(&self, plaintext: &[u8], key: &usize) -> Result<Vec<u8>> {
        ensure_valid_key(&self.keys, key)?;
        self.shift(plaintext, *key)
    }

    fn decrypt(&self, ciphertext: &[u8], key: &usize) -> Result<Vec<u8>> {
        ensure_valid_key(&self.keys, key)?;
        self.shift(ciphertext, self.keys.modulus - key)
    }
}

impl KeySpace for ShiftKeys {
    type Key = usize;

    fn cardinality(&self) -> Cardinality {
        Cardinality::Finite(self.modulus as u128)
    }

    fn key_at(&self, index: u128) -> Option<usize> {
        (index < self.modulus as u128).then_some(index as usize)
    }

    fn random_key(&self, rng: &mut StdRng) -> usize {
        rng.gen_range(0..self.modulus)
    }

    fn neighbor(&self, key: &usize, rng: &mut StdRng) -> usize {
        if rng.gen_bool(0.5) {
            (key + 1) % self.modulus
        } else {
            (key + self.modulus - 1) % self.modulus
        }
    }

    fn is_valid(&self, key: &usize) -> bool {
        *key < self.modulus
    }

    fn format_key(&self, key: &usize) -> String {
        key.to_string()
    }

    fn parse_key(&self, text: &str) -> Result<usize> {
        let key = text
            .trim()
            .parse::<usize>()
            .map_err(|e| Error::InvalidKey(format!("cannot parse shift {text:?}: {e}")))?;
        ensure_valid_key(self, &key)?;
        Ok(key)
    }
}
