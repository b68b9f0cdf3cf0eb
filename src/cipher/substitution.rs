// General monoalphabetic substitution: the key is a permutation of the
// alphabet. Plaintext symbol `i` encrypts to `key[i]`.

use rand::{rngs::StdRng, seq::SliceRandom, Rng};

use crate::{
    cipher::{ensure_valid_key, Cardinality, Cipher, KeySpace},
    Alphabet, Error, Result,
};

#[derive(Debug, Clone)]
pub struct Substitution {
    alphabet: Alphabet,
    keys: Permutations,
}

#[derive(Debug, Clone)]
pub struct Permutations {
    alphabet: Alphabet,
    // factorials[i] == i!, as far as u128 reaches.
    factorials: Vec<u128>,
}

impl Substitution {
    pub fn new(alphabet: Alphabet) -> Self {
        let mut factorials = vec![1u128];
        for i in 1..=alphabet.len() as u128 {
            match factorials.last().and_then(|f| f.checked_mul(i)) {
                Some(f) => factorials.push(f),
                None => break,
            }
        }
        Self {
            keys: Permutations {
                alphabet: alphabet.clone(),
                factorials,
            },
            alphabet,
        }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }
}

impl Default for Substitution {
    fn default() -> Self {
        Self::new(Alphabet::english())
    }
}

impl Cipher for Substitution {
    type Space = Permutations;

    fn name(&self) -> &'static str {
        "substitution"
    }

    fn key_space(&self) -> &Permutations {
        &self.keys
    }

    fn check_input(&self, input: &[u8]) -> Result<()> {
        self.alphabet.check(input)
    }

    fn encrypt(&self, plaintext: &[u8], key: &Vec<u8>) -> Result<Vec<u8>> {
        ensure_valid_key(&self.keys, key)?;
        Ok(self
            .alphabet
            .to_indices(plaintext)?
            .into_iter()
            .map(|i| self.alphabet.symbol(key[i] as usize))
            .collect())
    }

    fn decrypt(&self, ciphertext: &[u8], key: &Vec<u8>) -> Result<Vec<u8>> {
        ensure_valid_key(&self.keys, key)?;
        let mut inverse = vec![0u8; key.len()];
        for (plain, &cipher) in key.iter().enumerate() {
            inverse[cipher as usize] = plain as u8;
        }
        Ok(self
            .alphabet
            .to_indices(ciphertext)?
            .into_iter()
            .map(|c| self.alphabet.symbol(inverse[c] as usize))
            .collect())
    }
}

impl KeySpace for Permutations {
    type Key = Vec<u8>;

    fn cardinality(&self) -> Cardinality {
        match self.factorials.get(self.alphabet.len()) {
            Some(&n) => Cardinality::Finite(n),
            None => Cardinality::Unbounded,
        }
    }

    /// Decode `index` as a Lehmer code, so keys come out in lexicographic
    /// order.
    fn key_at(&self, mut index: u128) -> Option<Vec<u8>> {
        let n = self.alphabet.len();
        let total = *self.factorials.get(n)?;
        if index >= total {
            return None;
        }
        let mut available: Vec<u8> = (0..n as u16).map(|i| i as u8).collect();
        let mut key = Vec::with_capacity(n);
        for place in (0..n).rev() {
            let radix = self.factorials[place];
            let digit = (index / radix) as usize;
            index %= radix;
            key.push(available.remove(digit));
        }
        Some(key)
    }

    fn random_key(&self, rng: &mut StdRng) -> Vec<u8> {
        let mut key: Vec<u8> = (0..self.alphabet.len() as u16).map(|i| i as u8).collect();
        key.shuffle(rng);
        key
    }

    fn neighbor(&self, key: &Vec<u8>, rng: &mut StdRng) -> Vec<u8> {
        let mut next = key.clone();
        let n = next.len();
        if n < 2 {
            return next;
        }
        let i = rng.gen_range(0..n);
        let j = (i + rng.gen_range(1..n)) % n;
        next.swap(i, j);
        next
    }

    fn is_valid(&self, key: &Vec<u8>) -> bool {
        let n = self.alphabet.len();
        if key.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for &k in key {
            let k = k as usize;
            if k >= n || seen[k] {
                return false;
            }
            seen[k] = true;
        }
        true
    }

    fn format_key(&self, key: &Vec<u8>) -> String {
        key.iter()
            .map(|&k| self.alphabet.symbol(k as usize) as char)
            .collect()
    }

    fn parse_key(&self, text: &str) -> Result<Vec<u8>> {
        let key = text
            .trim()
            .bytes()
            .map(|b| {
                self.alphabet
                    .folded_index_of(b)
                    .map(|i| i as u8)
                    .ok_or_else(|| Error::InvalidKey(format!("{:?} is not in the alphabet", b as char)))
            })
            .collect::<Result<Vec<u8>>>()?;
        ensure_valid_key(self, &key)?;
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::cipher::conformance;

    #[test]
    fn encrypts_with_keyed_alphabet() {
        let cipher = Substitution::default();
        let key = cipher
            .key_space()
            .parse_key("ZEBRASCDFGHIJKLMNOPQTUVWXY")
            .unwrap();

        let ciphertext = cipher.encrypt(b"FLEEATONCE", &key).unwrap();

        assert_eq!(ciphertext, b"SIAAZQLKBA");
        assert_eq!(cipher.decrypt(&ciphertext, &key).unwrap(), b"FLEEATONCE");
    }

    #[test]
    fn english_key_space_is_26_factorial() {
        let cipher = Substitution::default();

        assert_eq!(
            cipher.key_space().cardinality(),
            Cardinality::Finite(403_291_461_126_605_635_584_000_000)
        );
    }

    #[test]
    fn huge_alphabets_are_unbounded() {
        let symbols: Vec<u8> = (0..=255).collect();
        let cipher = Substitution::new(Alphabet::new(&symbols).unwrap());

        assert_eq!(cipher.key_space().cardinality(), Cardinality::Unbounded);
        assert_eq!(cipher.key_space().key_at(0), None);
    }

    #[test]
    fn key_at_enumerates_in_lexicographic_order() {
        let cipher = Substitution::new(Alphabet::new(b"ABCD").unwrap());
        let keys: Vec<Vec<u8>> = (0..24)
            .map(|i| cipher.key_space().key_at(i).unwrap())
            .collect();

        assert_eq!(keys[0], vec![0, 1, 2, 3]);
        assert_eq!(keys[1], vec![0, 1, 3, 2]);
        assert_eq!(keys[23], vec![3, 2, 1, 0]);
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        conformance::assert_enumerates(cipher.key_space());
    }

    #[test]
    fn round_trips() {
        let cipher = Substitution::default();

        conformance::assert_round_trips(&cipher, cipher.alphabet().symbols());
    }

    #[test]
    fn key_space_is_well_formed() {
        let cipher = Substitution::default();

        conformance::assert_key_text_round_trips(cipher.key_space());
        conformance::assert_neighbors_are_valid(cipher.key_space());
    }

    #[test]
    fn rejects_keys_that_are_not_permutations() {
        let cipher = Substitution::default();

        assert!(matches!(
            cipher.key_space().parse_key("AACDEFGHIJKLMNOPQRSTUVWXYZ"),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(
            cipher.encrypt(b"ABC", &vec![0, 1, 2]),
            Err(Error::InvalidKey(_))
        ));
    }
}
