// Name-addressable registry of the concrete ciphers, for callers that pick a
// cipher at run time and work with textual keys.

use crate::{
    attack::{attack, AttackConfig},
    cipher::{
        affine::Affine, caesar::Caesar, substitution::Substitution, xor::SingleByteXor,
        Cardinality, Cipher, KeySpace,
    },
    report::AttackReport,
    scorer::Scorer,
    Alphabet, Error, Result,
};

#[derive(Debug, Clone)]
pub enum CatalogCipher {
    Caesar(Caesar),
    Affine(Affine),
    Xor(SingleByteXor),
    Substitution(Substitution),
}

macro_rules! with_cipher {
    ($entry:expr, $cipher:ident => $body:expr) => {
        match $entry {
            CatalogCipher::Caesar($cipher) => $body,
            CatalogCipher::Affine($cipher) => $body,
            CatalogCipher::Xor($cipher) => $body,
            CatalogCipher::Substitution($cipher) => $body,
        }
    };
}

impl CatalogCipher {
    pub fn name(&self) -> &'static str {
        with_cipher!(self, c => c.name())
    }

    pub fn description(&self) -> &'static str {
        match self {
            CatalogCipher::Caesar(_) => "shift every symbol by a fixed amount",
            CatalogCipher::Affine(_) => "map symbol i to a*i + b",
            CatalogCipher::Xor(_) => "xor every byte with one key byte",
            CatalogCipher::Substitution(_) => "replace symbols by a permuted alphabet",
        }
    }

    pub fn cardinality(&self) -> Cardinality {
        with_cipher!(self, c => c.key_space().cardinality())
    }

    /// The symbols the cipher works on. `None` when it accepts any byte.
    pub fn alphabet(&self) -> Option<&Alphabet> {
        match self {
            CatalogCipher::Caesar(c) => Some(c.alphabet()),
            CatalogCipher::Affine(c) => Some(c.alphabet()),
            CatalogCipher::Xor(_) => None,
            CatalogCipher::Substitution(c) => Some(c.alphabet()),
        }
    }

    /// Check that `key` parses, returning its canonical form.
    pub fn parse_key(&self, key: &str) -> Result<String> {
        with_cipher!(self, c => {
            let space = c.key_space();
            space.parse_key(key).map(|k| space.format_key(&k))
        })
    }

    pub fn encrypt(&self, plaintext: &[u8], key: &str) -> Result<Vec<u8>> {
        with_cipher!(self, c => c.encrypt(plaintext, &c.key_space().parse_key(key)?))
    }

    pub fn decrypt(&self, ciphertext: &[u8], key: &str) -> Result<Vec<u8>> {
        with_cipher!(self, c => c.decrypt(ciphertext, &c.key_space().parse_key(key)?))
    }

    pub fn attack<S: Scorer + ?Sized>(
        &self,
        ciphertext: &[u8],
        scorer: &S,
        config: &AttackConfig,
    ) -> Result<AttackReport> {
        with_cipher!(self, c => {
            let result = attack(ciphertext, c, scorer, config)?;
            Ok(AttackReport::new(c, result))
        })
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    ciphers: Vec<CatalogCipher>,
}

impl Catalog {
    /// Every cipher, over `A-Z` with case folding where an alphabet applies.
    pub fn standard() -> Self {
        Self::with_alphabet(Alphabet::english())
    }

    pub fn with_alphabet(alphabet: Alphabet) -> Self {
        Self {
            ciphers: vec![
                CatalogCipher::Caesar(Caesar::new(alphabet.clone())),
                CatalogCipher::Affine(Affine::new(alphabet.clone())),
                CatalogCipher::Xor(SingleByteXor::new()),
                CatalogCipher::Substitution(Substitution::new(alphabet)),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Result<&CatalogCipher> {
        self.ciphers
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| Error::UnknownCipher(name.to_string()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.ciphers.iter().map(|c| c.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogCipher> {
        self.ciphers.iter()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::{cipher::conformance, language_model::english_model, scorer::NgramScorer};

    #[test]
    fn lists_every_cipher() {
        let catalog = Catalog::standard();

        assert_eq!(
            catalog.names(),
            vec!["caesar", "affine", "xor", "substitution"]
        );
    }

    #[rstest]
    #[case("caesar", Cardinality::Finite(26))]
    #[case("affine", Cardinality::Finite(312))]
    #[case("xor", Cardinality::Finite(256))]
    #[case("substitution", Cardinality::Finite(403_291_461_126_605_635_584_000_000))]
    fn reports_key_space_sizes(#[case] name: &str, #[case] expected: Cardinality) {
        assert_eq!(Catalog::standard().get(name).unwrap().cardinality(), expected);
    }

    #[test]
    fn unknown_names_are_an_error() {
        let err = Catalog::standard().get("enigma").unwrap_err();

        assert_eq!(err, Error::UnknownCipher("enigma".to_string()));
    }

    #[rstest]
    #[case("caesar", "1", b"HELLO".as_slice(), b"IFMMP".as_slice())]
    #[case("caesar", "23", b"FOOBAR".as_slice(), b"CLLYXO".as_slice())]
    #[case("affine", "5,8", b"AFFINECIPHER".as_slice(), b"IHHWVCSWFRCP".as_slice())]
    #[case(
        "substitution",
        "zebrascdfghijklmnopqtuvwxy",
        b"FLEEATONCE".as_slice(),
        b"SIAAZQLKBA".as_slice()
    )]
    #[case("xor", "58", b"hi".as_slice(), &[0x30, 0x31])]
    fn encrypts_and_decrypts_with_textual_keys(
        #[case] name: &str,
        #[case] key: &str,
        #[case] plaintext: &[u8],
        #[case] ciphertext: &[u8],
    ) {
        let cipher = Catalog::standard();
        let cipher = cipher.get(name).unwrap();

        assert_eq!(cipher.encrypt(plaintext, key).unwrap(), ciphertext);
        assert_eq!(cipher.decrypt(ciphertext, key).unwrap(), plaintext);
    }

    #[rstest]
    #[case("caesar", "26")]
    #[case("caesar", "minus one")]
    #[case("affine", "2,3")]
    #[case("xor", "100")]
    #[case("substitution", "ABC")]
    fn invalid_keys_are_rejected(#[case] name: &str, #[case] key: &str) {
        let catalog = Catalog::standard();
        let cipher = catalog.get(name).unwrap();

        assert!(matches!(cipher.parse_key(key), Err(Error::InvalidKey(_))));
        assert!(matches!(cipher.encrypt(b"ABC", key), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn parse_key_returns_canonical_form() {
        let catalog = Catalog::standard();

        assert_eq!(
            catalog.get("substitution").unwrap().parse_key("zebrascdfghijklmnopqtuvwxy"),
            Ok("ZEBRASCDFGHIJKLMNOPQTUVWXY".to_string())
        );
        assert_eq!(catalog.get("xor").unwrap().parse_key("5A"), Ok("5a".to_string()));
    }

    #[test]
    fn every_cipher_round_trips() {
        for cipher in Catalog::standard().iter() {
            let symbols: Vec<u8> = match cipher.alphabet() {
                Some(alphabet) => alphabet.symbols().to_vec(),
                None => (0..=255).collect(),
            };
            with_cipher!(cipher, c => conformance::assert_round_trips(c, &symbols));
        }
    }

    #[test]
    fn attack_produces_textual_report() {
        let catalog = Catalog::standard();
        let cipher = catalog.get("caesar").unwrap();
        let scorer = NgramScorer::new(english_model());
        let ciphertext = cipher.encrypt(b"ATTACKATDAWN", "3").unwrap();
        let config = AttackConfig {
            top_k: 2,
            ..AttackConfig::default()
        };

        let report = cipher.attack(&ciphertext, &scorer, &config).unwrap();

        assert_eq!(report.cipher, "caesar");
        assert_eq!(report.candidates.len(), 2);
        assert_eq!(report.best().unwrap().key, "3");
        assert_eq!(report.best().unwrap().plaintext, "ATTACKATDAWN");
    }

    #[test]
    fn custom_alphabet_reaches_every_cipher() {
        let alphabet = Alphabet::new(b"abcdefghijklmnopqrstuvwxyz").unwrap();
        let catalog = Catalog::with_alphabet(alphabet);

        assert_eq!(
            catalog.get("caesar").unwrap().encrypt(b"hello", "4").unwrap(),
            b"lipps"
        );
        assert_eq!(
            catalog.get("substitution").unwrap().parse_key("zebrascdfghijklmnopqtuvwxy"),
            Ok("zebrascdfghijklmnopqtuvwxy".to_string())
        );
        assert!(catalog.get("affine").unwrap().encrypt(b"HELLO", "5,8").is_err());
    }
}
