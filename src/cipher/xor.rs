// XOR ciphers. The one-time pad combines a message with a pad of the same
// length; the single-byte cipher reuses one key byte for every position and
// is the one the attack engine searches. Any byte sequence is a valid input.

use rand::{rngs::StdRng, Rng};

use crate::{
    cipher::{Cardinality, Cipher, KeySpace},
    Error, Result,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct SingleByteXor {
    keys: ByteKeys,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ByteKeys;

impl SingleByteXor {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn xor_with_key(bytes: &[u8], key: u8) -> Vec<u8> {
    bytes.iter().map(|b| b ^ key).collect()
}

/// One-time pad: XOR two buffers of equal length.
pub fn xor_bytes(buf_a: &[u8], buf_b: &[u8]) -> Result<Vec<u8>> {
    if buf_a.len() != buf_b.len() {
        return Err(Error::InvalidInput(format!(
            "pad of {} bytes does not match message of {} bytes",
            buf_b.len(),
            buf_a.len()
        )));
    }
    Ok(buf_a.iter().zip(buf_b).map(|(a, b)| a ^ b).collect())
}

/// A uniformly random pad as long as `message`.
pub fn random_pad(message: &[u8], rng: &mut StdRng) -> Vec<u8> {
    let mut pad = vec![0u8; message.len()];
    rng.fill(pad.as_mut_slice());
    pad
}

pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 {
        return Err(Error::InvalidInput(format!(
            "hex string has odd length {}",
            hex.len()
        )));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| Error::InvalidInput(format!("invalid hex at offset {i}")))
        })
        .collect()
}

pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

impl Cipher for SingleByteXor {
    type Space = ByteKeys;

    fn name(&self) -> &'static str {
        "xor"
    }

    fn key_space(&self) -> &ByteKeys {
        &self.keys
    }

    fn check_input(&self, _input: &[u8]) -> Result<()> {
        Ok(())
    }

    fn encrypt(&self, plaintext: &[u8], key: &u8) -> Result<Vec<u8>> {
        Ok(xor_with_key(plaintext, *key))
    }

    fn decrypt(&self, ciphertext: &[u8], key: &u8) -> Result<Vec<u8>> {
        Ok(xor_with_key(ciphertext, *key))
    }
}

impl KeySpace for ByteKeys {
    type Key = u8;

    fn cardinality(&self) -> Cardinality {
        Cardinality::Finite(256)
    }

    fn key_at(&self, index: u128) -> Option<u8> {
        u8::try_from(index).ok()
    }

    fn random_key(&self, rng: &mut StdRng) -> u8 {
        rng.gen()
    }

    fn neighbor(&self, key: &u8, rng: &mut StdRng) -> u8 {
        key ^ (1 << rng.gen_range(0..8))
    }

    fn is_valid(&self, _key: &u8) -> bool {
        true
    }

    fn format_key(&self, key: &u8) -> String {
        format!("{key:02x}")
    }

    fn parse_key(&self, text: &str) -> Result<u8> {
        u8::from_str_radix(text.trim(), 16)
            .map_err(|e| Error::InvalidKey(format!("expected a hex byte, got {text:?}: {e}")))
    }
}
