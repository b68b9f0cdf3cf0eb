// An ordered set of symbols that ciphers and language models work over.

use crate::{Error, Result};

const NOT_A_SYMBOL: u16 = u16::MAX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
    strict: [u16; 256],
    folded: [u16; 256],
    fold_case: bool,
}

impl Alphabet {
    pub fn new(symbols: &[u8]) -> Result<Self> {
        if symbols.is_empty() {
            return Err(Error::InvalidInput("alphabet has no symbols".to_string()));
        }
        let mut strict = [NOT_A_SYMBOL; 256];
        for (idx, &symbol) in symbols.iter().enumerate() {
            if strict[symbol as usize] != NOT_A_SYMBOL {
                return Err(Error::InvalidInput(format!(
                    "alphabet repeats symbol {:?}",
                    symbol as char
                )));
            }
            strict[symbol as usize] = idx as u16;
        }
        Ok(Self {
            symbols: symbols.to_vec(),
            strict,
            folded: strict,
            fold_case: false,
        })
    }

    /// Uppercase Latin letters, folding lowercase input onto them.
    pub fn english() -> Self {
        // Cannot fail: 26 distinct symbols.
        let mut alphabet = Self {
            symbols: (b'A'..=b'Z').collect(),
            strict: [NOT_A_SYMBOL; 256],
            folded: [NOT_A_SYMBOL; 256],
            fold_case: false,
        };
        for (idx, symbol) in (b'A'..=b'Z').enumerate() {
            alphabet.strict[symbol as usize] = idx as u16;
            alphabet.folded[symbol as usize] = idx as u16;
        }
        alphabet.with_case_folding()
    }

    /// Map ASCII letters that are not symbols themselves onto their other
    /// case when normalizing or scoring text.
    pub fn with_case_folding(mut self) -> Self {
        for byte in 0..=255u8 {
            if self.strict[byte as usize] != NOT_A_SYMBOL || !byte.is_ascii_alphabetic() {
                continue;
            }
            let other = if byte.is_ascii_lowercase() {
                byte.to_ascii_uppercase()
            } else {
                byte.to_ascii_lowercase()
            };
            self.folded[byte as usize] = self.strict[other as usize];
        }
        self.fold_case = true;
        self
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn folds_case(&self) -> bool {
        self.fold_case
    }

    pub fn symbol(&self, index: usize) -> u8 {
        self.symbols[index]
    }

    pub fn index_of(&self, symbol: u8) -> Option<usize> {
        match self.strict[symbol as usize] {
            NOT_A_SYMBOL => None,
            idx => Some(idx as usize),
        }
    }

    /// Like `index_of`, but honours case folding.
    pub fn folded_index_of(&self, symbol: u8) -> Option<usize> {
        match self.folded[symbol as usize] {
            NOT_A_SYMBOL => None,
            idx => Some(idx as usize),
        }
    }

    pub fn contains(&self, symbol: u8) -> bool {
        self.index_of(symbol).is_some()
    }

    /// Check that every byte of `text` is a symbol of this alphabet.
    pub fn check(&self, text: &[u8]) -> Result<()> {
        match text.iter().position(|&b| !self.contains(b)) {
            Some(pos) => Err(Error::InvalidInput(format!(
                "byte {:#04x} at position {} is not in the alphabet",
                text[pos], pos
            ))),
            None => Ok(()),
        }
    }

    pub fn to_indices(&self, text: &[u8]) -> Result<Vec<usize>> {
        self.check(text)?;
        Ok(text
            .iter()
            .filter_map(|&b| self.index_of(b))
            .collect())
    }

    pub fn from_indices(&self, indices: &[usize]) -> Vec<u8> {
        indices.iter().map(|&i| self.symbols[i]).collect()
    }

    /// Fold case (when enabled) and drop everything that is not a symbol.
    pub fn normalize(&self, text: &[u8]) -> Vec<u8> {
        text.iter()
            .filter_map(|&b| self.folded_index_of(b))
            .map(|i| self.symbols[i])
            .collect()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::english()
    }
}
