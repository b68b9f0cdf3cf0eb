use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("corpus contains no usable symbols")]
    EmptyCorpus,

    #[error("key space of {cipher} cannot be enumerated within {budget} iterations")]
    IntractableKeySpace { cipher: &'static str, budget: u64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown cipher: {0}")]
    UnknownCipher(String),
}

pub type Result<T> = std::result::Result<T, Error>;
