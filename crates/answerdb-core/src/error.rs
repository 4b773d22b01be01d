use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A unique-keyed insert hit an existing record.
    #[error("Duplicate key '{key}' in collection '{collection}'")]
    DuplicateKey { collection: String, key: String },

    /// A stored document violates the data contract (missing required field).
    #[error("Malformed document '{id}': missing field '{field}'")]
    MalformedDocument { id: String, field: &'static str },

    #[error("Content store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Error::DuplicateKey { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
