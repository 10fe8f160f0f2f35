use std::fmt;

use thiserror::Error;

/// Entity kinds a provider can fail to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Transaction,
    Account,
    Category,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Entity::Transaction => "Transaction",
            Entity::Account => "Account",
            Entity::Category => "Category",
        };
        write!(f, "{s}")
    }
}

/// Error taxonomy shared by both provider backends.
///
/// The local backend raises `NotFound` directly; the remote backend maps an
/// empty/null response to it. `Authentication` is only ever produced by the
/// remote backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: Entity, key: String },

    #[error("{0}")]
    Validation(String),

    #[error("authentication: {0}")]
    Authentication(String),

    #[error("api error: {0}")]
    Api(String),

    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Unsupported(&'static str),

    #[error("{0}")]
    Config(String),

    #[error("local store: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed local store: {0}")]
    Store(#[from] serde_json::Error),
}

impl ProviderError {
    pub fn not_found(entity: Entity, key: impl Into<String>) -> Self {
        ProviderError::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
