//! Error types for deck loading, persistence and the selection engine.

use std::path::PathBuf;

/// Precondition violations raised by [`crate::models::Deck`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeckError {
    #[error("cannot select a card from an empty deck")]
    EmptyDeck,

    #[error("no card has been selected yet")]
    NoCurrentCard,

    #[error("card index {index} is out of range for a deck of {len} cards")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Deck '{0}' has no source file to save to")]
    NoSource(String),

    #[error(transparent)]
    Deck(#[from] DeckError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
