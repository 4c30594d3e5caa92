pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod storage;

pub use error::{DeckError, Error, Result};
pub use models::{Deck, DeckSet, DisplayMode, Flashcard};
