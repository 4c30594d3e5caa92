pub mod deck;
pub mod deck_set;
pub mod display_mode;
pub mod flashcard;

pub use deck::Deck;
pub use deck_set::{DeckSet, LoadFailure, LoadOptions};
pub use display_mode::{DisplayMode, Reveal};
pub use flashcard::Flashcard;
