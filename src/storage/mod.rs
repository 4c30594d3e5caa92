//! Plain-text deck files: discovery on disk and the line-based format.
pub mod deck_file;
pub mod discovery;

pub use deck_file::{ParseError, ParseErrorKind, load_deck, parse_deck, render_deck, save_deck};
pub use discovery::{DECK_EXTENSION, discover_deck_files};
