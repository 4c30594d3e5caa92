//! Reading and writing `.flashcard` deck files.
//!
//! Layout, one entry per line:
//! ```text
//! <deck name>
//! <aggressiveness, 0.0 - 1.0>
//! <question><TAB><answer>
//! ...
//! ```
//! Blank lines and lines starting with `%` are skipped. A malformed line is
//! reported and dropped; the rest of the file still loads.

use crate::error::{Error, Result};
use crate::models::{Deck, Flashcard};
use std::fmt;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub const COMMENT_MARKER: char = '%';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Second line of the file is not a number
    Aggressiveness,
    /// Card line without exactly one tab
    FieldCount,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::Aggressiveness => {
                write!(f, "Aggressiveness line (second line in file) is not a number")
            }
            ParseErrorKind::FieldCount => write!(f, "Line must have exactly one tab"),
        }
    }
}

/// A recoverable problem found while parsing a deck file.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} (line {line_number}):\n{line}")]
pub struct ParseError {
    /// 1-based line number within the file
    pub line_number: usize,
    pub kind: ParseErrorKind,
    pub line: String,
}

/// Parses deck text. Never fails: bad lines are logged and the first one is
/// kept on the returned deck.
pub fn parse_deck(text: &str, default_aggressiveness: f64) -> Deck {
    let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));
    let mut errors = Vec::new();

    let name = lines.next().map(|(_, line)| line.trim()).unwrap_or_default();

    let aggressiveness = match lines.next() {
        Some((line_number, line)) => match line.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                errors.push(ParseError {
                    line_number,
                    kind: ParseErrorKind::Aggressiveness,
                    line: line.to_string(),
                });
                default_aggressiveness
            }
        },
        None => default_aggressiveness,
    };

    let mut deck = Deck::new(name, aggressiveness);

    for (line_number, raw) in lines {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        match fields.as_slice() {
            [question, answer] => deck.push(Flashcard::new(question.trim(), answer.trim())),
            _ => errors.push(ParseError {
                line_number,
                kind: ParseErrorKind::FieldCount,
                line: raw.to_string(),
            }),
        }
    }

    for error in errors {
        log::warn!("Deck '{}': {}", deck.name, error);
        deck.record_parse_error(error);
    }

    deck
}

/// Renders a deck in file order, ready to be written back.
pub fn render_deck(deck: &Deck) -> String {
    let mut out = format!("{}\n{}\n", deck.name, deck.aggressiveness());
    for card in deck.flashcards() {
        out.push_str(&card.question);
        out.push('\t');
        out.push_str(&card.answer);
        out.push('\n');
    }
    out
}

/// Loads a deck file and remembers `path` as the place to save it back to.
pub fn load_deck(path: &Path, default_aggressiveness: f64) -> Result<Deck> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let mut deck = parse_deck(&text, default_aggressiveness);
    deck.set_source(path);

    log::debug!(
        "Loaded deck '{}' ({} cards) from {}",
        deck.name,
        deck.len(),
        path.display()
    );
    Ok(deck)
}

/// Writes the deck to its source file and marks it clean.
///
/// The text goes to a temporary file next to the source first, which then
/// replaces the source, so a failed write leaves the old deck intact.
pub fn save_deck(deck: &mut Deck) -> Result<()> {
    let path = deck
        .source()
        .ok_or_else(|| Error::NoSource(deck.name.clone()))?
        .to_path_buf();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    file.write_all(render_deck(deck).as_bytes())
        .map_err(|e| Error::io(file.path(), e))?;
    file.persist(&path).map_err(|e| Error::io(&path, e.error))?;

    deck.mark_saved();
    Ok(())
}
