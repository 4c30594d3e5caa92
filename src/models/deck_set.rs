//! Container for all decks found under the flash directory
use super::Deck;
use super::deck::DEFAULT_AGGRESSIVENESS;
use crate::error::Error;
use crate::storage::{DECK_EXTENSION, discover_deck_files, load_deck, save_deck};
use std::path::{Path, PathBuf};

/// How deck files are recognised and what aggressiveness a broken file gets.
#[derive(Clone, Debug)]
pub struct LoadOptions {
    pub extension: String,
    pub default_aggressiveness: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            extension: DECK_EXTENSION.to_string(),
            default_aggressiveness: DEFAULT_AGGRESSIVENESS,
        }
    }
}

/// A deck file that could not be read at all.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct DeckSet {
    pub decks: Vec<Deck>,
    pub failures: Vec<LoadFailure>,
}

impl DeckSet {
    /// Loads every deck under `root`. A file that fails to load is recorded in
    /// `failures` and does not stop the others.
    pub fn load(root: &Path, options: &LoadOptions) -> Self {
        if !root.is_dir() {
            log::warn!("Flash directory {} does not exist", root.display());
        }

        let mut set = DeckSet::default();
        for path in discover_deck_files(root, &options.extension) {
            log::info!("Found deck file {}", path.display());
            match load_deck(&path, options.default_aggressiveness) {
                Ok(deck) => set.decks.push(deck),
                Err(error) => {
                    log::error!("Failed to load {}: {}", path.display(), error);
                    set.failures.push(LoadFailure { path, error });
                }
            }
        }

        log::info!(
            "Loaded {} decks ({} failed) from {}",
            set.decks.len(),
            set.failures.len(),
            root.display()
        );
        set
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Deck> {
        self.decks.iter()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Deck> {
        self.decks.get_mut(index)
    }

    pub fn position_of_source(&self, path: &Path) -> Option<usize> {
        self.decks.iter().position(|deck| deck.source() == Some(path))
    }

    /// Saves every deck with unsaved changes. Returns the failures; each
    /// deck is attempted regardless of the others.
    pub fn save_all(&mut self) -> Vec<(String, Error)> {
        let mut failures = Vec::new();
        for deck in self.decks.iter_mut().filter(|deck| deck.needs_save()) {
            match save_deck(deck) {
                Ok(()) => log::info!("Saved deck '{}'", deck.name),
                Err(e) => {
                    log::error!("Failed to save deck '{}': {}", deck.name, e);
                    failures.push((deck.name.clone(), e));
                }
            }
        }
        failures
    }
}
