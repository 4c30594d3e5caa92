//! Deck is an ordered set of flashcards that reorders itself as it is reviewed.
//!
//! Order is meaningful: cards near the front are drawn more often. Answering a
//! card correctly moves it roughly halfway towards the back, answering it
//! incorrectly halves its distance from the front. How strongly the draw
//! favours the front is controlled by the deck's aggressiveness:
//! - aggressiveness 0.0: every card is equally likely
//! - aggressiveness 1.0: the index is always the minimum of two uniform draws
use super::{DisplayMode, Flashcard};
use crate::error::DeckError;
use crate::storage::ParseError;
use rand::Rng;
use std::path::{Path, PathBuf};

pub const DEFAULT_AGGRESSIVENESS: f64 = 0.5;

#[derive(Clone, Debug)]
pub struct Deck {
    pub name: String,
    pub display_mode: DisplayMode,
    aggressiveness: f64,
    saved_aggressiveness: f64,
    flashcards: Vec<Flashcard>,
    current_index: Option<usize>,
    source: Option<PathBuf>,
    modified: bool,
    parse_error: Option<ParseError>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new("My Deck", DEFAULT_AGGRESSIVENESS)
    }
}

impl Deck {
    pub fn new(name: impl Into<String>, aggressiveness: f64) -> Self {
        let aggressiveness = clamp_aggressiveness(aggressiveness).unwrap_or(DEFAULT_AGGRESSIVENESS);
        Self {
            name: name.into(),
            display_mode: DisplayMode::default(),
            aggressiveness,
            saved_aggressiveness: aggressiveness,
            flashcards: Vec::new(),
            current_index: None,
            source: None,
            modified: false,
            parse_error: None,
        }
    }

    pub fn with_flashcards(mut self, flashcards: impl IntoIterator<Item = Flashcard>) -> Self {
        self.flashcards.extend(flashcards);
        self
    }

    /// Appends a card at the back of the ordering. Used while building a deck,
    /// so it does not count as a modification.
    pub fn push(&mut self, flashcard: Flashcard) {
        self.flashcards.push(flashcard);
    }

    pub fn len(&self) -> usize {
        self.flashcards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flashcards.is_empty()
    }

    pub fn flashcards(&self) -> &[Flashcard] {
        &self.flashcards
    }

    pub fn get(&self, index: usize) -> Option<&Flashcard> {
        self.flashcards.get(index)
    }

    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.flashcards.iter().map(|card| card.question.as_str())
    }

    pub fn answers(&self) -> impl Iterator<Item = &str> {
        self.flashcards.iter().map(|card| card.answer.as_str())
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        self.current_index.and_then(|i| self.flashcards.get(i))
    }

    pub fn aggressiveness(&self) -> f64 {
        self.aggressiveness
    }

    /// Overwrites aggressiveness, clamped into [0.0, 1.0]. Non-finite values are ignored.
    ///
    /// This does not set the modified flag; [`Deck::needs_save`] still reports
    /// the change so the value reaches the file on the next save.
    pub fn set_aggressiveness(&mut self, value: f64) {
        if let Some(value) = clamp_aggressiveness(value) {
            self.aggressiveness = value;
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn set_source(&mut self, path: impl Into<PathBuf>) {
        self.source = Some(path.into());
    }

    pub fn parse_error(&self) -> Option<&ParseError> {
        self.parse_error.as_ref()
    }

    /// Keeps the first parse error only; later ones are dropped.
    pub fn record_parse_error(&mut self, error: ParseError) {
        if self.parse_error.is_none() {
            self.parse_error = Some(error);
        }
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn needs_save(&self) -> bool {
        self.modified || self.aggressiveness != self.saved_aggressiveness
    }

    /// Called after the deck has been written back to its source.
    pub fn mark_saved(&mut self) {
        self.modified = false;
        self.saved_aggressiveness = self.aggressiveness;
    }

    /// Draws a card index biased towards the front of the deck.
    pub fn pick_index<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize, DeckError> {
        let len = self.flashcards.len();
        if len == 0 {
            return Err(DeckError::EmptyDeck);
        }

        let n = len as f64;
        let first = rng.gen_range(0.0..1.0) * n;
        let draw = if rng.gen_bool(self.aggressiveness) {
            first.min(rng.gen_range(0.0..1.0) * n)
        } else {
            first
        };

        // Float rounding can land exactly on `n` for very large decks
        Ok((draw.floor() as usize).min(len - 1))
    }

    /// Selects a card with the thread-local generator and makes it current.
    pub fn select_card(&mut self) -> Result<&Flashcard, DeckError> {
        self.select_card_with(&mut rand::thread_rng())
    }

    /// Selects a card with `rng` and makes it current.
    pub fn select_card_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&Flashcard, DeckError> {
        let index = self.pick_index(rng)?;
        self.current_index = Some(index);
        Ok(&self.flashcards[index])
    }

    /// Moves the current card about halfway towards the back. Returns its new index.
    pub fn mark_correct(&mut self) -> Result<usize, DeckError> {
        let index = self.current_index.ok_or(DeckError::NoCurrentCard)?;
        let remaining = self.flashcards.len().saturating_sub(index + 1);
        self.reinsert(index, index + remaining.div_ceil(2))
    }

    /// Halves the current card's distance from the front. Returns its new index.
    pub fn mark_incorrect(&mut self) -> Result<usize, DeckError> {
        let index = self.current_index.ok_or(DeckError::NoCurrentCard)?;
        self.reinsert(index, index / 2)
    }

    /// Removes the card at `from` and inserts it at `to`, clamped to the last
    /// index. Cards in between shift by one. Returns the index the card landed on.
    ///
    /// The current index keeps naming the same card after the move.
    pub fn reinsert(&mut self, from: usize, to: usize) -> Result<usize, DeckError> {
        let len = self.flashcards.len();
        if from >= len {
            return Err(DeckError::IndexOutOfRange { index: from, len });
        }
        let to = to.min(len - 1);

        let card = self.flashcards.remove(from);
        self.flashcards.insert(to, card);

        self.current_index = self.current_index.map(|current| {
            if current == from {
                to
            } else if from < current && current <= to {
                current - 1
            } else if to <= current && current < from {
                current + 1
            } else {
                current
            }
        });

        self.modified = true;
        Ok(to)
    }
}

fn clamp_aggressiveness(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn create_test_deck(len: usize) -> Deck {
        Deck::new("Test Deck", DEFAULT_AGGRESSIVENESS).with_flashcards(
            (0..len).map(|i| Flashcard::new(format!("q{}", i), format!("a{}", i))),
        )
    }

    /// Positions a deck's cursor without going through the random draw.
    fn with_current(mut deck: Deck, index: usize) -> Deck {
        deck.current_index = Some(index);
        deck
    }

    fn assert_pairs_intact(deck: &Deck) {
        assert_eq!(deck.questions().count(), deck.answers().count());
        for (q, a) in deck.questions().zip(deck.answers()) {
            assert_eq!(&q[1..], &a[1..], "question {} lost its answer", q);
        }
    }

    #[test]
    fn test_example_reorder_scenario() {
        let mut deck = with_current(create_test_deck(5), 1);

        assert_eq!(deck.mark_correct(), Ok(3));
        assert_eq!(deck.current_index(), Some(3));
        assert_eq!(deck.get(3).unwrap().question, "q1");

        assert_eq!(deck.mark_incorrect(), Ok(1));
        assert_eq!(deck.current_card().unwrap().question, "q1");
        assert_pairs_intact(&deck);
    }

    #[test]
    fn test_reinsert_shifts_intervening_cards() {
        let mut deck = create_test_deck(5);
        deck.reinsert(0, 3).unwrap();

        let order: Vec<&str> = deck.questions().collect();
        assert_eq!(order, ["q1", "q2", "q3", "q0", "q4"]);
        assert!(deck.is_modified());
        assert_pairs_intact(&deck);
    }

    #[test]
    fn test_reinsert_clamps_target() {
        for target in [4, 5, 17, usize::MAX] {
            let mut clamped = create_test_deck(5);
            let mut direct = create_test_deck(5);

            assert_eq!(clamped.reinsert(1, target), Ok(4));
            direct.reinsert(1, 4).unwrap();

            assert_eq!(clamped.flashcards(), direct.flashcards());
        }
    }

    #[test]
    fn test_reinsert_rejects_bad_source_index() {
        let mut deck = create_test_deck(3);
        assert_eq!(
            deck.reinsert(3, 0),
            Err(DeckError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(!deck.is_modified());
    }

    #[test]
    fn test_reinsert_keeps_cursor_on_same_card() {
        let mut deck = with_current(create_test_deck(6), 2);

        deck.reinsert(0, 4).unwrap();
        assert_eq!(deck.current_card().unwrap().question, "q2");

        deck.reinsert(5, 0).unwrap();
        assert_eq!(deck.current_card().unwrap().question, "q2");
    }

    #[test]
    fn test_single_card_deck_is_noop() {
        let mut deck = with_current(create_test_deck(1), 0);

        assert_eq!(deck.mark_correct(), Ok(0));
        assert_eq!(deck.mark_incorrect(), Ok(0));
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.get(0).unwrap().question, "q0");
    }

    #[test]
    fn test_mark_correct_moves_card_later() {
        for len in 1..10 {
            for i in 0..len {
                let mut deck = with_current(create_test_deck(len), i);
                let new_index = deck.mark_correct().unwrap();

                if i == len - 1 {
                    assert_eq!(new_index, i);
                } else {
                    assert!(new_index > i, "len {} index {} went to {}", len, i, new_index);
                }
                assert_eq!(deck.get(new_index).unwrap().question, format!("q{}", i));
                assert_pairs_intact(&deck);
            }
        }
    }

    #[test]
    fn test_mark_incorrect_moves_card_earlier() {
        for len in 1..10 {
            for i in 0..len {
                let mut deck = with_current(create_test_deck(len), i);
                let new_index = deck.mark_incorrect().unwrap();

                assert_eq!(new_index, i / 2);
                if i > 0 {
                    assert!(new_index < i);
                }
                assert_eq!(deck.len(), len);
                assert_pairs_intact(&deck);
            }
        }
    }

    #[test]
    fn test_marking_without_selection_fails() {
        let mut deck = create_test_deck(4);
        assert_eq!(deck.mark_correct(), Err(DeckError::NoCurrentCard));
        assert_eq!(deck.mark_incorrect(), Err(DeckError::NoCurrentCard));
    }

    #[test]
    fn test_select_from_empty_deck_fails() {
        let mut deck = create_test_deck(0);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(deck.select_card_with(&mut rng), Err(DeckError::EmptyDeck));
        assert_eq!(deck.current_index(), None);
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for len in 1..12 {
            for aggressiveness in [0.0, 0.5, 1.0] {
                let mut deck = create_test_deck(len);
                deck.set_aggressiveness(aggressiveness);
                for _ in 0..200 {
                    deck.select_card_with(&mut rng).unwrap();
                    let index = deck.current_index().unwrap();
                    assert!(index < len);
                }
            }
        }
    }

    #[test]
    fn test_aggressiveness_biases_towards_front() {
        let trials = 20_000;
        let mean_index = |aggressiveness: f64| {
            let mut rng = StdRng::seed_from_u64(99);
            let mut deck = create_test_deck(20);
            deck.set_aggressiveness(aggressiveness);
            let total: usize = (0..trials)
                .map(|_| deck.pick_index(&mut rng).unwrap())
                .sum();
            total as f64 / trials as f64
        };

        let biased = mean_index(1.0);
        let uniform = mean_index(0.0);

        // Expected means are about 6.2 and 9.5
        assert!(biased < uniform, "biased {} uniform {}", biased, uniform);
        assert!(biased < 7.5);
        assert!(uniform > 8.5);
    }

    #[test]
    fn test_set_aggressiveness_clamps_and_tracks_save() {
        let mut deck = create_test_deck(3);
        assert!(!deck.needs_save());

        deck.set_aggressiveness(1.7);
        assert_eq!(deck.aggressiveness(), 1.0);
        assert!(!deck.is_modified());
        assert!(deck.needs_save());

        deck.set_aggressiveness(f64::NAN);
        assert_eq!(deck.aggressiveness(), 1.0);

        deck.mark_saved();
        assert!(!deck.needs_save());
    }

    #[test]
    fn test_only_first_parse_error_is_kept() {
        use crate::storage::ParseErrorKind;

        let mut deck = create_test_deck(0);
        deck.record_parse_error(ParseError {
            line_number: 2,
            kind: ParseErrorKind::Aggressiveness,
            line: "lots".to_string(),
        });
        deck.record_parse_error(ParseError {
            line_number: 5,
            kind: ParseErrorKind::FieldCount,
            line: "no tab".to_string(),
        });

        assert_eq!(deck.parse_error().unwrap().line_number, 2);
    }

    #[test]
    fn test_decks_do_not_share_cards() {
        let mut first = Deck::default();
        let second = Deck::default();
        first.push(Flashcard::new("uno", "one"));

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn test_select_card_with_thread_rng() {
        let mut deck = create_test_deck(4);
        let question = deck.select_card().unwrap().question.clone();

        let index = deck.current_index().unwrap();
        assert!(index < 4);
        assert_eq!(deck.get(index).unwrap().question, question);

        let mut empty = create_test_deck(0);
        assert_eq!(empty.select_card(), Err(DeckError::EmptyDeck));
    }
}
