//! Which side(s) of a freshly selected card are revealed.
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Per-deck choice of what to show when a new card comes up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Question or answer, picked with even odds for every card.
    #[default]
    Random,
    Question,
    Answer,
    Both,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 4] = [
        DisplayMode::Random,
        DisplayMode::Question,
        DisplayMode::Answer,
        DisplayMode::Both,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Random => "Either",
            DisplayMode::Question => "Question",
            DisplayMode::Answer => "Answer",
            DisplayMode::Both => "Both",
        }
    }

    /// Decides what a newly selected card shows. Only `Random` consumes randomness.
    pub fn prompt<R: Rng + ?Sized>(self, rng: &mut R) -> Reveal {
        match self {
            DisplayMode::Random => {
                if rng.gen_bool(0.5) {
                    Reveal::Question
                } else {
                    Reveal::Answer
                }
            }
            DisplayMode::Question => Reveal::Question,
            DisplayMode::Answer => Reveal::Answer,
            DisplayMode::Both => Reveal::Both,
        }
    }
}

/// Sides currently visible for the selected card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reveal {
    Question,
    Answer,
    Both,
}

impl Reveal {
    pub fn shows_question(self) -> bool {
        matches!(self, Reveal::Question | Reveal::Both)
    }

    pub fn shows_answer(self) -> bool {
        matches!(self, Reveal::Answer | Reveal::Both)
    }
}
