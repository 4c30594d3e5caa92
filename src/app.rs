//! Main application UI and state management.
//! One tab per deck; each tab shows the current card and the review controls.

use crate::database::session;
use crate::models::{DeckSet, DisplayMode, Reveal};
use chrono::{DateTime, Local};
use eframe::egui;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;

const CARD_TEXT_SIZE: f32 = 28.0;

/// Something the user asked of the active deck, applied after rendering
#[derive(Clone, Copy, Debug, PartialEq)]
enum DeckAction {
    Answer { correct: bool },
    ShowBoth,
    SetAggressiveness(f64),
    SetDisplayMode(DisplayMode),
}

pub struct FlashcardsApp {
    decks: DeckSet,
    /// What is visible for each deck's current card; `None` when nothing is selected
    reveals: Vec<Option<Reveal>>,
    active_tab: usize,
    conn: Option<Connection>,
    rng: StdRng,
    status_message: String,

    confirm_on_quit: bool,
    show_confirmation_dialog: bool,
    allowed_to_close: bool,
}

/// Formats a timestamp as YYYY-MM-DD HH:MM
fn format_session_time(time: DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M").to_string()
}

impl eframe::App for FlashcardsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("deck_tabs").show(ctx, |ui| self.render_tabs(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(&self.status_message);
        });
        egui::CentralPanel::default().show(ctx, |ui| self.render_active_deck(ui));

        // Decks are written back when the window closes
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            if self.confirm_on_quit {
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                self.show_confirmation_dialog = true;
            } else {
                self.persist();
                self.allowed_to_close = true;
            }
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.persist();
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }
    }
}

impl FlashcardsApp {
    /// Creates the app, restoring UI state from the session store if there is one,
    /// and deals a first card from every non-empty deck.
    pub fn new(decks: DeckSet, conn: Option<Connection>, confirm_on_quit: bool) -> Self {
        let mut app = Self {
            reveals: vec![None; decks.len()],
            decks,
            active_tab: 0,
            conn,
            rng: StdRng::from_entropy(),
            status_message: String::new(),
            confirm_on_quit,
            show_confirmation_dialog: false,
            allowed_to_close: false,
        };

        let previous_session = app.restore_session();
        app.status_message = app.status_line(previous_session);

        for index in 0..app.decks.len() {
            app.deal(index);
        }
        app
    }

    fn restore_session(&mut self) -> Option<DateTime<Local>> {
        let conn = self.conn.as_ref()?;

        match session::get_display_modes(conn) {
            Ok(modes) => {
                for deck in &mut self.decks.decks {
                    let key = deck.source().map(|p| p.to_string_lossy().into_owned());
                    if let Some(mode) = key.and_then(|k| modes.get(&k)) {
                        deck.display_mode = *mode;
                    }
                }
            }
            Err(e) => log::warn!("Could not restore display modes: {}", e),
        }

        match session::get_active_tab(conn) {
            Ok(Some(source)) => {
                if let Some(index) = self.decks.position_of_source(Path::new(&source)) {
                    self.active_tab = index;
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("Could not restore active tab: {}", e),
        }

        session::record_session_start(conn)
            .map_err(|e| log::warn!("Could not record session start: {}", e))
            .ok()
            .flatten()
    }

    fn status_line(&self, previous_session: Option<DateTime<Local>>) -> String {
        let mut status = format!("{} decks loaded", self.decks.len());
        if !self.decks.failures.is_empty() {
            status.push_str(&format!(", {} failed", self.decks.failures.len()));
        }
        if let Some(time) = previous_session {
            status.push_str(&format!(" | Last session: {}", format_session_time(time)));
        }
        status
    }

    /// Selects a new card in deck `index` and decides which side to show.
    fn deal(&mut self, index: usize) {
        let Some(deck) = self.decks.get_mut(index) else {
            return;
        };
        if deck.is_empty() {
            self.reveals[index] = None;
            return;
        }

        match deck.select_card_with(&mut self.rng) {
            Ok(_) => self.reveals[index] = Some(deck.display_mode.prompt(&mut self.rng)),
            Err(e) => {
                log::error!("Deck '{}': {}", deck.name, e);
                self.reveals[index] = None;
            }
        }
    }

    fn apply(&mut self, index: usize, action: DeckAction) {
        let Some(deck) = self.decks.get_mut(index) else {
            return;
        };

        match action {
            DeckAction::Answer { correct } => {
                let moved = if correct {
                    deck.mark_correct()
                } else {
                    deck.mark_incorrect()
                };
                if let Err(e) = moved {
                    log::warn!("Deck '{}': {}", deck.name, e);
                }
                self.deal(index);
            }
            DeckAction::ShowBoth => {
                if self.reveals[index].is_some() {
                    self.reveals[index] = Some(Reveal::Both);
                }
            }
            DeckAction::SetAggressiveness(value) => deck.set_aggressiveness(value),
            DeckAction::SetDisplayMode(mode) => deck.display_mode = mode,
        }
    }

    /// Saves changed decks and writes UI state to the session store.
    fn persist(&mut self) {
        let failures = self.decks.save_all();
        if !failures.is_empty() {
            log::error!("{} decks could not be saved", failures.len());
        }

        let Some(conn) = &self.conn else {
            return;
        };

        let modes: HashMap<String, DisplayMode> = self
            .decks
            .iter()
            .filter_map(|deck| {
                let source = deck.source()?.to_string_lossy().into_owned();
                Some((source, deck.display_mode))
            })
            .collect();
        if let Err(e) = session::set_display_modes(conn, &modes) {
            log::warn!("Could not save display modes: {}", e);
        }

        if let Some(source) = self.decks.decks.get(self.active_tab).and_then(|d| d.source()) {
            if let Err(e) = session::set_active_tab(conn, &source.to_string_lossy()) {
                log::warn!("Could not save active tab: {}", e);
            }
        }
    }

    /// Renders the row of deck tabs
    fn render_tabs(&mut self, ui: &mut egui::Ui) {
        let mut selected: Option<usize> = None;

        ui.horizontal_wrapped(|ui| {
            for (i, deck) in self.decks.iter().enumerate() {
                let title = if deck.name.is_empty() {
                    "(untitled)"
                } else {
                    deck.name.as_str()
                };
                if ui.selectable_label(self.active_tab == i, title).clicked() {
                    selected = Some(i);
                }
            }
        });

        if let Some(i) = selected {
            self.active_tab = i;
        }
    }

    /// Renders the current card and review controls of the active deck
    fn render_active_deck(&mut self, ui: &mut egui::Ui) {
        if self.decks.is_empty() {
            ui.vertical_centered(|ui| {
                ui.heading("No flashcard decks found");
            });
            return;
        }

        let index = self.active_tab.min(self.decks.len() - 1);
        let deck = &self.decks.decks[index];
        let reveal = self.reveals[index];

        let (question, answer) = match (deck.current_card(), reveal) {
            (Some(card), Some(reveal)) => (
                reveal.shows_question().then(|| card.question.clone()),
                reveal.shows_answer().then(|| card.answer.clone()),
            ),
            _ => (None, None),
        };

        // Store the action to execute after UI rendering
        let mut action: Option<DeckAction> = None;

        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.label(egui::RichText::new(question.as_deref().unwrap_or(" ")).size(CARD_TEXT_SIZE));
            ui.add_space(20.0);
            ui.label(egui::RichText::new(answer.as_deref().unwrap_or(" ")).size(CARD_TEXT_SIZE));
            ui.add_space(20.0);
        });

        if deck.is_empty() {
            ui.label("This deck has no cards.");
        }
        if let Some(error) = deck.parse_error() {
            ui.colored_label(egui::Color32::RED, error.to_string());
        }

        ui.separator();

        let has_card = reveal.is_some();
        ui.horizontal(|ui| {
            if ui.add_enabled(has_card, egui::Button::new("Yes")).clicked() {
                action = Some(DeckAction::Answer { correct: true });
            }
            if ui.add_enabled(has_card, egui::Button::new("No")).clicked() {
                action = Some(DeckAction::Answer { correct: false });
            }
            if ui.add_enabled(has_card, egui::Button::new("Show")).clicked() {
                action = Some(DeckAction::ShowBoth);
            }
        });

        let mut aggressiveness = deck.aggressiveness();
        let mut mode = deck.display_mode;
        ui.horizontal(|ui| {
            ui.label("Aggressiveness");
            if ui
                .add(egui::Slider::new(&mut aggressiveness, 0.0..=1.0))
                .changed()
            {
                action = Some(DeckAction::SetAggressiveness(aggressiveness));
            }

            egui::ComboBox::from_label("Display")
                .selected_text(mode.label())
                .show_ui(ui, |ui| {
                    for option in DisplayMode::ALL {
                        ui.selectable_value(&mut mode, option, option.label());
                    }
                });
        });
        if mode != deck.display_mode {
            action = Some(DeckAction::SetDisplayMode(mode));
        }

        if let Some(action) = action {
            self.apply(index, action);
        }
    }
}
