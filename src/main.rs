use flashcards_app::app::FlashcardsApp;
use flashcards_app::config::Config;
use flashcards_app::database::session::init_session_store;
use flashcards_app::DeckSet;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load();
    let deck_set = DeckSet::load(&config.flash_dir, &config.load_options());

    for deck in deck_set.iter() {
        log::info!("  - {} ({} cards)", deck.name, deck.len());
        if let Some(error) = deck.parse_error() {
            log::warn!("    first problem: {}", error);
        }
    }

    // The reviewer still works without a session store, it just forgets UI state
    let session_path = config.session_path();
    let conn = match init_session_store(&session_path) {
        Ok(conn) => Some(conn),
        Err(e) => {
            log::warn!("Session store {} unavailable: {}", session_path.display(), e);
            None
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height]),
        ..Default::default()
    };
    let confirm_on_quit = config.confirm_on_quit;
    eframe::run_native(
        "Flash Cards",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(FlashcardsApp::new(
                deck_set,
                conn,
                confirm_on_quit,
            )))
        }),
    )
}
