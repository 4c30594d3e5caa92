//! Session store for UI state that should survive restarts
//!
//! A single SQLite key/value table. Holds the active tab, the display mode
//! chosen for each deck and when the last session started. Deck contents never
//! live here; they stay in their text files.

use crate::error::Result;
use crate::models::DisplayMode;
use chrono::{DateTime, Local};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::path::Path;

const ACTIVE_TAB_KEY: &str = "decks.active_tab";
const DISPLAY_MODES_KEY: &str = "decks.display_modes";
const LAST_SESSION_KEY: &str = "session.last_started";

/// Opens (or creates) the session store at `path`
pub fn init_session_store(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    create_tables(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    create_tables(&conn)?;
    Ok(conn)
}

fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;
    Ok(())
}

pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM app_state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

pub fn set_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO app_state (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Source path of the deck whose tab was open last
pub fn get_active_tab(conn: &Connection) -> Result<Option<String>> {
    get_value(conn, ACTIVE_TAB_KEY)
}

pub fn set_active_tab(conn: &Connection, deck_source: &str) -> Result<()> {
    set_value(conn, ACTIVE_TAB_KEY, deck_source)
}

/// Display mode per deck, keyed by deck source path
pub fn get_display_modes(conn: &Connection) -> Result<HashMap<String, DisplayMode>> {
    match get_value(conn, DISPLAY_MODES_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(HashMap::new()),
    }
}

pub fn set_display_modes(conn: &Connection, modes: &HashMap<String, DisplayMode>) -> Result<()> {
    let json = serde_json::to_string(modes)?;
    set_value(conn, DISPLAY_MODES_KEY, &json)
}

/// Stamps the current time as the start of this session and returns the
/// previous session's start, if one was recorded and still parses.
pub fn record_session_start(conn: &Connection) -> Result<Option<DateTime<Local>>> {
    let previous = get_value(conn, LAST_SESSION_KEY)?.and_then(|stamp| {
        DateTime::parse_from_rfc3339(&stamp)
            .map(|time| time.with_timezone(&Local))
            .map_err(|e| log::warn!("Ignoring unreadable session timestamp {:?}: {}", stamp, e))
            .ok()
    });

    set_value(conn, LAST_SESSION_KEY, &Local::now().to_rfc3339())?;
    Ok(previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_missing_key_is_none() {
        let conn = open_in_memory().unwrap();
        assert_eq!(get_value(&conn, "nothing").unwrap(), None);
        assert_eq!(get_active_tab(&conn).unwrap(), None);
        assert!(get_display_modes(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_set_value_overwrites() {
        let conn = open_in_memory().unwrap();
        set_value(&conn, "k", "first").unwrap();
        set_value(&conn, "k", "second").unwrap();

        assert_eq!(get_value(&conn, "k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_active_tab_roundtrip() {
        let conn = open_in_memory().unwrap();
        set_active_tab(&conn, "/flash/italian.flashcard").unwrap();

        assert_eq!(
            get_active_tab(&conn).unwrap().as_deref(),
            Some("/flash/italian.flashcard")
        );
    }

    #[test]
    fn test_display_modes_roundtrip() {
        let conn = open_in_memory().unwrap();
        let modes = HashMap::from([
            ("/flash/a.flashcard".to_string(), DisplayMode::Question),
            ("/flash/b.flashcard".to_string(), DisplayMode::Both),
        ]);
        set_display_modes(&conn, &modes).unwrap();

        assert_eq!(get_display_modes(&conn).unwrap(), modes);
    }

    #[test]
    fn test_corrupt_display_modes_is_an_error() {
        let conn = open_in_memory().unwrap();
        set_value(&conn, DISPLAY_MODES_KEY, "{not json").unwrap();

        assert!(matches!(get_display_modes(&conn), Err(Error::Json(_))));
    }

    #[test]
    fn test_record_session_start_returns_previous() {
        let conn = open_in_memory().unwrap();

        assert!(record_session_start(&conn).unwrap().is_none());
        let previous = record_session_start(&conn).unwrap();
        assert!(previous.is_some());
        assert!(previous.unwrap() <= Local::now());
    }

    #[test]
    fn test_store_persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.sqlite3");

        {
            let conn = init_session_store(&path).unwrap();
            set_active_tab(&conn, "deck").unwrap();
        }

        let conn = init_session_store(&path).unwrap();
        assert_eq!(get_active_tab(&conn).unwrap().as_deref(), Some("deck"));
    }
}
