//! Input handling for the TUI.
//!
//! Search mode captures all keys until `Enter` or `Esc`; otherwise keys map
//! to feed actions on the controller.

use crate::app::{App, AppEvent};
use anyhow::{Context, Result};
use blogfeed::controller::LoadStatus;
use blogfeed::util::MAX_SEARCH_QUERY_LENGTH;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Ok(Action::Quit);
    }

    if app.search_mode {
        handle_search_input(app, code);
        return Ok(Action::Continue);
    }

    handle_browse_input(app, code, event_tx)
}

fn handle_search_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter => app.apply_search(),
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => {
            if app.search_input.chars().count() < MAX_SEARCH_QUERY_LENGTH {
                app.search_input.push(c);
            } else {
                app.set_status(format!(
                    "Recherche trop longue (max {} caractères)",
                    MAX_SEARCH_QUERY_LENGTH
                ));
            }
        }
        _ => {}
    }
}

fn handle_browse_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Esc => {
            // Esc first leaves a deep-link view, then quits
            if !app.back() {
                return Ok(Action::Quit);
            }
        }
        KeyCode::Char('b') | KeyCode::Backspace => {
            app.back();
        }
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Char('n') | KeyCode::Right => app.next_page(),
        KeyCode::Char('p') | KeyCode::Left => app.previous_page(),
        KeyCode::Char('/') => app.enter_search(),
        KeyCode::Char('t') => app.cycle_tag(),
        KeyCode::Char('r') => {
            if matches!(app.controller.status(), LoadStatus::Loading) {
                app.set_status("Chargement déjà en cours");
            } else {
                app.start_load(event_tx);
            }
        }
        KeyCode::Char('o') => {
            if let Some(url) = app.selected_link() {
                open::that(url.as_str())
                    .with_context(|| format!("Impossible d'ouvrir {}", url))?;
                app.set_status(format!("Ouvert : {}", url));
            }
        }
        _ => {}
    }
    Ok(Action::Continue)
}
