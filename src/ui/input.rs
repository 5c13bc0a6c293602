//! Input handling for the TUI.

use crate::app::{App, AppEvent, UrlSink};
use crate::util::validate_url_for_open;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::Action;

/// Opens links in the platform browser.
pub struct SystemBrowser;

impl UrlSink for SystemBrowser {
    fn open_url(&mut self, url: &str) -> Result<()> {
        // Validate before open::that() so a feed cannot launch other handlers
        let url = validate_url_for_open(url)?;
        open::that(url.as_str())?;
        Ok(())
    }
}

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
    browser: &mut dyn UrlSink,
) -> Result<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Ok(Action::Quit);
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(Action::Quit),
        KeyCode::Char('j') | KeyCode::Down => app.presenter.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.presenter.select_prev(),
        KeyCode::Char('g') | KeyCode::Home => app.presenter.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.presenter.select_last(),
        KeyCode::Enter | KeyCode::Char('o') => open_selected(app, browser),
        KeyCode::Char('r') => spawn_reload(app, event_tx),
        _ => {}
    }

    Ok(Action::Continue)
}

fn open_selected(app: &mut App, browser: &mut dyn UrlSink) {
    let index = app.presenter.selected();
    match app.presenter.open_at(index, browser) {
        Ok(true) => app.set_status("Opening in browser..."),
        Ok(false) => {}
        Err(e) => app.set_status(format!("Failed to open browser: {}", e)),
    }
}

/// Re-checks connectivity off the UI task, then reloads via
/// `AppEvent::ConnectivityChecked`.
fn spawn_reload(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let check = app.connectivity.clone();
    let tx = event_tx.clone();

    app.presenter.set_loading(true);
    tracing::debug!("Spawning connectivity check for reload");

    tokio::spawn(async move {
        let available = check.is_available().await;
        if let Err(e) = tx.send(AppEvent::ConnectivityChecked { available }).await {
            tracing::debug!(error = %e, "Connectivity result dropped (receiver closed)");
        }
    });
}
