use crate::feed::{FeedItem, FeedLoader, LoadResult};
use crate::util::ConnectivityCheck;
use anyhow::Result;
use std::borrow::Cow;
use tokio::time::Instant;

/// Placeholder date for rows whose timestamp has no `T` separator.
pub const NO_DATE_AVAILABLE: &str = "No date available";

const PUBLICATION_DATE_SEPARATOR: char = 'T';

// ============================================================================
// Event Types
// ============================================================================

/// Events from background tasks
pub enum AppEvent {
    /// A load cycle finished.
    ///
    /// Fields:
    /// - `generation`: The generation counter when this load was spawned
    /// - `result`: Parsed items, or why there are none
    FeedLoaded {
        generation: u64,
        result: LoadResult,
    },
    /// Connectivity probe for a manual reload finished.
    ConnectivityChecked { available: bool },
}

// ============================================================================
// Feed List Presenter
// ============================================================================

/// Why the list is empty. Selects the empty-state message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// No load was attempted because the network is unavailable.
    NoConnection,
    /// The fetch itself failed (network fault or bad status).
    FetchFailed,
    /// The fetch succeeded but nothing usable was parsed.
    NoNews,
}

impl EmptyReason {
    pub fn message(self) -> &'static str {
        match self {
            EmptyReason::NoConnection => "No internet connection.",
            EmptyReason::FetchFailed => "Unable to reach the news service.",
            EmptyReason::NoNews => "No news available.",
        }
    }
}

/// Receives the URL of a selected row.
pub trait UrlSink {
    fn open_url(&mut self, url: &str) -> Result<()>;
}

/// Display text for one list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowText<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub section: &'a str,
    pub date: &'a str,
    pub time: &'a str,
}

/// Splits a raw publication timestamp into date and time on the first `T`.
///
/// Purely textual. Without a separator the date is [`NO_DATE_AVAILABLE`] and
/// the time is empty.
pub fn split_timestamp(timestamp: &str) -> (&str, &str) {
    match timestamp.split_once(PUBLICATION_DATE_SEPARATOR) {
        Some((date, time)) => (date, time),
        None => (NO_DATE_AVAILABLE, ""),
    }
}

/// List-view state bound to the most recent load outcome.
///
/// A replacement swaps the whole sequence at once; there is no incremental
/// update.
#[derive(Debug, Default)]
pub struct FeedListPresenter {
    items: Vec<FeedItem>,
    selected: usize,
    empty_reason: Option<EmptyReason>,
    loading: bool,
}

impl FeedListPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Discards the bound sequence and installs `items`. Selection resets to the top.
    pub fn replace_all(&mut self, items: Vec<FeedItem>) {
        self.items = items;
        self.selected = 0;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn empty_reason(&self) -> Option<EmptyReason> {
        self.empty_reason
    }

    /// Message shown in place of the list, if any.
    pub fn empty_message(&self) -> Option<&'static str> {
        if !self.items.is_empty() {
            return None;
        }
        self.empty_reason.map(EmptyReason::message)
    }

    /// Connectivity check failed; no load was attempted.
    pub fn show_no_connection(&mut self) {
        self.loading = false;
        self.replace_all(Vec::new());
        self.empty_reason = Some(EmptyReason::NoConnection);
    }

    /// Binds a finished load cycle. Failures bind an empty list.
    pub fn apply_result(&mut self, result: LoadResult) {
        self.loading = false;
        match result {
            Ok(items) => {
                self.replace_all(items);
                self.empty_reason = Some(EmptyReason::NoNews);
            }
            Err(e) => {
                self.replace_all(Vec::new());
                self.empty_reason = Some(e.empty_reason());
            }
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&FeedItem> {
        self.items.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
    }

    /// Row text for the item at `index`.
    pub fn row(&self, index: usize) -> Option<RowText<'_>> {
        let item = self.items.get(index)?;
        let (date, time) = split_timestamp(&item.publication_timestamp);
        Some(RowText {
            title: &item.title,
            author: &item.author_name,
            section: &item.section,
            date,
            time,
        })
    }

    /// Hands the URL of row `index` to `sink`.
    ///
    /// Returns `Ok(false)` without touching the sink if `index` is out of range.
    pub fn open_at(&self, index: usize, sink: &mut dyn UrlSink) -> Result<bool> {
        let Some(item) = self.items.get(index) else {
            return Ok(false);
        };
        sink.open_url(&item.url)?;
        Ok(true)
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub presenter: FeedListPresenter,
    pub loader: FeedLoader,
    /// Fixed search URL; carries the API key, never logged.
    request_url: String,
    pub connectivity: ConnectivityCheck,

    /// Status message with expiry; `Cow` avoids allocating static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,

    /// Current frame of the loading spinner animation.
    pub spinner_frame: usize,
}

impl App {
    pub fn new(loader: FeedLoader, request_url: String, connectivity: ConnectivityCheck) -> Self {
        Self {
            presenter: FeedListPresenter::new(),
            loader,
            request_url,
            connectivity,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
        }
    }

    /// Triggers a load if the network is available, otherwise shows the
    /// no-connection empty state.
    pub fn start_load(&mut self, network_available: bool) {
        if !network_available {
            tracing::info!("Network unavailable, skipping feed load");
            self.loader.reset();
            self.presenter.show_no_connection();
            return;
        }

        self.loader.load(self.request_url.as_str());
        self.presenter.set_loading(true);
    }

    /// Applies the connectivity check run for a manual reload.
    ///
    /// A failed check leaves a shown list and an in-flight load alone; it
    /// only falls back to the no-connection state when there is nothing else
    /// to show.
    pub fn handle_connectivity_checked(&mut self, available: bool) {
        if available {
            self.start_load(true);
            return;
        }

        self.set_status("No internet connection");
        if self.loader.is_loading() {
            return;
        }
        if self.presenter.is_empty() {
            self.start_load(false);
        } else {
            tracing::info!("Network unavailable, keeping current items");
            self.presenter.set_loading(false);
        }
    }

    /// Routes a finished cycle through the loader's generation gate.
    pub fn handle_feed_loaded(&mut self, generation: u64, result: LoadResult) {
        let Some(result) = self.loader.accept(generation, result) else {
            return;
        };
        if let Err(e) = &result {
            self.set_status(format!("Load failed: {}", e));
        }
        self.presenter.apply_result(result);
    }

    /// Drops any outstanding load; nothing will be delivered afterwards.
    pub fn shutdown(&mut self) {
        self.loader.reset();
        self.presenter.set_loading(false);
    }

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}
